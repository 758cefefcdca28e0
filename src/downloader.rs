use std::fmt;
use std::path::Path;
use std::process::Stdio;

use tokio::{
    io::{AsyncBufReadExt, BufReader},
    process::Command,
};

use crate::options::{DownloadOptions, PostProcessor};
use crate::relay::{self, EventSender, Severity, WorkerEvent};

/// What the engine is asked to fetch. A URL field that names an
/// existing local file is treated as a batch list instead.
#[derive(Debug, Clone, PartialEq)]
pub enum DownloadTarget {
    Url(String),
    BatchFile(String),
}

impl DownloadTarget {
    pub fn from_input(input: &str) -> Self {
        let trimmed = input.trim();
        if Path::new(trimmed).is_file() {
            Self::BatchFile(trimmed.to_string())
        } else {
            Self::Url(trimmed.to_string())
        }
    }
}

#[derive(Debug)]
pub enum DownloadError {
    Spawn(std::io::Error),
    Io(std::io::Error),
    Engine(String),
}

impl fmt::Display for DownloadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Spawn(error) => write!(f, "failed to start yt-dlp: {error}"),
            Self::Io(error) => write!(f, "error reading yt-dlp output: {error}"),
            Self::Engine(message) => write!(f, "{message}"),
        }
    }
}

impl std::error::Error for DownloadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Spawn(error) | Self::Io(error) => Some(error),
            Self::Engine(_) => None,
        }
    }
}

/// Runs one download to completion, reporting everything through the
/// option set's event hook. Never panics the worker task; any failure
/// ends in a `Failed` event instead.
pub async fn run_download(options: DownloadOptions, target: DownloadTarget) {
    let hook = options.progress_hooks.first().cloned();
    match run_engine(&options, &target, hook.as_ref()).await {
        Ok(()) => {
            if let Some(hook) = &hook {
                let _ = hook.send(WorkerEvent::Progress(1.0));
                let _ = hook.send(WorkerEvent::Finished);
            }
        }
        Err(error) => {
            log::error!("Download failed: {error}");
            if let Some(hook) = &hook {
                let _ = hook.send(WorkerEvent::Failed(error.to_string()));
            }
        }
    }
}

async fn run_engine(
    options: &DownloadOptions,
    target: &DownloadTarget,
    hook: Option<&EventSender>,
) -> Result<(), DownloadError> {
    let binary = which::which("yt-dlp")
        .map_err(|_| DownloadError::Engine("yt-dlp was not found on this system".to_string()))?;

    let mut command = Command::new(binary);
    command
        .args(engine_args(options, target))
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    #[cfg(windows)]
    command.creation_flags(0x0800_0000);

    let mut child = command.spawn().map_err(DownloadError::Spawn)?;
    let stdout = child.stdout.take();
    let stderr = child.stderr.take();

    let stdout_hook = hook.cloned();
    let stdout_pump = async move {
        let Some(stdout) = stdout else { return };
        let mut lines = BufReader::new(stdout).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            let Some(hook) = &stdout_hook else { continue };
            if relay::strip_ansi(&line).starts_with("[download]") {
                if let Some(percent) = relay::parse_percent(&line) {
                    let _ = hook.send(WorkerEvent::Progress(percent / 100.0));
                }
            }
            if let Some(entry) = relay::display_line(Severity::Info, &line) {
                let _ = hook.send(WorkerEvent::Log(entry));
            }
        }
    };

    let stderr_hook = hook.cloned();
    let stderr_pump = async move {
        let Some(stderr) = stderr else { return None };
        let mut last_error = None;
        let mut lines = BufReader::new(stderr).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            let (severity, body) = relay::classify_stderr(&line);
            if severity == Severity::Error {
                last_error = Some(relay::strip_ansi(body).into_owned());
            }
            if let Some(hook) = &stderr_hook {
                if let Some(entry) = relay::display_line(severity, body) {
                    let _ = hook.send(WorkerEvent::Log(entry));
                }
            }
        }
        last_error
    };

    let ((), last_error) = tokio::join!(stdout_pump, stderr_pump);

    let status = child.wait().await.map_err(DownloadError::Io)?;
    if status.success() {
        Ok(())
    } else {
        Err(DownloadError::Engine(last_error.unwrap_or_else(|| {
            format!("yt-dlp exited with {status}")
        })))
    }
}

/// Renders the typed options into the engine's command line.
fn engine_args(options: &DownloadOptions, target: &DownloadTarget) -> Vec<String> {
    let mut args = vec!["--newline".to_string()];

    args.push("-o".to_string());
    args.push(options.output_template.clone());

    if let Some(format) = &options.format {
        args.push("-f".to_string());
        args.push(format.clone());
    }
    if let Some(container) = &options.merge_output_format {
        args.push("--merge-output-format".to_string());
        args.push(container.clone());
    }
    if !options.format_sort.is_empty() {
        args.push("-S".to_string());
        args.push(options.format_sort.join(","));
    }

    for postprocessor in &options.postprocessors {
        match postprocessor {
            PostProcessor::EmbedThumbnail => args.push("--embed-thumbnail".to_string()),
            PostProcessor::SponsorBlock { categories, .. } => {
                args.push("--sponsorblock-mark".to_string());
                args.push(categories.join(","));
            }
            PostProcessor::ExtractAudio { preferred_codec } => {
                args.push("-x".to_string());
                args.push("--audio-format".to_string());
                args.push(preferred_codec.clone());
            }
        }
    }
    // Embedding already fetches the thumbnail; the standalone flag is
    // only for keeping it on disk.
    let embeds_thumbnail = options.postprocessors.contains(&PostProcessor::EmbedThumbnail);
    if options.write_thumbnail && !embeds_thumbnail {
        args.push("--write-thumbnail".to_string());
    }

    for (flag, enabled) in [
        ("--embed-metadata", options.add_metadata),
        ("--write-subs", options.write_subtitles),
        ("--embed-chapters", options.add_chapters),
        ("--write-description", options.write_description),
        ("--write-info-json", options.write_info_json),
        ("--no-part", options.no_part),
        ("--restrict-filenames", options.restrict_filenames),
        ("--force-overwrites", options.overwrites),
        ("--live-from-start", options.live_from_start),
        ("--legacy-server-connect", options.legacy_server_connect),
    ] {
        if enabled {
            args.push(flag.to_string());
        }
    }

    if !options.subtitle_langs.is_empty() {
        args.push("--sub-langs".to_string());
        args.push(options.subtitle_langs.join(","));
    }

    for (flag, value) in [
        ("--limit-rate", &options.rate_limit),
        ("--source-address", &options.source_address),
        ("--proxy", &options.proxy),
        ("--cookies-from-browser", &options.cookies_from_browser),
        ("--cookies", &options.cookie_file),
        ("--user-agent", &options.user_agent),
        ("--ffmpeg-location", &options.ffmpeg_location),
        ("--playlist-items", &options.playlist_items),
        ("--date", &options.date),
        ("--datebefore", &options.date_before),
        ("--dateafter", &options.date_after),
        ("--min-filesize", &options.min_filesize),
        ("--max-filesize", &options.max_filesize),
        ("--match-filters", &options.match_filter),
    ] {
        if let Some(value) = value {
            args.push(flag.to_string());
            args.push(value.clone());
        }
    }

    if let Some(timeout) = options.socket_timeout {
        args.push("--socket-timeout".to_string());
        args.push(timeout.to_string());
    }
    if let Some(retries) = options.retries {
        args.push("--retries".to_string());
        args.push(retries.to_string());
    }
    if let Some((min, max)) = options.wait_for_video {
        args.push("--wait-for-video".to_string());
        args.push(format!("{min}-{max}"));
    }

    for (extractor, values) in &options.extractor_args {
        let rendered = values
            .iter()
            .map(|(key, items)| format!("{key}={}", items.join(",")))
            .collect::<Vec<_>>()
            .join(";");
        args.push("--extractor-args".to_string());
        args.push(format!("{extractor}:{rendered}"));
    }

    args.extend(options.extra_cli_args.iter().cloned());

    match target {
        DownloadTarget::Url(url) => args.push(url.clone()),
        DownloadTarget::BatchFile(path) => {
            args.push("-a".to_string());
            args.push(path.clone());
        }
    }

    args
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FieldMap;
    use crate::options::build_options;

    fn target(url: &str) -> DownloadTarget {
        DownloadTarget::Url(url.to_string())
    }

    #[test]
    fn test_basic_video_invocation() {
        let mut fields = FieldMap::new();
        fields.set_text("output_dir", "/v");
        fields.set_text("format_mode", "Video+Audio");
        fields.set_text("video_ext", "mp4");
        fields.set_text("quality", "Best");
        fields.set_flag("part_files", true);
        fields.set_flag("embed_metadata", true);
        let options = build_options(&fields, None);
        let sep = std::path::MAIN_SEPARATOR;
        assert_eq!(
            engine_args(&options, &target("https://example.com/v")),
            vec![
                "--newline".to_string(),
                "-o".to_string(),
                format!("/v{sep}%(title)s.%(ext)s"),
                "--merge-output-format".to_string(),
                "mp4".to_string(),
                "-S".to_string(),
                "ext:mp4".to_string(),
                "--embed-metadata".to_string(),
                "https://example.com/v".to_string(),
            ]
        );
    }

    #[test]
    fn test_audio_invocation_extracts() {
        let mut fields = FieldMap::new();
        fields.set_text("format_mode", "Audio Only");
        fields.set_text("audio_ext", "best");
        fields.set_flag("part_files", true);
        let options = build_options(&fields, None);
        let args = engine_args(&options, &target("u"));
        let joined = args.join(" ");
        assert!(joined.contains("-f bestaudio/best"));
        assert!(joined.contains("-x --audio-format mp3"));
        assert!(!joined.contains("-S"));
    }

    #[test]
    fn test_batch_file_uses_list_flag() {
        let options = DownloadOptions::default();
        let args = engine_args(&options, &DownloadTarget::BatchFile("/tmp/list.txt".to_string()));
        assert_eq!(args[args.len() - 2..], ["-a".to_string(), "/tmp/list.txt".to_string()]);
    }

    #[test]
    fn test_extra_args_come_right_before_target() {
        let mut fields = FieldMap::new();
        fields.set_flag("part_files", true);
        fields.set_text("extra_args", "--no-mtime -N 4");
        let options = build_options(&fields, None);
        let args = engine_args(&options, &target("https://u"));
        let tail = &args[args.len() - 4..];
        assert_eq!(tail, ["--no-mtime", "-N", "4", "https://u"]);
    }

    #[test]
    fn test_extractor_args_rendering() {
        let mut fields = FieldMap::new();
        fields.set_flag("part_files", true);
        fields.set_text("data_sync_id", "abc");
        let options = build_options(&fields, None);
        let args = engine_args(&options, &target("u"));
        let position = args.iter().position(|a| a == "--extractor-args").unwrap();
        assert_eq!(args[position + 1], "youtube:data_sync_id=abc");

        fields.set_flag("music_mode", true);
        let options = build_options(&fields, None);
        let args = engine_args(&options, &target("u"));
        let rendered: Vec<String> = args
            .windows(2)
            .filter(|pair| pair[0] == "--extractor-args")
            .map(|pair| pair[1].clone())
            .collect();
        assert_eq!(rendered.len(), 2);
        assert!(rendered[0].starts_with("youtube:data_sync_id=abc;player_skip=webpage,configs;visitor_data="));
        assert_eq!(rendered[1], "youtubetab:skip=webpage");
    }

    #[test]
    fn test_numeric_options_render() {
        let mut fields = FieldMap::new();
        fields.set_flag("part_files", true);
        fields.set_text("timeout", "12.5");
        fields.set_text("retries", "10");
        fields.set_text("wait_video", "90");
        let options = build_options(&fields, None);
        let joined = engine_args(&options, &target("u")).join(" ");
        assert!(joined.contains("--socket-timeout 12.5"));
        assert!(joined.contains("--retries 10"));
        assert!(joined.contains("--wait-for-video 90-90"));
    }

    #[test]
    fn test_thumbnail_flag_variants() {
        let mut fields = FieldMap::new();
        fields.set_flag("part_files", true);
        fields.set_flag("write_thumbnail_disk", true);
        let options = build_options(&fields, None);
        let joined = engine_args(&options, &target("u")).join(" ");
        assert!(joined.contains("--write-thumbnail"));
        assert!(!joined.contains("--embed-thumbnail"));

        fields.set_flag("embed_thumbnail", true);
        let options = build_options(&fields, None);
        let joined = engine_args(&options, &target("u")).join(" ");
        assert!(joined.contains("--embed-thumbnail"));
        assert!(!joined.contains("--write-thumbnail"));
    }

    #[test]
    fn test_target_from_input() {
        let dir = tempfile::tempdir().unwrap();
        let list = dir.path().join("urls.txt");
        std::fs::write(&list, "https://a\nhttps://b\n").unwrap();
        let list_str = list.to_string_lossy().into_owned();
        assert_eq!(
            DownloadTarget::from_input(&format!("  {list_str} ")),
            DownloadTarget::BatchFile(list_str)
        );
        assert_eq!(
            DownloadTarget::from_input("https://example.com/watch?v=x"),
            DownloadTarget::Url("https://example.com/watch?v=x".to_string())
        );
    }
}
