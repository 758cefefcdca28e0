use std::collections::BTreeMap;
use std::path::Path;

use crate::format;
use crate::model::FieldMap;
use crate::relay::EventSender;

/// A post-processing step the engine should run, in request order.
#[derive(Debug, Clone, PartialEq)]
pub enum PostProcessor {
    EmbedThumbnail,
    SponsorBlock { categories: Vec<String>, when: String },
    ExtractAudio { preferred_codec: String },
}

/// Typed options for one engine invocation.
#[derive(Debug, Default)]
pub struct DownloadOptions {
    pub output_template: String,
    pub format: Option<String>,
    pub merge_output_format: Option<String>,
    pub format_sort: Vec<String>,
    pub postprocessors: Vec<PostProcessor>,
    pub write_thumbnail: bool,
    pub add_metadata: bool,
    pub write_subtitles: bool,
    pub add_chapters: bool,
    pub write_description: bool,
    pub write_info_json: bool,
    pub no_part: bool,
    pub restrict_filenames: bool,
    pub overwrites: bool,
    pub subtitle_langs: Vec<String>,
    pub rate_limit: Option<String>,
    pub socket_timeout: Option<f64>,
    pub source_address: Option<String>,
    pub proxy: Option<String>,
    pub cookies_from_browser: Option<String>,
    pub cookie_file: Option<String>,
    pub user_agent: Option<String>,
    pub ffmpeg_location: Option<String>,
    pub playlist_items: Option<String>,
    pub date: Option<String>,
    pub date_before: Option<String>,
    pub date_after: Option<String>,
    pub min_filesize: Option<String>,
    pub max_filesize: Option<String>,
    pub match_filter: Option<String>,
    pub retries: Option<i64>,
    pub wait_for_video: Option<(i64, i64)>,
    pub live_from_start: bool,
    pub legacy_server_connect: bool,
    pub extractor_args: BTreeMap<String, BTreeMap<String, Vec<String>>>,
    pub extra_cli_args: Vec<String>,
    pub progress_hooks: Vec<EventSender>,
}

/// Builds the engine options from the merged form snapshot. Fields
/// that are blank or fail to parse are left at their defaults instead
/// of aborting the build.
pub fn build_options(fields: &FieldMap, hook: Option<EventSender>) -> DownloadOptions {
    let mut options = DownloadOptions {
        output_template: format::output_template(
            fields.text("output_dir"),
            fields.flag("custom_template_active"),
            fields.text("custom_template"),
            fields.flag("year_folder"),
        ),
        write_thumbnail: fields.flag("embed_thumbnail") || fields.flag("write_thumbnail_disk"),
        add_metadata: fields.flag("embed_metadata"),
        write_subtitles: fields.flag("embed_subs"),
        add_chapters: fields.flag("embed_chapters"),
        write_description: fields.flag("write_desc"),
        write_info_json: fields.flag("write_info"),
        no_part: !fields.flag("part_files"),
        restrict_filenames: fields.flag("restrict_filenames"),
        overwrites: fields.flag("force_overwrite"),
        live_from_start: fields.flag("live_start"),
        legacy_server_connect: fields.flag("legacy_ssl"),
        ..DownloadOptions::default()
    };
    options.progress_hooks.extend(hook);

    // Post processors run in request order, audio extraction last.
    if fields.flag("embed_thumbnail") {
        options.postprocessors.push(PostProcessor::EmbedThumbnail);
    }
    let sponsorblock = fields.text("sponsorblock").trim();
    if !sponsorblock.is_empty() {
        options.postprocessors.push(PostProcessor::SponsorBlock {
            categories: sponsorblock.split(',').map(|c| c.trim().to_string()).collect(),
            when: "after_filter".to_string(),
        });
    }

    if fields.text("format_mode") == "Audio Only" {
        options.format = Some("bestaudio/best".to_string());
        options.postprocessors.push(PostProcessor::ExtractAudio {
            preferred_codec: format::audio_codec(fields.text("audio_ext")).to_string(),
        });
    } else {
        let video_ext = fields.text_or("video_ext", "mp4");
        let quality = fields.text_or("quality", "Best");
        options.merge_output_format = Some(video_ext.to_string());
        options.format_sort = format::sort_terms(quality, video_ext);
    }

    let rate_limit = fields.text("rate_limit");
    if !rate_limit.is_empty() {
        options.rate_limit = Some(rate_limit.to_string());
    }
    options.socket_timeout = fields.text("timeout").trim().parse().ok();
    let source_ip = fields.text("source_ip");
    if !source_ip.is_empty() {
        options.source_address = Some(source_ip.to_string());
    }

    // An explicit proxy on the Network tab beats the configured one.
    let proxy_override = fields.text("proxy_override").trim();
    let proxy = if proxy_override.is_empty() {
        fields.text("proxy_config").trim()
    } else {
        proxy_override
    };
    if !proxy.is_empty() {
        options.proxy = Some(proxy.to_string());
    }

    let browser = fields.text_or("browser", "none");
    if browser != "none" {
        options.cookies_from_browser = Some(browser.to_string());
    }
    let user_agent = fields.text("user_agent");
    if !user_agent.is_empty() {
        options.user_agent = Some(user_agent.to_string());
    }
    // A cookie file only applies when no browser extraction is chosen
    // and the file is actually there.
    let cookie_file = fields.text("cookies_path").trim();
    if !cookie_file.is_empty() && Path::new(cookie_file).exists() && browser == "none" {
        options.cookie_file = Some(cookie_file.to_string());
    }

    let ffmpeg_location = fields.text("ffmpeg_path").trim();
    if !ffmpeg_location.is_empty() {
        options.ffmpeg_location = Some(ffmpeg_location.to_string());
    }

    let filters: [(&str, &mut Option<String>); 7] = [
        ("playlist_items", &mut options.playlist_items),
        ("date", &mut options.date),
        ("datebefore", &mut options.date_before),
        ("dateafter", &mut options.date_after),
        ("min_filesize", &mut options.min_filesize),
        ("max_filesize", &mut options.max_filesize),
        ("match_filter", &mut options.match_filter),
    ];
    for (key, slot) in filters {
        let value = fields.text(key);
        if !value.is_empty() {
            *slot = Some(value.to_string());
        }
    }

    options.retries = fields.text("retries").trim().parse().ok();
    if let Ok(seconds) = fields.text("wait_video").trim().parse::<i64>() {
        options.wait_for_video = Some((seconds, seconds));
    }

    let sub_langs = fields.text("sub_langs");
    if fields.flag("embed_subs") && !sub_langs.is_empty() {
        options.subtitle_langs = sub_langs.split(',').map(str::to_string).collect();
    }

    // Music mode skips tab and player web pages and seeds the visitor
    // data with the current local time.
    if fields.flag("music_mode") {
        let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        let mut youtubetab = BTreeMap::new();
        youtubetab.insert("skip".to_string(), vec!["webpage".to_string()]);
        let mut youtube = BTreeMap::new();
        youtube.insert(
            "player_skip".to_string(),
            vec!["webpage".to_string(), "configs".to_string()],
        );
        youtube.insert("visitor_data".to_string(), vec![timestamp]);
        options.extractor_args.insert("youtubetab".to_string(), youtubetab);
        options.extractor_args.insert("youtube".to_string(), youtube);
    }
    let data_sync_id = fields.text("data_sync_id").trim();
    if !data_sync_id.is_empty() {
        options
            .extractor_args
            .entry("youtube".to_string())
            .or_default()
            .insert("data_sync_id".to_string(), vec![data_sync_id.to_string()]);
    }

    let extra = fields.text("extra_args").trim();
    if !extra.is_empty() {
        match shell_words::split(extra) {
            Ok(tokens) => options.extra_cli_args = tokens,
            Err(error) => log::warn!("Error parsing extra arguments: {error}"),
        }
    }

    options
}
