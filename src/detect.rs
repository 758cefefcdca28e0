//! Detection of the external tools the app depends on

use std::path::{Path, PathBuf};

/// JavaScript runtimes the engine can use for signature solving, in
/// preference order, as (binary name, display name).
pub const JS_RUNTIMES: [(&str, &str); 4] = [
    ("deno", "Deno"),
    ("bun", "Bun"),
    ("node", "Node.js"),
    ("quickjs", "QuickJS"),
];

/// Availability of one external tool.
#[derive(Debug, Clone, Default)]
pub struct ToolInfo {
    pub available: bool,
    pub path: Option<PathBuf>,
    pub version: Option<String>,
}

/// A JavaScript runtime that answered the version probe.
#[derive(Debug, Clone)]
pub struct JsRuntime {
    pub name: &'static str,
    pub info: ToolInfo,
}

/// Everything the settings dialog and status bar want to show about
/// the machine's tooling.
#[derive(Debug, Clone, Default)]
pub struct ToolReport {
    pub ffmpeg: ToolInfo,
    pub ffprobe: ToolInfo,
    pub ytdlp: ToolInfo,
    pub js_runtime: Option<JsRuntime>,
}

impl ToolReport {
    /// Probes every tool. `ffmpeg_location` overrides lookup for the
    /// media tools when non-empty; it may point at a binary or at the
    /// directory holding the binaries.
    pub fn detect(ffmpeg_location: &str) -> Self {
        let location = match ffmpeg_location.trim() {
            "" => None,
            trimmed => Some(trimmed),
        };
        Self {
            ffmpeg: probe_tool("ffmpeg", "-version", location),
            ffprobe: probe_tool("ffprobe", "-version", location),
            ytdlp: probe_tool("yt-dlp", "--version", None),
            js_runtime: detect_js_runtime(),
        }
    }
}

/// First JavaScript runtime on this machine that also answers a
/// `--version` run. A binary that is on the PATH but fails the probe
/// counts as missing and the search moves on to the next candidate.
pub fn detect_js_runtime() -> Option<JsRuntime> {
    JS_RUNTIMES.iter().find_map(|&(binary, name)| {
        let path = which::which(binary).ok()?;
        let info = runtime_probe(path)?;
        Some(JsRuntime { name, info })
    })
}

/// Confirms a resolved runtime by running it; no version line, no hit.
fn runtime_probe(path: PathBuf) -> Option<ToolInfo> {
    let version = run_version(&path, "--version")?;
    Some(ToolInfo {
        available: true,
        path: Some(path),
        version: Some(version),
    })
}

/// Finds a binary either under an explicit location or on the PATH.
/// An explicit location that does not contain the binary is a miss
/// with no PATH fallback.
pub fn resolve_binary(binary: &str, location: Option<&str>) -> Option<PathBuf> {
    match location {
        Some(location) => {
            let base = Path::new(location);
            let dir = if base.is_file() { base.parent()? } else { base };
            let candidate = dir.join(format!("{binary}{}", std::env::consts::EXE_SUFFIX));
            candidate.is_file().then_some(candidate)
        }
        None => which::which(binary).ok(),
    }
}

pub fn probe_tool(binary: &str, version_flag: &str, location: Option<&str>) -> ToolInfo {
    let Some(path) = resolve_binary(binary, location) else {
        return ToolInfo::default();
    };
    let version = run_version(&path, version_flag);
    ToolInfo {
        available: true,
        path: Some(path),
        version,
    }
}

/// Runs `binary <flag>` and returns the first non-empty stdout line of
/// a successful run.
fn run_version(path: &Path, flag: &str) -> Option<String> {
    let mut command = std::process::Command::new(path);
    command.arg(flag);
    #[cfg(windows)]
    {
        use std::os::windows::process::CommandExt;
        command.creation_flags(0x0800_0000);
    }
    let output = command.output().ok()?;
    if !output.status.success() {
        return None;
    }
    first_line(&output.stdout)
}

fn first_line(stdout: &[u8]) -> Option<String> {
    String::from_utf8_lossy(stdout)
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_runtime_preference_order() {
        let names: Vec<&str> = JS_RUNTIMES.iter().map(|(binary, _)| *binary).collect();
        assert_eq!(names, vec!["deno", "bun", "node", "quickjs"]);
    }

    #[test]
    fn test_first_line_skips_leading_blanks() {
        assert_eq!(
            first_line(b"\n  \nffmpeg version 6.1\nbuilt with gcc"),
            Some("ffmpeg version 6.1".to_string())
        );
        assert_eq!(first_line(b""), None);
    }

    #[test]
    fn test_resolve_binary_with_explicit_location() {
        let dir = tempfile::tempdir().unwrap();
        let name = format!("ffmpeg{}", std::env::consts::EXE_SUFFIX);
        let binary_path = dir.path().join(&name);
        std::fs::write(&binary_path, b"").unwrap();

        let dir_str = dir.path().to_string_lossy().into_owned();
        let file_str = binary_path.to_string_lossy().into_owned();

        // Directory and direct binary path both resolve.
        assert_eq!(resolve_binary("ffmpeg", Some(&dir_str)), Some(binary_path.clone()));
        assert_eq!(resolve_binary("ffmpeg", Some(&file_str)), Some(binary_path));
        // A sibling that is not there stays unresolved, without any
        // fallback to the PATH.
        assert_eq!(resolve_binary("ffprobe", Some(&dir_str)), None);
    }

    #[test]
    fn test_missing_tool_reports_unavailable() {
        let info = probe_tool("no-such-binary-on-any-system", "--version", None);
        assert!(!info.available);
        assert!(info.path.is_none());
        assert!(info.version.is_none());
    }

    #[cfg(unix)]
    fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;
        let path = dir.join(name);
        std::fs::write(&path, body).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[test]
    #[cfg(unix)]
    fn test_present_but_failing_runtime_is_no_hit() {
        let dir = tempfile::tempdir().unwrap();
        // Resolvable binaries that fail the version run: one silent,
        // one that prints before bailing out.
        let silent = write_script(dir.path(), "deno", "#!/bin/sh\nexit 87\n");
        assert_eq!(run_version(&silent, "--version"), None);
        assert!(runtime_probe(silent).is_none());
        let noisy = write_script(dir.path(), "bun", "#!/bin/sh\necho 1.1.0\nexit 1\n");
        assert!(runtime_probe(noisy).is_none());
    }

    #[test]
    #[cfg(unix)]
    fn test_answering_runtime_reports_path_and_version() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_script(dir.path(), "node", "#!/bin/sh\necho 'v22.6.0'\n");
        let info = runtime_probe(path.clone()).unwrap();
        assert!(info.available);
        assert_eq!(info.path, Some(path));
        assert_eq!(info.version, Some("v22.6.0".to_string()));
    }
}
