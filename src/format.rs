//! Shared quality and output-template rules used by both the real
//! option builder and the command preview so the two can never drift.

use std::path::Path;

/// Default file naming pattern when no custom template is active.
pub const FLAT_TEMPLATE: &str = "%(title)s.%(ext)s";

/// Subfolder component inserted when year folders are enabled.
pub const YEAR_SUBFOLDER: &str = "%(upload_date>%Y)s";

/// Pixel height for a quality tier label; None for "Best" or anything
/// unrecognized, which means no resolution cap at all.
pub fn quality_height(tier: &str) -> Option<u32> {
    match tier {
        "2160p (4K)" => Some(2160),
        "1440p (2K)" => Some(1440),
        "1080p" => Some(1080),
        "720p" => Some(720),
        "480p" => Some(480),
        _ => None,
    }
}

/// Audio codec handed to the extraction step. "best" keeps the source
/// codec ambiguous, so it falls back to mp3.
pub fn audio_codec(audio_ext: &str) -> &str {
    if audio_ext == "best" { "mp3" } else { audio_ext }
}

/// Format sorting terms for video mode. Resolution first when a tier
/// caps it, preferred container always.
pub fn sort_terms(quality: &str, video_ext: &str) -> Vec<String> {
    match quality_height(quality) {
        Some(height) => vec![format!("res:{height}"), format!("ext:{video_ext}")],
        None => vec![format!("ext:{video_ext}")],
    }
}

/// Full output template: destination directory joined with either the
/// user's custom pattern or the default one, optionally nested under a
/// year subfolder. A custom pattern only wins while it is enabled and
/// non-blank.
pub fn output_template(
    output_dir: &str,
    custom_active: bool,
    custom_template: &str,
    year_folder: bool,
) -> String {
    let base = Path::new(output_dir);
    let custom = custom_template.trim();
    let joined = if custom_active && !custom.is_empty() {
        base.join(custom)
    } else if year_folder {
        base.join(YEAR_SUBFOLDER).join(FLAT_TEMPLATE)
    } else {
        base.join(FLAT_TEMPLATE)
    };
    joined.to_string_lossy().into_owned()
}
