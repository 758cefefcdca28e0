use crate::format;
use crate::model::FieldMap;

/// Rough CLI equivalent of the current form state, shown at the bottom
/// of the window. Covers the common options only; nothing but the URL
/// is quoted.
pub fn preview_command(fields: &FieldMap) -> String {
    let mut cmd: Vec<String> = vec!["yt-dlp".to_string()];

    let trimmed = fields.text("video_url").trim();
    let url = if trimmed.is_empty() { "URL" } else { trimmed };

    if fields.text("format_mode") == "Audio Only" {
        cmd.extend([
            "-f".to_string(),
            "ba/b".to_string(),
            "-x".to_string(),
            "--audio-format".to_string(),
            fields.text_or("audio_ext", "mp3").to_string(),
        ]);
    } else {
        let ext = fields.text_or("video_ext", "mp4");
        let quality = fields.text_or("quality", "Best");
        cmd.extend(["--merge-output-format".to_string(), ext.to_string()]);
        cmd.push("-S".to_string());
        cmd.push(format::sort_terms(quality, ext).join(","));
    }

    cmd.push("-o".to_string());
    cmd.push(format::output_template(
        fields.text_or("output_dir", "."),
        fields.flag("custom_template_active"),
        fields.text("custom_template"),
        fields.flag("year_folder"),
    ));

    for (flag, enabled) in [
        ("--embed-thumbnail", fields.flag("embed_thumbnail")),
        ("--embed-metadata", fields.flag("embed_metadata")),
        ("--embed-subs", fields.flag("embed_subs")),
        ("--embed-chapters", fields.flag("embed_chapters")),
        ("--no-part", !fields.flag("part_files")),
        ("--restrict-filenames", fields.flag("restrict_filenames")),
        ("--force-overwrites", fields.flag("force_overwrite")),
    ] {
        if enabled {
            cmd.push(flag.to_string());
        }
    }

    let sub_langs = fields.text("sub_langs");
    if fields.flag("embed_subs") && !sub_langs.is_empty() {
        cmd.extend(["--sub-langs".to_string(), sub_langs.to_string()]);
    }

    let sponsorblock = fields.text("sponsorblock").trim();
    if !sponsorblock.is_empty() {
        cmd.extend(["--sponsorblock-mark".to_string(), sponsorblock.to_string()]);
    }

    let extra = fields.text("extra_args").trim();
    if !extra.is_empty() {
        cmd.push(extra.to_string());
    }

    cmd.push(format!("\"{url}\""));
    cmd.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_form_uses_placeholder_url() {
        let preview = preview_command(&FieldMap::new());
        assert!(preview.starts_with("yt-dlp "));
        assert!(preview.ends_with(" \"URL\""));
    }

    #[test]
    fn test_video_preview_line() {
        let mut fields = FieldMap::new();
        fields.set_text("video_url", "https://example.com/watch?v=abc");
        fields.set_text("format_mode", "Video+Audio");
        fields.set_text("video_ext", "mp4");
        fields.set_text("quality", "1080p");
        fields.set_text("output_dir", "/videos");
        fields.set_flag("part_files", true);
        let sep = std::path::MAIN_SEPARATOR;
        assert_eq!(
            preview_command(&fields),
            format!(
                "yt-dlp --merge-output-format mp4 -S res:1080,ext:mp4 \
                 -o /videos{sep}%(title)s.%(ext)s \"https://example.com/watch?v=abc\""
            )
        );
    }

    #[test]
    fn test_audio_preview_line() {
        let mut fields = FieldMap::new();
        fields.set_text("format_mode", "Audio Only");
        fields.set_text("audio_ext", "m4a");
        fields.set_flag("part_files", true);
        let preview = preview_command(&fields);
        assert!(preview.contains("-f ba/b -x --audio-format m4a"));
        assert!(!preview.contains("--merge-output-format"));
    }

    #[test]
    fn test_flags_appear_in_fixed_order() {
        let mut fields = FieldMap::new();
        fields.set_flag("embed_thumbnail", true);
        fields.set_flag("embed_metadata", true);
        fields.set_flag("restrict_filenames", true);
        let preview = preview_command(&fields);
        // part_files is off here, so --no-part shows up as well.
        assert!(preview.contains(
            "--embed-thumbnail --embed-metadata --no-part --restrict-filenames"
        ));
    }

    #[test]
    fn test_sub_langs_require_embedding() {
        let mut fields = FieldMap::new();
        fields.set_text("sub_langs", "en,zh.*");
        assert!(!preview_command(&fields).contains("--sub-langs"));
        fields.set_flag("embed_subs", true);
        assert!(preview_command(&fields).contains("--embed-subs"));
        assert!(preview_command(&fields).contains("--sub-langs en,zh.*"));
    }

    #[test]
    fn test_extra_args_shown_verbatim() {
        let mut fields = FieldMap::new();
        fields.set_text("extra_args", "--no-mtime -N 4");
        fields.set_text("sponsorblock", " sponsor,intro ");
        fields.set_flag("part_files", true);
        let preview = preview_command(&fields);
        assert!(preview.contains("--sponsorblock-mark sponsor,intro --no-mtime -N 4 \"URL\""));
    }
}
