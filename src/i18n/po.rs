// Text catalog parsing for the translation sources. Free of imports so
// the build script can include this file directly.

/// Undoes the escapes the catalog format allows inside quoted strings.
fn unescape_po(raw: &str) -> String {
    raw.replace("\\n", "\n").replace("\\\"", "\"").replace("\\\\", "\\")
}

fn quoted_body(line: &str) -> Option<&str> {
    let line = line.trim();
    if line.len() >= 2 && line.starts_with('"') && line.ends_with('"') {
        Some(&line[1..line.len() - 1])
    } else {
        None
    }
}

/// Parses a translation source file into an ordered message table.
/// Handles multi-line strings via bare quoted continuation lines and
/// skips comments. Entries with an empty id (the metadata header) are
/// dropped.
#[cfg_attr(not(test), allow(dead_code))]
pub fn parse_po(source: &str) -> std::collections::BTreeMap<String, String> {
    #[derive(PartialEq)]
    enum Section {
        None,
        Id,
        Str,
    }

    let mut messages = std::collections::BTreeMap::new();
    let mut id = String::new();
    let mut translation = String::new();
    let mut section = Section::None;

    let mut commit = |id: &mut String, translation: &mut String| {
        if !id.is_empty() {
            messages.insert(std::mem::take(id), std::mem::take(translation));
        } else {
            id.clear();
            translation.clear();
        }
    };

    for line in source.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        if let Some(rest) = trimmed.strip_prefix("msgid ") {
            if section == Section::Str {
                commit(&mut id, &mut translation);
            }
            section = Section::Id;
            if let Some(body) = quoted_body(rest) {
                id.push_str(&unescape_po(body));
            }
        } else if let Some(rest) = trimmed.strip_prefix("msgstr ") {
            section = Section::Str;
            if let Some(body) = quoted_body(rest) {
                translation.push_str(&unescape_po(body));
            }
        } else if let Some(body) = quoted_body(trimmed) {
            match section {
                Section::Id => id.push_str(&unescape_po(body)),
                Section::Str => translation.push_str(&unescape_po(body)),
                Section::None => {}
            }
        }
    }
    if section == Section::Str {
        commit(&mut id, &mut translation);
    }
    messages
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_entries() {
        let source = r#"
# a comment
msgid ""
msgstr "Project-Id-Version: x\n"

msgid "Download"
msgstr "下载"

msgid "Settings"
msgstr "设置"
"#;
        let messages = parse_po(source);
        assert_eq!(messages.len(), 2);
        assert_eq!(messages.get("Download").map(String::as_str), Some("下载"));
        assert_eq!(messages.get("Settings").map(String::as_str), Some("设置"));
    }

    #[test]
    fn test_continuation_lines_are_joined() {
        let source = r#"
msgid "Please enter"
" a valid URL"
msgstr "请输入"
"有效的网址"
"#;
        let messages = parse_po(source);
        assert_eq!(
            messages.get("Please enter a valid URL").map(String::as_str),
            Some("请输入有效的网址")
        );
    }

    #[test]
    fn test_escapes_are_decoded() {
        let source = r#"
msgid "Line\nBreak \"quoted\" back\\slash"
msgstr "ok"
"#;
        let messages = parse_po(source);
        assert!(messages.contains_key("Line\nBreak \"quoted\" back\\slash"));
    }
}
