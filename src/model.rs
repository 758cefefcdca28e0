use std::collections::HashMap;

/// A single form field value captured from the UI.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Flag(bool),
}

/// Flat snapshot of every form field at the moment a download or preview
/// is requested. Merged from the saved configuration, the URL entry and
/// all option tabs; rebuilt on every use and never kept around.
#[derive(Debug, Clone, Default)]
pub struct FieldMap {
    values: HashMap<String, FieldValue>,
}

impl FieldMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_text(&mut self, key: &str, value: impl Into<String>) {
        self.values.insert(key.to_string(), FieldValue::Text(value.into()));
    }

    pub fn set_flag(&mut self, key: &str, value: bool) {
        self.values.insert(key.to_string(), FieldValue::Flag(value));
    }

    /// Text value of a field; empty string when absent or not text.
    pub fn text(&self, key: &str) -> &str {
        match self.values.get(key) {
            Some(FieldValue::Text(value)) => value,
            _ => "",
        }
    }

    /// Like `text`, but substitutes `default` for a missing or empty field.
    pub fn text_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        let value = self.text(key);
        if value.is_empty() { default } else { value }
    }

    /// Boolean value of a field; false when absent or not a flag.
    pub fn flag(&self, key: &str) -> bool {
        matches!(self.values.get(key), Some(FieldValue::Flag(true)))
    }
}

/// Represents the current state of a download
#[derive(Debug, Clone, PartialEq)]
pub enum DownloadStatus {
    /// Download is in progress
    Downloading,
    /// Download has completed successfully
    Done,
    /// Download ended with an error
    Failed,
}

/// Data structure for tracking a download task in the UI
pub struct DownloadTask {
    /// Identifier assigned when the task is started
    pub id: u64,
    /// Human-readable title (the URL or batch file name)
    pub title: String,
    /// Current status of the download
    pub status: DownloadStatus,
    /// Progress fraction (0.0 to 1.0)
    pub progress: f32,
}
