use eframe::egui;

use crate::config::Config;
use crate::detect::ToolReport;
use crate::i18n::{Translator, LANGUAGES};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsAction {
    None,
    Save,
    Cancel,
}

/// Editable copy of the configuration shown in the settings window.
/// Nothing is written back until the user saves.
pub struct SettingsDraft {
    pub language: String,
    pub theme: String,
    pub output_dir: String,
    pub cookies_path: String,
    pub proxy_url: String,
    pub ffmpeg_path: String,
    pub data_sync_id: String,
    last_probed_ffmpeg: String,
}

impl SettingsDraft {
    pub fn from_config(config: &Config) -> Self {
        Self {
            language: config.language.clone(),
            theme: config.theme.clone(),
            output_dir: config.output_dir.clone(),
            cookies_path: config.cookies_path.clone(),
            proxy_url: config.proxy_url.clone(),
            ffmpeg_path: config.ffmpeg_path.clone(),
            data_sync_id: config.data_sync_id.clone(),
            last_probed_ffmpeg: config.ffmpeg_path.clone(),
        }
    }

    pub fn apply_to(&self, config: &mut Config) {
        config.language = self.language.clone();
        config.theme = self.theme.clone();
        config.output_dir = self.output_dir.clone();
        config.cookies_path = self.cookies_path.clone();
        config.proxy_url = self.proxy_url.clone();
        config.ffmpeg_path = self.ffmpeg_path.clone();
        config.data_sync_id = self.data_sync_id.clone();
    }

    /// The tool location to re-probe, once per edit of the field.
    pub fn take_probe_request(&mut self) -> Option<String> {
        if self.ffmpeg_path == self.last_probed_ffmpeg {
            return None;
        }
        self.last_probed_ffmpeg = self.ffmpeg_path.clone();
        Some(self.ffmpeg_path.clone())
    }

    pub fn show(
        &mut self,
        ctx: &egui::Context,
        tr: &Translator,
        tools: &Option<ToolReport>,
    ) -> SettingsAction {
        let mut action = SettingsAction::None;
        egui::Window::new(tr.tr("Settings"))
            .collapsible(false)
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(tr.tr("Language:"));
                    let current = LANGUAGES
                        .iter()
                        .find(|(code, _)| *code == self.language)
                        .map(|(_, name)| *name)
                        .unwrap_or("English");
                    egui::ComboBox::from_id_source("language")
                        .selected_text(current)
                        .show_ui(ui, |ui| {
                            for (code, name) in LANGUAGES {
                                ui.selectable_value(&mut self.language, code.to_string(), name);
                            }
                        });
                });
                ui.horizontal(|ui| {
                    ui.label(tr.tr("Theme:"));
                    let selected = if self.theme == "light" { tr.tr("Light") } else { tr.tr("Dark") };
                    egui::ComboBox::from_id_source("theme")
                        .selected_text(selected)
                        .show_ui(ui, |ui| {
                            ui.selectable_value(&mut self.theme, "dark".to_string(), tr.tr("Dark"));
                            ui.selectable_value(&mut self.theme, "light".to_string(), tr.tr("Light"));
                        });
                });

                ui.label(tr.tr("Output Directory:"));
                ui.horizontal(|ui| {
                    ui.text_edit_singleline(&mut self.output_dir);
                    if ui.button(tr.tr("Browse")).clicked() {
                        if let Some(folder) = rfd::FileDialog::new().pick_folder() {
                            self.output_dir = folder.to_string_lossy().into_owned();
                        }
                    }
                });
                ui.label(tr.tr("Cookies File:"));
                ui.horizontal(|ui| {
                    ui.text_edit_singleline(&mut self.cookies_path);
                    if ui.button(tr.tr("Browse")).clicked() {
                        if let Some(file) = rfd::FileDialog::new().pick_file() {
                            self.cookies_path = file.to_string_lossy().into_owned();
                        }
                    }
                });
                ui.label(tr.tr("Proxy URL:"));
                ui.text_edit_singleline(&mut self.proxy_url);

                ui.separator();
                ui.label(egui::RichText::new(tr.tr("Tools")).strong());
                ui.label(tr.tr("FFmpeg Location:"));
                ui.horizontal(|ui| {
                    ui.text_edit_singleline(&mut self.ffmpeg_path);
                    if ui.button(tr.tr("Browse")).clicked() {
                        if let Some(folder) = rfd::FileDialog::new().pick_folder() {
                            self.ffmpeg_path = folder.to_string_lossy().into_owned();
                        }
                    }
                });
                ui.group(|ui| {
                    ui.label("Detection");
                    let not_found = tr.tr("Not Found");
                    let version_of = |info: &crate::detect::ToolInfo| {
                        info.version.clone().unwrap_or_else(|| not_found.to_string())
                    };
                    let (ffmpeg_version, ffprobe_version, ytdlp_version) = match tools {
                        Some(report) => (
                            version_of(&report.ffmpeg),
                            version_of(&report.ffprobe),
                            version_of(&report.ytdlp),
                        ),
                        None => ("...".to_string(), "...".to_string(), "...".to_string()),
                    };
                    ui.label(tr.tr("FFmpeg Status: {}").replace("{}", &ffmpeg_version));
                    ui.label(tr.tr("FFprobe Status: {}").replace("{}", &ffprobe_version));
                    ui.label(tr.tr("yt-dlp Status: {}").replace("{}", &ytdlp_version));
                });

                ui.label(tr.tr("Data Sync ID:"));
                ui.text_edit_singleline(&mut self.data_sync_id);

                ui.separator();
                ui.horizontal(|ui| {
                    if ui.button(tr.tr("Save Settings")).clicked() {
                        action = SettingsAction::Save;
                    }
                    if ui.button(tr.tr("Cancel")).clicked() {
                        action = SettingsAction::Cancel;
                    }
                });
            });
        action
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draft_round_trip() {
        let mut config = Config::default();
        config.language = "ko".to_string();
        config.proxy_url = "http://proxy:3128".to_string();

        let mut draft = SettingsDraft::from_config(&config);
        draft.theme = "light".to_string();
        draft.data_sync_id = "sync".to_string();

        let mut updated = config.clone();
        draft.apply_to(&mut updated);
        assert_eq!(updated.language, "ko");
        assert_eq!(updated.theme, "light");
        assert_eq!(updated.data_sync_id, "sync");
        assert_eq!(updated.proxy_url, "http://proxy:3128");
    }

    #[test]
    fn test_probe_request_fires_once_per_edit() {
        let config = Config::default();
        let mut draft = SettingsDraft::from_config(&config);
        assert_eq!(draft.take_probe_request(), None);

        draft.ffmpeg_path = "/opt/ffmpeg".to_string();
        assert_eq!(draft.take_probe_request(), Some("/opt/ffmpeg".to_string()));
        assert_eq!(draft.take_probe_request(), None);
    }
}
