use std::sync::{Arc, Mutex};

use eframe::egui::{self, Color32, RichText, Visuals};
use eframe::{App, Frame};
use rfd::{MessageDialog, MessageLevel};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver};

use crate::config::{self, Config};
use crate::detect::ToolReport;
use crate::downloader::{run_download, DownloadTarget};
use crate::i18n::Translator;
use crate::model::{DownloadStatus, DownloadTask, FieldMap};
use crate::options::build_options;
use crate::preview::preview_command;
use crate::relay::WorkerEvent;
use crate::settings::{SettingsAction, SettingsDraft};
use crate::tabs::{AdvancedTab, FiltersTab, GeneralTab, NetworkTab, PostTab, Tab};
use crate::RUNTIME;

const GREEN: Color32 = Color32::from_rgb(76, 175, 80);
const RED: Color32 = Color32::from_rgb(244, 67, 54);
const AMBER: Color32 = Color32::from_rgb(255, 193, 7);

/// Application state for the GUI
pub struct AppShell {
    /// Saved configuration, updated through the settings window
    config: Config,
    /// Resolver for the configured display language
    translator: Translator,
    /// Input field for the video URL or batch file path
    url_input: String,
    /// Which option tab is showing
    active_tab: Tab,
    general: GeneralTab,
    network: NetworkTab,
    filters: FiltersTab,
    post: PostTab,
    advanced: AdvancedTab,
    /// Open settings window, if any
    settings: Option<SettingsDraft>,
    /// Latest tool probe results, filled in from a blocking task
    tools: Arc<Mutex<Option<ToolReport>>>,
    /// Download history shown in the side panel
    downloads: Vec<DownloadTask>,
    /// Event channel of the running download
    events_rx: Option<UnboundedReceiver<WorkerEvent>>,
    /// Task id the running download reports into
    active_task: Option<u64>,
    next_task_id: u64,
    /// Disables the download button while a worker is running
    downloading: bool,
    log_lines: Vec<String>,
    status_line: String,
}

impl AppShell {
    pub fn new(cc: &eframe::CreationContext<'_>, config: Config) -> Self {
        let translator = Translator::new(&config.language);
        apply_theme(&cc.egui_ctx, &config.theme);

        let status_line = translator.tr("Ready").to_string();
        let shell = Self {
            config,
            translator,
            url_input: String::new(),
            active_tab: Tab::General,
            general: GeneralTab::default(),
            network: NetworkTab::default(),
            filters: FiltersTab::default(),
            post: PostTab::default(),
            advanced: AdvancedTab::default(),
            settings: None,
            tools: Arc::new(Mutex::new(None)),
            downloads: Vec::new(),
            events_rx: None,
            active_task: None,
            next_task_id: 0,
            downloading: false,
            log_lines: Vec::new(),
            status_line,
        };
        shell.probe_tools(&cc.egui_ctx, shell.config.ffmpeg_path.clone());
        shell
    }

    /// Re-runs tool detection off the UI thread and repaints when the
    /// results land.
    fn probe_tools(&self, ctx: &egui::Context, location: String) {
        let slot = Arc::clone(&self.tools);
        let ctx = ctx.clone();
        RUNTIME.get().unwrap().spawn_blocking(move || {
            let report = ToolReport::detect(&location);
            *slot.lock().unwrap() = Some(report);
            ctx.request_repaint();
        });
    }

    /// Snapshot of the configuration and every form field, keyed the
    /// way the option builder expects.
    fn collect_fields(&self) -> FieldMap {
        let mut fields = config_fields(&self.config, &self.url_input);
        self.general.collect(&mut fields);
        self.network.collect(&mut fields);
        self.filters.collect(&mut fields);
        self.post.collect(&mut fields);
        self.advanced.collect(&mut fields);
        fields
    }

    fn start_download(&mut self) {
        let url = self.url_input.trim().to_string();
        if url.is_empty() {
            MessageDialog::new()
                .set_level(MessageLevel::Warning)
                .set_title(self.translator.tr("Input Error"))
                .set_description(self.translator.tr("Please enter a valid URL"))
                .show();
            return;
        }

        let path = self.config.output_dir.clone();
        if !std::path::Path::new(&path).exists() && std::fs::create_dir_all(&path).is_err() {
            MessageDialog::new()
                .set_level(MessageLevel::Warning)
                .set_title(self.translator.tr("Path Error"))
                .set_description(
                    self.translator
                        .tr("Output directory does not exist and cannot be created:\n{}")
                        .replace("{}", &path),
                )
                .show();
            return;
        }

        self.downloading = true;
        self.log_lines.clear();

        let fields = self.collect_fields();
        let (events_tx, events_rx) = unbounded_channel();
        let options = build_options(&fields, Some(events_tx));
        let target = DownloadTarget::from_input(&url);

        let id = self.next_task_id;
        self.next_task_id += 1;
        let title = match &target {
            DownloadTarget::Url(url) => url.clone(),
            DownloadTarget::BatchFile(path) => path.clone(),
        };
        self.downloads.push(DownloadTask {
            id,
            title,
            status: DownloadStatus::Downloading,
            progress: 0.0,
        });
        self.active_task = Some(id);
        self.events_rx = Some(events_rx);

        RUNTIME.get().unwrap().spawn(run_download(options, target));
    }

    fn active_task_mut(&mut self) -> Option<&mut DownloadTask> {
        let id = self.active_task?;
        self.downloads.iter_mut().find(|task| task.id == id)
    }

    fn finish_download(&mut self) {
        self.downloading = false;
        self.active_task = None;
        self.events_rx = None;
    }

    fn apply_event(&mut self, event: WorkerEvent) {
        match event {
            WorkerEvent::Log(line) => self.log_lines.push(line),
            WorkerEvent::Progress(fraction) => {
                if let Some(task) = self.active_task_mut() {
                    // Only update if progress increased
                    if fraction > task.progress {
                        task.progress = fraction;
                    }
                }
                self.status_line = if fraction >= 1.0 {
                    "Download Complete, processing...".to_string()
                } else {
                    format!("Downloading: {:.1}%", fraction * 100.0)
                };
            }
            WorkerEvent::Finished => {
                if let Some(task) = self.active_task_mut() {
                    task.progress = 1.0;
                    task.status = DownloadStatus::Done;
                }
                self.finish_download();
                self.log_lines.push(self.translator.tr("Success").to_string());
                self.status_line = self.translator.tr("Completed").to_string();
                MessageDialog::new()
                    .set_level(MessageLevel::Info)
                    .set_title(self.translator.tr("Success"))
                    .set_description(self.translator.tr("Download Finished!"))
                    .show();
            }
            WorkerEvent::Failed(message) => {
                if let Some(task) = self.active_task_mut() {
                    task.status = DownloadStatus::Failed;
                }
                self.finish_download();
                self.log_lines
                    .push(format!("{}: {message}", self.translator.tr("Error")));
                self.status_line = self.translator.tr("Error occurred").to_string();
                MessageDialog::new()
                    .set_level(MessageLevel::Error)
                    .set_title(self.translator.tr("Error"))
                    .set_description(&message)
                    .show();
            }
        }
    }
}

impl App for AppShell {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        // 1️⃣ Drain the worker channel, then apply the events
        let mut events = Vec::new();
        if let Some(rx) = &mut self.events_rx {
            while let Ok(event) = rx.try_recv() {
                events.push(event);
            }
        }
        for event in events {
            self.apply_event(event);
        }

        // 2️⃣ Settings window, if open
        let mut settings_action = SettingsAction::None;
        let mut probe_request = None;
        if let Some(draft) = &mut self.settings {
            let tools = self.tools.lock().unwrap().clone();
            settings_action = draft.show(ctx, &self.translator, &tools);
            probe_request = draft.take_probe_request();
        }
        if let Some(location) = probe_request {
            self.probe_tools(ctx, location);
        }
        match settings_action {
            SettingsAction::Save => {
                if let Some(draft) = self.settings.take() {
                    draft.apply_to(&mut self.config);
                }
                config::save_config(&config::config_path(), &self.config);
                self.translator = Translator::new(&self.config.language);
                apply_theme(ctx, &self.config.theme);
                ctx.send_viewport_cmd(egui::ViewportCommand::Title(window_title(
                    &self.translator,
                )));
                self.status_line = self.translator.tr("Ready").to_string();
                MessageDialog::new()
                    .set_level(MessageLevel::Info)
                    .set_title(self.translator.tr("⚙ Settings"))
                    .set_description(self.translator.tr("Settings saved successfully!"))
                    .show();
                self.probe_tools(ctx, self.config.ffmpeg_path.clone());
            }
            SettingsAction::Cancel => {
                self.settings = None;
            }
            SettingsAction::None => {}
        }

        // 3️⃣ Header: title and settings button
        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading(self.translator.tr("YouTube Downloader"));
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button(self.translator.tr("⚙ Settings")).clicked()
                        && self.settings.is_none()
                    {
                        self.settings = Some(SettingsDraft::from_config(&self.config));
                        self.probe_tools(ctx, self.config.ffmpeg_path.clone());
                    }
                });
            });
        });

        // 4️⃣ Right-side panel: download history
        egui::SidePanel::right("downloads_panel").show(ctx, |ui| {
            ui.heading(self.translator.tr("Active Downloads"));
            ui.separator();
            egui::ScrollArea::vertical()
                .auto_shrink([false; 2])
                .show(ui, |ui| {
                    let mut to_remove = vec![];
                    for task in &self.downloads {
                        let status_text = match task.status {
                            DownloadStatus::Downloading => "⬇ Downloading",
                            DownloadStatus::Done => "✅ Done",
                            DownloadStatus::Failed => "⚠ Failed",
                        };
                        ui.group(|ui| {
                            ui.vertical(|ui| {
                                ui.label(&task.title);
                                ui.label(status_text);
                                ui.add(egui::ProgressBar::new(task.progress).show_percentage());
                                if task.status != DownloadStatus::Downloading {
                                    ui.horizontal(|ui| {
                                        if ui.button(self.translator.tr("Open Folder")).clicked() {
                                            open_folder(self.config.output_dir.clone());
                                        }
                                        if ui
                                            .add(egui::Button::new("❌").fill(Color32::RED))
                                            .clicked()
                                        {
                                            to_remove.push(task.id);
                                        }
                                    });
                                }
                            });
                        });
                    }
                    if !to_remove.is_empty() {
                        self.downloads.retain(|task| !to_remove.contains(&task.id));
                    }
                });
        });

        // 5️⃣ Bottom panel: status, runtime readout, preview, log
        egui::TopBottomPanel::bottom("status_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(&self.status_line);
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let js_runtime = self
                        .tools
                        .lock()
                        .unwrap()
                        .as_ref()
                        .and_then(|report| report.js_runtime.clone());
                    let color = if js_runtime.is_some() { GREEN } else { RED };
                    let name = match js_runtime {
                        Some(runtime) => runtime.name.to_string(),
                        None => self
                            .translator
                            .tr("Missing (Node.js/Deno not found)")
                            .to_string(),
                    };
                    let text = self.translator.tr("JS Engine: {}").replace("{}", &name);
                    ui.colored_label(color, text);
                });
            });
            ui.separator();

            ui.label(self.translator.tr("Command Preview:"));
            let preview = preview_command(&self.collect_fields());
            ui.label(RichText::new(preview).monospace());
            ui.separator();

            ui.label(self.translator.tr("Log Output:"));
            egui::ScrollArea::vertical()
                .id_source("log")
                .max_height(120.0)
                .stick_to_bottom(true)
                .auto_shrink([false, true])
                .show(ui, |ui| {
                    for line in &self.log_lines {
                        if line.starts_with("[ERROR]") {
                            ui.colored_label(RED, line);
                        } else if line.starts_with("[WARN]") {
                            ui.colored_label(AMBER, line);
                        } else {
                            ui.label(line);
                        }
                    }
                });
        });

        // 6️⃣ Main panel: URL entry, download button, option tabs
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.label(self.translator.tr("Video URL:"));
            ui.horizontal(|ui| {
                let hint = self.translator.tr("https://www.youtube.com/watch?v=...");
                ui.add(
                    egui::TextEdit::singleline(&mut self.url_input)
                        .hint_text(hint)
                        .desired_width(ui.available_width() - 160.0),
                );
                let label = if self.downloading {
                    self.translator.tr("DOWNLOADING...")
                } else {
                    self.translator.tr("START DOWNLOAD")
                };
                if ui
                    .add_enabled(!self.downloading, egui::Button::new(label))
                    .clicked()
                {
                    self.start_download();
                }
            });
            ui.separator();

            ui.horizontal(|ui| {
                for tab in Tab::ALL {
                    ui.selectable_value(&mut self.active_tab, tab, self.translator.tr(tab.title()));
                }
            });
            ui.separator();

            match self.active_tab {
                Tab::General => self.general.ui(ui, &self.translator),
                Tab::Network => self.network.ui(ui, &self.translator),
                Tab::Filters => self.filters.ui(ui, &self.translator),
                Tab::Post => self.post.ui(ui, &self.translator),
                Tab::Advanced => self.advanced.ui(ui, &self.translator),
            }
        });

        // Request periodic repaint for progress updates
        ctx.request_repaint_after(std::time::Duration::from_millis(100));
    }
}

/// Base field snapshot taken from the configuration and the URL row.
fn config_fields(config: &Config, url: &str) -> FieldMap {
    let mut fields = FieldMap::new();
    fields.set_text("output_dir", config.output_dir.clone());
    fields.set_text("cookies_path", config.cookies_path.clone());
    fields.set_text("data_sync_id", config.data_sync_id.clone());
    fields.set_text("proxy_config", config.proxy_url.clone());
    fields.set_text("ffmpeg_path", config.ffmpeg_path.clone());
    fields.set_text("video_url", url);
    fields
}

/// Localized text for the OS titlebar.
pub fn window_title(translator: &Translator) -> String {
    translator.tr("yt-dlp Visual Downloader").to_string()
}

fn apply_theme(ctx: &egui::Context, theme: &str) {
    let visuals = if theme == "light" {
        Visuals::light()
    } else {
        Visuals::dark()
    };
    ctx.set_visuals(visuals);
}

/// Opens the system file manager on a folder without blocking the UI.
fn open_folder(folder: String) {
    std::thread::spawn(move || {
        #[cfg(target_os = "windows")]
        {
            let _ = std::process::Command::new("explorer").arg(folder).spawn();
        }
        #[cfg(target_os = "macos")]
        {
            let _ = std::process::Command::new("open").arg(folder).spawn();
        }
        #[cfg(all(unix, not(target_os = "macos")))]
        {
            let _ = std::process::Command::new("xdg-open").arg(folder).spawn();
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_fields_feed_the_builder() {
        let mut config = Config::default();
        config.output_dir = "/videos".to_string();
        config.proxy_url = "http://proxy:8080".to_string();
        config.data_sync_id = "sync".to_string();
        let fields = config_fields(&config, " https://u ");
        assert_eq!(fields.text("output_dir"), "/videos");
        assert_eq!(fields.text("proxy_config"), "http://proxy:8080");
        assert_eq!(fields.text("data_sync_id"), "sync");
        assert_eq!(fields.text("video_url"), " https://u ");
        // The saved proxy reaches the builder through the config key.
        let options = build_options(&fields, None);
        assert_eq!(options.proxy.as_deref(), Some("http://proxy:8080"));
    }

    #[test]
    fn test_window_title_follows_the_language() {
        assert_eq!(
            window_title(&Translator::new("en")),
            "yt-dlp Visual Downloader"
        );
        assert_eq!(
            window_title(&Translator::new("zh")),
            "yt-dlp 可视化下载器"
        );
    }
}
