use eframe::egui;

use crate::format;
use crate::i18n::Translator;
use crate::model::FieldMap;

pub const FORMAT_MODES: [&str; 2] = ["Video+Audio", "Audio Only"];
pub const VIDEO_EXTS: [&str; 3] = ["mp4", "mkv", "webm"];
pub const AUDIO_EXTS: [&str; 5] = ["mp3", "m4a", "wav", "flac", "best"];
pub const QUALITY_TIERS: [&str; 6] =
    ["Best", "2160p (4K)", "1440p (2K)", "1080p", "720p", "480p"];
pub const BROWSERS: [&str; 8] =
    ["none", "chrome", "firefox", "edge", "opera", "brave", "vivaldi", "safari"];

/// The option pages shown below the URL row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    General,
    Network,
    Filters,
    Post,
    Advanced,
}

impl Tab {
    pub const ALL: [Tab; 5] = [Tab::General, Tab::Network, Tab::Filters, Tab::Post, Tab::Advanced];

    pub fn title(self) -> &'static str {
        match self {
            Tab::General => "General",
            Tab::Network => "Network",
            Tab::Filters => "Filters",
            Tab::Post => "Post-Processing",
            Tab::Advanced => "Advanced",
        }
    }
}

fn labeled_entry(ui: &mut egui::Ui, label: &str, value: &mut String) {
    ui.horizontal(|ui| {
        ui.label(label);
        ui.text_edit_singleline(value);
    });
}

fn combo(ui: &mut egui::Ui, id: &str, selected: &mut String, choices: &[&str]) {
    egui::ComboBox::from_id_source(id)
        .selected_text(selected.clone())
        .show_ui(ui, |ui| {
            for choice in choices {
                ui.selectable_value(selected, choice.to_string(), *choice);
            }
        });
}

pub struct GeneralTab {
    pub format_mode: String,
    pub video_ext: String,
    pub audio_ext: String,
    pub quality: String,
    pub music_mode: bool,
    pub year_folder: bool,
    pub custom_template_active: bool,
    pub custom_template: String,
}

impl Default for GeneralTab {
    fn default() -> Self {
        Self {
            format_mode: "Video+Audio".to_string(),
            video_ext: "mp4".to_string(),
            audio_ext: "mp3".to_string(),
            quality: "Best".to_string(),
            music_mode: false,
            year_folder: true,
            custom_template_active: false,
            custom_template: format::FLAT_TEMPLATE.to_string(),
        }
    }
}

impl GeneralTab {
    pub fn ui(&mut self, ui: &mut egui::Ui, tr: &Translator) {
        let audio_only = self.format_mode == "Audio Only";

        ui.horizontal(|ui| {
            ui.label(tr.tr("Format:"));
            combo(ui, "format_mode", &mut self.format_mode, &FORMAT_MODES);
        });
        ui.horizontal(|ui| {
            ui.label(tr.tr("Video Extension:"));
            ui.add_enabled_ui(!audio_only, |ui| {
                combo(ui, "video_ext", &mut self.video_ext, &VIDEO_EXTS);
            });
        });
        ui.horizontal(|ui| {
            ui.label(tr.tr("Audio Extension:"));
            ui.add_enabled_ui(audio_only, |ui| {
                combo(ui, "audio_ext", &mut self.audio_ext, &AUDIO_EXTS);
            });
        });
        ui.horizontal(|ui| {
            ui.label(tr.tr("Quality:"));
            ui.add_enabled_ui(!audio_only, |ui| {
                combo(ui, "quality", &mut self.quality, &QUALITY_TIERS);
            });
        });

        ui.separator();
        ui.checkbox(&mut self.music_mode, tr.tr("Music Mode (Optimized)"));
        ui.add_enabled_ui(!self.custom_template_active, |ui| {
            ui.checkbox(&mut self.year_folder, tr.tr("Organize by Year"));
        });
        ui.checkbox(&mut self.custom_template_active, tr.tr("Custom Output Template:"));
        ui.add_enabled_ui(self.custom_template_active, |ui| {
            ui.text_edit_singleline(&mut self.custom_template);
        });
    }

    pub fn collect(&self, fields: &mut FieldMap) {
        fields.set_text("format_mode", self.format_mode.clone());
        fields.set_text("video_ext", self.video_ext.clone());
        fields.set_text("audio_ext", self.audio_ext.clone());
        fields.set_text("quality", self.quality.clone());
        fields.set_flag("music_mode", self.music_mode);
        fields.set_flag("year_folder", self.year_folder);
        fields.set_flag("custom_template_active", self.custom_template_active);
        fields.set_text("custom_template", self.custom_template.clone());
    }
}

pub struct NetworkTab {
    pub browser: String,
    pub user_agent: String,
    pub rate_limit: String,
    pub timeout: String,
    pub source_ip: String,
    pub proxy_override: String,
}

impl Default for NetworkTab {
    fn default() -> Self {
        Self {
            browser: "none".to_string(),
            user_agent: String::new(),
            rate_limit: String::new(),
            timeout: String::new(),
            source_ip: String::new(),
            proxy_override: String::new(),
        }
    }
}

impl NetworkTab {
    pub fn ui(&mut self, ui: &mut egui::Ui, tr: &Translator) {
        ui.horizontal(|ui| {
            ui.label(tr.tr("Browser Cookies:"));
            combo(ui, "browser", &mut self.browser, &BROWSERS);
        });
        labeled_entry(ui, tr.tr("User Agent:"), &mut self.user_agent);
        labeled_entry(ui, tr.tr("Rate Limit (e.g. 5M):"), &mut self.rate_limit);
        labeled_entry(ui, tr.tr("Socket Timeout (s):"), &mut self.timeout);
        labeled_entry(ui, tr.tr("Source IP:"), &mut self.source_ip);
        labeled_entry(ui, tr.tr("Proxy URL:"), &mut self.proxy_override);
    }

    pub fn collect(&self, fields: &mut FieldMap) {
        fields.set_text("browser", self.browser.clone());
        fields.set_text("user_agent", self.user_agent.clone());
        fields.set_text("rate_limit", self.rate_limit.clone());
        fields.set_text("timeout", self.timeout.clone());
        fields.set_text("source_ip", self.source_ip.clone());
        fields.set_text("proxy_override", self.proxy_override.clone());
    }
}

#[derive(Default)]
pub struct FiltersTab {
    pub playlist_items: String,
    pub date: String,
    pub datebefore: String,
    pub dateafter: String,
    pub min_filesize: String,
    pub max_filesize: String,
    pub match_filter: String,
}

impl FiltersTab {
    pub fn ui(&mut self, ui: &mut egui::Ui, tr: &Translator) {
        labeled_entry(ui, tr.tr("Playlist Items (e.g. 1,2,5-10):"), &mut self.playlist_items);
        labeled_entry(ui, tr.tr("Date (YYYYMMDD):"), &mut self.date);
        labeled_entry(ui, tr.tr("Date Before:"), &mut self.datebefore);
        labeled_entry(ui, tr.tr("Date After:"), &mut self.dateafter);
        labeled_entry(ui, tr.tr("Min Filesize (e.g. 50k):"), &mut self.min_filesize);
        labeled_entry(ui, tr.tr("Max Filesize (e.g. 50m):"), &mut self.max_filesize);
        labeled_entry(ui, tr.tr("Match Filter:"), &mut self.match_filter);
    }

    pub fn collect(&self, fields: &mut FieldMap) {
        fields.set_text("playlist_items", self.playlist_items.clone());
        fields.set_text("date", self.date.clone());
        fields.set_text("datebefore", self.datebefore.clone());
        fields.set_text("dateafter", self.dateafter.clone());
        fields.set_text("min_filesize", self.min_filesize.clone());
        fields.set_text("max_filesize", self.max_filesize.clone());
        fields.set_text("match_filter", self.match_filter.clone());
    }
}

pub struct PostTab {
    pub embed_metadata: bool,
    pub embed_thumbnail: bool,
    pub embed_subs: bool,
    pub embed_chapters: bool,
    pub sub_langs: String,
    pub sponsorblock: String,
    pub write_desc: bool,
    pub write_info: bool,
    pub write_thumbnail_disk: bool,
}

impl Default for PostTab {
    fn default() -> Self {
        Self {
            embed_metadata: true,
            embed_thumbnail: true,
            embed_subs: false,
            embed_chapters: true,
            sub_langs: "en,zh.*".to_string(),
            sponsorblock: String::new(),
            write_desc: false,
            write_info: false,
            write_thumbnail_disk: false,
        }
    }
}

impl PostTab {
    pub fn ui(&mut self, ui: &mut egui::Ui, tr: &Translator) {
        ui.checkbox(&mut self.embed_metadata, tr.tr("Embed Metadata"));
        ui.checkbox(&mut self.embed_thumbnail, tr.tr("Embed Thumbnail"));
        ui.checkbox(&mut self.embed_subs, tr.tr("Embed Subtitles"));
        ui.checkbox(&mut self.embed_chapters, tr.tr("Embed Chapters"));
        labeled_entry(ui, tr.tr("Subtitle Languages (e.g. en,zh):"), &mut self.sub_langs);
        labeled_entry(ui, tr.tr("SponsorBlock (e.g. all):"), &mut self.sponsorblock);
        ui.separator();
        ui.checkbox(&mut self.write_desc, tr.tr("Write Description"));
        ui.checkbox(&mut self.write_info, tr.tr("Write Info JSON"));
        ui.checkbox(&mut self.write_thumbnail_disk, tr.tr("Save Thumbnail to Disk"));
    }

    pub fn collect(&self, fields: &mut FieldMap) {
        fields.set_flag("embed_metadata", self.embed_metadata);
        fields.set_flag("embed_thumbnail", self.embed_thumbnail);
        fields.set_flag("embed_subs", self.embed_subs);
        fields.set_flag("embed_chapters", self.embed_chapters);
        fields.set_text("sub_langs", self.sub_langs.clone());
        fields.set_text("sponsorblock", self.sponsorblock.clone());
        fields.set_flag("write_desc", self.write_desc);
        fields.set_flag("write_info", self.write_info);
        fields.set_flag("write_thumbnail_disk", self.write_thumbnail_disk);
    }
}

pub struct AdvancedTab {
    pub legacy_ssl: bool,
    pub live_start: bool,
    pub part_files: bool,
    pub restrict_filenames: bool,
    pub force_overwrite: bool,
    pub retries: String,
    pub wait_video: String,
    pub extra_args: String,
}

impl Default for AdvancedTab {
    fn default() -> Self {
        Self {
            legacy_ssl: false,
            live_start: false,
            part_files: true,
            restrict_filenames: false,
            force_overwrite: false,
            retries: "10".to_string(),
            wait_video: String::new(),
            extra_args: String::new(),
        }
    }
}

impl AdvancedTab {
    pub fn ui(&mut self, ui: &mut egui::Ui, tr: &Translator) {
        ui.checkbox(&mut self.legacy_ssl, tr.tr("Legacy SSL (Fix EOF)"));
        ui.checkbox(&mut self.live_start, tr.tr("Live From Start"));
        ui.checkbox(&mut self.part_files, tr.tr("Use .part files"));
        ui.checkbox(&mut self.restrict_filenames, tr.tr("Restrict Filenames (ASCII)"));
        ui.checkbox(&mut self.force_overwrite, tr.tr("Force Overwrite"));
        labeled_entry(ui, tr.tr("Retries:"), &mut self.retries);
        labeled_entry(ui, tr.tr("Wait for Video (seconds):"), &mut self.wait_video);
        labeled_entry(ui, tr.tr("Extra Arguments (CLI):"), &mut self.extra_args);
    }

    pub fn collect(&self, fields: &mut FieldMap) {
        fields.set_flag("legacy_ssl", self.legacy_ssl);
        fields.set_flag("live_start", self.live_start);
        fields.set_flag("part_files", self.part_files);
        fields.set_flag("restrict_filenames", self.restrict_filenames);
        fields.set_flag("force_overwrite", self.force_overwrite);
        fields.set_text("retries", self.retries.clone());
        fields.set_text("wait_video", self.wait_video.clone());
        fields.set_text("extra_args", self.extra_args.clone());
    }
}
