use eframe::egui;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::mpsc::TryRecvError;
use std::time::Duration;
use tracing::{info, warn};

use super::ic_errors::ExportError;
use super::ic_state::{ResultLog, SelectedFile, SelectionState};
use super::ic_tools::{ArchiveBuild, ConversionRun, spawn_archive_build, spawn_conversion_run};
use crate::modules::image_export::TargetFormat;

pub(super) const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "gif", "bmp", "tiff", "tif", "ico"];
const POLL_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConverterConfig {
    pub max_files: usize,
    pub webp_quality: f32,
    pub archive_name: String,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            max_files: 30,
            webp_quality: 85.0,
            archive_name: "converted_images.zip".to_string(),
        }
    }
}

/// Everything the list and result views can ask for. Collected while
/// drawing, applied once the frame's widgets are done.
#[derive(Debug, Clone, PartialEq)]
pub(super) enum ConverterAction {
    PickFiles,
    ToggleOne(usize),
    ToggleAll(bool),
    DeleteOne(usize),
    ClearAll,
    SetFormat(TargetFormat),
    Convert,
    Download(usize),
    DownloadAll,
    DismissNotice,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) enum StatusKind {
    Info,
    Error,
}

#[derive(Debug, Clone)]
pub(super) struct StatusLine {
    pub kind: StatusKind,
    pub text: String,
}

pub struct ImageConverter {
    pub(super) config: ConverterConfig,
    pub(super) selection: SelectionState,
    pub(super) results: ResultLog,
    pub(super) target_format: TargetFormat,
    pub(super) run: Option<ConversionRun>,
    pub(super) archive: Option<ArchiveBuild>,
    pub(super) notice: Option<String>,
    pub(super) status: Option<StatusLine>,
    pub(super) drag_hover: bool,
}

impl ImageConverter {
    pub fn new(config: ConverterConfig, target_format: TargetFormat) -> Self {
        Self {
            selection: SelectionState::new(config.max_files),
            results: ResultLog::default(),
            target_format,
            run: None,
            archive: None,
            notice: None,
            status: None,
            drag_hover: false,
            config,
        }
    }

    pub fn target_format(&self) -> TargetFormat {
        self.target_format
    }

    pub fn has_files(&self) -> bool {
        !self.selection.is_empty()
    }

    pub fn is_busy(&self) -> bool {
        self.run.is_some() || self.archive.is_some()
    }

    pub(super) fn is_converting(&self) -> bool {
        self.run.is_some()
    }

    pub(super) fn is_archiving(&self) -> bool {
        self.archive.is_some()
    }

    pub(super) fn can_convert(&self) -> bool {
        self.selection.can_convert() && !self.is_converting()
    }

    /// Opens the native picker and feeds the chosen files to intake.
    pub fn pick_files(&mut self) {
        if let Some(paths) = rfd::FileDialog::new()
            .add_filter("Images", IMAGE_EXTENSIONS)
            .pick_files()
        {
            self.add_paths(paths);
        }
    }

    pub fn clear_all(&mut self) {
        self.apply(ConverterAction::ClearAll);
    }

    pub(super) fn add_paths(&mut self, paths: Vec<PathBuf>) {
        let batch = paths
            .into_iter()
            .filter_map(|path| match SelectedFile::from_path(path.clone()) {
                Ok(file) => Some(file),
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "skipping unreadable file");
                    None
                }
            })
            .collect();
        self.intake(batch);
    }

    pub(super) fn add_dropped(&mut self, dropped: Vec<egui::DroppedFile>) {
        let mut paths = Vec::new();
        let mut batch = Vec::new();

        for file in dropped {
            if let Some(path) = file.path {
                paths.push(path);
            } else if let Some(bytes) = file.bytes {
                batch.push(SelectedFile::from_bytes(file.name, bytes, Some(file.mime)));
            }
        }

        for path in paths {
            match SelectedFile::from_path(path.clone()) {
                Ok(file) => batch.push(file),
                Err(e) => warn!(path = %path.display(), error = %e, "skipping unreadable file"),
            }
        }
        self.intake(batch);
    }

    pub(super) fn intake(&mut self, batch: Vec<SelectedFile>) {
        let offered = batch.len();
        match self.selection.intake(batch) {
            Ok(added) => {
                info!(offered, added, total = self.selection.len(), "files added");
                if added < offered {
                    self.status = Some(StatusLine {
                        kind: StatusKind::Info,
                        text: format!("Skipped {} non-image file(s).", offered - added),
                    });
                }
            }
            Err(e) => {
                warn!(error = %e, "intake rejected");
                self.notice = Some(e.to_string());
            }
        }
    }

    pub(super) fn apply(&mut self, action: ConverterAction) {
        match action {
            ConverterAction::PickFiles => self.pick_files(),
            ConverterAction::ToggleOne(index) => self.selection.toggle_one(index),
            ConverterAction::ToggleAll(checked) => self.selection.toggle_all(checked),
            ConverterAction::DeleteOne(index) => {
                if let Some(file) = self.selection.delete_one(index) {
                    info!(file = %file.name, "removed from selection");
                }
            }
            ConverterAction::ClearAll => self.selection.clear_all(),
            ConverterAction::SetFormat(format) => self.target_format = format,
            ConverterAction::Convert => self.start_conversion(),
            ConverterAction::Download(index) => self.download_result(index),
            ConverterAction::DownloadAll => self.start_archive_export(),
            ConverterAction::DismissNotice => self.notice = None,
        }
    }

    pub(super) fn start_conversion(&mut self) {
        if !self.can_convert() {
            return;
        }
        let files = self.selection.checked_files();
        self.status = None;
        self.run = Some(spawn_conversion_run(files, self.target_format, self.config.webp_quality));
    }

    pub(super) fn start_archive_export(&mut self) {
        if self.is_archiving() || !self.results.can_export_archive() {
            return;
        }
        self.archive = Some(spawn_archive_build(self.results.results().to_vec()));
    }

    pub(super) fn download_result(&mut self, index: usize) {
        let Some(result) = self.results.results().get(index) else {
            return;
        };
        let file_name = result.derived_file_name();

        let Some(path) = rfd::FileDialog::new()
            .set_file_name(&file_name)
            .add_filter(result.format.as_str(), &[result.format.extension()])
            .save_file()
        else {
            return;
        };

        let written = result
            .decoded_bytes()
            .and_then(|bytes| std::fs::write(&path, bytes).map_err(ExportError::from));
        self.report_save(&file_name, &path, written);
    }

    fn report_save(&mut self, what: &str, path: &std::path::Path, written: Result<(), ExportError>) {
        self.status = Some(match written {
            Ok(()) => {
                info!(path = %path.display(), "saved {}", what);
                StatusLine { kind: StatusKind::Info, text: format!("Saved {}", path.display()) }
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "could not save {}", what);
                StatusLine { kind: StatusKind::Error, text: format!("Could not save {}: {}", what, e) }
            }
        });
    }

    /// Picks up finished background work. Repaints keep coming while
    /// anything is still in flight.
    pub(super) fn poll_jobs(&mut self, ctx: &egui::Context) {
        if let Some(run) = &self.run {
            match run.receiver.try_recv() {
                Ok(outcomes) => {
                    self.results.append_run(outcomes);
                    self.run = None;
                }
                Err(TryRecvError::Empty) => ctx.request_repaint_after(POLL_INTERVAL),
                Err(TryRecvError::Disconnected) => {
                    warn!("conversion run ended without reporting");
                    self.run = None;
                }
            }
        }

        if let Some(build) = &self.archive {
            match build.receiver.try_recv() {
                Ok(archive) => {
                    self.archive = None;
                    self.save_archive(archive);
                }
                Err(TryRecvError::Empty) => ctx.request_repaint_after(POLL_INTERVAL),
                Err(TryRecvError::Disconnected) => {
                    warn!("archive build ended without reporting");
                    self.archive = None;
                }
            }
        }
    }

    fn save_archive(&mut self, archive: Result<Vec<u8>, ExportError>) {
        let name = self.config.archive_name.clone();
        let bytes = match archive {
            Ok(bytes) => bytes,
            Err(e) => {
                self.status = Some(StatusLine {
                    kind: StatusKind::Error,
                    text: format!("Could not build {}: {}", name, e),
                });
                return;
            }
        };

        if let Some(path) = rfd::FileDialog::new()
            .set_file_name(&name)
            .add_filter("ZIP archive", &["zip"])
            .save_file()
        {
            let written = std::fs::write(&path, bytes).map_err(Into::into);
            self.report_save(&name, &path, written);
        }
    }

    pub(super) fn handle_file_drop(&mut self, ctx: &egui::Context) {
        let (hovering, dropped) = ctx.input(|i| (!i.raw.hovered_files.is_empty(), i.raw.dropped_files.clone()));
        self.drag_hover = hovering;
        if !dropped.is_empty() {
            self.add_dropped(dropped);
        }
    }
}
