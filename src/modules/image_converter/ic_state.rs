use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::ic_errors::{ConvertError, ExportError, IntakeError};
use super::ic_helpers::{decode_data_url, derived_file_name, guess_mime};
use crate::modules::image_export::TargetFormat;

#[derive(Debug, Clone)]
pub(super) enum FileSource {
    Path(PathBuf),
    Bytes(Arc<[u8]>),
}

#[derive(Debug, Clone)]
pub(super) struct SelectedFile {
    pub name: String,
    pub byte_size: u64,
    pub mime_type: String,
    pub source: FileSource,
}

impl SelectedFile {
    pub(super) fn from_path(path: PathBuf) -> std::io::Result<Self> {
        let byte_size = std::fs::metadata(&path)?.len();
        let name = file_name_of(&path);
        let mime_type = guess_mime(&name);

        Ok(Self {
            name,
            byte_size,
            mime_type,
            source: FileSource::Path(path),
        })
    }

    /// `mime_type` comes from the drop itself when the platform reports one.
    pub(super) fn from_bytes(name: String, bytes: Arc<[u8]>, mime_type: Option<String>) -> Self {
        let mime_type = mime_type
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| guess_mime(&name));

        Self {
            byte_size: bytes.len() as u64,
            name,
            mime_type,
            source: FileSource::Bytes(bytes),
        }
    }

    pub(super) fn is_image(&self) -> bool {
        self.mime_type.starts_with("image/")
    }

    pub(super) fn read_bytes(&self) -> std::io::Result<Vec<u8>> {
        match &self.source {
            FileSource::Path(path) => std::fs::read(path),
            FileSource::Bytes(bytes) => Ok(bytes.to_vec()),
        }
    }
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("Unknown")
        .to_string()
}

/// Files picked for conversion plus the indices currently checked.
#[derive(Debug)]
pub(super) struct SelectionState {
    files: Vec<SelectedFile>,
    checked: BTreeSet<usize>,
    max_files: usize,
}

impl SelectionState {
    pub(super) fn new(max_files: usize) -> Self {
        Self {
            files: Vec::new(),
            checked: BTreeSet::new(),
            max_files,
        }
    }

    pub(super) fn files(&self) -> &[SelectedFile] {
        &self.files
    }

    pub(super) fn len(&self) -> usize {
        self.files.len()
    }

    pub(super) fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub(super) fn max_files(&self) -> usize {
        self.max_files
    }

    pub(super) fn is_checked(&self, index: usize) -> bool {
        self.checked.contains(&index)
    }

    pub(super) fn checked_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.checked.iter().copied()
    }

    pub(super) fn checked_count(&self) -> usize {
        self.checked.len()
    }

    pub(super) fn all_checked(&self) -> bool {
        !self.files.is_empty() && self.checked.len() == self.files.len()
    }

    pub(super) fn can_convert(&self) -> bool {
        !self.checked.is_empty()
    }

    pub(super) fn can_clear(&self) -> bool {
        !self.files.is_empty()
    }

    /// Checked files in selection order.
    pub(super) fn checked_files(&self) -> Vec<SelectedFile> {
        self.checked_indices()
            .filter_map(|idx| self.files.get(idx).cloned())
            .collect()
    }

    /// Appends the image files of `batch` and checks them.
    ///
    /// The whole batch is refused when it would push the selection past
    /// `max_files`; nothing is added in that case.
    pub(super) fn intake(&mut self, batch: Vec<SelectedFile>) -> Result<usize, IntakeError> {
        let accepted: Vec<SelectedFile> = batch.into_iter().filter(SelectedFile::is_image).collect();

        if self.files.len() + accepted.len() > self.max_files {
            return Err(IntakeError::CapacityExceeded {
                selected: self.files.len(),
                incoming: accepted.len(),
                max: self.max_files,
            });
        }

        let start = self.files.len();
        let added = accepted.len();
        self.files.extend(accepted);
        self.checked.extend(start..start + added);
        Ok(added)
    }

    pub(super) fn toggle_one(&mut self, index: usize) {
        if index >= self.files.len() {
            return;
        }
        if !self.checked.remove(&index) {
            self.checked.insert(index);
        }
    }

    pub(super) fn toggle_all(&mut self, checked: bool) {
        self.checked = if checked {
            (0..self.files.len()).collect()
        } else {
            BTreeSet::new()
        };
    }

    /// Removes one file and shifts every checked index above it down by one.
    pub(super) fn delete_one(&mut self, index: usize) -> Option<SelectedFile> {
        if index >= self.files.len() {
            return None;
        }
        let removed = self.files.remove(index);

        self.checked = self
            .checked
            .iter()
            .filter_map(|&i| match i.cmp(&index) {
                std::cmp::Ordering::Less => Some(i),
                std::cmp::Ordering::Equal => None,
                std::cmp::Ordering::Greater => Some(i - 1),
            })
            .collect();

        Some(removed)
    }

    pub(super) fn clear_all(&mut self) {
        self.files.clear();
        self.checked.clear();
    }
}

#[derive(Debug, Clone)]
pub(super) struct ConversionResult {
    pub original_name: String,
    pub original_size: u64,
    pub data_url: String,
    pub encoded_size_estimate: u64,
    pub format: TargetFormat,
    pub dimensions: (u32, u32),
}

impl ConversionResult {
    pub(super) fn derived_file_name(&self) -> String {
        derived_file_name(&self.original_name, self.format)
    }

    pub(super) fn decoded_bytes(&self) -> Result<Vec<u8>, ExportError> {
        decode_data_url(&self.data_url)
    }
}

/// Every result produced this session, oldest first, plus the failures of
/// the most recent run.
#[derive(Debug, Default)]
pub(super) struct ResultLog {
    results: Vec<ConversionResult>,
    last_failures: Vec<String>,
}

impl ResultLog {
    pub(super) fn results(&self) -> &[ConversionResult] {
        &self.results
    }

    pub(super) fn last_failures(&self) -> &[String] {
        &self.last_failures
    }

    pub(super) fn len(&self) -> usize {
        self.results.len()
    }

    pub(super) fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub(super) fn can_export_archive(&self) -> bool {
        self.results.len() >= 2
    }

    /// Appends one finished run. Earlier results are never touched.
    pub(super) fn append_run(&mut self, outcomes: Vec<Result<ConversionResult, ConvertError>>) -> usize {
        self.last_failures.clear();
        let mut appended = 0;

        for outcome in outcomes {
            match outcome {
                Ok(result) => {
                    self.results.push(result);
                    appended += 1;
                }
                Err(e) => self.last_failures.push(e.to_string()),
            }
        }

        appended
    }
}
