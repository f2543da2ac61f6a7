use std::collections::HashSet;
use std::io::{Cursor, Write};
use std::sync::mpsc::{self, Receiver};
use std::sync::{Arc, Mutex};
use std::thread;

use tracing::{debug, info, warn};
use zip::write::SimpleFileOptions;

use super::ic_errors::{ConvertError, ExportError};
use super::ic_helpers::{estimate_encoded_size, to_data_url, unique_entry_name};
use super::ic_state::{ConversionResult, SelectedFile};
use crate::modules::image_export::{TargetFormat, encode_surface};

pub(super) type RunOutcome = Vec<Result<ConversionResult, ConvertError>>;

#[derive(Debug, Clone, Default)]
pub(super) struct RunProgress {
    pub completed: usize,
    pub total: usize,
}

pub(super) struct ConversionRun {
    pub format: TargetFormat,
    pub progress: Arc<Mutex<RunProgress>>,
    pub receiver: Receiver<RunOutcome>,
}

pub(super) struct ArchiveBuild {
    pub receiver: Receiver<Result<Vec<u8>, ExportError>>,
}

/// read -> decode -> draw -> encode -> wrap, for a single file.
pub(super) fn convert_file(
    file: &SelectedFile,
    format: TargetFormat,
    webp_quality: f32,
) -> Result<ConversionResult, ConvertError> {
    let bytes = file.read_bytes().map_err(|source| ConvertError::Read {
        name: file.name.clone(),
        source,
    })?;

    let decoded = image::load_from_memory(&bytes).map_err(|source| ConvertError::Decode {
        name: file.name.clone(),
        source,
    })?;

    // Same size as the source, no scaling.
    let surface = decoded.to_rgba8();
    let dimensions = surface.dimensions();

    let encoded = encode_surface(&surface, format, webp_quality).map_err(|reason| ConvertError::Encode {
        name: file.name.clone(),
        format,
        reason,
    })?;

    let data_url = to_data_url(&encoded, format);
    debug!(file = %file.name, ?dimensions, encoded_bytes = encoded.len(), "converted");

    Ok(ConversionResult {
        original_name: file.name.clone(),
        original_size: file.byte_size,
        encoded_size_estimate: estimate_encoded_size(data_url.len()),
        data_url,
        format,
        dimensions,
    })
}

/// Converts every file concurrently and returns once all of them are done,
/// in input order.
pub(super) fn convert_all(
    files: &[SelectedFile],
    format: TargetFormat,
    webp_quality: f32,
    progress: &Mutex<RunProgress>,
) -> RunOutcome {
    thread::scope(|scope| {
        let workers: Vec<_> = files
            .iter()
            .map(|file| {
                scope.spawn(move || {
                    let outcome = convert_file(file, format, webp_quality);
                    if let Ok(mut p) = progress.lock() {
                        p.completed += 1;
                    }
                    outcome
                })
            })
            .collect();

        workers
            .into_iter()
            .zip(files)
            .map(|(worker, file)| {
                worker.join().unwrap_or_else(|_| {
                    Err(ConvertError::WorkerPanicked { name: file.name.clone() })
                })
            })
            .collect()
    })
}

pub(super) fn spawn_conversion_run(
    files: Vec<SelectedFile>,
    format: TargetFormat,
    webp_quality: f32,
) -> ConversionRun {
    let (tx, rx) = mpsc::channel();
    let progress = Arc::new(Mutex::new(RunProgress {
        completed: 0,
        total: files.len(),
    }));
    let worker_progress = Arc::clone(&progress);

    info!(count = files.len(), %format, "starting conversion run");

    thread::spawn(move || {
        let outcomes = convert_all(&files, format, webp_quality, &worker_progress);

        let failed = outcomes.iter().filter(|o| o.is_err()).count();
        for err in outcomes.iter().filter_map(|o| o.as_ref().err()) {
            warn!(file = err.file_name(), error = %err, "conversion failed");
        }
        info!(succeeded = outcomes.len() - failed, failed, "conversion run finished");

        let _ = tx.send(outcomes);
    });

    ConversionRun {
        format,
        progress,
        receiver: rx,
    }
}

/// Packs every result into a zip held in memory, one entry per result.
pub(super) fn build_archive(results: &[ConversionResult]) -> Result<Vec<u8>, ExportError> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);
    let mut taken = HashSet::new();

    for result in results {
        let entry = unique_entry_name(&result.derived_file_name(), &mut taken);
        let bytes = result.decoded_bytes()?;
        writer.start_file(entry, options)?;
        writer.write_all(&bytes)?;
    }

    Ok(writer.finish()?.into_inner())
}

pub(super) fn spawn_archive_build(results: Vec<ConversionResult>) -> ArchiveBuild {
    let (tx, rx) = mpsc::channel();
    info!(entries = results.len(), "building archive");

    thread::spawn(move || {
        let archive = build_archive(&results);
        match &archive {
            Ok(bytes) => info!(bytes = bytes.len(), "archive ready"),
            Err(e) => warn!(error = %e, "archive build failed"),
        }
        let _ = tx.send(archive);
    });

    ArchiveBuild { receiver: rx }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, Rgba, RgbaImage};
    use std::io::Read;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = RgbaImage::from_pixel(width, height, Rgba([200, 30, 60, 255]));
        let mut bytes = Vec::new();
        DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        bytes
    }

    fn image_file(name: &str, width: u32, height: u32) -> SelectedFile {
        SelectedFile::from_bytes(name.to_string(), Arc::from(png_bytes(width, height)), Some("image/png".into()))
    }

    fn broken_file(name: &str) -> SelectedFile {
        SelectedFile::from_bytes(name.to_string(), Arc::from(b"definitely not pixels".to_vec()), Some("image/jpeg".into()))
    }

    fn run(files: &[SelectedFile], format: TargetFormat) -> RunOutcome {
        let progress = Mutex::new(RunProgress { completed: 0, total: files.len() });
        let outcomes = convert_all(files, format, 85.0, &progress);
        assert_eq!(progress.lock().unwrap().completed, files.len());
        outcomes
    }

    #[test]
    fn converts_to_png_at_native_size() {
        let file = image_file("holiday.jpg", 7, 5);
        let result = convert_file(&file, TargetFormat::Png, 85.0).unwrap();

        assert_eq!(result.original_name, "holiday.jpg");
        assert_eq!(result.original_size, file.byte_size);
        assert_eq!(result.dimensions, (7, 5));
        assert_eq!(result.format, TargetFormat::Png);
        assert_eq!(result.derived_file_name(), "holiday.png");
        assert!(result.data_url.starts_with("data:image/png;base64,"));
        assert_eq!(result.encoded_size_estimate, (result.data_url.len() as u64 * 3) / 4);

        let decoded = image::load_from_memory(&result.decoded_bytes().unwrap()).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (7, 5));
    }

    #[test]
    fn converts_to_webp() {
        let result = convert_file(&image_file("logo.png", 12, 8), TargetFormat::Webp, 85.0).unwrap();

        assert_eq!(result.derived_file_name(), "logo.webp");
        let bytes = result.decoded_bytes().unwrap();
        assert_eq!(image::guess_format(&bytes).unwrap(), image::ImageFormat::WebP);
    }

    #[test]
    fn converts_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("disk.png");
        std::fs::write(&path, png_bytes(3, 3)).unwrap();

        let file = SelectedFile::from_path(path).unwrap();
        let result = convert_file(&file, TargetFormat::Webp, 85.0).unwrap();

        assert_eq!(result.dimensions, (3, 3));
        assert_eq!(result.original_size, file.byte_size);
    }

    #[test]
    fn unreadable_and_undecodable_files_report_errors() {
        let err = convert_file(&broken_file("bad.jpg"), TargetFormat::Png, 85.0).unwrap_err();
        assert!(matches!(err, ConvertError::Decode { ref name, .. } if name == "bad.jpg"));

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gone.png");
        std::fs::write(&path, png_bytes(1, 1)).unwrap();
        let file = SelectedFile::from_path(path.clone()).unwrap();
        std::fs::remove_file(&path).unwrap();

        let err = convert_file(&file, TargetFormat::Png, 85.0).unwrap_err();
        assert!(matches!(err, ConvertError::Read { .. }));
        assert_eq!(err.file_name(), "gone.png");
    }

    #[test]
    fn batch_keeps_input_order_and_format() {
        let files: Vec<SelectedFile> = (0..6)
            .map(|i| image_file(&format!("frame{}.gif", i), 2 + i, 2))
            .collect();

        let outcomes = run(&files, TargetFormat::Webp);

        assert_eq!(outcomes.len(), 6);
        for (i, outcome) in outcomes.iter().enumerate() {
            let result = outcome.as_ref().unwrap();
            assert_eq!(result.format, TargetFormat::Webp);
            assert_eq!(result.derived_file_name(), format!("frame{}.webp", i));
            assert_eq!(result.dimensions, (2 + i as u32, 2));
        }
    }

    #[test]
    fn one_bad_file_does_not_sink_the_batch() {
        let files = vec![image_file("a.png", 2, 2), broken_file("b.jpg"), image_file("c.png", 2, 2)];

        let outcomes = run(&files, TargetFormat::Png);

        assert!(outcomes[0].is_ok());
        assert!(outcomes[1].is_err());
        assert!(outcomes[2].is_ok());
    }

    #[test]
    fn background_run_delivers_all_results_at_once() {
        let files = vec![image_file("a.png", 2, 2), image_file("b.png", 3, 3)];
        let run = spawn_conversion_run(files, TargetFormat::Png, 85.0);

        let outcomes = run.receiver.recv().unwrap();

        assert_eq!(outcomes.len(), 2);
        assert_eq!(run.format, TargetFormat::Png);
        let progress = run.progress.lock().unwrap();
        assert_eq!((progress.completed, progress.total), (2, 2));
    }

    #[test]
    fn archive_holds_one_entry_per_result() {
        let png = run(&[image_file("a.jpg", 2, 2), image_file("b.jpg", 4, 4)], TargetFormat::Png);
        let webp = run(&[image_file("c.bmp", 3, 3)], TargetFormat::Webp);
        let results: Vec<ConversionResult> = png.into_iter().chain(webp).map(Result::unwrap).collect();

        let bytes = build_archive(&results).unwrap();
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();

        assert_eq!(archive.len(), 3);
        for (i, result) in results.iter().enumerate() {
            let mut entry = archive.by_index(i).unwrap();
            assert_eq!(entry.name(), result.derived_file_name());
            let mut contents = Vec::new();
            entry.read_to_end(&mut contents).unwrap();
            assert_eq!(contents, result.decoded_bytes().unwrap());
        }
    }

    #[test]
    fn archive_keeps_duplicate_names_apart() {
        let first = convert_file(&image_file("same.jpg", 2, 2), TargetFormat::Png, 85.0).unwrap();
        let second = convert_file(&image_file("same.jpg", 2, 2), TargetFormat::Png, 85.0).unwrap();

        let bytes = build_archive(&[first, second]).unwrap();
        let archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();

        let mut names: Vec<&str> = archive.file_names().collect();
        names.sort();
        assert_eq!(names, ["same (2).png", "same.png"]);
    }

    #[test]
    fn archive_rejects_corrupt_payload() {
        let mut result = convert_file(&image_file("x.png", 1, 1), TargetFormat::Png, 85.0).unwrap();
        result.data_url = "garbage".into();

        assert!(matches!(build_archive(&[result]), Err(ExportError::MalformedPayload)));
    }

    #[test]
    fn background_archive_build_reports_back() {
        let result = convert_file(&image_file("x.png", 1, 1), TargetFormat::Png, 85.0).unwrap();
        let build = spawn_archive_build(vec![result.clone(), result]);

        let bytes = build.receiver.recv().unwrap().unwrap();
        assert_eq!(zip::ZipArchive::new(Cursor::new(bytes)).unwrap().len(), 2);
    }
}
