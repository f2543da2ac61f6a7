use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use std::collections::HashSet;
use std::path::Path;

use super::ic_errors::ExportError;
use crate::modules::image_export::TargetFormat;

/// Replaces the last extension of `name` with the target extension.
/// Names without one get the extension appended.
pub(super) fn derived_file_name(name: &str, format: TargetFormat) -> String {
    let stem = match name.rfind('.') {
        Some(idx) if idx + 1 < name.len() => &name[..idx],
        _ => name.trim_end_matches('.'),
    };
    format!("{}.{}", stem, format.extension())
}

pub(super) fn format_kb(bytes: u64) -> String {
    format!("{:.1} KB", bytes as f64 / 1024.0)
}

/// Size of the payload once the base64 expansion is taken back out.
pub(super) fn estimate_encoded_size(payload_len: usize) -> u64 {
    (payload_len as u64 * 3) / 4
}

pub(super) fn to_data_url(bytes: &[u8], format: TargetFormat) -> String {
    format!("data:{};base64,{}", format.mime_type(), STANDARD.encode(bytes))
}

pub(super) fn decode_data_url(data_url: &str) -> Result<Vec<u8>, ExportError> {
    let (header, body) = data_url
        .split_once(',')
        .ok_or(ExportError::MalformedPayload)?;
    if !header.starts_with("data:") || !header.ends_with(";base64") {
        return Err(ExportError::MalformedPayload);
    }
    Ok(STANDARD.decode(body)?)
}

pub(super) fn guess_mime(name: &str) -> String {
    mime_guess::from_path(Path::new(name))
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}

/// Returns `name`, or `stem (n).ext` if `name` is already taken.
pub(super) fn unique_entry_name(name: &str, taken: &mut HashSet<String>) -> String {
    if taken.insert(name.to_string()) {
        return name.to_string();
    }

    let (stem, ext) = match name.rfind('.') {
        Some(idx) => (&name[..idx], &name[idx..]),
        None => (name, ""),
    };
    let mut n = 2;
    loop {
        let candidate = format!("{} ({}){}", stem, n, ext);
        if taken.insert(candidate.clone()) {
            return candidate;
        }
        n += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derived_name_replaces_last_extension() {
        assert_eq!(derived_file_name("photo.jpg", TargetFormat::Png), "photo.png");
        assert_eq!(derived_file_name("archive.tar.gif", TargetFormat::Webp), "archive.tar.webp");
        assert_eq!(derived_file_name("scan", TargetFormat::Webp), "scan.webp");
        assert_eq!(derived_file_name("odd.", TargetFormat::Png), "odd.png");
    }

    #[test]
    fn kb_formatting_uses_one_decimal() {
        assert_eq!(format_kb(0), "0.0 KB");
        assert_eq!(format_kb(1536), "1.5 KB");
        assert_eq!(format_kb(10 * 1024), "10.0 KB");
    }

    #[test]
    fn size_estimate_floors() {
        assert_eq!(estimate_encoded_size(0), 0);
        assert_eq!(estimate_encoded_size(4), 3);
        assert_eq!(estimate_encoded_size(7), 5);
    }

    #[test]
    fn data_url_round_trip() {
        let bytes = [0u8, 1, 2, 250, 251, 255];
        let url = to_data_url(&bytes, TargetFormat::Webp);

        assert!(url.starts_with("data:image/webp;base64,"));
        assert_eq!(decode_data_url(&url).unwrap(), bytes);
    }

    #[test]
    fn data_url_rejects_plain_text() {
        assert!(matches!(decode_data_url("not a url"), Err(ExportError::MalformedPayload)));
        assert!(matches!(decode_data_url("data:image/png,abc"), Err(ExportError::MalformedPayload)));
        assert!(matches!(decode_data_url("data:image/png;base64,@@@"), Err(ExportError::Base64(_))));
    }

    #[test]
    fn mime_guess_from_name() {
        assert_eq!(guess_mime("a.PNG"), "image/png");
        assert_eq!(guess_mime("b.jpeg"), "image/jpeg");
        assert!(!guess_mime("notes.txt").starts_with("image/"));
        assert_eq!(guess_mime("no_extension"), "application/octet-stream");
    }

    #[test]
    fn duplicate_entry_names_get_suffix() {
        let mut taken = HashSet::new();
        assert_eq!(unique_entry_name("a.png", &mut taken), "a.png");
        assert_eq!(unique_entry_name("a.png", &mut taken), "a (2).png");
        assert_eq!(unique_entry_name("a.png", &mut taken), "a (3).png");
        assert_eq!(unique_entry_name("b", &mut taken), "b");
        assert_eq!(unique_entry_name("b", &mut taken), "b (2)");
    }
}
