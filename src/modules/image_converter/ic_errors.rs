use crate::modules::image_export::TargetFormat;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum IntakeError {
    #[error("You can select at most {max} files ({selected} already selected, {incoming} more requested).")]
    CapacityExceeded {
        selected: usize,
        incoming: usize,
        max: usize,
    },
}

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("failed to read {name}: {source}")]
    Read {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode {name}: {source}")]
    Decode {
        name: String,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to encode {name} as {format}: {reason}")]
    Encode {
        name: String,
        format: TargetFormat,
        reason: String,
    },

    #[error("conversion worker for {name} panicked")]
    WorkerPanicked { name: String },
}

impl ConvertError {
    pub fn file_name(&self) -> &str {
        match self {
            ConvertError::Read { name, .. }
            | ConvertError::Decode { name, .. }
            | ConvertError::Encode { name, .. }
            | ConvertError::WorkerPanicked { name } => name,
        }
    }
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("payload is not a base64 data URL")]
    MalformedPayload,

    #[error("payload could not be decoded: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("archive could not be written: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
