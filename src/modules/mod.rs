pub mod image_converter;
pub mod image_export;
