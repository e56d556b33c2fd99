pub mod format;

pub use format::{fields_document, PageMetadata};
