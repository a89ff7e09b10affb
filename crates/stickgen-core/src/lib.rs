//! StickGen Core Library
//!
//! This crate provides the domain models, error types, configuration, and
//! validation shared across all StickGen client components.

pub mod config;
pub mod error;
pub mod models;
pub mod validation;

// Re-export commonly used types
pub use config::{ClientConfig, DEFAULT_PAGE_SIZE};
pub use error::{ClientError, ErrorMetadata, LogLevel};
pub use models::{
    Animation, GalleryPage, PanelDetail, SelectedFile, Session, UploadState,
};
