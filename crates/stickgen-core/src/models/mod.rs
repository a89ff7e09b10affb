//! Domain models shared across StickGen client components.

pub mod animation;
pub mod gallery;
pub mod session;
pub mod upload;

pub use animation::{Animation, PanelDetail};
pub use gallery::GalleryPage;
pub use session::Session;
pub use upload::{SelectedFile, UploadState};
