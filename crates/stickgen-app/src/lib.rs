//! StickGen client application logic.
//!
//! Everything between the HTTP client and a front end: session gating over
//! the external auth collaborator, the paginated gallery data source, the
//! base64 media codec with revocable download handles, share-link
//! construction, the upload state machine, and the detail-view controller.

pub mod codec;
pub mod detail;
pub mod gallery;
pub mod session;
pub mod share;
pub mod upload;

pub use codec::{MediaCodec, MediaHandle};
pub use detail::DetailViewController;
pub use gallery::{GalleryBrowser, GalleryDataSource};
pub use session::{
    EnvSessionProvider, SessionGate, SessionProvider, SessionStore, StaticSessionProvider,
};
pub use share::{build_share_url, Clipboard, MemoryClipboard};
#[cfg(feature = "system-clipboard")]
pub use share::SystemClipboard;
pub use upload::UploadPipeline;
