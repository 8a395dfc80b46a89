//! Uploaded files. Bytes live in [`pagecraft_core::file_storage`], metadata
//! in the `media` table.

pub mod controller;
pub mod router;
pub mod service;

pub use router::init_media_router;
pub use service::MediaService;
