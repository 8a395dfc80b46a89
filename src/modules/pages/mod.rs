//! Pages and their revision history.

pub mod controller;
pub mod router;
pub mod service;

pub use router::init_pages_router;
pub use service::PageService;
