pub mod controller;
pub mod router;
pub mod service;

pub use router::init_page_blocks_router;
pub use service::PageBlockService;
