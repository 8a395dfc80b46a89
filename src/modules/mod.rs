pub mod audit_logs;
pub mod auth;
pub mod media;
pub mod page_blocks;
pub mod pages;
pub mod settings;
pub mod users;
