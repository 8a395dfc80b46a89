//! Read access to the audit trail, and the recorder every other module
//! writes through.

pub mod controller;
pub mod router;
pub mod service;

pub use router::init_audit_logs_router;
pub use service::{AuditService, action, resource};
