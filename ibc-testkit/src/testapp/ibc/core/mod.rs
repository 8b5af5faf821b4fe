pub mod context;
pub mod error;
pub mod handler;
pub mod msgs;
pub mod router;
pub mod types;
