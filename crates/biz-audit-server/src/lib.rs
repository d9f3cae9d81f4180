pub mod config;
pub mod protocol;
mod server;

pub use config::{ServerConfig, Transport};
pub use server::{AuditServer, MAX_FRAME_BYTES};
