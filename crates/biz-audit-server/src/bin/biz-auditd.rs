use std::io;

use biz_audit_server::{AuditServer, ServerConfig, Transport};
use tracing_subscriber::EnvFilter;

fn main() -> io::Result<()> {
    // Stdout carries protocol frames, so logs go to stderr.
    let filter = EnvFilter::try_from_env("BIZ_AUDIT_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    let config =
        ServerConfig::from_env().map_err(|msg| io::Error::new(io::ErrorKind::InvalidInput, msg))?;
    let transport = config.transport;
    let addr = config.http_addr.clone();
    let server = AuditServer::new(config);
    match transport {
        Transport::Stdio => server.serve_stdio(),
        Transport::Http => server.serve_http(&addr),
    }
}
