// ABOUTME: CLI entry point that parses flags, wires up logging, and runs the server
// ABOUTME: The only part of the crate allowed to depend on argh or a tracing subscriber

use argh::FromArgs;
use chatd::{ChatServer, ServerConfig, TracingObserver};
use std::net::IpAddr;
use std::sync::Arc;
use tracing_subscriber::FmtSubscriber;

/// Multi-user chat relay server.
#[derive(FromArgs)]
struct Args {
    /// interface to bind to
    #[argh(option, default = "std::net::Ipv4Addr::UNSPECIFIED.into()")]
    bind_addr: IpAddr,

    /// port to listen on; 0 picks an ephemeral port
    #[argh(option, default = "0")]
    port: u16,

    /// maximum size, in bytes, of a single file-transfer frame
    #[argh(option, default = "16 * 1024 * 1024")]
    max_file_frame_bytes: u32,

    /// capacity of the internal request queue
    #[argh(option, default = "1024")]
    request_buffer_capacity: usize,

    /// log level: trace, debug, info, warn, error
    #[argh(option, default = "String::from(\"info\")")]
    log_level: String,
}

#[tokio::main]
async fn main() -> chatd::Result<()> {
    let args: Args = argh::from_env();

    let level: tracing::Level = args.log_level.parse().unwrap_or(tracing::Level::INFO);
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = ServerConfig::default()
        .with_bind_addr(args.bind_addr)
        .with_port(args.port)
        .with_max_file_frame_bytes(args.max_file_frame_bytes)
        .with_request_buffer_capacity(args.request_buffer_capacity);

    let server = ChatServer::bind(config).await?;
    server.observable().subscribe(Arc::new(TracingObserver));
    server
        .run(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;

    Ok(())
}
