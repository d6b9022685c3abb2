pub mod config;
pub mod connection;
pub mod events;
pub mod frame;
pub mod observable;
pub mod protocol;
pub mod registry;
pub mod request_buffer;
pub mod server;
pub mod session;
pub mod testclient;
pub mod tracing_observer;

pub use config::ServerConfig;
pub use connection::Connection;
pub use events::Event;
pub use frame::{Frame, FrameError};
pub use observable::Observable;
pub use server::{ChatServer, ServerError};
pub use session::Session;
pub use tracing_observer::TracingObserver;

/// Error returned by most functions.
///
/// When writing a real application, one might want to consider a specialized
/// error handling crate or defining an error type as an `enum` of causes.
/// However, for our purposes here, using a boxed `std::error::Error` is
/// sufficient.
///
/// For performance reasons, boxing is avoided in any hot path. For example,
/// in `frame::parse`, a custom error `enum` is defined. This is because the
/// error is hit and handled during normal execution when a partial frame is
/// received on a socket. `std::error::Error` is implemented for
/// `frame::FrameError`, which allows it to be converted to
/// `Box<dyn std::error::Error>`.
pub type Error = Box<dyn std::error::Error + Send + Sync>;

/// A specialized `Result` type for chat server operations.
///
/// This is defined as a convenience.
///
/// # Examples
///
/// ```rust,no_run
/// use chatd::{ChatServer, ServerConfig};
///
/// #[tokio::main]
/// async fn main() -> chatd::Result<()> {
///     let config = ServerConfig::default();
///     let server = ChatServer::bind(config).await?;
///     server.run(async {
///         let _ = tokio::signal::ctrl_c().await;
///     }).await?;
///     Ok(())
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;
