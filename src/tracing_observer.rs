// ABOUTME: Default Observer that bridges the typed event stream to tracing
// ABOUTME: Logs each Event at a level matching its severity, nothing more

use crate::events::Event;
use crate::observable::Observer;
use tracing::{debug, error, info, warn};

/// Logs every emitted event via `tracing`, at a level matching its
/// severity. Exists to give operators log output out of the box without
/// forcing every consumer of the event stream to also care about logging;
/// any other observer (a metrics sink, a test harness) subscribes the same
/// way, alongside this one.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl Observer for TracingObserver {
    fn on_event(&self, event: &Event) {
        match event {
            Event::ServerStarted { bind_ip, port, network_ip } => {
                info!(bind_ip, port, network_ip, "server started");
            }
            Event::ServerStopped { network_ip, port } => {
                info!(network_ip, port, "server stopped");
            }
            Event::FatalError { error_msg } => {
                error!(error_msg, "fatal server error");
            }
            Event::ClientHandshakeStarted { addr, temp_name } => {
                debug!(%addr, temp_name, "client handshake started");
            }
            Event::ClientJoined { name, addr } => {
                info!(name, %addr, "client joined");
            }
            Event::ClientDisconnected { name, addr } => {
                info!(name, %addr, "client disconnected");
            }
            Event::ActiveConnectionsChanged { count } => {
                debug!(count, "active connection count changed");
            }
            Event::ChatEstablished { name_a, name_b } => {
                info!(name_a, name_b, "chat established");
            }
            Event::ChatEnded { who, with_whom } => {
                info!(who, with_whom, "chat ended");
            }
            Event::FileTransferRequested { sender, receiver, count } => {
                debug!(sender, receiver, count, "file transfer requested");
            }
            Event::FileTransferAccepted { receiver, sender } => {
                debug!(receiver, sender, "file transfer accepted");
            }
            Event::FileTransferDenied { receiver, sender } => {
                debug!(receiver, sender, "file transfer denied");
            }
            Event::FileTransferRouted { sender, receiver } => {
                debug!(sender, receiver, "file transfer routed");
            }
            Event::FileTransferCompleted { receiver, sender } => {
                info!(receiver, sender, "file transfer completed");
            }
            Event::BufferError { session_name, error_msg } => {
                warn!(session_name, error_msg, "buffer processing error");
            }
            Event::ClientError { session_name, error_msg } => {
                warn!(session_name, error_msg, "client connection error");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logs_without_panicking_for_every_variant() {
        let observer = TracingObserver;
        observer.on_event(&Event::ServerStarted {
            bind_ip: "0.0.0.0".into(),
            port: 1234,
            network_ip: "192.168.1.1".into(),
        });
        observer.on_event(&Event::FatalError { error_msg: "boom".into() });
    }
}
