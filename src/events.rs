// ABOUTME: Typed value set the server emits to its subscribed observers
// ABOUTME: Pure data, no dependency on presentation or log formatting

use std::net::SocketAddr;

/// One semantic occurrence the server can emit. Observers receive a clone
/// of the event synchronously, in the thread/task that triggered it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// The server has started and is listening.
    ServerStarted {
        bind_ip: String,
        port: u16,
        network_ip: String,
    },
    /// The server has stopped in a controlled way.
    ServerStopped { network_ip: String, port: u16 },
    /// An unrecoverable error in the server.
    FatalError { error_msg: String },

    /// A new client connected and is identifying itself.
    ClientHandshakeStarted {
        addr: SocketAddr,
        temp_name: String,
    },
    /// A client completed the handshake and is registered under a name.
    ClientJoined { name: String, addr: SocketAddr },
    /// A client has disconnected, normally or due to an error.
    ClientDisconnected { name: String, addr: SocketAddr },
    /// The number of active connections has changed.
    ActiveConnectionsChanged { count: usize },

    /// A chat session was accepted between two users.
    ChatEstablished { name_a: String, name_b: String },
    /// A user ended an active chat session.
    ChatEnded { who: String, with_whom: String },

    /// A user requested to send files to another.
    FileTransferRequested {
        sender: String,
        receiver: String,
        count: String,
    },
    /// The receiver accepted a file transfer.
    FileTransferAccepted { receiver: String, sender: String },
    /// The receiver denied a file transfer.
    FileTransferDenied { receiver: String, sender: String },
    /// A file packet was routed to the receiver.
    FileTransferRouted { sender: String, receiver: String },
    /// The receiver confirmed having received a lot of files.
    FileTransferCompleted { receiver: String, sender: String },

    /// Error while processing a request off the internal buffer.
    BufferError {
        session_name: String,
        error_msg: String,
    },
    /// Error in a connected client's session.
    ClientError {
        session_name: String,
        error_msg: String,
    },
}
