// ABOUTME: One Session per accepted connection; owns the socket, name, and liveness flag
// ABOUTME: Cheaply cloned (Arc) so the registry and the reader task can share a handle

use crate::connection::FrameWriter;
use crate::frame::{Frame, FrameError};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio::io::WriteHalf;
use tokio::net::TcpStream;
use tokio::sync::Mutex as AsyncMutex;

/// A placeholder name assigned at accept time, before `SET_NAME`. Per the
/// naming invariant, a registered name must never contain this substring,
/// which is what makes a session "anonymous" to the rest of the registry.
pub const TEMP_NAME_PREFIX: &str = "Temp_";

struct Inner {
    name: Mutex<String>,
    addr: SocketAddr,
    closed: AtomicBool,
    writer: AsyncMutex<FrameWriter<WriteHalf<TcpStream>>>,
}

/// Handle to one connected client.
///
/// `Session` is a cheap `Arc` clone: the accept loop keeps one, the
/// registry holds one once the client names itself, and any handler that
/// looks a peer up by name gets one back to send on. All share the same
/// underlying socket half and liveness state.
#[derive(Clone)]
pub struct Session {
    inner: Arc<Inner>,
}

impl Session {
    pub fn new(writer: FrameWriter<WriteHalf<TcpStream>>, addr: SocketAddr, temp_name: String) -> Session {
        Session {
            inner: Arc::new(Inner {
                name: Mutex::new(temp_name),
                addr,
                closed: AtomicBool::new(false),
                writer: AsyncMutex::new(writer),
            }),
        }
    }

    pub fn addr(&self) -> SocketAddr {
        self.inner.addr
    }

    pub fn name(&self) -> String {
        self.inner.name.lock().unwrap().clone()
    }

    /// Sets the registered name. Callers are responsible for holding the
    /// server's global lock and checking the naming invariants first; this
    /// only performs the transition itself (see invariant 4: at most once,
    /// `Temp_` placeholder to a real name, never again).
    pub fn set_name(&self, name: String) {
        *self.inner.name.lock().unwrap() = name;
    }

    pub fn is_placeholder_name(&self) -> bool {
        self.name().starts_with(TEMP_NAME_PREFIX)
    }

    pub fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::SeqCst)
    }

    /// Serializes one frame and writes it to this session's socket.
    /// Idempotent-safe on a closed session: the write will simply fail and
    /// the caller's disconnect cleanup will already be underway.
    pub async fn send(&self, frame_type: u8, payload: impl Into<bytes::Bytes>) -> Result<(), FrameError> {
        let frame = Frame::new(frame_type, payload)?;
        let mut writer = self.inner.writer.lock().await;
        writer.write_frame(&frame).await?;
        Ok(())
    }

    /// Marks the session closed. Idempotent; does not itself close the
    /// socket (dropping the last `Session`/`FrameReader` handles does
    /// that), it only flips the flag other code checks.
    pub fn close(&self) {
        self.inner.closed.store(true, Ordering::SeqCst);
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("name", &self.name())
            .field("addr", &self.addr())
            .field("closed", &self.is_closed())
            .finish()
    }
}
