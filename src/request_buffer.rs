// ABOUTME: A bounded FIFO that serializes inbound work across all sessions onto one worker
// ABOUTME: Isolates handler errors as BufferError events instead of killing the worker

use crate::events::Event;
use crate::observable::Observable;
use crate::session::Session;
use bytes::Bytes;
use std::future::Future;
use tokio::sync::mpsc;

/// Implemented by whatever turns a `(session, type, payload)` triple into
/// server-side effects. The request buffer's worker calls this once per
/// item, strictly in arrival order across every connected session.
pub trait Dispatcher: Send + Sync + 'static {
    fn dispatch(
        &self,
        session: Session,
        msg_type: u8,
        payload: Bytes,
    ) -> impl Future<Output = Result<(), String>> + Send;
}

struct Request {
    session: Session,
    msg_type: u8,
    payload: Bytes,
}

/// Handle to the single-consumer request queue. Cloning shares the same
/// underlying channel; the worker stops when every clone (and the
/// original) has been dropped, which is the "sentinel drains and joins
/// the worker" shutdown the design calls for — closing the channel is the
/// sentinel.
#[derive(Clone)]
pub struct RequestBuffer {
    sender: mpsc::Sender<Request>,
}

impl RequestBuffer {
    /// Spawns the worker task and returns a handle to feed it.
    pub fn spawn<D: Dispatcher>(capacity: usize, observable: Observable, dispatcher: D) -> RequestBuffer {
        let (sender, mut receiver) = mpsc::channel(capacity);

        tokio::spawn(async move {
            while let Some(Request {
                session,
                msg_type,
                payload,
            }) = receiver.recv().await
            {
                let session_name = session.name();
                if let Err(error_msg) = dispatcher.dispatch(session, msg_type, payload).await {
                    observable.emit(Event::BufferError {
                        session_name,
                        error_msg,
                    });
                }
            }
            tracing::debug!("request buffer worker exiting: channel closed");
        });

        RequestBuffer { sender }
    }

    /// Enqueues one request. Waits if the buffer is at capacity, applying
    /// backpressure to the reader task that's submitting it rather than
    /// growing without bound.
    pub async fn add_request(&self, session: Session, msg_type: u8, payload: Bytes) {
        // The worker only ever exits when every sender (including this
        // one) has been dropped, so a send error here would mean the
        // buffer is already shutting down; there is nothing useful left
        // to do with the request.
        let _ = self.sender.send(Request {
            session,
            msg_type,
            payload,
        }).await;
    }
}
