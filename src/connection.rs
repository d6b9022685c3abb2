// ABOUTME: Provides TCP connection management for the chat wire protocol
// ABOUTME: Implements frame-based I/O with buffering for efficient network use

use crate::frame::{Frame, FrameError};
use bytes::{Buf, BytesMut};
use std::io::Cursor;
use tokio::io::{self, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufWriter, ReadHalf, WriteHalf};
use tokio::net::TcpStream;

/// The read half of a framed connection. Generic so a socket can be split
/// and its halves handed to independent tasks (one reader task, one writer
/// shared behind a lock) without either side blocking the other.
#[derive(Debug)]
pub struct FrameReader<R> {
    reader: R,
    buffer: BytesMut,
    max_payload_bytes: u32,
}

impl<R: AsyncRead + Unpin> FrameReader<R> {
    pub fn new(reader: R) -> Self {
        FrameReader::with_max_payload(reader, u32::MAX)
    }

    pub fn with_max_payload(reader: R, max_payload_bytes: u32) -> Self {
        FrameReader {
            reader,
            // Default to a 4KB read buffer; large file bodies grow this as
            // data arrives.
            buffer: BytesMut::with_capacity(4 * 1024),
            max_payload_bytes,
        }
    }

    /// Read a single `Frame` value from the underlying stream.
    ///
    /// Waits until enough data has been retrieved to parse a frame. Data
    /// remaining in the buffer after a frame has been parsed is kept for
    /// the next call.
    ///
    /// Returns `Ok(None)` on a clean end-of-stream, `Err` if the peer
    /// closed mid-frame or a transport/framing error occurred.
    pub async fn read_frame(&mut self) -> Result<Option<Frame>, FrameError> {
        loop {
            if let Some(frame) = self.parse_frame()? {
                return Ok(Some(frame));
            }

            if 0 == self.reader.read_buf(&mut self.buffer).await? {
                return if self.buffer.is_empty() {
                    Ok(None)
                } else {
                    Err(io::Error::new(
                        io::ErrorKind::ConnectionReset,
                        "connection reset by peer",
                    )
                    .into())
                };
            }
        }
    }

    fn parse_frame(&mut self) -> Result<Option<Frame>, FrameError> {
        if self.buffer.len() >= 5 {
            let frame_type = self.buffer[0];
            let len = u32::from_be_bytes([
                self.buffer[1],
                self.buffer[2],
                self.buffer[3],
                self.buffer[4],
            ]);
            // The length cap only applies to file bodies (§9's "unbounded
            // file bodies" note); chat and control frames are always small.
            if frame_type == crate::frame::TYPE_BINARY && len > self.max_payload_bytes {
                return Err(FrameError::PayloadTooLarge {
                    len,
                    max: self.max_payload_bytes,
                });
            }
        }

        let mut buf = Cursor::new(&self.buffer[..]);
        match Frame::check(&mut buf) {
            Ok(()) => {
                buf.set_position(0);
                let frame = Frame::parse(&mut buf)?;
                self.buffer.advance(5 + frame.payload.len());
                Ok(Some(frame))
            }
            Err(FrameError::Incomplete) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

/// The write half of a framed connection.
///
/// `write_frame` writes the header and payload with a single buffered
/// write followed by a flush, so two concurrent callers sharing a
/// `FrameWriter` behind a lock can never interleave a header with another
/// frame's payload.
#[derive(Debug)]
pub struct FrameWriter<W> {
    writer: BufWriter<W>,
}

impl<W: AsyncWrite + Unpin> FrameWriter<W> {
    pub fn new(writer: W) -> Self {
        FrameWriter {
            writer: BufWriter::new(writer),
        }
    }

    pub async fn write_frame(&mut self, frame: &Frame) -> io::Result<()> {
        self.writer.write_all(&frame.to_bytes()).await?;
        self.writer.flush().await
    }
}

/// A full-duplex framed connection over a single socket, for callers that
/// never need concurrent reads and writes (the test client; short-lived
/// probes). Server sessions split the socket instead — see
/// `session::Session`.
#[derive(Debug)]
pub struct Connection {
    reader: FrameReader<ReadHalf<TcpStream>>,
    writer: FrameWriter<WriteHalf<TcpStream>>,
}

impl Connection {
    pub fn new(socket: TcpStream) -> Connection {
        let (read_half, write_half) = io::split(socket);
        Connection {
            reader: FrameReader::new(read_half),
            writer: FrameWriter::new(write_half),
        }
    }

    pub async fn read_frame(&mut self) -> Result<Option<Frame>, FrameError> {
        self.reader.read_frame().await
    }

    pub async fn write_frame(&mut self, frame: &Frame) -> io::Result<()> {
        self.writer.write_frame(frame).await
    }
}
