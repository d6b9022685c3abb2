// ABOUTME: A thin client over `Connection`, used by integration tests and the demo binary
// ABOUTME: Not part of the protocol; just convenience wrappers around raw frames

use crate::connection::Connection;
use crate::frame::{self, Frame, FrameError};
use std::net::SocketAddr;
use tokio::io;
use tokio::net::TcpStream;

/// A bare-bones chat client good enough to drive the server in tests and
/// demos. Every method either sends one frame or sends one and waits for
/// the reply that the real protocol promises back.
pub struct TestClient {
    connection: Connection,
}

impl TestClient {
    pub async fn connect(addr: SocketAddr) -> io::Result<TestClient> {
        let socket = TcpStream::connect(addr).await?;
        Ok(TestClient {
            connection: Connection::new(socket),
        })
    }

    async fn send_control(&mut self, body: impl Into<bytes::Bytes>) -> Result<(), FrameError> {
        let frame = Frame::new(frame::TYPE_CONTROL, body)?;
        self.connection.write_frame(&frame).await?;
        Ok(())
    }

    /// Reads the next control (type-1) frame and returns its UTF-8 body.
    pub async fn recv_control(&mut self) -> Result<String, FrameError> {
        match self.connection.read_frame().await? {
            Some(frame) => Ok(String::from_utf8_lossy(&frame.payload).into_owned()),
            None => Err(io::Error::new(io::ErrorKind::UnexpectedEof, "connection closed").into()),
        }
    }

    /// Reads the next chat (type-0) frame and returns its UTF-8 body.
    pub async fn recv_chat(&mut self) -> Result<String, FrameError> {
        match self.connection.read_frame().await? {
            Some(frame) => Ok(String::from_utf8_lossy(&frame.payload).into_owned()),
            None => Err(io::Error::new(io::ErrorKind::UnexpectedEof, "connection closed").into()),
        }
    }

    /// Sends `SET_NAME` and waits for `NAME_OK`/`NAME_TAKEN`, failing the
    /// call on anything unexpected. Use [`TestClient::try_set_name`] when
    /// a collision is an expected outcome.
    pub async fn set_name(&mut self, name: &str) -> Result<(), FrameError> {
        if self.try_set_name(name).await? {
            Ok(())
        } else {
            Err(io::Error::new(io::ErrorKind::Other, "NAME_TAKEN").into())
        }
    }

    /// Sends `SET_NAME` and reports whether it succeeded.
    pub async fn try_set_name(&mut self, name: &str) -> Result<bool, FrameError> {
        self.send_control(format!("SET_NAME:{name}")).await?;
        Ok(self.recv_control().await? == "NAME_OK")
    }

    pub async fn get_users(&mut self) -> Result<Vec<String>, FrameError> {
        self.send_control("GET_USERS").await?;
        let reply = self.recv_control().await?;
        let names = reply
            .strip_prefix("LIST_USERS:")
            .unwrap_or("")
            .split(',')
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        Ok(names)
    }

    pub async fn req_chat(&mut self, target: &str) -> Result<(), FrameError> {
        self.send_control(format!("REQ_CHAT:{target}")).await
    }

    pub async fn accept_chat(&mut self, requester: &str) -> Result<(), FrameError> {
        self.send_control(format!("ACCEPT_CHAT:{requester}")).await
    }

    pub async fn deny_chat(&mut self, requester: &str) -> Result<(), FrameError> {
        self.send_control(format!("DENY_CHAT:{requester}")).await
    }

    pub async fn stop_chat(&mut self, target: &str) -> Result<(), FrameError> {
        self.send_control(format!("STOP_CHAT:{target}")).await
    }

    pub async fn chat(&mut self, target: &str, text: &str) -> Result<(), FrameError> {
        self.send_control(format!("CHAT:{target}:{text}")).await
    }

    pub async fn req_send_files(&mut self, target: &str, count: u32) -> Result<(), FrameError> {
        self.send_control(format!("REQ_SEND_FILES:{target}:{count}")).await
    }

    pub async fn accept_send_files(&mut self, sender: &str) -> Result<(), FrameError> {
        self.send_control(format!("ACCEPT_SEND_FILES:{sender}")).await
    }

    pub async fn deny_send_files(&mut self, sender: &str) -> Result<(), FrameError> {
        self.send_control(format!("DENY_SEND_FILES:{sender}")).await
    }

    pub async fn files_received(&mut self, sender: &str) -> Result<(), FrameError> {
        self.send_control(format!("FILES_RECEIVED:{sender}")).await
    }

    /// Sends one binary (type-2) frame in the `dst_len | dst | filename_len
    /// | filename | data` wire shape (§4.5.5 phase 3).
    pub async fn send_file_chunk(&mut self, target: &str, filename: &str, data: &[u8]) -> Result<(), FrameError> {
        let mut body = Vec::with_capacity(2 + target.len() + filename.len() + data.len());
        body.push(target.len() as u8);
        body.extend_from_slice(target.as_bytes());
        body.push(filename.len() as u8);
        body.extend_from_slice(filename.as_bytes());
        body.extend_from_slice(data);

        let frame = Frame::new(frame::TYPE_BINARY, body)?;
        self.connection.write_frame(&frame).await?;
        Ok(())
    }

    /// Reads the next binary frame and splits it back into
    /// `(sender_name, filename, data)`.
    pub async fn recv_file_chunk(&mut self) -> Result<(String, String, Vec<u8>), FrameError> {
        let frame = match self.connection.read_frame().await? {
            Some(frame) => frame,
            None => return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "connection closed").into()),
        };
        let payload = &frame.payload;
        let sender_len = *payload.first().unwrap_or(&0) as usize;
        let sender = String::from_utf8_lossy(&payload[1..1 + sender_len]).into_owned();
        let rest = &payload[1 + sender_len..];
        let filename_len = *rest.first().unwrap_or(&0) as usize;
        let filename = String::from_utf8_lossy(&rest[1..1 + filename_len]).into_owned();
        let data = rest[1 + filename_len..].to_vec();
        Ok((sender, filename, data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_users_parses_empty_list() {
        let reply = "LIST_USERS:";
        let names: Vec<String> = reply
            .strip_prefix("LIST_USERS:")
            .unwrap_or("")
            .split(',')
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        assert!(names.is_empty());
    }
}
