// ABOUTME: Server construction parameters and the CLI surface that sets them
// ABOUTME: Library stays agnostic of argh; only the binary parses flags

use std::net::{IpAddr, Ipv4Addr};

/// Parameters the server is constructed with (§6 "Server configuration").
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Interface to bind to. Defaults to all interfaces.
    pub bind_addr: IpAddr,
    /// Listening port. `0` delegates the choice to the OS.
    pub port: u16,
    /// Frames on type 2 (binary) larger than this are rejected with a
    /// text `ERROR:` reply to the sending session instead of being
    /// buffered in full — the configurable cap §9 calls for against the
    /// 32-bit length field. Other frame types are unaffected.
    pub max_file_frame_bytes: u32,
    /// Capacity of the bounded request FIFO (§2, §4.3).
    pub request_buffer_capacity: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            bind_addr: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 0,
            max_file_frame_bytes: 16 * 1024 * 1024,
            request_buffer_capacity: 1024,
        }
    }
}

impl ServerConfig {
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_bind_addr(mut self, bind_addr: IpAddr) -> Self {
        self.bind_addr = bind_addr;
        self
    }

    pub fn with_max_file_frame_bytes(mut self, max_file_frame_bytes: u32) -> Self {
        self.max_file_frame_bytes = max_file_frame_bytes;
        self
    }

    pub fn with_request_buffer_capacity(mut self, request_buffer_capacity: usize) -> Self {
        self.request_buffer_capacity = request_buffer_capacity;
        self
    }
}
