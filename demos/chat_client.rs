// ABOUTME: Interactive terminal client demonstrating the chat wire protocol
// ABOUTME: Reads commands from stdin and prints whatever the server sends back

use chatd::connection::Connection;
use chatd::frame::{self, Frame};
use std::net::SocketAddr;
use tokio::io::{self, AsyncBufReadExt, BufReader};
use tokio::net::TcpStream;

#[tokio::main]
async fn main() -> chatd::Result<()> {
    let addr: SocketAddr = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "127.0.0.1:7878".to_string())
        .parse()?;

    println!("connecting to {addr}");
    let socket = TcpStream::connect(addr).await?;
    let mut connection = Connection::new(socket);

    let stdin = BufReader::new(io::stdin());
    let mut lines = stdin.lines();

    println!("enter commands, e.g. SET_NAME:alice, GET_USERS, REQ_CHAT:bob, CHAT:bob:hi");
    loop {
        tokio::select! {
            line = lines.next_line() => {
                match line? {
                    Some(line) if !line.is_empty() => {
                        let frame_type = if line.starts_with("CHAT:") { frame::TYPE_CHAT } else { frame::TYPE_CONTROL };
                        let frame = Frame::new(frame_type, line.into_bytes())?;
                        connection.write_frame(&frame).await?;
                    }
                    Some(_) => {}
                    None => break,
                }
            }
            received = connection.read_frame() => {
                match received? {
                    Some(frame) => println!("< {}", String::from_utf8_lossy(&frame.payload)),
                    None => {
                        println!("server closed the connection");
                        break;
                    }
                }
            }
        }
    }

    Ok(())
}
