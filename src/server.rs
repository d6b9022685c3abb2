// ABOUTME: Accept loop, global registries, and every protocol operation handler
// ABOUTME: The core of the service; everything else exists to support this module

use crate::config::ServerConfig;
use crate::connection::{FrameReader, FrameWriter};
use crate::events::Event;
use crate::frame;
use crate::observable::Observable;
use crate::protocol::Command;
use crate::registry::Registry;
use crate::request_buffer::{Dispatcher, RequestBuffer};
use crate::session::Session;
use bytes::Bytes;
use rand::Rng;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use thiserror::Error;
use tokio::io;
use tokio::net::{TcpListener, UdpSocket};
use tokio::sync::Mutex as AsyncMutex;
use tracing::{debug, error, info};

/// Errors the server core recognizes (§7). These are internal; the only
/// thing a client ever sees is a free-form `ERROR:<description>` frame or
/// `NAME_TAKEN` — this enum exists for the server's own control flow and
/// for the events it emits.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("protocol error: {0}")]
    Protocol(String),
    #[error("policy error: {0}")]
    Policy(String),
    #[error(transparent)]
    Transport(#[from] io::Error),
    #[error("fatal: {0}")]
    Fatal(String),
}

struct Inner {
    registry: AsyncMutex<Registry>,
    observable: Observable,
    max_file_frame_bytes: u32,
}

/// The shared core every reader task and the request-buffer worker hold a
/// clone of. Cloning is a cheap `Arc` bump; the registry's lock is the one
/// global lock invariant 5 requires.
#[derive(Clone)]
struct Core(Arc<Inner>);

/// A bound, running chat server.
pub struct ChatServer {
    core: Core,
    request_buffer: RequestBuffer,
    listener: TcpListener,
    local_addr: SocketAddr,
    network_ip: IpAddr,
}

impl ChatServer {
    /// Binds the listening socket and wires up the request buffer, but
    /// does not yet accept connections — call [`ChatServer::run`] for
    /// that. Splitting bind from run lets callers subscribe observers
    /// (via [`ChatServer::observable`]) before any event can fire.
    pub async fn bind(config: ServerConfig) -> Result<ChatServer, ServerError> {
        let listener = TcpListener::bind((config.bind_addr, config.port)).await?;
        let local_addr = listener.local_addr()?;
        let network_ip = local_network_ip().await.unwrap_or(config.bind_addr);

        let observable = Observable::new();
        let core = Core(Arc::new(Inner {
            registry: AsyncMutex::new(Registry::new()),
            observable: observable.clone(),
            max_file_frame_bytes: config.max_file_frame_bytes,
        }));
        let request_buffer = RequestBuffer::spawn(config.request_buffer_capacity, observable, core.clone());

        Ok(ChatServer {
            core,
            request_buffer,
            listener,
            local_addr,
            network_ip,
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// The event stream observers subscribe to (§4.6).
    pub fn observable(&self) -> Observable {
        self.core.0.observable.clone()
    }

    /// Runs the accept loop until `shutdown` resolves or the listener
    /// fails fatally. One reader task is spawned per accepted connection;
    /// each reader feeds the request buffer until its socket closes, at
    /// which point it runs disconnect cleanup directly.
    pub async fn run(self, shutdown: impl std::future::Future<Output = ()>) -> Result<(), ServerError> {
        self.print_banner();
        self.core.0.observable.emit(Event::ServerStarted {
            bind_ip: self.local_addr.ip().to_string(),
            port: self.local_addr.port(),
            network_ip: self.network_ip.to_string(),
        });

        tokio::pin!(shutdown);
        loop {
            tokio::select! {
                accepted = self.listener.accept() => {
                    match accepted {
                        Ok((socket, addr)) => self.spawn_reader(socket, addr),
                        Err(e) => {
                            error!(error = %e, "accept loop failed fatally");
                            self.core.0.observable.emit(Event::FatalError { error_msg: e.to_string() });
                            break;
                        }
                    }
                }
                _ = &mut shutdown => {
                    info!("shutdown signal received, closing listener");
                    break;
                }
            }
        }

        self.core.0.observable.emit(Event::ServerStopped {
            network_ip: self.network_ip.to_string(),
            port: self.local_addr.port(),
        });
        Ok(())
    }

    fn spawn_reader(&self, socket: tokio::net::TcpStream, addr: SocketAddr) {
        let temp_name = format!("Temp_{}", rand::thread_rng().gen_range(1000..=9999));
        let max_payload = self.core.0.max_file_frame_bytes;
        let (read_half, write_half) = io::split(socket);
        let session = Session::new(FrameWriter::new(write_half), addr, temp_name.clone());
        let reader = FrameReader::with_max_payload(read_half, max_payload);
        let core = self.core.clone();
        let request_buffer = self.request_buffer.clone();

        core.0.observable.emit(Event::ClientHandshakeStarted {
            addr,
            temp_name,
        });

        tokio::spawn(Self::read_loop(reader, session, request_buffer, core));
    }

    async fn read_loop(
        mut reader: FrameReader<io::ReadHalf<tokio::net::TcpStream>>,
        session: Session,
        request_buffer: RequestBuffer,
        core: Core,
    ) {
        loop {
            match reader.read_frame().await {
                Ok(Some(frame)) => {
                    request_buffer
                        .add_request(session.clone(), frame.frame_type, frame.payload)
                        .await;
                }
                Ok(None) => break,
                Err(crate::frame::FrameError::PayloadTooLarge { len, max }) => {
                    debug!(name = %session.name(), len, max, "oversized frame rejected");
                    let _ = session
                        .send(
                            frame::TYPE_CONTROL,
                            format!("ERROR:Frame de {len} bytes excede el límite de {max} bytes"),
                        )
                        .await;
                }
                Err(e) => {
                    debug!(name = %session.name(), error = %e, "connection read error");
                    core.0.observable.emit(Event::ClientError {
                        session_name: session.name(),
                        error_msg: e.to_string(),
                    });
                    break;
                }
            }
        }
        core.disconnect(&session).await;
    }

    fn print_banner(&self) {
        info!(
            bind_ip = %self.local_addr.ip(),
            port = self.local_addr.port(),
            network_ip = %self.network_ip,
            "chat server listening"
        );
    }
}

/// Finds the outbound-facing local IP by connecting a UDP socket to a
/// well-known public address and reading back the kernel-assigned local
/// endpoint. No packet is actually sent; this never touches the network.
/// Display-only — never used for binding.
pub async fn local_network_ip() -> io::Result<IpAddr> {
    let probe = UdpSocket::bind("0.0.0.0:0").await?;
    probe.connect(("8.8.8.8", 80)).await?;
    Ok(probe.local_addr()?.ip())
}

impl Dispatcher for Core {
    async fn dispatch(&self, session: Session, msg_type: u8, payload: Bytes) -> Result<(), String> {
        match msg_type {
            frame::TYPE_CHAT | frame::TYPE_CONTROL => {
                let raw = match std::str::from_utf8(&payload) {
                    Ok(s) => s,
                    Err(_) => {
                        let _ = session.send(frame::TYPE_CONTROL, "ERROR:Payload inválido (no UTF-8)").await;
                        return Ok(());
                    }
                };
                self.dispatch_command(&session, Command::parse(raw)).await
            }
            frame::TYPE_BINARY => self.handle_file_transfer(&session, &payload).await,
            other => Err(format!("unexpected frame type {other} reached the dispatcher")),
        }
    }
}

impl Core {
    async fn dispatch_command(&self, session: &Session, command: Command) -> Result<(), String> {
        match command {
            Command::SetName(name) => self.handle_set_name(session, name).await,
            Command::GetUsers => self.send_user_list(session).await,
            Command::ReqChat { target } => self.handle_req_chat(session, target).await,
            Command::AcceptChat { requester } => self.handle_accept_chat(session, requester).await,
            Command::DenyChat { requester } => self.handle_deny_chat(session, requester).await,
            Command::StopChat { target } => self.handle_stop_chat(session, target).await,
            Command::Chat { target, text } => self.handle_chat_message(session, target, text).await,
            Command::ReqSendFiles { target, count } => self.handle_req_send_files(session, target, count).await,
            Command::AcceptSendFiles { sender } => self.handle_accept_send_files(session, sender).await,
            Command::DenySendFiles { sender } => self.handle_deny_send_files(session, sender).await,
            Command::FilesReceived { sender } => self.handle_files_received(session, sender).await,
            Command::Malformed => {
                let _ = session.send(frame::TYPE_CONTROL, "ERROR:Formato de mensaje inválido").await;
                Ok(())
            }
            // Unknown commands are dropped silently (§4.4, §7).
            Command::Unknown => Ok(()),
        }
    }

    async fn handle_set_name(&self, session: &Session, new_name: String) -> Result<(), String> {
        let mut registry = self.0.registry.lock().await;

        if new_name.is_empty()
            || registry.contains(&new_name)
            || new_name.contains(crate::session::TEMP_NAME_PREFIX)
            || !session.is_placeholder_name()
        {
            let _ = session.send(frame::TYPE_CONTROL, "NAME_TAKEN").await;
            drop(registry);
            return Ok(());
        }

        session.set_name(new_name.clone());
        registry.insert(new_name.clone(), session.clone());
        let count = registry.len();

        info!(name = %new_name, addr = %session.addr(), "client registered");
        let _ = session.send(frame::TYPE_CONTROL, "NAME_OK").await;
        drop(registry);

        self.0.observable.emit(Event::ClientJoined {
            name: new_name,
            addr: session.addr(),
        });
        self.0.observable.emit(Event::ActiveConnectionsChanged { count });
        Ok(())
    }

    async fn send_user_list(&self, session: &Session) -> Result<(), String> {
        let registry = self.0.registry.lock().await;
        let names = registry.names();
        let body = format!("LIST_USERS:{}", names.join(","));
        let _ = session.send(frame::TYPE_CONTROL, body).await;
        drop(registry);
        Ok(())
    }

    async fn handle_req_chat(&self, session: &Session, target_name: String) -> Result<(), String> {
        let requester = session.name();
        let mut registry = self.0.registry.lock().await;

        if registry.has_pending(&target_name) {
            let _ = session
                .send(frame::TYPE_CONTROL, format!("ERROR:{target_name} ya tiene una solicitud de chat pendiente."))
                .await;
            drop(registry);
            return Ok(());
        }

        match registry.get(&target_name).cloned() {
            None => {
                let _ = session
                    .send(frame::TYPE_CONTROL, format!("ERROR:Usuario {target_name} no encontrado"))
                    .await;
                drop(registry);
            }
            Some(target) => {
                registry.mark_pending(target_name);
                let _ = target.send(frame::TYPE_CONTROL, format!("REQ_CHAT_FROM:{requester}")).await;
                drop(registry);
            }
        }
        Ok(())
    }

    async fn handle_accept_chat(&self, session: &Session, requester_name: String) -> Result<(), String> {
        let accepter = session.name();
        let mut registry = self.0.registry.lock().await;
        registry.clear_pending(&accepter);

        match registry.get(&requester_name).cloned() {
            None => {
                let _ = session
                    .send(
                        frame::TYPE_CONTROL,
                        format!("ERROR:Usuario {requester_name} ya no está conectado"),
                    )
                    .await;
                drop(registry);
            }
            Some(requester) => {
                registry.activate_pair(&accepter, &requester_name);
                info!(a = %accepter, b = %requester_name, "chat established");
                let _ = requester
                    .send(frame::TYPE_CONTROL, format!("CHAT_ACCEPTED:{accepter}"))
                    .await;
                let _ = session
                    .send(frame::TYPE_CONTROL, format!("CHAT_ACCEPTED:{requester_name}"))
                    .await;
                drop(registry);
                self.0.observable.emit(Event::ChatEstablished {
                    name_a: accepter,
                    name_b: requester_name,
                });
            }
        }
        Ok(())
    }

    async fn handle_deny_chat(&self, session: &Session, requester_name: String) -> Result<(), String> {
        let denier = session.name();
        let mut registry = self.0.registry.lock().await;
        registry.clear_pending(&denier);
        let requester = registry.get(&requester_name).cloned();

        if let Some(requester) = requester {
            let _ = requester.send(frame::TYPE_CONTROL, format!("CHAT_DENIED:{denier}")).await;
        }
        drop(registry);
        Ok(())
    }

    async fn handle_stop_chat(&self, session: &Session, target_name: String) -> Result<(), String> {
        let actor = session.name();
        let mut registry = self.0.registry.lock().await;
        registry.deactivate_pair(&actor, &target_name);
        let target = registry.get(&target_name).cloned();

        info!(actor = %actor, target = %target_name, "chat ended");
        if let Some(target) = target {
            let _ = target.send(frame::TYPE_CONTROL, format!("CHAT_STOPPED:{actor}")).await;
        }
        drop(registry);
        self.0.observable.emit(Event::ChatEnded {
            who: actor,
            with_whom: target_name,
        });
        Ok(())
    }

    async fn handle_chat_message(&self, session: &Session, target_name: String, text: String) -> Result<(), String> {
        let sender = session.name();
        let mut registry = self.0.registry.lock().await;

        if !registry.is_active(&sender, &target_name) {
            let _ = session
                .send(frame::TYPE_CONTROL, format!("ERROR:No tienes un chat activo con {target_name}."))
                .await;
            drop(registry);
            return Ok(());
        }

        match registry.get(&target_name).cloned() {
            None => {
                registry.deactivate_pair(&sender, &target_name);
                let _ = session
                    .send(frame::TYPE_CONTROL, format!("ERROR:Usuario {target_name} desconectado"))
                    .await;
                drop(registry);
            }
            Some(target) => {
                let _ = target.send(frame::TYPE_CHAT, format!("FROM:{sender}:{text}")).await;
                drop(registry);
            }
        }
        Ok(())
    }

    async fn handle_req_send_files(&self, session: &Session, target_name: String, count: String) -> Result<(), String> {
        let sender = session.name();
        let registry = self.0.registry.lock().await;
        let target = registry.get(&target_name).cloned();

        let Some(target) = target else {
            let _ = session
                .send(frame::TYPE_CONTROL, format!("ERROR:Usuario {target_name} no encontrado"))
                .await;
            drop(registry);
            return Ok(());
        };

        let _ = target
            .send(frame::TYPE_CONTROL, format!("REQ_SEND_FILES_FROM:{sender}:{count}"))
            .await;
        drop(registry);
        self.0.observable.emit(Event::FileTransferRequested {
            sender,
            receiver: target_name,
            count,
        });
        Ok(())
    }

    async fn handle_accept_send_files(&self, session: &Session, sender_name: String) -> Result<(), String> {
        let receiver = session.name();
        let registry = self.0.registry.lock().await;
        let sender = registry.get(&sender_name).cloned();

        let Some(sender) = sender else {
            drop(registry);
            return Ok(());
        };
        let _ = sender
            .send(frame::TYPE_CONTROL, format!("ACCEPT_SEND_FILES_FROM:{receiver}"))
            .await;
        drop(registry);
        self.0.observable.emit(Event::FileTransferAccepted {
            receiver,
            sender: sender_name,
        });
        Ok(())
    }

    async fn handle_deny_send_files(&self, session: &Session, sender_name: String) -> Result<(), String> {
        let receiver = session.name();
        let registry = self.0.registry.lock().await;
        let sender = registry.get(&sender_name).cloned();

        let Some(sender) = sender else {
            drop(registry);
            return Ok(());
        };
        let _ = sender
            .send(frame::TYPE_CONTROL, format!("DENY_SEND_FILES_FROM:{receiver}"))
            .await;
        drop(registry);
        self.0.observable.emit(Event::FileTransferDenied {
            receiver,
            sender: sender_name,
        });
        Ok(())
    }

    async fn handle_files_received(&self, session: &Session, sender_name: String) -> Result<(), String> {
        let receiver = session.name();
        let registry = self.0.registry.lock().await;
        let sender = registry.get(&sender_name).cloned();

        let Some(sender) = sender else {
            drop(registry);
            return Ok(());
        };
        let _ = sender
            .send(frame::TYPE_CONTROL, format!("FILES_RECEIVED_FROM:{receiver}"))
            .await;
        drop(registry);
        self.0.observable.emit(Event::FileTransferCompleted {
            receiver,
            sender: sender_name,
        });
        Ok(())
    }

    /// Relays one type-2 binary frame. Wire format in:
    /// `dst_len(1) | dst | filename_len(1) | filename | data`; rewritten
    /// to `sender_len(1) | sender | filename_len(1) | filename | data` for
    /// the destination (§4.5.5 phase 3).
    async fn handle_file_transfer(&self, session: &Session, payload: &[u8]) -> Result<(), String> {
        let sender = session.name();

        let Some(&dst_len) = payload.first() else {
            let _ = session.send(frame::TYPE_CONTROL, "ERROR:Fallo al procesar envío de archivo").await;
            return Ok(());
        };
        let dst_len = dst_len as usize;
        if payload.len() < 1 + dst_len {
            let _ = session.send(frame::TYPE_CONTROL, "ERROR:Fallo al procesar envío de archivo").await;
            return Ok(());
        }
        let target_name = match std::str::from_utf8(&payload[1..1 + dst_len]) {
            Ok(s) => s.to_string(),
            Err(_) => {
                let _ = session.send(frame::TYPE_CONTROL, "ERROR:Fallo al procesar envío de archivo").await;
                return Ok(());
            }
        };

        let registry = self.0.registry.lock().await;
        if !registry.is_active(&sender, &target_name) {
            let _ = session
                .send(
                    frame::TYPE_CONTROL,
                    format!("ERROR:No tienes un chat activo con {target_name} para enviar archivos."),
                )
                .await;
            drop(registry);
            return Ok(());
        }
        let target = registry.get(&target_name).cloned();

        let Some(target) = target else {
            let _ = session
                .send(frame::TYPE_CONTROL, format!("ERROR:Usuario {target_name} desconectado"))
                .await;
            drop(registry);
            return Ok(());
        };

        let mut rewritten = Vec::with_capacity(1 + sender.len() + (payload.len() - 1 - dst_len));
        rewritten.push(sender.len() as u8);
        rewritten.extend_from_slice(sender.as_bytes());
        rewritten.extend_from_slice(&payload[1 + dst_len..]);

        let sent = target.send(frame::TYPE_BINARY, rewritten).await.is_ok();
        drop(registry);
        if sent {
            self.0.observable.emit(Event::FileTransferRouted {
                sender,
                receiver: target_name,
            });
        }
        Ok(())
    }

    /// Disconnect cleanup (§4.5.6): mark closed, remove the registry entry
    /// only if it still refers to this session, drop pending membership,
    /// purge every active-set pair mentioning this name.
    async fn disconnect(&self, session: &Session) {
        session.close();
        let name = session.name();

        let mut registry = self.0.registry.lock().await;
        registry.remove_if_owned_by(&name, session);
        registry.clear_pending(&name);
        registry.purge_name_from_active(&name);
        let count = registry.len();
        drop(registry);

        info!(name = %name, addr = %session.addr(), "client disconnected");
        self.0.observable.emit(Event::ClientDisconnected {
            name,
            addr: session.addr(),
        });
        self.0.observable.emit(Event::ActiveConnectionsChanged { count });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testclient::TestClient;

    async fn spawn_test_server() -> (ChatServer, SocketAddr) {
        let config = ServerConfig::default().with_port(0);
        let server = ChatServer::bind(config).await.unwrap();
        let addr = server.local_addr();
        (server, addr)
    }

    #[tokio::test]
    async fn register_and_list() {
        let (server, addr) = spawn_test_server().await;
        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
        let handle = tokio::spawn(async move {
            server.run(async { let _ = shutdown_rx.await; }).await.unwrap();
        });

        let mut a = TestClient::connect(addr).await.unwrap();
        a.set_name("A").await.unwrap();
        let users = a.get_users().await.unwrap();
        assert_eq!(users, vec!["A".to_string()]);

        let _ = shutdown_tx.send(());
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn name_collision_is_rejected() {
        let (server, addr) = spawn_test_server().await;
        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
        let handle = tokio::spawn(async move {
            server.run(async { let _ = shutdown_rx.await; }).await.unwrap();
        });

        let mut a = TestClient::connect(addr).await.unwrap();
        a.set_name("A").await.unwrap();

        let mut b = TestClient::connect(addr).await.unwrap();
        assert!(!b.try_set_name("A").await.unwrap());
        assert!(b.try_set_name("B").await.unwrap());

        let _ = shutdown_tx.send(());
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn chat_handshake_and_message_delivery() {
        let (server, addr) = spawn_test_server().await;
        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
        let handle = tokio::spawn(async move {
            server.run(async { let _ = shutdown_rx.await; }).await.unwrap();
        });

        let mut a = TestClient::connect(addr).await.unwrap();
        a.set_name("A").await.unwrap();
        let mut b = TestClient::connect(addr).await.unwrap();
        b.set_name("B").await.unwrap();

        a.req_chat("B").await.unwrap();
        assert_eq!(b.recv_control().await.unwrap(), "REQ_CHAT_FROM:A");
        b.accept_chat("A").await.unwrap();
        assert_eq!(a.recv_control().await.unwrap(), "CHAT_ACCEPTED:B");
        assert_eq!(b.recv_control().await.unwrap(), "CHAT_ACCEPTED:A");

        a.chat("B", "hey").await.unwrap();
        assert_eq!(b.recv_chat().await.unwrap(), "FROM:A:hey");

        let _ = shutdown_tx.send(());
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn message_without_pairing_is_rejected() {
        let (server, addr) = spawn_test_server().await;
        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
        let handle = tokio::spawn(async move {
            server.run(async { let _ = shutdown_rx.await; }).await.unwrap();
        });

        let mut a = TestClient::connect(addr).await.unwrap();
        a.set_name("A").await.unwrap();
        let mut b = TestClient::connect(addr).await.unwrap();
        b.set_name("B").await.unwrap();

        a.chat("B", "hey").await.unwrap();
        let err = a.recv_control().await.unwrap();
        assert!(err.starts_with("ERROR:No tienes un chat activo con B"));

        let _ = shutdown_tx.send(());
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn stop_chat_then_resend_is_rejected() {
        let (server, addr) = spawn_test_server().await;
        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
        let handle = tokio::spawn(async move {
            server.run(async { let _ = shutdown_rx.await; }).await.unwrap();
        });

        let mut a = TestClient::connect(addr).await.unwrap();
        a.set_name("A").await.unwrap();
        let mut b = TestClient::connect(addr).await.unwrap();
        b.set_name("B").await.unwrap();

        a.req_chat("B").await.unwrap();
        b.recv_control().await.unwrap();
        b.accept_chat("A").await.unwrap();
        a.recv_control().await.unwrap();
        b.recv_control().await.unwrap();

        a.stop_chat("B").await.unwrap();
        assert_eq!(b.recv_control().await.unwrap(), "CHAT_STOPPED:A");

        a.chat("B", "yo").await.unwrap();
        assert!(a.recv_control().await.unwrap().starts_with("ERROR:"));

        let _ = shutdown_tx.send(());
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn disconnect_cleans_up_registry_and_active_pairs() {
        let (server, addr) = spawn_test_server().await;
        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
        let handle = tokio::spawn(async move {
            server.run(async { let _ = shutdown_rx.await; }).await.unwrap();
        });

        let mut a = TestClient::connect(addr).await.unwrap();
        a.set_name("A").await.unwrap();
        let mut b = TestClient::connect(addr).await.unwrap();
        b.set_name("B").await.unwrap();
        a.req_chat("B").await.unwrap();
        b.recv_control().await.unwrap();
        b.accept_chat("A").await.unwrap();
        a.recv_control().await.unwrap();
        b.recv_control().await.unwrap();

        drop(a);
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;

        let mut c = TestClient::connect(addr).await.unwrap();
        c.set_name("C").await.unwrap();
        let users = c.get_users().await.unwrap();
        assert!(!users.contains(&"A".to_string()));

        let _ = shutdown_tx.send(());
        handle.await.unwrap();
    }
}
