// ABOUTME: End-to-end scenarios driving a real ChatServer over loopback TCP
// ABOUTME: Each test spawns its own server instance on an ephemeral port

use chatd::testclient::TestClient;
use chatd::{ChatServer, ServerConfig};
use std::net::SocketAddr;
use tokio::sync::oneshot;

async fn spawn_server() -> (SocketAddr, oneshot::Sender<()>, tokio::task::JoinHandle<()>) {
    spawn_server_with(ServerConfig::default().with_port(0)).await
}

async fn spawn_server_with(
    config: ServerConfig,
) -> (SocketAddr, oneshot::Sender<()>, tokio::task::JoinHandle<()>) {
    let server = ChatServer::bind(config).await.expect("bind");
    let addr = server.local_addr();
    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    let handle = tokio::spawn(async move {
        server
            .run(async {
                let _ = shutdown_rx.await;
            })
            .await
            .expect("server run");
    });
    (addr, shutdown_tx, handle)
}

#[tokio::test]
async fn register_then_list_sees_self() {
    let (addr, shutdown, handle) = spawn_server().await;

    let mut alice = TestClient::connect(addr).await.unwrap();
    alice.set_name("alice").await.unwrap();
    let users = alice.get_users().await.unwrap();
    assert_eq!(users, vec!["alice".to_string()]);

    let _ = shutdown.send(());
    handle.await.unwrap();
}

#[tokio::test]
async fn name_collision_between_two_clients() {
    let (addr, shutdown, handle) = spawn_server().await;

    let mut alice = TestClient::connect(addr).await.unwrap();
    alice.set_name("alice").await.unwrap();

    let mut mallory = TestClient::connect(addr).await.unwrap();
    assert!(!mallory.try_set_name("alice").await.unwrap());
    assert!(mallory.try_set_name("mallory").await.unwrap());

    let users = alice.get_users().await.unwrap();
    assert_eq!(users.len(), 2);
    assert!(users.contains(&"alice".to_string()));
    assert!(users.contains(&"mallory".to_string()));

    let _ = shutdown.send(());
    handle.await.unwrap();
}

#[tokio::test]
async fn full_chat_handshake_and_message() {
    let (addr, shutdown, handle) = spawn_server().await;

    let mut alice = TestClient::connect(addr).await.unwrap();
    alice.set_name("alice").await.unwrap();
    let mut bob = TestClient::connect(addr).await.unwrap();
    bob.set_name("bob").await.unwrap();

    alice.req_chat("bob").await.unwrap();
    assert_eq!(bob.recv_control().await.unwrap(), "REQ_CHAT_FROM:alice");

    bob.accept_chat("alice").await.unwrap();
    assert_eq!(alice.recv_control().await.unwrap(), "CHAT_ACCEPTED:bob");
    assert_eq!(bob.recv_control().await.unwrap(), "CHAT_ACCEPTED:alice");

    alice.chat("bob", "hola, como estas?").await.unwrap();
    assert_eq!(bob.recv_chat().await.unwrap(), "FROM:alice:hola, como estas?");

    bob.chat("alice", "todo bien").await.unwrap();
    assert_eq!(alice.recv_chat().await.unwrap(), "FROM:bob:todo bien");

    let _ = shutdown.send(());
    handle.await.unwrap();
}

#[tokio::test]
async fn message_without_an_active_pairing_is_rejected() {
    let (addr, shutdown, handle) = spawn_server().await;

    let mut alice = TestClient::connect(addr).await.unwrap();
    alice.set_name("alice").await.unwrap();
    let mut bob = TestClient::connect(addr).await.unwrap();
    bob.set_name("bob").await.unwrap();

    alice.chat("bob", "hello?").await.unwrap();
    let reply = alice.recv_control().await.unwrap();
    assert!(reply.starts_with("ERROR:"));

    let _ = shutdown.send(());
    handle.await.unwrap();
}

#[tokio::test]
async fn stop_chat_then_resend_is_rejected_until_renegotiated() {
    let (addr, shutdown, handle) = spawn_server().await;

    let mut alice = TestClient::connect(addr).await.unwrap();
    alice.set_name("alice").await.unwrap();
    let mut bob = TestClient::connect(addr).await.unwrap();
    bob.set_name("bob").await.unwrap();

    alice.req_chat("bob").await.unwrap();
    bob.recv_control().await.unwrap();
    bob.accept_chat("alice").await.unwrap();
    alice.recv_control().await.unwrap();
    bob.recv_control().await.unwrap();

    alice.stop_chat("bob").await.unwrap();
    assert_eq!(bob.recv_control().await.unwrap(), "CHAT_STOPPED:alice");

    alice.chat("bob", "still there?").await.unwrap();
    assert!(alice.recv_control().await.unwrap().starts_with("ERROR:"));

    alice.req_chat("bob").await.unwrap();
    assert_eq!(bob.recv_control().await.unwrap(), "REQ_CHAT_FROM:alice");
    bob.accept_chat("alice").await.unwrap();
    alice.recv_control().await.unwrap();
    bob.recv_control().await.unwrap();

    alice.chat("bob", "back now").await.unwrap();
    assert_eq!(bob.recv_chat().await.unwrap(), "FROM:alice:back now");

    let _ = shutdown.send(());
    handle.await.unwrap();
}

#[tokio::test]
async fn a_lot_of_files_is_relayed_end_to_end() {
    let (addr, shutdown, handle) = spawn_server().await;

    let mut alice = TestClient::connect(addr).await.unwrap();
    alice.set_name("alice").await.unwrap();
    let mut bob = TestClient::connect(addr).await.unwrap();
    bob.set_name("bob").await.unwrap();

    alice.req_chat("bob").await.unwrap();
    bob.recv_control().await.unwrap();
    bob.accept_chat("alice").await.unwrap();
    alice.recv_control().await.unwrap();
    bob.recv_control().await.unwrap();

    alice.req_send_files("bob", 2).await.unwrap();
    assert_eq!(bob.recv_control().await.unwrap(), "REQ_SEND_FILES_FROM:alice:2");

    bob.accept_send_files("alice").await.unwrap();
    assert_eq!(alice.recv_control().await.unwrap(), "ACCEPT_SEND_FILES_FROM:bob");

    alice.send_file_chunk("bob", "one.txt", b"first file contents").await.unwrap();
    alice.send_file_chunk("bob", "two.txt", b"second file contents").await.unwrap();

    let (sender, filename, data) = bob.recv_file_chunk().await.unwrap();
    assert_eq!(sender, "alice");
    assert_eq!(filename, "one.txt");
    assert_eq!(data, b"first file contents");

    let (sender, filename, data) = bob.recv_file_chunk().await.unwrap();
    assert_eq!(sender, "alice");
    assert_eq!(filename, "two.txt");
    assert_eq!(data, b"second file contents");

    bob.files_received("alice").await.unwrap();
    assert_eq!(alice.recv_control().await.unwrap(), "FILES_RECEIVED_FROM:bob");

    let _ = shutdown.send(());
    handle.await.unwrap();
}

#[tokio::test]
async fn denying_a_file_transfer_notifies_the_sender() {
    let (addr, shutdown, handle) = spawn_server().await;

    let mut alice = TestClient::connect(addr).await.unwrap();
    alice.set_name("alice").await.unwrap();
    let mut bob = TestClient::connect(addr).await.unwrap();
    bob.set_name("bob").await.unwrap();

    alice.req_send_files("bob", 1).await.unwrap();
    bob.recv_control().await.unwrap();
    bob.deny_send_files("alice").await.unwrap();
    assert_eq!(alice.recv_control().await.unwrap(), "DENY_SEND_FILES_FROM:bob");

    let _ = shutdown.send(());
    handle.await.unwrap();
}

#[tokio::test]
async fn disconnect_tears_down_active_pairs_and_frees_the_name() {
    let (addr, shutdown, handle) = spawn_server().await;

    let mut alice = TestClient::connect(addr).await.unwrap();
    alice.set_name("alice").await.unwrap();
    let mut bob = TestClient::connect(addr).await.unwrap();
    bob.set_name("bob").await.unwrap();

    alice.req_chat("bob").await.unwrap();
    bob.recv_control().await.unwrap();
    bob.accept_chat("alice").await.unwrap();
    alice.recv_control().await.unwrap();
    bob.recv_control().await.unwrap();

    drop(alice);
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;

    let mut alice2 = TestClient::connect(addr).await.unwrap();
    assert!(alice2.try_set_name("alice").await.unwrap());

    let _ = shutdown.send(());
    handle.await.unwrap();
}

#[tokio::test]
async fn oversized_file_frame_gets_error_reply_not_disconnect() {
    let (addr, shutdown, handle) =
        spawn_server_with(ServerConfig::default().with_port(0).with_max_file_frame_bytes(4)).await;

    let mut alice = TestClient::connect(addr).await.unwrap();
    alice.set_name("alice").await.unwrap();
    let mut bob = TestClient::connect(addr).await.unwrap();
    bob.set_name("bob").await.unwrap();
    alice.req_chat("bob").await.unwrap();
    bob.recv_control().await.unwrap();
    bob.accept_chat("alice").await.unwrap();
    alice.recv_control().await.unwrap();
    bob.recv_control().await.unwrap();

    alice
        .send_file_chunk("bob", "f.bin", b"this payload is well over the four byte cap")
        .await
        .unwrap();
    let reply = alice.recv_control().await.unwrap();
    assert!(reply.starts_with("ERROR:"), "unexpected reply: {reply}");

    // The connection must still be usable afterward.
    alice.chat("bob", "still here").await.unwrap();
    assert_eq!(bob.recv_chat().await.unwrap(), "FROM:alice:still here");

    let _ = shutdown.send(());
    handle.await.unwrap();
}
