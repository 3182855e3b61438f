//! End-to-end relay tests over real TCP connections
//!
//! Each test starts an in-process relay on an ephemeral port, connects
//! raw TCP clients, and checks the frames that actually cross the wire.

use std::net::SocketAddr;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio::time::{sleep, timeout};

use chat_relay::{decode_header, serve, RelayServer, HEADER_LEN};

/// Delay long enough for the actor to process joins/leaves already sent
const SETTLE: Duration = Duration::from_millis(200);

/// Ceiling for reads that are expected to produce data
const READ_TIMEOUT: Duration = Duration::from_secs(2);

/// Window in which an excluded recipient must stay silent
const SILENCE_WINDOW: Duration = Duration::from_millis(300);

async fn start_relay() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("listener address");

    let (cmd_tx, cmd_rx) = mpsc::channel(256);
    tokio::spawn(RelayServer::new(cmd_rx).run());
    tokio::spawn(serve(listener, cmd_tx));

    addr
}

async fn connect(addr: SocketAddr) -> TcpStream {
    TcpStream::connect(addr).await.expect("connect to relay")
}

/// Read one header-framed message and return its body
async fn read_frame(stream: &mut TcpStream) -> Vec<u8> {
    let mut header = [0u8; HEADER_LEN];
    timeout(READ_TIMEOUT, stream.read_exact(&mut header))
        .await
        .expect("timed out waiting for frame header")
        .expect("read frame header");
    let body_len = decode_header(&header).expect("frame header should decode");
    let mut body = vec![0u8; body_len];
    timeout(READ_TIMEOUT, stream.read_exact(&mut body))
        .await
        .expect("timed out waiting for frame body")
        .expect("read frame body");
    body
}

/// Assert that nothing arrives on the stream within the silence window
async fn assert_silent(stream: &mut TcpStream) {
    let mut probe = [0u8; 1];
    let result = timeout(SILENCE_WINDOW, stream.read(&mut probe)).await;
    assert!(result.is_err(), "stream should stay silent, got data instead");
}

#[tokio::test]
async fn line_is_relayed_as_frame_to_other_clients_only() {
    let addr = start_relay().await;
    let mut sender = connect(addr).await;
    let mut receiver = connect(addr).await;
    sleep(SETTLE).await;

    sender.write_all(b"hello\n").await.expect("send line");

    let body = read_frame(&mut receiver).await;
    assert_eq!(body, b"hello");

    // Self-exclusion: the sender never gets its own message back.
    assert_silent(&mut sender).await;
}

#[tokio::test]
async fn frames_preserve_send_order() {
    let addr = start_relay().await;
    let mut sender = connect(addr).await;
    let mut receiver = connect(addr).await;
    sleep(SETTLE).await;

    sender
        .write_all(b"first\nsecond\nthird\n")
        .await
        .expect("send lines");

    assert_eq!(read_frame(&mut receiver).await, b"first");
    assert_eq!(read_frame(&mut receiver).await, b"second");
    assert_eq!(read_frame(&mut receiver).await, b"third");
}

#[tokio::test]
async fn empty_line_becomes_empty_frame() {
    let addr = start_relay().await;
    let mut sender = connect(addr).await;
    let mut receiver = connect(addr).await;
    sleep(SETTLE).await;

    sender.write_all(b"\n").await.expect("send empty line");

    let body = read_frame(&mut receiver).await;
    assert!(body.is_empty());
}

#[tokio::test]
async fn crlf_delimiter_is_stripped() {
    let addr = start_relay().await;
    let mut sender = connect(addr).await;
    let mut receiver = connect(addr).await;
    sleep(SETTLE).await;

    sender.write_all(b"windows line\r\n").await.expect("send line");

    let body = read_frame(&mut receiver).await;
    assert_eq!(body, b"windows line");
}

#[tokio::test]
async fn oversized_line_is_truncated_to_limit() {
    let addr = start_relay().await;
    let mut sender = connect(addr).await;
    let mut receiver = connect(addr).await;
    sleep(SETTLE).await;

    let mut line = vec![b'z'; 600];
    line.push(b'\n');
    sender.write_all(&line).await.expect("send long line");

    let body = read_frame(&mut receiver).await;
    assert_eq!(body.len(), 512);
    assert_eq!(body, vec![b'z'; 512]);
}

#[tokio::test]
async fn relay_survives_client_disconnect() {
    let addr = start_relay().await;
    let first = connect(addr).await;
    let mut second = connect(addr).await;
    let mut third = connect(addr).await;
    sleep(SETTLE).await;

    // First client goes away; the relay must drop its session exactly
    // once and keep serving everyone else.
    drop(first);
    sleep(SETTLE).await;

    second.write_all(b"still here\n").await.expect("send line");
    assert_eq!(read_frame(&mut third).await, b"still here");

    third.write_all(b"so am i\n").await.expect("send line");
    assert_eq!(read_frame(&mut second).await, b"so am i");
}

#[tokio::test]
async fn messages_fan_out_to_every_other_client() {
    let addr = start_relay().await;
    let mut sender = connect(addr).await;
    let mut receiver_one = connect(addr).await;
    let mut receiver_two = connect(addr).await;
    sleep(SETTLE).await;

    sender.write_all(b"to everyone\n").await.expect("send line");

    assert_eq!(read_frame(&mut receiver_one).await, b"to everyone");
    assert_eq!(read_frame(&mut receiver_two).await, b"to everyone");
    assert_silent(&mut sender).await;
}
