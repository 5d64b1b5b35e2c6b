#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
//! Loopback transport tests: one datagram per message, fire-and-forget, and
//! a receive loop that survives malformed input.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use entity_protocol::error::ProtocolError;
use entity_protocol::protocol::dispatcher::Dispatcher;
use entity_protocol::{
    EntityAdd, EntityErase, EntityInjector, EntityListener, EntityMessage, PacketKind, Quat, Vec3,
};

fn loopback() -> SocketAddr {
    "127.0.0.1:0".parse().unwrap()
}

fn sample_add(id: u64) -> EntityMessage {
    EntityMessage::Add(EntityAdd {
        id,
        name: "LoopbackCube".into(),
        position: Vec3::new(0.0, 1.5, -2.0),
        rotation: Quat::IDENTITY,
        dimensions: Vec3::splat(0.3),
        model_url: String::new(),
        texture_url: String::new(),
        color: Vec3::new(1.0, 0.0, 0.0),
    })
}

async fn recv_one(listener: &EntityListener) -> entity_protocol::Result<(EntityMessage, SocketAddr)> {
    tokio::time::timeout(Duration::from_secs(5), listener.recv())
        .await
        .expect("receive should not time out")
}

#[tokio::test]
async fn test_inject_and_receive_roundtrip() {
    let listener = EntityListener::bind(loopback()).await.unwrap();
    let addr = listener.local_addr().unwrap();
    let injector = EntityInjector::bind(addr).await.unwrap();

    let msg = sample_add(1001);
    let sent = injector.send(&msg).await.unwrap();
    assert_eq!(sent, msg.encoded_len());

    let (received, peer) = recv_one(&listener).await.unwrap();
    assert_eq!(received, msg);
    assert!(peer.ip().is_loopback());
}

#[tokio::test]
async fn test_each_message_is_one_datagram() {
    let listener = EntityListener::bind(loopback()).await.unwrap();
    let addr = listener.local_addr().unwrap();
    let injector = EntityInjector::bind(addr).await.unwrap();

    let messages = vec![
        sample_add(1),
        EntityMessage::Erase(EntityErase { id: 1 }),
        sample_add(2),
    ];
    for msg in &messages {
        injector.send(msg).await.unwrap();
    }

    // Loopback preserves ordering in practice, so each recv yields exactly
    // one of the sent messages
    for expected in &messages {
        let (received, _) = recv_one(&listener).await.unwrap();
        assert_eq!(&received, expected);
    }
}

#[tokio::test]
async fn test_malformed_datagram_does_not_poison_listener() {
    let listener = EntityListener::bind(loopback()).await.unwrap();
    let addr = listener.local_addr().unwrap();

    let raw = tokio::net::UdpSocket::bind(loopback()).await.unwrap();
    raw.send_to(&[0xFF, 0x01, 0x02], addr).await.unwrap();

    let err = recv_one(&listener).await.unwrap_err();
    assert!(matches!(err, ProtocolError::Decode(_)));

    // The socket stays usable for the next, valid datagram
    let injector = EntityInjector::bind(addr).await.unwrap();
    let msg = EntityMessage::Erase(EntityErase { id: 7 });
    injector.send(&msg).await.unwrap();

    let (received, _) = recv_one(&listener).await.unwrap();
    assert_eq!(received, msg);
}

#[tokio::test]
async fn test_dispatcher_drains_datagrams() {
    let listener = EntityListener::bind(loopback()).await.unwrap();
    let addr = listener.local_addr().unwrap();

    let dispatcher = Arc::new(Dispatcher::new());
    let adds = Arc::new(AtomicUsize::new(0));
    let erases = Arc::new(AtomicUsize::new(0));

    let adds_handler = adds.clone();
    dispatcher
        .register(PacketKind::EntityAdd, move |_| {
            adds_handler.fetch_add(1, Ordering::SeqCst);
            Ok(())
        })
        .unwrap();
    let erases_handler = erases.clone();
    dispatcher
        .register(PacketKind::EntityErase, move |msg| {
            assert_eq!(msg.id(), 42);
            erases_handler.fetch_add(1, Ordering::SeqCst);
            Ok(())
        })
        .unwrap();

    let loop_dispatcher = dispatcher.clone();
    let drain = tokio::spawn(async move { listener.run(&loop_dispatcher).await });

    let injector = EntityInjector::bind(addr).await.unwrap();
    injector.send(&sample_add(1)).await.unwrap();
    injector.send(&sample_add(2)).await.unwrap();
    injector
        .send(&EntityMessage::Erase(EntityErase { id: 42 }))
        .await
        .unwrap();

    // Wait for the drain loop to process everything
    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    while adds.load(Ordering::SeqCst) < 2 || erases.load(Ordering::SeqCst) < 1 {
        assert!(
            tokio::time::Instant::now() < deadline,
            "dispatcher did not see all datagrams in time"
        );
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    assert_eq!(adds.load(Ordering::SeqCst), 2);
    assert_eq!(erases.load(Ordering::SeqCst), 1);
    drain.abort();
}
