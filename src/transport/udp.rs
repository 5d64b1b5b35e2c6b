//! Fire-and-forget datagram binding.
//!
//! Each encoded message travels as exactly one UDP datagram to a fixed
//! destination. There is no handshake, no session, no acknowledgment, and no
//! retry: datagrams may be lost, duplicated, or reordered by the network, and
//! nothing here detects any of those. Callers that need ordering must carry a
//! sequence number inside their own payloads.
//!
//! Socket errors from the OS pass through untransformed.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};

use tokio::net::UdpSocket;
use tracing::{debug, info, instrument, warn};

use crate::core::packet::EntityMessage;
use crate::error::{ProtocolError, Result};
use crate::protocol::dispatcher::Dispatcher;
use crate::utils::metrics::global_metrics;

/// Port the sample client listens on. A deployment convention, not a
/// protocol requirement.
pub const DEFAULT_INJECT_PORT: u16 = 40103;

/// Largest payload a single UDP datagram can carry.
const MAX_DATAGRAM_SIZE: usize = 65_535;

/// Sends entity messages to one fixed destination.
#[derive(Debug)]
pub struct EntityInjector {
    socket: UdpSocket,
    target: SocketAddr,
}

impl EntityInjector {
    /// Bind an ephemeral local socket aimed at `target`.
    #[instrument]
    pub async fn bind(target: SocketAddr) -> Result<Self> {
        let bind_addr = if target.is_ipv4() {
            SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 0)
        } else {
            SocketAddr::new(IpAddr::V6(Ipv6Addr::UNSPECIFIED), 0)
        };
        let socket = UdpSocket::bind(bind_addr).await?;
        info!(target = %target, "Entity injector ready");
        Ok(Self { socket, target })
    }

    pub fn target(&self) -> SocketAddr {
        self.target
    }

    /// Encode `msg` and send it as one datagram.
    ///
    /// Returns the number of bytes handed to the OS. An encode rejection
    /// surfaces before anything is sent.
    pub async fn send(&self, msg: &EntityMessage) -> Result<usize> {
        let bytes = match msg.encode() {
            Ok(bytes) => bytes,
            Err(e) => {
                global_metrics().encode_error();
                return Err(e.into());
            }
        };
        let sent = self.socket.send_to(&bytes, self.target).await?;
        global_metrics().packet_sent(sent as u64);
        debug!(kind = ?msg.kind(), id = msg.id(), bytes = sent, "Datagram sent");
        Ok(sent)
    }
}

/// Receives and decodes entity messages on a local socket.
#[derive(Debug)]
pub struct EntityListener {
    socket: UdpSocket,
}

impl EntityListener {
    #[instrument]
    pub async fn bind(addr: SocketAddr) -> Result<Self> {
        let socket = UdpSocket::bind(addr).await?;
        info!(addr = %socket.local_addr()?, "Listening for entity datagrams");
        Ok(Self { socket })
    }

    /// The bound address, useful when binding port 0.
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.socket.local_addr()?)
    }

    /// Receive one datagram and decode it.
    ///
    /// A malformed datagram is an error for this call only; the socket stays
    /// usable for the next one.
    pub async fn recv(&self) -> Result<(EntityMessage, SocketAddr)> {
        let mut buf = [0u8; MAX_DATAGRAM_SIZE];
        let (len, peer) = self.socket.recv_from(&mut buf).await?;
        global_metrics().packet_received(len as u64);
        match EntityMessage::decode(&buf[..len]) {
            Ok(msg) => {
                debug!(kind = ?msg.kind(), id = msg.id(), peer = %peer, "Datagram decoded");
                Ok((msg, peer))
            }
            Err(e) => {
                global_metrics().decode_error();
                Err(e.into())
            }
        }
    }

    /// Drain datagrams into `dispatcher` until the socket fails.
    ///
    /// Malformed datagrams and handler errors are logged and dropped so one
    /// bad peer cannot stop the receive loop; only socket-level errors end it.
    pub async fn run(&self, dispatcher: &Dispatcher) -> Result<()> {
        loop {
            match self.recv().await {
                Ok((msg, peer)) => {
                    if let Err(e) = dispatcher.dispatch(&msg) {
                        warn!(error = %e, peer = %peer, "Handler rejected message");
                    }
                }
                Err(ProtocolError::Decode(e)) => {
                    warn!(error = %e, "Dropping malformed datagram");
                }
                Err(e) => return Err(e),
            }
        }
    }
}
