use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::core::packet::{EntityMessage, PacketKind};
use crate::error::{ProtocolError, Result};

type HandlerFn = dyn Fn(&EntityMessage) -> Result<()> + Send + Sync + 'static;

/// Routes decoded entity messages to per-packet-type handlers.
///
/// A receiver registers one handler per [`PacketKind`]; dispatch is
/// synchronous and holds only a read lock, so handlers for different packet
/// types never serialize behind each other.
pub struct Dispatcher {
    handlers: Arc<RwLock<HashMap<PacketKind, Box<HandlerFn>>>>,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Dispatcher {
    pub fn new() -> Self {
        Self {
            handlers: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn register<F>(&self, kind: PacketKind, handler: F) -> Result<()>
    where
        F: Fn(&EntityMessage) -> Result<()> + Send + Sync + 'static,
    {
        let mut handlers = self.handlers.write().map_err(|_| {
            ProtocolError::Config("Failed to acquire write lock on dispatcher".to_string())
        })?;

        handlers.insert(kind, Box::new(handler));
        Ok(())
    }

    pub fn dispatch(&self, msg: &EntityMessage) -> Result<()> {
        let handlers = self.handlers.read().map_err(|_| {
            ProtocolError::Config("Failed to acquire read lock on dispatcher".to_string())
        })?;

        handlers
            .get(&msg.kind())
            .ok_or(ProtocolError::UnhandledPacket(msg.kind()))
            .and_then(|handler| handler(msg))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::core::packet::EntityErase;
    use std::sync::atomic::{AtomicU64, Ordering};

    #[test]
    fn routes_to_registered_handler() {
        let dispatcher = Dispatcher::new();
        let seen = Arc::new(AtomicU64::new(0));
        let seen_clone = seen.clone();
        dispatcher
            .register(PacketKind::EntityErase, move |msg| {
                seen_clone.store(msg.id(), Ordering::SeqCst);
                Ok(())
            })
            .unwrap();

        dispatcher
            .dispatch(&EntityMessage::Erase(EntityErase { id: 42 }))
            .unwrap();
        assert_eq!(seen.load(Ordering::SeqCst), 42);
    }

    #[test]
    fn unregistered_kind_is_an_error() {
        let dispatcher = Dispatcher::new();
        let err = dispatcher
            .dispatch(&EntityMessage::Erase(EntityErase { id: 1 }))
            .unwrap_err();
        assert!(matches!(
            err,
            ProtocolError::UnhandledPacket(PacketKind::EntityErase)
        ));
    }
}
