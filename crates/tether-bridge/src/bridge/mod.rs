//! The bridge context owned by one engine instance.
//!
//! `Bridge` holds the call registry and the message handler table. Each
//! table has its own lock; neither lock is held while host code runs.

use std::sync::Arc;

use crate::engine::Engine;
use crate::registry::CallRegistry;

mod binder;
mod dispatch;
mod messages;

#[cfg(test)]
mod tests;

pub use messages::{message_init_script, message_script, MESSAGE_EVENT, SEND_EVENT_BINDING};

use messages::MessageHandlers;

/// Host side of the page bridge.
///
/// Share it as `Arc<Bridge>`: background threads post work and send
/// messages, while the engine thread delivers calls and dispatches.
pub struct Bridge {
    engine: Arc<dyn Engine>,
    registry: CallRegistry,
    messages: Arc<MessageHandlers>,
}

impl Bridge {
    pub fn new(engine: Arc<dyn Engine>) -> Self {
        Self {
            engine,
            registry: CallRegistry::new(),
            messages: Arc::new(MessageHandlers::default()),
        }
    }

    pub fn engine(&self) -> &Arc<dyn Engine> {
        &self.engine
    }

    pub fn registry(&self) -> &CallRegistry {
        &self.registry
    }
}
