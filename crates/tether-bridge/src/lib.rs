//! Host <-> page bridge for an embedded web engine.
//!
//! Provides:
//! - Bound functions: page script calls host closures with JSON arguments
//!   and receives a deferred JSON result or error
//! - A dispatch queue that runs host work on the engine's owning thread
//! - An event bus between host message handlers and page listeners
//!
//! The native engine is reached only through the [`Engine`] trait.

pub mod bridge;
pub mod engine;
pub mod envelope;
pub mod marshal;
pub mod registry;

pub use bridge::{message_init_script, message_script, Bridge, MESSAGE_EVENT, SEND_EVENT_BINDING};
pub use engine::Engine;
pub use envelope::{quote_json, Envelope, Status};
pub use marshal::{
    variadic, BoundFunction, IntoBoundFunction, IntoReturns, Json, ReturnKind, ReturnValue,
    Signature, Variadic,
};
pub use registry::{CallRegistry, Entry, Token};
