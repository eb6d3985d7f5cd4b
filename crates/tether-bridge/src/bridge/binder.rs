use std::any::{type_name, Any};
use std::sync::Arc;

use tether_common::{BindError, CallError};
use tracing::{debug, warn};

use crate::envelope::Envelope;
use crate::marshal::{BoundFunction, IntoBoundFunction};
use crate::registry::{Entry, Token};

use super::Bridge;

impl Bridge {
    /// Expose a typed host closure to page script as `window[name]`.
    ///
    /// The page-side function returns a promise settled with the envelope
    /// of each call.
    pub fn bind<M>(&self, name: &str, function: impl IntoBoundFunction<M>) -> Result<(), BindError> {
        self.register(name, function.into_bound_function())
    }

    /// Bind a value whose type is only known at run time. Anything other
    /// than a [`BoundFunction`] is rejected.
    pub fn bind_any<T: Any + Send + Sync>(&self, name: &str, target: T) -> Result<(), BindError> {
        let target: Box<dyn Any + Send + Sync> = Box::new(target);
        match target.downcast::<BoundFunction>() {
            Ok(function) => self.register(name, *function),
            Err(_) => Err(BindError::NotAFunction(type_name::<T>().to_string())),
        }
    }

    fn register(&self, name: &str, function: BoundFunction) -> Result<(), BindError> {
        function.signature().validate()?;
        let arity = function.signature().arity();
        let token = self.registry.allocate(Entry::Binding(Arc::new(function)));
        self.engine.bind(name, token);
        debug!(name, %token, arity, "function bound");
        Ok(())
    }

    /// Entry point for the engine when page script calls a bound name.
    ///
    /// Runs on whichever thread the engine delivers the call on and reports
    /// the envelope back against `call_id`.
    pub fn deliver_call(&self, token: Token, call_id: &str, request: &str) {
        let envelope = match self.registry.binding(token) {
            Some(function) => function.call(request),
            None => {
                warn!(%token, call_id, "call for unknown binding");
                Envelope::failure(CallError::UnknownBinding(token.get()))
            }
        };
        debug!(
            %token,
            call_id,
            status = ?envelope.status,
            payload_len = envelope.payload.len(),
            "call settled"
        );
        self.engine.resolve(call_id, &envelope);
    }
}
