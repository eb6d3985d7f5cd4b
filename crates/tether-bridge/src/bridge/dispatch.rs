use tracing::{trace, warn};

use crate::registry::{Entry, Token};

use super::Bridge;

impl Bridge {
    /// Run `work` on the engine's owning thread. Safe to call from any
    /// thread; returns immediately. Failures must be handled inside `work`.
    pub fn post(&self, work: impl FnOnce() + Send + 'static) {
        let token = self.registry.allocate(Entry::Dispatch(Box::new(work)));
        trace!(%token, "work posted");
        self.engine.dispatch(token);
    }

    /// Entry point for the engine thread when a posted token comes due.
    ///
    /// The entry is removed before it runs. Returns `false` when the token
    /// has no pending work (already run, or never posted).
    pub fn run_dispatched(&self, token: Token) -> bool {
        match self.registry.take_dispatch(token) {
            Some(work) => {
                trace!(%token, "running posted work");
                work();
                true
            }
            None => {
                warn!(%token, "dispatch token has no pending work");
                false
            }
        }
    }
}
