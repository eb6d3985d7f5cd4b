//! The capability set the bridge needs from a native engine instance.

use crate::envelope::Envelope;
use crate::registry::Token;

/// Handle to one native rendering-engine instance.
///
/// Implementations must be callable from any thread. Work that touches the
/// engine itself is expected to be forwarded to the engine's owning thread.
pub trait Engine: Send + Sync {
    /// Invoke `token` on the engine's owning thread, exactly once, after
    /// this call returns. The owner answers with [`Bridge::run_dispatched`].
    ///
    /// [`Bridge::run_dispatched`]: crate::Bridge::run_dispatched
    fn dispatch(&self, token: Token);

    /// Expose `name` as a page-global function whose calls are delivered
    /// to [`Bridge::deliver_call`] with `token`.
    ///
    /// [`Bridge::deliver_call`]: crate::Bridge::deliver_call
    fn bind(&self, name: &str, token: Token);

    /// Settle the page-side deferred value for `call_id`.
    fn resolve(&self, call_id: &str, envelope: &Envelope);

    /// Inject script that runs before every page load.
    fn init(&self, js: &str);

    /// Evaluate script in the current page. The result is ignored.
    fn eval(&self, js: &str);
}
