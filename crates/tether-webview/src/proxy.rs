//! Cross-thread handle to the engine.
//!
//! [`EngineProxy`] is what the bridge holds as its `Engine`. Bookkeeping
//! that must be visible before the event loop runs (routes, pending calls,
//! init scripts) is updated synchronously in [`EngineState`]; everything
//! that touches the webview is sent to the event loop as a [`UserEvent`].

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tether_bridge::{Engine, Envelope, Token};
use tether_config::SizeHint;
use tracing::{debug, warn};
use winit::event_loop::EventLoopProxy;

use crate::events::{UserEvent, WindowCommand};
use crate::page::PageLedger;
use crate::rpc::{binding_script, settle_script, CallRequest};

/// Outcome of admitting a page call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Admission {
    /// `call_id` is the host-side key: the page id stamped with the
    /// document generation.
    Routed { token: Token, call_id: String },
    UnknownMethod,
    DuplicateId,
}

/// Bound names and calls still waiting for a result.
///
/// Page ids restart with every document, so pending keys carry the
/// generation they were admitted in. Abandoning bumps the generation and
/// a result for an earlier document can no longer close a current call.
#[derive(Debug, Default)]
pub(crate) struct Routes {
    names: HashMap<String, Token>,
    pending: HashSet<String>,
    generation: u64,
}

impl Routes {
    pub(crate) fn bind(&mut self, name: &str, token: Token) -> Option<Token> {
        self.names.insert(name.to_string(), token)
    }

    pub(crate) fn admit(&mut self, method: &str, page_id: &str) -> Admission {
        let Some(token) = self.names.get(method).copied() else {
            return Admission::UnknownMethod;
        };
        let call_id = format!("{}/{page_id}", self.generation);
        if !self.pending.insert(call_id.clone()) {
            return Admission::DuplicateId;
        }
        Admission::Routed { token, call_id }
    }

    /// Close a pending call, returning the page id to settle. `None` when
    /// the call was already closed or belongs to an abandoned document.
    pub(crate) fn close(&mut self, call_id: &str) -> Option<String> {
        if !self.pending.remove(call_id) {
            return None;
        }
        call_id.split_once('/').map(|(_, page_id)| page_id.to_string())
    }

    /// Forget every pending call, e.g. after the page navigated away.
    pub(crate) fn abandon_pending(&mut self) -> usize {
        self.generation += 1;
        let n = self.pending.len();
        self.pending.clear();
        n
    }
}

/// Engine bookkeeping shared between callers and the event loop.
///
/// Each method returns the event, if any, the event loop still has to act on.
#[derive(Debug, Default)]
pub(crate) struct EngineState {
    routes: Mutex<Routes>,
    page: Mutex<PageLedger>,
}

impl EngineState {
    pub(crate) fn routes(&self) -> MutexGuard<'_, Routes> {
        self.routes.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn page(&self) -> MutexGuard<'_, PageLedger> {
        self.page.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn bind(&self, name: &str, token: Token) -> Option<UserEvent> {
        let old = self.routes().bind(name, token);
        if let Some(old) = old {
            debug!(name, old = %old, new = %token, "binding name rerouted");
        }
        self.init(binding_script(name))
    }

    pub(crate) fn init(&self, js: String) -> Option<UserEvent> {
        self.page().add_init(js).map(UserEvent::Eval)
    }

    pub(crate) fn resolve(&self, call_id: &str, envelope: &Envelope) -> Option<UserEvent> {
        let closed = self.routes().close(call_id);
        match closed {
            Some(page_id) => Some(UserEvent::Eval(settle_script(&page_id, envelope))),
            None => {
                warn!(call_id, "resolve for a call that is not pending, ignoring");
                None
            }
        }
    }

    /// Route a call posted by a page stub. Calls that can not be routed
    /// are rejected straight back to the page.
    pub(crate) fn admit(&self, call: &CallRequest) -> UserEvent {
        let page_id = call.call_id();
        let admission = self.routes().admit(&call.method, &page_id);
        let error = match admission {
            Admission::Routed { token, call_id } => {
                debug!(method = %call.method, call_id = %call_id, "page call");
                return UserEvent::Call {
                    token,
                    call_id,
                    args: call.args().to_string(),
                };
            }
            Admission::UnknownMethod => {
                warn!(method = %call.method, "call to unbound function");
                format!("{} is not a bound function", call.method)
            }
            Admission::DuplicateId => {
                warn!(page_id = %page_id, "call id already pending, rejecting");
                format!("call id {page_id} is already pending")
            }
        };
        UserEvent::Eval(settle_script(&page_id, &Envelope::failure(error)))
    }

    pub(crate) fn abandon_pending(&self) {
        let n = self.routes().abandon_pending();
        if n > 0 {
            debug!(count = n, "abandoned pending calls");
        }
    }
}

struct Shared {
    proxy: Mutex<EventLoopProxy<UserEvent>>,
    state: EngineState,
}

/// Thread-safe engine handle. Clones share state.
#[derive(Clone)]
pub struct EngineProxy {
    shared: Arc<Shared>,
}

impl EngineProxy {
    pub fn new(proxy: EventLoopProxy<UserEvent>) -> Self {
        Self {
            shared: Arc::new(Shared {
                proxy: Mutex::new(proxy),
                state: EngineState::default(),
            }),
        }
    }

    pub(crate) fn state(&self) -> &EngineState {
        &self.shared.state
    }

    pub(crate) fn send(&self, event: UserEvent) {
        let proxy = self
            .shared
            .proxy
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if proxy.send_event(event).is_err() {
            warn!("event loop closed, request dropped");
        }
    }

    fn forward(&self, event: Option<UserEvent>) {
        if let Some(event) = event {
            self.send(event);
        }
    }

    pub(crate) fn accept_call(&self, call: CallRequest) {
        self.send(self.state().admit(&call));
    }

    // -- Window operations --

    pub fn set_title(&self, title: impl Into<String>) {
        self.send(UserEvent::Window(WindowCommand::SetTitle(title.into())));
    }

    pub fn set_size(&self, width: u32, height: u32, hint: SizeHint) {
        self.send(UserEvent::Window(WindowCommand::SetSize {
            width,
            height,
            hint,
        }));
    }

    /// Set the window icon from PNG bytes.
    pub fn set_icon(&self, png: Vec<u8>) {
        self.send(UserEvent::Window(WindowCommand::SetIcon(png)));
    }

    pub fn set_icon_from_file(&self, path: impl Into<PathBuf>) {
        self.send(UserEvent::Window(WindowCommand::SetIconFromFile(path.into())));
    }

    pub fn show(&self) {
        self.send(UserEvent::Window(WindowCommand::Show));
    }

    pub fn hide(&self) {
        self.send(UserEvent::Window(WindowCommand::Hide));
    }

    pub fn minimize(&self) {
        self.send(UserEvent::Window(WindowCommand::Minimize));
    }

    pub fn maximize(&self) {
        self.send(UserEvent::Window(WindowCommand::Maximize));
    }

    pub fn hide_to_system_tray(&self) {
        self.send(UserEvent::Window(WindowCommand::HideToSystemTray));
    }

    pub fn navigate(&self, url: impl Into<String>) {
        self.send(UserEvent::Navigate(url.into()));
    }

    /// Close the window and stop the event loop.
    pub fn terminate(&self) {
        self.send(UserEvent::Terminate);
    }
}

impl Engine for EngineProxy {
    fn dispatch(&self, token: Token) {
        self.send(UserEvent::Dispatch(token));
    }

    fn bind(&self, name: &str, token: Token) {
        self.forward(self.state().bind(name, token));
    }

    fn resolve(&self, call_id: &str, envelope: &Envelope) {
        self.forward(self.state().resolve(call_id, envelope));
    }

    fn init(&self, js: &str) {
        self.forward(self.state().init(js.to_string()));
    }

    fn eval(&self, js: &str) {
        self.send(UserEvent::Eval(js.to_string()));
    }
}
