//! Page-side call plumbing.
//!
//! The bootstrap script installs `window.__tether`, a table of pending
//! promises keyed by call id. Every bound name gets a stub that posts
//! `{id, method, params}` through `window.ipc.postMessage` and returns the
//! promise; the host answers by evaluating [`settle_script`].

use serde::Deserialize;
use serde_json::value::RawValue;
use tether_bridge::{quote_json, Envelope};

/// Installed before any page script runs.
pub const RPC_INIT_SCRIPT: &str = r#"
(function() {
    if (window.__tether) {
        return;
    }
    var pending = {};
    var nextSeq = 1;
    window.__tether = {
        invoke: function(method, params) {
            var id = String(nextSeq++);
            var promise = new Promise(function(resolve, reject) {
                pending[id] = { resolve: resolve, reject: reject };
            });
            window.ipc.postMessage(JSON.stringify({ id: id, method: method, params: params }));
            return promise;
        },
        settle: function(id, status, result) {
            var call = pending[id];
            if (!call) {
                return;
            }
            delete pending[id];
            if (status === 0) {
                call.resolve(result);
            } else {
                call.reject(result);
            }
        }
    };
})();
"#;

/// Script that publishes `window[name]` as a promise-returning stub.
pub fn binding_script(name: &str) -> String {
    format!(
        "(function() {{ var name = {}; window[name] = function() {{ \
         return window.__tether.invoke(name, Array.prototype.slice.call(arguments)); }}; }})();",
        quote_json(name)
    )
}

/// Script that resolves or rejects the page promise for `call_id`.
///
/// The payload is JSON text and therefore a valid script expression.
pub fn settle_script(call_id: &str, envelope: &Envelope) -> String {
    format!(
        "window.__tether && window.__tether.settle({}, {}, {});",
        quote_json(call_id),
        envelope.status.code(),
        envelope.payload
    )
}

/// One page-to-host call as posted by a binding stub.
#[derive(Debug, Deserialize)]
pub struct CallRequest {
    pub id: serde_json::Value,
    pub method: String,
    pub params: Box<RawValue>,
}

impl CallRequest {
    /// Parse an IPC body. Returns `None` for anything that is not a call.
    pub fn from_json(body: &str) -> Option<Self> {
        serde_json::from_str(body).ok()
    }

    /// Call id as the page keys it.
    pub fn call_id(&self) -> String {
        match &self.id {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }

    /// The raw arguments array text.
    pub fn args(&self) -> &str {
        self.params.get()
    }
}
