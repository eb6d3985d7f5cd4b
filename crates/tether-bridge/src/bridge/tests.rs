//! Bridge tests against a recording engine.

use super::*;
use crate::envelope::{Envelope, Status};
use crate::marshal::{variadic, BoundFunction, ReturnKind, ReturnValue, Signature};
use crate::registry::Token;
use serde_json::json;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tether_common::BindError;

/// Records everything the bridge asks of the engine. Dispatches are queued
/// until [`RecordingEngine::pump`] plays the engine thread.
#[derive(Default)]
struct RecordingEngine {
    dispatched: Mutex<Vec<Token>>,
    routes: Mutex<HashMap<String, Token>>,
    resolved: Mutex<Vec<(String, Envelope)>>,
    init_scripts: Mutex<Vec<String>>,
    evals: Mutex<Vec<String>>,
}

impl Engine for RecordingEngine {
    fn dispatch(&self, token: Token) {
        self.dispatched.lock().unwrap().push(token);
    }

    fn bind(&self, name: &str, token: Token) {
        self.routes.lock().unwrap().insert(name.to_string(), token);
    }

    fn resolve(&self, call_id: &str, envelope: &Envelope) {
        self.resolved
            .lock()
            .unwrap()
            .push((call_id.to_string(), envelope.clone()));
    }

    fn init(&self, js: &str) {
        self.init_scripts.lock().unwrap().push(js.to_string());
    }

    fn eval(&self, js: &str) {
        self.evals.lock().unwrap().push(js.to_string());
    }
}

impl RecordingEngine {
    /// Simulate page script calling `name(args...)`.
    fn call(&self, bridge: &Bridge, name: &str, call_id: &str, args: &str) -> Envelope {
        let token = self.routes.lock().unwrap()[name];
        bridge.deliver_call(token, call_id, args);
        let resolved = self.resolved.lock().unwrap();
        let (id, envelope) = resolved.last().unwrap();
        assert_eq!(id, call_id);
        envelope.clone()
    }

    /// Run every queued dispatch; returns how many executed.
    fn pump(&self, bridge: &Bridge) -> usize {
        let tokens: Vec<Token> = std::mem::take(&mut *self.dispatched.lock().unwrap());
        tokens
            .into_iter()
            .filter(|token| bridge.run_dispatched(*token))
            .count()
    }

    fn is_routed(&self, name: &str) -> bool {
        self.routes.lock().unwrap().contains_key(name)
    }
}

fn setup() -> (Arc<RecordingEngine>, Arc<Bridge>) {
    let engine = Arc::new(RecordingEngine::default());
    let handle: Arc<dyn Engine> = engine.clone();
    (engine, Arc::new(Bridge::new(handle)))
}

// -- Binding --

#[test]
fn bound_function_round_trip() {
    let (engine, bridge) = setup();
    bridge.bind("add", |a: i64, b: i64| a + b).unwrap();

    let env = engine.call(&bridge, "add", "1", "[20, 22]");
    assert_eq!(env.value(), Some(json!(42)));
    assert_eq!(bridge.registry().len(), 1);
}

#[test]
fn each_call_resolves_its_own_id() {
    let (engine, bridge) = setup();
    bridge.bind("echo", |s: String| s).unwrap();

    engine.call(&bridge, "echo", "7", r#"["a"]"#);
    engine.call(&bridge, "echo", "8", r#"["b"]"#);

    let resolved = engine.resolved.lock().unwrap();
    assert_eq!(resolved.len(), 2);
    assert_eq!(resolved[0].0, "7");
    assert_eq!(resolved[0].1.value(), Some(json!("a")));
    assert_eq!(resolved[1].0, "8");
    assert_eq!(resolved[1].1.value(), Some(json!("b")));
}

#[test]
fn arity_mismatch_resolves_failure() {
    let (engine, bridge) = setup();
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    bridge
        .bind("touch", move |_path: String| {
            counter.fetch_add(1, Ordering::SeqCst);
        })
        .unwrap();

    let env = engine.call(&bridge, "touch", "1", r#"["a", "b"]"#);
    assert_eq!(env.status, Status::Failure);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn variadic_binding() {
    let (engine, bridge) = setup();
    bridge
        .bind(
            "sum",
            variadic(|base: i64, rest: Vec<i64>| base + rest.iter().sum::<i64>()),
        )
        .unwrap();

    assert_eq!(engine.call(&bridge, "sum", "1", "[5]").value(), Some(json!(5)));
    assert_eq!(
        engine.call(&bridge, "sum", "2", "[5, 1, 1]").value(),
        Some(json!(7))
    );
}

#[test]
fn host_error_resolves_failure_with_message() {
    let (engine, bridge) = setup();
    bridge
        .bind("open", |path: String| -> Result<String, String> {
            Err(format!("{path}: permission denied"))
        })
        .unwrap();

    let env = engine.call(&bridge, "open", "1", r#"["/etc/shadow"]"#);
    assert_eq!(env.message().as_deref(), Some("/etc/shadow: permission denied"));
    assert!(!env.payload.contains("null"));
}

#[test]
fn binding_non_functions_fails() {
    let (engine, bridge) = setup();

    let err = bridge.bind_any("n", 42_i32).unwrap_err();
    assert!(matches!(err, BindError::NotAFunction(ref ty) if ty == "i32"));

    let err = bridge.bind_any("s", String::from("nope")).unwrap_err();
    assert!(matches!(err, BindError::NotAFunction(_)));

    let err = bridge.bind_any("v", json!({"a": 1})).unwrap_err();
    assert!(matches!(err, BindError::NotAFunction(_)));

    assert!(bridge.registry().is_empty());
    assert!(!engine.is_routed("n"));
}

#[test]
fn bind_any_accepts_bound_functions() {
    let (engine, bridge) = setup();
    bridge
        .bind_any("len", BoundFunction::new(|s: String| s.len()))
        .unwrap();
    assert_eq!(
        engine.call(&bridge, "len", "1", r#"["four"]"#).value(),
        Some(json!(4))
    );
}

#[test]
fn unsupported_signatures_are_rejected_before_registration() {
    let (engine, bridge) = setup();

    let three = Signature::new(
        vec![],
        false,
        vec![ReturnKind::Value, ReturnKind::Value, ReturnKind::Error],
    );
    let f = BoundFunction::from_parts(three, |_args: &crate::marshal::RawArgs| Ok(vec![]));
    assert!(matches!(
        bridge.bind("three", f),
        Err(BindError::UnsupportedSignature(_))
    ));

    let two_values = Signature::new(vec![], false, vec![ReturnKind::Value, ReturnKind::Value]);
    let f = BoundFunction::from_parts(two_values, |_args: &crate::marshal::RawArgs| {
        Ok(vec![ReturnValue::value(&1), ReturnValue::value(&2)])
    });
    assert!(matches!(
        bridge.bind_any("pair", f),
        Err(BindError::UnsupportedSignature(_))
    ));

    assert!(bridge.registry().is_empty());
    assert!(!engine.is_routed("three"));
    assert!(!engine.is_routed("pair"));
}

#[test]
fn unknown_token_resolves_failure() {
    let (engine, bridge) = setup();
    bridge.deliver_call(Token::new(404), "9", "[]");

    let resolved = engine.resolved.lock().unwrap();
    assert_eq!(resolved[0].0, "9");
    assert_eq!(
        resolved[0].1.message().as_deref(),
        Some("no binding registered for token 404")
    );
}

#[test]
fn dispatch_token_is_not_callable() {
    let (engine, bridge) = setup();
    bridge.post(|| {});
    let token = engine.dispatched.lock().unwrap()[0];

    bridge.deliver_call(token, "1", "[]");
    assert_eq!(engine.resolved.lock().unwrap()[0].1.status, Status::Failure);
    assert!(bridge.registry().contains(token));
}

// -- Dispatch --

#[test]
fn posted_work_runs_only_when_pumped() {
    let (engine, bridge) = setup();
    let ran = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&ran);
    bridge.post(move || {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    assert_eq!(ran.load(Ordering::SeqCst), 0);
    assert_eq!(bridge.registry().len(), 1);

    assert_eq!(engine.pump(&bridge), 1);
    assert_eq!(ran.load(Ordering::SeqCst), 1);
    assert!(bridge.registry().is_empty());
}

#[test]
fn dispatched_token_runs_exactly_once() {
    let (engine, bridge) = setup();
    let ran = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&ran);
    bridge.post(move || {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    let token = engine.dispatched.lock().unwrap()[0];

    assert!(bridge.run_dispatched(token));
    assert!(!bridge.run_dispatched(token));
    assert!(!bridge.registry().contains(token));
    assert_eq!(ran.load(Ordering::SeqCst), 1);
}

#[test]
fn concurrent_posts_each_run_once() {
    const THREADS: usize = 8;
    const PER_THREAD: usize = 100;

    let (engine, bridge) = setup();
    let ran = Arc::new(AtomicUsize::new(0));

    std::thread::scope(|s| {
        for _ in 0..THREADS {
            let bridge = Arc::clone(&bridge);
            let ran = Arc::clone(&ran);
            s.spawn(move || {
                for _ in 0..PER_THREAD {
                    let ran = Arc::clone(&ran);
                    bridge.post(move || {
                        ran.fetch_add(1, Ordering::SeqCst);
                    });
                }
            });
        }
    });

    assert_eq!(engine.pump(&bridge), THREADS * PER_THREAD);
    assert_eq!(ran.load(Ordering::SeqCst), THREADS * PER_THREAD);
    assert!(bridge.registry().is_empty());
    assert_eq!(engine.pump(&bridge), 0);
}

#[test]
fn posted_work_may_post_more_work() {
    let (engine, bridge) = setup();
    let ran = Arc::new(AtomicUsize::new(0));

    let inner_bridge = Arc::clone(&bridge);
    let counter = Arc::clone(&ran);
    bridge.post(move || {
        let counter = Arc::clone(&counter);
        inner_bridge.post(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
    });

    assert_eq!(engine.pump(&bridge), 1);
    assert_eq!(bridge.registry().len(), 1);
    assert_eq!(engine.pump(&bridge), 1);
    assert_eq!(ran.load(Ordering::SeqCst), 1);
}

#[test]
fn bound_function_may_bind_while_running() {
    let (engine, bridge) = setup();
    let inner = Arc::clone(&bridge);
    bridge
        .bind("late", move |name: String| -> Result<(), String> {
            inner.bind(&name, || 1).map_err(|e| e.to_string())
        })
        .unwrap();

    assert!(engine.call(&bridge, "late", "1", r#"["one"]"#).is_success());
    assert_eq!(engine.call(&bridge, "one", "2", "[]").value(), Some(json!(1)));
}

// -- Messages --

#[test]
fn init_message_handler_binds_entry_point_and_hooks() {
    let (engine, bridge) = setup();
    bridge.init_message_handler().unwrap();

    assert!(engine.is_routed(SEND_EVENT_BINDING));
    let scripts = engine.init_scripts.lock().unwrap();
    assert_eq!(scripts.len(), 1);
    assert!(scripts[0].contains("window.SendEvent = window._SendEvent"));
    assert!(scripts[0].contains(r#"event === "webview_message""#));
}

#[test]
fn init_message_handler_is_idempotent() {
    let (engine, bridge) = setup();
    bridge.init_message_handler().unwrap();
    bridge.init_message_handler().unwrap();

    assert_eq!(bridge.registry().len(), 1);
    assert_eq!(engine.init_scripts.lock().unwrap().len(), 1);
}

#[test]
fn event_round_trip() {
    let (engine, bridge) = setup();
    bridge.init_message_handler().unwrap();
    bridge.add_message_handler("FILE_READ", |event, data| {
        assert_eq!(event, "FILE_READ");
        assert!(data.contains("notes.txt"));
        r#"{"fileContents":"hello"}"#.to_string()
    });

    let env = engine.call(
        &bridge,
        SEND_EVENT_BINDING,
        "1",
        r#"["FILE_READ", "{\"file\":\"notes.txt\"}"]"#,
    );
    assert_eq!(env.value(), Some(json!(r#"{"fileContents":"hello"}"#)));
}

#[test]
fn unregistered_event_returns_empty_string() {
    let (engine, bridge) = setup();
    bridge.init_message_handler().unwrap();

    let env = engine.call(&bridge, SEND_EVENT_BINDING, "1", r#"["MISSING", ""]"#);
    assert_eq!(env.value(), Some(json!("")));
}

#[test]
fn last_handler_registration_wins() {
    let (engine, bridge) = setup();
    bridge.init_message_handler().unwrap();
    bridge.add_message_handler("PING", |_, _| "first".to_string());
    bridge.add_message_handler("PING", |_, _| "second".to_string());

    let env = engine.call(&bridge, SEND_EVENT_BINDING, "1", r#"["PING", ""]"#);
    assert_eq!(env.value(), Some(json!("second")));
}

#[test]
fn handler_added_before_init_still_answers() {
    let (engine, bridge) = setup();
    bridge.add_message_handler("EARLY", |_, _| "ok".to_string());
    bridge.init_message_handler().unwrap();

    let env = engine.call(&bridge, SEND_EVENT_BINDING, "1", r#"["EARLY", ""]"#);
    assert_eq!(env.value(), Some(json!("ok")));
}

#[test]
fn send_message_evaluates_listener_fan_out() {
    let (engine, bridge) = setup();
    bridge.send_message("ping", r#"{"n":1}"#);

    let evals = engine.evals.lock().unwrap();
    assert_eq!(evals.len(), 1);
    assert!(evals[0].contains("webViewEventListeners"));
    assert!(evals[0].contains(r#"listener("ping", "{\"n\":1}")"#));
}

/// Pull the two literal arguments out of a `message_script` call and
/// decode them as JSON.
fn listener_args(script: &str) -> Vec<String> {
    let start = script.find("listener(").unwrap() + "listener(".len();
    let end = script.rfind("); });").unwrap();
    serde_json::from_str(&format!("[{}]", &script[start..end])).unwrap()
}

#[test]
fn message_script_quotes_hostile_input() {
    let cases = [
        ("ping", r#"{"n":1}"#),
        (r#"a"b"#, r#"c\d"#),
        ("\");alert(1);//", "line\nbreak\u{2028}"),
        ("", ""),
    ];
    for (event, data) in cases {
        let args = listener_args(&message_script(event, data));
        assert_eq!(args, vec![event.to_string(), data.to_string()]);
    }
}

#[test]
fn message_init_script_fixes_listener_removal() {
    let script = message_init_script();
    assert!(script.contains("window.webViewEventListeners = window.webViewEventListeners.filter"));
    assert!(script.contains("addEventListener.apply(window, arguments)"));
}
