//! Sample bindings and events wired into the demo window.

use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use base64::Engine as _;
use serde::Deserialize;
use serde_json::json;
use tether_bridge::{variadic, Bridge};
use tether_common::TetherError;
use tether_webview::EngineProxy;
use tracing::{debug, info};

const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Page loaded when the config names neither a URL nor inline HTML.
pub const DEMO_PAGE: &str = r#"<!doctype html>
<html>
<head><meta charset="utf-8"><title>Tether</title></head>
<body>
<h3>Tether</h3>
<pre id="log"></pre>
<script>
function log(line) {
    document.getElementById("log").textContent += line + "\n";
}
window.addEventListener("webview_message", function(event, data) {
    document.title = "Tether (" + event + " " + data + ")";
});
window.addEventListener("load", function() {
    add(2, 40).then(function(r) { log("add(2, 40) = " + r); });
    sum(1, 2, 3, 4).then(function(r) { log("sum(1, 2, 3, 4) = " + r); });
    divide(1, 0).catch(function(e) { log("divide(1, 0) failed: " + e); });
    window.SendEvent("FILE_READ", JSON.stringify({ file: "Cargo.toml", base64: false }))
        .then(function(data) {
            var reply = JSON.parse(data);
            if (reply.error) {
                return log("FILE_READ failed: " + reply.message);
            }
            log("FILE_READ: " + reply.fileContents.length + " bytes");
        });
});
</script>
</body>
</html>
"#;

pub fn add(a: f64, b: f64) -> f64 {
    a + b
}

pub fn sum(values: Vec<f64>) -> f64 {
    values.iter().sum()
}

pub fn divide(a: f64, b: f64) -> Result<f64, String> {
    if b == 0.0 {
        return Err("division by zero".to_string());
    }
    Ok(a / b)
}

/// Bind the sample functions, register `FILE_READ` and start the ticker.
pub fn install(bridge: &Arc<Bridge>, proxy: &EngineProxy) -> Result<(), TetherError> {
    bridge.bind("add", add)?;
    bridge.bind("sum", variadic(sum))?;
    bridge.bind("divide", divide)?;

    let window = proxy.clone();
    bridge.bind("setTitle", move |title: String| window.set_title(title))?;
    let window = proxy.clone();
    bridge.bind("quit", move || window.terminate())?;

    bridge.init_message_handler()?;
    bridge.add_message_handler("FILE_READ", file_read);

    start_ticker(Arc::clone(bridge), TICK_INTERVAL)?;
    info!("Demo bindings installed");
    Ok(())
}

#[derive(Debug, Deserialize)]
struct FileReadRequest {
    file: String,
    #[serde(default)]
    base64: bool,
}

/// `FILE_READ` handler: `{file, base64}` in, `{fileContents}` or
/// `{error, message}` out.
pub fn file_read(_event: &str, data: &str) -> String {
    let reply = match read_requested_file(data) {
        Ok(contents) => json!({ "fileContents": contents }),
        Err(message) => json!({ "error": true, "message": message }),
    };
    reply.to_string()
}

fn read_requested_file(data: &str) -> Result<String, String> {
    let request: FileReadRequest =
        serde_json::from_str(data).map_err(|e| format!("invalid FILE_READ request: {e}"))?;
    let path = expand_home(&request.file);
    debug!(path = %path.display(), base64 = request.base64, "FILE_READ");

    let bytes = std::fs::read(&path).map_err(|e| format!("{}: {e}", path.display()))?;
    if request.base64 {
        return Ok(base64::engine::general_purpose::STANDARD.encode(bytes));
    }
    String::from_utf8(bytes)
        .map_err(|_| format!("{} is not valid UTF-8, request base64", path.display()))
}

fn expand_home(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}

/// Push a `tick` message to the page every `interval`, going through the
/// dispatch queue so the message is sent from the engine thread.
fn start_ticker(bridge: Arc<Bridge>, interval: Duration) -> Result<(), TetherError> {
    thread::Builder::new()
        .name("tether-ticker".into())
        .spawn(move || {
            let mut count: u64 = 0;
            loop {
                thread::sleep(interval);
                count += 1;
                let target = Arc::clone(&bridge);
                bridge.post(move || target.send_message("tick", &count.to_string()));
            }
        })?;
    Ok(())
}
