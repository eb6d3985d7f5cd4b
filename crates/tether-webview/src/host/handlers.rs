use tracing::{debug, warn};
use wry::WebViewBuilder;

use crate::events::{PageLoadState, UserEvent};
use crate::proxy::EngineProxy;
use crate::rpc::CallRequest;

pub(super) fn attach_ipc_handler<'a>(
    builder: WebViewBuilder<'a>,
    proxy: EngineProxy,
) -> WebViewBuilder<'a> {
    builder.with_ipc_handler(move |request| {
        let body = request.body();
        let Some(call) = CallRequest::from_json(body) else {
            warn!(body_len = body.len(), "IPC message rejected: not a call request");
            return;
        };
        proxy.accept_call(call);
    })
}

pub(super) fn attach_page_load_handler<'a>(
    builder: WebViewBuilder<'a>,
    proxy: EngineProxy,
) -> WebViewBuilder<'a> {
    builder.with_on_page_load_handler(move |event, url| {
        let state = PageLoadState::from(event);
        debug!(?state, url = %url, "page load event");
        // Runs before the new document's first IPC message is handled.
        if state == PageLoadState::Started {
            proxy.state().abandon_pending();
        }
        proxy.send(UserEvent::PageLoad { state, url });
    })
}
