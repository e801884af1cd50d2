//! URL policy: canonical widget URL construction, the navigation guard and
//! the pop-out gating rules.
//!
//! The widget and pop-out windows load remote, loosely-trusted content, so
//! every navigation or window-open attempt is checked here before the
//! platform is allowed to act on it. The rules are deliberately exact-match:
//! the widget may only ever display its original URL, and the pop-out may
//! only open the call-scoped pop-out page on the same server.

use thiserror::Error;
use url::Url;

use crate::constants::{CALLS_PLUGIN_ID, POPOUT_PAGE, WIDGET_PAGE};
use crate::session::CallSession;

#[derive(Debug, Error)]
pub enum PolicyError {
    /// The configured server URL cannot carry path segments (e.g. `data:`).
    #[error("server URL cannot host plugin routes: {0}")]
    UnroutableServerUrl(Url),
}

/// Appends `plugins/<plugin-id>/<page...>` to the server base URL, keeping
/// any subpath the server is mounted under.
fn plugin_route(server_base: &Url, page: &str) -> Result<Url, PolicyError> {
    let mut url = server_base.clone();
    {
        let mut segments = url
            .path_segments_mut()
            .map_err(|_| PolicyError::UnroutableServerUrl(server_base.clone()))?;
        segments.pop_if_empty();
        segments.extend(["plugins", CALLS_PLUGIN_ID]);
        segments.extend(page.split('/'));
    }
    url.set_query(None);
    url.set_fragment(None);
    Ok(url)
}

/// Builds the canonical widget URL for a session:
/// `<server-base>/plugins/<plugin-id>/standalone/widget.html` with `call_id`
/// and the optional `title` / `root_id` query parameters.
pub fn widget_url(server_base: &Url, session: &CallSession) -> Result<Url, PolicyError> {
    let mut url = plugin_route(server_base, WIDGET_PAGE)?;
    {
        let mut query = url.query_pairs_mut();
        query.append_pair("call_id", &session.call_id);
        if let Some(title) = &session.title {
            query.append_pair("title", title);
        }
        if let Some(root_id) = &session.root_id {
            query.append_pair("root_id", root_id);
        }
    }
    Ok(url)
}

/// Builds the canonical pop-out URL for a call:
/// `<server-base>/plugins/<plugin-id>/expanded/<call_id>`.
pub fn popout_url(server_base: &Url, call_id: &str) -> Result<Url, PolicyError> {
    let mut url = plugin_route(server_base, POPOUT_PAGE)?;
    url.path_segments_mut()
        .map_err(|_| PolicyError::UnroutableServerUrl(server_base.clone()))?
        .push(call_id);
    Ok(url)
}

/// Navigation guard for the widget window: only the original widget URL is
/// ever allowed again, query parameters included. Unparseable targets are
/// denied.
pub fn navigation_allowed(canonical: &Url, target: &str) -> bool {
    match Url::parse(target) {
        Ok(parsed) => parsed == *canonical,
        Err(_) => false,
    }
}

/// Pop-out gate: the target must parse, share the server's origin and match
/// the pop-out path for the active call. Query parameters are tolerated;
/// anything else is denied.
pub fn popout_allowed(server_base: &Url, call_id: &str, target: &str) -> bool {
    let Ok(parsed) = Url::parse(target) else {
        return false;
    };
    let Ok(expected) = popout_url(server_base, call_id) else {
        return false;
    };
    parsed.origin() == expected.origin() && parsed.path() == expected.path()
}
