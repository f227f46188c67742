use std::collections::BTreeMap;

use crate::response::Response;

/// Query parameters of a GET request.
pub type Params = BTreeMap<String, String>;

/// What is known about the peer of the connection carrying the request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthContext {
    /// Authenticated peer identity, if the transport established one.
    pub peer: Option<String>,
}

impl AuthContext {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn for_peer(peer: impl Into<String>) -> Self {
        Self {
            peer: Some(peer.into()),
        }
    }
}

/// Transport-neutral GET endpoint returning JSON (or another content type).
///
/// Implementations must be safe to call from any server thread.
pub trait JsonGetHandler: Send + Sync + 'static {
    fn get(&self, host: &str, path: &str, params: &Params, auth: &AuthContext) -> Response;
}
