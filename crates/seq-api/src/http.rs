use std::sync::Arc;

use axum::{
    Router,
    extract::{Query, State},
    http::{HeaderMap, StatusCode, Uri, header},
    response::IntoResponse,
    routing::get,
};
use tracing::debug;

use crate::{
    handler::{AuthContext, JsonGetHandler, Params},
    response::Response,
};

/// Serves a [`JsonGetHandler`] over HTTP.
pub struct HttpApi<H> {
    handler: Arc<H>,
}

impl<H> HttpApi<H>
where
    H: JsonGetHandler,
{
    pub fn new(handler: Arc<H>) -> Self {
        Self { handler }
    }

    /// Build an axum router answering GET on `prefix` and every path below it.
    ///
    /// `prefix` must start with `/` and have no trailing slash.
    pub fn router(self, prefix: &str) -> Router {
        Router::new()
            .route(prefix, get(serve::<H>))
            .route(&format!("{prefix}/{{*rest}}"), get(serve::<H>))
            .with_state(self.handler)
    }
}

async fn serve<H>(
    State(handler): State<Arc<H>>,
    headers: HeaderMap,
    uri: Uri,
    Query(params): Query<Params>,
) -> Response
where
    H: JsonGetHandler,
{
    let host = headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    debug!(host, path = uri.path(), "GET");
    handler.get(host, uri.path(), &params, &AuthContext::anonymous())
}

impl IntoResponse for Response {
    fn into_response(self) -> axum::response::Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if self.ok() {
            (
                status,
                [(header::CONTENT_TYPE, self.content_type().to_string())],
                self.payload().to_string(),
            )
                .into_response()
        } else {
            (status, self.status_message().to_string()).into_response()
        }
    }
}
