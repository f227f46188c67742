use std::sync::Arc;

use serde::Serialize;
use seq_core::ExecutorStats;
use tracing::{instrument, trace};

use crate::{
    directory::ExecutorDirectory,
    error::ApiError,
    handler::{AuthContext, JsonGetHandler, Params},
    response::Response,
};

/// Root of the stats endpoints.
///
/// Routes:
/// - GET /executor/v1/stats - every registered executor
/// - GET /executor/v1/stats/{name} - one executor; `name` may be percent-encoded
///
/// `?pretty=true` indents the JSON.
pub const STATS_PATH: &str = "/executor/v1/stats";

#[derive(Debug, Serialize)]
struct StatsListResponse {
    executors: Vec<ExecutorStats>,
}

/// Serves executor stats from an [`ExecutorDirectory`].
pub struct StatsHandler {
    directory: Arc<ExecutorDirectory>,
}

impl StatsHandler {
    pub fn new(directory: Arc<ExecutorDirectory>) -> Self {
        Self { directory }
    }

    fn route(&self, path: &str, params: &Params) -> Result<Response, ApiError> {
        let pretty = match params.get("pretty").map(String::as_str) {
            None | Some("false") => false,
            Some("true") => true,
            Some(other) => {
                return Err(ApiError::InvalidRequest(format!(
                    "pretty must be true or false, got {other:?}"
                )));
            }
        };

        let Some(rest) = path.strip_prefix(STATS_PATH) else {
            return Ok(Response::make_not_found());
        };
        match rest.trim_end_matches('/') {
            "" => {
                let body = StatsListResponse {
                    executors: self.directory.stats(),
                };
                render(&body, pretty)
            }
            segment if segment.starts_with('/') && !segment[1..].contains('/') => {
                let name = urlencoding::decode(&segment[1..]).map_err(|_| {
                    ApiError::InvalidRequest(format!("executor name {segment:?} is not valid UTF-8"))
                })?;
                let executor = self
                    .directory
                    .get(&name)
                    .ok_or_else(|| ApiError::ExecutorNotFound(name.to_string()))?;
                render(&executor.stats(), pretty)
            }
            _ => Ok(Response::make_not_found()),
        }
    }
}

impl JsonGetHandler for StatsHandler {
    #[instrument(level = "trace", skip(self, params, auth), fields(peer = ?auth.peer))]
    fn get(&self, host: &str, path: &str, params: &Params, auth: &AuthContext) -> Response {
        let response = self.route(path, params).unwrap_or_else(Response::from);
        trace!(status = response.status_code(), "stats request served");
        response
    }
}

fn render<T: Serialize>(body: &T, pretty: bool) -> Result<Response, ApiError> {
    let json = if pretty {
        serde_json::to_string_pretty(body)?
    } else {
        serde_json::to_string(body)?
    };
    Ok(Response::make_ok_with_json(json))
}

#[cfg(test)]
mod tests {
    use super::*;
    use seq_core::{SequencedExecutor, Task};
    use serde_json::Value;

    fn fixture() -> (StatsHandler, Arc<SequencedExecutor>, Arc<SequencedExecutor>) {
        let directory = Arc::new(ExecutorDirectory::new());
        let feed = Arc::new(SequencedExecutor::with_limit("feed", 20).unwrap());
        let index = Arc::new(SequencedExecutor::with_limit("index", 5).unwrap());
        directory.register(&feed).unwrap();
        directory.register(&index).unwrap();
        (StatsHandler::new(directory), feed, index)
    }

    fn get(handler: &StatsHandler, path: &str, params: &[(&str, &str)]) -> Response {
        let params = params
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        handler.get("localhost", path, &params, &AuthContext::anonymous())
    }

    #[test]
    fn lists_all_executors() {
        let (handler, _feed, _index) = fixture();

        let res = get(&handler, STATS_PATH, &[]);
        assert!(res.ok());
        assert_eq!(res.content_type(), "application/json");

        let json: Value = serde_json::from_str(res.payload()).unwrap();
        let names: Vec<&str> = json["executors"]
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["feed", "index"]);
    }

    #[test]
    fn reports_single_executor() {
        let (handler, feed, _index) = fixture();
        feed.execute(Task::new(|| {}));
        feed.sync();

        let res = get(&handler, "/executor/v1/stats/feed/", &[("pretty", "true")]);
        assert!(res.ok());

        let json: Value = serde_json::from_str(res.payload()).unwrap();
        assert_eq!(json["name"], "feed");
        assert_eq!(json["taskLimit"], 32);
        assert_eq!(json["acceptedTasks"], 2);
        assert!(res.payload().contains('\n'));
    }

    #[test]
    fn percent_encoded_name_is_decoded() {
        let directory = Arc::new(ExecutorDirectory::new());
        let spaced = Arc::new(SequencedExecutor::with_limit("bulk load", 4).unwrap());
        directory.register(&spaced).unwrap();
        let handler = StatsHandler::new(directory);

        let res = get(&handler, "/executor/v1/stats/bulk%20load", &[]);
        assert!(res.ok());
        let json: Value = serde_json::from_str(res.payload()).unwrap();
        assert_eq!(json["name"], "bulk load");

        assert!(get(&handler, "/executor/v1/stats/bulk load", &[]).ok());
        assert_eq!(get(&handler, "/executor/v1/stats/bulk%FFload", &[]).status_code(), 400);
    }

    #[test]
    fn unknown_executor_is_not_found() {
        let (handler, _feed, _index) = fixture();
        let res = get(&handler, "/executor/v1/stats/missing", &[]);
        assert_eq!(res.status_code(), 404);
    }

    #[test]
    fn unknown_paths_are_not_found() {
        let (handler, _feed, _index) = fixture();
        assert_eq!(get(&handler, "/metrics", &[]).status_code(), 404);
        assert_eq!(get(&handler, "/executor/v1/statsfeed", &[]).status_code(), 404);
        assert_eq!(get(&handler, "/executor/v1/stats/feed/extra", &[]).status_code(), 404);
    }

    #[test]
    fn bad_pretty_flag_is_bad_request() {
        let (handler, _feed, _index) = fixture();
        let res = get(&handler, STATS_PATH, &[("pretty", "yes")]);
        assert_eq!(res.status_code(), 400);
        assert_eq!(res.payload(), "");
    }
}
