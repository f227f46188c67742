const DEFAULT_CONTENT_TYPE: &str = "application/json";

/// Result of a GET request.
///
/// A `200` carries a payload; any other status carries a status message instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    status_code: u16,
    status_or_payload: String,
    content_type_override: Option<String>,
}

impl Default for Response {
    fn default() -> Self {
        Self::make_failure(500, "Internal Server Error")
    }
}

impl Response {
    pub fn make_ok_with_json(json: impl Into<String>) -> Self {
        Self {
            status_code: 200,
            status_or_payload: json.into(),
            content_type_override: None,
        }
    }

    pub fn make_ok_with_content_type(payload: impl Into<String>, content_type: impl Into<String>) -> Self {
        Self {
            status_code: 200,
            status_or_payload: payload.into(),
            content_type_override: Some(content_type.into()),
        }
    }

    pub fn make_failure(status_code: u16, status_message: impl Into<String>) -> Self {
        Self {
            status_code,
            status_or_payload: status_message.into(),
            content_type_override: None,
        }
    }

    pub fn make_not_found() -> Self {
        Self::make_failure(404, "Not Found")
    }

    #[inline]
    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    #[inline]
    pub fn ok(&self) -> bool {
        self.status_code == 200
    }

    #[inline]
    pub fn failed(&self) -> bool {
        !self.ok()
    }

    pub fn status_message(&self) -> &str {
        if self.ok() { "OK" } else { self.status_or_payload.as_str() }
    }

    /// Body of a successful response; empty otherwise.
    pub fn payload(&self) -> &str {
        if self.ok() { self.status_or_payload.as_str() } else { "" }
    }

    pub fn content_type(&self) -> &str {
        self.content_type_override
            .as_deref()
            .unwrap_or(DEFAULT_CONTENT_TYPE)
    }
}
