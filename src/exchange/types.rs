use serde::{Deserialize, Serialize};

/// Body of `POST /chat`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ChatRequest {
    pub message: String,
    pub thread_id: String,
}

/// Body returned by `POST /chat`.
///
/// The backend also echoes `thread_id`; it's accepted and ignored.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct ChatResponse {
    pub response: String,
    #[serde(default)]
    pub thread_id: Option<String>,
}

/// Outcome of a single liveness probe against `GET /`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// The server answered. Carries the HTTP status code.
    Responded(u16),
    /// No HTTP response at all (refused, DNS, timeout).
    Unreachable,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_uses_backend_field_names() {
        let req = ChatRequest {
            message: "hi".to_string(),
            thread_id: "default".to_string(),
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json, serde_json::json!({"message": "hi", "thread_id": "default"}));
    }

    #[test]
    fn response_ignores_extra_fields() {
        let body = r#"{"response": "hello", "thread_id": "t1", "extra": 1}"#;
        let resp: ChatResponse = serde_json::from_str(body).unwrap();
        assert_eq!(resp.response, "hello");
        assert_eq!(resp.thread_id.as_deref(), Some("t1"));
    }

    #[test]
    fn response_without_thread_id_parses() {
        let resp: ChatResponse = serde_json::from_str(r#"{"response": "x"}"#).unwrap();
        assert_eq!(resp.thread_id, None);
    }

    #[test]
    fn response_requires_string_reply() {
        assert!(serde_json::from_str::<ChatResponse>(r#"{"response": 42}"#).is_err());
        assert!(serde_json::from_str::<ChatResponse>(r#"{"message": "x"}"#).is_err());
    }
}
