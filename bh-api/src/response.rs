//! Response envelopes and shape validation.
//!
//! Bullhorn list endpoints (`search/*`, `query/*`) answer with
//! ```json
//! { "total": 2, "start": 0, "count": 2, "data": [ { "id": 1 }, { "id": 2 } ] }
//! ```
//! and single-entity endpoints with `{ "data": { ... } }`. Anything that does
//! not deserialize into these shapes is rejected as a validation error.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use bh_core::constants;
use bh_core::error::{BhError, BhResult};

/// One entity record as returned by the API.
pub type Record = serde_json::Map<String, serde_json::Value>;

/// Envelope returned by `search/{Entity}` and `query/{Entity}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListResponse {
    /// Total number of matches (search only).
    #[serde(default)]
    pub total: Option<i64>,
    /// Offset of the first returned record.
    #[serde(default)]
    pub start: Option<i64>,
    /// Number of records in this page.
    #[serde(default)]
    pub count: Option<i64>,
    /// The records collection. Required.
    pub data: Vec<Record>,
}

/// Envelope returned by `entity/{Entity}/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityResponse {
    pub data: Record,
}

/// Result of a search or query call.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchResult {
    pub total: Option<i64>,
    pub start: Option<i64>,
    pub count: Option<i64>,
    pub records: Vec<Record>,
}

impl SearchResult {
    /// Build a result from a list envelope, keeping only `fields` in each record.
    pub fn from_list(list: ListResponse, fields: &[String]) -> Self {
        Self {
            total: list.total,
            start: list.start,
            count: list.count,
            records: list
                .data
                .into_iter()
                .map(|r| project_record(r, fields))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Response of `ping`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ping {
    /// Session expiry in milliseconds since the epoch.
    #[serde(rename = "sessionExpires")]
    pub session_expires: i64,
}

impl Ping {
    /// Session expiry as a timestamp.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.session_expires)
    }
}

/// Error body returned with non-2xx statuses.
///
/// Bullhorn itself sends `errorMessage` / `errorCode`; proxies and older
/// endpoints use `message` / `code` with an optional nested `errors` map.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(alias = "errorMessage", default)]
    pub message: Option<String>,
    #[serde(alias = "errorCode", default)]
    pub code: Option<i64>,
    #[serde(rename = "errorMessageKey", default)]
    pub message_key: Option<String>,
    #[serde(default)]
    pub errors: Option<serde_json::Value>,
}

impl ErrorBody {
    /// Parse an error body. An empty body parses to an empty `ErrorBody`;
    /// anything else must be a JSON object or the call fails with
    /// `Validation`.
    pub fn parse(body: &str) -> BhResult<Self> {
        if body.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_str::<ErrorBody>(body).map_err(|e| {
            BhError::Validation(format!("unexpected error response body: {e}"))
        })
    }

    /// Error code, 0 when the server did not send one.
    pub fn code(&self) -> i64 {
        self.code.unwrap_or(0)
    }

    /// Human-readable text including any flattened field errors.
    pub fn text(&self) -> String {
        let mut text = self
            .message
            .clone()
            .or_else(|| self.message_key.clone())
            .unwrap_or_default();

        if let Some(serde_json::Value::Object(errors)) = &self.errors {
            let lines: Vec<String> = flatten_errors(errors, "")
                .into_iter()
                .map(|(path, msg)| format!("In {path}: {msg}"))
                .collect();
            if !lines.is_empty() {
                if !text.is_empty() {
                    text.push('\n');
                }
                text.push_str(&lines.join("\n"));
            }
        }
        text
    }
}

/// Flatten a nested error map into `(dotted.path, message)` pairs.
///
/// A node carrying an `_errors` array is a leaf; its messages are joined
/// with spaces.
pub fn flatten_errors(errors: &Record, prefix: &str) -> Vec<(String, String)> {
    let mut items = Vec::new();
    for (key, value) in errors {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match value {
            serde_json::Value::Object(inner) => match inner.get("_errors") {
                Some(serde_json::Value::Array(leaf)) => {
                    let msg = leaf
                        .iter()
                        .filter_map(|e| e.get("message").and_then(|m| m.as_str()))
                        .collect::<Vec<_>>()
                        .join(" ");
                    items.push((path, msg));
                }
                _ => items.extend(flatten_errors(inner, &path)),
            },
            serde_json::Value::String(s) => items.push((path, s.clone())),
            other => items.push((path, other.to_string())),
        }
    }
    items
}

/// Deserialize a success body, mapping any mismatch to `BhError::Validation`.
pub fn parse_body<T: DeserializeOwned>(body: &str) -> BhResult<T> {
    serde_json::from_str(body).map_err(|e| {
        BhError::Validation(format!("unexpected response body: {e}"))
    })
}

/// Top-level name of a field selector: `owner(id,name)` selects `owner`.
pub fn field_name(selector: &str) -> &str {
    selector.split('(').next().unwrap_or(selector).trim()
}

/// Keep only the requested top-level fields of a record.
///
/// The `*` wildcard keeps everything.
pub fn project_record(record: Record, fields: &[String]) -> Record {
    if fields.iter().any(|f| f.trim() == constants::ALL_FIELDS) {
        return record;
    }
    record
        .into_iter()
        .filter(|(key, _)| fields.iter().any(|f| field_name(f) == key.as_str()))
        .collect()
}

/// Split a comma-separated field list, respecting nested parentheses.
///
/// `"id,owner(id,name),status"` yields `["id", "owner(id,name)", "status"]`.
pub fn parse_fields(list: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut depth = 0usize;
    let mut current = String::new();
    for ch in list.chars() {
        match ch {
            '(' => {
                depth += 1;
                current.push(ch);
            }
            ')' => {
                depth = depth.saturating_sub(1);
                current.push(ch);
            }
            ',' if depth == 0 => {
                fields.push(std::mem::take(&mut current));
            }
            _ => current.push(ch),
        }
    }
    fields.push(current);
    fields
        .into_iter()
        .map(|f| f.trim().to_string())
        .filter(|f| !f.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_list_response_requires_data() {
        assert!(parse_body::<ListResponse>(r#"{"total":0,"start":0,"count":0,"data":[]}"#).is_ok());
        assert!(matches!(
            parse_body::<ListResponse>(r#"{"total":1}"#),
            Err(BhError::Validation(_))
        ));
        assert!(matches!(
            parse_body::<ListResponse>(r#"{"data":[1,2]}"#),
            Err(BhError::Validation(_))
        ));
        assert!(matches!(
            parse_body::<ListResponse>("<html>gateway</html>"),
            Err(BhError::Validation(_))
        ));
    }

    #[test]
    fn test_projection_drops_unrequested_fields() {
        let record = json!({
            "id": 1, "_score": 1.0, "firstName": "Ada", "owner": {"id": 7}, "lastName": "L"
        });
        let Some(record) = record.as_object().cloned() else {
            panic!("fixture is an object");
        };
        let projected = project_record(record, &strings(&["id", "firstName", "owner(id)"]));
        let keys: Vec<&String> = projected.keys().collect();
        assert_eq!(keys.len(), 3);
        assert!(projected.contains_key("owner"));
        assert!(!projected.contains_key("_score"));
        assert!(!projected.contains_key("lastName"));
    }

    #[test]
    fn test_projection_wildcard_keeps_all() {
        let record = json!({"id": 1, "_score": 0.5}).as_object().cloned().unwrap();
        assert_eq!(project_record(record.clone(), &strings(&["*"])), record);
    }

    #[test]
    fn test_parse_fields_nested() {
        assert_eq!(
            parse_fields("id, owner(id,name) ,status,,"),
            strings(&["id", "owner(id,name)", "status"])
        );
        assert!(parse_fields("").is_empty());
    }

    #[test]
    fn test_error_body_bullhorn_format() {
        let body = ErrorBody::parse(
            r#"{"errorMessage":"Bad 'BhRestToken' or timed-out.","errorMessageKey":"errors.authentication.invalidRestToken","errorCode":401}"#,
        )
        .unwrap();
        assert_eq!(body.code(), 401);
        assert_eq!(body.text(), "Bad 'BhRestToken' or timed-out.");
    }

    #[test]
    fn test_error_body_flattens_nested_errors() {
        let body = ErrorBody::parse(
            r#"{"code":50035,"message":"Invalid Form Body","errors":{"candidate":{"email":{"_errors":[{"code":"X","message":"not an email"}]}}}}"#,
        )
        .unwrap();
        assert_eq!(body.code(), 50035);
        assert_eq!(body.text(), "Invalid Form Body\nIn candidate.email: not an email");
    }

    #[test]
    fn test_error_body_empty_is_default() {
        let body = ErrorBody::parse(" \n").unwrap();
        assert_eq!(body.code(), 0);
        assert_eq!(body.text(), "");
    }

    #[test]
    fn test_error_body_not_json_is_validation() {
        let err = ErrorBody::parse("<html>Service Unavailable</html>").unwrap_err();
        assert!(matches!(err, BhError::Validation(_)));
        assert!(!err.is_transient());
    }

    #[test]
    fn test_ping_expiry() {
        let ping: Ping = parse_body(r#"{"sessionExpires":1700000000000}"#).unwrap();
        let expires = ping.expires_at().unwrap();
        assert_eq!(expires.timestamp(), 1_700_000_000);
    }
}
