//! Session and settings endpoints.

use bh_core::error::BhResult;
use crate::client::ApiClient;
use crate::response::{Ping, Record};

impl ApiClient {
    /// Ping the REST endpoint. Succeeds only while the session is valid and
    /// reports when it expires.
    pub async fn ping(&self) -> BhResult<Ping> {
        let route = self.route(&["ping"], &[])?;
        self.get_json(&route).await
    }

    /// Read corporation settings by name (e.g. `["allDeptIds", "userId"]`).
    pub async fn get_settings<S: AsRef<str>>(&self, fields: &[S]) -> BhResult<Record> {
        let names = fields
            .iter()
            .map(|f| f.as_ref().trim())
            .filter(|f| !f.is_empty())
            .collect::<Vec<_>>()
            .join(",");
        let route = self.route(&["settings", names.as_str()], &[])?;
        self.get_json(&route).await
    }
}

#[cfg(test)]
mod tests {
    use crate::response::parse_body;
    use super::*;

    #[test]
    fn test_settings_body_must_be_object() {
        assert!(parse_body::<Record>(r#"{"userId":1234,"allDeptIds":[1,2]}"#).is_ok());
        assert!(parse_body::<Record>(r#"["userId"]"#).is_err());
    }
}
