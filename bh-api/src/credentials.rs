//! Session credentials.
//!
//! A `Credentials` value is validated once at construction and never changes
//! afterwards; the client only ever reads it.

use reqwest::header::HeaderValue;
use reqwest::Url;

use bh_core::config::{AppConfig, BullhornConfig};
use bh_core::constants;
use bh_core::error::{BhError, BhResult};

/// Bullhorn session token plus the REST endpoint it is valid for.
#[derive(Clone)]
pub struct Credentials {
    token: String,
    header: HeaderValue,
    rest_url: Url,
}

impl Credentials {
    /// Validate and build credentials.
    ///
    /// Fails with `AuthFailed` when the token is empty or cannot be sent as
    /// a header, and with `Config` when the REST URL is not an absolute
    /// http(s) URL.
    pub fn new(token: impl Into<String>, rest_url: &str) -> BhResult<Self> {
        let token: String = token.into();
        let token = token.trim().to_string();
        if token.is_empty() {
            return Err(BhError::AuthFailed("session token is empty".into()));
        }

        let mut header = HeaderValue::from_str(&token).map_err(|_| {
            BhError::AuthFailed("session token contains characters not allowed in a header".into())
        })?;
        header.set_sensitive(true);

        let sanitized = AppConfig::sanitize_rest_url(rest_url);
        if sanitized.is_empty() {
            return Err(BhError::MissingConfig("REST URL".into()));
        }
        let rest_url = Url::parse(&sanitized)
            .map_err(|e| BhError::Config(format!("invalid REST URL {sanitized:?}: {e}")))?;
        if !matches!(rest_url.scheme(), "http" | "https") || rest_url.cannot_be_a_base() {
            return Err(BhError::Config(format!(
                "REST URL must be an http(s) base URL, got {sanitized:?}"
            )));
        }

        Ok(Self { token, header, rest_url })
    }

    /// Build credentials from the `[bullhorn]` config section.
    pub fn from_config(config: &BullhornConfig) -> BhResult<Self> {
        Self::new(config.session_token.as_str(), &config.rest_url)
    }

    /// Build credentials from `BULLHORN_SESSION_TOKEN` and `BULLHORN_REST_URL`.
    pub fn from_env() -> BhResult<Self> {
        let token = std::env::var(constants::ENV_SESSION_TOKEN)
            .map_err(|_| BhError::MissingConfig(constants::ENV_SESSION_TOKEN.into()))?;
        let rest_url = std::env::var(constants::ENV_REST_URL)
            .map_err(|_| BhError::MissingConfig(constants::ENV_REST_URL.into()))?;
        Self::new(token, &rest_url)
    }

    /// The raw session token.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// The token as a header value marked sensitive.
    pub(crate) fn header_value(&self) -> &HeaderValue {
        &self.header
    }

    /// The normalized REST base URL (always ends with `/`).
    pub fn rest_url(&self) -> &Url {
        &self.rest_url
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("token", &"<redacted>")
            .field("rest_url", &self.rest_url.as_str())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOKEN: &str = "12345_1234567_a12345bc-123a-45bc-67de-12345678910a";

    #[test]
    fn test_new_normalizes_url() {
        let creds = Credentials::new(
            TOKEN,
            "https://rest123.bullhornstaffing.com/rest-services/1234",
        )
        .unwrap();
        assert_eq!(
            creds.rest_url().as_str(),
            "https://rest123.bullhornstaffing.com/rest-services/1234/"
        );
        assert_eq!(creds.token(), TOKEN);
        assert!(creds.header_value().is_sensitive());
    }

    #[test]
    fn test_uppercase_scheme_is_accepted() {
        let creds = Credentials::new(TOKEN, "HTTPS://rest.bullhornstaffing.com/rest-services/x").unwrap();
        assert_eq!(creds.rest_url().as_str(), "https://rest.bullhornstaffing.com/rest-services/x/");
    }

    #[test]
    fn test_empty_token_is_auth_error() {
        let err = Credentials::new("  ", "https://rest.bullhornstaffing.com/").unwrap_err();
        assert!(matches!(err, BhError::AuthFailed(_)));
    }

    #[test]
    fn test_token_with_newline_is_auth_error() {
        let err = Credentials::new("abc\ndef", "https://rest.bullhornstaffing.com/").unwrap_err();
        assert!(matches!(err, BhError::AuthFailed(_)));
    }

    #[test]
    fn test_bad_url_is_config_error() {
        assert!(matches!(
            Credentials::new(TOKEN, "").unwrap_err(),
            BhError::MissingConfig(_)
        ));
        assert!(matches!(
            Credentials::new(TOKEN, "https://exa mple.com/").unwrap_err(),
            BhError::Config(_)
        ));
    }

    #[test]
    fn test_debug_hides_token() {
        let creds = Credentials::new(TOKEN, "https://rest.bullhornstaffing.com/").unwrap();
        assert!(!format!("{creds:?}").contains(TOKEN));
    }
}
