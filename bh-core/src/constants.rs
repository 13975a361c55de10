//! Library-wide constants.

/// Library name used in the user agent and data directories.
pub const APP_NAME: &str = "Bullhorn";

/// Library version.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Project homepage advertised in the user agent.
pub const PROJECT_URL: &str = "https://github.com/recruithub/bullhorn";

/// Header carrying the Bullhorn session token.
pub const REST_TOKEN_HEADER: &str = "BhRestToken";

/// Environment variable holding the session token.
pub const ENV_SESSION_TOKEN: &str = "BULLHORN_SESSION_TOKEN";

/// Environment variable holding the REST endpoint URL.
pub const ENV_REST_URL: &str = "BULLHORN_REST_URL";

/// Default per-attempt request timeout in milliseconds.
pub const DEFAULT_API_TIMEOUT_MS: u64 = 30_000;

/// Default number of attempts per call, including the first one.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Default delay before the first retry in milliseconds.
pub const DEFAULT_RETRY_BASE_DELAY_MS: u64 = 1_000;

/// Default cap on the delay between attempts in milliseconds.
pub const DEFAULT_RETRY_MAX_DELAY_MS: u64 = 8_000;

/// Field list wildcard understood by the Bullhorn REST API.
pub const ALL_FIELDS: &str = "*";
