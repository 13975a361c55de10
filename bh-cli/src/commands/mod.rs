//! CLI command implementations.

pub mod entity;
pub mod search;
pub mod session;

use comfy_table::{Table, presets::UTF8_FULL, modifiers::UTF8_ROUND_CORNERS, ContentArrangement};

use bh_api::response::field_name;
use bh_api::{ApiClient, Record};
use bh_core::config::AppConfig;
use bh_core::error::{BhError, BhResult};

/// Helper to create an API client from config.
pub fn create_api_client(config: &AppConfig) -> BhResult<ApiClient> {
    if !config.is_configured() {
        return Err(BhError::MissingConfig(format!(
            "set {} and {} or add them to {}",
            bh_core::constants::ENV_SESSION_TOKEN,
            bh_core::constants::ENV_REST_URL,
            AppConfig::default_config_path()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|_| "config.toml".to_string()),
        )));
    }
    ApiClient::from_app_config(config)
}

/// Render records as a table with one column per requested field.
pub fn records_table(records: &[Record], fields: &[String]) -> Table {
    let columns: Vec<&str> = if fields.iter().any(|f| f == "*") {
        let mut keys: Vec<&str> = Vec::new();
        for key in records.iter().flat_map(|r| r.keys()) {
            if !keys.contains(&key.as_str()) {
                keys.push(key);
            }
        }
        keys
    } else {
        fields.iter().map(|f| field_name(f)).collect()
    };

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(columns.clone());

    for record in records {
        table.add_row(
            columns
                .iter()
                .map(|c| record.get(*c).map(format_value).unwrap_or_else(|| "-".to_string()))
                .collect::<Vec<_>>(),
        );
    }
    table
}

/// Format a JSON value for a table cell.
pub fn format_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Null => "-".to_string(),
        serde_json::Value::String(s) => truncate(s, 60),
        other => truncate(&other.to_string(), 60),
    }
}

/// Truncate a string to a maximum number of characters, appending an ellipsis if truncated.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len > 3 {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{head}...")
    } else {
        s.chars().take(max_len).collect()
    }
}
