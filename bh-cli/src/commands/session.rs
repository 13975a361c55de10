//! Session commands - ping and settings.

use console::style;

use bh_api::{parse_fields, ApiClient};
use bh_core::error::BhResult;
use crate::OutputFormat;

/// Check the session and print its expiry.
pub async fn ping(api: &ApiClient, format: OutputFormat) -> BhResult<()> {
    let start = std::time::Instant::now();
    let ping = api.ping().await?;
    let elapsed = start.elapsed();
    let expires = ping
        .expires_at()
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string());

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::json!({
                "session_expires": ping.session_expires,
                "expires_at": expires,
                "latency_ms": elapsed.as_millis(),
            }));
        }
        OutputFormat::Text => {
            println!("  {} ({}ms)", style("Session valid").green().bold(), elapsed.as_millis());
            println!("  Expires: {}", expires.as_deref().unwrap_or("unknown"));
            println!("  REST URL: {}", api.credentials().rest_url());
        }
    }

    Ok(())
}

/// Print the requested settings.
pub async fn settings(api: &ApiClient, names: &str, format: OutputFormat) -> BhResult<()> {
    let names = parse_fields(names);
    let settings = api.get_settings(&names).await?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&settings)?);
        }
        OutputFormat::Text => {
            for (name, value) in &settings {
                println!("  {:<24} {}", style(name).bold(), super::format_value(value));
            }
        }
    }

    Ok(())
}
