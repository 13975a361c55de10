//! Single-entity command.

use bh_api::{parse_fields, ApiClient, EntityType};
use bh_core::error::BhResult;
use crate::OutputFormat;

/// Fetch one entity and print it.
pub async fn run(
    api: &ApiClient,
    entity: EntityType,
    id: i64,
    fields: &str,
    format: OutputFormat,
) -> BhResult<()> {
    let fields = parse_fields(fields);
    let record = api.get_entity(entity, id, &fields).await?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
        OutputFormat::Text => {
            let fields = if fields.is_empty() { vec!["id".to_string()] } else { fields };
            println!("{}", super::records_table(&[record], &fields));
        }
    }

    Ok(())
}
