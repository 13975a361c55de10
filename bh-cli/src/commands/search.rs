//! Search commands.

use clap::Args;
use console::style;

use bh_api::{parse_fields, ApiClient, EntityType, SearchQuery};
use bh_core::error::BhResult;
use crate::OutputFormat;

/// Arguments shared by every search command.
#[derive(Args, Debug, Clone)]
pub struct SearchArgs {
    /// Lucene filter expression (a where-clause for corporate users).
    #[arg(short, long)]
    pub query: String,
    /// Comma-separated field list, e.g. "id,firstName,owner(id,name)".
    #[arg(long, default_value = "id")]
    pub fields: String,
    /// Maximum number of records to return.
    #[arg(short = 'n', long)]
    pub count: Option<u32>,
    /// Offset of the first record.
    #[arg(long)]
    pub start: Option<u32>,
}

impl SearchArgs {
    fn to_query(&self, entity: EntityType) -> SearchQuery {
        let mut query = SearchQuery::new(entity, &self.query, &parse_fields(&self.fields));
        query.count = self.count;
        query.start = self.start;
        query
    }
}

/// Run a search for `entity` and print the records.
pub async fn run(
    api: &ApiClient,
    entity: EntityType,
    args: SearchArgs,
    format: OutputFormat,
) -> BhResult<()> {
    let query = args.to_query(entity);
    let result = api.search(&query).await?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        OutputFormat::Text => {
            if result.is_empty() {
                println!("No {} records match {}", entity, style(&query.filter).cyan());
            } else {
                let table = super::records_table(&result.records, &query.effective_fields());
                println!("{table}");
                match result.total {
                    Some(total) => println!("\n{} of {} {} record(s) shown", result.len(), total, entity),
                    None => println!("\n{} {} record(s) shown", result.len(), entity),
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_to_query() {
        let args = SearchArgs {
            query: "status:Approved".into(),
            fields: "id, candidate(id,firstName),fee".into(),
            count: Some(10),
            start: None,
        };
        let query = args.to_query(EntityType::Placement);
        assert_eq!(query.fields, vec!["id", "candidate(id,firstName)", "fee"]);
        assert_eq!(query.count, Some(10));
        assert_eq!(query.entity, EntityType::Placement);
    }
}
