//! Single-entity endpoint.

use bh_core::error::BhResult;
use crate::client::ApiClient;
use crate::endpoints::search::EntityType;
use crate::response::{project_record, EntityResponse, Record};

impl ApiClient {
    /// Fetch one entity by id, keeping only the requested fields.
    pub async fn get_entity<S: AsRef<str>>(
        &self,
        entity: EntityType,
        id: i64,
        fields: &[S],
    ) -> BhResult<Record> {
        let mut fields: Vec<String> = fields
            .iter()
            .map(|f| f.as_ref().trim().to_string())
            .filter(|f| !f.is_empty())
            .collect();
        if fields.is_empty() {
            fields.push("id".to_string());
        }

        let id = id.to_string();
        let route = self.route(
            &["entity", entity.as_str(), id.as_str()],
            &[("fields", fields.join(","))],
        )?;
        let resp: EntityResponse = self.get_json(&route).await?;
        Ok(project_record(resp.data, &fields))
    }
}
