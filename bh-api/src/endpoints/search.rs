//! Entity search endpoints.
//!
//! Most entities are searched with a Lucene expression through
//! `search/{Entity}?query=`. Entities that are not indexed for search
//! (`CorporateUser`) go through `query/{Entity}?where=` with a JPQL-style
//! expression instead. Both return the same list envelope.

use std::str::FromStr;

use serde::Serialize;
use tracing::debug;

use bh_core::error::{BhError, BhResult};
use crate::client::ApiClient;
use crate::response::{ListResponse, SearchResult};

/// Bullhorn entity types reachable through this client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum EntityType {
    Candidate,
    ClientContact,
    ClientCorporation,
    CorporateUser,
    JobOrder,
    JobSubmission,
    Placement,
}

/// Which list endpoint an entity is reached through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListEndpoint {
    /// `search/{Entity}?query=<lucene>`
    Search,
    /// `query/{Entity}?where=<jpql>`
    Query,
}

impl ListEndpoint {
    fn path(&self) -> &'static str {
        match self {
            ListEndpoint::Search => "search",
            ListEndpoint::Query => "query",
        }
    }

    fn filter_param(&self) -> &'static str {
        match self {
            ListEndpoint::Search => "query",
            ListEndpoint::Query => "where",
        }
    }
}

impl EntityType {
    /// Every supported entity type.
    pub const ALL: &'static [EntityType] = &[
        EntityType::Candidate,
        EntityType::ClientContact,
        EntityType::ClientCorporation,
        EntityType::CorporateUser,
        EntityType::JobOrder,
        EntityType::JobSubmission,
        EntityType::Placement,
    ];

    /// Entity name as used in REST paths.
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::Candidate => "Candidate",
            EntityType::ClientContact => "ClientContact",
            EntityType::ClientCorporation => "ClientCorporation",
            EntityType::CorporateUser => "CorporateUser",
            EntityType::JobOrder => "JobOrder",
            EntityType::JobSubmission => "JobSubmission",
            EntityType::Placement => "Placement",
        }
    }

    pub fn list_endpoint(&self) -> ListEndpoint {
        match self {
            EntityType::CorporateUser => ListEndpoint::Query,
            _ => ListEndpoint::Search,
        }
    }
}

impl std::fmt::Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityType {
    type Err = BhError;

    /// Case-insensitive; also accepts the plural and the short names
    /// `job`/`jobs` and `submission`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['_', '-'], "");
        let entity = match normalized.strip_suffix('s').unwrap_or(normalized.as_str()) {
            "candidate" => EntityType::Candidate,
            "clientcontact" | "contact" => EntityType::ClientContact,
            "clientcorporation" | "corporation" | "company" => EntityType::ClientCorporation,
            "corporateuser" | "user" => EntityType::CorporateUser,
            "joborder" | "job" => EntityType::JobOrder,
            "jobsubmission" | "submission" => EntityType::JobSubmission,
            "placement" => EntityType::Placement,
            _ => match normalized.as_str() {
                "companies" => EntityType::ClientCorporation,
                _ => return Err(BhError::Config(format!("unknown entity type: {s}"))),
            },
        };
        Ok(entity)
    }
}

/// A search or query request.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuery {
    pub entity: EntityType,
    /// Lucene (`search`) or where-clause (`query`) expression.
    pub filter: String,
    /// Requested fields in order. Empty means `id` only.
    pub fields: Vec<String>,
    /// Maximum records to return.
    pub count: Option<u32>,
    /// Offset of the first record.
    pub start: Option<u32>,
}

impl SearchQuery {
    pub fn new<S: AsRef<str>>(entity: EntityType, filter: &str, fields: &[S]) -> Self {
        Self {
            entity,
            filter: filter.to_string(),
            fields: fields.iter().map(|f| f.as_ref().trim().to_string()).collect(),
            count: None,
            start: None,
        }
    }

    pub fn with_count(mut self, count: u32) -> Self {
        self.count = Some(count);
        self
    }

    pub fn with_start(mut self, start: u32) -> Self {
        self.start = Some(start);
        self
    }

    /// The field list actually sent, with the `id` default applied.
    pub fn effective_fields(&self) -> Vec<String> {
        let fields: Vec<String> = self
            .fields
            .iter()
            .filter(|f| !f.is_empty())
            .cloned()
            .collect();
        if fields.is_empty() {
            vec!["id".to_string()]
        } else {
            fields
        }
    }

    fn params(&self, fields: &[String]) -> Vec<(&'static str, String)> {
        let endpoint = self.entity.list_endpoint();
        let mut params = vec![
            (endpoint.filter_param(), self.filter.clone()),
            ("fields", fields.join(",")),
        ];
        if let Some(count) = self.count {
            params.push(("count", count.to_string()));
        }
        if let Some(start) = self.start {
            params.push(("start", start.to_string()));
        }
        params
    }
}

impl ApiClient {
    /// Run a search or query and return the validated, projected records.
    pub async fn search(&self, query: &SearchQuery) -> BhResult<SearchResult> {
        let fields = query.effective_fields();
        let endpoint = query.entity.list_endpoint();
        let route = self.route(
            &[endpoint.path(), query.entity.as_str()],
            &query.params(&fields),
        )?;

        let list: ListResponse = self.get_json(&route).await?;
        let result = SearchResult::from_list(list, &fields);
        debug!("{} returned {} record(s)", route.key(), result.len());
        Ok(result)
    }

    async fn search_entity<S: AsRef<str>>(
        &self,
        entity: EntityType,
        filter: &str,
        fields: &[S],
    ) -> BhResult<SearchResult> {
        self.search(&SearchQuery::new(entity, filter, fields)).await
    }

    /// Search candidates with a Lucene expression.
    pub async fn get_candidates<S: AsRef<str>>(
        &self,
        query: &str,
        fields: &[S],
    ) -> BhResult<SearchResult> {
        self.search_entity(EntityType::Candidate, query, fields).await
    }

    /// Search jobs (`JobOrder`) with a Lucene expression.
    pub async fn get_jobs<S: AsRef<str>>(&self, query: &str, fields: &[S]) -> BhResult<SearchResult> {
        self.get_job_orders(query, fields).await
    }

    /// Search job orders with a Lucene expression.
    pub async fn get_job_orders<S: AsRef<str>>(
        &self,
        query: &str,
        fields: &[S],
    ) -> BhResult<SearchResult> {
        self.search_entity(EntityType::JobOrder, query, fields).await
    }

    /// Search placements with a Lucene expression.
    pub async fn get_placements<S: AsRef<str>>(
        &self,
        query: &str,
        fields: &[S],
    ) -> BhResult<SearchResult> {
        self.search_entity(EntityType::Placement, query, fields).await
    }

    /// Search client contacts with a Lucene expression.
    pub async fn get_client_contacts<S: AsRef<str>>(
        &self,
        query: &str,
        fields: &[S],
    ) -> BhResult<SearchResult> {
        self.search_entity(EntityType::ClientContact, query, fields).await
    }

    /// Search client corporations with a Lucene expression.
    pub async fn get_client_corporations<S: AsRef<str>>(
        &self,
        query: &str,
        fields: &[S],
    ) -> BhResult<SearchResult> {
        self.search_entity(EntityType::ClientCorporation, query, fields).await
    }

    /// Search job submissions with a Lucene expression.
    pub async fn get_job_submissions<S: AsRef<str>>(
        &self,
        query: &str,
        fields: &[S],
    ) -> BhResult<SearchResult> {
        self.search_entity(EntityType::JobSubmission, query, fields).await
    }

    /// Query corporate users with a where-clause such as `isDeleted=false`.
    pub async fn get_corporate_users<S: AsRef<str>>(
        &self,
        where_clause: &str,
        fields: &[S],
    ) -> BhResult<SearchResult> {
        self.search_entity(EntityType::CorporateUser, where_clause, fields).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_type_parse() {
        assert_eq!("candidates".parse::<EntityType>().unwrap(), EntityType::Candidate);
        assert_eq!("Jobs".parse::<EntityType>().unwrap(), EntityType::JobOrder);
        assert_eq!("job_order".parse::<EntityType>().unwrap(), EntityType::JobOrder);
        assert_eq!("companies".parse::<EntityType>().unwrap(), EntityType::ClientCorporation);
        assert_eq!("submissions".parse::<EntityType>().unwrap(), EntityType::JobSubmission);
        assert!("widget".parse::<EntityType>().is_err());
        assert!("candidatesss".parse::<EntityType>().is_err());
        assert!("placementss".parse::<EntityType>().is_err());
        for entity in EntityType::ALL {
            assert_eq!(entity.as_str().parse::<EntityType>().unwrap(), *entity);
        }
    }

    #[test]
    fn test_corporate_user_uses_query_endpoint() {
        assert_eq!(EntityType::CorporateUser.list_endpoint(), ListEndpoint::Query);
        assert_eq!(EntityType::Placement.list_endpoint(), ListEndpoint::Search);

        let q = SearchQuery::new(EntityType::CorporateUser, "isDeleted=false", &["id"]);
        let params = q.params(&q.effective_fields());
        assert_eq!(params[0], ("where", "isDeleted=false".to_string()));
    }

    #[test]
    fn test_search_query_params() {
        let q = SearchQuery::new(
            EntityType::Placement,
            "dateLastModified:{2023/01/01 TO *}",
            &["id", " fee "],
        )
        .with_count(50)
        .with_start(100);
        let params = q.params(&q.effective_fields());
        assert_eq!(
            params,
            vec![
                ("query", "dateLastModified:{2023/01/01 TO *}".to_string()),
                ("fields", "id,fee".to_string()),
                ("count", "50".to_string()),
                ("start", "100".to_string()),
            ]
        );
    }

    #[test]
    fn test_empty_fields_default_to_id() {
        let q = SearchQuery::new::<&str>(EntityType::Candidate, "id:1", &[]);
        assert_eq!(q.effective_fields(), vec!["id".to_string()]);
    }
}
