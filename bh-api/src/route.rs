//! Request routes.
//!
//! A `Route` pairs an HTTP method with a fully built URL. Path segments are
//! percent-encoded individually and query parameters are form-encoded, so
//! Lucene filter expressions such as `dateLastModified:{2023/01/01 TO *}`
//! can be passed through unchanged.

use reqwest::{Method, Url};

use bh_core::error::{BhError, BhResult};

/// An API route: method, relative path, and the absolute URL to call.
#[derive(Debug, Clone)]
pub struct Route {
    /// HTTP method.
    pub method: Method,
    /// Path relative to the REST base, e.g. `search/Candidate`.
    pub path: String,
    /// Absolute URL including the encoded query string.
    pub url: Url,
}

impl Route {
    /// Build a route under `base` from path segments and query parameters.
    pub fn new(
        method: Method,
        base: &Url,
        segments: &[&str],
        query: &[(&str, String)],
    ) -> BhResult<Self> {
        let mut url = base.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| BhError::Config(format!("REST URL {base} cannot be a base")))?;
            path.pop_if_empty();
            path.extend(segments);
        }
        url.set_query(None);
        if !query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(query.iter().map(|(k, v)| (*k, v.as_str())));
        }

        Ok(Self {
            method,
            path: segments.join("/"),
            url,
        })
    }

    /// Build a GET route.
    pub fn get(base: &Url, segments: &[&str], query: &[(&str, String)]) -> BhResult<Self> {
        Self::new(Method::GET, base, segments, query)
    }

    /// Method plus relative path, used as a stable label in logs.
    pub fn key(&self) -> String {
        format!("{} {}", self.method, self.path)
    }
}
