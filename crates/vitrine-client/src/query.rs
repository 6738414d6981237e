//! Row-filter query builder for the PostgREST dialect
//!
//! Builds request paths such as
//! `/service_faqs?select=id,question&status=eq.live&order=display_order.asc`.
//! Values are form-urlencoded, which the backend decodes transparently.

use url::form_urlencoded;

/// A request path for one collection, with its query parameters in insertion order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RestQuery {
    collection: String,
    params: Vec<(String, String)>,
}

impl RestQuery {
    pub fn new(collection: &str) -> Self {
        Self {
            collection: collection.to_string(),
            params: Vec::new(),
        }
    }

    /// Restrict the returned columns.
    pub fn select(self, columns: &str) -> Self {
        self.param("select", columns)
    }

    /// Add an equality filter: `column=eq.value`.
    pub fn eq(self, column: &str, value: impl ToString) -> Self {
        let value = format!("eq.{}", value.to_string());
        self.param(column, &value)
    }

    pub fn order(self, order: &str) -> Self {
        self.param("order", order)
    }

    pub fn limit(self, limit: usize) -> Self {
        let limit = limit.to_string();
        self.param("limit", &limit)
    }

    /// Add a raw query parameter.
    pub fn param(mut self, key: &str, value: &str) -> Self {
        self.params.push((key.to_string(), value.to_string()));
        self
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Render the path relative to the REST root.
    pub fn to_path(&self) -> String {
        if self.params.is_empty() {
            return format!("/{}", self.collection);
        }

        let query = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.params.iter())
            .finish();
        format!("/{}?{}", self.collection, query)
    }
}
