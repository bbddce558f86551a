// Copyright 2025 Cowboy AI, LLC.

//! Read-model storage and paged queries
//!
//! The read side returns pre-shaped DTO projections ("views") instead of
//! hydrating aggregates. Each view declares its sortable/searchable column
//! whitelists through [`ListProjection`]; unknown sort columns silently fall
//! back to the view's default. The reference implementation projects views
//! straight out of the in-memory write repository; a relational adapter
//! resolves the same contract with server-side joins.

use crate::cqrs::Query;
use crate::entity::{AggregateRoot, EntityId, EntityName};
use crate::errors::{DomainError, DomainResult};
use crate::repository::{InMemoryRepository, WriteRepository};
use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Sort in ascending order
    #[serde(alias = "asc")]
    Ascending,
    /// Sort in descending order
    #[serde(alias = "desc")]
    Descending,
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortDirection::Ascending => write!(f, "asc"),
            SortDirection::Descending => write!(f, "desc"),
        }
    }
}

/// A paged-list request
///
/// Page numbers are 1-based; out-of-range values are normalized rather than
/// rejected (page 0 becomes 1, oversized page sizes clamp to the configured
/// maximum).
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PageRequest {
    /// Page number, 1-based
    pub page: u32,
    /// Items per page
    pub page_size: u32,
    /// Free-text search term applied to the view's searchable columns
    pub search: Option<String>,
    /// Requested sort column, validated against the view's whitelist
    pub sort_by: Option<String>,
    /// Requested sort direction
    pub sort_direction: Option<SortDirection>,
    /// Owner scope; the dominant query shape filters by owning user
    pub owner_id: Option<Uuid>,
}

impl PageRequest {
    /// Create a request for a page
    pub fn new(page: u32, page_size: u32) -> Self {
        Self {
            page,
            page_size,
            search: None,
            sort_by: None,
            sort_direction: None,
            owner_id: None,
        }
    }

    /// Scope the request to one owner
    pub fn for_owner(mut self, owner_id: Uuid) -> Self {
        self.owner_id = Some(owner_id);
        self
    }

    /// Apply a free-text search term
    pub fn with_search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    /// Request a sort column and direction
    pub fn with_sort(mut self, column: impl Into<String>, direction: SortDirection) -> Self {
        self.sort_by = Some(column.into());
        self.sort_direction = Some(direction);
        self
    }

    /// Clamp page and page size into their valid ranges
    pub fn normalized(mut self, max_page_size: u32) -> Self {
        self.page = self.page.max(1);
        self.page_size = self.page_size.clamp(1, max_page_size.max(1));
        self
    }
}

impl Query for PageRequest {}

/// One page of results with enough metadata to compute total pages
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Page<T> {
    /// The items on this page
    pub items: Vec<T>,
    /// Total count across all pages, after filtering
    pub total_count: usize,
    /// Page number, 1-based
    pub page: u32,
    /// Items per page
    pub page_size: u32,
}

impl<T> Page<T> {
    /// Number of pages implied by the total count
    pub fn total_pages(&self) -> u32 {
        if self.total_count == 0 {
            0
        } else {
            ((self.total_count as u64).div_ceil(self.page_size.max(1) as u64)) as u32
        }
    }

    /// Map the items to a different type
    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total_count: self.total_count,
            page: self.page,
            page_size: self.page_size,
        }
    }
}

/// Column whitelists and defaults for a view's paged lists
pub trait ListProjection {
    /// Columns the caller may sort by
    fn sortable_columns() -> &'static [&'static str];

    /// Columns the free-text search term is matched against
    fn searchable_columns() -> &'static [&'static str];

    /// Default sort column and direction when none (or an unknown one) is
    /// requested
    fn default_sort() -> (&'static str, SortDirection);

    /// Column holding the record id; used as the deterministic tie-break
    fn id_column() -> &'static str;

    /// Column holding the owning user's id
    fn owner_column() -> &'static str {
        "owner_id"
    }
}

/// Read-model storage trait
#[async_trait]
pub trait ReadModelStorage<D>: Send + Sync {
    /// Get a single view by id
    async fn get_dto(&self, id: Uuid) -> DomainResult<Option<D>>;

    /// Get one page of views; the request is assumed normalized
    async fn list(&self, request: &PageRequest) -> DomainResult<Page<D>>;
}

/// Read model that projects views directly from an in-memory repository
///
/// Filtering, search, and sorting operate on the JSON projection of each
/// view, which keeps the machinery generic across entities: a column name is
/// just a JSON field name.
pub struct ProjectingReadModel<A: AggregateRoot + Clone, D> {
    repository: Arc<InMemoryRepository<A>>,
    project: fn(&A) -> D,
}

impl<A: AggregateRoot + Clone, D> ProjectingReadModel<A, D> {
    /// Create a read model over a repository with a projection function
    pub fn new(repository: Arc<InMemoryRepository<A>>, project: fn(&A) -> D) -> Self {
        Self {
            repository,
            project,
        }
    }
}

fn as_number(value: &serde_json::Value) -> Option<f64> {
    match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

fn as_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Compare two JSON column values: numerically when both sides read as
/// numbers (decimal amounts serialize as strings), lexically otherwise
/// (ISO dates sort correctly as text).
fn compare_values(a: &serde_json::Value, b: &serde_json::Value) -> Ordering {
    match (as_number(a), as_number(b)) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        _ => as_text(a).cmp(&as_text(b)),
    }
}

static JSON_NULL: serde_json::Value = serde_json::Value::Null;

fn column<'v>(row: &'v serde_json::Value, name: &str) -> &'v serde_json::Value {
    row.get(name).unwrap_or(&JSON_NULL)
}

#[async_trait]
impl<M, A, D> ReadModelStorage<D> for ProjectingReadModel<A, D>
where
    M: Send + Sync + 'static,
    A: AggregateRoot<Id = EntityId<M>> + EntityName + Clone + Send + Sync + 'static,
    D: ListProjection + Serialize + Clone + Send + Sync + 'static,
{
    async fn get_dto(&self, id: Uuid) -> DomainResult<Option<D>> {
        let aggregate = self.repository.find(EntityId::from_uuid(id)).await?;
        Ok(aggregate.as_ref().map(self.project))
    }

    async fn list(&self, request: &PageRequest) -> DomainResult<Page<D>> {
        let mut rows: Vec<(D, serde_json::Value)> = Vec::new();
        for aggregate in self.repository.all().await {
            let view = (self.project)(&aggregate);
            let json = serde_json::to_value(&view)
                .map_err(|e| DomainError::SerializationError(e.to_string()))?;
            rows.push((view, json));
        }

        // Owner scope first; it is the dominant filter
        if let Some(owner) = request.owner_id {
            let owner = serde_json::Value::String(owner.to_string());
            rows.retain(|(_, json)| column(json, D::owner_column()) == &owner);
        }

        // Case-insensitive substring search over the declared columns
        if let Some(term) = request.search.as_deref().map(str::trim) {
            if !term.is_empty() {
                let needle = term.to_lowercase();
                rows.retain(|(_, json)| {
                    D::searchable_columns().iter().any(|col| {
                        as_text(column(json, col)).to_lowercase().contains(&needle)
                    })
                });
            }
        }

        // Unknown sort columns fall back to the view default
        let (default_column, default_direction) = D::default_sort();
        let sort_column = match request.sort_by.as_deref() {
            Some(c) if D::sortable_columns().contains(&c) => c,
            _ => default_column,
        };
        let direction = request.sort_direction.unwrap_or(default_direction);

        let id_column = D::id_column();
        rows.sort_by(|(_, a), (_, b)| {
            let ordering = compare_values(column(a, sort_column), column(b, sort_column));
            let ordering = match direction {
                SortDirection::Ascending => ordering,
                SortDirection::Descending => ordering.reverse(),
            };
            // Deterministic paging: tie-break by id
            ordering.then_with(|| as_text(column(a, id_column)).cmp(&as_text(column(b, id_column))))
        });

        let total_count = rows.len();
        let start = (request.page.saturating_sub(1) as usize) * request.page_size as usize;
        let items: Vec<D> = rows
            .into_iter()
            .skip(start)
            .take(request.page_size as usize)
            .map(|(view, _)| view)
            .collect();

        Ok(Page {
            items,
            total_count,
            page: request.page,
            page_size: request.page_size,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn page_request_normalization() {
        let request = PageRequest::new(0, 0).normalized(100);
        assert_eq!(request.page, 1);
        assert_eq!(request.page_size, 1);

        let request = PageRequest::new(3, 5000).normalized(100);
        assert_eq!(request.page, 3);
        assert_eq!(request.page_size, 100);
    }

    #[test_case(0, 10, 0; "empty set has no pages")]
    #[test_case(1, 10, 1; "single item")]
    #[test_case(10, 10, 1; "exact fit")]
    #[test_case(11, 10, 2; "one overflow item")]
    #[test_case(95, 10, 10; "many pages")]
    fn total_pages(total_count: usize, page_size: u32, expected: u32) {
        let page: Page<u32> = Page {
            items: vec![],
            total_count,
            page: 1,
            page_size,
        };
        assert_eq!(page.total_pages(), expected);
    }

    #[test]
    fn page_map_preserves_metadata() {
        let page = Page {
            items: vec![1, 2, 3],
            total_count: 10,
            page: 2,
            page_size: 3,
        };

        let mapped = page.map(|x| x * 2);
        assert_eq!(mapped.items, vec![2, 4, 6]);
        assert_eq!(mapped.total_count, 10);
        assert_eq!(mapped.page, 2);
    }

    #[test]
    fn value_comparison_is_numeric_when_possible() {
        use serde_json::json;

        // "9.50" < "100.00" numerically even though lexically it is not
        assert_eq!(
            compare_values(&json!("9.50"), &json!("100.00")),
            Ordering::Less
        );
        // ISO dates compare lexically
        assert_eq!(
            compare_values(&json!("2026-01-02"), &json!("2026-01-10")),
            Ordering::Less
        );
        // Null sorts before text
        assert_eq!(
            compare_values(&serde_json::Value::Null, &json!("abc")),
            Ordering::Less
        );
    }

    #[test]
    fn sort_direction_serde_accepts_short_forms() {
        let parsed: SortDirection = serde_json::from_str("\"asc\"").unwrap();
        assert_eq!(parsed, SortDirection::Ascending);
        let parsed: SortDirection = serde_json::from_str("\"descending\"").unwrap();
        assert_eq!(parsed, SortDirection::Descending);
        assert_eq!(SortDirection::Descending.to_string(), "desc");
    }
}
