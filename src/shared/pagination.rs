//! Paging and whitelisted sorting shared by every list endpoint.
//!
//! A request goes through three steps: [`PageRequest::from_query`]
//! normalizes the raw query, the caller counts the rows, then
//! [`PageRequest::clamp_to`] pulls an out-of-range page back onto the last
//! existing one before the slice is fetched.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::shared::constants::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, MIN_PAGE_SIZE};
use crate::shared::types::Meta;
use crate::shared::validation::SQL_IDENTIFIER_REGEX;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// Only a case-insensitive `desc` selects descending order.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some(value) if value.trim().eq_ignore_ascii_case("desc") => SortDirection::Desc,
            _ => SortDirection::Asc,
        }
    }

    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }

    pub fn reverse(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

/// One sortable field: the name clients send and the SQL it maps to.
#[derive(Debug, PartialEq, Eq)]
pub struct SortField {
    pub name: &'static str,
    pub column: &'static str,
}

/// Allowed sort fields of one entity.
#[derive(Debug)]
pub struct SortWhitelist {
    pub entity: &'static str,
    pub fields: &'static [SortField],
    pub default_field: &'static str,
    /// Tie-breaker column appended to every ORDER BY
    pub id_column: &'static str,
}

impl SortWhitelist {
    /// Checks the table is usable; run once at startup.
    pub fn validate(&self) -> Result<(), String> {
        if self.fields.is_empty() {
            return Err(format!("{}: sort whitelist is empty", self.entity));
        }

        for (index, field) in self.fields.iter().enumerate() {
            if self.fields[..index].iter().any(|f| f.name == field.name) {
                return Err(format!(
                    "{}: sort field '{}' listed twice",
                    self.entity, field.name
                ));
            }
            if !SQL_IDENTIFIER_REGEX.is_match(field.column) {
                return Err(format!(
                    "{}: column '{}' for sort field '{}' is not a plain identifier",
                    self.entity, field.column, field.name
                ));
            }
        }

        if !SQL_IDENTIFIER_REGEX.is_match(self.id_column) {
            return Err(format!(
                "{}: id column '{}' is not a plain identifier",
                self.entity, self.id_column
            ));
        }

        if self.find(self.default_field).is_none() {
            return Err(format!(
                "{}: default sort field '{}' is not in the whitelist",
                self.entity, self.default_field
            ));
        }

        Ok(())
    }

    fn find(&self, name: &str) -> Option<&'static SortField> {
        self.fields.iter().find(|f| f.name == name)
    }

    fn default_sort(&self) -> &'static SortField {
        self.find(self.default_field).unwrap_or(&self.fields[0])
    }

    /// Resolve a requested field, falling back to the default one.
    pub fn resolve(&self, requested: Option<&str>) -> &'static SortField {
        match requested.map(str::trim).filter(|s| !s.is_empty()) {
            None => self.default_sort(),
            Some(name) => self.find(name).unwrap_or_else(|| {
                tracing::warn!(
                    "Unknown sort field '{}' for {}, falling back to '{}'",
                    name,
                    self.entity,
                    self.default_field
                );
                self.default_sort()
            }),
        }
    }
}

/// Validate every whitelist, stopping at the first broken one.
pub fn validate_whitelists(whitelists: &[&SortWhitelist]) -> Result<(), String> {
    whitelists.iter().try_for_each(|w| w.validate())
}

/// Raw list query parameters.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    /// Zero-based page index (default: 0)
    pub page: Option<i64>,

    /// Items per page (default: 10, min: 1, max: 100)
    pub size: Option<i64>,

    /// Field to sort by, unknown fields fall back to the default
    pub sort_field: Option<String>,

    /// `asc` or `desc` (default: asc)
    pub sort_dir: Option<String>,
}

/// A normalized page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub size: i64,
    pub sort: &'static SortField,
    pub direction: SortDirection,
    id_column: &'static str,
}

impl PageRequest {
    pub fn from_query(query: &ListQuery, whitelist: &'static SortWhitelist) -> Self {
        Self {
            page: query.page.unwrap_or(0).max(0),
            size: query
                .size
                .unwrap_or(DEFAULT_PAGE_SIZE)
                .clamp(MIN_PAGE_SIZE, MAX_PAGE_SIZE),
            sort: whitelist.resolve(query.sort_field.as_deref()),
            direction: SortDirection::parse(query.sort_dir.as_deref()),
            id_column: whitelist.id_column,
        }
    }

    /// Move the page back onto the last existing page when it overshoots.
    /// With no rows at all the page is 0.
    pub fn clamp_to(self, total: i64) -> Self {
        let pages = total_pages(total, self.size);
        if self.page >= pages {
            Self {
                page: (pages - 1).max(0),
                ..self
            }
        } else {
            self
        }
    }

    pub fn offset(&self) -> i64 {
        self.page.saturating_mul(self.size)
    }

    pub fn limit(&self) -> i64 {
        self.size
    }

    /// ORDER BY body, with the id column as tie-breaker.
    pub fn order_by(&self) -> String {
        let dir = self.direction.as_sql();
        if self.sort.column == self.id_column {
            format!("{} {}", self.sort.column, dir)
        } else {
            format!("{} {}, {} {}", self.sort.column, dir, self.id_column, dir)
        }
    }

    pub fn meta(&self, total: i64) -> Meta {
        Meta {
            total,
            page: self.page,
            size: self.size,
            total_pages: total_pages(total, self.size),
            sort_field: self.sort.name.to_string(),
            sort_dir: self.direction,
            reverse_sort_dir: self.direction.reverse(),
        }
    }
}

pub fn total_pages(total: i64, size: i64) -> i64 {
    if total <= 0 || size <= 0 {
        0
    } else {
        (total + size - 1) / size
    }
}

/// One page of items together with its metadata.
#[derive(Debug)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub meta: Meta,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, meta: Meta) -> Self {
        Self { items, meta }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            meta: self.meta,
        }
    }
}

/// Sort and slice an in-memory list the way the database would.
#[cfg(test)]
pub fn page_slice<T>(
    mut items: Vec<T>,
    request: &PageRequest,
    cmp: impl Fn(&T, &T) -> std::cmp::Ordering,
) -> Vec<T> {
    items.sort_by(|a, b| match request.direction {
        SortDirection::Asc => cmp(a, b),
        SortDirection::Desc => cmp(b, a),
    });
    items
        .into_iter()
        .skip(request.offset() as usize)
        .take(request.limit() as usize)
        .collect()
}
