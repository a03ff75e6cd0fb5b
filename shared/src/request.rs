//! Request types for the shared crate
//!
//! Pagination parameters accepted by every list endpoint.

use serde::{Deserialize, Serialize};

/// Default page size used by catalog listings
pub const DEFAULT_PAGE_SIZE: u32 = 12;

/// Pagination and ordering query parameters
///
/// `page` is zero-based. `sort` is a `field,direction` pair such as
/// `"name,asc"`; an empty string means server-default ordering.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PageRequest {
    #[serde(default)]
    pub page: u32,

    #[serde(default = "default_size")]
    pub size: u32,

    #[serde(default)]
    pub sort: String,
}

fn default_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 0,
            size: DEFAULT_PAGE_SIZE,
            sort: String::new(),
        }
    }
}

impl PageRequest {
    pub fn new(page: u32, size: u32) -> Self {
        Self {
            page,
            size,
            sort: String::new(),
        }
    }

    /// Set the sort expression (`field,direction`)
    pub fn with_sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = sort.into();
        self
    }

    /// Offset of the first element of this page
    pub fn offset(&self) -> usize {
        self.page as usize * self.size as usize
    }

    /// Split the sort expression into field and descending flag
    pub fn sort_order(&self) -> Option<(&str, bool)> {
        if self.sort.is_empty() {
            return None;
        }
        let mut parts = self.sort.splitn(2, ',');
        let field = parts.next()?.trim();
        if field.is_empty() {
            return None;
        }
        let descending = parts
            .next()
            .map(|d| d.trim().eq_ignore_ascii_case("desc"))
            .unwrap_or(false);
        Some((field, descending))
    }

    /// Query pairs as sent on the wire; an empty sort is omitted
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![
            ("page".to_string(), self.page.to_string()),
            ("size".to_string(), self.size.to_string()),
        ];
        if !self.sort.is_empty() {
            pairs.push(("sort".to_string(), self.sort.clone()));
        }
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_order_parsing() {
        let req = PageRequest::new(0, 12).with_sort("name,desc");
        assert_eq!(req.sort_order(), Some(("name", true)));

        let req = PageRequest::new(0, 12).with_sort("createdAt");
        assert_eq!(req.sort_order(), Some(("createdAt", false)));

        assert_eq!(PageRequest::default().sort_order(), None);
    }

    #[test]
    fn test_query_pairs_skip_empty_sort() {
        let pairs = PageRequest::new(2, 5).query_pairs();
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0], ("page".to_string(), "2".to_string()));

        let pairs = PageRequest::new(0, 12).with_sort("name,asc").query_pairs();
        assert_eq!(pairs[2], ("sort".to_string(), "name,asc".to_string()));
    }
}
