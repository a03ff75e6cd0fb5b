//! API Response types
//!
//! The paginated envelope returned by every list endpoint and the error
//! body the API uses for rejected requests.

use serde::{Deserialize, Serialize};

use crate::request::PageRequest;

/// Error body returned with non-success responses
///
/// ```json
/// { "message": "Brand not found" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Sort metadata attached to a page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortInfo {
    pub empty: bool,
    pub sorted: bool,
    pub unsorted: bool,
}

impl Default for SortInfo {
    fn default() -> Self {
        Self::unsorted()
    }
}

impl SortInfo {
    pub fn unsorted() -> Self {
        Self {
            empty: true,
            sorted: false,
            unsorted: true,
        }
    }

    pub fn sorted() -> Self {
        Self {
            empty: false,
            sorted: true,
            unsorted: false,
        }
    }
}

/// Request echo attached to a page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pageable {
    pub page_number: u32,
    pub page_size: u32,
    #[serde(default)]
    pub sort: SortInfo,
    pub offset: u64,
    pub paged: bool,
    pub unpaged: bool,
}

/// Paginated envelope
///
/// Totals reflect the server's view at the time of the read and may change
/// between pages when other writes land concurrently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pageable: Option<Pageable>,
    pub last: bool,
    pub total_elements: u64,
    pub total_pages: u32,
    pub size: u32,
    pub number: u32,
    #[serde(default)]
    pub sort: SortInfo,
    pub first: bool,
    pub number_of_elements: u32,
    pub empty: bool,
}

impl<T> Page<T> {
    /// Build a page from one slice of content and the total element count
    pub fn new(content: Vec<T>, request: &PageRequest, total_elements: u64) -> Self {
        let total_pages = total_pages(total_elements, request.size);
        let sort = if request.sort_order().is_some() {
            SortInfo::sorted()
        } else {
            SortInfo::unsorted()
        };
        let number_of_elements = content.len() as u32;
        Self {
            empty: content.is_empty(),
            content,
            pageable: Some(Pageable {
                page_number: request.page,
                page_size: request.size,
                sort,
                offset: request.offset() as u64,
                paged: true,
                unpaged: false,
            }),
            last: request.page.saturating_add(1) >= total_pages,
            total_elements,
            total_pages,
            size: request.size,
            number: request.page,
            sort,
            first: request.page == 0,
            number_of_elements,
        }
    }

    /// Paginate an already ordered collection
    pub fn from_slice(all: &[T], request: &PageRequest) -> Self
    where
        T: Clone,
    {
        let content = all
            .iter()
            .skip(request.offset())
            .take(request.size as usize)
            .cloned()
            .collect();
        Self::new(content, request, all.len() as u64)
    }

    /// Map the content while keeping the paging metadata
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            content: self.content.into_iter().map(f).collect(),
            pageable: self.pageable,
            last: self.last,
            total_elements: self.total_elements,
            total_pages: self.total_pages,
            size: self.size,
            number: self.number,
            sort: self.sort,
            first: self.first,
            number_of_elements: self.number_of_elements,
            empty: self.empty,
        }
    }
}

/// `ceil(total / size)`, zero when size is zero
pub fn total_pages(total_elements: u64, size: u32) -> u32 {
    if size == 0 {
        return 0;
    }
    total_elements.div_ceil(size as u64) as u32
}
