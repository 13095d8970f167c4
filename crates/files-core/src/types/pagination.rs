//! Pagination for list endpoints.

use serde::{Deserialize, Serialize};

/// Fixed number of items per page.
pub const PAGE_SIZE: u64 = 20;

/// A zero-based page of a listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// Page number (0-based).
    #[serde(default)]
    pub page: u64,
}

impl PageRequest {
    /// Create a new page request.
    pub fn new(page: u64) -> Self {
        Self { page }
    }

    /// Calculate the SQL `OFFSET` value.
    pub fn offset(&self) -> u64 {
        self.page.saturating_mul(PAGE_SIZE)
    }

    /// Return the SQL `LIMIT` value.
    pub fn limit(&self) -> u64 {
        PAGE_SIZE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offsets() {
        assert_eq!(PageRequest::new(0).offset(), 0);
        assert_eq!(PageRequest::new(3).offset(), 60);
        assert_eq!(PageRequest::new(u64::MAX).offset(), u64::MAX);
    }
}
