use serde::{Deserialize, Serialize};

/// 1-based page selector for list endpoints. Values below 1 fall back to
/// the defaults, so `offset()` can never underflow.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Pagination {
    pub index: u64,
    pub size: u64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self { index: 1, size: 10 }
    }
}

impl Pagination {
    fn clamped(&self) -> (u64, u64) {
        if self.index < 1 || self.size < 1 {
            let defaults = Self::default();
            (defaults.index, defaults.size)
        } else {
            (self.index, self.size)
        }
    }

    pub fn offset(&self) -> u64 {
        let (index, size) = self.clamped();
        (index - 1) * size
    }

    pub fn limit(&self) -> u64 {
        self.clamped().1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let page = Pagination::default();
        assert_eq!(page.offset(), 0);
        assert_eq!(page.limit(), 10);
    }

    #[test]
    fn test_offset_advances_by_page() {
        let page = Pagination { index: 3, size: 20 };
        assert_eq!(page.offset(), 40);
        assert_eq!(page.limit(), 20);
    }

    #[test]
    fn test_zero_index_does_not_underflow() {
        let page = Pagination { index: 0, size: 5 };
        assert_eq!(page.offset(), 0);
        assert_eq!(page.limit(), 10);
    }

    #[test]
    fn test_zero_size_falls_back_to_defaults() {
        let page = Pagination { index: 2, size: 0 };
        assert_eq!(page.offset(), 0);
        assert_eq!(page.limit(), 10);
    }
}
