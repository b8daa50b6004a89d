//! URL mapping entity, the only record the service persists.

/// A persisted mapping from a short code to its destination URL.
///
/// Everything except `visit_count` is fixed when the mapping is created.
/// `visit_count` only moves upward, one atomic increment at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlMapping {
    pub code: String,
    pub original_url: String,
    /// Seconds since the Unix epoch.
    pub created_at: i64,
    pub visit_count: i64,
}

impl UrlMapping {
    /// Creates a new UrlMapping instance.
    pub fn new(code: String, original_url: String, created_at: i64, visit_count: i64) -> Self {
        Self {
            code,
            original_url,
            created_at,
            visit_count,
        }
    }
}

/// Input data for a conditional insert.
///
/// The store writes it with `visit_count = 0`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMapping {
    pub code: String,
    pub original_url: String,
    pub created_at: i64,
}

impl NewMapping {
    pub fn new(code: impl Into<String>, original_url: impl Into<String>, created_at: i64) -> Self {
        Self {
            code: code.into(),
            original_url: original_url.into(),
            created_at,
        }
    }

    /// The mapping as it looks right after a successful insert.
    pub fn into_mapping(self) -> UrlMapping {
        UrlMapping::new(self.code, self.original_url, self.created_at, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mapping_creation() {
        let mapping = UrlMapping::new(
            "aB3xY9".to_string(),
            "https://example.com".to_string(),
            1_700_000_000,
            4,
        );

        assert_eq!(mapping.code, "aB3xY9");
        assert_eq!(mapping.original_url, "https://example.com");
        assert_eq!(mapping.created_at, 1_700_000_000);
        assert_eq!(mapping.visit_count, 4);
    }

    #[test]
    fn test_new_mapping_starts_with_zero_visits() {
        let mapping = NewMapping::new("xyz789", "https://rust-lang.org", 42).into_mapping();

        assert_eq!(mapping.code, "xyz789");
        assert_eq!(mapping.original_url, "https://rust-lang.org");
        assert_eq!(mapping.created_at, 42);
        assert_eq!(mapping.visit_count, 0);
    }
}
