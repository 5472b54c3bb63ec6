//! Filtering and paging arguments accepted by list queries.

use pagination::PageRequest;

/// A case-insensitive substring filter plus the page window to return.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListFilter {
    /// Substring to match; `None` matches every row.
    pub text: Option<String>,
    /// Page window, ordered by primary key.
    pub page: PageRequest,
}

impl ListFilter {
    /// Build a filter from optional text and a resolved page.
    pub fn new(text: Option<&str>, page: PageRequest) -> Self {
        Self {
            text: text.map(str::to_owned),
            page,
        }
    }

    /// SQL `ILIKE` pattern for the filter text, with wildcards escaped.
    pub fn like_pattern(&self) -> Option<String> {
        self.text.as_deref().map(|text| {
            let escaped = text
                .replace('\\', "\\\\")
                .replace('%', "\\%")
                .replace('_', "\\_");
            format!("%{escaped}%")
        })
    }

    /// Case-insensitive substring check used by in-memory adapters.
    pub fn matches(&self, value: &str) -> bool {
        match self.text.as_deref() {
            Some(text) => value.to_lowercase().contains(&text.to_lowercase()),
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagination::PageSize;
    use rstest::rstest;

    fn filter(text: Option<&str>) -> ListFilter {
        let size = PageSize::new(4).expect("page size");
        ListFilter::new(text, PageRequest::first(size))
    }

    #[rstest]
    #[case(Some("box"), Some("%box%"))]
    #[case(Some("50%_off"), Some("%50\\%\\_off%"))]
    #[case(None, None)]
    fn like_pattern_escapes_wildcards(#[case] text: Option<&str>, #[case] expected: Option<&str>) {
        assert_eq!(filter(text).like_pattern().as_deref(), expected);
    }

    #[rstest]
    #[case(Some("BROKEN"), "Box arrived broken", true)]
    #[case(Some("lost"), "Box arrived broken", false)]
    #[case(None, "anything", true)]
    fn matches_is_case_insensitive(
        #[case] text: Option<&str>,
        #[case] value: &str,
        #[case] expected: bool,
    ) {
        assert_eq!(filter(text).matches(value), expected);
    }
}
