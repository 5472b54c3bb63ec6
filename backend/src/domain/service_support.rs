//! Helpers shared by the resource services.

use pagination::{ListQuery, PageSize};
use tracing::{error, warn};

use crate::domain::Error;
use crate::domain::ports::{ListFilter, PersistenceError};

/// Build a page size at compile time.
pub(crate) const fn page_size(rows: u32) -> PageSize {
    match PageSize::new(rows) {
        Ok(size) => size,
        Err(_) => panic!("page size must be non-zero"),
    }
}

/// Resolve raw list parameters against a resource's page size.
pub(crate) fn list_filter(query: &ListQuery, size: PageSize) -> ListFilter {
    ListFilter::new(query.filter(), query.page_request(size))
}

/// Map a repository failure to a domain error.
///
/// Connection failures become 503s; everything else is an internal error
/// whose detail stays in the logs.
pub(crate) fn map_persistence_error(store: &'static str) -> impl Fn(PersistenceError) -> Error {
    move |err| match err {
        PersistenceError::Connection { message } => {
            warn!(store, %message, "repository connection failed");
            Error::service_unavailable(format!("{store} store unavailable"))
        }
        other => {
            error!(store, error = %other, "repository operation failed");
            Error::internal(format!("{store} repository error: {other}"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[rstest]
    #[case(PersistenceError::connection("refused"), ErrorCode::ServiceUnavailable)]
    #[case(PersistenceError::query("syntax"), ErrorCode::InternalError)]
    #[case(PersistenceError::duplicate("users_email_key"), ErrorCode::InternalError)]
    #[case(PersistenceError::missing_reference("fk"), ErrorCode::InternalError)]
    fn persistence_errors_map_to_codes(#[case] err: PersistenceError, #[case] code: ErrorCode) {
        assert_eq!(map_persistence_error("user")(err).code(), code);
    }

    #[test]
    fn connection_detail_is_not_exposed() {
        let err = map_persistence_error("delivery")(PersistenceError::connection("10.0.0.4:5432"));
        assert_eq!(err.message(), "delivery store unavailable");
    }

    #[test]
    fn list_filter_uses_query_text_and_page() {
        let query = ListQuery {
            q: Some(" broken ".into()),
            page: Some(2),
        };
        let filter = list_filter(&query, page_size(4));
        assert_eq!(filter.text.as_deref(), Some("broken"));
        assert_eq!(filter.page.offset(), 4);
        assert_eq!(filter.page.limit(), 4);
    }
}
