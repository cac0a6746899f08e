//! Input validation functions
//!
//! Field-level rules live on the request types as `validator` derives.
//! This module holds the rules that need context, like pagination defaults.

use crate::errors::InputError;
use crate::types::{Page, PaginationQuery};

/// Largest page a list endpoint will serve
pub const MAX_PAGE_LIMIT: i64 = 1000;

/// Resolve raw query parameters into a page window.
///
/// Missing values fall back to the configured defaults. Present values must
/// be in range: `limit` in `1..=MAX_PAGE_LIMIT`, `offset >= 0`.
pub fn resolve_page(
    query: PaginationQuery,
    default_limit: i64,
    default_offset: i64,
) -> Result<Page, InputError> {
    let limit = query.limit.unwrap_or(default_limit);
    let offset = query.offset.unwrap_or(default_offset);

    if !(1..=MAX_PAGE_LIMIT).contains(&limit) {
        return Err(InputError::LimitOutOfRange { max: MAX_PAGE_LIMIT });
    }
    if offset < 0 {
        return Err(InputError::NegativeOffset);
    }

    Ok(Page { limit, offset })
}

/// Canonical form used for email lookups and uniqueness
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
