//! Lenient parsing of pagination and id parameters as they arrive from a
//! query string. Pagination never fails: anything absent or unusable falls
//! back to its default. Ids are strict.

use crate::error::{CatalogError, CatalogResult};

/// Page size used when the caller gives none (or an unusable one).
pub const DEFAULT_LIMIT: u32 = 10;
/// First page of the verse view.
pub const DEFAULT_PAGE: u64 = 1;

/// Window into a result set, in the search engine's offset vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub limit: u32,
    pub offset: u64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            offset: 0,
        }
    }
}

impl Pagination {
    pub fn from_raw(limit: Option<&str>, offset: Option<&str>) -> Self {
        Self {
            limit: parse_limit(limit),
            offset: parse_offset(offset),
        }
    }

    /// Clamp the limit to `max`. A `max` of zero disables the ceiling.
    pub fn capped(self, max: u32) -> Self {
        if max == 0 {
            return self;
        }
        Self {
            limit: self.limit.min(max),
            ..self
        }
    }

    /// Window immediately after this one.
    pub fn next(self) -> Self {
        Self {
            offset: self.offset.saturating_add(u64::from(self.limit)),
            ..self
        }
    }

    /// Window immediately before this one, stopping at the start.
    pub fn previous(self) -> Self {
        Self {
            offset: self.offset.saturating_sub(u64::from(self.limit)),
            ..self
        }
    }
}

fn parse_int(raw: Option<&str>) -> Option<i64> {
    raw.and_then(|value| value.trim().parse::<i64>().ok())
}

/// `limit`: defaults to 10 when absent, non-numeric, or below 1.
pub fn parse_limit(raw: Option<&str>) -> u32 {
    match parse_int(raw) {
        Some(value) if value >= 1 => u32::try_from(value).unwrap_or(u32::MAX),
        _ => DEFAULT_LIMIT,
    }
}

/// `offset`: defaults to 0 when absent, non-numeric, or negative.
pub fn parse_offset(raw: Option<&str>) -> u64 {
    match parse_int(raw) {
        Some(value) if value >= 0 => value.unsigned_abs(),
        _ => 0,
    }
}

/// `page`: defaults to 1 when absent, non-numeric, or below 1.
pub fn parse_page(raw: Option<&str>) -> u64 {
    match parse_int(raw) {
        Some(value) if value >= 1 => value.unsigned_abs(),
        _ => DEFAULT_PAGE,
    }
}

/// Required numeric id. Missing and non-numeric values are both validation
/// errors, never a silent default.
pub fn parse_id(raw: Option<&str>) -> CatalogResult<i64> {
    let raw = raw
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| CatalogError::validation("Song id is required"))?;
    raw.parse::<i64>()
        .map_err(|_| CatalogError::validation(format!("Song id must be an integer, got '{raw}'")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limit_falls_back_to_default() {
        assert_eq!(parse_limit(None), 10);
        assert_eq!(parse_limit(Some("abc")), 10);
        assert_eq!(parse_limit(Some("0")), 10);
        assert_eq!(parse_limit(Some("-5")), 10);
        assert_eq!(parse_limit(Some("25")), 25);
        assert_eq!(parse_limit(Some("99999999999")), u32::MAX);
    }

    #[test]
    fn offset_falls_back_to_zero() {
        assert_eq!(parse_offset(None), 0);
        assert_eq!(parse_offset(Some("x")), 0);
        assert_eq!(parse_offset(Some("-1")), 0);
        assert_eq!(parse_offset(Some("0")), 0);
        assert_eq!(parse_offset(Some("30")), 30);
    }

    #[test]
    fn page_falls_back_to_first() {
        assert_eq!(parse_page(None), 1);
        assert_eq!(parse_page(Some("")), 1);
        assert_eq!(parse_page(Some("0")), 1);
        assert_eq!(parse_page(Some("3")), 3);
    }

    #[test]
    fn ids_are_strict() {
        assert_eq!(parse_id(Some("42")).unwrap(), 42);
        assert!(matches!(parse_id(None), Err(CatalogError::Validation(_))));
        assert!(matches!(parse_id(Some(" ")), Err(CatalogError::Validation(_))));
        assert!(matches!(
            parse_id(Some("4x")),
            Err(CatalogError::Validation(_))
        ));
    }

    #[test]
    fn pagination_caps_and_steps() {
        let page = Pagination::from_raw(Some("500"), Some("20")).capped(100);
        assert_eq!(page.limit, 100);
        assert_eq!(page.next().offset, 120);
        assert_eq!(page.previous().offset, 0);
        assert_eq!(page.capped(0).limit, 100);
    }
}
