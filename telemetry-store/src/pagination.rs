pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_LIMIT: u64 = 10;

/// Raw `page` / `limit` query parameters, kept as strings so that
/// garbage values fall back to defaults instead of rejecting the request.
#[derive(Debug, Default)]
pub struct PageQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl PageQuery {
    /// Builds from decoded query pairs. A repeated key keeps its first value.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut query = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "page" => &mut query.page,
                "limit" => &mut query.limit,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }
        query
    }
}

/// Resolved offset-based page request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u64,
    pub limit: u64,
}

impl Pagination {
    pub fn from_query(query: &PageQuery) -> Self {
        Self {
            page: positive_or(query.page.as_deref(), DEFAULT_PAGE),
            limit: positive_or(query.limit.as_deref(), DEFAULT_LIMIT),
        }
    }

    /// Number of leading records to skip.
    pub fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.limit)
    }

    pub fn total_pages(&self, total_items: u64) -> u64 {
        total_items.div_ceil(self.limit)
    }
}

/// Reads the leading integer of `raw` (optional whitespace and sign, then
/// digits). Anything that does not yield a positive number gives `default`.
fn positive_or(raw: Option<&str>, default: u64) -> u64 {
    let Some(raw) = raw else {
        return default;
    };

    let s = raw.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    let digits = &digits[..end];
    if negative || digits.is_empty() {
        return default;
    }

    match digits.parse::<u64>() {
        Ok(0) => default,
        Ok(n) => n,
        // More digits than fit in a u64
        Err(_) => u64::MAX,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(page: Option<&str>, limit: Option<&str>) -> PageQuery {
        PageQuery {
            page: page.map(str::to_string),
            limit: limit.map(str::to_string),
        }
    }

    fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
        raw.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_repeated_key_keeps_first_value() {
        let q = PageQuery::from_pairs(pairs(&[("page", "2"), ("page", "3"), ("limit", "5")]));
        assert_eq!(
            Pagination::from_query(&q),
            Pagination { page: 2, limit: 5 }
        );
    }

    #[test]
    fn test_unrelated_keys_ignored() {
        let q = PageQuery::from_pairs(pairs(&[("sort", "desc"), ("limit", "7")]));
        assert_eq!(
            Pagination::from_query(&q),
            Pagination { page: 1, limit: 7 }
        );
    }

    #[test]
    fn test_defaults_when_absent() {
        let p = Pagination::from_query(&PageQuery::default());
        assert_eq!(p, Pagination { page: 1, limit: 10 });
        assert_eq!(p.offset(), 0);
    }

    #[test]
    fn test_explicit_values() {
        let p = Pagination::from_query(&query(Some("3"), Some("10")));
        assert_eq!(p.offset(), 20);
        assert_eq!(p.total_pages(25), 3);
    }

    #[test]
    fn test_garbage_falls_back_to_defaults() {
        let p = Pagination::from_query(&query(Some("abc"), Some("")));
        assert_eq!(p, Pagination { page: 1, limit: 10 });
    }

    #[test]
    fn test_zero_and_negative_fall_back_to_defaults() {
        let p = Pagination::from_query(&query(Some("0"), Some("-5")));
        assert_eq!(p, Pagination { page: 1, limit: 10 });
    }

    #[test]
    fn test_leading_digits_are_used() {
        let p = Pagination::from_query(&query(Some(" 2abc"), Some("+25.9")));
        assert_eq!(p, Pagination { page: 2, limit: 25 });
    }

    #[test]
    fn test_no_upper_bound_on_limit() {
        let p = Pagination::from_query(&query(None, Some("5000")));
        assert_eq!(p.limit, 5000);
    }

    #[test]
    fn test_total_pages() {
        let p = Pagination { page: 1, limit: 10 };
        assert_eq!(p.total_pages(0), 0);
        assert_eq!(p.total_pages(10), 1);
        assert_eq!(p.total_pages(11), 2);
    }

    #[test]
    fn test_offset_saturates() {
        let p = Pagination::from_query(&query(Some("99999999999999999999999"), Some("100")));
        assert_eq!(p.offset(), u64::MAX);
    }
}
