//! History queries — sort order and limit for reading the stored series.

use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

/// Sort direction over the reading timestamp.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    /// Newest first.
    #[default]
    Desc,
}

impl SortOrder {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = ValidationError;

    /// Case-insensitive: `ASC`, `Asc` and `asc` are all accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("asc") {
            Ok(Self::Asc)
        } else if s.eq_ignore_ascii_case("desc") {
            Ok(Self::Desc)
        } else {
            Err(ValidationError::InvalidOrder(s.to_owned()))
        }
    }
}

/// Parameters for listing stored readings.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct HistoryQuery {
    /// Maximum number of rows; `None` means unbounded.
    pub limit: Option<u32>,
    pub order: SortOrder,
}

impl HistoryQuery {
    #[must_use]
    pub fn new(limit: Option<u32>, order: SortOrder) -> Self {
        // A zero limit is treated like no limit at all.
        Self {
            limit: limit.filter(|value| *value > 0),
            order,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_default_to_descending() {
        assert_eq!(SortOrder::default(), SortOrder::Desc);
        assert_eq!(HistoryQuery::default().order, SortOrder::Desc);
    }

    #[test]
    fn should_parse_order_case_insensitively() {
        assert_eq!("asc".parse::<SortOrder>().unwrap(), SortOrder::Asc);
        assert_eq!("DESC".parse::<SortOrder>().unwrap(), SortOrder::Desc);
        assert_eq!("Asc".parse::<SortOrder>().unwrap(), SortOrder::Asc);
    }

    #[test]
    fn should_reject_unknown_order() {
        let err = "sideways".parse::<SortOrder>().unwrap_err();
        assert_eq!(err, ValidationError::InvalidOrder("sideways".to_owned()));
    }

    #[test]
    fn should_treat_zero_limit_as_unbounded() {
        let query = HistoryQuery::new(Some(0), SortOrder::Asc);
        assert_eq!(query.limit, None);
        let query = HistoryQuery::new(Some(10), SortOrder::Asc);
        assert_eq!(query.limit, Some(10));
    }
}
