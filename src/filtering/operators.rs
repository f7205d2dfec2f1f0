//! Static operator table mapping request tokens to comparison operators.

use crate::errors::FilterError;

/// Canonical comparison operators accepted by the condition compiler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    /// Equality (=)
    Eq,
    /// Not equal (!=)
    Ne,
    /// Greater than (>)
    Gt,
    /// Less than (<)
    Lt,
    /// Greater than or equal (>=)
    Gte,
    /// Less than or equal (<=)
    Lte,
    /// Substring LIKE
    Like,
    /// Negated substring LIKE
    NotLike,
    /// IN (list of values)
    In,
    /// NOT IN (list of values)
    NotIn,
    /// BETWEEN low AND high
    Between,
    /// NOT BETWEEN low AND high
    NotBetween,
}

impl CompareOp {
    /// Short tokens accepted in `field:token` keys, in table order.
    pub const TOKENS: [&'static str; 12] = [
        "eq", "neq", "gt", "lt", "gte", "lte", "like", "nlike", "in", "nin", "between", "nbetween",
    ];

    /// Look up a short operator token (`field:token` syntax).
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "eq" => Some(Self::Eq),
            "neq" => Some(Self::Ne),
            "gt" => Some(Self::Gt),
            "lt" => Some(Self::Lt),
            "gte" => Some(Self::Gte),
            "lte" => Some(Self::Lte),
            "like" => Some(Self::Like),
            "nlike" => Some(Self::NotLike),
            "in" => Some(Self::In),
            "nin" => Some(Self::NotIn),
            "between" => Some(Self::Between),
            "nbetween" => Some(Self::NotBetween),
            _ => None,
        }
    }

    /// Look up a legacy operator value, which may be a short token or the
    /// canonical SQL form (`=`, `!=`, `not like`, ...). Case-insensitive.
    pub fn parse(raw: &str) -> Result<Self, FilterError> {
        let lowered = raw.to_ascii_lowercase();
        if let Some(op) = Self::from_token(&lowered) {
            return Ok(op);
        }
        let op = match lowered.as_str() {
            "=" => Self::Eq,
            "!=" | "<>" => Self::Ne,
            ">" => Self::Gt,
            "<" => Self::Lt,
            ">=" => Self::Gte,
            "<=" => Self::Lte,
            "not like" => Self::NotLike,
            "not in" => Self::NotIn,
            "not between" => Self::NotBetween,
            _ => return Err(FilterError::invalid_operator(raw)),
        };
        Ok(op)
    }

    /// Canonical SQL-ish spelling of this operator.
    #[must_use]
    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Ne => "!=",
            Self::Gt => ">",
            Self::Lt => "<",
            Self::Gte => ">=",
            Self::Lte => "<=",
            Self::Like => "like",
            Self::NotLike => "not like",
            Self::In => "in",
            Self::NotIn => "not in",
            Self::Between => "between",
            Self::NotBetween => "not between",
        }
    }

    /// True for operators whose value is inherently a list.
    #[must_use]
    pub fn takes_list(self) -> bool {
        matches!(self, Self::In | Self::NotIn | Self::Between | Self::NotBetween)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_token_resolves() {
        for token in CompareOp::TOKENS {
            assert!(CompareOp::from_token(token).is_some(), "{token} should resolve");
        }
    }

    #[test]
    fn test_unknown_token_is_rejected() {
        assert!(CompareOp::from_token("foo").is_none());
        assert!(CompareOp::from_token("EQ").is_none());
    }

    #[test]
    fn test_tokens_and_canonical_forms_agree() {
        // Legacy syntax sends the mapped operator; both spellings must land
        // on the same variant as the short token.
        for token in CompareOp::TOKENS {
            let op = CompareOp::from_token(token).unwrap();
            assert_eq!(CompareOp::parse(op.as_sql()).unwrap(), op);
            assert_eq!(CompareOp::parse(token).unwrap(), op);
        }
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(CompareOp::parse("NOT LIKE").unwrap(), CompareOp::NotLike);
        assert_eq!(CompareOp::parse("Not In").unwrap(), CompareOp::NotIn);
        assert_eq!(CompareOp::parse("LIKE").unwrap(), CompareOp::Like);
        assert_eq!(CompareOp::parse("IN").unwrap(), CompareOp::In);
        assert_eq!(CompareOp::parse("BETWEEN").unwrap(), CompareOp::Between);
        assert_eq!(CompareOp::parse("GTE").unwrap(), CompareOp::Gte);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(
            CompareOp::parse("~~"),
            Err(FilterError::InvalidOperator { .. })
        ));
    }

    #[test]
    fn test_list_operators() {
        assert!(CompareOp::In.takes_list());
        assert!(CompareOp::NotBetween.takes_list());
        assert!(!CompareOp::Like.takes_list());
    }
}
