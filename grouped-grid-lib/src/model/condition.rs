//! Filter condition operators

use serde::Deserialize;
use serde::Serialize;

/// Condition operators understood by the host dataset, with their wire codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "i32", try_from = "i32")]
pub enum ConditionOperator {
    Equal,
    NotEqual,
    GreaterThan,
    LessThan,
    GreaterEqual,
    LessEqual,
    Like,
    NotLike,
    In,
    NotIn,
    Null,
    NotNull,
    Yesterday,
    Today,
    Tomorrow,
    ThisWeek,
    ThisMonth,
    On,
    OnOrBefore,
    OnOrAfter,
    ThisYear,
    BeginsWith,
    DoesNotBeginWith,
    EndsWith,
    DoesNotEndWith,
}

const CODES: &[(ConditionOperator, i32)] = &[
    (ConditionOperator::Equal, 0),
    (ConditionOperator::NotEqual, 1),
    (ConditionOperator::GreaterThan, 2),
    (ConditionOperator::LessThan, 3),
    (ConditionOperator::GreaterEqual, 4),
    (ConditionOperator::LessEqual, 5),
    (ConditionOperator::Like, 6),
    (ConditionOperator::NotLike, 7),
    (ConditionOperator::In, 8),
    (ConditionOperator::NotIn, 9),
    (ConditionOperator::Null, 12),
    (ConditionOperator::NotNull, 13),
    (ConditionOperator::Yesterday, 14),
    (ConditionOperator::Today, 15),
    (ConditionOperator::Tomorrow, 16),
    (ConditionOperator::ThisWeek, 20),
    (ConditionOperator::ThisMonth, 23),
    (ConditionOperator::On, 25),
    (ConditionOperator::OnOrBefore, 26),
    (ConditionOperator::OnOrAfter, 27),
    (ConditionOperator::ThisYear, 29),
    (ConditionOperator::BeginsWith, 54),
    (ConditionOperator::DoesNotBeginWith, 55),
    (ConditionOperator::EndsWith, 56),
    (ConditionOperator::DoesNotEndWith, 57),
];

impl ConditionOperator {
    /// Numeric code sent to the host.
    pub fn code(self) -> i32 {
        CODES
            .iter()
            .find(|(op, _)| *op == self)
            .map(|(_, code)| *code)
            .unwrap_or_default()
    }

    pub fn from_code(code: i32) -> Option<Self> {
        CODES.iter().find(|(_, c)| *c == code).map(|(op, _)| *op)
    }

    /// Returns `true` for operators that take no value.
    pub fn is_unary(self) -> bool {
        matches!(
            self,
            ConditionOperator::Null
                | ConditionOperator::NotNull
                | ConditionOperator::Yesterday
                | ConditionOperator::Today
                | ConditionOperator::Tomorrow
                | ConditionOperator::ThisWeek
                | ConditionOperator::ThisMonth
                | ConditionOperator::ThisYear
        )
    }
}

impl From<ConditionOperator> for i32 {
    fn from(op: ConditionOperator) -> Self {
        op.code()
    }
}

impl TryFrom<i32> for ConditionOperator {
    type Error = String;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        Self::from_code(code).ok_or_else(|| format!("unknown condition operator {code}"))
    }
}
