use super::member::MemberId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A suggested transfer from a debtor to a creditor.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Clone)]
pub struct Settlement {
    pub from: MemberId,
    pub to: MemberId,
    pub amount: Decimal,
}

/// A debt relationship between two members, as shown in detailed views.
///
/// Carries the same fields as [`Settlement`]; the two are kept apart so callers
/// can tell a suggestion from an outstanding obligation.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Clone)]
pub struct Debt {
    pub from: MemberId,
    pub to: MemberId,
    pub amount: Decimal,
}

impl From<Settlement> for Debt {
    fn from(settlement: Settlement) -> Self {
        Self {
            from: settlement.from,
            to: settlement.to,
            amount: settlement.amount,
        }
    }
}
