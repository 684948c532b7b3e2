use super::member::MemberId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A recorded expense. Never mutated once created.
///
/// `amount` is positive by convention only; the settlement engine accepts any value.
/// An empty `split_among` means the expense is shared by every current member.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Expense {
    pub id: String,
    pub description: String,
    pub amount: Decimal,
    pub paid_by: MemberId,
    #[serde(default)]
    pub split_among: Vec<MemberId>,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub created_at: i64,
}

impl Expense {
    /// Participants sharing this expense, falling back to `members` when unassigned.
    pub fn participants<'a>(&'a self, members: &'a [MemberId]) -> &'a [MemberId] {
        if self.split_among.is_empty() {
            members
        } else {
            &self.split_among
        }
    }
}
