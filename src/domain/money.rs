use crate::error::LedgerError;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Neg, Sub};

/// Magnitude below which a balance counts as settled.
pub const SETTLED_TOLERANCE: Decimal = dec!(0.01);

/// Largest amount a single expense or payment may carry.
pub const MAX_AMOUNT: Decimal = dec!(1000000000000);

/// Truncates a value toward zero at the cent boundary.
///
/// This is not round-half-up: `1.239` becomes `1.23` and `-1.239` becomes `-1.23`.
pub fn round2(value: Decimal) -> Decimal {
    value
        .round_dp_with_strategy(2, RoundingStrategy::ToZero)
        .normalize()
}

/// A signed net position of a member within a group.
///
/// Positive means the member is owed money, negative means the member owes money.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Balance(pub Decimal);

impl Balance {
    pub const ZERO: Self = Self(Decimal::ZERO);

    pub fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    /// Returns the balance truncated to whole cents.
    pub fn rounded(self) -> Self {
        Self(round2(self.0))
    }

    pub fn abs(self) -> Decimal {
        self.0.abs()
    }

    pub fn is_settled(self) -> bool {
        self.abs() < SETTLED_TOLERANCE
    }

    pub fn is_creditor(self) -> bool {
        self.0 > SETTLED_TOLERANCE
    }

    pub fn is_debtor(self) -> bool {
        self.0 < -SETTLED_TOLERANCE
    }

    /// Sum of two balances, or `None` if it leaves the `Decimal` range.
    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Self)
    }

    pub fn checked_sub(self, rhs: Self) -> Option<Self> {
        self.0.checked_sub(rhs.0).map(Self)
    }
}

impl fmt::Display for Balance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Decimal> for Balance {
    fn from(value: Decimal) -> Self {
        Self(value)
    }
}

impl Add for Balance {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Balance {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl Neg for Balance {
    type Output = Self;
    fn neg(self) -> Self::Output {
        Self(-self.0)
    }
}

/// A strictly positive amount, used where the ledger accepts new money.
///
/// Capped at [`MAX_AMOUNT`] so that summing a ledger stays far from the
/// `Decimal` range.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Amount(Decimal);

impl Amount {
    pub fn new(value: Decimal) -> Result<Self, LedgerError> {
        if value <= Decimal::ZERO {
            Err(LedgerError::ValidationError(format!(
                "Amount must be positive, got {value}"
            )))
        } else if value > MAX_AMOUNT {
            Err(LedgerError::ValidationError(format!(
                "Amount must not exceed {MAX_AMOUNT}, got {value}"
            )))
        } else {
            Ok(Self(value))
        }
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = LedgerError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

impl From<Amount> for Balance {
    fn from(amount: Amount) -> Self {
        Self(amount.0)
    }
}
