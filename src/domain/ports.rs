use super::expense::Expense;
use super::member::MemberId;
use crate::error::Result;
use async_trait::async_trait;

/// Owner of a group's roster and expense ledger.
///
/// Implementations hand out consistent snapshots; the settlement engine only ever
/// sees what these methods return.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Adds a member. Returns `false` if the member was already present.
    async fn add_member(&self, member: MemberId) -> Result<bool>;
    /// Members in the order they joined.
    async fn members(&self) -> Result<Vec<MemberId>>;
    /// Appends an expense. Fails with a validation error if its id is taken.
    async fn append_expense(&self, expense: Expense) -> Result<()>;
    /// Whether an expense with this id is recorded.
    async fn exists(&self, id: &str) -> Result<bool>;
    /// Removes an expense by id, returning it if it existed.
    async fn remove_expense(&self, id: &str) -> Result<Option<Expense>>;
    /// Expenses in the order they were recorded.
    async fn expenses(&self) -> Result<Vec<Expense>>;
    /// Roster and expenses read together, as of a single instant.
    async fn snapshot(&self) -> Result<(Vec<MemberId>, Vec<Expense>)>;
    /// Allocates the next expense identifier.
    async fn next_id(&self) -> Result<u64>;
}

pub type LedgerStoreBox = Box<dyn LedgerStore>;
