use crate::domain::expense::Expense;
use crate::domain::member::MemberId;
use crate::domain::ports::LedgerStore;
use crate::error::{LedgerError, Result};
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Default)]
struct LedgerState {
    members: Vec<MemberId>,
    expenses: Vec<Expense>,
    ids: HashSet<String>,
    last_id: u64,
}

/// A thread-safe in-memory ledger.
///
/// All state sits behind a single `Arc<RwLock<..>>`, so writers are serialized and
/// readers always observe a consistent roster and expense list.
#[derive(Default, Clone)]
pub struct InMemoryLedgerStore {
    state: Arc<RwLock<LedgerState>>,
}

impl InMemoryLedgerStore {
    /// Creates a new, empty in-memory ledger.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LedgerStore for InMemoryLedgerStore {
    async fn add_member(&self, member: MemberId) -> Result<bool> {
        let mut state = self.state.write().await;
        if state.members.contains(&member) {
            return Ok(false);
        }
        state.members.push(member);
        Ok(true)
    }

    async fn members(&self) -> Result<Vec<MemberId>> {
        Ok(self.state.read().await.members.clone())
    }

    async fn append_expense(&self, expense: Expense) -> Result<()> {
        let mut state = self.state.write().await;
        if !state.ids.insert(expense.id.clone()) {
            return Err(LedgerError::ValidationError(format!(
                "Duplicate expense id {}",
                expense.id
            )));
        }
        state.expenses.push(expense);
        Ok(())
    }

    async fn exists(&self, id: &str) -> Result<bool> {
        Ok(self.state.read().await.ids.contains(id))
    }

    async fn remove_expense(&self, id: &str) -> Result<Option<Expense>> {
        let mut state = self.state.write().await;
        if !state.ids.remove(id) {
            return Ok(None);
        }
        let position = state.expenses.iter().position(|expense| expense.id == id);
        Ok(position.map(|index| state.expenses.remove(index)))
    }

    async fn expenses(&self) -> Result<Vec<Expense>> {
        Ok(self.state.read().await.expenses.clone())
    }

    async fn snapshot(&self) -> Result<(Vec<MemberId>, Vec<Expense>)> {
        let state = self.state.read().await;
        Ok((state.members.clone(), state.expenses.clone()))
    }

    async fn next_id(&self) -> Result<u64> {
        let mut state = self.state.write().await;
        state.last_id += 1;
        Ok(state.last_id)
    }
}
