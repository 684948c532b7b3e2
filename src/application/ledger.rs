use crate::domain::engine::SettlementEngine;
use crate::domain::expense::Expense;
use crate::domain::member::{Balances, MemberId};
use crate::domain::money::Amount;
use crate::domain::ports::LedgerStoreBox;
use crate::domain::settlement::{Debt, Settlement};
use crate::error::{LedgerError, Result};
use chrono::Utc;
use rust_decimal::Decimal;
use serde::Serialize;

/// Request to record a new expense.
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpense {
    pub description: String,
    pub amount: Decimal,
    pub paid_by: MemberId,
    /// Empty means shared by every member at calculation time.
    pub split_among: Vec<MemberId>,
}

/// Everything the presentation layer needs to render a group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupSummary {
    pub balances: Balances,
    pub settlements: Vec<Settlement>,
    pub debts: Vec<Debt>,
    pub all_settled: bool,
}

/// The group's state owner.
///
/// `GroupLedger` validates every mutation before it reaches the store, then
/// recomputes balances from the full snapshot whenever a summary is requested.
pub struct GroupLedger {
    store: LedgerStoreBox,
    engine: SettlementEngine,
}

impl GroupLedger {
    /// Creates a new `GroupLedger` over the given store.
    pub fn new(store: LedgerStoreBox) -> Self {
        Self {
            store,
            engine: SettlementEngine,
        }
    }

    /// Adds a member to the roster. Returns `false` if the name was already taken.
    pub async fn add_member(&self, name: &str) -> Result<bool> {
        let name = name.trim();
        if name.is_empty() {
            return Err(LedgerError::ValidationError(
                "Member name must not be empty".to_string(),
            ));
        }

        let added = self.store.add_member(MemberId::from(name)).await?;
        if added {
            tracing::info!(member = name, "member added");
        }
        Ok(added)
    }

    /// Members in the order they joined.
    pub async fn members(&self) -> Result<Vec<MemberId>> {
        self.store.members().await
    }

    /// Every recorded expense, payments included.
    pub async fn expenses(&self) -> Result<Vec<Expense>> {
        self.store.expenses().await
    }

    /// Validates and records an expense, returning the stored record.
    pub async fn add_expense(&self, request: NewExpense) -> Result<Expense> {
        let amount = Amount::new(request.amount)?;
        let description = request.description.trim();
        if description.is_empty() {
            return Err(LedgerError::ValidationError(
                "Expense description must not be empty".to_string(),
            ));
        }

        self.ensure_members(std::iter::once(&request.paid_by).chain(&request.split_among))
            .await?;

        let expense = self
            .build_expense(
                description.to_string(),
                amount,
                request.paid_by,
                request.split_among,
            )
            .await?;
        self.store.append_expense(expense.clone()).await?;
        tracing::info!(
            expense = %expense.id,
            amount = %expense.amount,
            paid_by = %expense.paid_by,
            "expense recorded"
        );
        Ok(expense)
    }

    /// Records a direct payment from one member to another.
    ///
    /// Stored as an expense paid by `from` and owed entirely by `to`, so the payer's
    /// balance rises by `amount` and the receiver's falls by the same.
    pub async fn record_payment(
        &self,
        from: &MemberId,
        to: &MemberId,
        amount: Decimal,
    ) -> Result<Expense> {
        let amount = Amount::new(amount)?;
        if from == to {
            return Err(LedgerError::ValidationError(format!(
                "{from} cannot pay themselves"
            )));
        }

        self.ensure_members([from, to]).await?;

        let expense = self
            .build_expense(
                format!("Payment: {from} -> {to}"),
                amount,
                from.clone(),
                vec![to.clone()],
            )
            .await?;
        self.store.append_expense(expense.clone()).await?;
        tracing::info!(%from, %to, amount = %amount.value(), "payment recorded");
        Ok(expense)
    }

    /// Records an expense that already carries its own id and timestamps,
    /// as read from an export. Subject to the same checks as `add_expense`;
    /// the store rejects an id that is already taken.
    pub async fn import_expense(&self, expense: Expense) -> Result<()> {
        Amount::new(expense.amount)?;
        self.ensure_members(std::iter::once(&expense.paid_by).chain(&expense.split_among))
            .await?;

        let id = expense.id.clone();
        self.store.append_expense(expense).await?;
        tracing::debug!(expense = %id, "expense imported");
        Ok(())
    }

    /// Removes an expense by id. Balances no longer include it afterwards.
    pub async fn remove_expense(&self, id: &str) -> Result<Expense> {
        let removed = self
            .store
            .remove_expense(id)
            .await?
            .ok_or_else(|| LedgerError::NotFound(format!("expense {id}")))?;
        tracing::info!(expense = id, "expense removed");
        Ok(removed)
    }

    /// Current balances, recomputed from the full ledger.
    pub async fn balances(&self) -> Result<Balances> {
        let (members, expenses) = self.store.snapshot().await?;
        Ok(self.engine.compute_balances(&expenses, &members))
    }

    /// Balances with the settlement plan derived from them.
    pub async fn summary(&self) -> Result<GroupSummary> {
        let balances = self.balances().await?;
        let settlements = self.engine.compute_settlements(&balances);
        let debts = settlements.iter().cloned().map(Debt::from).collect();
        let all_settled = self.engine.are_all_debts_settled(&balances);

        Ok(GroupSummary {
            balances,
            settlements,
            debts,
            all_settled,
        })
    }

    async fn ensure_members<'a>(
        &self,
        candidates: impl IntoIterator<Item = &'a MemberId>,
    ) -> Result<()> {
        let members = self.store.members().await?;
        match candidates
            .into_iter()
            .find(|candidate| !members.contains(*candidate))
        {
            Some(unknown) => Err(LedgerError::UnknownMember(unknown.to_string())),
            None => Ok(()),
        }
    }

    async fn build_expense(
        &self,
        description: String,
        amount: Amount,
        paid_by: MemberId,
        split_among: Vec<MemberId>,
    ) -> Result<Expense> {
        // Imported expenses may already occupy generated ids.
        let mut id = self.store.next_id().await?.to_string();
        while self.store.exists(&id).await? {
            id = self.store.next_id().await?.to_string();
        }
        let now = Utc::now();
        Ok(Expense {
            id,
            description,
            amount: amount.into(),
            paid_by,
            split_among,
            date: now.format("%Y-%m-%d").to_string(),
            created_at: now.timestamp_millis(),
        })
    }
}
