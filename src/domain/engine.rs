use super::expense::Expense;
use super::member::{Balances, MemberId};
use super::money::{Balance, SETTLED_TOLERANCE, round2};
use super::settlement::{Debt, Settlement};
use rust_decimal::Decimal;
use std::collections::{BTreeMap, BTreeSet};

/// Stateless balance and settlement computations over an expense snapshot.
///
/// Every operation is total: malformed input (negative amounts, participants
/// missing from the roster, self-payments) is accepted as-is. Validation belongs
/// to the caller, see [`crate::application::ledger::GroupLedger`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SettlementEngine;

impl SettlementEngine {
    /// Computes each member's net balance from scratch.
    ///
    /// Every member in `members` is present in the result, even with no activity.
    /// Payers and participants outside the roster are added on first sight.
    /// `split_among` is used as given, so a name listed twice pays two shares.
    /// An expense whose postings would leave the `Decimal` range is skipped whole.
    pub fn compute_balances(&self, expenses: &[Expense], members: &[MemberId]) -> Balances {
        let mut seen = BTreeSet::new();
        let roster: Vec<MemberId> = members
            .iter()
            .filter(|member| seen.insert(*member))
            .cloned()
            .collect();
        let mut balances: Balances = roster
            .iter()
            .map(|member| (member.clone(), Balance::ZERO))
            .collect();

        for expense in expenses {
            let participants = expense.participants(&roster);
            if participants.is_empty() {
                tracing::debug!(expense = %expense.id, "skipping expense without participants");
                continue;
            }

            match post_expense(&balances, expense, participants) {
                Some(updates) => balances.extend(updates),
                None => tracing::warn!(
                    expense = %expense.id,
                    amount = %expense.amount,
                    "skipping expense that overflows member balances"
                ),
            }
        }

        for balance in balances.values_mut() {
            *balance = balance.rounded();
        }

        tracing::trace!(members = balances.len(), expenses = expenses.len(), "balances computed");
        balances
    }

    /// Derives a settlement plan by repeatedly matching the largest creditor
    /// with the largest debtor.
    ///
    /// Balances within the settled tolerance are ignored. Ties go to the
    /// lexicographically smallest member. The plan is a greedy heuristic and is
    /// not guaranteed to be the minimum number of transfers.
    pub fn compute_settlements(&self, balances: &Balances) -> Vec<Settlement> {
        let mut creditors: BTreeMap<&MemberId, Decimal> = balances
            .iter()
            .filter(|(_, balance)| balance.is_creditor())
            .map(|(member, balance)| (member, balance.value()))
            .collect();
        let mut debtors: BTreeMap<&MemberId, Decimal> = balances
            .iter()
            .filter(|(_, balance)| balance.is_debtor())
            .map(|(member, balance)| (member, balance.abs()))
            .collect();

        let mut settlements = Vec::new();
        while let (Some((creditor, credit)), Some((debtor, debt))) =
            (largest(&creditors), largest(&debtors))
        {
            let amount = credit.min(debt);
            settlements.push(Settlement {
                from: debtor.clone(),
                to: creditor.clone(),
                amount: round2(amount),
            });

            let remaining_credit = credit - amount;
            let remaining_debt = debt - amount;
            if remaining_credit < SETTLED_TOLERANCE {
                creditors.remove(creditor);
            } else {
                creditors.insert(creditor, remaining_credit);
            }
            if remaining_debt < SETTLED_TOLERANCE {
                debtors.remove(debtor);
            } else {
                debtors.insert(debtor, remaining_debt);
            }
        }

        tracing::debug!(transfers = settlements.len(), "settlement plan computed");
        settlements
    }

    /// The settlement plan, presented as debt relationships.
    pub fn compute_detailed_debts(&self, balances: &Balances) -> Vec<Debt> {
        self.compute_settlements(balances)
            .into_iter()
            .map(Debt::from)
            .collect()
    }

    /// True when every balance is within the settled tolerance.
    pub fn are_all_debts_settled(&self, balances: &Balances) -> bool {
        balances.values().all(|balance| balance.is_settled())
    }

    /// Shifts `amount` from `to`'s balance onto `from`'s and returns the new map.
    ///
    /// Missing members start at zero. The input map is left untouched. A payment
    /// that would overflow either balance is not applied.
    pub fn apply_payment(
        &self,
        balances: &Balances,
        from: &MemberId,
        to: &MemberId,
        amount: Decimal,
    ) -> Balances {
        let mut updated = shift(balances, from, to, Balance::new(amount)).unwrap_or_else(|| {
            tracing::warn!(%from, %to, %amount, "skipping payment that overflows member balances");
            balances.clone()
        });
        for balance in updated.values_mut() {
            *balance = balance.rounded();
        }
        updated
    }

    /// A member's balance, zero when the member is absent.
    pub fn person_total_balance(&self, balances: &Balances, member: &str) -> Balance {
        balances.get(member).copied().unwrap_or_default()
    }
}

/// Credits the payer and debits each participant one share, without touching
/// `balances`. Returns the changed entries, or `None` on overflow.
fn post_expense(
    balances: &Balances,
    expense: &Expense,
    participants: &[MemberId],
) -> Option<Balances> {
    let share = Balance::new(expense.amount / Decimal::from(participants.len()));
    let current = |updates: &Balances, member: &MemberId| {
        updates
            .get(member)
            .or_else(|| balances.get(member))
            .copied()
            .unwrap_or_default()
    };

    let mut updates = Balances::new();
    let credited =
        current(&updates, &expense.paid_by).checked_add(Balance::new(expense.amount))?;
    updates.insert(expense.paid_by.clone(), credited);
    for participant in participants {
        let debited = current(&updates, participant).checked_sub(share)?;
        updates.insert(participant.clone(), debited);
    }
    Some(updates)
}

fn shift(
    balances: &Balances,
    from: &MemberId,
    to: &MemberId,
    amount: Balance,
) -> Option<Balances> {
    let mut updated = balances.clone();
    let credited = updated.get(from).copied().unwrap_or_default().checked_add(amount)?;
    updated.insert(from.clone(), credited);
    let debited = updated.get(to).copied().unwrap_or_default().checked_sub(amount)?;
    updated.insert(to.clone(), debited);
    Some(updated)
}

/// Largest entry; on ties the first key in map order wins.
fn largest<'a>(entries: &BTreeMap<&'a MemberId, Decimal>) -> Option<(&'a MemberId, Decimal)> {
    entries
        .iter()
        .fold(None, |best, (&member, &amount)| match best {
            Some((_, top)) if top >= amount => best,
            _ => Some((member, amount)),
        })
}
