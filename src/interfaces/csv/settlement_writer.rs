use crate::application::ledger::GroupSummary;
use crate::domain::member::Balances;
use crate::domain::settlement::Settlement;
use crate::error::Result;
use std::io::Write;

/// Writes balances and settlement plans as CSV tables.
pub struct SettlementWriter<W: Write> {
    output: W,
}

impl<W: Write> SettlementWriter<W> {
    /// Creates a writer over any `Write` sink (e.g., a locked stdout).
    pub fn new(output: W) -> Self {
        Self { output }
    }

    /// Writes a `member,balance` table, one row per member.
    pub fn write_balances(&mut self, balances: &Balances) -> Result<()> {
        let mut writer = csv::Writer::from_writer(&mut self.output);
        writer.write_record(["member", "balance"])?;
        for (member, balance) in balances {
            let balance = balance.value().normalize().to_string();
            writer.write_record([member.as_str(), balance.as_str()])?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Writes a `from,to,amount` table in plan order.
    pub fn write_settlements(&mut self, settlements: &[Settlement]) -> Result<()> {
        let mut writer = csv::Writer::from_writer(&mut self.output);
        writer.write_record(["from", "to", "amount"])?;
        for settlement in settlements {
            let amount = settlement.amount.normalize().to_string();
            writer.write_record([
                settlement.from.as_str(),
                settlement.to.as_str(),
                amount.as_str(),
            ])?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Writes both tables separated by a blank line.
    pub fn write_summary(&mut self, summary: &GroupSummary) -> Result<()> {
        self.write_balances(&summary.balances)?;
        writeln!(self.output)?;
        self.write_settlements(&summary.settlements)
    }
}

/// Renders a summary as pretty-printed JSON.
pub fn summary_json(summary: &GroupSummary) -> Result<String> {
    Ok(serde_json::to_string_pretty(summary)?)
}
