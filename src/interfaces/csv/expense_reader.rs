use crate::domain::expense::Expense;
use crate::domain::member::MemberId;
use crate::error::{LedgerError, Result};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Read;

/// One CSV row as written, before names are split into members.
///
/// Every text column is taken verbatim: the CSV deserializer would otherwise
/// guess a type for fields such as `007` and hand back `7`.
#[derive(Debug, Deserialize)]
struct ExpenseRecord {
    id: String,
    description: String,
    #[serde(deserialize_with = "rust_decimal::serde::str::deserialize")]
    amount: Decimal,
    paid_by: String,
    #[serde(default)]
    split_among: String,
    #[serde(default)]
    date: String,
    #[serde(default)]
    created_at: i64,
}

impl From<ExpenseRecord> for Expense {
    fn from(record: ExpenseRecord) -> Self {
        Self {
            id: record.id,
            description: record.description,
            amount: record.amount,
            paid_by: MemberId::new(record.paid_by),
            split_among: split_members(&record.split_among),
            date: record.date,
            created_at: record.created_at,
        }
    }
}

/// Splits a `;`-separated column into member names, dropping blanks.
fn split_members(joined: &str) -> Vec<MemberId> {
    joined
        .split(';')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(MemberId::from)
        .collect()
}

/// Reads expenses from a CSV source.
///
/// Expected header: `id,description,amount,paid_by,split_among,date,created_at`.
/// `split_among` holds `;`-separated member names and may be left empty; `date` and
/// `created_at` may be omitted.
pub struct ExpenseReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> ExpenseReader<R> {
    /// Creates a new `ExpenseReader` from any `Read` source (e.g., File, Stdin).
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Returns an iterator that lazily reads and deserializes expenses.
    pub fn expenses(self) -> impl Iterator<Item = Result<Expense>> {
        self.reader
            .into_deserialize::<ExpenseRecord>()
            .map(|result| result.map(Expense::from).map_err(LedgerError::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn read_one(data: &str) -> Expense {
        ExpenseReader::new(data.as_bytes())
            .expenses()
            .next()
            .unwrap()
            .unwrap()
    }

    #[test]
    fn test_reader_valid_stream() {
        let data = "id,description,amount,paid_by,split_among,date,created_at\n\
                    1, Groceries, 45.60, Alice, , 2024-05-01, 10\n\
                    2, Cinema, 24, Bob, Alice;Bob, 2024-05-02, 20";
        let reader = ExpenseReader::new(data.as_bytes());
        let results: Vec<Result<Expense>> = reader.expenses().collect();

        assert_eq!(results.len(), 2);
        let first = results[0].as_ref().unwrap();
        assert_eq!(first.amount, dec!(45.60));
        assert!(first.split_among.is_empty());
        let second = results[1].as_ref().unwrap();
        assert_eq!(second.paid_by, MemberId::from("Bob"));
        assert_eq!(second.split_among.len(), 2);
    }

    #[test]
    fn test_reader_trims_split_names() {
        let expense = read_one(
            "id,description,amount,paid_by,split_among,date,created_at\n\
             e1, Dinner, 90.00, Alice, Bob; Carol ;, 2024-05-01, 1714521600",
        );

        assert_eq!(expense.id, "e1");
        assert_eq!(expense.description, "Dinner");
        assert_eq!(
            expense.split_among,
            vec![MemberId::from("Bob"), MemberId::from("Carol")]
        );
        assert_eq!(expense.created_at, 1714521600);
    }

    #[test]
    fn test_reader_keeps_numeric_looking_names() {
        let data = "id,description,amount,paid_by,split_among\n\
                    001,Snacks,10,007,007\n\
                    002,Snacks,10,007,nan\n\
                    003,Snacks,10,true,1e3;0.50";
        let expenses: Vec<Expense> = ExpenseReader::new(data.as_bytes())
            .expenses()
            .collect::<Result<_>>()
            .unwrap();

        assert_eq!(expenses[0].id, "001");
        assert_eq!(expenses[0].paid_by, MemberId::from("007"));
        assert_eq!(expenses[0].split_among, vec![MemberId::from("007")]);
        assert_eq!(expenses[1].split_among, vec![MemberId::from("nan")]);
        assert_eq!(expenses[2].paid_by, MemberId::from("true"));
        assert_eq!(
            expenses[2].split_among,
            vec![MemberId::from("1e3"), MemberId::from("0.50")]
        );
    }

    #[test]
    fn test_reader_keeps_amount_digits() {
        let expense = read_one(
            "id,description,amount,paid_by,split_among\n\
             1,Deposit,12345678901234567.89,Alice,Bob",
        );
        assert_eq!(expense.amount, dec!(12345678901234567.89));
    }

    #[test]
    fn test_reader_optional_trailing_columns() {
        let expense = read_one("id,description,amount,paid_by,split_among\n1,Taxi,12,Alice,Bob");

        assert_eq!(expense.date, "");
        assert_eq!(expense.created_at, 0);
    }

    #[test]
    fn test_reader_missing_split_column() {
        let expense = read_one("id,description,amount,paid_by\n1,Taxi,12,Alice");
        assert!(expense.split_among.is_empty());
    }

    #[test]
    fn test_reader_malformed_line() {
        let data = "id,description,amount,paid_by,split_among,date,created_at\n\
                    1,Taxi,twelve,Alice,,2024-05-01,0\n\
                    2,Taxi,12,Alice,,2024-05-01,0";
        let reader = ExpenseReader::new(data.as_bytes());
        let results: Vec<Result<Expense>> = reader.expenses().collect();

        assert!(matches!(results[0], Err(LedgerError::CsvError(_))));
        assert!(results[1].is_ok());
    }
}
