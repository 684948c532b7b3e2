pub mod expense_reader;
pub mod settlement_writer;
