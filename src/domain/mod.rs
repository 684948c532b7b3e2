//! Domain layer: value objects, the expense model and the settlement engine.
//!
//! Nothing in here performs I/O. The engine is a pure function of the expense
//! snapshot and roster it is handed.

pub mod engine;
pub mod expense;
pub mod member;
pub mod money;
pub mod ports;
pub mod settlement;
