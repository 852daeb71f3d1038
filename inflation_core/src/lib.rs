// inflation_core/src/lib.rs

//! Inflation-adjusted value conversion over a read-only price-index table.

pub mod feed;
pub mod error;
pub mod format;
pub mod settings;
pub mod converter;
pub mod index_table;

pub use converter::{calculate, CalculationRequest, CalculationResult, Converter, RawInput};
pub use error::{CalcError, InputField};
pub use index_table::{IndexSource, IndexTable};
