//! Sales catalog domain module.
//!
//! This crate contains the sale record model and the spreadsheet row decoding
//! rules, implemented purely as deterministic domain logic (no IO, no HTTP, no
//! storage).

pub mod cell;
pub mod instruction;
pub mod sale;

pub use cell::Cell;
pub use instruction::{DecodeError, ROW_WIDTH, ReconciliationInstruction};
pub use sale::{SaleFilter, SaleKey, SaleRecord};
