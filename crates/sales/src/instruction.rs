//! Decoding of spreadsheet rows into reconciliation instructions.
//!
//! Row layout (positions are fixed, no header row):
//!
//! | 0        | 1    | 2     | 3        | 4         |
//! |----------|------|-------|----------|-----------|
//! | offer_id | name | price | quantity | available |
//!
//! The seller is not part of the row; it comes from the upload request.

use thiserror::Error;

use salesync_core::{DomainError, OfferId, SellerId};

use crate::cell::Cell;
use crate::sale::{SaleKey, SaleRecord};

/// Number of meaningful cells in an upload row.
pub const ROW_WIDTH: usize = 5;

const OFFER_ID: usize = 0;
const NAME: usize = 1;
const PRICE: usize = 2;
const QUANTITY: usize = 3;
const AVAILABLE: usize = 4;

/// Why a row could not be turned into an instruction.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("column `{column}` is not an integer: {value:?}")]
    NotAnInteger { column: &'static str, value: String },

    #[error("invalid sale: {0}")]
    Invalid(#[from] DomainError),
}

/// What one row asks the catalog to look like afterwards.
///
/// `available = true` means the offer must exist with these fields,
/// `available = false` means it must be gone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconciliationInstruction {
    pub sale: SaleRecord,
    pub available: bool,
}

impl ReconciliationInstruction {
    /// Decode one row for `seller_id`.
    ///
    /// Cells past [`ROW_WIDTH`] are ignored and missing trailing cells count as
    /// empty, so a short row fails on its first missing integer column and a
    /// missing `available` flag reads as `false`.
    pub fn from_row(row: &[Cell], seller_id: SellerId) -> Result<Self, DecodeError> {
        let row = &row[..row.len().min(ROW_WIDTH)];

        let offer_id = integer_at(row, OFFER_ID, "offer_id")?;
        let name = row.get(NAME).map(Cell::as_text).unwrap_or_default();
        let price = integer_at(row, PRICE, "price")?;
        let quantity = integer_at(row, QUANTITY, "quantity")?;
        let available = row.get(AVAILABLE).is_some_and(Cell::as_bool);

        let key = SaleKey::new(seller_id, OfferId::new(offer_id));
        let sale = SaleRecord::new(key, name, price, quantity)?;

        Ok(Self { sale, available })
    }

    pub fn key(&self) -> SaleKey {
        self.sale.key()
    }
}

fn integer_at(row: &[Cell], idx: usize, column: &'static str) -> Result<i64, DecodeError> {
    let cell = row.get(idx).unwrap_or(&Cell::Empty);
    cell.as_integer().ok_or_else(|| DecodeError::NotAnInteger {
        column,
        value: cell.as_text(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const SELLER: SellerId = SellerId::new(1);

    fn row(offer: Cell, name: &str, price: Cell, quantity: Cell, available: Cell) -> Vec<Cell> {
        vec![offer, Cell::Text(name.to_string()), price, quantity, available]
    }

    #[test]
    fn decodes_a_well_formed_row() {
        let cells = row(
            Cell::Int(1),
            "offer_name",
            Cell::Int(100),
            Cell::Int(2),
            Cell::Bool(true),
        );

        let instruction = ReconciliationInstruction::from_row(&cells, SELLER).unwrap();

        assert_eq!(
            instruction,
            ReconciliationInstruction {
                sale: SaleRecord {
                    offer_id: OfferId::new(1),
                    seller_id: SELLER,
                    name: "offer_name".to_string(),
                    price: 100,
                    quantity: 2,
                },
                available: true,
            }
        );
    }

    #[test]
    fn rejects_bad_integer_columns() {
        let bad_rows = [
            (
                row(
                    Cell::Text("bad offer_id".into()),
                    "offer_1",
                    Cell::Int(300),
                    Cell::Int(10),
                    Cell::Bool(true),
                ),
                "offer_id",
            ),
            (
                row(
                    Cell::Int(4),
                    "offer_2",
                    Cell::Text("bad price".into()),
                    Cell::Int(2),
                    Cell::Bool(false),
                ),
                "price",
            ),
            (
                row(
                    Cell::Int(3),
                    "offer_3",
                    Cell::Int(10),
                    Cell::Text("bad quantity".into()),
                    Cell::Bool(false),
                ),
                "quantity",
            ),
        ];

        for (cells, expected_column) in bad_rows {
            match ReconciliationInstruction::from_row(&cells, SELLER) {
                Err(DecodeError::NotAnInteger { column, .. }) => {
                    assert_eq!(column, expected_column)
                }
                other => panic!("expected decode error for {expected_column}, got {other:?}"),
            }
        }
    }

    #[test]
    fn negative_amounts_fail_record_validation() {
        let negative_price = row(Cell::Int(1), "a", Cell::Int(-1), Cell::Int(0), Cell::Bool(true));
        assert!(matches!(
            ReconciliationInstruction::from_row(&negative_price, SELLER),
            Err(DecodeError::Invalid(DomainError::Validation(msg))) if msg.contains("price")
        ));

        let negative_quantity =
            row(Cell::Int(1), "a", Cell::Int(0), Cell::Int(-3), Cell::Bool(false));
        assert!(matches!(
            ReconciliationInstruction::from_row(&negative_quantity, SELLER),
            Err(DecodeError::Invalid(DomainError::Validation(msg))) if msg.contains("quantity")
        ));
    }

    #[test]
    fn empty_row_fails_on_offer_id() {
        assert!(matches!(
            ReconciliationInstruction::from_row(&[], SELLER),
            Err(DecodeError::NotAnInteger { column: "offer_id", .. })
        ));
        assert!(matches!(
            ReconciliationInstruction::from_row(&vec![Cell::Empty; ROW_WIDTH], SELLER),
            Err(DecodeError::NotAnInteger { column: "offer_id", .. })
        ));
    }

    #[test]
    fn missing_or_odd_available_flag_reads_false() {
        let short = vec![Cell::Int(1), Cell::Text("a".into()), Cell::Int(1), Cell::Int(1)];
        assert!(!ReconciliationInstruction::from_row(&short, SELLER).unwrap().available);

        let odd = row(Cell::Int(1), "a", Cell::Int(1), Cell::Int(1), Cell::Text("maybe".into()));
        assert!(!ReconciliationInstruction::from_row(&odd, SELLER).unwrap().available);
    }

    #[test]
    fn short_row_fails_on_missing_integer() {
        let cells = vec![Cell::Int(1), Cell::Text("a".into())];
        assert!(matches!(
            ReconciliationInstruction::from_row(&cells, SELLER),
            Err(DecodeError::NotAnInteger { column: "price", .. })
        ));
    }

    #[test]
    fn cells_past_row_width_are_ignored() {
        let mut cells = row(Cell::Int(1), "a", Cell::Int(2), Cell::Int(3), Cell::Bool(true));
        cells.push(Cell::Text("note".into()));
        cells.push(Cell::Int(-9));
        assert!(cells.len() > ROW_WIDTH);

        let instruction = ReconciliationInstruction::from_row(&cells, SELLER).unwrap();
        assert_eq!(instruction.sale.quantity, 3);
        assert!(instruction.available);
    }

    #[test]
    fn decoding_is_repeatable() {
        let cells = row(
            Cell::Float(5.0),
            "x",
            Cell::Float(10.0),
            Cell::Text("3".into()),
            Cell::Bool(false),
        );
        let first = ReconciliationInstruction::from_row(&cells, SELLER);
        let second = ReconciliationInstruction::from_row(&cells, SELLER);
        assert_eq!(first, second);
        assert_eq!(first.unwrap().key(), SaleKey::new(SELLER, OfferId::new(5)));
    }

    proptest! {
        #[test]
        fn valid_rows_round_trip(
            seller in any::<i64>(),
            offer in any::<i64>(),
            name in "[a-zA-Z0-9 _-]{0,24}",
            price in 0..=i64::MAX,
            quantity in 0..=i64::MAX,
            available in any::<bool>(),
        ) {
            let cells = vec![
                Cell::Int(offer),
                Cell::Text(name.clone()),
                Cell::Int(price),
                Cell::Int(quantity),
                Cell::Bool(available),
            ];

            let instruction =
                ReconciliationInstruction::from_row(&cells, SellerId::new(seller)).unwrap();

            let reserialized = vec![
                Cell::Int(instruction.sale.offer_id.get()),
                Cell::Text(instruction.sale.name.clone()),
                Cell::Int(instruction.sale.price),
                Cell::Int(instruction.sale.quantity),
                Cell::Bool(instruction.available),
            ];
            prop_assert_eq!(reserialized, cells);
            prop_assert_eq!(instruction.sale.seller_id, SellerId::new(seller));
        }

        #[test]
        fn non_numeric_integer_columns_fail(
            column in prop::sample::select(vec![OFFER_ID, PRICE, QUANTITY]),
            junk in "[a-zA-Z][a-zA-Z ]{0,12}",
        ) {
            let mut cells = vec![
                Cell::Int(1),
                Cell::Text("name".into()),
                Cell::Int(1),
                Cell::Int(1),
                Cell::Bool(true),
            ];
            cells[column] = Cell::Text(junk);

            prop_assert!(ReconciliationInstruction::from_row(&cells, SELLER).is_err());
        }
    }
}
