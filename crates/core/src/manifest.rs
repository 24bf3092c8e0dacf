//! Order manifest loading.
//!
//! The manifest is a CSV file where the first row is a header and each
//! subsequent row carries an order number in its first cell. Blank first
//! cells are skipped; anything else that is not a positive integer aborts
//! the load, so a malformed manifest never starts a partial run.

use std::path::Path;
use thiserror::Error;

/// Customer-facing order number, the unit of work for a run.
pub type OrderNumber = u64;

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("Manifest file not found: {0}")]
    FileNotFound(String),

    #[error("Failed to read manifest: {0}")]
    Read(String),

    #[error("Row {row}: '{value}' is not a valid order number")]
    BadOrderNumber { row: usize, value: String },
}

/// Load the list of order numbers to cancel from a manifest file.
///
/// The header row is skipped. Rows whose first cell is blank are skipped.
/// A non-blank first cell that does not parse as a positive integer is a
/// fatal error for the whole run.
pub fn load_order_numbers(path: &Path) -> Result<Vec<OrderNumber>, ManifestError> {
    if !path.exists() {
        return Err(ManifestError::FileNotFound(path.display().to_string()));
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(|e| ManifestError::Read(e.to_string()))?;

    let mut order_numbers = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        // Row 1 is the header, so data rows start at 2.
        let row = idx + 2;
        let record = record.map_err(|e| ManifestError::Read(e.to_string()))?;

        let cell = record.get(0).unwrap_or("").trim();
        if cell.is_empty() {
            continue;
        }

        let number: OrderNumber = cell.parse().map_err(|_| ManifestError::BadOrderNumber {
            row,
            value: cell.to_string(),
        })?;
        if number == 0 {
            return Err(ManifestError::BadOrderNumber {
                row,
                value: cell.to_string(),
            });
        }

        order_numbers.push(number);
    }

    Ok(order_numbers)
}
