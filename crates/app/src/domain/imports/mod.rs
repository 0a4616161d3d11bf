//! Bulk import files
//!
//! An import file is a CSV spreadsheet export with a header row naming the
//! columns `Product Name`, `Barcode`, `Expiry Date` and `Status`. Extra
//! columns are ignored. The whole file is parsed before anything is stored,
//! so a structural problem (missing column, unreadable record, unparsable
//! date) aborts the import with nothing written. A row whose status, name or
//! barcode is invalid is set aside on its own and the rest of the file goes on.

use std::{io, path::Path};

use jiff::civil::{Date, DateTime};
use prodtrack::products::{LabelError, ProductLabel, ProductStatus};
use serde::Deserialize;
use thiserror::Error;

use crate::domain::products::data::{NewProduct, RejectedRow};

/// Columns every import file must carry.
pub const REQUIRED_COLUMNS: [&str; 4] = ["Product Name", "Barcode", "Expiry Date", "Status"];

/// Structural import failures. Any of these aborts the whole import.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("failed to read import file: {0}")]
    Io(#[from] io::Error),

    #[error("failed to parse import file: {0}")]
    Csv(#[from] csv::Error),

    #[error("import file is missing the `{0}` column")]
    MissingColumn(&'static str),

    #[error("row {row}: {reason}")]
    InvalidRow { row: usize, reason: String },
}

/// An import file split into storable rows and rows set aside.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedImport {
    /// Rows to store, in file order.
    pub rows: Vec<ImportRow>,

    /// Rows with an invalid status, name or barcode, in file order.
    pub rejected: Vec<RejectedRow>,
}

/// A parsed import row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportRow {
    /// Spreadsheet row number, counting the header as row 1.
    pub row: usize,

    /// Product to create.
    pub product: NewProduct,
}

#[derive(Debug, Deserialize)]
struct RawRow {
    #[serde(rename = "Product Name")]
    name: String,

    #[serde(rename = "Barcode")]
    barcode: String,

    #[serde(rename = "Expiry Date")]
    expiry_date: String,

    #[serde(rename = "Status")]
    status: String,
}

/// Read an import file from disk.
///
/// # Errors
///
/// Returns [`ImportError::Io`] if the file cannot be read.
pub async fn read_file(path: impl AsRef<Path>) -> Result<Vec<u8>, ImportError> {
    Ok(tokio::fs::read(path).await?)
}

/// Parse an import file into rows, in file order.
///
/// # Errors
///
/// Returns an [`ImportError`] if a required column is missing, a record is
/// unreadable, or a row carries an unparsable expiry date.
pub fn parse_products(contents: &[u8]) -> Result<ParsedImport, ImportError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(contents);

    let headers = reader.headers()?.clone();

    if let Some(missing) = REQUIRED_COLUMNS
        .iter()
        .find(|column| !headers.iter().any(|header| header == **column))
    {
        return Err(ImportError::MissingColumn(*missing));
    }

    let mut parsed = ParsedImport::default();

    for (index, raw) in reader.deserialize::<RawRow>().enumerate() {
        let row = index + 2;
        let raw = raw?;

        let expiry_date =
            parse_date(&raw.expiry_date).map_err(|reason| ImportError::InvalidRow { row, reason })?;

        match parse_row(&raw, expiry_date) {
            Ok(product) => parsed.rows.push(ImportRow { row, product }),
            Err(reason) => parsed.rejected.push(RejectedRow {
                row,
                barcode: raw.barcode,
                reason,
            }),
        }
    }

    Ok(parsed)
}

fn parse_row(raw: &RawRow, expiry_date: Date) -> Result<NewProduct, String> {
    let status = raw
        .status
        .parse::<ProductStatus>()
        .map_err(|error| error.to_string())?;

    ProductLabel::new(&raw.name, &raw.barcode, expiry_date, status)
        .map_err(|error: LabelError| error.to_string())
}

/// Accept `YYYY-MM-DD`, or a spreadsheet datetime truncated to its date.
fn parse_date(raw: &str) -> Result<Date, String> {
    raw.parse::<Date>()
        .or_else(|_error| raw.parse::<DateTime>().map(|datetime| datetime.date()))
        .map_err(|error| format!("invalid expiry date `{raw}`: {error}"))
}
