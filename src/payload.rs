//! Visual code payloads
//!
//! A payload is the plain text carried by a product's visual code:
//!
//! ```text
//! PRODAPP: <id>
//! Product Name: <name>
//! Barcode: <barcode>
//! Expiry Date: <YYYY-MM-DD>
//! Status: <AUTHORIZED|COUNTERFEIT>
//! ```
//!
//! Only the prefix and the identity line are required to resolve a product.
//! The remaining lines are informational; they are parsed when present so the
//! caller can compare them against the stored record.

use std::fmt;

use jiff::civil::Date;
use thiserror::Error;

use crate::products::{ProductLabel, ProductStatus};

/// Marker that identifies payloads produced by this application.
pub const PAYLOAD_PREFIX: &str = "PRODAPP:";

const NAME_FIELD: &str = "Product Name:";
const BARCODE_FIELD: &str = "Barcode:";
const EXPIRY_FIELD: &str = "Expiry Date:";
const STATUS_FIELD: &str = "Status:";

/// Payload parse errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PayloadError {
    /// The text does not start with [`PAYLOAD_PREFIX`]; it belongs to some other code.
    #[error("this code was not generated by the product tracking app")]
    Unrecognized,

    /// The prefix matched but the identity line could not be parsed.
    #[error("malformed product code: invalid product id `{0}`")]
    Malformed(String),
}

/// Decoded contents of a product visual code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductPayload {
    /// Store-assigned product id
    pub id: i64,

    /// Descriptive fields, when the payload carries a complete and well-formed set
    pub label: Option<ProductLabel>,
}

impl ProductPayload {
    /// Payload for a stored product.
    pub fn new(id: i64, label: ProductLabel) -> Self {
        Self {
            id,
            label: Some(label),
        }
    }

    /// Parse payload text.
    ///
    /// # Errors
    ///
    /// Returns [`PayloadError::Unrecognized`] when the prefix is missing and
    /// [`PayloadError::Malformed`] when the identity cannot be parsed.
    pub fn parse(text: &str) -> Result<Self, PayloadError> {
        let rest = text
            .strip_prefix(PAYLOAD_PREFIX)
            .ok_or(PayloadError::Unrecognized)?;

        let mut lines = rest.lines();
        let raw_id = lines.next().unwrap_or_default().trim();

        let id = raw_id
            .parse::<i64>()
            .map_err(|_error| PayloadError::Malformed(raw_id.to_string()))?;

        Ok(Self {
            id,
            label: parse_label(lines),
        })
    }
}

impl fmt::Display for ProductPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{PAYLOAD_PREFIX} {}", self.id)?;

        if let Some(label) = &self.label {
            write!(
                f,
                "\n{NAME_FIELD} {}\n{BARCODE_FIELD} {}\n{EXPIRY_FIELD} {}\n{STATUS_FIELD} {}",
                label.name, label.barcode, label.expiry_date, label.status
            )?;
        }

        Ok(())
    }
}

/// Whether `text` carries this application's payload prefix.
pub fn is_recognized(text: &str) -> bool {
    text.starts_with(PAYLOAD_PREFIX)
}

fn parse_label<'a>(mut lines: impl Iterator<Item = &'a str>) -> Option<ProductLabel> {
    let name = field(lines.next()?, NAME_FIELD)?;
    let barcode = field(lines.next()?, BARCODE_FIELD)?;
    let expiry_date = field(lines.next()?, EXPIRY_FIELD)?.parse::<Date>().ok()?;
    let status = field(lines.next()?, STATUS_FIELD)?
        .parse::<ProductStatus>()
        .ok()?;

    if lines.any(|line| !line.trim().is_empty()) {
        return None;
    }

    ProductLabel::new(name, barcode, expiry_date, status).ok()
}

fn field<'a>(line: &'a str, name: &str) -> Option<&'a str> {
    line.strip_prefix(name).map(str::trim)
}
