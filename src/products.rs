//! Products

use std::{fmt, str::FromStr};

use jiff::civil::Date;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Product authenticity status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProductStatus {
    /// Genuine product.
    Authorized,

    /// Known counterfeit.
    Counterfeit,
}

impl ProductStatus {
    /// Stored / printed representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Authorized => "AUTHORIZED",
            Self::Counterfeit => "COUNTERFEIT",
        }
    }

}

impl fmt::Display for ProductStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown status string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown product status `{0}` (expected AUTHORIZED or COUNTERFEIT)")]
pub struct ParseStatusError(pub String);

impl FromStr for ProductStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "AUTHORIZED" => Ok(Self::Authorized),
            "COUNTERFEIT" => Ok(Self::Counterfeit),
            other => Err(ParseStatusError(other.to_string())),
        }
    }
}

/// Errors raised when validating a product label.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LabelError {
    /// Product name is empty or whitespace.
    #[error("product name cannot be empty")]
    EmptyName,

    /// Barcode is empty or whitespace.
    #[error("barcode cannot be empty")]
    EmptyBarcode,

    /// A field contains a line break, which would corrupt the payload.
    #[error("{0} cannot contain line breaks")]
    LineBreak(&'static str),

    /// A field starts or ends with whitespace, which the payload cannot carry.
    #[error("{0} cannot start or end with whitespace")]
    Padded(&'static str),
}

/// The descriptive fields of a product, everything except its identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductLabel {
    /// Product name
    pub name: String,

    /// Barcode, unique across products
    pub barcode: String,

    /// Expiry date
    pub expiry_date: Date,

    /// Authenticity status
    pub status: ProductStatus,
}

impl ProductLabel {
    /// Build a validated label, trimming surrounding whitespace from the name
    /// and barcode.
    ///
    /// # Errors
    ///
    /// Returns a [`LabelError`] if the name or barcode is empty or spans lines.
    pub fn new(
        name: impl AsRef<str>,
        barcode: impl AsRef<str>,
        expiry_date: Date,
        status: ProductStatus,
    ) -> Result<Self, LabelError> {
        let label = Self {
            name: name.as_ref().trim().to_string(),
            barcode: barcode.as_ref().trim().to_string(),
            expiry_date,
            status,
        };

        label.validate()?;

        Ok(label)
    }

    /// Check the non-empty, single-line and unpadded constraints.
    ///
    /// # Errors
    ///
    /// Returns a [`LabelError`] describing the first violated constraint.
    pub fn validate(&self) -> Result<(), LabelError> {
        if self.name.trim().is_empty() {
            return Err(LabelError::EmptyName);
        }

        if self.barcode.trim().is_empty() {
            return Err(LabelError::EmptyBarcode);
        }

        if self.name.contains(['\n', '\r']) {
            return Err(LabelError::LineBreak("product name"));
        }

        if self.barcode.contains(['\n', '\r']) {
            return Err(LabelError::LineBreak("barcode"));
        }

        // the payload parser trims every field
        if self.name.trim() != self.name {
            return Err(LabelError::Padded("product name"));
        }

        if self.barcode.trim() != self.barcode {
            return Err(LabelError::Padded("barcode"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn status_round_trips_through_str() -> TestResult {
        assert_eq!("AUTHORIZED".parse::<ProductStatus>()?, ProductStatus::Authorized);
        assert_eq!(" COUNTERFEIT ".parse::<ProductStatus>()?, ProductStatus::Counterfeit);
        assert_eq!(ProductStatus::Counterfeit.to_string(), "COUNTERFEIT");

        Ok(())
    }

    #[test]
    fn status_is_case_sensitive() {
        let result = "authorized".parse::<ProductStatus>();

        assert_eq!(result, Err(ParseStatusError("authorized".to_string())));
    }

    #[test]
    fn label_rejects_blank_name() {
        let result = ProductLabel::new("  ", "BC-1", date(2025, 1, 1), ProductStatus::Authorized);

        assert_eq!(result, Err(LabelError::EmptyName));
    }

    #[test]
    fn label_rejects_blank_barcode() {
        let result = ProductLabel::new("Widget", "", date(2025, 1, 1), ProductStatus::Authorized);

        assert_eq!(result, Err(LabelError::EmptyBarcode));
    }

    #[test]
    fn new_trims_name_and_barcode() -> TestResult {
        let label = ProductLabel::new(" Widget ", "BC-1\t", date(2025, 1, 1), ProductStatus::Authorized)?;

        assert_eq!(label.name, "Widget");
        assert_eq!(label.barcode, "BC-1");

        Ok(())
    }

    #[test]
    fn validate_rejects_padded_fields() {
        let label = ProductLabel {
            name: "Widget ".to_string(),
            barcode: "BC-1".to_string(),
            expiry_date: date(2025, 1, 1),
            status: ProductStatus::Authorized,
        };

        assert_eq!(label.validate(), Err(LabelError::Padded("product name")));
    }

    #[test]
    fn label_rejects_multiline_name() {
        let result = ProductLabel::new(
            "Widget\nStatus: AUTHORIZED",
            "BC-1",
            date(2025, 1, 1),
            ProductStatus::Counterfeit,
        );

        assert_eq!(result, Err(LabelError::LineBreak("product name")));
    }
}
