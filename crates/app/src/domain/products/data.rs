//! Products Data

use image::GrayImage;
use prodtrack::products::{ProductLabel, ProductStatus};

use crate::domain::products::records::ProductRecord;

/// New Product Data
///
/// A product before the store assigns it an id.
pub type NewProduct = ProductLabel;

/// A freshly stored product and its visual code.
///
/// The image is not persisted; callers render or save it.
#[derive(Debug, Clone)]
pub struct CreatedProduct {
    pub product: ProductRecord,
    pub image: GrayImage,
}

/// Result of resolving a scanned payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductDetails {
    /// The stored product the payload points at.
    pub product: ProductRecord,

    /// The payload carried a complete label that disagrees with the stored row.
    pub label_mismatch: bool,
}

impl ProductDetails {
    /// Authenticity verdict, taken from the stored record.
    pub fn verdict(&self) -> ProductStatus {
        self.product.status
    }
}

/// A bulk import row that was skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedRow {
    /// Spreadsheet row number, counting the header as row 1.
    pub row: usize,

    /// Barcode of the skipped row.
    pub barcode: String,

    /// Why the row was skipped.
    pub reason: String,
}

/// Outcome of a bulk import.
#[derive(Debug, Clone, Default)]
pub struct BulkImportReport {
    /// Stored products with their visual codes, in file order.
    pub created: Vec<CreatedProduct>,

    /// Rows skipped for an invalid field or a duplicate barcode, in file order.
    pub rejected: Vec<RejectedRow>,
}

impl BulkImportReport {
    /// Number of rows stored.
    pub fn success_count(&self) -> usize {
        self.created.len()
    }
}
