//! Product Records

use jiff::civil::Date;
use prodtrack::{
    payload::ProductPayload,
    products::{ProductLabel, ProductStatus},
};

use crate::ids::TypedId;

/// Product Id
pub type ProductId = TypedId<ProductRecord>;

/// Product Record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductRecord {
    /// Store-assigned identity, encoded into the product's visual code.
    pub id: ProductId,

    /// Product name.
    pub name: String,

    /// Barcode, unique across products.
    pub barcode: String,

    /// Expiry date.
    pub expiry_date: Date,

    /// Authenticity status.
    pub status: ProductStatus,
}

impl ProductRecord {
    /// Descriptive fields of the record.
    pub fn label(&self) -> ProductLabel {
        ProductLabel {
            name: self.name.clone(),
            barcode: self.barcode.clone(),
            expiry_date: self.expiry_date,
            status: self.status,
        }
    }

    /// Payload carried by this product's visual code.
    pub fn payload(&self) -> ProductPayload {
        ProductPayload::new(self.id.into_i64(), self.label())
    }
}
