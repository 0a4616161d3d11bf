//! Products service errors.

use prodtrack::{payload::PayloadError, products::LabelError, visual::VisualCodeError};
use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

use crate::domain::imports::ImportError;

#[derive(Debug, Error)]
pub enum ProductsServiceError {
    #[error("a product with this barcode already exists")]
    AlreadyExists,

    #[error("product not found")]
    NotFound,

    #[error("this code was not generated by the product tracking app")]
    Unrecognized,

    #[error("malformed product code: invalid product id `{0}`")]
    Malformed(String),

    #[error("invalid data")]
    InvalidData,

    #[error("invalid product: {0}")]
    InvalidLabel(#[from] LabelError),

    #[error(transparent)]
    Encode(#[from] VisualCodeError),

    #[error("import failed: {0}")]
    Import(#[from] ImportError),

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for ProductsServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::UniqueViolation) => Self::AlreadyExists,
            Some(ErrorKind::CheckViolation | ErrorKind::NotNullViolation) => Self::InvalidData,
            Some(ErrorKind::ForeignKeyViolation | ErrorKind::Other | _) | None => Self::Sql(error),
        }
    }
}

impl From<PayloadError> for ProductsServiceError {
    fn from(error: PayloadError) -> Self {
        match error {
            PayloadError::Unrecognized => Self::Unrecognized,
            PayloadError::Malformed(raw) => Self::Malformed(raw),
        }
    }
}
