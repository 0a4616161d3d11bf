//! Products service.

use async_trait::async_trait;
use mockall::automock;
use prodtrack::{payload::ProductPayload, visual};
use sqlx::Acquire;
use tracing::{info, warn};

use crate::{
    database::Db,
    domain::{
        imports::{self, ImportRow, ParsedImport},
        products::{
            data::{BulkImportReport, CreatedProduct, NewProduct, ProductDetails, RejectedRow},
            errors::ProductsServiceError,
            records::{ProductId, ProductRecord},
            repository::SqliteProductsRepository,
        },
    },
};

#[derive(Debug, Clone)]
pub struct SqliteProductsService {
    db: Db,
    repository: SqliteProductsRepository,
}

impl SqliteProductsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: SqliteProductsRepository::new(),
        }
    }
}

#[async_trait]
impl ProductsService for SqliteProductsService {
    async fn list_products(&self) -> Result<Vec<ProductRecord>, ProductsServiceError> {
        let mut tx = self.db.begin().await?;

        let products = self.repository.list_products(&mut tx).await?;

        tx.commit().await?;

        Ok(products)
    }

    async fn get_product(&self, product: ProductId) -> Result<ProductRecord, ProductsServiceError> {
        let mut tx = self.db.begin().await?;

        let product = self.repository.get_product(&mut tx, product).await?;

        tx.commit().await?;

        Ok(product)
    }

    async fn create_product(
        &self,
        product: NewProduct,
    ) -> Result<CreatedProduct, ProductsServiceError> {
        product.validate()?;

        let mut tx = self.db.begin().await?;

        let product = self.repository.create_product(&mut tx, &product).await?;

        // an unencodable payload must not leave a row behind
        let image = visual::encode(&product.payload().to_string())?;

        tx.commit().await?;

        info!(product_id = %product.id, barcode = %product.barcode, "product created");

        Ok(CreatedProduct { product, image })
    }

    async fn lookup_by_payload(&self, payload: &str) -> Result<ProductDetails, ProductsServiceError> {
        let payload = ProductPayload::parse(payload)?;

        let product = self.get_product(ProductId::from_i64(payload.id)).await?;

        let label_mismatch = payload
            .label
            .is_some_and(|label| label != product.label());

        if label_mismatch {
            warn!(product_id = %product.id, "scanned label disagrees with stored product");
        }

        Ok(ProductDetails {
            product,
            label_mismatch,
        })
    }

    async fn bulk_import(&self, contents: &[u8]) -> Result<BulkImportReport, ProductsServiceError> {
        let ParsedImport { rows, mut rejected } = imports::parse_products(contents)?;

        for skipped in &rejected {
            warn!(
                row = skipped.row,
                barcode = %skipped.barcode,
                reason = %skipped.reason,
                "skipping invalid row"
            );
        }

        let mut tx = self.db.begin().await?;
        let mut stored = Vec::with_capacity(rows.len());

        for ImportRow { row, product } in rows {
            let mut savepoint = tx.begin().await?;

            let result = self
                .repository
                .create_product(&mut savepoint, &product)
                .await
                .map_err(ProductsServiceError::from);

            match result {
                Ok(record) => {
                    savepoint.commit().await?;
                    stored.push(record);
                }
                Err(ProductsServiceError::AlreadyExists) => {
                    savepoint.rollback().await?;

                    warn!(row, barcode = %product.barcode, "skipping duplicate barcode");

                    rejected.push(RejectedRow {
                        row,
                        barcode: product.barcode,
                        reason: ProductsServiceError::AlreadyExists.to_string(),
                    });
                }
                Err(error) => return Err(error),
            }
        }

        let created = stored
            .into_iter()
            .map(|product| {
                let image = visual::encode(&product.payload().to_string())?;

                Ok(CreatedProduct { product, image })
            })
            .collect::<Result<Vec<_>, ProductsServiceError>>()?;

        tx.commit().await?;

        rejected.sort_by_key(|skipped| skipped.row);

        info!(
            created = created.len(),
            rejected = rejected.len(),
            "bulk import finished"
        );

        Ok(BulkImportReport { created, rejected })
    }
}

#[automock]
#[async_trait]
pub trait ProductsService: Send + Sync {
    /// Retrieves all products, ascending by id.
    async fn list_products(&self) -> Result<Vec<ProductRecord>, ProductsServiceError>;

    /// Retrieve a single product.
    async fn get_product(&self, product: ProductId) -> Result<ProductRecord, ProductsServiceError>;

    /// Stores a new product and renders its visual code.
    async fn create_product(
        &self,
        product: NewProduct,
    ) -> Result<CreatedProduct, ProductsServiceError>;

    /// Resolves a scanned payload to the stored product it identifies.
    async fn lookup_by_payload(&self, payload: &str) -> Result<ProductDetails, ProductsServiceError>;

    /// Creates one product per row of an import file, skipping duplicate barcodes.
    async fn bulk_import(&self, contents: &[u8]) -> Result<BulkImportReport, ProductsServiceError>;
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;
    use prodtrack::products::ProductStatus;
    use testresult::TestResult;

    use crate::{domain::imports::ImportError, test::TestContext};

    use super::*;

    fn widget() -> NewProduct {
        NewProduct {
            name: "Widget".to_string(),
            barcode: "BC-100".to_string(),
            expiry_date: date(2025, 1, 1),
            status: ProductStatus::Authorized,
        }
    }

    #[tokio::test]
    async fn create_product_assigns_first_id() -> TestResult {
        let ctx = TestContext::new().await?;

        let created = ctx.products.create_product(widget()).await?;

        assert_eq!(created.product.id, ProductId::from_i64(1));
        assert_eq!(created.product.label(), widget());

        Ok(())
    }

    #[tokio::test]
    async fn create_product_image_decodes_to_payload() -> TestResult {
        let ctx = TestContext::new().await?;

        let created = ctx.products.create_product(widget()).await?;

        assert_eq!(
            visual::decode(&created.image),
            Some(created.product.payload().to_string())
        );

        Ok(())
    }

    #[tokio::test]
    async fn create_product_duplicate_barcode_returns_already_exists() -> TestResult {
        let ctx = TestContext::new().await?;

        ctx.products.create_product(widget()).await?;

        let result = ctx
            .products
            .create_product(NewProduct {
                name: "Other".to_string(),
                ..widget()
            })
            .await;

        assert!(
            matches!(result, Err(ProductsServiceError::AlreadyExists)),
            "expected AlreadyExists, got {result:?}"
        );

        let products = ctx.products.list_products().await?;

        assert_eq!(products.len(), 1, "duplicate insert must not add a row");
        assert_eq!(products.first().map(|p| p.name.as_str()), Some("Widget"));

        Ok(())
    }

    #[tokio::test]
    async fn create_product_rejects_blank_name() -> TestResult {
        let ctx = TestContext::new().await?;

        let result = ctx
            .products
            .create_product(NewProduct {
                name: " ".to_string(),
                ..widget()
            })
            .await;

        assert!(
            matches!(result, Err(ProductsServiceError::InvalidLabel(_))),
            "expected InvalidLabel, got {result:?}"
        );
        assert!(ctx.products.list_products().await?.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn create_product_rejects_padded_name() -> TestResult {
        let ctx = TestContext::new().await?;

        let result = ctx
            .products
            .create_product(NewProduct {
                name: "Widget ".to_string(),
                ..widget()
            })
            .await;

        assert!(
            matches!(result, Err(ProductsServiceError::InvalidLabel(_))),
            "expected InvalidLabel, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn create_product_unencodable_payload_leaves_no_row() -> TestResult {
        let ctx = TestContext::new().await?;

        let result = ctx
            .products
            .create_product(NewProduct {
                name: "W".repeat(3000),
                ..widget()
            })
            .await;

        assert!(
            matches!(result, Err(ProductsServiceError::Encode(_))),
            "expected Encode, got {result:?}"
        );
        assert!(ctx.products.list_products().await?.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn genuine_code_with_trimmed_name_is_not_flagged() -> TestResult {
        let ctx = TestContext::new().await?;

        let created = ctx
            .products
            .create_product(NewProduct::new(
                "Widget ",
                " BC-100",
                date(2025, 1, 1),
                ProductStatus::Authorized,
            )?)
            .await?;

        let decoded = visual::decode(&created.image).ok_or("no code in generated image")?;
        let details = ctx.products.lookup_by_payload(&decoded).await?;

        assert_eq!(details.product.name, "Widget");
        assert!(!details.label_mismatch, "untouched code must not be flagged");

        Ok(())
    }

    #[tokio::test]
    async fn get_product_unknown_id_returns_not_found() -> TestResult {
        let ctx = TestContext::new().await?;

        let result = ctx.products.get_product(ProductId::from_i64(42)).await;

        assert!(
            matches!(result, Err(ProductsServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn list_products_is_ordered_by_id() -> TestResult {
        let ctx = TestContext::new().await?;

        for (name, barcode) in [("C", "BC-3"), ("A", "BC-1"), ("B", "BC-2")] {
            ctx.products
                .create_product(NewProduct {
                    name: name.to_string(),
                    barcode: barcode.to_string(),
                    ..widget()
                })
                .await?;
        }

        let names: Vec<String> = ctx
            .products
            .list_products()
            .await?
            .into_iter()
            .map(|p| p.name)
            .collect();

        assert_eq!(names, ["C", "A", "B"]);

        Ok(())
    }

    #[tokio::test]
    async fn lookup_round_trips_created_product() -> TestResult {
        let ctx = TestContext::new().await?;

        ctx.products.create_product(widget()).await?;

        let details = ctx
            .products
            .lookup_by_payload(
                "PRODAPP: 1\nProduct Name: Widget\nBarcode: BC-100\nExpiry Date: 2025-01-01\nStatus: AUTHORIZED",
            )
            .await?;

        assert_eq!(details.product.label(), widget());
        assert_eq!(details.verdict(), ProductStatus::Authorized);
        assert!(!details.label_mismatch);

        Ok(())
    }

    #[tokio::test]
    async fn lookup_flags_tampered_label() -> TestResult {
        let ctx = TestContext::new().await?;

        ctx.products
            .create_product(NewProduct {
                status: ProductStatus::Counterfeit,
                ..widget()
            })
            .await?;

        let details = ctx
            .products
            .lookup_by_payload(
                "PRODAPP: 1\nProduct Name: Widget\nBarcode: BC-100\nExpiry Date: 2025-01-01\nStatus: AUTHORIZED",
            )
            .await?;

        assert!(details.label_mismatch, "payload claims a different status");
        assert_eq!(details.verdict(), ProductStatus::Counterfeit);

        Ok(())
    }

    #[tokio::test]
    async fn lookup_unknown_id_returns_not_found() -> TestResult {
        let ctx = TestContext::new().await?;

        let result = ctx
            .products
            .lookup_by_payload("PRODAPP: 999\nProduct Name: Ghost")
            .await;

        assert!(
            matches!(result, Err(ProductsServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn lookup_foreign_payload_skips_store() -> TestResult {
        let ctx = TestContext::new().await?;

        // a closed store would fail any query, so success here proves no lookup ran
        ctx.db.close().await;

        let result = ctx.products.lookup_by_payload("https://example.com").await;

        assert!(
            matches!(result, Err(ProductsServiceError::Unrecognized)),
            "expected Unrecognized, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn lookup_unparsable_id_is_malformed() -> TestResult {
        let ctx = TestContext::new().await?;

        let result = ctx.products.lookup_by_payload("PRODAPP: one\n").await;

        assert!(
            matches!(result, Err(ProductsServiceError::Malformed(ref raw)) if raw == "one"),
            "expected Malformed, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn bulk_import_skips_duplicate_rows() -> TestResult {
        let ctx = TestContext::new().await?;

        let report = ctx
            .products
            .bulk_import(
                b"Product Name,Barcode,Expiry Date,Status\n\
                  Widget,BC-100,2025-01-01,AUTHORIZED\n\
                  Copy,BC-100,2025-02-01,COUNTERFEIT\n\
                  Gadget,BC-200,2025-03-01,AUTHORIZED\n",
            )
            .await?;

        assert_eq!(report.success_count(), 2);
        assert_eq!(
            report.rejected,
            [RejectedRow {
                row: 3,
                barcode: "BC-100".to_string(),
                reason: ProductsServiceError::AlreadyExists.to_string(),
            }]
        );

        for created in &report.created {
            assert_eq!(
                visual::decode(&created.image),
                Some(created.product.payload().to_string())
            );
        }

        let barcodes: Vec<String> = ctx
            .products
            .list_products()
            .await?
            .into_iter()
            .map(|p| p.barcode)
            .collect();

        assert_eq!(barcodes, ["BC-100", "BC-200"]);

        Ok(())
    }

    #[tokio::test]
    async fn bulk_import_skips_rows_clashing_with_existing_products() -> TestResult {
        let ctx = TestContext::new().await?;

        ctx.products.create_product(widget()).await?;

        let report = ctx
            .products
            .bulk_import(
                b"Product Name,Barcode,Expiry Date,Status\n\
                  Widget,BC-100,2025-01-01,AUTHORIZED\n",
            )
            .await?;

        assert_eq!(report.success_count(), 0);
        assert_eq!(report.rejected.len(), 1);
        assert_eq!(ctx.products.list_products().await?.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn bulk_import_structural_error_writes_nothing() -> TestResult {
        let ctx = TestContext::new().await?;

        let result = ctx
            .products
            .bulk_import(
                b"Product Name,Barcode,Expiry Date,Status\n\
                  Widget,BC-100,2025-01-01,AUTHORIZED\n\
                  Gadget,BC-200,not a date,AUTHORIZED\n",
            )
            .await;

        assert!(
            matches!(
                result,
                Err(ProductsServiceError::Import(ImportError::InvalidRow { row: 3, .. }))
            ),
            "expected InvalidRow, got {result:?}"
        );
        assert!(ctx.products.list_products().await?.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn bulk_import_skips_rows_with_invalid_fields() -> TestResult {
        let ctx = TestContext::new().await?;

        let report = ctx
            .products
            .bulk_import(
                b"Product Name,Barcode,Expiry Date,Status\n\
                  Widget,BC-100,2025-01-01,AUTHORIZED\n\
                  Pending,BC-150,2025-01-15,PENDING\n\
                  ,BC-175,2025-01-20,AUTHORIZED\n\
                  Gadget,BC-200,2025-02-01,COUNTERFEIT\n",
            )
            .await?;

        assert_eq!(report.success_count(), 2);

        let rejected: Vec<(usize, &str)> = report
            .rejected
            .iter()
            .map(|rejected| (rejected.row, rejected.barcode.as_str()))
            .collect();

        assert_eq!(rejected, [(3, "BC-150"), (4, "BC-175")]);
        assert!(
            report.rejected.iter().all(|rejected| !rejected.reason.is_empty()),
            "every skipped row carries a reason"
        );

        let barcodes: Vec<String> = ctx
            .products
            .list_products()
            .await?
            .into_iter()
            .map(|p| p.barcode)
            .collect();

        assert_eq!(barcodes, ["BC-100", "BC-200"]);

        Ok(())
    }

    #[tokio::test]
    async fn bulk_import_unencodable_row_writes_nothing() -> TestResult {
        let ctx = TestContext::new().await?;

        let contents = format!(
            "Product Name,Barcode,Expiry Date,Status\n\
             Widget,BC-100,2025-01-01,AUTHORIZED\n\
             {},BC-200,2025-01-01,AUTHORIZED\n",
            "W".repeat(3000)
        );

        let result = ctx.products.bulk_import(contents.as_bytes()).await;

        assert!(
            matches!(result, Err(ProductsServiceError::Encode(_))),
            "expected Encode, got {result:?}"
        );
        assert!(ctx.products.list_products().await?.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn bulk_import_missing_column_aborts() -> TestResult {
        let ctx = TestContext::new().await?;

        let result = ctx
            .products
            .bulk_import(b"Name,Barcode,Expiry Date,Status\nWidget,BC-1,2025-01-01,AUTHORIZED\n")
            .await;

        assert!(
            matches!(
                result,
                Err(ProductsServiceError::Import(ImportError::MissingColumn(
                    "Product Name"
                )))
            ),
            "expected MissingColumn, got {result:?}"
        );

        Ok(())
    }
}
