use std::path::PathBuf;

use clap::Args;
use jiff::civil::Date;
use prodtrack::products::{ProductLabel, ProductStatus};
use prodtrack_app::{context::AppContext, domain::products::ProductsServiceError};

use crate::cli::output;

#[derive(Debug, Args)]
pub(crate) struct AddProductArgs {
    /// Product name
    #[arg(long)]
    name: String,

    /// Barcode, unique across products
    #[arg(long)]
    barcode: String,

    /// Expiry date (YYYY-MM-DD)
    #[arg(long)]
    expiry_date: Date,

    /// AUTHORIZED or COUNTERFEIT
    #[arg(long)]
    status: ProductStatus,

    /// Directory the visual code is written to
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,
}

pub(crate) async fn run(ctx: &AppContext, args: AddProductArgs) -> Result<(), String> {
    let product = ProductLabel::new(args.name, args.barcode, args.expiry_date, args.status)
        .map_err(|error| format!("invalid product: {error}"))?;

    let created = ctx
        .products
        .create_product(product)
        .await
        .map_err(|error| match error {
            ProductsServiceError::AlreadyExists => {
                "a product with this barcode already exists".to_string()
            }
            error => format!("failed to create product: {error}"),
        })?;

    let path = output::save_code(&args.output_dir, created.product.id, &created.image)?;

    println!("Product saved successfully!");
    println!("product_id: {}", created.product.id);
    println!("qr_code: {}", path.display());

    Ok(())
}
