use clap::{ArgGroup, Args};
use prodtrack::products::ProductStatus;
use prodtrack_app::{
    context::AppContext,
    domain::products::{ProductsService, ProductsServiceError, data::ProductDetails},
};

use super::source::{Captured, SOURCE_GROUP, SourceArgs};

#[derive(Debug, Args)]
#[command(group(ArgGroup::new(SOURCE_GROUP).required(true)))]
pub(crate) struct ScanArgs {
    #[command(flatten)]
    source: SourceArgs,
}

pub(crate) async fn run(ctx: &AppContext, args: ScanArgs) -> Result<(), String> {
    match args.source.capture().await? {
        Captured::Payload(payload) => {
            println!("{}", check_payload(ctx.products.as_ref(), &payload).await?);
        }
        Captured::NoCode(message) => println!("{message}"),
    }

    Ok(())
}

/// Resolve a decoded payload into the message shown to the user.
///
/// Outcomes the user can act on are messages; only storage failures are errors.
pub(crate) async fn check_payload(
    products: &dyn ProductsService,
    payload: &str,
) -> Result<String, String> {
    match products.lookup_by_payload(payload).await {
        Ok(details) => Ok(render_details(&details)),
        Err(ProductsServiceError::Unrecognized) => {
            Ok("This QR code was not generated by PRODTRACK app.".to_string())
        }
        Err(error @ ProductsServiceError::Malformed(_)) => {
            Ok(format!("Error decoding QR code data.\nDetails: {error}"))
        }
        Err(ProductsServiceError::NotFound) => Ok("Product details not found.".to_string()),
        Err(error) => Err(format!("failed to look up product: {error}")),
    }
}

fn render_details(details: &ProductDetails) -> String {
    let product = &details.product;
    let mut lines = vec![
        format!("Product Name: {}", product.name),
        format!("Barcode: {}", product.barcode),
        format!("Expiry Date: {}", product.expiry_date),
        format!("Status: {}", product.status),
    ];

    if details.label_mismatch {
        lines.push(
            "Note: the details printed in this code differ from the stored record.".to_string(),
        );
    }

    lines.push(
        match details.verdict() {
            ProductStatus::Authorized => {
                "Product is Authorized\nThe world can do with a smart shopper like you!"
            }
            ProductStatus::Counterfeit => {
                "Product is Counterfeit\nPlease report this product to the retailer."
            }
        }
        .to_string(),
    );

    lines.join("\n")
}
