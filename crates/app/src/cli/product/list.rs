use std::path::PathBuf;

use clap::Args;
use prodtrack::visual;
use prodtrack_app::{context::AppContext, domain::products::records::ProductRecord};
use tabled::{builder::Builder, settings::Style};

use crate::cli::output;

#[derive(Debug, Args)]
pub(crate) struct ListProductsArgs {
    /// Also regenerate every product's visual code into this directory
    #[arg(long, value_name = "DIR")]
    qr_dir: Option<PathBuf>,
}

pub(crate) async fn run(ctx: &AppContext, args: ListProductsArgs) -> Result<(), String> {
    let products = ctx
        .products
        .list_products()
        .await
        .map_err(|error| format!("failed to list products: {error}"))?;

    if products.is_empty() {
        println!("No products found.");
        return Ok(());
    }

    if let Some(dir) = &args.qr_dir {
        for product in &products {
            let image = visual::encode(&product.payload().to_string())
                .map_err(|error| format!("failed to encode product {}: {error}", product.id))?;

            output::save_code(dir, product.id, &image)?;
        }
    }

    println!("{}", render_table(&products, args.qr_dir.is_some()));

    Ok(())
}

fn render_table(products: &[ProductRecord], with_codes: bool) -> String {
    let mut builder = Builder::default();

    let mut header = vec!["ID", "Product Name", "Barcode", "Expiry Date", "Status"];
    if with_codes {
        header.push("QR Code");
    }
    builder.push_record(header);

    for product in products {
        let mut record = vec![
            product.id.to_string(),
            product.name.clone(),
            product.barcode.clone(),
            product.expiry_date.to_string(),
            product.status.to_string(),
        ];
        if with_codes {
            record.push(output::code_file_name(product.id));
        }
        builder.push_record(record);
    }

    let mut table = builder.build();
    table.with(Style::modern_rounded());

    table.to_string()
}
