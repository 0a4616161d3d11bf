use std::path::PathBuf;

use clap::Args;
use prodtrack_app::{
    context::AppContext,
    domain::{imports, products::data::BulkImportReport},
};

use crate::cli::output;

#[derive(Debug, Args)]
pub(crate) struct ImportArgs {
    /// CSV file with `Product Name`, `Barcode`, `Expiry Date` and `Status` columns
    file: PathBuf,

    /// Directory the visual codes are written to
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,
}

pub(crate) async fn run(ctx: &AppContext, args: ImportArgs) -> Result<(), String> {
    let contents = imports::read_file(&args.file)
        .await
        .map_err(|error| format!("failed to import {}: {error}", args.file.display()))?;

    let report = ctx
        .products
        .bulk_import(&contents)
        .await
        .map_err(|error| format!("failed to import {}: {error}", args.file.display()))?;

    for created in &report.created {
        let path = output::save_code(&args.output_dir, created.product.id, &created.image)?;
        println!("{}: {}", created.product.barcode, path.display());
    }

    println!("{}", summary(&report));

    Ok(())
}

fn summary(report: &BulkImportReport) -> String {
    let mut lines = vec![format!(
        "Products uploaded and QR codes generated successfully! ({} added)",
        report.success_count()
    )];

    lines.extend(report.rejected.iter().map(|rejected| {
        format!(
            "skipped row {} ({}): {}",
            rejected.row, rejected.barcode, rejected.reason
        )
    }));

    lines.join("\n")
}
