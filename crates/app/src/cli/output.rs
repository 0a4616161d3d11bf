//! Writing generated visual codes to disk.

use std::path::{Path, PathBuf};

use image::GrayImage;
use prodtrack::visual;
use prodtrack_app::domain::products::records::ProductId;

/// File name of a product's visual code.
pub(crate) fn code_file_name(product: ProductId) -> String {
    format!("product-{product}.png")
}

/// Save `image` as `product-<id>.png` under `dir`, creating `dir` if needed.
pub(crate) fn save_code(dir: &Path, product: ProductId, image: &GrayImage) -> Result<PathBuf, String> {
    std::fs::create_dir_all(dir)
        .map_err(|error| format!("failed to create {}: {error}", dir.display()))?;

    let path = dir.join(code_file_name(product));

    visual::save_png(image, &path)
        .map_err(|error| format!("failed to write {}: {error}", path.display()))?;

    Ok(path)
}
