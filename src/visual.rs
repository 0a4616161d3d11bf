//! Visual code codec
//!
//! Encoding and decoding are delegated to `qrcode` and `rqrr`. This module
//! only fixes the raster layout (module size, quiet zone, error correction)
//! and converts between the libraries' pixel grids and [`GrayImage`].

use std::path::Path;

use image::{GrayImage, ImageError, ImageFormat, Luma};
use qrcode::{Color, EcLevel, QrCode, types::QrError};
use thiserror::Error;

/// Pixels per module edge.
pub const MODULE_SIZE: u32 = 5;

/// Light border around the symbol, in modules.
pub const QUIET_ZONE: u32 = 4;

const DARK: Luma<u8> = Luma([0]);
const LIGHT: Luma<u8> = Luma([255]);

/// Visual code errors.
#[derive(Debug, Error)]
pub enum VisualCodeError {
    /// The payload does not fit in a visual code.
    #[error("failed to encode visual code: {0}")]
    Encode(QrError),

    /// The rendered symbol does not fit raster dimensions.
    #[error("visual code of width {0} modules is too large to render")]
    TooLarge(usize),

    /// Reading or writing an image failed.
    #[error("image error: {0}")]
    Image(#[from] ImageError),
}

/// Render `payload` as a black-on-white visual code.
///
/// Identical input always yields an identical image.
///
/// # Errors
///
/// Returns [`VisualCodeError::Encode`] if the payload is too long.
pub fn encode(payload: &str) -> Result<GrayImage, VisualCodeError> {
    let code = QrCode::with_error_correction_level(payload.as_bytes(), EcLevel::L)
        .map_err(VisualCodeError::Encode)?;

    let width = code.width();
    let modules = u32::try_from(width).map_err(|_error| VisualCodeError::TooLarge(width))?;
    let colors = code.to_colors();

    let side = (modules + 2 * QUIET_ZONE) * MODULE_SIZE;

    Ok(GrayImage::from_fn(side, side, |x, y| {
        let (mx, my) = (x / MODULE_SIZE, y / MODULE_SIZE);

        let inside = QUIET_ZONE..QUIET_ZONE + modules;
        if !inside.contains(&mx) || !inside.contains(&my) {
            return LIGHT;
        }

        let index = usize::try_from((my - QUIET_ZONE) * modules + (mx - QUIET_ZONE)).ok();

        match index.and_then(|index| colors.get(index)) {
            Some(Color::Dark) => DARK,
            _ => LIGHT,
        }
    }))
}

/// Find and decode a visual code in `image`.
///
/// Returns `None` when no readable code is present. When several codes are
/// present, the first one the detector reports that decodes wins. Detection is
/// deterministic, so the same image always yields the same payload.
pub fn decode(image: &GrayImage) -> Option<String> {
    let (width, height) = image.dimensions();

    let mut prepared = rqrr::PreparedImage::prepare_from_greyscale(
        width as usize,
        height as usize,
        |x, y| {
            let pixel = u32::try_from(x)
                .ok()
                .zip(u32::try_from(y).ok())
                .and_then(|(x, y)| image.get_pixel_checked(x, y));

            pixel.map_or(u8::MAX, |&Luma([value])| value)
        },
    );

    prepared.detect_grids().into_iter().find_map(|grid| {
        grid.decode()
            .inspect_err(|error| tracing::debug!("skipping unreadable grid: {error}"))
            .ok()
            .map(|(_meta, content)| content)
    })
}

/// Write `image` to `path` as PNG.
///
/// # Errors
///
/// Returns [`VisualCodeError::Image`] if the file cannot be written.
pub fn save_png(image: &GrayImage, path: impl AsRef<Path>) -> Result<(), VisualCodeError> {
    image.save_with_format(path, ImageFormat::Png)?;

    Ok(())
}

/// Load an uploaded image (PNG or JPEG) as greyscale.
///
/// # Errors
///
/// Returns [`VisualCodeError::Image`] if the file cannot be read or decoded.
pub fn load_image(path: impl AsRef<Path>) -> Result<GrayImage, VisualCodeError> {
    Ok(image::open(path)?.to_luma8())
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn encode_is_deterministic() -> TestResult {
        let first = encode("PRODAPP: 1")?;
        let second = encode("PRODAPP: 1")?;

        assert_eq!(first, second);

        Ok(())
    }

    #[test]
    fn encode_draws_quiet_zone() -> TestResult {
        let image = encode("PRODAPP: 1")?;
        let border = QUIET_ZONE * MODULE_SIZE;

        for offset in 0..border {
            assert_eq!(image.get_pixel(offset, offset), &LIGHT, "quiet zone must be light");
        }

        // top-left finder pattern starts right after the quiet zone
        assert_eq!(image.get_pixel(border, border), &DARK);

        Ok(())
    }

    #[test]
    fn decode_blank_image_finds_nothing() {
        let blank = GrayImage::from_pixel(200, 200, LIGHT);

        assert_eq!(decode(&blank), None);
    }

    #[test]
    fn saved_png_loads_back_unchanged() -> TestResult {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("code.png");
        let image = encode("PRODAPP: 9")?;

        save_png(&image, &path)?;

        assert_eq!(load_image(&path)?, image);

        Ok(())
    }
}
