//! Integration tests for the visual code codec and payload format

use image::{GrayImage, Luma, imageops};
use jiff::civil::date;
use testresult::TestResult;

use prodtrack::{
    payload::{PayloadError, ProductPayload},
    products::{ProductLabel, ProductStatus},
    visual,
};

fn widget_payload() -> TestResult<ProductPayload> {
    Ok(ProductPayload::new(
        1,
        ProductLabel::new("Widget", "BC-100", date(2025, 1, 1), ProductStatus::Authorized)?,
    ))
}

#[test]
fn encoded_payload_decodes_to_same_text() -> TestResult {
    let text = widget_payload()?.to_string();

    let image = visual::encode(&text)?;

    assert_eq!(visual::decode(&image).as_deref(), Some(text.as_str()));

    Ok(())
}

#[test]
fn decoded_payload_parses_back_to_product() -> TestResult {
    let payload = widget_payload()?;
    let image = visual::encode(&payload.to_string())?;

    let decoded = visual::decode(&image).ok_or("no code found")?;

    assert_eq!(ProductPayload::parse(&decoded)?, payload);

    Ok(())
}

#[test]
fn survives_png_round_trip_on_disk() -> TestResult {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("product-1.png");
    let text = widget_payload()?.to_string();

    visual::save_png(&visual::encode(&text)?, &path)?;
    let loaded = visual::load_image(&path)?;

    assert_eq!(visual::decode(&loaded), Some(text));

    Ok(())
}

#[test]
fn decodes_code_placed_on_larger_canvas() -> TestResult {
    let code = visual::encode("PRODAPP: 12")?;
    let mut canvas = GrayImage::from_pixel(code.width() * 3, code.height() * 2, Luma([255]));

    imageops::overlay(&mut canvas, &code, i64::from(code.width()), 40);

    assert_eq!(visual::decode(&canvas).as_deref(), Some("PRODAPP: 12"));

    Ok(())
}

#[test]
fn foreign_code_is_readable_but_unrecognized() -> TestResult {
    let image = visual::encode("WIFI:S:guest;T:WPA;P:secret;;")?;

    let decoded = visual::decode(&image).ok_or("no code found")?;

    assert_eq!(ProductPayload::parse(&decoded), Err(PayloadError::Unrecognized));

    Ok(())
}

fn stacked(top: &GrayImage, bottom: &GrayImage) -> GrayImage {
    let gap = top.height() / 2;

    let mut canvas = GrayImage::from_pixel(
        top.width().max(bottom.width()),
        top.height() + bottom.height() + gap,
        Luma([255]),
    );
    imageops::overlay(&mut canvas, top, 0, 0);
    imageops::overlay(&mut canvas, bottom, 0, i64::from(top.height() + gap));

    canvas
}

#[test]
fn topmost_of_several_codes_wins() -> TestResult {
    let first = visual::encode("PRODAPP: 1")?;
    let second = visual::encode("PRODAPP: 2")?;

    assert_eq!(
        visual::decode(&stacked(&first, &second)).as_deref(),
        Some("PRODAPP: 1")
    );
    assert_eq!(
        visual::decode(&stacked(&second, &first)).as_deref(),
        Some("PRODAPP: 2")
    );

    Ok(())
}
