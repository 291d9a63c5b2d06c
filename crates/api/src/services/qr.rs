//! Check-in QR rendering.
//!
//! Turns a registrant's check-in code into a scannable SVG. The QR payload
//! is the public check-in URL, so any camera app lands the operator on the
//! right page.

use qrcode::render::svg;
use qrcode::QrCode;

/// Build the public check-in URL a QR code points at.
pub fn check_in_url(public_base_url: &str, code: &str) -> String {
    format!("{}/checkin/{}", public_base_url.trim_end_matches('/'), code)
}

/// Render text as an SVG QR code.
pub fn render_qr_svg(text: &str) -> Result<String, qrcode::types::QrError> {
    let code = QrCode::new(text.as_bytes())?;

    Ok(code
        .render()
        .min_dimensions(240, 240)
        .dark_color(svg::Color("#000000"))
        .light_color(svg::Color("#ffffff"))
        .build())
}
