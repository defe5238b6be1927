//! Pickup instructions and their QR rendering.

use qrcode::{QrCode, render::svg};

use crate::{error::AppError, models::user::User};

/// Which closing line the pickup text carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickupNote {
    /// Shown on screen and mailed to the owner on borrow.
    Collect,
    /// Printed on the downloadable code.
    Download,
}

/// Human-readable text embedded in the pickup QR code.
pub fn pickup_instructions(title: &str, owner: &User, note: PickupNote) -> String {
    let closing = match note {
        PickupNote::Collect => "Show this to collect the book during lunch break!",
        PickupNote::Download => "Pickup: Lunch break in their classroom.",
    };
    format!(
        "Book: {title}\nOwner: {}\nClass: {}\n{closing}",
        owner.name,
        owner.class_label()
    )
}

/// Encodes `text` as a standalone SVG document.
pub fn render_svg(text: &str) -> Result<String, AppError> {
    let code = QrCode::new(text.as_bytes())
        .map_err(|e| AppError::InternalServerError(format!("QR encoding failed: {e}")))?;

    Ok(code
        .render::<svg::Color<'_>>()
        .min_dimensions(200, 200)
        .build())
}

/// Attachment name for a book's QR code, e.g. `Matilda_QR.svg`.
pub fn attachment_name(title: &str) -> String {
    format!("{}_QR.svg", super::upload::slug(title))
}
