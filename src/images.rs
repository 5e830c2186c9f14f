//! Image handling for multimodal questions: validation, base64 encoding,
//! and MIME inference. Attachments are transient, living only for the
//! duration of one question/answer cycle.

use anyhow::{bail, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::fs;
use std::path::Path;

use crate::llm::ImagePart;

/// Maximum images accepted per question.
pub const MAX_IMAGES: usize = 3;

/// Base64-encode the raw bytes of an image file. A missing path is an
/// error before any read is attempted.
pub fn encode_image(path: &Path) -> Result<String> {
    if !path.exists() {
        bail!("Image file not found: {}", path.display());
    }

    let bytes = fs::read(path)?;
    Ok(STANDARD.encode(bytes))
}

/// Map the lower-cased file extension to one of the four supported image
/// MIME types. Unknown extensions default to jpeg. This is a heuristic on
/// the file name, not content sniffing, so it is wrong for mislabeled
/// files; `validate_image_path` is the gate for accepting a path at all.
pub fn infer_mime_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase());

    match ext.as_deref() {
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "image/jpeg",
    }
}

/// Build the provider-agnostic inline fragment for one image.
pub fn inline_part(path: &Path) -> Result<ImagePart> {
    let data = encode_image(path)?;
    Ok(ImagePart {
        media_type: infer_mime_type(path).to_string(),
        data,
    })
}

/// Gate for user-entered paths: must exist, be a regular file, and carry an
/// image MIME type. Violations are reported to the caller, which skips the
/// path; they are never fatal to the surrounding flow.
pub fn validate_image_path(path: &Path) -> Result<()> {
    if !path.exists() {
        bail!("Image file not found: {}", path.display());
    }
    if !path.is_file() {
        bail!("Not a regular file: {}", path.display());
    }

    let is_image = mime_guess::from_path(path)
        .first()
        .map(|mime| mime.type_() == mime_guess::mime::IMAGE)
        .unwrap_or(false);
    if !is_image {
        bail!("Not an image file: {}", path.display());
    }

    Ok(())
}
