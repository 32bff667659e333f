//! Turns one input document into an ordered sequence of page images.
//!
//! A `.pdf` is rendered page-by-page to JPEG via `pdfium-render`; a raster
//! image (`.jpg`/`.jpeg`/`.png`) is used as-is as a single "page". Any other
//! extension is a fatal `UnsupportedFormat` (`§4.7`).
//!
//! Revision History
//! - 2026-02-09T00:00:00Z @AI: Initial rasterizer.

use idp_core::IdpError;
use idp_llm::ImageFormat;

/// One rendered page: raw bytes plus the format the LLM client needs to tag
/// the image block with.
#[derive(Debug, Clone)]
pub struct PageImage {
    pub format: ImageFormat,
    pub bytes: std::vec::Vec<u8>,
}

/// Renders `bytes` (the full contents of the artifact named `file_name`)
/// into an ordered list of page images.
pub fn rasterize(file_name: &str, bytes: &[u8]) -> std::result::Result<std::vec::Vec<PageImage>, IdpError> {
    let extension = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "pdf" => rasterize_pdf(bytes),
        "jpg" | "jpeg" => std::result::Result::Ok(std::vec![PageImage {
            format: ImageFormat::Jpeg,
            bytes: bytes.to_vec(),
        }]),
        "png" => std::result::Result::Ok(std::vec![PageImage {
            format: ImageFormat::Png,
            bytes: bytes.to_vec(),
        }]),
        other => std::result::Result::Err(IdpError::UnsupportedFormat(std::format!(
            "unsupported image-extraction input extension: {other:?}"
        ))),
    }
}

fn rasterize_pdf(bytes: &[u8]) -> std::result::Result<std::vec::Vec<PageImage>, IdpError> {
    use pdfium_render::prelude::*;

    let bindings = Pdfium::bind_to_system_library()
        .map_err(|err| IdpError::ParsingStageFailed(std::format!("failed to bind pdfium library: {err}")))?;
    let pdfium = Pdfium::new(bindings);
    let document = pdfium
        .load_pdf_from_byte_slice(bytes, std::option::Option::None)
        .map_err(|err| IdpError::ParsingStageFailed(std::format!("failed to load PDF: {err}")))?;

    let render_config = PdfRenderConfig::new()
        .set_target_width(2000)
        .set_maximum_height(2000);

    let mut pages = std::vec::Vec::new();
    for page in document.pages().iter() {
        let bitmap = page
            .render_with_config(&render_config)
            .map_err(|err| IdpError::ParsingStageFailed(std::format!("failed to render PDF page: {err}")))?;
        let dynamic_image = bitmap.as_image();
        let mut jpeg_bytes = std::vec::Vec::new();
        dynamic_image
            .write_to(&mut std::io::Cursor::new(&mut jpeg_bytes), image::ImageFormat::Jpeg)
            .map_err(|err| IdpError::ParsingStageFailed(std::format!("failed to encode rendered page as JPEG: {err}")))?;
        pages.push(PageImage {
            format: ImageFormat::Jpeg,
            bytes: jpeg_bytes,
        });
    }
    std::result::Result::Ok(pages)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jpeg_input_is_used_as_single_page() {
        let pages = rasterize("scan.jpg", b"\xff\xd8\xff\xe0fake-jpeg").unwrap();
        assert_eq!(pages.len(), 1);
        assert!(matches!(pages[0].format, ImageFormat::Jpeg));
    }

    #[test]
    fn test_png_input_is_used_as_single_page() {
        let pages = rasterize("scan.png", b"\x89PNGfake").unwrap();
        assert_eq!(pages.len(), 1);
        assert!(matches!(pages[0].format, ImageFormat::Png));
    }

    #[test]
    fn test_unsupported_extension_is_fatal() {
        let err = rasterize("scan.tiff", b"bytes").unwrap_err();
        assert_eq!(err.kind(), idp_core::ErrorKind::UnsupportedFormat);
    }
}
