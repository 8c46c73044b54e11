// Content-based MIME detection for uploads
use image::ImageFormat;

/// Detect the MIME type from magic bytes. Client-declared content types are
/// never trusted.
pub fn sniff_mime(bytes: &[u8]) -> &'static str {
    if let Ok(format) = image::guess_format(bytes) {
        return image_mime(format);
    }

    if bytes.starts_with(b"%PDF-") {
        "application/pdf"
    } else if bytes.starts_with(b"PK\x03\x04") {
        "application/zip"
    } else if bytes.starts_with(b"\x1f\x8b") {
        "application/gzip"
    } else if bytes.is_empty() {
        "application/x-empty"
    } else if std::str::from_utf8(bytes).is_ok() {
        "text/plain"
    } else {
        "application/octet-stream"
    }
}

fn image_mime(format: ImageFormat) -> &'static str {
    match format {
        ImageFormat::Png => "image/png",
        ImageFormat::Jpeg => "image/jpeg",
        ImageFormat::Gif => "image/gif",
        ImageFormat::WebP => "image/webp",
        ImageFormat::Tiff => "image/tiff",
        ImageFormat::Bmp => "image/bmp",
        ImageFormat::Ico => "image/x-icon",
        ImageFormat::Avif => "image/avif",
        ImageFormat::Hdr => "image/vnd.radiance",
        ImageFormat::OpenExr => "image/x-exr",
        ImageFormat::Qoi => "image/x-qoi",
        ImageFormat::Pnm => "image/x-portable-anymap",
        ImageFormat::Tga => "image/x-tga",
        ImageFormat::Dds => "image/vnd-ms.dds",
        ImageFormat::Farbfeld => "image/x-farbfeld",
        _ => "image/unknown",
    }
}

pub fn is_image_mime(mime: &str) -> bool {
    mime.starts_with("image/")
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use image::{DynamicImage, ImageOutputFormat};
    use std::io::Cursor;

    pub(crate) fn png_bytes() -> Vec<u8> {
        let mut buf = Vec::new();
        DynamicImage::new_rgb8(4, 4)
            .write_to(&mut Cursor::new(&mut buf), ImageOutputFormat::Png)
            .unwrap();
        buf
    }

    #[test]
    fn test_sniffs_png() {
        let mime = sniff_mime(&png_bytes());
        assert_eq!(mime, "image/png");
        assert!(is_image_mime(mime));
    }

    #[test]
    fn test_sniffs_jpeg_magic() {
        assert_eq!(sniff_mime(&[0xFF, 0xD8, 0xFF, 0xE0, 0, 0x10]), "image/jpeg");
    }

    #[test]
    fn test_rejects_non_images() {
        for (bytes, expected) in [
            (&b"%PDF-1.7 ..."[..], "application/pdf"),
            (&b"{\"not\": \"an image\"}"[..], "text/plain"),
            (&[0u8, 159, 146, 150][..], "application/octet-stream"),
            (&b""[..], "application/x-empty"),
        ] {
            let mime = sniff_mime(bytes);
            assert_eq!(mime, expected);
            assert!(!is_image_mime(mime));
        }
    }
}
