use anyhow::{Context, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::fs;
use std::path::Path;

/// Find the largest char boundary in `s` that is <= `max_bytes`.
/// Safe for slicing: `&s[..find_char_boundary(s, max_bytes)]` never panics.
pub fn find_char_boundary(s: &str, max_bytes: usize) -> usize {
    if max_bytes >= s.len() {
        return s.len();
    }
    let mut boundary = max_bytes;
    while boundary > 0 && !s.is_char_boundary(boundary) {
        boundary -= 1;
    }
    boundary
}

/// Infer the MIME type of an image from its file extension.
/// Unknown or missing extensions fall back to `image/jpeg`.
pub fn mime_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        _ => "image/jpeg",
    }
}

/// Read an image file and render it as an inline `data:` URL.
///
/// eBay has no free-form image upload on the Inventory API, so photos are
/// embedded directly as `data:{mime};base64,{payload}` image URLs.
pub fn image_data_url(path: &Path) -> Result<String> {
    let bytes =
        fs::read(path).with_context(|| format!("Failed to read image {}", path.display()))?;
    Ok(format!(
        "data:{};base64,{}",
        mime_type_for(path),
        STANDARD.encode(&bytes)
    ))
}

/// Read an image file and return its raw base64 payload plus MIME type,
/// for APIs that take the two separately (Gemini `inlineData`).
pub fn image_base64(path: &Path) -> Result<(String, &'static str)> {
    let bytes =
        fs::read(path).with_context(|| format!("Failed to read image {}", path.display()))?;
    Ok((STANDARD.encode(&bytes), mime_type_for(path)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_mime_type_known_extensions() {
        assert_eq!(mime_type_for(Path::new("a.png")), "image/png");
        assert_eq!(mime_type_for(Path::new("a.jpg")), "image/jpeg");
        assert_eq!(mime_type_for(Path::new("a.jpeg")), "image/jpeg");
        assert_eq!(mime_type_for(Path::new("a.gif")), "image/gif");
    }

    #[test]
    fn test_mime_type_case_insensitive() {
        assert_eq!(mime_type_for(Path::new("photo.PNG")), "image/png");
        assert_eq!(mime_type_for(Path::new("photo.JPG")), "image/jpeg");
        assert_eq!(mime_type_for(Path::new("photo.Gif")), "image/gif");
    }

    #[test]
    fn test_mime_type_fallback() {
        assert_eq!(mime_type_for(Path::new("a.bmp")), "image/jpeg");
        assert_eq!(mime_type_for(Path::new("a.webp")), "image/jpeg");
        assert_eq!(mime_type_for(Path::new("noext")), "image/jpeg");
    }

    #[test]
    fn test_image_data_url_format() {
        let dir = std::env::temp_dir().join("ebay_draft_bot_utils_test");
        let _ = std::fs::create_dir_all(&dir);
        let path = dir.join("pixel.png");
        std::fs::write(&path, [0x89u8, 0x50, 0x4e, 0x47]).unwrap();

        let url = image_data_url(&path).unwrap();
        assert!(url.starts_with("data:image/png;base64,"));
        // 4 bytes -> 8 base64 chars, no padding needed beyond the alphabet
        assert_eq!(url, format!("data:image/png;base64,{}", "iVBORw=="));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_image_data_url_missing_file() {
        let err = image_data_url(&PathBuf::from("definitely/not/here.jpg")).unwrap_err();
        assert!(err.to_string().contains("definitely/not/here.jpg"));
    }

    #[test]
    fn test_image_base64_returns_mime() {
        let dir = std::env::temp_dir().join("ebay_draft_bot_utils_b64_test");
        let _ = std::fs::create_dir_all(&dir);
        let path = dir.join("photo.jpeg");
        std::fs::write(&path, b"abc").unwrap();

        let (b64, mime) = image_base64(&path).unwrap();
        assert_eq!(b64, "YWJj");
        assert_eq!(mime, "image/jpeg");

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_find_char_boundary_ascii() {
        let s = "Hello, world!";
        assert_eq!(find_char_boundary(s, 5), 5);
        assert_eq!(find_char_boundary(s, 100), s.len());
        assert_eq!(find_char_boundary(s, 0), 0);
    }

    #[test]
    fn test_find_char_boundary_multibyte() {
        let s = "Héllo wörld"; // é is 2 bytes, ö is 2 bytes
        assert_eq!(find_char_boundary(s, 2), 1); // mid-'é', snaps back to 1
        assert_eq!(find_char_boundary(s, 3), 3); // after 'é'
    }
}
