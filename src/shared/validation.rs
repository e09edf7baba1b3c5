use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Accepted photo types, matched against both the file extension and the
    /// MIME subtype of an upload
    /// - Valid: "jpg", "jpeg", "png", "JPG"
    /// - Invalid: "gif", "webp", "pdf", "png.exe"
    pub static ref IMAGE_TYPE_REGEX: Regex = Regex::new(r"(?i)^(jpe?g|png)$").unwrap();
}

/// An upload is accepted only when both its extension and its MIME type name
/// an allowed image format
pub fn is_allowed_image(file_name: &str, content_type: &str) -> bool {
    let extension = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext)
        .unwrap_or_default();
    let subtype = content_type
        .strip_prefix("image/")
        .map(|s| s.split(';').next().unwrap_or(s).trim())
        .unwrap_or_default();

    IMAGE_TYPE_REGEX.is_match(extension) && IMAGE_TYPE_REGEX.is_match(subtype)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_type_regex() {
        assert!(IMAGE_TYPE_REGEX.is_match("jpg"));
        assert!(IMAGE_TYPE_REGEX.is_match("jpeg"));
        assert!(IMAGE_TYPE_REGEX.is_match("PNG"));
        assert!(!IMAGE_TYPE_REGEX.is_match("gif"));
        assert!(!IMAGE_TYPE_REGEX.is_match("png.exe"));
        assert!(!IMAGE_TYPE_REGEX.is_match(""));
    }

    #[test]
    fn test_is_allowed_image() {
        assert!(is_allowed_image("pothole.jpg", "image/jpeg"));
        assert!(is_allowed_image("IMG_0001.PNG", "image/png"));
        assert!(!is_allowed_image("pothole.gif", "image/gif"));
        assert!(!is_allowed_image("pothole.jpg", "application/pdf"));
        assert!(!is_allowed_image("pothole", "image/jpeg"));
    }
}
