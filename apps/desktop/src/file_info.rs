//! Coarse media-type sniffing and display formatting for the drop zone.

use std::path::Path;

/// Media type guessed from the file extension. The backend only needs the
/// broad family; unknown extensions fall back to a generic binary type.
pub fn media_type_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "mp4" => "video/mp4",
        "mov" => "video/quicktime",
        "mkv" => "video/x-matroska",
        "webm" => "video/webm",
        "avi" => "video/x-msvideo",
        _ => "application/octet-stream",
    }
}

/// Glyph shown next to the selected file, by media-type family.
pub fn file_icon(media_type: &str) -> &'static str {
    if media_type.starts_with("video/") {
        "🎬"
    } else if media_type.starts_with("image/") {
        "🖼"
    } else {
        "📄"
    }
}

/// Size in mebibytes with two decimals, e.g. `2.00 MB`.
pub fn format_size(size_bytes: u64) -> String {
    format!("{:.2} MB", size_bytes as f64 / 1024.0 / 1024.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn icon_follows_media_type_family() {
        assert_eq!(file_icon("video/mp4"), "🎬");
        assert_eq!(file_icon("image/png"), "🖼");
        assert_eq!(file_icon("application/pdf"), "📄");
    }

    #[test]
    fn media_type_from_extension() {
        assert_eq!(media_type_for_path(&PathBuf::from("clip.MP4")), "video/mp4");
        assert_eq!(media_type_for_path(&PathBuf::from("face.jpeg")), "image/jpeg");
        assert_eq!(
            media_type_for_path(&PathBuf::from("notes.pdf")),
            "application/octet-stream"
        );
        assert_eq!(
            media_type_for_path(&PathBuf::from("noext")),
            "application/octet-stream"
        );
    }

    #[test]
    fn size_renders_in_mebibytes() {
        assert_eq!(format_size(2_097_152), "2.00 MB");
        assert_eq!(format_size(0), "0.00 MB");
        assert_eq!(format_size(1_572_864), "1.50 MB");
    }
}
