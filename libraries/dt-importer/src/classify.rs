//! Filename classification
//!
//! Every import path decides "image, text, or neither" through [`classify`]; there is one
//! extension list for the whole crate.

/// Recognized image extensions (lowercase)
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp", "svg"];

/// Recognized text extensions (lowercase)
pub const TEXT_EXTENSIONS: &[&str] = &["txt"];

/// Media kind inferred from a filename
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Text,
    Unknown,
}

/// Result of classifying one filename
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub kind: MediaKind,

    /// Leaf filename without its final `.<ext>`; a language code in folder layouts
    pub base_name: String,
}

/// Last path segment of an archive or URL path
pub fn leaf_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Lowercased final extension of the leaf name, if any
pub fn extension(filename: &str) -> Option<String> {
    leaf_name(filename)
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
}

/// Classify a filename by extension. Pure and total.
pub fn classify(filename: &str) -> Classification {
    let leaf = leaf_name(filename);

    let (base_name, kind) = match leaf.rsplit_once('.') {
        Some((base, ext)) => {
            let ext = ext.to_lowercase();
            let kind = if IMAGE_EXTENSIONS.contains(&ext.as_str()) {
                MediaKind::Image
            } else if TEXT_EXTENSIONS.contains(&ext.as_str()) {
                MediaKind::Text
            } else {
                MediaKind::Unknown
            };
            (base, kind)
        }
        None => (leaf, MediaKind::Unknown),
    };

    Classification {
        kind,
        base_name: base_name.to_string(),
    }
}

/// Check if a filename names an image
pub fn is_image_file(filename: &str) -> bool {
    classify(filename).kind == MediaKind::Image
}
