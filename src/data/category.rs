use serde::{Deserialize, Deserializer, Serialize};

/// Classification of an ingested file; drives the tree's render style.
///
/// Closed on purpose: unknown tags coming from the host collapse into
/// [`Category::Other`] instead of failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Image,
    Text,
    Code,
    Media,
    #[default]
    Other,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Image,
        Category::Text,
        Category::Code,
        Category::Media,
        Category::Other,
    ];

    /// Map a host-supplied tag to a category, falling back to `Other`
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_ascii_lowercase().as_str() {
            "image" => Category::Image,
            "text" => Category::Text,
            "code" => Category::Code,
            "media" => Category::Media,
            _ => Category::Other,
        }
    }

    /// Classify a file by its extension
    pub fn from_file_name(name: &str) -> Self {
        let ext = match name.rsplit_once('.') {
            Some((_, ext)) => ext.to_ascii_lowercase(),
            None => return Category::Other,
        };

        match ext.as_str() {
            "jpg" | "jpeg" | "png" | "gif" | "svg" | "webp" => Category::Image,
            "txt" | "md" | "doc" | "docx" | "pdf" => Category::Text,
            "js" | "ts" | "jsx" | "tsx" | "html" | "css" | "json" | "py" | "java" | "c" | "cpp" => {
                Category::Code
            }
            "mp3" | "wav" | "ogg" | "mp4" | "mov" | "avi" | "webm" => Category::Media,
            _ => Category::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Image => "image",
            Category::Text => "text",
            Category::Code => "code",
            Category::Media => "media",
            Category::Other => "other",
        }
    }
}

impl<'de> Deserialize<'de> for Category {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;
        Ok(Category::from_tag(&tag))
    }
}
