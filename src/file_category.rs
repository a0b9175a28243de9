//! File categorization by extension.
//!
//! A [`CategoryMapping`] is an ordered table of categories, each owning a set of
//! extensions. The first category whose set contains a file's extension wins.
//!
//! # Examples
//!
//! ```
//! use mediasort::file_category::{CategoryMapping, classify};
//!
//! let mapping = CategoryMapping::default();
//! assert_eq!(classify("song.mp3"), Some(".mp3"));
//! assert_eq!(mapping.category_for("song.mp3").map(|c| c.name()), Some("audio"));
//! assert_eq!(mapping.category_for("notes.txt"), None);
//! ```
use serde::Deserialize;

/// How extensions are compared against the category table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExtensionCase {
    /// Lower-case both sides before comparing (`PHOTO.JPG` is an image).
    #[default]
    Insensitive,
    /// Compare the raw extension string (`PHOTO.JPG` matches nothing by default).
    Sensitive,
}

/// A named category and the extensions routed to it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Category {
    name: String,
    extensions: Vec<String>,
}

impl Category {
    /// Creates a category. Extensions without a leading dot get one.
    pub fn new<I, S>(name: impl Into<String>, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let extensions = extensions
            .into_iter()
            .map(|ext| {
                let ext = ext.as_ref();
                if ext.starts_with('.') {
                    ext.to_string()
                } else {
                    format!(".{}", ext)
                }
            })
            .collect();
        Self {
            name: name.into(),
            extensions,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    /// Returns the folder name for this category: the name with its first
    /// letter upper-cased and the rest unchanged.
    ///
    /// ```
    /// use mediasort::file_category::Category;
    ///
    /// assert_eq!(Category::new("image", [".png"]).dir_name(), "Image");
    /// assert_eq!(Category::new("eBooks", [".epub"]).dir_name(), "EBooks");
    /// ```
    pub fn dir_name(&self) -> String {
        let mut chars = self.name.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }

    fn contains(&self, ext: &str, case: ExtensionCase) -> bool {
        match case {
            ExtensionCase::Sensitive => self.extensions.iter().any(|e| e == ext),
            ExtensionCase::Insensitive => {
                let ext = ext.to_lowercase();
                self.extensions.iter().any(|e| e.to_lowercase() == ext)
            }
        }
    }
}

/// Returns the extension of a file name, dot included.
///
/// The extension starts at the last `.`. A name without a dot, or whose only
/// dot is its first character (`.bashrc`), has none.
///
/// ```
/// use mediasort::file_category::classify;
///
/// assert_eq!(classify("archive.tar.gz"), Some(".gz"));
/// assert_eq!(classify(".bashrc"), None);
/// assert_eq!(classify("README"), None);
/// ```
pub fn classify(file_name: &str) -> Option<&str> {
    split_extension(file_name).1
}

/// Splits a file name into base name and extension (dot included).
pub fn split_extension(file_name: &str) -> (&str, Option<&str>) {
    match file_name.rfind('.') {
        Some(0) | None => (file_name, None),
        Some(idx) => (&file_name[..idx], Some(&file_name[idx..])),
    }
}

/// Ordered category table plus the matching policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryMapping {
    categories: Vec<Category>,
    case: ExtensionCase,
}

impl CategoryMapping {
    pub fn new(categories: Vec<Category>, case: ExtensionCase) -> Self {
        Self { categories, case }
    }

    /// The built-in audio, image and video table.
    pub fn default_categories() -> Vec<Category> {
        vec![
            Category::new("audio", [".mp3", ".wav", ".flac"]),
            Category::new("image", [".jpg", ".jpeg", ".png", ".gif"]),
            Category::new("video", [".mp4", ".avi", ".mov", ".mkv"]),
        ]
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn case(&self) -> ExtensionCase {
        self.case
    }

    /// Returns the first category in table order owning this extension.
    pub fn category_for_extension(&self, ext: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.contains(ext, self.case))
    }

    /// Returns the category a file name is routed to, if any.
    pub fn category_for(&self, file_name: &str) -> Option<&Category> {
        classify(file_name).and_then(|ext| self.category_for_extension(ext))
    }
}

impl Default for CategoryMapping {
    fn default() -> Self {
        Self::new(Self::default_categories(), ExtensionCase::default())
    }
}
