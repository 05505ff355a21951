/// File categorization by extension.
///
/// Maps a file's extension to a named category ("Images", "Videos", ...)
/// used as the destination subfolder name. Lookup is case-insensitive,
/// tolerates a leading dot, and always succeeds: anything unrecognized
/// falls into the default category.
///
/// # Examples
///
/// ```
/// use sortbot::category::CategoryTable;
///
/// let table = CategoryTable::default();
/// assert_eq!(table.resolve(".jpg"), "Images");
/// assert_eq!(table.resolve("MKV"), "Videos");
/// assert_eq!(table.resolve(".xyz"), "Others");
/// ```
use std::collections::HashMap;

/// Category assigned to files whose extension matches no registered set.
pub const DEFAULT_CATEGORY: &str = "Others";

/// Built-in category table: category name to recognized extensions.
const DEFAULT_TABLE: &[(&str, &[&str])] = &[
    (
        "Images",
        &[".jpg", ".jpeg", ".png", ".gif", ".webp", ".bmp", ".svg"],
    ),
    ("Videos", &[".mp4", ".mkv", ".avi", ".mov", ".webm"]),
    (
        "Documents",
        &[".pdf", ".docx", ".doc", ".txt", ".md", ".rtf"],
    ),
    ("Music", &[".mp3", ".wav", ".flac", ".ogg", ".m4a"]),
];

/// Maps file extensions to category names.
///
/// The table is fixed once built; it is either the built-in default or the
/// `[categories]` table from the configuration file.
#[derive(Debug, Clone)]
pub struct CategoryTable {
    by_extension: HashMap<String, String>,
}

impl CategoryTable {
    /// Creates an empty table. Useful as a base for custom mappings.
    pub fn empty() -> Self {
        Self {
            by_extension: HashMap::new(),
        }
    }

    /// Registers a set of extensions under a category name.
    ///
    /// Extensions are normalized (lowercased, leading dot stripped), so
    /// `".JPG"` and `"jpg"` register the same key. A later registration of
    /// an already-known extension wins.
    pub fn register(&mut self, category: &str, extensions: &[&str]) {
        for ext in extensions {
            self.by_extension
                .insert(Self::normalize(ext), category.to_string());
        }
    }

    /// Resolves an extension to its category name.
    ///
    /// Total: empty or unrecognized extensions resolve to [`DEFAULT_CATEGORY`].
    ///
    /// # Examples
    ///
    /// ```
    /// use sortbot::category::{CategoryTable, DEFAULT_CATEGORY};
    ///
    /// let table = CategoryTable::default();
    /// assert_eq!(table.resolve("pdf"), "Documents");
    /// assert_eq!(table.resolve(""), DEFAULT_CATEGORY);
    /// ```
    pub fn resolve(&self, ext: &str) -> &str {
        let key = Self::normalize(ext);
        if key.is_empty() {
            return DEFAULT_CATEGORY;
        }
        self.by_extension
            .get(&key)
            .map(String::as_str)
            .unwrap_or(DEFAULT_CATEGORY)
    }

    fn normalize(ext: &str) -> String {
        ext.trim_start_matches('.').to_lowercase()
    }
}

impl Default for CategoryTable {
    fn default() -> Self {
        let mut table = Self::empty();
        for (category, extensions) in DEFAULT_TABLE {
            table.register(category, extensions);
        }
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table_spot_checks() {
        let table = CategoryTable::default();
        assert_eq!(table.resolve(".jpg"), "Images");
        assert_eq!(table.resolve(".png"), "Images");
        assert_eq!(table.resolve(".mkv"), "Videos");
        assert_eq!(table.resolve(".pdf"), "Documents");
        assert_eq!(table.resolve(".mp3"), "Music");
    }

    #[test]
    fn test_resolve_case_insensitive() {
        let table = CategoryTable::default();
        assert_eq!(table.resolve(".JPG"), "Images");
        assert_eq!(table.resolve(".Mkv"), "Videos");
        assert_eq!(table.resolve("PDF"), "Documents");
    }

    #[test]
    fn test_resolve_with_or_without_dot() {
        let table = CategoryTable::default();
        assert_eq!(table.resolve("jpg"), table.resolve(".jpg"));
        assert_eq!(table.resolve("wav"), "Music");
    }

    #[test]
    fn test_resolve_unknown_defaults_to_others() {
        let table = CategoryTable::default();
        assert_eq!(table.resolve(".xyz"), DEFAULT_CATEGORY);
        assert_eq!(table.resolve("qqq"), DEFAULT_CATEGORY);
    }

    #[test]
    fn test_resolve_empty_defaults_to_others() {
        let table = CategoryTable::default();
        assert_eq!(table.resolve(""), DEFAULT_CATEGORY);
        assert_eq!(table.resolve("."), DEFAULT_CATEGORY);
    }

    #[test]
    fn test_custom_registration() {
        let mut table = CategoryTable::empty();
        table.register("Archives", &[".zip", ".tar"]);

        assert_eq!(table.resolve(".zip"), "Archives");
        assert_eq!(table.resolve(".jpg"), DEFAULT_CATEGORY);
    }

    #[test]
    fn test_later_registration_wins() {
        let mut table = CategoryTable::default();
        table.register("Raw", &[".jpg"]);
        assert_eq!(table.resolve(".jpg"), "Raw");
    }
}
