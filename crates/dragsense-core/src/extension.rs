//! Allow-list of drag-eligible file extensions.

use std::collections::HashSet;

/// Extensions eligible when no configuration overrides them.
pub const DEFAULT_EXTENSIONS: &[&str] = &[
    ".txt", ".csv", ".log", ".xml", ".json", ".cs", ".html", ".md", ".xaml", ".py", ".java",
    ".c", ".cpp", ".png", ".doc", ".docx", ".pdf", ".jpg", ".jpeg", ".bmp",
];

/// Immutable set of lowercase, dot-prefixed extensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionPolicy {
    extensions: HashSet<String>,
}

impl ExtensionPolicy {
    /// Build a policy from raw entries. Entries are normalized with
    /// [`normalize_extension`]; entries that normalize to nothing are dropped.
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let extensions = entries
            .into_iter()
            .filter_map(|e| normalize_extension(e.as_ref()))
            .collect();
        Self { extensions }
    }

    /// Whether `path` names a file whose extension is in the set.
    ///
    /// The extension is the text after the last `.` of the final path
    /// component. A path with no extension, an empty extension (`"name."`),
    /// or a trailing separator is never eligible.
    pub fn is_eligible(&self, path: &str) -> bool {
        let Some(ext) = extension_of(path) else {
            return false;
        };
        self.extensions.contains(&format!(".{}", ext.to_lowercase()))
    }

    /// Number of extensions in the set.
    pub fn len(&self) -> usize {
        self.extensions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty()
    }

    /// Sorted view of the set, for display.
    pub fn sorted(&self) -> Vec<&str> {
        let mut list: Vec<&str> = self.extensions.iter().map(String::as_str).collect();
        list.sort_unstable();
        list
    }
}

impl Default for ExtensionPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_EXTENSIONS)
    }
}

/// Normalize a configured extension entry to the lowercase, dot-prefixed form.
///
/// `"PDF"`, `".pdf"` and `" .Pdf "` all become `".pdf"`. Blank entries and a
/// lone `"."` yield `None`.
pub fn normalize_extension(raw: &str) -> Option<String> {
    let trimmed = raw.trim().trim_start_matches('.');
    if trimmed.is_empty() {
        return None;
    }
    Some(format!(".{}", trimmed.to_lowercase()))
}

/// Extension of the final path component, without the dot.
fn extension_of(path: &str) -> Option<&str> {
    let name = path.rsplit(['\\', '/']).next().unwrap_or(path);
    let (_, ext) = name.rsplit_once('.')?;
    if ext.is_empty() {
        None
    } else {
        Some(ext)
    }
}
