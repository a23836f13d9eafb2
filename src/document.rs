// ============================================================================
// 文档句柄 - Source Document
// ============================================================================

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::language::Language;

/// Language id used for files no profile claims.
pub const PLAIN_TEXT: &str = "plaintext";

/// Anything that can hand out a path, an editor language id and its text.
pub trait SourceDocument {
    fn path(&self) -> &Path;
    fn language_id(&self) -> &str;
    fn text(&self) -> &str;

    fn language(&self) -> Option<Language> {
        Language::from_id(self.language_id())
    }
}

/// An owned, in-memory source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    path: PathBuf,
    language_id: String,
    text: String,
}

impl Document {
    pub fn new(path: impl Into<PathBuf>, language_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            language_id: language_id.into(),
            text: text.into(),
        }
    }

    /// Read a file, inferring the language id from its extension.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let language_id = Language::from_path(path)
            .map(|lang| lang.id())
            .unwrap_or(PLAIN_TEXT);
        Ok(Self::new(path, language_id, text))
    }

    /// Re-express the path relative to `root`; paths outside it are kept as is.
    pub fn relative_to(mut self, root: &Path) -> Self {
        if let Ok(rel) = self.path.strip_prefix(root) {
            if !rel.as_os_str().is_empty() {
                self.path = rel.to_path_buf();
            } else if let Some(name) = self.path.file_name() {
                self.path = PathBuf::from(name);
            }
        }
        self
    }

    /// Same as [`Document::open`] but with an explicit language id.
    pub fn open_as(path: impl AsRef<Path>, language_id: &str) -> Result<Self> {
        let mut doc = Self::open(path)?;
        doc.language_id = language_id.to_string();
        Ok(doc)
    }
}

impl SourceDocument for Document {
    fn path(&self) -> &Path {
        &self.path
    }

    fn language_id(&self) -> &str {
        &self.language_id
    }

    fn text(&self) -> &str {
        &self.text
    }
}
