use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::storage::{write_replace, StorageError};

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("style element id must not be empty")]
    EmptyId,
    #[error(transparent)]
    Storage(#[from] StorageError),
}

pub type SinkResult<T> = std::result::Result<T, SinkError>;

/// Destination for the generated stylesheet.
///
/// Implementations must leave the previous stylesheet untouched when
/// `replace_style` fails.
pub trait StyleSink {
    fn replace_style(&mut self, id: &str, css: &str) -> SinkResult<()>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleElement {
    pub id: String,
    pub text: String,
}

/// In-memory list of `<style>` elements in document order.
#[derive(Debug, Clone, Default)]
pub struct StyleDocument {
    elements: Vec<StyleElement>,
}

impl StyleDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an element without any ownership checks, as foreign markup would.
    pub fn append(&mut self, id: &str, text: &str) {
        self.elements.push(StyleElement {
            id: id.to_string(),
            text: text.to_string(),
        });
    }

    pub fn elements(&self) -> &[StyleElement] {
        &self.elements
    }

    pub fn style_text(&self, id: &str) -> Option<&str> {
        self.elements
            .iter()
            .find(|element| element.id == id)
            .map(|element| element.text.as_str())
    }

    pub fn count_with_id(&self, id: &str) -> usize {
        self.elements
            .iter()
            .filter(|element| element.id == id)
            .count()
    }
}

impl StyleSink for StyleDocument {
    fn replace_style(&mut self, id: &str, css: &str) -> SinkResult<()> {
        if id.is_empty() {
            return Err(SinkError::EmptyId);
        }
        let before = self.elements.len();
        self.elements.retain(|element| element.id != id);
        let removed = before - self.elements.len();
        if removed > 1 {
            tracing::warn!(id, removed, "removed duplicate style elements");
        }
        self.append(id, css);
        Ok(())
    }
}

/// Writes the stylesheet to a single file, replacing it atomically.
#[derive(Debug, Clone)]
pub struct FileStyleSink {
    path: PathBuf,
}

impl FileStyleSink {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StyleSink for FileStyleSink {
    fn replace_style(&mut self, id: &str, css: &str) -> SinkResult<()> {
        if id.is_empty() {
            return Err(SinkError::EmptyId);
        }
        write_replace(&self.path, css)?;
        Ok(())
    }
}
