//! Feed documents: loading from disk, signature stripping, output formatting.

use std::path::{Path, PathBuf};

use feedfreeze_util::errors::FreezeError;

use crate::xml::{Document, Element};

/// Start of the signature comment appended to signed feeds.
pub const SIGNATURE_MARKER: &str = "<!-- Base64 Signature";

/// A feed document together with the file it was read from.
#[derive(Debug, Clone)]
pub struct Feed {
    path: Option<PathBuf>,
    document: Document,
}

impl Feed {
    /// Read and parse a feed file, dropping any trailing signature block.
    pub fn load(path: &Path) -> Result<Self, FreezeError> {
        let content = std::fs::read_to_string(path).map_err(|e| FreezeError::Xml {
            message: format!("failed to read feed {}: {e}", path.display()),
        })?;
        let mut feed = Self::parse(&content).map_err(|e| FreezeError::Xml {
            message: format!("{}: {e}", path.display()),
        })?;
        feed.path = Some(path.to_path_buf());
        tracing::debug!("loaded feed from {}", path.display());
        Ok(feed)
    }

    pub fn parse(xml: &str) -> Result<Self, FreezeError> {
        let document = Document::parse(strip_signature(xml))?;
        Ok(Self {
            path: None,
            document,
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn root(&self) -> &Element {
        &self.document.root
    }

    pub fn root_mut(&mut self) -> &mut Element {
        &mut self.document.root
    }

    /// The frozen feed as written to disk: pretty-printed, unsigned, and
    /// without blank lines.
    pub fn to_output_string(&self) -> Result<String, FreezeError> {
        let pretty = self.document.to_pretty_string()?;
        let mut out = String::with_capacity(pretty.len());
        for line in strip_signature(&pretty).lines() {
            if line.trim().is_empty() {
                continue;
            }
            out.push_str(line);
            out.push('\n');
        }
        Ok(out)
    }
}

/// Cut `text` at the last signature comment, if any.
pub fn strip_signature(text: &str) -> &str {
    match text.rfind(SIGNATURE_MARKER) {
        Some(pos) => &text[..pos],
        None => text,
    }
}
