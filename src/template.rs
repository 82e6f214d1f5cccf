//! Runner templates: program skeletons with a single source marker.

use crate::error::{Error, Result};

pub const SOURCE_MARKER: &str = "#{source}";

/// A validated runner template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunnerTemplate {
    text: String,
}

impl RunnerTemplate {
    pub fn new(text: impl Into<String>) -> Result<Self> {
        let text = text.into();
        let markers = text.matches(SOURCE_MARKER).count();
        if markers != 1 {
            return Err(Error::InvalidTemplate { markers });
        }
        Ok(Self { text })
    }

    /// Substitute `source` at the marker. Marker-like text inside `source`
    /// is left alone.
    pub fn render(&self, source: &str) -> String {
        self.text.replacen(SOURCE_MARKER, source, 1)
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}
