use serde::{Deserialize, Serialize};

use crate::error::FormatResult;

/// Formatting options.
///
/// Every field has a default, so a partial JSON object is a valid
/// configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Preferred maximum line width.
    pub max_width: usize,
    /// Spaces per indentation level.
    pub tab_spaces: usize,
    /// Most blank lines kept between two statements of a code block.
    pub blank_lines_upper_bound: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_width: 120,
            tab_spaces: 2,
            blank_lines_upper_bound: 2,
        }
    }
}

impl Config {
    /// Parse a configuration from JSON.
    pub fn from_json_str(json: &str) -> FormatResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Set the preferred maximum line width.
    pub fn with_width(mut self, max_width: usize) -> Self {
        self.max_width = max_width;
        self
    }

    /// Set the number of spaces per indentation level.
    pub fn with_tab_spaces(mut self, tab_spaces: usize) -> Self {
        self.tab_spaces = tab_spaces;
        self
    }

    /// Set how many blank lines may separate two statements.
    pub fn with_blank_lines_upper_bound(mut self, bound: usize) -> Self {
        self.blank_lines_upper_bound = bound;
        self
    }
}
