//! Element selectors and structured queries understood by the UI port.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// How to find an element on the rendered page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "by", rename_all = "snake_case")]
pub enum Selector {
    /// CSS selector, first match.
    Css { value: String },
    /// Smallest visible element whose text contains `value`, case-insensitive.
    Text { value: String },
    /// Button whose text contains `value`, case-insensitive.
    ButtonText { value: String },
    /// Element matching `css` inside the first table row containing `row_text`.
    RowWithText { row_text: String, css: String },
}

impl Selector {
    pub fn css(value: impl Into<String>) -> Self {
        Self::Css {
            value: value.into(),
        }
    }

    pub fn text(value: impl Into<String>) -> Self {
        Self::Text {
            value: value.into(),
        }
    }

    pub fn button_text(value: impl Into<String>) -> Self {
        Self::ButtonText {
            value: value.into(),
        }
    }

    pub fn row_with_text(row_text: impl Into<String>, css: impl Into<String>) -> Self {
        Self::RowWithText {
            row_text: row_text.into(),
            css: css.into(),
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Css { value } => write!(f, "css `{value}`"),
            Self::Text { value } => write!(f, "text \"{value}\""),
            Self::ButtonText { value } => write!(f, "button \"{value}\""),
            Self::RowWithText { row_text, css } => write!(f, "`{css}` in row \"{row_text}\""),
        }
    }
}

/// Options for a click.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClickOptions {
    /// Click even if the element is hidden or covered.
    pub force: bool,
    /// How long to wait for the element to appear.
    pub timeout: Duration,
}

impl Default for ClickOptions {
    fn default() -> Self {
        Self {
            force: false,
            timeout: Duration::from_secs(30),
        }
    }
}

/// Structured extraction of the first file-table row whose name contains `marker`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowQuery {
    /// CSS selector for the candidate rows.
    pub rows: String,
    /// Rows with fewer cells are skipped.
    pub min_cells: usize,
    /// Zero-based index of the name cell.
    pub name_cell: usize,
    /// Zero-based index of the size cell.
    pub size_cell: usize,
    /// Token the name cell must contain.
    pub marker: String,
}
