//! Logical grid geometry.
//!
//! Everything in Trellis is positioned on a logical grid of rows and
//! columns; nothing here knows about pixels. [`Location`] is the rectangle a
//! widget occupies in its owner's coordinate frame, [`SizeConstraints`] and
//! [`Bounds`] are the sizing hints handed to the rendering host, and
//! [`TrackSize`] is the per-row/per-column size override.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TrellisError};

/// A rectangle in a container's local grid: starting cell plus spans.
///
/// Spans are always at least 1; the constructors clamp. Two locations
/// overlap iff their row ranges and column ranges both intersect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    /// Starting row.
    pub row: u32,
    /// Starting column.
    pub column: u32,
    /// Number of rows occupied.
    pub row_span: u32,
    /// Number of columns occupied.
    pub column_span: u32,
}

impl Location {
    /// A single-cell location at the given row and column.
    pub fn new(row: u32, column: u32) -> Self {
        Self {
            row,
            column,
            row_span: 1,
            column_span: 1,
        }
    }

    /// A location spanning multiple rows and/or columns.
    ///
    /// Spans below 1 are clamped to 1.
    pub fn spanning(row: u32, column: u32, row_span: u32, column_span: u32) -> Self {
        Self {
            row,
            column,
            row_span: row_span.max(1),
            column_span: column_span.max(1),
        }
    }

    /// The first row past the end of this location.
    pub fn row_end(&self) -> u32 {
        self.row + self.row_span
    }

    /// The first column past the end of this location.
    pub fn column_end(&self) -> u32 {
        self.column + self.column_span
    }

    /// Whether this location's rectangle intersects another's.
    pub fn overlaps(&self, other: &Location) -> bool {
        self.row < other.row_end()
            && other.row < self.row_end()
            && self.column < other.column_end()
            && other.column < self.column_end()
    }

    /// This location offset by a parent origin.
    pub fn translated(&self, row_offset: u32, column_offset: u32) -> Self {
        Self {
            row: self.row + row_offset,
            column: self.column + column_offset,
            ..*self
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({},{} {}x{})",
            self.row, self.column, self.row_span, self.column_span
        )
    }
}

/// Horizontal alignment of a widget within its resolved cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HorizontalAlign {
    /// Fill the cell width.
    #[default]
    Stretch,
    /// Align to the left edge.
    Left,
    /// Center horizontally.
    Center,
    /// Align to the right edge.
    Right,
}

/// Vertical alignment of a widget within its resolved cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerticalAlign {
    /// Fill the cell height.
    #[default]
    Stretch,
    /// Align to the top edge.
    Top,
    /// Center vertically.
    Center,
    /// Align to the bottom edge.
    Bottom,
}

/// Margins around a widget, in host units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Margins {
    /// Top margin.
    pub top: u32,
    /// Right margin.
    pub right: u32,
    /// Bottom margin.
    pub bottom: u32,
    /// Left margin.
    pub left: u32,
}

impl Margins {
    /// Create margins with individual values.
    pub fn new(top: u32, right: u32, bottom: u32, left: u32) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    /// Uniform margins on all four sides.
    pub fn uniform(value: u32) -> Self {
        Self::new(value, value, value, value)
    }
}

/// Per-widget size hints handed to the rendering host.
///
/// All values are optional; `None` lets the host decide. Mutation is
/// validated at assignment time: a fixed dimension of zero and a minimum
/// exceeding its maximum are domain errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SizeConstraints {
    /// Fixed width, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    /// Fixed height, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    /// Minimum width.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_width: Option<u32>,
    /// Maximum width.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_width: Option<u32>,
    /// Minimum height.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_height: Option<u32>,
    /// Maximum height.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_height: Option<u32>,
}

impl SizeConstraints {
    /// Create unconstrained size hints.
    pub fn none() -> Self {
        Self::default()
    }

    /// Set a fixed width. Zero is rejected.
    pub fn set_width(&mut self, width: Option<u32>) -> Result<()> {
        validate_dimension("width", width)?;
        self.width = width;
        Ok(())
    }

    /// Set a fixed height. Zero is rejected.
    pub fn set_height(&mut self, height: Option<u32>) -> Result<()> {
        validate_dimension("height", height)?;
        self.height = height;
        Ok(())
    }

    /// Set the width range. A minimum exceeding the maximum is rejected.
    pub fn set_width_range(&mut self, min: Option<u32>, max: Option<u32>) -> Result<()> {
        validate_range("width", min, max)?;
        self.min_width = min;
        self.max_width = max;
        Ok(())
    }

    /// Set the height range. A minimum exceeding the maximum is rejected.
    pub fn set_height_range(&mut self, min: Option<u32>, max: Option<u32>) -> Result<()> {
        validate_range("height", min, max)?;
        self.min_height = min;
        self.max_height = max;
        Ok(())
    }
}

/// Dialog-level width or height bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Bounds {
    /// Fixed extent; overrides min/max when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fixed: Option<u32>,
    /// Minimum extent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<u32>,
    /// Maximum extent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<u32>,
}

impl Bounds {
    /// Unbounded in both directions.
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// A fixed extent.
    pub fn fixed(value: u32) -> Result<Self> {
        validate_dimension("bounds", Some(value))?;
        Ok(Self {
            fixed: Some(value),
            min: None,
            max: None,
        })
    }

    /// A min/max range.
    pub fn range(min: Option<u32>, max: Option<u32>) -> Result<Self> {
        validate_range("bounds", min, max)?;
        Ok(Self {
            fixed: None,
            min,
            max,
        })
    }

    /// Whether no sizing hint is present at all.
    pub fn is_unbounded(&self) -> bool {
        self.fixed.is_none() && self.min.is_none() && self.max.is_none()
    }
}

/// Size override for a single grid row or column.
///
/// Unmapped indices default to [`TrackSize::Auto`]. The `Display` form is
/// the wire string handed to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrackSize {
    /// A fixed number of host units.
    Fixed(u32),
    /// Size to content.
    #[default]
    Auto,
    /// Take a share of the remaining space.
    Stretch,
}

impl fmt::Display for TrackSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(n) => write!(f, "{n}"),
            Self::Auto => write!(f, "auto"),
            Self::Stretch => write!(f, "stretch"),
        }
    }
}

fn validate_dimension(name: &'static str, value: Option<u32>) -> Result<()> {
    if value == Some(0) {
        return Err(TrellisError::InvalidDimension { name, value: 0 });
    }
    Ok(())
}

fn validate_range(name: &'static str, min: Option<u32>, max: Option<u32>) -> Result<()> {
    if let (Some(lo), Some(hi)) = (min, max) {
        if lo > hi {
            return Err(TrellisError::InvalidRange {
                name,
                min: lo,
                max: hi,
            });
        }
    }
    Ok(())
}
