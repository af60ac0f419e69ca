//! Error types for the Trellis dialog engine.
//!
//! Three fatal families, reported at the call that caused them:
//!
//! - **structural composition errors**: re-parenting, self-containment,
//!   containment cycles; no partial mutation remains after the failure
//! - **layout conflict errors**: visible widgets overlap at submission
//!   time; every conflicting pair is reported in one aggregated error
//! - **domain validation errors**: invalid sizes or ranges, rejected at
//!   assignment time before any submission
//!
//! Host failures are wrapped, never retried here.

use std::fmt;

use thiserror::Error;
use trellis_core::WidgetId;

use crate::geometry::Location;

/// The main error type for Trellis operations.
#[derive(Debug, Error)]
pub enum TrellisError {
    /// The child is already owned by a container.
    #[error("child {id} is already owned by another container")]
    AlreadyParented {
        /// Id of the offending child.
        id: WidgetId,
    },

    /// A panel was added to itself.
    #[error("panel {id} cannot be added to itself")]
    SelfParent {
        /// Id of the panel.
        id: WidgetId,
    },

    /// Adding the panel would create a containment cycle.
    #[error("adding panel {id} would create a containment cycle")]
    AncestorCycle {
        /// Id of the panel that contains the would-be parent.
        id: WidgetId,
    },

    /// A placement call does not match the panel's composition strategy.
    #[error("panel {id} uses the {strategy} strategy and cannot accept this placement")]
    StrategyMismatch {
        /// Id of the panel.
        id: WidgetId,
        /// Name of the panel's actual strategy.
        strategy: &'static str,
    },

    /// The named child is not in this container.
    #[error("child {id} is not owned by this container")]
    UnknownChild {
        /// Id of the missing child.
        id: WidgetId,
    },

    /// Visible widgets overlap. Lists every conflicting pair.
    #[error("{0}")]
    LayoutConflicts(ConflictReport),

    /// A dimension was assigned an invalid value.
    #[error("invalid {name}: {value}")]
    InvalidDimension {
        /// The dimension being assigned.
        name: &'static str,
        /// The rejected value.
        value: u32,
    },

    /// A minimum exceeds its maximum.
    #[error("invalid {name} range: minimum {min} exceeds maximum {max}")]
    InvalidRange {
        /// The dimension being assigned.
        name: &'static str,
        /// The rejected minimum.
        min: u32,
        /// The rejected maximum.
        max: u32,
    },

    /// A numeric minimum exceeds its maximum.
    #[error("invalid {name}: minimum {min} exceeds maximum {max}")]
    InvalidValueRange {
        /// The property being assigned.
        name: &'static str,
        /// The rejected minimum.
        min: f64,
        /// The rejected maximum.
        max: f64,
    },

    /// A numeric value was not finite.
    #[error("{name} must be finite, got {value}")]
    NotFinite {
        /// The property being assigned.
        name: &'static str,
        /// The rejected value.
        value: f64,
    },

    /// A tree operation referenced a node that no longer exists.
    #[error("tree node does not exist")]
    UnknownTreeNode,

    /// A tree node key collides with an existing node.
    #[error("tree node key {key:?} already exists")]
    DuplicateNodeKey {
        /// The colliding key.
        key: String,
    },

    /// The rendering host failed.
    #[error("host error: {0}")]
    Host(#[from] HostError),

    /// The host returned no payload for an interactive round.
    #[error("host returned no result payload for an interactive round")]
    MissingResponse,
}

/// A specialized Result type for Trellis operations.
pub type Result<T> = std::result::Result<T, TrellisError>;

/// One pair of visible widgets whose resolved rectangles intersect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlapConflict {
    /// The first widget and its resolved location.
    pub first: (WidgetId, Location),
    /// The second widget and its resolved location.
    pub second: (WidgetId, Location),
}

impl fmt::Display for OverlapConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}@{} overlaps {}@{}",
            self.first.0, self.first.1, self.second.0, self.second.1
        )
    }
}

/// Every overlapping pair found in a single validation pass.
///
/// Validation never stops at the first conflict: the full report lets the
/// caller fix all placements after one failed submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConflictReport {
    /// All conflicting pairs, in scan order.
    pub conflicts: Vec<OverlapConflict>,
}

impl fmt::Display for ConflictReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} overlapping widget pair(s): ", self.conflicts.len())?;
        for (i, conflict) in self.conflicts.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{conflict}")?;
        }
        Ok(())
    }
}

/// Errors reported by the rendering host boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
    /// The transport to the host failed.
    #[error("host transport failed: {0}")]
    Transport(String),

    /// The host rejected the submitted description.
    #[error("host rejected the request: {0}")]
    Rejected(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conflict_report_lists_all_pairs() {
        let id_a = WidgetId::next();
        let id_b = WidgetId::next();
        let id_c = WidgetId::next();
        let loc = Location::new(0, 0);
        let report = ConflictReport {
            conflicts: vec![
                OverlapConflict {
                    first: (id_a, loc),
                    second: (id_b, loc),
                },
                OverlapConflict {
                    first: (id_a, loc),
                    second: (id_c, loc),
                },
            ],
        };
        let text = report.to_string();
        assert!(text.starts_with("2 overlapping widget pair(s)"));
        assert!(text.contains(&id_a.to_string()));
        assert!(text.contains(&id_c.to_string()));
    }
}
