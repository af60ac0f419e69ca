//! Overlap validation over resolved placements.

use crate::error::{ConflictReport, OverlapConflict, Result, TrellisError};
use crate::layout::panel::Placed;

/// Check that no two visible widgets occupy intersecting rectangles.
///
/// Pairwise axis-aligned intersection over the flattened placement list.
/// Every conflicting pair is collected and reported together in one
/// [`TrellisError::LayoutConflicts`], never just the first found, so the
/// caller can fix all conflicts after a single validation pass. Three
/// widgets sharing one cell therefore yield three pairs.
pub fn validate_no_overlap(placements: &[Placed]) -> Result<()> {
    let mut conflicts = Vec::new();
    for (i, a) in placements.iter().enumerate() {
        for b in &placements[i + 1..] {
            if a.location.overlaps(&b.location) {
                conflicts.push(OverlapConflict {
                    first: (a.widget.borrow().id(), a.location),
                    second: (b.widget.borrow().id(), b.location),
                });
            }
        }
    }

    if conflicts.is_empty() {
        Ok(())
    } else {
        tracing::debug!(
            target: trellis_core::logging::targets::LAYOUT,
            conflicts = conflicts.len(),
            "overlap validation failed"
        );
        Err(TrellisError::LayoutConflicts(ConflictReport { conflicts }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Location;
    use crate::layout::panel::Panel;
    use crate::widget::widgets::Label;
    use crate::widget::{shared, Widget};

    fn placements_for(locations: &[Location]) -> Vec<Placed> {
        let mut panel = Panel::grid();
        for (i, loc) in locations.iter().enumerate() {
            panel
                .add_widget_at(shared(Label::new(format!("w{i}"))), *loc)
                .unwrap();
        }
        panel.resolve_placements(0, 0)
    }

    #[test]
    fn test_disjoint_placements_pass() {
        let placed = placements_for(&[
            Location::new(0, 0),
            Location::new(0, 1),
            Location::spanning(1, 0, 1, 2),
        ]);
        assert!(validate_no_overlap(&placed).is_ok());
    }

    #[test]
    fn test_three_mutual_overlaps_yield_three_pairs() {
        let placed = placements_for(&[
            Location::new(0, 0),
            Location::new(0, 0),
            Location::new(0, 0),
        ]);
        let err = validate_no_overlap(&placed).unwrap_err();
        match err {
            TrellisError::LayoutConflicts(report) => {
                assert_eq!(report.conflicts.len(), 3);
            }
            other => panic!("expected LayoutConflicts, got {other:?}"),
        }
    }

    #[test]
    fn test_span_overlap_detected() {
        let placed = placements_for(&[
            Location::spanning(0, 0, 2, 2),
            Location::new(1, 1),
            Location::new(2, 2),
        ]);
        let err = validate_no_overlap(&placed).unwrap_err();
        match err {
            TrellisError::LayoutConflicts(report) => {
                assert_eq!(report.conflicts.len(), 1);
                assert_eq!(report.conflicts[0].first.1, Location::spanning(0, 0, 2, 2));
            }
            other => panic!("expected LayoutConflicts, got {other:?}"),
        }
    }

    #[test]
    fn test_hidden_widgets_never_conflict() {
        let mut panel = Panel::grid();
        let a = shared(Label::new("a"));
        let b = shared(Label::new("b"));
        panel.add_widget_at(a, Location::new(0, 0)).unwrap();
        panel.add_widget_at(b.clone(), Location::new(0, 0)).unwrap();
        b.borrow_mut().base_mut().set_visible(false);

        // The hidden widget never reaches the placement list at all.
        let placed = panel.resolve_placements(0, 0);
        assert_eq!(placed.len(), 1);
        assert!(validate_no_overlap(&placed).is_ok());
    }
}
