//! Opaque widget identity.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Global counter backing [`WidgetId::next`]. Never reset.
static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// A unique, stable identifier for a widget or panel.
///
/// Ids are assigned once at construction and remain valid for the life of
/// the instance. The rendering host addresses its result payload by the
/// string form of these ids, so they must never be reused while a dialog is
/// live.
///
/// # Related
///
/// - The host boundary keys its flat result payload by `id.to_string()`
/// - Containers track child ownership by id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WidgetId(u64);

impl WidgetId {
    /// Allocate the next unused id.
    pub fn next() -> Self {
        Self(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Convert the id to its raw numeric value.
    ///
    /// Useful for interop with external systems that need a numeric key.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for WidgetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "w{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_unique() {
        let a = WidgetId::next();
        let b = WidgetId::next();
        assert_ne!(a, b);
    }

    #[test]
    fn test_display_form() {
        let id = WidgetId::next();
        assert_eq!(format!("{}", id), format!("w{}", id.as_u64()));
    }

    #[test]
    fn test_ids_are_monotonic() {
        let a = WidgetId::next();
        let b = WidgetId::next();
        assert!(b.as_u64() > a.as_u64());
    }
}
