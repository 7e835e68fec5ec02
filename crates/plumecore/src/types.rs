use serde::{Deserialize, Serialize};

use crate::delta::Delta;

/// A selection range inside a widget, measured in characters.
///
/// `length` may be zero, in which case the range is a caret position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Range {
    pub index: usize,
    pub length: usize,
}

impl Range {
    pub fn new(index: usize, length: usize) -> Self {
        Self { index, length }
    }

    /// A caret position without extent.
    pub fn collapsed(index: usize) -> Self {
        Self { index, length: 0 }
    }

    pub fn end(&self) -> usize {
        self.index + self.length
    }

    pub fn is_collapsed(&self) -> bool {
        self.length == 0
    }

    /// Clamp the range into a document of `len` characters.
    pub fn clamp_to(&self, len: usize) -> Self {
        let index = self.index.min(len);
        let length = self.length.min(len - index);
        Self { index, length }
    }
}

/// Origin tag attached to every widget mutation and emitted event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChangeSource {
    /// Interactive input routed into the widget.
    User,
    /// Programmatic mutation through the binding or the widget API.
    Api,
    /// Internal bookkeeping that must not reach user callbacks.
    Silent,
}

/// Positioning bounds handed to the widget at construction time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Bounds {
    /// Reference to a host-resolved container.
    Selector(String),
    /// Explicit extent in host cells.
    Rect { width: u16, height: u16 },
}

/// An event emitted by a widget, queued for dispatch on the host's
/// execution queue.
#[derive(Debug, Clone, PartialEq)]
pub enum WidgetEvent {
    TextChange {
        value: String,
        delta: Delta,
        source: ChangeSource,
    },
    SelectionChange {
        range: Option<Range>,
        source: ChangeSource,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_end_and_collapse() {
        let range = Range::new(3, 4);
        assert_eq!(range.end(), 7);
        assert!(!range.is_collapsed());

        let caret = Range::collapsed(5);
        assert_eq!(caret.end(), 5);
        assert!(caret.is_collapsed());
    }

    #[test]
    fn test_range_clamping() {
        // Index past the end collapses to the end
        let range = Range::new(10, 4).clamp_to(6);
        assert_eq!(range, Range::new(6, 0));

        // Length is trimmed to what remains
        let range = Range::new(4, 10).clamp_to(6);
        assert_eq!(range, Range::new(4, 2));

        // In-bounds ranges are untouched
        let range = Range::new(1, 2).clamp_to(6);
        assert_eq!(range, Range::new(1, 2));
    }

    #[test]
    fn test_range_serialization() {
        let range = Range::new(2, 3);
        let json = serde_json::to_string(&range).unwrap();
        assert_eq!(json, r#"{"index":2,"length":3}"#);

        let back: Range = serde_json::from_str(&json).unwrap();
        assert_eq!(back, range);
    }

    #[test]
    fn test_bounds_variants() {
        let selector = Bounds::Selector("#editor".to_string());
        let rect = Bounds::Rect {
            width: 80,
            height: 24,
        };
        assert_ne!(selector, rect);

        let json = serde_json::to_string(&rect).unwrap();
        let back: Bounds = serde_json::from_str(&json).unwrap();
        assert_eq!(back, rect);
    }
}
