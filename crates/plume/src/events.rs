use crossterm::event::KeyEvent;

use plumecore::{ChangeSource, Delta, Range, TextWidget};

/// Unprivileged read-only view of the widget, captured at event time.
///
/// Callbacks receive this instead of the widget handle so that event
/// handlers cannot mutate editor state out from under the binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetSnapshot {
    pub value: String,
    pub length: usize,
    pub selection: Option<Range>,
}

impl WidgetSnapshot {
    pub fn capture(widget: &dyn TextWidget) -> Self {
        Self {
            value: widget.contents(),
            length: widget.length(),
            selection: widget.selection(),
        }
    }
}

/// Callback invoked when widget content changes.
pub type ChangeHandler = Box<dyn FnMut(&str, &Delta, ChangeSource, &WidgetSnapshot)>;

/// Callback invoked when the widget selection changes.
pub type SelectionHandler = Box<dyn FnMut(Option<Range>, ChangeSource, &WidgetSnapshot)>;

/// Callback invoked for key events reaching the container.
pub type KeyHandler = Box<dyn FnMut(&KeyEvent)>;

/// Event callbacks registered with the binding.
///
/// Handlers are held apart from [`crate::EditorProps`]: closures have no
/// useful identity to diff, so replacing them never participates in the
/// dirty/clean prop comparison.
#[derive(Default)]
pub struct EditorHandlers {
    pub on_change: Option<ChangeHandler>,
    pub on_change_selection: Option<SelectionHandler>,
    pub on_key_down: Option<KeyHandler>,
    pub on_key_up: Option<KeyHandler>,
    pub on_key_press: Option<KeyHandler>,
}

impl EditorHandlers {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plumecore::{ChangeSource, RopeWidget, TextWidget, WidgetConfig};

    #[test]
    fn test_snapshot_captures_widget_state() {
        let mut widget = RopeWidget::new(&WidgetConfig::default());
        widget.set_contents("hello", ChangeSource::Api);
        widget.set_selection(Some(Range::new(1, 3)), ChangeSource::Api);

        let snapshot = WidgetSnapshot::capture(&widget);
        assert_eq!(snapshot.value, "hello");
        assert_eq!(snapshot.length, 5);
        assert_eq!(snapshot.selection, Some(Range::new(1, 3)));
    }

    #[test]
    fn test_handlers_default_to_none() {
        let handlers = EditorHandlers::new();
        assert!(handlers.on_change.is_none());
        assert!(handlers.on_change_selection.is_none());
        assert!(handlers.on_key_down.is_none());
    }
}
