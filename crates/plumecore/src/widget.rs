use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::delta::Delta;
use crate::types::{Bounds, ChangeSource, Range, WidgetEvent};

/// Feature-toggle map handed to the widget at construction time. Values
/// are opaque to the binding; the widget decides what they mean.
pub type ModuleMap = BTreeMap<String, Value>;

/// Construction-time configuration for a widget instance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WidgetConfig {
    pub theme: String,
    pub modules: ModuleMap,
    pub placeholder: Option<String>,
    pub read_only: bool,
    pub bounds: Option<Bounds>,
}

/// Identifier for an attached hook, returned on attach and required to
/// detach.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HookId(pub u64);

/// Hook invoked synchronously when the widget's text changes.
pub type TextChangeHook = Box<dyn FnMut(&str, &Delta, ChangeSource)>;

/// Hook invoked synchronously when the widget's selection changes.
pub type SelectionChangeHook = Box<dyn FnMut(Option<Range>, ChangeSource)>;

/// Queue through which widget-originated events reach the host's
/// execution queue. Hooks push into it; the binding drains it.
pub type EventSink = Rc<RefCell<Vec<WidgetEvent>>>;

/// The opaque surface of a wrapped rich-text widget.
///
/// Everything behind this trait is externally owned: the binding only
/// constructs instances through a [`WidgetFactory`], mutates them through
/// these methods, and listens through attached hooks. `User`-sourced
/// edits are expected to be ignored while the widget is disabled;
/// `Api`-sourced mutations always apply.
pub trait TextWidget {
    fn contents(&self) -> String;

    /// Document length in characters.
    fn length(&self) -> usize;

    /// Replace the whole document.
    fn set_contents(&mut self, value: &str, source: ChangeSource);

    /// Insert `text` before the character at `index`.
    fn insert(&mut self, index: usize, text: &str, source: ChangeSource);

    /// Remove the characters covered by `range`.
    fn delete(&mut self, range: Range, source: ChangeSource);

    fn selection(&self) -> Option<Range>;

    fn set_selection(&mut self, range: Option<Range>, source: ChangeSource);

    fn is_enabled(&self) -> bool;

    fn set_enabled(&mut self, enabled: bool);

    fn focus(&mut self);

    fn has_focus(&self) -> bool;

    fn placeholder(&self) -> Option<&str>;

    fn attach_text_change(&mut self, hook: TextChangeHook) -> HookId;

    fn attach_selection_change(&mut self, hook: SelectionChangeHook) -> HookId;

    /// Detach a previously attached hook. Returns false when the id is
    /// unknown, which makes repeated teardown harmless.
    fn detach(&mut self, id: HookId) -> bool;
}

/// Seam through which the host supplies the wrapped widget.
pub trait WidgetFactory {
    fn create(&self, config: &WidgetConfig) -> Box<dyn TextWidget>;
}
