use ropey::Rope;

use crate::delta::Delta;
use crate::types::{ChangeSource, Range};
use crate::widget::{
    HookId, ModuleMap, SelectionChangeHook, TextChangeHook, TextWidget, WidgetConfig,
    WidgetFactory,
};

/// Reference widget backed by a rope of plain text.
///
/// Implements just enough editing surface to exercise and demonstrate the
/// binding: contents, a clamped selection, an enabled flag gating
/// user-sourced edits, and synchronous change hooks. Formatting and
/// structured documents are out of scope.
pub struct RopeWidget {
    rope: Rope,
    selection: Option<Range>,
    enabled: bool,
    focused: bool,
    placeholder: Option<String>,
    theme: String,
    modules: ModuleMap,
    text_hooks: Vec<(HookId, TextChangeHook)>,
    selection_hooks: Vec<(HookId, SelectionChangeHook)>,
    next_hook: u64,
}

impl RopeWidget {
    pub fn new(config: &WidgetConfig) -> Self {
        Self {
            rope: Rope::new(),
            selection: None,
            enabled: !config.read_only,
            focused: false,
            placeholder: config.placeholder.clone(),
            theme: config.theme.clone(),
            modules: config.modules.clone(),
            text_hooks: Vec::new(),
            selection_hooks: Vec::new(),
            next_hook: 0,
        }
    }

    pub fn theme(&self) -> &str {
        &self.theme
    }

    pub fn modules(&self) -> &ModuleMap {
        &self.modules
    }

    fn next_hook_id(&mut self) -> HookId {
        let id = HookId(self.next_hook);
        self.next_hook += 1;
        id
    }

    fn emit_text_change(&mut self, delta: Delta, source: ChangeSource) {
        let value = self.rope.to_string();
        for (_, hook) in &mut self.text_hooks {
            hook(&value, &delta, source);
        }
    }

    fn emit_selection_change(&mut self, source: ChangeSource) {
        let range = self.selection;
        for (_, hook) in &mut self.selection_hooks {
            hook(range, source);
        }
    }

    /// Shift the stored selection across an insertion of `count`
    /// characters at `index`. Returns true when it moved.
    fn shift_selection_for_insert(&mut self, index: usize, count: usize) -> bool {
        match self.selection {
            Some(sel) if sel.index >= index => {
                self.selection = Some(Range::new(sel.index + count, sel.length));
                true
            }
            Some(sel) if index < sel.end() => {
                self.selection = Some(Range::new(sel.index, sel.length + count));
                true
            }
            _ => false,
        }
    }

    /// Shift the stored selection across a removal. Overlapping
    /// selections collapse at the removal point. Returns true when it
    /// moved.
    fn shift_selection_for_delete(&mut self, range: Range) -> bool {
        match self.selection {
            Some(sel) if sel.end() <= range.index => false,
            Some(sel) if sel.index >= range.end() => {
                self.selection = Some(Range::new(sel.index - range.length, sel.length));
                true
            }
            Some(_) => {
                self.selection = Some(Range::collapsed(range.index));
                true
            }
            None => false,
        }
    }

    fn rejects(&self, source: ChangeSource) -> bool {
        if !self.enabled && source == ChangeSource::User {
            log::debug!("edit ignored: widget is disabled");
            return true;
        }
        false
    }
}

impl Default for RopeWidget {
    fn default() -> Self {
        Self::new(&WidgetConfig::default())
    }
}

impl TextWidget for RopeWidget {
    fn contents(&self) -> String {
        self.rope.to_string()
    }

    fn length(&self) -> usize {
        self.rope.len_chars()
    }

    fn set_contents(&mut self, value: &str, source: ChangeSource) {
        if self.rejects(source) {
            return;
        }

        let old = self.rope.to_string();
        let delta = Delta::between(&old, value);
        if delta.is_identity() {
            return;
        }

        self.rope = Rope::from_str(value);

        let len = self.rope.len_chars();
        let clamped = self.selection.map(|sel| sel.clamp_to(len));
        let selection_moved = clamped != self.selection;
        self.selection = clamped;

        self.emit_text_change(delta, source);
        if selection_moved {
            self.emit_selection_change(source);
        }
    }

    fn insert(&mut self, index: usize, text: &str, source: ChangeSource) {
        if self.rejects(source) || text.is_empty() {
            return;
        }

        let index = index.min(self.rope.len_chars());
        self.rope.insert(index, text);

        let count = text.chars().count();
        let selection_moved = self.shift_selection_for_insert(index, count);

        self.emit_text_change(Delta::insertion(index, text), source);
        if selection_moved {
            self.emit_selection_change(source);
        }
    }

    fn delete(&mut self, range: Range, source: ChangeSource) {
        if self.rejects(source) {
            return;
        }

        let range = range.clamp_to(self.rope.len_chars());
        if range.is_collapsed() {
            return;
        }

        self.rope.remove(range.index..range.end());
        let selection_moved = self.shift_selection_for_delete(range);

        self.emit_text_change(Delta::removal(range.index, range.length), source);
        if selection_moved {
            self.emit_selection_change(source);
        }
    }

    fn selection(&self) -> Option<Range> {
        self.selection
    }

    fn set_selection(&mut self, range: Option<Range>, source: ChangeSource) {
        let range = range.map(|r| r.clamp_to(self.rope.len_chars()));
        if range == self.selection {
            return;
        }
        self.selection = range;
        self.emit_selection_change(source);
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn focus(&mut self) {
        self.focused = true;
    }

    fn has_focus(&self) -> bool {
        self.focused
    }

    fn placeholder(&self) -> Option<&str> {
        self.placeholder.as_deref()
    }

    fn attach_text_change(&mut self, hook: TextChangeHook) -> HookId {
        let id = self.next_hook_id();
        self.text_hooks.push((id, hook));
        id
    }

    fn attach_selection_change(&mut self, hook: SelectionChangeHook) -> HookId {
        let id = self.next_hook_id();
        self.selection_hooks.push((id, hook));
        id
    }

    fn detach(&mut self, id: HookId) -> bool {
        let before = self.text_hooks.len() + self.selection_hooks.len();
        self.text_hooks.retain(|(hook_id, _)| *hook_id != id);
        self.selection_hooks.retain(|(hook_id, _)| *hook_id != id);
        before != self.text_hooks.len() + self.selection_hooks.len()
    }
}

/// Factory producing [`RopeWidget`] instances; the default seam for the
/// demo and for tests.
pub struct RopeWidgetFactory;

impl WidgetFactory for RopeWidgetFactory {
    fn create(&self, config: &WidgetConfig) -> Box<dyn TextWidget> {
        Box::new(RopeWidget::new(config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_widget_creation_from_config() {
        let config = WidgetConfig {
            theme: "classic".to_string(),
            placeholder: Some("Write something...".to_string()),
            read_only: false,
            ..WidgetConfig::default()
        };
        let widget = RopeWidget::new(&config);

        assert_eq!(widget.contents(), "");
        assert_eq!(widget.length(), 0);
        assert!(widget.is_enabled());
        assert_eq!(widget.placeholder(), Some("Write something..."));
        assert_eq!(widget.theme(), "classic");
    }

    #[test]
    fn test_read_only_config_disables_widget() {
        let config = WidgetConfig {
            read_only: true,
            ..WidgetConfig::default()
        };
        let widget = RopeWidget::new(&config);
        assert!(!widget.is_enabled());
    }

    #[test]
    fn test_insert_and_delete() {
        let mut widget = RopeWidget::default();
        widget.insert(0, "hello world", ChangeSource::User);
        assert_eq!(widget.contents(), "hello world");

        widget.delete(Range::new(5, 6), ChangeSource::User);
        assert_eq!(widget.contents(), "hello");
    }

    #[test]
    fn test_disabled_widget_ignores_user_edits() {
        let mut widget = RopeWidget::default();
        widget.set_contents("locked", ChangeSource::Api);
        widget.set_enabled(false);

        widget.insert(0, "x", ChangeSource::User);
        widget.delete(Range::new(0, 2), ChangeSource::User);
        assert_eq!(widget.contents(), "locked");

        // Programmatic mutation still applies
        widget.set_contents("replaced", ChangeSource::Api);
        assert_eq!(widget.contents(), "replaced");
    }

    #[test]
    fn test_selection_clamped_to_document() {
        let mut widget = RopeWidget::default();
        widget.set_contents("short", ChangeSource::Api);

        widget.set_selection(Some(Range::new(10, 5)), ChangeSource::Api);
        assert_eq!(widget.selection(), Some(Range::new(5, 0)));
    }

    #[test]
    fn test_selection_shifts_with_edits() {
        let mut widget = RopeWidget::default();
        widget.set_contents("hello world", ChangeSource::Api);
        widget.set_selection(Some(Range::new(6, 5)), ChangeSource::Api);

        // Insertion before the selection pushes it right
        widget.insert(0, ">> ", ChangeSource::Api);
        assert_eq!(widget.selection(), Some(Range::new(9, 5)));

        // Removal before the selection pulls it left
        widget.delete(Range::new(0, 3), ChangeSource::Api);
        assert_eq!(widget.selection(), Some(Range::new(6, 5)));

        // Removal overlapping the selection collapses it
        widget.delete(Range::new(4, 4), ChangeSource::Api);
        assert_eq!(widget.selection(), Some(Range::collapsed(4)));
    }

    #[test]
    fn test_text_change_hook_receives_delta() {
        use std::cell::RefCell;
        use std::rc::Rc;

        let seen: Rc<RefCell<Vec<Delta>>> = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();

        let mut widget = RopeWidget::default();
        widget.attach_text_change(Box::new(move |_, delta, _| {
            sink.borrow_mut().push(delta.clone());
        }));

        widget.insert(0, "ab", ChangeSource::User);
        widget.set_contents("ab!", ChangeSource::Api);

        let seen = seen.borrow();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0], Delta::insertion(0, "ab"));
        assert_eq!(seen[1], Delta::insertion(2, "!"));
    }

    #[test]
    fn test_set_contents_with_equal_value_emits_nothing() {
        use std::cell::RefCell;
        use std::rc::Rc;

        let count = Rc::new(RefCell::new(0usize));
        let sink = count.clone();

        let mut widget = RopeWidget::default();
        widget.set_contents("same", ChangeSource::Api);
        widget.attach_text_change(Box::new(move |_, _, _| {
            *sink.borrow_mut() += 1;
        }));

        widget.set_contents("same", ChangeSource::Api);
        assert_eq!(*count.borrow(), 0);
    }

    #[test]
    fn test_detach_is_idempotent() {
        let mut widget = RopeWidget::default();
        let id = widget.attach_text_change(Box::new(|_, _, _| {}));

        assert!(widget.detach(id));
        assert!(!widget.detach(id));
    }

    #[test]
    fn test_selection_change_deduplicated() {
        use std::cell::RefCell;
        use std::rc::Rc;

        let count = Rc::new(RefCell::new(0usize));
        let sink = count.clone();

        let mut widget = RopeWidget::default();
        widget.set_contents("hello", ChangeSource::Api);
        widget.attach_selection_change(Box::new(move |_, _| {
            *sink.borrow_mut() += 1;
        }));

        widget.set_selection(Some(Range::new(1, 2)), ChangeSource::User);
        widget.set_selection(Some(Range::new(1, 2)), ChangeSource::User);
        assert_eq!(*count.borrow(), 1);
    }
}
