use std::cell::RefCell;
use std::rc::Rc;

use anyhow::{bail, Result};

use plumecore::{
    ChangeSource, EventSink, HookId, ModuleMap, Range, TextWidget, WidgetConfig, WidgetEvent,
    WidgetFactory,
};

/// Hook ids held for a mounted widget, consumed on teardown.
#[derive(Debug)]
pub struct WidgetHooks {
    text: HookId,
    selection: HookId,
}

/// Capability object carrying the shared widget construction and
/// mutation logic.
///
/// The driver owns the factory that produces widget instances and the
/// event sink their hooks feed. The binding holds one driver per
/// component and routes every widget mutation through it, so the rules
/// for hooking, selection preservation, and clamping live in one place.
pub struct WidgetDriver {
    factory: Box<dyn WidgetFactory>,
    sink: EventSink,
}

impl WidgetDriver {
    pub fn new(factory: Box<dyn WidgetFactory>) -> Self {
        Self {
            factory,
            sink: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// Create a widget from `config` with both change hooks attached.
    pub fn create(&self, config: &WidgetConfig) -> (Box<dyn TextWidget>, WidgetHooks) {
        let mut widget = self.factory.create(config);

        let text_sink = self.sink.clone();
        let text = widget.attach_text_change(Box::new(move |value, delta, source| {
            text_sink.borrow_mut().push(WidgetEvent::TextChange {
                value: value.to_string(),
                delta: delta.clone(),
                source,
            });
        }));

        let selection_sink = self.sink.clone();
        let selection = widget.attach_selection_change(Box::new(move |range, source| {
            selection_sink
                .borrow_mut()
                .push(WidgetEvent::SelectionChange { range, source });
        }));

        (widget, WidgetHooks { text, selection })
    }

    /// Detach the hooks attached by [`WidgetDriver::create`]. The widget
    /// instance itself is abandoned; no destroy primitive is assumed.
    pub fn unhook(&self, widget: &mut dyn TextWidget, hooks: WidgetHooks) {
        widget.detach(hooks.text);
        widget.detach(hooks.selection);
    }

    /// Replace the widget's contents, keeping the previous selection
    /// hanging around (clamped) so the cursor does not jump.
    pub fn set_contents(&self, widget: &mut dyn TextWidget, value: &str) {
        let previous = widget.selection();
        widget.set_contents(value, ChangeSource::Api);
        if previous.is_some() {
            self.set_selection(widget, previous);
        }
    }

    /// Apply a selection, clamped into the current document.
    pub fn set_selection(&self, widget: &mut dyn TextWidget, range: Option<Range>) {
        let clamped = range.map(|r| r.clamp_to(widget.length()));
        widget.set_selection(clamped, ChangeSource::Silent);
    }

    pub fn set_read_only(&self, widget: &mut dyn TextWidget, read_only: bool) {
        widget.set_enabled(!read_only);
    }

    /// Reconfiguring a live widget's module set is not supported by the
    /// wrapped widget; callers must change the `modules` prop and let the
    /// binding regenerate instead.
    pub fn reconfigure(&self, _widget: &mut dyn TextWidget, _modules: &ModuleMap) -> Result<()> {
        bail!(
            "the module set of a live widget cannot be changed; \
             update the `modules` prop and let the binding regenerate the widget"
        )
    }

    /// Drain widget-originated events queued since the last call.
    pub fn drain(&self) -> Vec<WidgetEvent> {
        self.sink.borrow_mut().drain(..).collect()
    }
}
