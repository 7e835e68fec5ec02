use anyhow::{bail, Result};
use crossterm::event::{KeyEvent, KeyEventKind};

use plumecore::{ChangeSource, Delta, ModuleMap, Range, TextWidget, WidgetEvent, WidgetFactory};

use crate::driver::{WidgetDriver, WidgetHooks};
use crate::events::{EditorHandlers, WidgetSnapshot};
use crate::props::{EditorProps, PropWarning};
use crate::render::RenderNode;

/// What an update pass decided to do with the host's render tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// A dirty-set prop changed: the widget was torn down and recreated.
    Regenerate,
    /// A clean-set prop changed: the container re-renders, the widget is
    /// untouched.
    Render,
    /// Nothing observable changed: re-rendering is suppressed entirely.
    Skip,
}

struct MountedWidget {
    widget: Box<dyn TextWidget>,
    hooks: WidgetHooks,
}

/// Content and selection captured from the outgoing widget, restored
/// into its replacement after a regeneration.
struct CarriedState {
    contents: String,
    selection: Option<Range>,
}

/// Lifecycle adapter binding a wrapped text widget to a props-driven
/// host.
///
/// The component moves through `unmounted → mounted → (updated)* →
/// unmounted`; the `generation` counter partitions the mounted period
/// into epochs, and crossing an epoch boundary means the wrapped widget
/// was destroyed and recreated from scratch.
pub struct EditorComponent {
    props: EditorProps,
    handlers: EditorHandlers,
    driver: WidgetDriver,
    value: Option<String>,
    selection: Option<Range>,
    generation: u64,
    mounted: Option<MountedWidget>,
    carried: Option<CarriedState>,
    warnings: Vec<PropWarning>,
}

impl EditorComponent {
    pub fn new(
        props: EditorProps,
        handlers: EditorHandlers,
        factory: Box<dyn WidgetFactory>,
    ) -> Self {
        let warnings = props.validate();
        let value = props.initial_value();

        Self {
            handlers,
            driver: WidgetDriver::new(factory),
            value,
            selection: None,
            generation: 0,
            mounted: None,
            carried: None,
            warnings,
            props,
        }
    }

    /// Construct the wrapped widget and push initial state into it.
    pub fn mount(&mut self) -> Result<()> {
        if self.mounted.is_some() {
            bail!("widget is already mounted");
        }

        let config = self.props.widget_config();
        let (mut widget, hooks) = self.driver.create(&config);

        if let Some(carried) = self.carried.take() {
            self.driver.set_contents(widget.as_mut(), &carried.contents);
            self.driver.set_selection(widget.as_mut(), carried.selection);
            widget.focus();
        } else if let Some(value) = self.value.clone() {
            self.driver.set_contents(widget.as_mut(), &value);
        }

        self.mounted = Some(MountedWidget { widget, hooks });
        log::debug!("widget mounted (generation {})", self.generation);
        Ok(())
    }

    /// Detach the widget's hooks and abandon the instance. Harmless to
    /// call twice.
    pub fn unmount(&mut self) {
        if let Some(mounted) = self.mounted.take() {
            let MountedWidget { mut widget, hooks } = mounted;
            self.driver.unhook(widget.as_mut(), hooks);
            log::debug!("widget unmounted (generation {})", self.generation);
        }
    }

    /// Reconcile a new set of props against the mounted widget.
    pub fn update(&mut self, next: EditorProps) -> Result<UpdateOutcome> {
        self.warnings = next.validate();

        // A dirty-set change invalidates the widget wholesale; no
        // in-place reconciliation can save it.
        if self.mounted.is_some() && self.props.dirty_changed(&next) {
            return self.regenerate(next);
        }

        // The widget may not exist yet when updates arrive in quick
        // succession around a remount; reconcile only when present.
        if let Some(mounted) = self.mounted.as_mut() {
            if let Some(incoming) = next.value.as_deref() {
                if incoming != mounted.widget.contents() {
                    self.driver.set_contents(mounted.widget.as_mut(), incoming);
                }
            }

            if next.read_only != self.props.read_only {
                self.driver
                    .set_read_only(mounted.widget.as_mut(), next.read_only);
            }
        }

        let outcome = if self.props.clean_changed(&next) {
            UpdateOutcome::Render
        } else {
            UpdateOutcome::Skip
        };
        self.props = next;
        Ok(outcome)
    }

    /// Tear everything down and rebuild from scratch, carrying content
    /// and selection across the epoch boundary.
    fn regenerate(&mut self, next: EditorProps) -> Result<UpdateOutcome> {
        if let Some(mounted) = self.mounted.as_ref() {
            self.carried = Some(CarriedState {
                contents: mounted.widget.contents(),
                selection: mounted.widget.selection(),
            });
        }

        self.generation += 1;
        log::debug!("regenerating widget (generation {})", self.generation);

        self.unmount();
        self.props = next;
        self.mount()?;
        Ok(UpdateOutcome::Regenerate)
    }

    /// Drain widget-originated events and dispatch them on the host's
    /// execution queue. State updates apply for every event; user
    /// callbacks are skipped for `Silent` sources.
    pub fn pump_events(&mut self) {
        for event in self.driver.drain() {
            match event {
                WidgetEvent::TextChange {
                    value,
                    delta,
                    source,
                } => self.handle_text_change(value, delta, source),
                WidgetEvent::SelectionChange { range, source } => {
                    self.handle_selection_change(range, source)
                }
            }
        }
    }

    fn handle_text_change(&mut self, value: String, delta: Delta, source: ChangeSource) {
        if self.value.as_deref() == Some(value.as_str()) {
            return;
        }
        self.value = Some(value.clone());

        if source == ChangeSource::Silent {
            return;
        }
        let snapshot = match self.mounted.as_ref() {
            Some(mounted) => WidgetSnapshot::capture(mounted.widget.as_ref()),
            None => return,
        };
        if let Some(on_change) = self.handlers.on_change.as_mut() {
            on_change(&value, &delta, source, &snapshot);
        }
    }

    fn handle_selection_change(&mut self, range: Option<Range>, source: ChangeSource) {
        if range == self.selection {
            return;
        }
        self.selection = range;

        if source == ChangeSource::Silent {
            return;
        }
        let snapshot = match self.mounted.as_ref() {
            Some(mounted) => WidgetSnapshot::capture(mounted.widget.as_ref()),
            None => return,
        };
        if let Some(on_change_selection) = self.handlers.on_change_selection.as_mut() {
            on_change_selection(range, source, &snapshot);
        }
    }

    /// Forward a key event to the registered key callbacks. The binding
    /// never translates keys into edits; that belongs to the widget.
    pub fn handle_key(&mut self, key: &KeyEvent) {
        match key.kind {
            KeyEventKind::Press | KeyEventKind::Repeat => {
                if let Some(on_key_down) = self.handlers.on_key_down.as_mut() {
                    on_key_down(key);
                }
                if let Some(on_key_press) = self.handlers.on_key_press.as_mut() {
                    on_key_press(key);
                }
            }
            KeyEventKind::Release => {
                if let Some(on_key_up) = self.handlers.on_key_up.as_mut() {
                    on_key_up(key);
                }
            }
        }
    }

    /// View description for the host, keyed by the current generation.
    pub fn render(&self) -> RenderNode {
        RenderNode::container(&self.props, self.generation)
    }

    pub fn focus(&mut self) {
        if let Some(mounted) = self.mounted.as_mut() {
            mounted.widget.focus();
        }
    }

    pub fn blur(&mut self) {
        if let Some(mounted) = self.mounted.as_mut() {
            self.driver.set_selection(mounted.widget.as_mut(), None);
        }
    }

    /// Replace the registered callbacks. Handler identity never feeds
    /// the dirty/clean comparison.
    pub fn set_handlers(&mut self, handlers: EditorHandlers) {
        self.handlers = handlers;
    }

    /// Unsupported: the wrapped widget cannot change its module set in
    /// place. Fails loudly by design of the widget boundary.
    pub fn set_widget_modules(&mut self, modules: &ModuleMap) -> Result<()> {
        match self.mounted.as_mut() {
            Some(mounted) => self.driver.reconfigure(mounted.widget.as_mut(), modules),
            None => bail!("widget is not mounted"),
        }
    }

    pub fn props(&self) -> &EditorProps {
        &self.props
    }

    pub fn warnings(&self) -> &[PropWarning] {
        &self.warnings
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.is_some()
    }

    /// Value as tracked by the binding.
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    pub fn selection(&self) -> Option<Range> {
        self.selection
    }

    /// Read the widget's value directly. `None` until the widget has
    /// been constructed; the presence check is the guard, not an error.
    pub fn widget_value(&self) -> Option<String> {
        self.mounted.as_ref().map(|m| m.widget.contents())
    }

    pub fn widget(&self) -> Option<&dyn TextWidget> {
        self.mounted.as_ref().map(|m| m.widget.as_ref())
    }

    pub fn widget_mut(&mut self) -> Option<&mut (dyn TextWidget + 'static)> {
        self.mounted.as_mut().map(|m| m.widget.as_mut())
    }
}
