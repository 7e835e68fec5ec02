pub mod delta;
pub mod rope_widget;
pub mod types;
pub mod widget;

pub use delta::Delta;
pub use rope_widget::{RopeWidget, RopeWidgetFactory};
pub use types::{Bounds, ChangeSource, Range, WidgetEvent};
pub use widget::{
    EventSink, HookId, ModuleMap, SelectionChangeHook, TextChangeHook, TextWidget, WidgetConfig,
    WidgetFactory,
};
