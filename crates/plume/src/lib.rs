// Plume library exports

pub mod component;
pub mod config;
pub mod driver;
pub mod events;
pub mod props;
pub mod render;
pub mod ui;

pub use component::{EditorComponent, UpdateOutcome};
pub use config::DemoConfig;
pub use driver::{WidgetDriver, WidgetHooks};
pub use events::{EditorHandlers, WidgetSnapshot};
pub use props::{EditingArea, EditorProps, PropWarning};
pub use render::{AreaNode, RenderNode};
