use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use plumecore::{Bounds, ModuleMap, WidgetConfig};

/// Configuration accepted by the binding at construction and update time.
///
/// Fields are split into two comparison sets. Changing a "dirty" field
/// (`modules`, `formats`, `bounds`, `theme`, `editing_area`) forces the
/// wrapped widget to be torn down and recreated; changing a "clean" field
/// (`id`, `class_name`, `style`, `placeholder`) only re-renders the
/// container. `value` and `read_only` belong to neither set and are
/// reconciled against the live widget in place.
///
/// The removed legacy options (`toolbar`, `formats`, `styles`,
/// `poll_interval`) remain in the shape so that [`EditorProps::validate`]
/// can diagnose them with guidance instead of silently dropping them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorProps {
    pub id: Option<String>,
    pub class_name: Option<String>,
    pub style: Option<String>,
    pub theme: String,
    pub read_only: bool,
    /// Controlled value; when present, the binding overrides widget
    /// content whenever the two diverge.
    pub value: Option<String>,
    /// Uncontrolled initial value; pushed once at mount.
    pub default_value: Option<String>,
    pub placeholder: Option<String>,
    pub bounds: Option<Bounds>,
    pub modules: ModuleMap,
    pub editing_area: Option<EditingArea>,

    // Removed options, recognized only so misuse can be diagnosed.
    pub toolbar: Option<Value>,
    pub formats: Option<Vec<String>>,
    pub styles: Option<BTreeMap<String, Value>>,
    pub poll_interval: Option<u64>,
}

impl Default for EditorProps {
    fn default() -> Self {
        Self {
            id: None,
            class_name: None,
            style: None,
            theme: String::from("classic"),
            read_only: false,
            value: None,
            default_value: None,
            placeholder: None,
            bounds: None,
            modules: ModuleMap::new(),
            editing_area: None,
            toolbar: None,
            formats: None,
            styles: None,
            poll_interval: None,
        }
    }
}

/// Descriptor of the single host element the widget mounts into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditingArea {
    pub tag: String,
}

impl EditingArea {
    pub fn new(tag: impl Into<String>) -> Self {
        Self { tag: tag.into() }
    }
}

impl Default for EditingArea {
    fn default() -> Self {
        Self {
            tag: String::from("block"),
        }
    }
}

/// A diagnosed configuration problem. Warnings are advisory; the props
/// are still accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropWarning {
    pub field: &'static str,
    pub message: String,
}

impl fmt::Display for PropWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "`{}`: {}", self.field, self.message)
    }
}

impl EditorProps {
    /// The binding operates in controlled mode when an explicit value is
    /// supplied.
    pub fn is_controlled(&self) -> bool {
        self.value.is_some()
    }

    /// Value tracked before the widget exists: the controlled value when
    /// present, else the uncontrolled initial value.
    pub fn initial_value(&self) -> Option<String> {
        self.value.clone().or_else(|| self.default_value.clone())
    }

    /// Construction-time widget configuration derived from these props.
    pub fn widget_config(&self) -> WidgetConfig {
        WidgetConfig {
            theme: self.theme.clone(),
            modules: self.modules.clone(),
            placeholder: self.placeholder.clone(),
            read_only: self.read_only,
            bounds: self.bounds.clone(),
        }
    }

    /// True when any field requiring widget recreation differs.
    pub fn dirty_changed(&self, next: &Self) -> bool {
        self.modules != next.modules
            || self.formats != next.formats
            || self.bounds != next.bounds
            || self.theme != next.theme
            || self.editing_area != next.editing_area
    }

    /// True when any field requiring only a container re-render differs.
    pub fn clean_changed(&self, next: &Self) -> bool {
        self.id != next.id
            || self.class_name != next.class_name
            || self.style != next.style
            || self.placeholder != next.placeholder
    }

    /// Validation pass over the whole shape. Problems are logged at this
    /// boundary and returned as a list; they are never failures.
    pub fn validate(&self) -> Vec<PropWarning> {
        let mut warnings = Vec::new();

        if self.toolbar.is_some() {
            warnings.push(PropWarning {
                field: "toolbar",
                message: String::from(
                    "the toolbar option has been removed; configure a toolbar through `modules` instead",
                ),
            });
        }

        if self.formats.is_some() {
            warnings.push(PropWarning {
                field: "formats",
                message: String::from(
                    "custom format lists are no longer supported; format support is owned by the widget",
                ),
            });
        }

        if self.styles.is_some() {
            warnings.push(PropWarning {
                field: "styles",
                message: String::from(
                    "the per-element styling map has been removed; use host stylesheets instead",
                ),
            });
        }

        if self.poll_interval.is_some() {
            warnings.push(PropWarning {
                field: "poll_interval",
                message: String::from(
                    "polling no longer has any effect and the option can be removed",
                ),
            });
        }

        if let Some(Value::Array(items)) = self.modules.get("toolbar") {
            let has_item_definitions = items
                .first()
                .and_then(|item| item.as_object())
                .is_some_and(|item| item.contains_key("type"));
            if has_item_definitions {
                warnings.push(PropWarning {
                    field: "modules.toolbar",
                    message: String::from(
                        "the binding no longer builds toolbars from item definitions; \
                         pass a prebuilt toolbar container or let the widget create one",
                    ),
                });
            }
        }

        if let Some(area) = &self.editing_area {
            if area.tag == "textarea" {
                warnings.push(PropWarning {
                    field: "editing_area",
                    message: String::from(
                        "the editing area cannot be a textarea; use a block container",
                    ),
                });
            }
        }

        for warning in &warnings {
            log::warn!("invalid editor props: {}", warning);
        }

        warnings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_props() {
        let props = EditorProps::default();
        assert_eq!(props.theme, "classic");
        assert!(!props.read_only);
        assert!(!props.is_controlled());
        assert_eq!(props.initial_value(), None);
        assert!(props.modules.is_empty());
    }

    #[test]
    fn test_controlled_mode_detection() {
        let controlled = EditorProps {
            value: Some("text".to_string()),
            ..EditorProps::default()
        };
        assert!(controlled.is_controlled());
        assert_eq!(controlled.initial_value(), Some("text".to_string()));

        let uncontrolled = EditorProps {
            default_value: Some("seed".to_string()),
            ..EditorProps::default()
        };
        assert!(!uncontrolled.is_controlled());
        assert_eq!(uncontrolled.initial_value(), Some("seed".to_string()));
    }

    #[test]
    fn test_widget_config_derivation() {
        let props = EditorProps {
            theme: "bubble".to_string(),
            read_only: true,
            placeholder: Some("...".to_string()),
            bounds: Some(Bounds::Selector("#frame".to_string())),
            ..EditorProps::default()
        };

        let config = props.widget_config();
        assert_eq!(config.theme, "bubble");
        assert!(config.read_only);
        assert_eq!(config.placeholder.as_deref(), Some("..."));
        assert_eq!(config.bounds, Some(Bounds::Selector("#frame".to_string())));
    }

    #[test]
    fn test_dirty_and_clean_partitions_are_disjoint() {
        let base = EditorProps::default();

        let themed = EditorProps {
            theme: "bubble".to_string(),
            ..base.clone()
        };
        assert!(base.dirty_changed(&themed));
        assert!(!base.clean_changed(&themed));

        let relabeled = EditorProps {
            id: Some("editor-1".to_string()),
            placeholder: Some("type here".to_string()),
            ..base.clone()
        };
        assert!(!base.dirty_changed(&relabeled));
        assert!(base.clean_changed(&relabeled));

        // Value and read-only belong to neither set
        let reconciled = EditorProps {
            value: Some("new".to_string()),
            read_only: true,
            ..base.clone()
        };
        assert!(!base.dirty_changed(&reconciled));
        assert!(!base.clean_changed(&reconciled));
    }

    #[test]
    fn test_module_change_is_dirty() {
        let base = EditorProps::default();
        let mut modules = ModuleMap::new();
        modules.insert("history".to_string(), serde_json::json!(true));
        let next = EditorProps {
            modules,
            ..base.clone()
        };
        assert!(base.dirty_changed(&next));
    }

    #[test]
    fn test_valid_props_produce_no_warnings() {
        let props = EditorProps {
            id: Some("editor".to_string()),
            value: Some("text".to_string()),
            placeholder: Some("...".to_string()),
            editing_area: Some(EditingArea::default()),
            ..EditorProps::default()
        };
        assert!(props.validate().is_empty());
    }

    #[test]
    fn test_legacy_options_are_diagnosed() {
        let props = EditorProps {
            toolbar: Some(serde_json::json!(["bold", "italic"])),
            formats: Some(vec!["bold".to_string()]),
            styles: Some(BTreeMap::new()),
            poll_interval: Some(500),
            ..EditorProps::default()
        };

        let warnings = props.validate();
        let fields: Vec<&str> = warnings.iter().map(|w| w.field).collect();
        assert_eq!(
            fields,
            vec!["toolbar", "formats", "styles", "poll_interval"]
        );
    }

    #[test]
    fn test_toolbar_item_definitions_in_modules_are_diagnosed() {
        let mut modules = ModuleMap::new();
        modules.insert(
            "toolbar".to_string(),
            serde_json::json!([{ "type": "group", "label": "Formats" }]),
        );
        let props = EditorProps {
            modules,
            ..EditorProps::default()
        };

        let warnings = props.validate();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].field, "modules.toolbar");

        // A plain toolbar reference is fine
        let mut modules = ModuleMap::new();
        modules.insert("toolbar".to_string(), serde_json::json!("#toolbar"));
        let props = EditorProps {
            modules,
            ..EditorProps::default()
        };
        assert!(props.validate().is_empty());
    }

    #[test]
    fn test_textarea_editing_area_is_diagnosed() {
        let props = EditorProps {
            editing_area: Some(EditingArea::new("textarea")),
            ..EditorProps::default()
        };

        let warnings = props.validate();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].field, "editing_area");
    }

    #[test]
    fn test_warning_guidance_text() {
        let props = EditorProps {
            poll_interval: Some(100),
            ..EditorProps::default()
        };
        let warnings = props.validate();
        insta::assert_snapshot!(
            warnings[0].to_string(),
            @"`poll_interval`: polling no longer has any effect and the option can be removed"
        );
    }

    #[test]
    fn test_props_deserialize_with_partial_shape() {
        let props: EditorProps =
            serde_json::from_str(r#"{ "theme": "bubble", "read_only": true }"#).unwrap();
        assert_eq!(props.theme, "bubble");
        assert!(props.read_only);
        assert_eq!(props.value, None);
    }
}
