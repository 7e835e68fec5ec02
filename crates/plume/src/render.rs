use crate::props::{EditingArea, EditorProps};

/// Container node the host renders around the widget.
///
/// Plain data: the binding describes what should be on screen and the
/// host (terminal, web view, anything) decides how to draw it. `key`
/// carries the generation so hosts that reconcile by key replace the
/// subtree whenever the widget is regenerated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderNode {
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub style: Option<String>,
    pub key: u64,
    pub area: AreaNode,
}

/// The single editing-area child inside the container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AreaNode {
    pub tag: String,
    pub key: u64,
}

impl RenderNode {
    pub fn container(props: &EditorProps, generation: u64) -> Self {
        let mut classes = vec![String::from("plume")];
        if let Some(class_name) = &props.class_name {
            classes.push(class_name.clone());
        }

        let area: EditingArea = props.editing_area.clone().unwrap_or_default();

        Self {
            id: props.id.clone(),
            classes,
            style: props.style.clone(),
            key: generation,
            area: AreaNode {
                tag: area.tag,
                key: generation,
            },
        }
    }

    /// Space-joined class list, for hosts that want a single attribute.
    pub fn class_attr(&self) -> String {
        self.classes.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_container_carries_identity_props() {
        let props = EditorProps {
            id: Some("notes".to_string()),
            class_name: Some("wide".to_string()),
            style: Some("border: none".to_string()),
            ..EditorProps::default()
        };

        let node = RenderNode::container(&props, 3);
        assert_eq!(node.id.as_deref(), Some("notes"));
        assert_eq!(node.class_attr(), "plume wide");
        assert_eq!(node.style.as_deref(), Some("border: none"));
        assert_eq!(node.key, 3);
        assert_eq!(node.area.key, 3);
    }

    #[test]
    fn test_default_editing_area_is_a_block() {
        let node = RenderNode::container(&EditorProps::default(), 0);
        assert_eq!(node.area.tag, "block");
    }

    #[test]
    fn test_custom_editing_area_is_cloned_into_the_tree() {
        let props = EditorProps {
            editing_area: Some(EditingArea::new("panel")),
            ..EditorProps::default()
        };
        let node = RenderNode::container(&props, 0);
        assert_eq!(node.area.tag, "panel");
    }
}
