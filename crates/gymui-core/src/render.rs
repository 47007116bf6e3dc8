use crate::BoundingBox;

/// High-level role of a drawn element, similar to ARIA roles.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Role {
    Button,
    Checkbox,
    RadioButton,
    Dropdown,
    DropdownItem,
    Page,
    Popup,
}

/// Display list produced by `Controller::render`. Pixel output is left to
/// whoever consumes the scene.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Scene {
    pub nodes: Vec<SceneNode>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum SceneNode {
    Rect {
        rect: BoundingBox,
        role: Role,
        /// Checked, selected, or open.
        active: bool,
    },
    Text {
        rect: BoundingBox,
        text: String,
    },
}

impl Scene {
    pub fn rect(&mut self, rect: BoundingBox, role: Role, active: bool) {
        self.nodes.push(SceneNode::Rect { rect, role, active });
    }

    pub fn text(&mut self, rect: BoundingBox, text: impl Into<String>) {
        let text = text.into();
        if !text.is_empty() {
            self.nodes.push(SceneNode::Text { rect, text });
        }
    }

    /// Rect nodes with the given role, in draw order.
    pub fn rects_with_role(&self, role: Role) -> impl Iterator<Item = (&BoundingBox, bool)> {
        self.nodes.iter().filter_map(move |n| match n {
            SceneNode::Rect { rect, role: r, active } if *r == role => Some((rect, *active)),
            _ => None,
        })
    }
}
