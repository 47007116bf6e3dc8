use crate::reward::RewardNode;
use crate::state::StateNode;
use crate::widget::{Action, Clickable, Ctx, leaf_nodes};
use crate::{BoundingBox, Point, Role, Scene};

/// Stateless push button; hands its action to the enclosing container.
pub struct Button {
    label: String,
    bbox: BoundingBox,
    on_click: Action,
    state: StateNode,
    reward: RewardNode,
}

impl Button {
    pub fn new(label: impl Into<String>, bbox: BoundingBox, on_click: Action) -> Self {
        Self {
            label: label.into(),
            bbox,
            on_click,
            state: StateNode::new("Button", 0),
            reward: RewardNode::empty("Button"),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

leaf_nodes!(Button);

impl Clickable for Button {
    fn bounding_box(&self, _state: &[i8]) -> BoundingBox {
        self.bbox
    }

    fn handle_click(&mut self, _p: Point, _ctx: &mut Ctx<'_>) -> Action {
        log::debug!("button '{}' clicked", self.label);
        self.on_click.clone()
    }

    fn render(&self, _state: &[i8], scene: &mut Scene) {
        scene.rect(self.bbox, Role::Button, false);
        scene.text(self.bbox, &self.label);
    }

    fn actions(&self) -> &[Action] {
        std::slice::from_ref(&self.on_click)
    }
}
