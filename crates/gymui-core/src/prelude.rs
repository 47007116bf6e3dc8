pub use crate::button::Button;
pub use crate::container::{Container, ContainerKind};
pub use crate::controller::Controller;
pub use crate::dropdown::{Dropdown, Item};
pub use crate::error::{Error, Result, Tree};
pub use crate::geometry::{BoundingBox, Point};
pub use crate::render::{Role, Scene, SceneNode};
pub use crate::reward::{RewardElement, RewardInfo, RewardNode, RewardTemplate, TagPath};
pub use crate::state::{StateElement, StateInfo, StateNode};
pub use crate::toggle::{CheckBox, RadioButton, RadioGroup};
pub use crate::widget::{Action, Clickable, Ctx, Fallback, Membership, Widget, WidgetKey};
