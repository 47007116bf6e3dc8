//! # Pages and popups
//!
//! A `Container` owns an ordered list of child widgets and routes clicks to
//! them:
//!
//! 1. A child that reports `is_blocking` (an open popup or dropdown, or a
//!    container holding one) gets the click no matter where it landed.
//! 2. Otherwise the first visible child, in declaration order, whose box
//!    contains the point gets it.
//! 3. Otherwise `Fallback::Nearest` may pick the closest visible child.
//! 4. Otherwise nothing happens.
//!
//! Children answer with an `Action`; the container applies what it can
//! (registering rewards, opening popups, switching pages) and passes the rest
//! up.
//!
//! ## Diverging trees
//!
//! Routing always follows ownership, but the state and reward walks need not.
//! A child added with `push_linked` is walked in one tree as a trailing child
//! of a sibling instead of this container, so a page can account for a popup's
//! reward bits while the popup's state cell stays at the outer level:
//!
//! ```text
//! state:  Root -> [Popup, Page]        reward: Root -> [Page -> [Popup]]
//! ```

use rand::RngCore;
use smallvec::SmallVec;

use crate::error::{Error, Result};
use crate::reward::{RewardElement, RewardNode, RewardTemplate, total_reward_len};
use crate::state::{StateElement, StateNode, total_state_len};
use crate::widget::{Action, Clickable, Ctx, Membership, Widget, WidgetKey, pick};
use crate::{BoundingBox, Point, Role, Scene, Tree};

const OPEN: usize = 0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContainerKind {
    /// Shown or hidden by `Action::Show`; never captures clicks.
    Page,
    /// Opened by `Action::Open`; captures every click while open.
    Popup,
}

struct Child {
    widget: Box<dyn Widget>,
    membership: Membership,
    state_host: Option<usize>,
    reward_host: Option<usize>,
}

impl Child {
    fn host(&self, tree: Tree) -> Option<usize> {
        match tree {
            Tree::State => self.state_host,
            Tree::Reward => self.reward_host,
        }
    }
}

fn member_flag(tree: Tree) -> Membership {
    match tree {
        Tree::State => Membership::STATE,
        Tree::Reward => Membership::REWARD,
    }
}

pub struct Container {
    kind: ContainerKind,
    title: String,
    bbox: BoundingBox,
    initially_open: bool,
    children: Vec<Child>,
    state: StateNode,
    reward: RewardNode,
}

impl Container {
    /// A page scoring exactly what `template` declares. Shown after reset.
    pub fn page(title: impl Into<String>, bbox: BoundingBox, template: RewardTemplate) -> Result<Self> {
        Ok(Self {
            kind: ContainerKind::Page,
            title: title.into(),
            bbox,
            initially_open: true,
            children: Vec::new(),
            state: StateNode::new("Page", 1),
            reward: RewardNode::new("Page", &template)?,
        })
    }

    /// A popup scoring `["window", "opened" | "closed"]` on top of `template`.
    /// Closed after reset.
    pub fn popup(title: impl Into<String>, bbox: BoundingBox, template: RewardTemplate) -> Result<Self> {
        let template =
            RewardTemplate::map([("window", RewardTemplate::tags(["opened", "closed"]))]).extend(template);
        Ok(Self {
            kind: ContainerKind::Popup,
            title: title.into(),
            bbox,
            initially_open: false,
            children: Vec::new(),
            state: StateNode::new("Popup", 1),
            reward: RewardNode::new("Popup", &template)?,
        })
    }

    pub fn initially_open(mut self, open: bool) -> Self {
        self.initially_open = open;
        self
    }

    pub fn kind(&self) -> ContainerKind {
        self.kind
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Adds a child attached to both trees.
    pub fn push(&mut self, widget: impl Widget + 'static) -> WidgetKey {
        self.push_with(widget, Membership::all())
    }

    pub fn push_with(&mut self, widget: impl Widget + 'static, membership: Membership) -> WidgetKey {
        self.children.push(Child {
            widget: Box::new(widget),
            membership,
            state_host: None,
            reward_host: None,
        });
        WidgetKey(self.children.len() - 1)
    }

    /// Adds a child that this container routes clicks to, but whose slots in
    /// `tree` are walked right after the subtree of sibling `host`, as if it
    /// were `host`'s last child there. In the other tree it is a plain child.
    pub fn push_linked(&mut self, widget: impl Widget + 'static, tree: Tree, host: WidgetKey) -> WidgetKey {
        let key = self.push(widget);
        let child = &mut self.children[key.0];
        match tree {
            Tree::State => child.state_host = Some(host.0),
            Tree::Reward => child.reward_host = Some(host.0),
        }
        key
    }

    /// Builder form of `push`.
    pub fn with(mut self, widget: impl Widget + 'static) -> Self {
        self.push(widget);
        self
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn child(&self, key: WidgetKey) -> Option<&dyn Widget> {
        self.children.get(key.0).map(|c| &*c.widget)
    }

    pub fn is_open(&self, state: &[i8]) -> bool {
        self.state.get(state, OPEN) != 0
    }

    /// Child indices in the order `tree` visits them: declaration order,
    /// with linked children right after their host.
    fn tree_order(&self, tree: Tree) -> SmallVec<[usize; 8]> {
        let flag = member_flag(tree);
        let mut order = SmallVec::new();
        for (i, c) in self.children.iter().enumerate() {
            if !c.membership.contains(flag) || c.host(tree).is_some() {
                continue;
            }
            order.push(i);
            order.extend(
                self.children
                    .iter()
                    .enumerate()
                    .filter(|(_, l)| l.membership.contains(flag) && l.host(tree) == Some(i))
                    .map(|(j, _)| j),
            );
        }
        order
    }

    fn check_links(&self) -> Result<()> {
        let node = self.state.class_name();
        for (i, c) in self.children.iter().enumerate() {
            for tree in [Tree::State, Tree::Reward] {
                let Some(h) = c.host(tree) else {
                    continue;
                };
                let flag = member_flag(tree);
                let ok = h != i
                    && c.membership.contains(flag)
                    && self
                        .children
                        .get(h)
                        .is_some_and(|host| host.membership.contains(flag) && host.host(tree).is_none());
                if !ok {
                    return Err(Error::UnknownWidget { node, key: h });
                }
            }
        }
        Ok(())
    }

    fn route(&self, p: Point, ctx: &Ctx<'_>) -> Option<usize> {
        let state: &[i8] = &*ctx.state;
        if let Some(i) = self.children.iter().position(|c| c.widget.is_blocking(state)) {
            return Some(i);
        }
        let visible = self
            .children
            .iter()
            .enumerate()
            .filter(|(_, c)| c.widget.is_visible(state))
            .map(|(i, c)| (i, c.widget.bounding_box(state)));
        pick(p, ctx.fallback, visible)
    }

    fn apply(&mut self, action: Action, ctx: &mut Ctx<'_>) -> Action {
        match action {
            Action::None => Action::None,
            Action::Register(path) => {
                self.reward.register(ctx.reward, &path);
                Action::None
            }
            Action::Open(key) => {
                if let Some(c) = self.children.get_mut(key.0) {
                    c.widget.set_open(ctx, true);
                }
                Action::None
            }
            Action::Show(key) => {
                for (i, c) in self.children.iter_mut().enumerate() {
                    if c.widget.is_page() {
                        c.widget.set_open(ctx, i == key.0);
                    }
                }
                Action::None
            }
            Action::Close if self.kind == ContainerKind::Popup => {
                self.set_open(ctx, false);
                Action::None
            }
            Action::Sequence(actions) => {
                let passed: Vec<Action> = actions.into_iter().map(|a| self.apply(a, ctx)).collect();
                Action::sequence(passed)
            }
            other => other,
        }
    }

    fn check_action(&self, action: &Action) -> Result<()> {
        let node = self.state.class_name();
        let mut res = Ok(());
        action.for_each(&mut |a| {
            if res.is_err() {
                return;
            }
            res = match a {
                Action::Register(path) => self.reward.check_path(path).map(|_| ()),
                Action::Open(key) => match self.children.get(key.0) {
                    Some(c) if c.widget.is_modal() => Ok(()),
                    _ => Err(Error::UnknownWidget { node, key: key.0 }),
                },
                Action::Show(key) => match self.children.get(key.0) {
                    Some(c) if c.widget.is_page() => Ok(()),
                    _ => Err(Error::UnknownWidget { node, key: key.0 }),
                },
                _ => Ok(()),
            };
        });
        res
    }
}

impl StateElement for Container {
    fn state_node(&self) -> &StateNode {
        &self.state
    }

    fn state_node_mut(&mut self) -> &mut StateNode {
        &mut self.state
    }

    fn for_each_state_child(&self, f: &mut dyn FnMut(&dyn StateElement)) {
        for i in self.tree_order(Tree::State) {
            f(&*self.children[i].widget);
        }
    }

    fn for_each_state_child_mut(&mut self, f: &mut dyn FnMut(&mut dyn StateElement)) {
        for i in self.tree_order(Tree::State) {
            f(&mut *self.children[i].widget);
        }
    }
}

impl RewardElement for Container {
    fn reward_node(&self) -> &RewardNode {
        &self.reward
    }

    fn reward_node_mut(&mut self) -> &mut RewardNode {
        &mut self.reward
    }

    fn for_each_reward_child(&self, f: &mut dyn FnMut(&dyn RewardElement)) {
        for i in self.tree_order(Tree::Reward) {
            f(&*self.children[i].widget);
        }
    }

    fn for_each_reward_child_mut(&mut self, f: &mut dyn FnMut(&mut dyn RewardElement)) {
        for i in self.tree_order(Tree::Reward) {
            f(&mut *self.children[i].widget);
        }
    }
}

impl Clickable for Container {
    fn bounding_box(&self, _state: &[i8]) -> BoundingBox {
        self.bbox
    }

    fn is_visible(&self, state: &[i8]) -> bool {
        self.is_open(state)
    }

    /// An open popup, or an open container holding an open modal anywhere
    /// below it.
    fn is_blocking(&self, state: &[i8]) -> bool {
        self.is_open(state)
            && (self.kind == ContainerKind::Popup
                || self.children.iter().any(|c| c.widget.is_blocking(state)))
    }

    fn is_modal(&self) -> bool {
        self.kind == ContainerKind::Popup
    }

    fn is_page(&self) -> bool {
        self.kind == ContainerKind::Page
    }

    fn set_open(&mut self, ctx: &mut Ctx<'_>, open: bool) {
        if self.is_open(ctx.state) == open {
            return;
        }
        if !open {
            for c in &mut self.children {
                c.widget.dismiss(ctx);
            }
        }
        self.state.set(ctx.state, OPEN, open as i8);
        if self.kind == ContainerKind::Popup {
            let tag = if open { "opened" } else { "closed" };
            self.reward.register(ctx.reward, &["window", tag]);
        }
    }

    fn dismiss(&mut self, ctx: &mut Ctx<'_>) {
        match self.kind {
            ContainerKind::Popup => self.set_open(ctx, false),
            ContainerKind::Page => {
                for c in &mut self.children {
                    c.widget.dismiss(ctx);
                }
            }
        }
    }

    fn handle_click(&mut self, p: Point, ctx: &mut Ctx<'_>) -> Action {
        let Some(i) = self.route(p, ctx) else {
            log::debug!("{} '{}': click at {p:?} hit nothing", self.state.class_name(), self.title);
            return Action::None;
        };
        let action = self.children[i].widget.handle_click(p, ctx);
        self.apply(action, ctx)
    }

    fn reset(&mut self, ctx: &mut Ctx<'_>, rng: &mut dyn RngCore) {
        self.state.set(ctx.state, OPEN, self.initially_open as i8);
        for c in &mut self.children {
            c.widget.reset(ctx, rng);
        }
    }

    fn render(&self, state: &[i8], scene: &mut Scene) {
        if !self.is_open(state) {
            return;
        }
        let role = match self.kind {
            ContainerKind::Page => Role::Page,
            ContainerKind::Popup => Role::Popup,
        };
        scene.rect(self.bbox, role, true);
        scene.text(self.bbox, &self.title);
        // blocking children last so they end up on top
        let (blocking, rest): (Vec<&Child>, Vec<&Child>) =
            self.children.iter().partition(|c| c.widget.is_blocking(state));
        for c in rest.into_iter().chain(blocking) {
            c.widget.render(state, scene);
        }
    }

    fn validate(&self) -> Result<()> {
        let node = self.state.class_name();
        self.check_links()?;
        for c in &self.children {
            for a in c.widget.actions() {
                self.check_action(a)?;
            }
            if !c.membership.contains(Membership::STATE) {
                let len = total_state_len(&*c.widget);
                if len != 0 {
                    return Err(Error::DetachedSlot {
                        node,
                        tree: Tree::State,
                        len,
                    });
                }
            }
            if !c.membership.contains(Membership::REWARD) {
                let len = total_reward_len(&*c.widget);
                if len != 0 {
                    return Err(Error::DetachedSlot {
                        node,
                        tree: Tree::Reward,
                        len,
                    });
                }
            }
            c.widget.validate()?;
        }
        Ok(())
    }
}
