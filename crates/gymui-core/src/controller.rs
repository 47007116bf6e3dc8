use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::error::Result;
use crate::reward::{RewardInfo, allocate_reward, newly_set, reward_info};
use crate::state::{StateInfo, allocate_state, states_info};
use crate::widget::{Action, Ctx, Fallback, Widget};
use crate::{Point, Scene};

/// Owns the component tree and both shared buffers. The only thing the
/// training side talks to.
pub struct Controller {
    root: Box<dyn Widget>,
    state: Vec<i8>,
    reward: Vec<u8>,
    before: Vec<u8>,
    fallback: Fallback,
    states_info: Vec<StateInfo>,
    events: Vec<String>,
}

impl Controller {
    /// Lays out both buffers, validates the tree and resets it once with a
    /// ChaCha8 generator seeded with 0.
    pub fn new(mut root: Box<dyn Widget>) -> Result<Self> {
        let state = allocate_state(&mut *root)?;
        let reward = allocate_reward(&mut *root)?;
        root.validate()?;
        let states_info = states_info(&*root);
        log::info!(
            "controller ready: {} state cells, {} reward bits",
            state.len(),
            reward.len()
        );

        let mut c = Self {
            before: vec![0; reward.len()],
            root,
            state,
            reward,
            fallback: Fallback::None,
            states_info,
            events: Vec::new(),
        };
        c.reset(&mut ChaCha8Rng::seed_from_u64(0));
        Ok(c)
    }

    pub fn build(factory: impl FnOnce() -> Result<Box<dyn Widget>>) -> Result<Self> {
        Self::new(factory()?)
    }

    pub fn with_fallback(mut self, fallback: Fallback) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn set_fallback(&mut self, fallback: Fallback) {
        self.fallback = fallback;
    }

    /// Zeroes both buffers and lets every widget write its initial state.
    /// Slots stay where they are.
    pub fn reset(&mut self, rng: &mut dyn RngCore) {
        self.state.fill(0);
        self.reward.fill(0);
        self.events.clear();
        let mut ctx = Ctx {
            state: &mut self.state,
            reward: &mut self.reward,
            fallback: self.fallback,
        };
        self.root.reset(&mut ctx, rng);
        // initial state writes are not coverage
        self.reward.fill(0);
    }

    /// Routes one click and returns how many reward bits it newly set.
    pub fn handle_click(&mut self, p: Point) -> usize {
        self.before.copy_from_slice(&self.reward);
        self.events.clear();
        let mut ctx = Ctx {
            state: &mut self.state,
            reward: &mut self.reward,
            fallback: self.fallback,
        };
        let leftover = self.root.handle_click(p, &mut ctx);
        leftover.for_each(&mut |a| match a {
            Action::Emit(name) => self.events.push(name.clone()),
            Action::None => {}
            other => log::debug!("unhandled action at root: {other:?}"),
        });
        newly_set(&self.before, &self.reward)
    }

    pub fn render(&self) -> Scene {
        let mut scene = Scene::default();
        self.root.render(&self.state, &mut scene);
        scene
    }

    pub fn state(&self) -> &[i8] {
        &self.state
    }

    pub fn reward(&self) -> &[u8] {
        &self.reward
    }

    pub fn state_len(&self) -> usize {
        self.state.len()
    }

    pub fn reward_len(&self) -> usize {
        self.reward.len()
    }

    /// Fraction of reward bits set so far in this episode.
    pub fn coverage(&self) -> f64 {
        if self.reward.is_empty() {
            return 0.0;
        }
        self.reward.iter().filter(|&&b| b != 0).count() as f64 / self.reward.len() as f64
    }

    /// Events emitted by the last click.
    pub fn events(&self) -> &[String] {
        &self.events
    }

    pub fn states_info(&self) -> &[StateInfo] {
        &self.states_info
    }

    pub fn reward_info(&self) -> Vec<RewardInfo> {
        reward_info(&*self.root)
    }

    pub fn root(&self) -> &dyn Widget {
        &*self.root
    }
}
