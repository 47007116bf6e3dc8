//! Gym-style environment over a `Controller`.
//!
//! - `reset(seed) -> observation`
//! - `step(x, y) -> (observation, reward, done, info)`
//!
//! Episodes are deterministic given the seed: the seed drives the only
//! source of randomness (domain content such as dropdown item visibility).

use gymui_core::{Controller, Point, RewardInfo, Scene, StateInfo};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::config::EnvConfig;
use crate::error::Result;
use crate::registry::Registry;

/// Maps an action component in `[-1, 1]` onto `0..extent`.
///
/// `px = floor(0.5 * (a + 1) * extent)`, clamped so that `a = 1` lands on the
/// last pixel. Out-of-range and NaN actions are clamped first.
pub fn action_to_pixel(a: f64, extent: u32) -> i32 {
    if extent == 0 {
        return 0;
    }
    let a = if a.is_nan() { 0.0 } else { a.clamp(-1.0, 1.0) };
    let px = (0.5 * (a + 1.0) * extent as f64).floor() as i64;
    px.clamp(0, extent as i64 - 1) as i32
}

/// Result of a single environment step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepResult {
    /// The state vector after the click.
    pub observation: Vec<i8>,
    /// Number of reward bits the click newly set.
    pub reward: f64,
    pub done: bool,
    pub info: StepInfo,
}

/// Additional information returned from a step.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StepInfo {
    /// Steps taken in this episode, including this one.
    pub step: u64,
    /// Pixel the action was routed to.
    pub click: (i32, i32),
    /// Fraction of reward bits set so far.
    pub coverage: f64,
    /// Events emitted by the click.
    pub events: Vec<String>,
    pub termination_reason: Option<String>,
    /// Owner of each state index. Only filled when
    /// `EnvConfig::export_states_info` is set.
    pub states_info: Option<Vec<StateInfo>>,
}

pub struct Env {
    name: String,
    controller: Controller,
    config: EnvConfig,
    rng: ChaCha8Rng,
    seed: u64,
    steps: u64,
    done: bool,
}

impl Env {
    pub fn new(name: impl Into<String>, controller: Controller, config: EnvConfig) -> Self {
        let controller = controller.with_fallback(config.fallback);
        Self {
            name: name.into(),
            controller,
            config,
            rng: ChaCha8Rng::seed_from_u64(0),
            seed: 0,
            steps: 0,
            done: false,
        }
    }

    /// Reseeds the generator used to draw seeds for `reset(None)`.
    pub fn with_seed_source(mut self, seed: u64) -> Self {
        self.rng = ChaCha8Rng::seed_from_u64(seed);
        self
    }

    /// Starts a new episode. Without a seed, one is drawn from the
    /// environment's own generator.
    pub fn reset(&mut self, seed: Option<u64>) -> Vec<i8> {
        let seed = seed.unwrap_or_else(|| self.rng.r#gen());
        self.seed = seed;
        self.rng = ChaCha8Rng::seed_from_u64(seed);
        self.steps = 0;
        self.done = false;
        self.controller.reset(&mut self.rng);
        log::info!("{}: reset with seed {seed}", self.name);
        self.controller.state().to_vec()
    }

    /// Clicks at pixel `(x, y)`.
    pub fn step(&mut self, x: i32, y: i32) -> StepResult {
        if self.done {
            log::warn!("{}: step after episode end", self.name);
            return StepResult {
                observation: self.controller.state().to_vec(),
                reward: 0.0,
                done: true,
                info: self.step_info((x, y), Some("episode already done".to_string())),
            };
        }

        self.steps += 1;
        let newly = self.controller.handle_click(Point::new(x, y));

        let termination_reason = if self.config.max_steps > 0 && self.steps >= self.config.max_steps {
            Some("max steps reached".to_string())
        } else {
            None
        };
        self.done = termination_reason.is_some();

        StepResult {
            observation: self.controller.state().to_vec(),
            reward: newly as f64,
            done: self.done,
            info: self.step_info((x, y), termination_reason),
        }
    }

    /// Clicks at the pixel an action pair in `[-1, 1]^2` maps to.
    pub fn step_action(&mut self, ax: f64, ay: f64) -> StepResult {
        let x = action_to_pixel(ax, self.config.screen_width);
        let y = action_to_pixel(ay, self.config.screen_height);
        self.step(x, y)
    }

    fn step_info(&self, click: (i32, i32), termination_reason: Option<String>) -> StepInfo {
        StepInfo {
            step: self.steps,
            click,
            coverage: self.controller.coverage(),
            events: self.controller.events().to_vec(),
            termination_reason,
            states_info: self
                .config
                .export_states_info
                .then(|| self.controller.states_info().to_vec()),
        }
    }

    pub fn render(&self) -> Scene {
        self.controller.render()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &EnvConfig {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    pub fn observation_len(&self) -> usize {
        self.controller.state_len()
    }

    pub fn reward_len(&self) -> usize {
        self.controller.reward_len()
    }

    pub fn reward_bits(&self) -> &[u8] {
        self.controller.reward()
    }

    pub fn states_info(&self) -> &[StateInfo] {
        self.controller.states_info()
    }

    pub fn reward_info(&self) -> Vec<RewardInfo> {
        self.controller.reward_info()
    }

    pub fn controller(&self) -> &Controller {
        &self.controller
    }
}

/// N independent copies of one registered app.
pub struct VecEnv {
    envs: Vec<Env>,
}

impl VecEnv {
    /// Builds `n` environments. Environment `i` draws unseeded resets from a
    /// generator seeded with `i`, so copies diverge even without seeds.
    pub fn new(registry: &Registry, name: &str, n: usize, config: EnvConfig) -> Result<Self> {
        let envs = (0..n)
            .map(|i| Ok(registry.make(name, config.clone())?.with_seed_source(i as u64)))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { envs })
    }

    pub fn num_envs(&self) -> usize {
        self.envs.len()
    }

    /// Resets every environment. Envs past the end of `seeds` draw their own.
    pub fn reset_all(&mut self, seeds: Option<&[u64]>) -> Vec<Vec<i8>> {
        self.envs
            .iter_mut()
            .enumerate()
            .map(|(i, env)| env.reset(seeds.and_then(|s| s.get(i).copied())))
            .collect()
    }

    /// Steps every environment with its own action pair.
    ///
    /// Panics if `actions.len()` differs from the number of environments.
    pub fn step(&mut self, actions: &[(f64, f64)]) -> Vec<StepResult> {
        assert_eq!(
            actions.len(),
            self.envs.len(),
            "actions length must match number of environments"
        );
        self.envs
            .iter_mut()
            .zip(actions)
            .map(|(env, &(ax, ay))| env.step_action(ax, ay))
            .collect()
    }

    pub fn seeds(&self) -> Vec<u64> {
        self.envs.iter().map(Env::seed).collect()
    }

    pub fn dones(&self) -> Vec<bool> {
        self.envs.iter().map(Env::is_done).collect()
    }

    pub fn envs(&self) -> &[Env] {
        &self.envs
    }
}
