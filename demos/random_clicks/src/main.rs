//! Clicks uniformly at random on the demo settings app and logs how much of
//! the reward space each episode covers.
//!
//! ```text
//! RUST_LOG=info cargo run -p random_clicks -- [episodes] [steps]
//! ```

mod settings_app;

use anyhow::Context;
use gymui_core::Fallback;
use gymui_env::{EnvConfig, Registry};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

fn parse_arg(args: &[String], i: usize, default: u64) -> anyhow::Result<u64> {
    match args.get(i) {
        Some(s) => s.parse().with_context(|| format!("argument {i} is not a number: {s}")),
        None => Ok(default),
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    let episodes = parse_arg(&args, 1, 5)?;
    let steps = parse_arg(&args, 2, 200)?;
    anyhow::ensure!(steps > 0, "steps per episode must be positive");

    let mut registry = Registry::new();
    registry.register("settings", settings_app::settings_app)?;

    let config = EnvConfig {
        max_steps: steps,
        fallback: Fallback::Nearest { max_distance: Some(8.0) },
        ..EnvConfig::default()
    };
    let mut env = registry.make("settings", config)?;
    log::info!(
        "{}: {} state cells, {} reward bits",
        env.name(),
        env.observation_len(),
        env.reward_len()
    );

    let mut policy = ChaCha8Rng::seed_from_u64(0xC11C);
    for episode in 0..episodes {
        env.reset(Some(episode));
        let mut total = 0.0;
        let mut saves = 0;
        loop {
            let r = env.step_action(policy.gen_range(-1.0..=1.0), policy.gen_range(-1.0..=1.0));
            total += r.reward;
            saves += r.info.events.iter().filter(|e| *e == "saved").count();
            if r.done {
                log::info!(
                    "episode {episode}: reward {total}, coverage {:.1}%, saves {saves}",
                    r.info.coverage * 100.0
                );
                break;
            }
        }
    }

    for (i, info) in env.reward_info().iter().enumerate() {
        let hit = env.reward_bits()[i] != 0;
        log::debug!("{i:>3} {:<10} {:<24} {}", info.class_name, info.path.join("."), hit);
    }
    Ok(())
}
