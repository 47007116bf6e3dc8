#[cfg(test)]
mod tests {
    use crate::*;
    use gymui_core::*;

    fn init_logging() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    // state:  Page[0] CheckBox[1] Dropdown[2..8]
    // reward: Page submit[0] CheckBox checked[1] unchecked[2]
    //         Dropdown opened[3] closed[4] selected.a..e[5..10]
    fn form() -> gymui_core::Result<Box<dyn Widget>> {
        let page = Container::page(
            "form",
            BoundingBox::new(0, 0, 800, 600),
            RewardTemplate::map([("submit", RewardTemplate::Leaf)]),
        )?
        .with(CheckBox::new("agree", BoundingBox::new(10, 10, 20, 20))?)
        .with(Button::new(
            "submit",
            BoundingBox::new(100, 10, 40, 20),
            Action::register(["submit"]).then(Action::emit("submit")),
        ))
        .with(
            Dropdown::new(
                BoundingBox::new(10, 100, 80, 20),
                ["a", "b", "c", "d", "e"].into_iter().map(Item::new).collect(),
            )?
            .randomize_visibility(true),
        );
        Ok(Box::new(page))
    }

    fn registry() -> Registry {
        init_logging();
        let mut r = Registry::new();
        r.register("form", form).unwrap();
        r
    }

    fn make(config: EnvConfig) -> Env {
        registry().make("form", config).unwrap()
    }

    #[test]
    fn test_registry_rejects_duplicates_and_unknown_names() {
        let mut r = registry();
        assert!(matches!(r.register("form", form), Err(EnvError::DuplicateApp(n)) if n == "form"));
        assert!(matches!(
            r.make("nope", EnvConfig::default()),
            Err(EnvError::UnknownApp(n)) if n == "nope"
        ));
        assert_eq!(r.names().collect::<Vec<_>>(), vec!["form"]);
        assert!(r.contains("form"));
    }

    #[test]
    fn test_registry_surfaces_tree_errors() {
        let mut r = registry();
        r.register("broken", || {
            let page = Container::page("p", BoundingBox::new(0, 0, 10, 10), RewardTemplate::empty())?
                .with(Button::new("x", BoundingBox::new(0, 0, 5, 5), Action::register(["missing"])));
            Ok(Box::new(page) as Box<dyn Widget>)
        })
        .unwrap();
        assert!(matches!(
            r.make("broken", EnvConfig::default()),
            Err(EnvError::Core(gymui_core::Error::UnknownTag { .. }))
        ));
    }

    #[test]
    fn test_instances_do_not_share_state() {
        let r = registry();
        let mut a = r.make("form", EnvConfig::default()).unwrap();
        let b = r.make("form", EnvConfig::default()).unwrap();
        a.reset(Some(1));
        a.step(15, 15);
        assert_eq!(a.controller().state()[1], 1);
        assert_eq!(b.controller().state()[1], 0);
    }

    #[test]
    fn test_config_from_json_fills_defaults() {
        let c = EnvConfig::from_json(r#"{"max_steps": 5}"#).unwrap();
        assert_eq!(c.max_steps, 5);
        assert_eq!(c.screen_width, 800);
        assert_eq!(c.screen_height, 600);
        assert_eq!(c.fallback, Fallback::None);

        let c = EnvConfig::from_json(r#"{"fallback": {"kind": "nearest", "max_distance": 30.0}}"#)
            .unwrap();
        assert_eq!(c.fallback, Fallback::Nearest { max_distance: Some(30.0) });

        assert!(matches!(
            EnvConfig::from_json(r#"{"max_steps": "many"}"#),
            Err(EnvError::Config(_))
        ));
    }

    #[test]
    fn test_default_config_json() {
        insta::assert_snapshot!(EnvConfig::default().to_json().unwrap(), @r#"
        {
          "screen_width": 800,
          "screen_height": 600,
          "max_steps": 0,
          "fallback": {
            "kind": "none"
          },
          "export_states_info": false
        }
        "#);
    }

    #[test]
    fn test_action_to_pixel() {
        assert_eq!(action_to_pixel(-1.0, 800), 0);
        assert_eq!(action_to_pixel(0.0, 800), 400);
        assert_eq!(action_to_pixel(0.5, 800), 600);
        assert_eq!(action_to_pixel(1.0, 800), 799);
        assert_eq!(action_to_pixel(7.0, 800), 799);
        assert_eq!(action_to_pixel(-3.0, 800), 0);
        assert_eq!(action_to_pixel(f64::NAN, 800), 400);
        assert_eq!(action_to_pixel(0.3, 0), 0);
    }

    #[test]
    fn test_step_reports_newly_set_bits() {
        let mut env = make(EnvConfig::default());
        let obs = env.reset(Some(3));
        assert_eq!(obs.len(), 8);
        assert_eq!(env.reward_len(), 10);
        assert_eq!(obs[0], 1);

        let r = env.step(15, 15);
        assert_eq!(r.reward, 1.0);
        assert_eq!(r.observation[1], 1);
        assert!(!r.done);
        assert_eq!(r.info.step, 1);

        let r = env.step(15, 15);
        assert_eq!(r.reward, 1.0);
        assert_eq!(r.observation[1], 0);

        let r = env.step(15, 15);
        assert_eq!(r.reward, 0.0);
        assert!((r.info.coverage - 0.2).abs() < 1e-9);
    }

    #[test]
    fn test_miss_is_a_no_op() {
        let mut env = make(EnvConfig::default());
        let before = env.reset(Some(3));
        let r = env.step(700, 500);
        assert_eq!(r.reward, 0.0);
        assert_eq!(r.observation, before);
    }

    #[test]
    fn test_nearest_fallback_from_config() {
        let config = EnvConfig {
            fallback: Fallback::Nearest { max_distance: Some(10.0) },
            ..EnvConfig::default()
        };
        let mut env = make(config);
        env.reset(Some(0));
        // 5px right of the checkbox
        let r = env.step(35, 20);
        assert_eq!(r.reward, 1.0);
        assert_eq!(r.observation[1], 1);
        // too far from anything
        assert_eq!(env.step(400, 400).reward, 0.0);
    }

    #[test]
    fn test_emitted_events_reach_step_info() {
        let mut env = make(EnvConfig::default());
        env.reset(Some(0));
        let r = env.step(120, 20);
        assert_eq!(r.reward, 1.0);
        assert_eq!(r.info.events, vec!["submit".to_string()]);
        assert!(env.step(15, 15).info.events.is_empty());
    }

    #[test]
    fn test_done_after_max_steps() {
        let mut env = make(EnvConfig { max_steps: 2, ..EnvConfig::default() });
        env.reset(Some(0));
        assert!(!env.step(15, 15).done);
        let r = env.step(15, 15);
        assert!(r.done);
        assert_eq!(r.info.termination_reason.as_deref(), Some("max steps reached"));

        let r = env.step(120, 20);
        assert!(r.done);
        assert_eq!(r.reward, 0.0);
        assert_eq!(env.steps(), 2);
        assert_eq!(env.reward_bits()[0], 0);

        env.reset(None);
        assert!(!env.is_done());
        assert_eq!(env.steps(), 0);
    }

    #[test]
    fn test_reset_clears_reward_and_state() {
        let mut env = make(EnvConfig::default());
        env.reset(Some(9));
        env.step(15, 15);
        env.step(120, 20);
        let obs = env.reset(Some(9));
        assert_eq!(obs[1], 0);
        assert!(env.reward_bits().iter().all(|&b| b == 0));
    }

    fn open_dropdown_scene(env: &mut Env, seed: u64) -> Scene {
        env.reset(Some(seed));
        env.step(20, 110);
        env.render()
    }

    #[test]
    fn test_same_seed_same_episode() {
        let mut a = make(EnvConfig::default());
        let mut b = make(EnvConfig::default());
        for seed in [0, 7, 42] {
            assert_eq!(open_dropdown_scene(&mut a, seed), open_dropdown_scene(&mut b, seed));
        }
    }

    #[test]
    fn test_seeds_randomize_content_not_layout() {
        let mut env = make(EnvConfig::default());
        let layout = env.states_info().to_vec();
        let scenes: Vec<Scene> = (0..32).map(|s| open_dropdown_scene(&mut env, s)).collect();
        assert!(scenes.iter().any(|s| *s != scenes[0]));
        for s in &scenes {
            assert!(s.rects_with_role(Role::DropdownItem).count() >= 1);
        }
        assert_eq!(env.states_info(), layout.as_slice());
        assert_eq!(env.observation_len(), 8);
    }

    #[test]
    fn test_unseeded_reset_draws_seed() {
        let mut env = make(EnvConfig::default());
        env.reset(None);
        let first = env.seed();
        env.reset(None);
        assert_ne!(env.seed(), first);

        let mut again = make(EnvConfig::default());
        again.reset(None);
        assert_eq!(again.seed(), first);
    }

    #[test]
    fn test_step_action_maps_onto_screen() {
        let config = EnvConfig { screen_width: 200, screen_height: 200, ..EnvConfig::default() };
        let mut env = make(config);
        env.reset(Some(0));
        // the checkbox
        let r = env.step_action(-0.875, -0.875);
        assert_eq!(r.info.click, (12, 12));
        assert_eq!(r.reward, 1.0);
    }

    #[test]
    fn test_states_info_layout() {
        let mut env = make(EnvConfig { export_states_info: true, ..EnvConfig::default() });
        env.reset(Some(0));
        let info = env.step(700, 500).info.states_info.unwrap();
        let layout: Vec<String> = info
            .iter()
            .enumerate()
            .map(|(i, s)| format!("{i} {} {}", s.class_name, s.recursion_depth))
            .collect();
        insta::assert_snapshot!(layout.join("\n"), @r"
        0 Page 0
        1 CheckBox 1
        2 Dropdown 1
        3 Dropdown 1
        4 Dropdown 1
        5 Dropdown 1
        6 Dropdown 1
        7 Dropdown 1
        ");

        let mut plain = make(EnvConfig::default());
        plain.reset(Some(0));
        assert!(plain.step(700, 500).info.states_info.is_none());
    }

    #[test]
    fn test_reward_info_is_serializable() {
        let env = make(EnvConfig::default());
        let json = serde_json::to_value(env.reward_info()).unwrap();
        assert_eq!(json[0]["class_name"], "Page");
        assert_eq!(json[0]["path"][0], "submit");
        assert_eq!(json[3]["path"][0], "opened");
        assert_eq!(json[9]["path"], serde_json::json!(["selected", "e"]));
    }

    #[test]
    fn test_vec_env() {
        let r = registry();
        let mut venv = VecEnv::new(&r, "form", 3, EnvConfig::default()).unwrap();
        assert_eq!(venv.num_envs(), 3);

        let obs = venv.reset_all(Some(&[10, 20]));
        assert_eq!(obs.len(), 3);
        let seeds = venv.seeds();
        assert_eq!(&seeds[..2], &[10, 20]);

        // (-0.96875, -0.9375) on 800x600 -> (12, 18)
        let results = venv.step(&[(-0.96875, -0.9375), (1.0, 1.0), (-0.96875, -0.9375)]);
        assert_eq!(results[0].reward, 1.0);
        assert_eq!(results[1].reward, 0.0);
        assert_eq!(results[2].reward, 1.0);
        assert_eq!(venv.dones(), vec![false; 3]);

        venv.reset_all(None);
        let s = venv.seeds();
        assert_ne!(s[0], s[1]);
    }

    #[test]
    #[should_panic(expected = "actions length")]
    fn test_vec_env_rejects_wrong_action_count() {
        let r = registry();
        let mut venv = VecEnv::new(&r, "form", 2, EnvConfig::default()).unwrap();
        venv.reset_all(None);
        venv.step(&[(0.0, 0.0)]);
    }
}
