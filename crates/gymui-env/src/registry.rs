use gymui_core::{Controller, Widget};
use indexmap::IndexMap;

use crate::config::EnvConfig;
use crate::env::Env;
use crate::error::{EnvError, Result};

/// Builds a fresh component tree for one environment instance.
pub type AppFactory = Box<dyn Fn() -> gymui_core::Result<Box<dyn Widget>>>;

/// Named app factories. Each environment gets its own tree, so nothing is
/// shared between instances.
#[derive(Default)]
pub struct Registry {
    apps: IndexMap<String, AppFactory>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<F>(&mut self, name: impl Into<String>, factory: F) -> Result<()>
    where
        F: Fn() -> gymui_core::Result<Box<dyn Widget>> + 'static,
    {
        let name = name.into();
        if self.apps.contains_key(&name) {
            return Err(EnvError::DuplicateApp(name));
        }
        log::debug!("registered app `{name}`");
        self.apps.insert(name, Box::new(factory));
        Ok(())
    }

    /// Registered names, in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.apps.keys().map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.apps.contains_key(name)
    }

    pub fn controller(&self, name: &str) -> Result<Controller> {
        let factory = self
            .apps
            .get(name)
            .ok_or_else(|| EnvError::UnknownApp(name.to_string()))?;
        Ok(Controller::build(|| factory())?)
    }

    pub fn make(&self, name: &str, config: EnvConfig) -> Result<Env> {
        let controller = self.controller(name)?;
        Ok(Env::new(name, controller, config))
    }
}
