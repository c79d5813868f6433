//! Scenario lifecycle
//!
//! A scenario is one self-contained piece of simulation (a level, a menu, the
//! duel demo). The [`StateManager`] holds them by name and switches between
//! them only at step boundaries.

use std::collections::HashMap;

use crate::error::StateError;
use crate::input::InputSnapshot;
use crate::renderer::Renderer;

pub trait Scenario {
    /// Became current. `previous` is the scenario that was current before, if any.
    fn load(&mut self, previous: Option<&str>);
    /// About to be replaced by `next`
    fn unload(&mut self, next: &str);
    /// One fixed step
    fn update(&mut self, input: &InputSnapshot, dt: f32);
    fn render(&mut self, alpha: f32, renderer: &mut dyn Renderer);
}

#[derive(Default)]
pub struct StateManager {
    scenarios: HashMap<String, Box<dyn Scenario>>,
    current: Option<String>,
    pending: Option<String>,
}

impl std::fmt::Debug for StateManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateManager")
            .field("scenarios", &self.scenarios.keys().collect::<Vec<_>>())
            .field("current", &self.current)
            .field("pending", &self.pending)
            .finish()
    }
}

impl StateManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) a scenario under `name`
    pub fn add(&mut self, name: impl Into<String>, scenario: Box<dyn Scenario>) {
        let name = name.into();
        if self.current.as_deref() == Some(name.as_str()) {
            log::warn!("replacing the running scenario `{name}`; it will not be reloaded");
        }
        self.scenarios.insert(name, scenario);
    }

    /// Request a switch at the start of the next update
    pub fn set(&mut self, name: &str) -> Result<(), StateError> {
        if !self.scenarios.contains_key(name) {
            log::warn!("cannot switch to unknown scenario `{name}`");
            return Err(StateError::UnknownScenario(name.to_string()));
        }
        self.pending = Some(name.to_string());
        Ok(())
    }

    #[inline]
    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    #[inline]
    pub fn pending(&self) -> Option<&str> {
        self.pending.as_deref()
    }

    pub fn update(&mut self, input: &InputSnapshot, dt: f32) {
        if let Some(next) = self.pending.take() {
            self.switch_to(next);
        }
        if let Some(scenario) = self.current_mut() {
            scenario.update(input, dt);
        }
    }

    pub fn render(&mut self, alpha: f32, renderer: &mut dyn Renderer) {
        if let Some(scenario) = self.current_mut() {
            scenario.render(alpha, renderer);
        }
    }

    fn current_mut(&mut self) -> Option<&mut Box<dyn Scenario>> {
        let name = self.current.as_deref()?;
        self.scenarios.get_mut(name)
    }

    fn switch_to(&mut self, next: String) {
        let previous = self.current.take();
        if let Some(old) = previous.as_deref().and_then(|p| self.scenarios.get_mut(p)) {
            old.unload(&next);
        }
        match self.scenarios.get_mut(&next) {
            Some(scenario) => {
                scenario.load(previous.as_deref());
                log::debug!("scenario {:?} -> `{next}`", previous);
                self.current = Some(next);
            }
            // Only reachable if the registry changed between set and update
            None => log::warn!("scenario `{next}` vanished before it could load"),
        }
    }
}
