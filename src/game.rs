//! Game driver: ties input, scenarios and the renderer to the scheduler

use crate::error::StateError;
use crate::input::InputState;
use crate::renderer::Renderer;
use crate::scheduler::FixedStepTarget;
use crate::state::{Scenario, StateManager};

#[derive(Debug)]
pub struct Game<R> {
    input: InputState,
    states: StateManager,
    renderer: R,
    steps: u64,
    frames: u64,
}

impl<R: Renderer> Game<R> {
    pub fn new(renderer: R) -> Self {
        Self {
            input: InputState::new(),
            states: StateManager::new(),
            renderer,
            steps: 0,
            frames: 0,
        }
    }

    /// Register a scenario and make it current if nothing else is
    pub fn add_scenario(&mut self, name: &str, scenario: Box<dyn Scenario>) {
        self.states.add(name, scenario);
        if self.states.current().is_none() && self.states.pending().is_none() {
            // Just registered, cannot be unknown
            let _ = self.states.set(name);
        }
    }

    pub fn switch_to(&mut self, name: &str) -> Result<(), StateError> {
        self.states.set(name)
    }

    /// Live input, for host event handlers
    #[inline]
    pub fn input_mut(&mut self) -> &mut InputState {
        &mut self.input
    }

    #[inline]
    pub fn states(&self) -> &StateManager {
        &self.states
    }

    #[inline]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    #[inline]
    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    #[inline]
    pub fn steps(&self) -> u64 {
        self.steps
    }

    #[inline]
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl<R: Renderer> FixedStepTarget for Game<R> {
    fn step(&mut self, dt: f32) {
        let input = self.input.snapshot();
        self.states.update(&input, dt);
        self.steps += 1;
    }

    fn render(&mut self, alpha: f32) {
        self.states.render(alpha, &mut self.renderer);
        self.frames += 1;
    }
}
