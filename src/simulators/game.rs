//! Apple game: the turtle simulator with a target to reach.
//!
//! [`TurtleGame::play`] opens a play session by dropping an apple on a
//! random cell. The next run that finishes without error ends the session
//! with a win or a loss; an aborted or cancelled run leaves it open.

use crate::config::{PacingConfig, SimConfig};
use crate::engine::{CancelToken, Pacer, RunOutcome, SimRng, Simulator, Step};
use crate::renderers::{Notice, View};

use super::turtle::{Square, TurtleWorld};

/// Turtle simulator with target placement.
#[derive(Debug)]
pub struct TurtleGame {
    sim: Simulator<TurtleWorld>,
    rng: SimRng,
}

impl TurtleGame {
    /// Create a game from configuration, using the config's pacing
    /// override or the game profile.
    #[must_use]
    pub fn new(config: &SimConfig) -> Self {
        let pacing = config.pacing.clone().unwrap_or_else(PacingConfig::game);
        Self {
            sim: Simulator::new(TurtleWorld::from_config(config), pacing),
            rng: SimRng::new(config.seed),
        }
    }

    /// Start a play session.
    ///
    /// Cancels any active run, resets the world, places the apple on a
    /// random cell other than the start cell, and announces it.
    pub fn play<V: View<TurtleWorld>>(&mut self, view: &mut V) -> Square {
        self.sim.reset(view);
        let target = self.pick_target();
        let seed = self.rng.master_seed();
        log::info!("apple placed at ({}, {}), seed {seed}", target.x, target.y);

        self.sim.world_mut().set_target(Some(target));
        view.render(self.sim.world());
        view.notify(&Notice::GameStarted { target });
        target
    }

    fn pick_target(&mut self) -> Square {
        let size = self.sim.world().grid_size();
        loop {
            let square = Square::new(self.rng.gen_below(size), self.rng.gen_below(size));
            if square != Square::ORIGIN {
                return square;
            }
        }
    }

    /// See [`Simulator::run`].
    pub fn run(&mut self, text: &str) -> bool {
        self.sim.run(text)
    }

    /// See [`Simulator::advance`].
    pub fn advance<V: View<TurtleWorld>>(&mut self, view: &mut V) -> Step {
        self.sim.advance(view)
    }

    /// Cancel any run and end the play session.
    pub fn reset<V: View<TurtleWorld>>(&mut self, view: &mut V) {
        self.sim.reset(view);
    }

    /// See [`Simulator::run_blocking`].
    pub fn run_blocking<V: View<TurtleWorld>, P: Pacer>(
        &mut self,
        text: &str,
        view: &mut V,
        pacer: &mut P,
    ) -> Option<RunOutcome> {
        self.sim.run_blocking(text, view, pacer)
    }

    /// The turtle world.
    #[must_use]
    pub const fn world(&self) -> &TurtleWorld {
        self.sim.world()
    }

    /// The wrapped simulator.
    #[must_use]
    pub const fn simulator(&self) -> &Simulator<TurtleWorld> {
        &self.sim
    }

    /// Change pacing; applies from the next run.
    pub fn set_pacing(&mut self, pacing: PacingConfig) {
        self.sim.set_pacing(pacing);
    }

    /// True while a run is in progress.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.sim.is_running()
    }

    /// True while a play session is open.
    #[must_use]
    pub const fn is_playing(&self) -> bool {
        self.sim.world().is_playing()
    }

    /// Token of the active run.
    #[must_use]
    pub fn cancel_token(&self) -> Option<CancelToken> {
        self.sim.cancel_token()
    }
}
