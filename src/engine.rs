//! The engine owns every piece of mutable state and is driven once per tick.
//!
//! It does no I/O of its own apart from drawing into a [`StatusDisplay`];
//! [`crate::runner::Runner`] feeds it samples and ships its output.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::config::{Config, GameKind};
use crate::frame::RingFrame;
use crate::game::{Context, GameMode};
use crate::grid::{OccupancyGrid, MAZE};
use crate::heading::{Calibration, Heading, HeadingSample};
use crate::input::{ButtonEdges, Debouncer, JoystickSample, BUTTON_COUNT};
use crate::player::MoveInput;
use crate::telemetry::Snapshot;
use crate::ui::{StatusDisplay, StatusUi, UiMode};

pub struct Engine {
    grid: OccupancyGrid,
    calibration: Calibration,
    debouncer: Debouncer,
    edges: ButtonEdges,
    heading: Heading,
    game: GameMode,
    ui: StatusUi,
    frame: RingFrame,
    rng: Pcg32,
}

impl Engine {
    pub fn new(config: Config) -> Self {
        Self::with_grid(config, MAZE)
    }

    pub fn with_grid(config: Config, grid: OccupancyGrid) -> Self {
        let mut rng = Pcg32::seed_from_u64(config.seed);
        let game = GameMode::new(config.game, &mut rng);
        info!("engine: starting {=str}", game.name());
        Self {
            grid,
            calibration: Calibration::default(),
            debouncer: Debouncer::new(),
            edges: ButtonEdges::none(),
            heading: Heading::default(),
            game,
            ui: StatusUi::new(),
            frame: RingFrame::new(),
            rng,
        }
    }

    /// Turn raw button levels into this tick's edges. While the game over
    /// flourish plays, levels are still tracked but no edge is reported.
    pub fn sample_buttons(&mut self, levels: [bool; BUTTON_COUNT]) -> ButtonEdges {
        let edges = self.debouncer.update(levels);
        self.edges = if self.game.accepts_input() {
            edges
        } else {
            ButtonEdges::none()
        };
        self.edges
    }

    pub fn sample_heading(&mut self, sample: HeadingSample) -> Heading {
        self.heading = self.calibration.resolve(sample);
        self.heading
    }

    /// Clear the frame and run the active game for one tick.
    pub fn update_game(&mut self, joystick: Option<JoystickSample>) -> &RingFrame {
        let movement = if self.game.accepts_input() {
            let stick = joystick.map(|j| j.movement()).unwrap_or_default();
            self.edges.movement().or(stick)
        } else {
            MoveInput::default()
        };

        self.frame.clear();
        let before = self.game.name();
        let mut ctx = Context {
            heading: &self.heading,
            calibration: &self.calibration,
            movement,
            grid: &self.grid,
            rng: &mut self.rng,
        };
        self.game.update(&mut self.frame, &mut ctx);

        let after = self.game.name();
        if before != after {
            info!("game: {=str} -> {=str}", before, after);
        }
        &self.frame
    }

    /// Run the UI axis; may re-center the heading.
    pub async fn update_ui<D: StatusDisplay>(&mut self, display: &mut D) {
        self.ui
            .update(display, &self.edges, &self.heading, &mut self.calibration)
            .await;
    }

    pub fn snapshot(&self) -> Snapshot {
        let (arc, pose) = match &self.game {
            GameMode::ArcTimer(arc) => (Some(arc.params()), None),
            GameMode::Maze(maze) => (None, Some(maze.pose)),
            GameMode::Compass | GameMode::GameOver { .. } => (None, None),
        };
        Snapshot {
            ring_index: self.heading.ring_index,
            frame: self.frame.to_bytes(),
            arc,
            pose,
        }
    }

    pub fn frame(&self) -> &RingFrame {
        &self.frame
    }

    pub fn game(&self) -> &GameMode {
        &self.game
    }

    pub fn heading(&self) -> &Heading {
        &self.heading
    }

    pub fn calibration(&self) -> &Calibration {
        &self.calibration
    }

    pub fn ui_mode(&self) -> UiMode {
        self.ui.mode()
    }

    /// Switch games, discarding the state of the previous one.
    pub fn select(&mut self, kind: GameKind) {
        self.game = GameMode::new(kind, &mut self.rng);
        info!("engine: switched to {=str}", self.game.name());
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(Config::default())
    }
}
