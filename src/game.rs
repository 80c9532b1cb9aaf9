//! Game axis of the mode state machine.
//!
//! Each mode keeps its own state inside the [`GameMode`] variant and draws
//! into an already cleared frame once per tick.

use rand::Rng;
use rand_pcg::Pcg32;

use crate::config::{
    GameKind, ARC_LENGTH_START, ARC_RADIUS_DECAY, ARC_RADIUS_MIN, ARC_RADIUS_START,
    FLOURISH_CYCLES, FLOURISH_HALF_PERIOD_TICKS, RING_SIZE,
};
use crate::frame::RingFrame;
use crate::grid::OccupancyGrid;
use crate::heading::{Calibration, Heading};
use crate::player::{try_move, MoveInput, PlayerPose};
use crate::render::{draw_arc, draw_compass, draw_flourish, draw_maze, ArcParams};

/// Everything a mode may read (or, for the RNG, advance) during a tick.
pub struct Context<'a> {
    pub heading: &'a Heading,
    pub calibration: &'a Calibration,
    pub movement: MoveInput,
    pub grid: &'a OccupancyGrid,
    pub rng: &'a mut Pcg32,
}

/// Outcome of one arc timer tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ArcOutcome {
    Running,
    /// The radius ran out with the trap covered at some point; next round started.
    RoundCleared,
    /// The radius ran out without the trap ever being covered; next round
    /// is already set up for when the flourish ends.
    Missed,
}

/// State of the shrinking-arc timing game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArcTimer {
    pub length: u8,
    pub orientation: usize,
    pub radius: i32,
    /// Whether the arc has covered the trap LED during this round.
    trap_covered: bool,
}

impl ArcTimer {
    pub fn new(rng: &mut Pcg32) -> Self {
        Self {
            length: ARC_LENGTH_START,
            orientation: rng.random_range(0..RING_SIZE),
            radius: ARC_RADIUS_START,
            trap_covered: false,
        }
    }

    pub fn trap_covered(&self) -> bool {
        self.trap_covered
    }

    pub fn params(&self) -> ArcParams {
        ArcParams {
            length: self.length,
            orientation: self.orientation,
            radius: self.radius,
        }
    }

    /// Draw this tick, then shrink the radius and start a new round once it
    /// drops below the minimum.
    pub fn step(&mut self, frame: &mut RingFrame, heading: &Heading, rng: &mut Pcg32) -> ArcOutcome {
        self.trap_covered |= draw_arc(frame, heading, &self.params());
        self.radius -= ARC_RADIUS_DECAY;

        if self.radius >= ARC_RADIUS_MIN {
            return ArcOutcome::Running;
        }

        let cleared = self.trap_covered;
        self.radius = ARC_RADIUS_START;
        self.length = self.length.saturating_add(1);
        self.orientation = rng.random_range(0..RING_SIZE);
        self.trap_covered = false;

        if cleared {
            ArcOutcome::RoundCleared
        } else {
            ArcOutcome::Missed
        }
    }
}

/// Game over animation, counted in ticks rather than blocking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Flourish {
    tick: u16,
}

impl Flourish {
    pub const TOTAL_TICKS: u16 = FLOURISH_CYCLES * 2 * FLOURISH_HALF_PERIOD_TICKS;

    pub fn tick(&self) -> u16 {
        self.tick
    }

    /// Draw one tick. Returns `true` once all cycles have been shown.
    pub fn step(&mut self, frame: &mut RingFrame) -> bool {
        let lit = self.tick % (2 * FLOURISH_HALF_PERIOD_TICKS) < FLOURISH_HALF_PERIOD_TICKS;
        draw_flourish(frame, lit);
        self.tick += 1;
        self.tick >= Self::TOTAL_TICKS
    }
}

/// Raycast maze walk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Maze {
    pub pose: PlayerPose,
}

impl Maze {
    pub fn step(&mut self, frame: &mut RingFrame, ctx: &Context<'_>) {
        let theta = ctx.calibration.forward_angle(ctx.heading);
        self.pose = try_move(ctx.grid, self.pose, ctx.movement, theta);
        draw_maze(frame, ctx.grid, self.pose, theta);
    }
}

/// Active game and its state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameMode {
    Compass,
    ArcTimer(ArcTimer),
    Maze(Maze),
    /// Game over flourish; resumes the stored timer when done.
    GameOver { flourish: Flourish, resume: ArcTimer },
}

impl GameMode {
    pub fn new(kind: GameKind, rng: &mut Pcg32) -> Self {
        match kind {
            GameKind::Compass => GameMode::Compass,
            GameKind::ArcTimer => GameMode::ArcTimer(ArcTimer::new(rng)),
            GameKind::Maze => GameMode::Maze(Maze::default()),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            GameMode::Compass => "compass",
            GameMode::ArcTimer(_) => "arc timer",
            GameMode::Maze(_) => "maze",
            GameMode::GameOver { .. } => "game over",
        }
    }

    /// Buttons and movement are ignored while the flourish plays.
    pub fn accepts_input(&self) -> bool {
        !matches!(self, GameMode::GameOver { .. })
    }

    /// Run the active mode for one tick, drawing into `frame` and switching
    /// modes where the game calls for it.
    pub fn update(&mut self, frame: &mut RingFrame, ctx: &mut Context<'_>) {
        match self {
            GameMode::Compass => draw_compass(frame, ctx.heading),
            GameMode::ArcTimer(arc) => match arc.step(frame, ctx.heading, ctx.rng) {
                ArcOutcome::Running => {}
                ArcOutcome::RoundCleared => {
                    info!("round cleared, arc length {=u8}", arc.length);
                }
                ArcOutcome::Missed => {
                    info!("trap missed, game over");
                    *self = GameMode::GameOver {
                        flourish: Flourish::default(),
                        resume: *arc,
                    };
                }
            },
            GameMode::Maze(maze) => maze.step(frame, ctx),
            GameMode::GameOver { flourish, resume } => {
                if flourish.step(frame) {
                    info!("flourish done, back to arc timer");
                    *self = GameMode::ArcTimer(*resume);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::RED;
    use crate::grid::MAZE;
    use crate::heading::HeadingSample;
    use rand::SeedableRng;

    fn heading_at(ring_index: usize) -> Heading {
        Heading {
            angle: 0.0,
            raw_index: ring_index as i32,
            ring_index,
        }
    }

    fn timer(orientation: usize) -> ArcTimer {
        ArcTimer {
            length: ARC_LENGTH_START,
            orientation,
            radius: ARC_RADIUS_START,
            trap_covered: false,
        }
    }

    /// Ticks needed to take the radius from start to below the minimum.
    fn ticks_per_round() -> usize {
        ((ARC_RADIUS_START - ARC_RADIUS_MIN) / ARC_RADIUS_DECAY + 1) as usize
    }

    #[test]
    fn test_radius_strictly_decreases_until_reset() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut arc = timer(0);
        let heading = heading_at(13);
        let mut last = arc.radius;

        for _ in 0..ticks_per_round() - 1 {
            let mut frame = RingFrame::new();
            assert_eq!(arc.step(&mut frame, &heading, &mut rng), ArcOutcome::Running);
            assert!(arc.radius < last);
            last = arc.radius;
        }

        let mut frame = RingFrame::new();
        assert_eq!(
            arc.step(&mut frame, &heading, &mut rng),
            ArcOutcome::RoundCleared
        );
        assert_eq!(arc.radius, ARC_RADIUS_START);
        assert_eq!(arc.length, ARC_LENGTH_START + 1);
        assert!(arc.orientation < RING_SIZE);
        assert!(!arc.trap_covered());
    }

    #[test]
    fn test_trap_miss_leads_to_game_over() {
        let mut rng = Pcg32::seed_from_u64(1);
        let calibration = Calibration::default();
        // Arc sits on 40..43, behind the strip
        let heading = heading_at(40);
        let mut mode = GameMode::ArcTimer(timer(0));

        for _ in 0..ticks_per_round() {
            assert!(matches!(mode, GameMode::ArcTimer(_)));
            let mut frame = RingFrame::new();
            let mut ctx = Context {
                heading: &heading,
                calibration: &calibration,
                movement: MoveInput::default(),
                grid: &MAZE,
                rng: &mut rng,
            };
            mode.update(&mut frame, &mut ctx);
        }

        match mode {
            GameMode::GameOver { flourish, resume } => {
                assert_eq!(flourish.tick(), 0);
                assert_eq!(resume.radius, ARC_RADIUS_START);
                assert_eq!(resume.length, ARC_LENGTH_START + 1);
            }
            other => panic!("expected game over, got {}", other.name()),
        }
        assert!(!mode.accepts_input());
    }

    #[test]
    fn test_flourish_runs_five_cycles() {
        let mut flourish = Flourish::default();
        let mut lit_runs = 0;
        let mut was_lit = false;
        let mut ticks = 0;
        loop {
            let mut frame = RingFrame::new();
            let done = flourish.step(&mut frame);
            let lit = frame.get(0) == RED;
            if lit && !was_lit {
                lit_runs += 1;
            }
            was_lit = lit;
            ticks += 1;
            if done {
                break;
            }
        }
        assert_eq!(lit_runs, 5);
        assert_eq!(ticks, 60);
        // The last tick of the last cycle is dark
        assert!(!was_lit);
    }

    #[test]
    fn test_maze_mode_moves_player() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut calibration = Calibration::default();
        let heading = calibration.resolve(HeadingSample::new(100, 0));
        calibration.center(&heading);

        let mut mode = GameMode::new(GameKind::Maze, &mut rng);
        let mut frame = RingFrame::new();
        let mut ctx = Context {
            heading: &heading,
            calibration: &calibration,
            movement: MoveInput {
                forward: crate::player::Axis::Positive,
                strafe: crate::player::Axis::Neutral,
            },
            grid: &MAZE,
            rng: &mut rng,
        };
        mode.update(&mut frame, &mut ctx);

        match mode {
            GameMode::Maze(maze) => assert_eq!(maze.pose, PlayerPose::new(480, 450)),
            other => panic!("expected maze, got {}", other.name()),
        }
    }
}
