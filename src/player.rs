//! Player pose in the maze and movement against walls.

use crate::config::{PLAYER_SPEED, PLAYER_START, WORLD_MAX};
use crate::grid::OccupancyGrid;
use crate::math::{cos, round, sin};

/// Integer world position, always inside `[0, WORLD_MAX]` on both axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PlayerPose {
    pub x: i32,
    pub y: i32,
}

impl PlayerPose {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    fn clamped(self) -> Self {
        Self {
            x: self.x.clamp(0, WORLD_MAX),
            y: self.y.clamp(0, WORLD_MAX),
        }
    }
}

impl Default for PlayerPose {
    fn default() -> Self {
        Self::new(PLAYER_START.0, PLAYER_START.1)
    }
}

/// Direction along one input axis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Axis {
    Negative,
    #[default]
    Neutral,
    Positive,
}

impl Axis {
    pub fn sign(self) -> f32 {
        match self {
            Axis::Negative => -1.0,
            Axis::Neutral => 0.0,
            Axis::Positive => 1.0,
        }
    }

    /// Combine two sources, e.g. buttons and joystick. Opposing inputs cancel.
    pub fn or(self, other: Axis) -> Axis {
        match (self, other) {
            (Axis::Neutral, a) | (a, Axis::Neutral) => a,
            (a, b) if a == b => a,
            _ => Axis::Neutral,
        }
    }
}

/// Movement requested for one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MoveInput {
    /// Positive is forward.
    pub forward: Axis,
    /// Positive is to the right.
    pub strafe: Axis,
}

impl MoveInput {
    pub fn is_idle(&self) -> bool {
        self.forward == Axis::Neutral && self.strafe == Axis::Neutral
    }

    pub fn or(self, other: MoveInput) -> MoveInput {
        MoveInput {
            forward: self.forward.or(other.forward),
            strafe: self.strafe.or(other.strafe),
        }
    }
}

/// Move `pose` by `input` relative to world angle `theta`.
///
/// Forward is `(cos θ, sin θ)` and right is `(-sin θ, cos θ)`; speed is fixed
/// regardless of how far a stick is pushed. A candidate that lands in a wall
/// cell is dropped entirely, there is no sliding along walls.
pub fn try_move(grid: &OccupancyGrid, pose: PlayerPose, input: MoveInput, theta: f32) -> PlayerPose {
    if input.is_idle() {
        return pose.clamped();
    }

    let (fx, fy) = (cos(theta), sin(theta));
    let forward = input.forward.sign() * PLAYER_SPEED;
    let strafe = input.strafe.sign() * PLAYER_SPEED;

    let dx = round(forward * fx - strafe * fy) as i32;
    let dy = round(forward * fy + strafe * fx) as i32;

    let candidate = PlayerPose::new(pose.x + dx, pose.y + dy).clamped();
    if grid.is_wall_at(candidate.x, candidate.y) {
        debug!("move blocked at ({=i32}, {=i32})", candidate.x, candidate.y);
        return pose.clamped();
    }
    candidate
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::MAZE;
    use core::f32::consts::{FRAC_PI_2, PI};

    const FORWARD: MoveInput = MoveInput {
        forward: Axis::Positive,
        strafe: Axis::Neutral,
    };

    #[test]
    fn test_forward_moves_along_theta() {
        let grid = OccupancyGrid::empty();
        let pose = try_move(&grid, PlayerPose::new(4500, 4500), FORWARD, 0.0);
        assert_eq!(pose, PlayerPose::new(4530, 4500));

        let pose = try_move(&grid, PlayerPose::new(4500, 4500), FORWARD, FRAC_PI_2);
        assert_eq!(pose, PlayerPose::new(4500, 4530));
    }

    #[test]
    fn test_back_and_strafe() {
        let grid = OccupancyGrid::empty();
        let back = MoveInput {
            forward: Axis::Negative,
            strafe: Axis::Neutral,
        };
        assert_eq!(
            try_move(&grid, PlayerPose::new(4500, 4500), back, 0.0),
            PlayerPose::new(4470, 4500)
        );

        let right = MoveInput {
            forward: Axis::Neutral,
            strafe: Axis::Positive,
        };
        assert_eq!(
            try_move(&grid, PlayerPose::new(4500, 4500), right, 0.0),
            PlayerPose::new(4500, 4530)
        );
    }

    #[test]
    fn test_wall_rejects_whole_move() {
        // (1, 1) is open, (0, 1) is a wall; step left from x = 310
        let start = PlayerPose::new(310, 450);
        let pose = try_move(&MAZE, start, FORWARD, PI);
        assert_eq!(pose, start);
    }

    #[test]
    fn test_clamped_at_world_edge() {
        let grid = OccupancyGrid::empty();
        let pose = try_move(&grid, PlayerPose::new(9590, 10), FORWARD, 0.0);
        assert_eq!(pose, PlayerPose::new(WORLD_MAX, 10));

        let pose = try_move(&grid, PlayerPose::new(10, 10), FORWARD, -FRAC_PI_2);
        assert_eq!(pose, PlayerPose::new(10, 0));
    }

    #[test]
    fn test_never_ends_in_wall_or_out_of_bounds() {
        let mut pose = PlayerPose::default();
        let inputs = [
            FORWARD,
            MoveInput {
                forward: Axis::Negative,
                strafe: Axis::Positive,
            },
            MoveInput {
                forward: Axis::Neutral,
                strafe: Axis::Negative,
            },
        ];
        for tick in 0..2_000 {
            let theta = (tick % 97) as f32 * 0.37;
            pose = try_move(&MAZE, pose, inputs[tick % inputs.len()], theta);
            assert!((0..=WORLD_MAX).contains(&pose.x));
            assert!((0..=WORLD_MAX).contains(&pose.y));
            assert!(!MAZE.is_wall_at(pose.x, pose.y), "tick {tick}: {pose:?}");
        }
    }

    #[test]
    fn test_axis_or() {
        assert_eq!(Axis::Neutral.or(Axis::Positive), Axis::Positive);
        assert_eq!(Axis::Negative.or(Axis::Neutral), Axis::Negative);
        assert_eq!(Axis::Positive.or(Axis::Positive), Axis::Positive);
        assert_eq!(Axis::Positive.or(Axis::Negative), Axis::Neutral);
    }
}
