//! Fixed-step ray march against the occupancy grid.

use crate::config::{MAX_DIST, RAY_STEP};
use crate::grid::OccupancyGrid;
use crate::math::{cos, sin};
use crate::player::PlayerPose;

/// Distance from `origin` along `angle` to the first wall or grid edge.
///
/// Marches at 1, 3, 5, ... world units, truncating each offset before mapping
/// it to a cell. Leaving the grid counts as a hit. Returns [`MAX_DIST`] when
/// nothing is hit within the budget, so the result is always in
/// `[1, MAX_DIST]`.
pub fn cast(grid: &OccupancyGrid, origin: PlayerPose, angle: f32) -> i32 {
    let dx = cos(angle);
    let dy = sin(angle);

    for step in (1..MAX_DIST).step_by(RAY_STEP) {
        let wx = origin.x + (dx * step as f32) as i32;
        let wy = origin.y + (dy * step as f32) as i32;

        match OccupancyGrid::cell(wx, wy) {
            None => return step,
            Some((cx, cy)) if grid.is_wall(cx, cy) => return step,
            Some(_) => {}
        }
    }
    MAX_DIST
}
