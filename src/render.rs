//! Per-mode drawing onto the ring frame.
//!
//! The caller clears the frame before any of these run.

use core::f32::consts::PI;

use crate::config::{ARC_GAMMA, MAZE_GAMMA, NUM_LEDS, RING_SIZE, TRAP_INDEX};
use crate::frame::{blue, RingFrame, RED};
use crate::grid::OccupancyGrid;
use crate::heading::Heading;
use crate::math::{shade, wrap_index};
use crate::player::PlayerPose;
use crate::raycast::cast;

/// Single red LED where the heading points, nothing when it points behind.
pub fn draw_compass(frame: &mut RingFrame, heading: &Heading) {
    if heading.is_visible() {
        frame.set(heading.ring_index, RED);
    }
}

/// Arc placement and fade for one tick of the timing game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArcParams {
    pub length: u8,
    /// Rotation of the arc on the virtual ring, `[0, 2N)`.
    pub orientation: usize,
    pub radius: i32,
}

/// Draw the arc, then the trap LED on top of it.
///
/// Returns whether the arc itself painted the trap index. The red overlay is
/// drawn afterwards and does not count.
pub fn draw_arc(frame: &mut RingFrame, heading: &Heading, arc: &ArcParams) -> bool {
    let color = blue(shade(arc.radius, ARC_GAMMA));
    let mut covered = false;

    for i in 0..arc.length as usize {
        let idx = wrap_index(
            (i + arc.orientation + heading.ring_index) as i32,
            RING_SIZE as i32,
        );
        if idx >= NUM_LEDS {
            continue;
        }
        frame.set(idx, color);
        if idx == TRAP_INDEX {
            covered = true;
        }
    }

    frame.set(TRAP_INDEX, RED);
    covered
}

/// First-person strip: one ray per LED, brighter blue for nearer walls.
///
/// `theta` is the movement direction. LED `i` casts at `theta - i·π/N`, so
/// LED 0 looks straight ahead and the fan sweeps clockwise across the strip.
pub fn draw_maze(frame: &mut RingFrame, grid: &OccupancyGrid, pose: PlayerPose, theta: f32) {
    let spread = PI / NUM_LEDS as f32;

    for i in 0..NUM_LEDS {
        let distance = cast(grid, pose, theta - i as f32 * spread);
        frame.set(i, blue(shade(distance, MAZE_GAMMA)));
    }
}

/// Whole ring red during the lit half of a flourish cycle.
pub fn draw_flourish(frame: &mut RingFrame, lit: bool) {
    if lit {
        frame.fill(RED);
    }
}
