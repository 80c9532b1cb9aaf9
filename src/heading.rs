//! Heading resolver: raw magnetometer vector to an angle and a ring index.

use core::f32::consts::PI;

use crate::config::{NUM_LEDS, RING_SIZE};
use crate::math::{atan2, wrap_index};

/// Raw horizontal magnetic field components as delivered by the sensor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HeadingSample {
    pub x: i32,
    pub y: i32,
}

impl HeadingSample {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// A resolved heading for one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Heading {
    /// Bearing in radians, `(-π, π]`.
    pub angle: f32,
    /// Reflected, re-centred index before calibration. May be negative.
    pub raw_index: i32,
    /// Calibrated position on the virtual ring, `[0, 2N)`.
    pub ring_index: usize,
}

impl Heading {
    /// Whether the heading points at a physical LED.
    pub fn is_visible(&self) -> bool {
        self.ring_index < NUM_LEDS
    }
}

/// Offset captured by the last centering action.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Calibration {
    /// Heading (radians) that counts as "forward".
    pub angle: f32,
    /// Added to the raw index before wrapping.
    pub ring_offset: i32,
}

impl Calibration {
    /// Resolve a sample against this calibration.
    pub fn resolve(&self, sample: HeadingSample) -> Heading {
        let angle = atan2(sample.y as f32, sample.x as f32);
        let raw_index = raw_index(angle);
        let ring_index = wrap_index(raw_index + self.ring_offset, RING_SIZE as i32);
        Heading {
            angle,
            raw_index,
            ring_index,
        }
    }

    /// Make `heading` the new forward direction. Afterwards the same heading
    /// resolves to ring index `N/2`.
    pub fn center(&mut self, heading: &Heading) {
        self.ring_offset = (NUM_LEDS / 2) as i32 - heading.raw_index;
        self.angle = heading.angle;
        info!(
            "centered: offset {=i32}, raw index {=i32}",
            self.ring_offset,
            heading.raw_index
        );
    }

    /// Movement direction in world space: calibrated forward minus heading.
    pub fn forward_angle(&self, heading: &Heading) -> f32 {
        self.angle - heading.angle
    }
}

/// `N - 1 - trunc(N·θ/π) - N/2`.
///
/// The step is truncated towards zero, not rounded, so a heading just short
/// of a bucket boundary stays in the lower bucket on both sides of zero.
fn raw_index(angle: f32) -> i32 {
    let n = NUM_LEDS as i32;
    let step = (NUM_LEDS as f32 * angle / PI) as i32;
    n - 1 - step - n / 2
}
