//! Button edge detection and joystick dead bands.

use crate::config::{JOY_HIGH, JOY_LOW};
use crate::player::{Axis, MoveInput};

/// Number of digital buttons on the gadget.
pub const BUTTON_COUNT: usize = 5;

/// Physical buttons, in the order their levels are sampled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Button {
    /// Toggles centering.
    Mid = 0,
    Right = 1,
    Left = 2,
    Down = 3,
    Up = 4,
}

/// Buttons that went down this tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ButtonEdges {
    pressed: [bool; BUTTON_COUNT],
    held: [bool; BUTTON_COUNT],
}

impl ButtonEdges {
    /// No edges and nothing held, used while input is ignored.
    pub const fn none() -> Self {
        Self {
            pressed: [false; BUTTON_COUNT],
            held: [false; BUTTON_COUNT],
        }
    }

    /// Rising edge: down now, up on the previous tick.
    pub fn pressed(&self, button: Button) -> bool {
        self.pressed[button as usize]
    }

    /// Level: down now, edge or not.
    pub fn held(&self, button: Button) -> bool {
        self.held[button as usize]
    }

    /// Movement from the direction buttons while they are held.
    pub fn movement(&self) -> MoveInput {
        MoveInput {
            forward: axis(self.held(Button::Down), self.held(Button::Up)),
            strafe: axis(self.held(Button::Left), self.held(Button::Right)),
        }
    }
}

/// Remembers the previous raw levels to turn them into press edges.
#[derive(Debug, Clone, Default)]
pub struct Debouncer {
    previous: [bool; BUTTON_COUNT],
}

impl Debouncer {
    pub const fn new() -> Self {
        Self {
            previous: [false; BUTTON_COUNT],
        }
    }

    /// Feed this tick's levels (`true` = pressed) and get the edges.
    pub fn update(&mut self, levels: [bool; BUTTON_COUNT]) -> ButtonEdges {
        let mut pressed = [false; BUTTON_COUNT];
        for (i, &down) in levels.iter().enumerate() {
            pressed[i] = down && !self.previous[i];
        }
        self.previous = levels;
        ButtonEdges {
            pressed,
            held: levels,
        }
    }
}

/// One reading of the two joystick channels, full 16-bit range, centre at rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct JoystickSample {
    pub x: u16,
    pub y: u16,
}

impl JoystickSample {
    pub const CENTER: Self = Self {
        x: u16::MAX / 2,
        y: u16::MAX / 2,
    };

    /// Threshold both channels against the dead bands. How far the stick is
    /// pushed beyond a bound does not matter.
    pub fn movement(&self) -> MoveInput {
        MoveInput {
            forward: deadband(self.y),
            strafe: deadband(self.x),
        }
    }
}

fn deadband(value: u16) -> Axis {
    if value < JOY_LOW {
        Axis::Negative
    } else if value > JOY_HIGH {
        Axis::Positive
    } else {
        Axis::Neutral
    }
}

fn axis(negative: bool, positive: bool) -> Axis {
    match (negative, positive) {
        (true, false) => Axis::Negative,
        (false, true) => Axis::Positive,
        _ => Axis::Neutral,
    }
}
