//! The control loop and the collaborators it talks to.
//!
//! One tick, in order: buttons, heading, game update, LED flush, UI update,
//! telemetry, fixed sleep. Nothing runs concurrently and a tick always
//! finishes before the next one starts.

use embedded_hal_async::delay::DelayNs;
use smart_leds::{SmartLedsWriteAsync, RGB8};

use crate::config::TICK_MS;
use crate::engine::Engine;
use crate::error::Error;
use crate::heading::HeadingSample;
use crate::input::{JoystickSample, BUTTON_COUNT};
use crate::telemetry::{publish_snapshot, Publish};
use crate::ui::StatusDisplay;

/// Source of horizontal magnetic field readings.
#[allow(async_fn_in_trait)]
pub trait Magnetometer {
    type Error;
    async fn read(&mut self) -> Result<HeadingSample, Self::Error>;
}

/// Raw button levels, `true` while pressed, in [`crate::input::Button`] order.
pub trait ButtonLines {
    fn levels(&mut self) -> [bool; BUTTON_COUNT];
}

/// Analog stick. Boards without one use [`NoJoystick`].
#[allow(async_fn_in_trait)]
pub trait Joystick {
    async fn read(&mut self) -> Option<JoystickSample>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoJoystick;

impl Joystick for NoJoystick {
    async fn read(&mut self) -> Option<JoystickSample> {
        None
    }
}

/// Hardware the loop reads from and draws to. The LED ring is any
/// `smart-leds` async driver taking `RGB8`.
pub struct Board<M, B, J, L, D> {
    pub magnetometer: M,
    pub buttons: B,
    pub joystick: J,
    pub leds: L,
    pub display: D,
}

pub struct Runner<M, B, J, L, D, P, T> {
    engine: Engine,
    board: Board<M, B, J, L, D>,
    publisher: P,
    delay: T,
}

impl<M, B, J, L, D, P, T> Runner<M, B, J, L, D, P, T>
where
    M: Magnetometer,
    B: ButtonLines,
    J: Joystick,
    L: SmartLedsWriteAsync<Color = RGB8>,
    D: StatusDisplay,
    P: Publish,
    T: DelayNs,
{
    pub fn new(engine: Engine, board: Board<M, B, J, L, D>, publisher: P, delay: T) -> Self {
        Self {
            engine,
            board,
            publisher,
            delay,
        }
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn board(&self) -> &Board<M, B, J, L, D> {
        &self.board
    }

    pub fn publisher(&self) -> &P {
        &self.publisher
    }

    /// Run one tick. A failed magnetometer read aborts the tick before
    /// anything is drawn and is returned to the caller.
    pub async fn tick(&mut self) -> Result<(), Error<M::Error>> {
        let levels = self.board.buttons.levels();
        self.engine.sample_buttons(levels);

        let sample = self
            .board
            .magnetometer
            .read()
            .await
            .map_err(Error::Sensor)?;
        self.engine.sample_heading(sample);
        let joystick = self.board.joystick.read().await;

        let frame = self.engine.update_game(joystick);
        let written = self.board.leds.write(frame.colors().iter().copied()).await;
        if written.is_err() {
            warn!("led strip write failed");
        }

        self.engine.update_ui(&mut self.board.display).await;

        let snapshot = self.engine.snapshot();
        publish_snapshot(&mut self.publisher, &snapshot).await;

        self.delay.delay_ms(TICK_MS).await;
        Ok(())
    }

    /// Tick until the magnetometer fails, then hand the error back.
    pub async fn run(mut self) -> Error<M::Error> {
        loop {
            if let Err(e) = self.tick().await {
                error!("magnetometer read failed, stopping");
                return e;
            }
        }
    }
}
