//! UI axis: the small status display and the centering toggle.

use crate::heading::{Calibration, Heading};
use crate::input::{Button, ButtonEdges};

/// A monochrome pixel display.
#[allow(async_fn_in_trait)]
pub trait StatusDisplay {
    fn width(&self) -> u8;
    fn height(&self) -> u8;
    fn pixel(&self, x: u8, y: u8) -> bool;
    fn set_pixel(&mut self, x: u8, y: u8, on: bool);
    fn clear(&mut self);
    /// Push the buffered pixels to the hardware.
    async fn flush(&mut self);
}

/// Pixel buffer for displays up to 32 pixels wide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bitmap<const W: usize, const H: usize> {
    rows: [u32; H],
}

impl<const W: usize, const H: usize> Default for Bitmap<W, H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const W: usize, const H: usize> Bitmap<W, H> {
    pub const fn new() -> Self {
        Self { rows: [0; H] }
    }

    pub fn get(&self, x: u8, y: u8) -> bool {
        let (x, y) = (x as usize, y as usize);
        x < W && y < H && self.rows[y] & (1 << x) != 0
    }

    pub fn set(&mut self, x: u8, y: u8, on: bool) {
        let (x, y) = (x as usize, y as usize);
        if x >= W || y >= H {
            return;
        }
        if on {
            self.rows[y] |= 1 << x;
        } else {
            self.rows[y] &= !(1 << x);
        }
    }

    pub fn clear(&mut self) {
        self.rows = [0; H];
    }

    /// Bit `x` set for each lit pixel in row `y`.
    pub fn row(&self, y: usize) -> u32 {
        self.rows[y]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UiMode {
    Idle,
    Centering,
}

/// Screen saver pixel that bounces off the display edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Bouncer {
    x: i16,
    y: i16,
    dx: i16,
    dy: i16,
}

impl Bouncer {
    const fn new() -> Self {
        Self {
            x: 0,
            y: 0,
            dx: 1,
            dy: 1,
        }
    }

    fn advance(&mut self, width: u8, height: u8) {
        let (max_x, max_y) = (width as i16 - 1, height as i16 - 1);
        self.x = (self.x + self.dx).clamp(0, max_x);
        self.y = (self.y + self.dy).clamp(0, max_y);
        if self.x == 0 || self.x == max_x {
            self.dx = -self.dx;
        }
        if self.y == 0 || self.y == max_y {
            self.dy = -self.dy;
        }
    }
}

/// State of the UI axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusUi {
    mode: UiMode,
    bouncer: Bouncer,
}

impl Default for StatusUi {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusUi {
    pub const fn new() -> Self {
        Self {
            mode: UiMode::Idle,
            bouncer: Bouncer::new(),
        }
    }

    pub fn mode(&self) -> UiMode {
        self.mode
    }

    /// Run the UI for one tick.
    ///
    /// The centering button toggles between idle and centering; leaving
    /// centering makes the current heading the new forward direction.
    pub async fn update<D: StatusDisplay>(
        &mut self,
        display: &mut D,
        edges: &ButtonEdges,
        heading: &Heading,
        calibration: &mut Calibration,
    ) {
        match self.mode {
            UiMode::Idle => {
                // Toggle the pixel under the bouncer, leaving a trail
                let (x, y) = (self.bouncer.x as u8, self.bouncer.y as u8);
                let on = display.pixel(x, y);
                display.set_pixel(x, y, !on);
                display.flush().await;
                self.bouncer.advance(display.width(), display.height());

                if edges.pressed(Button::Mid) {
                    info!("ui: centering");
                    self.mode = UiMode::Centering;
                }
            }
            UiMode::Centering => {
                display.clear();
                draw_crosshair(display);
                display.flush().await;

                if edges.pressed(Button::Mid) {
                    display.clear();
                    display.flush().await;
                    calibration.center(heading);
                    info!("ui: idle");
                    self.mode = UiMode::Idle;
                }
            }
        }
    }
}

fn draw_crosshair<D: StatusDisplay>(display: &mut D) {
    let (cx, cy) = (display.width() / 2, display.height() / 2);
    for d in 0..=2u8 {
        display.set_pixel(cx.saturating_sub(d), cy, true);
        display.set_pixel(cx + d, cy, true);
        display.set_pixel(cx, cy.saturating_sub(d), true);
        display.set_pixel(cx, cy + d, true);
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::heading::HeadingSample;
    use crate::input::{Debouncer, BUTTON_COUNT};
    use embassy_futures::block_on;

    /// 5x5 display that counts flushes.
    #[derive(Default)]
    pub struct MockDisplay {
        pub bitmap: Bitmap<5, 5>,
        pub flushes: usize,
    }

    impl StatusDisplay for MockDisplay {
        fn width(&self) -> u8 {
            5
        }
        fn height(&self) -> u8 {
            5
        }
        fn pixel(&self, x: u8, y: u8) -> bool {
            self.bitmap.get(x, y)
        }
        fn set_pixel(&mut self, x: u8, y: u8, on: bool) {
            self.bitmap.set(x, y, on)
        }
        fn clear(&mut self) {
            self.bitmap.clear()
        }
        async fn flush(&mut self) {
            self.flushes += 1;
        }
    }

    const MID: [bool; BUTTON_COUNT] = [true, false, false, false, false];
    const NONE: [bool; BUTTON_COUNT] = [false; BUTTON_COUNT];

    #[test]
    fn test_bitmap_bounds() {
        let mut bitmap = Bitmap::<5, 5>::new();
        bitmap.set(4, 4, true);
        bitmap.set(5, 0, true);
        assert!(bitmap.get(4, 4));
        assert!(!bitmap.get(5, 0));
        assert_eq!(bitmap.row(4), 1 << 4);
        bitmap.set(4, 4, false);
        assert_eq!(bitmap.row(4), 0);
    }

    #[test]
    fn test_bouncer_stays_on_screen() {
        let mut bouncer = Bouncer::new();
        for _ in 0..100 {
            bouncer.advance(5, 5);
            assert!((0..5).contains(&bouncer.x));
            assert!((0..5).contains(&bouncer.y));
        }
    }

    #[test]
    fn test_centering_round_trip() {
        let mut ui = StatusUi::new();
        let mut display = MockDisplay::default();
        let mut debouncer = Debouncer::new();
        let mut calibration = Calibration::default();
        let sample = HeadingSample::new(0, 100);
        let heading = calibration.resolve(sample);

        // Idle draws the bouncing pixel
        block_on(ui.update(&mut display, &debouncer.update(NONE), &heading, &mut calibration));
        assert!(display.bitmap.get(0, 0));
        assert_eq!(ui.mode(), UiMode::Idle);

        block_on(ui.update(&mut display, &debouncer.update(MID), &heading, &mut calibration));
        assert_eq!(ui.mode(), UiMode::Centering);
        assert_eq!(calibration, Calibration::default());

        // Holding the button is not a second press
        block_on(ui.update(&mut display, &debouncer.update(MID), &heading, &mut calibration));
        assert_eq!(ui.mode(), UiMode::Centering);
        assert!(display.bitmap.get(2, 2));

        block_on(ui.update(&mut display, &debouncer.update(NONE), &heading, &mut calibration));
        block_on(ui.update(&mut display, &debouncer.update(MID), &heading, &mut calibration));
        assert_eq!(ui.mode(), UiMode::Idle);
        assert_eq!(display.bitmap, Bitmap::new());
        assert_eq!(calibration.resolve(sample).ring_index, 14);
    }
}
