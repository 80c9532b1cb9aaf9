#![no_std]
#![no_main]

use defmt::{info, warn};
use defmt_rtt as _;
use embassy_executor::Spawner;
use embassy_nrf::{self as hal, twim::Twim};
use embassy_nrf_ws2812_pwm::Ws2812;
use embassy_time::{Delay, Timer};
use hal::gpio::{Input, Level, Output, OutputDrive, Pull};
use hal::peripherals::{TWISPI0, UARTE0};
use hal::{rng, saadc, twim, uarte};
use lsm303agr::interface::I2cInterface;
use lsm303agr::mode::MagContinuous;
use lsm303agr::{Lsm303agr, MagMode, MagOutputDataRate};
use panic_probe as _;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use static_cell::StaticCell;

use ring_compass::config::NUM_LEDS;
use ring_compass::input::{JoystickSample, BUTTON_COUNT};
use ring_compass::mqtt::{ClientId, MqttPublisher, Transport};
use ring_compass::runner::{Board, ButtonLines, Joystick, Magnetometer};
use ring_compass::ui::{Bitmap, StatusDisplay};
use ring_compass::{Config, Engine, HeadingSample, Runner};

hal::bind_interrupts!(struct Irqs {
    TWISPI0 => twim::InterruptHandler<TWISPI0>;
    SAADC => saadc::InterruptHandler;
    RNG => rng::InterruptHandler<hal::peripherals::RNG>;
    UARTE0 => uarte::InterruptHandler<UARTE0>;
});

/// PWM words for the ring: one per bit, 24 bits per LED.
const LED_WORDS: usize = NUM_LEDS * 24;
static LED_BUFFER: StaticCell<[u16; LED_WORDS]> = StaticCell::new();
static TWIM_BUFFER: StaticCell<[u8; 16]> = StaticCell::new();

/// LSM303AGR magnetometer in continuous mode.
struct Compass {
    sensor: Lsm303agr<I2cInterface<Twim<'static>>, MagContinuous>,
}

impl Magnetometer for Compass {
    type Error = lsm303agr::Error<twim::Error>;

    async fn read(&mut self) -> Result<HeadingSample, Self::Error> {
        let field = self.sensor.magnetic_field().await?;
        Ok(HeadingSample::new(field.x_nt(), field.y_nt()))
    }
}

/// micro:bit buttons A and B plus three edge-connector buttons, active low.
struct Buttons<'d> {
    lines: [Input<'d>; BUTTON_COUNT],
}

impl ButtonLines for Buttons<'_> {
    fn levels(&mut self) -> [bool; BUTTON_COUNT] {
        core::array::from_fn(|i| self.lines[i].is_low())
    }
}

/// Analog stick on the P0 and P1 edge pads.
struct Stick<'d> {
    adc: saadc::Saadc<'d, 2>,
}

impl Joystick for Stick<'_> {
    async fn read(&mut self) -> Option<JoystickSample> {
        let mut buf = [0i16; 2];
        self.adc.sample(&mut buf).await;
        // 12-bit conversions widened to the 16-bit scale
        let scale = |raw: i16| (raw.clamp(0, 4095) as u16) << 4;
        Some(JoystickSample {
            x: scale(buf[0]),
            y: scale(buf[1]),
        })
    }
}

/// The 5x5 matrix, scanned once per flush.
struct LedMatrix<'d> {
    rows: [Output<'d>; 5],
    cols: [Output<'d>; 5],
    bitmap: Bitmap<5, 5>,
}

impl StatusDisplay for LedMatrix<'_> {
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
        self.bitmap.set(x, y, on);
    }

    fn clear(&mut self) {
        self.bitmap.clear();
    }

    async fn flush(&mut self) {
        for (y, row) in self.rows.iter_mut().enumerate() {
            let bits = self.bitmap.row(y);
            for (x, col) in self.cols.iter_mut().enumerate() {
                // Columns sink current: low lights the LED
                col.set_level(if bits & (1 << x) != 0 {
                    Level::Low
                } else {
                    Level::High
                });
            }
            row.set_high();
            Timer::after_millis(1).await;
            row.set_low();
        }
    }
}

/// Transmit-only serial link to the network bridge.
struct Serial<'d> {
    uart: uarte::UarteTx<'d>,
}

impl Transport for Serial<'_> {
    type Error = uarte::Error;

    async fn write(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
        self.uart.write(bytes).await
    }
}

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    info!("initializing ring-compass...");
    let dp = hal::init(Default::default());

    let mut seed = [0u8; 16];
    let mut hw_rng = rng::Rng::new(dp.RNG, Irqs);
    hw_rng.fill_bytes(&mut seed).await;
    let (game_seed, id_seed) = seed.split_at(8);
    let mut game_bytes = [0u8; 8];
    game_bytes.copy_from_slice(game_seed);
    let mut id_bytes = [0u8; 8];
    id_bytes.copy_from_slice(id_seed);
    let config = Config::default().with_seed(u64::from_le_bytes(game_bytes));

    // Magnetometer over the internal I2C bus
    let twim0 = Twim::new(
        dp.TWISPI0,
        Irqs,
        dp.P0_16,
        dp.P0_08,
        twim::Config::default(),
        TWIM_BUFFER.init([0; 16]),
    );
    let mut sensor = Lsm303agr::new_with_i2c(twim0);
    match sensor.magnetometer_id().await {
        Ok(_) => info!("magnetometer id obtained"),
        Err(_) => warn!("error getting magnetometer id"),
    }
    if let Err(e) = sensor.init().await {
        defmt::panic!("sensor init failed: {}", defmt::Debug2Format(&e));
    }
    if let Err(e) = sensor
        .set_mag_mode_and_odr(&mut Delay, MagMode::HighResolution, MagOutputDataRate::Hz50)
        .await
    {
        defmt::panic!("magnetometer config failed: {}", defmt::Debug2Format(&e));
    }
    let Ok(sensor) = sensor.into_mag_continuous().await else {
        panic!("failed to enter continuous mode");
    };

    // LED ring data line
    let ring: Ws2812<LED_WORDS> = Ws2812::new(dp.PWM0, dp.P0_13, LED_BUFFER.init([0; LED_WORDS]));

    let buttons = Buttons {
        lines: [
            Input::new(dp.P0_14, Pull::Up),
            Input::new(dp.P0_23, Pull::Up),
            Input::new(dp.P0_12, Pull::Up),
            Input::new(dp.P0_09, Pull::Up),
            Input::new(dp.P0_10, Pull::Up),
        ],
    };

    let mut adc = saadc::Saadc::new(
        dp.SAADC,
        Irqs,
        saadc::Config::default(),
        [
            saadc::ChannelConfig::single_ended(dp.P0_02),
            saadc::ChannelConfig::single_ended(dp.P0_03),
        ],
    );
    adc.calibrate().await;

    let matrix = LedMatrix {
        rows: [
            Output::new(dp.P0_21, Level::Low, OutputDrive::Standard),
            Output::new(dp.P0_22, Level::Low, OutputDrive::Standard),
            Output::new(dp.P0_15, Level::Low, OutputDrive::Standard),
            Output::new(dp.P0_24, Level::Low, OutputDrive::Standard),
            Output::new(dp.P0_19, Level::Low, OutputDrive::Standard),
        ],
        cols: [
            Output::new(dp.P0_28, Level::High, OutputDrive::Standard),
            Output::new(dp.P0_11, Level::High, OutputDrive::Standard),
            Output::new(dp.P0_31, Level::High, OutputDrive::Standard),
            Output::new(dp.P1_05, Level::High, OutputDrive::Standard),
            Output::new(dp.P0_30, Level::High, OutputDrive::Standard),
        ],
        bitmap: Bitmap::new(),
    };

    // 115200 8N1
    let uart = uarte::UarteTx::new(dp.UARTE0, Irqs, dp.P0_17, uarte::Config::default());
    let mut publisher = MqttPublisher::new(Serial { uart });
    let client_id = ClientId::random(&mut Pcg32::seed_from_u64(u64::from_le_bytes(id_bytes)));
    if publisher
        .connect(&client_id, config.mqtt_user, config.mqtt_password)
        .await
        .is_err()
    {
        warn!("mqtt connect failed, publishing anyway");
    }

    let board = Board {
        magnetometer: Compass { sensor },
        buttons,
        joystick: Stick { adc },
        leds: ring,
        display: matrix,
    };
    info!("running {}", config.game);
    let runner = Runner::new(Engine::new(config), board, publisher, Delay);
    let err = runner.run().await;
    defmt::panic!("sensor failure: {}", defmt::Debug2Format(&err));
}
