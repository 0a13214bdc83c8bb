//! 2.13" B/C Display Driver Implementation
//!
//! ## Critical Implementation Details
//!
//! ### BUSY polarity
//!
//! Unlike the SSD168x family, this controller pulls BUSY **low** while it works.
//! `DisplayInterface::wait_until_idle` polls until the pin reads high again.
//!
//! ### Refresh time
//!
//! A full black/red refresh takes roughly 15 seconds and blocks inside
//! `display()` and `clear()` until BUSY is released.
//!
//! ### Deep sleep
//!
//! After `DEEP_SLEEP` the controller only wakes up through a hardware reset,
//! which `init()` always performs first.

pub use display_interface::DisplayError;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal::spi::SpiDevice;

use crate::driver::EpaperDriver;
use crate::epd2in13bc::interface::DisplayInterface;
use crate::epd2in13bc::{cmd::Cmd, flag::Flag, HEIGHT, WIDTH};

/// Time the controller needs after the deep sleep command before lines may be released
const DEEP_SLEEP_SETTLE_MS: u32 = 2000;

/// 2.13" B/C E-Paper Display Driver
///
/// ## Type Parameters
///
/// - `SPI` - SPI device for communication
/// - `BSY` - BUSY input pin (LOW when display is busy)
/// - `DC` - Data/Command output pin
/// - `RST` - Reset output pin
/// - `PWR` - Panel power output pin
/// - `DELAY` - Delay provider for timing
pub struct Epd2in13bc<SPI, BSY, DC, RST, PWR, DELAY> {
    /// The display interface
    pub interface: DisplayInterface<SPI, BSY, DC, RST, PWR, DELAY>,
}

impl<SPI, BSY, DC, RST, PWR, DELAY> Epd2in13bc<SPI, BSY, DC, RST, PWR, DELAY>
where
    SPI: SpiDevice,
    BSY: InputPin,
    DC: OutputPin,
    RST: OutputPin,
    PWR: OutputPin,
    DELAY: DelayNs,
{
    /// Create the driver without touching the hardware
    pub fn new(spi: SPI, busy: BSY, dc: DC, rst: RST, pwr: PWR, delay: DELAY) -> Self {
        let interface = DisplayInterface::new(spi, busy, dc, rst, pwr, delay);
        Epd2in13bc { interface }
    }

    /// Bytes per plane for this panel
    const PLANE_LEN: usize = epd_waveshare::buffer_len(WIDTH as usize, HEIGHT as usize);

    /// Send one plane to controller RAM
    fn write_plane(&mut self, command: u8, plane: &[u8]) -> Result<(), DisplayError> {
        if plane.len() != Self::PLANE_LEN {
            log::error!(
                "Plane buffer has {} bytes, expected {}",
                plane.len(),
                Self::PLANE_LEN
            );
            return Err(DisplayError::InvalidFormatError);
        }
        self.interface.cmd_with_data(command, plane)?;
        self.interface.cmd(Cmd::PARTIAL_OUT)
    }

    /// Fill one plane of controller RAM with the same byte
    fn fill_plane(&mut self, command: u8, value: u8) -> Result<(), DisplayError> {
        self.interface.cmd(command)?;
        self.interface.data_x_times(value, Self::PLANE_LEN)?;
        self.interface.cmd(Cmd::PARTIAL_OUT)
    }

    /// Trigger a refresh and wait for BUSY to be released
    fn refresh(&mut self) -> Result<(), DisplayError> {
        self.interface.cmd(Cmd::DISPLAY_REFRESH)?;
        self.interface.wait_until_idle();
        Ok(())
    }
}

impl<SPI, BSY, DC, RST, PWR, DELAY> EpaperDriver for Epd2in13bc<SPI, BSY, DC, RST, PWR, DELAY>
where
    SPI: SpiDevice,
    BSY: InputPin,
    DC: OutputPin,
    RST: OutputPin,
    PWR: OutputPin,
    DELAY: DelayNs,
{
    fn width(&self) -> u32 {
        WIDTH
    }

    fn height(&self) -> u32 {
        HEIGHT
    }

    /// # Initialization Sequence
    ///
    /// 1. **Panel power** - PWR pin HIGH
    /// 2. **Hardware Reset** - RST HIGH → LOW → HIGH
    /// 3. **Booster Soft Start** (0x06)
    /// 4. **Power On** (0x04), wait for BUSY
    /// 5. **Panel Setting** (0x00) - B/W/R mode, LUT from OTP
    /// 6. **VCOM and Data Interval** (0x50)
    /// 7. **Resolution** (0x61) - 104 x 212
    fn init(&mut self) -> Result<(), DisplayError> {
        log::info!("Initializing 2.13\" B/C e-paper display");

        self.interface.power_on()?;
        self.interface.reset()?;

        self.interface.cmd_with_data(
            Cmd::BOOSTER_SOFT_START,
            &[
                Flag::BOOSTER_SOFT_START_PHASE_A,
                Flag::BOOSTER_SOFT_START_PHASE_B,
                Flag::BOOSTER_SOFT_START_PHASE_C,
            ],
        )?;
        self.interface.cmd(Cmd::POWER_ON)?;
        self.interface.wait_until_idle();

        self.interface
            .cmd_with_data(Cmd::PANEL_SETTING, &[Flag::PANEL_SETTING_BWR_OTP])?;
        self.interface.cmd_with_data(
            Cmd::VCOM_AND_DATA_INTERVAL_SETTING,
            &[Flag::VCOM_DATA_INTERVAL_WHITE_BORDER],
        )?;
        self.interface.cmd_with_data(
            Cmd::RESOLUTION_SETTING,
            &[
                (WIDTH & 0xFF) as u8,
                (HEIGHT >> 8) as u8,
                (HEIGHT & 0xFF) as u8,
            ],
        )?;

        Ok(())
    }

    fn clear(&mut self) -> Result<(), DisplayError> {
        log::info!("Clearing both planes to white");
        self.fill_plane(Cmd::DATA_START_TRANSMISSION_1, Flag::RAM_BYTE_ALL_WHITE)?;
        self.fill_plane(Cmd::DATA_START_TRANSMISSION_2, Flag::RAM_BYTE_ALL_WHITE)?;
        self.refresh()
    }

    fn display(&mut self, black: &[u8], red: &[u8]) -> Result<(), DisplayError> {
        log::info!("Writing black and red planes");
        self.write_plane(Cmd::DATA_START_TRANSMISSION_1, black)?;
        self.write_plane(Cmd::DATA_START_TRANSMISSION_2, red)?;
        self.refresh()
    }

    fn sleep(&mut self) -> Result<(), DisplayError> {
        log::info!("Putting display into deep sleep mode");
        self.interface.cmd(Cmd::POWER_OFF)?;
        self.interface.wait_until_idle();
        self.interface
            .cmd_with_data(Cmd::DEEP_SLEEP, &[Flag::DEEP_SLEEP_CHECK_CODE])?;
        self.interface.delay.delay_ms(DEEP_SLEEP_SETTLE_MS);
        Ok(())
    }

    fn module_exit(&mut self) -> Result<(), DisplayError> {
        self.interface.module_exit()
    }
}
