//! Display interface using SPI
use display_interface::DisplayError;
use embedded_hal::{
    delay::DelayNs,
    digital::{InputPin, OutputPin},
    spi::SpiDevice,
};

const RESET_HIGH_MS: u32 = 200;
const RESET_LOW_MS: u32 = 5;
const BUSY_POLL_MS: u32 = 100;
const BUSY_WAIT_TIMEOUT_MS: u32 = 30_000;

/// Largest single write the Linux spidev driver accepts with its default `bufsiz`
const SPI_CHUNK_SIZE: usize = 4096;

/// The connection interface of the Waveshare HAT
///
pub struct DisplayInterface<SPI, BSY, DC, RST, PWR, DELAY> {
    /// SPI device, chip select handled by the device
    spi: SPI,
    /// Low while the controller is busy
    busy: BSY,
    /// Data/Command Control Pin (High for data, Low for command)
    dc: DC,
    /// Pin for Reseting
    rst: RST,
    /// Panel power switch
    pwr: PWR,
    /// Delay provider for reset and busy polling
    pub(crate) delay: DELAY,
}

impl<SPI, BSY, DC, RST, PWR, DELAY> DisplayInterface<SPI, BSY, DC, RST, PWR, DELAY> {
    /// Bundle the bus and pins
    pub fn new(spi: SPI, busy: BSY, dc: DC, rst: RST, pwr: PWR, delay: DELAY) -> Self {
        DisplayInterface {
            spi,
            busy,
            dc,
            rst,
            pwr,
            delay,
        }
    }
}

impl<SPI, BSY, DC, RST, PWR, DELAY> DisplayInterface<SPI, BSY, DC, RST, PWR, DELAY>
where
    SPI: SpiDevice,
    BSY: InputPin,
    DC: OutputPin,
    RST: OutputPin,
    PWR: OutputPin,
    DELAY: DelayNs,
{
    /// Switch panel power on, the first half of the HAT's module init
    pub(crate) fn power_on(&mut self) -> Result<(), DisplayError> {
        self.pwr.set_high().map_err(|_| DisplayError::RSError)
    }

    /// Drive every control line low and cut panel power
    pub(crate) fn module_exit(&mut self) -> Result<(), DisplayError> {
        log::debug!("Releasing display module lines");
        self.rst.set_low().map_err(|_| DisplayError::RSError)?;
        self.dc.set_low().map_err(|_| DisplayError::DCError)?;
        self.pwr.set_low().map_err(|_| DisplayError::RSError)
    }

    /// Basic function for sending commands
    pub(crate) fn cmd(&mut self, command: u8) -> Result<(), DisplayError> {
        // low for commands
        self.dc.set_low().map_err(|_| DisplayError::DCError)?;

        match self.spi.write(&[command]) {
            Ok(_) => Ok(()),
            Err(e) => {
                log::error!("SPI write error for command 0x{:02X}: {:?}", command, e);
                Err(DisplayError::BusWriteError)
            }
        }
    }

    /// Basic function for sending an array of u8-values of data over spi
    pub(crate) fn data(&mut self, data: &[u8]) -> Result<(), DisplayError> {
        // high for data
        self.dc.set_high().map_err(|_| DisplayError::DCError)?;
        for chunk in data.chunks(SPI_CHUNK_SIZE) {
            self.spi
                .write(chunk)
                .map_err(|_| DisplayError::BusWriteError)?;
        }
        Ok(())
    }

    /// Basic function for sending a command and the data belonging to it.
    pub(crate) fn cmd_with_data(&mut self, command: u8, data: &[u8]) -> Result<(), DisplayError> {
        self.cmd(command)?;
        self.data(data)
    }

    /// Send the same byte `repetitions` times, used to fill a whole plane
    pub(crate) fn data_x_times(&mut self, val: u8, repetitions: usize) -> Result<(), DisplayError> {
        // high for data
        self.dc.set_high().map_err(|_| DisplayError::DCError)?;

        let buffer = [val; SPI_CHUNK_SIZE];
        let full_chunks = repetitions / SPI_CHUNK_SIZE;
        let remainder = repetitions % SPI_CHUNK_SIZE;

        for _ in 0..full_chunks {
            self.spi
                .write(&buffer)
                .map_err(|_| DisplayError::BusWriteError)?;
        }
        if remainder > 0 {
            self.spi
                .write(&buffer[..remainder])
                .map_err(|_| DisplayError::BusWriteError)?;
        }

        log::debug!("Completed sending {} bytes of 0x{:02X}", repetitions, val);
        Ok(())
    }

    /// Wait for the busy pin to go HIGH again, polling every 100 ms with a safety timeout
    pub(crate) fn wait_until_idle(&mut self) {
        log::debug!("e-Paper busy");

        let mut waited_ms = 0u32;
        while waited_ms < BUSY_WAIT_TIMEOUT_MS {
            match self.busy.is_high() {
                Ok(true) => {
                    log::debug!("e-Paper busy release");
                    return;
                }
                Ok(false) => {
                    self.delay.delay_ms(BUSY_POLL_MS);
                    waited_ms += BUSY_POLL_MS;
                }
                Err(_) => {
                    // Error reading pin - bail out to avoid an infinite loop
                    log::error!("Error reading BUSY pin state - assuming not busy to continue");
                    return;
                }
            }
        }

        // Don't hang the program - just continue and hope for the best
        log::error!(
            "TIMEOUT waiting for BUSY pin to go HIGH after {} ms",
            BUSY_WAIT_TIMEOUT_MS
        );
    }

    /// Hardware reset pulse
    pub(crate) fn reset(&mut self) -> Result<(), DisplayError> {
        self.rst.set_high().map_err(|_| DisplayError::RSError)?;
        self.delay.delay_ms(RESET_HIGH_MS);
        self.rst.set_low().map_err(|_| DisplayError::RSError)?;
        self.delay.delay_ms(RESET_LOW_MS);
        self.rst.set_high().map_err(|_| DisplayError::RSError)?;
        self.delay.delay_ms(RESET_HIGH_MS);
        Ok(())
    }
}
