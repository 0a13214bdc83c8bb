//! Opening the HAT through the Linux spidev and GPIO character devices.
//!
//! Chip select is driven by the spidev node itself (CE0 on BCM 8), so only
//! BUSY, DC, RST and PWR are requested from the GPIO chip.

use anyhow::{Context, Result};
use linux_embedded_hal::{
    gpio_cdev::{Chip, LineRequestFlags},
    spidev::{SpiModeFlags, SpidevOptions},
    CdevPin, Delay, SpidevDevice,
};

use crate::config::Config;
use crate::epd2in13bc::Epd2in13bc;

/// The panel driver wired to Linux devices
pub type HatDriver = Epd2in13bc<SpidevDevice, CdevPin, CdevPin, CdevPin, CdevPin, Delay>;

const CONSUMER: &str = "epaper-badge";

/// Open the SPI node and request the control lines named in `config`
pub fn open(config: &Config) -> Result<HatDriver> {
    log::debug!(
        "Opening {} at {} Hz",
        config.spi_device.display(),
        config.spi_hz
    );
    let mut spi = SpidevDevice::open(&config.spi_device)
        .with_context(|| format!("opening {}", config.spi_device.display()))?;
    spi.0
        .configure(
            &SpidevOptions::new()
                .bits_per_word(8)
                .max_speed_hz(config.spi_hz)
                .mode(SpiModeFlags::SPI_MODE_0)
                .build(),
        )
        .with_context(|| format!("configuring {}", config.spi_device.display()))?;

    let mut chip = Chip::new(&config.gpio_chip)
        .with_context(|| format!("opening {}", config.gpio_chip.display()))?;
    let pins = config.pins;

    let busy = request(&mut chip, pins.busy, LineRequestFlags::INPUT, "busy")?;
    let dc = request(&mut chip, pins.dc, LineRequestFlags::OUTPUT, "dc")?;
    let rst = request(&mut chip, pins.rst, LineRequestFlags::OUTPUT, "rst")?;
    let pwr = request(&mut chip, pins.pwr, LineRequestFlags::OUTPUT, "pwr")?;

    Ok(Epd2in13bc::new(spi, busy, dc, rst, pwr, Delay))
}

fn request(chip: &mut Chip, offset: u32, flags: LineRequestFlags, role: &str) -> Result<CdevPin> {
    let handle = chip
        .get_line(offset)
        .and_then(|line| line.request(flags, 0, CONSUMER))
        .with_context(|| format!("requesting {role} line {offset}"))?;
    CdevPin::new(handle).with_context(|| format!("wrapping {role} line {offset}"))
}
