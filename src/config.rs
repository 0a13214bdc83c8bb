//! Runtime configuration.
//!
//! Defaults match the Waveshare HAT on a Raspberry Pi; every field can be
//! overridden through an `EPD_*` environment variable.

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::epd2in13bc::Pins;

/// Name of the TrueType collection in the resource directory
pub const FONT_FILE: &str = "Font.ttc";

/// Text printed on the name badge
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Badge {
    /// Large line on the black plane
    pub name: String,
    /// Line knocked out of the red field
    pub callsign: String,
}

impl Default for Badge {
    fn default() -> Self {
        Self {
            name: "Brad Brown".into(),
            callsign: "W5BUB".into(),
        }
    }
}

/// Everything a run needs besides the routine name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Directory holding `Font.ttc` and the bitmaps
    pub resource_dir: PathBuf,
    /// spidev node the HAT is wired to
    pub spi_device: PathBuf,
    /// SPI clock
    pub spi_hz: u32,
    /// GPIO character device carrying the control lines
    pub gpio_chip: PathBuf,
    /// Control line offsets
    pub pins: Pins,
    /// Wait after a clear
    pub settle_after_clear: Duration,
    /// Wait after a submission
    pub settle_after_submit: Duration,
    /// Clear the panel as part of initialization
    pub clear_on_init: bool,
    /// Badge text
    pub badge: Badge,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            resource_dir: PathBuf::from("pic"),
            spi_device: PathBuf::from("/dev/spidev0.0"),
            spi_hz: 4_000_000,
            gpio_chip: PathBuf::from("/dev/gpiochip0"),
            pins: Pins::default(),
            settle_after_clear: Duration::from_secs(1),
            settle_after_submit: Duration::from_secs(2),
            clear_on_init: false,
            badge: Badge::default(),
        }
    }
}

impl Config {
    /// Defaults with zero settle time, for driving a mock
    pub fn without_settle() -> Self {
        Self {
            settle_after_clear: Duration::ZERO,
            settle_after_submit: Duration::ZERO,
            ..Self::default()
        }
    }

    /// Defaults overridden by the process environment
    pub fn from_env() -> Result<Self> {
        let mut config = Self::from_lookup(|key| std::env::var(key).ok())?;
        if std::env::var_os("EPD_RESOURCE_DIR").is_none() {
            if let Some(dir) = beside_executable() {
                config.resource_dir = dir;
            }
        }
        Ok(config)
    }

    /// Defaults overridden by whatever `lookup` returns for each `EPD_*` key
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(dir) = lookup("EPD_RESOURCE_DIR") {
            config.resource_dir = dir.into();
        }
        if let Some(dev) = lookup("EPD_SPI_DEVICE") {
            config.spi_device = dev.into();
        }
        if let Some(hz) = lookup("EPD_SPI_HZ") {
            config.spi_hz = parse("EPD_SPI_HZ", &hz)?;
        }
        if let Some(chip) = lookup("EPD_GPIO_CHIP") {
            config.gpio_chip = chip.into();
        }
        if let Some(ms) = lookup("EPD_SETTLE_CLEAR_MS") {
            config.settle_after_clear = Duration::from_millis(parse("EPD_SETTLE_CLEAR_MS", &ms)?);
        }
        if let Some(ms) = lookup("EPD_SETTLE_SUBMIT_MS") {
            config.settle_after_submit =
                Duration::from_millis(parse("EPD_SETTLE_SUBMIT_MS", &ms)?);
        }
        if let Some(flag) = lookup("EPD_CLEAR_ON_INIT") {
            config.clear_on_init = parse("EPD_CLEAR_ON_INIT", &flag)?;
        }
        if let Some(name) = lookup("EPD_BADGE_NAME") {
            config.badge.name = name;
        }
        if let Some(callsign) = lookup("EPD_BADGE_CALLSIGN") {
            config.badge.callsign = callsign;
        }

        Ok(config)
    }

    /// Path of a file in the resource directory
    pub fn resource(&self, name: &str) -> PathBuf {
        self.resource_dir.join(name)
    }

    /// Path of the TrueType collection
    pub fn font_path(&self) -> PathBuf {
        self.resource(FONT_FILE)
    }
}

fn parse<T>(key: &str, value: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value
        .trim()
        .parse()
        .with_context(|| format!("{key}={value:?} is not valid"))
}

/// `pic/` next to the running binary, if there is one
fn beside_executable() -> Option<PathBuf> {
    let exe = std::env::current_exe().ok()?;
    let dir = exe.parent().map(Path::to_path_buf)?.join("pic");
    dir.is_dir().then_some(dir)
}
