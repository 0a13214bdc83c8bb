//! Pin definitions for the Waveshare e-Paper HAT
//!
//! Line offsets on the SBC's GPIO character device (BCM numbering on the Raspberry Pi).
//! Chip select (CE0, BCM 8) belongs to the spidev node and is not listed here.

/// Pin configuration for the display HAT
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pins {
    /// Reset pin for display
    pub rst: u32,
    /// Data/Command control pin (High for data, Low for command)
    pub dc: u32,
    /// Busy status pin (Low while the display is busy)
    pub busy: u32,
    /// Panel power switch on newer HAT revisions
    pub pwr: u32,
}

impl Pins {
    /// Data/Command control pin
    pub const DC: u32 = 25;
    /// Reset pin for display
    pub const RST: u32 = 17;
    /// Busy status pin
    pub const BSY: u32 = 24;
    /// Panel power pin
    pub const PWR: u32 = 18;
}

impl Default for Pins {
    fn default() -> Self {
        Self {
            rst: Self::RST,
            dc: Self::DC,
            busy: Self::BSY,
            pwr: Self::PWR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_pins_follow_the_hat_wiring() {
        let pins = Pins::default();
        assert_eq!((pins.rst, pins.dc, pins.busy, pins.pwr), (17, 25, 24, 18));
    }
}
