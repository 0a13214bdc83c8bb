/// Flag values and constants for configuring the 2.13" B/C controller.
pub struct Flag;
#[allow(missing_docs)]
impl Flag {
    // Booster Soft Start (0x06)
    pub const BOOSTER_SOFT_START_PHASE_A: u8 = 0x17;
    pub const BOOSTER_SOFT_START_PHASE_B: u8 = 0x17;
    pub const BOOSTER_SOFT_START_PHASE_C: u8 = 0x17;

    // Panel Setting (0x00): 0x8F = 104x212 resolution bits, LUT from OTP,
    // black/white/red mode, scan up, shift right, booster on, no soft reset
    pub const PANEL_SETTING_BWR_OTP: u8 = 0x8F;

    // VCOM and Data Interval (0x50): white border, default interval
    pub const VCOM_DATA_INTERVAL_WHITE_BORDER: u8 = 0xF0;

    // Deep Sleep (0x07) check code, anything else is ignored by the controller
    pub const DEEP_SLEEP_CHECK_CODE: u8 = 0xA5;

    // Plane data, one bit per pixel, set bit = no ink
    pub const RAM_BYTE_ALL_WHITE: u8 = 0xFF;
}
