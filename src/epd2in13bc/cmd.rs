pub struct Cmd;
impl Cmd {
    // Init
    pub const PANEL_SETTING: u8 = 0x00;
    pub const POWER_OFF: u8 = 0x02;
    pub const POWER_ON: u8 = 0x04;
    pub const BOOSTER_SOFT_START: u8 = 0x06;
    pub const DEEP_SLEEP: u8 = 0x07;
    pub const VCOM_AND_DATA_INTERVAL_SETTING: u8 = 0x50;
    pub const RESOLUTION_SETTING: u8 = 0x61;

    // Update
    pub const DATA_START_TRANSMISSION_1: u8 = 0x10;
    pub const DISPLAY_REFRESH: u8 = 0x12;
    pub const DATA_START_TRANSMISSION_2: u8 = 0x13;
    pub const PARTIAL_OUT: u8 = 0x92;
}

/*
Waveshare epd2in13bc reference sequence:
0x06 - Booster Soft Start (0x17 0x17 0x17)
0x04 - Power On, then wait for BUSY
0x00 - Panel Setting (0x8F)
0x50 - VCOM and Data Interval (0xF0)
0x61 - Resolution (width, height MSB, height LSB)
0x10 - Black plane
0x13 - Red plane
0x12 - Refresh
0x02 - Power Off
0x07 - Deep Sleep (0xA5 check code)
*/
