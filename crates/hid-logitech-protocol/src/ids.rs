//! Logitech USB vendor/product IDs and command bytes.

/// Logitech USB vendor ID.
pub const LOGITECH_VENDOR_ID: u16 = 0x046D;

/// Firmware revision (`bcdDevice`) that identifies a Formula Force EX behind
/// the Driving Force / Formula Force EX product ID.
pub const FORMULA_FORCE_EX_REVISION: u16 = 0x2100;

/// First byte of the device-wide (non-slot) commands.
pub mod commands {
    /// Fixed-loop mode select; byte 1 is 0 or 1.
    pub const FIXED_LOOP: u8 = 0x0D;
    /// Stop every force slot at once.
    pub const STOP_ALL: u8 = 0xF3;
    /// Disable the built-in centering spring.
    pub const AUTOCENTER_OFF: u8 = 0xF5;
    /// Enable the built-in centering spring.
    pub const AUTOCENTER_ON: u8 = 0x14;
    /// Centering spring parameters; byte 1 selects the variant.
    pub const AUTOCENTER_SPRING: u8 = 0xFE;
    /// Extended command prefix (range, LEDs).
    pub const EXTENDED: u8 = 0xF8;
    /// DFP fine range limit.
    pub const DFP_FINE_RANGE: u8 = 0x81;
}

/// Byte 1 values following [`commands::EXTENDED`] and [`commands::AUTOCENTER_SPRING`].
pub mod subcommands {
    /// Default centering spring parameters.
    pub const AUTOCENTER_DEFAULT: u8 = 0x0D;
    /// Formula Force EX centering spring parameters.
    pub const AUTOCENTER_FFEX: u8 = 0x03;
    /// G25-style rotation range.
    pub const SET_RANGE: u8 = 0x81;
    /// DFP coarse limit to 200 degrees.
    pub const DFP_RANGE_200: u8 = 0x02;
    /// DFP coarse limit to 900 degrees.
    pub const DFP_RANGE_900: u8 = 0x03;
    /// DFP fine limit payload marker.
    pub const DFP_FINE_RANGE: u8 = 0x0B;
    /// Rev-light LEDs.
    pub const SET_LEDS: u8 = 0x12;
}

/// Logitech wheels driven through the 4-slot protocol.
pub mod product_ids {
    /// WingMan Formula (no force feedback).
    pub const WINGMAN_FG: u16 = 0xC20E;
    /// WingMan Formula Force GP.
    pub const WINGMAN_FFG: u16 = 0xC293;
    /// Driving Force / Formula Force EX.
    pub const WHEEL: u16 = 0xC294;
    /// MOMO Force.
    pub const MOMO_WHEEL: u16 = 0xC295;
    /// Driving Force Pro (900 degrees).
    pub const DFP_WHEEL: u16 = 0xC298;
    /// G25 racing wheel (900 degrees).
    pub const G25_WHEEL: u16 = 0xC299;
    /// Driving Force GT.
    pub const DFGT_WHEEL: u16 = 0xC29A;
    /// G27 racing wheel.
    pub const G27_WHEEL: u16 = 0xC29B;
    /// Wii speed force wheel.
    pub const WII_WHEEL: u16 = 0xC29C;
    /// G29 racing wheel (PlayStation/PC).
    pub const G29_WHEEL: u16 = 0xC24F;
    /// MOMO Racing.
    pub const MOMO_WHEEL2: u16 = 0xCA03;
}
