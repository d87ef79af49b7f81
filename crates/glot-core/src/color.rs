//! Color tag payloads for `^{...}` markup.
//!
//! The escape engine rewrites color tags into SGR sequences, the host's
//! native rich-text color syntax. Two fidelity levels are supported: the
//! named ANSI-16 palette and 24-bit `#RRGGBB` values.

/// SGR sequence restoring the default foreground and attributes.
pub const SGR_RESET: &str = "\u{1b}[0m";

/// RGB color (opaque).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse a `#RRGGBB` hex value.
    #[must_use]
    pub fn from_hex(spec: &str) -> Option<Self> {
        let hex = spec.strip_prefix('#')?;
        if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
        Some(Self::new(r, g, b))
    }
}

/// ANSI 16-color indices (0-15).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Ansi16 {
    Black = 0,
    Red = 1,
    Green = 2,
    Yellow = 3,
    Blue = 4,
    Magenta = 5,
    Cyan = 6,
    White = 7,
    BrightBlack = 8,
    BrightRed = 9,
    BrightGreen = 10,
    BrightYellow = 11,
    BrightBlue = 12,
    BrightMagenta = 13,
    BrightCyan = 14,
    BrightWhite = 15,
}

impl Ansi16 {
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Parse a color name, case-insensitively.
    ///
    /// `grey`/`gray` are aliases for `bright_black`.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let lower = name.to_ascii_lowercase();
        Some(match lower.as_str() {
            "black" => Self::Black,
            "red" => Self::Red,
            "green" => Self::Green,
            "yellow" => Self::Yellow,
            "blue" => Self::Blue,
            "magenta" => Self::Magenta,
            "cyan" => Self::Cyan,
            "white" => Self::White,
            "bright_black" | "grey" | "gray" => Self::BrightBlack,
            "bright_red" => Self::BrightRed,
            "bright_green" => Self::BrightGreen,
            "bright_yellow" => Self::BrightYellow,
            "bright_blue" => Self::BrightBlue,
            "bright_magenta" => Self::BrightMagenta,
            "bright_cyan" => Self::BrightCyan,
            "bright_white" => Self::BrightWhite,
            _ => return None,
        })
    }
}

/// A color tag payload: a named ANSI-16 color or a 24-bit hex value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagColor {
    Ansi16(Ansi16),
    Rgb(Rgb),
}

impl TagColor {
    /// Parse a tag payload: `#RRGGBB` or an ANSI-16 color name.
    #[must_use]
    pub fn parse(spec: &str) -> Option<Self> {
        let spec = spec.trim();
        if spec.starts_with('#') {
            return Rgb::from_hex(spec).map(Self::Rgb);
        }
        Ansi16::from_name(spec).map(Self::Ansi16)
    }

    /// SGR foreground sequence selecting this color.
    #[must_use]
    pub fn sgr(self) -> String {
        match self {
            Self::Ansi16(color) => {
                let code = color.as_u8();
                if code < 8 {
                    format!("\u{1b}[{}m", 30 + u16::from(code))
                } else {
                    format!("\u{1b}[{}m", 90 + u16::from(code - 8))
                }
            }
            Self::Rgb(rgb) => format!("\u{1b}[38;2;{};{};{}m", rgb.r, rgb.g, rgb.b),
        }
    }
}
