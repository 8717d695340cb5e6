/// RGB color triple
pub type Rgb = [u8; 3];

/// Game Boy shades, paper white to black
pub const GAMEBOY_PALETTE: [Rgb; 4] = [
    [255, 255, 255],
    [192, 192, 192],
    [96, 96, 96],
    [0, 0, 0],
];

/// Fixed 4-entry palette for 2-bit color indices
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette(pub [Rgb; 4]);

impl Palette {
    pub fn new(colors: [Rgb; 4]) -> Self {
        Self(colors)
    }

    /// Color for a 2-bit index. Only the low two bits are used.
    pub fn color(&self, index: u8) -> Rgb {
        self.0[(index & 0b11) as usize]
    }

    /// Color used for cells with no tile data
    pub fn blank(&self) -> Rgb {
        self.0[0]
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self(GAMEBOY_PALETTE)
    }
}
