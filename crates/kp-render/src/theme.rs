//! Colours for the two figure styles.

use plotters::style::RGBColor;

use crate::directives::Style;

// matplotlib's default cycle
const CLASSIC_CYCLE: [RGBColor; 10] = [
    RGBColor(0x1f, 0x77, 0xb4),
    RGBColor(0xff, 0x7f, 0x0e),
    RGBColor(0x2c, 0xa0, 0x2c),
    RGBColor(0xd6, 0x27, 0x28),
    RGBColor(0x94, 0x67, 0xbd),
    RGBColor(0x8c, 0x56, 0x4b),
    RGBColor(0xe3, 0x77, 0xc2),
    RGBColor(0x7f, 0x7f, 0x7f),
    RGBColor(0xbc, 0xbd, 0x22),
    RGBColor(0x17, 0xbe, 0xcf),
];

// dark_background cycle
const DARK_CYCLE: [RGBColor; 8] = [
    RGBColor(0x8d, 0xd3, 0xc7),
    RGBColor(0xfe, 0xff, 0xb3),
    RGBColor(0xbf, 0xbb, 0xd9),
    RGBColor(0xfa, 0x80, 0x74),
    RGBColor(0x81, 0xb1, 0xd2),
    RGBColor(0xfd, 0xb4, 0x62),
    RGBColor(0xb3, 0xde, 0x69),
    RGBColor(0xbc, 0x82, 0xbd),
];

#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub style: Style,
    pub background: RGBColor,
    pub foreground: RGBColor,
    pub grid: RGBColor,
    pub palette: &'static [RGBColor],
}

impl Theme {
    pub fn for_style(style: Style) -> Self {
        match style {
            Style::Classic => Self {
                style,
                background: RGBColor(0xff, 0xff, 0xff),
                foreground: RGBColor(0x00, 0x00, 0x00),
                grid: RGBColor(0xdd, 0xdd, 0xdd),
                palette: &CLASSIC_CYCLE,
            },
            Style::Dark => Self {
                style,
                background: RGBColor(0x00, 0x00, 0x00),
                foreground: RGBColor(0xff, 0xff, 0xff),
                grid: RGBColor(0x33, 0x33, 0x33),
                palette: &DARK_CYCLE,
            },
        }
    }

    /// Colour of the `index`-th series, cycling through the palette.
    pub fn series_color(&self, index: usize) -> RGBColor {
        self.palette[index % self.palette.len()]
    }

    pub fn background_rgb(&self) -> [u8; 3] {
        let RGBColor(r, g, b) = self.background;
        [r, g, b]
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::for_style(Style::default())
    }
}
