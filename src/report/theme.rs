use crossterm::style::Color;

pub struct Theme {
    pub primary: Color, // Blue
    pub error: Color,   // Red
    pub border: Color,  // Grey
}

pub const DEFAULT_THEME: Theme = Theme {
    primary: Color::Rgb {
        r: 137,
        g: 180,
        b: 250,
    },
    error: Color::Rgb {
        r: 243,
        g: 139,
        b: 168,
    },
    border: Color::Rgb {
        r: 108,
        g: 112,
        b: 134,
    },
};
