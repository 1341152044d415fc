//! Animated banner.
//!
//! Every style is a pure function of the frame counter and the glyph's
//! position, except Glitch which also draws from the injected random source.

use rand::Rng;
use rand::seq::SliceRandom;
use ratatui::style::{Color, Modifier, Style};

use super::canvas::Canvas;

pub type Logo = &'static [&'static str];

pub const LOGOS: &[Logo] = &[
    &[
        " #####   #####   #####   ####   ##### ",
        "##   ## ##   ## ##   ## ##  ## ##   ##",
        "##      ##      ##   ## ##  ## ##     ",
        "##   ## ##   ## ##   ## ##  ## ##   ##",
        " #####   #####   #####   ####   ##### ",
        "    C C O D E   L A U N C H E R        ",
    ],
    &[
        "   ______ ______ ____  ____  ______ ",
        "  / ____// ____// __ \\/ __ \\/ ____/ ",
        " / /    / /    / / / / / / / __/    ",
        "/ /___ / /___ / /_/ / /_/ / /___    ",
        "\\____/ \\____/ \\____/_____/_____/    ",
        "   LAUNCHER  EDITION                ",
    ],
    &[
        "  ___  ___  ___  ___  ___ ",
        " / __|/ __|/ _ \\|   \\| __|",
        "| (__| (__| (_) | |) | _| ",
        " \\___|\\___|\\___/|___/|___|",
        "   C C O D E L A U N C H  ",
    ],
];

pub const GLITCH_CHARS: &[char] = &['!', '@', '#', '$', '%', '&', '?', '<', '>'];
pub const GLITCH_CHANCE: f64 = 0.03;

/// Foreground/background pairs cycled through by the styles.
pub const PALETTE: &[(Color, Color)] = &[
    (Color::Cyan, Color::Blue),
    (Color::Blue, Color::Magenta),
    (Color::Magenta, Color::Red),
    (Color::Red, Color::Yellow),
    (Color::Yellow, Color::Green),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationStyle {
    Wave,
    Pulse,
    Glitch,
    Rain,
}

impl AnimationStyle {
    pub const ALL: [AnimationStyle; 4] = [
        AnimationStyle::Wave,
        AnimationStyle::Pulse,
        AnimationStyle::Glitch,
        AnimationStyle::Rain,
    ];
}

/// Where and how one glyph lands this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Glyph {
    pub row: i32,
    pub col: i32,
    pub ch: char,
    pub style: Style,
}

#[derive(Debug)]
pub struct RenderState<R> {
    pub frame: u64,
    pub logo: Logo,
    pub style: AnimationStyle,
    pub color: bool,
    pub palette: Vec<(Color, Color)>,
    rng: R,
}

impl<R: Rng> RenderState<R> {
    /// Picks the logo and the style from `rng`.
    pub fn new(mut rng: R, color: bool) -> Self {
        let logo = LOGOS.choose(&mut rng).copied().unwrap_or(LOGOS[0]);
        let style = AnimationStyle::ALL
            .choose(&mut rng)
            .copied()
            .unwrap_or(AnimationStyle::Wave);
        Self::with(rng, logo, style, color)
    }

    pub fn with(rng: R, logo: Logo, style: AnimationStyle, color: bool) -> Self {
        let palette = if color { PALETTE.to_vec() } else { Vec::new() };
        Self {
            frame: 0,
            logo,
            style,
            color,
            palette,
            rng,
        }
    }

    pub fn tick(&mut self) {
        self.frame = self.frame.wrapping_add(1);
    }

    pub fn logo_height(&self) -> usize {
        self.logo.len()
    }

    /// Paints the logo with its top edge at `anchor_row`, centred
    /// horizontally.
    pub fn draw_logo(&mut self, canvas: &mut Canvas<'_>, anchor_row: i32) {
        let max_len = self
            .logo
            .iter()
            .map(|line| line.chars().count())
            .max()
            .unwrap_or(0) as i32;
        let anchor_col = ((i32::from(canvas.width()) - max_len) / 2).max(0);
        let logo = self.logo;

        for (row, line) in logo.iter().enumerate() {
            for (col, ch) in line.chars().enumerate() {
                if ch == ' ' {
                    continue;
                }
                let glyph = self.glyph(row as i32, col as i32, ch);
                let mut buf = [0u8; 4];
                canvas.paint(
                    anchor_row + glyph.row,
                    anchor_col + glyph.col,
                    glyph.ch.encode_utf8(&mut buf),
                    glyph.style,
                );
            }
        }
    }

    /// Placement of the glyph at (`row`, `col`) of the logo, relative to the
    /// logo's top-left corner.
    pub fn glyph(&mut self, row: i32, col: i32, ch: char) -> Glyph {
        match self.style {
            AnimationStyle::Wave => self.wave(row, col, ch),
            AnimationStyle::Pulse => self.pulse(row, col, ch),
            AnimationStyle::Glitch => self.glitch(row, col, ch),
            AnimationStyle::Rain => self.rain(row, col, ch),
        }
    }

    fn wave(&self, row: i32, col: i32, ch: char) -> Glyph {
        let f = self.frame as f64;
        let (r, c) = (f64::from(row), f64::from(col));
        let wave_y = (f / 6.0 + c / 8.0).sin() * 0.6;
        let jitter = (f / 3.0 + (r * 1.3 + c / 5.0)).sin() * 0.4;
        let dy = (wave_y + jitter).round() as i32;
        let dx = ((f / 8.0 + r).sin() * 1.5).round() as i32;

        let mut style = self.wave_color(row, col);
        if (self.frame as i64 + i64::from(col) + i64::from(row) * 3) % 18 == 0 {
            style = style.add_modifier(Modifier::BOLD);
        }
        Glyph {
            row: row + dy,
            col: col + dx,
            ch,
            style,
        }
    }

    fn wave_color(&self, row: i32, col: i32) -> Style {
        let n = self.palette.len();
        if n == 0 {
            return Style::default();
        }
        let f = self.frame as f64;
        let wave = (f / 6.0 + f64::from(row) / 2.0 + f64::from(col) / 6.0).sin();
        let bias = (row as i64 + col as i64 + (self.frame / 2) as i64).rem_euclid(n as i64) as usize;
        let idx = ((wave + 1.0) * 0.5 * (n - 1) as f64) as usize;
        self.palette_style(idx + bias)
    }

    fn pulse(&self, row: i32, col: i32, ch: char) -> Glyph {
        let mut style = self.palette_style((col + row) as usize + (self.frame / 3) as usize);
        if (self.frame as i64 + i64::from(col) + i64::from(row)) % 20 < 10 {
            style = style.add_modifier(Modifier::BOLD);
        }
        Glyph {
            row,
            col,
            ch,
            style,
        }
    }

    fn glitch(&mut self, row: i32, col: i32, ch: char) -> Glyph {
        let mut glyph = Glyph {
            row,
            col,
            ch,
            style: self.palette_style((row + col) as usize),
        };
        if self.rng.r#gen::<f64>() < GLITCH_CHANCE {
            match self.rng.gen_range(0..3u8) {
                0 => {
                    glyph.col += self.rng.gen_range(-1..=1);
                    // Never downward.
                    glyph.row += self.rng.gen_range(-1..=0);
                }
                1 => {
                    glyph.ch = GLITCH_CHARS.choose(&mut self.rng).copied().unwrap_or(ch);
                }
                _ => {
                    glyph.style = glyph.style.add_modifier(Modifier::REVERSED);
                }
            }
        }
        glyph
    }

    fn rain(&self, row: i32, col: i32, ch: char) -> Glyph {
        let n = self.palette.len().max(1) as i64;
        let idx = (i64::from(row) - (self.frame / 2) as i64).rem_euclid(n) as usize;
        let mut style = self.palette_style(idx);
        if (i64::from(col) * 7 + i64::from(row) * 13 + self.frame as i64) % 17 == 0 {
            style = style.add_modifier(Modifier::BOLD);
        }
        Glyph {
            row,
            col,
            ch,
            style,
        }
    }

    fn palette_style(&self, index: usize) -> Style {
        if !self.color || self.palette.is_empty() {
            return Style::default();
        }
        let (fg, bg) = self.palette[index % self.palette.len()];
        Style::default().fg(fg).bg(bg)
    }
}

/// Whether the terminal should get coloured output.
pub fn color_supported(no_color_flag: bool) -> bool {
    if no_color_flag || std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    crossterm::style::available_color_count() >= 8
}
