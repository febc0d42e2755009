//! Theme loading: btop-style `theme[key]="value"` and hex → ratatui Color.

use ratatui::style::Color;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

/// Panel and UI colours, loadable from a theme file.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Panel colours (index 0..=4): red, green, blue, yellow, purple.
    pub panels: [Color; 5],
    /// Playfield background.
    pub bg: Color,
    /// Grid / border.
    pub div_line: Color,
    /// Text (help line, labels).
    pub main_fg: Color,
    /// Highlight / titles.
    pub title: Color,
    /// Inactive / secondary text.
    pub inactive_fg: Color,
}

#[derive(Debug, Error)]
pub enum ThemeError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid hex: {0}")]
    InvalidHex(String),
}

impl Default for Theme {
    fn default() -> Self {
        Self::panels_default()
    }
}

impl Theme {
    /// Hardcoded defaults: the classic five-panel palette on a dark field.
    pub fn panels_default() -> Self {
        Self {
            panels: [
                Color::Rgb(239, 71, 111), // red
                Color::Rgb(7, 197, 102),  // green
                Color::Rgb(1, 151, 244),  // blue
                Color::Rgb(255, 206, 92), // yellow
                Color::Rgb(159, 89, 197), // purple
            ],
            bg: Color::Rgb(30, 30, 30),
            div_line: Color::Rgb(63, 68, 79),
            main_fg: Color::Rgb(171, 178, 191),
            title: Color::Rgb(229, 192, 123),
            inactive_fg: Color::Rgb(92, 99, 112),
        }
    }

    /// Load theme from a btop-style file: `theme[key]="value"` or
    /// `theme[key]='value'`. Falls back to the built-in palette if path is
    /// None or the file is missing. `palette` selects the colour variant.
    pub fn load(path: Option<&Path>, palette: crate::Palette) -> Result<Self, ThemeError> {
        let path = match path {
            Some(p) if p.exists() => p,
            _ => return Ok(Self::default_for_palette(palette)),
        };
        let s = std::fs::read_to_string(path)?;
        let map = parse_theme_file(&s);
        let mut theme = Self::from_map(&map);
        theme.apply_palette(palette);
        Ok(theme)
    }

    fn default_for_palette(palette: crate::Palette) -> Self {
        let mut t = Self::panels_default();
        t.apply_palette(palette);
        t
    }

    /// Override panel colours for high-contrast or colorblind variants.
    pub fn apply_palette(&mut self, palette: crate::Palette) {
        match palette {
            crate::Palette::Normal => {}
            crate::Palette::HighContrast => {
                self.panels = [
                    Color::Rgb(0xFF, 0x00, 0x00), // red
                    Color::Rgb(0x00, 0xFF, 0x00), // green
                    Color::Rgb(0x00, 0x88, 0xFF), // blue
                    Color::Rgb(0xFF, 0xFF, 0x00), // yellow
                    Color::Rgb(0xFF, 0x00, 0xFF), // magenta
                ];
            }
            crate::Palette::Colorblind => {
                // Avoid red/green alone as the distinguishing pair.
                self.panels = [
                    Color::Rgb(0xCC, 0x33, 0x11), // red
                    Color::Rgb(0x00, 0x99, 0x88), // teal
                    Color::Rgb(0x00, 0x77, 0xBB), // blue
                    Color::Rgb(0xEE, 0x77, 0x33), // orange
                    Color::Rgb(0xEE, 0x33, 0x77), // magenta
                ];
            }
        }
    }

    fn from_map(map: &HashMap<String, String>) -> Self {
        let defaults = Self::panels_default();
        let get = |key: &str| {
            map.get(key)
                .and_then(|v| parse_hex(v.trim_matches('"').trim_matches('\'').trim()).ok())
        };
        // Keys follow btop theme naming; anything missing keeps the default.
        Self {
            panels: [
                get("cpu_end").unwrap_or(defaults.panels[0]),
                get("mem_box").unwrap_or(defaults.panels[1]),
                get("cpu_box").unwrap_or(defaults.panels[2]),
                get("title").unwrap_or(defaults.panels[3]),
                get("net_box").unwrap_or(defaults.panels[4]),
            ],
            bg: get("meter_bg").unwrap_or(defaults.bg),
            div_line: get("div_line").unwrap_or(defaults.div_line),
            main_fg: get("main_fg").unwrap_or(defaults.main_fg),
            title: get("title").unwrap_or(defaults.title),
            inactive_fg: get("inactive_fg").unwrap_or(defaults.inactive_fg),
        }
    }

    /// Colour for a panel colour index (0..5).
    #[inline]
    pub fn panel_color(&self, index: u8) -> Color {
        self.panels[(index as usize) % self.panels.len()]
    }
}

/// Parse btop-style theme file into key -> value map.
fn parse_theme_file(s: &str) -> HashMap<String, String> {
    let mut map = HashMap::new();
    for line in s.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some(stripped) = line.strip_prefix("theme[") {
            if let Some(end) = stripped.find(']') {
                let key = stripped[..end].trim();
                let rest = stripped[end + 1..].trim();
                if let Some(eq) = rest.find('=') {
                    let value = rest[eq + 1..]
                        .trim()
                        .trim_matches('"')
                        .trim_matches('\'')
                        .to_string();
                    if !value.is_empty() {
                        map.insert(key.to_string(), value);
                    }
                }
            }
        }
    }
    map
}

/// Parse hex colour "#RRGGBB" or "#RGB" into ratatui Color.
pub fn parse_hex(s: &str) -> Result<Color, ThemeError> {
    let s = s.trim().trim_start_matches('#');
    let (r, g, b) = if s.len() == 6 {
        let r =
            u8::from_str_radix(&s[0..2], 16).map_err(|_| ThemeError::InvalidHex(s.to_string()))?;
        let g =
            u8::from_str_radix(&s[2..4], 16).map_err(|_| ThemeError::InvalidHex(s.to_string()))?;
        let b =
            u8::from_str_radix(&s[4..6], 16).map_err(|_| ThemeError::InvalidHex(s.to_string()))?;
        (r, g, b)
    } else if s.len() == 3 {
        let r = u8::from_str_radix(&s[0..1], 16)
            .map_err(|_| ThemeError::InvalidHex(s.to_string()))?
            * 17;
        let g = u8::from_str_radix(&s[1..2], 16)
            .map_err(|_| ThemeError::InvalidHex(s.to_string()))?
            * 17;
        let b = u8::from_str_radix(&s[2..3], 16)
            .map_err(|_| ThemeError::InvalidHex(s.to_string()))?
            * 17;
        (r, g, b)
    } else {
        return Err(ThemeError::InvalidHex(s.to_string()));
    };
    Ok(Color::Rgb(r, g, b))
}
