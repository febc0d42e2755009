//! Paneltui — Tetris-Attack-style panel-matching puzzle in the terminal.
//!
//! A two-cell cursor swaps horizontally adjacent panels on a fixed grid.
//! Lines of three or more panels of one colour are destroyed after a short
//! delay, panels above fall into the gap, and a timer injects fresh pairs
//! at the top of the field.

pub mod app;
pub mod game;
pub mod input;
pub mod theme;
pub mod ui;

use clap::{Parser, ValueEnum};

/// Options derived from the CLI that shape the simulation itself.
#[derive(Debug, Clone)]
pub struct GameConfig {
    pub width: usize,
    pub height: usize,
    pub spawn_increment: f32,
    pub seed: u32,
}

/// Tetris-Attack-style panel puzzle in the terminal.
#[derive(Debug, Parser)]
#[command(
    name = "paneltui",
    version,
    about = "Tetris-Attack-style panel puzzle in the terminal. Swap panels with a two-cell cursor; lines of three or more vanish.",
    long_about = "Paneltui is a terminal puzzle game in the Tetris Attack / Panel de Pon family.\n\n\
        A two-cell cursor swaps horizontally adjacent panels. Three or more panels of one colour \
        in a row or column are destroyed; panels above fall into the gap. A timer injects a fresh \
        pair of panels at the top of the field whenever it fills.\n\n\
        CONTROLS:\n  WASD / arrows / hjkl   Move cursor\n  Space / Enter          Swap panels\n  P                      Pause      Q / Esc   Quit\n\n\
        Hold a movement key to keep the cursor moving. Use --theme to load a btop-style theme (e.g. onedark.theme)."
)]
pub struct Args {
    /// Path to theme file (btop-style theme[key]="value"). Uses the built-in palette if not set.
    #[arg(short, long, value_name = "FILE")]
    pub theme: Option<std::path::PathBuf>,

    /// Colour palette: normal (theme), high-contrast, or colorblind.
    #[arg(long, default_value = "normal")]
    pub palette: Palette,

    /// Playfield width in columns. Must be at least 2 (spawning needs two adjacent columns).
    #[arg(long, default_value = "6", value_name = "COLS")]
    pub width: u16,

    /// Playfield height in rows.
    #[arg(long, default_value = "12", value_name = "ROWS")]
    pub height: u16,

    /// Simulation ticks per second.
    #[arg(long, default_value = "60.0", value_name = "RATE")]
    pub tick_rate: f64,

    /// Spawn timer increment per tick; the timer spawns a panel pair at 100.
    #[arg(long, default_value = "0.4", value_name = "STEP")]
    pub spawn_rate: f32,

    /// RNG seed for a reproducible run. Random (clock-derived) if not set.
    #[arg(long, value_name = "N")]
    pub seed: Option<u32>,

    /// Disable the destroy-fade animation on matched panels.
    #[arg(long)]
    pub no_animation: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Palette {
    #[default]
    Normal,

    #[value(alias = "highcontrast", alias = "contrast")]
    HighContrast,

    #[value(alias = "colourblind")]
    Colorblind,
}
