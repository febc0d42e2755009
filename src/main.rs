use anyhow::Result;
use clap::Parser;
use paneltui::app::App;
use paneltui::{Args, GameConfig, theme};

fn main() -> Result<()> {
    let args = Args::parse();
    let theme = theme::Theme::load(args.theme.as_deref(), args.palette).unwrap_or_default();
    let seed = args.seed.unwrap_or_else(seed_from_clock);
    let config = GameConfig {
        width: args.width as usize,
        height: args.height as usize,
        spawn_increment: args.spawn_rate,
        seed,
    };
    let mut app = App::new(args, config, theme)?;
    app.run()?;
    Ok(())
}

/// Seed for unseeded runs; only has to differ between launches.
fn seed_from_clock() -> u32 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.subsec_nanos() ^ d.as_secs() as u32)
        .unwrap_or(1)
}
