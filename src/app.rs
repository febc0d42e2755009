//! App: terminal init, main loop, tick and key handling.

use crate::game::{Command, GameState};
use crate::input::{Action, key_to_action};
use crate::theme::Theme;
use crate::{Args, GameConfig};
use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};
use ratatui::DefaultTerminal;
use std::time::{Duration, Instant};
use tachyonfx::Effect;

/// DAS (Delayed Auto-Shift): delay before cursor movement starts repeating when you hold a key.
const REPEAT_DELAY_MS: u64 = 170;
/// ARR (Auto-Repeat Rate): time between repeated moves while holding. 50 ms ≈ 20 moves/sec.
const REPEAT_INTERVAL_MS: u64 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Playing,
    QuitMenu,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuitOption {
    Resume,
    Exit,
}

pub struct App {
    args: Args,
    theme: Theme,
    state: GameState,
    screen: Screen,
    paused: bool,
    last_tick: Instant,
    /// Command for the next tick. At most one is consumed per tick; a swap
    /// displaces a queued move but not the other way around, so a swap
    /// pressed between ticks is never eaten by held-key repeat.
    queued: Option<Command>,
    repeat_state: Option<(Action, Instant)>,
    last_repeat_fire: Option<Instant>,
    /// TachyonFX fade on matched panels (created when a match lands).
    destroy_effect: Option<Effect>,
    /// Last time we processed the destroy effect (for delta).
    destroy_effect_process_time: Option<Instant>,
    quit_selected: QuitOption,
}

impl App {
    pub fn new(args: Args, config: GameConfig, theme: Theme) -> Result<Self> {
        let state = GameState::new(
            config.width,
            config.height,
            config.spawn_increment,
            config.seed,
        )?;
        let now = Instant::now();
        Ok(Self {
            args,
            theme,
            state,
            screen: Screen::Playing,
            paused: false,
            last_tick: now,
            queued: None,
            repeat_state: None,
            last_repeat_fire: None,
            destroy_effect: None,
            destroy_effect_process_time: None,
            quit_selected: QuitOption::Resume,
        })
    }

    /// Swap wins over a queued move; a move never displaces a queued swap.
    fn queue_command(&mut self, action: Action) {
        if action == Action::Swap {
            self.queued = Some(Command::Swap);
        } else if let Some((dx, dy)) = action.direction() {
            if self.queued != Some(Command::Swap) {
                self.queued = Some(Command::Move(dx, dy));
            }
        }
    }

    fn tick_repeat(&mut self) {
        let now = Instant::now();
        let (action, first) = match self.repeat_state {
            Some(s) => s,
            None => return,
        };
        if action.direction().is_none() {
            return;
        }
        if first.elapsed() < Duration::from_millis(REPEAT_DELAY_MS) {
            return;
        }
        let next =
            self.last_repeat_fire.unwrap_or(first) + Duration::from_millis(REPEAT_INTERVAL_MS);
        if now >= next {
            self.queue_command(action);
            self.last_repeat_fire = Some(now);
        }
    }

    pub fn run(&mut self) -> Result<()> {
        use crossterm::{
            event::{
                KeyboardEnhancementFlags, PopKeyboardEnhancementFlags,
                PushKeyboardEnhancementFlags,
            },
            execute,
            terminal::{
                EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
            },
        };

        enable_raw_mode()?;
        let mut stdout = std::io::stdout();
        execute!(stdout, EnterAlternateScreen)?;

        // Attempt to enable enhanced keyboard for Release events
        let _ = execute!(
            stdout,
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
        );

        let mut terminal =
            ratatui::DefaultTerminal::new(ratatui::backend::CrosstermBackend::new(stdout))?;

        let result = self.run_loop(&mut terminal);

        // Restore
        let _ = execute!(std::io::stdout(), PopKeyboardEnhancementFlags);
        execute!(std::io::stdout(), LeaveAlternateScreen)?;
        disable_raw_mode()?;

        result
    }

    fn run_loop(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        let tick_interval = Duration::from_secs_f64(1.0 / self.args.tick_rate.max(1.0));
        loop {
            let now = Instant::now();
            terminal.draw(|f| {
                crate::ui::draw(
                    f,
                    &self.state,
                    &self.theme,
                    self.paused,
                    f.area(),
                    &mut self.destroy_effect,
                    &mut self.destroy_effect_process_time,
                    now,
                    self.args.no_animation,
                    (self.screen == Screen::QuitMenu).then_some(self.quit_selected),
                )
            })?;

            // The fade is tied to the current batch of matched panels; once
            // the field holds none the next match starts a fresh effect.
            if !self.state.playfield.cells().any(|(_, _, p)| p.is_matched()) {
                self.destroy_effect = None;
                self.destroy_effect_process_time = None;
            }

            // Limit event polling to hit ~60 FPS rendering (16ms)
            let frame_duration = Duration::from_millis(16);
            let timeout = frame_duration.saturating_sub(now.elapsed());

            if event::poll(timeout)? {
                while event::poll(Duration::ZERO)? {
                    if let Event::Key(key) = event::read()? {
                        let action = key_to_action(key);

                        // Ignore OS repeats and only process first Press.
                        if key.kind != KeyEventKind::Press {
                            if key.kind == KeyEventKind::Release
                                && self.repeat_state.map(|(a, _)| a) == Some(action)
                            {
                                self.repeat_state = None;
                                self.last_repeat_fire = None;
                            }
                            continue;
                        }
                        if self.repeat_state.map(|(a, _)| a) == Some(action) {
                            continue;
                        }

                        match self.screen {
                            Screen::Playing => {
                                if self.paused {
                                    match action {
                                        Action::Pause => self.paused = false,
                                        Action::Quit => {
                                            self.screen = Screen::QuitMenu;
                                            self.quit_selected = QuitOption::Resume;
                                        }
                                        _ => {}
                                    }
                                } else {
                                    match action {
                                        Action::Pause => {
                                            self.paused = true;
                                            self.repeat_state = None;
                                            self.queued = None;
                                        }
                                        Action::Quit => {
                                            self.screen = Screen::QuitMenu;
                                            self.quit_selected = QuitOption::Resume;
                                            self.repeat_state = None;
                                            self.queued = None;
                                        }
                                        Action::None => {}
                                        _ => {
                                            self.queue_command(action);
                                            if action.direction().is_some() {
                                                self.repeat_state = Some((action, Instant::now()));
                                                self.last_repeat_fire = None;
                                            }
                                        }
                                    }
                                }
                            }
                            Screen::QuitMenu => match action {
                                Action::CursorUp | Action::CursorDown => {
                                    self.quit_selected = match self.quit_selected {
                                        QuitOption::Resume => QuitOption::Exit,
                                        QuitOption::Exit => QuitOption::Resume,
                                    };
                                }
                                Action::Swap => match self.quit_selected {
                                    QuitOption::Resume => self.screen = Screen::Playing,
                                    QuitOption::Exit => return Ok(()),
                                },
                                Action::Pause | Action::Quit => {
                                    self.screen = Screen::Playing;
                                }
                                _ => {}
                            },
                        }
                    }
                }
            }

            if self.screen == Screen::Playing && !self.paused {
                self.tick_repeat();
                if self.last_tick.elapsed() >= tick_interval {
                    self.last_tick = Instant::now();
                    self.state.tick(self.queued.take());
                }
            }
        }
    }
}
