pub mod config;
pub mod round;
pub mod runtime;
pub mod sink;
pub mod stage;
pub mod ui;
pub mod words;

use crate::{
    config::{Config, ConfigStore, FileConfigStore},
    round::Round,
    runtime::{spawn_fetch, AppEvent},
    sink::PresentationSink,
    stage::{Stage, MAX_WRONG_GUESSES},
    words::{BuiltinSource, FixedSource, RemoteSource, WordSource, WordSourceError},
};
use clap::{error::ErrorKind, CommandFactory, Parser, ValueEnum};
use crossterm::{
    event::{self, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use log::debug;
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Frame, Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    sync::{mpsc, Arc},
    thread,
    time::Duration,
};

const TICK_RATE_MS: u64 = 100;

/// classic hangman for the terminal
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Classic hangman in the terminal: pick a difficulty, fetch a secret word and guess it one letter at a time before the figure on the gallows is completed."
)]
pub struct Cli {
    /// difficulty of the secret word; skips the pick screen when given
    #[clap(short = 'd', long, value_enum)]
    difficulty: Option<Difficulty>,

    /// remote word endpoint to fetch from instead of the built-in lists
    #[clap(short = 's', long)]
    source: Option<String>,

    /// play against a fixed word instead of fetching one
    #[clap(short = 'w', long)]
    word: Option<String>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum, strum_macros::Display)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// The lowercase selector handed to word sources and stored in config.
    pub fn selector(&self) -> String {
        self.to_string().to_lowercase()
    }

    pub fn from_selector(s: &str) -> Option<Self> {
        match s {
            "easy" => Some(Difficulty::Easy),
            "medium" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    pub fn next(self) -> Self {
        match self {
            Difficulty::Easy => Difficulty::Medium,
            Difficulty::Medium => Difficulty::Hard,
            Difficulty::Hard => Difficulty::Easy,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Difficulty::Easy => Difficulty::Hard,
            Difficulty::Medium => Difficulty::Easy,
            Difficulty::Hard => Difficulty::Medium,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AppState {
    SelectDifficulty,
    Fetching,
    Playing,
    RoundOver,
}

/// Sink wired to the shell: stage reveals become status notices and the
/// terminal event feeds the round-over screen.
#[derive(Debug, Clone, Default)]
pub struct ShellSink {
    pub notice: Option<String>,
    pub outcome: Option<(bool, String)>,
}

impl PresentationSink for ShellSink {
    fn round_ready(&mut self) {
        self.notice = None;
        self.outcome = None;
    }

    fn failure_stage(&mut self, stage: Stage) {
        self.notice = Some(format!(
            "the {} joins the gallows ({} of {})",
            stage.label(),
            stage.number(),
            MAX_WRONG_GUESSES
        ));
    }

    fn round_ended(&mut self, did_win: bool, secret_word: &str) {
        self.outcome = Some((did_win, secret_word.to_string()));
    }
}

pub struct App {
    pub state: AppState,
    pub difficulty: Difficulty,
    pub round: Option<Round>,
    pub entry: String,
    pub status: Option<String>,
    pub sink: ShellSink,
    pub spinner_frame: usize,
    pub fetching: bool,
    pub fetch_generation: u64,
    pub source_url: Option<String>,
    pub source: Arc<dyn WordSource + Send + Sync>,
    pub config_store: Box<dyn ConfigStore>,
    pub events_tx: mpsc::Sender<AppEvent>,
}

impl App {
    pub fn new(
        difficulty: Difficulty,
        source_url: Option<String>,
        source: Arc<dyn WordSource + Send + Sync>,
        config_store: Box<dyn ConfigStore>,
        events_tx: mpsc::Sender<AppEvent>,
    ) -> Self {
        Self {
            state: AppState::SelectDifficulty,
            difficulty,
            round: None,
            entry: String::new(),
            status: None,
            sink: ShellSink::default(),
            spinner_frame: 0,
            fetching: false,
            fetch_generation: 0,
            source_url,
            source,
            config_store,
            events_tx,
        }
    }

    /// Kicks off a word fetch for the chosen difficulty. A second start while
    /// one is outstanding is refused; retrying after a failure is fine.
    pub fn start_round(&mut self) {
        if self.fetching {
            self.status = Some("already fetching a word".to_string());
            return;
        }

        self.fetch_generation += 1;
        self.fetching = true;
        self.round = None;
        self.entry.clear();
        self.status = None;
        self.sink = ShellSink::default();
        self.state = AppState::Fetching;

        let cfg = Config {
            difficulty: self.difficulty.selector(),
            source_url: self.source_url.clone(),
        };
        let _ = self.config_store.save(&cfg);

        spawn_fetch(
            Arc::clone(&self.source),
            self.difficulty.selector(),
            self.fetch_generation,
            self.events_tx.clone(),
        );
    }

    /// Abandons an in-flight fetch. The worker still answers eventually and
    /// the generation check drops that answer.
    pub fn cancel_fetch(&mut self) {
        if self.fetching {
            self.fetch_generation += 1;
            self.fetching = false;
            self.state = AppState::SelectDifficulty;
            self.status = Some("fetch cancelled".to_string());
        }
    }

    pub fn on_word_ready(&mut self, generation: u64, result: Result<String, WordSourceError>) {
        if generation != self.fetch_generation {
            debug!("dropping stale word fetch (generation {generation})");
            return;
        }
        self.fetching = false;
        let started = result.and_then(|word| Round::with_word(&word, &mut self.sink));
        match started {
            Ok(round) => {
                self.round = Some(round);
                self.state = AppState::Playing;
                self.status = None;
            }
            Err(err) => {
                self.state = AppState::SelectDifficulty;
                self.status = Some(format!("could not start a round: {err}"));
            }
        }
    }

    /// Hands the pending entry to the round. Refusals surface on the status
    /// line; an accepted guess may finish the round.
    pub fn submit_guess(&mut self) {
        let input = std::mem::take(&mut self.entry);
        let Some(round) = self.round.as_mut() else {
            return;
        };
        match round.guess(&input, &mut self.sink) {
            Ok(()) => {
                self.status = self.sink.notice.take();
                if round.is_over() {
                    self.state = AppState::RoundOver;
                }
            }
            Err(err) => {
                self.status = Some(err.to_string());
            }
        }
    }

    pub fn on_tick(&mut self) {
        self.spinner_frame = self.spinner_frame.wrapping_add(1);
    }

    /// Back to the pick screen, dropping any finished round.
    pub fn to_select(&mut self) {
        self.round = None;
        self.entry.clear();
        self.status = None;
        self.sink = ShellSink::default();
        self.state = AppState::SelectDifficulty;
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::try_init().unwrap_or(());

    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let config_store = FileConfigStore::new();
    let stored = config_store.load();

    let difficulty = cli
        .difficulty
        .or_else(|| Difficulty::from_selector(&stored.difficulty))
        .unwrap_or(Difficulty::Easy);
    let source_url = cli.source.clone().or_else(|| stored.source_url.clone());

    let source: Arc<dyn WordSource + Send + Sync> = if let Some(word) = &cli.word {
        Arc::new(FixedSource::new(word.clone()))
    } else if let Some(url) = &source_url {
        Arc::new(RemoteSource::new(url.clone()))
    } else {
        Arc::new(BuiltinSource)
    };

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let (events_tx, events_rx) = get_app_events(true);
    let mut app = App::new(
        difficulty,
        source_url,
        source,
        Box::new(config_store),
        events_tx,
    );
    if cli.word.is_some() || cli.difficulty.is_some() {
        app.start_round();
    }

    start_tui(&mut terminal, &mut app, &events_rx)?;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen,)?;
    terminal.show_cursor()?;

    Ok(())
}

#[derive(Debug)]
enum ExitType {
    Restart,
    New,
    Quit,
}

fn start_tui<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    events: &mpsc::Receiver<AppEvent>,
) -> Result<(), Box<dyn Error>> {
    loop {
        let mut exit_type: ExitType = ExitType::Quit;
        terminal.draw(|f| ui(app, f))?;

        loop {
            match events.recv()? {
                AppEvent::Tick => {
                    if app.state == AppState::Fetching {
                        app.on_tick();
                        terminal.draw(|f| ui(app, f))?;
                    }
                }
                AppEvent::Resize => {
                    terminal.draw(|f| ui(app, f))?;
                }
                AppEvent::WordReady { generation, result } => {
                    app.on_word_ready(generation, result);
                    terminal.draw(|f| ui(app, f))?;
                }
                AppEvent::Key(key) => {
                    match app.state {
                        AppState::SelectDifficulty => match key.code {
                            KeyCode::Esc => {
                                break;
                            }
                            KeyCode::Left | KeyCode::Up => {
                                app.difficulty = app.difficulty.prev();
                            }
                            KeyCode::Right | KeyCode::Down => {
                                app.difficulty = app.difficulty.next();
                            }
                            KeyCode::Enter => {
                                app.start_round();
                            }
                            KeyCode::Char(c) => {
                                if key.modifiers.contains(KeyModifiers::CONTROL) && c == 'c' {
                                    break;
                                }
                                match c {
                                    'e' => app.difficulty = Difficulty::Easy,
                                    'm' => app.difficulty = Difficulty::Medium,
                                    'h' => app.difficulty = Difficulty::Hard,
                                    _ => {}
                                }
                            }
                            _ => {}
                        },
                        AppState::Fetching => match key.code {
                            KeyCode::Esc => {
                                app.cancel_fetch();
                            }
                            KeyCode::Char(c) => {
                                if key.modifiers.contains(KeyModifiers::CONTROL) && c == 'c' {
                                    break;
                                }
                            }
                            _ => {}
                        },
                        AppState::Playing => match key.code {
                            KeyCode::Esc => {
                                break;
                            }
                            KeyCode::Backspace => {
                                app.entry.pop();
                            }
                            KeyCode::Enter => {
                                app.submit_guess();
                            }
                            KeyCode::Char(c) => {
                                if key.modifiers.contains(KeyModifiers::CONTROL) && c == 'c' {
                                    break;
                                }
                                app.entry.push(c);
                            }
                            _ => {}
                        },
                        AppState::RoundOver => match key.code {
                            KeyCode::Esc => {
                                break;
                            }
                            KeyCode::Char(c) => {
                                if key.modifiers.contains(KeyModifiers::CONTROL) && c == 'c' {
                                    break;
                                }
                                match c {
                                    'r' => {
                                        exit_type = ExitType::Restart;
                                        break;
                                    }
                                    'n' => {
                                        exit_type = ExitType::New;
                                        break;
                                    }
                                    _ => {}
                                }
                            }
                            _ => {}
                        },
                    }
                    terminal.draw(|f| ui(app, f))?;
                }
            }
        }

        match exit_type {
            ExitType::Restart => {
                app.start_round();
            }
            ExitType::New => {
                app.to_select();
            }
            ExitType::Quit => {
                break;
            }
        }
    }

    Ok(())
}

fn get_app_events(should_tick: bool) -> (mpsc::Sender<AppEvent>, mpsc::Receiver<AppEvent>) {
    let (tx, rx) = mpsc::channel();

    if should_tick {
        let tick_tx = tx.clone();
        thread::spawn(move || loop {
            if tick_tx.send(AppEvent::Tick).is_err() {
                break;
            }

            thread::sleep(Duration::from_millis(TICK_RATE_MS))
        });
    }

    let key_tx = tx.clone();
    thread::spawn(move || loop {
        let evt = match event::read() {
            Ok(Event::Key(key)) => Some(AppEvent::Key(key)),
            Ok(Event::Resize(_, _)) => Some(AppEvent::Resize),
            Ok(_) => None,
            Err(_) => break,
        };

        if let Some(evt) = evt {
            if key_tx.send(evt).is_err() {
                break;
            }
        }
    });

    (tx, rx)
}

fn ui(app: &mut App, f: &mut Frame) {
    f.render_widget(&*app, f.area());
}
