use color_eyre::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::DefaultTerminal;
use tracing::error;

use crate::{
    command,
    config::{Difficulty, GameConfig},
    error::GameError,
    game::{Action, Game, GameStatus},
    tiles::{Pos, TileMode},
    ui,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuItem {
    Play,
    Settings,
    Quit,
}

impl MenuItem {
    pub const ALL: [MenuItem; 3] = [Self::Play, Self::Settings, Self::Quit];

    pub fn label(self) -> &'static str {
        match self {
            Self::Play => "1. Play",
            Self::Settings => "2. Settings",
            Self::Quit => "0. Quit",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsItem {
    Preset(Difficulty),
    Custom,
    Back,
}

impl SettingsItem {
    pub const ALL: [SettingsItem; 5] = [
        Self::Preset(Difficulty::Beginner),
        Self::Preset(Difficulty::Intermediate),
        Self::Preset(Difficulty::Expert),
        Self::Custom,
        Self::Back,
    ];
}

const FORM_DIGITS: usize = 3;

/// Rows, columns and mines typed in by hand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomForm {
    pub fields: [String; 3],
    pub focus: usize,
}

impl CustomForm {
    pub const LABELS: [&'static str; 3] = ["rows", "cols", "mines"];

    pub fn new(config: &GameConfig) -> Self {
        Self {
            fields: [config.rows, config.cols, config.mines].map(|value| value.to_string()),
            focus: 0,
        }
    }

    fn input(&mut self, ch: char) {
        let field = &mut self.fields[self.focus];
        if ch.is_ascii_digit() && field.len() < FORM_DIGITS {
            field.push(ch);
        }
    }

    fn backspace(&mut self) {
        self.fields[self.focus].pop();
    }

    fn next(&mut self) {
        self.focus = (self.focus + 1) % self.fields.len();
    }

    fn prev(&mut self) {
        self.focus = (self.focus + self.fields.len() - 1) % self.fields.len();
    }

    /// Empty fields count as zero and fail validation like any other bad size.
    pub fn submit(&self, seed: Option<u64>) -> Result<GameConfig, GameError> {
        let [rows, cols, mines] = self
            .fields
            .each_ref()
            .map(|field| field.parse::<usize>().unwrap_or(0));
        let config = GameConfig {
            rows,
            cols,
            mines,
            seed,
        };
        config.validate()?;
        Ok(config)
    }
}

pub enum CursorDirection {
    Up,
    Left,
    Right,
    Down,
}

/// A running session together with the cursor and prompt driving it.
pub struct Play {
    pub game: Game,
    pub cursor: Pos,
    pub prompt: Option<String>,
    pub message: Option<String>,
}

impl Play {
    fn new(game: Game) -> Self {
        Self {
            game,
            cursor: (0, 0),
            prompt: None,
            message: None,
        }
    }

    pub fn move_cursor(&mut self, direction: &CursorDirection) {
        match direction {
            CursorDirection::Up => self.cursor.0 = self.cursor.0.saturating_sub(1),
            CursorDirection::Down => self.cursor.0 = self.cursor.0.saturating_add(1),
            CursorDirection::Left => self.cursor.1 = self.cursor.1.saturating_sub(1),
            CursorDirection::Right => self.cursor.1 = self.cursor.1.saturating_add(1),
        }
        let (rows, cols) = self.game.size();
        self.cursor.0 = self.cursor.0.clamp(0, rows - 1);
        self.cursor.1 = self.cursor.1.clamp(0, cols - 1);
    }

    fn act(&mut self, action: Action) {
        self.message = match self.game.apply(action) {
            Ok(_) => None,
            Err(err) => Some(err.to_string()),
        };
    }

    fn toggle_flag(&mut self) {
        let action = match self.game.tile_at(self.cursor) {
            TileMode::Flagged => Action::Unflag(self.cursor),
            _ => Action::Flag(self.cursor),
        };
        self.act(action);
    }

    fn submit(&mut self, input: &str) {
        match command::parse(input) {
            Ok(action) => {
                if let Action::Dig(pos) | Action::Flag(pos) | Action::Unflag(pos) = action {
                    if self.game.tiles().contains(pos) {
                        self.cursor = pos;
                    }
                }
                self.act(action);
            }
            Err(err) => self.message = Some(err.to_string()),
        }
    }
}

pub enum Screen {
    Menu { selected: usize },
    Settings {
        selected: usize,
        form: Option<CustomForm>,
    },
    Playing(Play),
}

impl Screen {
    fn menu() -> Self {
        Self::Menu { selected: 0 }
    }
}

pub struct App {
    running: bool,
    pub config: GameConfig,
    pub screen: Screen,
    pub notice: Option<String>,
}

impl App {
    pub fn new(config: GameConfig) -> Self {
        Self {
            running: false,
            config,
            screen: Screen::menu(),
            notice: None,
        }
    }

    pub fn run(mut self, mut terminal: DefaultTerminal) -> Result<()> {
        self.running = true;
        while self.running {
            terminal.draw(|frame| ui::draw(frame, &self))?;
            self.handle_crossterm_events()?;
        }
        Ok(())
    }

    fn handle_crossterm_events(&mut self) -> Result<()> {
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => self.on_key_event(key),
            Event::Mouse(_) => {}
            Event::Resize(_, _) => {}
            _ => {}
        }
        Ok(())
    }

    pub fn on_key_event(&mut self, key: KeyEvent) {
        if let (KeyModifiers::CONTROL, KeyCode::Char('c' | 'C')) = (key.modifiers, key.code) {
            self.quit();
            return;
        }
        match self.screen {
            Screen::Menu { .. } => self.on_menu_key(key.code),
            Screen::Settings { .. } => self.on_settings_key(key.code),
            Screen::Playing(_) => self.on_game_key(key.code),
        }
    }

    fn on_menu_key(&mut self, code: KeyCode) {
        let Screen::Menu { selected } = &mut self.screen else {
            return;
        };
        match code {
            KeyCode::Up | KeyCode::Char('k') => *selected = selected.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => {
                *selected = (*selected + 1).min(MenuItem::ALL.len() - 1);
            }
            KeyCode::Enter => {
                let item = MenuItem::ALL[*selected];
                self.choose(item);
            }
            KeyCode::Char('1') => self.choose(MenuItem::Play),
            KeyCode::Char('2') => self.choose(MenuItem::Settings),
            KeyCode::Char('0' | 'q') | KeyCode::Esc => self.choose(MenuItem::Quit),
            _ => {}
        }
    }

    fn choose(&mut self, item: MenuItem) {
        self.notice = None;
        match item {
            MenuItem::Play => self.start_game(),
            MenuItem::Settings => {
                self.screen = Screen::Settings {
                    selected: 0,
                    form: None,
                };
            }
            MenuItem::Quit => self.quit(),
        }
    }

    fn start_game(&mut self) {
        match Game::new(&self.config) {
            Ok(game) => self.screen = Screen::Playing(Play::new(game)),
            Err(err) => {
                error!(%err, "could not start a game");
                self.notice = Some(err.to_string());
                self.screen = Screen::menu();
            }
        }
    }

    fn on_settings_key(&mut self, code: KeyCode) {
        let Screen::Settings { selected, form } = &mut self.screen else {
            return;
        };

        if let Some(custom) = form {
            match code {
                KeyCode::Char(ch) => custom.input(ch),
                KeyCode::Backspace => custom.backspace(),
                KeyCode::Tab | KeyCode::Down => custom.next(),
                KeyCode::BackTab | KeyCode::Up => custom.prev(),
                KeyCode::Esc => *form = None,
                KeyCode::Enter => match custom.submit(self.config.seed) {
                    Ok(config) => {
                        self.config = config;
                        self.notice = None;
                        *form = None;
                    }
                    Err(err) => self.notice = Some(err.to_string()),
                },
                _ => {}
            }
            return;
        }

        let item = match code {
            KeyCode::Up | KeyCode::Char('k') => {
                *selected = selected.saturating_sub(1);
                return;
            }
            KeyCode::Down | KeyCode::Char('j') => {
                *selected = (*selected + 1).min(SettingsItem::ALL.len() - 1);
                return;
            }
            KeyCode::Enter => SettingsItem::ALL[*selected],
            KeyCode::Char('b') => SettingsItem::Preset(Difficulty::Beginner),
            KeyCode::Char('i') => SettingsItem::Preset(Difficulty::Intermediate),
            KeyCode::Char('e') => SettingsItem::Preset(Difficulty::Expert),
            KeyCode::Char('c') => SettingsItem::Custom,
            KeyCode::Char('0') | KeyCode::Esc => SettingsItem::Back,
            _ => return,
        };
        match item {
            SettingsItem::Preset(difficulty) => {
                self.config = GameConfig {
                    seed: self.config.seed,
                    ..difficulty.config()
                };
                self.notice = None;
            }
            SettingsItem::Custom => *form = Some(CustomForm::new(&self.config)),
            SettingsItem::Back => {
                self.notice = None;
                self.screen = Screen::menu();
            }
        }
    }

    fn on_game_key(&mut self, code: KeyCode) {
        let Screen::Playing(play) = &mut self.screen else {
            return;
        };

        if play.game.status().is_finished() {
            match code {
                KeyCode::Char('y') | KeyCode::Enter => self.start_game(),
                KeyCode::Char('n' | 'q') | KeyCode::Esc => self.screen = Screen::menu(),
                _ => {}
            }
            return;
        }

        if let Some(prompt) = &mut play.prompt {
            match code {
                KeyCode::Char(ch) => prompt.push(ch),
                KeyCode::Backspace => {
                    prompt.pop();
                }
                KeyCode::Esc => play.prompt = None,
                KeyCode::Enter => {
                    let input = std::mem::take(prompt);
                    play.prompt = None;
                    play.submit(&input);
                }
                _ => {}
            }
        } else {
            match code {
                KeyCode::Up | KeyCode::Char('k') => play.move_cursor(&CursorDirection::Up),
                KeyCode::Down | KeyCode::Char('j') => play.move_cursor(&CursorDirection::Down),
                KeyCode::Left | KeyCode::Char('h') => play.move_cursor(&CursorDirection::Left),
                KeyCode::Right | KeyCode::Char('l') => play.move_cursor(&CursorDirection::Right),
                KeyCode::Char(' ') | KeyCode::Enter => play.act(Action::Dig(play.cursor)),
                KeyCode::Char('f') => play.toggle_flag(),
                KeyCode::Char(':') => {
                    play.prompt = Some(String::new());
                    play.message = None;
                }
                KeyCode::Esc | KeyCode::Char('q') => play.act(Action::Quit),
                _ => {}
            }
        }

        if play.game.status() == GameStatus::Quit {
            self.screen = Screen::menu();
        }
    }

    fn quit(&mut self) {
        self.running = false;
    }
}
