use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::{error::Result, minefield::check_size};

/// Board shape and mine density for one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameConfig {
    pub rows: usize,
    pub cols: usize,
    pub mines: usize,
    /// Fixed seed for reproducible layouts, fresh entropy otherwise.
    pub seed: Option<u64>,
}

impl GameConfig {
    pub fn new(rows: usize, cols: usize, mines: usize) -> Self {
        Self {
            rows,
            cols,
            mines,
            seed: None,
        }
    }

    pub fn size(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn validate(&self) -> Result<()> {
        check_size(self.size(), self.mines)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Difficulty::Beginner.config()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Expert,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Self::Beginner, Self::Intermediate, Self::Expert];

    pub fn config(self) -> GameConfig {
        match self {
            Self::Beginner => GameConfig::new(8, 8, 10),
            Self::Intermediate => GameConfig::new(16, 16, 40),
            Self::Expert => GameConfig::new(30, 16, 99),
        }
    }

    /// The preset `config` matches, `None` for a custom board.
    pub fn of(config: &GameConfig) -> Option<Self> {
        Self::ALL.into_iter().find(|difficulty| {
            let preset = difficulty.config();
            preset.size() == config.size() && preset.mines == config.mines
        })
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Beginner => "Beginner",
            Self::Intermediate => "Intermediate",
            Self::Expert => "Expert",
        }
    }
}

#[derive(Debug, Parser)]
#[command(version, about = "Clear the minefield without setting anything off")]
pub struct Args {
    /// Starting preset, individual dimensions below override it
    #[arg(short, long, value_enum, default_value_t = Difficulty::Beginner)]
    pub difficulty: Difficulty,
    #[arg(long)]
    pub rows: Option<usize>,
    #[arg(long)]
    pub cols: Option<usize>,
    #[arg(long)]
    pub mines: Option<usize>,
    /// Seed for reproducible mine layouts
    #[arg(long)]
    pub seed: Option<u64>,
    /// Write logs to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,
    /// Log at debug level instead of info
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    pub fn config(&self) -> Result<GameConfig> {
        let preset = self.difficulty.config();
        let config = GameConfig {
            rows: self.rows.unwrap_or(preset.rows),
            cols: self.cols.unwrap_or(preset.cols),
            mines: self.mines.unwrap_or(preset.mines),
            seed: self.seed,
        };
        config.validate()?;
        Ok(config)
    }
}
