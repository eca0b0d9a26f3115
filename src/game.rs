use std::time::{Duration, Instant};

use rand::{SeedableRng, rngs::StdRng};
use tracing::{debug, info, warn};

use crate::{
    config::GameConfig,
    error::{GameError, Result},
    minefield::Minefield,
    reveal::{Outcome, reveal},
    tiles::{Pos, TileContent, TileMode, Tiles},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Dig(Pos),
    Flag(Pos),
    Unflag(Pos),
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    InProgress,
    Won,
    Lost,
    Quit,
}

impl GameStatus {
    pub fn is_finished(self) -> bool {
        !matches!(self, Self::InProgress)
    }
}

/// One playthrough: the answer layout, what the player sees of it, and the
/// outcome so far.
pub struct Game {
    minefield: Minefield,
    tiles: Tiles<TileMode>,
    status: GameStatus,
    rng: StdRng,
    started: Option<Instant>,
    took: Option<Duration>,
    detonated: Option<Pos>,
}

impl Game {
    pub fn new(config: &GameConfig) -> Result<Self> {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        };
        Self::with_rng(config, rng)
    }

    pub fn with_rng(config: &GameConfig, mut rng: StdRng) -> Result<Self> {
        let minefield = Minefield::generate(config.size(), config.mines, None, &mut rng)?;
        info!(
            rows = config.rows,
            cols = config.cols,
            mines = config.mines,
            "new game"
        );
        Ok(Self::from_minefield(minefield, rng))
    }

    pub fn from_minefield(minefield: Minefield, rng: StdRng) -> Self {
        Self {
            tiles: Tiles::filled(minefield.size(), TileMode::Covered),
            minefield,
            status: GameStatus::InProgress,
            rng,
            started: None,
            took: None,
            detonated: None,
        }
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn size(&self) -> (usize, usize) {
        self.tiles.size()
    }

    pub fn mine_count(&self) -> usize {
        self.minefield.mine_count()
    }

    pub fn flags_placed(&self) -> usize {
        self.tiles.count(|&tile| tile == TileMode::Flagged)
    }

    /// Can go negative when the player over-flags.
    pub fn mines_left(&self) -> isize {
        self.mine_count() as isize - self.flags_placed() as isize
    }

    pub fn tile_at(&self, pos: Pos) -> TileMode {
        self.tiles[pos]
    }

    pub fn tiles(&self) -> &Tiles<TileMode> {
        &self.tiles
    }

    /// The true content of a cell, only available once the game is over.
    pub fn answer_at(&self, pos: Pos) -> Option<TileContent> {
        matches!(self.status, GameStatus::Won | GameStatus::Lost)
            .then(|| self.minefield.content_at(pos))
    }

    pub fn detonated(&self) -> Option<Pos> {
        self.detonated
    }

    pub fn elapsed(&self) -> Duration {
        match (self.took, self.started) {
            (Some(took), _) => took,
            (None, Some(started)) => started.elapsed(),
            (None, None) => Duration::ZERO,
        }
    }

    pub fn apply(&mut self, action: Action) -> Result<GameStatus> {
        if let Action::Dig(pos) | Action::Flag(pos) | Action::Unflag(pos) = action {
            if !self.tiles.contains(pos) {
                return Err(GameError::OutOfBounds {
                    row: pos.0,
                    col: pos.1,
                });
            }
        }
        if action == Action::Quit {
            info!(previous = ?self.status, "player quit");
            self.status = GameStatus::Quit;
            return Ok(self.status);
        }
        if self.status.is_finished() {
            return Ok(self.status);
        }

        match action {
            Action::Quit => {}
            Action::Dig(pos) => self.dig(pos)?,
            Action::Flag(pos) => {
                if self.tiles[pos] == TileMode::Covered {
                    self.tiles[pos] = TileMode::Flagged;
                }
            }
            Action::Unflag(pos) => {
                if self.tiles[pos] == TileMode::Flagged {
                    self.tiles[pos] = TileMode::Covered;
                }
            }
        }

        if self.status == GameStatus::InProgress && self.has_won() {
            self.finish(GameStatus::Won);
        }
        Ok(self.status)
    }

    fn dig(&mut self, pos: Pos) -> Result<()> {
        match self.tiles[pos] {
            TileMode::Covered => self.uncover(pos),
            TileMode::Revealed(TileContent::Count(count)) => self.chord(pos, count),
            TileMode::Flagged | TileMode::Revealed(TileContent::Blank | TileContent::Mine) => {
                Ok(())
            }
        }
    }

    fn uncover(&mut self, pos: Pos) -> Result<()> {
        if self.started.is_none() {
            self.make_safe(pos)?;
            self.started = Some(Instant::now());
        }
        if reveal(&mut self.tiles, self.minefield.answers(), pos) == Outcome::Detonated {
            self.detonated = Some(pos);
            self.finish(GameStatus::Lost);
        }
        Ok(())
    }

    /// Digs every covered neighbour of a numbered cell once enough flags
    /// surround it. A mismatched flag count leaves the board alone.
    fn chord(&mut self, pos: Pos, count: u8) -> Result<()> {
        let neighbours = self.tiles.neighbours(pos);
        let flags = neighbours
            .iter()
            .filter(|&&neighbour| self.tiles[neighbour] == TileMode::Flagged)
            .count();
        if flags != usize::from(count) {
            debug!(?pos, count, flags, "chord ignored, flag count does not match");
            return Ok(());
        }
        for neighbour in neighbours {
            if self.tiles[neighbour] != TileMode::Covered {
                continue;
            }
            self.uncover(neighbour)?;
            if self.status == GameStatus::Lost {
                break;
            }
        }
        Ok(())
    }

    /// The first dig never hits a mine: move the layout out of the way.
    /// When no layout avoids `pos` the dig is refused and nothing changes.
    fn make_safe(&mut self, pos: Pos) -> Result<()> {
        if !self.minefield.is_mine(pos) {
            return Ok(());
        }
        let minefield = Minefield::generate(
            self.minefield.size(),
            self.minefield.mine_count(),
            Some(pos),
            &mut self.rng,
        )
        .inspect_err(|err| warn!(%err, ?pos, "cannot keep first dig safe"))?;
        debug!(?pos, "regenerated layout around first dig");
        self.minefield = minefield;
        Ok(())
    }

    fn has_won(&self) -> bool {
        self.flags_placed() == self.minefield.mine_count()
            && self
                .tiles
                .positions()
                .filter(|&pos| self.minefield.is_mine(pos))
                .all(|pos| self.tiles[pos] == TileMode::Flagged)
    }

    fn finish(&mut self, status: GameStatus) {
        self.status = status;
        self.took = Some(self.elapsed());
        info!(?status, took = ?self.took, "game over");
    }
}
