//! Mine placement and derivation of the answer grid.

use rand::{Rng, seq::SliceRandom};
use tracing::debug;

use crate::{
    error::{GameError, Result},
    tiles::{Pos, TileContent, Tiles},
};

/// Fresh layouts drawn before giving up on a mine density.
pub const MAX_PLACEMENT_ATTEMPTS: usize = 1000;

/// The immutable answer side of a game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Minefield {
    answers: Tiles<TileContent>,
    mine_count: usize,
}

pub fn check_size((rows, cols): (usize, usize), mine_count: usize) -> Result<()> {
    if rows == 0 || cols == 0 {
        return Err(GameError::InvalidDimensions { rows, cols });
    }
    let cells = rows.saturating_mul(cols);
    if mine_count >= cells {
        return Err(GameError::TooManyMines {
            mines: mine_count,
            cells,
        });
    }
    Ok(())
}

/// First mine whose every neighbour is also a mine, if any.
pub fn boxed_in_mine(mines: &Tiles<bool>) -> Option<Pos> {
    mines.positions().find(|&pos| {
        mines[pos]
            && mines
                .neighbours(pos)
                .iter()
                .all(|&neighbour| mines[neighbour])
    })
}

/// Mines stay mines, every other cell gets its neighbour count with 0 as `Blank`.
pub fn derive(mines: &Tiles<bool>) -> Tiles<TileContent> {
    Tiles::from_fn(mines.size(), |pos| {
        if mines[pos] {
            return TileContent::Mine;
        }
        let count = mines
            .neighbours(pos)
            .iter()
            .filter(|&&neighbour| mines[neighbour])
            .count();
        match count {
            0 => TileContent::Blank,
            n => TileContent::Count(n as u8),
        }
    })
}

impl Minefield {
    /// Draws `mine_count` distinct cells uniformly, never `avoid`, until no
    /// mine is boxed in by other mines.
    pub fn generate<R: Rng + ?Sized>(
        size: (usize, usize),
        mine_count: usize,
        avoid: Option<Pos>,
        rng: &mut R,
    ) -> Result<Self> {
        check_size(size, mine_count)?;
        let mut candidates = Tiles::filled(size, ())
            .positions()
            .filter(|&pos| Some(pos) != avoid)
            .collect::<Vec<_>>();

        for attempt in 1..=MAX_PLACEMENT_ATTEMPTS {
            candidates.shuffle(rng);
            let mut mines = Tiles::filled(size, false);
            for &pos in candidates.iter().take(mine_count) {
                mines[pos] = true;
            }
            if let Some(pos) = boxed_in_mine(&mines) {
                debug!(attempt, ?pos, "discarding layout with a boxed-in mine");
                continue;
            }
            return Ok(Self {
                answers: derive(&mines),
                mine_count,
            });
        }
        Err(GameError::UnsatisfiableLayout {
            attempts: MAX_PLACEMENT_ATTEMPTS,
        })
    }

    /// Builds a layout from explicit mine positions. Duplicates collapse.
    #[cfg(test)]
    pub fn from_mines(size: (usize, usize), positions: &[Pos]) -> Result<Self> {
        check_size(size, 0)?;
        let mut mines = Tiles::filled(size, false);
        for &(row, col) in positions {
            if !mines.contains((row, col)) {
                return Err(GameError::OutOfBounds { row, col });
            }
            mines[(row, col)] = true;
        }
        let mine_count = mines.count(|&mine| mine);
        check_size(size, mine_count)?;
        if boxed_in_mine(&mines).is_some() {
            return Err(GameError::UnsatisfiableLayout { attempts: 1 });
        }
        Ok(Self {
            answers: derive(&mines),
            mine_count,
        })
    }

    pub fn size(&self) -> (usize, usize) {
        self.answers.size()
    }

    pub fn mine_count(&self) -> usize {
        self.mine_count
    }

    pub fn answers(&self) -> &Tiles<TileContent> {
        &self.answers
    }

    pub fn content_at(&self, pos: Pos) -> TileContent {
        self.answers[pos]
    }

    pub fn is_mine(&self, pos: Pos) -> bool {
        self.answers[pos] == TileContent::Mine
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    fn mines_of(field: &Minefield) -> Tiles<bool> {
        Tiles::from_fn(field.size(), |pos| field.is_mine(pos))
    }

    #[test]
    fn generated_layouts_have_exact_mine_count() {
        for (seed, (size, mines)) in [((8, 8), 10), ((16, 16), 40), ((30, 16), 99), ((3, 3), 7)]
            .into_iter()
            .enumerate()
        {
            let mut rng = StdRng::seed_from_u64(seed as u64);
            let field = Minefield::generate(size, mines, None, &mut rng).unwrap();
            assert_eq!(field.mine_count(), mines);
            assert_eq!(field.answers().count(|&c| c == TileContent::Mine), mines);
        }
    }

    #[test]
    fn generated_layouts_never_box_in_a_mine() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let field = Minefield::generate((5, 5), 18, None, &mut rng).unwrap();
            assert_eq!(boxed_in_mine(&mines_of(&field)), None);
        }
    }

    #[test]
    fn derived_counts_match_neighbouring_mines() {
        let mut rng = StdRng::seed_from_u64(42);
        let field = Minefield::generate((16, 16), 40, None, &mut rng).unwrap();
        let mines = mines_of(&field);
        for pos in mines.positions() {
            if mines[pos] {
                continue;
            }
            let expected = mines.neighbours(pos).iter().filter(|&&n| mines[n]).count();
            let content = field.content_at(pos);
            match expected {
                0 => assert_eq!(content, TileContent::Blank, "at {pos:?}"),
                n => assert_eq!(content, TileContent::Count(n as u8), "at {pos:?}"),
            }
        }
    }

    #[test]
    fn three_by_three_scenario_counts() {
        let field = Minefield::from_mines((3, 3), &[(0, 0), (2, 2)]).unwrap();
        use TileContent::*;
        let expected = [
            [Mine, Count(1), Blank],
            [Count(1), Count(2), Count(1)],
            [Blank, Count(1), Mine],
        ];
        for (row, line) in expected.iter().enumerate() {
            for (col, &content) in line.iter().enumerate() {
                assert_eq!(field.content_at((row, col)), content, "at ({row}, {col})");
            }
        }
    }

    #[test]
    fn boxed_in_predicate_on_small_boards() {
        // a lone mine on 2x2 has three free neighbours
        assert!(Minefield::from_mines((2, 2), &[(0, 0)]).is_ok());
        // every cell of a 2x2 touches the one free cell
        assert!(Minefield::from_mines((2, 2), &[(0, 0), (0, 1), (1, 0)]).is_ok());

        let all_but_corner = Tiles::filled((3, 3), ())
            .positions()
            .filter(|&pos| pos != (0, 0))
            .collect::<Vec<_>>();
        assert_eq!(
            Minefield::from_mines((3, 3), &all_but_corner),
            Err(GameError::UnsatisfiableLayout { attempts: 1 })
        );

        let all_but_center = Tiles::filled((3, 3), ())
            .positions()
            .filter(|&pos| pos != (1, 1))
            .collect::<Vec<_>>();
        assert!(Minefield::from_mines((3, 3), &all_but_center).is_ok());
    }

    #[test]
    fn dense_board_converges_on_only_valid_layout() {
        let mut rng = StdRng::seed_from_u64(3);
        let field = Minefield::generate((3, 3), 8, None, &mut rng).unwrap();
        assert_eq!(field.content_at((1, 1)), TileContent::Count(8));
    }

    #[test]
    fn impossible_density_reports_configuration_error() {
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(
            Minefield::generate((3, 3), 8, Some((0, 0)), &mut rng),
            Err(GameError::UnsatisfiableLayout {
                attempts: MAX_PLACEMENT_ATTEMPTS
            })
        );
    }

    #[test]
    fn avoided_cell_is_never_mined() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..100 {
            let field = Minefield::generate((4, 4), 12, Some((2, 1)), &mut rng).unwrap();
            assert!(!field.is_mine((2, 1)));
        }
    }

    #[test]
    fn same_seed_same_layout() {
        let first = Minefield::generate((16, 16), 40, None, &mut StdRng::seed_from_u64(9));
        let second = Minefield::generate((16, 16), 40, None, &mut StdRng::seed_from_u64(9));
        assert_eq!(first, second);
    }

    #[test]
    fn size_is_validated() {
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(
            Minefield::generate((0, 5), 0, None, &mut rng),
            Err(GameError::InvalidDimensions { rows: 0, cols: 5 })
        );
        assert_eq!(
            Minefield::generate((2, 2), 4, None, &mut rng),
            Err(GameError::TooManyMines { mines: 4, cells: 4 })
        );
        assert_eq!(
            Minefield::from_mines((2, 2), &[(2, 0)]),
            Err(GameError::OutOfBounds { row: 2, col: 0 })
        );
        assert!(Minefield::generate((1, 1), 0, None, &mut rng).is_ok());
    }
}
