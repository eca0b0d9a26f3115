use std::ops::{Deref, Index, IndexMut};

/// A `(row, col)` coordinate on the board.
pub type Pos = (usize, usize);

/// What a cell actually holds. Derived once per layout and never changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileContent {
    Mine,
    Blank,
    Count(u8),
}

/// What the player currently sees of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileMode {
    Covered,
    Flagged,
    Revealed(TileContent),
}

/// Row-major grid, `tiles[row][col]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tiles<T>(Vec<Vec<T>>);

impl<T> Deref for Tiles<T> {
    type Target = Vec<Vec<T>>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T> Index<Pos> for Tiles<T> {
    type Output = T;

    fn index(&self, (row, col): Pos) -> &Self::Output {
        &self.0[row][col]
    }
}

impl<T> IndexMut<Pos> for Tiles<T> {
    fn index_mut(&mut self, (row, col): Pos) -> &mut Self::Output {
        &mut self.0[row][col]
    }
}

/// Up to 8 cells surrounding `pos`, clipped to the board. No wraparound.
pub fn neighbours((row, col): Pos, (rows, cols): (usize, usize)) -> Vec<Pos> {
    (-1isize..=1)
        .flat_map(|row_offset| (-1isize..=1).map(move |col_offset| (row_offset, col_offset)))
        .filter(|&offset| offset != (0, 0))
        .filter_map(|(row_offset, col_offset)| {
            let row = row.checked_add_signed(row_offset)?;
            let col = col.checked_add_signed(col_offset)?;
            (row < rows && col < cols).then_some((row, col))
        })
        .collect()
}

impl<T> Tiles<T> {
    pub fn from_fn((rows, cols): (usize, usize), mut f: impl FnMut(Pos) -> T) -> Self {
        Tiles(
            (0..rows)
                .map(|row| (0..cols).map(|col| f((row, col))).collect())
                .collect(),
        )
    }

    pub fn filled(size: (usize, usize), value: T) -> Self
    where
        T: Clone,
    {
        Self::from_fn(size, |_| value.clone())
    }

    /// `(rows, cols)`
    pub fn size(&self) -> (usize, usize) {
        (self.len(), self.first().map_or(0, Vec::len))
    }

    pub fn contains(&self, (row, col): Pos) -> bool {
        let (rows, cols) = self.size();
        row < rows && col < cols
    }

    pub fn neighbours(&self, pos: Pos) -> Vec<Pos> {
        neighbours(pos, self.size())
    }

    pub fn positions(&self) -> impl Iterator<Item = Pos> + use<T> {
        let (rows, cols) = self.size();
        (0..rows).flat_map(move |row| (0..cols).map(move |col| (row, col)))
    }

    pub fn count(&self, mut pred: impl FnMut(&T) -> bool) -> usize {
        self.iter().flatten().filter(|tile| pred(tile)).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neighbours_of_center_cell() {
        let found = neighbours((4, 4), (9, 9));
        assert_eq!(found.len(), 8);
        for pos in [
            (3, 3),
            (3, 4),
            (3, 5),
            (4, 3),
            (4, 5),
            (5, 3),
            (5, 4),
            (5, 5),
        ] {
            assert!(found.contains(&pos), "missing neighbour {pos:?}");
        }
        assert!(!found.contains(&(4, 4)));
    }

    #[test]
    fn neighbours_are_clipped_at_corners_and_edges() {
        let top_left = neighbours((0, 0), (9, 9));
        assert_eq!(top_left.len(), 3);
        assert!(top_left.contains(&(0, 1)));
        assert!(top_left.contains(&(1, 0)));
        assert!(top_left.contains(&(1, 1)));

        let bottom_right = neighbours((8, 8), (9, 9));
        assert_eq!(bottom_right.len(), 3);
        assert!(bottom_right.contains(&(7, 7)));

        assert_eq!(neighbours((0, 4), (9, 9)).len(), 5);
        assert_eq!(neighbours((4, 0), (9, 9)).len(), 5);
    }

    #[test]
    fn neighbours_on_degenerate_boards() {
        assert!(neighbours((0, 0), (1, 1)).is_empty());
        assert_eq!(neighbours((0, 1), (1, 3)), vec![(0, 0), (0, 2)]);
        assert_eq!(neighbours((2, 0), (3, 1)), vec![(1, 0)]);
    }

    #[test]
    fn rectangular_grid_is_row_major() {
        let tiles = Tiles::from_fn((2, 3), |(row, col)| row * 10 + col);
        assert_eq!(tiles.size(), (2, 3));
        assert_eq!(tiles[(1, 2)], 12);
        assert!(tiles.contains((1, 2)));
        assert!(!tiles.contains((2, 0)));
        assert!(!tiles.contains((0, 3)));
        assert_eq!(tiles.positions().count(), 6);
        assert_eq!(tiles.count(|&value| value >= 10), 3);
    }
}
