use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("board must have at least one row and one column, got {rows}x{cols}")]
    InvalidDimensions { rows: usize, cols: usize },
    #[error("{mines} mines do not fit on a board of {cells} cells")]
    TooManyMines { mines: usize, cells: usize },
    #[error("could not place mines without boxing one in after {attempts} attempts")]
    UnsatisfiableLayout { attempts: usize },
    #[error("({row}, {col}) is outside the board")]
    OutOfBounds { row: usize, col: usize },
}

pub type Result<T> = std::result::Result<T, GameError>;
