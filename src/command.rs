//! Typed commands. Coordinates are single characters so a whole move fits in
//! two or three keystrokes: `0-9` first, then `A-Z`, then `a-z`. A bare `RC`
//! dig may not start with a command letter; `dRC` reaches those rows.

use thiserror::Error;

use crate::{game::Action, tiles::Pos};

/// Rows and columns beyond this cannot be named by a token.
pub const ENCODABLE: usize = 62;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("type a move first")]
    Empty,
    #[error("'{0}' is not a coordinate")]
    BadCoordinate(char),
    #[error("unknown command '{0}', try 3a, f3a, u3a or q")]
    Unknown(String),
}

pub fn encode(n: usize) -> Option<char> {
    if n >= ENCODABLE {
        return None;
    }
    let n = n as u8;
    match n {
        0..=9 => Some(char::from(b'0' + n)),
        10..=35 => Some(char::from(b'A' + n - 10)),
        36..=61 => Some(char::from(b'a' + n - 36)),
        _ => None,
    }
}

pub fn decode(ch: char) -> Option<usize> {
    match ch {
        '0'..='9' => Some(ch as usize - '0' as usize),
        'A'..='Z' => Some(ch as usize - 'A' as usize + 10),
        'a'..='z' => Some(ch as usize - 'a' as usize + 36),
        _ => None,
    }
}

fn is_command(ch: char) -> bool {
    matches!(ch, 'd' | 'f' | 'u' | 'q')
}

fn pos(row: char, col: char) -> Result<Pos, CommandError> {
    let row = decode(row).ok_or(CommandError::BadCoordinate(row))?;
    let col = decode(col).ok_or(CommandError::BadCoordinate(col))?;
    Ok((row, col))
}

/// `q` quits, `RC` digs, `dRC`/`fRC`/`uRC` dig, flag or unflag.
/// Bounds are left to the game.
pub fn parse(input: &str) -> Result<Action, CommandError> {
    let token = input.trim();
    let chars = token.chars().collect::<Vec<_>>();
    match chars[..] {
        [] => Err(CommandError::Empty),
        ['q'] => Ok(Action::Quit),
        [row, col] if !is_command(row) => Ok(Action::Dig(pos(row, col)?)),
        ['d', row, col] => Ok(Action::Dig(pos(row, col)?)),
        ['f', row, col] => Ok(Action::Flag(pos(row, col)?)),
        ['u', row, col] => Ok(Action::Unflag(pos(row, col)?)),
        _ => Err(CommandError::Unknown(token.to_string())),
    }
}
