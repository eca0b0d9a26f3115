use std::collections::VecDeque;

use crate::tiles::{Pos, TileContent, TileMode, Tiles};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Safe,
    Detonated,
}

/// Uncovers `start`. A blank start floods out breadth-first through connected
/// blanks and stops on the numbered cells bordering them.
pub fn reveal(tiles: &mut Tiles<TileMode>, answers: &Tiles<TileContent>, start: Pos) -> Outcome {
    match answers[start] {
        TileContent::Mine => {
            expose(tiles, answers);
            Outcome::Detonated
        }
        TileContent::Count(_) => {
            if tiles[start] == TileMode::Covered {
                tiles[start] = TileMode::Revealed(answers[start]);
            }
            Outcome::Safe
        }
        TileContent::Blank => {
            flood(tiles, answers, start);
            Outcome::Safe
        }
    }
}

fn flood(tiles: &mut Tiles<TileMode>, answers: &Tiles<TileContent>, start: Pos) {
    let mut queue = VecDeque::from([start]);
    while let Some(pos) = queue.pop_front() {
        // cells can be queued more than once; only the first visit counts
        if tiles[pos] != TileMode::Covered {
            continue;
        }
        tiles[pos] = TileMode::Revealed(answers[pos]);
        if answers[pos] == TileContent::Blank {
            queue.extend(tiles.neighbours(pos));
        }
    }
}

/// Loss reveal: every cell the player has not flagged shows its answer.
fn expose(tiles: &mut Tiles<TileMode>, answers: &Tiles<TileContent>) {
    for pos in tiles.positions() {
        if tiles[pos] != TileMode::Flagged {
            tiles[pos] = TileMode::Revealed(answers[pos]);
        }
    }
}
