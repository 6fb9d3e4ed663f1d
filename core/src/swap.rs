use serde::{Deserialize, Serialize};

use crate::rng::shuffle;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Difficulty {
    #[default]
    Easy,
    Normal,
    Hard,
}

pub const DIFFICULTIES: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Normal, Difficulty::Hard];

impl Difficulty {
    pub fn grid_size(self) -> usize {
        match self {
            Difficulty::Easy => 4,
            Difficulty::Normal => 6,
            Difficulty::Hard => 10,
        }
    }

    pub fn default_goal_moves(self) -> u32 {
        match self {
            Difficulty::Easy => 20,
            Difficulty::Normal => 50,
            Difficulty::Hard => 90,
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Normal => "normal",
            Difficulty::Hard => "hard",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Easy => "やさしい",
            Difficulty::Normal => "ふつう",
            Difficulty::Hard => "上級",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        DIFFICULTIES
            .iter()
            .copied()
            .find(|difficulty| difficulty.key().eq_ignore_ascii_case(key.trim()))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Goals {
    pub goal: u32,
    pub stretch: u32,
}

pub fn calc_goals(best_moves: Option<u32>, difficulty: Difficulty) -> Goals {
    match best_moves {
        None => {
            let goal = difficulty.default_goal_moves();
            Goals {
                goal,
                stretch: goal.saturating_sub(5).max(1),
            }
        }
        Some(best) => Goals {
            goal: best.saturating_sub(1).max(1),
            stretch: best.saturating_sub(2).max(1),
        },
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PuzzleBest {
    pub moves: u32,
    pub time_ms: u64,
}

impl PuzzleBest {
    pub fn is_better_than(&self, current: Option<&PuzzleBest>) -> bool {
        let Some(current) = current else {
            return true;
        };
        (self.moves, self.time_ms) < (current.moves, current.time_ms)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TapOutcome {
    Ignored,
    Selected,
    Deselected,
    Swapped,
    Solved(PuzzleBest),
}

/// `order[pos]` is the piece shown at board position `pos`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SwapPuzzle {
    size: usize,
    order: Vec<usize>,
    selected: Option<usize>,
    moves: u32,
    started_at: Option<u64>,
    solved_at: Option<u64>,
    solved: bool,
}

impl SwapPuzzle {
    /// Identity board; used before a client-side shuffle is possible.
    pub fn unshuffled(size: usize) -> Self {
        Self {
            size,
            order: (0..size * size).collect(),
            selected: None,
            moves: 0,
            started_at: None,
            solved_at: None,
            solved: false,
        }
    }

    pub fn shuffled(size: usize, seed: u32) -> Self {
        let mut puzzle = Self::unshuffled(size);
        shuffle(&mut puzzle.order, seed);
        if puzzle.order.len() >= 2 && is_identity(&puzzle.order) {
            puzzle.order.swap(0, 1);
        }
        puzzle
    }

    pub fn from_order(order: Vec<usize>) -> Option<Self> {
        let size = (order.len() as f64).sqrt() as usize;
        if size * size != order.len() {
            return None;
        }
        let mut seen = vec![false; order.len()];
        for piece in &order {
            if *piece >= order.len() || seen[*piece] {
                return None;
            }
            seen[*piece] = true;
        }
        Some(Self {
            order,
            ..Self::unshuffled(size)
        })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn order(&self) -> &[usize] {
        &self.order
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn moves(&self) -> u32 {
        self.moves
    }

    pub fn started_at(&self) -> Option<u64> {
        self.started_at
    }

    pub fn is_complete(&self) -> bool {
        self.solved
    }

    pub fn is_solved(&self) -> bool {
        is_identity(&self.order)
    }

    pub fn tap(&mut self, pos: usize, now_ms: u64) -> TapOutcome {
        if self.solved || pos >= self.order.len() {
            return TapOutcome::Ignored;
        }
        let started_at = *self.started_at.get_or_insert(now_ms);
        let Some(selected) = self.selected else {
            self.selected = Some(pos);
            return TapOutcome::Selected;
        };
        if selected == pos {
            self.selected = None;
            return TapOutcome::Deselected;
        }
        self.order.swap(selected, pos);
        self.selected = None;
        self.moves += 1;
        if !self.is_solved() {
            return TapOutcome::Swapped;
        }
        self.solved = true;
        self.solved_at = Some(now_ms);
        TapOutcome::Solved(PuzzleBest {
            moves: self.moves,
            time_ms: now_ms.saturating_sub(started_at),
        })
    }

    pub fn elapsed_ms(&self, now_ms: u64) -> u64 {
        let Some(started_at) = self.started_at else {
            return 0;
        };
        self.solved_at
            .unwrap_or(now_ms)
            .saturating_sub(started_at)
    }

    /// Clock is running: started and not yet solved.
    pub fn is_ticking(&self) -> bool {
        self.started_at.is_some() && !self.solved
    }

    /// CSS background position (percent) of `piece` inside a `size x size` sprite.
    pub fn tile_background(&self, piece: usize) -> (f32, f32) {
        tile_background(piece, self.size, self.size)
    }
}

pub fn tile_background(index: usize, cols: usize, rows: usize) -> (f32, f32) {
    let cols = cols.max(1);
    let col = index % cols;
    let row = index / cols;
    let denom_x = cols.saturating_sub(1).max(1) as f32;
    let denom_y = rows.saturating_sub(1).max(1) as f32;
    (col as f32 * 100.0 / denom_x, row as f32 * 100.0 / denom_y)
}

fn is_identity(order: &[usize]) -> bool {
    order.iter().enumerate().all(|(idx, piece)| idx == *piece)
}

pub fn format_ms(ms: u64) -> String {
    let total_sec = ms / 1000;
    format!("{}:{:02}", total_sec / 60, total_sec % 60)
}
