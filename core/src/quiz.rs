pub const QUIZ_COLS: usize = 10;
pub const QUIZ_ROWS: usize = 10;
pub const QUIZ_TILE_COUNT: usize = QUIZ_COLS * QUIZ_ROWS;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TileRect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

/// Covers over a category image; tiles only ever open until reset.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuizGrid {
    opened: Vec<bool>,
}

impl Default for QuizGrid {
    fn default() -> Self {
        Self::new()
    }
}

impl QuizGrid {
    pub fn new() -> Self {
        Self {
            opened: vec![false; QUIZ_TILE_COUNT],
        }
    }

    pub fn is_open(&self, idx: usize) -> bool {
        self.opened.get(idx).copied().unwrap_or(false)
    }

    /// Returns `true` only if the tile was closed before.
    pub fn open(&mut self, idx: usize) -> bool {
        match self.opened.get_mut(idx) {
            Some(open) if !*open => {
                *open = true;
                true
            }
            _ => false,
        }
    }

    pub fn reset(&mut self) {
        self.opened.iter_mut().for_each(|open| *open = false);
    }

    pub fn open_all(&mut self) {
        self.opened.iter_mut().for_each(|open| *open = true);
    }

    pub fn opened_count(&self) -> usize {
        self.opened.iter().filter(|open| **open).count()
    }

    pub fn all_opened(&self) -> bool {
        self.opened_count() == QUIZ_TILE_COUNT
    }

    pub fn tile_rect(idx: usize) -> TileRect {
        let width = 100.0 / QUIZ_COLS as f32;
        let height = 100.0 / QUIZ_ROWS as f32;
        let col = idx % QUIZ_COLS;
        let row = idx / QUIZ_COLS;
        TileRect {
            left: col as f32 * width,
            top: row as f32 * height,
            width,
            height,
        }
    }
}
