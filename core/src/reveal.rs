use crate::swap::tile_background;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToggleOutcome {
    Opened,
    Closed,
    /// Opening refused: the flip budget is spent.
    Locked,
    Ignored,
}

/// Grid of covered tiles over one image. Tiles open and close on tap; the
/// number of simultaneously open tiles may be capped.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RevealBoard {
    cols: usize,
    rows: usize,
    flipped: Vec<bool>,
    max_flips: Option<u32>,
}

impl RevealBoard {
    pub fn new(cols: usize, rows: usize, max_flips: Option<u32>) -> Self {
        Self {
            cols,
            rows,
            flipped: vec![false; cols * rows],
            max_flips,
        }
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn len(&self) -> usize {
        self.flipped.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flipped.is_empty()
    }

    pub fn max_flips(&self) -> Option<u32> {
        self.max_flips
    }

    pub fn is_open(&self, idx: usize) -> bool {
        self.flipped.get(idx).copied().unwrap_or(false)
    }

    pub fn flipped_count(&self) -> u32 {
        self.flipped.iter().filter(|open| **open).count() as u32
    }

    pub fn can_flip_more(&self) -> bool {
        match self.max_flips {
            Some(max) => self.flipped_count() < max,
            None => true,
        }
    }

    pub fn toggle(&mut self, idx: usize) -> ToggleOutcome {
        let can_flip_more = self.can_flip_more();
        let Some(open) = self.flipped.get_mut(idx) else {
            return ToggleOutcome::Ignored;
        };
        if *open {
            *open = false;
            return ToggleOutcome::Closed;
        }
        if !can_flip_more {
            return ToggleOutcome::Locked;
        }
        *open = true;
        ToggleOutcome::Opened
    }

    pub fn reset(&mut self) {
        self.flipped.iter_mut().for_each(|open| *open = false);
    }

    pub fn tile_background(&self, idx: usize) -> (f32, f32) {
        tile_background(idx, self.cols, self.rows)
    }
}
