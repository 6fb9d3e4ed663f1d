use crate::storage::{KeyValueStorage, StorageError};
use crate::swap::{Difficulty, PuzzleBest};

pub const BEST_KEY_PREFIX: &str = "ahatouch_best_";

pub fn best_key(image_key: &str, difficulty: Difficulty) -> String {
    format!("{BEST_KEY_PREFIX}{image_key}_{}", difficulty.key())
}

pub fn load_best<S: KeyValueStorage>(
    storage: &S,
    image_key: &str,
    difficulty: Difficulty,
) -> Option<PuzzleBest> {
    let raw = storage.get_item(&best_key(image_key, difficulty)).ok()??;
    serde_json::from_str(&raw).ok()
}

pub fn save_best<S: KeyValueStorage>(
    storage: &S,
    image_key: &str,
    difficulty: Difficulty,
    best: &PuzzleBest,
) -> Result<(), StorageError> {
    let raw = serde_json::to_string(best).map_err(|err| StorageError::Encode(err.to_string()))?;
    storage.set_item(&best_key(image_key, difficulty), &raw)
}

/// Persists `candidate` when it beats the stored best. Returns the best
/// that should be shown afterwards and whether it changed.
pub fn record_if_better<S: KeyValueStorage>(
    storage: &S,
    image_key: &str,
    difficulty: Difficulty,
    candidate: PuzzleBest,
) -> Result<(PuzzleBest, bool), StorageError> {
    let current = load_best(storage, image_key, difficulty);
    if !candidate.is_better_than(current.as_ref()) {
        if let Some(current) = current {
            return Ok((current, false));
        }
    }
    save_best(storage, image_key, difficulty, &candidate)?;
    Ok((candidate, true))
}
