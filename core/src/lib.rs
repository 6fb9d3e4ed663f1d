pub mod best;
pub mod blob;
pub mod catalog;
pub mod codec;
pub mod images;
pub mod quiz;
pub mod reveal;
pub mod rng;
pub mod route;
pub mod storage;
pub mod swap;

pub use best::{best_key, load_best, record_if_better, save_best};
pub use blob::{validate_upload, ImageBlobEntry, ImageRefs, IMAGE_REFS_KEY, IMAGE_UPLOAD_MAX_BYTES};
pub use catalog::{
    category_by_id, images_by_category, pick_random, puzzle_image_src, CatalogImage,
    CategoryEntry, CATEGORIES, PICKER_CARD_COUNT,
};
pub use codec::{decode, encode, CodecError};
pub use images::{
    ImageLibrary, ImageMeta, ImageWithSrc, LibraryKeys, StoredImage, CHIRA_LIBRARY, USER_LIBRARY,
};
pub use quiz::{QuizGrid, TileRect, QUIZ_COLS, QUIZ_ROWS, QUIZ_TILE_COUNT};
pub use reveal::{RevealBoard, ToggleOutcome};
pub use rng::{splitmix32, time_seed};
pub use route::Route;
pub use storage::{KeyValueStorage, MemoryStorage, StorageError};
pub use swap::{
    calc_goals, format_ms, Difficulty, Goals, PuzzleBest, SwapPuzzle, TapOutcome, DIFFICULTIES,
};
