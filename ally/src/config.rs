//! Application configuration constants
//!
//! Central location for file names, policy defaults and validation
//! boundaries used throughout the journal.

// ===== Persisted Documents =====

/// Entry collection, most-recent-first
pub const ENTRIES_FILE: &str = "entries.json";
/// Favorite photo filenames
pub const FAVORITES_FILE: &str = "favorites.json";
/// Good-thing notes, most-recent-first
pub const GOOD_THINGS_FILE: &str = "goodthings.json";
/// Reflect cards
pub const REFLECT_FILE: &str = "reflect.json";
/// Journal settings
pub const SETTINGS_FILE: &str = "settings.json";

/// Environment variable overriding the data directory
pub const DATA_DIR_ENV: &str = "ALLY_DATA_DIR";
/// Directory name under the platform data directory
pub const APP_DIR_NAME: &str = "ally";
/// Scratch directory name (under the system temp dir) for export artifacts
pub const EXPORT_SCRATCH_DIR: &str = "ally-exports";

// ===== Retention =====

/// Number of entries kept by the bulk "delete older" action
pub const DEFAULT_RETENTION_KEEP: usize = 50;
/// Smallest allowed retention count
pub const MIN_RETENTION_KEEP: usize = 1;
/// Largest allowed retention count
pub const MAX_RETENTION_KEEP: usize = 10_000;

// ===== Gallery =====

/// Maximum number of favorite photos kept per import
pub const DEFAULT_FAVORITES_CAP: usize = 3;
/// Upper bound for a configured favorites cap
pub const MAX_FAVORITES_CAP: usize = 12;
/// Shown when no coping plan has been written yet
pub const FALLBACK_QUOTE: &str = "Be kind to yourself. Breathe.";

// ===== Journal List =====

/// Entries revealed initially and on each "load more" step
pub const DEFAULT_PAGE_STEP: usize = 5;
/// Upper bound for the page step
pub const MAX_PAGE_STEP: usize = 500;

// ===== Transcription =====

/// In-flight transcriptions are cancelled after this many seconds
pub const DEFAULT_TRANSCRIPTION_TIMEOUT_SECS: u64 = 60;
/// Minimum transcription timeout
pub const MIN_TRANSCRIPTION_TIMEOUT_SECS: u64 = 1;
/// Maximum transcription timeout (10 minutes)
pub const MAX_TRANSCRIPTION_TIMEOUT_SECS: u64 = 600;

// ===== Prompts =====

/// Used when a session starts with no configured questions
pub const FALLBACK_QUESTION: &str = "What's on your mind? Say or type anything.";

/// Guided prompts presented for a new entry
pub const DEFAULT_QUESTIONS: &[&str] = &[
    "Situation (when/where)?",
    "Thoughts?",
    "Physical sensations?",
    "Anxiety rating (1–10)?",
    "What did I do?",
    "What did I say to myself?",
    "Second rating (1–10)?",
];

/// Entries included in the "analyze patterns" prompt
pub const ANALYSIS_ENTRY_COUNT: usize = 10;

// ===== Media =====

/// Recorded voice answers
pub const AUDIO_PREFIX: &str = "rec";
pub const AUDIO_EXTENSION: &str = "m4a";
/// Imported favorite photos
pub const PHOTO_PREFIX: &str = "fav";
pub const PHOTO_EXTENSION: &str = "jpg";
/// Any other imported data (video and friends)
pub const FILE_PREFIX: &str = "file";

pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "heic", "heif", "gif", "webp"];
pub const VIDEO_EXTENSIONS: &[&str] = &["mov", "mp4", "m4v", "hevc", "avi", "mkv"];
