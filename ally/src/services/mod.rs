//! Services module
//!
//! Business logic services that coordinate between commands and the
//! journal repository.

pub mod export;
pub mod gallery;
pub mod recording;
pub mod session;
pub mod settings;

pub use export::{ExportFormat, ExportService};
pub use gallery::GalleryService;
pub use recording::{AudioCapture, ClipCapture, CommandRecognizer, SpeechToText, VoiceAnswerRecorder};
pub use session::{DraftTicket, SessionBuilder};
pub use settings::{JournalSettings, SettingsService};
