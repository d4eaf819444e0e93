//! Storage module
//!
//! Provides the JSON document store backing each journal collection and
//! the media store for recorded audio and imported photos.

pub mod json_store;
pub mod media_store;

pub use json_store::JsonDocument;
pub use media_store::{is_image_filename, is_video_filename, MediaStore};
