//! Ally journal library
//!
//! Core of the Ally anxiety journal: guided entries, write-through JSON
//! persistence, search, retention, export and the calm gallery. The `ally`
//! binary is a thin command-line front-end over this crate.

pub mod app;
pub mod commands;
pub mod config;
pub mod error;
pub mod journal;
pub mod services;
pub mod storage;
