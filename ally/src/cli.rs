use ally::commands::SlotFile;
use ally::services::ExportFormat;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Top-level parser for the `ally` binary.
#[derive(Debug, Parser)]
#[command(name = "ally", version, about = "Ally - a guided anxiety journal")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Journal directory (defaults to ALLY_DATA_DIR, then the platform data dir)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show version, data directory and counts
    Info,
    /// Record a new entry, one --answer per guided prompt in order
    New {
        #[arg(short, long = "answer")]
        answers: Vec<String>,
        /// Coping plan for this entry
        #[arg(long)]
        plan: Option<String>,
        /// Voice answer as N=FILE, transcribed when a recognizer is set
        #[arg(long, value_name = "N=FILE", value_parser = parse_slot_file)]
        audio: Vec<SlotFile>,
        /// Video for answer N as N=FILE
        #[arg(long, value_name = "N=FILE", value_parser = parse_slot_file)]
        video: Vec<SlotFile>,
    },
    /// List entries, most recent first
    List {
        /// Only entries whose answers or coping plan contain this text
        #[arg(short, long, default_value = "")]
        query: String,
        /// Number of pages to reveal
        #[arg(long, default_value_t = 1)]
        pages: usize,
    },
    /// Show one entry in full
    Show {
        /// Entry ID or a unique prefix of it
        id: String,
    },
    /// Replace one answer of an entry
    Edit {
        id: String,
        /// Answer number, starting at 1
        #[arg(long)]
        answer: usize,
        text: String,
    },
    /// Replace the coping plan of an entry and/or its voice note
    Plan {
        id: String,
        #[arg(required_unless_present = "audio")]
        plan: Option<String>,
        /// Voice note for the plan
        #[arg(long)]
        audio: Option<PathBuf>,
    },
    /// Delete all but the newest entries
    Prune {
        /// Entries to keep (defaults to the retention setting)
        #[arg(long)]
        keep: Option<usize>,
        /// Actually delete
        #[arg(long)]
        yes: bool,
    },
    /// Export entries as csv, json or txt
    Export {
        #[arg(short, long, default_value = "csv")]
        format: ExportFormat,
        #[arg(short, long, default_value = "")]
        query: String,
        /// Output file (defaults to a new file in the temp directory)
        #[arg(short, long, conflicts_with = "stdout")]
        out: Option<PathBuf>,
        /// Print instead of writing a file
        #[arg(long)]
        stdout: bool,
    },
    /// Print a prompt for analysing patterns across recent entries
    Analyze,
    /// List the guided prompts
    Questions,
    /// Good things that happened
    #[command(name = "good-thing", subcommand)]
    GoodThing(GoodThingCommands),
    /// Reflect cards
    #[command(subcommand)]
    Reflect(ReflectCommands),
    /// Favorite photos for the calm slideshow
    #[command(subcommand)]
    Favorites(FavoritesCommands),
    /// Show the calm quote
    Quote,
    /// Show or change settings
    #[command(subcommand)]
    Settings(SettingsCommands),
}

#[derive(Debug, Subcommand)]
pub enum GoodThingCommands {
    /// Record a good thing
    Add { text: String },
    /// List good things, most recent first
    List,
}

#[derive(Debug, Subcommand)]
pub enum ReflectCommands {
    /// List reflect cards
    List,
    /// Add a reflect card
    Add { title: String, body: String },
}

#[derive(Debug, Subcommand)]
pub enum FavoritesCommands {
    /// Replace the favorite set with these photos
    Import {
        #[arg(required = true)]
        photos: Vec<PathBuf>,
    },
    /// List the current favorites
    List,
}

#[derive(Debug, Subcommand)]
pub enum SettingsCommands {
    /// Print the current settings
    Show,
    /// Replace the guided prompts (none restores the defaults)
    Questions { prompts: Vec<String> },
    /// Entries kept by prune
    Retention { keep: usize },
    /// Photos kept by a favorites import
    FavoritesCap { cap: usize },
    /// External speech recognizer for voice answers
    Transcriber {
        /// Command run with the audio file appended ("" turns it off)
        #[arg(long)]
        command: Option<String>,
        /// Seconds before a transcription is abandoned
        #[arg(long)]
        timeout: Option<u64>,
    },
}

fn parse_slot_file(value: &str) -> Result<SlotFile, String> {
    let (answer, path) = value
        .split_once('=')
        .ok_or_else(|| format!("expected N=FILE, got {:?}", value))?;
    let answer = answer
        .trim()
        .parse::<usize>()
        .map_err(|_| format!("answer number must be a positive integer, got {:?}", answer))?;
    if answer == 0 || path.is_empty() {
        return Err(format!("expected N=FILE with N from 1, got {:?}", value));
    }
    Ok(SlotFile {
        answer,
        path: PathBuf::from(path),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_command_tree_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_new_entry() {
        let cli = Cli::parse_from([
            "ally", "new", "-a", "work meeting", "--answer", "tense", "--plan", "breathe",
        ]);
        match cli.command {
            Commands::New {
                answers,
                plan,
                audio,
                video,
            } => {
                assert_eq!(answers, vec!["work meeting", "tense"]);
                assert_eq!(plan.as_deref(), Some("breathe"));
                assert!(audio.is_empty() && video.is_empty());
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_media_slots() {
        let cli = Cli::parse_from(["ally", "new", "--audio", "2=clips/a.m4a", "--video", "1=walk.mov"]);
        match cli.command {
            Commands::New { audio, video, .. } => {
                assert_eq!(
                    audio,
                    vec![SlotFile {
                        answer: 2,
                        path: PathBuf::from("clips/a.m4a")
                    }]
                );
                assert_eq!(video[0].answer, 1);
            }
            other => panic!("unexpected command {:?}", other),
        }

        assert!(Cli::try_parse_from(["ally", "new", "--audio", "a.m4a"]).is_err());
        assert!(Cli::try_parse_from(["ally", "new", "--audio", "0=a.m4a"]).is_err());
    }

    #[test]
    fn test_plan_needs_text_or_audio() {
        assert!(Cli::try_parse_from(["ally", "plan", "abcd"]).is_err());
        assert!(Cli::try_parse_from(["ally", "plan", "abcd", "--audio", "memo.m4a"]).is_ok());
        assert!(Cli::try_parse_from(["ally", "plan", "abcd", "breathe"]).is_ok());
        assert!(Cli::try_parse_from(["ally", "edit", "abcd", "--answer", "2", "calmer"]).is_ok());
    }

    #[test]
    fn test_parse_export_format_and_global_dir() {
        let cli = Cli::parse_from(["ally", "export", "--format", "txt", "--stdout", "--data-dir", "/tmp/j"]);
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/j")));
        match cli.command {
            Commands::Export { format, stdout, .. } => {
                assert_eq!(format, ExportFormat::Text);
                assert!(stdout);
            }
            other => panic!("unexpected command {:?}", other),
        }

        assert!(Cli::try_parse_from(["ally", "export", "--format", "pdf"]).is_err());
    }
}
