//! Export service
//!
//! Turns the entry list into CSV, JSON or a readable text summary. The
//! format functions are pure; [`ExportService`] only adds writing the
//! result to a uniquely named file in a scratch directory for sharing.

use crate::error::{AppError, Result};
use crate::journal::Entry;
use chrono::{DateTime, Local, SecondsFormat, Utc};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tokio::fs;
use uuid::Uuid;

/// Returned by the CSV exporter for an empty journal
pub const NO_DATA: &str = "No data";

const EXPORT_BASENAME: &str = "anxiety-journal";

const ANALYSIS_INSTRUCTIONS: &str = "\
You are a compassionate clinical psychologist specializing in anxiety and CBT. \
Please analyze the patterns across the following most recent self-logs. Your goals:
1) Identify recurring triggers (situations, times, people, thoughts).
2) Map automatic thoughts to emotions and body sensations.
3) Detect safety behaviors and short-term relief patterns.
4) Suggest 2–3 tailored cognitive reframes based on the user's own words.
5) Suggest 2–3 behavioral experiments or coping actions for next time.
6) End with a short validating message in a warm, supportive tone.

Important:
- Be concise but specific.
- Use bullet points.
- Reflect the user's own phrasing when possible.
- If data is missing, say so and make gentle suggestions.

Logs:
";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
    Text,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
            ExportFormat::Text => "txt",
        }
    }

    /// Render `entries` in this format
    pub fn render(self, entries: &[Entry]) -> Result<String> {
        match self {
            ExportFormat::Csv => Ok(to_csv(entries)),
            ExportFormat::Json => to_json(entries),
            ExportFormat::Text => Ok(to_text(entries)),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            "txt" | "text" => Ok(ExportFormat::Text),
            other => Err(format!("unknown export format {:?} (use csv, json or txt)", other)),
        }
    }
}

/// Fixed, round-trippable timestamp: RFC 3339 with milliseconds in UTC
fn csv_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn display_timestamp(ts: DateTime<Utc>) -> String {
    ts.with_timezone(&Local)
        .format("%b %-d, %Y at %-I:%M %p")
        .to_string()
}

fn csv_escape(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// One row per entry.
///
/// Every row has the same width: three columns (prompt, transcript, audio
/// file) per answer slot up to the longest entry, padded with empty cells.
pub fn to_csv(entries: &[Entry]) -> String {
    if entries.is_empty() {
        return NO_DATA.to_string();
    }

    let max_answers = entries.iter().map(|e| e.answers.len()).max().unwrap_or(0);

    let mut headers = vec!["Timestamp".to_string()];
    for i in 1..=max_answers {
        headers.push(format!("Q{}_Question", i));
        headers.push(format!("Q{}_Text", i));
        headers.push(format!("Q{}_AudioFile", i));
    }
    headers.push("CopingPlan".to_string());

    let mut lines = Vec::with_capacity(entries.len() + 1);
    lines.push(headers.join(","));

    for entry in entries {
        let mut cols = Vec::with_capacity(headers.len());
        cols.push(csv_timestamp(entry.timestamp));
        for i in 0..max_answers {
            match entry.answers.get(i) {
                Some(a) => {
                    cols.push(csv_escape(&a.question_prompt));
                    cols.push(csv_escape(&a.transcript));
                    cols.push(csv_escape(a.audio_file_name.as_deref().unwrap_or("")));
                }
                None => cols.extend(std::iter::repeat(String::new()).take(3)),
            }
        }
        cols.push(csv_escape(&entry.coping_plan));
        lines.push(cols.join(","));
    }

    lines.join("\n")
}

/// Pretty-printed JSON with keys in sorted order.
///
/// Going through `serde_json::Value` sorts object keys, so output is
/// identical across runs.
pub fn to_json(entries: &[Entry]) -> Result<String> {
    let value = serde_json::to_value(entries)?;
    Ok(serde_json::to_string_pretty(&value)?)
}

/// Readable summary, one block per entry
pub fn to_text(entries: &[Entry]) -> String {
    let mut out = String::new();
    for entry in entries {
        out.push_str(&format!("Entry – {}\n", display_timestamp(entry.timestamp)));
        for a in &entry.answers {
            out.push_str(&format!("• {}: {}\n", a.question_prompt, a.transcript));
        }
        if entry.has_coping_plan() {
            out.push_str(&format!("Coping Plan: {}\n", entry.coping_plan));
        }
        out.push('\n');
    }
    out
}

/// Prompt asking an assistant to look for patterns in recent logs.
///
/// `recent` is what `JournalRepository::recent_transcripts` returns.
pub fn analysis_prompt(recent: &[(DateTime<Utc>, String)]) -> String {
    let mut out = ANALYSIS_INSTRUCTIONS.to_string();
    for (date, body) in recent {
        out.push_str(&format!("\n=== {} ===\n{}\n", display_timestamp(*date), body));
    }
    out
}

/// Writes export artifacts for sharing
#[derive(Clone)]
pub struct ExportService {
    scratch_dir: PathBuf,
}

impl ExportService {
    pub fn new(scratch_dir: PathBuf) -> Self {
        Self { scratch_dir }
    }

    pub fn scratch_dir(&self) -> &Path {
        &self.scratch_dir
    }

    /// Render and write `entries`, returns the artifact path
    pub async fn export(&self, entries: &[Entry], format: ExportFormat) -> Result<PathBuf> {
        tracing::info!("Exporting {} entries as {}", entries.len(), format);

        let contents = format.render(entries)?;
        fs::create_dir_all(&self.scratch_dir).await?;

        let filename = format!("{}-{}.{}", EXPORT_BASENAME, Uuid::new_v4(), format.extension());
        let path = self.scratch_dir.join(filename);
        fs::write(&path, contents.as_bytes())
            .await
            .map_err(|e| AppError::Generic(format!("Failed to write export {:?}: {}", path, e)))?;

        tracing::info!("Export written to {:?}", path);
        Ok(path)
    }
}
