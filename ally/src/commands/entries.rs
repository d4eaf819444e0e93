//! Entry commands
//!
//! Recording, listing, searching, editing and pruning journal entries.

use super::{resolve_entry_id, short_id};
use crate::app::AppState;
use crate::config::{ANALYSIS_ENTRY_COUNT, MAX_RETENTION_KEEP, MIN_RETENTION_KEEP};
use crate::error::{AppError, Result};
use crate::journal::search;
use crate::services::export::analysis_prompt;
use crate::services::{ClipCapture, CommandRecognizer, VoiceAnswerRecorder};
use chrono::Local;
use std::path::{Path, PathBuf};

/// A media file for one answer, by 1-based answer number
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotFile {
    pub answer: usize,
    pub path: PathBuf,
}

/// Record a new entry from typed answers, in question order.
///
/// Answers beyond the number of configured questions are ignored.
pub fn create_entry(
    state: &mut AppState,
    answers: Vec<String>,
    coping_plan: Option<String>,
) -> Result<String> {
    start_draft(state, answers, coping_plan);
    finish_draft(state, Vec::new())
}

/// Record a new entry with voice answers and videos attached.
///
/// Each voice clip is copied into the journal and, when a recognizer is
/// configured, transcribed into its answer. Transcription problems are
/// reported with the result but do not stop the entry from being saved.
pub async fn create_entry_with_media(
    state: &mut AppState,
    answers: Vec<String>,
    coping_plan: Option<String>,
    audio: &[SlotFile],
    video: &[SlotFile],
) -> Result<String> {
    start_draft(state, answers, coping_plan);

    let mut notes = Vec::new();
    if let Err(e) = attach_media(state, audio, video, &mut notes).await {
        state.session.cancel();
        return Err(e);
    }

    finish_draft(state, notes)
}

fn start_draft(state: &mut AppState, answers: Vec<String>, coping_plan: Option<String>) {
    let questions = state.settings.session_questions();
    state.session.start(&questions);

    for (index, text) in answers.into_iter().enumerate() {
        state.session.set_transcript(index, text);
    }
    if let Some(plan) = coping_plan {
        state.session.set_coping_plan(plan);
    }
}

fn finish_draft(state: &mut AppState, notes: Vec<String>) -> Result<String> {
    let entry = state
        .session
        .complete(&mut state.repo)
        .ok_or_else(|| AppError::Generic("Nothing to save".to_string()))?;

    let mut out = format!("Saved entry {}", entry.id);
    for note in notes {
        out.push('\n');
        out.push_str(&note);
    }
    Ok(out)
}

fn draft_index(state: &AppState, answer: usize) -> Result<usize> {
    let count = state.session.draft().len();
    match answer.checked_sub(1) {
        Some(index) if index < count => Ok(index),
        _ => Err(AppError::Generic(format!(
            "Answer {} does not exist, this entry has {} answers",
            answer, count
        ))),
    }
}

async fn attach_media(
    state: &mut AppState,
    audio: &[SlotFile],
    video: &[SlotFile],
    notes: &mut Vec<String>,
) -> Result<()> {
    for clip in audio {
        let index = draft_index(state, clip.answer)?;
        if let Some(note) = attach_voice_answer(state, index, &clip.path).await? {
            notes.push(note);
        }
    }

    for clip in video {
        let index = draft_index(state, clip.answer)?;
        let Some(ticket) = state.session.ticket(index) else {
            continue;
        };
        let data = tokio::fs::read(&clip.path).await?;
        let ext = clip
            .path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default();
        let name = state.gallery.import_video(&data, ext).await?;
        state.session.apply_video(ticket, &name);
    }

    Ok(())
}

/// Returns a note for the user when the clip was kept but not transcribed
async fn attach_voice_answer(
    state: &mut AppState,
    index: usize,
    clip: &Path,
) -> Result<Option<String>> {
    let capture = ClipCapture::new(clip.to_path_buf(), state.media.new_recording_path());
    let recognizer = CommandRecognizer::from_settings(&state.settings.transcription);
    let transcribe = recognizer.is_configured();
    let mut recorder =
        VoiceAnswerRecorder::new(capture, recognizer, state.settings.transcription_timeout());

    recorder.start()?;
    let Some(pending) = recorder.stop(&mut state.session, index) else {
        return Err(AppError::Recording(format!("voice clip {:?} was not attached", clip)));
    };

    if !transcribe {
        return Ok(None);
    }

    Ok(match recorder.transcribe(&pending).await {
        Ok(Some(text)) => {
            state.session.apply_transcript(pending.ticket, &text);
            None
        }
        Ok(None) => Some(format!("Answer {}: transcription timed out", index + 1)),
        Err(e) => Some(format!("Answer {}: {}", index + 1, e)),
    })
}

/// List entries matching `query`, revealing `pages` pages
pub fn list_entries(state: &AppState, query: &str, pages: usize) -> Result<String> {
    let matches = search(state.repo.entries(), query);
    let total = matches.len();

    let mut pager = state.pager();
    for _ in 1..pages.max(1) {
        let last_visible = pager.visible(&matches).len();
        if last_visible == 0 || !pager.item_appeared(last_visible - 1, total) {
            break;
        }
    }

    if total == 0 {
        return Ok(if query.trim().is_empty() {
            "No entries yet".to_string()
        } else {
            format!("No entries match {:?}", query.trim())
        });
    }

    let visible = pager.visible(&matches);
    let mut out = String::new();
    for entry in visible {
        out.push_str(&format!(
            "{}  {}  {}\n",
            short_id(&entry.id),
            entry.timestamp.with_timezone(&Local).format("%Y-%m-%d %H:%M"),
            entry.preview()
        ));
    }
    out.push_str(&format!("Showing {} of {}", visible.len(), total));
    if visible.len() < total {
        out.push_str(&format!(" (use --pages {} for more)", pages.max(1) + 1));
    }
    Ok(out)
}

/// Full detail of one entry
pub fn show_entry(state: &AppState, id: &str) -> Result<String> {
    let id = resolve_entry_id(state, id)?;
    let entry = state
        .repo
        .entry(id)
        .ok_or_else(|| AppError::Generic(format!("No entry {}", id)))?;

    let mut out = format!(
        "Entry {}\n{}\n\n",
        entry.id,
        entry.timestamp.with_timezone(&Local).format("%Y-%m-%d %H:%M")
    );
    for (i, answer) in entry.answers.iter().enumerate() {
        out.push_str(&format!("{}. {}\n   {}\n", i + 1, answer.question_prompt, answer.transcript));
        if let Some(audio) = &answer.audio_file_name {
            out.push_str(&format!("   audio: {}\n", audio));
        }
        if let Some(video) = &answer.video_file_name {
            out.push_str(&format!("   video: {}\n", video));
        }
    }
    if entry.has_coping_plan() {
        out.push_str(&format!("\nCoping Plan: {}\n", entry.coping_plan));
    }
    if let Some(audio) = &entry.coping_plan_audio_file_name {
        out.push_str(&format!("Coping Plan voice note: {}\n", audio));
    }
    Ok(out)
}

/// Replace one answer's transcript, by 1-based answer number
pub fn edit_answer(state: &mut AppState, id: &str, answer: usize, text: &str) -> Result<String> {
    let id = resolve_entry_id(state, id)?;
    let Some(mut entry) = state.repo.entry(id).cloned() else {
        return Err(AppError::Generic(format!("No entry {}", id)));
    };

    let count = entry.answers.len();
    let Some(slot) = answer.checked_sub(1).and_then(|i| entry.answers.get_mut(i)) else {
        return Err(AppError::Generic(format!(
            "Answer {} does not exist, this entry has {} answers",
            answer, count
        )));
    };
    slot.transcript = text.to_string();

    state.repo.update_entry(entry);
    Ok(format!("Updated answer {} of {}", answer, short_id(&id)))
}

/// Replace the coping plan text, its voice note, or both
pub async fn set_coping_plan(
    state: &mut AppState,
    id: &str,
    plan: Option<&str>,
    audio: Option<&Path>,
) -> Result<String> {
    if plan.is_none() && audio.is_none() {
        return Err(AppError::Generic(
            "Give the plan text, a voice note, or both".to_string(),
        ));
    }

    let id = resolve_entry_id(state, id)?;
    let Some(mut entry) = state.repo.entry(id).cloned() else {
        return Err(AppError::Generic(format!("No entry {}", id)));
    };

    let mut replaced_audio = None;
    if let Some(audio) = audio {
        let data = tokio::fs::read(audio).await?;
        let name = state.media.save_recording(&data).await?;
        replaced_audio = entry.coping_plan_audio_file_name.replace(name);
    }
    if let Some(plan) = plan {
        entry.coping_plan = plan.to_string();
    }

    state.repo.update_entry(entry);

    if let Some(old) = replaced_audio {
        if let Err(e) = state.media.delete(&old).await {
            tracing::warn!("Could not remove old voice note {}: {}", old, e);
        }
    }

    Ok(format!("Updated coping plan for {}", short_id(&id)))
}

/// Delete all but the newest entries.
///
/// Without `confirmed` this only describes what would happen.
pub fn prune_entries(state: &mut AppState, keep: Option<usize>, confirmed: bool) -> Result<String> {
    let keep = keep.unwrap_or(state.settings.retention.keep_newest);
    if !(MIN_RETENTION_KEEP..=MAX_RETENTION_KEEP).contains(&keep) {
        return Err(AppError::InvalidSettings(format!(
            "keep must be between {} and {}, got {}",
            MIN_RETENTION_KEEP, MAX_RETENTION_KEEP, keep
        )));
    }
    let count = state.repo.entries().len();

    if count <= keep {
        return Ok(format!("Nothing to delete ({} entries, keeping {})", count, keep));
    }

    if !confirmed {
        return Ok(format!(
            "This will remove {} entries older than the {} most recent. \
             This action cannot be undone. Re-run with --yes to confirm.",
            count - keep,
            keep
        ));
    }

    let removed = state.repo.delete_older_keeping_newest(keep);
    Ok(format!("Deleted {} older entries, kept {}", removed, keep))
}

/// Prompt for analysing patterns across recent entries
pub fn analyze_prompt(state: &AppState) -> Result<String> {
    Ok(analysis_prompt(&state.repo.recent_transcripts(ANALYSIS_ENTRY_COUNT)))
}

/// Configured guided prompts
pub fn list_questions(state: &AppState) -> Result<String> {
    let lines: Vec<String> = state
        .settings
        .session_questions()
        .iter()
        .enumerate()
        .map(|(i, q)| format!("{}. {}", i + 1, q.prompt))
        .collect();
    Ok(lines.join("\n"))
}
