//! Session builder
//!
//! Holds the draft answers of the entry currently being recorded. A
//! session is either idle (no draft) or active. Results that arrive
//! asynchronously (transcripts, media imports) carry a [`DraftTicket`]
//! and are only applied if the draft they were issued for is still the
//! current one.

use crate::config::FALLBACK_QUESTION;
use crate::journal::{Answer, Entry, JournalRepository, Question};

/// Identifies one slot of one specific draft
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DraftTicket {
    generation: u64,
    index: usize,
}

impl DraftTicket {
    pub fn index(&self) -> usize {
        self.index
    }
}

#[derive(Debug, Default)]
pub struct SessionBuilder {
    draft: Vec<Answer>,
    coping_plan: String,
    // Bumped on every start and cancel so tickets from an earlier draft go stale.
    generation: u64,
}

impl SessionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        !self.draft.is_empty()
    }

    /// Current draft answers (empty when idle)
    pub fn draft(&self) -> &[Answer] {
        &self.draft
    }

    /// Start a new draft with one blank answer per question.
    ///
    /// With no questions configured a single open-ended prompt is used so
    /// a session always has somewhere to write.
    pub fn start(&mut self, questions: &[Question]) {
        let fallback;
        let questions = if questions.is_empty() {
            fallback = [Question::new(FALLBACK_QUESTION)];
            &fallback[..]
        } else {
            questions
        };

        self.generation += 1;
        self.draft = questions.iter().map(|q| Answer::blank(&q.prompt)).collect();
        self.coping_plan.clear();

        tracing::debug!(
            "Session started with {} questions (generation {})",
            self.draft.len(),
            self.generation
        );
    }

    pub fn set_transcript(&mut self, index: usize, text: impl Into<String>) {
        if let Some(answer) = self.draft.get_mut(index) {
            answer.transcript = text.into();
        }
    }

    pub fn set_audio_file(&mut self, index: usize, filename: impl Into<String>) {
        if let Some(answer) = self.draft.get_mut(index) {
            answer.audio_file_name = Some(filename.into());
        }
    }

    /// Coping plan saved with the entry. Ignored while idle.
    pub fn set_coping_plan(&mut self, plan: impl Into<String>) {
        if self.is_active() {
            self.coping_plan = plan.into();
        }
    }

    pub fn coping_plan(&self) -> &str {
        &self.coping_plan
    }

    /// Ticket for an asynchronous result targeting `index`
    pub fn ticket(&self, index: usize) -> Option<DraftTicket> {
        (index < self.draft.len()).then_some(DraftTicket {
            generation: self.generation,
            index,
        })
    }

    fn slot_for(&mut self, ticket: DraftTicket) -> Option<&mut Answer> {
        if ticket.generation != self.generation {
            return None;
        }
        self.draft.get_mut(ticket.index)
    }

    /// Apply a finished transcription.
    ///
    /// Replaces a blank transcript, otherwise appends on a new line. Returns
    /// `false` when the ticket is stale and the text was dropped.
    pub fn apply_transcript(&mut self, ticket: DraftTicket, text: &str) -> bool {
        let Some(answer) = self.slot_for(ticket) else {
            tracing::debug!("Dropping stale transcript for slot {}", ticket.index);
            return false;
        };

        if answer.transcript.trim().is_empty() {
            answer.transcript = text.to_string();
        } else {
            answer.transcript.push('\n');
            answer.transcript.push_str(text);
        }
        true
    }

    /// Attach an imported video. Returns `false` for a stale ticket.
    pub fn apply_video(&mut self, ticket: DraftTicket, filename: &str) -> bool {
        match self.slot_for(ticket) {
            Some(answer) => {
                answer.video_file_name = Some(filename.to_string());
                true
            }
            None => false,
        }
    }

    /// Freeze the draft into an entry at the head of the journal.
    ///
    /// Does nothing when idle.
    pub fn complete(&mut self, repo: &mut JournalRepository) -> Option<Entry> {
        if self.draft.is_empty() {
            return None;
        }

        let mut entry = Entry::new(std::mem::take(&mut self.draft));
        entry.coping_plan = std::mem::take(&mut self.coping_plan);
        self.generation += 1;
        let entry = repo.insert(entry)?;

        tracing::info!("Session completed as entry {}", entry.id);
        Some(entry)
    }

    /// Discard the draft without saving anything
    pub fn cancel(&mut self) {
        if !self.draft.is_empty() {
            tracing::debug!("Session cancelled");
        }
        self.draft.clear();
        self.coping_plan.clear();
        self.generation += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn questions(prompts: &[&str]) -> Vec<Question> {
        prompts.iter().map(|p| Question::new(*p)).collect()
    }

    #[test]
    fn test_start_builds_one_answer_per_question() {
        let mut session = SessionBuilder::new();
        session.start(&questions(&["Situation?", "Thoughts?"]));

        let prompts: Vec<&str> = session
            .draft()
            .iter()
            .map(|a| a.question_prompt.as_str())
            .collect();
        assert_eq!(prompts, vec!["Situation?", "Thoughts?"]);
        assert!(session.draft().iter().all(|a| a.transcript.is_empty()
            && a.audio_file_name.is_none()
            && a.video_file_name.is_none()));
    }

    #[test]
    fn test_start_without_questions_uses_fallback() {
        let mut session = SessionBuilder::new();
        session.start(&[]);

        assert_eq!(session.draft().len(), 1);
        assert_eq!(session.draft()[0].question_prompt, FALLBACK_QUESTION);
    }

    #[test]
    fn test_out_of_range_edits_are_ignored() {
        let mut session = SessionBuilder::new();
        session.set_transcript(0, "idle");
        assert!(!session.is_active());

        session.start(&questions(&["Only one?"]));
        session.set_transcript(3, "nope");
        session.set_audio_file(1, "rec-x.m4a");
        session.set_transcript(0, "yes");
        session.set_audio_file(0, "rec-1.m4a");

        assert_eq!(session.draft().len(), 1);
        assert_eq!(session.draft()[0].transcript, "yes");
        assert_eq!(session.draft()[0].audio_file_name.as_deref(), Some("rec-1.m4a"));
    }

    #[test]
    fn test_apply_transcript_replaces_blank_then_appends() {
        let mut session = SessionBuilder::new();
        session.start(&questions(&["Thoughts?"]));
        let ticket = session.ticket(0).unwrap();

        session.set_transcript(0, "  ");
        assert!(session.apply_transcript(ticket, "first"));
        assert!(session.apply_transcript(ticket, "second"));

        assert_eq!(session.draft()[0].transcript, "first\nsecond");
    }

    #[test]
    fn test_stale_ticket_dropped_after_cancel_and_restart() {
        let mut session = SessionBuilder::new();
        session.start(&questions(&["A?", "B?"]));
        let ticket = session.ticket(1).unwrap();

        session.cancel();
        assert!(!session.apply_transcript(ticket, "late"));

        // Same shape, new draft: the old ticket must still be rejected
        session.start(&questions(&["A?", "B?"]));
        assert!(!session.apply_transcript(ticket, "late"));
        assert!(!session.apply_video(ticket, "file-1.mov"));
        assert_eq!(session.draft()[1].transcript, "");
    }

    #[test]
    fn test_ticket_out_of_range() {
        let mut session = SessionBuilder::new();
        assert!(session.ticket(0).is_none());

        session.start(&questions(&["A?"]));
        assert!(session.ticket(1).is_none());
        assert_eq!(session.ticket(0).unwrap().index(), 0);
    }

    #[test]
    fn test_complete_inserts_entry_and_goes_idle() {
        let temp = TempDir::new().unwrap();
        let mut repo = JournalRepository::open(temp.path());
        let mut session = SessionBuilder::new();

        session.start(&questions(&["Situation?", "Thoughts?"]));
        session.set_transcript(0, "work meeting");
        let ticket = session.ticket(1).unwrap();

        let entry = session.complete(&mut repo).unwrap();

        assert!(!session.is_active());
        assert_eq!(entry.answers.len(), 2);
        assert_eq!(entry.answers[0].transcript, "work meeting");
        assert_eq!(repo.entries()[0].id, entry.id);

        // Transcript arriving after completion does not touch anything
        assert!(!session.apply_transcript(ticket, "late"));
    }

    #[test]
    fn test_coping_plan_is_saved_with_the_entry() {
        let temp = TempDir::new().unwrap();
        let mut repo = JournalRepository::open(temp.path());
        let mut session = SessionBuilder::new();

        session.set_coping_plan("ignored while idle");
        assert_eq!(session.coping_plan(), "");

        session.start(&questions(&["Situation?"]));
        session.set_coping_plan("breathe");
        let entry = session.complete(&mut repo).unwrap();

        assert_eq!(entry.coping_plan, "breathe");
        assert_eq!(JournalRepository::open(temp.path()).entries()[0], entry);

        session.start(&questions(&["Situation?"]));
        assert_eq!(session.coping_plan(), "");
    }

    #[test]
    fn test_complete_on_empty_draft_is_noop() {
        let temp = TempDir::new().unwrap();
        let mut repo = JournalRepository::open(temp.path());
        let mut session = SessionBuilder::new();

        assert!(session.complete(&mut repo).is_none());
        assert!(repo.entries().is_empty());

        session.start(&[]);
        session.cancel();
        assert!(session.complete(&mut repo).is_none());
        assert!(repo.entries().is_empty());
    }
}
