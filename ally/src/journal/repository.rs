//! Repository layer for journal data
//!
//! Owns the four persisted collections and is their only writer. Every
//! mutating method changes the in-memory value and then writes the whole
//! document back before returning.

use super::models::*;
use super::query;
use crate::config::{ENTRIES_FILE, FAVORITES_FILE, GOOD_THINGS_FILE, REFLECT_FILE};
use crate::storage::JsonDocument;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Repository for journal collections
pub struct JournalRepository {
    data_dir: PathBuf,
    entries: Vec<Entry>,
    favorites: FavoritePhotos,
    good_things: Vec<GoodThing>,
    reflect_cards: Vec<ReflectCard>,
    entries_doc: JsonDocument<Vec<Entry>>,
    favorites_doc: JsonDocument<FavoritePhotos>,
    good_things_doc: JsonDocument<Vec<GoodThing>>,
    reflect_doc: JsonDocument<Vec<ReflectCard>>,
}

impl JournalRepository {
    /// Load every collection from `data_dir`.
    ///
    /// Missing or corrupt documents start out empty.
    pub fn open(data_dir: impl Into<PathBuf>) -> Self {
        let data_dir = data_dir.into();

        let entries_doc = JsonDocument::new(data_dir.join(ENTRIES_FILE));
        let favorites_doc = JsonDocument::new(data_dir.join(FAVORITES_FILE));
        let good_things_doc = JsonDocument::new(data_dir.join(GOOD_THINGS_FILE));
        let reflect_doc = JsonDocument::new(data_dir.join(REFLECT_FILE));

        let repo = Self {
            entries: entries_doc.load(),
            favorites: favorites_doc.load(),
            good_things: good_things_doc.load(),
            reflect_cards: reflect_doc.load(),
            data_dir,
            entries_doc,
            favorites_doc,
            good_things_doc,
            reflect_doc,
        };

        tracing::info!(
            "Opened journal at {:?}: {} entries, {} good things, {} reflect cards",
            repo.data_dir,
            repo.entries.len(),
            repo.good_things.len(),
            repo.reflect_cards.len()
        );

        repo
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    // ===== Entries =====

    /// All entries, most recent first
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Get an entry by ID
    pub fn entry(&self, id: Uuid) -> Option<&Entry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Create an entry from completed answers and put it at the head.
    ///
    /// Returns `None` without touching anything when `answers` is empty.
    pub fn insert_entry(&mut self, answers: Vec<Answer>) -> Option<Entry> {
        self.insert_entry_at(Utc::now(), answers)
    }

    pub(crate) fn insert_entry_at(
        &mut self,
        timestamp: DateTime<Utc>,
        answers: Vec<Answer>,
    ) -> Option<Entry> {
        self.insert(Entry::at(timestamp, answers))
    }

    /// Put a fully built entry at the head.
    ///
    /// Returns `None` without touching anything when it has no answers.
    pub fn insert(&mut self, entry: Entry) -> Option<Entry> {
        if entry.answers.is_empty() {
            tracing::debug!("Refusing to insert an entry without answers");
            return None;
        }

        self.entries.insert(0, entry.clone());
        self.entries_doc.save(&self.entries);

        tracing::debug!("Created entry: {}", entry.id);
        Some(entry)
    }

    /// Replace an existing entry in place.
    ///
    /// Returns `false` and leaves the collection untouched when no entry
    /// has the same ID.
    pub fn update_entry(&mut self, modified: Entry) -> bool {
        let Some(slot) = self.entries.iter_mut().find(|e| e.id == modified.id) else {
            tracing::debug!("Update skipped, entry no longer present: {}", modified.id);
            return false;
        };

        *slot = modified;
        self.entries_doc.save(&self.entries);
        true
    }

    /// Bulk retention: keep only the `keep` most recent entries.
    ///
    /// Irreversible. Confirmation is the caller's job. Returns the number
    /// of entries removed.
    pub fn delete_older_keeping_newest(&mut self, keep: usize) -> usize {
        let removed = query::retain_newest(&mut self.entries, keep);
        if removed > 0 {
            self.entries_doc.save(&self.entries);
            tracing::info!("Deleted {} older entries, kept {}", removed, keep);
        }
        removed
    }

    /// Coping plan of the most recent entry that has one
    pub fn latest_coping_plan(&self) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.has_coping_plan())
            .map(|e| e.coping_plan.as_str())
    }

    /// Coping-plan voice note of the most recent entry that has one
    pub fn latest_coping_plan_audio(&self) -> Option<&str> {
        self.entries
            .iter()
            .find_map(|e| e.coping_plan_audio_file_name.as_deref())
    }

    /// Timestamp and "- prompt: transcript" lines for the `n` newest entries
    pub fn recent_transcripts(&self, n: usize) -> Vec<(DateTime<Utc>, String)> {
        self.entries
            .iter()
            .take(n)
            .map(|e| {
                let body = e
                    .answers
                    .iter()
                    .map(|a| format!("- {}: {}", a.question_prompt, a.transcript))
                    .collect::<Vec<_>>()
                    .join("\n");
                (e.timestamp, body)
            })
            .collect()
    }

    // ===== Favorites =====

    pub fn favorites(&self) -> &FavoritePhotos {
        &self.favorites
    }

    /// Replace the favorite photo set wholesale.
    ///
    /// The caller is responsible for capping the list.
    pub fn insert_favorite_set(&mut self, names: Vec<String>) {
        self.favorites = FavoritePhotos { filenames: names };
        self.favorites_doc.save(&self.favorites);
        tracing::debug!("Favorites replaced: {} photos", self.favorites.filenames.len());
    }

    // ===== Good Things =====

    /// Gratitude notes, most recent first
    pub fn good_things(&self) -> &[GoodThing] {
        &self.good_things
    }

    /// Add a gratitude note at the head. Blank text is ignored.
    pub fn insert_good_thing(&mut self, text: &str) -> Option<GoodThing> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        let item = GoodThing {
            id: Uuid::new_v4(),
            date: Utc::now(),
            text: text.to_string(),
        };
        self.good_things.insert(0, item.clone());
        self.good_things_doc.save(&self.good_things);

        tracing::debug!("Added good thing: {}", item.id);
        Some(item)
    }

    // ===== Reflect Cards =====

    /// Reflect cards; installs and persists the seed set on first read when
    /// nothing has been saved yet
    pub fn reflect_cards(&mut self) -> &[ReflectCard] {
        if self.reflect_cards.is_empty() {
            tracing::info!("Seeding default reflect cards");
            self.reflect_cards = ReflectCard::seed();
            self.reflect_doc.save(&self.reflect_cards);
        }
        &self.reflect_cards
    }

    /// Append a user-defined card. A blank title is ignored.
    pub fn insert_reflect_card(&mut self, title: &str, body: &str) -> Option<ReflectCard> {
        let title = title.trim();
        if title.is_empty() {
            return None;
        }

        // Seed first so a user card never replaces the built-in set
        self.reflect_cards();

        let card = ReflectCard::new(title, body.trim());
        self.reflect_cards.push(card.clone());
        self.reflect_doc.save(&self.reflect_cards);
        Some(card)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn create_test_repo() -> (JournalRepository, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let repo = JournalRepository::open(temp_dir.path());
        (repo, temp_dir)
    }

    fn answers(text: &str) -> Vec<Answer> {
        vec![Answer::with_transcript("Situation?", text)]
    }

    #[test]
    fn test_insert_entry_goes_to_head() {
        let (mut repo, _temp) = create_test_repo();

        let ids: Vec<Uuid> = (0..4)
            .map(|i| repo.insert_entry(answers(&format!("n{}", i))).unwrap().id)
            .collect();

        let stored: Vec<Uuid> = repo.entries().iter().map(|e| e.id).collect();
        let expected: Vec<Uuid> = ids.into_iter().rev().collect();
        assert_eq!(stored, expected);
    }

    #[test]
    fn test_insert_entry_requires_answers() {
        let (mut repo, temp) = create_test_repo();

        assert!(repo.insert_entry(Vec::new()).is_none());
        assert!(repo.entries().is_empty());
        assert!(!temp.path().join(ENTRIES_FILE).exists());
    }

    #[test]
    fn test_entries_survive_reopen() {
        let (mut repo, temp) = create_test_repo();
        let first = repo.insert_entry(answers("first")).unwrap();
        let second = repo.insert_entry(answers("second")).unwrap();

        let reopened = JournalRepository::open(temp.path());

        assert_eq!(reopened.entries(), &[second, first]);
    }

    #[test]
    fn test_update_entry_replaces_in_place() {
        let (mut repo, temp) = create_test_repo();
        repo.insert_entry(answers("older")).unwrap();
        let newer = repo.insert_entry(answers("newer")).unwrap();
        let older_id = repo.entries()[1].id;

        let mut edited = repo.entry(older_id).unwrap().clone();
        edited.coping_plan = "walk outside".into();
        assert!(repo.update_entry(edited));

        assert_eq!(repo.entries()[0].id, newer.id);
        assert_eq!(repo.entries()[1].coping_plan, "walk outside");

        let reopened = JournalRepository::open(temp.path());
        assert_eq!(reopened.entries()[1].coping_plan, "walk outside");
    }

    #[test]
    fn test_update_missing_entry_is_noop() {
        let (mut repo, temp) = create_test_repo();
        repo.insert_entry(answers("kept")).unwrap();
        let path = temp.path().join(ENTRIES_FILE);
        let before = fs::read(&path).unwrap();

        let stranger = Entry::new(answers("stranger"));
        assert!(!repo.update_entry(stranger));

        assert_eq!(fs::read(&path).unwrap(), before);
        assert_eq!(repo.entries().len(), 1);
    }

    #[test]
    fn test_delete_older_keeping_newest() {
        let (mut repo, temp) = create_test_repo();
        for i in 0..120 {
            repo.insert_entry(answers(&format!("entry {}", i))).unwrap();
        }
        let expected: Vec<Entry> = repo.entries()[..50].to_vec();

        assert_eq!(repo.delete_older_keeping_newest(50), 70);
        assert_eq!(repo.entries(), expected.as_slice());

        let reopened = JournalRepository::open(temp.path());
        assert_eq!(reopened.entries(), expected.as_slice());

        // Second run has nothing to do
        assert_eq!(repo.delete_older_keeping_newest(50), 0);
    }

    #[test]
    fn test_favorites_replaced_wholesale() {
        let (mut repo, temp) = create_test_repo();
        repo.insert_favorite_set(vec!["a.jpg".into(), "b.jpg".into(), "c.jpg".into()]);
        repo.insert_favorite_set(vec!["d.jpg".into()]);

        assert_eq!(repo.favorites().filenames, vec!["d.jpg".to_string()]);

        let reopened = JournalRepository::open(temp.path());
        assert_eq!(reopened.favorites().filenames, vec!["d.jpg".to_string()]);
    }

    #[test]
    fn test_good_things() {
        let (mut repo, _temp) = create_test_repo();

        assert!(repo.insert_good_thing("   ").is_none());
        repo.insert_good_thing("coffee with a friend").unwrap();
        let latest = repo.insert_good_thing("  sunny walk \n").unwrap();

        assert_eq!(latest.text, "sunny walk");
        assert_eq!(repo.good_things().len(), 2);
        assert_eq!(repo.good_things()[0].id, latest.id);
    }

    #[test]
    fn test_reflect_cards_seeded_once() {
        let (mut repo, temp) = create_test_repo();

        let seeded: Vec<Uuid> = repo.reflect_cards().iter().map(|c| c.id).collect();
        assert_eq!(seeded.len(), 5);
        assert!(temp.path().join(REFLECT_FILE).exists());

        let mut reopened = JournalRepository::open(temp.path());
        let reread: Vec<Uuid> = reopened.reflect_cards().iter().map(|c| c.id).collect();
        assert_eq!(seeded, reread);
    }

    #[test]
    fn test_user_reflect_card_appended_after_seed() {
        let (mut repo, _temp) = create_test_repo();

        assert!(repo.insert_reflect_card("  ", "ignored").is_none());
        let card = repo.insert_reflect_card("Evening check", "How did today go?").unwrap();

        let cards = repo.reflect_cards();
        assert_eq!(cards.len(), 6);
        assert_eq!(cards.last().unwrap().id, card.id);
    }

    #[test]
    fn test_latest_coping_plan_and_transcripts() {
        let (mut repo, _temp) = create_test_repo();
        assert!(repo.latest_coping_plan().is_none());

        let older = repo.insert_entry(answers("home")).unwrap();
        repo.insert_entry(answers("work")).unwrap();

        let mut edited = older.clone();
        edited.coping_plan = "breathe".into();
        edited.coping_plan_audio_file_name = Some("rec-1.m4a".into());
        repo.update_entry(edited);

        assert_eq!(repo.latest_coping_plan(), Some("breathe"));
        assert_eq!(repo.latest_coping_plan_audio(), Some("rec-1.m4a"));

        let recent = repo.recent_transcripts(1);
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].1, "- Situation?: work");
    }

    #[test]
    fn test_corrupt_entries_file_starts_empty() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join(ENTRIES_FILE), b"garbage").unwrap();

        let repo = JournalRepository::open(temp_dir.path());
        assert!(repo.entries().is_empty());
    }
}
