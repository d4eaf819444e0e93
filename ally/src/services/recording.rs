//! Voice answers
//!
//! Coordinates the platform audio recorder and speech recognizer with the
//! session draft. Both collaborators sit behind traits; the journal only
//! ever sees the recorded file's name and the recognized text.
//!
//! Transcription runs under a timeout. A timed-out transcription is
//! dropped (the in-flight future is cancelled) and is not an error.
//!
//! The command line has no microphone: it attaches prerecorded clips with
//! [`ClipCapture`] and transcribes them with a [`CommandRecognizer`].

use crate::error::{AppError, Result};
use crate::services::session::{DraftTicket, SessionBuilder};
use crate::services::settings::TranscriptionSettings;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::process::Command;

/// Device audio capture
pub trait AudioCapture {
    /// Begin recording into a new file. Fails when the microphone is
    /// unavailable or access was denied.
    fn start_recording(&mut self) -> Result<PathBuf>;

    /// Stop the current recording and return its file, if one was running
    fn stop_recording(&mut self) -> Option<PathBuf>;

    fn is_recording(&self) -> bool;
}

/// Speech-to-text over a finished audio file
pub trait SpeechToText {
    fn transcribe(&self, audio: &Path) -> impl Future<Output = Result<String>> + Send;
}

/// A transcription waiting to run for one draft slot
#[derive(Debug, Clone)]
pub struct PendingTranscript {
    pub ticket: DraftTicket,
    pub audio: PathBuf,
}

/// Run `stt` with a time limit. `Ok(None)` means the limit was hit.
pub async fn transcribe_with_timeout<S: SpeechToText>(
    stt: &S,
    audio: &Path,
    limit: Duration,
) -> Result<Option<String>> {
    match tokio::time::timeout(limit, stt.transcribe(audio)).await {
        Ok(Ok(text)) => Ok(Some(text)),
        Ok(Err(e)) => Err(e),
        Err(_) => {
            tracing::debug!("Transcription of {:?} cancelled after {:?}", audio, limit);
            Ok(None)
        }
    }
}

pub struct VoiceAnswerRecorder<A, S> {
    capture: A,
    stt: S,
    timeout: Duration,
}

impl<A: AudioCapture, S: SpeechToText> VoiceAnswerRecorder<A, S> {
    pub fn new(capture: A, stt: S, timeout: Duration) -> Self {
        Self {
            capture,
            stt,
            timeout,
        }
    }

    pub fn is_recording(&self) -> bool {
        self.capture.is_recording()
    }

    /// Start recording an answer
    pub fn start(&mut self) -> Result<()> {
        let path = self.capture.start_recording()?;
        tracing::info!("Recording started: {:?}", path);
        Ok(())
    }

    /// Stop recording and attach the file to draft slot `index`.
    ///
    /// Returns the transcription to run next, or `None` when nothing was
    /// recording or the slot no longer exists.
    pub fn stop(&mut self, session: &mut SessionBuilder, index: usize) -> Option<PendingTranscript> {
        if !self.capture.is_recording() {
            return None;
        }
        let audio = self.capture.stop_recording()?;
        tracing::info!("Recording stopped: {:?}", audio);

        let ticket = session.ticket(index)?;
        let filename = audio.file_name()?.to_string_lossy().into_owned();
        session.set_audio_file(index, filename);

        Some(PendingTranscript { ticket, audio })
    }

    /// Transcribe a stopped recording. `Ok(None)` when it timed out.
    pub async fn transcribe(&self, pending: &PendingTranscript) -> Result<Option<String>> {
        transcribe_with_timeout(&self.stt, &pending.audio, self.timeout).await
    }

    /// Stop, transcribe and apply in one go.
    ///
    /// Returns whether recognized text was written into the draft.
    pub async fn stop_and_transcribe(
        &mut self,
        session: &mut SessionBuilder,
        index: usize,
    ) -> Result<bool> {
        let Some(pending) = self.stop(session, index) else {
            return Ok(false);
        };

        match self.transcribe(&pending).await? {
            Some(text) => Ok(session.apply_transcript(pending.ticket, &text)),
            None => Ok(false),
        }
    }
}

/// Capture that takes an already recorded clip.
///
/// "Recording" copies the clip to `target`, normally a path from
/// `MediaStore::new_recording_path`, so the answer owns its own copy.
#[derive(Debug)]
pub struct ClipCapture {
    source: PathBuf,
    target: PathBuf,
    recording: bool,
}

impl ClipCapture {
    pub fn new(source: PathBuf, target: PathBuf) -> Self {
        Self {
            source,
            target,
            recording: false,
        }
    }
}

impl AudioCapture for ClipCapture {
    fn start_recording(&mut self) -> Result<PathBuf> {
        std::fs::copy(&self.source, &self.target).map_err(|e| {
            AppError::Recording(format!("cannot read clip {:?}: {}", self.source, e))
        })?;
        self.recording = true;
        Ok(self.target.clone())
    }

    fn stop_recording(&mut self) -> Option<PathBuf> {
        std::mem::take(&mut self.recording).then(|| self.target.clone())
    }

    fn is_recording(&self) -> bool {
        self.recording
    }
}

/// Speech-to-text by an external program.
///
/// Runs `<program> [args..] <audio file>` and takes its stdout as the
/// transcript. The child is killed if the transcription is dropped, which
/// is what a timeout does. Without a program every transcription fails
/// with `RecognizerUnavailable`.
#[derive(Debug, Clone, Default)]
pub struct CommandRecognizer {
    program: Option<String>,
    args: Vec<String>,
}

impl CommandRecognizer {
    /// Parse a whitespace separated command line
    pub fn from_command_line(command: &str) -> Self {
        let mut parts = command.split_whitespace().map(str::to_string);
        Self {
            program: parts.next(),
            args: parts.collect(),
        }
    }

    pub fn from_settings(settings: &TranscriptionSettings) -> Self {
        settings
            .command
            .as_deref()
            .map(Self::from_command_line)
            .unwrap_or_default()
    }

    pub fn is_configured(&self) -> bool {
        self.program.is_some()
    }
}

impl SpeechToText for CommandRecognizer {
    async fn transcribe(&self, audio: &Path) -> Result<String> {
        let Some(program) = &self.program else {
            return Err(AppError::RecognizerUnavailable(
                "no transcription command configured".to_string(),
            ));
        };

        let output = Command::new(program)
            .args(&self.args)
            .arg(audio)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| AppError::RecognizerUnavailable(format!("{}: {}", program, e)))?;

        if !output.status.success() {
            return Err(AppError::Transcription(format!(
                "{} failed ({}): {}",
                program,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        let text = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if text.is_empty() {
            return Err(AppError::Transcription("no speech recognized".to_string()));
        }
        tracing::debug!("Recognized {} characters from {:?}", text.len(), audio);
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::journal::Question;
    use std::sync::Arc;
    use tokio::sync::Notify;

    #[derive(Default)]
    struct FakeCapture {
        recording: Option<PathBuf>,
        denied: bool,
    }

    impl AudioCapture for FakeCapture {
        fn start_recording(&mut self) -> Result<PathBuf> {
            if self.denied {
                return Err(AppError::PermissionDenied);
            }
            let path = PathBuf::from("/data/rec-test.m4a");
            self.recording = Some(path.clone());
            Ok(path)
        }

        fn stop_recording(&mut self) -> Option<PathBuf> {
            self.recording.take()
        }

        fn is_recording(&self) -> bool {
            self.recording.is_some()
        }
    }

    struct FixedStt(&'static str);

    impl SpeechToText for FixedStt {
        async fn transcribe(&self, _audio: &Path) -> Result<String> {
            Ok(self.0.to_string())
        }
    }

    struct SlowStt;

    impl SpeechToText for SlowStt {
        async fn transcribe(&self, _audio: &Path) -> Result<String> {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok("too late".to_string())
        }
    }

    struct BrokenStt;

    impl SpeechToText for BrokenStt {
        async fn transcribe(&self, _audio: &Path) -> Result<String> {
            Err(AppError::RecognizerUnavailable("offline".to_string()))
        }
    }

    /// Waits until released, so a test can act while it is in flight
    struct GatedStt(Arc<Notify>);

    impl SpeechToText for GatedStt {
        async fn transcribe(&self, _audio: &Path) -> Result<String> {
            self.0.notified().await;
            Ok("gated".to_string())
        }
    }

    fn active_session() -> SessionBuilder {
        let mut session = SessionBuilder::new();
        session.start(&[Question::new("Situation?"), Question::new("Thoughts?")]);
        session
    }

    #[tokio::test]
    async fn test_stop_and_transcribe_fills_slot() {
        let mut session = active_session();
        let mut recorder =
            VoiceAnswerRecorder::new(FakeCapture::default(), FixedStt("at my desk"), Duration::from_secs(5));

        recorder.start().unwrap();
        assert!(recorder.is_recording());

        let applied = recorder.stop_and_transcribe(&mut session, 0).await.unwrap();

        assert!(applied);
        assert_eq!(session.draft()[0].transcript, "at my desk");
        assert_eq!(session.draft()[0].audio_file_name.as_deref(), Some("rec-test.m4a"));
        assert!(!recorder.is_recording());
    }

    #[tokio::test]
    async fn test_permission_denied_propagates() {
        let capture = FakeCapture {
            denied: true,
            ..FakeCapture::default()
        };
        let mut recorder = VoiceAnswerRecorder::new(capture, FixedStt("x"), Duration::from_secs(5));

        let err = recorder.start().unwrap_err();
        assert!(matches!(err, AppError::PermissionDenied));
        assert!(err.is_capability());
    }

    #[tokio::test]
    async fn test_stop_when_idle_does_nothing() {
        let mut session = active_session();
        let mut recorder =
            VoiceAnswerRecorder::new(FakeCapture::default(), FixedStt("x"), Duration::from_secs(5));

        assert!(recorder.stop(&mut session, 0).is_none());
        assert!(!recorder.stop_and_transcribe(&mut session, 0).await.unwrap());
    }

    #[tokio::test]
    async fn test_timeout_is_dropped_silently() {
        let mut session = active_session();
        let mut recorder =
            VoiceAnswerRecorder::new(FakeCapture::default(), SlowStt, Duration::from_millis(20));

        recorder.start().unwrap();
        let applied = recorder.stop_and_transcribe(&mut session, 1).await.unwrap();

        assert!(!applied);
        assert_eq!(session.draft()[1].transcript, "");
        // The recording itself is still attached
        assert!(session.draft()[1].audio_file_name.is_some());
    }

    #[tokio::test]
    async fn test_recognizer_failure_is_reported() {
        let mut session = active_session();
        let mut recorder =
            VoiceAnswerRecorder::new(FakeCapture::default(), BrokenStt, Duration::from_secs(5));

        recorder.start().unwrap();
        let result = recorder.stop_and_transcribe(&mut session, 0).await;

        assert!(matches!(result, Err(AppError::RecognizerUnavailable(_))));
    }

    #[tokio::test]
    async fn test_result_after_cancel_is_discarded() {
        let gate = Arc::new(Notify::new());
        let mut session = active_session();
        let mut recorder = VoiceAnswerRecorder::new(
            FakeCapture::default(),
            GatedStt(gate.clone()),
            Duration::from_secs(5),
        );

        recorder.start().unwrap();
        let pending = recorder.stop(&mut session, 1).unwrap();

        let transcription = recorder.transcribe(&pending);
        let release = async {
            // User cancels and starts over while the recognizer is busy
            session.cancel();
            session.start(&[Question::new("Situation?"), Question::new("Thoughts?")]);
            gate.notify_one();
        };
        let (text, ()) = tokio::join!(transcription, release);

        let text = text.unwrap().unwrap();
        assert_eq!(text, "gated");
        assert!(!session.apply_transcript(pending.ticket, &text));
        assert_eq!(session.draft()[1].transcript, "");
    }

    #[test]
    fn test_clip_capture_copies_clip() {
        let temp = tempfile::TempDir::new().unwrap();
        let source = temp.path().join("memo.m4a");
        std::fs::write(&source, b"clip").unwrap();
        let target = temp.path().join("rec-1.m4a");

        let mut capture = ClipCapture::new(source, target.clone());
        assert_eq!(capture.start_recording().unwrap(), target);
        assert!(capture.is_recording());
        assert_eq!(capture.stop_recording(), Some(target.clone()));
        assert_eq!(capture.stop_recording(), None);
        assert_eq!(std::fs::read(&target).unwrap(), b"clip");

        let mut missing = ClipCapture::new(temp.path().join("gone.m4a"), temp.path().join("rec-2.m4a"));
        let err = missing.start_recording().unwrap_err();
        assert!(matches!(err, AppError::Recording(_)));
        assert!(!missing.is_recording());
    }

    #[test]
    fn test_recognizer_command_line() {
        assert!(!CommandRecognizer::from_command_line("   ").is_configured());
        assert!(!CommandRecognizer::from_settings(&TranscriptionSettings::default()).is_configured());

        let recognizer = CommandRecognizer::from_command_line(" whisper-cli -m base ");
        assert_eq!(recognizer.program.as_deref(), Some("whisper-cli"));
        assert_eq!(recognizer.args, vec!["-m", "base"]);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_recognizer_reads_stdout() {
        let temp = tempfile::TempDir::new().unwrap();
        let audio = temp.path().join("rec-1.m4a");
        std::fs::write(&audio, "my hands were shaking\n").unwrap();

        let cat = CommandRecognizer::from_command_line("cat");
        assert_eq!(cat.transcribe(&audio).await.unwrap(), "my hands were shaking");

        let failing = CommandRecognizer::from_command_line("false");
        assert!(matches!(
            failing.transcribe(&audio).await,
            Err(AppError::Transcription(_))
        ));

        let missing = CommandRecognizer::from_command_line("ally-no-such-recognizer");
        let err = missing.transcribe(&audio).await.unwrap_err();
        assert!(matches!(err, AppError::RecognizerUnavailable(_)));
        assert!(err.is_capability());

        let unset = CommandRecognizer::default();
        assert!(matches!(
            unset.transcribe(&audio).await,
            Err(AppError::RecognizerUnavailable(_))
        ));
    }
}
