use anyhow::Result;
use sign_bridge::{
    BusyState, CredentialGate, EncodedFrame, FrameSampler, FrameSource, GeminiError,
    InterviewSession, MediaRef, MediaStore, SessionConfig, SignTranscriber, Speaker,
    SpeechSynthesizer, TurnError, VideoGenerator,
};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

// ============================================================================
// Test doubles
// ============================================================================

/// Frame source that always has a frame available
struct StubFrames;

#[async_trait::async_trait]
impl FrameSource for StubFrames {
    async fn grab(&self) -> Result<Option<EncodedFrame>> {
        Ok(Some(EncodedFrame::jpeg(vec![0u8; 4])))
    }

    fn name(&self) -> &str {
        "stub"
    }
}

/// Frame source with no video attached
struct DetachedFrames;

#[async_trait::async_trait]
impl FrameSource for DetachedFrames {
    async fn grab(&self) -> Result<Option<EncodedFrame>> {
        anyhow::bail!("no video source attached")
    }

    fn name(&self) -> &str {
        "detached"
    }
}

struct FixedTranscriber(Result<String, GeminiError>);

#[async_trait::async_trait]
impl SignTranscriber for FixedTranscriber {
    async fn transcribe(&self, _frames: &[EncodedFrame]) -> Result<String, GeminiError> {
        self.0.clone()
    }
}

/// Transcriber that signals when entered and blocks until released, for
/// exercising the busy flag mid-turn
struct BlockingTranscriber {
    entered: Arc<Notify>,
    release: Arc<Notify>,
}

#[async_trait::async_trait]
impl SignTranscriber for BlockingTranscriber {
    async fn transcribe(&self, _frames: &[EncodedFrame]) -> Result<String, GeminiError> {
        self.entered.notify_one();
        self.release.notified().await;
        Ok("released".to_string())
    }
}

struct FixedGenerator(Result<MediaRef, GeminiError>);

#[async_trait::async_trait]
impl VideoGenerator for FixedGenerator {
    async fn generate(&self, _text: &str) -> Result<MediaRef, GeminiError> {
        self.0.clone()
    }
}

/// Synthesizer recording every utterance
#[derive(Default)]
struct RecordingSynthesizer {
    spoken: Mutex<Vec<String>>,
}

impl SpeechSynthesizer for RecordingSynthesizer {
    fn speak(&self, text: &str) {
        self.spoken.lock().unwrap().push(text.to_string());
    }
}

// ============================================================================
// Fixture
// ============================================================================

struct Fixture {
    session: InterviewSession,
    credentials: Arc<CredentialGate>,
    synthesizer: Arc<RecordingSynthesizer>,
}

fn fixture(
    transcriber: Arc<dyn SignTranscriber>,
    generator: Arc<dyn VideoGenerator>,
    credentials: Arc<CredentialGate>,
) -> Fixture {
    let synthesizer = Arc::new(RecordingSynthesizer::default());

    // A zero-length window keeps turn tests free of timing concerns; the
    // sampling schedule itself is covered by the sampler's own tests
    let config = SessionConfig {
        capture_window_ms: 0,
        frames_per_second: 5,
        ..SessionConfig::default()
    };

    let session = InterviewSession::new(
        config,
        FrameSampler::new(Arc::new(StubFrames)),
        transcriber,
        generator,
        synthesizer.clone(),
        Arc::clone(&credentials),
    );

    Fixture {
        session,
        credentials,
        synthesizer,
    }
}

fn ready_credentials() -> Arc<CredentialGate> {
    Arc::new(CredentialGate::new(Some("test-key".to_string())))
}

async fn ok_generator() -> (Arc<FixedGenerator>, MediaRef) {
    let store = MediaStore::new();
    let media_ref = store.insert(vec![0u8; 8], "video/mp4").await;
    (Arc::new(FixedGenerator(Ok(media_ref))), media_ref)
}

// ============================================================================
// Candidate turns
// ============================================================================

#[tokio::test]
async fn session_starts_with_the_welcome_banner() {
    let (generator, _) = ok_generator().await;
    let f = fixture(
        Arc::new(FixedTranscriber(Ok("hi".into()))),
        generator,
        ready_credentials(),
    );

    let log = f.session.log_snapshot().await;
    assert_eq!(log.len(), 1);
    assert_eq!(log[0].speaker, Speaker::System);
    assert_eq!(f.session.busy_state(), BusyState::Idle);
}

#[tokio::test]
async fn successful_candidate_turn_appends_entry_and_reads_it_back() {
    let (generator, _) = ok_generator().await;
    let f = fixture(
        Arc::new(FixedTranscriber(Ok("I have five years of experience.".into()))),
        generator,
        ready_credentials(),
    );

    let text = f.session.candidate_turn().await.unwrap();
    assert_eq!(text, "I have five years of experience.");

    let log = f.session.log_snapshot().await;
    assert_eq!(log.len(), 2);
    assert_eq!(log[1].speaker, Speaker::Candidate);
    assert_eq!(log[1].text.as_deref(), Some("I have five years of experience."));
    assert!(log[1].media_ref.is_none());

    assert_eq!(
        *f.synthesizer.spoken.lock().unwrap(),
        vec!["I have five years of experience.".to_string()]
    );
    assert_eq!(f.session.busy_state(), BusyState::Idle);
}

#[tokio::test]
async fn transcription_failure_appends_one_system_entry_and_no_candidate_entry() {
    let (generator, _) = ok_generator().await;
    let f = fixture(
        Arc::new(FixedTranscriber(Err(GeminiError::Api("model overloaded".into())))),
        generator,
        ready_credentials(),
    );

    let err = f.session.candidate_turn().await.unwrap_err();
    assert!(matches!(err, TurnError::Transport(_)));

    let log = f.session.log_snapshot().await;
    assert_eq!(log.len(), 2);
    assert_eq!(log[1].speaker, Speaker::System);
    assert!(log[1]
        .text
        .as_deref()
        .unwrap()
        .starts_with("Error: Could not transcribe sign."));

    assert!(f.synthesizer.spoken.lock().unwrap().is_empty());
    assert_eq!(f.session.busy_state(), BusyState::Idle);
}

#[tokio::test]
async fn detached_camera_fails_the_candidate_turn_as_device_unavailable() {
    // A zero window samples zero frames, so use one that forces a grab
    let session = InterviewSession::new(
        SessionConfig {
            capture_window_ms: 200,
            frames_per_second: 5,
            ..SessionConfig::default()
        },
        FrameSampler::new(Arc::new(DetachedFrames)),
        Arc::new(FixedTranscriber(Ok("unused".into()))),
        Arc::new(FixedGenerator(Err(GeminiError::Api("unused".into())))),
        Arc::new(RecordingSynthesizer::default()),
        ready_credentials(),
    );

    let err = session.candidate_turn().await.unwrap_err();
    assert!(matches!(err, TurnError::DeviceUnavailable(_)));

    let log = session.log_snapshot().await;
    assert_eq!(log.len(), 2);
    assert_eq!(log[1].speaker, Speaker::System);
    assert_eq!(session.busy_state(), BusyState::Idle);
}

// ============================================================================
// Interviewer turns
// ============================================================================

#[tokio::test]
async fn successful_interviewer_turn_appends_text_then_video() {
    let (generator, media_ref) = ok_generator().await;
    let f = fixture(
        Arc::new(FixedTranscriber(Ok("unused".into()))),
        generator,
        ready_credentials(),
    );

    let returned = f.session.interviewer_turn("Hello").await.unwrap();
    assert_eq!(returned, media_ref);

    let log = f.session.log_snapshot().await;
    assert_eq!(log.len(), 3);

    assert_eq!(log[1].speaker, Speaker::Interviewer);
    assert_eq!(log[1].text.as_deref(), Some("Hello"));
    assert!(log[1].media_ref.is_none());

    assert_eq!(log[2].speaker, Speaker::Interviewer);
    assert!(log[2].text.is_none());
    assert_eq!(log[2].media_ref, Some(media_ref));

    assert_eq!(f.session.latest_video().await, Some(media_ref));
    assert_eq!(f.session.busy_state(), BusyState::Idle);
}

#[tokio::test]
async fn empty_input_is_rejected_without_any_mutation() {
    let (generator, _) = ok_generator().await;
    let f = fixture(
        Arc::new(FixedTranscriber(Ok("unused".into()))),
        generator,
        ready_credentials(),
    );

    for text in ["", "   ", "\n\t"] {
        let err = f.session.interviewer_turn(text).await.unwrap_err();
        assert!(matches!(err, TurnError::EmptyInput));
    }

    assert_eq!(f.session.log_snapshot().await.len(), 1);
    assert_eq!(f.session.busy_state(), BusyState::Idle);
}

#[tokio::test]
async fn missing_credential_is_rejected_with_zero_log_mutations() {
    let (generator, _) = ok_generator().await;
    let f = fixture(
        Arc::new(FixedTranscriber(Ok("unused".into()))),
        generator,
        Arc::new(CredentialGate::new(None)),
    );

    let err = f.session.interviewer_turn("Hello").await.unwrap_err();
    assert!(matches!(err, TurnError::MissingCredential));

    assert_eq!(f.session.log_snapshot().await.len(), 1);
    assert_eq!(f.session.busy_state(), BusyState::Idle);
}

#[tokio::test]
async fn demoted_credential_is_checked_fresh_on_every_turn() {
    let (generator, _) = ok_generator().await;
    let f = fixture(
        Arc::new(FixedTranscriber(Ok("unused".into()))),
        generator,
        ready_credentials(),
    );

    f.credentials.demote();

    let err = f.session.interviewer_turn("Hello").await.unwrap_err();
    assert!(matches!(err, TurnError::MissingCredential));
    assert_eq!(f.session.log_snapshot().await.len(), 1);
}

#[tokio::test]
async fn credential_invalid_failure_demotes_readiness_and_logs_system_entry() {
    let f = fixture(
        Arc::new(FixedTranscriber(Ok("unused".into()))),
        Arc::new(FixedGenerator(Err(GeminiError::InvalidKey(
            "Requested entity was not found.".into(),
        )))),
        ready_credentials(),
    );

    assert!(f.credentials.is_ready().await);

    let err = f.session.interviewer_turn("Hello").await.unwrap_err();
    assert!(matches!(err, TurnError::CredentialInvalid(_)));

    assert!(!f.credentials.is_ready().await);

    let log = f.session.log_snapshot().await;
    assert_eq!(log.len(), 3);
    assert_eq!(log[1].speaker, Speaker::Interviewer);
    assert_eq!(log[2].speaker, Speaker::System);
    assert_eq!(
        log[2].text.as_deref(),
        Some("Error: API Key is invalid. Please re-select your key.")
    );
    assert_eq!(f.session.busy_state(), BusyState::Idle);
}

#[tokio::test]
async fn generic_generation_failure_keeps_readiness_and_logs_system_entry() {
    let f = fixture(
        Arc::new(FixedTranscriber(Ok("unused".into()))),
        Arc::new(FixedGenerator(Err(GeminiError::Api("model overloaded".into())))),
        ready_credentials(),
    );

    let err = f.session.interviewer_turn("Hello").await.unwrap_err();
    assert!(matches!(err, TurnError::Transport(_)));

    assert!(f.credentials.is_ready().await);

    let log = f.session.log_snapshot().await;
    assert_eq!(log.len(), 3);
    assert_eq!(log[2].speaker, Speaker::System);
    assert!(log[2]
        .text
        .as_deref()
        .unwrap()
        .starts_with("Error: Could not generate video."));
    assert_eq!(f.session.busy_state(), BusyState::Idle);
}

// ============================================================================
// Turn exclusion and log invariants
// ============================================================================

#[tokio::test]
async fn turns_are_mutually_exclusive_while_one_is_in_flight() {
    let entered = Arc::new(Notify::new());
    let release = Arc::new(Notify::new());

    let (generator, _) = ok_generator().await;
    let f = Arc::new(fixture(
        Arc::new(BlockingTranscriber {
            entered: entered.clone(),
            release: release.clone(),
        }),
        generator,
        ready_credentials(),
    ));

    let runner = Arc::clone(&f);
    let candidate = tokio::spawn(async move { runner.session.candidate_turn().await });

    // Wait until the candidate turn is inside its transcription call
    entered.notified().await;
    assert_eq!(f.session.busy_state(), BusyState::CandidateTurn);

    let err = f.session.interviewer_turn("Hello").await.unwrap_err();
    assert!(matches!(err, TurnError::SessionBusy));

    let err = f.session.candidate_turn().await.unwrap_err();
    assert!(matches!(err, TurnError::SessionBusy));

    release.notify_one();
    let text = candidate.await.unwrap().unwrap();
    assert_eq!(text, "released");
    assert_eq!(f.session.busy_state(), BusyState::Idle);
}

#[tokio::test]
async fn log_is_append_only_across_turns() {
    let (generator, _) = ok_generator().await;
    let f = fixture(
        Arc::new(FixedTranscriber(Ok("First answer.".into()))),
        generator,
        ready_credentials(),
    );

    f.session.candidate_turn().await.unwrap();
    let before = f.session.log_snapshot().await;

    f.session.interviewer_turn("Next question").await.unwrap();
    let _ = f.session.interviewer_turn("   ").await;
    let after = f.session.log_snapshot().await;

    assert!(after.len() >= before.len());
    for (old, new) in before.iter().zip(after.iter()) {
        assert_eq!(old.speaker, new.speaker);
        assert_eq!(old.text, new.text);
        assert_eq!(old.media_ref, new.media_ref);
        assert_eq!(old.timestamp, new.timestamp);
    }
}

/// Generator yielding a different video per call
struct SequenceGenerator {
    refs: Mutex<Vec<MediaRef>>,
}

#[async_trait::async_trait]
impl VideoGenerator for SequenceGenerator {
    async fn generate(&self, _text: &str) -> Result<MediaRef, GeminiError> {
        let mut refs = self.refs.lock().unwrap();
        Ok(refs.remove(0))
    }
}

#[tokio::test]
async fn latest_video_tracks_the_newest_generated_video() {
    let store = MediaStore::new();
    let first = store.insert(vec![1], "video/mp4").await;
    let second = store.insert(vec![2], "video/mp4").await;

    let f = fixture(
        Arc::new(FixedTranscriber(Ok("unused".into()))),
        Arc::new(SequenceGenerator {
            refs: Mutex::new(vec![first, second]),
        }),
        ready_credentials(),
    );

    f.session.interviewer_turn("one").await.unwrap();
    assert_eq!(f.session.latest_video().await, Some(first));

    f.session.interviewer_turn("two").await.unwrap();
    assert_eq!(f.session.latest_video().await, Some(second));
}
