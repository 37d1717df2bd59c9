// src/session.rs
//
// The session controller: one user's analysis flow as a small state
// machine. Exactly one analysis may be in flight; a second trigger while
// one is running is a no-op reported as Busy. The mutex guards state
// transitions only and is never held across the network await.

use serde::Serialize;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::analysis::AnalysisClient;
use crate::errors::{routes_to_credential_banner, AnalysisError};
use crate::models::{AnalysisRecord, ImagePayload};
use crate::prompt;

/// Inserted between validation and the actual request, purely for perceived
/// responsiveness. Not a debounce; carries no correctness contract.
pub const SETTLE_DELAY: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Phase {
    #[default]
    Idle,
    Validating,
    Requesting,
    Settled,
}

/// What a trigger attempt observed. `Busy`, `NoImage` and `NoCredential`
/// all mean no network activity happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerOutcome {
    Completed,
    Busy,
    NoImage,
    NoCredential,
}

#[derive(Debug, Default)]
struct Session {
    phase: Phase,
    staged: Option<ImagePayload>,
    record: Option<AnalysisRecord>,
    transient_error: Option<String>,
    credential_error: Option<String>,
}

impl Session {
    /// Restaging or clearing never interrupts a pending analysis: the busy
    /// guard reads the phase, so Validating/Requesting stay in place until
    /// the flight settles.
    fn reset_phase_unless_in_flight(&mut self) {
        if !matches!(self.phase, Phase::Validating | Phase::Requesting) {
            self.phase = Phase::Idle;
        }
    }
}

/// Serializable view of the session for the frontend poll. The outcome is
/// display-projected: an unfixable verdict never exposes repair methods or
/// cost, regardless of what was parsed.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub phase: Phase,
    pub staged_media_type: Option<String>,
    pub staged_size: Option<usize>,
    pub record: Option<AnalysisRecord>,
    pub transient_error: Option<String>,
    pub credential_error: Option<String>,
    pub credential_configured: bool,
}

pub struct SessionController {
    state: Mutex<Session>,
    client: AnalysisClient,
    settle_delay: Duration,
}

impl SessionController {
    pub fn new(client: AnalysisClient) -> Arc<Self> {
        Self::with_settle_delay(client, SETTLE_DELAY)
    }

    pub fn with_settle_delay(client: AnalysisClient, settle_delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(Session::default()),
            client,
            settle_delay,
        })
    }

    /// Stages a new image, discarding any prior result and transient error.
    /// The credential banner survives a restage; it clears only when the
    /// environment is fixed.
    pub fn stage(&self, payload: ImagePayload) {
        let mut session = self.lock();
        session.staged = Some(payload);
        session.record = None;
        session.transient_error = None;
        session.reset_phase_unless_in_flight();
    }

    /// Drops the staged image and any result.
    pub fn clear(&self) {
        let mut session = self.lock();
        session.staged = None;
        session.record = None;
        session.transient_error = None;
        session.reset_phase_unless_in_flight();
    }

    /// Runs one analysis end to end. Returns what the trigger observed;
    /// results land in the session state either way.
    pub async fn run_analysis(&self) -> TriggerOutcome {
        // Pre-flight under the lock: busy guard, then validation.
        let image = {
            let mut session = self.lock();
            if matches!(session.phase, Phase::Validating | Phase::Requesting) {
                return TriggerOutcome::Busy;
            }

            let Some(image) = session.staged.clone() else {
                session.transient_error = Some(AnalysisError::NoImageStaged.to_string());
                session.phase = Phase::Idle;
                return TriggerOutcome::NoImage;
            };

            if !self.client.credential_configured() {
                session.credential_error = Some(prompt::CREDENTIAL_ERROR_MESSAGE.to_string());
                session.phase = Phase::Idle;
                return TriggerOutcome::NoCredential;
            }

            session.phase = Phase::Validating;
            session.record = None;
            session.transient_error = None;
            image
        };

        tokio::time::sleep(self.settle_delay).await;

        {
            let mut session = self.lock();
            session.phase = Phase::Requesting;
        }

        log::info!(
            "analyzing staged image ({}, {} bytes)",
            image.media_type,
            image.source_size
        );
        let record = self.client.analyze(&image).await;

        self.settle(record);
        TriggerOutcome::Completed
    }

    /// Stores a settled record and routes its error, if any, to the right
    /// surface. Settled is instantaneous; the phase returns to Idle so the
    /// user can immediately restage or retrigger.
    fn settle(&self, record: AnalysisRecord) {
        let mut session = self.lock();
        session.phase = Phase::Settled;

        match record.outcome.error_text() {
            Some(error) if routes_to_credential_banner(error) => {
                session.credential_error = Some(error.to_string());
                session.transient_error = None;
            }
            Some(error) => {
                session.transient_error = Some(error.to_string());
            }
            None => {
                session.transient_error = None;
            }
        }

        session.record = Some(record);
        session.phase = Phase::Idle;
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let session = self.lock();
        SessionSnapshot {
            phase: session.phase,
            staged_media_type: session.staged.as_ref().map(|p| p.media_type.clone()),
            staged_size: session.staged.as_ref().map(|p| p.source_size),
            record: session.record.as_ref().map(|r| AnalysisRecord {
                id: r.id.clone(),
                outcome: r.outcome.for_display(),
                latency_ms: r.latency_ms,
                timestamp: r.timestamp.clone(),
            }),
            transient_error: session.transient_error.clone(),
            credential_error: session.credential_error.clone(),
            credential_configured: self.client.credential_configured(),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Session> {
        // A poisoned lock only means a panicked test thread; the state
        // itself stays usable.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GeminiConfig;
    use crate::encoder;

    fn staged_controller(config: Option<GeminiConfig>) -> Arc<SessionController> {
        let client = AnalysisClient::new(reqwest::Client::new(), config);
        let controller = SessionController::with_settle_delay(client, Duration::from_millis(50));
        controller.stage(encoder::encode_bytes("image/png", b"not-really-a-png").unwrap());
        controller
    }

    fn unreachable_config() -> GeminiConfig {
        GeminiConfig {
            api_base: "http://127.0.0.1:1".to_string(),
            api_key: "test-key".to_string(),
            model: "gemini-test".to_string(),
        }
    }

    #[tokio::test]
    async fn test_trigger_without_image_stays_idle() {
        let client = AnalysisClient::new(reqwest::Client::new(), Some(unreachable_config()));
        let controller = SessionController::new(client);

        assert_eq!(controller.run_analysis().await, TriggerOutcome::NoImage);
        let snap = controller.snapshot();
        assert_eq!(snap.phase, Phase::Idle);
        assert!(snap.transient_error.unwrap().contains("select an image"));
        assert!(snap.credential_error.is_none());
    }

    #[tokio::test]
    async fn test_trigger_without_credential_sets_banner_and_stays_idle() {
        let controller = staged_controller(None);

        assert_eq!(controller.run_analysis().await, TriggerOutcome::NoCredential);
        let snap = controller.snapshot();
        assert_eq!(snap.phase, Phase::Idle);
        assert!(!snap.credential_configured);
        assert!(snap.credential_error.is_some());
        assert!(snap.record.is_none());
    }

    #[tokio::test]
    async fn test_second_trigger_while_in_flight_is_busy() {
        let controller = staged_controller(Some(unreachable_config()));

        let first = {
            let controller = controller.clone();
            tokio::spawn(async move { controller.run_analysis().await })
        };
        // Land inside the first trigger's settle delay.
        tokio::time::sleep(Duration::from_millis(10)).await;

        assert_eq!(controller.run_analysis().await, TriggerOutcome::Busy);
        assert_eq!(first.await.unwrap(), TriggerOutcome::Completed);
    }

    #[tokio::test]
    async fn test_restage_during_flight_does_not_reopen_trigger() {
        let controller = staged_controller(Some(unreachable_config()));

        let first = {
            let controller = controller.clone();
            tokio::spawn(async move { controller.run_analysis().await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;

        // Staging a new file mid-flight neither aborts the pending call nor
        // lets a second one start.
        controller.stage(encoder::encode_bytes("image/jpeg", b"newer-photo").unwrap());
        assert_eq!(controller.snapshot().phase, Phase::Validating);
        assert_eq!(controller.run_analysis().await, TriggerOutcome::Busy);

        assert_eq!(first.await.unwrap(), TriggerOutcome::Completed);
        let snap = controller.snapshot();
        assert_eq!(snap.phase, Phase::Idle);
        assert_eq!(snap.staged_media_type.as_deref(), Some("image/jpeg"));
    }

    #[tokio::test]
    async fn test_clear_during_flight_does_not_reopen_trigger() {
        let controller = staged_controller(Some(unreachable_config()));

        let first = {
            let controller = controller.clone();
            tokio::spawn(async move { controller.run_analysis().await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;

        controller.clear();
        assert_eq!(controller.run_analysis().await, TriggerOutcome::Busy);
        assert_eq!(first.await.unwrap(), TriggerOutcome::Completed);
    }

    #[tokio::test]
    async fn test_transport_failure_settles_and_returns_to_idle() {
        let controller = staged_controller(Some(unreachable_config()));

        assert_eq!(controller.run_analysis().await, TriggerOutcome::Completed);
        let snap = controller.snapshot();
        assert_eq!(snap.phase, Phase::Idle);
        let error = snap.transient_error.expect("connection failure is transient");
        assert!(error.starts_with("Failed to get analysis from the model."));
        assert!(snap.record.is_some());
    }

    #[tokio::test]
    async fn test_restage_clears_prior_result_but_not_banner() {
        let controller = staged_controller(None);
        controller.run_analysis().await;
        assert!(controller.snapshot().credential_error.is_some());

        controller.stage(encoder::encode_bytes("image/jpeg", b"another").unwrap());
        let snap = controller.snapshot();
        assert!(snap.record.is_none());
        assert!(snap.transient_error.is_none());
        assert!(snap.credential_error.is_some());
        assert_eq!(snap.staged_media_type.as_deref(), Some("image/jpeg"));
    }
}
