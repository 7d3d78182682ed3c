//! Public entry point of the engine.
//!
//! [`StreamOrchestrator::send`] runs one attempt end to end:
//! supersede, optimistic insert, open, drain frames, reconcile, reset.
//! Only the attempt that is current when it reaches a decision point may
//! touch the cache or the observable state; every such decision runs under
//! the cancellation controller's lock.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::watch;

use crate::adapters::{ReqwestHttpClient, TracingNotifier};
use crate::config::StreamConfig;
use crate::error::{StreamError, StreamResult};
use crate::models::{RecommendationPayload, SendOptions, StreamRequest};
use crate::sse::{interpret_line, FrameReader, ProtocolEvent};
use crate::traits::{ConversationCache, HttpClient, HttpError, NotificationSink};

use super::attempt::{AttemptOutcome, AttemptPhase, StreamAttempt};
use super::cancel::{AttemptHandle, CancellationController};
use super::reconcile::{FinalReply, Reconciler};

/// Sends messages into conversations and keeps the cache in sync with
/// the streamed reply.
///
/// # Example
///
/// ```ignore
/// use convo_stream::{StreamConfig, StreamOrchestrator, SendOptions};
///
/// let orchestrator = StreamOrchestrator::from_config(StreamConfig::from_env(), cache);
/// let mut content = orchestrator.streaming_content();
/// orchestrator.send("conv-1", "Bonjour", SendOptions::default()).await;
/// ```
pub struct StreamOrchestrator {
    config: StreamConfig,
    http: Arc<dyn HttpClient>,
    reconciler: Reconciler,
    controller: CancellationController,
    content_tx: watch::Sender<String>,
    content_rx: watch::Receiver<String>,
    active_tx: watch::Sender<bool>,
    active_rx: watch::Receiver<bool>,
    phase_tx: watch::Sender<AttemptPhase>,
    phase_rx: watch::Receiver<AttemptPhase>,
}

impl StreamOrchestrator {
    pub fn new(
        config: StreamConfig,
        http: Arc<dyn HttpClient>,
        cache: Arc<dyn ConversationCache>,
        notifier: Arc<dyn NotificationSink>,
    ) -> Self {
        let (content_tx, content_rx) = watch::channel(String::new());
        let (active_tx, active_rx) = watch::channel(false);
        let (phase_tx, phase_rx) = watch::channel(AttemptPhase::Idle);
        let reconciler = Reconciler::new(cache, notifier, &config);

        Self {
            config,
            http,
            reconciler,
            controller: CancellationController::new(),
            content_tx,
            content_rx,
            active_tx,
            active_rx,
            phase_tx,
            phase_rx,
        }
    }

    /// Orchestrator over reqwest, reporting failures to the tracing log.
    pub fn from_config(config: StreamConfig, cache: Arc<dyn ConversationCache>) -> Self {
        Self::new(
            config,
            Arc::new(ReqwestHttpClient::new()),
            cache,
            Arc::new(TracingNotifier::new()),
        )
    }

    pub fn config(&self) -> &StreamConfig {
        &self.config
    }

    /// Watch the partial reply of the current attempt.
    pub fn streaming_content(&self) -> watch::Receiver<String> {
        self.content_rx.clone()
    }

    /// Watch whether an attempt is live.
    pub fn is_active(&self) -> watch::Receiver<bool> {
        self.active_rx.clone()
    }

    /// Watch the current attempt's phase.
    pub fn phase(&self) -> watch::Receiver<AttemptPhase> {
        self.phase_rx.clone()
    }

    pub fn current_content(&self) -> String {
        self.content_rx.borrow().clone()
    }

    pub fn active(&self) -> bool {
        *self.active_rx.borrow()
    }

    pub fn current_phase(&self) -> AttemptPhase {
        *self.phase_rx.borrow()
    }

    /// Send `text` into a conversation and stream the reply.
    ///
    /// Any live attempt is cancelled first. Failures are rolled back and
    /// reported through the notification sink; the returned outcome is
    /// informational and never needs handling.
    pub async fn send(
        &self,
        conversation_id: &str,
        text: &str,
        options: SendOptions,
    ) -> AttemptOutcome {
        if conversation_id.is_empty() {
            tracing::debug!("Ignoring send without conversation id");
            return AttemptOutcome::Skipped;
        }

        let handle = self.controller.supersede();
        let mut guard = AttemptGuard::new(self, handle.clone());
        let mut attempt = StreamAttempt::new(conversation_id, handle.clone());
        attempt.advance(AttemptPhase::Opening);

        let started = self.controller.if_current(&handle, || {
            self.publish_start();
            if !options.skip_optimistic_insert {
                self.reconciler.preflight(conversation_id, text, Utc::now());
            }
        });

        let result = match started {
            Some(()) => self.run(&mut attempt, text, options).await,
            None => Err(StreamError::Cancelled),
        };
        guard.disarm();
        self.finish(attempt, text, options, result)
    }

    /// Cancel the live attempt, if any. The attempt becomes inactive
    /// immediately and leaves the cache untouched.
    pub fn cancel(&self) -> bool {
        self.controller
            .cancel_current_and(|| self.publish_reset(AttemptPhase::Cancelled))
            .is_some()
    }

    /// Release the live attempt because the owning view is going away.
    pub fn teardown(&self) -> bool {
        self.controller
            .dispose_on_teardown_and(|| self.publish_reset(AttemptPhase::Cancelled))
            .is_some()
    }

    async fn run(
        &self,
        attempt: &mut StreamAttempt,
        text: &str,
        options: SendOptions,
    ) -> StreamResult<()> {
        let handle = attempt.handle().clone();
        let token = handle.token().clone();

        let url = self.config.stream_url(attempt.conversation_id());
        let request =
            StreamRequest::new(text).with_skip_save_user_message(options.skip_persisting_user_message);
        let body = serde_json::to_string(&request)
            .map_err(|e| StreamError::Transport(HttpError::Other(e.to_string())))?;
        let headers = self.config.request_headers();

        tracing::debug!(
            conversation_id = attempt.conversation_id(),
            attempt = attempt.generation(),
            "Opening stream"
        );

        let opened = tokio::select! {
            biased;
            _ = token.cancelled() => None,
            opened = self.http.post_stream(&url, &body, &headers) => Some(opened),
        };
        let body = match opened {
            Some(opened) => opened?,
            None => return Err(StreamError::Cancelled),
        };

        let mut reader = FrameReader::new(body);
        loop {
            let batch = tokio::select! {
                biased;
                _ = token.cancelled() => return Err(StreamError::Cancelled),
                batch = reader.next_batch() => batch,
            };
            let lines = match batch {
                Some(lines) => lines?,
                None => return Err(StreamError::Incomplete),
            };
            if attempt.phase() == AttemptPhase::Opening {
                attempt.advance(AttemptPhase::Streaming);
                self.controller
                    .if_current(&handle, || self.publish_phase(AttemptPhase::Streaming));
            }

            for line in lines {
                if token.is_cancelled() {
                    return Err(StreamError::Cancelled);
                }
                let Some(event) = interpret_line(&line)? else {
                    continue;
                };
                match event {
                    ProtocolEvent::Chunk(chunk) => {
                        let content = attempt.push_chunk(&chunk).to_string();
                        self.controller
                            .if_current(&handle, || self.publish_content(content));
                    }
                    ProtocolEvent::FinalPayload(raw) => {
                        match RecommendationPayload::from_raw(&raw) {
                            Some(payload) => attempt.set_recommendations(payload),
                            None => tracing::debug!(
                                attempt = attempt.generation(),
                                "Discarding final payload without recommendations"
                            ),
                        }
                    }
                    ProtocolEvent::Completion => {
                        tracing::debug!(
                            attempt = attempt.generation(),
                            chunks = attempt.chunk_count(),
                            "Completion received"
                        );
                        return Ok(());
                    }
                    ProtocolEvent::Error(message) => {
                        return Err(StreamError::Backend { message });
                    }
                }
            }
        }
    }

    fn finish(
        &self,
        mut attempt: StreamAttempt,
        text: &str,
        options: SendOptions,
        result: StreamResult<()>,
    ) -> AttemptOutcome {
        let handle = attempt.handle().clone();
        let conversation_id = attempt.conversation_id().to_string();

        match result {
            Ok(()) => {
                let reply = FinalReply {
                    user_text: (!options.skip_optimistic_insert).then(|| text.to_string()),
                    assistant_text: attempt.take_content(),
                    recommendations: attempt.take_recommendations(),
                };
                let committed = self.controller.retire_if_current(&handle, || {
                    self.reconciler.succeed(&conversation_id, reply, Utc::now());
                    self.publish_reset(AttemptPhase::Completed);
                });
                match committed {
                    Some(()) => {
                        attempt.advance(AttemptPhase::Completed);
                        tracing::debug!(
                            conversation_id = %conversation_id,
                            attempt = attempt.generation(),
                            "Stream completed"
                        );
                        AttemptOutcome::Completed
                    }
                    None => self.finish_cancelled(&mut attempt, &handle),
                }
            }
            Err(err) if err.is_cancellation() => self.finish_cancelled(&mut attempt, &handle),
            Err(err) => {
                let rolled_back = self.controller.retire_if_current(&handle, || {
                    self.reconciler.rollback(&conversation_id);
                    self.publish_reset(AttemptPhase::Errored);
                });
                match rolled_back {
                    Some(()) => {
                        attempt.advance(AttemptPhase::Errored);
                        tracing::warn!(
                            conversation_id = %conversation_id,
                            attempt = attempt.generation(),
                            error_code = err.error_code(),
                            category = err.category().as_str(),
                            error = %err,
                            "Stream attempt failed"
                        );
                        self.reconciler.report_failure(&err);
                        AttemptOutcome::Failed(err)
                    }
                    None => self.finish_cancelled(&mut attempt, &handle),
                }
            }
        }
    }

    fn finish_cancelled(&self, attempt: &mut StreamAttempt, handle: &AttemptHandle) -> AttemptOutcome {
        // Still current only when the transport itself reported a cancellation.
        self.controller
            .retire_if_current(handle, || self.publish_reset(AttemptPhase::Cancelled));
        attempt.advance(AttemptPhase::Cancelled);
        tracing::debug!(
            conversation_id = attempt.conversation_id(),
            attempt = attempt.generation(),
            "Stream cancelled"
        );
        AttemptOutcome::Cancelled
    }

    fn publish_start(&self) {
        let _ = self.content_tx.send(String::new());
        let _ = self.active_tx.send(true);
        let _ = self.phase_tx.send(AttemptPhase::Opening);
    }

    fn publish_phase(&self, phase: AttemptPhase) {
        let _ = self.phase_tx.send(phase);
    }

    fn publish_content(&self, content: String) {
        let _ = self.content_tx.send(content);
    }

    fn publish_reset(&self, terminal: AttemptPhase) {
        let _ = self.content_tx.send(String::new());
        let _ = self.active_tx.send(false);
        let _ = self.phase_tx.send(terminal);
        let _ = self.phase_tx.send(AttemptPhase::Idle);
    }
}

/// Retires the attempt when the `send` future is dropped before it finishes.
struct AttemptGuard<'a> {
    orchestrator: &'a StreamOrchestrator,
    handle: Option<AttemptHandle>,
}

impl<'a> AttemptGuard<'a> {
    fn new(orchestrator: &'a StreamOrchestrator, handle: AttemptHandle) -> Self {
        Self {
            orchestrator,
            handle: Some(handle),
        }
    }

    fn disarm(&mut self) {
        self.handle = None;
    }
}

impl Drop for AttemptGuard<'_> {
    fn drop(&mut self) {
        let Some(handle) = self.handle.take() else {
            return;
        };
        let orchestrator = self.orchestrator;
        let retired = orchestrator
            .controller
            .retire_if_current(&handle, || orchestrator.publish_reset(AttemptPhase::Cancelled));
        handle.token().cancel();
        if retired.is_some() {
            tracing::debug!(
                attempt = handle.generation(),
                "Send dropped before completion"
            );
        }
    }
}

impl Drop for StreamOrchestrator {
    fn drop(&mut self) {
        self.controller.dispose_on_teardown();
    }
}

impl std::fmt::Debug for StreamOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamOrchestrator")
            .field("config", &self.config)
            .field("controller", &self.controller)
            .field("phase", &self.current_phase())
            .finish_non_exhaustive()
    }
}
