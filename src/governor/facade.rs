use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use crate::{
    governor::{
        error::GovernorError,
        noop::NoopDeviationLearner,
        orchestrator::RetryOrchestrator,
        policy::{AcceptancePolicy, PolicyThresholds},
        ports::{
            AdaptiveContextPort, DeviationLearnerPort, EmbedderPort, MemoryStorePort,
            PostureScorerPort, ResponseGeneratorPort,
        },
        types::{
            EmotionalTone, Exchange, ExchangeKind, GovernorLimits, LoopOutcome, MemoryChannel,
            PipelineMetadata, PipelineResult, SpeakerRole, ThreadId,
        },
    },
    posture::PostureScore,
};

#[derive(Debug, Clone, Default)]
pub struct MessageRequest {
    pub text: String,
    /// Pre-digested visual context from the excluded multimodal layer.
    pub visual_digest: Option<String>,
    pub thread_id: Option<ThreadId>,
    pub user_key: Option<String>,
}

impl MessageRequest {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }
}

/// Sequences one full invocation: input merge, input scoring, memory
/// retrieval, adaptive-context computation, the retry loop, and the
/// approval-gated persistence and adaptation notifications.
pub struct GovernorFacade {
    scorer: Arc<dyn PostureScorerPort>,
    embedder: Arc<dyn EmbedderPort>,
    memory: Arc<dyn MemoryStorePort>,
    context_provider: Arc<dyn AdaptiveContextPort>,
    learner: Arc<dyn DeviationLearnerPort>,
    orchestrator: RetryOrchestrator,
}

impl GovernorFacade {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        generator: Arc<dyn ResponseGeneratorPort>,
        scorer: Arc<dyn PostureScorerPort>,
        embedder: Arc<dyn EmbedderPort>,
        memory: Arc<dyn MemoryStorePort>,
        context_provider: Arc<dyn AdaptiveContextPort>,
        learner: Arc<dyn DeviationLearnerPort>,
        thresholds: PolicyThresholds,
        limits: GovernorLimits,
    ) -> Self {
        let orchestrator = RetryOrchestrator::new(
            generator,
            Arc::clone(&scorer),
            Arc::clone(&learner),
            Arc::clone(&memory),
            AcceptancePolicy::new(thresholds),
            limits,
        );

        Self {
            scorer,
            embedder,
            memory,
            context_provider,
            learner,
            orchestrator,
        }
    }

    /// Same wiring with the no-op learner.
    pub fn without_learner(
        generator: Arc<dyn ResponseGeneratorPort>,
        scorer: Arc<dyn PostureScorerPort>,
        embedder: Arc<dyn EmbedderPort>,
        memory: Arc<dyn MemoryStorePort>,
        context_provider: Arc<dyn AdaptiveContextPort>,
        thresholds: PolicyThresholds,
        limits: GovernorLimits,
    ) -> Self {
        Self::new(
            generator,
            scorer,
            embedder,
            memory,
            context_provider,
            Arc::new(NoopDeviationLearner),
            thresholds,
            limits,
        )
    }

    pub async fn process_message(
        &self,
        request: MessageRequest,
    ) -> Result<PipelineResult, GovernorError> {
        let invocation_id = Uuid::now_v7();
        debug!(invocation = %invocation_id, "processing message");

        let processed = merge_input(&request.text, request.visual_digest.as_deref());

        let input_posture = self
            .scorer
            .score(&processed, SpeakerRole::Requester)
            .await?;

        let query_embedding = self.embedder.embed(&processed).await?;
        let memories = self.memory.retrieve(&processed, &query_embedding).await?;

        let context = self
            .context_provider
            .compute_context(&input_posture, &memories)
            .await?;

        let outcome = self
            .orchestrator
            .run(&processed, &memories, &context, &input_posture)
            .await?;

        // Exhausted outcomes are never learned from or persisted.
        if outcome.status.is_approved() {
            self.integrate_and_learn(
                &processed,
                &outcome,
                &input_posture,
                request.thread_id.as_deref(),
                request.user_key.as_deref(),
            )
            .await?;
        }

        debug!(
            invocation = %invocation_id,
            status = outcome.status.as_str(),
            attempts_used = outcome.attempts_used,
            "message processed"
        );

        Ok(PipelineResult {
            response: outcome.text,
            metadata: PipelineMetadata {
                candidate_id: outcome.candidate_id,
                attempts_used: outcome.attempts_used,
                status: outcome.status,
                memory_stats: self.memory.statistics(),
                context_state: self.context_provider.state_summary(),
            },
            input_posture,
            output_posture: outcome.posture,
            trajectory: self.context_provider.trajectory(),
            status: outcome.status,
        })
    }

    pub async fn conversation_history(
        &self,
        thread_id: &str,
        limit: usize,
    ) -> Result<Vec<Exchange>, GovernorError> {
        self.memory.thread_messages(thread_id, limit).await
    }

    pub async fn user_threads(&self, user_key: &str) -> Result<Vec<ThreadId>, GovernorError> {
        self.memory.user_threads(user_key).await
    }

    async fn integrate_and_learn(
        &self,
        processed: &str,
        outcome: &LoopOutcome,
        input_posture: &PostureScore,
        thread_id: Option<&str>,
        user_key: Option<&str>,
    ) -> Result<(), GovernorError> {
        let thread_id: Option<ThreadId> = match (thread_id, user_key) {
            (Some(id), _) => Some(id.to_string()),
            (None, Some(key)) => Some(self.memory.create_thread(key).await?),
            (None, None) => None,
        };

        let input_embedding = self.embedder.embed(processed).await?;
        self.memory
            .persist(
                Exchange {
                    content: processed.to_string(),
                    role: SpeakerRole::Requester,
                    emotional_tone: infer_emotional_tone(processed),
                    kind: ExchangeKind::Message,
                },
                MemoryChannel::Contextual,
                &input_embedding,
                thread_id.as_deref(),
            )
            .await?;

        let response_embedding = self.embedder.embed(&outcome.text).await?;
        self.memory
            .persist(
                Exchange {
                    content: outcome.text.clone(),
                    role: SpeakerRole::Responder,
                    emotional_tone: EmotionalTone::Balanced,
                    kind: ExchangeKind::Response,
                },
                MemoryChannel::Contextual,
                &response_embedding,
                thread_id.as_deref(),
            )
            .await?;

        if let Some(id) = thread_id.as_deref() {
            self.memory.touch_thread(id).await?;
        }

        self.learner.observe_dialogue(processed).await;
        self.context_provider
            .update_from_interaction(input_posture, &outcome.posture)
            .await?;

        Ok(())
    }
}

fn merge_input(message: &str, visual_digest: Option<&str>) -> String {
    match visual_digest {
        Some(digest) => format!("{message}\n\n[Visual context: {digest}]"),
        None => message.to_string(),
    }
}

/// Keyword-level tone classification for the requester side of a
/// persisted exchange.
pub fn infer_emotional_tone(message: &str) -> EmotionalTone {
    let msg = message.to_lowercase();
    let contains_any = |words: &[&str]| words.iter().any(|word| msg.contains(word));

    if contains_any(&["angry", "furious", "hate"]) {
        EmotionalTone::Angry
    } else if contains_any(&["sad", "depressed", "hurt"]) {
        EmotionalTone::Sad
    } else if contains_any(&["happy", "excited", "love"]) {
        EmotionalTone::Joyful
    } else if contains_any(&["worried", "anxious", "scared"]) {
        EmotionalTone::Anxious
    } else {
        EmotionalTone::Neutral
    }
}
