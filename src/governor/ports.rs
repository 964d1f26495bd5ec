use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::{
    governor::{
        error::GovernorError,
        types::{
            AdaptiveContext, Exchange, MemoryChannel, MemoryFragment, SpeakerRole, ThreadId,
        },
    },
    posture::{PostureScore, PostureTriad},
};

#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub prompt: String,
    pub diversity: f64,
    pub max_length: u32,
}

/// Text generation backend. May be nondeterministic; no further
/// contract is assumed.
#[async_trait]
pub trait ResponseGeneratorPort: Send + Sync {
    async fn generate(&self, req: GenerationRequest) -> Result<String, GovernorError>;
}

/// Posture scoring oracle for either side of an exchange.
#[async_trait]
pub trait PostureScorerPort: Send + Sync {
    async fn score(&self, text: &str, role: SpeakerRole) -> Result<PostureScore, GovernorError>;
}

#[async_trait]
pub trait EmbedderPort: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, GovernorError>;
}

/// Long-term exchange store with thread bookkeeping. Retrieval order
/// is the store's relevance order and is preserved downstream.
#[async_trait]
pub trait MemoryStorePort: Send + Sync {
    async fn retrieve(
        &self,
        query: &str,
        embedding: &[f32],
    ) -> Result<Vec<MemoryFragment>, GovernorError>;

    async fn persist(
        &self,
        exchange: Exchange,
        channel: MemoryChannel,
        embedding: &[f32],
        thread_id: Option<&str>,
    ) -> Result<(), GovernorError>;

    async fn create_thread(&self, user_key: &str) -> Result<ThreadId, GovernorError>;

    async fn touch_thread(&self, thread_id: &str) -> Result<(), GovernorError>;

    async fn thread_messages(
        &self,
        thread_id: &str,
        limit: usize,
    ) -> Result<Vec<Exchange>, GovernorError>;

    async fn user_threads(&self, user_key: &str) -> Result<Vec<ThreadId>, GovernorError>;

    fn statistics(&self) -> Value;
}

/// Derives the per-invocation steering target from history and keeps
/// its own adaptation state.
#[async_trait]
pub trait AdaptiveContextPort: Send + Sync {
    async fn compute_context(
        &self,
        input_posture: &PostureScore,
        memories: &[MemoryFragment],
    ) -> Result<AdaptiveContext, GovernorError>;

    async fn update_from_interaction(
        &self,
        input_posture: &PostureScore,
        output_posture: &PostureScore,
    ) -> Result<(), GovernorError>;

    fn state_summary(&self) -> Value;

    fn trajectory(&self) -> String;
}

/// Folds rejection deviations into an adaptation process.
///
/// Both methods are fire-and-forget: the loop neither observes nor
/// depends on the learner's success. `NoopDeviationLearner` is the
/// default when no learner is configured.
#[async_trait]
pub trait DeviationLearnerPort: Send + Sync {
    async fn absorb(&self, deviation: PostureTriad, memory: Arc<dyn MemoryStorePort>);

    async fn observe_dialogue(&self, text: &str);
}
