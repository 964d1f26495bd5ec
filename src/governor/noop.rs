use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    governor::ports::{DeviationLearnerPort, MemoryStorePort},
    posture::PostureTriad,
};

/// Stands in when no deviation learner is configured. A missing
/// learner is not an error.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopDeviationLearner;

#[async_trait]
impl DeviationLearnerPort for NoopDeviationLearner {
    async fn absorb(&self, _deviation: PostureTriad, _memory: Arc<dyn MemoryStorePort>) {}

    async fn observe_dialogue(&self, _text: &str) {}
}
