use std::sync::Arc;

use tracing::info;

use crate::{
    governor::{
        error::GovernorError,
        fallback,
        policy::AcceptancePolicy,
        ports::{
            DeviationLearnerPort, GenerationRequest, MemoryStorePort, PostureScorerPort,
            ResponseGeneratorPort,
        },
        prompts,
        types::{
            AdaptiveContext, AttemptRecord, GovernorLimits, GovernorStatus, LoopOutcome,
            MemoryFragment, SpeakerRole,
        },
    },
    posture::PostureScore,
};

/// Drives the bounded generate -> score -> validate -> learn loop.
///
/// Strictly sequential: each attempt's prompt depends on the previous
/// attempt's failure digest, so attempts never overlap. Learning
/// happens during the loop - every rejection is handed to the learner
/// before the next generation starts.
pub struct RetryOrchestrator {
    generator: Arc<dyn ResponseGeneratorPort>,
    scorer: Arc<dyn PostureScorerPort>,
    learner: Arc<dyn DeviationLearnerPort>,
    memory: Arc<dyn MemoryStorePort>,
    policy: AcceptancePolicy,
    limits: GovernorLimits,
}

impl RetryOrchestrator {
    pub fn new(
        generator: Arc<dyn ResponseGeneratorPort>,
        scorer: Arc<dyn PostureScorerPort>,
        learner: Arc<dyn DeviationLearnerPort>,
        memory: Arc<dyn MemoryStorePort>,
        policy: AcceptancePolicy,
        limits: GovernorLimits,
    ) -> Self {
        Self {
            generator,
            scorer,
            learner,
            memory,
            policy,
            limits,
        }
    }

    pub fn limits(&self) -> &GovernorLimits {
        &self.limits
    }

    pub async fn run(
        &self,
        input: &str,
        memories: &[MemoryFragment],
        context: &AdaptiveContext,
        input_posture: &PostureScore,
    ) -> Result<LoopOutcome, GovernorError> {
        let mut attempt_history: Vec<AttemptRecord> = Vec::new();

        for attempt in 0..self.limits.max_attempts {
            let prompt = prompts::build_generation_prompt(
                input,
                memories,
                self.limits.memory_context_limit,
                &context.target_triad,
                attempt_history.last(),
            );
            let diversity = self.limits.base_diversity + self.limits.diversity_step * attempt as f64;

            let text = self
                .generator
                .generate(GenerationRequest {
                    prompt,
                    diversity,
                    max_length: self.limits.max_response_length,
                })
                .await?;
            let posture = self.scorer.score(&text, SpeakerRole::Responder).await?;

            let outcome = self
                .policy
                .evaluate(&posture, &context.target_triad, input_posture);

            let Some(deviation) = outcome.deviation() else {
                info!(attempt, attempts_used = attempt + 1, "candidate accepted");
                return Ok(LoopOutcome {
                    status: GovernorStatus::Approved,
                    text,
                    posture,
                    candidate_id: format!("attempt-{attempt}"),
                    attempts_used: attempt + 1,
                });
            };

            let failure_reason = outcome
                .failure_reason(&posture.triad())
                .unwrap_or_else(|| "candidate rejected".to_string());

            // The deviation becomes a training signal before the next
            // attempt is generated. Learner failures cannot stop the loop.
            self.learner
                .absorb(deviation, Arc::clone(&self.memory))
                .await;
            info!(
                attempt,
                reason = %failure_reason,
                delta_care = deviation.care,
                delta_autonomy = deviation.autonomy,
                delta_accuracy = deviation.accuracy,
                "learning from deviation"
            );

            attempt_history.push(AttemptRecord {
                attempt,
                text,
                posture,
                failure_reason,
            });
        }

        info!(
            attempts = self.limits.max_attempts,
            "attempt budget exhausted, engaging limitation protocol"
        );
        Ok(fallback::honest_limitation(self.limits.max_attempts))
    }
}
