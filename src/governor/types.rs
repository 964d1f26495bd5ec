use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::posture::{PostureScore, PostureTriad};

pub type ThreadId = String;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpeakerRole {
    Requester,
    Responder,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemoryChannel {
    Identity,
    Contextual,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmotionalTone {
    Angry,
    Sad,
    Joyful,
    Anxious,
    Neutral,
    Balanced,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExchangeKind {
    Message,
    Response,
}

/// One side of a persisted interaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exchange {
    pub content: String,
    pub role: SpeakerRole,
    pub emotional_tone: EmotionalTone,
    pub kind: ExchangeKind,
}

/// One retrieved prior-exchange snippet. Metadata is opaque to the
/// core and travels untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryFragment {
    pub content: String,
    #[serde(default)]
    pub metadata: Value,
}

impl MemoryFragment {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            metadata: Value::Null,
        }
    }
}

/// Collaborator-computed steering context. Read-only inside the loop;
/// `extra` carries whatever else the provider wants to round-trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdaptiveContext {
    pub target_triad: PostureTriad,
    #[serde(default)]
    pub extra: Value,
}

/// One rejected generation. Scoped to a single invocation, never
/// persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttemptRecord {
    pub attempt: usize,
    pub text: String,
    pub posture: PostureScore,
    pub failure_reason: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GovernorStatus {
    Approved,
    LimitationProtocol,
}

impl GovernorStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Approved => "approved",
            Self::LimitationProtocol => "limitation_protocol",
        }
    }

    pub fn is_approved(self) -> bool {
        matches!(self, Self::Approved)
    }
}

/// Outcome of one bounded retry loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoopOutcome {
    pub status: GovernorStatus,
    pub text: String,
    pub posture: PostureScore,
    pub candidate_id: String,
    pub attempts_used: usize,
}

/// Closed metadata record. The only open fields are the two
/// collaborator-owned stat side channels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineMetadata {
    pub candidate_id: String,
    pub attempts_used: usize,
    pub status: GovernorStatus,
    pub memory_stats: Value,
    pub context_state: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineResult {
    pub response: String,
    pub metadata: PipelineMetadata,
    pub input_posture: PostureScore,
    pub output_posture: PostureScore,
    pub trajectory: String,
    pub status: GovernorStatus,
}

fn default_max_attempts() -> usize {
    3
}

fn default_base_diversity() -> f64 {
    0.7
}

fn default_diversity_step() -> f64 {
    0.1
}

fn default_max_response_length() -> u32 {
    2000
}

fn default_memory_context_limit() -> usize {
    5
}

/// Per-invocation budget and prompt-shaping knobs for the retry loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GovernorLimits {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: usize,
    #[serde(default = "default_base_diversity")]
    pub base_diversity: f64,
    #[serde(default = "default_diversity_step")]
    pub diversity_step: f64,
    #[serde(default = "default_max_response_length")]
    pub max_response_length: u32,
    #[serde(default = "default_memory_context_limit")]
    pub memory_context_limit: usize,
}

impl Default for GovernorLimits {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            base_diversity: default_base_diversity(),
            diversity_step: default_diversity_step(),
            max_response_length: default_max_response_length(),
            memory_context_limit: default_memory_context_limit(),
        }
    }
}
