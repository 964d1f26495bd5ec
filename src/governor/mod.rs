pub mod error;
pub mod facade;
pub mod fallback;
pub mod noop;
pub mod orchestrator;
pub mod policy;
pub mod ports;
pub mod prompts;
pub mod types;

pub use error::{GovernorError, GovernorErrorKind};
pub use facade::{GovernorFacade, MessageRequest, infer_emotional_tone};
pub use fallback::{LIMITATION_CANDIDATE_ID, LIMITATION_MESSAGE, honest_limitation};
pub use noop::NoopDeviationLearner;
pub use orchestrator::RetryOrchestrator;
pub use policy::{AcceptancePolicy, PolicyOutcome, PolicyThresholds};
pub use ports::{
    AdaptiveContextPort, DeviationLearnerPort, EmbedderPort, GenerationRequest, MemoryStorePort,
    PostureScorerPort, ResponseGeneratorPort,
};
pub use types::{
    AdaptiveContext, AttemptRecord, EmotionalTone, Exchange, ExchangeKind, GovernorLimits,
    GovernorStatus, LoopOutcome, MemoryChannel, MemoryFragment, PipelineMetadata, PipelineResult,
    SpeakerRole, ThreadId,
};
