use crate::{
    governor::types::{GovernorStatus, LoopOutcome},
    posture::PostureScore,
};

pub const LIMITATION_CANDIDATE_ID: &str = "limitation";

pub const LIMITATION_MESSAGE: &str = "I need to be transparent with you: I'm having difficulty \
generating a response that maintains the relational balance this conversation needs.\n\n\
This isn't evasion - it's me acknowledging a computational limit. Could you help me understand \
what you need most right now? That would help me respond more appropriately.";

/// Posture of the transparency response. Accuracy sits above the
/// reference: the reply is candid about the limit.
pub fn limitation_posture() -> PostureScore {
    PostureScore::new(1.0, 1.0, 1.2, "honest limitation protocol engaged")
}

/// Deterministic outcome for an exhausted attempt budget. Exempt from
/// policy evaluation and never persisted as a learned exchange.
pub fn honest_limitation(attempts_used: usize) -> LoopOutcome {
    LoopOutcome {
        status: GovernorStatus::LimitationProtocol,
        text: LIMITATION_MESSAGE.to_string(),
        posture: limitation_posture(),
        candidate_id: LIMITATION_CANDIDATE_ID.to_string(),
        attempts_used,
    }
}
