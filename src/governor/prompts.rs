use std::fmt::Write;

use crate::{
    governor::types::{AttemptRecord, MemoryFragment},
    posture::PostureTriad,
};

/// Assemble the generation prompt for one attempt: user input, the
/// most relevant memories (supplied order, simple truncation), the
/// target balance, and a digest of the immediately preceding failure
/// when one exists.
pub fn build_generation_prompt(
    user_message: &str,
    memories: &[MemoryFragment],
    memory_limit: usize,
    target: &PostureTriad,
    last_failure: Option<&AttemptRecord>,
) -> String {
    let memory_context = render_memory_context(memories, memory_limit);
    let failure_context = last_failure.map(render_failure_digest).unwrap_or_default();

    format!(
        concat!(
            "You are responding to a user with relational awareness.\n\n",
            "User message: {user_message}\n\n",
            "Relevant memories from our relationship:\n",
            "{memory_context}\n\n",
            "Target relational balance for this response:\n",
            "- Care: {care:.2} (warmth and harm-awareness)\n",
            "- Autonomy: {autonomy:.2} (user freedom and choice)\n",
            "- Accuracy: {accuracy:.2} (truthfulness and honesty)\n",
            "{failure_context}\n",
            "Generate a response that naturally embodies this balance. ",
            "Be authentic, not formulaic."
        ),
        user_message = user_message,
        memory_context = memory_context,
        care = target.care,
        autonomy = target.autonomy,
        accuracy = target.accuracy,
        failure_context = failure_context,
    )
}

fn render_memory_context(memories: &[MemoryFragment], limit: usize) -> String {
    let mut rendered = String::new();
    for fragment in memories.iter().take(limit) {
        let _ = writeln!(rendered, "- {}", fragment.content);
    }
    rendered.truncate(rendered.trim_end().len());
    rendered
}

fn render_failure_digest(record: &AttemptRecord) -> String {
    let triad = record.posture.triad();
    format!(
        concat!(
            "\nPrevious attempt failed: {reason}\n",
            "Previous response scored: care={care:.2}, autonomy={autonomy:.2}, ",
            "accuracy={accuracy:.2}\n\n",
            "Learn from this and adjust your approach.\n"
        ),
        reason = record.failure_reason,
        care = triad.care,
        autonomy = triad.autonomy,
        accuracy = triad.accuracy,
    )
}
