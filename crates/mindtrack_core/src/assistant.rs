//! crates/mindtrack_core/src/assistant.rs
//!
//! A small keyword-matching FAQ responder for general wellness questions.

const FAQ: &[(&str, &str)] = &[
    (
        "what is mindtrack",
        "Mindtrack is a wellness support system that analyzes emotional states and provides wellness recommendations.",
    ),
    (
        "how to reduce stress",
        "You can try deep breathing, box breathing, light yoga, and calming music.",
    ),
    (
        "what is box breathing",
        "Box breathing is a technique where you inhale, hold, exhale, and hold again for 4 seconds each.",
    ),
    (
        "is this medical",
        "No. Mindtrack is a wellness support system, not a medical diagnostic tool.",
    ),
];

pub const FALLBACK_REPLY: &str =
    "I can help with breathing, yoga, stress reduction, and app usage.";

/// Answers with the first FAQ entry whose key phrase appears in the (lowercased) message.
pub fn reply_to(message: &str) -> &'static str {
    let message = message.to_lowercase();
    FAQ.iter()
        .find(|(phrase, _)| message.contains(phrase))
        .map(|(_, answer)| *answer)
        .unwrap_or(FALLBACK_REPLY)
}
