use crate::libs::random::RandomSource;

/// Probability that a reply is suppressed outright, keeping the simulated
/// counterpart from answering every single message.
pub const REPLY_SUPPRESS_PROBABILITY: f64 = 0.7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseCategory {
    Greeting,
    Question,
    Positive,
    Work,
    Default,
}

const GREETING_POOL: &[&str] = &[
    "Hey there! 👋",
    "Hello! How's it going?",
    "Hi! Good to see you online!",
    "Hey! What's up?",
];

const QUESTION_POOL: &[&str] = &[
    "That's an interesting question! 🤔",
    "Great point! I was wondering about that too.",
    "Hmm, let me think about that...",
    "Good question! Anyone else have thoughts on this?",
];

const POSITIVE_POOL: &[&str] = &[
    "Awesome! 🎉",
    "That sounds great!",
    "Nice work! 👏",
    "Love it! ❤️",
];

const WORK_POOL: &[&str] = &[
    "Work stuff can be tricky sometimes!",
    "I feel you on that work situation.",
    "Hope your project goes smoothly! 🤞",
    "Work-life balance is so important.",
];

const DEFAULT_POOL: &[&str] = &[
    "Interesting! 🙂",
    "I see what you mean.",
    "Thanks for sharing that!",
    "Good to know!",
];

/// Case-insensitive keyword classification, first match wins: greetings,
/// then questions, then positive words, then work words.
pub fn classify(text: &str) -> ResponseCategory {
    let lower = text.to_lowercase();
    if ["hello", "hi", "hey"].iter().any(|kw| lower.contains(kw)) {
        ResponseCategory::Greeting
    } else if lower.contains('?') {
        ResponseCategory::Question
    } else if ["great", "awesome", "good"].iter().any(|kw| lower.contains(kw)) {
        ResponseCategory::Positive
    } else if ["work", "project", "job"].iter().any(|kw| lower.contains(kw)) {
        ResponseCategory::Work
    } else {
        ResponseCategory::Default
    }
}

pub fn response_pool(category: ResponseCategory) -> &'static [&'static str] {
    match category {
        ResponseCategory::Greeting => GREETING_POOL,
        ResponseCategory::Question => QUESTION_POOL,
        ResponseCategory::Positive => POSITIVE_POOL,
        ResponseCategory::Work => WORK_POOL,
        ResponseCategory::Default => DEFAULT_POOL,
    }
}

/// A canned reply for the message, or `None` when the suppression gate
/// swallows it. Pure apart from the injected randomness.
pub fn generate_auto_response(text: &str, rng: &mut dyn RandomSource) -> Option<String> {
    if rng.chance(REPLY_SUPPRESS_PROBABILITY) {
        return None;
    }
    let pool = response_pool(classify(text));
    Some(pool[rng.pick(pool.len())].to_string())
}
