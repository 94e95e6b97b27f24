//! Wake-phrase gate for the speech-capture boundary.
//!
//! Speech capture itself is an external collaborator; this is the contract
//! it relies on: a recognized utterance is only a command when it starts
//! with the configured wake phrase (case-insensitive).

/// Strip a leading wake phrase from `utterance` and return the remaining
/// command text. Returns `None` when the utterance is not addressed to the
/// assistant or nothing follows the wake phrase.
pub fn extract_command(utterance: &str, wake_word: &str) -> Option<String> {
    let utterance = utterance.trim();
    let wake_word = wake_word.trim();
    if wake_word.is_empty() {
        return None;
    }

    // `get` keeps us safe on non-ASCII utterances where the byte offset
    // would split a character.
    let head = utterance.get(..wake_word.len())?;
    if !head.eq_ignore_ascii_case(wake_word) {
        return None;
    }

    // The phrase must end on a word boundary: "hey calendar" is not an
    // address to a "hey cal" assistant.
    let rest = &utterance[wake_word.len()..];
    if rest.chars().next().is_some_and(|c| c.is_alphanumeric()) {
        return None;
    }

    let rest = rest.trim_start_matches([',', '.', '!', '?']).trim();
    if rest.is_empty() {
        None
    } else {
        Some(rest.to_string())
    }
}
