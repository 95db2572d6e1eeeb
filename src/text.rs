//! Text normalization shared by every stage of the pipeline
//!
//! Excerpts, display names, and discovery snippets all pass through the same
//! normalizer before they are compared against length thresholds or serialized
//! into a response.

/// Maximum length of any normalized string, in characters.
pub const MAX_NORMALIZED_LEN: usize = 300;

/// Normalizes a text fragment for use in a review card
///
/// Collapses every whitespace run (spaces, tabs, newlines) into a single
/// space, trims leading/trailing whitespace, and truncates the result to
/// [`MAX_NORMALIZED_LEN`] characters. Truncation counts `char`s, not bytes,
/// so multi-byte text is never split mid-character.
///
/// Total and idempotent: `normalize(normalize(x)) == normalize(x)` for all
/// inputs, and no input can make it fail.
///
/// # Examples
///
/// ```
/// use review_scout::text::normalize;
///
/// assert_eq!(normalize("  hello\n\t world  "), "hello world");
/// assert_eq!(normalize(""), "");
/// ```
pub fn normalize(text: &str) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.chars().take(MAX_NORMALIZED_LEN).collect()
}
