//! JSON substring extraction from free-form model output.

/// Locate the JSON-shaped substring of a model response.
///
/// Returns the span from the first `{` to the last `}` (inclusive) when
/// both exist and the first precedes the last. This is a heuristic, not a
/// balanced-brace parser: it tolerates prose and markdown fences around
/// the object, but the returned slice is not guaranteed to be valid JSON —
/// downstream parsing can still fail.
pub fn extract_json(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&text[start..=end])
}
