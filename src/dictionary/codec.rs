// Selection string format: dictionary keys joined by a single comma
//
// Keys are not escaped and segments are trimmed when splitting. A key containing
// the separator, or with surrounding whitespace, cannot be represented and is
// refused by the selection manager.

/// Separator between dictionary keys in a selection string
pub const SEPARATOR: char = ',';

/// Split a selection string into keys, dropping empty segments
pub fn split_selection(selection: &str) -> Vec<String> {
    selection
        .split(SEPARATOR)
        .map(str::trim)
        .filter(|key| !key.is_empty())
        .map(str::to_string)
        .collect()
}

/// Join keys into a selection string, preserving their order
pub fn join_selection<S: AsRef<str>>(keys: &[S]) -> String {
    let mut joined = String::new();
    for (i, key) in keys.iter().enumerate() {
        if i > 0 {
            joined.push(SEPARATOR);
        }
        joined.push_str(key.as_ref());
    }
    joined
}

/// Whether a key survives a join/split round trip unchanged
pub fn is_representable(key: &str) -> bool {
    !key.is_empty() && !key.contains(SEPARATOR) && key.trim() == key
}

#[cfg(test)]
#[path = "codec_test.rs"]
mod tests;
