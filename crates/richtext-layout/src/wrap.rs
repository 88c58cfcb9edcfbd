//! Splitting segments into words and words into lines

/// Split on the space character, keeping each space on the word before it
///
/// The final piece is kept only when non-empty, so `"a b "` gives
/// `["a ", "b "]` and a run of spaces yields one token per extra space.
pub fn tokenize(text: &str) -> Vec<&str> {
    text.split_inclusive(' ').collect()
}

/// Greedy first-fit packing into lines no wider than `box_width`
///
/// An item goes on the current line if it fits, otherwise it starts a new
/// line. An item wider than the box sits alone on its own line. Lines are
/// never empty and items are never dropped or reordered.
pub fn pack_greedy<T>(
    items: impl IntoIterator<Item = T>,
    box_width: f64,
    width_of: impl Fn(&T) -> f64,
) -> Vec<Vec<T>> {
    let mut lines = Vec::new();
    let mut current: Vec<T> = Vec::new();
    let mut current_width = 0.0;

    for item in items {
        let width = width_of(&item);
        if current_width + width > box_width && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
            current_width = 0.0;
        }
        current_width += width;
        current.push(item);
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}
