///
/// Finds the item whose half-open cumulative interval contains `sample`.
///
/// Items are visited in order, and the first index where `sample < cumulative`
/// wins. Zero-weight items have an empty interval and can never be picked.
/// Returns `None` if `sample` lies past the end of the last interval.
///
pub fn pick_index(weights: impl IntoIterator<Item = u32>, sample: u64) -> Option<usize> {
    let mut current_weight: u64 = 0;
    for (index, weight) in weights.into_iter().enumerate() {
        current_weight += u64::from(weight);
        if current_weight > sample {
            return Some(index);
        }
    }
    None
}
