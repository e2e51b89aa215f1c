/// Walks `items` in order and returns the first value `probe` produces,
/// together with the position it was found at. Stops at the first hit.
pub fn first_match<I, T, R, F>(items: I, mut probe: F) -> Option<(usize, R)>
where
    I: IntoIterator<Item = T>,
    F: FnMut(T) -> Option<R>,
{
    items
        .into_iter()
        .enumerate()
        .find_map(|(index, item)| probe(item).map(|hit| (index, hit)))
}
