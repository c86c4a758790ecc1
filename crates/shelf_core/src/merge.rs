use std::collections::HashSet;

use crate::Book;

/// Anything the feed can de-duplicate by a stable identifier.
pub trait HasId {
    fn id(&self) -> &str;
}

impl HasId for Book {
    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeMode {
    /// Keep existing items, add unseen incoming ones after them.
    Append,
    /// Discard existing items; incoming becomes the collection.
    Replace,
}

/// Combine a freshly fetched page with the items already shown.
///
/// The result never holds two items with the same id. The first occurrence
/// wins: a later duplicate never moves or overwrites an earlier entry. Pages
/// may overlap when books are created between fetches (offsets shift), so
/// `Append` must tolerate ids it has already seen.
pub fn merge<T: HasId>(existing: Vec<T>, incoming: Vec<T>, mode: MergeMode) -> Vec<T> {
    let mut result = match mode {
        MergeMode::Append => existing,
        MergeMode::Replace => Vec::with_capacity(incoming.len()),
    };
    let mut seen: HashSet<String> = result.iter().map(|item| item.id().to_owned()).collect();
    result.reserve(incoming.len());
    for item in incoming {
        if seen.insert(item.id().to_owned()) {
            result.push(item);
        }
    }
    result
}
