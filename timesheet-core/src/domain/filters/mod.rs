mod author_filter;
mod month_filter;

pub use author_filter::{filter_by_author, AuthorFilter};

pub trait EntryFilter<T> {
    fn keeps(&self, entry: &T) -> bool;

    /// Keeps matching entries in their original order.
    fn apply(&self, entries: Vec<T>) -> Vec<T> {
        entries.into_iter().filter(|entry| self.keeps(entry)).collect()
    }
}
