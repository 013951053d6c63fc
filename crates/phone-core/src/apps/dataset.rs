use crate::entities::CallLogEntry;
use crate::entities::Contact;
use crate::entities::Conversation;
use crate::entities::Email;
use crate::entities::Message;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchCommit {
    Applied,
    Stale,
}

/// Backing data for one view, fetched at most once per app session.
#[derive(Debug, Clone, PartialEq)]
pub enum Dataset<T> {
    NotFetched,
    Loading {
        request_id: u64,
    },
    Ready {
        items: T,
        degraded: bool,
    },
}

impl<T> Default for Dataset<T> {
    fn default() -> Self {
        Self::NotFetched
    }
}

impl<T> Dataset<T> {
    pub fn needs_fetch(&self) -> bool {
        matches!(self, Self::NotFetched)
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading { .. })
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::Ready { degraded: true, .. })
    }

    pub fn start(&mut self, request_id: u64) {
        *self = Self::Loading { request_id };
    }

    /// Drops an in-flight request so its response is discarded on arrival.
    pub fn abandon(&mut self) {
        if self.is_loading() {
            *self = Self::NotFetched;
        }
    }

    pub fn accept(&mut self, request_id: u64, items: T, degraded: bool) -> FetchCommit {
        let waiting = matches!(self, Self::Loading { request_id: pending } if *pending == request_id);
        if !waiting {
            return FetchCommit::Stale;
        }
        *self = Self::Ready { items, degraded };
        FetchCommit::Applied
    }

    pub fn items(&self) -> Option<&T> {
        match self {
            Self::Ready { items, .. } => Some(items),
            _ => None,
        }
    }

    pub fn items_mut(&mut self) -> Option<&mut T> {
        match self {
            Self::Ready { items, .. } => Some(items),
            _ => None,
        }
    }
}

/// Entities that carry a list-unique id.
pub trait Keyed {
    fn id(&self) -> u64;
    fn set_id(&mut self, id: u64);
}

macro_rules! keyed {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Keyed for $ty {
                fn id(&self) -> u64 {
                    self.id
                }

                fn set_id(&mut self, id: u64) {
                    self.id = id;
                }
            }
        )*
    };
}

keyed!(Conversation, Message, Email, Contact, CallLogEntry);

/// A fetched list plus optimistic local appends made before the fetch landed.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalList<T> {
    pub fetched: Dataset<Vec<T>>,
    staged: Vec<T>,
}

impl<T> Default for LocalList<T> {
    fn default() -> Self {
        Self {
            fetched: Dataset::NotFetched,
            staged: Vec::new(),
        }
    }
}

impl<T: Keyed> LocalList<T> {
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.fetched
            .items()
            .into_iter()
            .flatten()
            .chain(self.staged.iter())
    }

    pub fn len(&self) -> usize {
        self.fetched.items().map_or(0, Vec::len) + self.staged.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, id: u64) -> Option<&T> {
        self.iter().find(|item| item.id() == id)
    }

    pub fn get_mut(&mut self, id: u64) -> Option<&mut T> {
        self.fetched
            .items_mut()
            .into_iter()
            .flatten()
            .chain(self.staged.iter_mut())
            .find(|item| item.id() == id)
    }

    pub fn next_id(&self) -> u64 {
        self.iter()
            .map(Keyed::id)
            .max()
            .map_or(1, |max| max.saturating_add(1))
    }

    /// Appends with a fresh id and returns it.
    pub fn push_local(&mut self, mut item: T) -> u64 {
        let id = self.next_id();
        item.set_id(id);
        match self.fetched.items_mut() {
            Some(items) => items.push(item),
            None => self.staged.push(item),
        }
        id
    }

    /// Commits a fetch; staged appends move behind the fetched items with
    /// ids re-allocated past the fetched maximum.
    pub fn accept(&mut self, request_id: u64, items: Vec<T>, degraded: bool) -> FetchCommit {
        self.accept_remapped(request_id, items, degraded).0
    }

    /// Like [`LocalList::accept`], also reporting each staged `(old, new)` id.
    pub fn accept_remapped(
        &mut self,
        request_id: u64,
        items: Vec<T>,
        degraded: bool,
    ) -> (FetchCommit, Vec<(u64, u64)>) {
        let commit = self.fetched.accept(request_id, items, degraded);
        let mut remapped = Vec::new();
        if commit == FetchCommit::Applied {
            for item in std::mem::take(&mut self.staged) {
                let old = item.id();
                let new = self.push_local(item);
                remapped.push((old, new));
            }
        }
        (commit, remapped)
    }

    pub fn clear(&mut self) {
        self.fetched = Dataset::NotFetched;
        self.staged.clear();
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::fallback;

    #[test]
    fn accept_only_matches_pending_request() {
        let mut dataset: Dataset<Vec<u8>> = Dataset::NotFetched;
        assert_eq!(dataset.accept(1, vec![1], false), FetchCommit::Stale);

        dataset.start(2);
        assert_eq!(dataset.accept(1, vec![1], false), FetchCommit::Stale);
        assert_eq!(dataset.accept(2, vec![2], true), FetchCommit::Applied);
        assert!(dataset.is_degraded());
        assert_eq!(dataset.accept(2, vec![3], false), FetchCommit::Stale);
        assert_eq!(dataset.items(), Some(&vec![2]));
    }

    #[test]
    fn abandon_resets_loading_only() {
        let mut dataset: Dataset<Vec<u8>> = Dataset::NotFetched;
        dataset.start(4);
        dataset.abandon();
        assert!(dataset.needs_fetch());

        dataset.start(5);
        dataset.accept(5, vec![9], false);
        dataset.abandon();
        assert_eq!(dataset.items(), Some(&vec![9]));
    }

    #[test]
    fn staged_items_follow_fetched_items_with_fresh_ids() {
        let mut list: LocalList<Message> = LocalList::default();
        list.fetched.start(1);
        let mut own = fallback::thread("x").remove(1);
        own.content = "queued".to_string();
        assert_eq!(list.push_local(own), 1);

        assert_eq!(list.accept(1, fallback::thread("x"), false), FetchCommit::Applied);
        let ids: Vec<u64> = list.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
        assert_eq!(list.get(4).map(|m| m.content.as_str()), Some("queued"));
    }
}
