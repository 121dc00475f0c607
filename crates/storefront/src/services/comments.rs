//! Per-product comment lists.

use thiserror::Error;

use cornershop_core::ProductId;

use crate::store::{CommentStore, KeyValueStore, StoreError};

/// Errors that can occur when editing comments.
#[derive(Debug, Error)]
pub enum CommentError {
    /// Blank comment text.
    #[error("comment cannot be empty")]
    Empty,

    /// No comment at this position.
    #[error("no comment at index {index} (product has {len})")]
    NotFound { index: usize, len: usize },

    /// Local store error.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// Comment operations. Both mutations return the full list afterwards.
pub struct CommentService<'a> {
    comments: CommentStore<'a>,
}

impl<'a> CommentService<'a> {
    #[must_use]
    pub const fn new(kv: &'a dyn KeyValueStore) -> Self {
        Self {
            comments: CommentStore::new(kv),
        }
    }

    /// Comments for a product, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `CommentError::Store` if the stored list is corrupt.
    pub fn list(&self, product_id: ProductId) -> Result<Vec<String>, CommentError> {
        Ok(self.comments.list(product_id)?)
    }

    /// Append trimmed `text`.
    ///
    /// # Errors
    ///
    /// Returns `CommentError::Empty` for blank text; nothing is stored.
    pub fn add(&self, product_id: ProductId, text: &str) -> Result<Vec<String>, CommentError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(CommentError::Empty);
        }

        self.comments.update(product_id, |comments| {
            comments.push(text.to_string());
            Ok(comments.clone())
        })
    }

    /// Delete the comment at `index`; later comments shift down by one.
    ///
    /// # Errors
    ///
    /// Returns `CommentError::NotFound` for an out-of-range index; nothing
    /// is stored.
    pub fn remove(&self, product_id: ProductId, index: usize) -> Result<Vec<String>, CommentError> {
        self.comments.update(product_id, |comments| {
            if index >= comments.len() {
                return Err(CommentError::NotFound {
                    index,
                    len: comments.len(),
                });
            }
            comments.remove(index);
            Ok(comments.clone())
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, keys};

    const P: ProductId = ProductId::new(7);

    #[test]
    fn test_add_trims_and_appends() {
        let kv = MemoryStore::new();
        let comments = CommentService::new(&kv);

        comments.add(P, "first").unwrap();
        let list = comments.add(P, "  second  ").unwrap();

        assert_eq!(list, ["first", "second"]);
        assert_eq!(
            kv.get(&keys::comments(P)).unwrap().unwrap(),
            r#"["first","second"]"#
        );
    }

    #[test]
    fn test_empty_comment_is_rejected() {
        let kv = MemoryStore::new();
        let comments = CommentService::new(&kv);

        assert!(matches!(comments.add(P, "   "), Err(CommentError::Empty)));
        assert!(kv.get(&keys::comments(P)).unwrap().is_none());
    }

    #[test]
    fn test_remove_shifts_later_comments() {
        let kv = MemoryStore::new();
        let comments = CommentService::new(&kv);
        for text in ["a", "b", "c"] {
            comments.add(P, text).unwrap();
        }

        let list = comments.remove(P, 1).unwrap();
        assert_eq!(list, ["a", "c"]);
        assert_eq!(comments.list(P).unwrap(), ["a", "c"]);
    }

    #[test]
    fn test_remove_out_of_range() {
        let kv = MemoryStore::new();
        let comments = CommentService::new(&kv);
        comments.add(P, "only").unwrap();

        let err = comments.remove(P, 3).unwrap_err();
        assert!(matches!(err, CommentError::NotFound { index: 3, len: 1 }));
        assert_eq!(comments.list(P).unwrap(), ["only"]);
    }

    #[test]
    fn test_concurrent_adds_are_all_kept() {
        let kv = MemoryStore::new();

        std::thread::scope(|scope| {
            for n in 0..8 {
                let kv = &kv;
                scope.spawn(move || {
                    CommentService::new(kv).add(P, &format!("comment {n}")).unwrap();
                });
            }
        });

        let mut list = CommentService::new(&kv).list(P).unwrap();
        list.sort();
        let expected: Vec<_> = (0..8).map(|n| format!("comment {n}")).collect();
        assert_eq!(list, expected);
    }

    #[test]
    fn test_comments_are_per_product() {
        let kv = MemoryStore::new();
        let comments = CommentService::new(&kv);
        comments.add(P, "seven").unwrap();

        assert!(comments.list(ProductId::new(8)).unwrap().is_empty());
    }
}
