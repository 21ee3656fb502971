use crate::report;
use crate::Inbox;
use std::sync::Arc;
use thiserror::Error;

/// Error returned by node construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NodeError {
    /// A node bundles at least one inbox.
    #[error("node requires at least one inbox")]
    NoInboxes,
    /// The same inbox was passed more than once.
    #[error("node contains the same inbox more than once (name: {name})")]
    DuplicateInbox {
        /// Name of the repeated inbox.
        name: String,
    },
}

impl NodeError {
    /// Short uppercase tag for the `debug-log` diagnostic sink.
    pub fn tag(&self) -> &'static str {
        match self {
            NodeError::NoInboxes => "NODE_INCORRECT_DEFINITION",
            NodeError::DuplicateInbox { .. } => "NODE_MULTIPLE_EQUAL_INBOXES",
        }
    }
}

/// A named, immutable bundle of inboxes with name-keyed lookup and a
/// broadcast helper.
///
/// The node shares ownership of its inboxes through `Arc`: dropping the
/// node releases only the node's references, and cascades into the
/// inboxes exactly when the node held the last ones.
pub struct Node<T> {
    name: Box<str>,
    inboxes: Box<[Arc<Inbox<T>>]>,
}

impl<T> Node<T> {
    /// Builds a node from an ordered list of inbox references.
    ///
    /// Fails when the list is empty or the same inbox (by identity, not
    /// by name) appears more than once.
    ///
    /// # Example
    /// ```
    /// use mailring::{Inbox, Node};
    /// use std::sync::Arc;
    ///
    /// let orders = Arc::new(Inbox::<u64>::new("orders", 64).unwrap());
    /// let fills = Arc::new(Inbox::<u64>::new("fills", 64).unwrap());
    /// let node = Node::new("gateway", vec![orders, fills]).unwrap();
    /// assert!(node.select("fills").is_some());
    /// ```
    pub fn new(name: &str, inboxes: Vec<Arc<Inbox<T>>>) -> Result<Self, NodeError> {
        if inboxes.is_empty() {
            report::constructor_failure("NODE_INCORRECT_DEFINITION");
            return Err(NodeError::NoInboxes);
        }
        for (k, inbox) in inboxes.iter().enumerate() {
            if inboxes[..k].iter().any(|other| Arc::ptr_eq(other, inbox)) {
                report::constructor_failure("NODE_MULTIPLE_EQUAL_INBOXES");
                return Err(NodeError::DuplicateInbox {
                    name: inbox.name().to_owned(),
                });
            }
        }

        Ok(Self {
            name: name.into(),
            inboxes: inboxes.into_boxed_slice(),
        })
    }

    /// The node name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name equality.
    #[inline]
    pub fn name_is(&self, cmp: &str) -> bool {
        &*self.name == cmp
    }

    /// Number of bundled inboxes.
    #[inline]
    pub fn len(&self) -> usize {
        self.inboxes.len()
    }

    /// Always false: construction requires at least one inbox.
    #[inline]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Finds an inbox by name (linear scan, list order).
    pub fn select(&self, name: &str) -> Option<&Arc<Inbox<T>>> {
        self.inboxes.iter().find(|inbox| inbox.name_is(name))
    }

    /// The bundled inboxes, in construction order.
    #[inline]
    pub fn inboxes(&self) -> &[Arc<Inbox<T>>] {
        &self.inboxes
    }
}

impl<T: Copy> Node<T> {
    /// Writes `msg` to every inbox in list order using the spinning
    /// write; returns once every inbox has received the message.
    ///
    /// Earlier inboxes in the list receive the message before later ones,
    /// and a full inbox stalls the broadcast until its consumers make
    /// progress.
    pub fn broadcast(&self, msg: T) {
        for inbox in &*self.inboxes {
            inbox.write_spin(msg);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inbox(name: &str) -> Arc<Inbox<u64>> {
        Arc::new(Inbox::new(name, 8).unwrap())
    }

    #[test]
    fn builds_and_selects() {
        let node = Node::new("node", vec![inbox("a"), inbox("b"), inbox("c")]).unwrap();

        assert_eq!(node.len(), 3);
        assert!(node.name_is("node"));
        assert!(node.select("b").is_some());
        assert!(node.select("missing").is_none());
    }

    #[test]
    fn rejects_zero_inboxes() {
        let err = Node::<u64>::new("node", vec![]).err().unwrap();
        assert_eq!(err, NodeError::NoInboxes);
        assert_eq!(err.tag(), "NODE_INCORRECT_DEFINITION");
    }

    #[test]
    fn rejects_duplicate_inboxes() {
        let shared = inbox("dup");
        let err = Node::new("node", vec![inbox("a"), shared.clone(), shared])
            .err()
            .unwrap();

        assert_eq!(
            err,
            NodeError::DuplicateInbox {
                name: "dup".to_owned()
            }
        );
        assert_eq!(err.tag(), "NODE_MULTIPLE_EQUAL_INBOXES");
    }

    #[test]
    fn equal_names_are_not_duplicates() {
        // Identity matters, not the label: two distinct inboxes may share
        // a name (only the first is then selectable).
        let node = Node::new("node", vec![inbox("same"), inbox("same")]).unwrap();
        assert_eq!(node.len(), 2);
    }

    #[test]
    fn broadcast_reaches_every_inbox() {
        let node = Node::new("node", vec![inbox("a"), inbox("b")]).unwrap();

        node.broadcast(5);
        node.broadcast(6);

        for ibx in node.inboxes() {
            assert_eq!(ibx.try_read(), Some(5));
            assert_eq!(ibx.try_read(), Some(6));
        }
    }

    #[test]
    fn cascade_on_drop() {
        let keep = inbox("kept");
        let node = Node::new("node", vec![keep.clone(), inbox("dropped")]).unwrap();

        drop(node);
        // The externally held inbox survives the node.
        assert!(keep.try_write(1));
    }
}
