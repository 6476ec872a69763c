//! Visitor maps: visit-keys bound to handlers.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fmt;
use std::rc::Rc;

use crate::key::exit_key;

/// A handler invoked by the traversal engine for a visit-key.
///
/// `A` is the engine-defined argument pack (a node, or a tuple of node and
/// context) and `E` the engine-defined failure type. Handlers are reference
/// counted so that merged maps can share them with their inputs.
pub type Handler<'h, A, E> = Rc<dyn Fn(&A) -> Result<(), E> + 'h>;

/// A mapping from visit-key to [`Handler`].
///
/// Keys are opaque strings and iterate in insertion order. Cloning a map
/// clones the handler references, never the handlers themselves.
///
/// # Example
///
/// ```rust
/// use std::cell::Cell;
/// use visitmerge_core::VisitorMap;
///
/// let entered = Cell::new(0);
/// let visitor: VisitorMap<'_, str, ()> = VisitorMap::new()
///     .on("Identifier", |_name: &str| {
///         entered.set(entered.get() + 1);
///         Ok(())
///     })
///     .on_exit("Identifier", |_name: &str| Ok(()));
///
/// assert_eq!(visitor.keys().collect::<Vec<_>>(), ["Identifier", "Identifier:exit"]);
/// visitor.dispatch("Identifier", "foo").unwrap();
/// visitor.dispatch("Literal", "42").unwrap();
/// assert_eq!(entered.get(), 1);
/// ```
pub struct VisitorMap<'h, A: ?Sized, E> {
    /// Keys in insertion order.
    order: Vec<String>,
    handlers: HashMap<String, Handler<'h, A, E>>,
}

impl<'h, A: ?Sized, E> VisitorMap<'h, A, E> {
    /// Creates an empty visitor map.
    pub fn new() -> Self {
        Self {
            order: Vec::new(),
            handlers: HashMap::new(),
        }
    }

    /// Binds `handler` to `key`, replacing any previous binding.
    pub fn on<F>(mut self, key: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&A) -> Result<(), E> + 'h,
    {
        self.insert(key, Rc::new(handler));
        self
    }

    /// Binds `handler` to the exit key of `node_type`.
    pub fn on_exit<F>(self, node_type: &str, handler: F) -> Self
    where
        F: Fn(&A) -> Result<(), E> + 'h,
    {
        self.on(exit_key(node_type), handler)
    }

    /// Inserts a handler, returning the one previously bound to `key`.
    ///
    /// Replacing a binding keeps the key's original position.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        handler: Handler<'h, A, E>,
    ) -> Option<Handler<'h, A, E>> {
        match self.handlers.entry(key.into()) {
            Entry::Occupied(mut entry) => Some(entry.insert(handler)),
            Entry::Vacant(entry) => {
                self.order.push(entry.key().clone());
                entry.insert(handler);
                None
            }
        }
    }

    /// Removes the binding for `key`.
    pub fn remove(&mut self, key: &str) -> Option<Handler<'h, A, E>> {
        let handler = self.handlers.remove(key)?;
        self.order.retain(|k| k != key);
        Some(handler)
    }

    /// Returns the handler bound to `key`.
    pub fn get(&self, key: &str) -> Option<&Handler<'h, A, E>> {
        self.handlers.get(key)
    }

    /// Returns true if a handler is bound to `key`.
    pub fn contains_key(&self, key: &str) -> bool {
        self.handlers.contains_key(key)
    }

    /// Iterates over keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Iterates over `(key, handler)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Handler<'h, A, E>)> {
        self.order
            .iter()
            .filter_map(|key| self.handlers.get(key).map(|h| (key.as_str(), h)))
    }

    /// Returns the number of bound keys.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns true if no key is bound.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Invokes the handler bound to `key` with `args`.
    ///
    /// An unbound key is a successful no-op.
    pub fn dispatch(&self, key: &str, args: &A) -> Result<(), E> {
        match self.handlers.get(key) {
            Some(handler) => handler(args),
            None => Ok(()),
        }
    }
}

impl<A: ?Sized, E> Default for VisitorMap<'_, A, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: ?Sized, E> Clone for VisitorMap<'_, A, E> {
    fn clone(&self) -> Self {
        Self {
            order: self.order.clone(),
            handlers: self.handlers.clone(),
        }
    }
}

/// Two maps are equal when they bind the same keys to the same handler
/// instances. Key order is not compared.
impl<A: ?Sized, E> PartialEq for VisitorMap<'_, A, E> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self.handlers.iter().all(|(key, handler)| {
                other
                    .handlers
                    .get(key)
                    .is_some_and(|theirs| Rc::ptr_eq(handler, theirs))
            })
    }
}

impl<A: ?Sized, E> fmt::Debug for VisitorMap<'_, A, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VisitorMap")
            .field("keys", &self.order)
            .finish()
    }
}

impl<'h, A: ?Sized, E, K: Into<String>> FromIterator<(K, Handler<'h, A, E>)>
    for VisitorMap<'h, A, E>
{
    fn from_iter<I: IntoIterator<Item = (K, Handler<'h, A, E>)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (key, handler) in iter {
            map.insert(key, handler);
        }
        map
    }
}
