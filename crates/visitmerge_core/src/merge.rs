//! Visitor merging.
//!
//! Combines independently authored visitor maps into one map that a
//! traversal engine can drive. For every visit-key the merged map holds a
//! composite handler that fans out to each original handler bound to that
//! key:
//!
//! - entry keys run their handlers first-to-last, in input order
//! - exit keys run them last-to-first
//!
//! so that the first visitor to enter a node is the last one to leave it.

use std::borrow::Cow;
use std::collections::HashMap;
use std::rc::Rc;

use serde::Serialize;
use tracing::{debug, trace};

use crate::visitor_map::{Handler, VisitorMap};
use crate::{MergeConfig, MergeError};

/// How a single visit-key is merged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyPlan {
    /// The visit-key.
    pub key: String,
    /// Whether the key is an exit key.
    pub exit: bool,
    /// Indices of the input maps binding this key, in invocation order.
    pub sources: Vec<usize>,
}

/// Description of a merge: which inputs back each key, and in which order
/// their handlers run.
///
/// [`VisitorMerger::merge`] builds composites straight from the plan, so a
/// failure raised while dispatching a key can be traced back to the input
/// visitor that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MergePlan {
    /// Number of input maps.
    pub inputs: usize,
    /// Per-key plans, in first-seen key order.
    pub keys: Vec<KeyPlan>,
}

impl MergePlan {
    /// Returns the plan for `key`.
    pub fn get(&self, key: &str) -> Option<&KeyPlan> {
        self.keys.iter().find(|plan| plan.key == key)
    }

    /// Returns the number of keys bound by more than one input.
    pub fn overlapping(&self) -> usize {
        self.keys.iter().filter(|plan| plan.sources.len() > 1).count()
    }
}

/// Merges visitor maps according to a [`MergeConfig`].
#[derive(Debug, Clone, Default)]
pub struct VisitorMerger {
    config: MergeConfig,
}

impl VisitorMerger {
    /// Creates a merger with the given configuration.
    pub fn new(config: MergeConfig) -> Self {
        Self { config }
    }

    /// Creates a merger with the default configuration.
    pub fn with_defaults() -> Self {
        Self::new(MergeConfig::default())
    }

    /// Returns the configuration.
    pub fn config(&self) -> &MergeConfig {
        &self.config
    }

    /// Computes how `visitors` would be merged, without building handlers.
    pub fn plan<A: ?Sized, E>(
        &self,
        visitors: &[VisitorMap<'_, A, E>],
    ) -> Result<MergePlan, MergeError> {
        self.config.validate()?;
        if visitors.is_empty() {
            return Err(MergeError::EmptyInput);
        }

        let mut slots: HashMap<&str, usize> = HashMap::new();
        let mut keys: Vec<KeyPlan> = Vec::new();

        for (source, visitor) in visitors.iter().enumerate() {
            for key in visitor.keys() {
                let slot = *slots.entry(key).or_insert_with(|| {
                    keys.push(KeyPlan {
                        key: key.to_string(),
                        exit: self.config.is_exit_key(key),
                        sources: Vec::new(),
                    });
                    keys.len() - 1
                });
                keys[slot].sources.push(source);
            }
        }

        for plan in keys.iter_mut().filter(|plan| plan.exit) {
            plan.sources.reverse();
        }

        Ok(MergePlan {
            inputs: visitors.len(),
            keys,
        })
    }

    /// Merges `visitors` into a single visitor map.
    ///
    /// A single input is returned as-is (borrowed). Otherwise a new map is
    /// built holding one composite handler per key in the union of the
    /// inputs' keys. Inputs are never modified.
    ///
    /// # Errors
    ///
    /// Returns [`MergeError::Config`] if the configuration is invalid, and
    /// [`MergeError::EmptyInput`] if `visitors` is empty.
    pub fn merge<'v, 'h, A, E>(
        &self,
        visitors: &'v [VisitorMap<'h, A, E>],
    ) -> Result<Cow<'v, VisitorMap<'h, A, E>>, MergeError>
    where
        A: ?Sized + 'h,
        E: 'h,
    {
        self.config.validate()?;
        if let [visitor] = visitors {
            trace!("Single visitor with {} keys, returning it as-is", visitor.len());
            return Ok(Cow::Borrowed(visitor));
        }

        let plan = self.plan(visitors)?;
        debug!(
            "Merging {} visitors into {} keys ({} overlapping)",
            plan.inputs,
            plan.keys.len(),
            plan.overlapping()
        );

        let mut merged = VisitorMap::new();
        for KeyPlan { key, sources, .. } in plan.keys {
            let handlers: Vec<Handler<'h, A, E>> = sources
                .iter()
                .filter_map(|&source| visitors[source].get(&key).cloned())
                .collect();
            merged.insert(key, composite(handlers));
        }

        Ok(Cow::Owned(merged))
    }
}

/// Builds a handler that calls `handlers` in order with the same arguments,
/// stopping at the first failure.
fn composite<'h, A, E>(handlers: Vec<Handler<'h, A, E>>) -> Handler<'h, A, E>
where
    A: ?Sized + 'h,
    E: 'h,
{
    Rc::new(move |args: &A| -> Result<(), E> {
        for handler in &handlers {
            handler(args)?;
        }
        Ok(())
    })
}

/// Merges `visitors` using the default configuration.
///
/// # Errors
///
/// Returns [`MergeError::EmptyInput`] if `visitors` is empty.
///
/// # Example
///
/// ```rust
/// use std::cell::RefCell;
/// use visitmerge_core::{VisitorMap, merge_visitors};
///
/// let order = RefCell::new(Vec::new());
/// let visitor = |n: u32| {
///     let order = &order;
///     VisitorMap::<(), ()>::new()
///         .on("Identifier", move |_: &()| {
///             order.borrow_mut().push(n);
///             Ok(())
///         })
///         .on_exit("Identifier", move |_: &()| {
///             order.borrow_mut().push(n);
///             Ok(())
///         })
/// };
/// let visitors = [visitor(1), visitor(2)];
///
/// let merged = merge_visitors(&visitors).unwrap();
/// merged.dispatch("Identifier", &()).unwrap();
/// merged.dispatch("Identifier:exit", &()).unwrap();
///
/// assert_eq!(*order.borrow(), vec![1, 2, 2, 1]);
/// ```
pub fn merge_visitors<'v, 'h, A, E>(
    visitors: &'v [VisitorMap<'h, A, E>],
) -> Result<Cow<'v, VisitorMap<'h, A, E>>, MergeError>
where
    A: ?Sized + 'h,
    E: 'h,
{
    VisitorMerger::with_defaults().merge(visitors)
}
