//! # visitmerge_core
//!
//! Combines independently authored AST visitors into a single visitor.
//!
//! A visitor is a [`VisitorMap`]: node-type names (`"Identifier"`) and their
//! exit variants (`"Identifier:exit"`) bound to handlers. Lint rules written
//! as separate visitors can be run in a single traversal by merging them:
//!
//! - entry handlers run first-to-last, in the order the visitors were given
//! - exit handlers run last-to-first
//! - every handler receives the same argument reference
//! - the first failing handler stops the composite call and its error is
//!   returned unchanged
//!
//! The traversal itself is left to the caller.
//!
//! ## Example
//!
//! ```rust
//! use std::cell::RefCell;
//! use visitmerge_core::{VisitorMap, merge_visitors};
//!
//! struct Node {
//!     name: &'static str,
//! }
//!
//! let seen = RefCell::new(Vec::new());
//! let visitors: Vec<VisitorMap<'_, Node, String>> = vec![
//!     VisitorMap::new().on("Identifier", |node: &Node| {
//!         seen.borrow_mut().push(format!("no-shadow {}", node.name));
//!         Ok(())
//!     }),
//!     VisitorMap::new().on("Identifier", |node: &Node| {
//!         seen.borrow_mut().push(format!("camelcase {}", node.name));
//!         Ok(())
//!     }),
//! ];
//!
//! let visitor = merge_visitors(&visitors)?;
//! visitor.dispatch("Identifier", &Node { name: "fooBar" })?;
//!
//! assert_eq!(*seen.borrow(), ["no-shadow fooBar", "camelcase fooBar"]);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod config;
mod error;
pub mod key;
mod merge;
mod visitor_map;

pub use config::MergeConfig;
pub use error::MergeError;
pub use merge::{KeyPlan, MergePlan, VisitorMerger, merge_visitors};
pub use visitor_map::{Handler, VisitorMap};
