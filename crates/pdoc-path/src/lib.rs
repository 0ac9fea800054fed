//! Path-addressed access to pdoc documents.
//!
//! Reads go through the [`navigator`]; pattern searches through
//! [`search`]. Writes come in two strengths: [`forced`] writes create and
//! coerce whatever containers the path needs, while [`simple`] writes
//! assume the parent already exists with the right shape.
//!
//! # Key Types
//!
//! - [`Selector`] -- One level of a multi-path search
//! - [`ForcedStep`] / [`Slot`] / [`ContainerKind`] -- Typed steps of a forced write
//! - [`Leaf`] -- The typed terminal value of a forced write

pub mod error;
pub mod forced;
pub mod navigator;
pub mod search;
pub mod simple;

pub use error::{PathError, PathResult};
pub use forced::{set_forced, ContainerKind, ForcedStep, Leaf, Slot};
pub use navigator::{get, get_mut, get_string, lookup, lookup_mut};
pub use search::{find_paths, Selector};
pub use simple::{remove, set, try_remove, try_set};
