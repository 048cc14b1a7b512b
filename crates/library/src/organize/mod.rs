//! Filing catalog entries into a target tree.
//!
//! Every [`Placement`](crate::Placement) is rendered to a target path by the
//! [`PathGenerator`](crate::PathGenerator) template and copied or moved there
//! through a [storage backend](gutcat_storage). A target that already holds a
//! file of the same size is left alone.
//!
//! The primary entry point is [`organize`], which streams the resulting
//! [`Action`]s from passing each placement to the same logic as
//! [`organize_file`].

pub mod error;
mod file;
mod stream;

pub use self::file::{Action, organize_file};
pub use self::stream::{OrganizeEvent, organize};
