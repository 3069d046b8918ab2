#![warn(
	clippy::all,
	clippy::pedantic,
	clippy::correctness,
	clippy::perf,
	clippy::style,
	clippy::suspicious,
	clippy::complexity,
	clippy::nursery,
	clippy::unwrap_used,
	unused_qualifications,
	rust_2018_idioms,
	trivial_casts,
	trivial_numeric_casts,
	unused_allocation,
	clippy::unnecessary_cast,
	clippy::cast_lossless,
	clippy::dbg_macro,
	deprecated
)]
#![forbid(deprecated_in_future)]
#![allow(clippy::missing_errors_doc)]

//! Composable predicates over asset descriptors.
//!
//! An [`AssetGroup`] is an AND-composition of [`AssetFilter`]s, each of
//! which matches a `(path, type, is_folder)` descriptor by type reference
//! or by path glob, with negation and match-any-of list semantics.
//!
//! Filters follow a two-phase lifecycle: authoring mutates their values
//! freely, then [`AssetFilter::setup`] validates and precompiles them once
//! per batch so the per-asset match path stays allocation-free.

mod filter;
mod group;
mod types;

pub use filter::{AssetFilter, AssetGroupError, FilterKind};
pub use group::AssetGroup;
pub use types::{TypeMatcher, TypeRef, TypeRegistry};
