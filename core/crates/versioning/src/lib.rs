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

//! Semantic version parsing and reusable version-range comparators.
//!
//! A [`Comparator`] is parsed once from a constraint expression and then
//! evaluated many times against parsed [`Version`]s, so batch filtering
//! never re-parses the expression.

mod expression;
mod version;

pub use expression::{Comparator, Constraint, ExpressionError, Op};
pub use version::{Identifier, Version, VersionError};
