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

//! Rule-evaluation core of the asset-placement tool.
//!
//! Classifies named, typed resources into destination groups, computes an
//! address and a label set for each, and optionally filters resources
//! through a semantic-version constraint. The surrounding editor UI, undo
//! history, persistence, and the backend resource store live behind the
//! [`adapter`] boundary.

pub mod adapter;
pub mod layout;
pub mod provider;
pub mod rules;
pub mod service;
pub mod testing;

pub use adapter::{DestinationStore, EntryHandle, ResourceQuery, StoreError};
pub use layout::{LayoutRule, LayoutRuleSettings};
pub use provider::{AddressProvider, LabelProvider, PathSource, PathTransform, ProviderError, VersionProvider};
pub use rules::{AddressRule, GroupRef, LabelRule, ListEvent, RuleError, RuleList, VersionRule};
pub use service::{ApplyError, ApplyLayoutRuleService};

pub use sa_asset_groups::{
	AssetFilter, AssetGroup, AssetGroupError, FilterKind, TypeMatcher, TypeRef, TypeRegistry,
};
pub use sa_versioning::{Comparator, ExpressionError, Version, VersionError};
