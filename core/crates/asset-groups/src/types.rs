use std::{collections::HashMap, sync::Arc};

use serde::{Deserialize, Serialize};

/// Reference to a concrete type in the host type system.
///
/// A reference is either resolved to exactly one type name or explicitly
/// unresolved (the type was deleted or never existed). Unresolved
/// references never match anything.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeRef {
	Resolved(String),
	Unresolved,
}

impl TypeRef {
	pub fn named(name: impl Into<String>) -> Self {
		Self::Resolved(name.into())
	}

	#[must_use]
	pub const fn unresolved() -> Self {
		Self::Unresolved
	}

	#[must_use]
	pub fn name(&self) -> Option<&str> {
		match self {
			Self::Resolved(name) => Some(name),
			Self::Unresolved => None,
		}
	}
}

/// The host type system: every known type name and its optional supertype.
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
	supertypes: HashMap<String, Option<String>>,
}

impl TypeRegistry {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	pub fn register(&mut self, name: impl Into<String>, supertype: Option<&str>) {
		self.supertypes
			.insert(name.into(), supertype.map(str::to_string));
	}

	#[must_use]
	pub fn is_registered(&self, name: &str) -> bool {
		self.supertypes.contains_key(name)
	}

	/// Whether `candidate` is a strict subtype of `declared`, walking the
	/// supertype chain.
	#[must_use]
	pub fn is_subtype_of(&self, candidate: &str, declared: &str) -> bool {
		let mut current = candidate;
		while let Some(Some(supertype)) = self.supertypes.get(current) {
			if supertype == declared {
				return true;
			}
			current = supertype;
		}
		false
	}
}

/// Decides whether a candidate type matches a declared type reference.
///
/// Cheap to clone; the registry is shared read-only across all filters of
/// a batch.
#[derive(Debug, Clone)]
pub struct TypeMatcher {
	registry: Arc<TypeRegistry>,
}

impl TypeMatcher {
	#[must_use]
	pub fn new(registry: Arc<TypeRegistry>) -> Self {
		Self { registry }
	}

	/// Exact equality always matches. With `include_subtypes`, a candidate
	/// below `declared` in the supertype chain matches too. Unresolved
	/// references on either side fail closed.
	#[must_use]
	pub fn matches(&self, declared: &TypeRef, candidate: &TypeRef, include_subtypes: bool) -> bool {
		let (Some(declared), Some(candidate)) = (declared.name(), candidate.name()) else {
			return false;
		};
		// A name the registry no longer knows is as good as unresolved.
		if !self.registry.is_registered(declared) || !self.registry.is_registered(candidate) {
			return false;
		}
		if declared == candidate {
			return true;
		}
		include_subtypes && self.registry.is_subtype_of(candidate, declared)
	}
}
