use globset::{Glob, GlobSet, GlobSetBuilder};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{TypeMatcher, TypeRef};

#[derive(Error, Debug)]
pub enum AssetGroupError {
	#[error("glob builder error: {0}")]
	Glob(#[from] globset::Error),
	#[error("non-list filter must hold exactly one value, found {0}")]
	InvalidValueCount(usize),
}

/// Kind-specific matching data. The set is closed on purpose: list-mode
/// and ignore semantics apply uniformly and resolution reasons about every
/// kind exhaustively.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum FilterKind {
	/// Matches the descriptor's type against declared type references.
	Type {
		values: Vec<TypeRef>,
		include_subtypes: bool,
		#[serde(skip)]
		matcher: Option<TypeMatcher>,
	},
	/// Matches the descriptor's path against glob patterns.
	/// The compiled set is rebuilt by `setup` and never serialized.
	Path {
		patterns: Vec<String>,
		#[serde(skip)]
		glob_set: Option<GlobSet>,
	},
}

/// A single predicate over `(path, type, is_folder)`.
///
/// `raw_match` is OR across the values in list mode (exactly one value
/// drives the result otherwise); the final result is `raw_match XOR ignore`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetFilter {
	pub ignore: bool,
	pub list_mode: bool,
	pub kind: FilterKind,
	#[serde(skip)]
	ready: bool,
}

impl AssetFilter {
	#[must_use]
	pub fn by_type(value: TypeRef, include_subtypes: bool) -> Self {
		Self {
			ignore: false,
			list_mode: false,
			kind: FilterKind::Type {
				values: vec![value],
				include_subtypes,
				matcher: None,
			},
			ready: false,
		}
	}

	#[must_use]
	pub fn by_types(values: Vec<TypeRef>, include_subtypes: bool) -> Self {
		Self {
			ignore: false,
			list_mode: true,
			kind: FilterKind::Type {
				values,
				include_subtypes,
				matcher: None,
			},
			ready: false,
		}
	}

	pub fn by_path(pattern: impl Into<String>) -> Self {
		Self {
			ignore: false,
			list_mode: false,
			kind: FilterKind::Path {
				patterns: vec![pattern.into()],
				glob_set: None,
			},
			ready: false,
		}
	}

	#[must_use]
	pub fn by_paths(patterns: Vec<String>) -> Self {
		Self {
			ignore: false,
			list_mode: true,
			kind: FilterKind::Path {
				patterns,
				glob_set: None,
			},
			ready: false,
		}
	}

	#[must_use]
	pub const fn ignored(mut self) -> Self {
		self.ignore = true;
		self
	}

	/// Validates value arity and precompiles patterns. Must be called once
	/// per authoring session before the first [`Self::is_match`] call; the
	/// match path itself never re-validates.
	pub fn setup(&mut self, type_matcher: &TypeMatcher) -> Result<(), AssetGroupError> {
		self.ready = false;

		let value_count = match &self.kind {
			FilterKind::Type { values, .. } => values.len(),
			FilterKind::Path { patterns, .. } => patterns.len(),
		};
		if !self.list_mode && value_count != 1 {
			return Err(AssetGroupError::InvalidValueCount(value_count));
		}

		match &mut self.kind {
			FilterKind::Type { matcher, .. } => *matcher = Some(type_matcher.clone()),
			FilterKind::Path { patterns, glob_set } => {
				let mut builder = GlobSetBuilder::new();
				for pattern in patterns.iter() {
					builder.add(pattern.parse::<Glob>()?);
				}
				*glob_set = Some(builder.build()?);
			}
		}

		self.ready = true;
		Ok(())
	}

	/// Evaluates the kind-specific raw predicate, then applies the
	/// ignore-XOR rule. Calling this before [`Self::setup`] is a
	/// precondition violation.
	#[must_use]
	pub fn is_match(&self, path: &str, ty: &TypeRef, _is_folder: bool) -> bool {
		debug_assert!(self.ready, "AssetFilter::setup must be called before is_match");

		let raw_match = match &self.kind {
			FilterKind::Type {
				values,
				include_subtypes,
				matcher,
			} => matcher.as_ref().is_some_and(|matcher| {
				values
					.iter()
					.any(|declared| matcher.matches(declared, ty, *include_subtypes))
			}),
			FilterKind::Path { glob_set, .. } => glob_set
				.as_ref()
				.is_some_and(|glob_set| glob_set.is_match(path)),
		};

		raw_match != self.ignore
	}

	/// Stable human-readable summary, consumed by the authoring UI.
	#[must_use]
	pub fn description(&self) -> String {
		let body = match &self.kind {
			FilterKind::Type { values, .. } => {
				let values = values
					.iter()
					.map(|v| v.name().unwrap_or("<unresolved>"))
					.join(" || ");
				if self.list_mode {
					format!("Type: ( {values} )")
				} else {
					format!("Type: {values}")
				}
			}
			FilterKind::Path { patterns, .. } => {
				let patterns = patterns.iter().join(" || ");
				if self.list_mode {
					format!("Path: ( {patterns} )")
				} else {
					format!("Path: {patterns}")
				}
			}
		};
		if self.ignore {
			format!("!{body}")
		} else {
			body
		}
	}
}
