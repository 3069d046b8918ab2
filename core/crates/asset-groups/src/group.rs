use itertools::Itertools;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
	filter::{AssetFilter, AssetGroupError},
	types::{TypeMatcher, TypeRef},
};

/// An ordered set of filters combined with AND semantics.
///
/// The group exclusively owns its filters. An empty filter list matches
/// every descriptor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetGroup {
	id: Uuid,
	pub name: String,
	pub filters: Vec<AssetFilter>,
}

impl AssetGroup {
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			id: Uuid::new_v4(),
			name: name.into(),
			filters: Vec::new(),
		}
	}

	pub fn with_filters(name: impl Into<String>, filters: Vec<AssetFilter>) -> Self {
		Self {
			id: Uuid::new_v4(),
			name: name.into(),
			filters,
		}
	}

	#[must_use]
	pub const fn id(&self) -> Uuid {
		self.id
	}

	/// Forwards setup to every filter. Must run once per batch before
	/// [`Self::contains`].
	pub fn setup(&mut self, type_matcher: &TypeMatcher) -> Result<(), AssetGroupError> {
		for filter in &mut self.filters {
			filter.setup(type_matcher)?;
		}
		Ok(())
	}

	/// AND over the filters, short-circuiting on the first non-match.
	#[must_use]
	pub fn contains(&self, path: &str, ty: &TypeRef, is_folder: bool) -> bool {
		self.filters
			.iter()
			.all(|filter| filter.is_match(path, ty, is_folder))
	}

	/// Stable human-readable summary, consumed by the authoring UI.
	#[must_use]
	pub fn description(&self) -> String {
		if self.filters.is_empty() {
			return "(none)".to_string();
		}
		self.filters
			.iter()
			.map(AssetFilter::description)
			.join(" && ")
	}
}
