//! Address, label, and version rules: each pairs an [`AssetGroup`]
//! matching condition with a provider.
//!
//! A rule's `control` flag is the authoring-time disable switch; disabled
//! rules stay in their list (the UI still shows them) but resolution skips
//! them entirely.

mod list;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use sa_asset_groups::{AssetGroup, AssetGroupError, TypeMatcher, TypeRef};

use crate::provider::{AddressProvider, LabelProvider, ProviderError, VersionProvider};

pub use list::{ListEvent, RuleList};

#[derive(Error, Debug)]
pub enum RuleError {
	#[error("asset group setup failed: {0}")]
	Group(#[from] AssetGroupError),
	#[error("provider setup failed: {0}")]
	Provider(#[from] ProviderError),
}

/// Reference to a destination group in the backend store.
///
/// The referenced group can be deleted behind our back; a stale reference
/// resolves to no name and the resource it would have placed is skipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupRef(Option<String>);

impl GroupRef {
	pub fn resolved(name: impl Into<String>) -> Self {
		Self(Some(name.into()))
	}

	#[must_use]
	pub const fn stale() -> Self {
		Self(None)
	}

	#[must_use]
	pub fn name(&self) -> Option<&str> {
		self.0.as_deref()
	}
}

/// Pairs a matching condition with an address-naming strategy and the
/// destination group matched resources are placed into.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddressRule {
	id: Uuid,
	pub control: bool,
	pub asset_group: AssetGroup,
	pub provider: AddressProvider,
	pub destination_group: GroupRef,
	pub created_at: DateTime<Utc>,
	pub modified_at: DateTime<Utc>,
}

impl AddressRule {
	#[must_use]
	pub fn new(asset_group: AssetGroup, provider: AddressProvider, destination_group: GroupRef) -> Self {
		let now = Utc::now();
		Self {
			id: Uuid::new_v4(),
			control: true,
			asset_group,
			provider,
			destination_group,
			created_at: now,
			modified_at: now,
		}
	}

	#[must_use]
	pub const fn id(&self) -> Uuid {
		self.id
	}

	pub fn setup(&mut self, type_matcher: &TypeMatcher) -> Result<(), RuleError> {
		self.asset_group.setup(type_matcher)?;
		self.provider.setup()?;
		Ok(())
	}

	/// Provides the address and destination group when the rule's group
	/// contains the descriptor. `None` is the normal unmatched outcome.
	#[must_use]
	pub fn try_provide(&self, path: &str, ty: &TypeRef, is_folder: bool) -> Option<(String, &GroupRef)> {
		self.asset_group
			.contains(path, ty, is_folder)
			.then(|| (self.provider.provide(path, ty, is_folder), &self.destination_group))
	}
}

/// Pairs a matching condition with a label-set provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelRule {
	id: Uuid,
	pub control: bool,
	pub asset_group: AssetGroup,
	pub provider: LabelProvider,
	pub created_at: DateTime<Utc>,
	pub modified_at: DateTime<Utc>,
}

impl LabelRule {
	#[must_use]
	pub fn new(asset_group: AssetGroup, provider: LabelProvider) -> Self {
		let now = Utc::now();
		Self {
			id: Uuid::new_v4(),
			control: true,
			asset_group,
			provider,
			created_at: now,
			modified_at: now,
		}
	}

	#[must_use]
	pub const fn id(&self) -> Uuid {
		self.id
	}

	pub fn setup(&mut self, type_matcher: &TypeMatcher) -> Result<(), RuleError> {
		self.asset_group.setup(type_matcher)?;
		self.provider.setup()?;
		Ok(())
	}

	#[must_use]
	pub fn try_provide(&self, path: &str, ty: &TypeRef, is_folder: bool) -> Option<Vec<String>> {
		self.asset_group
			.contains(path, ty, is_folder)
			.then(|| self.provider.provide(path, ty, is_folder))
	}
}

/// Pairs a matching condition with a version-string provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionRule {
	id: Uuid,
	pub control: bool,
	pub asset_group: AssetGroup,
	pub provider: VersionProvider,
	pub created_at: DateTime<Utc>,
	pub modified_at: DateTime<Utc>,
}

impl VersionRule {
	#[must_use]
	pub fn new(asset_group: AssetGroup, provider: VersionProvider) -> Self {
		let now = Utc::now();
		Self {
			id: Uuid::new_v4(),
			control: true,
			asset_group,
			provider,
			created_at: now,
			modified_at: now,
		}
	}

	#[must_use]
	pub const fn id(&self) -> Uuid {
		self.id
	}

	pub fn setup(&mut self, type_matcher: &TypeMatcher) -> Result<(), RuleError> {
		self.asset_group.setup(type_matcher)?;
		self.provider.setup()?;
		Ok(())
	}

	#[must_use]
	pub fn try_provide(&self, path: &str, ty: &TypeRef, is_folder: bool) -> Option<String> {
		self.asset_group
			.contains(path, ty, is_folder)
			.then(|| self.provider.provide(path, ty, is_folder))
	}
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
	use std::sync::Arc;

	use sa_asset_groups::{AssetFilter, TypeRegistry};

	use crate::provider::{PathSource, PathTransform};

	use super::*;

	fn matcher() -> TypeMatcher {
		let mut registry = TypeRegistry::new();
		registry.register("Texture2D", None);
		TypeMatcher::new(Arc::new(registry))
	}

	#[test]
	fn address_rule_provides_for_matching_descriptor() {
		let group = AssetGroup::with_filters(
			"textures",
			vec![AssetFilter::by_type(TypeRef::named("Texture2D"), false)],
		);
		let mut rule = AddressRule::new(
			group,
			AddressProvider::AssetPath(PathTransform::new(PathSource::FullPath)),
			GroupRef::resolved("G"),
		);
		rule.setup(&matcher()).unwrap();

		let provided = rule.try_provide("Assets/Tex.png", &TypeRef::named("Texture2D"), false);
		let (address, destination) = provided.unwrap();
		assert_eq!(address, "Assets/Tex.png");
		assert_eq!(destination.name(), Some("G"));

		assert!(rule
			.try_provide("Assets/Tex.png", &TypeRef::unresolved(), false)
			.is_none());
	}

	#[test]
	fn stale_group_ref_has_no_name() {
		assert_eq!(GroupRef::stale().name(), None);
		assert_eq!(GroupRef::resolved("G").name(), Some("G"));
	}
}
