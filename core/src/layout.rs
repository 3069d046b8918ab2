use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use sa_asset_groups::{TypeMatcher, TypeRef};

use crate::rules::{AddressRule, GroupRef, LabelRule, RuleError, RuleList, VersionRule};

/// Batch-wide configuration carried by a layout rule.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LayoutRuleSettings {
	/// Version-range expression applied during a full resync. Empty means
	/// no version filtering.
	pub version_expression: String,
	/// When version filtering is active, also drop resources that no
	/// version rule covers.
	pub exclude_unversioned: bool,
}

/// The ordered rule sets of one editing session, consumed read-only
/// during apply.
///
/// Resolution is first-match-wins per list for addresses and versions,
/// and a union across all matching rules for labels: a resource lives in
/// exactly one destination under one name, but labels from independent
/// concerns accumulate.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct LayoutRule {
	pub address_rules: RuleList<AddressRule>,
	pub label_rules: RuleList<LabelRule>,
	pub version_rules: RuleList<VersionRule>,
	pub settings: LayoutRuleSettings,
}

impl LayoutRule {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	/// Must run before [`Self::provide_address`]; setup may be expensive
	/// (glob and regex compilation) and amortizes over a batch.
	pub fn setup_for_address(&mut self, type_matcher: &TypeMatcher) -> Result<(), RuleError> {
		for rule in self.address_rules.iter_mut() {
			rule.setup(type_matcher)?;
		}
		Ok(())
	}

	/// Must run before [`Self::provide_labels`].
	pub fn setup_for_labels(&mut self, type_matcher: &TypeMatcher) -> Result<(), RuleError> {
		for rule in self.label_rules.iter_mut() {
			rule.setup(type_matcher)?;
		}
		Ok(())
	}

	/// Must run before [`Self::provide_version`].
	pub fn setup_for_version(&mut self, type_matcher: &TypeMatcher) -> Result<(), RuleError> {
		for rule in self.version_rules.iter_mut() {
			rule.setup(type_matcher)?;
		}
		Ok(())
	}

	/// First enabled rule whose group contains the descriptor supplies the
	/// address and destination group. `None` means the resource is
	/// unassigned, which is a normal outcome.
	#[must_use]
	pub fn provide_address(&self, path: &str, ty: &TypeRef, is_folder: bool) -> Option<(String, &GroupRef)> {
		self.address_rules
			.iter()
			.filter(|rule| rule.control)
			.find_map(|rule| rule.try_provide(path, ty, is_folder))
	}

	/// Union of the label sets of every enabled matching rule, duplicates
	/// collapsed.
	#[must_use]
	pub fn provide_labels(&self, path: &str, ty: &TypeRef, is_folder: bool) -> BTreeSet<String> {
		self.label_rules
			.iter()
			.filter(|rule| rule.control)
			.filter_map(|rule| rule.try_provide(path, ty, is_folder))
			.flatten()
			.collect()
	}

	/// First enabled rule whose group contains the descriptor supplies the
	/// version. A matched-but-empty version string counts as unversioned.
	#[must_use]
	pub fn provide_version(&self, path: &str, ty: &TypeRef, is_folder: bool) -> Option<String> {
		self.version_rules
			.iter()
			.filter(|rule| rule.control)
			.find_map(|rule| rule.try_provide(path, ty, is_folder))
			.filter(|version| !version.is_empty())
	}
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
	use std::sync::Arc;

	use sa_asset_groups::{AssetFilter, AssetGroup, TypeRegistry};

	use crate::provider::{AddressProvider, LabelProvider, PathSource, PathTransform, VersionProvider};

	use super::*;

	fn matcher() -> TypeMatcher {
		let mut registry = TypeRegistry::new();
		registry.register("Texture2D", None);
		registry.register("Material", None);
		TypeMatcher::new(Arc::new(registry))
	}

	fn texture_group(name: &str) -> AssetGroup {
		AssetGroup::with_filters(
			name,
			vec![AssetFilter::by_type(TypeRef::named("Texture2D"), false)],
		)
	}

	fn texture2d() -> TypeRef {
		TypeRef::named("Texture2D")
	}

	#[test]
	fn address_resolution_is_first_match() {
		let mut layout = LayoutRule::new();
		layout.address_rules.push(AddressRule::new(
			texture_group("first"),
			AddressProvider::Constant("first-address".to_string()),
			GroupRef::resolved("First"),
		));
		layout.address_rules.push(AddressRule::new(
			texture_group("second"),
			AddressProvider::Constant("second-address".to_string()),
			GroupRef::resolved("Second"),
		));
		layout.setup_for_address(&matcher()).unwrap();

		let (address, group) = layout
			.provide_address("Assets/Tex.png", &texture2d(), false)
			.unwrap();
		assert_eq!(address, "first-address");
		assert_eq!(group.name(), Some("First"));
	}

	#[test]
	fn disabled_rules_are_skipped() {
		let mut layout = LayoutRule::new();
		let mut disabled = AddressRule::new(
			texture_group("disabled"),
			AddressProvider::Constant("disabled".to_string()),
			GroupRef::resolved("Disabled"),
		);
		disabled.control = false;
		layout.address_rules.push(disabled);
		layout.address_rules.push(AddressRule::new(
			texture_group("enabled"),
			AddressProvider::AssetPath(PathTransform::new(PathSource::FileName)),
			GroupRef::resolved("Enabled"),
		));
		layout.setup_for_address(&matcher()).unwrap();

		let (address, group) = layout
			.provide_address("Assets/Tex.png", &texture2d(), false)
			.unwrap();
		assert_eq!(address, "Tex.png");
		assert_eq!(group.name(), Some("Enabled"));
	}

	#[test]
	fn unmatched_resource_is_unassigned() {
		let mut layout = LayoutRule::new();
		layout.address_rules.push(AddressRule::new(
			texture_group("textures"),
			AddressProvider::Constant("x".to_string()),
			GroupRef::resolved("G"),
		));
		layout.setup_for_address(&matcher()).unwrap();

		assert!(layout
			.provide_address("Assets/Mat.mat", &TypeRef::named("Material"), false)
			.is_none());
	}

	#[test]
	fn label_resolution_is_union() {
		let mut layout = LayoutRule::new();
		layout.label_rules.push(LabelRule::new(
			texture_group("a"),
			LabelProvider::Constant(vec!["a".to_string()]),
		));
		layout.label_rules.push(LabelRule::new(
			texture_group("b"),
			LabelProvider::Constant(vec!["b".to_string()]),
		));
		layout.label_rules.push(LabelRule::new(
			AssetGroup::with_filters(
				"materials only",
				vec![AssetFilter::by_type(TypeRef::named("Material"), false)],
			),
			LabelProvider::Constant(vec!["never".to_string()]),
		));
		layout.setup_for_labels(&matcher()).unwrap();

		let labels = layout.provide_labels("Assets/Tex.png", &texture2d(), false);
		assert_eq!(
			labels.into_iter().collect::<Vec<_>>(),
			vec!["a".to_string(), "b".to_string()]
		);
	}

	#[test]
	fn duplicate_labels_collapse() {
		let mut layout = LayoutRule::new();
		for _ in 0..2 {
			layout.label_rules.push(LabelRule::new(
				texture_group("dup"),
				LabelProvider::Constant(vec!["same".to_string()]),
			));
		}
		layout.setup_for_labels(&matcher()).unwrap();

		let labels = layout.provide_labels("Assets/Tex.png", &texture2d(), false);
		assert_eq!(labels.len(), 1);
	}

	#[test]
	fn serde_smoke_test() {
		let mut layout = LayoutRule::new();
		layout.address_rules.push(AddressRule::new(
			texture_group("textures"),
			AddressProvider::AssetPath(PathTransform::new(PathSource::FileName)),
			GroupRef::resolved("G"),
		));
		layout.settings.version_expression = ">=1.0.0".to_string();

		let encoded = rmp_serde::to_vec_named(&layout).unwrap();
		let mut decoded = rmp_serde::from_slice::<LayoutRule>(&encoded).unwrap();
		assert_eq!(decoded.settings.version_expression, ">=1.0.0");

		// Compiled filter state is not serialized; setup runs again.
		decoded.setup_for_address(&matcher()).unwrap();
		let (address, group) = decoded
			.provide_address("Assets/Tex.png", &texture2d(), false)
			.unwrap();
		assert_eq!(address, "Tex.png");
		assert_eq!(group.name(), Some("G"));
	}

	#[test]
	fn version_resolution_is_first_match_and_empty_is_unversioned() {
		let mut layout = LayoutRule::new();
		layout.version_rules.push(VersionRule::new(
			texture_group("empty version"),
			VersionProvider::Constant(String::new()),
		));
		layout.version_rules.push(VersionRule::new(
			texture_group("real version"),
			VersionProvider::Constant("1.5.0".to_string()),
		));
		layout.setup_for_version(&matcher()).unwrap();

		// The first matching rule wins even though it provides an empty
		// string, and empty means unversioned.
		assert_eq!(layout.provide_version("Assets/Tex.png", &texture2d(), false), None);

		layout.version_rules.remove(0);
		assert_eq!(
			layout.provide_version("Assets/Tex.png", &texture2d(), false),
			Some("1.5.0".to_string())
		);
	}
}
