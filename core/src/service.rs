use std::collections::BTreeMap;

use thiserror::Error;
use tracing::debug;

use sa_asset_groups::{TypeMatcher, TypeRef};
use sa_versioning::{Comparator, ExpressionError, Version};

use crate::{
	adapter::{DestinationStore, EntryHandle, ResourceQuery, StoreError},
	layout::LayoutRule,
	rules::RuleError,
};

#[derive(Error, Debug)]
pub enum ApplyError {
	#[error("invalid version expression: {0}")]
	Expression(#[from] ExpressionError),
	#[error(transparent)]
	Store(#[from] StoreError),
	#[error(transparent)]
	Rule(#[from] RuleError),
}

/// Applies a [`LayoutRule`] to the destination store across many
/// resources.
///
/// Call [`Self::setup`] once and pass `do_setup = false` when processing a
/// batch through repeated `try_add_*` calls; pass `do_setup = true` for a
/// one-off call without a prior setup.
pub struct ApplyLayoutRuleService<Q, S> {
	layout_rule: LayoutRule,
	type_matcher: TypeMatcher,
	resources: Q,
	store: S,
}

impl<Q: ResourceQuery, S: DestinationStore> ApplyLayoutRuleService<Q, S> {
	pub const fn new(layout_rule: LayoutRule, type_matcher: TypeMatcher, resources: Q, store: S) -> Self {
		Self {
			layout_rule,
			type_matcher,
			resources,
			store,
		}
	}

	#[must_use]
	pub const fn layout_rule(&self) -> &LayoutRule {
		&self.layout_rule
	}

	pub fn layout_rule_mut(&mut self) -> &mut LayoutRule {
		&mut self.layout_rule
	}

	/// Forwards setup to all three rule lists, amortizing glob and regex
	/// compilation across the batch.
	pub fn setup(&mut self) -> Result<(), RuleError> {
		self.layout_rule.setup_for_address(&self.type_matcher)?;
		self.layout_rule.setup_for_labels(&self.type_matcher)?;
		self.layout_rule.setup_for_version(&self.type_matcher)?;
		Ok(())
	}

	/// Full resync: removes every previously managed entry from the
	/// destination groups under control of this layout rule, then applies
	/// the rule to the whole resource universe. Stale entries from assets
	/// that no longer match any rule must not linger.
	pub fn update_all_entries(&mut self) -> Result<(), ApplyError> {
		self.setup()?;

		let group_names = self
			.layout_rule
			.address_rules
			.iter()
			.filter(|rule| rule.control)
			// A stale reference has no group left to clear.
			.filter_map(|rule| rule.destination_group.name().map(str::to_owned))
			.collect::<Vec<_>>();
		for group_name in group_names {
			self.store.remove_all_entries(&group_name)?;
		}

		let version_expression = self.layout_rule.settings.version_expression.clone();
		let paths = self.resources.all_resource_paths();
		self.try_add_entries(&paths, false, Some(&version_expression))
	}

	/// Batch variant: resolves every resource, applies the optional
	/// version-constraint filter, then asks the store once per destination
	/// group to create-or-move all member resources and reconciles labels
	/// per resulting entry.
	pub fn try_add_entries(
		&mut self,
		paths: &[String],
		do_setup: bool,
		version_expression: Option<&str>,
	) -> Result<(), ApplyError> {
		if do_setup {
			self.setup()?;
		}

		// Parsed once; reused for every resource in the batch.
		let comparator = version_expression
			.filter(|expression| !expression.trim().is_empty())
			.map(Comparator::parse)
			.transpose()?;

		let mut grouped_ids = BTreeMap::<String, Vec<String>>::new();
		for path in paths {
			let ty = self.resources.type_at(path);
			let is_folder = self.resources.is_folder(path);

			let Some(group_name) = self.resolve_destination(path, &ty, is_folder) else {
				continue;
			};

			if !self.passes_version_filter(comparator.as_ref(), path, &ty, is_folder) {
				continue;
			}

			grouped_ids
				.entry(group_name)
				.or_default()
				.push(self.resources.path_to_id(path));
		}

		for (group_name, ids) in &grouped_ids {
			let entries = self.store.create_or_move_entries(group_name, ids)?;
			for entry in entries {
				// The store's default address is the asset path, which is
				// what the label rules match against.
				let path = entry.address();
				let ty = self.resources.type_at(&path);
				let is_folder = self.resources.is_folder(&path);
				self.update_asset_label(&entry, &path, &ty, is_folder);
			}
		}

		Ok(())
	}

	/// Single-resource variant, for callers that care about per-resource
	/// latency rather than batch throughput. Returns whether the resource
	/// was placed.
	pub fn try_add_entry(
		&mut self,
		path: &str,
		do_setup: bool,
		version_expression: Option<&str>,
	) -> Result<bool, ApplyError> {
		if do_setup {
			self.setup()?;
		}

		let ty = self.resources.type_at(path);
		let is_folder = self.resources.is_folder(path);

		let Some((address, group_name)) = self
			.layout_rule
			.provide_address(path, &ty, is_folder)
			.and_then(|(address, group_ref)| {
				group_ref.name().map(|name| (address, name.to_owned()))
			})
		else {
			return Ok(false);
		};

		if let Some(expression) = version_expression.filter(|expression| !expression.trim().is_empty()) {
			let comparator = Comparator::parse(expression)?;
			if !self.passes_version_filter(Some(&comparator), path, &ty, is_folder) {
				return Ok(false);
			}
		}

		let id = self.resources.path_to_id(path);
		let entry = self.store.create_or_move_entry(&group_name, &id)?;
		entry.set_address(&address);
		self.update_asset_label(&entry, path, &ty, is_folder);

		Ok(true)
	}

	/// Reconciles the entry's label set to exactly the resolved set:
	/// registers unknown labels globally, removes labels no longer
	/// resolved, adds missing ones. Idempotent; a second identical run
	/// issues no further store writes.
	pub fn update_asset_label(&self, entry: &S::Entry, path: &str, ty: &TypeRef, is_folder: bool) {
		let labels = self.layout_rule.provide_labels(path, ty, is_folder);

		let global_labels = self.store.global_labels();
		for label in &labels {
			if !global_labels.iter().any(|known| known == label) {
				self.store.add_label(label);
			}
		}

		for old_label in entry.labels() {
			if !labels.contains(&old_label) {
				entry.set_label(&old_label, false);
			}
		}
		for label in &labels {
			entry.set_label(label, true);
		}
	}

	/// Address resolution plus the stale-reference check. `None` covers
	/// both the unmanaged resource and the deleted destination group.
	fn resolve_destination(&self, path: &str, ty: &TypeRef, is_folder: bool) -> Option<String> {
		let (_address, group_ref) = self.layout_rule.provide_address(path, ty, is_folder)?;
		let Some(group_name) = group_ref.name() else {
			debug!(path, "destination group reference is stale; skipping resource");
			return None;
		};
		Some(group_name.to_owned())
	}

	/// Version-constraint filter. With no comparator every resource
	/// passes. An unparsable version text never excludes a resource.
	fn passes_version_filter(
		&self,
		comparator: Option<&Comparator>,
		path: &str,
		ty: &TypeRef,
		is_folder: bool,
	) -> bool {
		let Some(comparator) = comparator else {
			return true;
		};

		match self.layout_rule.provide_version(path, ty, is_folder) {
			None => {
				if self.layout_rule.settings.exclude_unversioned {
					debug!(path, "unversioned resource excluded by settings");
					return false;
				}
				true
			}
			Some(version_text) => match version_text.parse::<Version>() {
				Ok(version) => {
					let satisfied = comparator.is_satisfied(&version);
					if !satisfied {
						debug!(path, %version, "version constraint not satisfied; skipping resource");
					}
					satisfied
				}
				Err(_) => true,
			},
		}
	}
}
