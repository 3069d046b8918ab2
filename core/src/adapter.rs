//! Adapter boundary to the surrounding tool.
//!
//! The core drives two external capability sets: a read-only resource
//! query and the destination store the resolved layout is written into.
//! Both are the backend's true contract; bulk removal and bulk
//! create-or-move are first-class operations here.

use std::collections::HashSet;

use thiserror::Error;

use sa_asset_groups::TypeRef;

#[derive(Error, Debug)]
pub enum StoreError {
	#[error("destination group '{0}' was not found")]
	GroupNotFound(String),
	#[error("destination store failure: {0}")]
	Backend(String),
}

/// Read-only access to the resource universe.
pub trait ResourceQuery {
	fn all_resource_paths(&self) -> Vec<String>;

	/// Stable identifier the destination store keys entries by.
	fn path_to_id(&self, path: &str) -> String;

	fn type_at(&self, path: &str) -> TypeRef;

	fn is_folder(&self, path: &str) -> bool;
}

/// Handle to one entry in the destination store.
///
/// Implementations are expected to skip redundant writes: setting an
/// address or label state the entry already has must not touch the
/// backend, so reconciliation stays idempotent.
pub trait EntryHandle {
	fn address(&self) -> String;

	fn set_address(&self, address: &str);

	fn labels(&self) -> HashSet<String>;

	fn set_label(&self, label: &str, enabled: bool);
}

/// The backend resource-settings store. Treated as exclusively owned for
/// the duration of one batch call; concurrent batches are not supported.
pub trait DestinationStore {
	type Entry: EntryHandle;

	/// Removes every entry of the named group. Unknown groups are a
	/// configuration error, fatal to the whole batch.
	fn remove_all_entries(&self, group_name: &str) -> Result<(), StoreError>;

	fn create_or_move_entries(
		&self,
		group_name: &str,
		ids: &[String],
	) -> Result<Vec<Self::Entry>, StoreError>;

	fn create_or_move_entry(&self, group_name: &str, id: &str) -> Result<Self::Entry, StoreError>;

	/// The global label registry.
	fn global_labels(&self) -> Vec<String>;

	fn add_label(&self, label: &str);
}
