//! In-memory adapter doubles for tests and examples.
//!
//! [`MemoryStore`] counts raw address/label writes so reconciliation
//! idempotence is assertable. Paths double as stable entry ids in
//! [`MemoryResources`].

use std::{
	cell::RefCell,
	collections::{BTreeMap, BTreeSet, HashSet},
	rc::Rc,
};

use sa_asset_groups::TypeRef;

use crate::adapter::{DestinationStore, EntryHandle, ResourceQuery, StoreError};

/// Fixed resource universe keyed by path.
#[derive(Debug, Clone, Default)]
pub struct MemoryResources {
	resources: BTreeMap<String, (TypeRef, bool)>,
}

impl MemoryResources {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	pub fn insert(&mut self, path: impl Into<String>, ty: TypeRef, is_folder: bool) {
		self.resources.insert(path.into(), (ty, is_folder));
	}
}

impl ResourceQuery for MemoryResources {
	fn all_resource_paths(&self) -> Vec<String> {
		self.resources.keys().cloned().collect()
	}

	fn path_to_id(&self, path: &str) -> String {
		path.to_string()
	}

	fn type_at(&self, path: &str) -> TypeRef {
		self.resources
			.get(path)
			.map_or_else(TypeRef::unresolved, |(ty, _)| ty.clone())
	}

	fn is_folder(&self, path: &str) -> bool {
		self.resources
			.get(path)
			.is_some_and(|(_, is_folder)| *is_folder)
	}
}

#[derive(Debug, Default)]
struct EntryState {
	address: String,
	labels: BTreeSet<String>,
	group: String,
}

#[derive(Debug, Default)]
struct StoreState {
	// group name -> member entry ids
	groups: BTreeMap<String, BTreeSet<String>>,
	entries: BTreeMap<String, EntryState>,
	global_labels: BTreeSet<String>,
	address_writes: usize,
	label_writes: usize,
}

/// Single-threaded in-memory destination store. Cloning shares the state,
/// so tests can keep a handle for assertions while the service owns
/// another.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
	state: Rc<RefCell<StoreState>>,
}

impl MemoryStore {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	/// Groups must exist before entries can be placed into them.
	pub fn add_group(&self, name: impl Into<String>) {
		self.state
			.borrow_mut()
			.groups
			.insert(name.into(), BTreeSet::new());
	}

	#[must_use]
	pub fn group_entries(&self, name: &str) -> Vec<String> {
		self.state
			.borrow()
			.groups
			.get(name)
			.map(|ids| ids.iter().cloned().collect())
			.unwrap_or_default()
	}

	#[must_use]
	pub fn entry_address(&self, id: &str) -> Option<String> {
		self.state
			.borrow()
			.entries
			.get(id)
			.map(|entry| entry.address.clone())
	}

	#[must_use]
	pub fn entry_labels(&self, id: &str) -> Option<BTreeSet<String>> {
		self.state
			.borrow()
			.entries
			.get(id)
			.map(|entry| entry.labels.clone())
	}

	#[must_use]
	pub fn address_writes(&self) -> usize {
		self.state.borrow().address_writes
	}

	#[must_use]
	pub fn label_writes(&self) -> usize {
		self.state.borrow().label_writes
	}

	#[must_use]
	pub fn entry_count(&self) -> usize {
		self.state.borrow().entries.len()
	}
}

/// Entry handle over the shared store state, guarding against redundant
/// writes as a real backend adapter would.
#[derive(Debug, Clone)]
pub struct MemoryEntry {
	id: String,
	state: Rc<RefCell<StoreState>>,
}

impl EntryHandle for MemoryEntry {
	fn address(&self) -> String {
		self.state.borrow().entries[&self.id].address.clone()
	}

	fn set_address(&self, address: &str) {
		let mut state = self.state.borrow_mut();
		let entry = state
			.entries
			.get_mut(&self.id)
			.expect("entry removed while a handle was alive");
		if entry.address == address {
			return;
		}
		entry.address = address.to_string();
		state.address_writes += 1;
	}

	fn labels(&self) -> HashSet<String> {
		self.state.borrow().entries[&self.id]
			.labels
			.iter()
			.cloned()
			.collect()
	}

	fn set_label(&self, label: &str, enabled: bool) {
		let mut state = self.state.borrow_mut();
		let entry = state
			.entries
			.get_mut(&self.id)
			.expect("entry removed while a handle was alive");
		if entry.labels.contains(label) == enabled {
			return;
		}
		if enabled {
			entry.labels.insert(label.to_string());
		} else {
			entry.labels.remove(label);
		}
		state.label_writes += 1;
	}
}

impl MemoryStore {
	fn place_entry(state: &mut StoreState, group_name: &str, id: &str) {
		// Move: drop membership in any previous group.
		if let Some(previous) = state.entries.get(id).map(|entry| entry.group.clone()) {
			if previous != group_name {
				if let Some(members) = state.groups.get_mut(&previous) {
					members.remove(id);
				}
			}
		}

		let entry = state.entries.entry(id.to_string()).or_insert_with(|| EntryState {
			// The backend's default address for a fresh entry is the
			// asset path, which doubles as the id here.
			address: id.to_string(),
			labels: BTreeSet::new(),
			group: String::new(),
		});
		entry.group = group_name.to_string();

		state
			.groups
			.get_mut(group_name)
			.expect("checked by the caller")
			.insert(id.to_string());
	}
}

impl DestinationStore for MemoryStore {
	type Entry = MemoryEntry;

	fn remove_all_entries(&self, group_name: &str) -> Result<(), StoreError> {
		let mut state = self.state.borrow_mut();
		let Some(members) = state.groups.get_mut(group_name) else {
			return Err(StoreError::GroupNotFound(group_name.to_string()));
		};
		let members = std::mem::take(members);
		for id in members {
			state.entries.remove(&id);
		}
		Ok(())
	}

	fn create_or_move_entries(
		&self,
		group_name: &str,
		ids: &[String],
	) -> Result<Vec<Self::Entry>, StoreError> {
		let mut state = self.state.borrow_mut();
		if !state.groups.contains_key(group_name) {
			return Err(StoreError::GroupNotFound(group_name.to_string()));
		}
		for id in ids {
			Self::place_entry(&mut state, group_name, id);
		}
		drop(state);

		Ok(ids
			.iter()
			.map(|id| MemoryEntry {
				id: id.clone(),
				state: Rc::clone(&self.state),
			})
			.collect())
	}

	fn create_or_move_entry(&self, group_name: &str, id: &str) -> Result<Self::Entry, StoreError> {
		let mut state = self.state.borrow_mut();
		if !state.groups.contains_key(group_name) {
			return Err(StoreError::GroupNotFound(group_name.to_string()));
		}
		Self::place_entry(&mut state, group_name, id);
		drop(state);

		Ok(MemoryEntry {
			id: id.to_string(),
			state: Rc::clone(&self.state),
		})
	}

	fn global_labels(&self) -> Vec<String> {
		self.state.borrow().global_labels.iter().cloned().collect()
	}

	fn add_label(&self, label: &str) {
		self.state.borrow_mut().global_labels.insert(label.to_string());
	}
}
