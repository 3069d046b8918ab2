use std::fmt;

use serde::{Deserialize, Serialize};

/// Change notification emitted by a [`RuleList`], delivered synchronously
/// to every subscriber in subscription order.
#[derive(Debug)]
pub enum ListEvent<'a, T> {
	Added { index: usize, value: &'a T },
	Removed { index: usize, value: &'a T },
	Cleared,
}

type Subscriber<T> = Box<dyn FnMut(&ListEvent<'_, T>)>;

/// An explicit ordered sequence of rules with change notifications for the
/// authoring UI. Order is semantically significant: resolution walks the
/// list front to back.
#[derive(Serialize, Deserialize)]
#[serde(bound(
	serialize = "T: Serialize",
	deserialize = "T: Deserialize<'de>"
))]
pub struct RuleList<T> {
	items: Vec<T>,
	#[serde(skip)]
	subscribers: Vec<Subscriber<T>>,
}

impl<T> Default for RuleList<T> {
	fn default() -> Self {
		Self {
			items: Vec::new(),
			subscribers: Vec::new(),
		}
	}
}

impl<T: fmt::Debug> fmt::Debug for RuleList<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("RuleList")
			.field("items", &self.items)
			.field("subscribers", &self.subscribers.len())
			.finish()
	}
}

impl<T> RuleList<T> {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers a synchronous observer for add/remove/clear events.
	pub fn subscribe(&mut self, subscriber: impl FnMut(&ListEvent<'_, T>) + 'static) {
		self.subscribers.push(Box::new(subscriber));
	}

	pub fn push(&mut self, value: T) {
		let index = self.items.len();
		self.items.push(value);
		let event = ListEvent::Added {
			index,
			value: &self.items[index],
		};
		for subscriber in &mut self.subscribers {
			subscriber(&event);
		}
	}

	pub fn insert(&mut self, index: usize, value: T) {
		self.items.insert(index, value);
		let event = ListEvent::Added {
			index,
			value: &self.items[index],
		};
		for subscriber in &mut self.subscribers {
			subscriber(&event);
		}
	}

	pub fn remove(&mut self, index: usize) -> T {
		let value = self.items.remove(index);
		let event = ListEvent::Removed {
			index,
			value: &value,
		};
		for subscriber in &mut self.subscribers {
			subscriber(&event);
		}
		value
	}

	pub fn clear(&mut self) {
		self.items.clear();
		let event = ListEvent::Cleared;
		for subscriber in &mut self.subscribers {
			subscriber(&event);
		}
	}

	#[must_use]
	pub fn len(&self) -> usize {
		self.items.len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.items.is_empty()
	}

	#[must_use]
	pub fn get(&self, index: usize) -> Option<&T> {
		self.items.get(index)
	}

	pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
		self.items.get_mut(index)
	}

	pub fn iter(&self) -> std::slice::Iter<'_, T> {
		self.items.iter()
	}

	pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
		self.items.iter_mut()
	}
}

impl<'a, T> IntoIterator for &'a RuleList<T> {
	type Item = &'a T;
	type IntoIter = std::slice::Iter<'a, T>;

	fn into_iter(self) -> Self::IntoIter {
		self.iter()
	}
}

impl<T> FromIterator<T> for RuleList<T> {
	fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
		Self {
			items: iter.into_iter().collect(),
			subscribers: Vec::new(),
		}
	}
}
