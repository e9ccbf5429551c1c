//! The string-keyed class table.
//!
//! # Concurrency
//!
//! One table-wide [`parking_lot::Mutex`] guards the map. Every table operation
//! holds it for its full duration, including the factory call made by
//! [`Registry::create`] and [`Registry::construct`]. A slow factory therefore
//! blocks all other users of the same registry. `parking_lot` locks do not
//! poison, and factory panics are caught before the guard is released, so a
//! faulting class never leaves the table unusable.
//!
//! The lock is not reentrant. A constructor that calls back into the registry
//! that is constructing it (`create`, `construct`, `add`, or any lookup)
//! deadlocks. Factories that need other classes must get them from a
//! different registry or build them directly.
//!
//! # Ownership
//!
//! The registry owns its table and nothing else. Heap instances come back as
//! `Box<B>` and in-place instances as [`InPlace`]; the two are released by
//! [`Registry::destroy`] and [`Registry::destruct`] respectively and cannot be
//! swapped.

use std::mem::MaybeUninit;
use std::panic::{self, AssertUnwindSafe};
use std::ptr::NonNull;

use parking_lot::Mutex;
use rustc_hash::{FxBuildHasher, FxHashMap};
use tracing::{debug, trace, warn};

use crate::entry::ClassEntry;
use crate::error::{ConstructError, RegistrationError};
use crate::fault::panic_message;
use crate::policy::DuplicatePolicy;
use crate::storage::InPlace;

/// Thread-safe registry of classes sharing base type `B`.
pub struct Registry<B: ?Sized> {
	label: &'static str,
	policy: DuplicatePolicy,
	entries: Mutex<FxHashMap<String, ClassEntry<B>>>,
}

impl<B: ?Sized> Registry<B> {
	/// Creates an empty registry that rejects duplicate names.
	pub const fn new(label: &'static str) -> Self {
		Self::with_policy(label, DuplicatePolicy::Reject)
	}

	/// Creates an empty registry with an explicit duplicate policy.
	pub const fn with_policy(label: &'static str, policy: DuplicatePolicy) -> Self {
		Self {
			label,
			policy,
			entries: Mutex::new(FxHashMap::with_hasher(FxBuildHasher)),
		}
	}

	/// Label used in diagnostics.
	pub fn label(&self) -> &'static str {
		self.label
	}

	/// Duplicate policy this registry was created with.
	pub fn policy(&self) -> DuplicatePolicy {
		self.policy
	}

	/// Registers `entry` under `name`.
	///
	/// Under [`DuplicatePolicy::Reject`] an existing name yields
	/// [`RegistrationError::DuplicateKey`] and the first registration stays in
	/// effect. Under [`DuplicatePolicy::Replace`] the old entry is swapped out
	/// as a whole.
	pub fn add(&self, name: impl Into<String>, entry: ClassEntry<B>) -> Result<(), RegistrationError> {
		let name = name.into();
		if name.is_empty() {
			return Err(RegistrationError::EmptyName { registry: self.label });
		}

		let mut entries = self.entries.lock();
		if let Some(existing) = entries.get_mut(&name) {
			return match self.policy {
				DuplicatePolicy::Reject => {
					warn!(registry = self.label, name = %name, "rejected duplicate class registration");
					Err(RegistrationError::DuplicateKey { registry: self.label, name })
				}
				DuplicatePolicy::Replace => {
					*existing = entry;
					debug!(registry = self.label, name = %name, size = entry.instance_size(), "replaced class");
					Ok(())
				}
			};
		}

		entries
			.try_reserve(1)
			.map_err(|source| RegistrationError::AllocationFailure { registry: self.label, source })?;
		debug!(registry = self.label, name = %name, size = entry.instance_size(), "registered class");
		entries.insert(name, entry);
		Ok(())
	}

	/// Allocates and constructs the class registered as `name`.
	///
	/// Returns `None` when the name is unknown or when the constructor panics.
	/// Panics are logged as warnings and never escape.
	pub fn create(&self, name: &str) -> Option<Box<B>> {
		let entries = self.entries.lock();
		let Some(entry) = entries.get(name) else {
			trace!(registry = self.label, name, "create: class not found");
			return None;
		};

		match panic::catch_unwind(AssertUnwindSafe(|| entry.allocate())) {
			Ok(instance) => Some(instance),
			Err(payload) => {
				warn!(
					registry = self.label,
					name,
					error = %panic_message(&*payload),
					"class constructor panicked; treating as not found"
				);
				None
			}
		}
	}

	/// Constructs the class registered as `name` inside caller-owned `storage`.
	///
	/// The storage must be at least [`Registry::get_size`] bytes long and start
	/// at an address aligned for the class ([`Registry::layout`] gives both, and
	/// [`Storage::for_class`](crate::Storage::for_class) allocates a matching
	/// region). Violations are reported without running the constructor.
	///
	/// The registry never takes ownership of `storage`. The returned
	/// [`InPlace`] runs the destructor when dropped or passed to
	/// [`Registry::destruct`].
	pub fn construct<'s>(&self, name: &str, storage: &'s mut [MaybeUninit<u8>]) -> Result<InPlace<'s, B>, ConstructError> {
		let entries = self.entries.lock();
		let Some(entry) = entries.get(name) else {
			trace!(registry = self.label, name, "construct: class not found");
			return Err(ConstructError::NotFound { name: name.to_string() });
		};

		let layout = entry.layout();
		if storage.len() < layout.size() {
			return Err(ConstructError::StorageTooSmall {
				name: name.to_string(),
				required: layout.size(),
				provided: storage.len(),
			});
		}
		let slot = NonNull::from(storage).cast::<u8>();
		if !(slot.as_ptr() as usize).is_multiple_of(layout.align()) {
			return Err(ConstructError::Misaligned {
				name: name.to_string(),
				align: layout.align(),
			});
		}

		// SAFETY: size and alignment were checked above, and the exclusive
		// borrow of `storage` is carried by the returned guard.
		let result = panic::catch_unwind(AssertUnwindSafe(|| unsafe { entry.construct_at(slot) }));
		match result {
			// SAFETY: the constructor initialized the value and returned its address.
			Ok(ptr) => Ok(unsafe { InPlace::from_raw(ptr) }),
			Err(payload) => {
				let message = panic_message(&*payload);
				warn!(registry = self.label, name, error = %message, "in-place constructor panicked");
				Err(ConstructError::Faulted {
					name: name.to_string(),
					message,
				})
			}
		}
	}

	/// Exact byte size of the class registered as `name`.
	///
	/// Zero is a valid size; absence is `None`.
	pub fn get_size(&self, name: &str) -> Option<usize> {
		self.layout(name).map(|layout| layout.size())
	}

	/// Size and alignment of the class registered as `name`.
	pub fn layout(&self, name: &str) -> Option<std::alloc::Layout> {
		self.entries.lock().get(name).map(ClassEntry::layout)
	}

	/// Drops a heap instance produced by [`Registry::create`] and frees its memory.
	pub fn destroy(&self, instance: Box<B>) {
		drop(instance);
	}

	/// Drops an instance produced by [`Registry::construct`] without freeing its storage.
	pub fn destruct(&self, instance: InPlace<'_, B>) {
		drop(instance);
	}

	/// Returns true if `name` is registered.
	pub fn contains(&self, name: &str) -> bool {
		self.entries.lock().contains_key(name)
	}

	/// Number of registered classes.
	pub fn len(&self) -> usize {
		self.entries.lock().len()
	}

	/// Returns true if nothing is registered.
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Registered names, sorted.
	pub fn names(&self) -> Vec<String> {
		let mut names: Vec<_> = self.entries.lock().keys().cloned().collect();
		names.sort_unstable();
		names
	}
}

impl<B: ?Sized> std::fmt::Debug for Registry<B> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Registry")
			.field("label", &self.label)
			.field("policy", &self.policy)
			.field("len", &self.len())
			.finish()
	}
}
