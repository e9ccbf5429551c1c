use std::alloc::Layout;
use std::fmt;
use std::ptr::NonNull;

use crate::class::{self, Class};

/// Type-erased construction capabilities for one registered class.
///
/// All three callbacks must describe the same concrete type. [`ClassEntry::of`]
/// guarantees this; [`ClassEntry::new`] leaves it to the caller.
pub struct ClassEntry<B: ?Sized> {
	allocate_construct: fn() -> Box<B>,
	construct_in_place: unsafe fn(NonNull<u8>) -> NonNull<B>,
	instance_layout: fn() -> Layout,
}

impl<B: ?Sized> ClassEntry<B> {
	/// Builds the entry for concrete type `T`.
	pub fn of<T: Class<B>>() -> Self {
		Self {
			allocate_construct: class::allocate_construct::<B, T>,
			construct_in_place: class::construct_in_place::<B, T>,
			instance_layout: class::instance_layout::<T>,
		}
	}

	/// Builds an entry from hand-written callbacks.
	///
	/// # Safety
	///
	/// `construct_in_place` must write at most `instance_layout().size()` bytes,
	/// require no more than `instance_layout().align()` alignment, and return a
	/// pointer to the value it initialized. `allocate_construct` must produce the
	/// same concrete type.
	pub const unsafe fn new(
		allocate_construct: fn() -> Box<B>,
		construct_in_place: unsafe fn(NonNull<u8>) -> NonNull<B>,
		instance_layout: fn() -> Layout,
	) -> Self {
		Self {
			allocate_construct,
			construct_in_place,
			instance_layout,
		}
	}

	/// Allocates and constructs a new instance.
	pub fn allocate(&self) -> Box<B> {
		(self.allocate_construct)()
	}

	/// Constructs an instance over `slot`.
	///
	/// # Safety
	///
	/// `slot` must be valid for writes of [`Self::layout`] and aligned to it.
	pub(crate) unsafe fn construct_at(&self, slot: NonNull<u8>) -> NonNull<B> {
		// SAFETY: forwarded to the caller.
		unsafe { (self.construct_in_place)(slot) }
	}

	/// Layout of the concrete type.
	pub fn layout(&self) -> Layout {
		(self.instance_layout)()
	}

	/// Exact byte size of the concrete type.
	pub fn instance_size(&self) -> usize {
		self.layout().size()
	}
}

impl<B: ?Sized> Clone for ClassEntry<B> {
	fn clone(&self) -> Self {
		*self
	}
}

impl<B: ?Sized> Copy for ClassEntry<B> {}

impl<B: ?Sized> fmt::Debug for ClassEntry<B> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let layout = self.layout();
		f.debug_struct("ClassEntry")
			.field("size", &layout.size())
			.field("align", &layout.align())
			.finish_non_exhaustive()
	}
}
