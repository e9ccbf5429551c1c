//! Caller-owned storage for in-place construction.
//!
//! [`Storage`] is an aligned, uninitialized region the caller allocates and
//! frees. [`InPlace`] is an instance living inside such a region: it borrows
//! the region for its whole life, runs the destructor on drop, and never frees
//! the memory.

use std::alloc::{self, Layout};
use std::marker::PhantomData;
use std::mem::MaybeUninit;
use std::ops::{Deref, DerefMut};
use std::ptr::{self, NonNull};
use std::{fmt, slice};

use crate::Registry;

/// Heap region with a fixed layout, owned by the caller.
///
/// The bytes start uninitialized. Dropping a `Storage` frees the region
/// without running any destructor over its contents.
pub struct Storage {
	ptr: NonNull<u8>,
	layout: Layout,
}

// SAFETY: `Storage` uniquely owns its bytes, like a `Box<[MaybeUninit<u8>]>`.
unsafe impl Send for Storage {}
// SAFETY: shared access only hands out `&[MaybeUninit<u8>]`.
unsafe impl Sync for Storage {}

impl Storage {
	/// Allocates an uninitialized region of `layout`.
	///
	/// Zero-sized layouts get a dangling, correctly aligned pointer and never
	/// reach the allocator.
	pub fn new(layout: Layout) -> Self {
		let ptr = if layout.size() == 0 {
			dangling_for(layout)
		} else {
			// SAFETY: size is non-zero.
			let raw = unsafe { alloc::alloc(layout) };
			match NonNull::new(raw) {
				Some(ptr) => ptr,
				None => alloc::handle_alloc_error(layout),
			}
		};
		Self { ptr, layout }
	}

	/// Allocates storage sized and aligned for the class registered as `name`.
	///
	/// Returns `None` when `name` is not registered.
	pub fn for_class<B: ?Sized>(registry: &Registry<B>, name: &str) -> Option<Self> {
		registry.layout(name).map(Self::new)
	}

	/// Layout the region was allocated with.
	pub fn layout(&self) -> Layout {
		self.layout
	}

	/// Size of the region in bytes.
	pub fn len(&self) -> usize {
		self.layout.size()
	}

	/// Returns true for a zero-sized region.
	pub fn is_empty(&self) -> bool {
		self.layout.size() == 0
	}
}

impl Deref for Storage {
	type Target = [MaybeUninit<u8>];

	fn deref(&self) -> &Self::Target {
		// SAFETY: `ptr` is valid for `size` bytes for as long as `self` lives.
		unsafe { slice::from_raw_parts(self.ptr.as_ptr().cast(), self.layout.size()) }
	}
}

impl DerefMut for Storage {
	fn deref_mut(&mut self) -> &mut Self::Target {
		// SAFETY: as above, and `&mut self` makes the access unique.
		unsafe { slice::from_raw_parts_mut(self.ptr.as_ptr().cast(), self.layout.size()) }
	}
}

impl Drop for Storage {
	fn drop(&mut self) {
		if self.layout.size() != 0 {
			// SAFETY: allocated in `new` with this exact layout.
			unsafe { alloc::dealloc(self.ptr.as_ptr(), self.layout) };
		}
	}
}

impl fmt::Debug for Storage {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Storage")
			.field("size", &self.layout.size())
			.field("align", &self.layout.align())
			.finish()
	}
}

fn dangling_for(layout: Layout) -> NonNull<u8> {
	// Alignment is a non-zero power of two, so the address is never null.
	NonNull::new(ptr::without_provenance_mut(layout.align())).unwrap_or(NonNull::dangling())
}

/// An instance constructed inside caller-owned storage.
///
/// Produced by [`Registry::construct`]. Holds the storage borrow for `'s`, so
/// the region cannot be reused or freed while the instance is alive. Dropping
/// it (or passing it to [`Registry::destruct`]) runs the destructor exactly
/// once and leaves the memory with the caller.
pub struct InPlace<'s, B: ?Sized> {
	ptr: NonNull<B>,
	_storage: PhantomData<&'s mut [MaybeUninit<u8>]>,
	_owns: PhantomData<B>,
}

impl<'s, B: ?Sized> InPlace<'s, B> {
	/// # Safety
	///
	/// `ptr` must point to an initialized `B` inside a region borrowed for `'s`,
	/// and nothing else may drop that value.
	pub(crate) unsafe fn from_raw(ptr: NonNull<B>) -> Self {
		Self {
			ptr,
			_storage: PhantomData,
			_owns: PhantomData,
		}
	}
}

impl<B: ?Sized> Deref for InPlace<'_, B> {
	type Target = B;

	fn deref(&self) -> &B {
		// SAFETY: initialized by the constructor and exclusively borrowed.
		unsafe { self.ptr.as_ref() }
	}
}

impl<B: ?Sized> DerefMut for InPlace<'_, B> {
	fn deref_mut(&mut self) -> &mut B {
		// SAFETY: as above.
		unsafe { self.ptr.as_mut() }
	}
}

impl<B: ?Sized> Drop for InPlace<'_, B> {
	fn drop(&mut self) {
		// SAFETY: the value is initialized and this is the only owner.
		unsafe { ptr::drop_in_place(self.ptr.as_ptr()) };
	}
}

impl<B: ?Sized> fmt::Debug for InPlace<'_, B> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("InPlace")
			.field("addr", &self.ptr.cast::<u8>())
			.finish_non_exhaustive()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn storage_respects_layout() {
		let layout = Layout::from_size_align(24, 16).unwrap();
		let storage = Storage::new(layout);
		assert_eq!(storage.len(), 24);
		assert_eq!(storage.as_ptr() as usize % 16, 0);
	}

	#[test]
	fn zero_sized_storage_is_aligned() {
		let layout = Layout::from_size_align(0, 64).unwrap();
		let storage = Storage::new(layout);
		assert!(storage.is_empty());
		assert_eq!(storage.as_ptr() as usize % 64, 0);
	}
}
