//! Concrete-type side of the registry contract.
//!
//! A concrete type becomes registrable under a base `B` by implementing
//! [`Class<B>`], usually through [`ioc_class!`](crate::ioc_class). The three
//! generic functions in this module are monomorphized per `(B, T)` pair and
//! become the callback triple stored in a [`ClassEntry`](crate::ClassEntry).

use std::alloc::Layout;
use std::ptr::NonNull;

/// A concrete type that can be produced as an instance of base `B`.
///
/// `into_base` and `upcast` exist because unsizing a generic `T` into an
/// arbitrary `B` cannot be expressed as a bound on stable Rust. Implementors
/// write the coercion for their concrete pair, which [`ioc_class!`](crate::ioc_class)
/// does mechanically.
///
/// # Safety
///
/// [`Class::upcast`] must return a pointer to the same object it was given:
/// the same address, with only the pointer metadata (such as a vtable) added.
/// The registry reads and drops the value through that pointer, so any other
/// pointer leads to use-after-free or a destructor running on the wrong object.
///
/// Implementations are not expected to be written by hand; [`ioc_class!`](crate::ioc_class)
/// emits them with a plain unsizing coercion. A safe `impl` does not compile:
///
/// ```compile_fail
/// use std::ptr::NonNull;
///
/// trait Base {}
/// struct Real;
/// impl Base for Real {}
///
/// impl ioc_registry::Class<dyn Base> for Real {
/// 	fn construct() -> Self {
/// 		Real
/// 	}
///
/// 	fn into_base(self: Box<Self>) -> Box<dyn Base> {
/// 		self
/// 	}
///
/// 	fn upcast(ptr: NonNull<Self>) -> NonNull<dyn Base> {
/// 		ptr
/// 	}
/// }
/// ```
pub unsafe trait Class<B: ?Sized>: Sized + 'static {
	/// Builds a fresh value of the concrete type.
	fn construct() -> Self;

	/// Upcasts a heap instance to the base type.
	fn into_base(self: Box<Self>) -> Box<B>;

	/// Upcasts a pointer to an initialized instance to the base type.
	///
	/// Must return a pointer to the same object; only metadata may change.
	/// See the trait-level safety contract.
	fn upcast(ptr: NonNull<Self>) -> NonNull<B>;
}

/// Allocates and constructs a `T`, returning it as a `B`.
pub fn allocate_construct<B, T>() -> Box<B>
where
	B: ?Sized,
	T: Class<B>,
{
	T::into_base(Box::new(T::construct()))
}

/// Constructs a `T` over `slot` and returns the base-typed pointer to it.
///
/// # Safety
///
/// `slot` must be valid for writes of `size_of::<T>()` bytes and aligned to
/// `align_of::<T>()`. Any value previously in `slot` is overwritten without
/// being dropped.
pub unsafe fn construct_in_place<B, T>(slot: NonNull<u8>) -> NonNull<B>
where
	B: ?Sized,
	T: Class<B>,
{
	let typed = slot.cast::<T>();
	// SAFETY: the caller guarantees size and alignment for `T`.
	unsafe { typed.as_ptr().write(T::construct()) };
	T::upcast(typed)
}

/// Reports the memory layout of `T`.
pub fn instance_layout<T>() -> Layout {
	Layout::new::<T>()
}
