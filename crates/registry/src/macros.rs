//! Registration sugar over [`Class`](crate::Class) and [`Registry::add`](crate::Registry::add).

/// Declares concrete types as classes of a base type.
///
/// ```
/// trait Shape {
/// 	fn area(&self) -> f64;
/// }
///
/// #[derive(Default)]
/// struct Square;
///
/// impl Shape for Square {
/// 	fn area(&self) -> f64 {
/// 		1.0
/// 	}
/// }
///
/// struct Circle(f64);
///
/// impl Shape for Circle {
/// 	fn area(&self) -> f64 {
/// 		3.0 * self.0 * self.0
/// 	}
/// }
///
/// ioc_registry::ioc_class!(dyn Shape => Square);
/// ioc_registry::ioc_class!(dyn Shape => Circle = Circle(2.0));
/// ```
///
/// Without `= expr` the class is built with [`Default`].
///
/// The generated `unsafe impl` upholds the [`Class`](crate::Class) safety
/// contract: `upcast` is a plain unsizing coercion of the pointer it receives.
#[macro_export]
macro_rules! ioc_class {
	($base:ty => $concrete:ty = $ctor:expr) => {
		// SAFETY: `upcast` returns its argument, coerced; only metadata changes.
		unsafe impl $crate::Class<$base> for $concrete {
			fn construct() -> Self {
				$ctor
			}

			fn into_base(self: ::std::boxed::Box<Self>) -> ::std::boxed::Box<$base> {
				self
			}

			fn upcast(ptr: ::core::ptr::NonNull<Self>) -> ::core::ptr::NonNull<$base> {
				ptr
			}
		}
	};
	($base:ty => $($concrete:ty),+ $(,)?) => {
		$(
			$crate::ioc_class!($base => $concrete = <$concrete as ::core::default::Default>::default());
		)+
	};
}

/// Registers a class under its own type name (or an explicit one).
///
/// Expands to [`Registry::add`](crate::Registry::add) and evaluates to its
/// `Result`. The implicit key is the bare type identifier, so a class named
/// through a path (`shapes::Square`) must be given an explicit key with `as`.
///
/// ```
/// use ioc_registry::{Registry, ioc_class, ioc_register};
///
/// trait Shape {}
///
/// #[derive(Default)]
/// struct Square;
/// impl Shape for Square {}
///
/// mod round {
/// 	#[derive(Default)]
/// 	pub struct Circle;
/// 	impl super::Shape for Circle {}
/// }
///
/// ioc_class!(dyn Shape => Square, round::Circle);
///
/// # fn main() {
/// let shapes: Registry<dyn Shape> = Registry::new("shapes");
/// ioc_register!(shapes, Square).unwrap();
/// ioc_register!(shapes, round::Circle as "Circle").unwrap();
/// assert_eq!(shapes.names(), ["Circle", "Square"]);
/// # }
/// ```
#[macro_export]
macro_rules! ioc_register {
	($registry:expr, $concrete:ty as $name:expr) => {
		$registry.add($name, $crate::ClassEntry::<_>::of::<$concrete>())
	};
	($registry:expr, $concrete:ident) => {
		$registry.add(::core::stringify!($concrete), $crate::ClassEntry::<_>::of::<$concrete>())
	};
}

/// Declares a process-wide registry for a base type.
///
/// The static's name doubles as the registry label.
///
/// ```
/// use ioc_registry::{DuplicatePolicy, ioc_registry};
///
/// trait Shape {}
/// trait Plugin {}
///
/// ioc_registry!(pub static SHAPES: dyn Shape);
/// ioc_registry!(static PLUGINS: dyn Plugin = DuplicatePolicy::Replace);
///
/// assert_eq!(SHAPES.label(), "SHAPES");
/// assert_eq!(PLUGINS.policy(), DuplicatePolicy::Replace);
/// ```
#[macro_export]
macro_rules! ioc_registry {
	($(#[$attr:meta])* $vis:vis static $name:ident : $base:ty = $policy:expr $(;)?) => {
		$(#[$attr])*
		$vis static $name: $crate::Registry<$base> = $crate::Registry::with_policy(::core::stringify!($name), $policy);
	};
	($(#[$attr:meta])* $vis:vis static $name:ident : $base:ty $(;)?) => {
		$(#[$attr])*
		$vis static $name: $crate::Registry<$base> = $crate::Registry::new(::core::stringify!($name));
	};
}
