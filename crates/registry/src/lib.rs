//! Runtime class registry.
//!
//! A [`Registry<B>`] maps string names to construction capabilities for a
//! family of concrete types sharing the base `B` (usually `dyn Trait`).
//! Callers create, placement-construct, size, and release instances by name
//! without knowing the concrete type.
//!
//! # Usage
//!
//! ```
//! use ioc_registry::{Registry, ioc_class, ioc_register};
//!
//! trait Plugin {
//! 	fn name(&self) -> &'static str;
//! }
//!
//! #[derive(Default)]
//! struct Echo;
//!
//! impl Plugin for Echo {
//! 	fn name(&self) -> &'static str {
//! 		"echo"
//! 	}
//! }
//!
//! ioc_class!(dyn Plugin => Echo);
//!
//! let plugins: Registry<dyn Plugin> = Registry::new("plugins");
//! ioc_register!(plugins, Echo).unwrap();
//!
//! let echo = plugins.create("Echo").unwrap();
//! assert_eq!(echo.name(), "echo");
//! plugins.destroy(echo);
//!
//! assert!(plugins.create("Missing").is_none());
//! ```
//!
//! # Two ownership modes
//!
//! | Produced by | Type | Released by | Frees memory |
//! |-------------|------|-------------|--------------|
//! | [`Registry::create`] | `Box<B>` | [`Registry::destroy`] | yes |
//! | [`Registry::construct`] | [`InPlace<'s, B>`] | [`Registry::destruct`] | no, the caller owns [`Storage`] |
//!
//! # Failure model
//!
//! - Unknown names are routine: `None` or [`ConstructError::NotFound`].
//! - Constructor panics are caught and logged through `tracing`; `create`
//!   reports them as `None`.
//! - Duplicate names are rejected by default ([`DuplicatePolicy`]).
//! - Undersized or misaligned storage is a checked [`ConstructError`].

#[cfg(test)]
use {proptest as _, tracing_subscriber as _};

mod class;
mod entry;
mod error;
mod fault;
mod macros;
mod policy;
mod registry;
mod storage;

pub use class::{Class, allocate_construct, construct_in_place, instance_layout};
pub use entry::ClassEntry;
pub use error::{ConstructError, RegistrationError};
pub use policy::DuplicatePolicy;
pub use registry::Registry;
pub use storage::{InPlace, Storage};
