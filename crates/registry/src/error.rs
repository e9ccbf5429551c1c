use std::collections::TryReserveError;

/// Failure to add a class to a registry. The table is left unchanged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistrationError {
	/// The name is already registered and the policy rejects duplicates.
	#[error("duplicate class name in {registry}: {name:?}")]
	DuplicateKey { registry: &'static str, name: String },

	/// Class names must be non-empty.
	#[error("empty class name in {registry}")]
	EmptyName { registry: &'static str },

	/// The table could not grow to hold the new entry.
	#[error("registry {registry} could not grow: {source}")]
	AllocationFailure {
		registry: &'static str,
		#[source]
		source: TryReserveError,
	},
}

/// Failure to construct a class over caller storage.
///
/// Every variant except [`ConstructError::Faulted`] is reported before any
/// constructor runs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConstructError {
	#[error("class not found: {name:?}")]
	NotFound { name: String },

	#[error("storage too small for {name:?}: need {required} bytes, got {provided}")]
	StorageTooSmall {
		name: String,
		required: usize,
		provided: usize,
	},

	#[error("storage for {name:?} is not aligned to {align} bytes")]
	Misaligned { name: String, align: usize },

	/// The constructor panicked. The storage holds no live value.
	#[error("constructor for {name:?} panicked: {message}")]
	Faulted { name: String, message: String },
}

impl ConstructError {
	/// Returns true when the name was simply not registered.
	pub fn is_not_found(&self) -> bool {
		matches!(self, Self::NotFound { .. })
	}
}
