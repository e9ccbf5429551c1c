/// How [`Registry::add`](crate::Registry::add) treats a name that is already registered.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum DuplicatePolicy {
	/// Keep the existing entry and report [`RegistrationError::DuplicateKey`](crate::RegistrationError::DuplicateKey).
	#[default]
	Reject,
	/// Swap in the new entry as a whole.
	Replace,
}

impl DuplicatePolicy {
	pub(crate) const fn as_str(self) -> &'static str {
		match self {
			Self::Reject => "reject",
			Self::Replace => "replace",
		}
	}
}

impl std::fmt::Display for DuplicatePolicy {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}
