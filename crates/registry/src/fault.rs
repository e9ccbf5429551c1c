use std::any::Any;

/// Extracts a readable message from a panic payload.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
	if let Some(s) = payload.downcast_ref::<&'static str>() {
		(*s).to_string()
	} else if let Some(s) = payload.downcast_ref::<String>() {
		s.clone()
	} else {
		"non-string panic payload".to_string()
	}
}

#[cfg(test)]
mod tests {
	use std::any::Any;
	use std::panic::{self, UnwindSafe};

	use super::panic_message;

	fn payload_of(f: impl FnOnce() + UnwindSafe) -> Box<dyn Any + Send> {
		panic::catch_unwind(f).expect_err("closure should panic")
	}

	#[test]
	fn extracts_static_str_payload() {
		let err = payload_of(|| panic!("boom-str"));
		assert_eq!(panic_message(&*err), "boom-str");
	}

	#[test]
	fn extracts_string_payload() {
		let err = payload_of(|| panic!("{}", String::from("boom-string")));
		assert_eq!(panic_message(&*err), "boom-string");
	}

	#[test]
	fn falls_back_for_other_payloads() {
		let err = payload_of(|| panic::panic_any(42_u8));
		assert_eq!(panic_message(&*err), "non-string panic payload");
	}
}
