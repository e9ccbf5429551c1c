//! Registration and construction from many threads under the table lock.

use std::sync::Arc;
use std::thread;

use ioc_registry::{ClassEntry, Registry, ioc_class};
use {parking_lot as _, pretty_assertions as _, proptest as _, rstest as _, rustc_hash as _, thiserror as _, tracing as _, tracing_subscriber as _};

trait Numbered: Send {
	fn number(&self) -> usize;
}

#[derive(Default)]
struct Even;

impl Numbered for Even {
	fn number(&self) -> usize {
		0
	}
}

#[derive(Default)]
struct Odd;

impl Numbered for Odd {
	fn number(&self) -> usize {
		1
	}
}

ioc_class!(dyn Numbered => Even, Odd);

const THREADS: usize = 8;
const PER_THREAD: usize = 64;

fn entry_for(i: usize) -> ClassEntry<dyn Numbered> {
	if i % 2 == 0 { ClassEntry::of::<Even>() } else { ClassEntry::of::<Odd>() }
}

#[test]
fn concurrent_add_then_create_loses_nothing() {
	let registry: Arc<Registry<dyn Numbered>> = Arc::new(Registry::new("numbered"));

	let writers: Vec<_> = (0..THREADS)
		.map(|t| {
			let registry = Arc::clone(&registry);
			thread::spawn(move || {
				for k in 0..PER_THREAD {
					let i = t * PER_THREAD + k;
					registry.add(format!("class-{i}"), entry_for(i)).expect("names are distinct");
				}
			})
		})
		.collect();
	for handle in writers {
		handle.join().unwrap();
	}
	assert_eq!(registry.len(), THREADS * PER_THREAD);

	let readers: Vec<_> = (0..THREADS)
		.map(|t| {
			let registry = Arc::clone(&registry);
			thread::spawn(move || {
				let mut created = 0;
				for i in (t..THREADS * PER_THREAD).step_by(THREADS) {
					let instance = registry.create(&format!("class-{i}")).expect("registered above");
					assert_eq!(instance.number(), i % 2, "class-{i} has the wrong type");
					registry.destroy(instance);
					created += 1;
				}
				created
			})
		})
		.collect();
	let total: usize = readers.into_iter().map(|h| h.join().unwrap()).sum();
	assert_eq!(total, THREADS * PER_THREAD);
}

#[test]
fn racing_duplicates_admit_exactly_one() {
	let registry: Arc<Registry<dyn Numbered>> = Arc::new(Registry::new("numbered"));

	let handles: Vec<_> = (0..THREADS)
		.map(|t| {
			let registry = Arc::clone(&registry);
			thread::spawn(move || registry.add("contested", entry_for(t)).is_ok())
		})
		.collect();
	let winners = handles.into_iter().map(|h| h.join().unwrap()).filter(|ok| *ok).count();

	assert_eq!(winners, 1);
	assert_eq!(registry.len(), 1);
	assert!(registry.create("contested").is_some());
}
