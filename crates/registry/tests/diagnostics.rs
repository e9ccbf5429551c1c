//! Construction faults surface as `tracing` warnings, not as panics.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use ioc_registry::{Registry, ioc_class, ioc_register};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};
use {parking_lot as _, pretty_assertions as _, proptest as _, rstest as _, rustc_hash as _, thiserror as _};

#[derive(Clone, Default)]
struct WarnCounter(Arc<AtomicUsize>);

impl<S: Subscriber> Layer<S> for WarnCounter {
	fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
		if *event.metadata().level() == Level::WARN {
			self.0.fetch_add(1, Ordering::SeqCst);
		}
	}
}

trait Service {
	fn ready(&self) -> bool;
}

struct Faulty;

impl Service for Faulty {
	fn ready(&self) -> bool {
		false
	}
}

#[derive(Default)]
struct Healthy;

impl Service for Healthy {
	fn ready(&self) -> bool {
		true
	}
}

ioc_class!(dyn Service => Faulty = panic!("backend unavailable"));
ioc_class!(dyn Service => Healthy);

#[test]
fn construction_fault_logs_one_warning() {
	let counter = WarnCounter::default();
	let subscriber = tracing_subscriber::registry().with(counter.clone());

	tracing::subscriber::with_default(subscriber, || {
		let registry: Registry<dyn Service> = Registry::new("services");
		ioc_register!(registry, Faulty).unwrap();
		ioc_register!(registry, Healthy).unwrap();

		assert!(registry.create("Faulty").is_none());
		assert_eq!(counter.0.load(Ordering::SeqCst), 1);

		assert!(registry.create("Healthy").is_some_and(|s| s.ready()));
		assert!(registry.create("Unknown").is_none());
		assert_eq!(counter.0.load(Ordering::SeqCst), 1, "misses are not warnings");
	});
}

#[test]
fn rejected_duplicate_logs_warning() {
	let counter = WarnCounter::default();
	let subscriber = tracing_subscriber::registry().with(counter.clone());

	tracing::subscriber::with_default(subscriber, || {
		let registry: Registry<dyn Service> = Registry::new("services");
		ioc_register!(registry, Healthy).unwrap();
		assert!(ioc_register!(registry, Healthy).is_err());
	});

	assert_eq!(counter.0.load(Ordering::SeqCst), 1);
}
