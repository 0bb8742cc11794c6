use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

use irqueue::{consume, pace, produce, BoundedQueue, Harness, HarnessConfig, QueueConfig};

#[test]
fn reference_run() {
    let config = HarnessConfig {
        producer_pace: pace().spin(50).forever(),
        consumer_pace: pace().spin(50).forever(),
        ..HarnessConfig::default()
    };
    let report = Harness::new(config).unwrap().run().unwrap();

    assert_eq!(report.producer.attempts, 10_000);
    assert_eq!(report.consumer.attempts, 10_000);
    assert_eq!(report.producer.successes + report.producer.failures, 10_000);
    assert_eq!(report.consumer.successes + report.consumer.failures, 10_000);
    assert!(report.drained.len() <= 3);
    assert_eq!(
        report.producer.successes,
        report.consumer.successes + report.drained.len()
    );
    report.verify().unwrap();
}

#[test]
fn unpaced_stress() {
    let config = HarnessConfig {
        queue: QueueConfig { capacity: 3 },
        attempts: 10_000,
        producer_pace: pace().forever(),
        consumer_pace: pace().forever(),
        ..HarnessConfig::default()
    };
    let report = Harness::new(config).unwrap().run().unwrap();
    report.verify().unwrap();
}

#[test]
fn larger_queue() {
    let config = HarnessConfig::from_json(r#"{ "queue": { "capacity": 64 }, "attempts": 2000, "values": [10, 20, 30] }"#).unwrap();
    let report = Harness::new(config).unwrap().run().unwrap();

    assert!(report.producer.values.iter().all(|v| [10, 20, 30].contains(v)));
    report.verify().unwrap();
}

#[test]
fn independent_queues() {
    let a = BoundedQueue::new(3).unwrap();
    let b = BoundedQueue::new(3).unwrap();

    assert!(a.try_put(1u32));
    assert!(b.get().is_none());
    assert!(b.try_put(2));
    assert_eq!(a.get(), Some(1));
    assert_eq!(b.get(), Some(2));
}

#[test]
fn shared_through_arc() {
    let queue = Arc::new(BoundedQueue::<u32>::new(3).unwrap());
    let producer_queue = Arc::clone(&queue);

    let producer = thread::spawn(move || produce(&producer_queue, &[1, 2, 3, 4, 5, 6, 7, 8, 9], 10_000, pace().forever()));
    let consumed = consume(&queue, 10_000, pace().forever());
    let produced = producer.join().unwrap();

    let drained = std::iter::from_fn(|| queue.get()).collect::<Vec<_>>();
    let received = consumed.values.iter().chain(&drained).copied().collect::<Vec<_>>();
    assert_eq!(produced.values, received);
}

// Several producers are not a supported use, but the lock still has to keep
// every value accounted for.
#[test]
fn many_producers_lose_nothing() {
    let queue = BoundedQueue::<u32>::new(3).unwrap();
    let put = AtomicUsize::new(0);
    let got = AtomicUsize::new(0);

    thread::scope(|s| {
        for _ in 0..4 {
            s.spawn(|| {
                for value in 0..2_000 {
                    if queue.try_put(value) {
                        put.fetch_add(1, Ordering::Relaxed);
                    }
                }
            });
        }
        s.spawn(|| {
            for _ in 0..8_000 {
                if queue.get().is_some() {
                    got.fetch_add(1, Ordering::Relaxed);
                }
            }
        });
    });

    let drained = std::iter::from_fn(|| queue.get()).count();
    assert!(drained <= 3);
    assert_eq!(put.into_inner(), got.into_inner() + drained);
}
