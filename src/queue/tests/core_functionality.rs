//! Tests for notify/dispatch round trips on a live pool

#[cfg(test)]
mod tests {
    use crate::queue::tests::wait_until;
    use crate::queue::{EventQueuePool, DEFAULT_LOGICAL_CEILING, DEFAULT_RING_CAPACITY};
    use serial_test::serial;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    #[test]
    #[serial]
    fn test_notify_dispatches_in_fifo_order() {
        let pool: EventQueuePool<usize> = EventQueuePool::new();
        pool.create(0, 10_000).unwrap();

        let collected = Arc::new(Mutex::new(Vec::new()));
        for value in 0..200 {
            let collected = Arc::clone(&collected);
            pool.notify(
                0,
                value,
                Some(Box::new(move |data: usize| {
                    collected.lock().unwrap().push(data);
                    Ok(())
                })),
            )
            .unwrap();
        }

        assert!(
            wait_until(Duration::from_secs(5), || collected.lock().unwrap().len() == 200),
            "worker did not dispatch all notifications in time"
        );
        pool.destroy(0).unwrap();

        let collected = collected.lock().unwrap();
        assert_eq!(*collected, (0..200).collect::<Vec<_>>());
    }

    #[test]
    fn test_notify_without_callback_drops_data() {
        let pool: EventQueuePool<Arc<()>> = EventQueuePool::new();
        pool.create(0, 64).unwrap();

        let probe = Arc::new(());
        pool.notify(0, Arc::clone(&probe), None).unwrap();

        // The worker consumes the envelope and releases the payload even
        // though there is nothing to call.
        assert!(
            wait_until(Duration::from_secs(5), || Arc::strong_count(&probe) == 1),
            "payload of a callback-free notification was not released"
        );
        pool.destroy(0).unwrap();
    }

    #[test]
    fn test_getters_reflect_created_instance() {
        let pool: EventQueuePool<u8> = EventQueuePool::new();
        pool.create(3, 7).unwrap();

        assert!(pool.is_created(3));
        assert_eq!(pool.logical_ceiling(3), 7);
        assert_eq!(pool.occupied_count(3), 0);

        let stats = pool.stats(3);
        assert!(stats.created);
        assert_eq!(stats.ceiling, 7);
        assert_eq!(stats.occupied, 0);
        assert_eq!(stats.capacity, DEFAULT_RING_CAPACITY);

        pool.destroy(3).unwrap();
    }

    #[test]
    fn test_zero_ceiling_falls_back_to_default() {
        let pool: EventQueuePool<u8> = EventQueuePool::new();
        pool.create(0, 0).unwrap();
        assert_eq!(pool.logical_ceiling(0), DEFAULT_LOGICAL_CEILING);
        pool.destroy(0).unwrap();
    }

    #[test]
    #[serial]
    fn test_callback_failure_does_not_stop_worker() {
        let pool: EventQueuePool<u32> = EventQueuePool::new();
        pool.create(0, 64).unwrap();

        let dispatched = Arc::new(AtomicUsize::new(0));

        pool.notify(0, 1, Some(Box::new(|_| Err("dispatch failed".into()))))
            .unwrap();

        let dispatched_clone = Arc::clone(&dispatched);
        pool.notify(
            0,
            2,
            Some(Box::new(move |_| {
                dispatched_clone.fetch_add(1, Ordering::SeqCst);
                Ok(())
            })),
        )
        .unwrap();

        // The failed callback is swallowed; the one behind it still runs.
        assert!(
            wait_until(Duration::from_secs(5), || dispatched
                .load(Ordering::SeqCst)
                == 1),
            "worker stopped dispatching after a callback failure"
        );
        pool.destroy(0).unwrap();
    }

    #[test]
    #[serial]
    fn test_slow_instance_does_not_stall_another() {
        let pool: Arc<EventQueuePool<usize>> = Arc::new(EventQueuePool::new());
        pool.create(0, 64).unwrap();
        pool.create(1, 64).unwrap();

        // Block instance 0's worker inside a dispatch.
        let (release, gate) = std::sync::mpsc::channel::<()>();
        pool.notify(
            0,
            0,
            Some(Box::new(move |_| {
                gate.recv().ok();
                Ok(())
            })),
        )
        .unwrap();

        // Instance 1 keeps dispatching regardless.
        let dispatched = Arc::new(AtomicUsize::new(0));
        let dispatched_clone = Arc::clone(&dispatched);
        pool.notify(
            1,
            1,
            Some(Box::new(move |_| {
                dispatched_clone.fetch_add(1, Ordering::SeqCst);
                Ok(())
            })),
        )
        .unwrap();

        assert!(
            wait_until(Duration::from_secs(5), || dispatched
                .load(Ordering::SeqCst)
                == 1),
            "an unrelated instance was stalled by a blocked worker"
        );

        release.send(()).unwrap();
        pool.destroy(0).unwrap();
        pool.destroy(1).unwrap();
    }
}
