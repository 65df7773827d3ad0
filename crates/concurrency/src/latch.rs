//! Spin latch for short critical sections
//!
//! Tracker critical sections are a handful of instructions (a B-tree insert or
//! remove, or a vector swap), so waiting on a kernel queue costs more than the
//! work it protects. `RawSpinLatch` plugs into `parking_lot::lock_api` so the
//! latch gets the usual RAII guard API while only ever spinning.
//!
//! Contended acquires back off exponentially with `spin_loop` hints and then
//! yield the thread, so a preempted holder is not starved by its waiters.

use parking_lot::lock_api::{self, GuardSend};
use std::sync::atomic::{AtomicBool, Ordering};

/// Spin iterations are `1 << step` up to this step, then the waiter yields
const SPIN_LIMIT: u32 = 6;

/// Raw spin lock implementing `lock_api::RawMutex`
#[derive(Debug)]
pub struct RawSpinLatch {
    locked: AtomicBool,
}

/// Mutex that spins instead of parking
pub type SpinLatch<T> = lock_api::Mutex<RawSpinLatch, T>;

/// RAII guard for [`SpinLatch`]
pub type SpinLatchGuard<'a, T> = lock_api::MutexGuard<'a, RawSpinLatch, T>;

// Safety: `try_lock` only succeeds on a false -> true transition with Acquire
// ordering and `unlock` publishes with Release, so at most one guard exists.
unsafe impl lock_api::RawMutex for RawSpinLatch {
    #[allow(clippy::declare_interior_mutable_const)]
    const INIT: RawSpinLatch = RawSpinLatch {
        locked: AtomicBool::new(false),
    };

    type GuardMarker = GuardSend;

    fn lock(&self) {
        let mut step = 0u32;
        while !self.try_lock() {
            // Wait on a plain load so contended waiters don't bounce the line
            while self.locked.load(Ordering::Relaxed) {
                if step <= SPIN_LIMIT {
                    for _ in 0..(1u32 << step) {
                        std::hint::spin_loop();
                    }
                    step += 1;
                } else {
                    std::thread::yield_now();
                }
            }
        }
    }

    fn try_lock(&self) -> bool {
        self.locked
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_ok()
    }

    unsafe fn unlock(&self) {
        self.locked.store(false, Ordering::Release);
    }

    fn is_locked(&self) -> bool {
        self.locked.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_lock_and_unlock() {
        let latch = SpinLatch::new(0u64);
        {
            let mut guard = latch.lock();
            *guard += 1;
            assert!(latch.is_locked());
        }
        assert!(!latch.is_locked());
        assert_eq!(*latch.lock(), 1);
    }

    #[test]
    fn test_try_lock_fails_while_held() {
        let latch = SpinLatch::new(());
        let guard = latch.lock();
        assert!(latch.try_lock().is_none());
        drop(guard);
        assert!(latch.try_lock().is_some());
    }

    #[test]
    fn test_no_poison_after_panic() {
        let latch = Arc::new(SpinLatch::new(5u32));
        let latch_clone = Arc::clone(&latch);
        let result = thread::spawn(move || {
            let _guard = latch_clone.lock();
            panic!("holder panics");
        })
        .join();
        assert!(result.is_err());

        // Guard was dropped during unwind
        assert!(!latch.is_locked());
        assert_eq!(*latch.lock(), 5);
    }

    #[test]
    fn test_mutual_exclusion_under_contention() {
        let latch = Arc::new(SpinLatch::new(0u64));
        let threads = 8;
        let per_thread = 10_000;

        let handles: Vec<_> = (0..threads)
            .map(|_| {
                let latch = Arc::clone(&latch);
                thread::spawn(move || {
                    for _ in 0..per_thread {
                        *latch.lock() += 1;
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(*latch.lock(), threads * per_thread);
    }
}
