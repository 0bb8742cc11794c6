//! Fixed capacity FIFO shared between a producer that must never stall and a
//! consumer that is allowed to block.
//!
//! ```
//! use irqueue::BoundedQueue;
//!
//! let queue = BoundedQueue::<u32>::new(3).unwrap();
//! assert!(queue.try_put(1));
//! assert!(queue.try_put(2));
//!
//! assert_eq!(queue.get(), Some(1));
//! assert_eq!(queue.get(), Some(2));
//! assert_eq!(queue.get(), None);
//! ```
use std::sync::{Mutex, MutexGuard, PoisonError, TryLockError};

use crate::config::QueueConfig;
use crate::error::{Error, Result};

#[derive(Debug)]
struct Ring<T> {
    slots: Box<[Option<T>]>,
    // Next slot to read
    head: usize,
    // Next slot to write
    tail: usize,
    count: usize,
}

impl<T> Ring<T> {
    fn with_capacity(cap: usize) -> Self {
        Self {
            slots: (0..cap).map(|_| None).collect(),
            head: 0,
            tail: 0,
            count: 0,
        }
    }

    fn cap(&self) -> usize {
        self.slots.len()
    }

    fn push(&mut self, value: T) -> std::result::Result<(), T> {
        if self.count == self.cap() {
            return Err(value);
        }

        self.slots[self.tail] = Some(value);
        self.tail = (self.tail + 1) % self.cap();
        self.count += 1;
        Ok(())
    }

    fn pop(&mut self) -> Option<T> {
        if self.count == 0 {
            return None;
        }

        let value = self.slots[self.head].take();
        debug_assert!(value.is_some(), "occupied slot was empty");
        self.head = (self.head + 1) % self.cap();
        self.count -= 1;
        value
    }
}

/// A fixed capacity ring buffer guarded by a single mutex.
///
/// [`try_put`](BoundedQueue::try_put) only ever *tries* to take the lock and
/// gives up straight away if someone else holds it, which makes it usable from
/// a context that must not block (an interrupt handler, an audio callback).
/// [`get`](BoundedQueue::get) takes the lock the regular way and may wait for it.
///
/// Neither operation waits for data or space: a full queue, an empty queue and
/// a contended lock are all reported as a plain failure and the caller retries.
#[derive(Debug)]
pub struct BoundedQueue<T> {
    cap: usize,
    ring: Mutex<Ring<T>>,
}

impl<T> BoundedQueue<T> {
    /// Create a queue with room for `capacity` values.
    ///
    /// Returns `Error::ZeroCapacity` if `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(Error::ZeroCapacity);
        }

        Ok(Self {
            cap: capacity,
            ring: Mutex::new(Ring::with_capacity(capacity)),
        })
    }

    /// Create a queue from a [`QueueConfig`]
    pub fn from_config(config: &QueueConfig) -> Result<Self> {
        Self::new(config.capacity)
    }

    /// Put a value at the back of the queue without ever blocking.
    ///
    /// Returns `false` if the lock is currently held by someone else or if the
    /// queue is full. In both cases the value is discarded and the queue is left
    /// untouched.
    pub fn try_put(&self, value: T) -> bool {
        // Nothing on this path may log or block.
        let mut ring = match self.ring.try_lock() {
            Ok(ring) => ring,
            Err(TryLockError::WouldBlock) => return false,
            Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner(),
        };
        let pushed = ring.push(value);
        drop(ring);
        // A rejected value is dropped here, after the lock is released
        pushed.is_ok()
    }

    /// Take the value at the front of the queue.
    ///
    /// This waits for the lock but not for data: `None` is returned straight
    /// away if the queue is empty.
    pub fn get(&self) -> Option<T> {
        self.lock().pop()
    }

    /// Same as [`get`](BoundedQueue::get) but writes the value into `out`.
    ///
    /// `out` is left as is when the queue is empty.
    pub fn get_into(&self, out: &mut T) -> bool {
        match self.get() {
            Some(value) => {
                *out = value;
                true
            }
            None => false,
        }
    }

    /// The number of slots in the queue
    pub fn capacity(&self) -> usize {
        self.cap
    }

    /// The number of values currently held.
    ///
    /// This takes the lock and can block, so don't call it from the producer side.
    pub fn len(&self) -> usize {
        self.lock().count
    }

    /// `true` if the queue holds no values (blocking, see [`len`](BoundedQueue::len))
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `true` if every slot is taken (blocking, see [`len`](BoundedQueue::len))
    pub fn is_full(&self) -> bool {
        self.len() == self.cap
    }

    // The ring is never left half updated (no critical section can panic
    // between two field writes), so a poisoned lock is still consistent.
    fn lock(&self) -> MutexGuard<'_, Ring<T>> {
        self.ring.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
