// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use crate::util::Spinlock;
use std::cell::Cell;
use std::mem::ManuallyDrop;
use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicUsize, Ordering};

const NUM_SEGMENTS: usize = 16;

/// Idle items kept per segment; anything returned beyond this is dropped.
const MAX_IDLE_PER_SEGMENT: usize = 64;

static NEXT_SEGMENT: AtomicUsize = AtomicUsize::new(0);

thread_local! {
    static SEGMENT_INDEX: Cell<usize> =
        Cell::new(NEXT_SEGMENT.fetch_add(1, Ordering::Relaxed) % NUM_SEGMENTS);
}

struct Segment<T> {
    idle: Spinlock<Vec<T>>,
}

/// Segmented free list. Each thread sticks to one segment, so concurrent
/// callers rarely contend on the same lock.
pub struct Pool<T> {
    segments: [Segment<T>; NUM_SEGMENTS],
    factory: Box<dyn Fn() -> T + Send + Sync>,
    recycle: fn(&mut T),
}

impl<T> Pool<T> {
    /// `recycle` runs on every returned item before it becomes idle.
    pub fn new<F>(factory: F, recycle: fn(&mut T)) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        Pool {
            segments: std::array::from_fn(|_| Segment {
                idle: Spinlock::new(Vec::new()),
            }),
            factory: Box::new(factory),
            recycle,
        }
    }

    /// Takes an idle item, or makes a new one. The item goes back when the
    /// guard drops.
    #[inline]
    pub fn acquire(&self) -> PoolGuard<'_, T> {
        let segment = SEGMENT_INDEX.with(|idx| idx.get());
        let item = self.segments[segment]
            .idle
            .lock()
            .pop()
            .unwrap_or_else(|| (self.factory)());
        PoolGuard {
            pool: self,
            segment,
            item: ManuallyDrop::new(item),
        }
    }

    /// Runs `handler` with an exclusively owned item.
    #[inline(always)]
    pub fn borrow_mut<R>(&self, handler: impl FnOnce(&mut T) -> R) -> R {
        let mut guard = self.acquire();
        handler(&mut guard)
    }

    /// Items currently waiting in the pool.
    pub fn idle(&self) -> usize {
        self.segments.iter().map(|s| s.idle.lock().len()).sum()
    }

    fn release(&self, segment: usize, mut item: T) {
        (self.recycle)(&mut item);
        let mut idle = self.segments[segment].idle.lock();
        if idle.len() < MAX_IDLE_PER_SEGMENT {
            idle.push(item);
        }
    }
}

/// Exclusive handle on a pooled item.
///
/// The item returns to the pool exactly once, when the guard drops; the
/// borrow checker rules out any access after that.
pub struct PoolGuard<'a, T> {
    pool: &'a Pool<T>,
    segment: usize,
    item: ManuallyDrop<T>,
}

impl<T> Deref for PoolGuard<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.item
    }
}

impl<T> DerefMut for PoolGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.item
    }
}

impl<T> Drop for PoolGuard<'_, T> {
    fn drop(&mut self) {
        // SAFETY: `item` is never touched again after this point.
        let item = unsafe { ManuallyDrop::take(&mut self.item) };
        self.pool.release(self.segment, item);
    }
}
