use crossbeam_utils::thread;
use std::num::NonZeroUsize;
use std::panic;

/// Provides multithreading dispatch primitives and a thread count.
///
/// Callers do not need a load balancing for loop here. All that's needed is a way to jumpstart some threads;
/// users of the dispatcher do their own domain specific work distribution. This keeps it easy to wrap
/// whatever thread pool an application already has.
pub trait IThreadDispatcher: Send + Sync {
    /// Gets the number of workers available in the thread dispatcher.
    fn thread_count(&self) -> usize;

    /// Invokes `worker_body` once on each of `min(thread_count, maximum_worker_count)` workers and returns
    /// every worker's output, ordered by worker index. Blocks until all workers finish.
    ///
    /// A panic inside a worker is resumed on the calling thread once the dispatch has joined.
    fn dispatch_workers<F, R>(&self, worker_body: F, maximum_worker_count: usize) -> Vec<R>
    where
        F: Fn(usize) -> R + Sync,
        R: Send;
}

/// Dispatcher that spawns scoped threads for each dispatch.
#[derive(Debug, Clone, Copy)]
pub struct SimpleThreadDispatcher {
    thread_count: usize,
}

impl SimpleThreadDispatcher {
    /// Creates a dispatcher that will use at most `thread_count` workers. A count of zero is treated as one.
    pub fn new(thread_count: usize) -> Self {
        Self {
            thread_count: thread_count.max(1),
        }
    }
}

impl Default for SimpleThreadDispatcher {
    fn default() -> Self {
        Self::new(
            std::thread::available_parallelism()
                .map(NonZeroUsize::get)
                .unwrap_or(1),
        )
    }
}

impl IThreadDispatcher for SimpleThreadDispatcher {
    fn thread_count(&self) -> usize {
        self.thread_count
    }

    fn dispatch_workers<F, R>(&self, worker_body: F, maximum_worker_count: usize) -> Vec<R>
    where
        F: Fn(usize) -> R + Sync,
        R: Send,
    {
        let worker_count = self.thread_count.min(maximum_worker_count);
        if worker_count <= 1 {
            // No point in paying for a spawn; the calling thread is worker zero.
            return (0..worker_count).map(&worker_body).collect();
        }
        let worker_body = &worker_body;
        thread::scope(|scope| {
            let handles: Vec<_> = (0..worker_count)
                .map(|worker_index| scope.spawn(move |_| worker_body(worker_index)))
                .collect();
            handles
                .into_iter()
                .map(|handle| handle.join().unwrap_or_else(|payload| panic::resume_unwind(payload)))
                .collect()
        })
        .unwrap_or_else(|payload| panic::resume_unwind(payload))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_every_worker_runs_once() {
        let dispatcher = SimpleThreadDispatcher::new(4);
        let counter = AtomicUsize::new(0);
        let indices = dispatcher.dispatch_workers(
            |worker_index| {
                counter.fetch_add(1, Ordering::Relaxed);
                worker_index
            },
            usize::MAX,
        );
        assert_eq!(indices, vec![0, 1, 2, 3]);
        assert_eq!(counter.load(Ordering::Relaxed), 4);
    }

    #[test]
    fn test_maximum_worker_count_limits_dispatch() {
        let dispatcher = SimpleThreadDispatcher::new(8);
        assert_eq!(dispatcher.dispatch_workers(|i| i * 2, 1), vec![0]);
        assert_eq!(dispatcher.dispatch_workers(|i| i, 0), Vec::<usize>::new());
        assert_eq!(SimpleThreadDispatcher::new(0).thread_count(), 1);
    }
}
