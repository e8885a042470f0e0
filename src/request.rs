//! Per-request completion signalling.

use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::JoinHandle;
use std::time::Duration;

use log::{debug, error, warn};

use crate::error::{TessellationError, TessellationResult};
use crate::geometry::Triangle;

/// Receives the outcome of a request started with `get_triangles_with`.
///
/// Exactly one of the two methods is called, exactly once, on the worker thread that ran the
/// request. The handler is consumed by the call.
pub trait TessellationHandler: Send + 'static {
    fn on_tessellation_done(self, triangles: Vec<Triangle>);

    fn on_tessellation_error(self, error: TessellationError);
}

/// A handler made from a closure that takes the whole result.
pub struct FnHandler<F>(F);

pub fn handler_fn<F>(f: F) -> FnHandler<F>
where
    F: FnOnce(TessellationResult<Vec<Triangle>>) + Send + 'static,
{
    FnHandler(f)
}

impl<F> TessellationHandler for FnHandler<F>
where
    F: FnOnce(TessellationResult<Vec<Triangle>>) + Send + 'static,
{
    fn on_tessellation_done(self, triangles: Vec<Triangle>) {
        (self.0)(Ok(triangles))
    }

    fn on_tessellation_error(self, error: TessellationError) {
        (self.0)(Err(error))
    }
}

/// Hands the result to the handler once. A delivery dropped without a result, e.g. because the
/// worker never started, reports [`TessellationError::Abandoned`] instead.
pub(crate) struct Delivery<H: TessellationHandler> {
    handler: Option<H>,
    request_id: usize,
}

impl<H: TessellationHandler> Delivery<H> {
    pub(crate) fn new(handler: H, request_id: usize) -> Self {
        Self {
            handler: Some(handler),
            request_id,
        }
    }

    pub(crate) fn deliver(mut self, result: TessellationResult<Vec<Triangle>>) {
        let Some(handler) = self.handler.take() else {
            return;
        };
        match result {
            Ok(triangles) => handler.on_tessellation_done(triangles),
            Err(error) => handler.on_tessellation_error(error),
        }
    }
}

impl<H: TessellationHandler> Drop for Delivery<H> {
    fn drop(&mut self) {
        if let Some(handler) = self.handler.take() {
            warn!("request {} ended without a result", self.request_id);
            handler.on_tessellation_error(TessellationError::Abandoned);
        }
    }
}

/// A single-shot terminal slot. The first value stored is kept for good.
#[derive(Debug)]
pub(crate) struct Completion<T> {
    slot: Mutex<Slot<T>>,
    ready: Condvar,
}

#[derive(Debug)]
enum Slot<T> {
    Pending,
    Ready(T),
    Taken,
}

impl<T> Completion<T> {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self {
            slot: Mutex::new(Slot::Pending),
            ready: Condvar::new(),
        })
    }

    fn lock(&self) -> MutexGuard<'_, Slot<T>> {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns `false` when the slot was already terminal, `value` is dropped in that case.
    pub(crate) fn complete(&self, value: T) -> bool {
        let mut slot = self.lock();
        if !matches!(*slot, Slot::Pending) {
            return false;
        }
        *slot = Slot::Ready(value);
        self.ready.notify_all();
        true
    }

    /// Blocks until the slot is terminal and takes the value, or gives up after `timeout`.
    ///
    /// Returns `None` on timeout, or when another waiter already took the value.
    pub(crate) fn wait(&self, timeout: Option<Duration>) -> Option<T> {
        let slot = self.lock();
        let pending = |slot: &mut Slot<T>| matches!(slot, Slot::Pending);

        let mut slot = match timeout {
            None => self
                .ready
                .wait_while(slot, pending)
                .unwrap_or_else(PoisonError::into_inner),
            Some(timeout) => {
                self.ready
                    .wait_timeout_while(slot, timeout, pending)
                    .unwrap_or_else(PoisonError::into_inner)
                    .0
            }
        };

        match std::mem::replace(&mut *slot, Slot::Taken) {
            Slot::Ready(value) => Some(value),
            Slot::Pending => {
                *slot = Slot::Pending;
                None
            }
            Slot::Taken => None,
        }
    }
}

/// Handle to a request running on its worker thread.
///
/// Dropping the handle detaches the worker, the handler is still called.
#[derive(Debug)]
pub struct RequestHandle {
    request_id: usize,
    worker: Option<JoinHandle<()>>,
}

impl RequestHandle {
    pub(crate) fn new(request_id: usize, worker: Option<JoinHandle<()>>) -> Self {
        Self {
            request_id,
            worker,
        }
    }

    pub fn request_id(&self) -> usize {
        self.request_id
    }

    /// `true` once the worker has exited, i.e. after the handler returned.
    pub fn is_finished(&self) -> bool {
        self.worker
            .as_ref()
            .map_or(true, |worker| worker.is_finished())
    }

    /// Waits for the worker to exit. Returns `false` if the handler panicked.
    pub fn join(mut self) -> bool {
        let Some(worker) = self.worker.take() else {
            return true;
        };
        match worker.join() {
            Ok(()) => {
                debug!("request {} joined", self.request_id);
                true
            }
            Err(_) => {
                error!("handler of request {} panicked", self.request_id);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc;
    use std::thread;
    use std::time::Instant;

    use super::*;

    #[test]
    fn test_completion_is_single_shot() {
        let completion = Completion::new();

        assert!(completion.complete(1));
        assert!(!completion.complete(2));

        assert_eq!(completion.wait(None), Some(1));
        // already taken
        assert_eq!(completion.wait(Some(Duration::from_millis(1))), None);
    }

    #[test]
    fn test_wait_wakes_on_completion_from_another_thread() {
        // given
        let completion = Completion::new();
        let producer = {
            let completion = completion.clone();
            thread::spawn(move || {
                thread::sleep(Duration::from_millis(20));
                completion.complete("done")
            })
        };

        // when
        let value = completion.wait(None);

        // then
        assert_eq!(value, Some("done"));
        assert!(producer.join().unwrap());
    }

    #[test]
    fn test_wait_times_out() {
        let completion = Completion::<()>::new();
        let started = Instant::now();

        let value = completion.wait(Some(Duration::from_millis(30)));

        assert_eq!(value, None);
        assert!(started.elapsed() >= Duration::from_millis(30));
        // still pending, a late result is accepted
        assert!(completion.complete(()));
    }

    #[test]
    fn test_dropped_delivery_reports_abandoned() {
        // given
        let (sender, receiver) = mpsc::channel();
        let delivery = Delivery::new(handler_fn(move |result| sender.send(result).unwrap()), 7);

        // when
        drop(delivery);

        // then
        assert_eq!(receiver.try_recv().unwrap(), Err(TessellationError::Abandoned));
        assert!(receiver.try_recv().is_err());
    }

    #[test]
    fn test_delivery_calls_handler_once() {
        let (sender, receiver) = mpsc::channel();
        let delivery = Delivery::new(handler_fn(move |result| sender.send(result).unwrap()), 8);

        delivery.deliver(Ok(vec![]));

        assert_eq!(receiver.recv().unwrap(), Ok(vec![]));
        // sender dropped with the handler, nothing else arrives
        assert!(receiver.recv().is_err());
    }
}
