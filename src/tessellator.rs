use std::any::Any;
use std::marker::PhantomData;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use log::{debug, error, warn};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::assembler::TriangleAssembler;
use crate::backend::{EarClipBackend, TessellationBackend};
use crate::engine::{run_backend, DEFAULT_DEDUP_EPSILON};
use crate::error::{TessellationError, TessellationResult};
use crate::geometry::{Contour, Triangle};
use crate::request::{handler_fn, Completion, Delivery, RequestHandle, TessellationHandler};

static NEXT_REQUEST_ID: AtomicUsize = AtomicUsize::new(1);

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TessellatorOptions {
    /// How long `get_triangles` waits before giving up, `None` waits for as long as it takes.
    pub timeout: Option<Duration>,
    pub dedup_epsilon: f64,
    /// Worker threads are named `<thread_name>-<request id>`.
    pub thread_name: String,
}

impl Default for TessellatorOptions {
    fn default() -> Self {
        Self {
            timeout: None,
            dedup_epsilon: DEFAULT_DEDUP_EPSILON,
            thread_name: "tessellator".to_string(),
        }
    }
}

impl TessellatorOptions {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_dedup_epsilon(mut self, dedup_epsilon: f64) -> Self {
        self.dedup_epsilon = dedup_epsilon;
        self
    }

    pub fn with_thread_name(mut self, thread_name: impl Into<String>) -> Self {
        self.thread_name = thread_name.into();
        self
    }
}

/// Triangulates polygons on worker threads, one thread and one fresh backend per request.
///
/// ```
/// use contour_tessellator::{Contour, Tessellator};
///
/// let square = Contour::from_tuples([(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)]);
/// let diamond = Contour::from_tuples([(5.0, 2.0), (8.0, 5.0), (5.0, 8.0), (2.0, 5.0)]);
///
/// let triangles = Tessellator::new()
///     .get_triangles(&square, Some(&diamond))
///     .unwrap();
/// let area: f64 = triangles.iter().map(|triangle| triangle.area()).sum();
/// assert!((area - 82.0).abs() < 1e-9);
/// ```
#[derive(Debug)]
pub struct Tessellator<B = EarClipBackend> {
    options: TessellatorOptions,
    backend: PhantomData<fn() -> B>,
}

impl Tessellator<EarClipBackend> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<B> Default for Tessellator<B> {
    fn default() -> Self {
        Self {
            options: TessellatorOptions::default(),
            backend: PhantomData,
        }
    }
}

impl<B: TessellationBackend + Default + Send + 'static> Tessellator<B> {
    pub fn with_options(options: TessellatorOptions) -> Self {
        Self {
            options,
            backend: PhantomData,
        }
    }

    pub fn options(&self) -> &TessellatorOptions {
        &self.options
    }

    /// Triangulates `outer` minus `hole`, blocking until the worker has finished or the configured
    /// timeout has passed.
    pub fn get_triangles(&self, outer: &Contour, hole: Option<&Contour>) -> TessellationResult<Vec<Triangle>> {
        let completion = Completion::new();
        let handle = {
            let completion = completion.clone();
            self.get_triangles_with(
                outer,
                hole,
                handler_fn(move |result| {
                    completion.complete(result);
                }),
            )
        };

        match completion.wait(self.options.timeout) {
            Some(result) => result,
            None => {
                // only a timeout leaves the slot pending
                let timeout = self.options.timeout.unwrap_or_default();
                warn!(
                    "request {} did not complete within {:?}, detaching it",
                    handle.request_id(),
                    timeout
                );
                Err(TessellationError::Timeout(timeout))
            }
        }
    }

    /// Starts triangulating `outer` minus `hole` and returns at once. The outcome goes to
    /// `handler`, on the worker thread.
    pub fn get_triangles_with<H: TessellationHandler>(
        &self,
        outer: &Contour,
        hole: Option<&Contour>,
        handler: H,
    ) -> RequestHandle {
        let request_id = NEXT_REQUEST_ID.fetch_add(1, Ordering::Relaxed);
        let outer = outer.clone();
        let hole = hole.cloned();
        let dedup_epsilon = self.options.dedup_epsilon;
        let delivery = Delivery::new(handler, request_id);

        debug!(
            "request {}: outer contour of {} points, hole of {} points",
            request_id,
            outer.len(),
            hole.as_ref().map_or(0, Contour::len)
        );

        let spawned = thread::Builder::new()
            .name(format!("{}-{}", self.options.thread_name, request_id))
            .spawn(move || {
                let result = run_request::<B>(request_id, &outer, hole.as_ref(), dedup_epsilon);
                delivery.deliver(result);
            });

        match spawned {
            Ok(worker) => RequestHandle::new(request_id, Some(worker)),
            Err(cause) => {
                // the closure, and with it the delivery, is dropped, which reports the request
                // as abandoned
                error!("unable to start worker for request {}: {}", request_id, cause);
                RequestHandle::new(request_id, None)
            }
        }
    }
}

#[profiling::function]
fn run_request<B: TessellationBackend + Default>(
    request_id: usize,
    outer: &Contour,
    hole: Option<&Contour>,
    dedup_epsilon: f64,
) -> TessellationResult<Vec<Triangle>> {
    let started = Instant::now();

    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        let mut backend = B::default();
        let mut assembler = TriangleAssembler::new();
        run_backend(&mut backend, outer, hole, dedup_epsilon, &mut assembler);
        assembler.finish()
    }))
    .unwrap_or_else(|payload| {
        let message = panic_message(payload.as_ref());
        error!("backend panicked during request {}: {}", request_id, message);
        Err(TessellationError::UnderlyingTriangulationFailure(format!(
            "backend panicked: {}",
            message
        )))
    });

    match &result {
        Ok(triangles) => debug!(
            "request {}: {} triangles in {:?}",
            request_id,
            triangles.len(),
            started.elapsed()
        ),
        Err(cause) => debug!("request {}: failed after {:?}, {}", request_id, started.elapsed(), cause),
    }

    result
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
