/// Fileserver hit counter
///
/// Counts every request that reaches the static file service, whether or
/// not a file exists at the requested path. The count is shown on
/// `/admin/metrics` and zeroed by `/admin/reset`.
///
/// # Example
///
/// ```no_run
/// use std::sync::{atomic::AtomicU64, Arc};
/// use axum::Router;
/// use chirpy_api::middleware::metrics::FileserverHitsLayer;
/// use tower_http::services::ServeDir;
/// use tower::ServiceBuilder;
///
/// let hits = Arc::new(AtomicU64::new(0));
/// let app: Router = Router::new().nest_service(
///     "/app",
///     ServiceBuilder::new()
///         .layer(FileserverHitsLayer::new(hits))
///         .service(ServeDir::new(".")),
/// );
/// ```

use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};
use std::task::{Context, Poll};

use axum::http::Request;
use tower::{Layer, Service};

/// Layer that counts requests into a shared counter
#[derive(Debug, Clone)]
pub struct FileserverHitsLayer {
    hits: Arc<AtomicU64>,
}

impl FileserverHitsLayer {
    pub fn new(hits: Arc<AtomicU64>) -> Self {
        Self { hits }
    }
}

impl<S> Layer<S> for FileserverHitsLayer {
    type Service = FileserverHits<S>;

    fn layer(&self, inner: S) -> Self::Service {
        FileserverHits {
            inner,
            hits: self.hits.clone(),
        }
    }
}

/// Counting service produced by [`FileserverHitsLayer`]
#[derive(Debug, Clone)]
pub struct FileserverHits<S> {
    inner: S,
    hits: Arc<AtomicU64>,
}

impl<S, B> Service<Request<B>> for FileserverHits<S>
where
    S: Service<Request<B>>,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request<B>) -> Self::Future {
        self.hits.fetch_add(1, Ordering::Relaxed);
        self.inner.call(request)
    }
}
