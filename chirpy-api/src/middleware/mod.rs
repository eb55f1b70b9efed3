/// Middleware modules for the API server
///
/// - `metrics`: Fileserver hit counter

pub mod metrics;
