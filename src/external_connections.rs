/// Provides the clients gateways need to reach the task backend. Business logic only sees this
/// trait, so gateways can be pointed at a fake backend in tests.
pub trait ExternalConnectivity {
    /// HTTP client which carries the session cookie jar and tracing middleware
    fn http_client(&self) -> &reqwest_middleware::ClientWithMiddleware;

    /// Base address of the backend, e.g. `http://localhost:8000`
    fn api_base(&self) -> &str;

    /// Builds the absolute URL for an API path such as `/api/tasks`
    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.api_base().trim_end_matches('/'), path)
    }
}
