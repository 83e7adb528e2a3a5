/// Base URL of the task backend, e.g. http://localhost:8000
pub const API_URL: &str = "TASKS_API_URL";
/// Log level configuration for the application. Uses [EnvFilter directives](https://docs.rs/tracing-subscriber/latest/tracing_subscriber/filter/struct.EnvFilter.html#directives)
pub const LOG_LEVEL: &str = "LOG_LEVEL";

/// OpenTelemetry span export URL. Should be http://localhost:4317 by default when a collector
/// sidecar is running. Spans are only exported when this is set.
pub const OTEL_SPAN_EXPORT_URL: &str = "OTEL_SPAN_EXPORT_URL";

pub mod test {
    /// Backend used by the live integration tests
    pub const TEST_API_URL: &str = "TEST_API_URL";
    /// Existing account the live integration tests log in with
    pub const TEST_EMAIL: &str = "TEST_EMAIL";
    pub const TEST_PASSWORD: &str = "TEST_PASSWORD";
}
