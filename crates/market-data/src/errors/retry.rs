/// Classification for retry policy.
///
/// | Class | Retried? |
/// |-------|----------|
/// | `Never` | No |
/// | `WithBackoff` | Once, after the configured backoff |
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RetryClass {
    /// Bad identifier, unusable data or a hard provider failure.
    Never,

    /// Transient failure such as a timeout or HTTP 429.
    WithBackoff,
}
