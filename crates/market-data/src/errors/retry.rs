/// Classification for retry policy.
///
/// Used to determine how the registry should respond to errors from providers.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RetryClass {
    /// Never retry - bad symbol or terminal failure.
    /// The request is fundamentally invalid and retrying won't help.
    Never,

    /// Transient error (rate limit, timeout). The registry still moves on to
    /// the next provider, but the caller may retry the whole fetch later.
    WithBackoff,

    /// Try the next provider in the chain.
    ///
    /// Used when this provider can't serve the request (vendor error, bad
    /// payload) but another provider might succeed.
    NextProvider,
}
