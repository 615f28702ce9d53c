use thiserror::Error;

/// Contract violations in the module/store binding layer.
///
/// Every variant is detected synchronously at the call site and returned
/// immediately. There is no retry or recovery path: these signal programmer
/// errors, not runtime faults.
#[derive(Error, Debug)]
pub enum ModlinkError {
    /// Caller-side contract violation: bad path shape, malformed action
    /// declaration, attempt to re-integrate at a different path.
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),

    /// Operation attempted before a prerequisite was met: unlink before
    /// link, connect before a path was integrated.
    #[error("insufficient data: {0}")]
    InsufficientData(String),

    /// Operation attempted in a state that cannot support it: dispatch
    /// while no store is linked.
    #[error("wrong interface: {0}")]
    WrongInterface(String),

    /// An exclusive operation attempted twice: link while already linked.
    #[error("duplicate: {0}")]
    Duplicate(String),
}
