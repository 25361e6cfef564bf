use thiserror::Error;

/// Failure kinds surfaced by the generation engine.
///
/// Service code keeps returning `anyhow::Result`; these variants ride inside
/// the anyhow chain so callers can still match on the kind when deciding how
/// to present a failure. None of them is retried by the engine itself;
/// retry, if desired, is a caller-initiated re-invocation.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Provider output failed to parse as the requested structured payload.
    #[error("provider output did not match the requested contract: {0}")]
    ContractMismatch(String),

    /// The completion call itself failed (network, auth, rate limit).
    #[error("completion provider failed: {0}")]
    Provider(String),

    /// A referenced schema or field no longer exists.
    #[error("schema resolution failed: {0}")]
    SchemaResolution(String),
}
