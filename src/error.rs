use thiserror::Error;

/// Errors returned by the fallible accessors of [`LinkedProbeMap`](crate::LinkedProbeMap).
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapError {
    /// The requested key is not present in the map.
    #[error("key is not found")]
    KeyNotFound,
}
