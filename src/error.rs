//! Error types.

/// Misuse of the `begin` / `draw` / `end` bracket.
///
/// These are programming errors; the renderer never recovers from them on
/// its own and leaves its state untouched when returning one.
#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ProtocolViolation {
    /// `begin()` while a session is already open.
    #[error("BeamRenderer::begin() has already been called")]
    BeginAlreadyCalled,
    /// `draw()`, `flush()` or `end()` without an open session.
    #[error("BeamRenderer::begin() has not been called")]
    BeginNotCalled,
}

/// Failures while creating GPU resources or the renderer itself.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeviceError {
    /// A shader stage failed to compile.
    #[error("shader compile error: {0}")]
    Compile(String),
    /// The program failed to link.
    #[error("program link error: {0}")]
    Link(String),
    /// A vertex attribute is missing from the linked program.
    #[error("attribute `{0}` missing from beam shader")]
    MissingAttribute(&'static str),
    /// A uniform is missing from the linked program.
    #[error("uniform `{0}` missing from beam shader")]
    MissingUniform(&'static str),
    /// The GL context refused to create an object.
    #[error("GL resource creation failed: {0}")]
    Resource(String),
    /// The vertex buffer cannot hold a single beam.
    #[error("vertex capacity {0} cannot hold one beam (6 vertices)")]
    CapacityTooSmall(usize),
}

/// Failures while loading or validating a [`BeamConfig`](crate::BeamConfig).
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// The TOML could not be parsed.
    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// A value is out of range.
    #[error("invalid value for `{field}`: {reason}")]
    Invalid {
        /// Dotted path of the offending field.
        field: &'static str,
        /// What is wrong with it.
        reason: &'static str,
    },
}
