use arbor_core_types::NodeId;
use thiserror::Error;

/// Result type alias using ArborError
pub type Result<T> = std::result::Result<T, ArborError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that can be used for programmatic
/// error handling, testing, and log assertions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Request validation
    MissingTarget,
    InvalidVariant,
    InvalidPosition,
    InvalidConfig,

    // Structural
    NotFound,
    InvalidParent,
    CycleDetected,
    AlreadyExists,
    InvariantViolation,

    // Integration/IO
    Serialization,
    Persistence,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::MissingTarget => "ERR_MISSING_TARGET",
            ExErrorKind::InvalidVariant => "ERR_INVALID_VARIANT",
            ExErrorKind::InvalidPosition => "ERR_INVALID_POSITION",
            ExErrorKind::InvalidConfig => "ERR_INVALID_CONFIG",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::InvalidParent => "ERR_INVALID_PARENT",
            ExErrorKind::CycleDetected => "ERR_CYCLE_DETECTED",
            ExErrorKind::AlreadyExists => "ERR_ALREADY_EXISTS",
            ExErrorKind::InvariantViolation => "ERR_INVARIANT_VIOLATION",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Persistence => "ERR_PERSISTENCE",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// Carries classification fields for programmatic handling plus context for
/// debugging. Domain code raises [`ArborError`]; the logging macros convert
/// into this shape to emit `err.kind` and `err.code`.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    node_id: Option<NodeId>,
    message: String,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            node_id: None,
            message: String::new(),
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add node context
    pub fn with_node_id(mut self, id: NodeId) -> Self {
        self.node_id = Some(id);
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn node_id(&self) -> Option<NodeId> {
        self.node_id
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(node_id) = self.node_id {
            write!(f, " (node_id: {})", node_id)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {}

// ========== End Error Facility ==========

/// Error taxonomy for closure-table operations
///
/// Every structural error is raised before the first mutating row-store
/// call. Row-store failures surface as `Persistence`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ArborError {
    // ===== Request Errors =====
    /// A required node or option was not supplied
    #[error("Missing required target: {field}")]
    MissingTarget { field: String },

    /// A selector string did not name a known variant
    #[error("Invalid {selector} selector: '{value}'")]
    InvalidVariant { selector: String, value: String },

    /// A move destination cannot be honored in the node's sibling group
    #[error("Invalid position for node {node_id}: {reason}")]
    InvalidPosition { node_id: NodeId, reason: String },

    /// Configuration rejected by validation
    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    // ===== Structural Errors =====
    /// Node has no presence in the closure table
    #[error("Unknown node: {node_id}")]
    UnknownNode { node_id: NodeId },

    /// Parent named for a node does not exist in the closure table
    #[error("Invalid parent {parent_id} for node {node_id}")]
    InvalidParent { node_id: NodeId, parent_id: NodeId },

    /// Reparent would make a node its own ancestor
    #[error("Cycle detected: node {parent_id} cannot become the parent of {node_id}")]
    CyclicParent { node_id: NodeId, parent_id: NodeId },

    /// Node already has closure rows
    #[error("Node already exists: {node_id}")]
    NodeExists { node_id: NodeId },

    /// Stored rows contradict the closure invariants
    #[error("Corrupt closure table: {reason}")]
    CorruptClosure { reason: String },

    // ===== Integration Errors =====
    /// Row store failure
    #[error("Persistence error in {op}: {message}")]
    Persistence { op: String, message: String },

    /// Serialization error (JSON/TOML decoding)
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    /// Generic internal error
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl From<ArborError> for ExError {
    fn from(err: ArborError) -> Self {
        match err {
            ArborError::MissingTarget { field } => ExError::new(ExErrorKind::MissingTarget)
                .with_message(format!("'{}' is required", field)),

            ArborError::InvalidVariant { selector, value } => {
                ExError::new(ExErrorKind::InvalidVariant)
                    .with_message(format!("unknown {} selector '{}'", selector, value))
            }

            ArborError::InvalidPosition { node_id, reason } => {
                ExError::new(ExErrorKind::InvalidPosition)
                    .with_node_id(node_id)
                    .with_message(reason)
            }

            ArborError::InvalidConfig { reason } => {
                ExError::new(ExErrorKind::InvalidConfig).with_message(reason)
            }

            ArborError::UnknownNode { node_id } => ExError::new(ExErrorKind::NotFound)
                .with_node_id(node_id)
                .with_message("Node has no closure rows"),

            ArborError::InvalidParent { node_id, parent_id } => {
                ExError::new(ExErrorKind::InvalidParent)
                    .with_node_id(node_id)
                    .with_message(format!("Parent {} does not exist", parent_id))
            }

            ArborError::CyclicParent { node_id, parent_id } => {
                ExError::new(ExErrorKind::CycleDetected)
                    .with_node_id(node_id)
                    .with_op("reparent")
                    .with_message(format!("{} is inside the subtree being moved", parent_id))
            }

            ArborError::NodeExists { node_id } => ExError::new(ExErrorKind::AlreadyExists)
                .with_node_id(node_id)
                .with_message("Node already has closure rows"),

            ArborError::CorruptClosure { reason } => {
                ExError::new(ExErrorKind::InvariantViolation).with_message(reason)
            }

            ArborError::Persistence { op, message } => ExError::new(ExErrorKind::Persistence)
                .with_op(op)
                .with_message(message),

            ArborError::Serialization { message } => {
                ExError::new(ExErrorKind::Serialization).with_message(message)
            }

            ArborError::Internal { message } => {
                ExError::new(ExErrorKind::Internal).with_message(message)
            }
        }
    }
}

/// Conversion from serde_json::Error to ArborError
impl From<serde_json::Error> for ArborError {
    fn from(err: serde_json::Error) -> Self {
        ArborError::Serialization {
            message: err.to_string(),
        }
    }
}

/// Conversion from toml::de::Error to ArborError
impl From<toml::de::Error> for ArborError {
    fn from(err: toml::de::Error) -> Self {
        ArborError::Serialization {
            message: err.to_string(),
        }
    }
}
