use crate::domain::{Decimal, InventoryCode};
use thiserror::Error;

/// Validation failures raised by the position engine.
///
/// Every variant is terminal for the submission that produced it; the caller
/// corrects the input and resubmits.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("Invalid reason '{0}': expected Sell, Buy, or Rollover")]
    InvalidReason(String),
    #[error("Invalid quantity {0}: lots must be greater than zero")]
    InvalidQuantity(Decimal),
    #[error("Select at least one inventory code to close the position")]
    MissingAllocation,
    #[error("Total allocated quantity ({allocated}) must equal total lots ({lots})")]
    AllocationMismatch { allocated: Decimal, lots: Decimal },
    #[error("Inventory {0} not found or already closed")]
    UnknownPosition(InventoryCode),
    #[error("Cannot allocate {requested} lots from {code}. Only {open} lots open")]
    OverAllocation {
        code: InventoryCode,
        requested: Decimal,
        open: Decimal,
    },
    #[error("No free inventory code suffix left for {0}")]
    CodeGenerationExhausted(String),
    #[error("Missing required field: {0}")]
    MissingField(&'static str),
    #[error("Invalid {field}: must be greater than zero")]
    InvalidPrice { field: &'static str },
    #[error("{field} is too large to record")]
    OutOfRange { field: &'static str },
}

impl EngineError {
    /// Stable machine-readable name of the failure.
    pub fn kind(&self) -> &'static str {
        match self {
            EngineError::InvalidReason(_) => "InvalidReason",
            EngineError::InvalidQuantity(_) => "InvalidQuantity",
            EngineError::MissingAllocation => "MissingAllocation",
            EngineError::AllocationMismatch { .. } => "AllocationMismatch",
            EngineError::UnknownPosition(_) => "UnknownPosition",
            EngineError::OverAllocation { .. } => "OverAllocation",
            EngineError::CodeGenerationExhausted(_) => "CodeGenerationExhausted",
            EngineError::MissingField(_) => "MissingField",
            EngineError::InvalidPrice { .. } => "InvalidPrice",
            EngineError::OutOfRange { .. } => "OutOfRange",
        }
    }
}
