//! Calculation request validation and results.
//!
//! Request bodies arrive untyped, so validation runs over a
//! [`serde_json::Value`] in a fixed order:
//!
//! 1. all of `operation`, `a`, `b` present, else [`ApiError::MissingParameters`]
//! 2. `a` and `b` are JSON numbers, else [`ApiError::InvalidParameterType`]
//! 3. `operation` names a known [`Operation`], else [`ApiError::InvalidOperation`]
//!
//! # Example
//!
//! ```
//! use demo_core::CalculationRequest;
//! use serde_json::json;
//!
//! let request = CalculationRequest::from_value(&json!({"operation": "add", "a": 5, "b": 3})).unwrap();
//! let result = request.evaluate().unwrap();
//! assert_eq!(result.result, 8.0);
//! ```

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use serde_json::{Map, Number, Value};

use crate::calculator::Operation;
use crate::error::{ApiError, ApiResult};
use crate::timestamp::format_timestamp;

/// Fields every calculation request must carry.
pub const REQUIRED_FIELDS: [&str; 3] = ["operation", "a", "b"];

/// Largest magnitude below which every integral `f64` is exactly representable (2^53).
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_992.0;

/// A validated calculation request.
///
/// Operands keep their original JSON representation so they can be echoed
/// back unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct CalculationRequest {
    operation: Operation,
    a: Number,
    b: Number,
}

impl CalculationRequest {
    /// Creates a request from already-typed parts.
    #[must_use]
    pub fn new(operation: Operation, a: Number, b: Number) -> Self {
        Self { operation, a, b }
    }

    /// Validates an untyped request body.
    ///
    /// A body that is not a JSON object is treated as having no fields.
    ///
    /// # Errors
    ///
    /// Returns the first validation failure in the order listed in the
    /// module documentation.
    pub fn from_value(body: &Value) -> ApiResult<Self> {
        let empty = Map::new();
        let fields = body.as_object().unwrap_or(&empty);

        let operation = fields.get("operation");
        let a = fields.get("a");
        let b = fields.get("b");

        if operation_is_absent(operation) {
            return Err(ApiError::MissingParameters);
        }
        let (Some(a), Some(b)) = (a, b) else {
            return Err(ApiError::MissingParameters);
        };

        let (Value::Number(a), Value::Number(b)) = (a, b) else {
            return Err(ApiError::InvalidParameterType);
        };

        let operation = operation
            .and_then(Value::as_str)
            .and_then(|name| name.parse::<Operation>().ok())
            .ok_or(ApiError::InvalidOperation)?;

        Ok(Self::new(operation, a.clone(), b.clone()))
    }

    /// Returns the requested operation.
    #[must_use]
    pub fn operation(&self) -> Operation {
        self.operation
    }

    /// Returns the operands as doubles.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidParameterType`] if an operand cannot be
    /// represented as an `f64`.
    pub fn operands(&self) -> ApiResult<(f64, f64)> {
        let a = self.a.as_f64().ok_or(ApiError::InvalidParameterType)?;
        let b = self.b.as_f64().ok_or(ApiError::InvalidParameterType)?;
        Ok((a, b))
    }

    /// Evaluates the request, stamping the result with the current time.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::DivisionByZero`] when dividing by zero.
    pub fn evaluate(&self) -> ApiResult<CalculationResult> {
        self.evaluate_at(Utc::now())
    }

    /// Evaluates the request, stamping the result with `at`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::DivisionByZero`] when dividing by zero.
    pub fn evaluate_at(&self, at: DateTime<Utc>) -> ApiResult<CalculationResult> {
        let (a, b) = self.operands()?;
        let result = self.operation.apply(a, b)?;

        tracing::debug!(operation = %self.operation, a, b, result, "calculation evaluated");

        Ok(CalculationResult {
            operation: self.operation,
            operands: Operands {
                a: self.a.clone(),
                b: self.b.clone(),
            },
            result,
            timestamp: format_timestamp(at),
        })
    }
}

/// The operands echoed back in a [`CalculationResult`].
///
/// Operands serialize the same way results do, so `5.0` echoes as `5`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Operands {
    /// First operand.
    #[serde(serialize_with = "serialize_operand")]
    pub a: Number,
    /// Second operand.
    #[serde(serialize_with = "serialize_operand")]
    pub b: Number,
}

/// Success payload of a calculation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalculationResult {
    /// The operation that was applied.
    pub operation: Operation,
    /// The operands, as received.
    pub operands: Operands,
    /// The computed value.
    #[serde(serialize_with = "serialize_result")]
    pub result: f64,
    /// When the result was computed (RFC 3339, UTC).
    pub timestamp: String,
}

/// Converts a computed value to JSON.
///
/// Integral values within the exactly-representable range become JSON
/// integers, other finite values JSON floats, and non-finite values `null`.
#[must_use]
pub fn result_to_json(value: f64) -> Value {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < MAX_SAFE_INTEGER {
        Value::from(value as i64)
    } else {
        Number::from_f64(value).map_or(Value::Null, Value::Number)
    }
}

fn serialize_result<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    result_to_json(*value).serialize(serializer)
}

fn serialize_operand<S: Serializer>(value: &Number, serializer: S) -> Result<S::Ok, S::Error> {
    value
        .as_f64()
        .map_or(Value::Null, result_to_json)
        .serialize(serializer)
}

// Falsy values count as absent for the operation name.
fn operation_is_absent(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::Bool(flag)) => !flag,
        Some(Value::String(name)) => name.is_empty(),
        Some(Value::Number(n)) => n.as_f64() == Some(0.0),
        Some(Value::Array(_) | Value::Object(_)) => false,
    }
}
