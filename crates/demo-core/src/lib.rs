//! # Demo Core
//!
//! Core types for the DevSecOps demo service.
//!
//! This crate holds everything in the service that makes a decision:
//!
//! - [`calculator`] - The four arithmetic operations and the [`Operation`] enum
//! - [`CalculationRequest`] - Validation of an untyped request body
//! - [`CalculationResult`] - The success payload of `POST /calculate`
//! - [`ApiError`] - The error taxonomy and its HTTP mapping
//!
//! Nothing here performs I/O; the HTTP layer lives in `demo-server`.

#![doc(html_root_url = "https://docs.rs/demo-core/1.0.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod calculation;
pub mod calculator;
mod error;
mod timestamp;

pub use calculation::{result_to_json, CalculationRequest, CalculationResult, Operands, REQUIRED_FIELDS};
pub use calculator::{ArithmeticError, Operation, ParseOperationError};
pub use error::{ApiError, ApiResult, ErrorBody, ErrorKind};
pub use timestamp::{format_timestamp, now_timestamp};
