//! QPay Gateway Client
//!
//! Authenticated client for the QPay merchant REST API: Basic-auth token
//! exchange with an in-process cache, invoice creation and lookup,
//! paginated payment lists, payment checks, and refunds.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use tolbor_qpay::{InvoiceRequest, QPayClient, QPayConfig};
//!
//! let client = QPayClient::new(QPayConfig::new(
//!     "https://merchant.qpay.mn/v2",
//!     "MERCHANT_USER",
//!     "MERCHANT_PASS",
//!     "COURSE_INVOICE",
//! ))?;
//!
//! let invoice = client
//!     .create_invoice(InvoiceRequest::new(
//!         "CHK-42",
//!         "user-7",
//!         "Intro to Algebra",
//!         amount,
//!         "https://api.example.mn/payments/callback",
//!     ))
//!     .await?;
//! ```
//!
//! Tokens are cached until shortly before their stated expiry; every call
//! carries an explicit request and connect timeout.

pub mod client;
pub mod error;
pub mod money;
pub mod types;

pub use client::*;
pub use error::*;
pub use money::*;
pub use types::*;
