//! Test utilities for FitPro services.
//!
//! Provides the contract fixture loader and a payment-webhook signer.
//! Import from `[dev-dependencies]` only, never in production code.

pub mod fixture;
pub mod webhook;
