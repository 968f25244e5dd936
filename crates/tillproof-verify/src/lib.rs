//! # tillproof-verify
//!
//! The content integrity engine for Tillproof.
//!
//! This crate provides [`engine::Sha256Digester`], which implements the
//! [`tillproof_core::traits::ContentDigest`] trait. A sales file's digest is
//! computed once when the cashier submits it and again whenever an auditor
//! re-uploads it; the two are compared as exact strings.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use tillproof_core::traits::ContentDigest;
//! use tillproof_verify::engine::Sha256Digester;
//!
//! let digest = Sha256Digester.digest(&file_bytes);
//! assert!(Sha256Digester.verify(&file_bytes, &digest));
//! ```

pub mod engine;

pub use engine::Sha256Digester;
