//! Processing module for content cleanup and size estimation.
//!
//! This module provides:
//! - Normalization of scraped text (markup, symbols, whitespace, boilerplate)
//! - Key-section extraction and size optimization for oversized postings
//! - Statistical token estimation against a configurable budget

pub mod estimator;
pub mod normalizer;

pub use estimator::TokenEstimator;
pub use normalizer::{extract_key_sections, normalize, optimize_for_processing};
