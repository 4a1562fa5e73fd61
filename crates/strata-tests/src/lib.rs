//! Integration test crate for Strata.
//!
//! This crate exists solely to hold cross-crate integration tests: the
//! document, layout engine and interaction controller driven together.

#[cfg(test)]
mod harness;

#[cfg(test)]
mod scenarios;

#[cfg(test)]
mod properties;

#[cfg(test)]
mod editing;
