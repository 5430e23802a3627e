//! Shared helpers for the staking contract suite.
//!
//! This crate provides:
//! - [`ownable`]: a single-owner permission gate with two-step transfer.
//! - [`ttl`]: storage time-to-live constants and bump helpers.

#![no_std]

pub mod ownable;
pub mod ttl;

pub use ownable::*;
pub use ttl::*;
