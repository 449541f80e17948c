//! # YangBind Bench
//!
//! Benchmarking utilities for YangBind performance testing.

pub mod model;
pub mod timing;
