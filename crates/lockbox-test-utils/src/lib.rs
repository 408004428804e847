// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Lockbox integration tests.
//!
//! Provides test doubles for the bootstrap collaborators:
//! - `MockHelper`: in-memory credential helper with failure injection
//! - `MockPaths`: temp-dir backed path provider
//! - `FakeOpener` / `FakeStore`: disk-free store with open/close accounting
//! - `CountingOpener`: wraps a real opener to count opens

pub mod mock_helper;
pub mod mock_paths;
pub mod opener;

pub use mock_helper::{CallCounts, Failure, MockHelper};
pub use mock_paths::MockPaths;
pub use opener::{CountingOpener, FakeOpener, FakeStore, OpenRequest};
