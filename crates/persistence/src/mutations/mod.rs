// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! State-changing operations.
//!
//! Mutations use Diesel DSL, with minimal use of backend-specific helpers
//! (e.g., `last_insert_rowid()`) through the `PersistenceBackend` trait.
//!
//! ## Module Organization
//!
//! - `catalog`: racecourse, bookmaker, fixture and pitch lifecycle
//! - `allocations`: per-column upserts keyed by `(track, fixture, pitch)`
//! - `attendance`: roster replacement
//! - `transfers`: ownership change plus ledger append
//!
//! Multi-statement mutations run inside `Connection::transaction`, which
//! nests as a savepoint when the caller already holds a transaction.

pub mod allocations;
pub mod attendance;
pub mod catalog;
pub mod transfers;
