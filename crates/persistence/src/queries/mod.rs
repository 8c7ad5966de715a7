// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-only queries.
//!
//! ## Module Organization
//!
//! - `catalog`: racecourses, bookmakers, fixtures and pitches
//! - `allocations`: per-track allocation records
//! - `attendance`: attendance rosters
//! - `transfers`: the pitch transfer ledger

pub mod allocations;
pub mod attendance;
pub mod catalog;
pub mod transfers;
