// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2025 Daniel Negri
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Store configuration.

use serde::Deserialize;
use std::time::Duration;

/// Tuning for the in-process store.
///
/// Deserializable so a host application can embed it in its own config file;
/// missing fields fall back to [`StoreConfig::default`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Longest a statement waits for a row lock before failing
    pub lock_timeout_ms: u64,

    /// How often a blocked lock wait re-checks the caller's context
    pub lock_poll_interval_ms: u64,

    /// Most recent commits the change journal keeps; 0 turns journaling off
    pub journal_capacity: usize,
}

impl StoreConfig {
    pub fn lock_timeout(&self) -> Duration {
        Duration::from_millis(self.lock_timeout_ms)
    }

    /// Never zero, so a lock wait always yields between context checks.
    pub fn lock_poll_interval(&self) -> Duration {
        Duration::from_millis(self.lock_poll_interval_ms.max(1))
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            lock_timeout_ms: 5_000,
            lock_poll_interval_ms: 10,
            journal_capacity: 0,
        }
    }
}
