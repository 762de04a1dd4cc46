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

//! Change journal of committed transactions.
//!
//! Each commit appends one [`Commit`] carrying the row changes it made, in
//! statement order. A commit takes its sequence number while it still holds its
//! row locks, so commits touching the same rows are numbered in the order they
//! were applied and replaying a drained journal reproduces balances and prize
//! pools.
//!
//! The journal is bounded: it keeps the most recent `capacity` commits and
//! overwrites the oldest once full. A capacity of zero disables it.

use crate::base::{TournamentId, UserId};
use crossbeam::queue::ArrayQueue;
use std::sync::atomic::{AtomicU64, Ordering};

/// A single committed row change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    UserInserted { user: UserId },
    UserDeleted { user: UserId },
    BalanceAdjusted { user: UserId, delta: i64 },
    TournamentInserted { tournament: TournamentId, deposit: u64 },
    PrizeCredited { tournament: TournamentId, amount: u64 },
    ParticipantAdded { tournament: TournamentId, user: UserId },
    TournamentFinished { tournament: TournamentId, winner: Option<UserId> },
}

/// The changes of one committed transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    pub sequence: u64,
    pub changes: Vec<Change>,
}

/// A lock-free ring of the most recent commits.
///
/// Read-only transactions are not journaled.
#[derive(Debug, Default)]
pub struct Journal {
    commits: Option<ArrayQueue<Commit>>,
    next_sequence: AtomicU64,
    overwritten: AtomicU64,
}

impl Journal {
    /// Keeps up to `capacity` commits; zero disables the journal.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            commits: (capacity > 0).then(|| ArrayQueue::new(capacity)),
            ..Self::default()
        }
    }

    /// Appends the changes of a committed transaction.
    ///
    /// Must be called while the transaction's row locks are still held.
    pub(crate) fn record(&self, changes: Vec<Change>) {
        let Some(commits) = &self.commits else {
            return;
        };
        if changes.is_empty() {
            return;
        }
        let sequence = self.next_sequence.fetch_add(1, Ordering::SeqCst) + 1;
        if commits.force_push(Commit { sequence, changes }).is_some() {
            self.overwritten.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Removes and returns the retained commits in sequence order.
    ///
    /// A commit being appended concurrently with the drain may be returned by
    /// the next drain instead.
    pub fn drain(&self) -> Vec<Commit> {
        let Some(commits) = &self.commits else {
            return Vec::new();
        };
        let mut drained: Vec<Commit> = std::iter::from_fn(|| commits.pop()).collect();
        drained.sort_unstable_by_key(|commit| commit.sequence);
        drained
    }

    pub fn is_enabled(&self) -> bool {
        self.commits.is_some()
    }

    pub fn capacity(&self) -> usize {
        self.commits.as_ref().map_or(0, ArrayQueue::capacity)
    }

    /// Commits dropped to make room for newer ones.
    pub fn overwritten(&self) -> u64 {
        self.overwritten.load(Ordering::Relaxed)
    }

    pub fn len(&self) -> usize {
        self.commits.as_ref().map_or(0, ArrayQueue::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
