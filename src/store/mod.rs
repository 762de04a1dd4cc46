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

//! Entity store contract.
//!
//! The engine never touches state directly: every read and write goes through a
//! [`Transaction`] obtained from [`EntityStore::with_transaction`]. The
//! statement set mirrors what a relational backend offers:
//!
//! | Shape | Methods |
//! |-------|---------|
//! | insert returning id | [`Transaction::insert_user`], [`Transaction::insert_tournament`], [`Transaction::insert_participant`] |
//! | get one row | [`Transaction::get_user`], [`Transaction::get_tournament`] |
//! | exec, rows affected | [`Transaction::delete_user`], [`Transaction::adjust_balance`], [`Transaction::credit_prize`] |
//! | aggregate children | [`Transaction::participants`] |
//!
//! Mutations are single statements: a balance or prize changes by a delta
//! applied inside the store, never by writing back a value read earlier.

use crate::base::{TournamentId, UserId};
use crate::context::Context;
use crate::error::{StoreError, StoreResult};
use std::fmt;

mod journal;
mod memory;

pub use journal::{Change, Commit, Journal};
pub use memory::MemoryStore;

/// Tables known to the store, used in error reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Users,
    Tournaments,
    Participants,
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Table::Users => f.write_str("users"),
            Table::Tournaments => f.write_str("tournaments"),
            Table::Participants => f.write_str("participants"),
        }
    }
}

/// A `users` row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub id: UserId,
    pub name: String,
    pub balance: i64,
}

/// A `tournaments` row, without its participants.
///
/// `winner` is whatever the row holds; the engine decides what it means.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TournamentRecord {
    pub id: TournamentId,
    pub name: String,
    pub deposit: u64,
    pub prize: u64,
    pub finished: bool,
    pub winner: Option<UserId>,
}

/// How a read treats the row lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadMode {
    /// Latest committed version; no lock is kept.
    Committed,
    /// Lock the row until the transaction ends (`SELECT ... FOR UPDATE`).
    Locked,
}

/// Statements available inside a transaction.
///
/// Every method fails with [`StoreError::Cancelled`] or
/// [`StoreError::DeadlineExceeded`] once the transaction's context fires.
pub trait Transaction {
    /// Inserts a user with a zero balance.
    fn insert_user(&mut self, name: &str) -> StoreResult<UserId>;

    /// Inserts an unfinished tournament with an empty prize pool.
    fn insert_tournament(&mut self, name: &str, deposit: u64) -> StoreResult<TournamentId>;

    /// Records `user` as a participant of `tournament`.
    ///
    /// Fails with [`StoreError::UniqueViolation`] if the pair already exists and
    /// [`StoreError::ForeignKeyViolation`] if either row is missing.
    fn insert_participant(&mut self, tournament: TournamentId, user: UserId) -> StoreResult<()>;

    fn get_user(&mut self, id: UserId) -> StoreResult<Option<UserRecord>>;

    fn get_tournament(
        &mut self,
        id: TournamentId,
        mode: ReadMode,
    ) -> StoreResult<Option<TournamentRecord>>;

    /// Returns the number of rows deleted.
    fn delete_user(&mut self, id: UserId) -> StoreResult<u64>;

    /// `balance = balance + delta`; returns the number of rows updated.
    fn adjust_balance(&mut self, id: UserId, delta: i64) -> StoreResult<u64>;

    /// `prize = prize + amount`; returns the number of rows updated.
    fn credit_prize(&mut self, id: TournamentId, amount: u64) -> StoreResult<u64>;

    /// Participant ids of `tournament` in join order.
    ///
    /// A tournament without participants, or a missing one, yields an empty list.
    fn participants(&mut self, tournament: TournamentId) -> StoreResult<Vec<UserId>>;
}

/// Durable storage for users, tournaments and participants.
pub trait EntityStore: Send + Sync {
    /// Runs `f` in a transaction.
    ///
    /// Commits if `f` returns `Ok` and the context has not fired by then;
    /// otherwise every write made through the transaction is rolled back.
    fn with_transaction<T, E, F>(&self, cx: &Context, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut dyn Transaction) -> Result<T, E>,
        E: From<StoreError>;
}
