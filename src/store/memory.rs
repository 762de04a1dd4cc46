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

//! In-process entity store with row-level locking.
//!
//! Every row lives behind its own [`Mutex`]. A transaction locks each row it
//! writes (or reads with [`ReadMode::Locked`]) and keeps the lock until it
//! commits or rolls back, so no other transaction observes uncommitted state.
//! Rollback restores the before-image captured when the lock was taken.
//!
//! # Lock order
//!
//! Tournament rows are always locked before user rows. Joins lock the
//! tournament first, while balance updates and deletes touch a single user row,
//! so lock waits cannot form a cycle.

use super::{
    Change, EntityStore, Journal, ReadMode, Table, TournamentRecord, Transaction, UserRecord,
};
use crate::base::{TournamentId, UserId};
use crate::config::StoreConfig;
use crate::context::Context;
use crate::error::{StoreError, StoreResult};
use dashmap::DashMap;
use parking_lot::lock_api::ArcMutexGuard;
use parking_lot::{Mutex, RawMutex};
use std::hash::Hash;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Instant;
use tracing::{debug, warn};

/// A row plus its visibility.
///
/// `live` is false for rows deleted by a committed transaction and for inserts
/// that were rolled back; readers that raced the unlink see the row as absent.
#[derive(Debug, Clone)]
struct Slot<T> {
    row: T,
    live: bool,
}

type Row<T> = Arc<Mutex<Slot<T>>>;
type RowGuard<T> = ArcMutexGuard<RawMutex, Slot<T>>;

#[derive(Debug, Clone)]
struct UserRow {
    name: String,
    balance: i64,
}

#[derive(Debug, Clone)]
struct TournamentRow {
    name: String,
    deposit: u64,
    prize: u64,
    finished: bool,
    winner: Option<UserId>,
    /// Child rows of the participants table, in insertion order.
    participants: Vec<UserId>,
}

trait RowKey: Copy + Eq + Hash {
    const TABLE: Table;

    fn from_raw(raw: i64) -> Self;

    fn raw(self) -> i64;
}

impl RowKey for UserId {
    const TABLE: Table = Table::Users;

    fn from_raw(raw: i64) -> Self {
        UserId(raw)
    }

    fn raw(self) -> i64 {
        self.0
    }
}

impl RowKey for TournamentId {
    const TABLE: Table = Table::Tournaments;

    fn from_raw(raw: i64) -> Self {
        TournamentId(raw)
    }

    fn raw(self) -> i64 {
        self.0
    }
}

/// A table: rows by key plus the id sequence.
#[derive(Debug)]
struct Rows<K: Eq + Hash, T> {
    rows: DashMap<K, Row<T>>,
    sequence: AtomicI64,
}

impl<K: RowKey, T> Rows<K, T> {
    fn new() -> Self {
        Self {
            rows: DashMap::new(),
            sequence: AtomicI64::new(0),
        }
    }

    /// Ids are handed out once; a rolled-back insert burns its id.
    fn next_id(&self) -> K {
        K::from_raw(self.sequence.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Clones the row handle so the map shard is not held while waiting on the
    /// row lock.
    fn lookup(&self, id: K) -> Option<Row<T>> {
        self.rows.get(&id).map(|entry| Arc::clone(entry.value()))
    }

    fn unlink(&self, id: K, row: &Row<T>) {
        self.rows.remove_if(&id, |_, current| Arc::ptr_eq(current, row));
    }
}

/// A row locked by a transaction together with its state before the lock.
struct Held<K, T> {
    id: K,
    row: Row<T>,
    guard: RowGuard<T>,
    before: Slot<T>,
}

/// Entity store keeping every table in process memory.
///
/// # Example
///
/// ```
/// use social_tournaments_rs::{Context, EntityStore, MemoryStore, ServiceError};
///
/// let store = MemoryStore::new();
/// let cx = Context::background();
/// let id = store
///     .with_transaction(&cx, |tx| Ok::<_, ServiceError>(tx.insert_user("ilya")?))
///     .unwrap();
/// assert_eq!(id.0, 1);
/// ```
#[derive(Debug)]
pub struct MemoryStore {
    config: StoreConfig,
    users: Rows<UserId, UserRow>,
    tournaments: Rows<TournamentId, TournamentRow>,
    journal: Journal,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::with_config(StoreConfig::default())
    }

    pub fn with_config(config: StoreConfig) -> Self {
        Self {
            journal: Journal::with_capacity(config.journal_capacity),
            config,
            users: Rows::new(),
            tournaments: Rows::new(),
        }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Recent committed changes, bounded by
    /// [`StoreConfig::journal_capacity`] and empty when that is zero.
    pub fn journal(&self) -> &Journal {
        &self.journal
    }

    /// Marks a tournament finished and records its winner.
    ///
    /// Settlement is not a service operation; this is the hook for whatever
    /// settles tournaments outside the engine. `winner` may be `None`, which
    /// leaves the tournament in a state the engine reports as an integrity
    /// violation.
    ///
    /// Returns `false` if the tournament does not exist.
    ///
    /// # Errors
    ///
    /// Fails if the context fires or the row lock cannot be acquired.
    pub fn finish_tournament(
        &self,
        cx: &Context,
        id: TournamentId,
        winner: Option<UserId>,
    ) -> StoreResult<bool> {
        cx.check()?;
        let mut tx = MemoryTx::begin(self, cx);
        let Some(index) = tx.lock_tournament(id)? else {
            return Ok(false);
        };
        let row = &mut tx.tournaments[index].guard.row;
        row.finished = true;
        row.winner = winner;
        tx.changes.push(Change::TournamentFinished {
            tournament: id,
            winner,
        });
        tx.commit()?;
        Ok(true)
    }

    /// Waits for a row lock, re-checking the context between polls.
    fn acquire<K: RowKey, T>(&self, cx: &Context, id: K, row: &Row<T>) -> StoreResult<RowGuard<T>> {
        let started = Instant::now();
        loop {
            cx.check()?;
            if let Some(guard) = row.try_lock_arc_for(self.config.lock_poll_interval()) {
                return Ok(guard);
            }
            if started.elapsed() >= self.config.lock_timeout() {
                let table = K::TABLE;
                warn!(%table, id = id.raw(), "lock wait timed out");
                return Err(StoreError::LockTimeout {
                    table: K::TABLE,
                    id: id.raw(),
                });
            }
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityStore for MemoryStore {
    fn with_transaction<T, E, F>(&self, cx: &Context, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut dyn Transaction) -> Result<T, E>,
        E: From<StoreError>,
    {
        cx.check()?;
        let mut tx = MemoryTx::begin(self, cx);
        // An early return drops `tx`, which rolls it back.
        let value = f(&mut tx)?;
        tx.commit()?;
        Ok(value)
    }
}

struct MemoryTx<'s> {
    store: &'s MemoryStore,
    cx: &'s Context,
    users: Vec<Held<UserId, UserRow>>,
    tournaments: Vec<Held<TournamentId, TournamentRow>>,
    changes: Vec<Change>,
    done: bool,
}

impl<'s> MemoryTx<'s> {
    fn begin(store: &'s MemoryStore, cx: &'s Context) -> Self {
        Self {
            store,
            cx,
            users: Vec::new(),
            tournaments: Vec::new(),
            changes: Vec::new(),
            done: false,
        }
    }

    fn lock_user(&mut self, id: UserId) -> StoreResult<Option<usize>> {
        lock_row(self.store, self.cx, &self.store.users, &mut self.users, id)
    }

    fn lock_tournament(&mut self, id: TournamentId) -> StoreResult<Option<usize>> {
        lock_row(
            self.store,
            self.cx,
            &self.store.tournaments,
            &mut self.tournaments,
            id,
        )
    }

    fn commit(mut self) -> StoreResult<()> {
        // Last chance to honour cancellation; failing here rolls back on drop.
        self.cx.check()?;

        for held in self.users.iter().filter(|held| !held.guard.live) {
            self.store.users.unlink(held.id, &held.row);
        }
        for held in self.tournaments.iter().filter(|held| !held.guard.live) {
            self.store.tournaments.unlink(held.id, &held.row);
        }

        // Journal while the locks are still held so commits on the same rows
        // are appended in the order they were applied.
        let changes = std::mem::take(&mut self.changes);
        if !changes.is_empty() {
            debug!(changes = changes.len(), "transaction committed");
        }
        self.store.journal.record(changes);
        self.done = true;
        Ok(())
    }

    fn rollback(&mut self) {
        let touched = self.users.len() + self.tournaments.len();
        restore(&self.store.tournaments, &mut self.tournaments);
        restore(&self.store.users, &mut self.users);
        self.changes.clear();
        if touched > 0 {
            debug!(rows = touched, "transaction rolled back");
        }
    }
}

impl Drop for MemoryTx<'_> {
    fn drop(&mut self) {
        if !self.done {
            self.rollback();
        }
    }
}

impl Transaction for MemoryTx<'_> {
    fn insert_user(&mut self, name: &str) -> StoreResult<UserId> {
        self.cx.check()?;
        let id = self.store.users.next_id();
        let row = UserRow {
            name: name.to_owned(),
            balance: 0,
        };
        insert_row(&self.store.users, &mut self.users, id, row);
        self.changes.push(Change::UserInserted { user: id });
        Ok(id)
    }

    fn insert_tournament(&mut self, name: &str, deposit: u64) -> StoreResult<TournamentId> {
        self.cx.check()?;
        let id = self.store.tournaments.next_id();
        let row = TournamentRow {
            name: name.to_owned(),
            deposit,
            prize: 0,
            finished: false,
            winner: None,
            participants: Vec::new(),
        };
        insert_row(&self.store.tournaments, &mut self.tournaments, id, row);
        self.changes.push(Change::TournamentInserted {
            tournament: id,
            deposit,
        });
        Ok(id)
    }

    fn insert_participant(&mut self, tournament: TournamentId, user: UserId) -> StoreResult<()> {
        self.cx.check()?;
        // Tournament first, then the user read, keeping the global lock order.
        let Some(index) = self.lock_tournament(tournament)? else {
            return Err(StoreError::ForeignKeyViolation {
                table: Table::Tournaments,
                id: tournament.0,
            });
        };
        let user_exists = read_row(
            self.store,
            self.cx,
            &self.store.users,
            &self.users,
            user,
            |_| (),
        )?
        .is_some();
        if !user_exists {
            return Err(StoreError::ForeignKeyViolation {
                table: Table::Users,
                id: user.0,
            });
        }

        let participants = &mut self.tournaments[index].guard.row.participants;
        if participants.contains(&user) {
            return Err(StoreError::UniqueViolation {
                table: Table::Participants,
            });
        }
        participants.push(user);
        self.changes
            .push(Change::ParticipantAdded { tournament, user });
        Ok(())
    }

    fn get_user(&mut self, id: UserId) -> StoreResult<Option<UserRecord>> {
        self.cx.check()?;
        read_row(
            self.store,
            self.cx,
            &self.store.users,
            &self.users,
            id,
            |row| UserRecord {
                id,
                name: row.name.clone(),
                balance: row.balance,
            },
        )
    }

    fn get_tournament(
        &mut self,
        id: TournamentId,
        mode: ReadMode,
    ) -> StoreResult<Option<TournamentRecord>> {
        self.cx.check()?;
        match mode {
            ReadMode::Committed => read_row(
                self.store,
                self.cx,
                &self.store.tournaments,
                &self.tournaments,
                id,
                |row| tournament_record(id, row),
            ),
            ReadMode::Locked => Ok(self
                .lock_tournament(id)?
                .map(|index| tournament_record(id, &self.tournaments[index].guard.row))),
        }
    }

    fn delete_user(&mut self, id: UserId) -> StoreResult<u64> {
        self.cx.check()?;
        let Some(index) = self.lock_user(id)? else {
            return Ok(0);
        };
        self.users[index].guard.live = false;
        self.changes.push(Change::UserDeleted { user: id });
        Ok(1)
    }

    fn adjust_balance(&mut self, id: UserId, delta: i64) -> StoreResult<u64> {
        self.cx.check()?;
        let Some(index) = self.lock_user(id)? else {
            return Ok(0);
        };
        let row = &mut self.users[index].guard.row;
        row.balance = row
            .balance
            .checked_add(delta)
            .ok_or(StoreError::OutOfRange {
                table: Table::Users,
                column: "balance",
            })?;
        self.changes
            .push(Change::BalanceAdjusted { user: id, delta });
        Ok(1)
    }

    fn credit_prize(&mut self, id: TournamentId, amount: u64) -> StoreResult<u64> {
        self.cx.check()?;
        let Some(index) = self.lock_tournament(id)? else {
            return Ok(0);
        };
        let row = &mut self.tournaments[index].guard.row;
        row.prize = row.prize.checked_add(amount).ok_or(StoreError::OutOfRange {
            table: Table::Tournaments,
            column: "prize",
        })?;
        self.changes.push(Change::PrizeCredited {
            tournament: id,
            amount,
        });
        Ok(1)
    }

    fn participants(&mut self, tournament: TournamentId) -> StoreResult<Vec<UserId>> {
        self.cx.check()?;
        let participants = read_row(
            self.store,
            self.cx,
            &self.store.tournaments,
            &self.tournaments,
            tournament,
            |row| row.participants.clone(),
        )?;
        Ok(participants.unwrap_or_default())
    }
}

fn tournament_record(id: TournamentId, row: &TournamentRow) -> TournamentRecord {
    TournamentRecord {
        id,
        name: row.name.clone(),
        deposit: row.deposit,
        prize: row.prize,
        finished: row.finished,
        winner: row.winner,
    }
}

/// Locks `id` for the rest of the transaction and returns its index in `held`.
///
/// `None` if the row does not exist or this transaction deleted it.
fn lock_row<K: RowKey, T: Clone>(
    store: &MemoryStore,
    cx: &Context,
    table: &Rows<K, T>,
    held: &mut Vec<Held<K, T>>,
    id: K,
) -> StoreResult<Option<usize>> {
    if let Some(index) = held.iter().position(|h| h.id == id) {
        return Ok(held[index].guard.live.then_some(index));
    }
    let Some(row) = table.lookup(id) else {
        return Ok(None);
    };
    let guard = store.acquire(cx, id, &row)?;
    if !guard.live {
        return Ok(None);
    }
    let before = (*guard).clone();
    held.push(Held {
        id,
        row,
        guard,
        before,
    });
    Ok(Some(held.len() - 1))
}

/// Reads this transaction's version of a row it holds, otherwise the latest
/// committed version. The row lock is only taken for the duration of `read`.
fn read_row<K: RowKey, T, R>(
    store: &MemoryStore,
    cx: &Context,
    table: &Rows<K, T>,
    held: &[Held<K, T>],
    id: K,
    read: impl FnOnce(&T) -> R,
) -> StoreResult<Option<R>> {
    if let Some(held) = held.iter().find(|h| h.id == id) {
        return Ok(held.guard.live.then(|| read(&held.guard.row)));
    }
    let Some(row) = table.lookup(id) else {
        return Ok(None);
    };
    let guard = store.acquire(cx, id, &row)?;
    Ok(guard.live.then(|| read(&guard.row)))
}

/// Publishes a new row already locked by the inserting transaction, so other
/// transactions block on it until commit instead of seeing it early.
fn insert_row<K: RowKey, T: Clone>(table: &Rows<K, T>, held: &mut Vec<Held<K, T>>, id: K, row: T) {
    let slot = Arc::new(Mutex::new(Slot {
        row: row.clone(),
        live: true,
    }));
    let guard = slot.lock_arc();
    table.rows.insert(id, Arc::clone(&slot));
    held.push(Held {
        id,
        row: slot,
        guard,
        before: Slot { row, live: false },
    });
}

/// Puts back the before-images, newest lock first, and unlinks rolled-back
/// inserts.
fn restore<K: RowKey, T>(table: &Rows<K, T>, held: &mut Vec<Held<K, T>>) {
    for mut entry in held.drain(..).rev() {
        let inserted = !entry.before.live;
        *entry.guard = entry.before;
        if inserted {
            table.unlink(entry.id, &entry.row);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    fn insert_user(store: &MemoryStore, name: &str) -> UserId {
        store
            .with_transaction(&Context::background(), |tx| tx.insert_user(name))
            .unwrap()
    }

    fn balance(store: &MemoryStore, id: UserId) -> Option<i64> {
        store
            .with_transaction(&Context::background(), |tx| tx.get_user(id))
            .unwrap()
            .map(|user| user.balance)
    }

    #[test]
    fn ids_are_sequential_per_table() {
        let store = MemoryStore::new();
        assert_eq!(insert_user(&store, "a"), UserId(1));
        assert_eq!(insert_user(&store, "b"), UserId(2));
        let tournament = store
            .with_transaction(&Context::background(), |tx| tx.insert_tournament("t", 10))
            .unwrap();
        assert_eq!(tournament, TournamentId(1));
    }

    #[test]
    fn failed_transaction_restores_before_images() {
        let store = MemoryStore::new();
        let id = insert_user(&store, "ilya");

        let result: StoreResult<()> = store.with_transaction(&Context::background(), |tx| {
            assert_eq!(tx.adjust_balance(id, 500)?, 1);
            assert_eq!(tx.get_user(id)?.map(|u| u.balance), Some(500));
            Err(StoreError::Unavailable("boom".into()))
        });

        assert!(result.is_err());
        assert_eq!(balance(&store, id), Some(0));
    }

    #[test]
    fn rolled_back_insert_is_unlinked_and_its_id_burned() {
        let store = MemoryStore::new();
        let result: StoreResult<UserId> = store.with_transaction(&Context::background(), |tx| {
            tx.insert_user("ghost")?;
            Err(StoreError::Cancelled)
        });
        assert!(result.is_err());
        assert!(store.users.rows.is_empty());
        assert_eq!(balance(&store, UserId(1)), None);
        assert_eq!(insert_user(&store, "real"), UserId(2));
    }

    #[test]
    fn delete_is_visible_after_commit_only() {
        let store = MemoryStore::new();
        let id = insert_user(&store, "ilya");
        let affected = store
            .with_transaction(&Context::background(), |tx| {
                let affected = tx.delete_user(id)?;
                assert_eq!(tx.get_user(id)?, None);
                assert_eq!(tx.adjust_balance(id, 1)?, 0);
                Ok::<_, StoreError>(affected)
            })
            .unwrap();
        assert_eq!(affected, 1);
        assert_eq!(balance(&store, id), None);
        assert!(store.users.rows.is_empty());
    }

    #[test]
    fn adjust_balance_overflow_is_out_of_range() {
        let store = MemoryStore::new();
        let id = insert_user(&store, "rich");
        let result = store.with_transaction(&Context::background(), |tx| {
            tx.adjust_balance(id, i64::MAX)?;
            tx.adjust_balance(id, 1)
        });
        assert_eq!(
            result,
            Err(StoreError::OutOfRange {
                table: Table::Users,
                column: "balance"
            })
        );
        assert_eq!(balance(&store, id), Some(0));
    }

    #[test]
    fn duplicate_participant_is_unique_violation() {
        let store = MemoryStore::new();
        let user = insert_user(&store, "ilya");
        let result = store.with_transaction(&Context::background(), |tx| {
            let tournament = tx.insert_tournament("poker", 0)?;
            tx.insert_participant(tournament, user)?;
            tx.insert_participant(tournament, user)
        });
        assert_eq!(
            result,
            Err(StoreError::UniqueViolation {
                table: Table::Participants
            })
        );
    }

    #[test]
    fn participant_requires_both_parents() {
        let store = MemoryStore::new();
        let result = store.with_transaction(&Context::background(), |tx| {
            let tournament = tx.insert_tournament("poker", 0)?;
            tx.insert_participant(tournament, UserId(99))
        });
        assert_eq!(
            result,
            Err(StoreError::ForeignKeyViolation {
                table: Table::Users,
                id: 99
            })
        );
    }

    #[test]
    fn lock_wait_times_out() {
        let store = MemoryStore::with_config(StoreConfig {
            lock_timeout_ms: 30,
            lock_poll_interval_ms: 5,
            ..StoreConfig::default()
        });
        let id = insert_user(&store, "busy");

        store
            .with_transaction(&Context::background(), |tx| {
                tx.adjust_balance(id, 10)?;
                thread::scope(|s| {
                    let waiter = s.spawn(|| {
                        store.with_transaction(&Context::background(), |other| {
                            other.adjust_balance(id, 1)
                        })
                    });
                    assert_eq!(
                        waiter.join().unwrap(),
                        Err(StoreError::LockTimeout {
                            table: Table::Users,
                            id: id.0
                        })
                    );
                });
                Ok::<_, StoreError>(())
            })
            .unwrap();

        assert_eq!(balance(&store, id), Some(10));
    }

    #[test]
    fn lock_wait_honours_cancellation() {
        let store = MemoryStore::new();
        let id = insert_user(&store, "busy");
        let cx = Context::background();

        store
            .with_transaction(&Context::background(), |tx| {
                tx.adjust_balance(id, 10)?;
                thread::scope(|s| {
                    let waiter = s.spawn(|| {
                        store.with_transaction(&cx, |other| other.get_user(id))
                    });
                    thread::sleep(Duration::from_millis(20));
                    cx.cancel();
                    assert_eq!(waiter.join().unwrap(), Err(StoreError::Cancelled));
                });
                Ok::<_, StoreError>(())
            })
            .unwrap();
    }

    #[test]
    fn finish_tournament_sets_flag_and_winner() {
        let store = MemoryStore::new();
        let cx = Context::background();
        let tournament = store
            .with_transaction(&cx, |tx| tx.insert_tournament("poker", 5))
            .unwrap();

        assert!(store.finish_tournament(&cx, tournament, Some(UserId(3))).unwrap());
        assert!(!store.finish_tournament(&cx, TournamentId(42), None).unwrap());

        let record = store
            .with_transaction(&cx, |tx| tx.get_tournament(tournament, ReadMode::Committed))
            .unwrap()
            .unwrap();
        assert!(record.finished);
        assert_eq!(record.winner, Some(UserId(3)));
    }

    fn journaled_store() -> MemoryStore {
        MemoryStore::with_config(StoreConfig {
            journal_capacity: 64,
            ..StoreConfig::default()
        })
    }

    #[test]
    fn journal_records_committed_changes_only() {
        let store = journaled_store();
        let id = insert_user(&store, "ilya");
        let _: StoreResult<()> = store.with_transaction(&Context::background(), |tx| {
            tx.adjust_balance(id, 7)?;
            Err(StoreError::Cancelled)
        });
        store
            .with_transaction(&Context::background(), |tx| tx.adjust_balance(id, -3))
            .unwrap();

        let changes: Vec<Change> = store
            .journal()
            .drain()
            .into_iter()
            .flat_map(|commit| commit.changes)
            .collect();
        assert_eq!(
            changes,
            vec![
                Change::UserInserted { user: id },
                Change::BalanceAdjusted { user: id, delta: -3 },
            ]
        );
    }

    #[test]
    fn journal_is_off_by_default() {
        let store = MemoryStore::new();
        let id = insert_user(&store, "ilya");
        for _ in 0..1_000 {
            store
                .with_transaction(&Context::background(), |tx| tx.adjust_balance(id, 1))
                .unwrap();
        }

        assert!(!store.journal().is_enabled());
        assert_eq!(store.journal().len(), 0);
        assert_eq!(balance(&store, id), Some(1_000));
    }

    #[test]
    fn journal_stays_within_capacity() {
        let store = journaled_store();
        let id = insert_user(&store, "ilya");
        for _ in 0..1_000 {
            store
                .with_transaction(&Context::background(), |tx| tx.adjust_balance(id, 1))
                .unwrap();
        }

        assert_eq!(store.journal().len(), 64);
        assert_eq!(store.journal().overwritten(), 1_001 - 64);
        let commits = store.journal().drain();
        assert_eq!(commits.last().map(|c| c.sequence), Some(1_001));
    }

    #[test]
    fn store_is_debug() {
        let store = MemoryStore::new();
        insert_user(&store, "ilya");
        assert!(format!("{store:?}").starts_with("MemoryStore"));
    }
}
