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

//! Participation engine: tournament creation, lookup and the join protocol.
//!
//! # Join protocol
//!
//! `join_tournament` runs as one transaction:
//!
//! 1. Lock the tournament row.
//! 2. Missing tournament: `NotFound`. Finished: `AlreadyFinished`.
//! 3. Debit the user by the deposit (`NotFound` if the user is missing).
//! 4. Credit the prize pool by the deposit.
//! 5. Insert the participant (`AlreadyJoined` on a repeat join).
//! 6. Commit.
//!
//! Any failure after step 1 rolls every write back. Concurrent joins on the same
//! tournament queue on its row lock, so each successful join adds exactly one
//! deposit to the pool. Joins on different tournaments do not contend.

use crate::base::{Entity, TournamentId, UserId};
use crate::context::Context;
use crate::error::{ServiceError, ServiceResult, StoreError};
use crate::ledger::{debit, require_name};
use crate::store::{EntityStore, ReadMode};
use crate::tournament::Tournament;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Tournament lifecycle operations.
pub struct Participation<S> {
    store: Arc<S>,
}

impl<S> Clone for Participation<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: EntityStore> Participation<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Creates an open tournament with an empty prize pool.
    ///
    /// `deposit` is signed so raw caller input can be passed straight through;
    /// the sign check lives here rather than in every adapter.
    ///
    /// # Errors
    ///
    /// - [`ServiceError::Validation`] - blank name or negative deposit.
    /// - [`ServiceError::Storage`] - the store failed or the context fired.
    pub fn add_tournament(
        &self,
        cx: &Context,
        name: &str,
        deposit: i64,
    ) -> ServiceResult<TournamentId> {
        require_name(Entity::Tournament, name)?;
        let deposit = u64::try_from(deposit).map_err(|_| {
            ServiceError::Validation(format!("deposit must not be negative, got {deposit}"))
        })?;

        let id = self
            .store
            .with_transaction(cx, |tx| -> ServiceResult<TournamentId> {
                Ok(tx.insert_tournament(name, deposit)?)
            })
            .map_err(|e| e.during(|| format!("add tournament {name:?}")))?;
        debug!(tournament = %id, deposit, "tournament added");
        Ok(id)
    }

    /// Loads a tournament together with its participants.
    ///
    /// A tournament nobody joined resolves with an empty participant list.
    ///
    /// # Errors
    ///
    /// - [`ServiceError::NotFound`] - no such tournament.
    /// - [`ServiceError::Integrity`] - finished without a recorded winner.
    /// - [`ServiceError::Storage`] - the store failed or the context fired.
    pub fn get_tournament(&self, cx: &Context, id: TournamentId) -> ServiceResult<Tournament> {
        let result = self
            .store
            .with_transaction(cx, |tx| -> ServiceResult<Tournament> {
                // Holding the row lock keeps the row and its participants in step.
                let record = tx
                    .get_tournament(id, ReadMode::Locked)?
                    .ok_or_else(|| ServiceError::tournament_not_found(id))?;
                let users = tx.participants(id)?;
                Tournament::from_parts(record, users)
            })
            .map_err(|e| e.during(|| format!("get tournament {id}")));

        if let Err(ServiceError::Integrity(reason)) = &result {
            warn!(tournament = %id, %reason, "tournament row violates invariants");
        }
        result
    }

    /// Moves the tournament's deposit from the user's balance into its prize
    /// pool and records the user as a participant.
    ///
    /// # Errors
    ///
    /// - [`ServiceError::NotFound`] - no such tournament or user.
    /// - [`ServiceError::AlreadyFinished`] - the tournament is finished.
    /// - [`ServiceError::AlreadyJoined`] - the user is already a participant.
    /// - [`ServiceError::Validation`] - the debit or credit overflows.
    /// - [`ServiceError::Storage`] - the store failed or the context fired.
    pub fn join_tournament(
        &self,
        cx: &Context,
        tournament_id: TournamentId,
        user_id: UserId,
    ) -> ServiceResult<()> {
        let deposit = self
            .store
            .with_transaction(cx, |tx| -> ServiceResult<u64> {
                let tournament = tx
                    .get_tournament(tournament_id, ReadMode::Locked)?
                    .ok_or_else(|| ServiceError::tournament_not_found(tournament_id))?;
                if tournament.finished {
                    return Err(ServiceError::AlreadyFinished(tournament_id));
                }
                let deposit = tournament.deposit;

                // Debit strictly before credit.
                debit(tx, user_id, deposit)?;

                match tx.credit_prize(tournament_id, deposit) {
                    Ok(0) => {
                        return Err(ServiceError::Integrity(format!(
                            "tournament {tournament_id} disappeared while locked"
                        )));
                    }
                    Ok(_) => {}
                    Err(StoreError::OutOfRange { .. }) => {
                        return Err(ServiceError::Validation(format!(
                            "joining tournament {tournament_id} overflows its prize pool"
                        )));
                    }
                    Err(e) => return Err(e.into()),
                }

                match tx.insert_participant(tournament_id, user_id) {
                    Ok(()) => Ok(deposit),
                    Err(StoreError::UniqueViolation { .. }) => Err(ServiceError::AlreadyJoined {
                        tournament_id,
                        user_id,
                    }),
                    Err(e) => Err(e.into()),
                }
            })
            .map_err(|e| {
                e.during(|| format!("join tournament {tournament_id} as user {user_id}"))
            })?;

        info!(tournament = %tournament_id, user = %user_id, deposit, "user joined tournament");
        Ok(())
    }
}
