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

//! Ledger engine: the only code path that changes a user's balance.
//!
//! Balances change through a single store-level `balance = balance + delta`
//! statement. Not-found is detected from the affected-row count of the
//! mutation itself, never from a separate lookup, so there is no window between
//! a check and the write.

use crate::base::{Entity, UserId};
use crate::context::Context;
use crate::error::{ServiceError, ServiceResult, StoreError};
use crate::store::{EntityStore, Transaction};
use crate::user::User;
use std::sync::Arc;
use tracing::{debug, info};

/// User creation, lookup, deletion and balance adjustment.
pub struct Ledger<S> {
    store: Arc<S>,
}

impl<S> Clone for Ledger<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: EntityStore> Ledger<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Inserts a user with a zero balance and returns its id.
    ///
    /// # Errors
    ///
    /// - [`ServiceError::Validation`] - `name` is blank.
    /// - [`ServiceError::Storage`] - the store failed or the context fired.
    pub fn add_user(&self, cx: &Context, name: &str) -> ServiceResult<UserId> {
        require_name(Entity::User, name)?;
        let id = self
            .store
            .with_transaction(cx, |tx| -> ServiceResult<UserId> {
                Ok(tx.insert_user(name)?)
            })
            .map_err(|e| e.during(|| format!("add user {name:?}")))?;
        debug!(user = %id, "user added");
        Ok(id)
    }

    /// # Errors
    ///
    /// - [`ServiceError::NotFound`] - no such user.
    /// - [`ServiceError::Storage`] - the store failed or the context fired.
    pub fn get_user(&self, cx: &Context, id: UserId) -> ServiceResult<User> {
        self.store
            .with_transaction(cx, |tx| -> ServiceResult<User> {
                tx.get_user(id)?
                    .map(User::from)
                    .ok_or_else(|| ServiceError::user_not_found(id))
            })
            .map_err(|e| e.during(|| format!("get user {id}")))
    }

    /// Hard-deletes a user. Participant records of the user are kept.
    ///
    /// # Errors
    ///
    /// - [`ServiceError::NotFound`] - the delete affected no row.
    /// - [`ServiceError::Storage`] - the store failed or the context fired.
    pub fn delete_user(&self, cx: &Context, id: UserId) -> ServiceResult<()> {
        self.store
            .with_transaction(cx, |tx| -> ServiceResult<()> {
                match tx.delete_user(id)? {
                    0 => Err(ServiceError::user_not_found(id)),
                    _ => Ok(()),
                }
            })
            .map_err(|e| e.during(|| format!("delete user {id}")))?;
        info!(user = %id, "user deleted");
        Ok(())
    }

    /// Adds `delta` (possibly negative) to the user's balance.
    ///
    /// There is no floor: a balance may go below zero.
    ///
    /// # Errors
    ///
    /// - [`ServiceError::NotFound`] - the update affected no row.
    /// - [`ServiceError::Validation`] - the new balance does not fit in an `i64`.
    /// - [`ServiceError::Storage`] - the store failed or the context fired.
    pub fn adjust_balance(&self, cx: &Context, id: UserId, delta: i64) -> ServiceResult<()> {
        self.store
            .with_transaction(cx, |tx| apply_delta(tx, id, delta))
            .map_err(|e| e.during(|| format!("adjust balance of user {id}")))?;
        debug!(user = %id, delta, "balance adjusted");
        Ok(())
    }
}

/// Applies a balance delta inside an open transaction.
pub(crate) fn apply_delta(tx: &mut dyn Transaction, id: UserId, delta: i64) -> ServiceResult<()> {
    match tx.adjust_balance(id, delta) {
        Ok(0) => Err(ServiceError::user_not_found(id)),
        Ok(_) => Ok(()),
        Err(StoreError::OutOfRange { .. }) => Err(ServiceError::Validation(format!(
            "adjusting user {id} by {delta} overflows the balance"
        ))),
        Err(e) => Err(e.into()),
    }
}

/// Debits `amount` from a user inside an open transaction.
pub(crate) fn debit(tx: &mut dyn Transaction, id: UserId, amount: u64) -> ServiceResult<()> {
    let delta = i64::try_from(amount)
        .map(|amount| -amount)
        .map_err(|_| ServiceError::Validation(format!("debit of {amount} exceeds the balance range")))?;
    apply_delta(tx, id, delta)
}

/// Names must contain something other than whitespace.
pub(crate) fn require_name(entity: Entity, name: &str) -> ServiceResult<()> {
    if name.trim().is_empty() {
        return Err(ServiceError::Validation(format!("{entity} name must not be empty")));
    }
    Ok(())
}
