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

//! Store-backed implementation of [`Service`].
//!
//! The [`Engine`] owns no state of its own: it routes user operations to the
//! [`Ledger`] and tournament operations to [`Participation`], both of which
//! talk to the shared [`EntityStore`].
//!
//! # Thread Safety
//!
//! The engine is `Send + Sync` and can be shared across threads behind an
//! [`Arc`]. Concurrency control lives entirely in the store.

use crate::base::{TournamentId, UserId};
use crate::config::StoreConfig;
use crate::context::Context;
use crate::error::ServiceResult;
use crate::ledger::Ledger;
use crate::participation::Participation;
use crate::service::Service;
use crate::store::{EntityStore, MemoryStore};
use crate::tournament::Tournament;
use crate::user::User;
use std::sync::Arc;

/// Ledger and participation engines over one store.
pub struct Engine<S> {
    store: Arc<S>,
    ledger: Ledger<S>,
    participation: Participation<S>,
}

impl<S: EntityStore> Engine<S> {
    pub fn new(store: Arc<S>) -> Self {
        Engine {
            ledger: Ledger::new(Arc::clone(&store)),
            participation: Participation::new(Arc::clone(&store)),
            store,
        }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn ledger(&self) -> &Ledger<S> {
        &self.ledger
    }

    pub fn participation(&self) -> &Participation<S> {
        &self.participation
    }
}

impl Engine<MemoryStore> {
    /// An engine over a fresh in-process store.
    pub fn in_memory() -> Self {
        Self::in_memory_with_config(StoreConfig::default())
    }

    pub fn in_memory_with_config(config: StoreConfig) -> Self {
        Self::new(Arc::new(MemoryStore::with_config(config)))
    }
}

impl Default for Engine<MemoryStore> {
    fn default() -> Self {
        Self::in_memory()
    }
}

impl<S: EntityStore> Service for Engine<S> {
    fn add_user(&self, cx: &Context, name: &str) -> ServiceResult<UserId> {
        self.ledger.add_user(cx, name)
    }

    fn get_user(&self, cx: &Context, id: UserId) -> ServiceResult<User> {
        self.ledger.get_user(cx, id)
    }

    fn delete_user(&self, cx: &Context, id: UserId) -> ServiceResult<()> {
        self.ledger.delete_user(cx, id)
    }

    fn add_points(&self, cx: &Context, id: UserId, points: i64) -> ServiceResult<()> {
        self.ledger.adjust_balance(cx, id, points)
    }

    fn add_tournament(
        &self,
        cx: &Context,
        name: &str,
        deposit: i64,
    ) -> ServiceResult<TournamentId> {
        self.participation.add_tournament(cx, name, deposit)
    }

    fn get_tournament(&self, cx: &Context, id: TournamentId) -> ServiceResult<Tournament> {
        self.participation.get_tournament(cx, id)
    }

    fn join_tournament(
        &self,
        cx: &Context,
        tournament_id: TournamentId,
        user_id: UserId,
    ) -> ServiceResult<()> {
        self.participation
            .join_tournament(cx, tournament_id, user_id)
    }
}
