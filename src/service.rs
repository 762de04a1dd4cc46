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

//! The capability set transport adapters program against.

use crate::base::{TournamentId, UserId};
use crate::context::Context;
use crate::error::ServiceResult;
use crate::tournament::Tournament;
use crate::user::User;

/// Social tournaments service.
///
/// Every implementation returns the same [`ServiceError`](crate::ServiceError)
/// values for the same situations, so an adapter written once works against
/// any backend. The trait is object safe; pick a backend at startup and share
/// it as `Arc<dyn Service>`.
pub trait Service: Send + Sync {
    /// Registers a user with a zero balance.
    fn add_user(&self, cx: &Context, name: &str) -> ServiceResult<UserId>;

    /// Fails with `NotFound` if the user does not exist.
    fn get_user(&self, cx: &Context, id: UserId) -> ServiceResult<User>;

    /// Fails with `NotFound` if the user does not exist.
    fn delete_user(&self, cx: &Context, id: UserId) -> ServiceResult<()>;

    /// Adds `points` (possibly negative) to the balance. Fails with `NotFound`
    /// if the user does not exist.
    fn add_points(&self, cx: &Context, id: UserId, points: i64) -> ServiceResult<()>;

    /// Creates a tournament. Fails with `Validation` for a negative deposit.
    fn add_tournament(
        &self,
        cx: &Context,
        name: &str,
        deposit: i64,
    ) -> ServiceResult<TournamentId>;

    /// Fails with `NotFound` if the tournament does not exist and `Integrity`
    /// if it is finished without a winner.
    fn get_tournament(&self, cx: &Context, id: TournamentId) -> ServiceResult<Tournament>;

    /// Pays the deposit into the prize pool and registers the participant.
    fn join_tournament(
        &self,
        cx: &Context,
        tournament_id: TournamentId,
        user_id: UserId,
    ) -> ServiceResult<()>;
}
