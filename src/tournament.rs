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

//! Tournaments and their prize pools.
//!
//! A tournament moves through two states:
//! - open: `finished == false`, no winner, accepts joins
//! - finished: `finished == true` with a recorded winner; terminal
//!
//! A finished row without a winner cannot be turned into a [`Tournament`].

use crate::base::{TournamentId, UserId};
use crate::error::ServiceError;
use crate::store::TournamentRecord;
use serde::ser::{Serialize, SerializeStruct, Serializer};

/// A tournament with its participants in join order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,
    pub deposit: u64,
    /// Always `deposit * users.len()`.
    pub prize: u64,
    pub finished: bool,
    /// Present exactly when `finished` is true.
    pub winner: Option<UserId>,
    pub users: Vec<UserId>,
}

impl Tournament {
    /// Assembles a tournament from its row and its participant list.
    ///
    /// A winner stored on an unfinished row is ignored.
    ///
    /// # Errors
    ///
    /// [`ServiceError::Integrity`] if the row is finished but has no winner.
    pub fn from_parts(record: TournamentRecord, users: Vec<UserId>) -> Result<Self, ServiceError> {
        let winner = match (record.finished, record.winner) {
            (true, None) => {
                return Err(ServiceError::Integrity(format!(
                    "tournament {} is finished but has no winner",
                    record.id
                )));
            }
            (true, winner) => winner,
            (false, _) => None,
        };

        Ok(Self {
            id: record.id,
            name: record.name,
            deposit: record.deposit,
            prize: record.prize,
            finished: record.finished,
            winner,
            users,
        })
    }
}

impl Serialize for Tournament {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        // `finished` is implied by the presence of `winner`.
        let fields = if self.winner.is_some() { 6 } else { 5 };
        let mut state = serializer.serialize_struct("Tournament", fields)?;
        state.serialize_field("id", &self.id)?;
        state.serialize_field("name", &self.name)?;
        state.serialize_field("deposit", &self.deposit)?;
        state.serialize_field("prize", &self.prize)?;
        match self.winner {
            Some(winner) => state.serialize_field("winner", &winner)?,
            None => state.skip_field("winner")?,
        }
        state.serialize_field("users", &self.users)?;
        state.end()
    }
}
