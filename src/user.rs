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

//! Users and their point balances.
//!
//! # Example
//!
//! ```
//! use social_tournaments_rs::{Service, Context, Engine};
//!
//! let engine = Engine::in_memory();
//! let cx = Context::background();
//! let id = engine.add_user(&cx, "ilya").unwrap();
//! let user = engine.get_user(&cx, id).unwrap();
//! assert_eq!(user.balance, 0);
//! ```

use crate::base::UserId;
use crate::store::UserRecord;
use serde::{Deserialize, Serialize};

/// A registered user.
///
/// Snapshot of the committed row at read time. The balance is signed: joins
/// debit deposits without a floor, so it may be negative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub balance: i64,
}

impl From<UserRecord> for User {
    fn from(record: UserRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            balance: record.balance,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_to_flat_json() {
        let user = User {
            id: UserId(1),
            name: "ilya".to_owned(),
            balance: -1000,
        };
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"id": 1, "name": "ilya", "balance": -1000})
        );
    }
}
