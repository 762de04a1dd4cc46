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

//! # Social Tournaments
//!
//! This library keeps user point balances and tournament prize pools
//! consistent: users join tournaments by paying a deposit into the prize pool,
//! and money is never created or destroyed along the way.
//!
//! ## Core Components
//!
//! - [`Service`]: The capability set transport adapters call
//! - [`Engine`]: Store-backed [`Service`] implementation
//! - [`Ledger`]: User balances (add, adjust, delete)
//! - [`Participation`]: Tournament creation, lookup and the atomic join
//! - [`EntityStore`]: Transactional storage contract, with [`MemoryStore`] as
//!   the in-process implementation
//! - [`ServiceError`]: Error taxonomy shared by every backend
//!
//! ## Example
//!
//! ```
//! use social_tournaments_rs::{Context, Engine, Service, TournamentId, UserId};
//!
//! let engine = Engine::in_memory();
//! let cx = Context::background();
//!
//! let user = engine.add_user(&cx, "ilya").unwrap();
//! let tournament = engine.add_tournament(&cx, "poker", 1000).unwrap();
//! engine.join_tournament(&cx, tournament, user).unwrap();
//!
//! assert_eq!(engine.get_user(&cx, user).unwrap().balance, -1000);
//! let poker = engine.get_tournament(&cx, TournamentId(1)).unwrap();
//! assert_eq!(poker.prize, 1000);
//! assert_eq!(poker.users, vec![UserId(1)]);
//! ```
//!
//! ## Thread Safety
//!
//! Operations on different tournaments and users run in parallel. Joins on the
//! same tournament serialize on its row lock inside the store.

mod base;
mod config;
mod context;
mod engine;
pub mod error;
mod ledger;
mod participation;
mod service;
pub mod store;
mod tournament;
mod user;

pub use base::{Entity, TournamentId, UserId};
pub use config::StoreConfig;
pub use context::Context;
pub use engine::Engine;
pub use error::{ErrorKind, ServiceError, ServiceResult, StoreError, StoreResult};
pub use ledger::Ledger;
pub use participation::Participation;
pub use service::Service;
pub use store::{EntityStore, MemoryStore, Transaction};
pub use tournament::Tournament;
pub use user::User;
