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

//! Tournament lifecycle and join protocol integration tests.

use social_tournaments_rs::store::ReadMode;
use social_tournaments_rs::{
    Context, Engine, Entity, EntityStore, ErrorKind, MemoryStore, Service, ServiceError,
    StoreConfig, TournamentId, UserId,
};
use std::thread;
use std::time::Duration;

fn tournament_not_found(id: i64) -> ServiceError {
    ServiceError::NotFound {
        entity: Entity::Tournament,
        id,
    }
}

/// Engine with user "ilya" (id 1) and tournament "poker" (id 1, deposit 1000).
fn poker() -> (Engine<MemoryStore>, Context) {
    let engine = Engine::in_memory();
    let cx = Context::background();
    assert_eq!(engine.add_user(&cx, "ilya").unwrap(), UserId(1));
    assert_eq!(
        engine.add_tournament(&cx, "poker", 1000).unwrap(),
        TournamentId(1)
    );
    (engine, cx)
}

#[test]
fn new_tournament_is_open_and_empty() {
    let (engine, cx) = poker();

    let tournament = engine.get_tournament(&cx, TournamentId(1)).unwrap();

    assert_eq!(tournament.name, "poker");
    assert_eq!(tournament.deposit, 1000);
    assert_eq!(tournament.prize, 0);
    assert!(!tournament.finished);
    assert_eq!(tournament.winner, None);
    assert!(tournament.users.is_empty());
}

#[test]
fn join_moves_deposit_into_prize_pool() {
    let (engine, cx) = poker();

    engine
        .join_tournament(&cx, TournamentId(1), UserId(1))
        .unwrap();

    assert_eq!(engine.get_user(&cx, UserId(1)).unwrap().balance, -1000);
    let tournament = engine.get_tournament(&cx, TournamentId(1)).unwrap();
    assert_eq!(tournament.id, TournamentId(1));
    assert_eq!(tournament.name, "poker");
    assert_eq!(tournament.deposit, 1000);
    assert_eq!(tournament.prize, 1000);
    assert_eq!(tournament.users, vec![UserId(1)]);
}

#[test]
fn participants_are_listed_in_join_order() {
    let (engine, cx) = poker();
    let second = engine.add_user(&cx, "anna").unwrap();
    let third = engine.add_user(&cx, "oleg").unwrap();

    engine.join_tournament(&cx, TournamentId(1), third).unwrap();
    engine
        .join_tournament(&cx, TournamentId(1), UserId(1))
        .unwrap();
    engine.join_tournament(&cx, TournamentId(1), second).unwrap();

    let tournament = engine.get_tournament(&cx, TournamentId(1)).unwrap();
    assert_eq!(tournament.users, vec![third, UserId(1), second]);
    assert_eq!(tournament.prize, 3000);
}

#[test]
fn join_only_touches_the_joining_user_and_tournament() {
    let (engine, cx) = poker();
    let bystander = engine.add_user(&cx, "anna").unwrap();
    engine.add_points(&cx, bystander, 50).unwrap();
    let other = engine.add_tournament(&cx, "chess", 10).unwrap();

    engine
        .join_tournament(&cx, TournamentId(1), UserId(1))
        .unwrap();

    assert_eq!(engine.get_user(&cx, bystander).unwrap().balance, 50);
    assert_eq!(engine.get_tournament(&cx, other).unwrap().prize, 0);
}

#[test]
fn join_missing_tournament_is_not_found() {
    let (engine, cx) = poker();

    assert_eq!(
        engine.join_tournament(&cx, TournamentId(999), UserId(1)),
        Err(tournament_not_found(999))
    );
    assert_eq!(engine.get_user(&cx, UserId(1)).unwrap().balance, 0);
}

#[test]
fn join_by_missing_user_leaves_tournament_untouched() {
    let (engine, cx) = poker();

    assert_eq!(
        engine.join_tournament(&cx, TournamentId(1), UserId(77)),
        Err(ServiceError::NotFound {
            entity: Entity::User,
            id: 77,
        })
    );

    let tournament = engine.get_tournament(&cx, TournamentId(1)).unwrap();
    assert_eq!(tournament.prize, 0);
    assert!(tournament.users.is_empty());
}

#[test]
fn join_by_deleted_user_is_not_found() {
    let (engine, cx) = poker();
    engine.delete_user(&cx, UserId(1)).unwrap();

    let err = engine
        .join_tournament(&cx, TournamentId(1), UserId(1))
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(engine.get_tournament(&cx, TournamentId(1)).unwrap().prize, 0);
}

#[test]
fn deleting_a_participant_keeps_the_participant_record() {
    let (engine, cx) = poker();
    engine
        .join_tournament(&cx, TournamentId(1), UserId(1))
        .unwrap();

    engine.delete_user(&cx, UserId(1)).unwrap();

    let tournament = engine.get_tournament(&cx, TournamentId(1)).unwrap();
    assert_eq!(tournament.users, vec![UserId(1)]);
    assert_eq!(tournament.prize, 1000);
}

#[test]
fn finished_tournament_rejects_joins() {
    let (engine, cx) = poker();
    let winner = engine.add_user(&cx, "anna").unwrap();
    engine.join_tournament(&cx, TournamentId(1), winner).unwrap();
    assert!(
        engine
            .store()
            .finish_tournament(&cx, TournamentId(1), Some(winner))
            .unwrap()
    );

    assert_eq!(
        engine.join_tournament(&cx, TournamentId(1), UserId(1)),
        Err(ServiceError::AlreadyFinished(TournamentId(1)))
    );

    assert_eq!(engine.get_user(&cx, UserId(1)).unwrap().balance, 0);
    let tournament = engine.get_tournament(&cx, TournamentId(1)).unwrap();
    assert!(tournament.finished);
    assert_eq!(tournament.winner, Some(winner));
    assert_eq!(tournament.prize, 1000);
    assert_eq!(tournament.users, vec![winner]);
}

#[test]
fn finished_without_winner_is_integrity_error() {
    let (engine, cx) = poker();
    engine
        .store()
        .finish_tournament(&cx, TournamentId(1), None)
        .unwrap();

    let err = engine.get_tournament(&cx, TournamentId(1)).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Integrity);
    assert!(!err.is_retryable());
}

#[test]
fn get_missing_tournament_is_not_found() {
    let (engine, cx) = poker();
    assert_eq!(
        engine.get_tournament(&cx, TournamentId(2)),
        Err(tournament_not_found(2))
    );
}

#[test]
fn negative_deposit_is_validation_error() {
    let engine = Engine::in_memory();
    let err = engine
        .add_tournament(&Context::background(), "poker", -5)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
}

#[test]
fn join_waiting_past_its_deadline_rolls_back() {
    let engine = Engine::in_memory_with_config(StoreConfig {
        lock_timeout_ms: 5_000,
        lock_poll_interval_ms: 2,
        ..StoreConfig::default()
    });
    let cx = Context::background();
    let user = engine.add_user(&cx, "ilya").unwrap();
    let tournament = engine.add_tournament(&cx, "poker", 1000).unwrap();

    // Hold the tournament row lock from an unrelated transaction.
    let outcome = engine
        .store()
        .with_transaction(&cx, |tx| -> Result<_, ServiceError> {
            tx.get_tournament(tournament, ReadMode::Locked)?;
            Ok(thread::scope(|s| {
                s.spawn(|| {
                    let deadline = Context::with_timeout(Duration::from_millis(30));
                    engine.join_tournament(&deadline, tournament, user)
                })
                .join()
                .unwrap()
            }))
        })
        .unwrap();

    let err = outcome.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Storage);
    assert!(err.is_retryable());
    assert_eq!(engine.get_user(&cx, user).unwrap().balance, 0);
    assert_eq!(engine.get_tournament(&cx, tournament).unwrap().prize, 0);
}
