use std::time::Duration;

use stackfall_engine::{
    Block, GameEvent, GameSession, InputTiming, PieceKind, PieceSeed, RenderBoard, RenderCell,
    RotationDirection, SessionConfig, Shift,
};

const FRAME: Duration = Duration::from_millis(10);

fn push_to_wall(session: &mut GameSession, shift: Shift) {
    let step: fn(&mut GameSession) -> bool = match shift {
        Shift::Left => GameSession::try_move_left,
        Shift::Right => GameSession::try_move_right,
    };
    while step(session) {}
}

#[test]
fn first_fourteen_spawns_contain_each_kind_twice() {
    let mut session = GameSession::new();
    let mut spawned = Vec::new();
    for i in 0..14 {
        spawned.push(session.active_piece().kind());
        push_to_wall(&mut session, if i % 2 == 0 { Shift::Left } else { Shift::Right });
        session.hard_drop();
        assert!(session.session_state().is_playing());
    }
    for kind in PieceKind::ALL {
        assert_eq!(spawned.iter().filter(|&&k| k == kind).count(), 2, "{kind:?}");
    }
}

#[test]
fn ghost_marks_hard_drop_landing() {
    let mut session = GameSession::new();
    session.try_rotate(RotationDirection::Clockwise);
    let kind = session.active_piece().kind();
    let ghost: Vec<_> = session.ghost_piece().occupied_cells().collect();

    let render = RenderBoard::from_session(&session);
    for &(col, row) in &ghost {
        let cell = render.cell(col.try_into().unwrap(), row.try_into().unwrap());
        assert!(matches!(cell, RenderCell::Ghost(k) | RenderCell::Piece(k) if k == kind));
    }

    session.hard_drop();
    for (col, row) in ghost {
        assert_eq!(session.board().cell(col, row), Block::Piece(kind));
    }
}

#[test]
fn held_down_key_soft_drops_to_floor_and_locks() {
    let mut session = GameSession::with_config(SessionConfig {
        input: InputTiming {
            soft_drop: Duration::from_millis(20),
            ..InputTiming::default()
        },
        ..SessionConfig::default()
    });
    let start_row = session.active_piece().row();
    let landing_row = session.ghost_piece().row();
    session.take_events();
    session.set_soft_drop(true);

    let mut locked = None;
    for _ in 0..500 {
        session.tick(FRAME);
        let events = session.take_events();
        if let Some(GameEvent::PieceLocked { cleared_lines }) =
            events.into_iter().find(GameEvent::is_piece_locked)
        {
            locked = Some(cleared_lines);
            break;
        }
    }
    assert_eq!(locked, Some(0));
    let rows = usize::try_from(landing_row - start_row).unwrap();
    assert_eq!(session.stats().score(), rows);
    assert_eq!(session.stats().completed_pieces(), 1);
}

#[test]
fn seeded_games_replay_identically() {
    let seed: PieceSeed = "5eed5eed5eed5eed5eed5eed5eed5eed".parse().unwrap();
    let play = |session: &mut GameSession| {
        let mut events = Vec::new();
        for turn in 0..30 {
            session.set_horizontal(Some(if turn % 3 == 0 { Shift::Left } else { Shift::Right }));
            for _ in 0..(turn % 5) * 7 {
                session.tick(FRAME);
            }
            session.set_horizontal(None);
            if turn % 4 == 1 {
                session.hold();
            }
            session.try_rotate(RotationDirection::CounterClockwise);
            session.hard_drop();
            events.extend(session.take_events());
        }
        events
    };

    let mut a = GameSession::with_seed(seed);
    let mut b = GameSession::with_seed(seed);
    assert_eq!(play(&mut a), play(&mut b));
    assert_eq!(a.board(), b.board());
    assert_eq!(a.stats(), b.stats());
    assert_eq!(a.session_state(), b.session_state());
}

#[test]
fn restart_after_game_over() {
    let mut session = GameSession::new();
    while !session.session_state().is_game_over() {
        session.hard_drop();
    }
    let events = session.take_events();
    assert_eq!(events.iter().filter(|e| e.is_game_over()).count(), 1);

    session.reset();
    assert!(session.session_state().is_playing());
    assert_eq!(session.stats().score(), 0);
    assert!(session.board().rows().flatten().all(|cell| cell.is_empty()));
}
