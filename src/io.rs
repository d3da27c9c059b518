use crossterm::event::Event as CrossTermEvent;
use crossterm::event::KeyCode;
use crossterm::event::KeyEvent;
use crossterm::event::KeyEventKind;
use crossterm::event::KeyModifiers;

use crate::events::AppEvent;
use crate::events::Event;
use crate::events::GameEvent;
use crate::session::FrameInput;

/// Converts a crossterm event into a game event
pub fn convert_event(event: CrossTermEvent) -> Option<Event> {
    let CrossTermEvent::Key(key_event) = event else {
        return None;
    };

    if key_event.kind == KeyEventKind::Release {
        return None;
    }

    let game = |e| Some(Event::GameEvent(e));

    match key_event {
        KeyEvent {
            code: KeyCode::Char('q') | KeyCode::Esc,
            ..
        }
        | KeyEvent {
            code: KeyCode::Char('c'),
            modifiers: KeyModifiers::CONTROL,
            ..
        } => Some(Event::AppEvent(AppEvent::Exit)),

        KeyEvent {
            code: KeyCode::Char('x' | ' ') | KeyCode::Enter,
            ..
        } => game(GameEvent::Start),

        KeyEvent {
            code: KeyCode::Left | KeyCode::Char('h'),
            ..
        } => game(GameEvent::Move { dx: -1, dy: 0 }),
        KeyEvent {
            code: KeyCode::Down | KeyCode::Char('j'),
            ..
        } => game(GameEvent::Move { dx: 0, dy: 1 }),
        KeyEvent {
            code: KeyCode::Up | KeyCode::Char('k'),
            ..
        } => game(GameEvent::Move { dx: 0, dy: -1 }),
        KeyEvent {
            code: KeyCode::Right | KeyCode::Char('l'),
            ..
        } => game(GameEvent::Move { dx: 1, dy: 0 }),

        _ => None,
    }
}

/// Fold a game event into this frame's input. Moves along both axes combine.
pub fn apply(input: &mut FrameInput, event: GameEvent) {
    match event {
        GameEvent::Start => input.start = true,
        GameEvent::Move { dx, dy } => {
            let (x, y) = input.direction;
            input.direction = ((x + dx).clamp(-1, 1), (y + dy).clamp(-1, 1));
        }
    }
}
