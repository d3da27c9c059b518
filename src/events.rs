pub enum Event {
    GameEvent(GameEvent),
    AppEvent(AppEvent),
}

pub enum GameEvent {
    /// Start, or restart, the game
    Start,

    /// Steer in a direction, each component in `-1..=1`
    Move { dx: i8, dy: i8 },
}

pub enum AppEvent {
    /// Exit the application
    Exit,
}
