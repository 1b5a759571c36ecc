/// Events emitted during a simulation step.
/// The audio layer reacts to these; the order within a tick is the
/// order in which they happened.

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum GameEvent {
    Jump,
    Pickup,
    Hurt,
    /// All items on the level collected.
    Win,
}
