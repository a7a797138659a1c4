/// Keyboard key identifier.
///
/// Only the keys the demos react to are named. The runtime maps everything else
/// to `Key::Unknown` carrying the platform key code.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Key {
    Escape,
    Enter,
    Space,
    Tab,
    Backspace,

    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,

    /// Platform-dependent key not represented here.
    Unknown(u32),
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum KeyState {
    Pressed,
    Released,
}

/// Platform-agnostic input event.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Window focus gained (`true`) or lost (`false`).
    Focused(bool),

    /// Keyboard key transition.
    Key {
        key: Key,
        state: KeyState,
        repeat: bool,
    },
}
