/// What a key press asks the viewer to do.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyAction {
    PrimaryAction,
    ToggleFullscreen,
    ExitFullscreen,
}

/// Maps a `KeyboardEvent.key` value. The primary action only exists when
/// the counters are shown.
pub fn key_action(key: &str, counters: bool) -> Option<KeyAction> {
    match key {
        "Enter" | " " if counters => Some(KeyAction::PrimaryAction),
        "f" | "F" => Some(KeyAction::ToggleFullscreen),
        "Escape" => Some(KeyAction::ExitFullscreen),
        _ => None,
    }
}
