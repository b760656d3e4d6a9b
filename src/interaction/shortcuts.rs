use egui::{Event, Key};

/// Board-level keyboard commands
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShortcutAction {
    /// Send the selected item back to the panel, or delete it if it is a block
    RemoveSelected,
    /// Drop the selection and abandon any drag or resize in progress
    Cancel,
}

pub fn action_for_key(key: Key) -> Option<ShortcutAction> {
    match key {
        Key::Delete | Key::Backspace => Some(ShortcutAction::RemoveSelected),
        Key::Escape => Some(ShortcutAction::Cancel),
        _ => None,
    }
}

/// Actions for the key presses in one frame's input events. Key repeats and
/// releases are ignored, as are presses held with Ctrl or Alt.
pub fn actions_from_events(events: &[Event]) -> Vec<ShortcutAction> {
    events
        .iter()
        .filter_map(|event| match event {
            Event::Key {
                key,
                pressed: true,
                repeat: false,
                modifiers,
                ..
            } if !modifiers.ctrl && !modifiers.alt => action_for_key(*key),
            _ => None,
        })
        .collect()
}
