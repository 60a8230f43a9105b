//! Message types for the Elm-style architecture
//!
//! Every input the select reacts to is a `SelectMsg`: user input, host
//! lifecycle calls, and completions of async work scheduled through `Cmd`.

use serde_json::Value;

use crate::config::DropdownPosition;
use crate::model::OptionId;

/// Keys with dedicated handling; everything else printable is `Char`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowDown,
    ArrowUp,
    Space,
    Enter,
    Tab,
    Escape,
    Backspace,
    Char(char),
}

impl Key {
    /// Parse a key name (`Down`, `Enter`, `Esc`, ...) or a single character
    pub fn parse(name: &str) -> Option<Key> {
        let key = match name.to_ascii_lowercase().as_str() {
            "down" | "arrowdown" => Key::ArrowDown,
            "up" | "arrowup" => Key::ArrowUp,
            "space" => Key::Space,
            "enter" | "return" => Key::Enter,
            "tab" => Key::Tab,
            "esc" | "escape" => Key::Escape,
            "backspace" => Key::Backspace,
            _ => {
                let mut chars = name.chars();
                match (chars.next(), chars.next()) {
                    (Some(ch), None) => Key::Char(ch),
                    _ => return None,
                }
            }
        };
        Some(key)
    }
}

/// Element under the pointer on mouse-down
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseTarget {
    /// The "clear all" glyph
    ClearIcon,
    /// The open/close arrow
    Arrow,
    /// The remove glyph on a selected value chip
    ValueIcon(OptionId),
    /// The filter input itself
    Input,
    /// Anywhere else on the control
    Control,
}

/// Select widget messages
#[derive(Debug, Clone)]
pub enum SelectMsg {
    /// Key pressed while the control has focus
    Key(Key),
    /// Mouse button pressed on the control
    MouseDown(MouseTarget),
    /// Filter input gained focus
    InputFocus,
    /// Filter input lost focus
    InputBlur,
    /// Pointer pressed outside the control while open
    ClickOutside,
    /// Pointer moved over an option in the panel
    ItemHover(OptionId),
    /// Option clicked in the panel
    ItemClick(OptionId),
    /// Filter input text replaced by the host's input element
    SetFilter(String),

    /// Programmatic open
    Open,
    /// Programmatic close
    Close,
    /// Programmatic toggle
    Toggle,
    /// Programmatic "clear all" (same as clicking the clear glyph)
    Clear,

    /// Replace the item pool
    SetItems(Vec<Value>),
    /// Value written in from the bound form
    WriteValue(Value),
    /// Enable/disable the control
    SetDisabled(bool),

    /// Rendered range reported by the virtual-scroll viewport
    ViewportChanged { start: usize, end: usize },
    /// Placement computed by the positioning collaborator
    PlacementResolved(DropdownPosition),

    // === Async completions ===
    /// Key buffer idle window elapsed
    KeyBufferFlush { generation: u64 },
    /// Deferred tag job finished (errors are swallowed)
    TagResolved {
        request: u64,
        result: Result<Value, String>,
    },
    /// External search produced a new pool
    TypeaheadResults { generation: u64, items: Vec<Value> },

    /// Widget torn down; all later messages are ignored
    Destroy,
}

// Convenience constructors for common messages
impl SelectMsg {
    pub fn key(key: Key) -> Self {
        SelectMsg::Key(key)
    }

    pub fn char(ch: char) -> Self {
        SelectMsg::Key(Key::Char(ch))
    }

    pub fn mouse_down(target: MouseTarget) -> Self {
        SelectMsg::MouseDown(target)
    }
}
