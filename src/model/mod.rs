//! Select model - option records, the selection engine, and widget state
//!
//! This module contains the state types following the Elm Architecture pattern.

pub mod items_list;
pub mod option;
pub mod select;

pub use items_list::ItemsList;
pub use option::{
    build_options, default_matches, display_value, lookup_path, resolve_nested, set_path,
    OptionId, OptionKind, SelectOption,
};
pub use select::{CloseReason, SelectModel};
