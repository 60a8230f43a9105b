//! Picklist - selection state and keyboard interaction for searchable select widgets
//!
//! The crate follows the Elm Architecture: [`model::SelectModel`] holds the
//! state, [`messages::SelectMsg`] describes inputs, [`update::update`] is the
//! only place state changes, and [`commands::Cmd`] describes the side effects
//! a [`runtime::Runtime`] carries out against a [`runtime::Host`].

pub mod binding;
pub mod cli;
pub mod commands;
pub mod config;
pub mod config_paths;
pub mod events;
pub mod key_buffer;
pub mod messages;
pub mod model;
pub mod runtime;
pub mod tracing;
pub mod update;

pub use binding::BindingError;
pub use commands::Cmd;
pub use config::{ConfigError, SelectConfig, SelectHooks, TagJob, TagResolution};
pub use events::SelectEvent;
pub use messages::{Key, MouseTarget, SelectMsg};
pub use model::{CloseReason, ItemsList, OptionId, SelectModel, SelectOption};
pub use runtime::{Host, Runtime};
pub use update::update;
