pub mod backend;
pub mod client;
pub mod commands;
pub mod error;
pub mod listener;
pub mod projections;
pub mod reconcile;
pub mod settings;
pub mod store;

pub use client::{ClubClient, EditHold};
pub use error::{CommandError, CommandResult};
pub use settings::Settings;
