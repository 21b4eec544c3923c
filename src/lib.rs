pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{JsonFileStore, LocalStorage, OpenAiInterpreter};
pub use config::TomlConfig;
pub use core::{reading::ReadingService, session::DrawSession};
pub use utils::error::{Result, TarotError};
