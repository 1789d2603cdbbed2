//! Configuration module
//!
//! Two layers, both constructed once by the CLI:
//! - [`Settings`] - connection, logging and run length (flags / environment)
//! - [`ScenarioConfig`] - per-scenario knobs (YAML or JSON document)

mod loader;
mod settings;
mod types;

pub use loader::{load_scenario_config, scenario_config_from_json, scenario_config_from_str};
pub use settings::{seconds, Settings};
pub use types::{
    default_categories, CategoryDef, MotelTemplate, ReservationConfig, RoomCategorySeed,
    RoomSeed, ScenarioConfig,
};

#[cfg(test)]
mod tests;
