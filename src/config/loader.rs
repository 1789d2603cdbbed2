//! Scenario config loading and validation

use super::types::ScenarioConfig;
use crate::error::{Error, Result};
use std::fs;
use std::path::Path;

/// Load a scenario config from a YAML or JSON file
pub fn load_scenario_config(path: impl AsRef<Path>) -> Result<ScenarioConfig> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| {
        Error::config(format!(
            "Failed to read scenario config '{}': {e}",
            path.display()
        ))
    })?;
    scenario_config_from_str(&content)
}

/// Parse a scenario config from YAML (JSON is accepted as well)
pub fn scenario_config_from_str(content: &str) -> Result<ScenarioConfig> {
    let config: ScenarioConfig = if content.trim().is_empty() {
        ScenarioConfig::default()
    } else {
        serde_yaml::from_str(content)?
    };
    config.validate()?;
    Ok(config)
}

/// Parse a scenario config from an inline JSON document
pub fn scenario_config_from_json(content: &str) -> Result<ScenarioConfig> {
    let config: ScenarioConfig = serde_json::from_str(content)?;
    config.validate()?;
    Ok(config)
}

impl ScenarioConfig {
    /// Reject values no scenario can run with
    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            return Err(Error::invalid_value("page_size", "must be positive"));
        }
        if self.chain_get_path.trim().is_empty() {
            return Err(Error::invalid_value("chain_get_path", "cannot be empty"));
        }
        if !self.motel.name_template.contains("{chain}") {
            return Err(Error::invalid_value(
                "motel.name_template",
                "must contain the {chain} placeholder",
            ));
        }
        if self.room_categories.categories.is_empty() {
            return Err(Error::invalid_value(
                "room_categories.categories",
                "at least one category is required",
            ));
        }
        if let Some(def) = self
            .room_categories
            .categories
            .iter()
            .find(|c| c.room_category_name.trim().is_empty())
        {
            return Err(Error::invalid_value(
                "room_categories.categories",
                format!("category '{}' has no roomCategoryName", def.display_name),
            ));
        }
        if self.rooms.floor_start > self.rooms.floor_end {
            return Err(Error::invalid_value(
                "rooms.floor_start",
                format!(
                    "{} is above floor_end {}",
                    self.rooms.floor_start, self.rooms.floor_end
                ),
            ));
        }
        if self.rooms.rooms_per_floor == 0 || self.rooms.rooms_per_floor > 99 {
            return Err(Error::invalid_value(
                "rooms.rooms_per_floor",
                "must be between 1 and 99",
            ));
        }
        if self.reservations.per_page == 0 {
            return Err(Error::invalid_value("reservations.per_page", "must be positive"));
        }
        if let Some(date) = &self.reservations.date {
            chrono::NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|e| {
                Error::invalid_value("reservations.date", format!("'{date}': {e}"))
            })?;
        }
        Ok(())
    }
}
