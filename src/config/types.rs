//! Scenario configuration types
//!
//! Every field has a default, so an empty document is a valid config.

use serde::{Deserialize, Serialize};

// ============================================================================
// Top-Level Scenario Config
// ============================================================================

/// Knobs for every scenario, constructed and validated once per run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioConfig {
    /// Page size for the motel API list endpoints
    pub page_size: u32,

    /// Resolve chain names before crawling motels
    pub chain_lookup: bool,

    /// Source of motel chains for creation flows
    pub chain_get_path: String,

    /// Chain statuses eligible for motel creation; empty means all
    pub chain_allowed_status: Vec<String>,

    /// Motel count at which `post_motel_from_chain` stops creating
    pub max_motels: u64,

    /// Motel creation payload
    pub motel: MotelTemplate,

    /// Room category seeding
    pub room_categories: RoomCategorySeed,

    /// Room seeding
    pub rooms: RoomSeed,

    /// Reservation API crawling and booking
    pub reservations: ReservationConfig,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            page_size: 50,
            chain_lookup: true,
            chain_get_path: "/motelApi/v1/motelChains".to_string(),
            chain_allowed_status: Vec::new(),
            max_motels: 50,
            motel: MotelTemplate::default(),
            room_categories: RoomCategorySeed::default(),
            rooms: RoomSeed::default(),
            reservations: ReservationConfig::default(),
        }
    }
}

// ============================================================================
// Motel Creation
// ============================================================================

/// Fields of a motel created from a chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotelTemplate {
    /// Motel name; `{chain}` is replaced by the chain name
    pub name_template: String,
    pub status: String,
    /// Used when the chain has no pincode
    pub pincode: String,
    /// Used when the chain has no state
    pub state: String,
}

impl Default for MotelTemplate {
    fn default() -> Self {
        Self {
            name_template: "{chain} - Motel1".to_string(),
            status: "Active".to_string(),
            pincode: "00000".to_string(),
            state: "TX".to_string(),
        }
    }
}

// ============================================================================
// Room Categories
// ============================================================================

/// One room category to create per motel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDef {
    pub display_name: String,
    pub room_category_name: String,
    /// Also accepted under the misspelled key `desicription`
    #[serde(default, alias = "desicription")]
    pub description: String,
}

impl CategoryDef {
    pub fn new(display_name: &str, room_category_name: &str, description: &str) -> Self {
        Self {
            display_name: display_name.to_string(),
            room_category_name: room_category_name.to_string(),
            description: description.to_string(),
        }
    }
}

/// Categories created when none are configured
pub fn default_categories() -> Vec<CategoryDef> {
    vec![
        CategoryDef::new("Regular Room", "Regular", "Regular room 400 sqft"),
        CategoryDef::new(
            "Deluxe Room",
            "Deluxe",
            "Spacious deluxe room with king bed, 550 sqft",
        ),
        CategoryDef::new(
            "Suite",
            "Suite",
            "Luxury suite with separate living area, 750 sqft",
        ),
        CategoryDef::new("Economy Room", "Economy", "Compact and affordable room, 300 sqft"),
    ]
}

/// `seed_room_categories` settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoomCategorySeed {
    /// Creation endpoint
    pub path: String,
    /// Skip motels whose status is not active
    pub only_active: bool,
    /// Status of created categories
    pub status: String,
    pub categories: Vec<CategoryDef>,
}

impl Default for RoomCategorySeed {
    fn default() -> Self {
        Self {
            path: "/motelApi/v1/motelRoomCategories".to_string(),
            only_active: true,
            status: "Active".to_string(),
            categories: default_categories(),
        }
    }
}

// ============================================================================
// Rooms
// ============================================================================

/// `seed_motel_rooms` settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoomSeed {
    /// Creation endpoint
    pub post_path: String,
    /// First floor, inclusive
    pub floor_start: u32,
    /// Last floor, inclusive
    pub floor_end: u32,
    pub rooms_per_floor: u32,
    /// Status of created rooms
    pub status: String,
    /// Skip categories whose status is not active
    pub only_active_categories: bool,
}

impl Default for RoomSeed {
    fn default() -> Self {
        Self {
            post_path: "/motelApi/v1/motelRooms".to_string(),
            floor_start: 0,
            floor_end: 3,
            rooms_per_floor: 5,
            status: "Active".to_string(),
            only_active_categories: true,
        }
    }
}

// ============================================================================
// Reservations
// ============================================================================

/// Reservation API paging and booking identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReservationConfig {
    /// First page requested (the API is one-based)
    pub start_page: u32,
    pub per_page: u32,
    pub page_param: String,
    pub per_page_param: String,
    /// Only book availability of this room type
    pub room_type: Option<String>,
    /// Only book availability on this date (`YYYY-MM-DD`)
    pub date: Option<String>,
    pub name: String,
    pub email: String,
    pub status: String,
}

impl Default for ReservationConfig {
    fn default() -> Self {
        Self {
            start_page: 1,
            per_page: 50,
            page_param: "page".to_string(),
            per_page_param: "per_page".to_string(),
            room_type: None,
            date: None,
            name: "John Doe".to_string(),
            email: "john.doe@example.com".to_string(),
            status: "Confirmed".to_string(),
        }
    }
}
