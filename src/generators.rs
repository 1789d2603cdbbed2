//! Creation payloads
//!
//! [`motel_chain_payload`] fabricates a random chain. The other builders
//! are pure mappings from a source record to request bodies and never
//! modify the record.

use crate::config::{CategoryDef, MotelTemplate, ReservationConfig, RoomSeed};
use crate::enrichment::{CHAIN_ID_KEYS, CHAIN_NAME_KEYS};
use crate::envelope::fields;
use crate::types::Record;
use chrono::{Days, NaiveDate};
use fake::faker::address::en::{CityName, PostCode, StateAbbr, StreetName};
use fake::faker::internet::en::SafeEmail;
use fake::faker::lorem::en::Sentence;
use fake::faker::name::en::{FirstName, LastName};
use fake::Fake;
use rand::seq::IndexedRandom;
use rand::Rng;
use serde_json::{json, Value};
use uuid::Uuid;

pub const US_STATES: &[&str] = &[
    "AL", "AK", "AZ", "AR", "CA", "CO", "CT", "DE", "FL", "GA", "HI", "ID", "IL", "IN", "IA",
    "KS", "KY", "LA", "ME", "MD", "MA", "MI", "MN", "MS", "MO", "MT", "NE", "NV", "NH", "NJ",
    "NM", "NY", "NC", "ND", "OH", "OK", "OR", "PA", "RI", "SC", "SD", "TN", "TX", "UT", "VT",
    "VA", "WA", "WV", "WI", "WY",
];

const BRAND_TAGS: &[&str] = &["Suites", "Inns", "Lodges", "Residency", "Boutique", "Select"];
const LANDMARKS: &[&str] = &["HEB", "Walmart", "Airport", "Convention Center", "Downtown"];
const ADDRESS_NAMES: &[&str] = &["HeadQuarters", "Main Office", "Corporate"];
const CONTACT_POSITIONS: &[&str] = &["CEO", "COO", "VP Ops", "Director"];
const CONTACT_TYPES: &[&str] = &["Executive", "Operations", "Owner"];

/// Three in four chains are active
const CHAIN_STATUSES: &[&str] = &["Active", "Active", "Active", "Inactive"];

/// Chain name used when the source chain has none
pub const FALLBACK_CHAIN_NAME: &str = "Motel Chain";

fn pick<R: Rng + ?Sized>(rng: &mut R, options: &[&'static str]) -> &'static str {
    options.choose(rng).copied().unwrap_or_default()
}

fn truncate(s: &str, max_chars: usize) -> String {
    s.chars().take(max_chars).collect()
}

// ============================================================================
// Motel Chains
// ============================================================================

/// Random motel chain creation body
pub fn motel_chain_payload() -> Value {
    motel_chain_payload_with(&mut rand::rng())
}

/// [`motel_chain_payload`] with a caller-supplied generator
pub fn motel_chain_payload_with<R: Rng + ?Sized>(rng: &mut R) -> Value {
    let owner: String = LastName().fake_with_rng(rng);
    let chain_name = format!("The {owner}'s {}", pick(rng, BRAND_TAGS));
    let street: String = StreetName().fake_with_rng(rng);
    let city: String = CityName().fake_with_rng(rng);
    let state_abbr: String = StateAbbr().fake_with_rng(rng);
    let postcode: String = PostCode().fake_with_rng(rng);
    let phone: String = (0..10).map(|_| char::from(b'0' + rng.random_range(0..10u8))).collect();
    let first: String = FirstName().fake_with_rng(rng);
    let last: String = LastName().fake_with_rng(rng);
    let email: String = SafeEmail().fake_with_rng(rng);
    let description: String = Sentence(8..9).fake_with_rng(rng);

    json!({
        "motelChainName": chain_name,
        "displayName": chain_name,
        "state": pick(rng, US_STATES),
        "pincode": truncate(&postcode.replace(' ', ""), 10),
        "status": pick(rng, CHAIN_STATUSES),
        "address": {
            "addressLine1": truncate(&format!("{chain_name} {street}"), 60),
            "addressLine2": format!("{city}, {state_abbr}"),
            "landmark": pick(rng, LANDMARKS),
            "addressName": pick(rng, ADDRESS_NAMES),
            "status": "Active",
        },
        "contactInfo": {
            "phoneNumber": phone,
            "email": email,
            "contactName": format!("{first} {last}"),
            "contactPosition": pick(rng, CONTACT_POSITIONS),
            "contactType": pick(rng, CONTACT_TYPES),
            "contactDescription": description,
            "status": "Active",
        },
    })
}

// ============================================================================
// Motels
// ============================================================================

/// Motel creation body for one chain
pub fn motel_from_chain(chain: &Record, template: &MotelTemplate) -> Value {
    let chain_name =
        fields::text(chain, CHAIN_NAME_KEYS).unwrap_or_else(|| FALLBACK_CHAIN_NAME.to_string());

    json!({
        "motelChainId": fields::text(chain, CHAIN_ID_KEYS),
        "motelName": template.name_template.replace("{chain}", &chain_name),
        "status": template.status,
        "pincode": fields::str_field(chain, "pincode").unwrap_or_else(|| template.pincode.clone()),
        "state": fields::str_field(chain, "state").unwrap_or_else(|| template.state.clone()),
    })
}

// ============================================================================
// Room Categories
// ============================================================================

/// Room category creation body, with a fresh category id
pub fn room_category_payload(
    motel_id: &str,
    chain_id: &str,
    def: &CategoryDef,
    status: &str,
) -> Value {
    json!({
        "motelRoomCategoryId": Uuid::new_v4().to_string(),
        "motelChainId": chain_id,
        "motelId": motel_id,
        "displayName": def.display_name,
        "roomCategoryName": def.room_category_name,
        "description": def.description,
        "status": status,
    })
}

// ============================================================================
// Rooms
// ============================================================================

/// Floor followed by a two-digit index: floor 3, room 1 → `"301"`
pub fn room_number(floor: u32, index_on_floor: u32) -> String {
    format!("{floor}{index_on_floor:02}")
}

/// Ids a room category must carry before rooms can be created in it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryIds {
    pub motel_chain_id: String,
    pub motel_id: String,
    pub motel_room_category_id: String,
}

impl CategoryIds {
    /// `None` when any id is missing
    pub fn from_record(category: &Record) -> Option<Self> {
        Some(Self {
            motel_chain_id: fields::str_field(category, "motelChainId")?,
            motel_id: fields::str_field(category, "motelId")?,
            motel_room_category_id: fields::str_field(category, "motelRoomCategoryId")?,
        })
    }
}

/// One creation body per room, floor by floor
pub fn room_payloads(ids: &CategoryIds, seed: &RoomSeed) -> Vec<Value> {
    (seed.floor_start..=seed.floor_end)
        .flat_map(|floor| (1..=seed.rooms_per_floor).map(move |i| (floor, i)))
        .map(|(floor, i)| {
            json!({
                "motelChainId": ids.motel_chain_id,
                "motelId": ids.motel_id,
                "motelRoomCategoryId": ids.motel_room_category_id,
                "roomNumber": room_number(floor, i),
                "floor": floor.to_string(),
                "status": seed.status,
            })
        })
        .collect()
}

// ============================================================================
// Reservations
// ============================================================================

/// Whether an availability record can be booked under `config`
pub fn is_bookable(candidate: &Record, config: &ReservationConfig) -> bool {
    let available = candidate
        .get("available_room_number")
        .and_then(fields::int)
        .unwrap_or(0);
    let matches = |key: &str, wanted: &Option<String>| match wanted.as_deref() {
        None => true,
        Some(w) => candidate.get(key).and_then(Value::as_str) == Some(w),
    };

    fields::status(candidate) == "active"
        && available > 0
        && matches("room_type", &config.room_type)
        && matches("date", &config.date)
}

/// One-night reservation body for an availability record.
///
/// Check-in is the record's `date`, or `today` when it is not a plain
/// `YYYY-MM-DD` date.
pub fn reservation_payload(
    candidate: &Record,
    config: &ReservationConfig,
    today: NaiveDate,
) -> Value {
    let check_in = candidate
        .get("date")
        .and_then(Value::as_str)
        .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
        .unwrap_or(today);
    let check_out = check_in.checked_add_days(Days::new(1)).unwrap_or(check_in);
    // prices are sent as text
    let price = fields::str_field(candidate, "price");
    let category_name =
        fields::str_field(candidate, "room_type").unwrap_or_else(|| "Standard".to_string());

    json!({
        "motel_id": candidate.get("motel_id"),
        "motel_chain_id": candidate.get("motel_chain_id"),
        "motel_room_category_id": candidate.get("motel_room_category_id"),
        "motel_room_category_name": category_name,
        "price": price,
        "status": config.status,
        "name": config.name,
        "email": config.email,
        "check_in": check_in.format("%Y-%m-%d").to_string(),
        "check_out": check_out.format("%Y-%m-%d").to_string(),
    })
}
