//! Domain types shared across the storefront.
//!
//! Identifiers are newtypes: queue slots and orders mint UUIDs through the
//! environment's id source, while catalog-facing ids (events, sections,
//! users, cart references) stay opaque strings. Monetary amounts are integer
//! cents end to end; division by 100 happens only at display time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a queue slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SlotId(Uuid);

impl SlotId {
    /// Mint a new random slot id
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// The underlying UUID
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for SlotId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a completed order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderId(Uuid);

impl OrderId {
    /// Mint a new random order id
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// The underlying UUID
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for OrderId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

macro_rules! string_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(String);

        impl $name {
            /// Wrap a raw identifier
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// The identifier as a string slice
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_id! {
    /// Catalog identifier for an event
    EventId
}
string_id! {
    /// Identifier for a signed-in user, assigned by the session boundary
    UserId
}
string_id! {
    /// Catalog identifier for a venue section
    SectionId
}
string_id! {
    /// Reference from a cart line to the catalog entity it was added from
    RefId
}

/// Monetary amount in integer cents
///
/// All arithmetic stays in cents. Formatting to pesos happens in
/// [`crate::currency::format_clp`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct Money(u64);

impl Money {
    /// Zero cents
    pub const ZERO: Self = Self(0);

    /// Construct from an amount in cents
    #[must_use]
    pub const fn from_cents(cents: u64) -> Self {
        Self(cents)
    }

    /// The amount in cents
    #[must_use]
    pub const fn cents(self) -> u64 {
        self.0
    }

    /// Checked addition
    #[must_use]
    pub const fn checked_add(self, other: Self) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(cents) => Some(Self(cents)),
            None => None,
        }
    }

    /// Saturating addition
    #[must_use]
    pub const fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }

    /// Saturating multiplication by a unitless factor
    #[must_use]
    pub const fn saturating_mul(self, factor: u64) -> Self {
        Self(self.0.saturating_mul(factor))
    }
}

/// Queue slot lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueueStatus {
    /// In line, position decays on every tick
    Waiting,
    /// Position frozen by a purchased hold
    Held,
    /// Front of the line; terminal for this session
    Notified,
    /// Hold lapsed without purchase; slot is dead
    Expired,
}

impl fmt::Display for QueueStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Waiting => "waiting",
            Self::Held => "held",
            Self::Notified => "notified",
            Self::Expired => "expired",
        };
        f.write_str(label)
    }
}

/// A user's position record in the virtual queue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueSlot {
    /// Immutable identity, minted at join time
    pub slot_id: SlotId,
    /// Rank in the virtual queue, 0 means front
    pub position: u32,
    /// Lifecycle status
    pub status: QueueStatus,
    /// Derived wait estimate in minutes
    pub estimated_minutes: u32,
    /// Present only while a hold is active
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hold_expires_at: Option<DateTime<Utc>>,
}

/// What a cart line refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CartKind {
    /// Event ticket line
    Ticket,
    /// Merchandise line
    Merch,
    /// Locker service line
    Locker,
}

/// One line in the cart
///
/// `(kind, ref_id, name)` is the merge key: adding an equivalent item
/// increments `qty` of the existing line instead of appending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    /// Line category
    pub kind: CartKind,
    /// Catalog reference, when the line came from the catalog
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ref_id: Option<RefId>,
    /// Display label, part of the merge key
    pub name: String,
    /// Quantity, at least 1 while the line exists
    pub qty: u32,
    /// Unit price fixed at add time; never re-priced on merge
    pub unit_price: Money,
}

impl CartItem {
    /// Whether another item shares this line's merge key
    #[must_use]
    pub fn merges_with(&self, other: &Self) -> bool {
        self.kind == other.kind && self.ref_id == other.ref_id && self.name == other.name
    }

    /// Price contribution of this line
    #[must_use]
    pub const fn line_total(&self) -> Money {
        self.unit_price.saturating_mul(self.qty as u64)
    }
}

/// A recommended (and selectable) section/seat option
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeatOption {
    /// Section this option sits in
    pub section_id: SectionId,
    /// Human-readable section name
    pub section_name: String,
    /// Recommendation rank, 0-100
    pub score: u8,
    /// Why the advisor suggested it
    pub reason: String,
    /// Ticket price for this section
    pub price: Money,
}

/// Self-reported sex, input to the seat advisor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sex {
    /// Male
    #[serde(rename = "m")]
    Male,
    /// Female
    #[serde(rename = "f")]
    Female,
    /// Other / undisclosed
    #[serde(rename = "other")]
    Other,
}

/// Accessibility and fit preferences feeding seat recommendations
///
/// Everything is optional; absent values simply don't influence ranking.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserPreferences {
    /// Age in years
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u8>,
    /// Self-reported sex
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sex: Option<Sex>,
    /// Height in centimeters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height_cm: Option<u16>,
    /// Prefers sections with step-free access
    #[serde(default)]
    pub mobility_reduced: bool,
    /// Prefers sections close to the stage
    #[serde(default)]
    pub vision_problems: bool,
}

/// A signed-in user session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Session identity from the auth boundary
    pub id: UserId,
    /// Display name
    pub name: String,
    /// Contact phone, used for WhatsApp notices
    pub phone: String,
}

/// Successful hold response from the box office
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoldGrant {
    /// When the hold lapses if the turn is not used
    pub hold_expires_at: DateTime<Utc>,
}

/// Ranked seat recommendations for one request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeatAdvice {
    /// Best options first, at most three
    pub top: Vec<SeatOption>,
}

/// Merchandise catalog entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MerchItem {
    /// Catalog id
    pub id: u32,
    /// Display name
    pub name: String,
    /// Unit price
    pub price: Money,
    /// Search/display tags
    pub tags: Vec<String>,
    /// Short description
    pub description: String,
}

impl MerchItem {
    /// Cart line for `qty` units of this item, keyed to the catalog id
    #[must_use]
    pub fn cart_item(&self, qty: u32) -> CartItem {
        CartItem {
            kind: CartKind::Merch,
            ref_id: Some(RefId::new(self.id.to_string())),
            name: self.name.clone(),
            qty,
            unit_price: self.price,
        }
    }
}

/// Venue section as listed in the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    /// Catalog id
    pub id: SectionId,
    /// Display name
    pub name: String,
    /// Ticket price for this section
    pub price: Money,
    /// Remaining inventory
    pub available_seats: u32,
}

/// Event being sold
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventInfo {
    /// Catalog id
    pub id: EventId,
    /// Display name
    pub name: String,
    /// Scheduled start
    pub date: DateTime<Utc>,
    /// Venue name
    pub venue: String,
}

/// Merchandise pickup assignment issued at checkout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LockerInfo {
    /// Short human-readable code, e.g. `L4821`
    pub code: String,
    /// Payload to encode in the pickup QR
    pub qr_payload: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn money_arithmetic_stays_in_cents() {
        let price = Money::from_cents(250_000);
        assert_eq!(price.saturating_mul(2).cents(), 500_000);
        assert_eq!(
            price.checked_add(Money::from_cents(10_235_000)),
            Some(Money::from_cents(10_485_000))
        );
        assert_eq!(Money::from_cents(u64::MAX).checked_add(price), None);
    }

    #[test]
    fn cart_items_merge_on_full_key_only() {
        let polera = CartItem {
            kind: CartKind::Merch,
            ref_id: Some(RefId::from("1")),
            name: "Polera Oficial del Evento".into(),
            qty: 1,
            unit_price: Money::from_cents(2_500_000),
        };
        let same_key = CartItem { qty: 3, ..polera.clone() };
        let other_ref = CartItem {
            ref_id: Some(RefId::from("2")),
            ..polera.clone()
        };
        let other_kind = CartItem {
            kind: CartKind::Ticket,
            ..polera.clone()
        };

        assert!(polera.merges_with(&same_key));
        assert!(!polera.merges_with(&other_ref));
        assert!(!polera.merges_with(&other_kind));
    }

    #[test]
    fn queue_status_serializes_lowercase() {
        let json = serde_json::to_string(&QueueStatus::Notified).unwrap_or_default();
        assert_eq!(json, "\"notified\"");
    }

    #[test]
    fn slot_ids_are_unique() {
        assert_ne!(SlotId::new(), SlotId::new());
    }
}
