//! Aggregate state for the storefront.
//!
//! One [`StorefrontState`] instance lives behind the store for the whole
//! application run. The persisted subset is exactly `{cart, seat_selection,
//! whatsapp_connected}`; the user session and queue slot never survive a
//! restart.

use crate::types::{
    CartItem, CartKind, LockerInfo, Money, OrderId, QueueSlot, SeatOption, User, UserPreferences,
};
use chrono::{DateTime, Utc};

/// Severity of a user-facing notice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    /// Confirmation or progress message
    Info,
    /// Something degraded but the flow continues
    Warning,
    /// The requested action did not happen
    Error,
}

/// Transient, dismissable user-facing message
///
/// Exactly one notice slot exists; a newer notice replaces the previous one
/// and `DismissNotice` clears it.
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    /// Severity
    pub level: NoticeLevel,
    /// Message shown to the user
    pub message: String,
}

impl Notice {
    /// Informational notice
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    /// Warning notice
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }

    /// Error notice
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// Where the simulated checkout currently stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CheckoutPhase {
    /// No checkout in flight
    #[default]
    Idle,
    /// Payment settling (and locker assignment, when merch is present)
    Processing,
    /// Order confirmed; summary in `last_order`
    Completed,
}

/// Summary of the most recent completed order
#[derive(Debug, Clone, PartialEq)]
pub struct OrderSummary {
    /// Order identity
    pub order_id: OrderId,
    /// The ticket bought with this order
    pub seat: SeatOption,
    /// Ticket contribution
    pub ticket_total: Money,
    /// Merchandise contribution
    pub merch_total: Money,
    /// Grand total in cents
    pub total: Money,
    /// Pickup locker, when the order contained merchandise
    pub locker: Option<LockerInfo>,
    /// Settlement time
    pub completed_at: DateTime<Utc>,
}

/// Single source of truth consumed by every surface
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StorefrontState {
    /// Signed-in user, session-only
    pub user: Option<User>,
    /// Live queue slot, session-only
    pub queue: Option<QueueSlot>,
    /// Cart lines, persisted
    pub cart: Vec<CartItem>,
    /// At most one chosen section/seat, persisted
    pub seat_selection: Option<SeatOption>,
    /// Advisor inputs
    pub preferences: Option<UserPreferences>,
    /// Whether turn notices go out via WhatsApp, persisted
    pub whatsapp_connected: bool,
    /// One-shot latch: the "it's your turn" notice already went out for the
    /// current slot. Reset whenever the slot is replaced or cleared.
    pub turn_notice_sent: bool,
    /// Current transient notice, if any
    pub notice: Option<Notice>,
    /// Checkout progress
    pub checkout: CheckoutPhase,
    /// Most recent completed order
    pub last_order: Option<OrderSummary>,
}

impl StorefrontState {
    /// Whether any cart line is merchandise
    #[must_use]
    pub fn has_merch(&self) -> bool {
        self.cart.iter().any(|item| item.kind == CartKind::Merch)
    }
}
