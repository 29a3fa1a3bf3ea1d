//! Every intent and effect-produced event flowing through the store.
//!
//! Commands come from UI surfaces (or the facade); events are fed back by
//! effects when a boundary call or scheduled delay resolves. Reducer
//! handling for both lives in [`crate::reducer`].

use crate::types::{
    CartItem, EventId, HoldGrant, LockerInfo, QueueSlot, SeatOption, SlotId, User, UserPreferences,
};

/// Action dispatched to the storefront store
#[derive(Debug, Clone)]
pub enum Action {
    // --- session ---
    /// A user signed in
    SignIn {
        /// The session user
        user: User,
    },
    /// The session ended
    SignOut,

    // --- queue commands ---
    /// Join the virtual queue for an event
    JoinQueue {
        /// Event being queued for
        event_id: EventId,
    },
    /// One decay tick for the slot the ticker was keyed to
    ///
    /// Ticks carrying a stale slot id are dropped by the reducer.
    QueueTick {
        /// Slot the tick was scheduled for
        slot_id: SlotId,
    },
    /// Purchase a hold that freezes the current position
    RequestHold,
    /// Poll the box office for server-side slot truth
    RefreshQueue,
    /// Drop the current slot
    ClearQueue,

    // --- queue events ---
    /// Hold purchase succeeded
    HoldGranted {
        /// Slot the hold was requested for
        slot_id: SlotId,
        /// Expiry granted by the box office
        grant: HoldGrant,
    },
    /// Hold purchase failed at the boundary
    HoldFailed {
        /// Human-readable failure
        reason: String,
    },
    /// A granted hold reached its expiry without the turn being used
    HoldLapsed {
        /// Slot the hold belonged to
        slot_id: SlotId,
    },
    /// Fresh slot state arrived from the box office
    QueueRefreshed {
        /// Server-side slot truth
        slot: QueueSlot,
    },
    /// Polling the box office failed
    QueueRefreshFailed {
        /// Human-readable failure
        reason: String,
    },

    // --- cart ---
    /// Add an item, merging on `(kind, ref_id, name)`
    AddToCart {
        /// Incoming line; a qty of 0 is clamped to 1
        item: CartItem,
    },
    /// Set a line's quantity; zero or negative removes the line
    UpdateCartQty {
        /// Line index; out of range is a no-op
        index: usize,
        /// Requested quantity, signed so UI decrements can go below zero
        qty: i64,
    },
    /// Remove a line; out of range is a no-op
    RemoveFromCart {
        /// Line index
        index: usize,
    },
    /// Empty the cart
    ClearCart,

    // --- seat, preferences, notices ---
    /// Replace the single seat selection slot
    SelectSeat {
        /// New selection, or `None` to deselect
        seat: Option<SeatOption>,
    },
    /// Store advisor preferences
    SetPreferences {
        /// New preferences
        preferences: UserPreferences,
    },
    /// Toggle WhatsApp turn notifications
    SetWhatsappConnected {
        /// New connection state
        connected: bool,
    },
    /// Clear the current notice
    DismissNotice,

    // --- checkout ---
    /// Start the simulated payment
    BeginCheckout,
    /// Simulated payment settled
    CheckoutSettled,
    /// Locker assignment resolved
    LockerAssigned {
        /// Assigned pickup locker
        info: LockerInfo,
    },
    /// Locker assignment failed; the order still completes
    LockerFailed {
        /// Human-readable failure
        reason: String,
    },
}
