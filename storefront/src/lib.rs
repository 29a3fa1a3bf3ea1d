//! # Fila Storefront
//!
//! Core engine for a browser-ticketing storefront: a virtual waiting
//! queue with purchasable holds, a merge-keyed cart with integer-cent
//! totals, preference-ranked seat advice, and a simulated checkout that
//! assigns merch pickup lockers.
//!
//! ## Architecture
//!
//! All business logic lives in one reducer over one state tree:
//!
//! ```text
//! Action → StorefrontReducer → (StorefrontState, Effects) → feedback Actions
//! ```
//!
//! [`StorefrontStore`] wraps the generic runtime store with the pieces a
//! storefront session needs: snapshot hydration and the per-mutation
//! persist hook ([`persistence`]), the decay ticker keyed to the live
//! queue slot, and passthroughs to the box-office boundary
//! ([`services::BoxOffice`]).
//!
//! ## Example: joining the queue
//!
//! ```rust,ignore
//! use fila_storefront::{StorefrontConfig, StorefrontEnv, StorefrontStore};
//! use fila_storefront::types::EventId;
//!
//! let store = StorefrontStore::new(StorefrontEnv::new(StorefrontConfig::from_env()));
//! store.sign_in(user).await?;
//! store.join_queue(EventId::from("evento-1")).await?;
//! let mut queue = store.watch_slice(|s| s.queue.clone()).await;
//! // queue.changed().await fires as the position decays
//! ```

// Public modules
pub mod actions;
pub mod cart;
pub mod config;
pub mod currency;
pub mod environment;
pub mod fixtures;
pub mod forms;
pub mod persistence;
pub mod queue;
pub mod reducer;
pub mod rut;
pub mod services;
pub mod state;
pub mod store;
pub mod types;

// Re-export main types for convenience
pub use actions::Action;
pub use config::{HoldPolicy, StorefrontConfig};
pub use currency::format_clp;
pub use environment::StorefrontEnv;
pub use reducer::StorefrontReducer;
pub use state::{CheckoutPhase, Notice, NoticeLevel, OrderSummary, StorefrontState};
pub use store::StorefrontStore;
pub use types::{
    CartItem, CartKind, EventId, Money, QueueSlot, QueueStatus, SeatOption, SlotId, User, UserId,
    UserPreferences,
};
