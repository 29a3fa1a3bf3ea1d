//! The storefront store facade.
//!
//! Wraps the generic runtime [`Store`] with storefront wiring: snapshot
//! hydration on startup, the persist hook that writes the durable subset
//! after every mutation, and the single decay ticker that is always keyed
//! to the live queue slot.
//!
//! Queue membership changes must go through [`StorefrontStore::join_queue`]
//! and [`StorefrontStore::clear_queue`] so the ticker follows the slot;
//! everything else is a thin passthrough.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use metrics::counter;
use tokio::sync::{broadcast, watch};

use fila_runtime::store::Store;
use fila_runtime::{EffectHandle, StoreError, ticker};

use crate::actions::Action;
use crate::environment::StorefrontEnv;
use crate::persistence::{JsonFileSnapshots, SnapshotStore, StoredSnapshot};
use crate::reducer::StorefrontReducer;
use crate::services::ServiceError;
use crate::state::StorefrontState;
use crate::types::{
    CartItem, EventId, MerchItem, SeatAdvice, SeatOption, SlotId, User, UserPreferences,
};

/// Ticker bound to one queue slot
struct SlotTicker {
    slot_id: SlotId,
    handle: ticker::TickerHandle,
}

/// High-level handle to the storefront
pub struct StorefrontStore {
    inner: Store<StorefrontState, Action, StorefrontEnv, StorefrontReducer>,
    env: StorefrontEnv,
    ticker: Mutex<Option<SlotTicker>>,
}

impl std::fmt::Debug for StorefrontStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorefrontStore")
            .field("env", &self.env)
            .finish_non_exhaustive()
    }
}

impl StorefrontStore {
    /// Store backed by the JSON snapshot file from the environment's config
    #[must_use]
    pub fn new(env: StorefrontEnv) -> Self {
        let snapshots = Arc::new(JsonFileSnapshots::new(env.config().snapshot_path.clone()));
        Self::with_snapshots(env, snapshots)
    }

    /// Store backed by an arbitrary snapshot store
    ///
    /// The last snapshot (cart, seat selection, WhatsApp link) is applied
    /// to the initial state. An unreadable snapshot is logged and ignored
    /// so a corrupt file can never block startup.
    #[must_use]
    pub fn with_snapshots(env: StorefrontEnv, snapshots: Arc<dyn SnapshotStore>) -> Self {
        let mut initial = StorefrontState::default();
        match snapshots.load() {
            Ok(Some(snapshot)) => snapshot.apply(&mut initial),
            Ok(None) => {}
            Err(err) => {
                tracing::warn!(error = %err, "Ignoring unreadable snapshot, starting fresh");
            }
        }

        let persist_store = Arc::clone(&snapshots);
        let inner = Store::new(initial, StorefrontReducer, env.clone()).with_persist(
            move |state: &StorefrontState| {
                let snapshot = StoredSnapshot::capture(state);
                match persist_store.save(&snapshot) {
                    Ok(()) => counter!("fila_snapshot_writes_total").increment(1),
                    Err(err) => {
                        counter!("fila_snapshot_write_errors_total").increment(1);
                        tracing::warn!(error = %err, "Snapshot write failed");
                    }
                }
            },
        );

        Self {
            inner,
            env,
            ticker: Mutex::new(None),
        }
    }

    // ─── session ────────────────────────────────────────────────────

    /// Sign a user in
    ///
    /// # Errors
    /// Returns an error when the store is shutting down.
    pub async fn sign_in(&self, user: User) -> Result<EffectHandle, StoreError> {
        self.inner.send(Action::SignIn { user }).await
    }

    /// End the session
    ///
    /// # Errors
    /// Returns an error when the store is shutting down.
    pub async fn sign_out(&self) -> Result<EffectHandle, StoreError> {
        self.inner.send(Action::SignOut).await
    }

    // ─── queue ──────────────────────────────────────────────────────

    /// Join the queue for an event and key the decay ticker to the new slot
    ///
    /// # Errors
    /// Returns an error when the store is shutting down.
    pub async fn join_queue(&self, event_id: EventId) -> Result<EffectHandle, StoreError> {
        let handle = self.inner.send(Action::JoinQueue { event_id }).await?;
        self.sync_ticker().await;
        Ok(handle)
    }

    /// Drop the current slot and stop its ticker
    ///
    /// # Errors
    /// Returns an error when the store is shutting down.
    pub async fn clear_queue(&self) -> Result<EffectHandle, StoreError> {
        let handle = self.inner.send(Action::ClearQueue).await?;
        self.sync_ticker().await;
        Ok(handle)
    }

    /// Purchase a hold for the current slot
    ///
    /// # Errors
    /// Returns an error when the store is shutting down.
    pub async fn request_hold(&self) -> Result<EffectHandle, StoreError> {
        self.inner.send(Action::RequestHold).await
    }

    /// Poll the box office for the server-side view of the slot
    ///
    /// # Errors
    /// Returns an error when the store is shutting down.
    pub async fn refresh_queue(&self) -> Result<EffectHandle, StoreError> {
        self.inner.send(Action::RefreshQueue).await
    }

    // ─── cart, seat, preferences ────────────────────────────────────

    /// Add an item to the cart
    ///
    /// # Errors
    /// Returns an error when the store is shutting down.
    pub async fn add_to_cart(&self, item: CartItem) -> Result<EffectHandle, StoreError> {
        self.inner.send(Action::AddToCart { item }).await
    }

    /// Set a cart line's quantity; zero or negative removes it
    ///
    /// # Errors
    /// Returns an error when the store is shutting down.
    pub async fn update_cart_qty(
        &self,
        index: usize,
        qty: i64,
    ) -> Result<EffectHandle, StoreError> {
        self.inner.send(Action::UpdateCartQty { index, qty }).await
    }

    /// Remove a cart line
    ///
    /// # Errors
    /// Returns an error when the store is shutting down.
    pub async fn remove_from_cart(&self, index: usize) -> Result<EffectHandle, StoreError> {
        self.inner.send(Action::RemoveFromCart { index }).await
    }

    /// Empty the cart
    ///
    /// # Errors
    /// Returns an error when the store is shutting down.
    pub async fn clear_cart(&self) -> Result<EffectHandle, StoreError> {
        self.inner.send(Action::ClearCart).await
    }

    /// Replace the seat selection slot
    ///
    /// # Errors
    /// Returns an error when the store is shutting down.
    pub async fn select_seat(&self, seat: Option<SeatOption>) -> Result<EffectHandle, StoreError> {
        self.inner.send(Action::SelectSeat { seat }).await
    }

    /// Store advisor preferences
    ///
    /// # Errors
    /// Returns an error when the store is shutting down.
    pub async fn set_preferences(
        &self,
        preferences: UserPreferences,
    ) -> Result<EffectHandle, StoreError> {
        self.inner.send(Action::SetPreferences { preferences }).await
    }

    /// Toggle WhatsApp turn notifications
    ///
    /// # Errors
    /// Returns an error when the store is shutting down.
    pub async fn set_whatsapp_connected(
        &self,
        connected: bool,
    ) -> Result<EffectHandle, StoreError> {
        self.inner
            .send(Action::SetWhatsappConnected { connected })
            .await
    }

    /// Clear the current notice
    ///
    /// # Errors
    /// Returns an error when the store is shutting down.
    pub async fn dismiss_notice(&self) -> Result<EffectHandle, StoreError> {
        self.inner.send(Action::DismissNotice).await
    }

    // ─── checkout ───────────────────────────────────────────────────

    /// Start the simulated payment
    ///
    /// # Errors
    /// Returns an error when the store is shutting down.
    pub async fn begin_checkout(&self) -> Result<EffectHandle, StoreError> {
        self.inner.send(Action::BeginCheckout).await
    }

    // ─── advisory passthroughs ──────────────────────────────────────

    /// Rank seats against the stored preferences
    ///
    /// # Errors
    /// Returns an error when the box office is unavailable.
    pub async fn seat_advice(&self, event_id: &EventId) -> Result<SeatAdvice, ServiceError> {
        let preferences = self
            .inner
            .state(|s| s.preferences.clone().unwrap_or_default())
            .await;
        self.env
            .box_office()
            .seat_advice(event_id, &preferences)
            .await
    }

    /// Fetch merch recommendations for the signed-in user
    ///
    /// # Errors
    /// Returns an error when nobody is signed in or the box office is
    /// unavailable.
    pub async fn merch_recs(&self, event_id: &EventId) -> Result<Vec<MerchItem>, ServiceError> {
        let Some(user) = self.inner.state(|s| s.user.clone()).await else {
            return Err(ServiceError::Rejected("sesión requerida".into()));
        };
        self.env.box_office().merch_recs(event_id, &user.id).await
    }

    // ─── observation ────────────────────────────────────────────────

    /// Read a projection of the current state
    pub async fn state<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&StorefrontState) -> T,
    {
        self.inner.state(f).await
    }

    /// Watch a slice of the state; fires only when the slice changes
    pub async fn watch_slice<T, F>(&self, selector: F) -> watch::Receiver<T>
    where
        T: Clone + PartialEq + Send + Sync + 'static,
        F: Fn(&StorefrontState) -> T + Send + Sync + 'static,
    {
        self.inner.watch_slice(selector).await
    }

    /// Subscribe to actions produced by effects
    #[must_use]
    pub fn subscribe_actions(&self) -> broadcast::Receiver<Action> {
        self.inner.subscribe_actions()
    }

    /// The underlying generic store
    ///
    /// Escape hatch for advanced flows. Queue membership must still change
    /// through [`Self::join_queue`] and [`Self::clear_queue`], otherwise the
    /// decay ticker keeps running against the old slot.
    #[must_use]
    pub const fn store(&self) -> &Store<StorefrontState, Action, StorefrontEnv, StorefrontReducer> {
        &self.inner
    }

    /// The environment this store was built with
    #[must_use]
    pub const fn env(&self) -> &StorefrontEnv {
        &self.env
    }

    /// Stop the ticker and drain pending effects
    ///
    /// # Errors
    /// Returns [`StoreError::ShutdownTimeout`] when effects do not finish
    /// in time.
    pub async fn shutdown(&self, timeout: Duration) -> Result<(), StoreError> {
        let old = self
            .ticker
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(ticker) = old {
            ticker.handle.cancel();
        }
        self.inner.shutdown(timeout).await
    }

    /// Re-key the ticker to whatever slot is live, cancelling any ticker
    /// for a superseded slot
    async fn sync_ticker(&self) {
        let live = self
            .inner
            .state(|s| s.queue.as_ref().map(|slot| slot.slot_id))
            .await;

        let mut guard = self.ticker.lock().unwrap_or_else(PoisonError::into_inner);
        match live {
            Some(slot_id) => {
                if guard.as_ref().is_some_and(|t| t.slot_id == slot_id) {
                    return;
                }
                if let Some(old) = guard.take() {
                    old.handle.cancel();
                }
                let handle = ticker::spawn(
                    self.inner.clone(),
                    self.env.config().tick_interval,
                    move || Action::QueueTick { slot_id },
                );
                *guard = Some(SlotTicker { slot_id, handle });
            }
            None => {
                if let Some(old) = guard.take() {
                    old.handle.cancel();
                }
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Test code fails loudly
mod tests {
    use super::*;
    use fila_testing::{FixedNumbers, SequenceIds, test_clock};

    use crate::config::StorefrontConfig;
    use crate::fixtures;
    use crate::persistence::MemorySnapshots;
    use crate::types::{CartKind, Money};

    fn fast_env(seeds: impl IntoIterator<Item = u32>) -> StorefrontEnv {
        let config = StorefrontConfig::default()
            .with_tick_interval(Duration::from_millis(20))
            .with_seed_range(24..=36)
            .with_mock_latency(Duration::ZERO)
            .with_settle_delay(Duration::from_millis(50));
        StorefrontEnv::new(config)
            .with_clock(Arc::new(test_clock()))
            .with_ids(Arc::new(SequenceIds::new()))
            .with_numbers(Arc::new(FixedNumbers::new(seeds)))
    }

    fn merch_line() -> CartItem {
        CartItem {
            kind: CartKind::Merch,
            ref_id: Some("1".into()),
            name: "Polera".into(),
            qty: 1,
            unit_price: Money::from_cents(250_000),
        }
    }

    #[tokio::test]
    async fn hydrates_the_durable_subset_from_a_snapshot() {
        let snapshots = Arc::new(MemorySnapshots::new());
        let mut stored = StoredSnapshot::default();
        stored.cart.push(merch_line());
        stored.whatsapp_connected = true;
        snapshots.save(&stored).unwrap();

        let store = StorefrontStore::with_snapshots(fast_env([]), snapshots);
        let (cart_len, whatsapp, user) = store
            .state(|s| (s.cart.len(), s.whatsapp_connected, s.user.clone()))
            .await;
        assert_eq!(cart_len, 1);
        assert!(whatsapp);
        assert!(user.is_none(), "session state is never persisted");
    }

    #[tokio::test]
    async fn every_mutation_rewrites_the_snapshot() {
        let snapshots = Arc::new(MemorySnapshots::new());
        let store = StorefrontStore::with_snapshots(fast_env([]), snapshots.clone());

        store.add_to_cart(merch_line()).await.unwrap();
        let after_add = snapshots.load().unwrap().unwrap();
        assert_eq!(after_add.cart.len(), 1);

        store.clear_cart().await.unwrap();
        let after_clear = snapshots.load().unwrap().unwrap();
        assert!(after_clear.cart.is_empty());
    }

    #[tokio::test]
    async fn corrupt_snapshots_never_block_startup() {
        let snapshots = Arc::new(MemorySnapshots::with_raw("truncated{"));
        let store = StorefrontStore::with_snapshots(fast_env([]), snapshots);
        let cart_len = store.state(|s| s.cart.len()).await;
        assert_eq!(cart_len, 0);
    }

    #[tokio::test]
    async fn ticker_decays_the_live_slot_and_stops_on_clear() {
        let store =
            StorefrontStore::with_snapshots(fast_env([30]), Arc::new(MemorySnapshots::new()));
        store.sign_in(fixtures::demo_user()).await.unwrap();
        store.join_queue(EventId::from("evento-1")).await.unwrap();
        assert_eq!(store.state(|s| s.queue.as_ref().unwrap().position).await, 30);

        tokio::time::sleep(Duration::from_millis(110)).await;
        let decayed = store.state(|s| s.queue.as_ref().unwrap().position).await;
        assert!(decayed < 30, "ticker should have decayed the position");

        store.clear_queue().await.unwrap();
        tokio::time::sleep(Duration::from_millis(60)).await;
        assert!(store.state(|s| s.queue.is_none()).await);

        store.shutdown(Duration::from_secs(1)).await.unwrap();
    }

    #[tokio::test]
    async fn seat_advice_uses_the_stored_preferences() {
        let store = StorefrontStore::with_snapshots(fast_env([]), Arc::new(MemorySnapshots::new()));
        store
            .set_preferences(UserPreferences {
                mobility_reduced: true,
                ..UserPreferences::default()
            })
            .await
            .unwrap();

        let advice = store.seat_advice(&EventId::from("evento-1")).await.unwrap();
        assert!(advice.top[0].section_name.to_lowercase().contains("bajo"));
    }

    #[tokio::test]
    async fn merch_recs_require_a_session() {
        let store = StorefrontStore::with_snapshots(fast_env([]), Arc::new(MemorySnapshots::new()));
        assert!(store.merch_recs(&EventId::from("evento-1")).await.is_err());

        store.sign_in(fixtures::demo_user()).await.unwrap();
        let recs = store.merch_recs(&EventId::from("evento-1")).await.unwrap();
        assert_eq!(recs.len(), 3);
    }
}
