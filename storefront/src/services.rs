//! Boundary traits and their in-process mock implementations.
//!
//! The reducer never talks to the outside world directly; everything it
//! needs crosses one of the traits here so tests can substitute
//! deterministic doubles and failures.

use std::ops::RangeInclusive;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use fila_core::environment::{Clock, NumberSource};

use crate::fixtures;
use crate::queue;
use crate::types::{
    EventId, HoldGrant, LockerInfo, MerchItem, OrderId, QueueSlot, QueueStatus, SeatAdvice, SlotId,
    UserId, UserPreferences,
};

/// Failure modes a boundary call can surface
#[derive(Debug, Clone, thiserror::Error)]
pub enum ServiceError {
    /// The remote side could not be reached or timed out
    #[error("service unavailable: {0}")]
    Unavailable(String),
    /// The remote side understood the request and refused it
    #[error("request rejected: {0}")]
    Rejected(String),
}

/// The box-office backend: queue membership, holds, seating advice,
/// merch recommendations and locker assignment
#[async_trait]
pub trait BoxOffice: Send + Sync {
    /// Enroll a user in the waiting queue for an event
    async fn join_queue(
        &self,
        event_id: &EventId,
        user_id: &UserId,
    ) -> Result<QueueSlot, ServiceError>;

    /// Fetch the authoritative view of a slot
    async fn queue_status(&self, slot_id: SlotId) -> Result<QueueSlot, ServiceError>;

    /// Purchase a hold that freezes the slot's position
    async fn hold_turn(&self, slot_id: SlotId) -> Result<HoldGrant, ServiceError>;

    /// Rank seating sections against the user's accessibility preferences
    async fn seat_advice(
        &self,
        event_id: &EventId,
        preferences: &UserPreferences,
    ) -> Result<SeatAdvice, ServiceError>;

    /// Suggest merchandising for the user and event
    async fn merch_recs(
        &self,
        event_id: &EventId,
        user_id: &UserId,
    ) -> Result<Vec<MerchItem>, ServiceError>;

    /// Reserve a pickup locker for a completed order
    async fn assign_locker(&self, order_id: OrderId) -> Result<LockerInfo, ServiceError>;
}

/// Channel over which a turn notification is delivered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyChannel {
    /// Banner inside the storefront
    InApp,
    /// WhatsApp message to the linked number
    WhatsApp,
}

/// Receives the one-shot "your turn is ready" signal
#[async_trait]
pub trait TurnNotifier: Send + Sync {
    /// Called exactly once per queue membership when the turn arrives
    async fn turn_ready(&self, slot_id: SlotId, channel: NotifyChannel);
}

/// Notifier that just logs the delivery
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

#[async_trait]
impl TurnNotifier for LogNotifier {
    async fn turn_ready(&self, slot_id: SlotId, channel: NotifyChannel) {
        tracing::info!(%slot_id, ?channel, "Turn ready notification");
    }
}

/// Notifier that records every delivery, for tests and demos
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    calls: Mutex<Vec<(SlotId, NotifyChannel)>>,
}

impl RecordingNotifier {
    /// Empty recorder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every `turn_ready` call observed so far
    #[must_use]
    pub fn calls(&self) -> Vec<(SlotId, NotifyChannel)> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl TurnNotifier for RecordingNotifier {
    async fn turn_ready(&self, slot_id: SlotId, channel: NotifyChannel) {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((slot_id, channel));
    }
}

/// In-process box office used until a real backend exists.
///
/// Latency is simulated with a single configurable pause and an outage
/// flag turns every call into `ServiceError::Unavailable` so failure
/// paths can be exercised deterministically.
pub struct MockBoxOffice {
    clock: Arc<dyn Clock>,
    numbers: Arc<dyn NumberSource>,
    latency: Duration,
    hold_minutes: u64,
    seed_range: RangeInclusive<u32>,
    outage: AtomicBool,
}

impl std::fmt::Debug for MockBoxOffice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockBoxOffice")
            .field("latency", &self.latency)
            .field("hold_minutes", &self.hold_minutes)
            .field("seed_range", &self.seed_range)
            .field("outage", &self.outage.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

impl MockBoxOffice {
    /// Mock with the reference cadence: 300ms latency, 10-minute holds,
    /// seeds between 1000 and 2000
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>, numbers: Arc<dyn NumberSource>) -> Self {
        Self {
            clock,
            numbers,
            latency: Duration::from_millis(300),
            hold_minutes: 10,
            seed_range: 1000..=2000,
            outage: AtomicBool::new(false),
        }
    }

    /// Override the simulated latency
    #[must_use]
    pub const fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Override the hold window length
    #[must_use]
    pub const fn with_hold_minutes(mut self, minutes: u64) -> Self {
        self.hold_minutes = minutes;
        self
    }

    /// Override the join seeding range
    #[must_use]
    pub fn with_seed_range(mut self, range: RangeInclusive<u32>) -> Self {
        self.seed_range = range;
        self
    }

    /// Toggle the simulated outage; while on, every call fails
    pub fn set_outage(&self, on: bool) {
        self.outage.store(on, Ordering::Relaxed);
    }

    async fn pause(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }

    fn check(&self) -> Result<(), ServiceError> {
        if self.outage.load(Ordering::Relaxed) {
            return Err(ServiceError::Unavailable("simulated outage".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl BoxOffice for MockBoxOffice {
    async fn join_queue(
        &self,
        event_id: &EventId,
        user_id: &UserId,
    ) -> Result<QueueSlot, ServiceError> {
        self.pause().await;
        self.check()?;
        let position = self.numbers.in_range(self.seed_range.clone());
        tracing::debug!(%event_id, %user_id, position, "Mock box office enrolled user");
        Ok(QueueSlot {
            slot_id: SlotId::new(),
            position,
            status: QueueStatus::Waiting,
            estimated_minutes: queue::eta_minutes(position, 2, 10),
            hold_expires_at: None,
        })
    }

    async fn queue_status(&self, slot_id: SlotId) -> Result<QueueSlot, ServiceError> {
        self.pause().await;
        self.check()?;
        let position = self.numbers.in_range(1..=9);
        let status = if position <= 3 {
            QueueStatus::Notified
        } else {
            QueueStatus::Waiting
        };
        Ok(QueueSlot {
            slot_id,
            position,
            status,
            estimated_minutes: queue::eta_minutes(position, 2, 10),
            hold_expires_at: None,
        })
    }

    async fn hold_turn(&self, slot_id: SlotId) -> Result<HoldGrant, ServiceError> {
        self.pause().await;
        self.check()?;
        let minutes = i64::try_from(self.hold_minutes).unwrap_or(i64::MAX);
        let window = chrono::Duration::try_minutes(minutes).unwrap_or_else(chrono::Duration::zero);
        tracing::debug!(%slot_id, minutes, "Mock box office granted hold");
        Ok(HoldGrant {
            hold_expires_at: self.clock.now() + window,
        })
    }

    async fn seat_advice(
        &self,
        _event_id: &EventId,
        preferences: &UserPreferences,
    ) -> Result<SeatAdvice, ServiceError> {
        self.pause().await;
        self.check()?;
        let mut ranked = fixtures::seat_options();
        if preferences.mobility_reduced {
            // Ground-level sections carry "bajo" in their name
            ranked.sort_by_key(|option| !option.section_name.to_lowercase().contains("bajo"));
        }
        if preferences.vision_problems {
            ranked.sort_by(|a, b| b.score.cmp(&a.score));
        }
        ranked.truncate(3);
        Ok(SeatAdvice { top: ranked })
    }

    async fn merch_recs(
        &self,
        _event_id: &EventId,
        _user_id: &UserId,
    ) -> Result<Vec<MerchItem>, ServiceError> {
        self.pause().await;
        self.check()?;
        Ok(fixtures::merch_items().into_iter().take(3).collect())
    }

    async fn assign_locker(&self, order_id: OrderId) -> Result<LockerInfo, ServiceError> {
        self.pause().await;
        self.check()?;
        let code = format!("L{}", self.numbers.in_range(1000..=9999));
        tracing::debug!(%order_id, code, "Mock box office assigned locker");
        Ok(LockerInfo {
            qr_payload: code.clone(),
            code,
        })
    }
}
