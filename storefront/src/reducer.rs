//! The storefront reducer.
//!
//! All state transitions live here. The reducer is total: any action
//! against any state produces a new state, never a panic. Invalid or
//! stale inputs (out-of-range cart indexes, ticks for superseded slots,
//! grants for slots that moved on) are clamped or ignored.
//!
//! # Queue lifecycle
//!
//! ```text
//! (no slot) ──JoinQueue──▶ Waiting ──tick to 0──▶ Notified
//!                            │  ▲
//!                  HoldGranted  │ HoldLapsed (resume policy)
//!                            ▼  │
//!                           Held ──HoldLapsed──▶ Expired (default policy)
//! ```
//!
//! The turn notification is a one-shot latch per queue membership: once
//! `turn_notice_sent` is set it stays set until the slot is replaced.

use metrics::{counter, gauge};

use fila_core::{Effect, Reducer, SmallVec, smallvec};

use crate::actions::Action;
use crate::cart;
use crate::config::HoldPolicy;
use crate::environment::StorefrontEnv;
use crate::queue;
use crate::services::NotifyChannel;
use crate::state::{CheckoutPhase, Notice, OrderSummary, StorefrontState};
use crate::types::{CartKind, OrderId, QueueSlot, QueueStatus, SlotId};

/// Reducer driving [`StorefrontState`]
#[derive(Debug, Clone, Copy, Default)]
pub struct StorefrontReducer;

impl StorefrontReducer {
    /// Fire the one-shot turn notification if the slot just became
    /// `Notified` and the latch is still clear
    fn turn_ready_effects(
        state: &mut StorefrontState,
        env: &StorefrontEnv,
    ) -> SmallVec<[Effect<Action>; 4]> {
        let (notified, slot_id) = match state.queue.as_ref() {
            Some(slot) => (slot.status == QueueStatus::Notified, slot.slot_id),
            None => return smallvec![Effect::None],
        };
        if !notified || state.turn_notice_sent {
            return smallvec![Effect::None];
        }

        state.turn_notice_sent = true;
        state.notice = Some(Notice::info("¡Es tu turno! Ya puedes elegir tus asientos"));
        counter!("fila_queue_notified_total").increment(1);

        let channel = if state.whatsapp_connected {
            NotifyChannel::WhatsApp
        } else {
            NotifyChannel::InApp
        };
        tracing::info!(%slot_id, ?channel, "Turn reached the front of the queue");

        let notifier = env.notifier();
        smallvec![Effect::Future(Box::pin(async move {
            notifier.turn_ready(slot_id, channel).await;
            None
        }))]
    }

    /// Seal the order: clear the cart, keep the seat, surface `notice`
    fn complete_checkout(state: &mut StorefrontState, notice: Notice) {
        state.checkout = CheckoutPhase::Completed;
        state.cart.clear();
        state.notice = Some(notice);
        counter!("fila_checkout_completed_total").increment(1);
    }
}

impl Reducer for StorefrontReducer {
    type State = StorefrontState;
    type Action = Action;
    type Environment = StorefrontEnv;

    #[allow(clippy::too_many_lines)] // One match arm per action keeps the lifecycle in one place
    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            // ═══════════════════════════════════════════════════════════
            // Session
            // ═══════════════════════════════════════════════════════════
            Action::SignIn { user } => {
                tracing::info!(user_id = %user.id, "User signed in");
                state.user = Some(user);
                smallvec![Effect::None]
            }

            Action::SignOut => {
                // Queue membership survives the session; only the user goes
                state.user = None;
                smallvec![Effect::None]
            }

            // ═══════════════════════════════════════════════════════════
            // Queue commands
            // ═══════════════════════════════════════════════════════════
            Action::JoinQueue { event_id } => {
                if state.user.is_none() {
                    state.notice =
                        Some(Notice::error("Debes iniciar sesión para unirte a la fila"));
                    return smallvec![Effect::None];
                }

                let config = env.config();
                let position = env.numbers().in_range(config.seed_range());
                let slot = QueueSlot {
                    slot_id: SlotId::from_uuid(env.ids().next_id()),
                    position,
                    status: QueueStatus::Waiting,
                    estimated_minutes: queue::eta_minutes(
                        position,
                        config.decrement_per_tick,
                        config.tick_seconds(),
                    ),
                    hold_expires_at: None,
                };
                tracing::info!(%event_id, slot_id = %slot.slot_id, position, "Joined queue");
                counter!("fila_queue_joins_total").increment(1);
                gauge!("fila_queue_position").set(f64::from(position));

                // Rejoining supersedes the old slot and re-arms the latch
                state.queue = Some(slot);
                state.turn_notice_sent = false;
                state.notice = Some(Notice::info(format!(
                    "¡Te uniste a la fila! Tu posición es {position}"
                )));
                smallvec![Effect::None]
            }

            Action::QueueTick { slot_id } => {
                let Some(slot) = state.queue.as_mut() else {
                    return smallvec![Effect::None];
                };
                if slot.slot_id != slot_id {
                    tracing::trace!(%slot_id, "Dropping tick for a superseded slot");
                    return smallvec![Effect::None];
                }
                // Held slots are frozen; Notified and Expired are terminal
                if slot.status != QueueStatus::Waiting {
                    return smallvec![Effect::None];
                }

                let config = env.config();
                slot.position = queue::next_position(slot.position, config.decrement_per_tick);
                slot.estimated_minutes = queue::eta_minutes(
                    slot.position,
                    config.decrement_per_tick,
                    config.tick_seconds(),
                );
                gauge!("fila_queue_position").set(f64::from(slot.position));

                if slot.position == 0 {
                    slot.status = QueueStatus::Notified;
                    return Self::turn_ready_effects(state, env);
                }
                smallvec![Effect::None]
            }

            Action::RequestHold => {
                let Some(slot) = state.queue.as_ref() else {
                    state.notice = Some(Notice::warning("No estás en la fila"));
                    return smallvec![Effect::None];
                };
                if slot.status != QueueStatus::Waiting {
                    state.notice =
                        Some(Notice::warning("Tu puesto ya está reservado o notificado"));
                    return smallvec![Effect::None];
                }

                let slot_id = slot.slot_id;
                let box_office = env.box_office();
                smallvec![Effect::Future(Box::pin(async move {
                    match box_office.hold_turn(slot_id).await {
                        Ok(grant) => Some(Action::HoldGranted { slot_id, grant }),
                        Err(err) => {
                            tracing::warn!(%slot_id, error = %err, "Hold purchase failed");
                            Some(Action::HoldFailed {
                                reason: err.to_string(),
                            })
                        }
                    }
                }))]
            }

            Action::RefreshQueue => {
                let Some(slot) = state.queue.as_ref() else {
                    return smallvec![Effect::None];
                };
                let slot_id = slot.slot_id;
                let box_office = env.box_office();
                smallvec![Effect::Future(Box::pin(async move {
                    match box_office.queue_status(slot_id).await {
                        Ok(slot) => Some(Action::QueueRefreshed { slot }),
                        Err(err) => {
                            tracing::warn!(%slot_id, error = %err, "Queue refresh failed");
                            Some(Action::QueueRefreshFailed {
                                reason: err.to_string(),
                            })
                        }
                    }
                }))]
            }

            Action::ClearQueue => {
                state.queue = None;
                state.turn_notice_sent = false;
                smallvec![Effect::None]
            }

            // ═══════════════════════════════════════════════════════════
            // Queue events (fed back by effects)
            // ═══════════════════════════════════════════════════════════
            Action::HoldGranted { slot_id, grant } => {
                let Some(slot) = state.queue.as_mut() else {
                    return smallvec![Effect::None];
                };
                if slot.slot_id != slot_id || slot.status != QueueStatus::Waiting {
                    tracing::debug!(%slot_id, "Ignoring hold grant for a slot no longer waiting");
                    return smallvec![Effect::None];
                }

                slot.status = QueueStatus::Held;
                slot.hold_expires_at = Some(grant.hold_expires_at);
                counter!("fila_queue_holds_total").increment(1);
                state.notice = Some(Notice::info("Se ha reservado tu puesto en la fila"));

                match env.config().hold_policy {
                    HoldPolicy::NotifyImmediately => {
                        let Some(slot) = state.queue.as_mut() else {
                            return smallvec![Effect::None];
                        };
                        slot.status = QueueStatus::Notified;
                        slot.hold_expires_at = None;
                        Self::turn_ready_effects(state, env)
                    }
                    HoldPolicy::ResumeCountdown | HoldPolicy::ExpireOnLapse => {
                        let wait = (grant.hold_expires_at - env.clock().now())
                            .to_std()
                            .unwrap_or_default();
                        smallvec![Effect::Delay {
                            duration: wait,
                            action: Box::new(Action::HoldLapsed { slot_id }),
                        }]
                    }
                }
            }

            Action::HoldFailed { reason } => {
                // Transient boundary failure: surface it, change nothing else
                state.notice = Some(Notice::error(format!(
                    "No pudimos procesar tu reserva: {reason}"
                )));
                smallvec![Effect::None]
            }

            Action::HoldLapsed { slot_id } => {
                let Some(slot) = state.queue.as_mut() else {
                    return smallvec![Effect::None];
                };
                if slot.slot_id != slot_id || slot.status != QueueStatus::Held {
                    return smallvec![Effect::None];
                }

                match env.config().hold_policy {
                    HoldPolicy::ResumeCountdown => {
                        slot.status = QueueStatus::Waiting;
                        slot.hold_expires_at = None;
                        state.notice =
                            Some(Notice::info("Tu reserva terminó y la fila sigue avanzando"));
                    }
                    HoldPolicy::NotifyImmediately | HoldPolicy::ExpireOnLapse => {
                        slot.status = QueueStatus::Expired;
                        slot.hold_expires_at = None;
                        counter!("fila_queue_expired_total").increment(1);
                        state.notice =
                            Some(Notice::warning("Tu reserva expiró. Vuelve a unirte a la fila"));
                    }
                }
                smallvec![Effect::None]
            }

            Action::QueueRefreshed { mut slot } => {
                let Some(current) = state.queue.as_ref() else {
                    return smallvec![Effect::None];
                };
                if current.slot_id != slot.slot_id {
                    tracing::debug!(slot_id = %slot.slot_id, "Ignoring refresh for a superseded slot");
                    return smallvec![Effect::None];
                }

                // Server position is truth; the ETA is always derived locally
                let config = env.config();
                slot.estimated_minutes = queue::eta_minutes(
                    slot.position,
                    config.decrement_per_tick,
                    config.tick_seconds(),
                );
                gauge!("fila_queue_position").set(f64::from(slot.position));
                state.queue = Some(slot);
                Self::turn_ready_effects(state, env)
            }

            Action::QueueRefreshFailed { reason } => {
                state.notice = Some(Notice::warning(format!(
                    "No pudimos actualizar tu posición: {reason}"
                )));
                smallvec![Effect::None]
            }

            // ═══════════════════════════════════════════════════════════
            // Cart
            // ═══════════════════════════════════════════════════════════
            Action::AddToCart { item } => {
                counter!("fila_cart_adds_total").increment(1);
                cart::add(&mut state.cart, item);
                smallvec![Effect::None]
            }

            Action::UpdateCartQty { index, qty } => {
                cart::update_qty(&mut state.cart, index, qty);
                smallvec![Effect::None]
            }

            Action::RemoveFromCart { index } => {
                cart::remove(&mut state.cart, index);
                smallvec![Effect::None]
            }

            Action::ClearCart => {
                state.cart.clear();
                smallvec![Effect::None]
            }

            // ═══════════════════════════════════════════════════════════
            // Seat, preferences, notices
            // ═══════════════════════════════════════════════════════════
            Action::SelectSeat { seat } => {
                state.seat_selection = seat;
                smallvec![Effect::None]
            }

            Action::SetPreferences { preferences } => {
                state.preferences = Some(preferences);
                smallvec![Effect::None]
            }

            Action::SetWhatsappConnected { connected } => {
                let newly_connected = connected && !state.whatsapp_connected;
                state.whatsapp_connected = connected;
                if newly_connected {
                    state.notice = Some(Notice::info(
                        "WhatsApp conectado. Te avisaremos cuando sea tu turno",
                    ));
                }
                smallvec![Effect::None]
            }

            Action::DismissNotice => {
                state.notice = None;
                smallvec![Effect::None]
            }

            // ═══════════════════════════════════════════════════════════
            // Checkout
            // ═══════════════════════════════════════════════════════════
            Action::BeginCheckout => {
                if state.seat_selection.is_none() {
                    state.notice = Some(Notice::error("Debes seleccionar un asiento primero"));
                    return smallvec![Effect::None];
                }
                if state.checkout == CheckoutPhase::Processing {
                    return smallvec![Effect::None];
                }

                state.checkout = CheckoutPhase::Processing;
                smallvec![Effect::Delay {
                    duration: env.config().settle_delay,
                    action: Box::new(Action::CheckoutSettled),
                }]
            }

            Action::CheckoutSettled => {
                if state.checkout != CheckoutPhase::Processing {
                    return smallvec![Effect::None];
                }
                let Some(seat) = state.seat_selection.clone() else {
                    state.checkout = CheckoutPhase::Idle;
                    state.notice =
                        Some(Notice::error("Tu asiento fue deseleccionado durante el pago"));
                    return smallvec![Effect::None];
                };

                let ticket_total = seat.price;
                let merch_total = cart::subtotal_of(&state.cart, CartKind::Merch);
                let total = ticket_total.saturating_add(merch_total);
                let order_id = OrderId::from_uuid(env.ids().next_id());
                tracing::info!(%order_id, total = total.cents(), "Payment settled");

                state.last_order = Some(OrderSummary {
                    order_id,
                    seat,
                    ticket_total,
                    merch_total,
                    total,
                    locker: None,
                    completed_at: env.clock().now(),
                });

                if state.has_merch() {
                    let box_office = env.box_office();
                    return smallvec![Effect::Future(Box::pin(async move {
                        match box_office.assign_locker(order_id).await {
                            Ok(info) => Some(Action::LockerAssigned { info }),
                            Err(err) => {
                                tracing::warn!(%order_id, error = %err, "Locker assignment failed");
                                Some(Action::LockerFailed {
                                    reason: err.to_string(),
                                })
                            }
                        }
                    }))];
                }

                Self::complete_checkout(
                    state,
                    Notice::info("¡Compra exitosa! Tu pedido está confirmado"),
                );
                smallvec![Effect::None]
            }

            Action::LockerAssigned { info } => {
                if state.checkout != CheckoutPhase::Processing {
                    return smallvec![Effect::None];
                }
                if let Some(order) = state.last_order.as_mut() {
                    order.locker = Some(info);
                }
                Self::complete_checkout(
                    state,
                    Notice::info("¡Compra exitosa! Tu pedido está confirmado"),
                );
                smallvec![Effect::None]
            }

            Action::LockerFailed { reason } => {
                if state.checkout != CheckoutPhase::Processing {
                    return smallvec![Effect::None];
                }
                Self::complete_checkout(
                    state,
                    Notice::warning(format!(
                        "Pedido confirmado, pero no pudimos asignar tu locker: {reason}"
                    )),
                );
                smallvec![Effect::None]
            }
        }
    }
}
