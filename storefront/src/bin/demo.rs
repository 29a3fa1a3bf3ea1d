//! Storefront walkthrough.
//!
//! Drives one complete purchase journey against the in-process box office:
//! restore the cart from the last snapshot, sign in, rank seats against
//! accessibility preferences, queue up, buy a priority hold, and check out
//! with a merch locker.
//!
//! # Running
//!
//! ```bash
//! cargo run -p fila-storefront --bin demo
//! ```
//!
//! The queue is re-paced for watchability (200ms ticks, seeds under 40).
//! `FILA_SNAPSHOT_PATH` picks the snapshot file and `FILA_METRICS_ADDR`
//! (e.g. `127.0.0.1:9090`) enables the Prometheus endpoint.

#![allow(missing_docs)]
#![allow(clippy::expect_used)] // Walkthrough binary can use expect

use std::time::Duration;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fila_runtime::metrics::MetricsServer;
use fila_storefront::types::EventId;
use fila_storefront::{
    CheckoutPhase, HoldPolicy, StorefrontConfig, StorefrontEnv, StorefrontStore, UserPreferences,
    fixtures, format_clp, forms, rut,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,fila_storefront=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting storefront walkthrough");

    // 2. Configuration: env vars first, then demo pacing on top
    let config = StorefrontConfig::from_env()
        .with_tick_interval(Duration::from_millis(200))
        .with_seed_range(24..=36)
        .with_settle_delay(Duration::from_millis(400))
        .with_mock_latency(Duration::from_millis(150))
        .with_hold_policy(HoldPolicy::NotifyImmediately);

    if let Some(addr) = config.metrics_addr {
        MetricsServer::new(addr).start().await?;
    }

    // 3. Validation helpers at the door
    tracing::info!(
        rut = "12.345.678-5",
        valid = rut::validate("12.345.678-5"),
        formatted = %rut::format("123456785"),
        "RUT check"
    );
    forms::validate_login("maria@example.com", "secreta").context("login form should validate")?;
    forms::PaymentForm {
        first_name: "María".into(),
        last_name: "González".into(),
        card_number: "4242 4242 4242 4242".into(),
        cvv: "123".into(),
        expiry: "12/27".into(),
    }
    .validate()
    .context("payment form should validate")?;
    tracing::info!("✓ Login and payment forms validate");

    // 4. Store, hydrated from the last snapshot if one exists
    let store = StorefrontStore::new(StorefrontEnv::new(config));
    let restored = store.state(|s| s.cart.len()).await;
    if restored > 0 {
        tracing::info!(lines = restored, "Restored cart from the last run");
    }

    // 5. Session and preferences
    let event = fixtures::event();
    store.sign_in(fixtures::demo_user()).await?;
    store
        .set_preferences(UserPreferences {
            mobility_reduced: true,
            ..UserPreferences::default()
        })
        .await?;
    tracing::info!(event = %event.name, venue = %event.venue, "✓ Signed in");

    // 6. Seat advice ranked for reduced mobility
    let event_id = EventId::from("evento-1");
    let advice = store.seat_advice(&event_id).await?;
    for option in &advice.top {
        tracing::info!(
            section = %option.section_name,
            score = option.score,
            price = %format_clp(option.price),
            reason = %option.reason,
            "Seat option"
        );
    }
    let seat = advice
        .top
        .first()
        .cloned()
        .context("seat advice returned no options")?;
    store.select_seat(Some(seat.clone())).await?;
    tracing::info!(section = %seat.section_name, price = %format_clp(seat.price), "✓ Seat selected");

    // 7. Merch: same shirt twice merges into one line
    let recs = store.merch_recs(&event_id).await?;
    let shirt = recs.first().cloned().context("no merch recommendations")?;
    store.add_to_cart(shirt.cart_item(1)).await?;
    store.add_to_cart(shirt.cart_item(1)).await?;
    if let Some(second) = recs.get(1) {
        store.add_to_cart(second.cart_item(1)).await?;
    }
    // Bump the shirt line, then drop the second item via the qty floor
    store.update_cart_qty(0, 3).await?;
    store.update_cart_qty(1, 0).await?;
    let (lines, subtotal) = store
        .state(|s| (s.cart.len(), fila_storefront::cart::subtotal(&s.cart)))
        .await;
    tracing::info!(lines, subtotal = %format_clp(subtotal), "✓ Cart filled");

    // 8. Watch the queue while it decays
    let mut queue_watch = store.watch_slice(|s| s.queue.clone()).await;
    let queue_logger = tokio::spawn(async move {
        while queue_watch.changed().await.is_ok() {
            let Some(slot) = queue_watch.borrow_and_update().clone() else {
                continue;
            };
            tracing::info!(
                position = slot.position,
                status = %slot.status,
                eta_minutes = slot.estimated_minutes,
                "Queue update"
            );
        }
    });

    store.set_whatsapp_connected(true).await?;
    store.join_queue(event_id.clone()).await?;
    tokio::time::sleep(Duration::from_millis(1100)).await;

    // 9. Skip the wait with a priority hold
    let mut hold = store.request_hold().await?;
    hold.wait().await;
    let status = store.state(|s| s.queue.as_ref().map(|q| q.status)).await;
    tracing::info!(?status, "✓ Hold purchased, turn granted");

    // 10. Checkout: settle the payment, then the locker assignment
    let mut checkout = store.watch_slice(|s| s.checkout).await;
    store.begin_checkout().await?;
    while *checkout.borrow_and_update() != CheckoutPhase::Completed {
        checkout.changed().await?;
    }

    let order = store
        .state(|s| s.last_order.clone())
        .await
        .context("checkout completed without an order")?;
    tracing::info!(
        order_id = %order.order_id,
        ticket = %format_clp(order.ticket_total),
        merch = %format_clp(order.merch_total),
        total = %format_clp(order.total),
        "✓ Order complete"
    );
    if let Some(locker) = &order.locker {
        tracing::info!(code = %locker.code, qr = %locker.qr_payload, "Merch locker assigned");
    }
    let seat_kept = store.state(|s| s.seat_selection.is_some()).await;
    tracing::info!(seat_kept, "Cart cleared, seat selection kept");

    // 11. Shut down: stop the ticker, drain effects
    queue_logger.abort();
    store.shutdown(Duration::from_secs(5)).await?;
    tracing::info!("Walkthrough finished");
    Ok(())
}
