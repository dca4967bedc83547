//! Notification dispatch worker.
//!
//! The booking service commits first and then drops a [`DomainEvent`] into
//! the outbox channel; this consumer performs the actual in-app and email
//! delivery. A failed delivery is logged and dropped — it never reaches
//! back into booking or wallet state.

use std::sync::Arc;

use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{info, warn};
use wayfare_booking::events::DomainEvent;
use wayfare_core::notify::{Mailer, NotificationKind, Notifier};

pub async fn run_dispatcher(
    mut rx: UnboundedReceiver<DomainEvent>,
    notifier: Arc<dyn Notifier>,
    mailer: Arc<dyn Mailer>,
) {
    info!("Notification dispatcher started");
    while let Some(event) = rx.recv().await {
        dispatch(notifier.as_ref(), mailer.as_ref(), event).await;
    }
    info!("Notification dispatcher stopped: outbox closed");
}

async fn dispatch(notifier: &dyn Notifier, mailer: &dyn Mailer, event: DomainEvent) {
    match event {
        DomainEvent::BookingCreated {
            booking_id,
            user_id,
            user_email,
            package_name,
            total_price,
        } => {
            let subject = format!("Booking Confirmation - {package_name}");
            let html = format!(
                "<h2>Booking received</h2>\
                 <p>Your booking for <b>{package_name}</b> has been received.</p>\
                 <p>Total: ${total_price}. Please complete the payment to confirm.</p>"
            );
            let preview_url = send_email(mailer, user_email.as_deref(), &subject, &html).await;

            let message = format!(
                "Your booking for {package_name} has been received. \
                 Please complete the payment to confirm."
            );
            if let Err(err) = notifier
                .send(
                    user_id,
                    "Booking Initiated",
                    &message,
                    NotificationKind::BookingReceived,
                    preview_url.as_deref(),
                )
                .await
            {
                warn!(%booking_id, %user_id, "booking notification failed: {err}");
            }
        }
        DomainEvent::PaymentReceived {
            booking_id,
            user_id,
            user_email,
            amount,
        } => {
            let subject = format!("Payment Received - Booking #{}", booking_id.simple());
            let html = format!(
                "<h2>Payment received</h2>\
                 <p>We have received your payment of ${amount}. Your trip is confirmed!</p>"
            );
            let preview_url = send_email(mailer, user_email.as_deref(), &subject, &html).await;

            let message = format!(
                "We have received your payment for Booking #{}. Your trip is confirmed!",
                booking_id.simple()
            );
            if let Err(err) = notifier
                .send(
                    user_id,
                    "Payment Successful",
                    &message,
                    NotificationKind::PaymentSuccess,
                    preview_url.as_deref(),
                )
                .await
            {
                warn!(%booking_id, %user_id, "payment notification failed: {err}");
            }
        }
        DomainEvent::BookingCancelled {
            booking_id,
            user_id,
            user_email,
            refund_amount,
        } => {
            let subject = format!("Booking Cancelled - #{}", booking_id.simple());
            let html = format!(
                "<h2>Booking cancelled</h2>\
                 <p>Your booking has been cancelled. Refund: ${refund_amount}.</p>"
            );
            let preview_url = send_email(mailer, user_email.as_deref(), &subject, &html).await;

            let message = format!(
                "Your booking #{} has been cancelled. Refund of ${refund_amount} initiated.",
                booking_id.simple()
            );
            if let Err(err) = notifier
                .send(
                    user_id,
                    "Booking Cancelled",
                    &message,
                    NotificationKind::Cancellation,
                    preview_url.as_deref(),
                )
                .await
            {
                warn!(%booking_id, %user_id, "cancellation notification failed: {err}");
            }
        }
    }
}

async fn send_email(
    mailer: &dyn Mailer,
    to: Option<&str>,
    subject: &str,
    html: &str,
) -> Option<String> {
    let to = to?;
    match mailer.send(to, subject, html).await {
        Ok(preview_url) => preview_url,
        Err(err) => {
            warn!(to, subject, "email delivery failed: {err}");
            None
        }
    }
}
