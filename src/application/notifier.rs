//! Best-effort email notifications.
//!
//! Sends run on a spawned task; the request that triggered them never
//! waits for or fails because of email delivery.

use std::sync::Arc;

use crate::domain::booking::Booking;
use crate::domain::foundation::ApprovalStatus;
use crate::domain::trainer::TrainerBooking;
use crate::ports::{EmailMessage, EmailSender};

#[derive(Clone)]
pub struct Notifier {
    sender: Arc<dyn EmailSender>,
}

impl Notifier {
    pub fn new(sender: Arc<dyn EmailSender>) -> Self {
        Self { sender }
    }

    /// Spawns the send and logs failures.
    pub fn send(&self, message: EmailMessage) {
        let sender = Arc::clone(&self.sender);
        tokio::spawn(async move {
            let subject = message.subject.clone();
            if let Err(e) = sender.send(message).await {
                tracing::warn!(error = %e, subject = %subject, "Email notification failed");
            }
        });
    }

    pub fn booking_confirmed(&self, to: &str, gym_name: &str, booking: &Booking) {
        self.send(booking_confirmed_message(to, gym_name, booking));
    }

    pub fn trainer_session_confirmed(&self, to: &str, trainer_name: &str, booking: &TrainerBooking) {
        self.send(EmailMessage {
            to: to.to_string(),
            subject: format!("Session with {} confirmed", trainer_name),
            html: format!(
                "<p>Your session with <strong>{}</strong> on {} ({}) is confirmed.</p>\
                 <p>Amount paid: {}</p>",
                escape(trainer_name),
                booking.date,
                booking.hours,
                booking.price.total
            ),
        });
    }

    pub fn approval_changed(&self, to: &str, what: &str, name: &str, status: ApprovalStatus) {
        self.send(approval_message(to, what, name, status));
    }
}

fn booking_confirmed_message(to: &str, gym_name: &str, booking: &Booking) -> EmailMessage {
    let when = match booking.hours {
        Some(hours) => format!("{} ({})", booking.date, hours),
        None => format!("{} until {}", booking.date, booking.expires_at.as_datetime().date_naive()),
    };
    EmailMessage {
        to: to.to_string(),
        subject: format!("Booking confirmed at {}", gym_name),
        html: format!(
            "<p>Your booking at <strong>{}</strong> is confirmed for {}.</p>\
             <p>Amount paid: {}</p>\
             <p>Show this code at the front desk: <code>{}</code></p>",
            escape(gym_name),
            when,
            booking.price.total,
            booking.redemption_token.as_str()
        ),
    }
}

fn approval_message(to: &str, what: &str, name: &str, status: ApprovalStatus) -> EmailMessage {
    EmailMessage {
        to: to.to_string(),
        subject: format!("Your {} listing was {}", what, status),
        html: format!(
            "<p>Your {} <strong>{}</strong> is now <strong>{}</strong>.</p>",
            what,
            escape(name),
            status
        ),
    }
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
