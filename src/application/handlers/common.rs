//! Checks shared by several handlers.

use chrono::{NaiveDate, Utc};

use crate::domain::foundation::{
    BookingId, DomainError, ErrorCode, GymId, ServiceId, TrainerBookingId, TrainerId,
};
use crate::domain::gym::{Gym, GymService};
use crate::domain::trainer::Trainer;
use crate::ports::{GymRepository, ServiceRepository, TrainerRepository};

/// Returned when a compare-and-set write finds the row already changed.
pub fn concurrent_change(what: &str) -> DomainError {
    DomainError::new(
        ErrorCode::InvalidStateTransition,
        format!("{} changed concurrently, retry", what),
    )
}

pub fn ensure_not_past(date: NaiveDate) -> Result<(), DomainError> {
    if date < Utc::now().date_naive() {
        return Err(DomainError::validation("date", "Date is in the past"));
    }
    Ok(())
}

pub fn ensure_order_matches(expected: Option<&str>, order_id: &str) -> Result<(), DomainError> {
    if expected != Some(order_id) {
        return Err(DomainError::new(
            ErrorCode::PaymentSignatureInvalid,
            "Order does not belong to this checkout",
        )
        .with_detail("order_id", order_id));
    }
    Ok(())
}

pub async fn load_gym(gyms: &dyn GymRepository, id: &GymId) -> Result<Gym, DomainError> {
    gyms.find_by_id(id).await?.ok_or_else(|| {
        DomainError::new(ErrorCode::GymNotFound, "Gym not found").with_detail("gym_id", id.to_string())
    })
}

pub async fn load_service(services: &dyn ServiceRepository, id: &ServiceId) -> Result<GymService, DomainError> {
    services.find_by_id(id).await?.ok_or_else(|| {
        DomainError::new(ErrorCode::ServiceNotFound, "Service not found")
            .with_detail("service_id", id.to_string())
    })
}

pub async fn load_trainer(trainers: &dyn TrainerRepository, id: &TrainerId) -> Result<Trainer, DomainError> {
    trainers.find_by_id(id).await?.ok_or_else(|| {
        DomainError::new(ErrorCode::TrainerNotFound, "Trainer not found")
            .with_detail("trainer_id", id.to_string())
    })
}

pub fn booking_not_found(id: &BookingId) -> DomainError {
    DomainError::new(ErrorCode::BookingNotFound, "Booking not found").with_detail("booking_id", id.to_string())
}

pub fn trainer_booking_not_found(id: &TrainerBookingId) -> DomainError {
    DomainError::new(ErrorCode::TrainerBookingNotFound, "Trainer booking not found")
        .with_detail("trainer_booking_id", id.to_string())
}
