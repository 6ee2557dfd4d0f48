//! Trainer handlers: registration, moderation, standalone sessions.

mod create_trainer_booking;
mod moderate_trainer;
mod register_trainer;
mod trainer_queries;
mod update_trainer_session;
mod verify_trainer_payment;

pub use create_trainer_booking::{CreateTrainerBookingCommand, CreateTrainerBookingHandler};
pub use moderate_trainer::{ModerateTrainerCommand, ModerateTrainerHandler};
pub use register_trainer::{RegisterTrainerCommand, RegisterTrainerHandler};
pub use trainer_queries::{TrainerQueries, TrainerSchedule};
pub use update_trainer_session::{SessionAction, UpdateTrainerSessionCommand, UpdateTrainerSessionHandler};
pub use verify_trainer_payment::VerifyTrainerPaymentHandler;
