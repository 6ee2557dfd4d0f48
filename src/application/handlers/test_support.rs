//! Fixtures for handler tests: an in-memory world with a mock gateway.

use std::sync::Arc;
use std::time::Duration;

use chrono::{NaiveDate, Utc};

use crate::adapters::email::RecordingEmailSender;
use crate::adapters::memory::InMemoryStore;
use crate::adapters::payment::MockPaymentGateway;
use crate::application::{CachedSettings, Notifier};
use crate::domain::booking::CapacityPolicy;
use crate::domain::foundation::{
    CommissionRate, CurrentUser, DayOfWeek, Hour, IdentityClaims, Money, Role,
};
use crate::domain::gym::{
    GeoPoint, Gym, GymDetails, GymService, NewService, ServiceType, SlotDefinition, TimeSlot,
};
use crate::domain::settings::PlatformSettings;
use crate::domain::trainer::{Trainer, TrainerProfile};
use crate::domain::user::User;
use crate::ports::{GymRepository, ServiceRepository, SlotRepository, TrainerRepository, UserRepository};

pub struct World {
    pub store: Arc<InMemoryStore>,
    pub payments: Arc<MockPaymentGateway>,
    pub emails: Arc<RecordingEmailSender>,
    pub settings: Arc<CachedSettings>,
}

impl World {
    pub fn new() -> Self {
        let store = Arc::new(InMemoryStore::new());
        let defaults = PlatformSettings {
            commission_rate: CommissionRate::try_from_bps(1000).unwrap(),
            featured_price_per_day: Money::from_major(499),
        };
        Self {
            settings: Arc::new(CachedSettings::new(store.clone(), defaults, Duration::ZERO)),
            store,
            payments: Arc::new(MockPaymentGateway::new()),
            emails: Arc::new(RecordingEmailSender::new()),
        }
    }

    pub fn notifier(&self) -> Notifier {
        Notifier::new(self.emails.clone())
    }

    pub fn policy() -> CapacityPolicy {
        CapacityPolicy::new(chrono::Duration::minutes(15))
    }

    pub async fn user(&self, name: &str, role: Role) -> CurrentUser {
        let claims = IdentityClaims::new(format!("sub-{}", name), format!("{}@test.example.com", name))
            .with_display_name(name);
        let mut user = User::provision(&claims, &[]);
        user.promote_to(role);
        self.store.provision(&user).await.unwrap().to_current_user()
    }

    pub async fn approved_gym(&self, owner: &CurrentUser) -> Gym {
        let mut gym = Gym::create(owner.id, details("Iron Temple")).unwrap();
        gym.approve().unwrap();
        GymRepository::insert(self.store.as_ref(), &gym).await.unwrap();
        gym
    }

    pub async fn service(&self, gym: &Gym, service_type: ServiceType, price: i64) -> GymService {
        let (duration_days, session_count) = match service_type {
            ServiceType::Session => (None, None),
            ServiceType::Pass => (Some(30), Some(10)),
            ServiceType::Membership => (Some(30), None),
        };
        let service = GymService::create(
            gym.id,
            NewService {
                name: format!("{} plan", service_type),
                description: String::new(),
                service_type,
                price: Money::from_major(price),
                duration_days,
                session_count,
            },
        )
        .unwrap();
        ServiceRepository::insert(self.store.as_ref(), &service).await.unwrap();
        service
    }

    pub async fn slot(&self, gym: &Gym, date: NaiveDate, start: u8, end: u8, capacity: u32) -> TimeSlot {
        let slot = TimeSlot::create(
            gym.id,
            SlotDefinition {
                day_of_week: DayOfWeek::of(date),
                start_time: hour(start),
                end_time: hour(end),
                max_capacity: capacity,
                is_active: true,
            },
        )
        .unwrap();
        self.store.insert_checked(&slot).await.unwrap();
        slot
    }

    pub async fn approved_trainer(&self, user: &CurrentUser, gym: &Gym, rate: i64) -> Trainer {
        let mut trainer = Trainer::register(
            user.id,
            gym.id,
            TrainerProfile {
                display_name: user.name.clone(),
                bio: "Coach".to_string(),
                specialties: vec![],
                hourly_rate: Money::from_major(rate),
            },
        )
        .unwrap();
        trainer.approve().unwrap();
        TrainerRepository::insert(self.store.as_ref(), &trainer).await.unwrap();
        trainer
    }
}

pub fn details(name: &str) -> GymDetails {
    GymDetails {
        name: name.to_string(),
        description: "Strength gym".to_string(),
        address: "12 MG Road".to_string(),
        city: "Bengaluru".to_string(),
        location: GeoPoint::try_new(12.97, 77.59).unwrap(),
        amenities: vec![],
        images: vec![],
    }
}

pub fn hour(v: u8) -> Hour {
    Hour::try_new(v).unwrap()
}

/// A week from today, so it is never in the past.
pub fn next_week() -> NaiveDate {
    Utc::now().date_naive() + chrono::Duration::days(7)
}
