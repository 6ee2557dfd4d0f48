//! Concurrent writes never oversell a slot or overlap two slots.

mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use serde_json::json;

use common::{next_week, TestApp, OWNER};
use gymhub::adapters::payment::MockPaymentGateway;
use gymhub::application::handlers::booking::{CreateBookingCommand, CreateBookingHandler};
use gymhub::application::handlers::gym::{CreateSlotCommand, ManageSlotsHandler};
use gymhub::application::CachedSettings;
use gymhub::domain::booking::CapacityPolicy;
use gymhub::domain::foundation::{
    CommissionRate, CurrentUser, DayOfWeek, ErrorCode, GymId, Hour, Money, Role, ServiceId, UserId,
};
use gymhub::domain::gym::SlotDefinition;
use gymhub::domain::settings::PlatformSettings;

const CAPACITY: u32 = 3;
const CONTENDERS: usize = 12;

fn member(n: usize) -> CurrentUser {
    CurrentUser {
        id: UserId::new(),
        email: format!("member{}@test.example.com", n),
        name: format!("Member {}", n),
        role: Role::User,
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_checkouts_fill_slot_exactly() {
    let app = TestApp::new();
    let gym_id = app.approved_gym().await;
    let service_id: ServiceId = app
        .service(&gym_id, json!({ "name": "Hourly", "service_type": "session", "price": 25000 }))
        .await
        .parse()
        .unwrap();

    let date = next_week();
    let (status, _) = app
        .post(
            &format!("/api/gyms/{}/slots", gym_id),
            OWNER,
            json!({
                "day_of_week": DayOfWeek::of(date),
                "start_time": "06:00",
                "end_time": "09:00",
                "max_capacity": CAPACITY
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let store = app.store.clone();
    let settings = Arc::new(CachedSettings::new(
        store.clone(),
        PlatformSettings {
            commission_rate: CommissionRate::try_from_bps(1000).unwrap(),
            featured_price_per_day: Money::from_major(499),
        },
        std::time::Duration::ZERO,
    ));
    let handler = Arc::new(CreateBookingHandler::new(
        store.clone(),
        store.clone(),
        store.clone(),
        store.clone(),
        Arc::new(MockPaymentGateway::new()),
        settings,
        CapacityPolicy::new(chrono::Duration::minutes(15)),
    ));

    let tasks: Vec<_> = (0..CONTENDERS)
        .map(|n| {
            let handler = handler.clone();
            tokio::spawn(async move {
                handler
                    .handle(CreateBookingCommand {
                        user: member(n),
                        service_id,
                        date,
                        start_time: Some(Hour::try_new(7).unwrap()),
                        duration_hours: Some(1),
                        trainer_id: None,
                    })
                    .await
            })
        })
        .collect();

    let mut booked = 0;
    let mut full = 0;
    for task in tasks {
        match task.await.unwrap() {
            Ok(_) => booked += 1,
            Err(e) => {
                assert_eq!(e.code, ErrorCode::SlotFull, "{}", e);
                full += 1;
            }
        }
    }

    assert_eq!(booked, CAPACITY as usize);
    assert_eq!(full, CONTENDERS - CAPACITY as usize);
}

#[tokio::test]
async fn overlapping_hours_count_against_each_checkpoint() {
    let app = TestApp::new();
    let gym_id = app.approved_gym().await;
    let service_id = app
        .service(&gym_id, json!({ "name": "Hourly", "service_type": "session", "price": 25000 }))
        .await;
    let date = next_week();
    let (status, _) = app
        .post(
            &format!("/api/gyms/{}/slots", gym_id),
            OWNER,
            json!({
                "day_of_week": DayOfWeek::of(date),
                "start_time": "17:00",
                "end_time": "20:00",
                "max_capacity": 1
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    // 17:00-19:00 occupies both the 17 and 18 checkpoints.
    let (status, _) = app
        .post(
            "/api/bookings",
            common::MEMBER,
            json!({ "service_id": service_id, "date": date, "start_time": "17:00", "duration_hours": 2 }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = app
        .post(
            "/api/bookings",
            common::OTHER_MEMBER,
            json!({ "service_id": service_id, "date": date, "start_time": "18:00", "duration_hours": 1 }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "SLOT_FULL");

    let (status, _) = app
        .post(
            "/api/bookings",
            common::OTHER_MEMBER,
            json!({ "service_id": service_id, "date": date, "start_time": "19:00", "duration_hours": 1 }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_overlapping_slots_never_both_land() {
    let app = TestApp::new();
    let gym_id: GymId = app.approved_gym().await.parse().unwrap();
    let (_, owner) = app.get("/api/me", Some(OWNER)).await;
    let owner = CurrentUser {
        id: owner["id"].as_str().unwrap().parse().unwrap(),
        email: owner["email"].as_str().unwrap().to_string(),
        name: owner["name"].as_str().unwrap().to_string(),
        role: Role::GymOwner,
    };
    let handler = Arc::new(ManageSlotsHandler::new(app.store.clone(), app.store.clone()));
    let day = DayOfWeek::of(next_week());

    let tasks: Vec<_> = [(6, 9), (8, 10), (7, 8), (6, 7)]
        .into_iter()
        .map(|(start, end)| {
            let handler = handler.clone();
            let owner = owner.clone();
            tokio::spawn(async move {
                handler
                    .create(CreateSlotCommand {
                        user: owner,
                        gym_id,
                        slot: SlotDefinition {
                            day_of_week: day,
                            start_time: Hour::try_new(start).unwrap(),
                            end_time: Hour::try_new(end).unwrap(),
                            max_capacity: 10,
                            is_active: true,
                        },
                    })
                    .await
            })
        })
        .collect();

    let mut created = Vec::new();
    for task in tasks {
        match task.await.unwrap() {
            Ok(slot) => created.push(slot),
            Err(e) => assert_eq!(e.code, ErrorCode::SlotOverlap, "{}", e),
        }
    }
    assert!(!created.is_empty());

    let (_, listed) = app.get(&format!("/api/gyms/{}/slots", gym_id), None).await;
    let listed = listed.as_array().unwrap();
    assert_eq!(listed.len(), created.len());
    for (i, a) in created.iter().enumerate() {
        for b in &created[i + 1..] {
            assert!(!a.hours.overlaps(&b.hours), "{} overlaps {}", a.hours, b.hours);
        }
    }
}
