//! Geo search over approved gyms.
//!
//! Search runs in two phases: a strict radius filter, and when that finds
//! nothing, the nearest `fallback_limit` gyms regardless of distance. The
//! outcome records which phase produced the results. Within a phase,
//! currently featured gyms rank first, then nearest first.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::domain::foundation::{Timestamp, ValidationError};
use crate::domain::gym::{GeoPoint, Gym};

/// A validated search request.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuery {
    pub center: Option<GeoPoint>,
    pub radius_km: f64,
    pub city: Option<String>,
    /// Case-insensitive substring on name.
    pub text: Option<String>,
    pub fallback_limit: u32,
}

impl SearchQuery {
    pub fn new(
        center: Option<GeoPoint>,
        radius_km: f64,
        city: Option<String>,
        text: Option<String>,
        fallback_limit: u32,
    ) -> Result<Self, ValidationError> {
        if !radius_km.is_finite() || radius_km <= 0.0 || radius_km > 500.0 {
            return Err(ValidationError::invalid_format(
                "radius_km",
                "must be between 0 and 500",
            ));
        }
        let clean = |s: Option<String>| s.map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        Ok(Self {
            center,
            radius_km,
            city: clean(city),
            text: clean(text),
            fallback_limit,
        })
    }

    /// Non-geographic filters (city, text).
    pub fn matches_filters(&self, gym: &Gym) -> bool {
        let city_ok = self
            .city
            .as_ref()
            .map_or(true, |c| gym.details.city.eq_ignore_ascii_case(c));
        let text_ok = self.text.as_ref().map_or(true, |t| {
            gym.details.name.to_lowercase().contains(&t.to_lowercase())
        });
        city_ok && text_ok
    }
}

/// A gym in search results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GymHit {
    pub gym: Gym,
    /// Present when the query had a center point.
    pub distance_km: Option<f64>,
    pub is_featured: bool,
}

/// Search results tagged with the phase that produced them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "gyms", rename_all = "snake_case")]
pub enum SearchOutcome {
    /// Gyms within the requested radius.
    Exact(Vec<GymHit>),
    /// Nothing was in range; nearest gyms instead.
    Expanded(Vec<GymHit>),
}

impl SearchOutcome {
    pub fn hits(&self) -> &[GymHit] {
        match self {
            SearchOutcome::Exact(h) | SearchOutcome::Expanded(h) => h,
        }
    }

    pub fn is_expanded(&self) -> bool {
        matches!(self, SearchOutcome::Expanded(_))
    }
}

/// Featured first, then by distance (nearest first), then by rating.
pub fn rank(hits: &mut [GymHit]) {
    hits.sort_by(|a, b| {
        b.is_featured
            .cmp(&a.is_featured)
            .then_with(|| {
                let da = a.distance_km.unwrap_or(f64::MAX);
                let db = b.distance_km.unwrap_or(f64::MAX);
                da.partial_cmp(&db).unwrap_or(Ordering::Equal)
            })
            .then_with(|| {
                b.gym
                    .rating
                    .average
                    .partial_cmp(&a.gym.rating.average)
                    .unwrap_or(Ordering::Equal)
            })
    });
}

/// Runs the two-phase search over an in-memory candidate set of approved
/// gyms. Storage adapters that can filter in SQL follow the same contract.
pub fn two_phase_search(query: &SearchQuery, candidates: Vec<Gym>, now: &Timestamp) -> SearchOutcome {
    let mut hits: Vec<GymHit> = candidates
        .into_iter()
        .filter(|g| g.status.is_live() && query.matches_filters(g))
        .map(|gym| GymHit {
            distance_km: query.center.map(|c| c.distance_km(&gym.details.location)),
            is_featured: gym.is_featured(now),
            gym,
        })
        .collect();

    if query.center.is_none() {
        rank(&mut hits);
        return SearchOutcome::Exact(hits);
    }

    let (mut within, mut beyond): (Vec<GymHit>, Vec<GymHit>) = hits
        .into_iter()
        .partition(|h| h.distance_km.map_or(false, |d| d <= query.radius_km));

    if !within.is_empty() {
        rank(&mut within);
        return SearchOutcome::Exact(within);
    }

    beyond.sort_by(|a, b| {
        a.distance_km
            .partial_cmp(&b.distance_km)
            .unwrap_or(Ordering::Equal)
    });
    beyond.truncate(query.fallback_limit as usize);
    rank(&mut beyond);
    SearchOutcome::Expanded(beyond)
}
