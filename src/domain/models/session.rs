use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use sqlx::FromRow;

/// Derived fill-level of a session's seating.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OccupancyStatus {
    Available,
    FillingUp,
    FewSeatsLeft,
}

impl OccupancyStatus {
    /// Classifies occupancy from the remaining/total seat counts. An empty
    /// hall (`total == 0`) is Available rather than a division error.
    pub fn for_counts(available: i32, total: i32) -> Self {
        if total == 0 {
            return OccupancyStatus::Available;
        }
        let occupancy = f64::from(total - available) / f64::from(total);
        if occupancy >= 0.9 {
            OccupancyStatus::FewSeatsLeft
        } else if occupancy >= 0.7 {
            OccupancyStatus::FillingUp
        } else {
            OccupancyStatus::Available
        }
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Session {
    pub id: String,
    pub movie_id: String,
    pub hall_id: String,
    pub cinema_id: String,
    pub session_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    /// Prices in cents.
    pub standard_price: i64,
    pub vip_price: i64,
    pub total_seats: i32,
    pub available_seats: i32,
    pub occupancy_status: OccupancyStatus,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub struct NewSessionParams {
    pub movie_id: String,
    pub hall_id: String,
    pub cinema_id: String,
    pub session_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub standard_price: i64,
    pub vip_price: i64,
    pub total_seats: i32,
}

impl Session {
    pub fn new(params: NewSessionParams) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            movie_id: params.movie_id,
            hall_id: params.hall_id,
            cinema_id: params.cinema_id,
            session_date: params.session_date,
            start_time: params.start_time,
            end_time: params.end_time,
            standard_price: params.standard_price,
            vip_price: params.vip_price,
            total_seats: params.total_seats,
            available_seats: params.total_seats,
            occupancy_status: OccupancyStatus::Available,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn starts_at(&self) -> NaiveDateTime {
        self.session_date.and_time(self.start_time)
    }

    pub fn has_started(&self, now: NaiveDateTime) -> bool {
        self.starts_at() <= now
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn occupancy_boundaries() {
        // 10% remaining is the FewSeatsLeft boundary, 30% the FillingUp one.
        assert_eq!(OccupancyStatus::for_counts(10, 100), OccupancyStatus::FewSeatsLeft);
        assert_eq!(OccupancyStatus::for_counts(11, 100), OccupancyStatus::FillingUp);
        assert_eq!(OccupancyStatus::for_counts(30, 100), OccupancyStatus::FillingUp);
        assert_eq!(OccupancyStatus::for_counts(31, 100), OccupancyStatus::Available);
        assert_eq!(OccupancyStatus::for_counts(100, 100), OccupancyStatus::Available);
        assert_eq!(OccupancyStatus::for_counts(0, 100), OccupancyStatus::FewSeatsLeft);
    }

    #[test]
    fn empty_hall_is_available() {
        assert_eq!(OccupancyStatus::for_counts(0, 0), OccupancyStatus::Available);
    }
}
