use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use sqlx::types::Json;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum SeatType {
    Standard,
    Vip,
    Premium,
    Disabled,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SeatSpot {
    pub number: i32,
    pub kind: SeatType,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SeatRow {
    pub row: String,
    pub seats: Vec<SeatSpot>,
}

/// Typed seating plan of a hall. Seat codes are `{row}{number}`, e.g. `A7`.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct SeatGrid {
    pub rows: Vec<SeatRow>,
}

impl SeatGrid {
    /// Uniform grid of `rows` lettered rows with `per_row` standard seats each.
    pub fn uniform(rows: u8, per_row: i32) -> Self {
        let rows = (0..rows)
            .map(|i| SeatRow {
                row: char::from(b'A' + i).to_string(),
                seats: (1..=per_row)
                    .map(|number| SeatSpot { number, kind: SeatType::Standard })
                    .collect(),
            })
            .collect();
        Self { rows }
    }

    pub fn seat_count(&self) -> i32 {
        self.rows.iter().map(|r| r.seats.len() as i32).sum()
    }

    pub fn find(&self, row: &str, number: i32) -> Option<SeatType> {
        self.rows
            .iter()
            .find(|r| r.row == row)
            .and_then(|r| r.seats.iter().find(|s| s.number == number))
            .map(|s| s.kind)
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Hall {
    pub id: String,
    pub cinema_id: String,
    pub name: String,
    pub capacity: i32,
    pub seat_grid: Json<SeatGrid>,
    pub features: Json<Vec<String>>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Hall {
    pub fn new(cinema_id: String, name: String, seat_grid: SeatGrid, features: Vec<String>) -> Self {
        let now = Utc::now();
        let capacity = seat_grid.seat_count();
        Self {
            id: Uuid::new_v4().to_string(),
            cinema_id,
            name,
            capacity,
            seat_grid: Json(seat_grid),
            features: Json(features),
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }
}
