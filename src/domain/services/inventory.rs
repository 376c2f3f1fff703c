use std::collections::HashSet;

use crate::domain::models::booking::SeatSelection;
use crate::error::AppError;

/// Decodes the seat-selection JSON columns of held bookings into the set of
/// occupied seat codes. Repository backends feed this the raw column values
/// so both share one definition of "held".
pub fn decode_held_seat_codes(seat_columns: &[String]) -> Result<HashSet<String>, AppError> {
    let mut codes = HashSet::new();
    for raw in seat_columns {
        let seats: Vec<SeatSelection> = serde_json::from_str(raw)
            .map_err(|e| AppError::InternalWithMsg(format!("Corrupt seat data in booking row: {}", e)))?;
        codes.extend(seats.iter().map(SeatSelection::code));
    }
    Ok(codes)
}

/// Requested seat codes that collide with already-occupied ones, in request
/// order.
pub fn conflicting_codes(requested: &[SeatSelection], occupied: &HashSet<String>) -> Vec<String> {
    requested
        .iter()
        .map(SeatSelection::code)
        .filter(|code| occupied.contains(code))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::hall::SeatType;

    fn seat(row: &str, number: i32) -> SeatSelection {
        SeatSelection { row: row.to_string(), number, kind: SeatType::Standard, price: 5000 }
    }

    #[test]
    fn decodes_seat_codes_across_bookings() {
        let columns = vec![
            serde_json::to_string(&vec![seat("A", 1), seat("A", 2)]).unwrap(),
            serde_json::to_string(&vec![seat("B", 7)]).unwrap(),
        ];
        let codes = decode_held_seat_codes(&columns).unwrap();
        assert_eq!(codes, HashSet::from(["A1".into(), "A2".into(), "B7".into()]));
    }

    #[test]
    fn reports_exact_conflicts() {
        let occupied = HashSet::from(["A1".to_string(), "C3".to_string()]);
        let requested = vec![seat("A", 1), seat("B", 2), seat("C", 3)];
        assert_eq!(conflicting_codes(&requested, &occupied), vec!["A1", "C3"]);
    }

    #[test]
    fn corrupt_rows_are_an_error() {
        assert!(decode_held_seat_codes(&["not json".to_string()]).is_err());
    }

    #[test]
    fn seat_codes_distinguish_rows() {
        // A12 and A1 + seat 2 must not be confused by string concatenation.
        let occupied = HashSet::from(["A12".to_string()]);
        let requested = vec![seat("A", 1)];
        assert!(conflicting_codes(&requested, &occupied).is_empty());
    }
}
