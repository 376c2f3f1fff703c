use crate::domain::models::hall::SeatType;

/// Pricing breakdown for a booking. All amounts in cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceQuote {
    pub total_amount: i64,
    pub discount_amount: i64,
    pub final_amount: i64,
}

/// Unit price for a seat: VIP seats use the session's VIP price, everything
/// else (standard, premium, disabled) the standard price.
pub fn seat_price(kind: SeatType, standard_price: i64, vip_price: i64) -> i64 {
    match kind {
        SeatType::Vip => vip_price,
        _ => standard_price,
    }
}

fn discount_percent(code: &str) -> i64 {
    match code.trim().to_lowercase().as_str() {
        "student" => 20,
        "65+ age" => 30,
        "wednesday" => 15,
        _ => 0,
    }
}

/// Applies the discount policy to a total. Exactly one code applies, matched
/// case-insensitively; unknown or absent codes discount nothing. Rates stay
/// below 100%, so the final amount never goes negative.
pub fn quote(total_amount: i64, discount_code: Option<&str>) -> PriceQuote {
    let percent = discount_code.map(discount_percent).unwrap_or(0);
    let discount_amount = total_amount * percent / 100;
    PriceQuote {
        total_amount,
        discount_amount,
        final_amount: total_amount - discount_amount,
    }
}
