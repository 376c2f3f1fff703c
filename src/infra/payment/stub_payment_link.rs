use crate::domain::ports::PaymentLinkProvider;

/// Placeholder for the payment gateway: mints a checkout URL without talking
/// to any provider.
pub struct StubPaymentLink {
    base_url: String,
}

impl StubPaymentLink {
    pub fn new(base_url: String) -> Self {
        Self { base_url }
    }
}

impl PaymentLinkProvider for StubPaymentLink {
    fn payment_url(&self, booking_id: &str, amount: i64) -> String {
        format!("{}?booking={}&amount={:.2}", self.base_url, booking_id, amount as f64 / 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_carries_booking_and_amount() {
        let links = StubPaymentLink::new("https://pay.example/checkout".into());
        assert_eq!(
            links.payment_url("abc-123", 8000),
            "https://pay.example/checkout?booking=abc-123&amount=80.00"
        );
    }
}
