use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use chrono::{DateTime, Utc};
use rand::Rng;

const CODE_LEN: usize = 8;
const CODE_CHARS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// 8 characters drawn uniformly from [A-Z0-9]. Not cryptographically secure;
/// the caller must verify uniqueness against the store before accepting it.
pub fn booking_code() -> String {
    let mut rng = rand::thread_rng();
    (0..CODE_LEN)
        .map(|_| CODE_CHARS[rng.gen_range(0..CODE_CHARS.len())] as char)
        .collect()
}

/// Opaque, display-only QR payload. Base64 of `TICKET_{code}_{timestamp}` so
/// scanners can recover the booking code; not a security token.
pub fn qr_payload(booking_code: &str, issued_at: DateTime<Utc>) -> String {
    BASE64.encode(format!("TICKET_{}_{}", booking_code, issued_at.format("%Y%m%d%H%M%S")))
}

/// Recovers the booking code embedded in a QR payload.
pub fn booking_code_from_qr(payload: &str) -> Option<String> {
    let decoded = BASE64.decode(payload).ok()?;
    let text = String::from_utf8(decoded).ok()?;
    let rest = text.strip_prefix("TICKET_")?;
    let (code, _) = rest.split_once('_')?;
    Some(code.to_string())
}
