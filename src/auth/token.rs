use time::OffsetDateTime;
use uuid::Uuid;

/// Opaque login token. Not signed, no expiry and no server-side record;
/// clients only echo it back on logout.
#[derive(Debug, Clone)]
pub struct SessionToken {
    pub value: String,
    pub issued_at: OffsetDateTime,
}

pub fn issue() -> SessionToken {
    SessionToken {
        value: Uuid::new_v4().to_string(),
        issued_at: OffsetDateTime::now_utc(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_are_random_uuids() {
        let a = issue();
        let b = issue();
        assert_ne!(a.value, b.value);
        assert!(Uuid::parse_str(&a.value).is_ok());
        assert!(a.issued_at <= OffsetDateTime::now_utc());
    }
}
