use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Announcement {
    pub id: Uuid,
    pub message: String,
    pub start_date: Option<DateTime<Utc>>,
    pub expiration_date: DateTime<Utc>,
    pub created_by: String, // teacher username
    pub created_at: DateTime<Utc>,
}

impl Announcement {
    /// Active means `now` falls inside `[start_date, expiration_date)`.
    /// A missing start date is treated as the unbounded past.
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        let started = self.start_date.map_or(true, |start| start <= now);
        started && now < self.expiration_date
    }
}

// Request DTOs. Dates stay raw strings here so a bad format surfaces as our
// own 400 instead of a generic deserialization rejection.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateAnnouncementRequest {
    #[validate(length(min = 1, max = 500, message = "Message must be between 1 and 500 characters"))]
    pub message: String,
    pub start_date: Option<String>,
    pub expiration_date: String,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateAnnouncementRequest {
    #[validate(length(min = 1, max = 500, message = "Message must be between 1 and 500 characters"))]
    pub message: Option<String>,
    pub start_date: Option<String>,
    pub expiration_date: Option<String>,
}

/// Parsed, store-ready input for a new announcement.
#[derive(Debug, Clone)]
pub struct NewAnnouncement {
    pub message: String,
    pub start_date: Option<DateTime<Utc>>,
    pub expiration_date: DateTime<Utc>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

/// Partial update: `None` fields keep their stored value.
/// `start_date: Some(None)` clears the start date.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnnouncementChanges {
    pub message: Option<String>,
    pub start_date: Option<Option<DateTime<Utc>>>,
    pub expiration_date: Option<DateTime<Utc>>,
}

impl AnnouncementChanges {
    pub fn is_empty(&self) -> bool {
        self.message.is_none() && self.start_date.is_none() && self.expiration_date.is_none()
    }

    pub fn apply_to(&self, announcement: &mut Announcement) {
        if let Some(message) = &self.message {
            announcement.message = message.clone();
        }
        if let Some(start) = self.start_date {
            announcement.start_date = start;
        }
        if let Some(expiration) = self.expiration_date {
            announcement.expiration_date = expiration;
        }
    }
}

/// Parse an ISO-8601 timestamp into a UTC instant.
///
/// Accepts RFC 3339 (`Z` or a numeric offset), a naive date-time which is
/// taken as UTC, and a bare date which maps to midnight UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn sample(start: Option<DateTime<Utc>>, expiration: DateTime<Utc>) -> Announcement {
        Announcement {
            id: Uuid::new_v4(),
            message: "Picture day on Friday".into(),
            start_date: start,
            expiration_date: expiration,
            created_by: "mrodriguez".into(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn parses_zulu_and_offset_forms() {
        let zulu = parse_timestamp("2024-05-01T08:00:00Z").unwrap();
        let offset = parse_timestamp("2024-05-01T10:00:00+02:00").unwrap();
        assert_eq!(zulu, offset);
        assert_eq!(zulu, Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap());
    }

    #[test]
    fn parses_fractional_seconds() {
        let dt = parse_timestamp("2024-05-01T08:00:00.250Z").unwrap();
        assert_eq!(dt.timestamp_subsec_millis(), 250);
    }

    #[test]
    fn naive_forms_are_utc() {
        let expected = Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap();
        assert_eq!(parse_timestamp("2024-05-01T08:00:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-05-01 08:00:00"), Some(expected));
        assert_eq!(
            parse_timestamp("2024-05-01"),
            Some(Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(parse_timestamp("next friday"), None);
        assert_eq!(parse_timestamp(""), None);
        assert_eq!(parse_timestamp("2024-13-01T00:00:00Z"), None);
    }

    #[test]
    fn expiration_boundary_is_exclusive() {
        let now = Utc::now();
        assert!(!sample(None, now).is_active_at(now));
        assert!(sample(None, now + Duration::seconds(1)).is_active_at(now));
    }

    #[test]
    fn start_boundary_is_inclusive() {
        let now = Utc::now();
        let later = now + Duration::days(1);
        assert!(sample(Some(now), later).is_active_at(now));
        assert!(!sample(Some(now + Duration::seconds(1)), later).is_active_at(now));
    }

    #[test]
    fn message_length_is_validated() {
        let ok = CreateAnnouncementRequest {
            message: "é".repeat(500),
            start_date: None,
            expiration_date: "2030-01-01T00:00:00Z".into(),
        };
        assert!(ok.validate().is_ok());

        let too_long = CreateAnnouncementRequest { message: "a".repeat(501), ..ok };
        assert!(too_long.validate().is_err());

        let empty = UpdateAnnouncementRequest {
            message: Some(String::new()),
            ..Default::default()
        };
        assert!(empty.validate().is_err());
        assert!(UpdateAnnouncementRequest::default().validate().is_ok());
    }

    #[test]
    fn changes_only_touch_supplied_fields() {
        let now = Utc::now();
        let start = now - Duration::days(1);
        let mut a = sample(Some(start), now + Duration::days(7));
        let original_expiration = a.expiration_date;

        let changes = AnnouncementChanges {
            message: Some("Updated".into()),
            ..Default::default()
        };
        changes.apply_to(&mut a);

        assert_eq!(a.message, "Updated");
        assert_eq!(a.start_date, Some(start));
        assert_eq!(a.expiration_date, original_expiration);
    }

    #[test]
    fn changes_can_clear_start_date() {
        let now = Utc::now();
        let mut a = sample(Some(now + Duration::days(1)), now + Duration::days(7));
        assert!(!a.is_active_at(now));

        let changes = AnnouncementChanges {
            start_date: Some(None),
            ..Default::default()
        };
        assert!(!changes.is_empty());
        changes.apply_to(&mut a);

        assert_eq!(a.start_date, None);
        assert!(a.is_active_at(now));
    }
}
