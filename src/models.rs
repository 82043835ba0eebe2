//! Data models

use chrono::{Local, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Account role
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    #[default]
    User,
}

/// Account lifecycle status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    #[default]
    Pending,
    Active,
    Expired,
    Suspended,
}

/// A login-capable identity. The account id is the key it is stored
/// under, not a field, matching the historical on-disk layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub password: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub status: AccountStatus,
    #[serde(default)]
    pub access_expires: Option<String>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub residents_count: i64,
}

/// Admin patch for an account. Only these three fields are
/// recognized; anything else in the request body is ignored.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AccountPatch {
    pub status: Option<AccountStatus>,
    #[serde(deserialize_with = "double_option")]
    pub access_expires: Option<Option<String>>,
    pub role: Option<Role>,
}

// Distinguishes an absent field (outer None) from an explicit null
// (Some(None)), so an admin can clear an expiry date.
fn double_option<'de, D>(de: D) -> Result<Option<Option<String>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Option::<String>::deserialize(de).map(Some)
}

/// Current local time in the ISO format the stored files use.
pub fn now_iso() -> String {
    Local::now()
        .naive_local()
        .format("%Y-%m-%dT%H:%M:%S%.6f")
        .to_string()
}

/// Lenient expiry parser: full ISO datetime first, then a bare date
/// (midnight). Anything else is treated as no expiry.
pub fn parse_expiry(raw: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = raw.parse::<NaiveDateTime>() {
        return Some(dt);
    }
    raw.parse::<NaiveDate>()
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Whether the account's access expiry has passed. Unset or
/// malformed dates never count as expired.
pub fn is_past_expiry(account: &Account, now: NaiveDateTime) -> bool {
    account
        .access_expires
        .as_deref()
        .and_then(parse_expiry)
        .map_or(false, |expiry| expiry < now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn account(expires: Option<&str>) -> Account {
        Account {
            password: "pw".into(),
            role: Role::User,
            status: AccountStatus::Active,
            access_expires: expires.map(str::to_string),
            created_at: now_iso(),
            residents_count: 0,
        }
    }

    #[test]
    fn parses_datetime_and_bare_date() {
        assert!(parse_expiry("2024-01-07T12:34:56").is_some());
        assert!(parse_expiry("2024-01-07T12:34:56.789012").is_some());
        let midnight = parse_expiry("2024-01-07").unwrap();
        assert_eq!(midnight.format("%H:%M:%S").to_string(), "00:00:00");
    }

    #[test]
    fn malformed_expiry_is_never_expired() {
        let now = Local::now().naive_local();
        assert!(!is_past_expiry(&account(Some("not-a-date")), now));
        assert!(!is_past_expiry(&account(Some("")), now));
        assert!(!is_past_expiry(&account(None), now));
    }

    #[test]
    fn past_and_future_expiry() {
        let now = Local::now().naive_local();
        assert!(is_past_expiry(&account(Some("2020-01-01")), now));
        assert!(!is_past_expiry(&account(Some("2099-12-31")), now));
    }

    #[test]
    fn patch_ignores_unknown_keys() {
        let patch: AccountPatch = serde_json::from_value(json!({
            "status": "active",
            "favouriteColor": "blue"
        }))
        .unwrap();
        assert_eq!(patch.status, Some(AccountStatus::Active));
        assert!(patch.role.is_none());
        assert!(patch.access_expires.is_none());
    }

    #[test]
    fn patch_distinguishes_null_from_absent() {
        let cleared: AccountPatch =
            serde_json::from_value(json!({ "accessExpires": null })).unwrap();
        assert_eq!(cleared.access_expires, Some(None));

        let absent: AccountPatch = serde_json::from_value(json!({})).unwrap();
        assert_eq!(absent.access_expires, None);
    }

    #[test]
    fn account_round_trips_historical_field_names() {
        let raw = json!({
            "password": "secret",
            "role": "admin",
            "status": "active",
            "accessExpires": "2099-12-31",
            "createdAt": "2024-01-01T00:00:00",
            "residentsCount": 3
        });
        let account: Account = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(account.role, Role::Admin);
        assert_eq!(serde_json::to_value(&account).unwrap(), raw);
    }
}
