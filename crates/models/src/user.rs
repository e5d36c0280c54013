//! User-facing session types: who is logged in, as what, with which record.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::errors::ModelError;

/// Account category chosen at login.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    Donor,
    Doctor,
    Admin,
}

impl fmt::Display for UserType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            UserType::Donor => "donor",
            UserType::Doctor => "doctor",
            UserType::Admin => "admin",
        };
        f.write_str(s)
    }
}

impl FromStr for UserType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "donor" => Ok(UserType::Donor),
            "doctor" => Ok(UserType::Doctor),
            "admin" => Ok(UserType::Admin),
            other => Err(ModelError::Parse(format!("unknown user type: {other}"))),
        }
    }
}

/// User record as returned by login and profile endpoints.
///
/// The backend's record shape is not fully pinned down (`donor` vs `user`
/// envelopes, fields varying by user type), so only the common fields are
/// typed and everything else rides along in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blood_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub county: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constituency: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Cached authentication state. Every field is optional: an empty session
/// simply means logged out.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Session {
    pub token: Option<String>,
    pub profile: Option<Profile>,
    pub user_type: Option<UserType>,
}

impl Session {
    pub fn is_logged_in(&self) -> bool {
        self.token.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_type_round_trips_through_display() {
        for ut in [UserType::Donor, UserType::Doctor, UserType::Admin] {
            assert_eq!(ut.to_string().parse::<UserType>().unwrap(), ut);
        }
        assert!("nurse".parse::<UserType>().is_err());
    }

    #[test]
    fn profile_keeps_unknown_fields() {
        let profile: Profile = serde_json::from_value(serde_json::json!({
            "id": 7,
            "name": "Jane Wanjiku",
            "blood_type": "O+",
            "county": "Kiambu County",
            "last_donation": "2026-05-01"
        }))
        .unwrap();
        assert_eq!(profile.name.as_deref(), Some("Jane Wanjiku"));
        assert_eq!(
            profile.extra.get("last_donation").and_then(Value::as_str),
            Some("2026-05-01")
        );
    }

    #[test]
    fn empty_session_is_logged_out() {
        assert!(!Session::default().is_logged_in());
    }
}
