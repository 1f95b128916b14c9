//! The persisted result of a login.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::permission::PermissionSet;

/// Prefix of fabricated demo access tokens.
pub const DEMO_TOKEN_PREFIX: &str = "demo_access_token_";

/// The user a credential was issued for.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// Provider user id.
    pub id: String,
    /// Handle without the leading `@`.
    pub username: String,
    /// Display name.
    pub name: String,
    /// URL of the profile picture.
    pub avatar_url: String,
}

impl UserProfile {
    /// The static user attached to every mock login.
    pub fn demo() -> Self {
        Self {
            id: "12345".into(),
            username: "demo_user".into(),
            name: "Demo User".into(),
            avatar_url: "https://via.placeholder.com/150".into(),
        }
    }
}

/// A stored login: token, user and the permissions granted at login time.
///
/// Serialized as camelCase JSON under the `instagramAuth` storage key. `issuedAt` is expressed in
/// milliseconds since the Unix epoch.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialRecord {
    /// The access token.
    pub token: String,
    /// The user the token belongs to.
    pub user: UserProfile,
    /// Scopes granted with this token.
    ///
    /// Records written before permissions were tracked fall back to the full catalog.
    #[serde(default = "PermissionSet::all")]
    pub granted_permissions: PermissionSet,
    /// Time of issuance.
    #[serde(with = "unix_millis")]
    pub issued_at: SystemTime,
}

impl CredentialRecord {
    /// Fabricates a demo credential for the given permissions.
    ///
    /// The token is derived from the issuance time and carries no security guarantees.
    pub fn demo(granted_permissions: PermissionSet, issued_at: SystemTime) -> Self {
        let millis = unix_millis::as_millis(issued_at);
        Self {
            token: format!("{DEMO_TOKEN_PREFIX}{millis}"),
            user: UserProfile::demo(),
            granted_permissions,
            issued_at: unix_millis::truncate(issued_at),
        }
    }

    /// Creates a record for a token obtained from a real token exchange.
    pub fn issued(
        token: String,
        user: UserProfile,
        granted_permissions: PermissionSet,
        issued_at: SystemTime,
    ) -> Self {
        Self {
            token,
            user,
            granted_permissions,
            issued_at: unix_millis::truncate(issued_at),
        }
    }
}

mod unix_millis {
    use super::*;

    pub fn as_millis(time: SystemTime) -> u64 {
        time.duration_since(UNIX_EPOCH)
            .map_or(0, |elapsed| elapsed.as_millis() as u64)
    }

    /// Drops sub-millisecond precision, matching what survives serialization.
    pub fn truncate(time: SystemTime) -> SystemTime {
        UNIX_EPOCH + Duration::from_millis(as_millis(time))
    }

    pub fn serialize<S>(time: &SystemTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_u64(as_millis(*time))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<SystemTime, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(UNIX_EPOCH + Duration::from_millis(millis))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_token_uses_issue_time() {
        let issued_at = UNIX_EPOCH + Duration::from_millis(1_700_000_000_123);
        let record = CredentialRecord::demo(PermissionSet::all(), issued_at);
        assert_eq!(record.token, "demo_access_token_1700000000123");
        assert_eq!(record.user.username, "demo_user");
    }

    #[test]
    fn json_layout() {
        let issued_at = UNIX_EPOCH + Duration::from_millis(42);
        let record = CredentialRecord::demo(PermissionSet::required_only(), issued_at);
        let value = serde_json::to_value(&record).unwrap();

        assert_eq!(value["token"], "demo_access_token_42");
        assert_eq!(value["issuedAt"], 42);
        assert_eq!(value["user"]["avatarUrl"], "https://via.placeholder.com/150");
        assert_eq!(value["grantedPermissions"].as_array().unwrap().len(), 3);

        let parsed: CredentialRecord = serde_json::from_value(value).unwrap();
        assert_eq!(parsed, record);
    }

    #[test]
    fn missing_permissions_default_to_catalog() {
        let json = r#"{
            "token": "t",
            "user": {"id": "1", "username": "u", "name": "U", "avatarUrl": "a"},
            "issuedAt": 0
        }"#;
        let record: CredentialRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.granted_permissions, PermissionSet::all());
    }
}
