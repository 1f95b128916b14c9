//! Main-screen features gated by granted scopes.

use serde::Serialize;

use crate::permission::PermissionSet;
use crate::scope::Scope;

/// A feature of the main screen that is only available with a specific scope.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    /// Search the feed by keyword.
    KeywordSearch,
    /// Show comment counts and reply hints on feed items.
    ReplyCounts,
    /// Show the user's display name and profile picture.
    ProfileDetails,
    /// Show the media access banner.
    MediaAccess,
}

impl Feature {
    /// All features in banner order.
    pub const ALL: [Feature; 4] = [
        Feature::KeywordSearch,
        Feature::ReplyCounts,
        Feature::ProfileDetails,
        Feature::MediaAccess,
    ];

    /// The scope that must be granted for this feature.
    pub fn required_scope(self) -> Scope {
        match self {
            Feature::KeywordSearch => Scope::ThreadsKeywordSearch,
            Feature::ReplyCounts => Scope::ThreadsReadReplies,
            Feature::ProfileDetails => Scope::UserProfile,
            Feature::MediaAccess => Scope::UserMedia,
        }
    }

    /// Returns `true` if the feature is available with the given permissions.
    pub fn is_enabled(self, granted: &PermissionSet) -> bool {
        granted.contains(self.required_scope())
    }

    /// The banner text shown while the feature is enabled.
    pub fn banner(self) -> &'static str {
        match self {
            Feature::KeywordSearch => "Keyword search: enabled - search Threads with the search bar below",
            Feature::ReplyCounts => "Replies: enabled - comment counts are shown for every post",
            Feature::ProfileDetails => "Profile: enabled - your name and profile picture are shown",
            Feature::MediaAccess => "Media: enabled - your published media can be listed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_only_disables_optional_features() {
        let granted = PermissionSet::required_only();
        assert!(Feature::KeywordSearch.is_enabled(&granted));
        assert!(Feature::ReplyCounts.is_enabled(&granted));
        assert!(!Feature::ProfileDetails.is_enabled(&granted));
        assert!(!Feature::MediaAccess.is_enabled(&granted));
    }

    #[test]
    fn empty_set_disables_everything() {
        let granted = PermissionSet::empty();
        assert!(Feature::ALL.iter().all(|f| !f.is_enabled(&granted)));
    }
}
