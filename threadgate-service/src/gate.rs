//! The entry check of the main screen.
//!
//! [`SessionGate::enter`] reads the stored credential. Without one, the user is sent to the
//! permission selection. With one, the main view is rendered and every [`Feature`] is switched on
//! or off depending on whether its scope was granted.

use serde::Serialize;
use threadgate_types::feed::DEMO_FEED;
use threadgate_types::{CredentialRecord, Feature, FeedItem, Scope};

use crate::error::Result;
use crate::route::Route;
use crate::storage::ClientStorage;

/// The result of entering the main screen.
#[derive(Debug)]
pub enum GateOutcome {
    /// No credential is stored; navigate elsewhere.
    Redirect(Route),
    /// The user is logged in.
    Render(Box<MainView>),
}

/// The logged-in user as shown in the header.
#[derive(Debug, Serialize)]
pub struct UserView {
    /// Provider user id.
    pub id: String,
    /// Handle without the leading `@`.
    pub username: String,
    /// Display name, only with [`Feature::ProfileDetails`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Profile picture, only with [`Feature::ProfileDetails`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

/// A granted scope as listed on the permissions card.
#[derive(Debug, Serialize)]
pub struct GrantedScope {
    /// The scope identifier.
    pub scope: Scope,
    /// Short English name.
    pub name: &'static str,
    /// Emoji icon.
    pub icon: &'static str,
}

/// State of one feature on the main screen.
#[derive(Debug, Serialize)]
pub struct FeatureState {
    /// The feature.
    pub feature: Feature,
    /// The scope it depends on.
    pub scope: Scope,
    /// Whether the scope was granted.
    pub enabled: bool,
}

/// A feed item decorated according to the granted features.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedEntry {
    /// Stable identifier.
    pub id: u32,
    /// Topic keyword.
    pub keyword: &'static str,
    /// Post body.
    pub content: &'static str,
    /// Author handle.
    pub author: &'static str,
    /// Number of replies, only with [`Feature::ReplyCounts`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment_count: Option<u32>,
    /// Number of likes.
    pub like_count: u32,
    /// Relative time of posting.
    pub timestamp: &'static str,
    /// Hint about replies, only with [`Feature::ReplyCounts`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replies_hint: Option<String>,
}

impl FeedEntry {
    fn new(item: &'static FeedItem, replies: bool) -> Self {
        Self {
            id: item.id,
            keyword: item.keyword,
            content: item.content,
            author: item.author,
            comment_count: replies.then_some(item.comment_count),
            like_count: item.like_count,
            timestamp: item.timestamp,
            replies_hint: (replies && item.comment_count > 0)
                .then(|| format!("{} replies", item.comment_count)),
        }
    }
}

/// The rendered main screen.
#[derive(Debug, Serialize)]
pub struct MainView {
    /// The logged-in user.
    pub user: UserView,
    /// Scopes granted at login, in catalog order.
    pub granted: Vec<GrantedScope>,
    /// Every feature and whether it is enabled.
    pub features: Vec<FeatureState>,
    /// Banners of enabled features.
    pub banners: Vec<&'static str>,
    /// The applied search keyword, only with [`Feature::KeywordSearch`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    /// Feed items matching the search.
    pub feed: Vec<FeedEntry>,
}

impl MainView {
    /// Renders the main screen for the given credential.
    ///
    /// `search` is ignored unless keyword search is enabled.
    pub fn render(record: &CredentialRecord, search: Option<&str>) -> Self {
        let granted = &record.granted_permissions;
        let enabled = |feature: Feature| feature.is_enabled(granted);

        let profile = enabled(Feature::ProfileDetails);
        let user = UserView {
            id: record.user.id.clone(),
            username: record.user.username.clone(),
            name: profile.then(|| record.user.name.clone()),
            avatar_url: profile.then(|| record.user.avatar_url.clone()),
        };

        let search = search
            .map(str::trim)
            .filter(|keyword| !keyword.is_empty() && enabled(Feature::KeywordSearch))
            .map(str::to_owned);

        let replies = enabled(Feature::ReplyCounts);
        let feed = DEMO_FEED
            .iter()
            .filter(|item| item.matches(search.as_deref().unwrap_or_default()))
            .map(|item| FeedEntry::new(item, replies))
            .collect();

        Self {
            user,
            granted: granted
                .iter()
                .map(|scope| GrantedScope {
                    scope,
                    name: scope.info().name,
                    icon: scope.info().icon,
                })
                .collect(),
            features: Feature::ALL
                .into_iter()
                .map(|feature| FeatureState {
                    feature,
                    scope: feature.required_scope(),
                    enabled: enabled(feature),
                })
                .collect(),
            banners: Feature::ALL
                .into_iter()
                .filter(|feature| enabled(*feature))
                .map(Feature::banner)
                .collect(),
            search,
            feed,
        }
    }

    /// Returns `true` if the given feature is enabled in this view.
    pub fn feature_enabled(&self, feature: Feature) -> bool {
        self.features
            .iter()
            .any(|state| state.feature == feature && state.enabled)
    }
}

/// Guards the main screen on credential presence.
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionGate;

impl SessionGate {
    /// Checks for a stored credential and renders the main screen.
    pub async fn enter(&self, storage: &ClientStorage, search: Option<&str>) -> Result<GateOutcome> {
        let Some(record) = storage.load_credential().await? else {
            tracing::debug!("no credential stored, redirecting to permission selection");
            return Ok(GateOutcome::Redirect(Route::Permissions));
        };

        Ok(GateOutcome::Render(Box::new(MainView::render(&record, search))))
    }

    /// Deletes the stored credential and returns the login screen.
    pub async fn logout(&self, storage: &ClientStorage) -> Result<Route> {
        storage.clear_credential().await?;
        tracing::info!("logged out");
        Ok(Route::Login)
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, SystemTime};

    use threadgate_types::PermissionSet;

    use super::*;
    use crate::authenticator::MockAuthenticator;
    use crate::backend::InMemoryBackend;

    fn storage() -> ClientStorage {
        ClientStorage::from_backends(
            Box::new(InMemoryBackend::new("local")),
            Box::new(InMemoryBackend::new("session")),
        )
    }

    fn render(permissions: PermissionSet, search: Option<&str>) -> MainView {
        let record = CredentialRecord::demo(permissions, SystemTime::now());
        MainView::render(&record, search)
    }

    #[tokio::test]
    async fn redirects_to_permissions_without_credential() {
        let outcome = SessionGate.enter(&storage(), None).await.unwrap();
        assert!(matches!(outcome, GateOutcome::Redirect(Route::Permissions)));
    }

    #[tokio::test]
    async fn logout_removes_credential() {
        let storage = storage();
        MockAuthenticator::new(Duration::ZERO)
            .login(&storage, PermissionSet::all())
            .await
            .unwrap();
        assert!(matches!(
            SessionGate.enter(&storage, None).await.unwrap(),
            GateOutcome::Render(_)
        ));

        assert_eq!(SessionGate.logout(&storage).await.unwrap(), Route::Login);
        assert_eq!(storage.load_credential().await.unwrap(), None);
        assert!(matches!(
            SessionGate.enter(&storage, None).await.unwrap(),
            GateOutcome::Redirect(Route::Permissions)
        ));
    }

    #[test]
    fn required_only_hides_optional_banners() {
        let view = render(PermissionSet::required_only(), None);

        assert_eq!(view.granted.len(), 3);
        assert!(!view.feature_enabled(Feature::ProfileDetails));
        assert!(!view.feature_enabled(Feature::MediaAccess));
        assert!(!view.banners.contains(&Feature::ProfileDetails.banner()));
        assert!(!view.banners.contains(&Feature::MediaAccess.banner()));
        assert_eq!(view.user.name, None);
        assert_eq!(view.user.avatar_url, None);
    }

    #[test]
    fn full_catalog_enables_everything() {
        let view = render(PermissionSet::all(), None);

        assert_eq!(view.banners.len(), Feature::ALL.len());
        assert_eq!(view.user.name.as_deref(), Some("Demo User"));
        assert_eq!(view.feed.len(), DEMO_FEED.len());
        assert!(view.feed.iter().all(|entry| entry.replies_hint.is_some()));
        assert_eq!(view.feed[0].comment_count, Some(24));
    }

    #[test]
    fn search_filters_feed() {
        let view = render(PermissionSet::all(), Some("  css "));
        assert_eq!(view.search.as_deref(), Some("css"));
        assert_eq!(
            view.feed.iter().map(|e| e.id).collect::<Vec<_>>(),
            [4]
        );
    }

    #[test]
    fn search_ignored_without_keyword_scope() {
        let view = render(PermissionSet::empty(), Some("css"));
        assert_eq!(view.search, None);
        assert_eq!(view.feed.len(), DEMO_FEED.len());
        assert!(view.feed.iter().all(|entry| entry.comment_count.is_none()));
        assert!(view.banners.is_empty());
    }
}
