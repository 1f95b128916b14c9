//! Definitions for permission scopes.
//!
//! A [`Scope`] is a named permission unit requested from the authorization provider. The set of
//! scopes is fixed at compile time; [`Scope::ALL`] lists the catalog in display order and
//! [`Scope::info`] returns the human-readable description of each entry.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A permission scope from the fixed catalog.
///
/// Scopes serialize as their machine name, for example `"threads_basic"`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Ord, PartialOrd, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Scope {
    /// Basic profile information such as username and profile picture.
    UserProfile,
    /// The list of published media and their details.
    UserMedia,
    /// Connected Threads profile and connection status.
    ThreadsBasic,
    /// Replies to the user's Threads posts.
    ThreadsReadReplies,
    /// Public Threads posts matching configured keywords.
    ThreadsKeywordSearch,
}

/// Static description of a [`Scope`] for presentation.
#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct ScopeInfo {
    /// Short English name.
    pub name: &'static str,
    /// Name shown in the permission list.
    pub display_name: &'static str,
    /// What the application does with this permission.
    pub description: &'static str,
    /// Emoji icon shown next to the scope.
    pub icon: &'static str,
}

impl Scope {
    /// The complete catalog in display order.
    pub const ALL: [Scope; 5] = [
        Scope::UserProfile,
        Scope::UserMedia,
        Scope::ThreadsBasic,
        Scope::ThreadsReadReplies,
        Scope::ThreadsKeywordSearch,
    ];

    /// Scopes the user can never deselect individually.
    pub const REQUIRED: [Scope; 3] = [
        Scope::ThreadsBasic,
        Scope::ThreadsReadReplies,
        Scope::ThreadsKeywordSearch,
    ];

    /// Scopes the user may toggle.
    pub const OPTIONAL: [Scope; 2] = [Scope::UserProfile, Scope::UserMedia];

    /// Returns the machine name used on the wire and in storage.
    pub fn as_str(self) -> &'static str {
        match self {
            Scope::UserProfile => "user_profile",
            Scope::UserMedia => "user_media",
            Scope::ThreadsBasic => "threads_basic",
            Scope::ThreadsReadReplies => "threads_read_replies",
            Scope::ThreadsKeywordSearch => "threads_keyword_search",
        }
    }

    /// Returns `true` if this scope belongs to the required group.
    pub fn is_required(self) -> bool {
        Self::REQUIRED.contains(&self)
    }

    /// Returns the presentation details for this scope.
    pub fn info(self) -> &'static ScopeInfo {
        match self {
            Scope::UserProfile => &ScopeInfo {
                name: "Profile Info",
                display_name: "Profile information",
                description: "Access basic information such as your username and profile picture.",
                icon: "👤",
            },
            Scope::UserMedia => &ScopeInfo {
                name: "Media Access",
                display_name: "Media information",
                description: "Access the list of your published media and their details.",
                icon: "📸",
            },
            Scope::ThreadsBasic => &ScopeInfo {
                name: "threads_basic",
                display_name: "Threads basics",
                description: "Show your connected Threads profile and connection status inside this app.",
                icon: "📱",
            },
            Scope::ThreadsReadReplies => &ScopeInfo {
                name: "threads_read_replies",
                display_name: "Read Threads replies",
                description: "Retrieve replies to your Threads posts so you can review and respond to conversations from this dashboard.",
                icon: "💬",
            },
            Scope::ThreadsKeywordSearch => &ScopeInfo {
                name: "threads_keyword_search",
                display_name: "Threads keyword search",
                description: "Retrieve public Threads posts matching predefined keywords you configure (e.g., brand name, product name, campaign hashtag), and display them in the monitoring dashboard.",
                icon: "🔍",
            },
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An error indicating that a string does not name a catalog scope.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown scope `{0}`")]
pub struct InvalidScopeError(pub String);

impl FromStr for Scope {
    type Err = InvalidScopeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Scope::ALL
            .into_iter()
            .find(|scope| scope.as_str() == s)
            .ok_or_else(|| InvalidScopeError(s.to_owned()))
    }
}
