//! Static demo content for the main feed.

use serde::Serialize;

/// A read-only feed entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedItem {
    /// Stable identifier.
    pub id: u32,
    /// Topic keyword shown as a badge.
    pub keyword: &'static str,
    /// Post body.
    pub content: &'static str,
    /// Author handle without the leading `@`.
    pub author: &'static str,
    /// Number of replies.
    pub comment_count: u32,
    /// Number of likes.
    pub like_count: u32,
    /// Relative time of posting.
    pub timestamp: &'static str,
}

impl FeedItem {
    /// Returns `true` if `keyword` occurs in the keyword, content or author, ignoring case.
    ///
    /// An empty keyword matches every item.
    pub fn matches(&self, keyword: &str) -> bool {
        if keyword.is_empty() {
            return true;
        }

        let needle = keyword.to_lowercase();
        [self.keyword, self.content, self.author]
            .iter()
            .any(|field| field.to_lowercase().contains(&needle))
    }
}

/// The demo feed shown to every logged-in user.
pub const DEMO_FEED: &[FeedItem] = &[
    FeedItem {
        id: 1,
        keyword: "React",
        content: "A look at what's new in React 18. Suspense and transitions can make a big difference to user experience.",
        author: "frontend_dev",
        comment_count: 24,
        like_count: 156,
        timestamp: "2 hours ago",
    },
    FeedItem {
        id: 2,
        keyword: "Performance",
        content: "How to cut your bundle size in half. Used properly, tree shaking and code splitting shorten the initial load dramatically.",
        author: "web_optimizer",
        comment_count: 18,
        like_count: 203,
        timestamp: "4 hours ago",
    },
    FeedItem {
        id: 3,
        keyword: "JavaScript",
        content: "A summary of asynchronous programming patterns: callbacks, promises and async/await compared, with when to use each.",
        author: "js_master",
        comment_count: 42,
        like_count: 289,
        timestamp: "5 hours ago",
    },
    FeedItem {
        id: 4,
        keyword: "CSS",
        content: "When should you use CSS Grid and when Flexbox? The best pick for each layout situation.",
        author: "design_coder",
        comment_count: 31,
        like_count: 174,
        timestamp: "6 hours ago",
    },
    FeedItem {
        id: 5,
        keyword: "Web security",
        content: "Defending against XSS, CSRF and SQL injection. Security is not optional!",
        author: "security_expert",
        comment_count: 56,
        like_count: 312,
        timestamp: "8 hours ago",
    },
    FeedItem {
        id: 6,
        keyword: "TypeScript",
        content: "Understanding TypeScript generics properly pays off in type safety. Explained with real-world examples.",
        author: "ts_enthusiast",
        comment_count: 27,
        like_count: 198,
        timestamp: "10 hours ago",
    },
];
