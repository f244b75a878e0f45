//! Share links for an article.
//!
//! Each destination takes a fixed set of parameters copied straight from the
//! record (no rewriting), and [`ShareTarget::link`] turns them into the
//! destination's public share URL.

use crate::models::Article;
use std::fmt;
use urlencoding::encode;

/// Destinations offered on every card, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareTarget {
    Email,
    Facebook,
    LinkedIn,
    Pinterest,
    Reddit,
    Telegram,
    Twitter,
}

impl ShareTarget {
    pub const ALL: [ShareTarget; 7] = [
        ShareTarget::Email,
        ShareTarget::Facebook,
        ShareTarget::LinkedIn,
        ShareTarget::Pinterest,
        ShareTarget::Reddit,
        ShareTarget::Telegram,
        ShareTarget::Twitter,
    ];

    /// Destination for a 1-based key press.
    pub fn from_key(key: char) -> Option<Self> {
        let index = key.to_digit(10)?.checked_sub(1)? as usize;
        Self::ALL.get(index).copied()
    }

    pub fn label(self) -> &'static str {
        match self {
            ShareTarget::Email => "Email",
            ShareTarget::Facebook => "Facebook",
            ShareTarget::LinkedIn => "LinkedIn",
            ShareTarget::Pinterest => "Pinterest",
            ShareTarget::Reddit => "Reddit",
            ShareTarget::Telegram => "Telegram",
            ShareTarget::Twitter => "Twitter",
        }
    }

    /// Named parameters this destination receives.
    pub fn params(self, article: &Article) -> Vec<(&'static str, String)> {
        let url = article.url.clone();
        let headline = article.headline_text().to_string();
        match self {
            ShareTarget::Email => vec![
                ("url", url),
                ("subject", headline),
                ("body", article.lead_paragraph.clone()),
            ],
            ShareTarget::Facebook => vec![("url", url), ("quote", headline)],
            ShareTarget::LinkedIn => vec![
                ("url", url),
                ("title", headline),
                ("summary", article.lead_paragraph.clone()),
            ],
            ShareTarget::Pinterest => vec![
                ("url", url),
                ("media", article.multimedia.url.clone().unwrap_or_default()),
                ("description", headline),
            ],
            ShareTarget::Reddit | ShareTarget::Telegram | ShareTarget::Twitter => {
                vec![("url", url), ("title", headline)]
            }
        }
    }

    /// Share URL for `article`.
    ///
    /// # Arguments
    ///
    /// * `article` - Record whose fields fill [`ShareTarget::params`]
    ///
    /// # Returns
    ///
    /// The destination's share URL with every parameter percent-encoded.
    pub fn link(self, article: &Article) -> String {
        let params = self.params(article);
        let get = |name: &str| {
            params
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| encode(value).into_owned())
                .unwrap_or_default()
        };

        match self {
            ShareTarget::Email => format!(
                "mailto:?subject={}&body={}%20{}",
                get("subject"),
                get("body"),
                get("url")
            ),
            ShareTarget::Facebook => format!(
                "https://www.facebook.com/sharer/sharer.php?u={}&quote={}",
                get("url"),
                get("quote")
            ),
            ShareTarget::LinkedIn => format!(
                "https://linkedin.com/shareArticle?url={}&mini=true&title={}&summary={}",
                get("url"),
                get("title"),
                get("summary")
            ),
            ShareTarget::Pinterest => format!(
                "https://pinterest.com/pin/create/button/?url={}&media={}&description={}",
                get("url"),
                get("media"),
                get("description")
            ),
            ShareTarget::Reddit => format!(
                "https://www.reddit.com/submit?url={}&title={}",
                get("url"),
                get("title")
            ),
            ShareTarget::Telegram => format!(
                "https://telegram.me/share/url?url={}&text={}",
                get("url"),
                get("title")
            ),
            ShareTarget::Twitter => format!(
                "https://twitter.com/intent/tweet?url={}&text={}",
                get("url"),
                get("title")
            ),
        }
    }
}

impl fmt::Display for ShareTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One entry of a card's share row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareLink {
    pub target: ShareTarget,
    pub href: String,
}

/// Share row for a card, in [`ShareTarget::ALL`] order.
pub fn share_row(article: &Article) -> Vec<ShareLink> {
    ShareTarget::ALL
        .iter()
        .map(|&target| ShareLink {
            target,
            href: target.link(article),
        })
        .collect()
}
