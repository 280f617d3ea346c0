/// Crawl state definitions for a single column
///
/// A column crawl starts in `Start`, spends its life in `FetchingArticle`, and
/// ends in exactly one of the terminal states.
use std::fmt;

/// Represents the current state of a column crawl
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrawlState {
    // ===== Active States =====
    /// Nothing fetched yet
    Start,

    /// An article is being fetched, converted and saved
    FetchingArticle,

    // ===== Terminal States =====
    /// The chain or listing was exhausted (including cycle termination)
    Done,

    /// The crawl stopped early because a step failed
    Aborted,
}

impl CrawlState {
    /// Returns true if this is a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Aborted)
    }

    /// Returns true if the crawl ended without aborting
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Done)
    }

    /// Returns true if moving from `self` to `next` is a legal transition
    ///
    /// ```text
    /// Start ──► FetchingArticle ──► Done
    ///   │            │   ▲
    ///   │            └───┘ (next article)
    ///   ├──► Done    └──► Aborted
    ///   └──► Aborted
    /// ```
    ///
    /// `Start` may end directly: an empty listing is `Done`, an unreachable
    /// listing page is `Aborted`.
    pub fn can_transition_to(&self, next: CrawlState) -> bool {
        use CrawlState::*;

        matches!(
            (self, next),
            (Start, FetchingArticle)
                | (Start, Done)
                | (Start, Aborted)
                | (FetchingArticle, FetchingArticle)
                | (FetchingArticle, Done)
                | (FetchingArticle, Aborted)
        )
    }

    /// Short lowercase label used in logs and reports
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::FetchingArticle => "fetching_article",
            Self::Done => "done",
            Self::Aborted => "aborted",
        }
    }
}

impl fmt::Display for CrawlState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
