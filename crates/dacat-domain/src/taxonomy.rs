//! Taxonomy module - the seven data accessibility categories

use std::fmt;

/// Accessibility category of a data availability statement
///
/// Variants are declared in rank order, from most to least publicly
/// accessible. The string forms are part of the output contract and must be
/// reproduced exactly by the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    /// Data deposited in a public repository
    FullyPublicRepository,

    /// Data only available within the article or its supplement
    PublicWithinArticle,

    /// Only previously published third-party data was used
    ThirdPartyPublic,

    /// Some data deposited publicly, the rest available on request
    MixedPublicAndRequest,

    /// Data held in a repository with access controls
    ControlledAccess,

    /// Data available from the authors on request only
    AuthorRequestOnly,

    /// No data generated or statement not applicable
    NotApplicable,
}

impl Category {
    /// All categories in rank order
    pub const ALL: [Category; 7] = [
        Category::FullyPublicRepository,
        Category::PublicWithinArticle,
        Category::ThirdPartyPublic,
        Category::MixedPublicAndRequest,
        Category::ControlledAccess,
        Category::AuthorRequestOnly,
        Category::NotApplicable,
    ];

    /// Get the category label exactly as it appears in prompts and output
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::FullyPublicRepository => "Fully Public Repository Deposition",
            Category::PublicWithinArticle => "Public Within Article / Supplement Only",
            Category::ThirdPartyPublic => "Reuse of Public Third-Party Data Only",
            Category::MixedPublicAndRequest => "Mixed Public Deposit + Author Request",
            Category::ControlledAccess => "Controlled-Access Repository Data",
            Category::AuthorRequestOnly => "Author Upon Request Only",
            Category::NotApplicable => "No Data Generated / Not Applicable",
        }
    }

    /// Accessibility rank, 1 (most public) through 7
    pub fn rank(&self) -> u8 {
        match self {
            Category::FullyPublicRepository => 1,
            Category::PublicWithinArticle => 2,
            Category::ThirdPartyPublic => 3,
            Category::MixedPublicAndRequest => 4,
            Category::ControlledAccess => 5,
            Category::AuthorRequestOnly => 6,
            Category::NotApplicable => 7,
        }
    }

    /// Parse a label produced by the model
    ///
    /// Matching is exact apart from surrounding whitespace. Near misses
    /// ("author upon request only", "1. Fully Public ...") are rejected.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        Self::ALL.into_iter().find(|c| c.as_str() == s)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Unknown category: {}", s))
    }
}
