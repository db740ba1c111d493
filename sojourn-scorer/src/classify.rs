//! Category classification.
//!
//! A [`ClassificationTable`] maps free-form category strings onto the three
//! category-driven preferences. The table is data, not code: callers can
//! replace keywords or switch the [`MatchStrategy`] without touching the
//! scoring formula.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use sojourn_core::Preference;

const CULTURE_KEYWORDS: [&str; 5] = ["culture", "museum", "heritage", "art", "history"];
const NATURE_KEYWORDS: [&str; 6] = ["nature", "park", "beach", "forest", "garden", "trail"];
const NIGHTLIFE_KEYWORDS: [&str; 5] = ["night", "club", "bar", "pub", "music"];

/// Preference classes a category can belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryClass {
    /// Cultural sites.
    Culture,
    /// Natural sites.
    Nature,
    /// Nightlife venues.
    Nightlife,
}

impl CategoryClass {
    /// Every class in declaration order.
    pub const ALL: [Self; 3] = [Self::Culture, Self::Nature, Self::Nightlife];

    /// The traveller preference scored by this class.
    #[must_use]
    pub const fn preference(self) -> Preference {
        match self {
            Self::Culture => Preference::Culture,
            Self::Nature => Preference::Nature,
            Self::Nightlife => Preference::Nightlife,
        }
    }
}

/// How a keyword is compared with a category string. Comparison is always
/// case-insensitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStrategy {
    /// The keyword may appear anywhere, so `nightclub` matches `club`.
    #[default]
    Substring,
    /// The keyword must equal a whole alphanumeric token of the category.
    WholeWord,
}

impl MatchStrategy {
    /// Whether `keyword` (already lowercase) matches `category` (already
    /// lowercase).
    fn matches(self, category: &str, keyword: &str) -> bool {
        match self {
            Self::Substring => category.contains(keyword),
            Self::WholeWord => category
                .split(|c: char| !c.is_alphanumeric())
                .any(|token| token == keyword),
        }
    }
}

/// Keyword table mapping categories to [`CategoryClass`] tags.
///
/// # Examples
/// ```
/// use sojourn_scorer::{CategoryClass, ClassificationTable, MatchStrategy};
///
/// let table = ClassificationTable::default();
/// assert!(table.classify("Art Museum").contains(&CategoryClass::Culture));
/// assert!(table.classify("Nightclub").contains(&CategoryClass::Nightlife));
///
/// let strict = table.with_strategy(MatchStrategy::WholeWord);
/// assert!(strict.classify("Nightclub").is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationTable {
    strategy: MatchStrategy,
    keywords: BTreeMap<CategoryClass, BTreeSet<String>>,
}

impl ClassificationTable {
    /// An empty table matching with `strategy`.
    #[must_use]
    pub const fn new(strategy: MatchStrategy) -> Self {
        Self {
            strategy,
            keywords: BTreeMap::new(),
        }
    }

    /// Add a keyword to `class`. Keywords are lowercased; blank keywords are
    /// ignored because they would match every category.
    pub fn insert(&mut self, class: CategoryClass, keyword: &str) {
        let normalised = keyword.trim().to_lowercase();
        if normalised.is_empty() {
            return;
        }
        self.keywords.entry(class).or_default().insert(normalised);
    }

    /// Add keywords while consuming `self`, enabling chaining.
    #[must_use]
    pub fn with_keywords<'a, I>(mut self, class: CategoryClass, keywords: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        for keyword in keywords {
            self.insert(class, keyword);
        }
        self
    }

    /// Replace the match strategy.
    #[must_use]
    pub const fn with_strategy(mut self, strategy: MatchStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Active match strategy.
    #[must_use]
    pub const fn strategy(&self) -> MatchStrategy {
        self.strategy
    }

    /// Keywords registered for `class`.
    pub fn keywords(&self, class: CategoryClass) -> impl Iterator<Item = &str> + '_ {
        self.keywords
            .get(&class)
            .into_iter()
            .flat_map(|set| set.iter().map(String::as_str))
    }

    /// Whether `category` belongs to `class`.
    #[must_use]
    pub fn is_member(&self, category: &str, class: CategoryClass) -> bool {
        let lowered = category.to_lowercase();
        self.keywords(class)
            .any(|keyword| self.strategy.matches(&lowered, keyword))
    }

    /// Every class `category` belongs to. Unmatched categories yield an
    /// empty set.
    #[must_use]
    pub fn classify(&self, category: &str) -> BTreeSet<CategoryClass> {
        CategoryClass::ALL
            .into_iter()
            .filter(|class| self.is_member(category, *class))
            .collect()
    }
}

impl Default for ClassificationTable {
    fn default() -> Self {
        Self::new(MatchStrategy::default())
            .with_keywords(CategoryClass::Culture, CULTURE_KEYWORDS)
            .with_keywords(CategoryClass::Nature, NATURE_KEYWORDS)
            .with_keywords(CategoryClass::Nightlife, NIGHTLIFE_KEYWORDS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn table() -> ClassificationTable {
        ClassificationTable::default()
    }

    #[rstest]
    #[case("Museum", &[CategoryClass::Culture])]
    #[case("HISTORY centre", &[CategoryClass::Culture])]
    #[case("botanical garden", &[CategoryClass::Nature])]
    #[case("jazz bar", &[CategoryClass::Nightlife])]
    #[case("Beach Club", &[CategoryClass::Nature, CategoryClass::Nightlife])]
    #[case("restaurant", &[])]
    fn default_table_matches_substrings(
        table: ClassificationTable,
        #[case] category: &str,
        #[case] expected: &[CategoryClass],
    ) {
        let classes: Vec<CategoryClass> = table.classify(category).into_iter().collect();
        assert_eq!(classes, expected);
    }

    #[rstest]
    fn substring_matching_is_greedy(table: ClassificationTable) {
        // "parking" contains "park" and "barcelona" contains "bar".
        assert!(table.is_member("parking", CategoryClass::Nature));
        assert!(table.is_member("barcelona landmark", CategoryClass::Nightlife));
    }

    #[rstest]
    fn whole_word_matching_needs_tokens(table: ClassificationTable) {
        let strict = table.with_strategy(MatchStrategy::WholeWord);
        assert!(!strict.is_member("parking", CategoryClass::Nature));
        assert!(strict.is_member("city park", CategoryClass::Nature));
        assert!(strict.is_member("wine-bar", CategoryClass::Nightlife));
    }

    #[rstest]
    fn blank_keywords_are_ignored() {
        let table = ClassificationTable::new(MatchStrategy::Substring)
            .with_keywords(CategoryClass::Culture, ["", "  "]);
        assert_eq!(table.keywords(CategoryClass::Culture).count(), 0);
        assert!(table.classify("anything").is_empty());
    }

    #[rstest]
    fn keywords_are_case_folded() {
        let table = ClassificationTable::new(MatchStrategy::WholeWord)
            .with_keywords(CategoryClass::Culture, ["Cathedral"]);
        assert!(table.is_member("gothic CATHEDRAL", CategoryClass::Culture));
    }

    #[rstest]
    fn tables_load_from_json_configuration() {
        let table: ClassificationTable = serde_json::from_value(serde_json::json!({
            "strategy": "whole_word",
            "keywords": {
                "culture": ["cathedral", "monastery"],
                "nature": ["cove"]
            }
        }))
        .expect("valid table");
        assert_eq!(table.strategy(), MatchStrategy::WholeWord);
        assert!(table.is_member("Romanesque Monastery", CategoryClass::Culture));
        assert!(table.classify("Hidden cove").contains(&CategoryClass::Nature));
        assert!(table.classify("Nightclub").is_empty());
    }

    #[rstest]
    fn unknown_strategies_are_rejected() {
        let parsed = serde_json::from_value::<ClassificationTable>(serde_json::json!({
            "strategy": "fuzzy",
            "keywords": {}
        }));
        assert!(parsed.is_err());
    }

}
