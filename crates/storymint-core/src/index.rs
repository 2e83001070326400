//! Queryable index of registered assets.

use crate::turn::{AssetStatus, AssetType, RegisteredAsset};

/// Insertion-ordered collection of [`RegisteredAsset`]s with filtering.
#[derive(Debug, Default)]
pub struct AssetIndex {
    assets: Vec<RegisteredAsset>,
}

impl AssetIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, asset: RegisteredAsset) {
        self.assets.push(asset);
    }

    pub fn assets(&self) -> &[RegisteredAsset] {
        &self.assets
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    /// Assets matching all three criteria, in insertion order.
    ///
    /// `search` matches case-insensitively against the title or any tag; an
    /// empty string matches everything.  `None` filters mean "all".  An empty
    /// result is an ordinary value, not an error.
    pub fn filter(
        &self,
        search: &str,
        asset_type: Option<AssetType>,
        status: Option<AssetStatus>,
    ) -> Vec<&RegisteredAsset> {
        let needle = search.to_lowercase();
        self.assets
            .iter()
            .filter(|a| {
                let matches_search = needle.is_empty()
                    || a.title.to_lowercase().contains(&needle)
                    || a.tags.iter().any(|t| t.to_lowercase().contains(&needle));
                let matches_type = asset_type.is_none_or(|t| a.asset_type == t);
                let matches_status = status.is_none_or(|s| a.status == s);
                matches_search && matches_type && matches_status
            })
            .collect()
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod test {
    use super::*;
    use crate::turn::License;
    use chrono::Utc;

    fn asset(title: &str, asset_type: AssetType, status: AssetStatus, tags: &[&str]) -> RegisteredAsset {
        RegisteredAsset {
            id: uuid::Uuid::new_v4().to_string(),
            title: title.into(),
            asset_type,
            content: "text".into(),
            created_at: Utc::now(),
            status,
            tags: tags.iter().map(|t| t.to_string()).collect(),
            license: License::CcBy,
            chain_reference: String::new(),
        }
    }

    #[test]
    fn empty_filters_return_everything_in_order() {
        let mut index = AssetIndex::new();
        index.push(asset("One", AssetType::Story, AssetStatus::Confirmed, &[]));
        index.push(asset("Two", AssetType::Poem, AssetStatus::Pending, &[]));
        index.push(asset("Three", AssetType::Code, AssetStatus::Failed, &[]));

        let all = index.filter("", None, None);
        let titles: Vec<&str> = all.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, ["One", "Two", "Three"]);
    }

    #[test]
    fn compound_filter_is_conjunctive() {
        let mut index = AssetIndex::new();
        index.push(asset("Morning Haiku", AssetType::Poem, AssetStatus::Confirmed, &["nature"]));
        index.push(asset("Evening Song", AssetType::Poem, AssetStatus::Confirmed, &["haiku"]));
        index.push(asset("Haiku Draft", AssetType::Poem, AssetStatus::Pending, &[]));
        index.push(asset("Haiku Bot", AssetType::Code, AssetStatus::Confirmed, &[]));

        let hits = index.filter("haiku", Some(AssetType::Poem), Some(AssetStatus::Confirmed));
        let titles: Vec<&str> = hits.iter().map(|a| a.title.as_str()).collect();
        // Title match and tag match both count; wrong status and wrong type do not.
        assert_eq!(titles, ["Morning Haiku", "Evening Song"]);
    }

    #[test]
    fn search_is_case_insensitive_over_title_and_tags() {
        let mut index = AssetIndex::new();
        index.push(asset("Circuits and Canvas", AssetType::Poem, AssetStatus::Confirmed, &["Robot", "ART"]));

        assert_eq!(index.filter("canvas", None, None).len(), 1);
        assert_eq!(index.filter("robot", None, None).len(), 1);
        assert_eq!(index.filter("art", None, None).len(), 1);
        assert!(index.filter("sculpture", None, None).is_empty());
    }
}
