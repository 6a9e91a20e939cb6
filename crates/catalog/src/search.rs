use serde::{Deserialize, Serialize};

use crate::item::{Item, ItemCategory, ItemCondition, ItemStatus};

/// Result ordering for `CatalogService::search`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    /// Creation time, newest first.
    #[default]
    Newest,
    PriceAsc,
    PriceDesc,
    /// View counter, highest first.
    Popular,
}

/// Conjunctive search filter over the catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    pub keyword: Option<String>,
    pub category: Option<ItemCategory>,
    pub condition: Option<ItemCondition>,
    pub min_price: Option<u64>,
    pub max_price: Option<u64>,
    pub university: Option<String>,
    pub exclude_statuses: Vec<ItemStatus>,
    pub sort: SortKey,
}

impl SearchQuery {
    pub fn matches(&self, item: &Item) -> bool {
        if self.exclude_statuses.contains(&item.status) {
            return false;
        }
        if let Some(category) = self.category {
            if item.category != category {
                return false;
            }
        }
        if let Some(condition) = self.condition {
            if item.condition != condition {
                return false;
            }
        }
        if let Some(min) = self.min_price {
            if item.price < min {
                return false;
            }
        }
        if let Some(max) = self.max_price {
            if item.price > max {
                return false;
            }
        }
        if let Some(university) = &self.university {
            let needle = university.trim().to_lowercase();
            if !needle.is_empty() && !item.university.to_lowercase().contains(&needle) {
                return false;
            }
        }
        if let Some(keyword) = &self.keyword {
            let needle = keyword.trim().to_lowercase();
            if !needle.is_empty() && !haystack(item).contains(&needle) {
                return false;
            }
        }
        true
    }
}

/// Case-folded text a keyword is matched against: title, description,
/// university, and for textbooks the isbn/professor/course fields.
fn haystack(item: &Item) -> String {
    let mut parts = vec![
        item.title.as_str(),
        item.description.as_str(),
        item.university.as_str(),
    ];
    if let Some(textbook) = &item.textbook {
        parts.push(textbook.isbn.as_str());
        parts.push(textbook.professor.as_str());
        parts.push(textbook.course.as_str());
    }
    parts.join(" ").to_lowercase()
}

/// Filter then sort a snapshot of the catalog. Sorts are stable, so ties
/// keep their input order.
pub fn filter_and_sort(items: Vec<Item>, query: &SearchQuery) -> Vec<Item> {
    let mut results: Vec<Item> = items.into_iter().filter(|i| query.matches(i)).collect();

    match query.sort {
        SortKey::Newest => results.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        SortKey::PriceAsc => results.sort_by(|a, b| a.price.cmp(&b.price)),
        SortKey::PriceDesc => results.sort_by(|a, b| b.price.cmp(&a.price)),
        SortKey::Popular => results.sort_by(|a, b| b.views.cmp(&a.views)),
    }

    results
}
