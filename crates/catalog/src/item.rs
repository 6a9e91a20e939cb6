use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use unimarket_core::{DomainError, DomainResult, Entity, ItemId, UserId};

/// Most images a listing may carry; extra entries are truncated on write.
pub const MAX_IMAGES: usize = 4;

/// Listing category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemCategory {
    General,
    Textbook,
}

/// Listing condition grade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemCondition {
    New,
    Good,
    Fair,
}

/// Listing status lifecycle.
///
/// `Pending` and `Sold` are driven by the order engine; direct edits while an
/// order is open are rejected at the facade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    Available,
    Pending,
    Sold,
}

impl core::fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let s = match self {
            ItemStatus::Available => "available",
            ItemStatus::Pending => "pending",
            ItemStatus::Sold => "sold",
        };
        f.write_str(s)
    }
}

/// Whether a textbook is required for its course.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequirementLevel {
    Required,
    Recommended,
    #[default]
    Unspecified,
}

/// Academic metadata, present iff the item's category is `Textbook`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TextbookInfo {
    pub isbn: String,
    pub edition: String,
    pub year: Option<i32>,
    pub professor: String,
    pub course: String,
    pub requirement: RequirementLevel,
}

/// A marketplace listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub owner_id: UserId,
    pub category: ItemCategory,
    pub condition: ItemCondition,
    pub title: String,
    pub description: String,
    /// Price in whole currency units.
    pub price: u64,
    pub university: String,
    pub delivery: String,
    pub payment: String,
    pub status: ItemStatus,
    pub views: u64,
    pub expires_on: Option<NaiveDate>,
    pub images: Vec<String>,
    pub textbook: Option<TextbookInfo>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Entity for Item {
    type Id = ItemId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl Item {
    /// Invariant: textbook metadata present iff category is `Textbook`.
    pub fn validate(&self) -> DomainResult<()> {
        validate_listing(&self.title, self.category, self.textbook.as_ref())
    }
}

/// Input for `CatalogService::create`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDraft {
    pub category: ItemCategory,
    pub condition: ItemCondition,
    pub title: String,
    pub description: String,
    pub price: u64,
    pub university: String,
    pub delivery: String,
    pub payment: String,
    pub expires_on: Option<NaiveDate>,
    pub images: Vec<String>,
    pub textbook: Option<TextbookInfo>,
}

impl ItemDraft {
    pub fn validate(&self) -> DomainResult<()> {
        validate_listing(&self.title, self.category, self.textbook.as_ref())
    }

    /// Materialize the draft into an `Available` listing.
    pub fn into_item(self, id: ItemId, owner_id: UserId, now: DateTime<Utc>) -> Item {
        let mut images = self.images;
        images.truncate(MAX_IMAGES);

        Item {
            id,
            owner_id,
            category: self.category,
            condition: self.condition,
            title: self.title,
            description: self.description,
            price: self.price,
            university: self.university,
            delivery: self.delivery,
            payment: self.payment,
            status: ItemStatus::Available,
            views: 0,
            expires_on: self.expires_on,
            images,
            textbook: self.textbook,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update for `CatalogService::update`; unset fields keep their
/// stored value. Clearable fields use a nested `Option`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemPatch {
    pub category: Option<ItemCategory>,
    pub condition: Option<ItemCondition>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<u64>,
    pub university: Option<String>,
    pub delivery: Option<String>,
    pub payment: Option<String>,
    pub status: Option<ItemStatus>,
    pub expires_on: Option<Option<NaiveDate>>,
    pub images: Option<Vec<String>>,
    pub textbook: Option<Option<TextbookInfo>>,
}

impl ItemPatch {
    /// Apply set fields onto `item`, truncating images and bumping
    /// `updated_at`. Does not validate; callers validate the result.
    pub fn apply_to(&self, item: &mut Item, now: DateTime<Utc>) {
        if let Some(category) = self.category {
            item.category = category;
        }
        if let Some(condition) = self.condition {
            item.condition = condition;
        }
        if let Some(title) = &self.title {
            item.title = title.clone();
        }
        if let Some(description) = &self.description {
            item.description = description.clone();
        }
        if let Some(price) = self.price {
            item.price = price;
        }
        if let Some(university) = &self.university {
            item.university = university.clone();
        }
        if let Some(delivery) = &self.delivery {
            item.delivery = delivery.clone();
        }
        if let Some(payment) = &self.payment {
            item.payment = payment.clone();
        }
        if let Some(status) = self.status {
            item.status = status;
        }
        if let Some(expires_on) = self.expires_on {
            item.expires_on = expires_on;
        }
        if let Some(images) = &self.images {
            let mut images = images.clone();
            images.truncate(MAX_IMAGES);
            item.images = images;
        }
        if let Some(textbook) = &self.textbook {
            item.textbook = textbook.clone();
        }
        item.updated_at = now;
    }
}

fn validate_listing(
    title: &str,
    category: ItemCategory,
    textbook: Option<&TextbookInfo>,
) -> DomainResult<()> {
    if title.trim().is_empty() {
        return Err(DomainError::validation("title cannot be empty"));
    }

    match (category, textbook) {
        (ItemCategory::Textbook, None) => Err(DomainError::validation(
            "textbook listings require textbook metadata",
        )),
        (ItemCategory::General, Some(_)) => Err(DomainError::validation(
            "general listings cannot carry textbook metadata",
        )),
        _ => Ok(()),
    }
}
