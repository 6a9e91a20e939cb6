//! Seeded end-to-end run of the engine, mirroring the flows a UI would
//! drive: list, watch, reprice, order, cancel, message.

use std::sync::Arc;

use unimarket_accounts::Profile;
use unimarket_catalog::{
    ItemCategory, ItemCondition, ItemDraft, ItemPatch, RequirementLevel, SearchQuery, TextbookInfo,
};
use unimarket_engine::Marketplace;
use unimarket_store::InMemoryEntityStore;

fn main() -> anyhow::Result<()> {
    unimarket_observability::init();

    let market = Marketplace::new(Arc::new(InMemoryEntityStore::new()));

    let seller = market.register_user(
        "demo@univ.ac.jp",
        "password123",
        Profile {
            university: "Yokohama National University".to_string(),
            faculty: "Economics".to_string(),
            ..Profile::default()
        },
    )?;
    let buyer = market.register_user("buyer@univ.ac.jp", "password456", Profile::default())?;

    let textbook = market.create_item(
        seller.id,
        ItemDraft {
            category: ItemCategory::Textbook,
            condition: ItemCondition::Good,
            title: "Microeconomics, 4th ed.".to_string(),
            description: "Required for the course. Light annotations.".to_string(),
            price: 1800,
            university: "Yokohama National University".to_string(),
            delivery: "meetup".to_string(),
            payment: "cash".to_string(),
            expires_on: None,
            images: Vec::new(),
            textbook: Some(TextbookInfo {
                isbn: "978-0000000001".to_string(),
                edition: "4th".to_string(),
                year: Some(2022),
                professor: "T. Yamada".to_string(),
                course: "Microeconomics".to_string(),
                requirement: RequirementLevel::Required,
            }),
        },
    )?;
    market.create_item(
        seller.id,
        ItemDraft {
            category: ItemCategory::General,
            condition: ItemCondition::Fair,
            title: "Laptop 13\"".to_string(),
            description: "Backup machine, some scratches.".to_string(),
            price: 25000,
            university: "Keio University".to_string(),
            delivery: "shipping".to_string(),
            payment: "bank transfer".to_string(),
            expires_on: None,
            images: Vec::new(),
            textbook: None,
        },
    )?;

    market.toggle_watch(buyer.id, textbook.id)?;
    market.update_item(
        textbook.id,
        seller.id,
        ItemPatch {
            price: Some(1500),
            ..ItemPatch::default()
        },
    )?;

    let order = market.place_order(textbook.id, buyer.id)?;
    market.cancel_order(order.id)?;

    let thread = market.open_thread(textbook.id, buyer.id)?;
    market.send_message(thread.id, buyer.id, "Would you take 1400?")?;

    let listings = market.search_items(&SearchQuery::default())?;
    tracing::info!(listings = listings.len(), "marketplace seeded");
    for notification in market.get_notifications_for_user(buyer.id, Some(10))? {
        tracing::info!(text = %notification.text, "buyer notification");
    }

    Ok(())
}
