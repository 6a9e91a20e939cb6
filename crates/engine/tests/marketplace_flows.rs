//! Cross-component scenarios driven through the composed engine.

use std::sync::Arc;

use unimarket_accounts::Profile;
use unimarket_catalog::{
    ItemCategory, ItemCondition, ItemDraft, ItemPatch, ItemStatus, RequirementLevel, SearchQuery,
    SortKey, TextbookInfo,
};
use unimarket_core::{DomainError, UserId};
use unimarket_engine::Marketplace;
use unimarket_orders::OrderStatus;
use unimarket_store::InMemoryEntityStore;

fn marketplace() -> Marketplace {
    Marketplace::new(Arc::new(InMemoryEntityStore::new()))
}

fn register(market: &Marketplace, email: &str) -> UserId {
    market
        .register_user(email, "password123", Profile::default())
        .unwrap()
        .id
}

fn textbook_draft(title: &str, price: u64) -> ItemDraft {
    ItemDraft {
        category: ItemCategory::Textbook,
        condition: ItemCondition::Good,
        title: title.to_string(),
        description: "course textbook".to_string(),
        price,
        university: "Yokohama National University".to_string(),
        delivery: "meetup".to_string(),
        payment: "cash".to_string(),
        expires_on: None,
        images: Vec::new(),
        textbook: Some(TextbookInfo {
            isbn: "978-0000000001".to_string(),
            edition: "1st".to_string(),
            year: Some(2022),
            professor: "T. Yamada".to_string(),
            course: "Calculus".to_string(),
            requirement: RequirementLevel::Required,
        }),
    }
}

fn general_draft(title: &str, price: u64) -> ItemDraft {
    ItemDraft {
        category: ItemCategory::General,
        condition: ItemCondition::Fair,
        title: title.to_string(),
        description: String::new(),
        price,
        university: "Keio University".to_string(),
        delivery: "shipping".to_string(),
        payment: "bank transfer".to_string(),
        expires_on: None,
        images: Vec::new(),
        textbook: None,
    }
}

#[test]
fn watch_price_drop_order_cancel_scenario() {
    let market = marketplace();
    let seller = register(&market, "a@univ.ac.jp");
    let buyer = register(&market, "b@univ.ac.jp");

    // A lists "Calc I" at 1000.
    let item = market
        .create_item(seller, textbook_draft("Calc I", 1000))
        .unwrap();
    assert_eq!(item.status, ItemStatus::Available);

    // B watches it; A drops the price to 800.
    market.toggle_watch(buyer, item.id).unwrap();
    market
        .update_item(
            item.id,
            seller,
            ItemPatch {
                price: Some(800),
                ..ItemPatch::default()
            },
        )
        .unwrap();

    let inbox = market.get_notifications_for_user(buyer, None).unwrap();
    assert_eq!(inbox.len(), 1);
    assert!(inbox[0].text.contains("800"));
    assert!(inbox[0].text.contains("Calc I"));

    // B orders; item and order both go pending.
    let order = market.place_order(item.id, buyer).unwrap();
    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(
        market.get_item(item.id).unwrap().unwrap().status,
        ItemStatus::Pending
    );

    // Seller cancels; the item is released.
    market.cancel_order(order.id).unwrap();
    assert_eq!(
        market.get_item(item.id).unwrap().unwrap().status,
        ItemStatus::Available
    );

    // A second cancel hits the terminal state.
    assert!(matches!(
        market.cancel_order(order.id).unwrap_err(),
        DomainError::InvalidState(_)
    ));
}

#[test]
fn completing_an_order_sells_the_item() {
    let market = marketplace();
    let seller = register(&market, "a@univ.ac.jp");
    let buyer = register(&market, "b@univ.ac.jp");
    let item = market
        .create_item(seller, general_draft("Bicycle", 8000))
        .unwrap();

    let order = market.place_order(item.id, buyer).unwrap();
    market.complete_order(order.id).unwrap();

    assert_eq!(
        market.get_item(item.id).unwrap().unwrap().status,
        ItemStatus::Sold
    );
    let orders = market.list_orders_for_user(seller).unwrap();
    assert_eq!(orders[0].status, OrderStatus::Completed);
}

#[test]
fn price_edit_without_watchers_notifies_nobody() {
    let market = marketplace();
    let seller = register(&market, "a@univ.ac.jp");
    let bystander = register(&market, "b@univ.ac.jp");
    let item = market
        .create_item(seller, general_draft("Lamp", 900))
        .unwrap();

    market
        .update_item(
            item.id,
            seller,
            ItemPatch {
                price: Some(700),
                ..ItemPatch::default()
            },
        )
        .unwrap();

    assert!(market
        .get_notifications_for_user(bystander, None)
        .unwrap()
        .is_empty());
}

#[test]
fn status_edit_is_rejected_while_an_order_is_open() {
    let market = marketplace();
    let seller = register(&market, "a@univ.ac.jp");
    let buyer = register(&market, "b@univ.ac.jp");
    let item = market
        .create_item(seller, general_draft("Desk", 3000))
        .unwrap();
    let order = market.place_order(item.id, buyer).unwrap();

    let err = market
        .update_item(
            item.id,
            seller,
            ItemPatch {
                status: Some(ItemStatus::Available),
                ..ItemPatch::default()
            },
        )
        .unwrap_err();
    assert!(matches!(err, DomainError::Conflict(_)));

    // Non-status edits stay possible, and after the order closes the owner
    // may manage status directly again.
    market
        .update_item(
            item.id,
            seller,
            ItemPatch {
                description: Some("slightly scratched".to_string()),
                ..ItemPatch::default()
            },
        )
        .unwrap();
    market.cancel_order(order.id).unwrap();
    market
        .update_item(
            item.id,
            seller,
            ItemPatch {
                status: Some(ItemStatus::Sold),
                ..ItemPatch::default()
            },
        )
        .unwrap();
}

#[test]
fn self_purchase_and_self_message_are_conflicts() {
    let market = marketplace();
    let seller = register(&market, "a@univ.ac.jp");
    let item = market
        .create_item(seller, general_draft("Mirror", 1500))
        .unwrap();

    assert!(matches!(
        market.place_order(item.id, seller).unwrap_err(),
        DomainError::Conflict(_)
    ));
    assert!(matches!(
        market.open_thread(item.id, seller).unwrap_err(),
        DomainError::Conflict(_)
    ));
    assert!(market.list_threads_for_user(seller).unwrap().is_empty());
}

#[test]
fn buyer_and_seller_converse_in_one_thread() {
    let market = marketplace();
    let seller = register(&market, "a@univ.ac.jp");
    let buyer = register(&market, "b@univ.ac.jp");
    let item = market
        .create_item(seller, general_draft("Printer", 4000))
        .unwrap();

    let thread = market.open_thread(item.id, buyer).unwrap();
    market
        .send_message(thread.id, buyer, "Is this still available?")
        .unwrap();
    market.send_message(thread.id, seller, "It is.").unwrap();

    let same = market.open_thread(item.id, buyer).unwrap();
    assert_eq!(same.id, thread.id);
    assert_eq!(same.messages.len(), 2);
    assert_eq!(market.list_threads_for_user(seller).unwrap().len(), 1);
}

#[test]
fn view_item_counts_views_and_records_history() {
    let market = marketplace();
    let seller = register(&market, "a@univ.ac.jp");
    let viewer = register(&market, "b@univ.ac.jp");
    let x = market.create_item(seller, general_draft("X", 100)).unwrap();
    let y = market.create_item(seller, general_draft("Y", 200)).unwrap();
    let z = market.create_item(seller, general_draft("Z", 300)).unwrap();

    for item_id in [x.id, y.id, x.id, z.id] {
        market.view_item(item_id, Some(viewer)).unwrap();
    }

    assert_eq!(market.history(viewer).unwrap(), vec![z.id, x.id, y.id]);
    assert_eq!(market.get_item(x.id).unwrap().unwrap().views, 2);

    // Anonymous views count but leave no history.
    market.view_item(y.id, None).unwrap();
    assert_eq!(market.get_item(y.id).unwrap().unwrap().views, 2);
    assert_eq!(market.history(viewer).unwrap().len(), 3);
}

#[test]
fn search_excludes_sold_and_orders_by_price() {
    let market = marketplace();
    let seller = register(&market, "a@univ.ac.jp");
    let buyer = register(&market, "b@univ.ac.jp");

    let cheap = market
        .create_item(seller, general_draft("cheap", 500))
        .unwrap();
    market
        .create_item(seller, general_draft("mid", 1500))
        .unwrap();
    let pricey = market
        .create_item(seller, textbook_draft("pricey", 9000))
        .unwrap();

    let order = market.place_order(pricey.id, buyer).unwrap();
    market.complete_order(order.id).unwrap();

    let query = SearchQuery {
        exclude_statuses: vec![ItemStatus::Sold],
        sort: SortKey::PriceAsc,
        ..SearchQuery::default()
    };
    let results = market.search_items(&query).unwrap();
    let titles: Vec<_> = results.iter().map(|i| i.title.as_str()).collect();
    assert_eq!(titles, vec!["cheap", "mid"]);
    assert_eq!(results[0].id, cheap.id);
}

#[test]
fn account_deletion_cascades_to_listings() {
    let market = marketplace();
    let seller = register(&market, "a@univ.ac.jp");
    let buyer = register(&market, "b@univ.ac.jp");
    let item = market
        .create_item(seller, general_draft("Rice cooker", 2500))
        .unwrap();
    let thread = market.open_thread(item.id, buyer).unwrap();

    market.delete_account(seller).unwrap();

    assert!(market.get_user(seller).unwrap().is_none());
    assert!(market.get_item(item.id).unwrap().is_none());
    // The thread is orphaned, not deleted.
    assert!(market.get_thread(thread.id).unwrap().is_some());
}

#[test]
fn every_collection_survives_engine_reconstruction() {
    let store = Arc::new(InMemoryEntityStore::new());
    let market = Marketplace::new(store.clone());

    let seller = register(&market, "a@univ.ac.jp");
    let buyer = register(&market, "b@univ.ac.jp");
    let watched = market
        .create_item(seller, textbook_draft("Calc I", 1000))
        .unwrap();
    let bought = market
        .create_item(seller, general_draft("Bicycle", 8000))
        .unwrap();

    market.toggle_watch(buyer, watched.id).unwrap();
    market.toggle_favorite(buyer, bought.id).unwrap();
    market.view_item(watched.id, Some(buyer)).unwrap();
    market
        .update_item(
            watched.id,
            seller,
            ItemPatch {
                price: Some(800),
                ..ItemPatch::default()
            },
        )
        .unwrap();
    let order = market.place_order(bought.id, buyer).unwrap();
    let thread = market.open_thread(watched.id, buyer).unwrap();
    market
        .send_message(thread.id, buyer, "Still available?")
        .unwrap();

    // A fresh engine over the same store sees identical state: the persisted
    // records are the wire format and must not lose anything.
    let reopened = Marketplace::new(store);

    assert_eq!(
        reopened.get_user(seller).unwrap().unwrap(),
        market.get_user(seller).unwrap().unwrap()
    );
    assert_eq!(
        reopened.get_item(watched.id).unwrap().unwrap(),
        market.get_item(watched.id).unwrap().unwrap()
    );
    assert_eq!(
        reopened.list_orders_for_user(buyer).unwrap(),
        market.list_orders_for_user(buyer).unwrap()
    );
    assert_eq!(reopened.list_orders_for_user(buyer).unwrap()[0].id, order.id);
    assert_eq!(reopened.watchlist(buyer).unwrap(), vec![watched.id]);
    assert_eq!(reopened.favorites(buyer).unwrap(), vec![bought.id]);
    assert_eq!(reopened.history(buyer).unwrap(), vec![watched.id]);
    assert_eq!(
        reopened.get_thread(thread.id).unwrap().unwrap().messages,
        market.get_thread(thread.id).unwrap().unwrap().messages
    );
    assert_eq!(
        reopened.get_notifications_for_user(buyer, None).unwrap(),
        market.get_notifications_for_user(buyer, None).unwrap()
    );
}

#[test]
fn favorite_toggle_twice_restores_original_state() {
    let market = marketplace();
    let seller = register(&market, "a@univ.ac.jp");
    let user = register(&market, "b@univ.ac.jp");
    let item = market
        .create_item(seller, general_draft("Poster", 300))
        .unwrap();

    assert!(market.toggle_favorite(user, item.id).unwrap());
    assert!(!market.toggle_favorite(user, item.id).unwrap());
    assert!(market.favorites(user).unwrap().is_empty());
}
