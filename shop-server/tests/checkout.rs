//! Order conversion engine driven through the in-memory store

use std::sync::Arc;

use rust_decimal::Decimal;
use shared::models::{DeliveryInfo, OrderStatus, Product};
use shop_server::checkout::memory::{FailPoint, MemoryCheckoutStore};
use shop_server::{CheckoutError, CheckoutService};

const ALICE: i64 = 1;
const BOB: i64 = 2;

fn product(id: i64, price: Decimal, stock: i32) -> Product {
    Product {
        id,
        name: format!("product-{id}"),
        description: None,
        price,
        stock,
        is_active: true,
        category_id: None,
        image_path: None,
        created_at: 0,
        updated_at: 0,
    }
}

fn setup() -> (MemoryCheckoutStore, CheckoutService) {
    let store = MemoryCheckoutStore::new();
    let service = CheckoutService::new(Arc::new(store.clone()));
    (store, service)
}

async fn stock_of(store: &MemoryCheckoutStore, id: i64) -> i32 {
    store.product(id).await.map(|p| p.stock).unwrap_or(-1)
}

#[tokio::test]
async fn test_converts_entry_into_order() {
    let (store, service) = setup();
    let price = Decimal::new(999, 2);
    store.put_product(product(10, price, 5)).await;
    let entry = store.add_basket_entry(ALICE, 10, 2).await;

    let order = service
        .convert_basket_to_order(
            ALICE,
            &[entry.id],
            DeliveryInfo {
                delivery_method: Some("courier".to_string()),
                delivery_address: Some("1 Main St".to_string()),
            },
        )
        .await
        .unwrap();

    assert_eq!(order.customer_id, ALICE);
    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.items.len(), 1);
    assert_eq!(order.items[0].product_id, 10);
    assert_eq!(order.items[0].quantity, 2);
    assert_eq!(order.items[0].price_at_order, price);
    assert_eq!(order.total_amount, Decimal::new(1998, 2));
    assert_eq!(order.delivery_method.as_deref(), Some("courier"));

    assert_eq!(stock_of(&store, 10).await, 3);
    assert!(store.basket_of(ALICE).await.is_empty());
    assert_eq!(store.orders_of(ALICE).await.len(), 1);
}

#[tokio::test]
async fn test_insufficient_stock_changes_nothing() {
    let (store, service) = setup();
    store.put_product(product(10, Decimal::new(999, 2), 1)).await;
    let entry = store.add_basket_entry(ALICE, 10, 2).await;

    let err = service
        .convert_basket_to_order(ALICE, &[entry.id], DeliveryInfo::default())
        .await
        .unwrap_err();

    match err {
        CheckoutError::InsufficientStock {
            product_id,
            available,
            requested,
            ..
        } => {
            assert_eq!(product_id, 10);
            assert_eq!(available, 1);
            assert_eq!(requested, 2);
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(stock_of(&store, 10).await, 1);
    assert_eq!(store.basket_of(ALICE).await, vec![entry]);
    assert_eq!(store.order_count().await, 0);
}

#[tokio::test]
async fn test_inactive_product_is_rejected() {
    let (store, service) = setup();
    let mut p = product(10, Decimal::ONE, 5);
    p.is_active = false;
    store.put_product(p).await;
    let entry = store.add_basket_entry(ALICE, 10, 1).await;

    let err = service
        .convert_basket_to_order(ALICE, &[entry.id], DeliveryInfo::default())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        CheckoutError::ProductUnavailable { product_id: 10, .. }
    ));
    assert_eq!(stock_of(&store, 10).await, 5);
    assert_eq!(store.basket_of(ALICE).await.len(), 1);
    assert_eq!(store.order_count().await, 0);
}

#[tokio::test]
async fn test_deleted_product_is_rejected() {
    let (store, service) = setup();
    store.put_product(product(10, Decimal::ONE, 5)).await;
    let entry = store.add_basket_entry(ALICE, 10, 1).await;
    store.remove_product(10).await;

    let err = service
        .convert_basket_to_order(ALICE, &[entry.id], DeliveryInfo::default())
        .await
        .unwrap_err();
    assert!(matches!(err, CheckoutError::ProductNotFound { product_id: 10 }));
    assert_eq!(store.basket_of(ALICE).await.len(), 1);
}

#[tokio::test]
async fn test_foreign_entries_are_excluded() {
    let (store, service) = setup();
    store.put_product(product(10, Decimal::ONE, 5)).await;
    let bobs = store.add_basket_entry(BOB, 10, 1).await;

    let err = service
        .convert_basket_to_order(ALICE, &[bobs.id], DeliveryInfo::default())
        .await
        .unwrap_err();
    assert!(matches!(err, CheckoutError::EmptySelection));

    // Mixed with an own entry, only the own entry converts
    let own = store.add_basket_entry(ALICE, 10, 2).await;
    let order = service
        .convert_basket_to_order(ALICE, &[bobs.id, own.id], DeliveryInfo::default())
        .await
        .unwrap();
    assert_eq!(order.items.len(), 1);
    assert_eq!(order.items[0].quantity, 2);
    assert_eq!(store.basket_of(BOB).await, vec![bobs]);
    assert_eq!(stock_of(&store, 10).await, 3);
}

#[tokio::test]
async fn test_empty_selection_is_repeatable() {
    let (store, service) = setup();
    store.put_product(product(10, Decimal::ONE, 5)).await;
    store.add_basket_entry(ALICE, 10, 1).await;

    for ids in [&[][..], &[999, 1000][..]] {
        for _ in 0..2 {
            let err = service
                .convert_basket_to_order(ALICE, ids, DeliveryInfo::default())
                .await
                .unwrap_err();
            assert!(matches!(err, CheckoutError::EmptySelection));
        }
    }
    assert_eq!(stock_of(&store, 10).await, 5);
    assert_eq!(store.basket_of(ALICE).await.len(), 1);
    assert_eq!(store.order_count().await, 0);
}

#[tokio::test]
async fn test_only_selected_entries_are_consumed() {
    let (store, service) = setup();
    store.put_product(product(10, Decimal::ONE, 10)).await;
    store.put_product(product(20, Decimal::TWO, 10)).await;
    let first = store.add_basket_entry(ALICE, 10, 1).await;
    let kept = store.add_basket_entry(ALICE, 20, 1).await;
    let third = store.add_basket_entry(ALICE, 20, 3).await;

    // Duplicate ids count once
    let order = service
        .convert_basket_to_order(ALICE, &[third.id, first.id, third.id], DeliveryInfo::default())
        .await
        .unwrap();

    assert_eq!(order.items.len(), 2);
    assert_eq!(order.items[0].product_id, 10);
    assert_eq!(order.items[1].product_id, 20);
    assert_eq!(order.items[1].quantity, 3);
    assert_eq!(order.total_amount, Decimal::new(7, 0));
    assert_eq!(store.basket_of(ALICE).await, vec![kept]);
    assert_eq!(stock_of(&store, 10).await, 9);
    assert_eq!(stock_of(&store, 20).await, 7);
}

#[tokio::test]
async fn test_same_product_entries_share_stock() {
    let (store, service) = setup();
    store.put_product(product(10, Decimal::ONE, 4)).await;
    let a = store.add_basket_entry(ALICE, 10, 3).await;
    let b = store.add_basket_entry(ALICE, 10, 2).await;

    let err = service
        .convert_basket_to_order(ALICE, &[a.id, b.id], DeliveryInfo::default())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        CheckoutError::InsufficientStock {
            available: 4,
            requested: 5,
            ..
        }
    ));
    assert_eq!(stock_of(&store, 10).await, 4);

    // Each entry alone fits
    let order = service
        .convert_basket_to_order(ALICE, &[a.id], DeliveryInfo::default())
        .await
        .unwrap();
    assert_eq!(order.items[0].quantity, 3);
    assert_eq!(stock_of(&store, 10).await, 1);
}

#[tokio::test]
async fn test_failure_on_later_entry_leaves_earlier_products_untouched() {
    let (store, service) = setup();
    store.put_product(product(10, Decimal::ONE, 5)).await;
    store.put_product(product(20, Decimal::ONE, 0)).await;
    let a = store.add_basket_entry(ALICE, 10, 2).await;
    let b = store.add_basket_entry(ALICE, 20, 1).await;

    let err = service
        .convert_basket_to_order(ALICE, &[a.id, b.id], DeliveryInfo::default())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        CheckoutError::InsufficientStock { product_id: 20, .. }
    ));
    assert_eq!(stock_of(&store, 10).await, 5);
    assert_eq!(store.basket_of(ALICE).await.len(), 2);
    assert_eq!(store.order_count().await, 0);
}

#[tokio::test]
async fn test_oversized_total_is_rejected_without_changes() {
    let (store, service) = setup();
    let price = Decimal::from_i128_with_scale(1_000_000_000_000_000_000_000, 2);
    store.put_product(product(10, price, 50)).await;
    let entry = store.add_basket_entry(ALICE, 10, 20).await;

    let err = service
        .convert_basket_to_order(ALICE, &[entry.id], DeliveryInfo::default())
        .await
        .unwrap_err();

    assert!(matches!(err, CheckoutError::TotalTooLarge));
    assert_eq!(stock_of(&store, 10).await, 50);
    assert_eq!(store.basket_of(ALICE).await, vec![entry]);
    assert_eq!(store.order_count().await, 0);
}

#[tokio::test]
async fn test_persistence_failures_roll_back() {
    for point in [
        FailPoint::Begin,
        FailPoint::DecrementStock,
        FailPoint::InsertOrder,
        FailPoint::DeleteBasket,
        FailPoint::Commit,
    ] {
        let (store, service) = setup();
        store.put_product(product(10, Decimal::ONE, 5)).await;
        store.put_product(product(20, Decimal::ONE, 5)).await;
        let a = store.add_basket_entry(ALICE, 10, 1).await;
        let b = store.add_basket_entry(ALICE, 20, 2).await;
        store.fail_at(point).await;

        let err = service
            .convert_basket_to_order(ALICE, &[a.id, b.id], DeliveryInfo::default())
            .await
            .unwrap_err();
        assert!(
            matches!(err, CheckoutError::Persistence(_)),
            "{point:?}: {err:?}"
        );
        assert_eq!(stock_of(&store, 10).await, 5, "{point:?}");
        assert_eq!(stock_of(&store, 20).await, 5, "{point:?}");
        assert_eq!(store.basket_of(ALICE).await.len(), 2, "{point:?}");
        assert_eq!(store.order_count().await, 0, "{point:?}");

        // Nothing was committed, so a retry goes through
        service
            .convert_basket_to_order(ALICE, &[a.id, b.id], DeliveryInfo::default())
            .await
            .unwrap();
        assert_eq!(stock_of(&store, 20).await, 3, "{point:?}");
    }
}

#[tokio::test]
async fn test_order_keeps_price_after_catalog_change() {
    let (store, service) = setup();
    store.put_product(product(10, Decimal::new(500, 2), 5)).await;
    let entry = store.add_basket_entry(ALICE, 10, 1).await;

    let order = service
        .convert_basket_to_order(ALICE, &[entry.id], DeliveryInfo::default())
        .await
        .unwrap();

    let mut repriced = store.product(10).await.unwrap();
    repriced.price = Decimal::new(800, 2);
    store.put_product(repriced).await;

    let stored = store.orders_of(ALICE).await;
    assert_eq!(stored[0].id, order.id);
    assert_eq!(stored[0].items[0].price_at_order, Decimal::new(500, 2));
    assert_eq!(stored[0].total_amount, Decimal::new(500, 2));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_same_entry_converts_once() {
    let (store, service) = setup();
    store.put_product(product(10, Decimal::ONE, 2)).await;
    let entry_id = store.add_basket_entry(ALICE, 10, 2).await.id;

    let attempts = (0..2).map(|_| {
        let service = service.clone();
        tokio::spawn(async move {
            service
                .convert_basket_to_order(ALICE, &[entry_id], DeliveryInfo::default())
                .await
        })
    });
    let results: Vec<_> = futures::future::join_all(attempts)
        .await
        .into_iter()
        .map(|joined| joined.unwrap())
        .collect();

    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    // The winner deletes the entry, so the loser sees EmptySelection rather than InsufficientStock
    assert!(
        results
            .iter()
            .any(|r| matches!(r, Err(CheckoutError::EmptySelection)))
    );
    assert_eq!(stock_of(&store, 10).await, 0);
    assert_eq!(store.order_count().await, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_competing_entries_never_oversell() {
    let (store, service) = setup();
    store.put_product(product(10, Decimal::ONE, 3)).await;
    let alice = store.add_basket_entry(ALICE, 10, 3).await;
    let bob = store.add_basket_entry(BOB, 10, 3).await;

    let run = |customer, entry_id| {
        let service = service.clone();
        tokio::spawn(async move {
            service
                .convert_basket_to_order(customer, &[entry_id], DeliveryInfo::default())
                .await
        })
    };
    let (a, b) = tokio::join!(run(ALICE, alice.id), run(BOB, bob.id));
    let results = [a.unwrap(), b.unwrap()];

    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    let loser = results.iter().find_map(|r| r.as_ref().err()).unwrap();
    assert!(matches!(
        loser,
        CheckoutError::InsufficientStock {
            available: 0,
            requested: 3,
            ..
        }
    ));
    assert_eq!(stock_of(&store, 10).await, 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_many_buyers_stock_matches_committed_orders() {
    let (store, service) = setup();
    store.put_product(product(10, Decimal::ONE, 25)).await;

    let mut tasks = Vec::new();
    for customer in 100..120 {
        let entry = store.add_basket_entry(customer, 10, 2).await;
        let service = service.clone();
        tasks.push(tokio::spawn(async move {
            service
                .convert_basket_to_order(customer, &[entry.id], DeliveryInfo::default())
                .await
        }));
    }

    let mut sold = 0;
    for task in futures::future::join_all(tasks).await {
        match task.unwrap() {
            Ok(order) => sold += order.items[0].quantity,
            Err(CheckoutError::InsufficientStock { .. }) => {}
            Err(other) => panic!("unexpected error: {other:?}"),
        }
    }

    assert_eq!(sold, 24);
    assert_eq!(stock_of(&store, 10).await, 25 - sold);
    assert_eq!(store.order_count().await, 12);
}
