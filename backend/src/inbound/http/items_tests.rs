//! Handler tests for the favourite item endpoints.

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::http::header::AUTHORIZATION;
use actix_web::test;
use chrono::DateTime;
use rstest::rstest;
use serde_json::{Value, json};

use crate::domain::ports::{MockFavoriteItemsCommand, MockFavoriteItemsQuery};
use crate::domain::{Error, FavoriteItem, Product, ProductId};
use crate::inbound::http::test_utils::{TOKEN, TestPorts, detail, test_app};

fn untouched_commands() -> MockFavoriteItemsCommand {
    let mut items = MockFavoriteItemsCommand::new();
    items.expect_add_item().times(0);
    items.expect_remove_item().times(0);
    items
}

async fn send(ports: TestPorts, req: test::TestRequest) -> (StatusCode, Value) {
    let app = test::init_service(test_app(ports)).await;
    let res = test::call_service(&app, req.to_request()).await;
    let status = res.status();
    let body: Value = test::read_body_json(res).await;
    (status, body)
}

#[rstest]
#[actix_web::test]
async fn list_products_returns_resolved_products() {
    let mut query = MockFavoriteItemsQuery::new();
    query
        .expect_list_products()
        .withf(|_, list_id| list_id.get() == 2)
        .times(1)
        .returning(|_, _| {
            Ok(vec![Product {
                id: ProductId::new(10).expect("product id"),
                name: "Tea".to_owned(),
                price: 4.25,
                stock: 0,
            }])
        });
    let ports = TestPorts {
        items_query: Arc::new(query),
        ..TestPorts::default()
    };

    let (status, body) = send(
        ports,
        test::TestRequest::get()
            .uri("/api/v1/items/2")
            .insert_header((AUTHORIZATION, TOKEN)),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"SuccesData": [{"id": 10, "name": "Tea", "price": 4.25, "stock": 0}]})
    );
}

#[rstest]
#[actix_web::test]
async fn add_item_returns_the_stored_reference() {
    let mut items = MockFavoriteItemsCommand::new();
    items
        .expect_add_item()
        .withf(|_, item| item.list_id.get() == 1 && item.product_id.get() == 10)
        .times(1)
        .returning(|_, item| {
            Ok(FavoriteItem {
                list_id: item.list_id,
                product_id: item.product_id,
                created_at: DateTime::UNIX_EPOCH,
            })
        });
    let ports = TestPorts {
        items: Arc::new(items),
        ..TestPorts::default()
    };

    let (status, body) = send(
        ports,
        test::TestRequest::post()
            .uri("/api/v1/items")
            .insert_header((AUTHORIZATION, TOKEN))
            .set_json(json!({"item_id": 10, "list_id": 1})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"SuccesData": {
            "item_id": 10,
            "list_id": 1,
            "created_date": "1970-01-01T00:00:00+00:00"
        }})
    );
}

#[rstest]
#[case(json!({"list_id": 1}), "item_id", "missing_field")]
#[case(json!({"item_id": 10}), "list_id", "missing_field")]
#[case(json!({"item_id": 0, "list_id": 1}), "item_id", "invalid_id")]
#[case(json!({"item_id": 10, "list_id": -2}), "list_id", "invalid_id")]
#[actix_web::test]
async fn add_item_validates_ids_before_any_port_call(
    #[case] payload: Value,
    #[case] field: &str,
    #[case] code: &str,
) {
    let ports = TestPorts {
        items: Arc::new(untouched_commands()),
        ..TestPorts::default()
    };

    let (status, body) = send(
        ports,
        test::TestRequest::post()
            .uri("/api/v1/items")
            .insert_header((AUTHORIZATION, TOKEN))
            .set_json(payload),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(detail(&body, "field"), Some(field));
    assert_eq!(detail(&body, "code"), Some(code));
}

#[rstest]
#[actix_web::test]
async fn duplicate_items_are_conflicts() {
    let mut items = MockFavoriteItemsCommand::new();
    items
        .expect_add_item()
        .times(1)
        .returning(|_, _| Err(Error::conflict("already saved")));
    let ports = TestPorts {
        items: Arc::new(items),
        ..TestPorts::default()
    };

    let (status, body) = send(
        ports,
        test::TestRequest::post()
            .uri("/api/v1/items")
            .insert_header((AUTHORIZATION, TOKEN))
            .set_json(json!({"item_id": 10, "list_id": 1})),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "conflict");
}

#[rstest]
#[actix_web::test]
async fn remove_item_reads_the_query_string() {
    let mut items = MockFavoriteItemsCommand::new();
    items
        .expect_remove_item()
        .withf(|_, list_id, product_id| list_id.get() == 1 && product_id.get() == 20)
        .times(1)
        .returning(|_, _, _| Ok(()));
    let ports = TestPorts {
        items: Arc::new(items),
        ..TestPorts::default()
    };

    let (status, body) = send(
        ports,
        test::TestRequest::delete()
            .uri("/api/v1/items/1/item?itemId=20")
            .insert_header((AUTHORIZATION, TOKEN)),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"SuccesData": null}));
}

#[rstest]
#[case("/api/v1/items/1/item", "missing_field")]
#[case("/api/v1/items/1/item?itemId=0", "invalid_id")]
#[case("/api/v1/items/1/item?itemId=ten", "malformed_request")]
#[actix_web::test]
async fn remove_item_requires_a_valid_item_id(#[case] uri: &str, #[case] code: &str) {
    let ports = TestPorts {
        items: Arc::new(untouched_commands()),
        ..TestPorts::default()
    };

    let (status, body) = send(
        ports,
        test::TestRequest::delete()
            .uri(uri)
            .insert_header((AUTHORIZATION, TOKEN)),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(detail(&body, "code"), Some(code));
}

#[rstest]
#[actix_web::test]
async fn remove_item_without_token_is_unauthorised() {
    let ports = TestPorts {
        items: Arc::new(untouched_commands()),
        ..TestPorts::default()
    };

    let (status, _) = send(
        ports,
        test::TestRequest::delete().uri("/api/v1/items/1/item?itemId=20"),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
