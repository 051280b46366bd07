mod common;

use common::{TestApp, restaurant_payload};
use http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn test_only_sellers_and_admins_create_restaurants() {
    let app = TestApp::new().await;
    let (_, customer) = app.signup("c@x.com", "customer").await;
    let (seller_id, seller) = app.signup("s@x.com", "seller").await;
    let (_, admin) = app.signup_admin("a@x.com").await;

    let (status, _) = app
        .post("/restaurants", Some(&customer), restaurant_payload("Nope", "thai"))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let created = app.create_restaurant(&seller, "A", "thai").await;
    assert_eq!(created["owner_id"], seller_id);
    assert_eq!(created["is_active"], true);
    assert_eq!(created["total_orders"], 0);

    app.create_restaurant(&admin, "B", "pizza").await;
}

#[tokio::test]
async fn test_restaurant_validation() {
    let app = TestApp::new().await;
    let (_, seller) = app.signup("s@x.com", "seller").await;

    let blank = restaurant_payload("  ", "thai");
    let (status, _) = app.post("/restaurants", Some(&seller), blank).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let mut negative_fee = restaurant_payload("A", "thai");
    negative_fee["delivery_fee"] = json!(-1.0);
    let (status, _) = app.post("/restaurants", Some(&seller), negative_fee).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let mut bad_lat = restaurant_payload("A", "thai");
    bad_lat["latitude"] = json!(123.0);
    bad_lat["longitude"] = json!(0.0);
    let (status, _) = app.post("/restaurants", Some(&seller), bad_lat).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_filters_and_pagination() {
    let app = TestApp::new().await;
    let (_, seller) = app.signup("s@x.com", "seller").await;
    for i in 0..3 {
        app.create_restaurant(&seller, &format!("Thai {i}"), "Thai").await;
    }
    app.create_restaurant(&seller, "Pizza", "pizza").await;

    let (status, all) = app.get("/restaurants", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(all.as_array().unwrap().len(), 4);

    // cuisine match ignores case
    let (_, thai) = app.get("/restaurants?cuisine_type=thai", None).await;
    assert_eq!(thai.as_array().unwrap().len(), 3);

    let (_, page) = app.get("/restaurants?skip=1&limit=2", None).await;
    let page = page.as_array().unwrap();
    assert_eq!(page.len(), 2);
    assert_eq!(page[0]["id"], all[1]["id"]);

    let (_, past_end) = app.get("/restaurants?skip=10", None).await;
    assert!(past_end.as_array().unwrap().is_empty());

    let (status, _) = app.get("/restaurants?limit=abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_and_delete_ownership() {
    let app = TestApp::new().await;
    let (_, owner) = app.signup("o@x.com", "seller").await;
    let (_, other) = app.signup("x@x.com", "seller").await;
    let (_, admin) = app.signup_admin("a@x.com").await;
    let restaurant = app.create_restaurant(&owner, "A", "thai").await;
    let id = restaurant["id"].as_i64().unwrap();
    let uri = format!("/restaurants/{id}");

    let (status, _) = app.put(&uri, Some(&other), json!({ "name": "Stolen" })).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, updated) = app
        .put(&uri, Some(&owner), json!({ "name": "A2", "is_open": true }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "A2");
    assert_eq!(updated["cuisine_type"], "thai");

    let (status, _) = app.put(&uri, Some(&admin), json!({ "delivery_fee": 1.5 })).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.put("/restaurants/999999", Some(&owner), json!({})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    assert_eq!(app.delete(&uri, Some(&other)).await.0, StatusCode::FORBIDDEN);
    let (status, body) = app.delete(&uri, Some(&owner)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Restaurant deleted successfully");

    // soft deleted: hidden from listings, still readable by id
    let (_, listed) = app.get("/restaurants", None).await;
    assert!(listed.as_array().unwrap().is_empty());
    let (status, fetched) = app.get(&uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["is_active"], false);
}

#[tokio::test]
async fn test_my_restaurants() {
    let app = TestApp::new().await;
    let (_, alice) = app.signup("alice@x.com", "seller").await;
    let (_, carol) = app.signup("carol@x.com", "seller").await;
    let (_, bob) = app.signup("bob@x.com", "customer").await;
    app.create_restaurant(&alice, "A1", "thai").await;
    app.create_restaurant(&alice, "A2", "thai").await;
    app.create_restaurant(&carol, "C1", "thai").await;

    let (status, mine) = app.get("/my-restaurants", Some(&alice)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(mine.as_array().unwrap().len(), 2);

    assert_eq!(
        app.get("/my-restaurants", Some(&bob)).await.0,
        StatusCode::FORBIDDEN
    );
}

#[tokio::test]
async fn test_menu_items_lifecycle() {
    let app = TestApp::new().await;
    let (_, owner) = app.signup("o@x.com", "seller").await;
    let (_, other) = app.signup("x@x.com", "seller").await;
    let restaurant = app.create_restaurant(&owner, "A", "thai").await;
    let rid = restaurant["id"].as_i64().unwrap();
    let menu_uri = format!("/restaurants/{rid}/menu-items");

    let (status, _) = app
        .post(&menu_uri, Some(&other), json!({ "name": "Curry", "price": 9.5 }))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .post(&menu_uri, Some(&owner), json!({ "name": "Curry", "price": -1.0 }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .post(
            &menu_uri,
            Some(&owner),
            json!({ "name": "Curry", "price": 9.5, "spice_level": 9 }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let curry = app.create_item(&owner, rid, "Curry", 9.5).await;
    let (status, _) = app
        .post(
            &menu_uri,
            Some(&owner),
            json!({ "name": "Mango Sticky Rice", "price": 6.0, "category": "desserts" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, listed) = app.get(&menu_uri, None).await;
    assert_eq!(listed.as_array().unwrap().len(), 2);
    let (_, desserts) = app.get(&format!("{menu_uri}?category=Desserts"), None).await;
    assert_eq!(desserts.as_array().unwrap().len(), 1);

    let item_uri = format!("/menu-items/{}", curry["id"]);
    let (status, fetched) = app.get(&item_uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["name"], "Curry");

    let (status, _) = app.put(&item_uri, Some(&other), json!({ "price": 1.0 })).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, updated) = app.put(&item_uri, Some(&owner), json!({ "price": 11.0 })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["price"], 11.0);
    assert_eq!(updated["name"], "Curry");

    let (status, body) = app.delete(&item_uri, Some(&owner)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Menu item deleted successfully");
    assert_eq!(app.get(&item_uri, None).await.0, StatusCode::NOT_FOUND);
    assert_eq!(app.delete(&item_uri, Some(&owner)).await.0, StatusCode::NOT_FOUND);

    let (_, listed) = app.get(&menu_uri, None).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_menu_for_missing_restaurant() {
    let app = TestApp::new().await;
    let (_, seller) = app.signup("s@x.com", "seller").await;

    assert_eq!(
        app.get("/restaurants/424242/menu-items", None).await.0,
        StatusCode::NOT_FOUND
    );
    let (status, _) = app
        .post(
            "/restaurants/424242/menu-items",
            Some(&seller),
            json!({ "name": "Ghost", "price": 1.0 }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(app.get("/menu-items/424242", None).await.0, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_capitalised_role_is_still_a_seller_without_ownership() {
    let app = TestApp::new().await;
    let (_, owner) = app.signup("o@x.com", "seller").await;
    let restaurant = app.create_restaurant(&owner, "A", "thai").await;

    let (status, body) = app.register("Mallory@X.com", "pw123", "Seller").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["role"], "seller");
    let (_, token) = app.login("mallory@x.com", "pw123").await;
    let mallory = token["access_token"].as_str().unwrap();

    // may manage its own restaurants, never someone else's
    app.create_restaurant(mallory, "M", "thai").await;
    let uri = format!("/restaurants/{}", restaurant["id"]);
    let (status, _) = app.put(&uri, Some(mallory), json!({ "name": "Stolen" })).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(app.delete(&uri, Some(mallory)).await.0, StatusCode::FORBIDDEN);
}
