mod common;

use axum::http::StatusCode;
use common::{TestApp, USER_ID};
use serde_json::json;

async fn tickets_available(app: &TestApp, flight: i64) -> i64 {
    let (status, body) = app.get(&format!("/flights/{}", flight), &app.user).await;
    assert_eq!(status, StatusCode::OK);
    body["tickets_available"].as_i64().expect("tickets_available")
}

#[tokio::test]
async fn test_placing_an_order_reduces_availability() {
    let app = TestApp::new();
    let flight = app.seed_flight("Boeing 737").await;
    assert_eq!(tickets_available(&app, flight).await, 100);

    let (status, order) = app
        .post(
            "/orders",
            &app.user,
            json!({ "tickets": [
                { "row": 1, "seat": 3, "flight": flight },
                { "row": 1, "seat": 1, "flight": flight },
                { "row": 2, "seat": 1, "flight": flight },
            ]}),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", order);
    assert_eq!(order["user_id"], USER_ID);
    let seats: Vec<(i64, i64)> = order["tickets"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| (t["row"].as_i64().unwrap(), t["seat"].as_i64().unwrap()))
        .collect();
    assert_eq!(seats, vec![(1, 1), (1, 3), (2, 1)]);

    assert_eq!(tickets_available(&app, flight).await, 97);
    // Reading does not change the answer.
    assert_eq!(tickets_available(&app, flight).await, 97);

    let (_, list) = app.get("/flights", &app.user).await;
    assert_eq!(list[0]["tickets_available"], 97);
}

#[tokio::test]
async fn test_taken_seat_is_a_conflict() {
    let app = TestApp::new();
    let flight = app.seed_flight("Boeing 737").await;

    let (status, _) = app
        .post("/orders", &app.user, json!({ "tickets": [{ "row": 4, "seat": 4, "flight": flight }] }))
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = app
        .post("/orders", &app.other, json!({ "tickets": [{ "row": 4, "seat": 4, "flight": flight }] }))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "SEAT_TAKEN");
    assert_eq!(body["field"], "tickets[0]");

    let (status, body) = app
        .post(
            "/orders",
            &app.other,
            json!({ "tickets": [
                { "row": 4, "seat": 5, "flight": flight },
                { "row": 4, "seat": 4, "flight": flight },
            ]}),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["field"], "tickets[1]");
    assert_eq!(tickets_available(&app, flight).await, 99);
}

#[tokio::test]
async fn test_one_bad_ticket_rejects_the_whole_order() {
    let app = TestApp::new();
    let flight = app.seed_flight("Boeing 737").await;

    let (status, body) = app
        .post(
            "/orders",
            &app.user,
            json!({ "tickets": [
                { "row": 5, "seat": 5, "flight": flight },
                { "row": 11, "seat": 1, "flight": flight },
            ]}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "RANGE_VIOLATION");
    assert_eq!(body["field"], "tickets[1].row");

    assert_eq!(tickets_available(&app, flight).await, 100);
    let (_, orders) = app.get("/orders", &app.user).await;
    assert_eq!(orders["count"], 0);
}

#[tokio::test]
async fn test_out_of_range_row_names_the_ticket_field() {
    let app = TestApp::new();
    let flight = app.seed_flight("Boeing 737").await;

    let (status, body) = app
        .post("/orders", &app.user, json!({ "tickets": [{ "row": 11, "seat": 1, "flight": flight }] }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field"], "tickets[0].row");

    let (status, body) = app
        .post("/orders", &app.user, json!({ "tickets": [{ "row": 1, "seat": 0, "flight": flight }] }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field"], "tickets[0].seat");
}

#[tokio::test]
async fn test_empty_order_is_rejected() {
    let app = TestApp::new();
    app.seed_flight("Boeing 737").await;

    let (status, body) = app.post("/orders", &app.user, json!({ "tickets": [] })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "EMPTY_REQUEST");

    let (status, body) = app.post("/orders", &app.user, json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "EMPTY_REQUEST");
}

#[tokio::test]
async fn test_unknown_flight_is_not_found() {
    let app = TestApp::new();
    let (status, body) = app
        .post("/orders", &app.user, json!({ "tickets": [{ "row": 1, "seat": 1, "flight": 404 }] }))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_orders_are_scoped_and_paginated() {
    let app = TestApp::new();
    let flight = app.seed_flight("Boeing 737").await;

    for seat in 1..=3 {
        let (status, _) = app
            .post("/orders", &app.user, json!({ "tickets": [{ "row": 1, "seat": seat, "flight": flight }] }))
            .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, page) = app.get("/orders?page=1&page_size=2", &app.user).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["count"], 3);
    let results = page["results"].as_array().unwrap();
    assert_eq!(results.len(), 2);
    // Newest first.
    assert!(results[0]["id"].as_i64() > results[1]["id"].as_i64());

    let (_, page) = app.get("/orders?page=2&page_size=2", &app.user).await;
    assert_eq!(page["results"].as_array().unwrap().len(), 1);

    let (_, page) = app.get("/orders", &app.other).await;
    assert_eq!(page["count"], 0);
}

#[tokio::test]
async fn test_tickets_are_visible_to_owner_and_admin_only() {
    let app = TestApp::new();
    let flight = app.seed_flight("Boeing 737").await;

    let (_, order) = app
        .post("/orders", &app.user, json!({ "tickets": [{ "row": 3, "seat": 7, "flight": flight }] }))
        .await;
    let ticket_id = order["tickets"][0]["id"].as_i64().unwrap();

    let (status, ticket) = app.get(&format!("/tickets/{}", ticket_id), &app.user).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ticket["order"]["user_id"], USER_ID);
    assert!(ticket["flight_info"].as_str().unwrap().starts_with("Boryspil-Chopin"));

    let (status, _) = app.get(&format!("/tickets/{}", ticket_id), &app.other).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.get(&format!("/tickets/{}", ticket_id), &app.admin).await;
    assert_eq!(status, StatusCode::OK);

    let (_, mine) = app.get("/tickets", &app.user).await;
    assert_eq!(mine.as_array().unwrap().len(), 1);
    let (_, theirs) = app.get("/tickets", &app.other).await;
    assert!(theirs.as_array().unwrap().is_empty());
    let (_, all) = app.get("/tickets", &app.admin).await;
    assert_eq!(all.as_array().unwrap().len(), 1);
}
