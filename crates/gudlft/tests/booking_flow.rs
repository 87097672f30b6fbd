mod common;

use common::{get, post_form, purchase, sample_state, spawn_app};

#[tokio::test]
async fn complete_booking_flow() {
    let state = sample_state();
    let dataset = state.dataset();
    let addr = spawn_app(state).await;

    let login = post_form(addr, "/showSummary", &[("email", "admin@irontemple.com")]).await;
    assert_eq!(login.status, 200);
    assert!(login.body.contains("Welcome, admin@irontemple.com"));
    assert!(login
        .body
        .contains("href=\"/book/Fall%20Classic/Iron%20Temple\""));

    let page = get(addr, "/book/Fall%20Classic/Iron%20Temple").await;
    assert_eq!(page.status, 200);
    assert!(page.body.contains("Booking for Fall Classic"));
    assert!(page.body.contains("Places available: 13"));

    let result = purchase(addr, "Iron Temple", "Fall Classic", "5").await;
    assert_eq!(result.status, 200);
    assert!(result.body.contains("Great-booking complete!"));
    assert!(result.body.contains("Points available: 15"));

    let dataset = dataset.read().await;
    assert_eq!(dataset.club_by_name("Iron Temple").unwrap().points, 15);
    assert_eq!(
        dataset
            .competition_by_name("Fall Classic")
            .unwrap()
            .number_of_places,
        8
    );
}

#[tokio::test]
async fn booking_is_visible_on_points_board() {
    let addr = spawn_app(sample_state()).await;

    let result = purchase(addr, "Simply Lift", "Final Showdown", "2").await;
    assert!(result.body.contains("Great-booking complete!"));

    let board = get(addr, "/pointsDisplay").await;
    assert_eq!(board.status, 200);
    assert!(board.body.contains("<td>Simply Lift</td><td>11</td>"));
}

#[tokio::test]
async fn booking_more_than_limit_is_refused() {
    let state = sample_state();
    let dataset = state.dataset();
    let addr = spawn_app(state).await;

    let result = purchase(addr, "Rich Club", "Final Showdown", "13").await;
    assert_eq!(result.status, 200);
    assert!(result.body.contains("can't book more than 12"));
    assert!(result.body.contains("12 places"));

    let dataset = dataset.read().await;
    assert_eq!(dataset.club_by_name("Rich Club").unwrap().points, 100);
}

#[tokio::test]
async fn limit_applies_across_purchases() {
    let addr = spawn_app(sample_state()).await;

    let first = purchase(addr, "Rich Club", "Final Showdown", "10").await;
    assert!(first.body.contains("Great-booking complete!"));

    let second = purchase(addr, "Rich Club", "Final Showdown", "3").await;
    assert!(second.body.contains("can't book more than 12"));

    let third = purchase(addr, "Rich Club", "Final Showdown", "2").await;
    assert!(third.body.contains("Great-booking complete!"));
}

#[tokio::test]
async fn negative_quantity_is_refused() {
    let addr = spawn_app(sample_state()).await;

    let result = purchase(addr, "Rich Club", "Final Showdown", "-1").await;
    assert_eq!(result.status, 200);
    assert!(result.body.contains("Invalid"));
    assert!(result.body.contains("positive number"));
}

#[tokio::test]
async fn non_numeric_quantity_is_refused() {
    let addr = spawn_app(sample_state()).await;

    let result = purchase(addr, "Iron Temple", "Fall Classic", "abc").await;
    assert_eq!(result.status, 200);
    assert!(result.body.contains("Invalid number of places"));
}

#[tokio::test]
async fn insufficient_points_is_refused() {
    let state = sample_state();
    let dataset = state.dataset();
    let addr = spawn_app(state).await;

    let result = purchase(addr, "Club Zero", "Final Showdown", "1").await;
    assert_eq!(result.status, 200);
    assert!(result.body.contains("Not enough points"));

    let dataset = dataset.read().await;
    assert_eq!(
        dataset
            .competition_by_name("Final Showdown")
            .unwrap()
            .number_of_places,
        30
    );
}

#[tokio::test]
async fn exceeding_competition_capacity_is_refused() {
    let addr = spawn_app(sample_state()).await;

    // Rich Club may hold 12 but Fall Classic has 13; drain it first.
    let first = purchase(addr, "Rich Club", "Fall Classic", "12").await;
    assert!(first.body.contains("Great-booking complete!"));

    let result = purchase(addr, "Iron Temple", "Fall Classic", "2").await;
    assert_eq!(result.status, 200);
    assert!(result.body.contains("Not enough places"));
}

#[tokio::test]
async fn past_competition_booking_page_is_refused() {
    let addr = spawn_app(sample_state()).await;

    let response = get(addr, "/book/Spring%20Festival/Simply%20Lift").await;
    assert_eq!(response.status, 200);
    assert!(response.body.contains("already passed"));
    assert!(response.body.contains("Welcome, john@simplylift.co"));
}

#[tokio::test]
async fn past_competition_purchase_is_refused() {
    let state = sample_state();
    let dataset = state.dataset();
    let addr = spawn_app(state).await;

    let result = purchase(addr, "Simply Lift", "Spring Festival", "1").await;
    assert_eq!(result.status, 200);
    assert!(result.body.contains("over"));

    let dataset = dataset.read().await;
    assert_eq!(dataset.club_by_name("Simply Lift").unwrap().points, 13);
}

#[tokio::test]
async fn unknown_competition_booking_page() {
    let addr = spawn_app(sample_state()).await;

    let response = get(addr, "/book/NonExistent/Simply%20Lift").await;
    assert_eq!(response.status, 404);
    assert!(response.body.contains("Something went wrong"));
    assert!(response.body.contains("Welcome, john@simplylift.co"));
}

#[tokio::test]
async fn unknown_club_purchase() {
    let addr = spawn_app(sample_state()).await;

    let response = purchase(addr, "Ghost Club", "Fall Classic", "1").await;
    assert_eq!(response.status, 404);
    assert!(response.body.contains("Something went wrong"));
}

#[tokio::test]
async fn welcome_page_hides_booking_link_for_past_competitions() {
    let addr = spawn_app(sample_state()).await;

    let login = post_form(addr, "/showSummary", &[("email", "john@simplylift.co")]).await;
    assert!(login.body.contains("Competition over"));
    assert!(!login.body.contains("/book/Spring%20Festival/"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_purchases_respect_the_limit() {
    let state = sample_state();
    let dataset = state.dataset();
    let addr = spawn_app(state).await;

    let mut purchases = tokio::task::JoinSet::new();
    for _ in 0..30 {
        purchases.spawn(async move { purchase(addr, "Iron Temple", "Final Showdown", "1").await });
    }

    let mut successes = 0;
    let mut refusals = 0;
    while let Some(result) = purchases.join_next().await {
        let response = result.unwrap();
        assert_eq!(response.status, 200);
        if response.body.contains("Great-booking complete!") {
            successes += 1;
        } else if response.body.contains("can't book more than 12") {
            refusals += 1;
        }
    }
    assert_eq!(successes, 12);
    assert_eq!(refusals, 18);

    let dataset = dataset.read().await;
    assert_eq!(dataset.club_by_name("Iron Temple").unwrap().points, 8);
    assert_eq!(
        dataset
            .competition_by_name("Final Showdown")
            .unwrap()
            .number_of_places,
        18
    );
    assert_eq!(dataset.booked_places("Iron Temple", "Final Showdown"), 12);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_purchases_never_overspend_points() {
    let state = sample_state();
    let dataset = state.dataset();
    let addr = spawn_app(state).await;

    let mut purchases = tokio::task::JoinSet::new();
    for competition in ["Fall Classic", "Final Showdown", "Fall Classic", "Final Showdown"] {
        purchases.spawn(async move { purchase(addr, "Simply Lift", competition, "5").await });
    }

    let mut successes = 0;
    while let Some(result) = purchases.join_next().await {
        let response = result.unwrap();
        if response.body.contains("Great-booking complete!") {
            successes += 1;
        } else {
            assert!(response.body.contains("Not enough points available."));
        }
    }
    assert_eq!(successes, 2);

    let dataset = dataset.read().await;
    assert_eq!(dataset.club_by_name("Simply Lift").unwrap().points, 3);
    let booked = dataset.booked_places("Simply Lift", "Fall Classic")
        + dataset.booked_places("Simply Lift", "Final Showdown");
    assert_eq!(booked, 10);
}
