//! Google Sheets client against a local mock of the token and values endpoints

use std::time::Duration;

use booking_sync::error::StoreError;
use booking_sync::sheets::google::DEFAULT_REQUEST_TIMEOUT;
use booking_sync::sheets::{Column, GoogleSheets, GoogleSheetsConfig, RegionLayout, SheetStore};
use httpmock::prelude::*;
use serde_json::json;

const TEST_KEY: &str = include_str!("fixtures/service_account_key.pem");
const TOKEN: &str = "ya29.test-access-token";
const VALUES: &str = "/v4/spreadsheets/sheet-1/values";

fn config(server: &MockServer) -> GoogleSheetsConfig {
    GoogleSheetsConfig {
        spreadsheet_id: Some("sheet-1".into()),
        service_account_email: Some("sync@booking.iam.gserviceaccount.com".into()),
        private_key: Some(TEST_KEY.into()),
        api_base: server.url("/v4"),
        token_uri: server.url("/token"),
        ..GoogleSheetsConfig::default()
    }
}

fn reservations() -> RegionLayout {
    RegionLayout::new("Dati", 12, Column::new(10))
}

fn row(id: &str) -> Vec<String> {
    let mut cells = vec![String::new(); 12];
    cells[3] = "Anna Bianchi".into();
    cells[10] = id.into();
    cells
}

async fn mock_token(server: &MockServer) -> httpmock::Mock<'_> {
    server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/token")
                .form_urlencoded_tuple("grant_type", "urn:ietf:params:oauth:grant-type:jwt-bearer")
                .form_urlencoded_tuple_exists("assertion");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({
                    "access_token": TOKEN,
                    "expires_in": 3599,
                    "token_type": "Bearer"
                }));
        })
        .await
}

#[tokio::test]
async fn test_token_exchange_and_column_read() {
    let server = MockServer::start_async().await;
    let token = mock_token(&server).await;
    let read = server
        .mock_async(|when, then| {
            when.method(GET)
                .path(format!("{VALUES}/Dati!K:K"))
                .header("authorization", format!("Bearer {TOKEN}"));
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({
                    "range": "Dati!K1:K4",
                    "majorDimension": "ROWS",
                    "values": [["ID"], [], ["555"], [777]]
                }));
        })
        .await;

    let session = GoogleSheets::new(config(&server))
        .unwrap()
        .connect()
        .await
        .unwrap();
    let cells = session
        .read_column(&reservations(), Column::new(10))
        .await
        .unwrap();

    token.assert_async().await;
    read.assert_async().await;
    assert_eq!(cells, vec!["ID", "", "555", "777"]);
}

#[tokio::test]
async fn test_empty_range_reads_as_empty_column() {
    let server = MockServer::start_async().await;
    mock_token(&server).await;
    server
        .mock_async(|when, then| {
            when.method(GET).path(format!("{VALUES}/Dati!K:K"));
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({ "range": "Dati!K1:K1000", "majorDimension": "ROWS" }));
        })
        .await;

    let session = GoogleSheets::new(config(&server))
        .unwrap()
        .connect()
        .await
        .unwrap();
    let cells = session
        .read_column(&reservations(), Column::new(10))
        .await
        .unwrap();

    assert!(cells.is_empty());
}

#[tokio::test]
async fn test_append_posts_user_entered_row() {
    let server = MockServer::start_async().await;
    mock_token(&server).await;
    let append = server
        .mock_async(|when, then| {
            when.method(POST)
                .path(format!("{VALUES}/Dati!A:L:append"))
                .query_param("valueInputOption", "USER_ENTERED")
                .header("authorization", format!("Bearer {TOKEN}"))
                .json_body(json!({ "values": [row("555")] }));
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({ "spreadsheetId": "sheet-1" }));
        })
        .await;

    let session = GoogleSheets::new(config(&server))
        .unwrap()
        .connect()
        .await
        .unwrap();
    session.append_row(&reservations(), &row("555")).await.unwrap();

    append.assert_async().await;
}

#[tokio::test]
async fn test_overwrite_puts_full_row_range() {
    let server = MockServer::start_async().await;
    mock_token(&server).await;
    let update = server
        .mock_async(|when, then| {
            when.method(PUT)
                .path(format!("{VALUES}/Dati!A5:L5"))
                .query_param("valueInputOption", "USER_ENTERED")
                .json_body(json!({ "range": "Dati!A5:L5", "values": [row("555")] }));
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({ "updatedRows": 1 }));
        })
        .await;

    let session = GoogleSheets::new(config(&server))
        .unwrap()
        .connect()
        .await
        .unwrap();
    session
        .overwrite_row(&reservations(), 5, &row("555"))
        .await
        .unwrap();

    update.assert_async().await;
}

#[tokio::test]
async fn test_rejected_token_is_auth_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/token");
            then.status(400)
                .header("content-type", "application/json")
                .json_body(json!({ "error": "invalid_grant" }));
        })
        .await;

    let err = GoogleSheets::new(config(&server))
        .unwrap()
        .connect()
        .await
        .err()
        .unwrap();

    assert!(matches!(err, StoreError::Auth(_)));
    assert!(err.to_string().contains("invalid_grant"));
}

#[tokio::test]
async fn test_error_status_keeps_status_and_body() {
    let server = MockServer::start_async().await;
    mock_token(&server).await;
    server
        .mock_async(|when, then| {
            when.method(GET).path(format!("{VALUES}/Dati!K:K"));
            then.status(503).body("backend unavailable");
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(POST).path(format!("{VALUES}/Dati!A:L:append"));
            then.status(400).body("Unable to parse range");
        })
        .await;

    let session = GoogleSheets::new(config(&server))
        .unwrap()
        .connect()
        .await
        .unwrap();

    let err = session
        .read_column(&reservations(), Column::new(10))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Api { status: 503, .. }));
    assert!(err.is_unavailable());

    let err = session.append_row(&reservations(), &row("555")).await.unwrap_err();
    match err {
        StoreError::Api { status, body } => {
            assert_eq!(status, 400);
            assert_eq!(body, "Unable to parse range");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_hung_request_times_out_as_unavailable() {
    assert_eq!(GoogleSheetsConfig::default().request_timeout, DEFAULT_REQUEST_TIMEOUT);
    assert_eq!(DEFAULT_REQUEST_TIMEOUT, Duration::from_secs(30));

    let server = MockServer::start_async().await;
    mock_token(&server).await;
    server
        .mock_async(|when, then| {
            when.method(GET).path(format!("{VALUES}/Dati!K:K"));
            then.status(200)
                .delay(Duration::from_secs(5))
                .json_body(json!({ "values": [] }));
        })
        .await;

    let session = GoogleSheets::new(GoogleSheetsConfig {
        request_timeout: Duration::from_millis(200),
        ..config(&server)
    })
    .unwrap()
    .connect()
    .await
    .unwrap();

    let err = session
        .read_column(&reservations(), Column::new(10))
        .await
        .unwrap_err();
    assert!(matches!(&err, StoreError::Transport(e) if e.is_timeout()));
    assert!(err.is_unavailable());
}
