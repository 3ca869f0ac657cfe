//! CMS 客户端对模拟服务器的集成测试

mod common;

use common::*;
use serde_json::json;
use spacetraveling::cms::{CmsClient, CmsError, QueryOptions};
use spacetraveling::models::config::CmsConfig;
use spacetraveling::models::document::PostData;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> CmsClient {
    CmsClient::new(&config_for(server).cms).unwrap()
}

#[tokio::test]
async fn reads_master_ref() {
    let server = MockServer::start().await;
    mount_api(&server).await;

    assert_eq!(client(&server).master_ref().await.unwrap(), MASTER_REF);
}

#[tokio::test]
async fn missing_master_ref_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(API_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "refs": [] })))
        .mount(&server)
        .await;

    let err = client(&server).master_ref().await.unwrap_err();
    assert!(matches!(err, CmsError::MissingMasterRef));
}

#[tokio::test]
async fn get_by_type_sends_query_options() {
    let server = MockServer::start().await;
    mount_api(&server).await;
    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .and(query_param("ref", MASTER_REF))
        .and(query_param("q", TYPE_QUERY))
        .and(query_param("pageSize", "1"))
        .and(query_param("fetch", "posts.title,posts.author"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "page": 1,
            "total_pages": 3,
            "next_page": page_url(&server, 2),
            "results": [post_document("como-utilizar-hooks", "Como utilizar Hooks", "2021-03-15T19:25:28+0000")]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let options = QueryOptions {
        page_size: Some(1),
        fetch: vec!["posts.title".to_string(), "posts.author".to_string()],
        ..Default::default()
    };
    let response = client(&server)
        .get_by_type::<PostData>("posts", &options)
        .await
        .unwrap();

    assert_eq!(response.results.len(), 1);
    assert_eq!(response.results[0].data.title, "Como utilizar Hooks");
    assert_eq!(response.next_page, Some(page_url(&server, 2)));
}

#[tokio::test]
async fn get_all_by_type_follows_cursors() {
    let server = MockServer::start().await;
    mount_cms(&server).await;

    let documents = client(&server)
        .get_all_by_type::<PostData>("posts", &QueryOptions::default())
        .await
        .unwrap();

    let uids: Vec<&str> = documents.iter().filter_map(|d| d.uid.as_deref()).collect();
    assert_eq!(uids, POSTS.iter().map(|(uid, _, _)| *uid).collect::<Vec<_>>());
}

#[tokio::test]
async fn get_by_uid_finds_document() {
    let server = MockServer::start().await;
    mount_cms(&server).await;
    let cms = client(&server);

    let doc = cms
        .get_by_uid::<PostData>("posts", "rust-no-frontend")
        .await
        .unwrap();
    assert_eq!(doc.data.title, "Rust no frontend");
    assert_eq!(doc.data.content[0].body.len(), 2);

    let err = cms
        .get_by_uid::<PostData>("posts", "nao-existe")
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn get_page_reads_cursor() {
    let server = MockServer::start().await;
    mount_cms(&server).await;

    let page = client(&server)
        .get_page::<PostData>(&page_url(&server, 3))
        .await
        .unwrap();
    assert_eq!(page.page, 3);
    assert_eq!(page.next_page, None);
    assert_eq!(page.results[0].uid.as_deref(), Some("rust-no-frontend"));
}

#[tokio::test]
async fn foreign_cursor_is_not_fetched() {
    let server = MockServer::start().await;
    mount_cms(&server).await;

    let err = client(&server)
        .get_page::<PostData>("https://example.com/api/v2/documents/search?page=2")
        .await
        .unwrap_err();
    assert!(matches!(err, CmsError::ForeignCursor(_)));
}

#[tokio::test]
async fn sends_access_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(API_PATH))
        .and(query_param("access_token", "segredo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "refs": [{ "id": "master", "ref": MASTER_REF, "label": "Master", "isMasterRef": true }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let cms = CmsClient::new(&CmsConfig {
        endpoint: endpoint(&server),
        access_token: Some("segredo".to_string()),
        ..Default::default()
    })
    .unwrap();
    assert_eq!(cms.master_ref().await.unwrap(), MASTER_REF);
}

#[tokio::test]
async fn maps_error_statuses() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(API_PATH))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    let err = client(&server).master_ref().await.unwrap_err();
    assert!(matches!(err, CmsError::Unauthorized));

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(API_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;
    let err = client(&server).master_ref().await.unwrap_err();
    match err {
        CmsError::Status { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body, "boom");
        }
        other => panic!("unexpected error: {other:?}"),
    }

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(API_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .mount(&server)
        .await;
    let err = client(&server).master_ref().await.unwrap_err();
    assert!(matches!(err, CmsError::Decode(_)));
}

#[tokio::test]
async fn http_not_found_is_an_upstream_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(API_PATH))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = client(&server).master_ref().await.unwrap_err();
    assert!(!err.is_not_found());
    assert!(matches!(err, CmsError::Status { status: 404, .. }));
}

#[tokio::test]
async fn oversized_total_count_is_not_trusted() {
    let server = MockServer::start().await;
    mount_api(&server).await;
    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .and(query_param("q", TYPE_QUERY))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "page": 1,
            "results_per_page": 100,
            "results_size": 1,
            "total_results_size": 4_000_000_000u64,
            "total_pages": 1,
            "next_page": null,
            "results": [post_document("como-utilizar-hooks", "Como utilizar Hooks", "2021-03-15T19:25:28+0000")]
        })))
        .mount(&server)
        .await;

    let documents = client(&server)
        .get_all_by_type::<PostData>("posts", &QueryOptions::default())
        .await
        .unwrap();
    assert_eq!(documents.len(), 1);
}
