//! Integration tests for the Bangumi API client.
//!
//! Tests cover:
//! - Single episode and subject lookups
//! - Not-found and authentication handling
//! - Episode list pagination

use bangumi_episode::models::config::BangumiConfig;
use bangumi_episode::models::episode::EpisodeType;
use bangumi_episode::services::bangumi::BangumiClient;
use bangumi_episode::services::catalog::Catalog;
use bangumi_episode::Error;
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer, access_token: Option<&str>) -> BangumiClient {
    let config = BangumiConfig {
        base_url: server.uri(),
        access_token: access_token.map(str::to_string),
        page_size: 2,
        ..Default::default()
    };
    BangumiClient::new(config).unwrap()
}

fn episode_json(id: u64, kind: u8, sort: f64) -> serde_json::Value {
    json!({
        "id": id,
        "type": kind,
        "name": format!("Episode {}", id),
        "name_cn": "",
        "sort": sort,
        "ep": sort,
        "airdate": "2023-04-08",
        "desc": "",
    })
}

// ========== SINGLE LOOKUP TESTS ==========

#[tokio::test]
async fn test_fetch_episode() {
    let server = MockServer::start().await;
    let mut body = episode_json(1001, 0, 3.0);
    body["subject_id"] = json!(400);

    Mock::given(method("GET"))
        .and(path("/v0/episodes/1001"))
        .and(header("Authorization", "Bearer secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&server)
        .await;

    let episode = client(&server, Some("secret"))
        .fetch_episode("1001")
        .await
        .unwrap()
        .unwrap();

    assert_eq!(episode.id, "1001");
    assert_eq!(episode.series_id, "400");
    assert_eq!(episode.kind, EpisodeType::Normal);
    assert_eq!(episode.order, 3.0);
}

#[tokio::test]
async fn test_fetch_episode_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v0/episodes/404"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let episode = client(&server, None).fetch_episode("404").await.unwrap();
    assert!(episode.is_none());
}

#[tokio::test]
async fn test_unauthorized() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v0/episodes/1"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let result = client(&server, Some("bad")).fetch_episode("1").await;
    assert!(matches!(result, Err(Error::BangumiAccessTokenInvalid)));
}

#[tokio::test]
async fn test_server_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v0/subjects/1"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&server)
        .await;

    let result = client(&server, None).fetch_series("1").await;
    match result {
        Err(Error::BangumiApi { status, message }) => {
            assert_eq!(status, 503);
            assert_eq!(message, "maintenance");
        }
        other => panic!("Expected BangumiApi error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_fetch_series() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v0/subjects/400"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 400,
            "date": "2023-04-01",
            "name": "Show",
            "name_cn": "番组",
        })))
        .mount(&server)
        .await;

    let series = client(&server, None)
        .fetch_series("400")
        .await
        .unwrap()
        .unwrap();

    assert_eq!(series.id, "400");
    assert_eq!(series.air_date.as_deref(), Some("2023-04-01"));
    assert_eq!(series.name_cn.as_deref(), Some("番组"));
}

// ========== PAGINATION TESTS ==========

async fn mount_pages(server: &MockServer) {
    let pages = [
        ("0", vec![episode_json(1, 0, 1.0), episode_json(2, 0, 2.0)]),
        ("2", vec![episode_json(3, 0, 3.0), episode_json(4, 0, 4.0)]),
        ("4", vec![episode_json(5, 0, 5.0)]),
    ];

    for (offset, data) in pages {
        Mock::given(method("GET"))
            .and(path("/v0/episodes"))
            .and(query_param("subject_id", "400"))
            .and(query_param("type", "0"))
            .and(query_param("offset", offset))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "total": 5,
                "limit": 2,
                "offset": offset.parse::<u32>().unwrap(),
                "data": data,
            })))
            .mount(server)
            .await;
    }
}

#[tokio::test]
async fn test_catalog_loads_all_pages() {
    let server = MockServer::start().await;
    mount_pages(&server).await;

    let episodes = client(&server, None)
        .fetch_episode_catalog("400", Some(EpisodeType::Normal), 99.0)
        .await
        .unwrap()
        .unwrap();

    let orders: Vec<f64> = episodes.iter().map(|e| e.order).collect();
    assert_eq!(orders, vec![1.0, 2.0, 3.0, 4.0, 5.0]);
    assert!(episodes.iter().all(|e| e.series_id == "400"));
}

#[tokio::test]
async fn test_catalog_stops_once_index_is_covered() {
    let server = MockServer::start().await;
    mount_pages(&server).await;

    let episodes = client(&server, None)
        .fetch_episode_catalog("400", Some(EpisodeType::Normal), 3.0)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(episodes.len(), 4);
    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
}

#[tokio::test]
async fn test_catalog_loads_all_pages_without_positive_hint() {
    let server = MockServer::start().await;
    mount_pages(&server).await;

    for hint in [0.0, -1.0] {
        let episodes = client(&server, None)
            .fetch_episode_catalog("400", Some(EpisodeType::Normal), hint)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(episodes.len(), 5);
    }

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 6);
}

#[tokio::test]
async fn test_empty_catalog_is_none() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v0/episodes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total": 0,
            "limit": 2,
            "offset": 0,
            "data": [],
        })))
        .mount(&server)
        .await;

    let episodes = client(&server, None)
        .fetch_episode_catalog("400", None, 1.0)
        .await
        .unwrap();
    assert!(episodes.is_none());
}

#[tokio::test]
async fn test_verify() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v0/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"username": "me"})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v0/subjects/8"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    assert!(client(&server, Some("token")).verify().await.unwrap());
    assert!(!client(&server, None).verify().await.unwrap());
}
