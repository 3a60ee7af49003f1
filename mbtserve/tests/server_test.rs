use std::path::PathBuf;

use actix_web::http::header::{ACCEPT_ENCODING, CACHE_CONTROL, CONTENT_ENCODING, CONTENT_TYPE};
use actix_web::http::{Method, StatusCode};
use actix_web::test::{TestRequest, call_service, read_body, read_body_json};
use indoc::indoc;
use insta::assert_json_snapshot;
use mbtserve_tile_utils::{decode_gzip, encode_gzip};
use rstest::rstest;
use tempfile::TempDir;

pub mod utils;
pub use utils::*;

macro_rules! create_app {
    ($archive:expr) => {{
        let resolver = mock_resolver($archive).await;
        ::actix_web::test::init_service(
            ::actix_web::App::new()
                .app_data(::actix_web::web::Data::new(resolver))
                .configure(::mbtserve::srv::router),
        )
        .await
    }};
}

fn test_get(path: &str) -> TestRequest {
    TestRequest::get().uri(path)
}

const MVT: &[u8] = b"\x1a\x15\x0a\x06cities\x28\x80\x20\x78\x02";

async fn world_archive(dir: &TempDir) -> PathBuf {
    mock_archive(
        dir.path(),
        &[
            ("name", "t"),
            ("format", "pbf"),
            ("generator_options", "tippecanoe -zg -o world.mbtiles"),
        ],
        &[
            (0, 0, 0, encode_gzip(MVT).unwrap()),
            // stored under TMS row 2, requested as XYZ row 1
            (2, 1, 2, MVT.to_vec()),
            // stored under the XYZ row only
            (2, 3, 0, b"xyz-only".to_vec()),
            (3, 0, 7, b"\x1f\x8bnot a gzip stream".to_vec()),
        ],
    )
    .await
}

#[actix_rt::test]
async fn health() {
    let dir = TempDir::new().unwrap();
    let app = create_app!(&world_archive(&dir).await);

    let response = call_service(&app, test_get("/health").to_request()).await;
    let response = assert_response(response).await;
    assert_eq!(response.headers().get(CACHE_CONTROL).unwrap(), "no-cache");
    assert_eq!(read_body(response).await, "OK");

    let req = TestRequest::default()
        .method(Method::HEAD)
        .uri("/health")
        .to_request();
    assert_eq!(call_service(&app, req).await.status(), StatusCode::OK);
}

#[actix_rt::test]
async fn metadata() {
    let dir = TempDir::new().unwrap();
    let app = create_app!(&world_archive(&dir).await);

    let response = call_service(&app, test_get("/metadata").to_request()).await;
    let response = assert_response(response).await;
    assert_eq!(
        response.headers().get(CONTENT_TYPE).unwrap(),
        "application/json"
    );
    let body: serde_json::Value = read_body_json(response).await;
    assert_json_snapshot!(body, @r#"
    {
      "format": "pbf",
      "generator_options": "tippecanoe -zg -o world.mbtiles",
      "name": "t"
    }
    "#);
}

#[actix_rt::test]
async fn metadata_round_trip() {
    let dir = TempDir::new().unwrap();
    let archive = mock_archive(dir.path(), &[("name", "t"), ("format", "pbf")], &[]).await;
    let app = create_app!(&archive);

    let response = call_service(&app, test_get("/metadata").to_request()).await;
    let body: serde_json::Value = read_body_json(assert_response(response).await).await;
    assert_eq!(body, serde_json::json!({"name": "t", "format": "pbf"}));
}

#[actix_rt::test]
async fn metadata_empty() {
    let dir = TempDir::new().unwrap();
    let archive = mock_archive(dir.path(), &[], &[]).await;
    let app = create_app!(&archive);

    let response = call_service(&app, test_get("/metadata").to_request()).await;
    let body: serde_json::Value = read_body_json(assert_response(response).await).await;
    assert_eq!(body, serde_json::json!({}));
}

#[actix_rt::test]
async fn metadata_gzip() {
    let dir = TempDir::new().unwrap();
    let app = create_app!(&world_archive(&dir).await);

    let req = test_get("/metadata")
        .insert_header((ACCEPT_ENCODING, "gzip"))
        .to_request();
    let response = assert_response(call_service(&app, req).await).await;
    assert_eq!(response.headers().get(CONTENT_ENCODING).unwrap(), "gzip");
    let body = decode_gzip(&read_body(response).await).unwrap();
    let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["name"], "t");
}

#[actix_rt::test]
async fn metadata_without_table() {
    let dir = TempDir::new().unwrap();
    let archive = mock_archive_sql(dir.path(), &[CREATE_TILES]).await;
    let app = create_app!(&archive);

    let response = call_service(&app, test_get("/metadata").to_request()).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[actix_rt::test]
async fn gzip_tile_is_decompressed() {
    let dir = TempDir::new().unwrap();
    let app = create_app!(&world_archive(&dir).await);

    let response = call_service(&app, test_get("/tiles/0/0/0").to_request()).await;
    let response = assert_response(response).await;
    assert_eq!(
        response.headers().get(CONTENT_TYPE).unwrap(),
        "application/x-protobuf"
    );
    assert!(response.headers().get(CONTENT_ENCODING).is_none());
    assert_eq!(read_body(response).await, MVT);
}

#[rstest]
#[case::tms_row("/tiles/2/1/1")]
#[case::mvt_suffix("/tiles/2/1/1.mvt")]
#[case::pbf_suffix("/tiles/2/1/1.pbf")]
#[case::double_suffix("/tiles/2/1/1.pbf.gz")]
#[actix_rt::test]
async fn tms_tile(#[case] path: &str) {
    let dir = TempDir::new().unwrap();
    let app = create_app!(&world_archive(&dir).await);

    let response = call_service(&app, test_get(path).to_request()).await;
    let response = assert_response(response).await;
    assert_eq!(read_body(response).await, MVT);
}

#[actix_rt::test]
async fn raw_row_fallback() {
    let dir = TempDir::new().unwrap();
    let app = create_app!(&world_archive(&dir).await);

    let response = call_service(&app, test_get("/tiles/2/3/0").to_request()).await;
    let response = assert_response(response).await;
    assert_eq!(read_body(response).await, "xyz-only");
}

#[actix_rt::test]
async fn head_tile() {
    let dir = TempDir::new().unwrap();
    let app = create_app!(&world_archive(&dir).await);

    let req = TestRequest::default()
        .method(Method::HEAD)
        .uri("/tiles/0/0/0")
        .to_request();
    let response = call_service(&app, req).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[actix_rt::test]
async fn missing_tile_on_empty_archive() {
    let dir = TempDir::new().unwrap();
    let archive = mock_archive(dir.path(), &[], &[]).await;
    let app = create_app!(&archive);

    let response = call_service(&app, test_get("/tiles/1/1/1").to_request()).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(read_body(response).await, "Tile not found");
}

#[actix_rt::test]
async fn corrupt_gzip_tile() {
    let dir = TempDir::new().unwrap();
    let app = create_app!(&world_archive(&dir).await);

    let response = call_service(&app, test_get("/tiles/3/0/0").to_request()).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[actix_rt::test]
async fn tiles_without_table() {
    let dir = TempDir::new().unwrap();
    let archive = mock_archive_sql(dir.path(), &[CREATE_METADATA]).await;
    let app = create_app!(&archive);

    let response = call_service(&app, test_get("/tiles/0/0/0").to_request()).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[rstest]
#[case::zoom_not_a_number("/tiles/a/0/0")]
#[case::zoom_too_large("/tiles/256/0/0")]
#[case::negative_column("/tiles/0/-1/0")]
#[case::column_too_large("/tiles/0/4294967296/0")]
#[case::row_not_a_number("/tiles/0/0/y.mvt")]
#[case::row_empty_before_suffix("/tiles/0/0/.pbf")]
#[actix_rt::test]
async fn malformed_tile_path(#[case] path: &str) {
    let dir = TempDir::new().unwrap();
    let app = create_app!(&world_archive(&dir).await);

    let response = call_service(&app, test_get(path).to_request()).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[actix_rt::test]
async fn unknown_route() {
    let dir = TempDir::new().unwrap();
    let app = create_app!(&world_archive(&dir).await);

    let response = call_service(&app, test_get("/tiles/0/0").to_request()).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn config_file_serves_archive() {
    let dir = TempDir::new().unwrap();
    let archive = world_archive(&dir).await;
    let config = mock_cfg(
        indoc! {"
            mbtiles: ${ARCHIVE}
            listen_addresses: 127.0.0.1:0
            worker_processes: 1
        "},
        &archive,
    );
    let resolver = config.resolve().await.unwrap();
    assert_eq!(resolver.compressed_hint(), Some(true));

    let app = ::actix_web::test::init_service(
        ::actix_web::App::new()
            .app_data(::actix_web::web::Data::new(resolver))
            .configure(::mbtserve::srv::router),
    )
    .await;
    let response = call_service(&app, test_get("/tiles/0/0/0.mvt").to_request()).await;
    assert_eq!(read_body(assert_response(response).await).await, MVT);
}
