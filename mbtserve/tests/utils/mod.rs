#![allow(clippy::missing_panics_doc)]
#![allow(dead_code)]

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use actix_web::dev::ServiceResponse;
use actix_web::test::read_body;
use mbtiles::Mbtiles;
use mbtserve::config::env::FauxEnv;
use mbtserve::config::file::{Config, parse_config};
use mbtserve_core::tiles::TileResolver;
use sqlx::sqlite::SqliteConnectOptions;
use sqlx::{Connection as _, Executor as _, SqliteConnection, query};

//
// Each function should allow dead_code as they might not be used by a specific test file.
//

pub const CREATE_METADATA: &str = "CREATE TABLE metadata (name text, value text);";
pub const CREATE_TILES: &str = "CREATE TABLE tiles (zoom_level integer, tile_column integer, tile_row integer, tile_data blob);";

/// Create `tiles.mbtiles` in `dir` by running the given statements.
pub async fn mock_archive_sql(dir: &Path, statements: &[&str]) -> PathBuf {
    let path = dir.join("tiles.mbtiles");
    let opt = SqliteConnectOptions::new()
        .filename(&path)
        .create_if_missing(true);
    let mut conn = SqliteConnection::connect_with(&opt).await.unwrap();
    for sql in statements {
        conn.execute(*sql).await.unwrap();
    }
    conn.close().await.unwrap();
    path
}

/// Create `tiles.mbtiles` in `dir` with both tables, the given metadata, and tiles stored under the given rows.
pub async fn mock_archive(
    dir: &Path,
    metadata: &[(&str, &str)],
    tiles: &[(u8, u32, u32, Vec<u8>)],
) -> PathBuf {
    let path = mock_archive_sql(dir, &[CREATE_METADATA, CREATE_TILES]).await;
    let opt = SqliteConnectOptions::new().filename(&path);
    let mut conn = SqliteConnection::connect_with(&opt).await.unwrap();
    for (name, value) in metadata {
        query("INSERT INTO metadata VALUES (?, ?)")
            .bind(*name)
            .bind(*value)
            .execute(&mut conn)
            .await
            .unwrap();
    }
    for (z, x, y, data) in tiles {
        query("INSERT INTO tiles VALUES (?, ?, ?, ?)")
            .bind(*z)
            .bind(*x)
            .bind(*y)
            .bind(data.as_slice())
            .execute(&mut conn)
            .await
            .unwrap();
    }
    conn.close().await.unwrap();
    path
}

/// Parse a YAML config where `${ARCHIVE}` is replaced with the given path.
#[must_use]
pub fn mock_cfg(yaml: &str, archive: &Path) -> Config {
    let env = FauxEnv([("ARCHIVE", OsString::from(archive))].into());
    let mut cfg = parse_config(yaml, &env, Path::new("test.yaml")).unwrap();
    let res = cfg.finalize().unwrap();
    assert!(res.is_empty(), "unrecognized config: {res:?}");
    cfg
}

pub async fn mock_resolver(archive: &Path) -> TileResolver<Mbtiles> {
    TileResolver::new(Mbtiles::open(archive).unwrap()).await
}

pub async fn assert_response(response: ServiceResponse) -> ServiceResponse {
    if !response.status().is_success() {
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = read_body(response).await;
        let body = String::from_utf8_lossy(&bytes);
        panic!("response status: {status}\nresponse headers: {headers:?}\nresponse body: {body}");
    }
    response
}
