use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use actix_web::error::{ErrorBadRequest, ErrorInternalServerError};
use actix_web::http::header::CACHE_CONTROL;
use actix_web::middleware::{Logger, NormalizePath, TrailingSlash};
use actix_web::web::{Data, PathConfig};
use actix_web::{App, HttpResponse, HttpServer, Responder, middleware, route, web};
use futures::TryFutureExt as _;
use mbtiles::Mbtiles;
use mbtserve_core::tiles::TileResolver;
use tracing::{debug, error};

use crate::config::file::srv::{KEEP_ALIVE_DEFAULT, LISTEN_ADDRESSES_DEFAULT, SrvConfig};
use crate::srv::tiles::get_tile;
use crate::{ServeError, ServeResult};

pub fn map_internal_error<T: std::fmt::Display>(e: T) -> actix_web::Error {
    error!("{e}");
    ErrorInternalServerError(e.to_string())
}

/// Return 200 OK if healthy. Used for readiness and liveness probes.
#[route("/health", method = "GET", method = "HEAD")]
#[allow(clippy::unused_async)]
async fn get_health() -> impl Responder {
    HttpResponse::Ok()
        .insert_header((CACHE_CONTROL, "no-cache"))
        .message_body("OK")
}

/// All rows of the archive's metadata table as a JSON object.
#[route(
    "/metadata",
    method = "GET",
    method = "HEAD",
    wrap = "middleware::Compress::default()"
)]
async fn get_metadata(resolver: Data<TileResolver<Mbtiles>>) -> actix_web::Result<HttpResponse> {
    let metadata = resolver
        .store()
        .get_metadata()
        .await
        .map_err(map_internal_error)?;
    Ok(HttpResponse::Ok().json(metadata))
}

pub fn router(cfg: &mut web::ServiceConfig) {
    // malformed z/x/y path segments are a client error, not a missing route
    cfg.app_data(PathConfig::default().error_handler(|err, req| {
        debug!("Rejecting {}: {err}", req.path());
        ErrorBadRequest(err)
    }))
    .service(get_health)
    .service(get_metadata)
    .service(get_tile);
}

pub type Server = Pin<Box<dyn Future<Output = ServeResult<()>>>>;

/// Create a future for an Actix web server together with the listening address.
pub fn new_server(
    config: SrvConfig,
    resolver: TileResolver<Mbtiles>,
) -> ServeResult<(Server, String)> {
    let keep_alive = Duration::from_secs(config.keep_alive.unwrap_or(KEEP_ALIVE_DEFAULT));
    let worker_processes = config.worker_processes.unwrap_or_else(num_cpus::get);
    let listen_addresses = config
        .listen_addresses
        .clone()
        .unwrap_or_else(|| LISTEN_ADDRESSES_DEFAULT.to_string());

    let resolver = Data::new(resolver);
    let factory = move || {
        App::new()
            .app_data(resolver.clone())
            .wrap(Logger::default())
            .wrap(NormalizePath::new(TrailingSlash::MergeOnly))
            .configure(router)
    };

    let server = HttpServer::new(factory)
        .bind(listen_addresses.clone())
        .map_err(|e| ServeError::BindingError(e, listen_addresses.clone()))?
        .keep_alive(keep_alive)
        .shutdown_timeout(0)
        .workers(worker_processes)
        .run()
        .err_into();

    Ok((Box::pin(server), listen_addresses))
}
