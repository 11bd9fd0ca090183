use std::net::SocketAddr;
use std::sync::Arc;

use futures::Future;
use serde::Serialize;
use warp::{
    http::StatusCode,
    hyper::body::Bytes,
    reply::{self, Response},
    Filter, Rejection, Reply,
};

use crate::{
    api::{
        v1,
        v2::{self, message::Envelope},
        ApiError,
    },
    discovery,
    models::Config,
    registry::Registry,
};

fn json_reply<T: Serialize>(value: &T, status: StatusCode) -> Response {
    reply::with_status(reply::json(value), status).into_response()
}

fn error_status(error: &ApiError) -> StatusCode {
    if error.is_not_found() {
        StatusCode::NOT_FOUND
    } else {
        StatusCode::BAD_REQUEST
    }
}

fn v1_error(error: ApiError, address: String) -> Response {
    warn!(error = %error, address = %address, "v1 request failed");

    json_reply(
        &vec![v1::message::Response::error(&error, address)],
        error_status(&error),
    )
}

fn v2_error(error: ApiError) -> Response {
    warn!(error = %error, "CLIP v2 request failed");

    json_reply(
        &Envelope::<v2::message::Light>::error(&error),
        error_status(&error),
    )
}

fn with_registry(
    registry: Registry,
) -> impl Filter<Extract = (Registry,), Error = std::convert::Infallible> + Clone {
    warp::any().map(move || registry.clone())
}

/// Routes of the v1 API, under `/api`
fn v1_routes(registry: Registry) -> impl Filter<Extract = (Response,), Error = Rejection> + Clone {
    let lights = warp::path!("api" / String / "lights")
        .and(warp::get())
        .and(with_registry(registry.clone()))
        .then(|_user: String, registry: Registry| async move {
            json_reply(&v1::lights(&registry).await, StatusCode::OK)
        });

    let light = warp::path!("api" / String / "lights" / String)
        .and(warp::get())
        .and(with_registry(registry.clone()))
        .then(|_user: String, key: String, registry: Registry| async move {
            match v1::light(&registry, &key).await {
                Ok(light) => json_reply(&light, StatusCode::OK),
                Err(error) => v1_error(error, format!("/lights/{}", key)),
            }
        });

    let state = warp::path!("api" / String / "lights" / String / "state")
        .and(warp::put())
        .and(warp::body::bytes())
        .and(with_registry(registry))
        .then(
            |_user: String, key: String, body: Bytes, registry: Registry| async move {
                match v1::set_state(&registry, &key, &body).await {
                    Ok(acks) => json_reply(&acks, StatusCode::OK),
                    Err(error) => v1_error(error, format!("/lights/{}/state", key)),
                }
            },
        );

    // Anything else under /api, whatever the method, succeeds like a pairing request
    let pairing = warp::path("api").map(|| json_reply(&v1::pairing(), StatusCode::OK));

    lights
        .or(light)
        .unify()
        .or(state)
        .unify()
        .or(pairing)
        .unify()
}

/// Routes of the CLIP v2 API, under `/clip/v2`
fn v2_routes(
    registry: Registry,
    enable: bool,
) -> impl Filter<Extract = (Response,), Error = Rejection> + Clone {
    let enabled = warp::any()
        .and_then(move || async move {
            if enable {
                Ok(())
            } else {
                Err(warp::reject::not_found())
            }
        })
        .untuple_one();

    let lights = warp::path!("resource" / "light")
        .and(warp::get())
        .and(with_registry(registry.clone()))
        .then(|registry: Registry| async move {
            json_reply(&v2::lights(&registry).await, StatusCode::OK)
        });

    let light = warp::path!("resource" / "light" / String)
        .and(warp::get())
        .and(with_registry(registry.clone()))
        .then(|id: String, registry: Registry| async move {
            match v2::light(&registry, &id).await {
                Ok(envelope) => json_reply(&envelope, StatusCode::OK),
                Err(error) => v2_error(error),
            }
        });

    let update = warp::path!("resource" / "light" / String)
        .and(warp::put())
        .and(warp::body::bytes())
        .and(with_registry(registry))
        .then(|id: String, body: Bytes, registry: Registry| async move {
            match v2::update_light(&registry, &id, &body).await {
                Ok(envelope) => json_reply(&envelope, StatusCode::OK),
                Err(error) => v2_error(error),
            }
        });

    // Resources that are not modelled answer with an empty envelope
    let fallback = warp::any().map(|| json_reply(&v2::empty(), StatusCode::OK));

    warp::path("clip")
        .and(warp::path("v2"))
        .and(enabled)
        .and(
            lights
                .or(light)
                .unify()
                .or(update)
                .unify()
                .or(fallback)
                .unify(),
        )
}

/// All routes served by the bridge
pub fn routes(
    registry: Registry,
    config: &Config,
) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    let description: Arc<str> = discovery::description(&config.bridge.name).into();

    let description = warp::path!("description.xml")
        .and(warp::get())
        .map(move || {
            reply::with_header(
                description.to_string(),
                "content-type",
                "application/xml",
            )
            .into_response()
        });

    description
        .or(v1_routes(registry.clone()))
        .unify()
        .or(v2_routes(registry, config.web.enable_v2))
        .unify()
        .with(warp::filters::log::log("huebridge::web"))
}

pub async fn bind(
    registry: Registry,
    config: &Config,
) -> Result<impl Future<Output = ()>, std::io::Error> {
    let address = SocketAddr::new(config.web.bind, config.web.port);
    let listener = tokio::net::TcpListener::bind(address).await?;

    info!(address = %address, v2 = config.web.enable_v2, "Hue API server listening");

    Ok(warp::serve(routes(registry, config))
        .run_incoming(tokio_stream::wrappers::TcpListenerStream::new(listener)))
}
