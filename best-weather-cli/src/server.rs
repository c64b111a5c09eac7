//! HTTP boundary: `GET /best-weather`.

use std::{net::SocketAddr, sync::Arc};

use best_weather_core::BestWeatherService;
use warp::{Filter, Reply, http::StatusCode};

pub async fn serve(service: Arc<BestWeatherService>, addr: SocketAddr) {
    tracing::info!(%addr, "Listening");
    warp::serve(routes(service)).run(addr).await;
}

pub fn routes(
    service: Arc<BestWeatherService>,
) -> impl Filter<Extract = (warp::reply::Response,), Error = warp::Rejection> + Clone {
    warp::get()
        .and(warp::path("best-weather"))
        .and(warp::path::end())
        .and(warp::any().map(move || service.clone()))
        .then(best_weather)
}

async fn best_weather(service: Arc<BestWeatherService>) -> warp::reply::Response {
    match service.get_best_weather().await {
        Ok(reading) => warp::reply::json(&reading).into_response(),
        Err(e) => {
            let status =
                StatusCode::from_u16(e.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            warp::reply::with_status(e.to_string(), status).into_response()
        }
    }
}
