//! Minimal JSON HTTP front for the scraper.
//!
//! `POST /scrape` (or `/api/recipes/scrape`) with `{"url": "..."}` answers
//! with the scraped recipe, `400` when the URL is missing and `500` when
//! scraping fails.

use crate::error::ScrapeError;
use crate::pipeline::RecipeScraper;
use hyper::body::to_bytes;
use hyper::header::CONTENT_TYPE;
use hyper::service::{make_service_fn, service_fn};
use hyper::{Body, Method, Request, Response, Server, StatusCode};
use log::{error, info};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

#[derive(Debug, Deserialize)]
struct ScrapeRequest {
    #[serde(default)]
    url: Option<String>,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

/// Running server; dropping it without calling [`ServerHandle::shutdown`]
/// leaves the server running until the runtime stops.
pub struct ServerHandle {
    addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

impl ServerHandle {
    /// The address actually bound (useful when binding port 0)
    pub fn local_addr(&self) -> SocketAddr {
        self.addr
    }

    /// Stop accepting connections and wait for in-flight requests to finish
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        let _ = self.task.await;
    }

    /// Serve until the process is terminated
    pub async fn wait(self) {
        let _ = self.task.await;
    }
}

/// Bind `addr` and start serving scrape requests in the background
pub fn serve(addr: SocketAddr, scraper: RecipeScraper) -> Result<ServerHandle, hyper::Error> {
    let scraper = Arc::new(scraper);
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    let make_svc = make_service_fn(move |_conn| {
        let scraper = Arc::clone(&scraper);
        async move {
            Ok::<_, Infallible>(service_fn(move |req| handle_request(Arc::clone(&scraper), req)))
        }
    });

    let server = Server::try_bind(&addr)?.serve(make_svc);
    let local_addr = server.local_addr();
    let server = server.with_graceful_shutdown(async {
        let _ = shutdown_rx.await;
    });

    let task = tokio::spawn(async move {
        info!("Recipe scraper listening on {}", local_addr);
        if let Err(e) = server.await {
            error!("Server error: {}", e);
        }
        info!("Recipe scraper server stopped");
    });

    Ok(ServerHandle {
        addr: local_addr,
        shutdown_tx: Some(shutdown_tx),
        task,
    })
}

async fn handle_request(
    scraper: Arc<RecipeScraper>,
    req: Request<Body>,
) -> Result<Response<Body>, Infallible> {
    let response = match (req.method(), req.uri().path()) {
        (&Method::POST, "/scrape") | (&Method::POST, "/api/recipes/scrape") => {
            handle_scrape(&scraper, req).await
        }
        (&Method::GET, "/health") => json_response(StatusCode::OK, &serde_json::json!({"status": "ok"})),
        _ => error_response(StatusCode::NOT_FOUND, "Not Found"),
    };
    Ok(response)
}

async fn handle_scrape(scraper: &RecipeScraper, req: Request<Body>) -> Response<Body> {
    let body = match to_bytes(req.into_body()).await {
        Ok(body) => body,
        Err(e) => return error_response(StatusCode::BAD_REQUEST, &format!("Invalid request body: {e}")),
    };

    let request: ScrapeRequest = if body.is_empty() {
        ScrapeRequest { url: None }
    } else {
        match serde_json::from_slice(&body) {
            Ok(request) => request,
            Err(e) => {
                return error_response(StatusCode::BAD_REQUEST, &format!("Invalid request body: {e}"))
            }
        }
    };

    let url = match request.url.as_deref().map(str::trim) {
        Some(url) if !url.is_empty() => url.to_string(),
        _ => return error_response(StatusCode::BAD_REQUEST, "URL is required"),
    };

    match scraper.scrape(&url).await {
        Ok(recipe) => json_response(StatusCode::OK, &recipe.validated()),
        Err(ScrapeError::MissingUrl) => error_response(StatusCode::BAD_REQUEST, "URL is required"),
        Err(e) => {
            error!("Error scraping recipe from {}: {}", url, e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string())
        }
    }
}

fn error_response(status: StatusCode, message: &str) -> Response<Body> {
    json_response(
        status,
        &ErrorBody {
            error: message.to_string(),
        },
    )
}

fn json_response<T: Serialize>(status: StatusCode, value: &T) -> Response<Body> {
    let (status, body) = match serde_json::to_vec(value) {
        Ok(body) => (status, body),
        Err(e) => {
            error!("Failed to serialize response: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                br#"{"error":"Failed to serialize response"}"#.to_vec(),
            )
        }
    };

    let mut response = Response::new(Body::from(body));
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, hyper::header::HeaderValue::from_static("application/json"));
    response
}
