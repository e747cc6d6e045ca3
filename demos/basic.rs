//! Minimal reqlog example — the layer wired into a hyper server.
//!
//! Run with:
//!   RUST_LOG=info cargo run --example basic
//!
//! Try:
//!   curl http://localhost:3000/users/42
//!   curl -H 'x-request-id: abc123' http://localhost:3000/users/42
//!   curl http://localhost:3000/missing          # warn  "Client error"
//!   curl http://localhost:3000/fail             # error "Server error"
//!   curl http://localhost:3000/healthz          # skipped, no record

use bytes::Bytes;
use http::{Request, Response, StatusCode};
use http_body_util::Full;
use hyper::body::Incoming;
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder as ConnBuilder;
use hyper_util::service::TowerToHyperService;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tracing::{error, info};

use reqlog::{BoxError, Config, Field, RemoteAddr, RequestInfo, RequestLoggerLayer};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let layer = RequestLoggerLayer::new().config(
        Config::new()
            .skip_when(|req: &RequestInfo| req.uri().path() == "/healthz")
            .custom_fields(|req: &RequestInfo| {
                vec![Field::str("path", req.uri().path().to_owned())]
            }),
    );

    let app = ServiceBuilder::new().layer(layer).service_fn(handle);

    let listener = TcpListener::bind("0.0.0.0:3000").await.expect("bind failed");
    info!("reqlog demo listening on :3000");

    loop {
        let (stream, peer) = tokio::select! {
            res = listener.accept() => match res {
                Ok(conn) => conn,
                Err(e) => {
                    error!("accept error: {e}");
                    continue;
                }
            },
            _ = tokio::signal::ctrl_c() => {
                info!("shutting down");
                break;
            }
        };

        let app = app.clone();
        tokio::spawn(async move {
            // Stamp the peer address onto each request so the middleware can
            // fall back to it when no proxy headers are present.
            let svc = ServiceBuilder::new()
                .map_request(move |mut req: Request<Incoming>| {
                    req.extensions_mut().insert(RemoteAddr(peer));
                    req
                })
                .service(app);

            if let Err(e) = ConnBuilder::new(TokioExecutor::new())
                .serve_connection(TokioIo::new(stream), TowerToHyperService::new(svc))
                .await
            {
                error!(peer = %peer, "connection error: {e}");
            }
        });
    }
}

async fn handle(req: Request<Incoming>) -> Result<Response<Full<Bytes>>, BoxError> {
    let path = req.uri().path();

    if let Some(id) = path.strip_prefix("/users/") {
        return json(
            StatusCode::OK,
            format!(r#"{{"id":"{id}","name":"alice"}}"#),
        );
    }

    match path {
        "/healthz" => json(StatusCode::OK, r#"{"status":"ok"}"#.to_owned()),
        "/fail" => Err("simulated backend failure".into()),
        _ => json(StatusCode::NOT_FOUND, r#"{"error":"not found"}"#.to_owned()),
    }
}

fn json(status: StatusCode, body: String) -> Result<Response<Full<Bytes>>, BoxError> {
    Ok(Response::builder()
        .status(status)
        .header("content-type", "application/json")
        .body(Full::new(Bytes::from(body)))?)
}
