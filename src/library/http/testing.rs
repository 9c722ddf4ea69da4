//! In-process HTTP server for exercising clients in tests

use hyper::service::{make_service_fn, service_fn};
use hyper::{Body, Request, Response, Server};
use std::convert::Infallible;
use std::future::Future;
use std::net::SocketAddr;

/// Spawns a server on an ephemeral local port which answers every request using the handler
pub fn serve<F, Fut>(handler: F) -> SocketAddr
where
    F: Fn(Request<Body>) -> Fut + Clone + Send + Sync + 'static,
    Fut: Future<Output = Response<Body>> + Send + 'static,
{
    let make_svc = make_service_fn(move |_| {
        let handler = handler.clone();

        async move {
            Ok::<_, Infallible>(service_fn(move |req| {
                let response = handler(req);
                async move { Ok::<_, Infallible>(response.await) }
            }))
        }
    });

    let server = Server::bind(&SocketAddr::from(([127, 0, 0, 1], 0))).serve(make_svc);
    let addr = server.local_addr();

    tokio::spawn(server);

    addr
}
