mod extract;
mod handlers;
mod server;

pub use extract::ApiJson;
pub use server::{router, HttpServer, HttpServerConfig};
