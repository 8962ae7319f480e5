// HTTP surface: routing, responses, static files and the accept loop.

pub mod mime;
pub mod response;
pub mod routes;
pub mod server;
pub mod static_files;

pub use routes::{Gateway, Route};
