// Core HTTP layer for the RaidBot site
// Request/response types, routing, forms, cookies and the hyper server loop

pub mod application;
pub mod cookie;
pub mod error;
pub mod form;
pub mod http;
pub mod method;
pub mod routing;
pub mod status;

pub use application::*;
pub use cookie::{SameSite, SetCookie, cookie_value, parse_cookie_header};
pub use error::*;
pub use form::*;
pub use http::*;
pub use method::*;
pub use routing::{HandlerFn, HandlerFuture, Route, Router};
pub use status::*;

/// Result alias for handlers
pub type Result<T> = std::result::Result<T, Error>;
