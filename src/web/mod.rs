//! axum integration.
//!
//! [`ValidatorLayer`] wraps a router or a single route and runs the
//! configured rule chain before the handler sees the request. Handlers
//! can observe the outcome through two request extensions:
//!
//! - [`Validated`]: present when every rule passed
//! - [`ValidationLocals`]: the verdict stored under the configured context key
//!
//! # Examples
//!
//! ```
//! use axum::{routing::post, Router};
//! use body_validator::web::{ValidationLocals, ValidatorLayer};
//! use body_validator::{Config, RestrictStringLength};
//!
//! async fn create(locals: ValidationLocals) -> &'static str {
//!     if locals.error("validation").is_some() {
//!         "unreachable: failures are answered by the middleware"
//!     } else {
//!         "created"
//!     }
//! }
//!
//! let app: Router = Router::new().route("/posts", post(create)).layer(ValidatorLayer::new(
//!     Config::default()
//!         .rule(RestrictStringLength::new(["title"]).max_length(80))
//!         .with_context_key("validation"),
//! ));
//! ```

mod extract;
mod middleware;

pub use extract::{Validated, ValidationLocals};
pub use middleware::{ValidatorLayer, ValidatorService};
