//! Request-body validation middleware for axum.
//!
//! A chain of field-level rules runs against each request body before the
//! handler is invoked. Bodies are interpreted according to their
//! `Content-Type`:
//!
//! - **JSON**: decoded into an object, fields looked up by key
//! - **XML**: direct children of the root element, matched by local name
//! - **anything else**: the configured field names are searched for in the raw text
//!
//! The first failing rule short-circuits the chain and the client receives
//! a `400 Bad Request` formatted in the same content type it sent.
//!
//! # Core Types
//!
//! - [`Config`]: rule chain, bypass predicate, error handler, context key
//! - [`Restrictor`]: the rule contract, open to user implementations
//! - [`RestrictUnicode`], [`RestrictNumberOnly`], [`RestrictStringLength`]: built-in rules
//! - [`Validator`]: evaluates a chain outside of any framework
//! - [`ValidatorLayer`]: the tower layer for axum routers
//!
//! # Examples
//!
//! ```
//! use axum::{routing::post, Router};
//! use body_validator::{
//!     Config, RestrictNumberOnly, RestrictStringLength, RestrictUnicode, ValidatorLayer,
//! };
//!
//! let app: Router = Router::new()
//!     .route("/users", post(|| async { "created" }))
//!     .layer(ValidatorLayer::new(
//!         Config::default()
//!             .rule(RestrictUnicode::new(["name", "email"]))
//!             .rule(RestrictNumberOnly::new(["age"]).max(120).max_digits(3))
//!             .rule(RestrictStringLength::new(["bio"]).max_length(280))
//!             .with_next(|request| request.uri().path() == "/health"),
//!     ));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod content_type;
mod error;
pub mod extract;
mod request;
mod response;
mod rules;
mod validator;
pub mod web;
pub mod xml;

pub use config::{Config, ErrorHandler, NextFn, DEFAULT_BODY_LIMIT};
pub use content_type::ContentTypeBranch;
pub use error::{Error, ErrorKind, ValidationError, ERR_INVALID_JSON_BODY, ERR_INVALID_XML_BODY};
pub use request::RequestBody;
pub use response::{default_error_handler, ErrorResponse};
pub use rules::{RestrictNumberOnly, RestrictStringLength, RestrictUnicode, Restrictor};
pub use validator::Validator;
pub use web::ValidatorLayer;
