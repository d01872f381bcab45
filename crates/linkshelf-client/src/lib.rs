//! # linkshelf-client
//!
//! Client side of Linkshelf: the [`LinkService`] trait describing the remote
//! service, its HTTP implementation, and [`LinkStore`], the cached CRUD
//! façade the `linkshelf` command-line tool is built on.

pub mod config;
pub mod error;
pub mod http;
pub mod keystore;
pub mod links;
pub mod service;

pub use config::ClientConfig;
pub use error::ClientError;
pub use http::HttpService;
pub use links::LinkStore;
pub use service::LinkService;
