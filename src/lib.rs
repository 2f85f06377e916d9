//! OAuth 2.0 client-credentials token manager for services behind an API gateway.
//!
//! Caches one bearer token, re-acquires it when the service answers `401`, and bounds every
//! loop with a configurable retry budget.
//!
//! The entry point is [`client::TokenClient`]. It owns the cached access token, talks to the
//! gateway through a pluggable [`http::GatewayHttpClient`], and wraps every business call in
//! a retry loop bounded by [`retry::RetryPolicy`].

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod client;
pub mod error;
pub mod http;
pub mod obs;
pub mod retry;
pub mod settings;

mod _prelude {
	pub use std::{
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		sync::Arc,
		time::Duration,
	};

	pub use async_lock::Mutex as AsyncMutex;
	pub use parking_lot::Mutex;
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::Deserialize;
	pub use thiserror::Error as ThisError;
	pub use time::OffsetDateTime;
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

pub use ::http as http_types;
#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _};
