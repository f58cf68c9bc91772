//! Client SDK for the CDEK parcel-delivery integrator API.
//!
//! The provider speaks two wire formats: JSON for the shipping-cost
//! calculator and a family of XML endpoints for everything else (order
//! creation/deletion, status and info lookup, label printing, courier
//! calls, pickup-point listing). XML requests are assembled as
//! [`Element`](xml::Element) trees, signed with an MD5 shared-secret
//! digest and posted as an `xml_request` form field; responses are parsed
//! back into element trees and flattened into
//! [`NormalizedNode`](xml::NormalizedNode) mappings.
//!
//! Application order data plugs in through the [`Order`] and [`OrderLine`]
//! capability traits, so the builders never depend on a concrete order
//! representation.
//!
//! ```rust,no_run
//! use cdek_client::{CdekClient, ClientConfig, Good, Location, QuoteRequest};
//!
//! #[tokio::main]
//! async fn main() -> cdek_client::Result<()> {
//!     let config = ClientConfig::from_raw("my-account", "my-secret")?;
//!     let client = CdekClient::new(config)?;
//!
//!     let quote = QuoteRequest::new(Location::city(137), Location::city(44))
//!         .with_tariff(136)
//!         .with_good(Good { weight: 2.0, length: 100, width: 10, height: 20 });
//!     let cost = client.get_shipping_cost(&quote).await?;
//!     if cost.get("error").is_none() {
//!         println!("{cost}");
//!     }
//!
//!     let statuses = client.get_orders_statuses(&["1105068024"], true).await?;
//!     println!("{statuses:?}");
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod calculator;
mod client;
pub mod config;
pub mod error;
pub mod order;
mod requests;
mod transport;
pub mod xml;

pub use auth::Credentials;
pub use calculator::{Good, Location, QuoteRequest};
pub use client::CdekClient;
pub use config::ClientConfig;
pub use error::{Error, Kind as ErrorKind};
pub use order::{Order, OrderLine};
pub use requests::CourierCall;
pub use xml::{Element, NormalizedNode};

/// Crate-wide result alias.
pub type Result<T, E = Error> = std::result::Result<T, E>;
