// uninet-api: Async Rust client for a local UniFi network controller
//
// Hand-written client for the controller's site API. Covers stat/,
// cmd/, and rest/ endpoints wrapped in the standard
// `{ meta: { rc, msg }, data: [...] }` envelope, on both UniFi OS
// (UDM-class) and legacy (Cloud Key / self-hosted) controllers.

pub mod auth;
pub mod client;
pub mod clients;
pub mod devices;
pub mod error;
pub mod events;
pub mod firewall;
pub mod hotspot;
pub mod mac;
pub mod models;
pub mod networks;
pub mod session;
pub mod stats;
pub mod system;
pub mod transport;

pub use auth::Dialect;
pub use client::{ControllerConfig, LocalClient};
pub use error::Error;
pub use mac::MacAddress;
pub use session::{Session, SessionStore};
