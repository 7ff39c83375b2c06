//! Client library for the Scaffold identity verification API.
//!
//! Requests are signed with HMAC-SHA1 over their parameters sorted by key
//! (see [`signer`]); the [`Client`] keeps the session token and drives the
//! background check, mailing address, phone number and professional
//! license workflows over a blocking [`Transport`].
//!
//! ```no_run
//! use scaffoldsign::{Client, ClientConfig, PhoneNumberRequest};
//!
//! # fn main() -> scaffoldsign::Result<()> {
//! let client = Client::new(&ClientConfig::new("service-id", "api-key"))?;
//! let request_id = client.phone_number_send_code(&PhoneNumberRequest {
//!     phone_number: "5555550100".into(),
//!     email: "user@example.com".into(),
//!     ..Default::default()
//! })?;
//! client.phone_number_check_code("1234", &request_id)?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod parameters;
pub mod requests;
pub mod signer;
pub mod transport;

mod util;

pub use client::{Client, SessionState};
pub use config::{ClientConfig, QueryEncoding, DEFAULT_SERVER};
pub use error::{Error, Result, SignatureError};
pub use parameters::{Parameter, Parameters};
pub use requests::{
    BackgroundCheckOptions, BackgroundCheckRequest, BackgroundCheckResult, CheckType,
    CodeDelivery, MailingAddressRequest, PhoneNumberRequest, ProfessionalLicenseRequest, Request,
};
#[cfg(feature = "reqwest")]
pub use transport::HttpTransport;
pub use transport::{Response, Transport};
