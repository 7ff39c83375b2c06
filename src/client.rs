use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::fmt;
use tracing::{debug, instrument, warn};

use crate::config::{ClientConfig, QueryEncoding, BASE_URI};
use crate::error::{Error, Result};
use crate::parameters::Parameters;
use crate::requests::{
    BackgroundCheckLookup, BackgroundCheckRequest, BackgroundCheckResult, CodeChannel, CodeCheck,
    MailingAddressRequest, PhoneNumberRequest, ProfessionalLicenseRequest, Request,
};
use crate::signer::{self, PARAM_KEY_SERVICE_ID, PARAM_KEY_SIGNATURE, PARAM_KEY_TIMESTAMP};
use crate::transport::{Response, Transport};

#[cfg(feature = "reqwest")]
use crate::transport::HttpTransport;

const COMMAND_PING: &str = "ping";
const COMMAND_GET_TOKEN: &str = "get_token";
const COMMAND_VERIFY_SIGNATURE: &str = "verify_signature";

/// Whether the client holds a session token.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    TokenAcquired,
    /// The server could not be reached or refused a token during
    /// construction. Signed calls fail with [`Error::NotAuthenticated`]
    /// until [`Client::get_token`] succeeds.
    Degraded,
}

#[derive(Debug, Deserialize)]
struct TokenBody {
    token: String,
}

#[derive(Debug, Deserialize)]
struct RequestIdBody {
    request_id: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// Scaffold API client.
///
/// Every call is one blocking round-trip through the [`Transport`].
/// Signed calls take `&self`; only [`Client::get_token`] mutates the
/// session, so sharing a client between threads needs an outer lock.
pub struct Client<T> {
    service_id: String,
    api_key: String,
    server: String,
    encoding: QueryEncoding,
    token: Option<String>,
    transport: T,
}

// keeps the api key and token out of logs
impl<T> fmt::Debug for Client<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("service_id", &self.service_id)
            .field("server", &self.server)
            .field("encoding", &self.encoding)
            .field("authenticated", &self.token.is_some())
            .finish()
    }
}

#[cfg(feature = "reqwest")]
impl Client<HttpTransport> {
    /// Connects with the default blocking HTTP transport.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        Client::with_transport(config, HttpTransport::new())
    }
}

impl<T: Transport> Client<T> {
    /// Validates `config`, pings the server and fetches a session token.
    ///
    /// Invalid configuration fails before anything is sent. If the ping or
    /// the token request fails the client is still returned, in
    /// [`SessionState::Degraded`].
    pub fn with_transport(config: &ClientConfig, transport: T) -> Result<Self> {
        let config = config.validate()?;
        let mut client = Client {
            service_id: config.service_id,
            api_key: config.api_key,
            server: config.server,
            encoding: config.encoding,
            token: None,
            transport,
        };
        client.authenticate();
        Ok(client)
    }

    fn authenticate(&mut self) {
        match self.ping() {
            Ok(true) => {
                if let Err(err) = self.get_token() {
                    warn!(error = %err, "token request failed, client is degraded");
                }
            }
            Ok(false) => warn!("ping was not answered with 200, client is degraded"),
            Err(err) => warn!(error = %err, "ping failed, client is degraded"),
        }
    }

    pub fn state(&self) -> SessionState {
        match self.token {
            Some(_) => SessionState::TokenAcquired,
            None => SessionState::Degraded,
        }
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn server(&self) -> &str {
        &self.server
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Sends a ping to the server.
    pub fn ping(&self) -> Result<bool> {
        let resp = self.send_command(COMMAND_PING, None, Parameters::new())?;
        Ok(resp.is_ok())
    }

    /// Requests a new session token signed with the api key and stores it.
    pub fn get_token(&mut self) -> Result<String> {
        let resp = self.send_command(
            COMMAND_GET_TOKEN,
            Some(self.api_key.as_str()),
            Parameters::new(),
        )?;
        let body: TokenBody = parse_success(resp)?;
        self.token = Some(body.token.clone());
        Ok(body.token)
    }

    /// Checks that the server accepts signatures made with the current token.
    pub fn verify_signature(&self) -> Result<bool> {
        let token = self.require_token()?;
        let resp = self.send_command(COMMAND_VERIFY_SIGNATURE, Some(token), Parameters::new())?;
        Ok(resp.is_ok())
    }

    /// Submits a background check and returns its request id.
    pub fn submit_background_check_request(
        &self,
        request: &BackgroundCheckRequest,
    ) -> Result<String> {
        self.send_for_request_id(request)
    }

    /// Fetches the full result of a background check.
    pub fn check_background_check_result(&self, request_id: &str) -> Result<BackgroundCheckResult> {
        let lookup = BackgroundCheckLookup {
            request_id: request_id.to_string(),
        };
        parse_success(self.send(&lookup)?)
    }

    /// Sends a postcard with a code to a mailing address.
    pub fn mailing_address_send_code(&self, request: &MailingAddressRequest) -> Result<String> {
        self.send_for_request_id(request)
    }

    /// Succeeds when the server accepts `code` for the mailing address request.
    pub fn mailing_address_check_code(&self, code: &str, request_id: &str) -> Result<()> {
        self.check_code(CodeChannel::MailingAddress, code, request_id)
    }

    /// Sends a code to a phone number by sms or voice call.
    pub fn phone_number_send_code(&self, request: &PhoneNumberRequest) -> Result<String> {
        self.send_for_request_id(request)
    }

    /// Succeeds when the server accepts `code` for the phone number request.
    pub fn phone_number_check_code(&self, code: &str, request_id: &str) -> Result<()> {
        self.check_code(CodeChannel::PhoneNumber, code, request_id)
    }

    pub fn professional_license_submit_request(
        &self,
        request: &ProfessionalLicenseRequest,
    ) -> Result<String> {
        self.send_for_request_id(request)
    }

    /// Signs `request` with the session token and sends it.
    ///
    /// The raw response is returned whatever its status.
    pub fn send<R: Request + ?Sized>(&self, request: &R) -> Result<Response> {
        let token = self.require_token()?;
        self.send_command(request.command(), Some(token), request.to_parameters())
    }

    fn send_for_request_id<R: Request + ?Sized>(&self, request: &R) -> Result<String> {
        let body: RequestIdBody = parse_success(self.send(request)?)?;
        Ok(body.request_id)
    }

    fn check_code(&self, channel: CodeChannel, code: &str, request_id: &str) -> Result<()> {
        let check = CodeCheck {
            channel,
            code: code.to_string(),
            request_id: request_id.to_string(),
        };
        let resp = self.send(&check)?;
        if resp.is_ok() {
            Ok(())
        } else {
            Err(remote_error(resp))
        }
    }

    fn require_token(&self) -> Result<&str> {
        self.token.as_deref().ok_or(Error::NotAuthenticated)
    }

    #[instrument(level = "debug", skip(self, signed_with, params))]
    fn send_command(
        &self,
        command: &str,
        signed_with: Option<&str>,
        mut params: Parameters,
    ) -> Result<Response> {
        if let Some(key) = signed_with {
            params.insert(PARAM_KEY_SERVICE_ID, &self.service_id);
            params.insert(PARAM_KEY_TIMESTAMP, Utc::now().timestamp());
            let signature = signer::canonicalize_and_sign(&params, key);
            params.insert(PARAM_KEY_SIGNATURE, signature);
        }
        let endpoint = format!("{}{}{}", self.server, BASE_URI, command);
        let url = signer::build_url_with(&endpoint, &params, self.encoding);
        let resp = self.transport.get(&url).map_err(Error::Transport)?;
        debug!(status = resp.status, signed = signed_with.is_some(), "command answered");
        Ok(resp)
    }
}

/// Decodes a 200 body, or turns any other status into [`Error::Remote`].
fn parse_success<B: DeserializeOwned>(resp: Response) -> Result<B> {
    if !resp.is_ok() {
        return Err(remote_error(resp));
    }
    Ok(serde_json::from_str(&resp.body)?)
}

fn remote_error(resp: Response) -> Error {
    let message = match serde_json::from_str::<ErrorBody>(&resp.body) {
        Ok(body) => body.error,
        Err(_) if !resp.body.trim().is_empty() => resp.body,
        Err(_) => format!("HTTP {}", resp.status),
    };
    Error::Remote {
        status: resp.status,
        message,
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_remote_error_message() {
        let err = remote_error(Response::new(422, r#"{"error":"invalid ssn"}"#));
        assert_eq!(err.to_string(), "invalid ssn");
        assert_eq!(err.remote_message(), Some("invalid ssn"));

        let err = remote_error(Response::new(502, "Bad Gateway"));
        assert_eq!(err.remote_message(), Some("Bad Gateway"));

        match remote_error(Response::new(500, "")) {
            Error::Remote { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "HTTP 500");
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_parse_success() {
        let body: TokenBody = parse_success(Response::new(200, r#"{"token":"abc123"}"#)).unwrap();
        assert_eq!(body.token, "abc123");

        let err = parse_success::<TokenBody>(Response::new(200, "<html>")).unwrap_err();
        assert!(matches!(err, Error::Decode(_)));

        let err = parse_success::<TokenBody>(Response::new(401, r#"{"error":"bad key"}"#))
            .unwrap_err();
        assert_eq!(err.remote_message(), Some("bad key"));
    }
}
