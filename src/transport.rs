use crate::error::TransportError;

/// Status code and raw body of an HTTP response.
#[derive(Clone, Debug, PartialEq)]
pub struct Response {
    pub status: u16,
    pub body: String,
}

impl Response {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Response {
            status,
            body: body.into(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == 200
    }
}

/// Blocking HTTP GET.
///
/// Any status the server answers with, including 4xx and 5xx, is a
/// [`Response`]; only failures to get an answer at all are errors.
/// Retries, timeouts and TLS are left to the implementation.
pub trait Transport {
    fn get(&self, url: &str) -> Result<Response, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn get(&self, url: &str) -> Result<Response, TransportError> {
        (**self).get(url)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn get(&self, url: &str) -> Result<Response, TransportError> {
        (**self).get(url)
    }
}

#[cfg(feature = "reqwest")]
pub use self::http::HttpTransport;

#[cfg(feature = "reqwest")]
mod http {
    use super::{Response, Transport};
    use crate::error::TransportError;

    /// [`Transport`] backed by a blocking `reqwest` client.
    #[derive(Clone, Debug, Default)]
    pub struct HttpTransport {
        client: reqwest::blocking::Client,
    }

    impl HttpTransport {
        pub fn new() -> Self {
            HttpTransport::default()
        }

        /// Uses a preconfigured client, e.g. with timeouts or a proxy.
        pub fn with_client(client: reqwest::blocking::Client) -> Self {
            HttpTransport { client }
        }
    }

    impl Transport for HttpTransport {
        fn get(&self, url: &str) -> Result<Response, TransportError> {
            let resp = self.client.get(url).send()?;
            let status = resp.status().as_u16();
            let body = resp.text()?;
            Ok(Response { status, body })
        }
    }
}
