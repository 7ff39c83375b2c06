use serde::Deserialize;

use crate::error::{Error, Result};

pub const DEFAULT_SERVER: &str = "https://api.getscaffold.com";
pub const BASE_URI: &str = "/v1/";

/// How parameter values are escaped when a url is built.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryEncoding {
    /// RFC 3986 percent-encoding of everything but ALPHA / DIGIT / `-._~`.
    #[default]
    Percent,
    /// Legacy escaping of `&`, `<` and `>` as HTML entities only.
    ///
    /// Values containing `=`, `+`, `#`, `%` or spaces are not safe with this
    /// encoding; use it only to talk to consumers that expect the old format.
    HtmlEntity,
}

/// Client configuration.
///
/// Deserializable so applications can load it from their own config files.
/// Credentials are checked by [`ClientConfig::validate`] before any request
/// is made.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClientConfig {
    pub service_id: Option<String>,
    pub api_key: Option<String>,
    /// Server origin, defaults to [`DEFAULT_SERVER`].
    pub server: Option<String>,
    #[serde(default)]
    pub encoding: QueryEncoding,
}

/// Configuration after validation.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct ValidConfig {
    pub service_id: String,
    pub api_key: String,
    pub server: String,
    pub encoding: QueryEncoding,
}

impl ClientConfig {
    pub fn new(service_id: impl Into<String>, api_key: impl Into<String>) -> Self {
        ClientConfig {
            service_id: Some(service_id.into()),
            api_key: Some(api_key.into()),
            server: None,
            encoding: QueryEncoding::default(),
        }
    }

    pub fn service_id(&mut self, service_id: impl Into<String>) -> &mut ClientConfig {
        self.service_id = Some(service_id.into());
        self
    }

    pub fn api_key(&mut self, api_key: impl Into<String>) -> &mut ClientConfig {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn server(&mut self, server: impl Into<String>) -> &mut ClientConfig {
        self.server = Some(server.into());
        self
    }

    pub fn encoding(&mut self, encoding: QueryEncoding) -> &mut ClientConfig {
        self.encoding = encoding;
        self
    }

    pub(crate) fn validate(&self) -> Result<ValidConfig> {
        let service_id = required("service_id", &self.service_id)?;
        let api_key = required("api_key", &self.api_key)?;
        let server = match &self.server {
            Some(server) => {
                let parsed = url::Url::parse(server)
                    .map_err(|e| Error::Config(format!("server `{}`: {}", server, e)))?;
                if !matches!(parsed.scheme(), "http" | "https") {
                    return Err(Error::Config(format!(
                        "server `{}` must be an http or https url",
                        server
                    )));
                }
                server.trim_end_matches('/').to_string()
            }
            None => DEFAULT_SERVER.to_string(),
        };
        Ok(ValidConfig {
            service_id,
            api_key,
            server,
            encoding: self.encoding,
        })
    }
}

fn required(name: &str, value: &Option<String>) -> Result<String> {
    match value {
        Some(v) if !v.is_empty() => Ok(v.clone()),
        _ => Err(Error::Config(format!("{} is required", name))),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults_server() {
        let config = ClientConfig::new("svc", "key").validate().unwrap();
        assert_eq!(config.server, DEFAULT_SERVER);
        assert_eq!(config.encoding, QueryEncoding::Percent);
    }

    #[test]
    fn test_trims_trailing_slash() {
        let config = ClientConfig::new("svc", "key")
            .server("http://localhost:3000/")
            .validate()
            .unwrap();
        assert_eq!(config.server, "http://localhost:3000");
    }

    #[test]
    fn test_missing_credentials() {
        let mut config = ClientConfig::default();
        config.api_key("key");
        match config.validate() {
            Err(Error::Config(msg)) => assert_eq!(msg, "service_id is required"),
            other => panic!("unexpected: {:?}", other),
        }

        let mut config = ClientConfig::default();
        config.service_id("svc").api_key("");
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_rejects_bad_server() {
        let mut config = ClientConfig::new("svc", "key");
        config.server("not a url");
        assert!(matches!(config.validate(), Err(Error::Config(_))));
        config.server("ftp://files.example.com");
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_deserialize_rejects_unknown_keys() {
        let config: ClientConfig = serde_json::from_str(
            r#"{"service_id":"svc","api_key":"key","encoding":"html_entity"}"#,
        )
        .unwrap();
        assert_eq!(config.encoding, QueryEncoding::HtmlEntity);
        let unknown = r#"{"service_id":"svc","token":"x"}"#;
        assert!(serde_json::from_str::<ClientConfig>(unknown).is_err());
    }
}
