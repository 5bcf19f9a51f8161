//! The outgoing request described as plain data.
//!
//! # Design
//! The core never touches the network. It hands the caller an
//! `HttpRequest` (always a GET against one fixed endpoint) and the caller,
//! or a `Transport`, performs the round-trip. Query pairs stay
//! unencoded until `url()` so tests and FFI hosts can inspect them.

use std::fmt;

use crate::request::PASSWORD_KEY;

/// A GET request against the single API endpoint.
#[derive(Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub base_url: String,
    pub query: Vec<(String, String)>,
}

impl HttpRequest {
    /// The full URL with the query form-urlencoded (`+` for spaces,
    /// brackets percent-encoded).
    pub fn url(&self) -> String {
        let query = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.query.iter())
            .finish();
        format!("{}?{query}", self.base_url)
    }

    /// The value sent for `key`, if any.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

impl fmt::Debug for HttpRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let query: Vec<(&str, &str)> = self
            .query
            .iter()
            .map(|(k, v)| {
                if k == PASSWORD_KEY {
                    (k.as_str(), "[REDACTED]")
                } else {
                    (k.as_str(), v.as_str())
                }
            })
            .collect();
        f.debug_struct("HttpRequest")
            .field("base_url", &self.base_url)
            .field("query", &query)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> HttpRequest {
        HttpRequest {
            base_url: "https://voip.ms/api/v1/rest.php".to_string(),
            query: vec![
                ("api_username".to_string(), "me@example.com".to_string()),
                ("api_password".to_string(), "p&ss word".to_string()),
                ("method".to_string(), "setSequences".to_string()),
                ("steps[0][type]".to_string(), "tone".to_string()),
            ],
        }
    }

    #[test]
    fn url_form_encodes_every_pair() {
        assert_eq!(
            request().url(),
            "https://voip.ms/api/v1/rest.php?api_username=me%40example.com\
             &api_password=p%26ss+word&method=setSequences&steps%5B0%5D%5Btype%5D=tone"
        );
    }

    #[test]
    fn debug_redacts_password() {
        let rendered = format!("{:?}", request());
        assert!(!rendered.contains("p&ss word"));
        assert!(rendered.contains("[REDACTED]"));
        assert!(rendered.contains("me@example.com"));
    }

    #[test]
    fn param_lookup() {
        assert_eq!(request().param("method"), Some("setSequences"));
        assert_eq!(request().param("missing"), None);
    }
}
