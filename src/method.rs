//! HTTP method as a typed enum.
//!
//! The registry protocol only ever uses four verbs, so that is all this type
//! carries. Anything else is rejected by [`FromStr`].

use std::fmt;
use std::str::FromStr;

/// A method the dispatcher can send.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Method {
    Delete,
    Get,
    Post,
    Put,
}

impl Method {
    /// Returns the uppercase wire representation (e.g. `"GET"`).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Delete => "DELETE",
            Self::Get    => "GET",
            Self::Post   => "POST",
            Self::Put    => "PUT",
        }
    }

    /// `true` when a request body must never be transmitted.
    pub fn is_read_only(self) -> bool {
        matches!(self, Self::Get)
    }
}

/// Parses an uppercase method string (e.g. `"GET"`). Case-sensitive per RFC 9110 §9.1.
impl FromStr for Method {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DELETE" => Ok(Self::Delete),
            "GET"    => Ok(Self::Get),
            "POST"   => Ok(Self::Post),
            "PUT"    => Ok(Self::Put),
            _        => Err(()),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Method> for http::Method {
    fn from(m: Method) -> http::Method {
        match m {
            Method::Delete => http::Method::DELETE,
            Method::Get    => http::Method::GET,
            Method::Post   => http::Method::POST,
            Method::Put    => http::Method::PUT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_methods_only() {
        assert_eq!("PUT".parse::<Method>(), Ok(Method::Put));
        assert!("put".parse::<Method>().is_err());
        assert!("PATCH".parse::<Method>().is_err());
    }

    #[test]
    fn only_get_is_read_only() {
        assert!(Method::Get.is_read_only());
        assert!(!Method::Delete.is_read_only());
        assert!(!Method::Post.is_read_only());
    }

    #[test]
    fn converts_to_http_method() {
        assert_eq!(http::Method::from(Method::Delete), http::Method::DELETE);
        assert_eq!(Method::Post.to_string(), "POST");
    }
}
