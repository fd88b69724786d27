//! Target address of a registry call.

use std::fmt;
use std::str::FromStr;

/// Host (name or IP literal) and port of a registry endpoint.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Endpoint {
    host: String,
    port: u16,
}

impl Endpoint {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self { host: host.into(), port }
    }

    pub fn host(&self) -> &str { &self.host }
    pub fn port(&self) -> u16 { self.port }
}

/// Parses `host:port`. The split happens on the last `:` so bracketed IPv6
/// literals (`[::1]:30100`) keep their colons. A host with a colon outside
/// brackets is ambiguous and rejected.
impl FromStr for Endpoint {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (host, port) = s.rsplit_once(':').ok_or(())?;
        if host.is_empty() {
            return Err(());
        }
        if host.contains(':') && !(host.starts_with('[') && host.ends_with(']')) {
            return Err(());
        }
        let port = port.parse().map_err(|_| ())?;
        Ok(Self::new(host, port))
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_host_and_port() {
        let ep: Endpoint = "10.0.0.5:30100".parse().unwrap();
        assert_eq!(ep.host(), "10.0.0.5");
        assert_eq!(ep.port(), 30100);
        assert_eq!(ep.to_string(), "10.0.0.5:30100");
    }

    #[test]
    fn keeps_ipv6_brackets() {
        let ep: Endpoint = "[::1]:8080".parse().unwrap();
        assert_eq!(ep.host(), "[::1]");
        assert_eq!(ep.port(), 8080);
    }

    #[test]
    fn rejects_malformed_input() {
        assert!("registry".parse::<Endpoint>().is_err());
        assert!(":80".parse::<Endpoint>().is_err());
        assert!("host:http".parse::<Endpoint>().is_err());
    }

    #[test]
    fn unbracketed_ipv6_is_rejected() {
        assert!("::1:80".parse::<Endpoint>().is_err());
        assert!("fe80::1:30100".parse::<Endpoint>().is_err());
        assert!("[::1:80".parse::<Endpoint>().is_err());

        let ep: Endpoint = "[::1]:80".parse().unwrap();
        assert_eq!(ep.host(), "[::1]");
        assert_eq!(ep.port(), 80);
    }
}
