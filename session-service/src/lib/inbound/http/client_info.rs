use std::convert::Infallible;
use std::net::IpAddr;
use std::net::SocketAddr;

use axum::async_trait;
use axum::extract::ConnectInfo;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::HeaderMap;

use crate::domain::session::models::ClientInfo;

pub const DEVICE_INFO_HEADER: &str = "x-device-info";
pub const FORWARDED_FOR_HEADER: &str = "x-forwarded-for";
const UNKNOWN_ADDRESS: &str = "unknown";

/// Extractor for the device descriptor and origin address of a request.
///
/// The origin is the first `X-Forwarded-For` entry when it parses as an IP
/// address, then the socket peer (requires serving with connect info), then
/// `"unknown"`.
#[derive(Debug, Clone)]
pub struct RequestClient(pub ClientInfo);

#[async_trait]
impl<S> FromRequestParts<S> for RequestClient
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let peer = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| *addr);

        Ok(RequestClient(client_info(&parts.headers, peer)))
    }
}

fn client_info(headers: &HeaderMap, peer: Option<SocketAddr>) -> ClientInfo {
    let device_info = header_str(headers, DEVICE_INFO_HEADER)
        .unwrap_or_default()
        .to_string();

    let forwarded = header_str(headers, FORWARDED_FOR_HEADER)
        .and_then(|value| value.split(',').next())
        .and_then(|entry| entry.trim().parse::<IpAddr>().ok());

    let ip_address = match (forwarded, peer.map(|addr| addr.ip())) {
        (Some(ip), _) | (None, Some(ip)) => ip.to_string(),
        (None, None) => UNKNOWN_ADDRESS.to_string(),
    };

    ClientInfo {
        device_info,
        ip_address,
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn test_forwarded_for_takes_first_entry() {
        let mut headers = HeaderMap::new();
        headers.insert(
            FORWARDED_FOR_HEADER,
            HeaderValue::from_static(" 203.0.113.7 , 10.0.0.1"),
        );
        headers.insert(DEVICE_INFO_HEADER, HeaderValue::from_static("iPhone"));

        let peer: SocketAddr = "127.0.0.1:4000".parse().unwrap();
        let info = client_info(&headers, Some(peer));

        assert_eq!(info.ip_address, "203.0.113.7");
        assert_eq!(info.device_info, "iPhone");
    }

    #[test]
    fn test_falls_back_to_peer_address() {
        let peer: SocketAddr = "192.0.2.10:55000".parse().unwrap();
        let info = client_info(&HeaderMap::new(), Some(peer));

        assert_eq!(info.ip_address, "192.0.2.10");
        assert_eq!(info.device_info, "");
    }

    #[test]
    fn test_unparseable_forwarded_for_falls_back_to_peer() {
        let peer: SocketAddr = "192.0.2.10:55000".parse().unwrap();
        let oversized = "1".repeat(65);

        for value in [oversized.as_str(), "not-an-ip", "unknown, 203.0.113.7", ""] {
            let mut headers = HeaderMap::new();
            headers.insert(FORWARDED_FOR_HEADER, HeaderValue::from_str(value).unwrap());

            let info = client_info(&headers, Some(peer));
            assert_eq!(info.ip_address, "192.0.2.10", "header {:?}", value);
        }
    }

    #[test]
    fn test_forwarded_for_ipv6_is_normalized() {
        let mut headers = HeaderMap::new();
        headers.insert(
            FORWARDED_FOR_HEADER,
            HeaderValue::from_static("2001:DB8:0:0:0:0:0:1"),
        );

        let info = client_info(&headers, None);
        assert_eq!(info.ip_address, "2001:db8::1");
    }

    #[test]
    fn test_unknown_without_any_source() {
        let info = client_info(&HeaderMap::new(), None);
        assert_eq!(info.ip_address, "unknown");
    }
}
