//! # 클라이언트 식별
//!
//! 요청 한도 카운터의 키로 쓰이는 클라이언트 주소를 추출합니다.
//!
//! 기본은 소켓의 peer 주소입니다. 프록시 헤더는 호출자가 마음대로 채울 수 있으므로
//! peer가 `TRUSTED_PROXIES`에 있을 때만 읽습니다.
//!
//! ```text
//! peer 7.7.7.7 (신뢰 안 함)  X-Forwarded-For: 10.0.0.9      ──► ip:7.7.7.7
//! peer 10.0.0.2 (신뢰)       X-Forwarded-For: 1.1.1.1, 5.6.7.8 ──► ip:5.6.7.8
//! ```
//!
//! `X-Forwarded-For`는 오른쪽(가장 가까운 홉)부터 신뢰 프록시를 건너뛰고 처음 만나는 주소를 사용합니다.
//! 왼쪽 항목은 클라이언트가 위조할 수 있습니다.

use actix_web::http::header::HeaderMap;
use std::net::{IpAddr, SocketAddr};

const FORWARDED_FOR: &str = "X-Forwarded-For";

/// 신뢰 프록시가 단일 주소로 채우는 헤더 (확인 순서)
const SINGLE_ADDRESS_HEADERS: [&str; 3] = ["X-Real-IP", "X-Client-IP", "CF-Connecting-IP"];

/// 클라이언트 IP를 추출합니다.
///
/// # Arguments
///
/// * `headers` - 요청 헤더
/// * `peer` - 소켓 peer 주소
/// * `trusted_proxies` - 프록시 헤더를 믿어도 되는 peer 주소
pub fn extract_client_ip(
    headers: &HeaderMap,
    peer: Option<SocketAddr>,
    trusted_proxies: &[IpAddr],
) -> Option<IpAddr> {
    let peer_ip = peer.map(|addr| addr.ip())?;

    if !trusted_proxies.contains(&peer_ip) {
        return Some(peer_ip);
    }

    Some(forwarded_client(headers, trusted_proxies).unwrap_or(peer_ip))
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}

fn forwarded_client(headers: &HeaderMap, trusted_proxies: &[IpAddr]) -> Option<IpAddr> {
    let from_chain = header_str(headers, FORWARDED_FOR).and_then(|chain| {
        chain
            .rsplit(',')
            .filter_map(|hop| hop.trim().parse::<IpAddr>().ok())
            .find(|ip| !trusted_proxies.contains(ip))
    });

    from_chain.or_else(|| {
        SINGLE_ADDRESS_HEADERS
            .iter()
            .filter_map(|name| header_str(headers, name))
            .find_map(|value| value.trim().parse::<IpAddr>().ok())
    })
}

/// 요청 한도 카운터용 클라이언트 키 (`ip:<addr>`)
///
/// 주소를 알 수 없으면 `ip:unknown`으로 묶어서 집계합니다.
pub fn client_key(headers: &HeaderMap, peer: Option<SocketAddr>, trusted_proxies: &[IpAddr]) -> String {
    match extract_client_ip(headers, peer, trusted_proxies) {
        Some(ip) => format!("ip:{}", ip),
        None => "ip:unknown".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::header::{HeaderName, HeaderValue};

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(
                HeaderName::from_static(name),
                HeaderValue::from_static(value),
            );
        }
        map
    }

    fn addr(s: &str) -> SocketAddr {
        s.parse().unwrap()
    }

    fn proxies() -> Vec<IpAddr> {
        vec!["10.0.0.2".parse().unwrap(), "10.0.0.3".parse().unwrap()]
    }

    #[test]
    fn test_untrusted_peer_ignores_forwarding_headers() {
        let map = headers(&[("x-forwarded-for", "1.2.3.4"), ("x-real-ip", "9.9.9.9")]);
        let peer = Some(addr("7.7.7.7:5000"));

        assert_eq!(client_key(&map, peer, &[]), "ip:7.7.7.7");
        assert_eq!(client_key(&map, peer, &proxies()), "ip:7.7.7.7");
    }

    #[test]
    fn test_trusted_proxy_uses_nearest_untrusted_hop() {
        // 맨 왼쪽 1.1.1.1은 클라이언트가 직접 넣은 값
        let map = headers(&[("x-forwarded-for", "1.1.1.1, 5.6.7.8, 10.0.0.3")]);
        let peer = Some(addr("10.0.0.2:443"));

        assert_eq!(client_key(&map, peer, &proxies()), "ip:5.6.7.8");
    }

    #[test]
    fn test_trusted_proxy_real_ip_header() {
        let map = headers(&[("x-real-ip", "9.9.9.9")]);
        let peer = Some(addr("10.0.0.2:443"));
        assert_eq!(client_key(&map, peer, &proxies()), "ip:9.9.9.9");
    }

    #[test]
    fn test_trusted_proxy_without_usable_header_falls_back_to_peer() {
        let map = headers(&[("x-forwarded-for", "not-an-ip")]);
        let peer = Some(addr("10.0.0.2:443"));
        assert_eq!(client_key(&map, peer, &proxies()), "ip:10.0.0.2");
    }

    #[test]
    fn test_missing_peer_is_unknown() {
        let map = headers(&[("x-forwarded-for", "1.2.3.4")]);
        assert_eq!(client_key(&map, None, &proxies()), "ip:unknown");
        assert_eq!(client_key(&HeaderMap::new(), None, &[]), "ip:unknown");
    }
}
