//! IP 地址处理工具
//!
//! - 点分 IPv4 文本 ⇄ 保序整数编码（GeoIP 范围索引使用）
//! - IP 段字符串解析为 `(start, end)`
//! - 客户端 IP 提取（日志使用）

use std::net::IpAddr;

use actix_web::HttpRequest;

use crate::errors::{LookupError, Result};

/// Leading digit that keeps every encoded address 13 digits wide.
const ENCODING_PREFIX: i64 = 1_000_000_000_000;

/// Parse `A.B.C.D` where every group is 1–3 ASCII digits.
///
/// Groups are not range checked against 255; the codec only needs them to
/// be three digits wide at most.
fn parse_quad(text: &str) -> Option<[i64; 4]> {
    let mut octets = [0i64; 4];
    let mut parts = text.split('.');

    for octet in octets.iter_mut() {
        let part = parts.next()?;
        if part.is_empty() || part.len() > 3 || !part.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        *octet = part.parse().ok()?;
    }

    if parts.next().is_some() {
        return None;
    }
    Some(octets)
}

fn pack(octets: [i64; 4]) -> i64 {
    ENCODING_PREFIX
        + octets[0] * 1_000_000_000
        + octets[1] * 1_000_000
        + octets[2] * 1_000
        + octets[3]
}

/// 检查是否为点分四段格式
pub fn is_dotted_quad(text: &str) -> bool {
    parse_quad(text).is_some()
}

/// Encode dotted-quad text into an order-preserving integer.
///
/// Every octet is zero padded to three digits and the digits are prefixed
/// with `1`, so `0.0.0.1` becomes `1000000000001`.
pub fn encode(text: &str) -> Result<i64> {
    parse_quad(text)
        .map(pack)
        .ok_or_else(|| LookupError::malformed_address(format!("not a dotted quad: {:?}", text)))
}

/// Decode an IP block such as `"1.2.3.4 - 1.2.3.10"` into encoded endpoints.
///
/// Surrounding whitespace is ignored and any run of spaces and dashes
/// (possibly empty) separates the two addresses.
pub fn decode_range(text: &str) -> Result<(i64, i64)> {
    let malformed = || LookupError::malformed_range(format!("not an IP range: {:?}", text));
    let trimmed = text.trim();

    // 前三段固定，第四段按 3→1 位尝试，和正则回溯行为一致
    let mut dots = trimmed.match_indices('.').map(|(i, _)| i);
    let third_dot = dots.nth(2).ok_or_else(malformed)?;
    let head = &trimmed[..=third_dot];

    let tail_digits = trimmed[third_dot + 1..]
        .bytes()
        .take_while(u8::is_ascii_digit)
        .count();

    for len in (1..=tail_digits.min(3)).rev() {
        let split = third_dot + 1 + len;
        let Some(start) = parse_quad(&format!("{}{}", head, &trimmed[third_dot + 1..split]))
        else {
            continue;
        };
        let rest = trimmed[split..].trim_start_matches(|c: char| c.is_whitespace() || c == '-');
        if let Some(end) = parse_quad(rest) {
            return Ok((pack(start), pack(end)));
        }
    }

    Err(malformed())
}

/// 检查 IP 是否为私有地址或 localhost
pub fn is_private_or_local(ip: &IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => v4.is_private() || v4.is_loopback(),
        IpAddr::V6(v6) => {
            v6.is_loopback()
                || (v6.segments()[0] & 0xfe00) == 0xfc00 // fc00::/7
                || (v6.segments()[0] & 0xffc0) == 0xfe80 // fe80::/10
        }
    }
}

/// 从 HttpRequest 提取客户端 IP（仅用于日志）
///
/// 连接来自私有地址时认为前面有反向代理，使用 X-Forwarded-For / X-Real-IP。
pub fn extract_client_ip(req: &HttpRequest) -> Option<String> {
    let conn_info = req.connection_info();
    let peer_ip = conn_info.peer_addr()?.to_string();

    if let Ok(ip_addr) = peer_ip.parse::<IpAddr>()
        && is_private_or_local(&ip_addr)
        && let Some(forwarded) = extract_forwarded_ip_from_headers(req.headers())
    {
        return Some(forwarded);
    }

    Some(peer_ip)
}

/// 从 HeaderMap 提取转发的 IP
pub fn extract_forwarded_ip_from_headers(
    headers: &actix_web::http::header::HeaderMap,
) -> Option<String> {
    headers
        .get("x-forwarded-for")
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.split(',').next())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .or_else(|| {
            headers
                .get("x-real-ip")
                .and_then(|h| h.to_str().ok())
                .map(String::from)
        })
}
