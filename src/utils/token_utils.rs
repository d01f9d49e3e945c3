//! # 토큰 관련 유틸리티
//!
//! 토큰 원문은 캐시 키나 로그에 그대로 남기지 않습니다.
//! 캐시 키에는 SHA-256 전체 해시를, 로그에는 앞 12자리 지문만 사용합니다.

use sha2::{Digest, Sha256};

/// 토큰의 SHA-256 해시 (소문자 hex)
pub fn token_hash(token: &str) -> String {
    format!("{:x}", Sha256::digest(token.as_bytes()))
}

/// 로그용 짧은 지문
pub fn token_fingerprint(token: &str) -> String {
    let mut hash = token_hash(token);
    hash.truncate(12);
    hash
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_is_stable_and_distinct() {
        assert_eq!(token_hash("abc"), token_hash("abc"));
        assert_ne!(token_hash("abc"), token_hash("abd"));
        assert_eq!(token_hash("abc").len(), 64);
    }

    #[test]
    fn test_fingerprint_is_prefix() {
        let fp = token_fingerprint("header.payload.signature");
        assert_eq!(fp.len(), 12);
        assert!(token_hash("header.payload.signature").starts_with(&fp));
    }
}
