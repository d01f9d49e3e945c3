//! # Utilities
//!
//! - [`client_ip`] - 요청 한도 키로 쓰는 클라이언트 주소 추출
//! - [`string_utils`] - 입력 문자열 정규화
//! - [`token_utils`] - 토큰 해시와 로그용 지문

pub mod client_ip;
pub mod string_utils;
pub mod token_utils;
