//! # 문자열 유틸리티
//!
//! 요청 입력 정규화에 쓰이는 함수들입니다.

use serde::Deserialize;

/// 이메일을 비교/저장용으로 정규화합니다 (앞뒤 공백 제거, 소문자).
///
/// 가입과 로그인이 같은 규칙을 써야 대소문자만 다른 중복 계정이 생기지 않습니다.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// 선택적 문자열 필드 정리
///
/// `None`, 빈 문자열, 공백뿐인 문자열은 모두 `None`이 됩니다.
///
/// ```rust,ignore
/// assert_eq!(clean_optional_string(Some("  Hello  ".to_string())), Some("Hello".to_string()));
/// assert_eq!(clean_optional_string(Some("   ".to_string())), None);
/// ```
pub fn clean_optional_string(value: Option<String>) -> Option<String> {
    value.and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// `#[serde(default, deserialize_with = "deserialize_optional_string")]`용 deserializer
///
/// 프로필 수정 요청에서 빈 값을 "변경 없음"으로 취급하기 위해 사용합니다.
pub fn deserialize_optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(clean_optional_string(opt))
}
