//! 프로필 수정 및 목록 조회 요청 DTO

use serde::Deserialize;
use validator::Validate;

/// 프로필 수정 요청
///
/// 모든 필드는 선택입니다. 값이 없거나 빈 문자열인 필드는 변경하지 않습니다.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(max = 100, message = "이름은 100자 이하여야 합니다"))]
    pub name: Option<String>,

    #[validate(length(max = 20, message = "전화번호는 20자 이하여야 합니다"))]
    pub phone_number: Option<String>,

    #[validate(custom(function = "validate_new_password"))]
    pub password: Option<String>,
}

fn validate_new_password(password: &str) -> Result<(), validator::ValidationError> {
    if !password.is_empty() && !(8..=72).contains(&password.len()) {
        return Err(validator::ValidationError::new("password_length")
            .with_message("비밀번호는 8-72자 사이여야 합니다".into()));
    }
    Ok(())
}

/// 페이지 조회 쿼리 (`?page=1&limit=10`)
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ListQuery {
    #[serde(default = "default_page")]
    #[validate(range(min = 1, message = "page는 1 이상이어야 합니다"))]
    pub page: u64,

    #[serde(default = "default_limit")]
    #[validate(range(min = 1, max = 100, message = "limit은 1-100 사이여야 합니다"))]
    pub limit: u64,
}

fn default_page() -> u64 {
    1
}

fn default_limit() -> u64 {
    10
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_password_means_unchanged() {
        let request = UpdateProfileRequest {
            password: Some(String::new()),
            ..Default::default()
        };
        assert!(request.validate().is_ok());

        let request = UpdateProfileRequest {
            password: Some("short".into()),
            ..Default::default()
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_list_query_defaults() {
        let query: ListQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(query.page, 1);
        assert_eq!(query.limit, 10);
        assert!(query.validate().is_ok());
    }
}
