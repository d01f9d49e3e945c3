//! 인증 요청관련 DTO
//!
//! 회원가입과 로그인 요청 정보를 매핑합니다.

use serde::Deserialize;
use validator::Validate;

/// 회원가입 요청 구조체
///
/// 관리자/고객 회원가입이 같은 형태를 사용하며, 역할은 라우트가 결정합니다.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 100, message = "이름은 1-100자 사이여야 합니다"))]
    pub name: String,

    #[validate(email(message = "유효한 이메일 주소를 입력해주세요"))]
    pub email: String,

    #[validate(length(min = 6, max = 20, message = "전화번호는 6-20자 사이여야 합니다"))]
    pub phone_number: Option<String>,

    #[validate(length(min = 8, max = 72, message = "비밀번호는 8-72자 사이여야 합니다"))]
    pub password: String,
}

/// 로컬 로그인 요청 구조체
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "유효한 이메일 주소를 입력해주세요"))]
    pub email: String,

    #[validate(length(min = 1, message = "비밀번호를 입력해주세요"))]
    pub password: String,
}
