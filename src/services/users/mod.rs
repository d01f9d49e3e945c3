//! 사용자 관리 서비스 모듈
//!
//! 사용자 생명주기와 관련된 비즈니스 로직을 담당합니다.
//!
//! # Features
//!
//! - 고객/관리자 등록 (관리자는 클러스터 단위 할당량 잠금)
//! - 로그인 및 로그아웃(토큰 무효화)
//! - 프로필 조회 및 수정
//!
//! # Security
//!
//! - bcrypt 비밀번호 해싱
//! - 이메일 중복 방지
//! - 로그인 실패 사유 비노출
//!
//! # Examples
//!
//! ```rust,ignore
//! let profile = state.users.register(request, Role::Customer).await?;
//! let login = state.users.login(credentials).await?;
//! ```

pub mod admin_quota;
pub mod user_service;

pub use admin_quota::AdminQuotaGuard;
pub use user_service::UserService;
