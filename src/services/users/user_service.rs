//! # 사용자 서비스
//!
//! 회원가입, 로그인, 로그아웃, 프로필 관리를 담당합니다.
//!
//! ```text
//! register ──► 비밀번호 해싱 ──► (Admin) AdminQuotaGuard::create_within_quota
//!                              └► (그 외) UserStore::create
//!
//! login ──► find_by_email ──► PasswordCodec::verify ──► TokenService::issue
//!
//! logout ──► TokenService::read_unverified_claims ──► 남은 유효 시간 ──► RevocationStore::revoke
//! ```
//!
//! ## 보안 설계
//!
//! - **가입 여부 비노출**: 없는 이메일과 틀린 비밀번호는 같은 `InvalidCredentials`이며,
//!   없는 이메일도 같은 비용의 bcrypt 검증을 수행합니다.
//! - **subject는 uuid**: 토큰에는 저장소 기본 키 대신 변하지 않는 uuid를 담습니다.
//! - **무효화 실패는 숨기지 않음**: 로그아웃 시 캐시에 기록하지 못하면 `CacheUnavailable`을 반환합니다.

use super::admin_quota::AdminQuotaGuard;
use crate::core::clock::Clock;
use crate::core::errors::{AppError, AppResult};
use crate::domain::dto::users::request::{LoginRequest, RegisterRequest, UpdateProfileRequest};
use crate::domain::dto::users::response::{LoginResponse, PageMeta, PaginatedResponse, UserProfile};
use crate::domain::entities::users::{Role, User};
use crate::repositories::tokens::RevocationStore;
use crate::repositories::users::UserStore;
use crate::services::auth::{PasswordCodec, TokenService};
use crate::utils::string_utils::{clean_optional_string, normalize_email};
use crate::utils::token_utils::token_fingerprint;
use std::sync::Arc;

#[derive(Clone)]
pub struct UserService {
    store: Arc<dyn UserStore>,
    passwords: PasswordCodec,
    tokens: TokenService,
    revocations: RevocationStore,
    admin_quota: AdminQuotaGuard,
    clock: Arc<dyn Clock>,
}

impl UserService {
    pub fn new(
        store: Arc<dyn UserStore>,
        passwords: PasswordCodec,
        tokens: TokenService,
        revocations: RevocationStore,
        admin_quota: AdminQuotaGuard,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            passwords,
            tokens,
            revocations,
            admin_quota,
            clock,
        }
    }

    /// 새 계정을 등록합니다.
    ///
    /// 관리자 등록은 할당량 잠금 안에서 개수를 확인한 뒤 생성합니다.
    ///
    /// # Arguments
    ///
    /// * `request` - 검증을 마친 가입 요청
    /// * `role` - 부여할 역할
    ///
    /// # Errors
    ///
    /// * `AppError::ConflictError` - 이메일 중복
    /// * `AppError::QuotaExceeded` - 관리자 상한 도달
    /// * `AppError::EncodingError` - 비밀번호 해싱 실패
    /// * `AppError::PersistenceError` / `AppError::CacheUnavailable` - 인프라 장애
    pub async fn register(&self, request: RegisterRequest, role: Role) -> AppResult<UserProfile> {
        let email = normalize_email(&request.email);

        if self.store.find_by_email(&email).await?.is_some() {
            log::warn!("중복 이메일로 가입 시도: {}", email);
            return Err(AppError::ConflictError("이미 사용 중인 이메일입니다".to_string()));
        }

        let password_hash = self.passwords.hash(&request.password)?;
        let user = User::new(
            request.name.trim().to_string(),
            email,
            clean_optional_string(request.phone_number),
            password_hash,
            role,
        );

        let created = match role {
            Role::Admin => self.admin_quota.create_within_quota(user).await?,
            _ => self.store.create(user).await?,
        };

        log::info!("계정 생성: {} ({})", created.uuid, created.role);
        Ok(UserProfile::from(created))
    }

    /// 이메일과 비밀번호로 로그인하고 토큰을 발급합니다.
    ///
    /// # Errors
    ///
    /// * `AppError::InvalidCredentials` - 이메일이 없거나 비밀번호가 틀린 경우 (구분하지 않음)
    /// * `AppError::PersistenceError` - 저장소 장애
    pub async fn login(&self, request: LoginRequest) -> AppResult<LoginResponse> {
        let email = normalize_email(&request.email);

        let user = match self.store.find_by_email(&email).await? {
            Some(user) => user,
            None => {
                self.passwords.verify_absent(&request.password);
                log::warn!("로그인 실패: 알 수 없는 이메일");
                return Err(AppError::InvalidCredentials);
            }
        };

        if !self.passwords.verify(&request.password, &user.password_hash) {
            log::warn!("로그인 실패: 비밀번호 불일치 ({})", user.uuid);
            return Err(AppError::InvalidCredentials);
        }

        let issued = self.tokens.issue(&user.uuid, user.role)?;
        log::info!("로그인 성공: {} ({})", user.uuid, user.role);

        Ok(LoginResponse::new(issued.token, issued.expires_at, user))
    }

    /// 제시된 토큰을 남은 유효 시간 동안 무효화합니다.
    ///
    /// 접근 가드를 이미 통과한 토큰에 대해서만 호출됩니다. 만료 시각은 서명 검증 없이 읽으며,
    /// 그 값은 TTL 계산에만 사용합니다.
    ///
    /// # Errors
    ///
    /// * `AppError::TokenInvalidSignature` - 만료 시각을 읽을 수 없는 토큰
    /// * `AppError::CacheUnavailable` - 무효화 목록에 기록하지 못한 경우
    pub async fn logout(&self, token: &str) -> AppResult<()> {
        let claims = self.tokens.read_unverified_claims(token)?;
        let remaining = claims.remaining_lifetime(self.clock.now());

        self.revocations.revoke(token, remaining).await?;
        log::info!("로그아웃: {}", token_fingerprint(token));
        Ok(())
    }

    /// 토큰 subject로 프로필을 조회합니다.
    ///
    /// # Errors
    ///
    /// * `AppError::NotFound` - 토큰 발급 이후 사용자가 사라진 경우
    pub async fn profile(&self, subject: &str) -> AppResult<UserProfile> {
        self.find_by_subject(subject).await.map(UserProfile::from)
    }

    /// 이름, 전화번호, 비밀번호를 선택적으로 변경합니다. 비어 있는 값은 변경하지 않습니다.
    ///
    /// # Errors
    ///
    /// * `AppError::NotFound` - 사용자가 없는 경우
    /// * `AppError::EncodingError` - 새 비밀번호 해싱 실패
    pub async fn update_profile(
        &self,
        subject: &str,
        request: UpdateProfileRequest,
    ) -> AppResult<UserProfile> {
        let mut user = self.find_by_subject(subject).await?;

        if let Some(name) = clean_optional_string(request.name) {
            user.name = name;
        }
        if let Some(phone_number) = clean_optional_string(request.phone_number) {
            user.phone_number = Some(phone_number);
        }
        if let Some(password) = request.password.filter(|p| !p.is_empty()) {
            user.password_hash = self.passwords.hash(&password)?;
            log::info!("비밀번호 변경: {}", user.uuid);
        }

        user.touch();
        self.store.update(&user).await?;
        Ok(UserProfile::from(user))
    }

    /// 관리자 목록을 페이지 단위로 조회합니다.
    pub async fn list_admins(&self, page: u64, limit: u64) -> AppResult<PaginatedResponse<UserProfile>> {
        let (admins, total) = self.store.find_by_role(Role::Admin, page, limit).await?;

        Ok(PaginatedResponse {
            data: admins.into_iter().map(UserProfile::from).collect(),
            meta: PageMeta { page, limit, total },
        })
    }

    async fn find_by_subject(&self, subject: &str) -> AppResult<User> {
        self.store
            .find_by_uuid(subject)
            .await?
            .ok_or_else(|| AppError::NotFound("사용자를 찾을 수 없습니다".to_string()))
    }
}
