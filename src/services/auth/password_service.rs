//! # 비밀번호 코덱
//!
//! bcrypt 기반 해싱/검증입니다. 공유 상태가 없는 순수 연산입니다.
//!
//! - **환경별 Cost**: `PasswordConfig::bcrypt_cost` (개발/테스트 4, 스테이징 10, 운영 12)
//! - **솔트 자동 생성**: bcrypt가 해시마다 고유 솔트를 생성
//! - **불일치는 에러가 아님**: `verify`는 불일치나 손상된 해시에 대해 `false`를 반환

use crate::config::PasswordConfig;
use crate::core::errors::{AppError, AppResult};

#[derive(Debug, Clone)]
pub struct PasswordCodec {
    cost: u32,
    /// 존재하지 않는 사용자 로그인 시 비교 대상으로 쓰는 해시
    dummy_hash: String,
}

impl PasswordCodec {
    /// # Errors
    ///
    /// * `AppError::EncodingError` - 비교용 해시 생성 실패 (난수 소스 장애)
    pub fn new(config: &PasswordConfig) -> AppResult<Self> {
        let cost = config.bcrypt_cost;
        let dummy_hash = bcrypt::hash("dummy-password-for-timing", cost)
            .map_err(|e| AppError::EncodingError(format!("비밀번호 해싱 실패: {}", e)))?;
        Ok(Self { cost, dummy_hash })
    }

    /// 평문 비밀번호를 해싱합니다.
    ///
    /// # Errors
    ///
    /// * `AppError::EncodingError` - 난수 소스 장애 등 해싱 자체가 불가능한 경우
    pub fn hash(&self, plaintext: &str) -> AppResult<String> {
        bcrypt::hash(plaintext, self.cost)
            .map_err(|e| AppError::EncodingError(format!("비밀번호 해싱 실패: {}", e)))
    }

    /// 평문이 해시와 일치하는지 확인합니다. 실패는 항상 `false`입니다.
    pub fn verify(&self, plaintext: &str, digest: &str) -> bool {
        match bcrypt::verify(plaintext, digest) {
            Ok(matches) => matches,
            Err(e) => {
                log::warn!("저장된 비밀번호 해시를 해석할 수 없습니다: {}", e);
                false
            }
        }
    }

    /// 존재하지 않는 사용자에 대해서도 같은 비용의 검증을 수행합니다.
    ///
    /// 응답 시간 차이로 가입 여부가 드러나지 않게 합니다. 결과는 항상 `false`입니다.
    pub fn verify_absent(&self, plaintext: &str) -> bool {
        let _ = self.verify(plaintext, &self.dummy_hash);
        false
    }
}
