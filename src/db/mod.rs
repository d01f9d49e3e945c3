//! Database Connection Management Module
//!
//! MongoDB 연결을 관리합니다. 사용자 계정은 관계형 저장소 협력자로 취급되며,
//! 이 모듈은 연결 수립과 상태 확인만 담당합니다.
//!
//! ```rust,ignore
//! use crate::db::Database;
//!
//! let config = AppConfig::from_env()?;
//! let database = Database::connect(&config.database).await?;
//! let store = MongoUserStore::new(&database).await?;
//! ```

use crate::config::DatabaseConfig;
use crate::core::errors::{AppError, AppResult};
use log::info;
use mongodb::{Client, bson::doc, options::ClientOptions};

/// MongoDB 데이터베이스 연결 래퍼
#[derive(Clone)]
pub struct Database {
    client: Client,
    database_name: String,
}

impl Database {
    /// 새 MongoDB 연결을 생성하고 `ping`으로 가용성을 확인합니다.
    ///
    /// # Errors
    ///
    /// * `AppError::PersistenceError` - URI 파싱 실패 또는 서버에 연결할 수 없는 경우
    pub async fn connect(config: &DatabaseConfig) -> AppResult<Self> {
        let mut client_options = ClientOptions::parse(&config.mongodb_uri)
            .await
            .map_err(|e| AppError::PersistenceError(format!("MongoDB URI 파싱 실패: {}", e)))?;

        client_options.app_name = Some("identity_service".to_string());

        let client = Client::with_options(client_options)
            .map_err(|e| AppError::PersistenceError(format!("MongoDB 클라이언트 생성 실패: {}", e)))?;

        client
            .database(&config.database_name)
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| AppError::PersistenceError(format!("MongoDB 연결 실패: {}", e)))?;

        info!("✅ MongoDB 연결 성공: {}", config.database_name);

        Ok(Self {
            client,
            database_name: config.database_name.clone(),
        })
    }

    /// 리포지토리가 컬렉션에 접근할 때 사용하는 `mongodb::Database`
    pub fn get_database(&self) -> mongodb::Database {
        self.client.database(&self.database_name)
    }

    /// 데이터베이스 이름을 반환합니다.
    pub fn database_name(&self) -> &str {
        &self.database_name
    }
}
