//! 신원 서비스 메인 애플리케이션
//!
//! 설정을 읽고 MongoDB, Redis에 연결한 뒤 `AppState`를 조립하여 HTTP 서버를 구동합니다.

use std::io;
use std::sync::Arc;

use actix_cors::Cors;
use actix_web::http::header;
use actix_web::{App, HttpServer, middleware, web};
use dotenv::dotenv;
use env_logger::Env;
use identity_service::caching::CacheStore;
use identity_service::caching::redis::RedisClient;
use identity_service::config::AppConfig;
use identity_service::core::{AppState, SystemClock};
use identity_service::db::Database;
use identity_service::repositories::users::{MongoUserStore, UserStore};
use identity_service::routes::configure_all_routes;
use log::{error, info};

#[actix_web::main]
async fn main() -> io::Result<()> {
    init_logging();
    load_env_file();

    info!("🚀 신원 서비스 시작중...");

    let config = AppConfig::from_env().map_err(|e| {
        error!("설정 로드 실패: {}", e);
        io::Error::other(e.to_string())
    })?;

    let (store, cache) = initialize_data_stores(&config).await?;
    let server_config = config.server.clone();

    let state = AppState::build(config, cache, store, Arc::new(SystemClock)).map_err(|e| {
        error!("서비스 초기화 실패: {}", e);
        io::Error::other(e.to_string())
    })?;

    info!("✅ 모든 서비스가 성공적으로 초기화되었습니다!");

    let bind_address = format!("{}:{}", server_config.host, server_config.port);
    info!("🌐 서버가 http://{} 에서 실행중입니다", bind_address);
    info!("📍 Health check: http://{}/health", bind_address);

    let state = web::Data::new(state);
    let mut server = HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(configure_cors())
            .wrap(middleware::Logger::default())
            .wrap(middleware::NormalizePath::trim())
            .configure(configure_all_routes)
    })
    .bind(&bind_address)?;

    if let Some(workers) = server_config.workers {
        server = server.workers(workers);
    }

    server.run().await
}

/// 환경별 설정 파일을 로드합니다
///
/// # Environment Variables
///
/// * `PROFILE=dev` - .env.dev 파일 로드 (기본값)
/// * `PROFILE=prod` - .env.prod 파일 로드
/// * 기타 - 기본 .env 파일 로드
fn load_env_file() {
    let profile = std::env::var("PROFILE").unwrap_or_else(|_| "dev".to_string());

    info!("Current profile: {}", profile);

    match profile.as_str() {
        "prod" => match dotenv::from_filename(".env.prod") {
            Ok(_) => info!(".env.prod 파일 로드 됨"),
            Err(e) => error!(".env.prod 파일 로드 실패: {}", e),
        },
        "dev" => match dotenv::from_filename(".env.dev") {
            Ok(_) => info!(".env.dev 파일 로드 됨"),
            Err(e) => error!(".env.dev 파일 로드 실패: {}", e),
        },
        _ => {
            dotenv().ok();
            info!("기본 .env 파일 로드");
        }
    }
}

/// 로깅 시스템을 초기화합니다
///
/// * `RUST_LOG` - 로깅 레벨 설정 (기본값: "info,actix_web=info")
fn init_logging() {
    env_logger::init_from_env(Env::default().default_filter_or("info,actix_web=info"));
}

/// MongoDB 사용자 저장소와 Redis 캐시를 준비합니다
///
/// # Errors
///
/// 어느 한쪽이라도 연결할 수 없으면 시작을 중단합니다.
async fn initialize_data_stores(
    config: &AppConfig,
) -> io::Result<(Arc<dyn UserStore>, Arc<dyn CacheStore>)> {
    info!("📡 데이터베이스 연결 중...");

    let database = Database::connect(&config.database)
        .await
        .map_err(|e| io::Error::other(format!("데이터베이스 연결 실패: {}", e)))?;
    let store: Arc<dyn UserStore> = MongoUserStore::new(&database)
        .await
        .map(Arc::new)
        .map_err(|e| io::Error::other(format!("사용자 저장소 초기화 실패: {}", e)))?;

    info!("✅ MongoDB 연결 성공 ({})", database.database_name());

    let cache: Arc<dyn CacheStore> = RedisClient::connect(&config.cache)
        .await
        .map(Arc::new)
        .map_err(|e| io::Error::other(format!("Redis 연결 실패: {}", e)))?;


    Ok((store, cache))
}

/// CORS 설정을 구성합니다
///
/// # Allowed Origins
///
/// * `http://localhost:3000` - 프론트엔드 개발 서버
/// * `http://localhost:8080` - 자체 서버
/// * `127.0.0.1` 동등한 주소들
fn configure_cors() -> Cors {
    Cors::default()
        .allowed_origin("http://localhost:3000")
        .allowed_origin("http://127.0.0.1:3000")
        .allowed_origin("http://localhost:8080")
        .allowed_origin("http://127.0.0.1:8080")
        .allowed_methods(vec!["GET", "POST", "OPTIONS"])
        .allowed_headers(vec![
            header::AUTHORIZATION,
            header::ACCEPT,
            header::CONTENT_TYPE,
        ])
        .expose_headers(vec![header::RETRY_AFTER])
        .supports_credentials()
        .max_age(3600)
}
