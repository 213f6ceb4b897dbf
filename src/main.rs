//! Courseware - 课程章节编辑与发布后端

use std::sync::Arc;

use courseware::application::{
    AuthProviderPort, ChapterRepositoryPort, CourseRepositoryPort, MediaHostPort,
};
use courseware::config::{load_config, print_config, AppConfig, MediaHostKind, StoreBackend};
use courseware::infrastructure::adapters::{
    FakeMediaHost, HttpMediaHost, HttpMediaHostConfig, StaticTokenAuthProvider,
};
use courseware::infrastructure::events::EventPublisher;
use courseware::infrastructure::http::{AppState, HttpServer, ServerConfig};
use courseware::infrastructure::memory::{InMemoryChapterRepository, InMemoryCourseRepository};
use courseware::infrastructure::persistence::sqlite::{
    create_pool, run_migrations, DatabaseConfig, SqliteChapterRepository, SqliteCourseRepository,
};

type Repositories = (Arc<dyn CourseRepositoryPort>, Arc<dyn ChapterRepositoryPort>);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载配置（优先级：环境变量 > 配置文件 > 默认值）
    let config = load_config().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    init_tracing(&config);

    tracing::info!("Courseware - 课程章节编辑与发布后端");
    print_config(&config);

    let (course_repo, chapter_repo) = create_repositories(&config).await?;
    let media_host = create_media_host(&config)?;

    if !media_host.health_check().await {
        tracing::warn!("Media host health check failed, video operations may fail");
    }

    if config.auth.tokens.is_empty() {
        tracing::warn!("No auth tokens configured, every API call except ping will be rejected");
    }
    let auth_provider: Arc<dyn AuthProviderPort> =
        Arc::new(StaticTokenAuthProvider::new(
            config
                .auth
                .tokens
                .iter()
                .map(|entry| (entry.token.as_str(), entry.user_id.as_str())),
        ));

    // 创建事件发布器
    let event_publisher = Arc::new(EventPublisher::new());

    // 创建 HTTP 服务器
    let server_config = ServerConfig::new(&config.server.host, config.server.port);
    let state = AppState::new(
        course_repo,
        chapter_repo,
        media_host,
        auth_provider,
        event_publisher,
    );

    let server = HttpServer::new(server_config, state);

    // 启动服务器（带优雅关闭）
    server
        .run_with_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for ctrl-c");
            }
            tracing::info!("Received shutdown signal");
        })
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let log_filter = format!(
        "{},courseware={},tower_http=debug",
        config.log.level, config.log.level
    );
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter));

    if config.log.json {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

async fn create_repositories(config: &AppConfig) -> anyhow::Result<Repositories> {
    match config.database.backend {
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store, data is lost on restart");
            let course_repo: Arc<dyn CourseRepositoryPort> = InMemoryCourseRepository::new().arc();
            let chapter_repo: Arc<dyn ChapterRepositoryPort> =
                InMemoryChapterRepository::new().arc();
            Ok((course_repo, chapter_repo))
        }
        StoreBackend::Sqlite => {
            // 确保数据目录存在
            if let Some(parent) = std::path::Path::new(&config.database.path).parent() {
                tokio::fs::create_dir_all(parent).await?;
            }

            let db_config = DatabaseConfig {
                database_url: config.database.database_url(),
                max_connections: config.database.max_connections,
            };
            let pool = create_pool(&db_config).await?;
            run_migrations(&pool).await?;

            let course_repo: Arc<dyn CourseRepositoryPort> =
                Arc::new(SqliteCourseRepository::new(pool.clone()));
            let chapter_repo: Arc<dyn ChapterRepositoryPort> =
                Arc::new(SqliteChapterRepository::new(pool));
            Ok((course_repo, chapter_repo))
        }
    }
}

fn create_media_host(config: &AppConfig) -> anyhow::Result<Arc<dyn MediaHostPort>> {
    match config.media.kind {
        MediaHostKind::Fake => {
            tracing::warn!("Using fake media host, no videos are uploaded");
            Ok(Arc::new(FakeMediaHost::with_defaults()))
        }
        MediaHostKind::Http => {
            let media_config = HttpMediaHostConfig::new(config.media.base_url.clone())
                .with_credentials(
                    config.media.token_id.clone(),
                    config.media.token_secret.clone(),
                )
                .with_timeout(config.media.timeout_secs);
            Ok(Arc::new(HttpMediaHost::new(media_config)?))
        }
    }
}
