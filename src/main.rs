use std::{future::IntoFuture, process, sync::Arc, time::Duration};

use inkpost::{
    application::{
        chrome::ChromeService,
        clock::SiteClock,
        csrf::CsrfGuard,
        error::AppError,
        posts::BlogPostService,
        repos::{BlogPostsRepo, BlogPostsWriteRepo},
    },
    config,
    infra::{
        db::SqliteRepositories,
        error::InfraError,
        http::{self, HttpState},
        telemetry,
    },
};
use tracing::{Dispatch, Level, dispatcher, error, info, warn};
use tracing_subscriber::fmt as tracing_fmt;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt().with_max_level(Level::ERROR).finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let (cli_args, settings) = config::load_with_cli()
        .map_err(|err| AppError::unexpected(format!("failed to load configuration: {err}")))?;

    let command = cli_args
        .command
        .unwrap_or(config::Command::Serve(Box::<config::ServeArgs>::default()));

    telemetry::init(&settings.logging).map_err(AppError::from)?;

    match command {
        config::Command::Serve(_) => run_serve(settings).await,
    }
}

async fn run_serve(settings: config::Settings) -> Result<(), AppError> {
    let repositories = init_repositories(&settings).await?;
    let http_state = build_http_state(repositories, &settings);

    info!(
        target = "inkpost::serve",
        addr = %settings.server.addr,
        database = %settings.database.url,
        timezone = %http_state.posts.clock().timezone(),
        "starting inkpost"
    );

    serve_http(&settings, http_state).await
}

async fn init_repositories(settings: &config::Settings) -> Result<Arc<SqliteRepositories>, AppError> {
    let pool = SqliteRepositories::connect(
        &settings.database.url,
        settings.database.max_connections.get(),
    )
    .await
    .map_err(|err| AppError::from(InfraError::database(err.to_string())))?;

    SqliteRepositories::run_migrations(&pool)
        .await
        .map_err(|err| AppError::from(InfraError::database(err.to_string())))?;

    Ok(Arc::new(SqliteRepositories::new(pool)))
}

fn build_http_state(repositories: Arc<SqliteRepositories>, settings: &config::Settings) -> HttpState {
    let posts_repo: Arc<dyn BlogPostsRepo> = repositories.clone();
    let posts_write_repo: Arc<dyn BlogPostsWriteRepo> = repositories.clone();

    let clock = SiteClock::new(settings.site.timezone);
    let csrf = match settings.site.secret_key.as_deref() {
        Some(secret) => CsrfGuard::new(secret),
        None => {
            warn!(
                target = "inkpost::serve",
                "site.secret_key is not set; using a random key, forms will not survive a restart"
            );
            CsrfGuard::ephemeral()
        }
    };

    HttpState {
        posts: Arc::new(BlogPostService::new(posts_repo, posts_write_repo, clock)),
        chrome: Arc::new(ChromeService::new(settings.site.title.clone(), clock)),
        csrf: Arc::new(csrf),
        db: repositories,
    }
}

async fn serve_http(settings: &config::Settings, http_state: HttpState) -> Result<(), AppError> {
    let router = http::build_router(http_state);

    let listener = tokio::net::TcpListener::bind(settings.server.addr)
        .await
        .map_err(|err| AppError::from(InfraError::from(err)))?;

    let server = axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .into_future();

    let grace = settings.server.graceful_shutdown;
    tokio::select! {
        result = server => {
            result.map_err(|err| AppError::unexpected(format!("server error: {err}")))?;
        }
        _ = shutdown_deadline(grace) => {
            warn!(
                target = "inkpost::serve",
                grace_seconds = grace.as_secs(),
                "in-flight requests did not finish within the grace period"
            );
        }
    }

    info!(target = "inkpost::serve", "server stopped");
    Ok(())
}

async fn shutdown_deadline(grace: Duration) {
    shutdown_signal().await;
    tokio::time::sleep(grace).await;
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(target = "inkpost::serve", error = %err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                error!(target = "inkpost::serve", error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
