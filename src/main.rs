// src/main.rs
use anyhow::{Context, Result, bail};
use axum::{ServiceExt, body::Body};
use std::{net::SocketAddr, sync::Arc};
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use warden_core::application::{
    ports::{
        AssertionVerifierPort, ClockPort, OwnerAuthenticatorPort, SecretHasherPort,
        TokenGeneratorPort, security::SecretHasher,
    },
    services::ApplicationServices,
};
use warden_core::config::AppConfig;
use warden_core::domain::{
    client::ClientRepository,
    grant::{AuthorizationCodeRepository, TokenRepository},
};
use warden_core::infrastructure::{
    repositories::{
        InMemoryAuthorizationCodeRepository, InMemoryClientRepository, InMemoryTokenRepository,
        RedisAuthorizationCodeRepository, RedisStore, RedisTokenRepository,
    },
    security::{
        Argon2SecretHasher, HmacAssertionVerifier, RandomTokenGenerator,
        RejectingAssertionVerifier, StaticResourceOwnerDirectory,
    },
    time::SystemClock,
};
use warden_core::presentation::http::{routes::build_router, state::HttpState};

#[tokio::main]
async fn main() {
    let mut args = std::env::args().skip(1);
    let outcome = match args.next().as_deref() {
        None | Some("serve") => bootstrap().await,
        Some("hash-secret") => hash_secret(args.next()).await,
        Some(other) => Err(anyhow::anyhow!(
            "unknown command '{other}'; expected 'serve' or 'hash-secret <secret>'"
        )),
    };

    if let Err(err) = outcome {
        tracing::error!(error = %err, "fatal error");
        eprintln!("fatal error: {err:#}");
        std::process::exit(1);
    }
}

/// Print the PHC hash for a client secret or resource-owner password.
async fn hash_secret(secret: Option<String>) -> Result<()> {
    let Some(secret) = secret.filter(|s| !s.is_empty()) else {
        bail!("usage: warden_core hash-secret <secret>");
    };
    let hash = Argon2SecretHasher
        .hash(&secret)
        .await
        .context("hashing secret")?;
    println!("{hash}");
    Ok(())
}

async fn bootstrap() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = AppConfig::from_env()?;
    let services = Arc::new(build_services(&config).await?);

    let state = HttpState {
        services,
        issuer: config.issuer().to_string(),
    };

    let app = build_router(state);
    let service = app.into_service::<Body>().into_make_service();

    let listener = tokio::net::TcpListener::bind(config.listen_addr()).await?;
    let address: SocketAddr = listener.local_addr()?;
    tracing::info!(issuer = config.issuer(), "listening on {address}");

    axum::serve(listener, service)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn build_services(config: &AppConfig) -> Result<ApplicationServices> {
    let secret_hasher: Arc<SecretHasherPort> = Arc::new(Argon2SecretHasher);
    let token_generator: Arc<TokenGeneratorPort> = Arc::new(RandomTokenGenerator);
    let clock: Arc<ClockPort> = Arc::new(SystemClock);

    let clients = InMemoryClientRepository::from_file(config.clients_file())
        .with_context(|| format!("loading clients from {}", config.clients_file().display()))?;
    tracing::info!(clients = clients.len(), "client registry loaded");
    let client_repo: Arc<dyn ClientRepository> = Arc::new(clients);

    let (code_repo, token_repo): (
        Arc<dyn AuthorizationCodeRepository>,
        Arc<dyn TokenRepository>,
    ) = match config.redis_url() {
        Some(url) => {
            let store = RedisStore::from_url(url)?;
            store.ping().await.context("connecting to redis")?;
            tracing::info!("using redis code and token stores");
            (
                Arc::new(RedisAuthorizationCodeRepository::new(store.clone())),
                Arc::new(RedisTokenRepository::new(store)),
            )
        }
        None => {
            tracing::warn!("REDIS_URL not set; codes and tokens are kept in memory");
            (
                Arc::new(InMemoryAuthorizationCodeRepository::new(Arc::clone(&clock))),
                Arc::new(InMemoryTokenRepository::new(Arc::clone(&clock))),
            )
        }
    };

    let authenticator: Arc<OwnerAuthenticatorPort> = match config.resource_owners_file() {
        Some(path) => {
            let directory = StaticResourceOwnerDirectory::from_file(path, Arc::clone(&secret_hasher))
                .with_context(|| format!("loading resource owners from {}", path.display()))?;
            tracing::info!(owners = directory.len(), "resource owner directory loaded");
            Arc::new(directory)
        }
        None => {
            tracing::warn!("RESOURCE_OWNERS_FILE not set; resource owner logins are refused");
            Arc::new(StaticResourceOwnerDirectory::empty(Arc::clone(&secret_hasher)))
        }
    };

    let assertions: Arc<AssertionVerifierPort> = match config.assertion_hmac_secret() {
        Some(secret) => Arc::new(HmacAssertionVerifier::new(secret.as_bytes())),
        None => Arc::new(RejectingAssertionVerifier),
    };

    Ok(ApplicationServices::new(
        client_repo,
        code_repo,
        token_repo,
        secret_hasher,
        token_generator,
        authenticator,
        assertions,
        clock,
        config.service_policy()?,
    ))
}

fn init_tracing() {
    let env_filter = std::env::var("RUST_LOG")
        .ok()
        .unwrap_or_else(|| "info,tower_http=info".to_string());

    let subscriber = tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(env_filter))
        .with(tracing_subscriber::fmt::layer());

    if subscriber.try_init().is_err() {
        tracing::warn!("tracing subscriber already initialised");
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to install CTRL+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to install terminate handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
    tracing::info!("shutdown signal received");
}
