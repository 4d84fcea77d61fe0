//! # Initialization
//!
//! The ordered startup pipeline: rustls setup, tracing, configuration,
//! client construction, leader election, manager construction and
//! registration, then metrics publication.
//!
//! Each step returns a result; the pipeline short-circuits on the first
//! fatal error and proceeds past the non-fatal ones (watch-namespace
//! resolution and everything inside metrics publication). Only `main`
//! converts a fatal error into a process exit.

use kube::Client;
use thiserror::Error;
use tracing::info;

use crate::config::{pod_identity, Cli, OperatorConfig};
use crate::constants;
use crate::controller;
use crate::leadership::{become_leader, LeadershipError, LeadershipToken};
use crate::manager::{Manager, ManagerConfig, ManagerError};
use crate::observability::{exposure, metrics};
use crate::scheme::KfDefTypes;

/// Fatal startup failure. Each variant aborts the process with exit code 1.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to construct Kubernetes client: {0}")]
    Client(#[source] kube::Error),
    #[error("failed to register metrics: {0}")]
    Metrics(#[from] prometheus::Error),
    #[error(transparent)]
    Leadership(#[from] LeadershipError),
    #[error(transparent)]
    Manager(#[from] ManagerError),
}

/// Everything the run loop needs, produced by [`initialize`].
#[derive(Debug)]
pub struct Initialized {
    /// The constructed manager, ready to start
    pub manager: Manager,
    /// Leadership token; held (not used) for the process lifetime
    pub leadership: LeadershipToken,
    /// Resolved operator configuration
    pub config: OperatorConfig,
}

/// Run the startup pipeline.
///
/// Sequence: namespace resolution (degrades to all-namespaces on failure) →
/// client construction → leader election → manager construction → scheme and
/// controller registration → metrics publication (best-effort). The caller
/// starts the returned manager.
pub async fn initialize(cli: &Cli) -> Result<Initialized, StartupError> {
    // Configure rustls crypto provider FIRST, before any other operations
    // Required for rustls 0.23+ when no default provider is set via features
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kfdef_operator=info".into()),
        )
        .init();

    info!("Starting KfDef operator v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Build info: timestamp={}, datetime={}, git_hash={}",
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_DATETIME"),
        env!("BUILD_GIT_HASH")
    );

    // Namespace resolution degrades to all-namespaces with a warning.
    let config = OperatorConfig::from_env().with_overrides(cli);
    info!(scope = ?config.watch_scope, "Resolved watch scope");

    metrics::register_metrics()?;

    let client = Client::try_default().await.map_err(StartupError::Client)?;

    // Become the leader before proceeding
    let holder_id = pod_identity();
    let leadership = become_leader(
        client.clone(),
        &config.operator_namespace,
        constants::LEADER_LOCK_NAME,
        &holder_id,
    )
    .await?;
    metrics::set_leader(true);

    let manager_config = ManagerConfig::from_scope(&config.watch_scope, config.metrics_addr());
    let mut manager = Manager::new(client.clone(), manager_config);

    info!("Registering components");
    manager.register_types(&KfDefTypes).await?;
    manager.register_controllers()?;

    // Observability only; every failure inside is log-and-continue.
    exposure::publish(
        &client,
        &KfDefTypes,
        &controller::watched_resources(),
        &config,
    )
    .await;

    Ok(Initialized {
        manager,
        leadership,
        config,
    })
}
