//! # Manager
//!
//! The shared runtime context coordinating the client, controllers, and the
//! operator metrics listener.
//!
//! Construction is split the way startup is sequenced: build a
//! [`ManagerConfig`] from the watch scope, construct the [`Manager`],
//! register resource types and controllers (each fatal on failure), then
//! [`Manager::start`] blocks until a termination signal or an error.

use std::future::Future;
use std::sync::Arc;

use futures::future::{join_all, BoxFuture};
use futures::StreamExt;
use kube::api::Api;
use kube::Client;
use kube_runtime::{watcher, Controller};
use thiserror::Error;
use tracing::{error, info};

use crate::config::WatchScope;
use crate::controller::{error_policy, reconcile, Context};
use crate::crd::KfDef;
use crate::observability::metrics;
use crate::observability::server::{start_server, wait_until_ready, ServerState};
use crate::scheme::{ResourceTypes, SchemeError};

/// Manager failure. Every variant is fatal to the process.
#[derive(Debug, Error)]
pub enum ManagerError {
    #[error("scheme registration failed: {0}")]
    SchemeRegistration(#[from] SchemeError),
    #[error("controller registration failed: {0}")]
    ControllerRegistration(String),
    #[error("manager exited non-zero: {0}")]
    Run(String),
}

/// How the manager caches and watches resources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheStrategy {
    /// One cache scoped by the config's namespace field (a single namespace,
    /// or the whole cluster when the field is empty)
    SingleScope,
    /// One cache per namespace in a fixed set
    MultiNamespace(Vec<String>),
}

/// Configuration consumed exactly once to construct the manager.
#[derive(Debug, Clone)]
pub struct ManagerConfig {
    /// Namespace the single-scope cache is bound to; `None` means all.
    /// Always `None` under [`CacheStrategy::MultiNamespace`]: a
    /// multi-namespace cache and a namespace-scoped cache are mutually
    /// exclusive configuration modes.
    pub namespace: Option<String>,
    /// Caching strategy derived from the watch scope
    pub cache: CacheStrategy,
    /// Bind address for the operator-process metrics listener
    pub metrics_bind_addr: String,
}

impl ManagerConfig {
    /// Derive manager options from the resolved watch scope.
    pub fn from_scope(scope: &WatchScope, metrics_bind_addr: String) -> Self {
        match scope {
            WatchScope::AllNamespaces => Self {
                namespace: None,
                cache: CacheStrategy::SingleScope,
                metrics_bind_addr,
            },
            WatchScope::SingleNamespace(ns) => Self {
                namespace: Some(ns.clone()),
                cache: CacheStrategy::SingleScope,
                metrics_bind_addr,
            },
            WatchScope::NamespaceSet(namespaces) => {
                info!(
                    "Manager set up with multiple namespaces: {}",
                    namespaces.join(",")
                );
                Self {
                    namespace: None,
                    cache: CacheStrategy::MultiNamespace(namespaces.clone()),
                    metrics_bind_addr,
                }
            }
        }
    }
}

/// The operator's shared runtime context.
///
/// Holds the client and the registered controller streams until
/// [`Manager::start`] drives them.
pub struct Manager {
    client: Client,
    config: ManagerConfig,
    controllers: Vec<BoxFuture<'static, ()>>,
}

impl std::fmt::Debug for Manager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Manager")
            .field("config", &self.config)
            .field("controllers", &self.controllers.len())
            .finish_non_exhaustive()
    }
}

impl Manager {
    pub fn new(client: Client, config: ManagerConfig) -> Self {
        Self {
            client,
            config,
            controllers: Vec::new(),
        }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn config(&self) -> &ManagerConfig {
        &self.config
    }

    /// Verify the operator's resource types against the cluster.
    ///
    /// Must succeed before controllers are registered; the controllers
    /// cannot watch a kind the cluster does not serve.
    pub async fn register_types(&self, types: &dyn ResourceTypes) -> Result<(), ManagerError> {
        types.verify(&self.client).await?;
        Ok(())
    }

    /// Wire the KfDef controller(s) to the manager's watch scope.
    ///
    /// Under a multi-namespace cache, one controller stream runs per
    /// namespace in the set.
    pub fn register_controllers(&mut self) -> Result<(), ManagerError> {
        let apis: Vec<Api<KfDef>> = match &self.config.cache {
            CacheStrategy::MultiNamespace(namespaces) => {
                if namespaces.is_empty() {
                    return Err(ManagerError::ControllerRegistration(
                        "multi-namespace cache configured with an empty namespace set".to_string(),
                    ));
                }
                namespaces
                    .iter()
                    .map(|ns| Api::namespaced(self.client.clone(), ns))
                    .collect()
            }
            CacheStrategy::SingleScope => match &self.config.namespace {
                Some(ns) => vec![Api::namespaced(self.client.clone(), ns)],
                None => vec![Api::all(self.client.clone())],
            },
        };

        let ctx = Arc::new(Context {
            client: self.client.clone(),
        });
        for api in apis {
            let controller = Controller::new(api, watcher::Config::default())
                .run(reconcile, error_policy, ctx.clone())
                .for_each(|res| async move {
                    match res {
                        Ok((obj, _action)) => info!("Reconciled {:?}", obj),
                        Err(e) => error!("KfDef reconcile error: {e}"),
                    }
                });
            self.controllers.push(Box::pin(controller));
        }

        info!(
            controllers = self.controllers.len(),
            "Registered controllers"
        );
        Ok(())
    }

    /// Start the manager and block until a termination signal or an error.
    ///
    /// Serves operator-process metrics, then drives every registered
    /// controller stream. Controller streams run until the process ends;
    /// one completing is itself an error.
    pub async fn start(self, shutdown: impl Future<Output = ()>) -> Result<(), ManagerError> {
        let state = Arc::new(ServerState::new());
        let addr = self.config.metrics_bind_addr.clone();
        let server_state = state.clone();
        let server_handle = tokio::spawn(async move {
            if let Err(e) = start_server(&addr, metrics::operator_registry(), server_state).await {
                error!("Metrics server error: {e}");
            }
        });
        wait_until_ready(&state, &server_handle)
            .await
            .map_err(|e| ManagerError::Run(e.to_string()))?;

        info!("Starting the manager");
        let controllers = join_all(self.controllers);

        tokio::select! {
            () = shutdown => {
                info!("Received termination signal, shutting down");
                Ok(())
            }
            _ = controllers => {
                Err(ManagerError::Run(
                    "controller streams terminated unexpectedly".to_string(),
                ))
            }
            _ = server_handle => {
                Err(ManagerError::Run(
                    "metrics server terminated unexpectedly".to_string(),
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn namespace_set_clears_namespace_and_uses_multi_namespace_cache() {
        let scope = WatchScope::NamespaceSet(vec!["team-a".to_string(), "team-b".to_string()]);
        let config = ManagerConfig::from_scope(&scope, "0.0.0.0:8383".to_string());
        assert_eq!(config.namespace, None);
        assert_eq!(
            config.cache,
            CacheStrategy::MultiNamespace(vec!["team-a".to_string(), "team-b".to_string()])
        );
    }

    #[test]
    fn single_namespace_scopes_the_cache() {
        let scope = WatchScope::SingleNamespace("kubeflow".to_string());
        let config = ManagerConfig::from_scope(&scope, "0.0.0.0:8383".to_string());
        assert_eq!(config.namespace.as_deref(), Some("kubeflow"));
        assert_eq!(config.cache, CacheStrategy::SingleScope);
    }

    #[test]
    fn all_namespaces_leaves_namespace_empty() {
        let config =
            ManagerConfig::from_scope(&WatchScope::AllNamespaces, "0.0.0.0:8383".to_string());
        assert_eq!(config.namespace, None);
        assert_eq!(config.cache, CacheStrategy::SingleScope);
    }
}
