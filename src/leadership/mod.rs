//! # Leader Election
//!
//! Exclusive-leadership coordination over a `coordination.k8s.io` Lease.
//!
//! Exactly one replica of this operator may reconcile at a time. Startup
//! blocks until this process holds the named lease; a coordination error
//! during acquisition aborts startup. Once held, the lease is renewed in the
//! background for the life of the process. Losing it exits the process so
//! the orchestrator restarts it into a fresh election.

use std::time::Duration;

use kube::Client;
use kube_leader_election::{LeaseLock, LeaseLockParams};
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::constants;

/// Leadership acquisition failure. Fatal to startup.
#[derive(Debug, Error)]
pub enum LeadershipError {
    #[error("failed to acquire leadership lease: {0}")]
    Acquisition(#[from] kube_leader_election::Error),
}

/// Exclusive ownership of the operator's leadership lease.
///
/// Held for the process lifetime; the lease is only released by process
/// exit. Dropping the token does not abdicate; the renewal task keeps
/// running until the process ends.
#[derive(Debug)]
pub struct LeadershipToken {
    /// Identity the lease is held under
    pub holder_id: String,
    renewal: JoinHandle<()>,
}

impl LeadershipToken {
    /// The background renewal task, for callers that want to observe a panic.
    pub fn renewal_handle(&self) -> &JoinHandle<()> {
        &self.renewal
    }
}

fn lease_lock(client: Client, namespace: &str, lock_name: &str, holder_id: &str) -> LeaseLock {
    LeaseLock::new(
        client,
        namespace,
        LeaseLockParams {
            holder_id: holder_id.to_string(),
            lease_name: lock_name.to_string(),
            lease_ttl: Duration::from_secs(constants::LEASE_TTL_SECS),
        },
    )
}

/// Block until this process holds the named leadership lease.
///
/// Waiting out another healthy holder is the normal acquire path and loops
/// indefinitely; an error from the coordination API is returned immediately
/// and must abort startup. There is no error-retry loop here.
pub async fn become_leader(
    client: Client,
    namespace: &str,
    lock_name: &str,
    holder_id: &str,
) -> Result<LeadershipToken, LeadershipError> {
    info!(
        holder_id = %holder_id,
        namespace = %namespace,
        lease_name = %lock_name,
        "Waiting to acquire leadership"
    );

    let lock = lease_lock(client.clone(), namespace, lock_name, holder_id);
    loop {
        let result = lock.try_acquire_or_renew().await?;
        if result.acquired_lease {
            info!("Acquired leadership");
            break;
        }
        info!("Another instance holds the lease, waiting...");
        tokio::time::sleep(Duration::from_secs(constants::LEASE_RENEW_INTERVAL_SECS)).await;
    }

    // Renew for the life of the process. Losing the lease means another
    // replica may already be active, so the only safe move is to exit and
    // re-enter the election on restart.
    let renewal_lock = lease_lock(client, namespace, lock_name, holder_id);
    #[allow(clippy::exit)]
    let renewal = tokio::spawn(async move {
        loop {
            tokio::time::sleep(Duration::from_secs(constants::LEASE_RENEW_INTERVAL_SECS)).await;
            match renewal_lock.try_acquire_or_renew().await {
                Ok(result) if result.acquired_lease => {}
                Ok(_) => {
                    error!("Lost leadership lease, shutting down");
                    std::process::exit(1);
                }
                Err(e) => {
                    error!("Failed to renew leadership lease: {e}, shutting down");
                    std::process::exit(1);
                }
            }
        }
    });

    Ok(LeadershipToken {
        holder_id: holder_id.to_string(),
        renewal,
    })
}
