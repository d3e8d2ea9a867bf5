//! DNS resolver initialization.
//!
//! Full resolution (parent NS sets, nameserver addresses) goes through a
//! `hickory-resolver` [`TokioAsyncResolver`] over every configured
//! nameserver, so one dead resolver does not fail the run. Direct queries to
//! the nameservers under test bypass it.

use std::sync::Arc;
use std::time::Duration;

use hickory_resolver::config::{NameServerConfigGroup, ResolverConfig, ResolverOpts};
use hickory_resolver::TokioAsyncResolver;
use log::debug;

use crate::config::Config;
use crate::dns::{NetworkTransport, QueryClient};
use crate::error_handling::InitializationError;

/// Initializes the recursive resolver.
///
/// Uses `config.resolver` when given, otherwise the system configuration
/// (`/etc/resolv.conf` on Unix). Each nameserver gets one attempt per lookup
/// with the configured timeout, and names are never extended with search
/// domains.
///
/// # Errors
///
/// Returns `InitializationError::ResolverConfigError` if the system
/// configuration cannot be read or lists no nameserver.
pub fn init_resolver(config: &Config) -> Result<Arc<TokioAsyncResolver>, InitializationError> {
    let resolver_config = match config.resolver {
        Some(addr) => ResolverConfig::from_parts(
            None,
            vec![],
            NameServerConfigGroup::from_ips_clear(&[addr.ip()], addr.port(), true),
        ),
        None => {
            let (system, _opts) = hickory_resolver::system_conf::read_system_conf()
                .map_err(|e| InitializationError::ResolverConfigError(e.to_string()))?;
            system
        }
    };
    if resolver_config.name_servers().is_empty() {
        return Err(InitializationError::ResolverConfigError(
            "system configuration lists no nameserver".to_string(),
        ));
    }

    debug!(
        "Using recursive resolvers: {}",
        resolver_config
            .name_servers()
            .iter()
            .map(|ns| format!("{}/{:?}", ns.socket_addr, ns.protocol))
            .collect::<Vec<_>>()
            .join(", ")
    );
    Ok(Arc::new(build_resolver(
        resolver_config,
        Duration::from_secs(config.timeout_seconds),
    )))
}

fn build_resolver(config: ResolverConfig, timeout: Duration) -> TokioAsyncResolver {
    let mut opts = ResolverOpts::default();
    opts.timeout = timeout;
    opts.attempts = 1;
    // Names are always fully qualified; never try search domains
    opts.ndots = 0;
    TokioAsyncResolver::tokio(config, opts)
}

/// Builds the [`QueryClient`] used for a run: network transport for direct
/// queries, [`init_resolver`] for full resolution, per-query timeout from the
/// config.
///
/// # Errors
///
/// Returns `InitializationError::ResolverConfigError` if no resolver is
/// available.
pub fn init_query_client(config: &Config) -> Result<QueryClient, InitializationError> {
    let resolver = init_resolver(config)?;
    Ok(QueryClient::new(
        Arc::new(NetworkTransport::new()),
        resolver,
        Duration::from_secs(config.timeout_seconds),
    ))
}
