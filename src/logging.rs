//=============================================
// solvra_gremlin/src/logging.rs
//=============================================
// Author: ZobieLabs
// License: Duality Public License (DPL v1.0)
// Goal: Tracing setup for binaries and tests embedding the traversal core
// Objective: One subscriber per process, verbose only for the component
//            the caller is working on
//=============================================

use std::sync::OnceLock;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::SubscriberBuilder;

/// Checked before `RUST_LOG`.
pub const LOG_ENV: &str = "SOLVRA_GREMLIN_LOG";

static INIT: OnceLock<String> = OnceLock::new();

/// Default directives for `component`, a module path inside this crate such
/// as `strategy` or `step::choose`. That module logs at `debug`, the rest of
/// the process at `warn`. An empty component gives plain `warn`.
pub fn directives(component: &str) -> String {
    let component = component.trim().trim_matches(':');
    if component.is_empty() {
        "warn".to_string()
    } else {
        format!("warn,{}::{component}=debug", env!("CARGO_CRATE_NAME"))
    }
}

fn filter(component: &str) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(directives(component)))
}

/// Installs the subscriber, scoped to `component`. Environment directives
/// win over the component default. Only the first call installs anything;
/// the returned label is the component that did.
pub fn init(component: &str) -> &'static str {
    let installed = INIT.get_or_init(|| {
        // Another subscriber may already own the process; keep it.
        let _ = SubscriberBuilder::default()
            .with_env_filter(filter(component))
            .with_target(true)
            .compact()
            .try_init();
        component.to_string()
    });
    if installed.as_str() != component {
        tracing::debug!(requested = component, installed = %installed, "tracing already initialised");
    }
    installed.as_str()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn component_scopes_debug_output() {
        assert_eq!(directives("strategy"), "warn,solvra_gremlin::strategy=debug");
        assert_eq!(directives("::step::choose"), "warn,solvra_gremlin::step::choose=debug");
        assert_eq!(directives("  "), "warn");
    }

    #[test]
    fn first_component_wins() {
        let first = init("ring");
        assert_eq!(init("step"), first);
    }
}
