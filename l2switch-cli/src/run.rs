//! Switch startup and main loop

use l2switch_bridge::{Dispatcher, PortTable, Switch, SwitchConfig, SwitchStats};
use l2switch_core::{LinkTransport, Result};
use l2switch_link::PnetLink;
use std::future::{self, Future};
use std::io;
use tokio::signal;
use tracing::{debug, error, info};

use crate::args::Cli;

/// Load the configuration and resolve it against the requested interfaces.
///
/// Runs before any interface is opened so configuration defects are
/// reported without needing raw-socket privileges.
pub fn prepare(cli: &Cli) -> Result<(SwitchConfig, PortTable)> {
    let path = cli.config_path();
    debug!(path = %path.display(), "Loading configuration");

    let config = SwitchConfig::load(&path)?;
    let ports = config.resolve_ports(&cli.interfaces)?;
    Ok((config, ports))
}

/// Run the switch until the transport closes or Ctrl-C is received.
pub async fn run(cli: Cli) -> Result<SwitchStats> {
    let (config, ports) = prepare(&cli)?;
    let link = PnetLink::open(&cli.interfaces)?;
    let counters = link.counters();

    info!(switch_id = %cli.switch_id, "Starting switch");
    info!(mac = %link.own_mac(), "Switch MAC");
    info!(priority = config.priority, "Priority");
    for (name, mode) in &config.vlans {
        info!(interface = %name, vlan = %mode, "VLAN table");
    }
    for port in ports.iter() {
        info!(port = port.id, interface = %port.name, mode = %port.mode, "Interface");
    }
    for iface in link.interfaces() {
        debug!(interface = %iface, "Attached");
    }

    let switch = Switch::new(config.priority, link.own_mac(), ports);
    let dispatcher = Dispatcher::new(link, switch).with_hello_interval(cli.hello_interval());

    let switch = dispatcher.run_until(shutdown(signal::ctrl_c())).await;

    let stats = switch.stats();
    info!("Switch statistics:\n{}", stats.format());
    info!("Link statistics:\n{}", counters.snapshot().format());
    Ok(stats)
}

/// Resolve once `signal` fires. A signal that cannot be listened for never
/// resolves, so the switch keeps running until its transport closes.
async fn shutdown<F>(signal: F)
where
    F: Future<Output = io::Result<()>>,
{
    match signal.await {
        Ok(()) => info!("Ctrl-C received, shutting down"),
        Err(e) => {
            error!(error = %e, "Cannot listen for Ctrl-C");
            future::pending::<()>().await;
        }
    }
}
