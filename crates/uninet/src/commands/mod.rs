//! Command dispatch: bridges CLI args -> API calls -> output formatting.

pub mod alarms;
pub mod clients;
pub mod config_cmd;
pub mod devices;
pub mod dpi;
pub mod events;
pub mod firewall;
pub mod health;
pub mod networks;
pub mod portfwd;
pub mod profile;
pub mod stats;
pub mod util;
pub mod vouchers;
pub mod wifi;

use uninet_api::LocalClient;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a controller-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    client: &LocalClient,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Clients(args) => clients::handle(client, args, global).await,
        Command::Devices(args) => devices::handle(client, args, global).await,
        Command::Networks(args) => networks::handle(client, args, global).await,
        Command::Wifi(args) => wifi::handle(client, args, global).await,
        Command::Firewall(args) => firewall::handle(client, args, global).await,
        Command::Portfwd(args) => portfwd::handle(client, args, global).await,
        Command::Vouchers(args) => vouchers::handle(client, args, global).await,
        Command::Events(args) => events::handle(client, args, global).await,
        Command::Alarms(args) => alarms::handle(client, args, global).await,
        Command::Health => health::handle(client, global).await,
        Command::Dpi(args) => dpi::handle(client, args, global).await,
        Command::Stats(args) => stats::handle(client, args, global).await,
        Command::Config(args) => config_cmd::handle(client, args, global).await,
        // Profile, Logout, and Completions are handled before dispatch
        Command::Profile(_) | Command::Logout | Command::Completions(_) => unreachable!(),
    }
}
