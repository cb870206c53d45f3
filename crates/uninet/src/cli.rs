//! Clap derive structures for the `uninet` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// uninet -- CLI for local UniFi network controllers
#[derive(Debug, Parser)]
#[command(
    name = "uninet",
    version,
    about = "Manage a local UniFi network controller from the command line",
    long_about = "A CLI for administering UniFi network controllers over their\n\
        local site API. Works against both UniFi OS consoles (UDM, Cloud\n\
        Gateway) and classic software controllers -- the API flavor is\n\
        detected automatically and cached alongside the login session.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Controller profile to use
    #[arg(long, short = 'p', env = "UNIFI_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Controller URL (overrides profile)
    #[arg(long, short = 'c', env = "UNIFI_CONTROLLER", global = true)]
    pub controller: Option<String>,

    /// Site name
    #[arg(long, short = 's', env = "UNIFI_SITE", global = true)]
    pub site: Option<String>,

    /// Local account username
    #[arg(long, short = 'u', env = "UNIFI_USERNAME", global = true)]
    pub username: Option<String>,

    /// Local account password (prefer the env var or keyring over the flag)
    #[arg(long, env = "UNIFI_PASSWORD", global = true, hide_env = true)]
    pub password: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "UNIFI_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "UNIFI_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds
    #[arg(long, env = "UNIFI_TIMEOUT", default_value = "30", global = true)]
    pub timeout: u64,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// CSV (spreadsheet import)
    Csv,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage connected clients
    #[command(alias = "cl")]
    Clients(ClientsArgs),

    /// Manage adopted devices
    #[command(alias = "dev", alias = "d")]
    Devices(DevicesArgs),

    /// View networks and VLANs
    #[command(alias = "net", alias = "n")]
    Networks(NetworksArgs),

    /// View wireless networks (SSIDs)
    #[command(alias = "w")]
    Wifi(WifiArgs),

    /// View firewall rules and groups
    #[command(alias = "fw")]
    Firewall(FirewallArgs),

    /// View port forwarding rules
    Portfwd(PortfwdArgs),

    /// Manage guest WiFi vouchers
    Vouchers(VouchersArgs),

    /// View recent controller events
    Events(EventsArgs),

    /// Manage alarms
    Alarms(AlarmsArgs),

    /// Site health summary
    Health,

    /// Deep packet inspection statistics
    Dpi(DpiArgs),

    /// Site traffic reports
    Stats(StatsArgs),

    /// View the controller's running configuration
    #[command(alias = "cfg")]
    Config(ConfigArgs),

    /// Discard the cached controller session
    Logout,

    /// Manage connection profiles
    Profile(ProfileArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CLIENTS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ClientsArgs {
    #[command(subcommand)]
    pub command: ClientsCommand,
}

#[derive(Debug, Subcommand)]
pub enum ClientsCommand {
    /// List currently connected clients
    #[command(alias = "ls")]
    List {
        /// Only clients on this network
        #[arg(long)]
        network: Option<String>,

        /// Only wired clients
        #[arg(long, conflicts_with = "wireless")]
        wired: bool,

        /// Only wireless clients
        #[arg(long)]
        wireless: bool,
    },

    /// List all known clients, including offline ones
    All,

    /// Get details for one client
    Get {
        /// Client name or MAC address
        client: String,
    },

    /// Block a client from the network
    Block {
        /// Client name or MAC address
        client: String,
    },

    /// Unblock a previously blocked client
    Unblock {
        /// Client name or MAC address
        client: String,
    },

    /// Disconnect a client (it may reconnect immediately)
    Kick {
        /// Client name or MAC address
        client: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  DEVICES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct DevicesArgs {
    #[command(subcommand)]
    pub command: DevicesCommand,
}

#[derive(Debug, Subcommand)]
pub enum DevicesCommand {
    /// List adopted devices
    #[command(alias = "ls")]
    List,

    /// Get details for one device
    Get {
        /// Device name or MAC address
        device: String,
    },

    /// Restart a device
    Restart {
        /// Device name or MAC address
        device: String,
    },

    /// Upgrade device firmware to the pending version
    Upgrade {
        /// Device name or MAC address
        device: String,
    },

    /// Toggle the locate LED (blink to identify the device)
    Locate {
        /// Device name or MAC address
        device: String,

        /// Turn locate on (default) or off
        #[arg(long, default_value = "true", action = clap::ArgAction::Set)]
        on: bool,
    },

    /// Adopt a pending device
    Adopt {
        /// MAC address of the device to adopt
        #[arg(value_name = "MAC")]
        mac: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  NETWORKS / WIFI
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct NetworksArgs {
    #[command(subcommand)]
    pub command: NetworksCommand,
}

#[derive(Debug, Subcommand)]
pub enum NetworksCommand {
    /// List configured networks
    #[command(alias = "ls")]
    List,

    /// Get details for one network
    Get {
        /// Network name or ID
        network: String,
    },
}

#[derive(Debug, Args)]
pub struct WifiArgs {
    #[command(subcommand)]
    pub command: WifiCommand,
}

#[derive(Debug, Subcommand)]
pub enum WifiCommand {
    /// List wireless networks
    #[command(alias = "ls")]
    List,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  FIREWALL / PORT FORWARDING
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct FirewallArgs {
    #[command(subcommand)]
    pub command: FirewallCommand,
}

#[derive(Debug, Subcommand)]
pub enum FirewallCommand {
    /// List firewall rules
    #[command(alias = "ls")]
    Rules,

    /// List firewall address/port groups
    Groups,
}

#[derive(Debug, Args)]
pub struct PortfwdArgs {
    #[command(subcommand)]
    pub command: PortfwdCommand,
}

#[derive(Debug, Subcommand)]
pub enum PortfwdCommand {
    /// List port forwarding rules
    #[command(alias = "ls")]
    List,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  VOUCHERS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct VouchersArgs {
    #[command(subcommand)]
    pub command: VouchersCommand,
}

#[derive(Debug, Subcommand)]
pub enum VouchersCommand {
    /// List vouchers
    #[command(alias = "ls")]
    List {
        /// Only unused vouchers
        #[arg(long, conflicts_with = "used")]
        unused: bool,

        /// Only redeemed vouchers
        #[arg(long)]
        used: bool,
    },

    /// Mint new vouchers
    Create {
        /// Number of vouchers to mint
        #[arg(long, default_value = "1")]
        count: u32,

        /// Validity in minutes (1440 = 24h)
        #[arg(long, short = 'd', default_value = "1440")]
        duration: u32,

        /// Data quota in MB (0 = unlimited)
        #[arg(long, default_value = "0")]
        quota: u32,

        /// Upload limit in kbps (0 = unlimited)
        #[arg(long, default_value = "0")]
        up: u32,

        /// Download limit in kbps (0 = unlimited)
        #[arg(long, default_value = "0")]
        down: u32,

        /// Redemptions allowed per voucher
        #[arg(long, default_value = "1")]
        multi_use: u32,

        /// Note printed alongside the voucher
        #[arg(long)]
        note: Option<String>,
    },

    /// Revoke (delete) a voucher
    Revoke {
        /// Voucher ID
        id: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  EVENTS / ALARMS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct EventsArgs {
    #[command(subcommand)]
    pub command: EventsCommand,
}

#[derive(Debug, Subcommand)]
pub enum EventsCommand {
    /// List recent events, newest first
    #[command(alias = "ls")]
    List {
        /// Max results
        #[arg(long, short = 'l', default_value = "100")]
        limit: u32,
    },
}

#[derive(Debug, Args)]
pub struct AlarmsArgs {
    #[command(subcommand)]
    pub command: AlarmsCommand,
}

#[derive(Debug, Subcommand)]
pub enum AlarmsCommand {
    /// List alarms
    #[command(alias = "ls")]
    List {
        /// Include archived alarms
        #[arg(long)]
        include_archived: bool,
    },

    /// Archive an alarm
    Archive {
        /// Alarm ID
        id: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  DPI / STATS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct DpiArgs {
    #[command(subcommand)]
    pub command: DpiCommand,
}

#[derive(Debug, Subcommand)]
pub enum DpiCommand {
    /// Site-wide traffic breakdown by application
    Site {
        /// Max applications listed
        #[arg(long, short = 'l', default_value = "20")]
        limit: usize,
    },

    /// Per-client traffic breakdown
    Client {
        /// Client name or MAC address
        client: String,

        /// Max applications listed
        #[arg(long, short = 'l', default_value = "15")]
        limit: usize,
    },
}

#[derive(Debug, Args)]
pub struct StatsArgs {
    #[command(subcommand)]
    pub command: StatsCommand,
}

#[derive(Debug, Subcommand)]
pub enum StatsCommand {
    /// Daily site statistics
    Daily {
        /// Days of history
        #[arg(long, default_value = "7")]
        days: u32,
    },

    /// Hourly site statistics
    Hourly {
        /// Hours of history
        #[arg(long, default_value = "24")]
        hours: u32,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG (controller-side)
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Running configuration snapshot
    Show {
        /// Limit the snapshot to one section
        #[arg(long, value_enum)]
        section: Option<ConfigSection>,

        /// Include passwords and pre-shared keys in the output
        #[arg(long)]
        show_secrets: bool,
    },

    /// Static routes
    Routes,

    /// Traffic management rules
    TrafficRules,

    /// Raw site settings records
    Settings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ConfigSection {
    Networks,
    Wireless,
    Firewall,
    Portfwd,
    Devices,
    Dhcp,
    Routing,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  PROFILE
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ProfileArgs {
    #[command(subcommand)]
    pub command: ProfileCommand,
}

#[derive(Debug, Subcommand)]
pub enum ProfileCommand {
    /// Create initial config file with guided setup
    Init,

    /// Display current resolved configuration
    Show,

    /// Set a configuration value on the active profile
    Set {
        /// Config key (controller, site, username, insecure, timeout, ca_cert)
        key: String,

        /// Value to set
        value: String,
    },

    /// List configured profiles
    #[command(alias = "ls")]
    List,

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },

    /// Store a password in the system keyring
    SetPassword {
        /// Profile name (defaults to the active profile)
        #[arg(long)]
        profile: Option<String>,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
