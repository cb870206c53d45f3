//! Profile subcommand handlers.

use dialoguer::{Input, Select};
use uninet_config::{Config, Profile};

use crate::cli::{GlobalOpts, OutputFormat, ProfileArgs, ProfileCommand};
use crate::config;
use crate::error::CliError;
use crate::output;

// ── Helpers ─────────────────────────────────────────────────────────

/// Map a dialoguer / interactive I/O failure into CliError.
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

fn keyring_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "keyring".into(),
        reason: format!("keyring access failed: {e}"),
    }
}

/// Parse a typed profile field, mapping failure to a validation error.
fn parse_value<T: std::str::FromStr>(
    field: &str,
    value: &str,
    expected: &str,
) -> Result<T, CliError> {
    value.parse().map_err(|_| CliError::Validation {
        field: field.into(),
        reason: format!("expected {expected}, got '{value}'"),
    })
}

/// Store a password under the CLI's keyring service.
fn store_password(profile_name: &str, password: &str) -> Result<(), CliError> {
    let entry = keyring::Entry::new("uninet", &format!("{profile_name}/password"))
        .map_err(keyring_err)?;
    entry.set_password(password).map_err(keyring_err)?;
    Ok(())
}

fn profile_not_found(name: String, cfg: &Config) -> CliError {
    let available: Vec<_> = cfg.profiles.keys().cloned().collect();
    CliError::ProfileNotFound {
        name,
        available: if available.is_empty() {
            "(none)".into()
        } else {
            available.join(", ")
        },
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ProfileArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        // ── Init: interactive wizard ────────────────────────────────
        ProfileCommand::Init => {
            let config_path = uninet_config::config_path();
            eprintln!("uninet — configuration wizard");
            eprintln!("  Config path: {}\n", config_path.display());

            let profile_name: String = Input::new()
                .with_prompt("Profile name")
                .default("default".into())
                .interact_text()
                .map_err(prompt_err)?;

            let controller: String = Input::new()
                .with_prompt("Controller URL")
                .default("https://192.168.1.1".into())
                .interact_text()
                .map_err(prompt_err)?;

            let username: String = Input::new()
                .with_prompt("Username")
                .interact_text()
                .map_err(prompt_err)?;

            let password = rpassword::prompt_password("Password: ").map_err(prompt_err)?;

            if username.is_empty() || password.is_empty() {
                return Err(CliError::Validation {
                    field: "credentials".into(),
                    reason: "username and password cannot be empty".into(),
                });
            }

            let store_choices = &[
                "Store password in system keyring (recommended)",
                "Save to config file (plaintext)",
            ];
            let store_selection = Select::new()
                .with_prompt("Where to store the password?")
                .items(store_choices)
                .default(0)
                .interact()
                .map_err(prompt_err)?;

            let password_field = if store_selection == 0 {
                store_password(&profile_name, &password)?;
                eprintln!("  ✓ Password stored in system keyring");
                None
            } else {
                Some(password)
            };

            let site: String = Input::new()
                .with_prompt("Site name")
                .default("default".into())
                .interact_text()
                .map_err(prompt_err)?;

            let cfg = Config {
                default_profile: Some(profile_name.clone()),
                profiles: [(
                    profile_name.clone(),
                    Profile {
                        controller,
                        site,
                        username: Some(username),
                        password: password_field,
                        ..Profile::default()
                    },
                )]
                .into(),
                ..Config::default()
            };

            uninet_config::save_config(&cfg)?;

            eprintln!("\n✓ Configuration written to {}", config_path.display());
            eprintln!("  Active profile: {profile_name}");
            eprintln!("\n  Test it: uninet health");

            Ok(())
        }

        // ── Show ────────────────────────────────────────────────────
        ProfileCommand::Show => {
            let cfg = uninet_config::load_config_or_default();
            let out = match global.output {
                OutputFormat::Json => output::render_json(&cfg, false),
                OutputFormat::JsonCompact => output::render_json(&cfg, true),
                OutputFormat::Yaml => output::render_yaml(&cfg),
                _ => format!("{cfg:#?}"),
            };
            output::print_output(&out, global.quiet);
            Ok(())
        }

        // ── Set <key> <value> ───────────────────────────────────────
        ProfileCommand::Set { key, value } => {
            let mut cfg = uninet_config::load_config_or_default();
            let profile_name = config::active_profile_name(global, &cfg);

            let profile = cfg.profiles.entry(profile_name.clone()).or_default();

            match key.as_str() {
                "controller" => profile.controller = value,
                "site" => profile.site = value,
                "username" => profile.username = Some(value),
                "password" => profile.password = Some(value),
                "insecure" => {
                    profile.insecure = Some(parse_value("insecure", &value, "'true' or 'false'")?);
                }
                "timeout" => {
                    profile.timeout = Some(parse_value("timeout", &value, "a number of seconds")?);
                }
                "ca_cert" | "ca-cert" => profile.ca_cert = Some(value.into()),
                other => {
                    return Err(CliError::Validation {
                        field: other.into(),
                        reason: format!(
                            "unknown config key '{other}'. Valid keys: controller, site, \
                             username, password, insecure, timeout, ca_cert"
                        ),
                    });
                }
            }

            uninet_config::save_config(&cfg)?;
            eprintln!("✓ Set {key} on profile '{profile_name}'");
            Ok(())
        }

        // ── List ────────────────────────────────────────────────────
        ProfileCommand::List => {
            let cfg = uninet_config::load_config_or_default();
            let default = cfg.default_profile.as_deref().unwrap_or("default");
            if cfg.profiles.is_empty() {
                eprintln!("No profiles configured. Run: uninet profile init");
            } else {
                for name in cfg.profiles.keys() {
                    println!("{name}{}", if name == default { " *" } else { "" });
                }
            }
            Ok(())
        }

        // ── Use <name> ──────────────────────────────────────────────
        ProfileCommand::Use { name } => {
            let mut cfg = uninet_config::load_config_or_default();

            if !cfg.profiles.contains_key(&name) {
                return Err(profile_not_found(name, &cfg));
            }

            cfg.default_profile = Some(name.clone());
            uninet_config::save_config(&cfg)?;
            eprintln!("✓ Default profile set to '{name}'");
            Ok(())
        }

        // ── SetPassword ─────────────────────────────────────────────
        ProfileCommand::SetPassword { profile } => {
            let cfg = uninet_config::load_config_or_default();
            let profile_name =
                profile.unwrap_or_else(|| config::active_profile_name(global, &cfg));

            if !cfg.profiles.contains_key(&profile_name) {
                return Err(profile_not_found(profile_name, &cfg));
            }

            let password = rpassword::prompt_password("Password: ").map_err(prompt_err)?;
            if password.is_empty() {
                return Err(CliError::Validation {
                    field: "password".into(),
                    reason: "password cannot be empty".into(),
                });
            }

            store_password(&profile_name, &password)?;
            eprintln!("✓ Password stored in system keyring for profile '{profile_name}'");
            Ok(())
        }
    }
}
