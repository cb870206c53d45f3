//! Guest voucher command handlers.

use chrono::DateTime;
use serde::Serialize;
use tabled::Tabled;
use uninet_api::LocalClient;
use uninet_api::models::{Voucher, VoucherSpec};

use crate::cli::{GlobalOpts, VouchersArgs, VouchersCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled, Serialize)]
struct VoucherRow {
    #[tabled(rename = "Code")]
    code: String,
    #[tabled(rename = "Created")]
    created: String,
    #[tabled(rename = "Duration")]
    duration: String,
    #[tabled(rename = "Uses")]
    uses: String,
    #[tabled(rename = "Data")]
    data: String,
    #[tabled(rename = "Note")]
    note: String,
}

impl From<&Voucher> for VoucherRow {
    fn from(v: &Voucher) -> Self {
        Self {
            code: v.code.as_deref().map(format_code).unwrap_or_default(),
            created: v.create_time.map(format_created).unwrap_or_default(),
            duration: v.duration.map(format_duration).unwrap_or_default(),
            uses: format!(
                "{}/{}",
                v.used.unwrap_or(0),
                match v.quota {
                    // quota 0 means unlimited redemptions
                    Some(0) | None => "∞".to_string(),
                    Some(q) => q.to_string(),
                }
            ),
            data: v
                .qos_usage_quota
                .filter(|q| *q > 0)
                .map(|q| format!("{q} MB"))
                .unwrap_or_default(),
            note: v.note.clone().unwrap_or_default(),
        }
    }
}

/// Voucher codes are 10 digits; print them the way the controller UI
/// does, split in the middle.
fn format_code(code: &str) -> String {
    if code.len() == 10 {
        format!("{}-{}", &code[..5], &code[5..])
    } else {
        code.to_string()
    }
}

fn format_created(epoch_secs: i64) -> String {
    DateTime::from_timestamp(epoch_secs, 0)
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_default()
}

fn format_duration(minutes: i64) -> String {
    if minutes < 60 {
        format!("{minutes}m")
    } else if minutes < 1440 {
        format!("{}h", minutes / 60)
    } else {
        format!("{}d", minutes / 1440)
    }
}

fn render(vouchers: &[Voucher], global: &GlobalOpts) {
    let out = output::render_list(&global.output, vouchers, |v| VoucherRow::from(v), |v| {
        v.code.clone().unwrap_or_else(|| v.id.clone())
    });
    output::print_output(&out, global.quiet);
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    client: &LocalClient,
    args: VouchersArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        VouchersCommand::List { unused, used } => {
            let mut vouchers = client.get_vouchers().await?;
            if unused {
                vouchers.retain(|v| v.used.unwrap_or(0) == 0);
            }
            if used {
                vouchers.retain(|v| v.used.unwrap_or(0) > 0);
            }
            render(&vouchers, global);
            Ok(())
        }

        VouchersCommand::Create {
            count,
            duration,
            quota,
            up,
            down,
            multi_use,
            note,
        } => {
            let spec = VoucherSpec {
                count,
                duration_minutes: duration,
                quota_mb: quota,
                up_kbps: up,
                down_kbps: down,
                multi_use,
                note,
            };
            let minted = client.create_voucher(&spec).await?;
            if !global.quiet {
                eprintln!("Created {} voucher(s)", minted.len());
            }
            render(&minted, global);
            Ok(())
        }

        VouchersCommand::Revoke { id } => {
            if !util::confirm(&format!("Revoke voucher {id}?"), global.yes)? {
                return Ok(());
            }
            let ok = client.revoke_voucher(&id).await?;
            util::require_ok(ok, &format!("revoke voucher {id}"))?;
            if !global.quiet {
                eprintln!("Voucher revoked");
            }
            Ok(())
        }
    }
}
