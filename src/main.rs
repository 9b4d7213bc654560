use std::io::{self, Write};
use std::path::PathBuf;
use clap::{Parser, Subcommand};
use colored::Colorize;
use rpassword::read_password;
use vaultkey::api::VipCodeType;
use vaultkey::logging::{setup_logger, LogLevel};
use vaultkey::redemption::{count_successes, CodeRecord, RedemptionOutcome};
use vaultkey::{Config, VaultKey, VaultKeyError};

#[derive(Parser)]
#[command(name = "vaultkey", about = "Borderlands 3 SHiFT & VIP code redemption")]
struct Cli {
    #[arg(long, default_value = Config::DEFAULT_PATH)]
    config: PathBuf,

    #[arg(long, value_enum)]
    log_level: Option<LogLevel>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Store 2K account credentials and log in
    Login,
    /// List platforms with Borderlands 3 registered on the account
    Platforms,
    /// List VIP campaigns currently accepting codes
    Campaigns,
    #[command(subcommand)]
    Redeem(RedeemCommand),
    #[command(subcommand)]
    Auto(AutoCommand),
    /// Show code redemption history
    History,
    /// Remove all code history
    Reset {
        #[arg(long)]
        yes: bool,
    },
    #[command(subcommand)]
    Pref(PrefCommand),
}

#[derive(Subcommand)]
enum RedeemCommand {
    Shift {
        code: String,
        #[arg(long)]
        platform: Option<String>,
    },
    Vip {
        code: String,
        #[arg(long = "type")]
        code_type: VipCodeType,
    },
}

#[derive(Subcommand)]
enum AutoCommand {
    Shift,
    Vip,
}

#[derive(Subcommand)]
enum PrefCommand {
    Get { key: String },
    Set { key: String, value: String },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let cli = Cli::parse();
    let config = Config::load(&cli.config)?;
    setup_logger(cli.log_level.unwrap_or(config.log_level))?;

    let app = VaultKey::from_config(&config)?;
    if let Err(e) = run(&app, cli.command).await {
        display_error(&e);
        std::process::exit(1);
    }
    Ok(())
}

async fn run(app: &VaultKey, command: Command) -> Result<(), VaultKeyError> {
    match command {
        Command::Login => {
            let username = prompt("2K username: ")?;
            print!("2K password: ");
            io::stdout().flush()?;
            let password = read_password()?;
            app.update_credentials(&username, &password).await?;
            notify("Logged in.");
        }
        Command::Platforms => {
            for platform in app.platforms().await? {
                println!("{}", platform.service);
            }
        }
        Command::Campaigns => {
            for campaign in app.vip_configuration().await? {
                println!("{:<8} {}", campaign.code_type, campaign.campaign_id);
            }
        }
        Command::Redeem(RedeemCommand::Shift { code, platform }) => {
            notify("Redeeming SHiFT Code...");
            let record = app.redeem_shift(&code, platform.as_deref()).await?;
            notify(&format!(
                "SHiFT code {} redeemed for {}!",
                record.code,
                record.platform.as_deref().unwrap_or("?")
            ));
        }
        Command::Redeem(RedeemCommand::Vip { code, code_type }) => {
            notify(&format!("Redeeming {} VIP Code...", code_type));
            let record = app.redeem_vip(&code, code_type).await?;
            notify(&format!("VIP code {} redeemed!", record.code));
            if let Some(description) = record.description {
                println!("{}", description);
            }
        }
        Command::Auto(AutoCommand::Shift) => {
            notify("Starting Auto-SHiFT retrieval...");
            report(&app.execute_auto_shift().await?);
        }
        Command::Auto(AutoCommand::Vip) => {
            notify("Starting Auto-VIP retrieval...");
            report(&app.execute_auto_vip().await?);
        }
        Command::History => {
            let used = app.used_codes().await?;
            let mut history: Vec<(&str, &CodeRecord)> = used
                .shift
                .iter()
                .map(|r| ("SHiFT", r))
                .chain(used.vip.iter().map(|r| ("VIP", r)))
                .collect();
            history.sort_by_key(|(_, r)| r.date);

            if history.is_empty() {
                println!("Used codes will display here once they've been redeemed.");
            }
            for (kind, record) in history {
                let platform = record
                    .platform
                    .as_ref()
                    .map(|p| format!(" ({})", p.to_uppercase()))
                    .unwrap_or_default();
                println!("{}: {}{}", kind.bold(), record.code, platform);
                println!("  Code redeemed {}", record.date.format("%Y-%m-%d %H:%M"));
                if let Some(description) = &record.description {
                    println!("  {}", description);
                }
            }
        }
        Command::Reset { yes } => {
            if !yes && prompt("Remove all code history? [y/N] ")?.to_lowercase() != "y" {
                return Ok(());
            }
            app.reset_used_codes().await?;
            notify("Code history cleared.");
        }
        Command::Pref(PrefCommand::Get { key }) => {
            println!("{}", app.preference(&key).await?);
        }
        Command::Pref(PrefCommand::Set { key, value }) => {
            app.set_preference(&key, &value).await?;
        }
    }
    Ok(())
}

fn report(outcomes: &[RedemptionOutcome]) {
    for outcome in outcomes {
        match &outcome.result {
            Ok(_) => println!("  {} {}", "✔".green(), outcome.code),
            Err(e) => println!("  {} {}: {}", "✘".red(), outcome.code, e),
        }
    }
    notify(&format!(
        "Found {} codes, {} of which were redeemed.",
        outcomes.len(),
        count_successes(outcomes)
    ));
}

fn notify(message: &str) {
    println!("{}", message.cyan());
}

fn display_error(error: &VaultKeyError) {
    let message = match error {
        VaultKeyError::HttpStatus { body, .. } => vendor_message(body).unwrap_or_else(|| error.to_string()),
        VaultKeyError::CredentialsMissing(_) | VaultKeyError::AuthServer(_) => format!(
            "Could not get your 2K user information, run `vaultkey login` to check configuration. The error was: {}",
            error
        ),
        _ => error.to_string(),
    };
    eprintln!("{} {}", "Error:".red().bold(), message);
}

/// The vendor wraps failures as `{"error": {"message": ..., "code": ...}}`.
fn vendor_message(body: &str) -> Option<String> {
    let json: serde_json::Value = serde_json::from_str(body).ok()?;
    let error = json.get("error")?;
    if let Some(message) = error.get("message").and_then(|m| m.as_str()) {
        Some(format!("Received error during redemption: \"{}\"", message))
    } else {
        error.get("code").map(|code| format!("Received error code {} during redemption.", code))
    }
}

fn prompt(message: &str) -> Result<String, VaultKeyError> {
    print!("{}", message);
    io::stdout().flush()?;
    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}
