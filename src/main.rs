/// Email today's mess menu to the configured recipients.
/// Run once a day from an external scheduler (e.g. cron: 0 7 * * * /app/mess-menu-mailer)
///
/// Exit codes: 0 sent, 1 schedule or delivery failure, 2 configuration or missing password.
use std::path::PathBuf;
use std::process::ExitCode;

use chrono::{Local, NaiveDate};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mess_menu_mailer::{
    config::{resolve_as_of, Config, ConfigOverrides},
    error::{ConfigError, RunError},
    services::{
        credentials::EnvCredentialProvider, dispatch::DispatchService, email::SmtpMailer,
    },
};

#[derive(Parser)]
#[command(name = "mess-menu-mailer", about = "Email today's mess menu from a 4-week rotation schedule")]
struct Args {
    /// Schedule spreadsheet (.xlsx, .xls, .ods or .csv)
    #[arg(long)]
    schedule: Option<PathBuf>,

    /// First day of rotation week 1 (YYYY-MM-DD)
    #[arg(long)]
    cycle_start: Option<String>,

    /// Sender address, also used as the SMTP login
    #[arg(long)]
    sender: Option<String>,

    /// Recipient address; repeat or comma-separate for several
    #[arg(long = "recipient")]
    recipients: Vec<String>,

    #[arg(long)]
    smtp_host: Option<String>,

    #[arg(long)]
    smtp_port: Option<u16>,

    /// Send the menu for this date instead of today (YYYY-MM-DD)
    #[arg(long)]
    date: Option<String>,

    /// Print the message instead of sending it
    #[arg(long)]
    dry_run: bool,
}

impl Args {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            schedule_path: self.schedule.clone(),
            cycle_start: self.cycle_start.clone(),
            sender: self.sender.clone(),
            recipients: self.recipients.clone(),
            smtp_host: self.smtp_host.clone(),
            smtp_port: self.smtp_port,
        }
    }

    fn as_of(&self) -> Result<NaiveDate, ConfigError> {
        resolve_as_of(self.date.as_deref(), Local::now().date_naive())
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    match run(&args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            match &err {
                RunError::Config(_) | RunError::MissingCredentials(_) => println!("ERROR: {err}"),
                _ => println!("{err}"),
            }
            ExitCode::from(err.exit_code())
        }
    }
}

async fn run(args: &Args) -> Result<(), RunError> {
    let config = Config::from_env(args.overrides())?;
    let today = args.as_of()?;

    if args.dry_run {
        let prepared = DispatchService::preview(&config, today)?;
        println!("To: {}", config.recipients.join(", "));
        println!("Subject: {}\n", prepared.message.subject);
        println!("{}", prepared.message.body);
        return Ok(());
    }

    let credentials = EnvCredentialProvider::new(config.credential_var.clone());
    let mailer = SmtpMailer::from_config(&config);
    DispatchService::run(&config, today, &credentials, &mailer).await?;

    println!(
        "[{}] Email sent to {}",
        Local::now().format("%Y-%m-%dT%H:%M:%S%.6f"),
        config.recipients.join(", ")
    );
    Ok(())
}
