use std::sync::Arc;

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use mailer::{
    EmailRequest, EmailTransport, EmailType, Mailer, MailerConfig, ResendClient,
    resend::DEFAULT_API_BASE,
};
use storage::{
    Database,
    dto::poll::ConvertPollRequest,
    models::NotificationCategory,
    repository::{contest::ContestRepository, profile::ProfileRepository},
    services::{audit, poll_conversion, ranking::KarmaRankingService},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;
use validator::Validate;

#[derive(Parser)]
#[command(name = "letranido-admin")]
#[command(about = "Letranido administration tasks", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, env = "DATABASE_URL")]
    database_url: String,

    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the karma ranking as JSON
    Ranking {
        /// Skip the cached snapshot
        #[arg(long)]
        live: bool,
    },
    /// Send a notification email
    SendEmail {
        #[arg(long = "type", value_parser = parse_email_type)]
        email_type: EmailType,

        #[arg(long)]
        contest_id: Option<Uuid>,

        #[arg(long, value_parser = parse_category)]
        category: Option<NotificationCategory>,

        #[arg(long)]
        subject: Option<String>,

        #[arg(long)]
        html_file: Option<std::path::PathBuf>,

        #[arg(long)]
        test_mode: bool,

        #[arg(long, env = "RESEND_API_KEY")]
        api_key: Option<String>,

        #[arg(long, env = "MAIL_API_BASE", default_value = DEFAULT_API_BASE)]
        api_base: String,

        #[arg(long, env = "MAIL_FROM", default_value = "Letranido <noreply@letranido.com>")]
        from: String,

        #[arg(long, env = "SITE_URL", default_value = "https://letranido.com")]
        site_url: String,
    },
    /// Close an active poll
    ClosePoll {
        #[arg(long)]
        poll_id: Uuid,
    },
    /// Create a contest from a closed poll's winning option
    ConvertPoll {
        #[arg(long)]
        poll_id: Uuid,

        #[arg(long)]
        submission_deadline: DateTime<Utc>,

        #[arg(long)]
        voting_deadline: DateTime<Utc>,

        #[arg(long, default_value_t = 100)]
        min_words: i32,

        #[arg(long, default_value_t = 1000)]
        max_words: i32,

        #[arg(long)]
        category: Option<String>,

        #[arg(long)]
        month: Option<String>,
    },
}

fn parse_email_type(value: &str) -> Result<EmailType, String> {
    serde_json::from_value(serde_json::Value::String(value.to_string()))
        .map_err(|_| format!("unknown email type '{value}'"))
}

fn parse_category(value: &str) -> Result<NotificationCategory, String> {
    serde_json::from_value(serde_json::Value::String(value.to_string()))
        .map_err(|_| format!("unknown category '{value}'"))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "letranido_admin={},mailer={},storage={}",
                    log_level, log_level, log_level
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let db = Database::new(&cli.database_url).await?;
    let pool = db.pool();

    match cli.command {
        Commands::Ranking { live } => {
            let service = KarmaRankingService::for_pool(pool);
            let ranking = if live {
                service.load_live(Utc::now()).await?
            } else {
                service.load(Utc::now()).await
            };
            println!("{}", serde_json::to_string_pretty(&ranking)?);
        }
        Commands::SendEmail {
            email_type,
            contest_id,
            category,
            subject,
            html_file,
            test_mode,
            api_key,
            api_base,
            from,
            site_url,
        } => {
            let html = match html_file {
                Some(path) => Some(std::fs::read_to_string(path)?),
                None => None,
            };

            let request = EmailRequest {
                email_type,
                contest_id,
                test_mode,
                category,
                subject,
                html,
                text: None,
            };

            let contest = match contest_id {
                Some(id) => Some(ContestRepository::new(pool).find_by_id(id).await?),
                None => None,
            };

            let transport: Option<Arc<dyn EmailTransport>> = match api_key {
                Some(key) => Some(Arc::new(ResendClient::new(key, api_base)?)),
                None => None,
            };
            let mailer = Mailer::new(
                transport,
                Arc::new(ProfileRepository::new(pool)),
                MailerConfig { from, site_url },
            );

            let outcome = mailer.dispatch(&request, contest.as_ref()).await;
            if outcome.success {
                audit::record_best_effort(
                    pool,
                    "email_sent",
                    contest_id,
                    serde_json::json!({
                        "email_type": email_type.as_str(),
                        "sent_count": outcome.sent_count,
                        "test_mode": test_mode,
                    }),
                )
                .await;
            }
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        }
        Commands::ClosePoll { poll_id } => {
            let poll = poll_conversion::close_poll(pool, poll_id).await?;
            println!("{}", serde_json::to_string_pretty(&poll)?);
        }
        Commands::ConvertPoll {
            poll_id,
            submission_deadline,
            voting_deadline,
            min_words,
            max_words,
            category,
            month,
        } => {
            let request = ConvertPollRequest {
                category,
                month,
                min_words,
                max_words,
                submission_deadline,
                voting_deadline,
            };
            request.validate()?;
            request.validate_schedule()?;

            let converted = poll_conversion::convert_poll(pool, poll_id, &request).await?;
            println!("{}", serde_json::to_string_pretty(&converted)?);
        }
    }

    Ok(())
}
