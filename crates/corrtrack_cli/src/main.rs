//! `corrtrack` command-line entry point.
//!
//! # Responsibility
//! - Parse arguments, open the tracker database, dispatch to core services.
//! - Keep all business rules in `corrtrack_core`; this binary only prints.

mod render;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use corrtrack_core::db::open_db;
use corrtrack_core::{
    default_log_level, init_logging, parse_range_end, parse_timestamp, ActiveViewQuery,
    ContactDirectory, ContactUpdate, CorrespondenceLog, DateRange, Direction, EntryListQuery,
    InsightConfig, InsightEngine, LogEntryRequest, NewContact, ReminderEngine, ReminderQuery,
    SqliteContactRepository, SqliteEntryRepository, Timestamp,
};
use log::info;
use rusqlite::Connection;
use std::path::PathBuf;

const DATA_DIR_NAME: &str = ".correspondence_tracker";
const DB_FILE_NAME: &str = "tracker.db";

#[derive(Parser)]
#[command(
    name = "corrtrack",
    version,
    about = "Personal correspondence tracker: contacts, letters, follow-ups"
)]
struct Cli {
    /// Path to the SQLite database [default: ~/.correspondence_tracker/tracker.db]
    #[arg(long, global = true, env = "CORRTRACK_DB")]
    db: Option<PathBuf>,

    /// Directory for rolling log files [default: ~/.correspondence_tracker/logs]
    #[arg(long, global = true, env = "CORRTRACK_LOG_DIR")]
    log_dir: Option<PathBuf>,

    /// trace|debug|info|warn|error
    #[arg(long, global = true, env = "CORRTRACK_LOG_LEVEL")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new contact
    AddContact {
        name: String,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        /// email, letter, phone, ...
        #[arg(long)]
        preferred_channel: Option<String>,
        #[arg(long)]
        notes: Option<String>,
    },

    /// List all contacts
    ListContacts,

    /// Show one contact
    ShowContact { contact_id: i64 },

    /// Replace email/phone/channel/notes on a contact (empty value clears)
    UpdateContact {
        contact_id: i64,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        preferred_channel: Option<String>,
        #[arg(long)]
        notes: Option<String>,
    },

    /// Log an incoming or outgoing message
    Log {
        contact_id: i64,
        /// incoming|outgoing
        direction: String,
        /// When it was sent, YYYY-MM-DDTHH:MM:SS
        sent_at: String,
        #[arg(long)]
        medium: Option<String>,
        #[arg(long)]
        subject: Option<String>,
        #[arg(long)]
        body: Option<String>,
        /// Comma-separated labels
        #[arg(long, value_delimiter = ',')]
        tags: Vec<String>,
        /// Follow-up due date, YYYY-MM-DDTHH:MM:SS
        #[arg(long)]
        follow_up: Option<String>,
        #[arg(long)]
        sentiment: Option<String>,
        #[arg(long)]
        topic: Option<String>,
        /// Response status [default: pending]
        #[arg(long)]
        status: Option<String>,
    },

    /// Show correspondence history, newest first
    History {
        #[arg(long)]
        contact_id: Option<i64>,
        /// incoming|outgoing
        #[arg(long)]
        direction: Option<String>,
        /// Inclusive lower bound on sent time
        #[arg(long)]
        since: Option<String>,
        /// Inclusive upper bound on sent time; a bare date includes that whole day
        #[arg(long)]
        until: Option<String>,
    },

    /// Correct the response status of a logged entry
    SetStatus { entry_id: i64, status: String },

    /// Show follow-ups, most urgent first
    Reminders {
        /// Only show follow-ups past their due date
        #[arg(long)]
        overdue_only: bool,
    },

    /// Summarize a relationship
    Insights {
        contact_id: i64,
        #[command(flatten)]
        tuning: InsightArgs,
    },

    /// List contacts by recency of correspondence
    Active {
        /// Recency window in days
        #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(i64).range(0..))]
        within_days: i64,
        #[command(flatten)]
        tuning: InsightArgs,
    },
}

impl Commands {
    fn name(&self) -> &'static str {
        match self {
            Self::AddContact { .. } => "add-contact",
            Self::ListContacts => "list-contacts",
            Self::ShowContact { .. } => "show-contact",
            Self::UpdateContact { .. } => "update-contact",
            Self::Log { .. } => "log",
            Self::History { .. } => "history",
            Self::SetStatus { .. } => "set-status",
            Self::Reminders { .. } => "reminders",
            Self::Insights { .. } => "insights",
            Self::Active { .. } => "active",
        }
    }
}

#[derive(clap::Args)]
struct InsightArgs {
    /// Suggest reaching out after this many days of silence
    #[arg(
        long,
        default_value_t = InsightConfig::default().stale_after_days,
        value_parser = clap::value_parser!(i64).range(0..)
    )]
    stale_days: i64,
    /// Cadence used for the suggested follow-up date
    #[arg(
        long,
        default_value_t = InsightConfig::default().follow_up_cadence_days,
        value_parser = clap::value_parser!(i64).range(0..)
    )]
    cadence_days: i64,
}

impl From<InsightArgs> for InsightConfig {
    fn from(args: InsightArgs) -> Self {
        Self {
            stale_after_days: args.stale_days,
            follow_up_cadence_days: args.cadence_days,
        }
    }
}

fn data_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(DATA_DIR_NAME))
}

fn default_db_path() -> PathBuf {
    data_dir()
        .map(|dir| dir.join(DB_FILE_NAME))
        .unwrap_or_else(|| PathBuf::from(DB_FILE_NAME))
}

fn setup_logging(cli: &Cli) {
    let Some(log_dir) = cli
        .log_dir
        .clone()
        .or_else(|| data_dir().map(|dir| dir.join("logs")))
    else {
        return;
    };
    let level = cli.log_level.as_deref().unwrap_or(default_log_level());
    if let Err(err) = init_logging(level, &log_dir) {
        eprintln!("warning: logging disabled: {err}");
    }
}

fn now() -> Timestamp {
    chrono::Local::now().naive_local()
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(&cli);

    let db_path = cli.db.clone().unwrap_or_else(default_db_path);
    let conn = open_db(&db_path)
        .with_context(|| format!("failed to open database `{}`", db_path.display()))?;

    run(cli.command, &conn)
}

fn run(command: Commands, conn: &Connection) -> Result<()> {
    let contacts = SqliteContactRepository::new(conn);
    let entries = SqliteEntryRepository::new(conn);
    info!("event=cli_dispatch module=cli status=start command={}", command.name());

    match command {
        Commands::AddContact {
            name,
            email,
            phone,
            preferred_channel,
            notes,
        } => {
            let contact = ContactDirectory::new(contacts).add_contact(NewContact {
                name,
                email,
                phone,
                preferred_channel,
                notes,
            })?;
            println!("Contact created with id {}", contact.id);
        }
        Commands::ListContacts => {
            let listed = ContactDirectory::new(contacts).list_contacts()?;
            if listed.is_empty() {
                println!("No contacts yet.");
            }
            for contact in &listed {
                render::print_contact(contact);
            }
        }
        Commands::ShowContact { contact_id } => {
            let contact = ContactDirectory::new(contacts).get_contact(contact_id)?;
            render::print_contact(&contact);
        }
        Commands::UpdateContact {
            contact_id,
            email,
            phone,
            preferred_channel,
            notes,
        } => {
            let update = ContactUpdate {
                email,
                phone,
                preferred_channel,
                notes,
            };
            let contact = ContactDirectory::new(contacts).update_contact(contact_id, &update)?;
            render::print_contact(&contact);
        }
        Commands::Log {
            contact_id,
            direction,
            sent_at,
            medium,
            subject,
            body,
            tags,
            follow_up,
            sentiment,
            topic,
            status,
        } => {
            let request = LogEntryRequest {
                contact_id,
                direction,
                timestamp: sent_at,
                medium,
                subject,
                body,
                tags,
                follow_up_date: follow_up,
                sentiment,
                related_topic: topic,
                response_status: status,
            };
            let entry = CorrespondenceLog::new(entries).log_entry(&request)?;
            println!("Correspondence logged with id {}", entry.id);
        }
        Commands::History {
            contact_id,
            direction,
            since,
            until,
        } => {
            let query = history_query(contact_id, direction, since, until)?;
            let listed = CorrespondenceLog::new(entries).list_entries(&query)?;
            if listed.is_empty() {
                println!("No correspondence recorded.");
            }
            for entry in &listed {
                render::print_entry(entry);
            }
        }
        Commands::SetStatus { entry_id, status } => {
            let entry = CorrespondenceLog::new(entries).update_response_status(entry_id, &status)?;
            println!("Entry #{} status set to {}", entry.id, entry.response_status);
        }
        Commands::Reminders { overdue_only } => {
            let query = ReminderQuery { overdue_only };
            let reminders = ReminderEngine::new(contacts, entries).reminders(now(), &query)?;
            if reminders.is_empty() {
                println!("No follow-ups.");
            }
            for reminder in &reminders {
                render::print_reminder(reminder);
            }
        }
        Commands::Insights { contact_id, tuning } => {
            let engine = InsightEngine::new(contacts, entries, tuning.into());
            let insight = engine.insights(contact_id, now())?;
            render::print_insight(&insight);
        }
        Commands::Active {
            within_days,
            tuning,
        } => {
            let engine = InsightEngine::new(contacts, entries, tuning.into());
            let query = ActiveViewQuery {
                within_days: Some(within_days),
            };
            let view = engine.active_view(now(), &query)?;
            render::print_active_view(&view, within_days);
        }
    }

    Ok(())
}

fn history_query(
    contact_id: Option<i64>,
    direction: Option<String>,
    since: Option<String>,
    until: Option<String>,
) -> Result<EntryListQuery> {
    let direction = direction
        .as_deref()
        .map(str::parse::<Direction>)
        .transpose()?;
    let since = since.as_deref().map(parse_timestamp).transpose()?;
    let until = until.as_deref().map(parse_range_end).transpose()?;
    let date_range = if since.is_some() || until.is_some() {
        Some(DateRange::new(since, until)?)
    } else {
        None
    };

    Ok(EntryListQuery {
        contact_id,
        direction,
        date_range,
    })
}
