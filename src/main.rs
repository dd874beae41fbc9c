use std::path::PathBuf;

use anyhow::Context;
use chrono::Utc;
use clap::{Parser, Subcommand};
use sqlx::postgres::PgPoolOptions;

mod compliance;
mod db;
mod error;
mod models;
mod report;
mod roster;

use error::ReportError;
use models::{ComplianceScope, InvitationStatus};

#[derive(Parser)]
#[command(name = "event-compliance")]
#[command(about = "Event participation compliance reporting for TeamHub", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create or upgrade the database schema
    InitDb,
    /// Load realistic seed data
    Seed,
    /// Invite one team member to an event
    Invite {
        #[arg(long)]
        event_id: i64,
        #[arg(long)]
        workday_id: String,
        #[arg(long)]
        email: String,
    },
    /// Bulk-invite team members to an event from a CSV file
    Import {
        #[arg(long)]
        event_id: i64,
        #[arg(long)]
        csv: PathBuf,
    },
    /// Update the registration status of an invited team member
    SetStatus {
        #[arg(long)]
        event_id: i64,
        #[arg(long)]
        workday_id: String,
        #[arg(long)]
        email: String,
        /// registered or unregistered
        #[arg(long)]
        status: String,
    },
    /// Print a compliance report for one event or the whole portfolio
    Compliance {
        #[arg(long)]
        event_id: Option<i64>,
        #[arg(long)]
        json: bool,
    },
    /// Print the invited team member roster for an event
    Roster {
        #[arg(long)]
        event_id: i64,
        #[arg(long)]
        json: bool,
    },
    /// Print event counts grouped by status and type
    Summary {
        #[arg(long)]
        json: bool,
    },
    /// Generate a markdown compliance report
    Report {
        #[arg(long)]
        event_id: Option<i64>,
        #[arg(long, default_value = "compliance-report.md")]
        out: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let database_url = std::env::var("DATABASE_URL")
        .context("DATABASE_URL must be set to a production Postgres instance")?;

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .context("failed to connect to Postgres")?;

    match cli.command {
        Commands::InitDb => {
            db::init_db(&pool).await?;
            println!("Schema ready.");
        }
        Commands::Seed => {
            db::seed(&pool).await?;
            println!("Seed data inserted.");
        }
        Commands::Invite {
            event_id,
            workday_id,
            email,
        } => {
            db::fetch_event(&pool, event_id)
                .await?
                .ok_or(ReportError::EventNotFound(event_id))?;
            db::fetch_team_member(&pool, &workday_id, &email)
                .await?
                .ok_or_else(|| ReportError::TeamMemberNotFound {
                    workday_id: workday_id.clone(),
                    email: email.clone(),
                })?;

            let invited =
                db::insert_invitation(&pool, event_id, &workday_id, &email, Utc::now()).await?;
            if invited {
                println!("Invited {workday_id} to event {event_id}.");
            } else {
                println!("{workday_id} is already invited to event {event_id}.");
            }
        }
        Commands::Import { event_id, csv } => {
            let event = db::fetch_event(&pool, event_id)
                .await?
                .ok_or(ReportError::EventNotFound(event_id))?;

            let invited = db::import_csv(&pool, event_id, &csv).await?;
            println!(
                "Invited {invited} team members to \"{}\" from {}.",
                event.title,
                csv.display()
            );
        }
        Commands::SetStatus {
            event_id,
            workday_id,
            email,
            status,
        } => {
            let status: InvitationStatus = status.parse()?;
            let updated =
                db::update_invitation_status(&pool, event_id, &workday_id, &email, status).await?;
            if !updated {
                return Err(ReportError::InvitationNotFound {
                    event_id,
                    workday_id,
                }
                .into());
            }
            println!("Marked {workday_id} as {status} for event {event_id}.");
        }
        Commands::Compliance { event_id, json } => {
            let scope = report::compliance_report(&pool, event_id).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&scope)?);
            } else {
                print_compliance(&scope);
            }
        }
        Commands::Roster { event_id, json } => {
            let roster = report::invited_team_members(&pool, event_id).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&roster)?);
            } else {
                println!(
                    "Invited team members for {} (target {:.0}%):",
                    roster.event_title, roster.target_compliance
                );
                if roster.invited_team_members.is_empty() {
                    println!("No invited team members found.");
                }
                for entry in &roster.invited_team_members {
                    println!(
                        "- {} ({}, {}) {}, invited {}",
                        entry.full_name,
                        entry.workday_id,
                        entry.email,
                        entry.status,
                        entry.invited_date.date_naive()
                    );
                }
                if roster.unresolved_invites > 0 {
                    println!(
                        "{} invitation(s) could not be matched to the team member directory.",
                        roster.unresolved_invites
                    );
                }
            }
        }
        Commands::Summary { json } => {
            let summary = report::event_summary(&pool).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                println!("Total events: {}", summary.total_events);
                println!("By status:");
                for (status, count) in &summary.events_by_status {
                    println!("- {status}: {count}");
                }
                println!("By type:");
                for (event_type, count) in &summary.events_by_type {
                    println!("- {event_type}: {count}");
                }
            }
        }
        Commands::Report { event_id, out } => {
            let scope = report::compliance_report(&pool, event_id).await?;
            let markdown = report::render_compliance_markdown(&scope);
            std::fs::write(&out, markdown)?;
            println!("Report written to {}.", out.display());
        }
    }

    Ok(())
}

fn print_compliance(scope: &ComplianceScope) {
    match scope {
        ComplianceScope::Event(report) => {
            println!(
                "{}: {} of {} invites registered ({:.2}% vs target {:.0}%, {})",
                report.event_name,
                report.overall_attendees,
                report.total_invites_sent,
                report.actual_compliance_percentage,
                report.target_compliance,
                report.compliance_status
            );
        }
        ComplianceScope::Portfolio(portfolio) => {
            println!("Portfolio compliance across {} events:", portfolio.total_events);
            for event in &portfolio.event_reports {
                println!(
                    "- {}: {:.2}% vs target {:.0}% ({})",
                    event.event_name,
                    event.actual_compliance_percentage,
                    event.target_compliance,
                    event.compliance_status
                );
            }
            println!(
                "{} of {} invites registered ({:.2}%), average target {:.2}% ({})",
                portfolio.overall_attendees,
                portfolio.total_invites_sent,
                portfolio.overall_compliance_percentage,
                portfolio.average_target_compliance,
                portfolio.compliance_status
            );
        }
    }
}
