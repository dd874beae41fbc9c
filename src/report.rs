use std::collections::BTreeMap;
use std::fmt::Write;

use sqlx::PgPool;

use crate::compliance;
use crate::db;
use crate::error::{ReportError, ReportResult};
use crate::models::{
    ComplianceReport, ComplianceScope, Event, EventSummary, PortfolioComplianceReport,
    RosterReport,
};
use crate::roster;

pub async fn compliance_report(
    pool: &PgPool,
    event_id: Option<i64>,
) -> ReportResult<ComplianceScope> {
    match event_id {
        Some(id) => {
            let event = db::fetch_event(pool, id)
                .await
                .map_err(|source| ReportError::aggregation("event compliance", source))?
                .ok_or(ReportError::EventNotFound(id))?;
            let records = db::fetch_invitations(pool, Some(id))
                .await
                .map_err(|source| ReportError::aggregation("event compliance", source))?;

            Ok(ComplianceScope::Event(compliance::event_report(&event, &records)))
        }
        None => {
            let (events, records) =
                tokio::try_join!(db::fetch_events(pool), db::fetch_invitations(pool, None))
                    .map_err(|source| ReportError::aggregation("portfolio compliance", source))?;

            Ok(ComplianceScope::Portfolio(compliance::portfolio_report(&events, &records)))
        }
    }
}

pub async fn invited_team_members(pool: &PgPool, event_id: i64) -> ReportResult<RosterReport> {
    let event = db::fetch_event(pool, event_id)
        .await
        .map_err(|source| ReportError::aggregation("invited team members", source))?
        .ok_or(ReportError::EventNotFound(event_id))?;
    let records = db::fetch_invitations(pool, Some(event_id))
        .await
        .map_err(|source| ReportError::aggregation("invited team members", source))?;

    let workday_ids: Vec<String> = records.iter().map(|record| record.workday_id.clone()).collect();
    let emails: Vec<String> = records.iter().map(|record| record.email.clone()).collect();
    let members = db::fetch_team_members(pool, &workday_ids, &emails)
        .await
        .map_err(|source| ReportError::aggregation("invited team members", source))?;

    Ok(roster::build_roster(&event, &records, &members))
}

pub async fn event_summary(pool: &PgPool) -> ReportResult<EventSummary> {
    let events = db::fetch_events(pool)
        .await
        .map_err(|source| ReportError::aggregation("event summary", source))?;

    Ok(summarize_events(&events))
}

pub fn summarize_events(events: &[Event]) -> EventSummary {
    let mut events_by_status: BTreeMap<String, usize> = BTreeMap::new();
    let mut events_by_type: BTreeMap<String, usize> = BTreeMap::new();

    for event in events {
        *events_by_status
            .entry(event.status.as_str().to_string())
            .or_insert(0) += 1;
        *events_by_type.entry(event.event_type.clone()).or_insert(0) += 1;
    }

    EventSummary {
        total_events: events.len(),
        events_by_status,
        events_by_type,
    }
}

pub fn render_compliance_markdown(scope: &ComplianceScope) -> String {
    match scope {
        ComplianceScope::Event(report) => render_event_markdown(report),
        ComplianceScope::Portfolio(report) => render_portfolio_markdown(report),
    }
}

fn render_event_markdown(report: &ComplianceReport) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "# Event Compliance Report");
    let _ = writeln!(output, "Event: {} (id {})", report.event_name, report.event_id);
    let _ = writeln!(output);
    let _ = writeln!(output, "- Invites sent: {}", report.total_invites_sent);
    let _ = writeln!(output, "- Registered: {}", report.compliance_breakdown.registered);
    let _ = writeln!(output, "- Unregistered: {}", report.compliance_breakdown.unregistered);
    let _ = writeln!(
        output,
        "- Actual compliance: {:.2}%",
        report.actual_compliance_percentage
    );
    let _ = writeln!(output, "- Target compliance: {:.0}%", report.target_compliance);
    let _ = writeln!(output, "- Status: {}", report.compliance_status);

    output
}

fn render_portfolio_markdown(report: &PortfolioComplianceReport) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "# Portfolio Compliance Report");
    let _ = writeln!(
        output,
        "Covering {} events and {} invitations",
        report.total_events, report.total_invites_sent
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "## Overall");
    let _ = writeln!(output, "- Invites sent: {}", report.total_invites_sent);
    let _ = writeln!(output, "- Registered: {}", report.compliance_breakdown.registered);
    let _ = writeln!(output, "- Unregistered: {}", report.compliance_breakdown.unregistered);
    let _ = writeln!(
        output,
        "- Overall compliance: {:.2}%",
        report.overall_compliance_percentage
    );
    let _ = writeln!(
        output,
        "- Average target compliance: {:.2}%",
        report.average_target_compliance
    );
    let _ = writeln!(output, "- Status: {}", report.compliance_status);

    let _ = writeln!(output);
    let _ = writeln!(output, "## Event Breakdown");

    if report.event_reports.is_empty() {
        let _ = writeln!(output, "No events in the catalog.");
    } else {
        for event in &report.event_reports {
            let _ = writeln!(
                output,
                "- {}: {:.2}% vs target {:.0}% ({})",
                event.event_name,
                event.actual_compliance_percentage,
                event.target_compliance,
                event.compliance_status
            );
        }
    }

    output
}
