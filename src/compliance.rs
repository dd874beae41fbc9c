use std::collections::HashMap;

use crate::models::{
    ComplianceBreakdown, ComplianceReport, ComplianceStatus, Event, EventComplianceSummary,
    InvitationRecord, InvitationStatus, PortfolioComplianceReport,
};

// A set with no invitations reports 0% rather than NaN.
pub fn compliance_percentage(registered: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    registered as f64 / total as f64 * 100.0
}

fn registered_count<'a, I>(records: I) -> usize
where
    I: IntoIterator<Item = &'a InvitationRecord>,
{
    records
        .into_iter()
        .filter(|record| record.status == InvitationStatus::Registered)
        .count()
}

pub fn event_report(event: &Event, records: &[InvitationRecord]) -> ComplianceReport {
    let total = records.len();
    let registered = registered_count(records);
    let actual = compliance_percentage(registered, total);

    ComplianceReport {
        event_id: event.id,
        event_name: event.title.clone(),
        total_invites_sent: total,
        overall_attendees: registered,
        compliance_breakdown: ComplianceBreakdown {
            registered,
            unregistered: total - registered,
        },
        target_compliance: event.target_compliance,
        actual_compliance_percentage: actual,
        compliance_status: ComplianceStatus::from_percentages(actual, event.target_compliance),
    }
}

pub fn partition_by_event(records: &[InvitationRecord]) -> HashMap<i64, Vec<&InvitationRecord>> {
    let mut partitions: HashMap<i64, Vec<&InvitationRecord>> = HashMap::new();
    for record in records {
        partitions.entry(record.event_id).or_default().push(record);
    }
    partitions
}

pub fn portfolio_report(
    events: &[Event],
    records: &[InvitationRecord],
) -> PortfolioComplianceReport {
    // One pass over the ledger; per-event subsets come from the partition,
    // never from re-filtering the full list.
    let partitions = partition_by_event(records);

    let total_invites = records.len();
    let total_registered = registered_count(records);
    let overall = compliance_percentage(total_registered, total_invites);

    let mut event_reports = Vec::with_capacity(events.len());
    let mut target_sum = 0.0;
    for event in events {
        let event_records = partitions
            .get(&event.id)
            .map(|subset| subset.as_slice())
            .unwrap_or(&[]);
        let registered = registered_count(event_records.iter().copied());
        let actual = compliance_percentage(registered, event_records.len());

        target_sum += event.target_compliance;
        event_reports.push(EventComplianceSummary {
            event_id: event.id,
            event_name: event.title.clone(),
            target_compliance: event.target_compliance,
            actual_compliance_percentage: actual,
            compliance_status: ComplianceStatus::from_percentages(
                actual,
                event.target_compliance,
            ),
        });
    }

    let average_target = if events.is_empty() {
        0.0
    } else {
        target_sum / events.len() as f64
    };

    PortfolioComplianceReport {
        total_events: events.len(),
        total_invites_sent: total_invites,
        overall_attendees: total_registered,
        compliance_breakdown: ComplianceBreakdown {
            registered: total_registered,
            unregistered: total_invites - total_registered,
        },
        overall_compliance_percentage: overall,
        average_target_compliance: average_target,
        event_reports,
        compliance_status: ComplianceStatus::from_percentages(overall, average_target),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EventStatus;
    use chrono::Utc;

    fn sample_event(id: i64, target: f64) -> Event {
        Event {
            id,
            title: format!("Event {id}"),
            event_type: "training".to_string(),
            status: EventStatus::Active,
            target_compliance: target,
        }
    }

    fn sample_invitation(event_id: i64, workday_id: &str, status: InvitationStatus) -> InvitationRecord {
        InvitationRecord {
            event_id,
            workday_id: workday_id.to_string(),
            email: format!("{}@teamhub.io", workday_id.to_lowercase()),
            status,
            is_points_awarded: false,
            is_survey_done: false,
            invited_date: Utc::now(),
        }
    }

    #[test]
    fn registered_and_unregistered_sum_to_total() {
        let event = sample_event(1, 60.0);
        let records = vec![
            sample_invitation(1, "WD-100", InvitationStatus::Registered),
            sample_invitation(1, "WD-101", InvitationStatus::Unregistered),
            sample_invitation(1, "WD-102", InvitationStatus::Registered),
            sample_invitation(1, "WD-103", InvitationStatus::Unregistered),
            sample_invitation(1, "WD-104", InvitationStatus::Unregistered),
        ];

        let report = event_report(&event, &records);
        let breakdown = report.compliance_breakdown;
        assert_eq!(
            breakdown.registered + breakdown.unregistered,
            report.total_invites_sent
        );
        assert_eq!(report.overall_attendees, 2);
        assert!(report.actual_compliance_percentage >= 0.0);
        assert!(report.actual_compliance_percentage <= 100.0);
    }

    #[test]
    fn zero_invite_event_reports_zero_percent() {
        let event = sample_event(7, 80.0);
        let report = event_report(&event, &[]);

        assert_eq!(report.total_invites_sent, 0);
        assert_eq!(report.actual_compliance_percentage, 0.0);
        assert!(report.actual_compliance_percentage.is_finite());
        assert_eq!(report.compliance_status, ComplianceStatus::NotMet);
    }

    #[test]
    fn empty_portfolio_uses_zero_averages() {
        let report = portfolio_report(&[], &[]);

        assert_eq!(report.total_events, 0);
        assert_eq!(report.total_invites_sent, 0);
        assert_eq!(report.overall_compliance_percentage, 0.0);
        assert_eq!(report.average_target_compliance, 0.0);
        assert!(report.average_target_compliance.is_finite());
        assert!(report.event_reports.is_empty());
        assert_eq!(report.compliance_status, ComplianceStatus::Met);
    }

    #[test]
    fn portfolio_matches_hand_computed_totals() {
        let events = vec![sample_event(1, 80.0), sample_event(2, 50.0)];
        let mut records = Vec::new();
        for i in 0..9 {
            records.push(sample_invitation(1, &format!("WD-1{i:02}"), InvitationStatus::Registered));
        }
        records.push(sample_invitation(1, "WD-199", InvitationStatus::Unregistered));
        records.push(sample_invitation(2, "WD-200", InvitationStatus::Registered));
        for i in 0..3 {
            records.push(sample_invitation(2, &format!("WD-2{i:02}1"), InvitationStatus::Unregistered));
        }

        let report = portfolio_report(&events, &records);
        assert_eq!(report.total_events, 2);
        assert_eq!(report.total_invites_sent, 14);
        assert_eq!(report.overall_attendees, 10);
        assert_eq!(report.compliance_breakdown.unregistered, 4);
        assert!((report.overall_compliance_percentage - 10.0 / 14.0 * 100.0).abs() < 1e-9);
        assert!((report.average_target_compliance - 65.0).abs() < 1e-9);
        assert_eq!(report.compliance_status, ComplianceStatus::Met);

        let first = &report.event_reports[0];
        assert!((first.actual_compliance_percentage - 90.0).abs() < 1e-9);
        assert_eq!(first.compliance_status, ComplianceStatus::Met);

        let second = &report.event_reports[1];
        assert!((second.actual_compliance_percentage - 25.0).abs() < 1e-9);
        assert_eq!(second.compliance_status, ComplianceStatus::NotMet);
    }

    #[test]
    fn partition_keeps_every_record_exactly_once() {
        let records = vec![
            sample_invitation(1, "WD-100", InvitationStatus::Registered),
            sample_invitation(2, "WD-101", InvitationStatus::Unregistered),
            sample_invitation(1, "WD-102", InvitationStatus::Unregistered),
            sample_invitation(5, "WD-103", InvitationStatus::Registered),
            sample_invitation(2, "WD-104", InvitationStatus::Registered),
        ];

        let partitions = partition_by_event(&records);
        let partitioned_total: usize = partitions.values().map(Vec::len).sum();
        assert_eq!(partitioned_total, records.len());
        assert_eq!(partitions[&1].len(), 2);
        assert_eq!(partitions[&2].len(), 2);
        assert_eq!(partitions[&5].len(), 1);
        assert!(partitions[&1].iter().all(|record| record.event_id == 1));
    }

    #[test]
    fn records_without_catalog_event_still_count_in_totals() {
        let events = vec![sample_event(1, 50.0)];
        let records = vec![
            sample_invitation(1, "WD-100", InvitationStatus::Registered),
            sample_invitation(1, "WD-101", InvitationStatus::Unregistered),
            sample_invitation(99, "WD-102", InvitationStatus::Registered),
        ];

        let report = portfolio_report(&events, &records);
        assert_eq!(report.total_invites_sent, 3);
        assert_eq!(report.overall_attendees, 2);
        assert_eq!(report.event_reports.len(), 1);
    }

    #[test]
    fn event_reports_follow_event_order() {
        let events = vec![sample_event(3, 10.0), sample_event(1, 20.0), sample_event(2, 30.0)];
        let report = portfolio_report(&events, &[]);

        let ids: Vec<i64> = report.event_reports.iter().map(|summary| summary.event_id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }
}
