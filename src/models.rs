use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::ReportError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventStatus {
    Active,
    Inactive,
}

impl EventStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventStatus {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            other => Err(ReportError::InvalidState(format!(
                "unknown event status '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InvitationStatus {
    Registered,
    Unregistered,
}

impl InvitationStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Registered => "registered",
            Self::Unregistered => "unregistered",
        }
    }
}

impl fmt::Display for InvitationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InvitationStatus {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "registered" => Ok(Self::Registered),
            "unregistered" => Ok(Self::Unregistered),
            other => Err(ReportError::InvalidState(format!(
                "unknown invitation status '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Event {
    pub id: i64,
    pub title: String,
    pub event_type: String,
    pub status: EventStatus,
    pub target_compliance: f64,
}

#[derive(Debug, Clone)]
pub struct InvitationRecord {
    pub event_id: i64,
    pub workday_id: String,
    pub email: String,
    pub status: InvitationStatus,
    pub is_points_awarded: bool,
    pub is_survey_done: bool,
    pub invited_date: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct TeamMember {
    pub workday_id: String,
    pub email: String,
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
    pub suffix: Option<String>,
    pub job_profile: Option<String>,
    pub functional_area: Option<String>,
    pub practice: Option<String>,
    pub supervisor_name: Option<String>,
    pub operational_manager_name: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ComplianceStatus {
    Met,
    #[serde(rename = "Not Met")]
    NotMet,
}

impl ComplianceStatus {
    pub fn from_percentages(actual: f64, target: f64) -> Self {
        if actual >= target {
            Self::Met
        } else {
            Self::NotMet
        }
    }
}

impl fmt::Display for ComplianceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Met => f.write_str("Met"),
            Self::NotMet => f.write_str("Not Met"),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct ComplianceBreakdown {
    pub registered: usize,
    pub unregistered: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceReport {
    pub event_id: i64,
    pub event_name: String,
    pub total_invites_sent: usize,
    pub overall_attendees: usize,
    pub compliance_breakdown: ComplianceBreakdown,
    pub target_compliance: f64,
    pub actual_compliance_percentage: f64,
    pub compliance_status: ComplianceStatus,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventComplianceSummary {
    pub event_id: i64,
    pub event_name: String,
    pub target_compliance: f64,
    pub actual_compliance_percentage: f64,
    pub compliance_status: ComplianceStatus,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioComplianceReport {
    pub total_events: usize,
    pub total_invites_sent: usize,
    pub overall_attendees: usize,
    pub compliance_breakdown: ComplianceBreakdown,
    pub overall_compliance_percentage: f64,
    pub average_target_compliance: f64,
    pub event_reports: Vec<EventComplianceSummary>,
    pub compliance_status: ComplianceStatus,
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ComplianceScope {
    Event(ComplianceReport),
    Portfolio(PortfolioComplianceReport),
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterEntry {
    pub workday_id: String,
    pub email: String,
    pub full_name: String,
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
    pub suffix: Option<String>,
    pub job_profile: Option<String>,
    pub functional_area: Option<String>,
    pub practice: Option<String>,
    pub supervisor_name: Option<String>,
    pub operational_manager_name: Option<String>,
    #[serde(rename = "eventStatus")]
    pub status: InvitationStatus,
    pub is_points_awarded: bool,
    pub is_survey_done: bool,
    pub invited_date: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterReport {
    pub event_id: i64,
    pub event_title: String,
    pub total_invited: usize,
    pub target_compliance: f64,
    pub invited_team_members: Vec<RosterEntry>,
    pub unresolved_invites: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventSummary {
    pub total_events: usize,
    pub events_by_status: BTreeMap<String, usize>,
    pub events_by_type: BTreeMap<String, usize>,
}
