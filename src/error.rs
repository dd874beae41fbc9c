use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("event {0} not found")]
    EventNotFound(i64),

    #[error("team member {workday_id} <{email}> not found")]
    TeamMemberNotFound { workday_id: String, email: String },

    #[error("no invitation for team member {workday_id} on event {event_id}")]
    InvitationNotFound { event_id: i64, workday_id: String },

    #[error("invalid record state: {0}")]
    InvalidState(String),

    #[error("failed to generate {report} report")]
    Aggregation {
        report: &'static str,
        #[source]
        source: anyhow::Error,
    },
}

impl ReportError {
    pub fn aggregation(report: &'static str, source: anyhow::Error) -> Self {
        Self::Aggregation { report, source }
    }
}

pub type ReportResult<T> = Result<T, ReportError>;
