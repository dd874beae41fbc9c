use anyhow::Context;
use chrono::{DateTime, TimeZone, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::error::ReportError;
use crate::models::{Event, InvitationRecord, InvitationStatus, TeamMember};

pub async fn init_db(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

pub async fn seed(pool: &PgPool) -> anyhow::Result<()> {
    let events = vec![
        (1_i64, "Q3 All Hands Town Hall", "townhall", "active", 80.0_f64),
        (2, "Secure Coding Workshop", "training", "active", 75.0),
        (3, "Holiday Social", "social", "inactive", 50.0),
    ];

    for (id, title, event_type, status, target_compliance) in events {
        sqlx::query(
            r#"
            INSERT INTO event_compliance.events (id, title, event_type, status, target_compliance)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (id) DO UPDATE
            SET title = EXCLUDED.title, event_type = EXCLUDED.event_type,
                status = EXCLUDED.status, target_compliance = EXCLUDED.target_compliance
            "#,
        )
        .bind(id)
        .bind(title)
        .bind(event_type)
        .bind(status)
        .bind(target_compliance)
        .execute(pool)
        .await?;
    }

    let members = vec![
        (
            "WD-10021",
            "avery.lee@teamhub.io",
            "Avery",
            None,
            "Lee",
            None,
            "Software Engineer II",
            "Engineering",
            "Platform",
            "Morgan Cruz",
            "Dana Whitfield",
        ),
        (
            "WD-10034",
            "jules.moreno@teamhub.io",
            "Jules",
            Some("R"),
            "Moreno",
            None,
            "QA Analyst",
            "Engineering",
            "Quality",
            "Morgan Cruz",
            "Dana Whitfield",
        ),
        (
            "WD-10058",
            "kiara.patel@teamhub.io",
            "Kiara",
            None,
            "Patel",
            None,
            "HR Generalist",
            "People Operations",
            "HR Services",
            "Sam Okafor",
            "Lee Tanaka",
        ),
        (
            "WD-10072",
            "noel.santos@teamhub.io",
            "Noel",
            Some("D"),
            "Santos",
            Some("Jr."),
            "Service Desk Analyst",
            "IT Operations",
            "Support",
            "Sam Okafor",
            "Lee Tanaka",
        ),
    ];

    for (
        workday_id,
        email,
        first_name,
        middle_name,
        last_name,
        suffix,
        job_profile,
        functional_area,
        practice,
        supervisor_name,
        operational_manager_name,
    ) in members
    {
        sqlx::query(
            r#"
            INSERT INTO event_compliance.team_members
            (workday_id, email, first_name, middle_name, last_name, suffix,
             job_profile, functional_area, practice, supervisor_name, operational_manager_name)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            ON CONFLICT (workday_id) DO UPDATE
            SET email = EXCLUDED.email, first_name = EXCLUDED.first_name,
                middle_name = EXCLUDED.middle_name, last_name = EXCLUDED.last_name,
                suffix = EXCLUDED.suffix, job_profile = EXCLUDED.job_profile,
                functional_area = EXCLUDED.functional_area, practice = EXCLUDED.practice,
                supervisor_name = EXCLUDED.supervisor_name,
                operational_manager_name = EXCLUDED.operational_manager_name
            "#,
        )
        .bind(workday_id)
        .bind(email)
        .bind(first_name)
        .bind(middle_name)
        .bind(last_name)
        .bind(suffix)
        .bind(job_profile)
        .bind(functional_area)
        .bind(practice)
        .bind(supervisor_name)
        .bind(operational_manager_name)
        .execute(pool)
        .await?;
    }

    let invitations = vec![
        (1_i64, "WD-10021", "avery.lee@teamhub.io", "registered", true, true, seed_timestamp(2026, 7, 6, 9, 0)?),
        (1, "WD-10034", "jules.moreno@teamhub.io", "registered", true, false, seed_timestamp(2026, 7, 6, 9, 5)?),
        (1, "WD-10058", "kiara.patel@teamhub.io", "unregistered", false, false, seed_timestamp(2026, 7, 6, 9, 10)?),
        (2, "WD-10021", "avery.lee@teamhub.io", "unregistered", false, false, seed_timestamp(2026, 7, 20, 14, 0)?),
        (2, "WD-10072", "noel.santos@teamhub.io", "registered", false, true, seed_timestamp(2026, 7, 20, 14, 5)?),
    ];

    for (event_id, workday_id, email, status, is_points_awarded, is_survey_done, invited_date) in
        invitations
    {
        sqlx::query(
            r#"
            INSERT INTO event_compliance.team_member_events
            (id, event_id, team_member_workday_id, team_member_email,
             status, is_points_awarded, is_survey_done, invited_date)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (event_id, team_member_workday_id, team_member_email) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(event_id)
        .bind(workday_id)
        .bind(email)
        .bind(status)
        .bind(is_points_awarded)
        .bind(is_survey_done)
        .bind(invited_date)
        .execute(pool)
        .await?;
    }

    Ok(())
}

fn seed_timestamp(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> anyhow::Result<DateTime<Utc>> {
    Utc.with_ymd_and_hms(year, month, day, hour, minute, 0)
        .single()
        .context("invalid seed timestamp")
}

fn event_from_row(row: &PgRow) -> anyhow::Result<Event> {
    let status: String = row.get("status");
    Ok(Event {
        id: row.get("id"),
        title: row.get("title"),
        event_type: row.get("event_type"),
        status: status.parse()?,
        target_compliance: row.get("target_compliance"),
    })
}

pub async fn fetch_event(pool: &PgPool, event_id: i64) -> anyhow::Result<Option<Event>> {
    let row = sqlx::query(
        "SELECT id, title, event_type, status, target_compliance \
         FROM event_compliance.events WHERE id = $1",
    )
    .bind(event_id)
    .fetch_optional(pool)
    .await?;

    row.as_ref().map(event_from_row).transpose()
}

pub async fn fetch_events(pool: &PgPool) -> anyhow::Result<Vec<Event>> {
    let rows = sqlx::query(
        "SELECT id, title, event_type, status, target_compliance \
         FROM event_compliance.events ORDER BY id",
    )
    .fetch_all(pool)
    .await?;

    let mut events = Vec::new();
    for row in &rows {
        events.push(event_from_row(row)?);
    }

    Ok(events)
}

pub async fn fetch_invitations(
    pool: &PgPool,
    event_id: Option<i64>,
) -> anyhow::Result<Vec<InvitationRecord>> {
    let mut query = String::from(
        "SELECT event_id, team_member_workday_id, team_member_email, status, \
         is_points_awarded, is_survey_done, invited_date \
         FROM event_compliance.team_member_events",
    );

    if event_id.is_some() {
        query.push_str(" WHERE event_id = $1");
    }

    let mut rows = sqlx::query(&query);
    if let Some(id) = event_id {
        rows = rows.bind(id);
    }

    let records = rows.fetch_all(pool).await?;
    let mut invitations = Vec::new();

    for row in records {
        let status: String = row.get("status");
        invitations.push(InvitationRecord {
            event_id: row.get("event_id"),
            workday_id: row.get("team_member_workday_id"),
            email: row.get("team_member_email"),
            status: status.parse()?,
            is_points_awarded: row.get("is_points_awarded"),
            is_survey_done: row.get("is_survey_done"),
            invited_date: row.get("invited_date"),
        });
    }

    Ok(invitations)
}

fn member_from_row(row: &PgRow) -> TeamMember {
    TeamMember {
        workday_id: row.get("workday_id"),
        email: row.get("email"),
        first_name: row.get("first_name"),
        middle_name: row.get("middle_name"),
        last_name: row.get("last_name"),
        suffix: row.get("suffix"),
        job_profile: row.get("job_profile"),
        functional_area: row.get("functional_area"),
        practice: row.get("practice"),
        supervisor_name: row.get("supervisor_name"),
        operational_manager_name: row.get("operational_manager_name"),
    }
}

pub async fn fetch_team_member(
    pool: &PgPool,
    workday_id: &str,
    email: &str,
) -> anyhow::Result<Option<TeamMember>> {
    let row = sqlx::query(
        "SELECT workday_id, email, first_name, middle_name, last_name, suffix, \
         job_profile, functional_area, practice, supervisor_name, operational_manager_name \
         FROM event_compliance.team_members WHERE workday_id = $1 AND email = $2",
    )
    .bind(workday_id)
    .bind(email)
    .fetch_optional(pool)
    .await?;

    Ok(row.as_ref().map(member_from_row))
}

pub async fn fetch_team_members(
    pool: &PgPool,
    workday_ids: &[String],
    emails: &[String],
) -> anyhow::Result<Vec<TeamMember>> {
    if workday_ids.is_empty() {
        return Ok(Vec::new());
    }

    // Candidate fetch only; the exact joint-key match happens in the roster.
    let rows = sqlx::query(
        "SELECT workday_id, email, first_name, middle_name, last_name, suffix, \
         job_profile, functional_area, practice, supervisor_name, operational_manager_name \
         FROM event_compliance.team_members \
         WHERE workday_id = ANY($1) AND email = ANY($2)",
    )
    .bind(workday_ids)
    .bind(emails)
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(member_from_row).collect())
}

pub async fn insert_invitation(
    pool: &PgPool,
    event_id: i64,
    workday_id: &str,
    email: &str,
    invited_date: DateTime<Utc>,
) -> anyhow::Result<bool> {
    let result = sqlx::query(
        r#"
        INSERT INTO event_compliance.team_member_events
        (id, event_id, team_member_workday_id, team_member_email,
         status, is_points_awarded, is_survey_done, invited_date)
        VALUES ($1, $2, $3, $4, 'unregistered', FALSE, FALSE, $5)
        ON CONFLICT (event_id, team_member_workday_id, team_member_email) DO NOTHING
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(event_id)
    .bind(workday_id)
    .bind(email)
    .bind(invited_date)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn update_invitation_status(
    pool: &PgPool,
    event_id: i64,
    workday_id: &str,
    email: &str,
    status: InvitationStatus,
) -> anyhow::Result<bool> {
    let result = sqlx::query(
        "UPDATE event_compliance.team_member_events SET status = $4 \
         WHERE event_id = $1 AND team_member_workday_id = $2 AND team_member_email = $3",
    )
    .bind(event_id)
    .bind(workday_id)
    .bind(email)
    .bind(status.as_str())
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn import_csv(
    pool: &PgPool,
    event_id: i64,
    csv_path: &std::path::Path,
) -> anyhow::Result<usize> {
    #[derive(serde::Deserialize)]
    struct CsvRow {
        workday_id: String,
        email: String,
        first_name: String,
        middle_name: Option<String>,
        last_name: String,
        suffix: Option<String>,
        job_profile: Option<String>,
        functional_area: Option<String>,
        practice: Option<String>,
        supervisor_name: Option<String>,
        operational_manager_name: Option<String>,
    }

    let mut reader = csv::Reader::from_path(csv_path)?;
    let mut invited = 0usize;

    for (index, result) in reader.deserialize::<CsvRow>().enumerate() {
        let row = result?;
        if row.workday_id.trim().is_empty() || row.email.trim().is_empty() {
            return Err(ReportError::InvalidState(format!(
                "invitation row {} is missing workday_id or email",
                index + 1
            ))
            .into());
        }

        sqlx::query(
            r#"
            INSERT INTO event_compliance.team_members
            (workday_id, email, first_name, middle_name, last_name, suffix,
             job_profile, functional_area, practice, supervisor_name, operational_manager_name)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            ON CONFLICT (workday_id) DO UPDATE
            SET email = EXCLUDED.email, first_name = EXCLUDED.first_name,
                middle_name = EXCLUDED.middle_name, last_name = EXCLUDED.last_name,
                suffix = EXCLUDED.suffix, job_profile = EXCLUDED.job_profile,
                functional_area = EXCLUDED.functional_area, practice = EXCLUDED.practice,
                supervisor_name = EXCLUDED.supervisor_name,
                operational_manager_name = EXCLUDED.operational_manager_name
            "#,
        )
        .bind(&row.workday_id)
        .bind(&row.email)
        .bind(&row.first_name)
        .bind(&row.middle_name)
        .bind(&row.last_name)
        .bind(&row.suffix)
        .bind(&row.job_profile)
        .bind(&row.functional_area)
        .bind(&row.practice)
        .bind(&row.supervisor_name)
        .bind(&row.operational_manager_name)
        .execute(pool)
        .await?;

        if insert_invitation(pool, event_id, &row.workday_id, &row.email, Utc::now()).await? {
            invited += 1;
        }
    }

    Ok(invited)
}
