use std::collections::HashMap;

use crate::models::{Event, InvitationRecord, RosterEntry, RosterReport, TeamMember};

pub fn full_name(first: &str, middle: Option<&str>, last: &str, suffix: Option<&str>) -> String {
    [Some(first), middle, Some(last), suffix]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn build_roster(
    event: &Event,
    records: &[InvitationRecord],
    members: &[TeamMember],
) -> RosterReport {
    // The directory index is keyed on both identifying fields; a record must
    // match its profile on workday id AND email.
    let directory: HashMap<(&str, &str), &TeamMember> = members
        .iter()
        .map(|member| ((member.workday_id.as_str(), member.email.as_str()), member))
        .collect();

    let mut entries = Vec::new();
    let mut unresolved = 0usize;
    for record in records {
        let key = (record.workday_id.as_str(), record.email.as_str());
        let Some(member) = directory.get(&key) else {
            // Records can reference members since removed from the directory.
            unresolved += 1;
            continue;
        };

        entries.push(RosterEntry {
            workday_id: member.workday_id.clone(),
            email: member.email.clone(),
            full_name: full_name(
                &member.first_name,
                member.middle_name.as_deref(),
                &member.last_name,
                member.suffix.as_deref(),
            ),
            first_name: member.first_name.clone(),
            middle_name: member.middle_name.clone(),
            last_name: member.last_name.clone(),
            suffix: member.suffix.clone(),
            job_profile: member.job_profile.clone(),
            functional_area: member.functional_area.clone(),
            practice: member.practice.clone(),
            supervisor_name: member.supervisor_name.clone(),
            operational_manager_name: member.operational_manager_name.clone(),
            status: record.status,
            is_points_awarded: record.is_points_awarded,
            is_survey_done: record.is_survey_done,
            invited_date: record.invited_date,
        });
    }

    entries.sort_by(|a, b| {
        a.last_name
            .cmp(&b.last_name)
            .then_with(|| a.first_name.cmp(&b.first_name))
            .then_with(|| a.workday_id.cmp(&b.workday_id))
    });

    RosterReport {
        event_id: event.id,
        event_title: event.title.clone(),
        total_invited: entries.len(),
        target_compliance: event.target_compliance,
        invited_team_members: entries,
        unresolved_invites: unresolved,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EventStatus, InvitationStatus};
    use chrono::Utc;

    fn sample_event() -> Event {
        Event {
            id: 1,
            title: "Q3 All Hands Town Hall".to_string(),
            event_type: "townhall".to_string(),
            status: EventStatus::Active,
            target_compliance: 80.0,
        }
    }

    fn sample_member(workday_id: &str, email: &str, first: &str, last: &str) -> TeamMember {
        TeamMember {
            workday_id: workday_id.to_string(),
            email: email.to_string(),
            first_name: first.to_string(),
            middle_name: None,
            last_name: last.to_string(),
            suffix: None,
            job_profile: Some("Software Engineer II".to_string()),
            functional_area: Some("Engineering".to_string()),
            practice: Some("Platform".to_string()),
            supervisor_name: Some("Morgan Cruz".to_string()),
            operational_manager_name: Some("Dana Whitfield".to_string()),
        }
    }

    fn sample_invitation(workday_id: &str, email: &str, status: InvitationStatus) -> InvitationRecord {
        InvitationRecord {
            event_id: 1,
            workday_id: workday_id.to_string(),
            email: email.to_string(),
            status,
            is_points_awarded: true,
            is_survey_done: false,
            invited_date: Utc::now(),
        }
    }

    #[test]
    fn full_name_skips_absent_middle_and_suffix() {
        assert_eq!(full_name("Avery", None, "Lee", None), "Avery Lee");
        assert_eq!(full_name("Avery", Some(""), "Lee", None), "Avery Lee");
        assert_eq!(full_name("Noel", Some("D"), "Santos", Some("Jr.")), "Noel D Santos Jr.");
        assert_eq!(full_name(" Avery ", Some("  "), "Lee", None), "Avery Lee");
        assert!(!full_name("Avery", None, "Lee", None).contains("  "));
    }

    #[test]
    fn unresolved_invitations_are_excluded_not_fatal() {
        let event = sample_event();
        let members = vec![sample_member("WD-10021", "avery.lee@teamhub.io", "Avery", "Lee")];
        let records = vec![
            sample_invitation("WD-10021", "avery.lee@teamhub.io", InvitationStatus::Registered),
            sample_invitation("WD-99999", "ghost@teamhub.io", InvitationStatus::Unregistered),
        ];

        let roster = build_roster(&event, &records, &members);
        assert_eq!(roster.total_invited, 1);
        assert_eq!(roster.invited_team_members.len(), 1);
        assert_eq!(roster.unresolved_invites, 1);
        assert_eq!(roster.invited_team_members[0].workday_id, "WD-10021");
    }

    #[test]
    fn member_must_match_on_both_workday_id_and_email() {
        let event = sample_event();
        let members = vec![sample_member("WD-10021", "avery.lee@teamhub.io", "Avery", "Lee")];
        let records = vec![sample_invitation(
            "WD-10021",
            "old.address@teamhub.io",
            InvitationStatus::Registered,
        )];

        let roster = build_roster(&event, &records, &members);
        assert_eq!(roster.total_invited, 0);
        assert_eq!(roster.unresolved_invites, 1);
    }

    #[test]
    fn entries_carry_invitation_fields() {
        let event = sample_event();
        let members = vec![sample_member("WD-10021", "avery.lee@teamhub.io", "Avery", "Lee")];
        let records = vec![sample_invitation(
            "WD-10021",
            "avery.lee@teamhub.io",
            InvitationStatus::Registered,
        )];

        let roster = build_roster(&event, &records, &members);
        let entry = &roster.invited_team_members[0];
        assert_eq!(entry.status, InvitationStatus::Registered);
        assert!(entry.is_points_awarded);
        assert!(!entry.is_survey_done);
        assert_eq!(entry.invited_date, records[0].invited_date);
        assert_eq!(entry.supervisor_name.as_deref(), Some("Morgan Cruz"));
        assert_eq!(entry.operational_manager_name.as_deref(), Some("Dana Whitfield"));
    }

    #[test]
    fn entries_sorted_by_last_name() {
        let event = sample_event();
        let members = vec![
            sample_member("WD-10058", "kiara.patel@teamhub.io", "Kiara", "Patel"),
            sample_member("WD-10021", "avery.lee@teamhub.io", "Avery", "Lee"),
            sample_member("WD-10034", "jules.moreno@teamhub.io", "Jules", "Moreno"),
        ];
        let records = vec![
            sample_invitation("WD-10058", "kiara.patel@teamhub.io", InvitationStatus::Unregistered),
            sample_invitation("WD-10021", "avery.lee@teamhub.io", InvitationStatus::Registered),
            sample_invitation("WD-10034", "jules.moreno@teamhub.io", InvitationStatus::Registered),
        ];

        let roster = build_roster(&event, &records, &members);
        let last_names: Vec<&str> = roster
            .invited_team_members
            .iter()
            .map(|entry| entry.last_name.as_str())
            .collect();
        assert_eq!(last_names, vec!["Lee", "Moreno", "Patel"]);
    }
}
