use crate::aggregate::AttendanceLedger;
use crate::config::ReportConfig;
use crate::models::{AliasCandidate, AliasSuggestion};

/// True if this looks like a staff/demonstrator address that should be
/// excluded from the attendance reports.
pub fn is_excluded(config: &ReportConfig, email: &str) -> bool {
    config
        .excluded_domains
        .iter()
        .any(|domain| email.ends_with(domain.as_str()))
        || config.excluded_emails.iter().any(|known| known == email)
}

/// True if this looks like an official institutional student address, as
/// opposed to a personal one.
pub fn is_verified(config: &ReportConfig, email: &str) -> bool {
    config
        .verified_domains
        .iter()
        .any(|domain| email.ends_with(domain.as_str()))
}

/// Resolve an address to the key all of its records are grouped under:
/// the mapped canonical address if an alias entry exists, else the address
/// unchanged.
pub fn identity_key<'a>(config: &'a ReportConfig, email: &'a str) -> &'a str {
    config
        .aliases
        .get(email)
        .map(String::as_str)
        .unwrap_or(email)
}

/// Propose alias pairings for participants not matched to an institutional
/// address, by looking for their surname inside the display names of
/// verified identities. Advisory only: confirmed pairings have to be added
/// to the configured alias map by hand.
pub fn suggest_pairings(
    config: &ReportConfig,
    ledger: &AttendanceLedger,
) -> Vec<AliasSuggestion> {
    let mut suggestions = Vec::new();

    for (key, days) in ledger.participants() {
        if is_excluded(config, key) || is_verified(config, key) {
            continue;
        }
        let Some(first) = days.values().next() else {
            continue;
        };

        // Last whitespace-delimited token of the display name. A blank name
        // yields no candidates: an empty surname would match every record.
        let surname = first.name.split_whitespace().last().unwrap_or("");
        let mut matches = Vec::new();
        if !surname.is_empty() {
            for (candidate_key, candidate_days) in ledger.participants() {
                if !is_verified(config, candidate_key) {
                    continue;
                }
                let Some(candidate) = candidate_days.values().next() else {
                    continue;
                };
                if candidate.name.contains(surname) {
                    matches.push(AliasCandidate {
                        name: candidate.name.clone(),
                        email: candidate.email.clone(),
                    });
                }
            }
        }

        suggestions.push(AliasSuggestion {
            name: first.name.clone(),
            email: first.email.clone(),
            matches,
        });
    }

    suggestions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AttendanceRow;
    use chrono::NaiveDateTime;

    fn sample_row(name: &str, email: &str, start: &str, minutes: u32) -> AttendanceRow {
        AttendanceRow {
            name: name.to_string(),
            email: email.to_string(),
            start: start.to_string(),
            started_at: NaiveDateTime::parse_from_str(start, "%d/%m/%Y %I:%M:%S %p").unwrap(),
            minutes,
        }
    }

    fn ledger_with(config: &ReportConfig, rows: Vec<AttendanceRow>) -> AttendanceLedger {
        let mut ledger = AttendanceLedger::new();
        for row in rows {
            ledger.fold(config, row);
        }
        ledger
    }

    #[test]
    fn staff_domains_are_excluded() {
        let config = ReportConfig::default();
        assert!(is_excluded(&config, "demo@glasgow.ac.uk"));
        assert!(is_excluded(&config, "prof@research.gla.ac.uk"));
        assert!(!is_excluded(&config, "1234567a@student.gla.ac.uk"));
        assert!(!is_excluded(&config, "someone@hotmail.com"));
    }

    #[test]
    fn manual_exceptions_are_excluded() {
        let mut config = ReportConfig::default();
        config
            .excluded_emails
            .push("demonstrator@student.gla.ac.uk".to_string());
        assert!(is_excluded(&config, "demonstrator@student.gla.ac.uk"));
        assert!(!is_excluded(&config, "1234567a@student.gla.ac.uk"));
    }

    #[test]
    fn student_domain_is_verified() {
        let config = ReportConfig::default();
        assert!(is_verified(&config, "1234567a@student.gla.ac.uk"));
        assert!(!is_verified(&config, "demo@glasgow.ac.uk"));
        assert!(!is_verified(&config, "someone@hotmail.com"));
    }

    #[test]
    fn alias_entries_resolve_to_the_canonical_address() {
        let mut config = ReportConfig::default();
        config.aliases.insert(
            "a@personal.com".to_string(),
            "1a@student.gla.ac.uk".to_string(),
        );
        assert_eq!(identity_key(&config, "a@personal.com"), "1a@student.gla.ac.uk");
        assert_eq!(identity_key(&config, "b@personal.com"), "b@personal.com");
    }

    #[test]
    fn surname_match_suggests_a_pairing() {
        let config = ReportConfig::default();
        let ledger = ledger_with(
            &config,
            vec![
                sample_row("Ann Black", "ann@hotmail.com", "01/10/2020 09:00:00 AM", 30),
                sample_row(
                    "Annabel Black",
                    "1234567b@student.gla.ac.uk",
                    "01/10/2020 09:00:00 AM",
                    45,
                ),
            ],
        );

        let suggestions = suggest_pairings(&config, &ledger);
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].email, "ann@hotmail.com");
        assert_eq!(suggestions[0].matches.len(), 1);
        assert_eq!(suggestions[0].matches[0].email, "1234567b@student.gla.ac.uk");
    }

    #[test]
    fn at_most_one_suggestion_per_candidate() {
        let config = ReportConfig::default();
        // The candidate attends twice; their identity must still only be
        // suggested once.
        let ledger = ledger_with(
            &config,
            vec![
                sample_row("Ann Black", "ann@hotmail.com", "01/10/2020 09:00:00 AM", 30),
                sample_row(
                    "Annabel Black",
                    "1234567b@student.gla.ac.uk",
                    "01/10/2020 09:00:00 AM",
                    45,
                ),
                sample_row(
                    "Annabel Black",
                    "1234567b@student.gla.ac.uk",
                    "08/10/2020 09:00:00 AM",
                    45,
                ),
            ],
        );

        let suggestions = suggest_pairings(&config, &ledger);
        assert_eq!(suggestions[0].matches.len(), 1);
    }

    #[test]
    fn excluded_and_verified_identities_get_no_suggestions() {
        let config = ReportConfig::default();
        let ledger = ledger_with(
            &config,
            vec![
                sample_row(
                    "A Student",
                    "1234567a@student.gla.ac.uk",
                    "01/10/2020 09:00:00 AM",
                    30,
                ),
                sample_row("A Prof", "prof@glasgow.ac.uk", "01/10/2020 09:00:00 AM", 30),
            ],
        );
        assert!(suggest_pairings(&config, &ledger).is_empty());
    }

    #[test]
    fn unmatched_participant_without_surname_match_is_still_reported() {
        let config = ReportConfig::default();
        let ledger = ledger_with(
            &config,
            vec![sample_row(
                "Ann Black",
                "ann@hotmail.com",
                "01/10/2020 09:00:00 AM",
                30,
            )],
        );

        let suggestions = suggest_pairings(&config, &ledger);
        assert_eq!(suggestions.len(), 1);
        assert!(suggestions[0].matches.is_empty());
    }
}
