use std::collections::HashSet;

use crate::model::{CourseFact, ReconciliationResult, StoredCourse};

/// Full outer set-difference between what is stored and what was just
/// scraped, keyed purely by content equality — the grid carries no stable
/// identifiers, so there is nothing else to match on.
///
/// A course that changed in any field shows up as one deletion plus one
/// creation, never as an update. Unchanged courses appear in neither output.
/// Duplicate content inside `fresh` contributes a single creation.
pub fn diff(stored: &[StoredCourse], fresh: &[CourseFact]) -> ReconciliationResult {
    let stored_facts: HashSet<&CourseFact> = stored.iter().map(|c| &c.fact).collect();
    let fresh_facts: HashSet<&CourseFact> = fresh.iter().collect();

    let mut seen: HashSet<&CourseFact> = HashSet::new();
    let to_create = fresh
        .iter()
        .filter(|fact| !stored_facts.contains(*fact) && seen.insert(*fact))
        .cloned()
        .collect();

    let to_delete = stored
        .iter()
        .filter(|course| !fresh_facts.contains(&course.fact))
        .cloned()
        .collect();

    ReconciliationResult { to_create, to_delete }
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use chrono::{NaiveTime, Weekday};

    use super::*;
    use crate::model::{Category, WeekParity};

    fn fact(name: &str) -> CourseFact {
        CourseFact {
            schedule_id: "wcy21ix1s1".into(),
            starts_at: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
            ends_at: NaiveTime::from_hms_opt(9, 30, 0).unwrap(),
            name: name.into(),
            category: Category::Lecture,
            teachers: BTreeSet::new(),
            rooms: BTreeSet::new(),
            day_of_week: Weekday::Mon,
            week_parity: WeekParity::Every,
            note: None,
        }
    }

    fn stored(id: i64, name: &str) -> StoredCourse {
        StoredCourse { id, fact: fact(name) }
    }

    #[test]
    fn creates_and_deletes_the_disjoint_parts() {
        let stored = vec![stored(1, "A"), stored(2, "B")];
        let fresh = vec![fact("B"), fact("C")];
        let result = diff(&stored, &fresh);
        assert_eq!(result.to_create, vec![fact("C")]);
        assert_eq!(result.to_delete.len(), 1);
        assert_eq!(result.to_delete[0].id, 1);
    }

    #[test]
    fn identical_sets_produce_empty_diff() {
        let stored = vec![stored(1, "A"), stored(2, "B")];
        let fresh = vec![fact("B"), fact("A")];
        assert!(diff(&stored, &fresh).is_empty());
    }

    #[test]
    fn both_empty_is_fine() {
        assert!(diff(&[], &[]).is_empty());
    }

    #[test]
    fn changed_field_is_delete_plus_create() {
        let mut changed = fact("A");
        changed.rooms.insert("65".into());
        let result = diff(&[stored(1, "A")], &[changed.clone()]);
        assert_eq!(result.to_create, vec![changed]);
        assert_eq!(result.to_delete[0].id, 1);
    }

    #[test]
    fn duplicate_fresh_content_creates_once() {
        let result = diff(&[], &[fact("A"), fact("A")]);
        assert_eq!(result.to_create.len(), 1);
    }

    #[test]
    fn outputs_are_disjoint_from_inputs() {
        let stored = vec![stored(1, "A"), stored(2, "B"), stored(3, "C")];
        let fresh = vec![fact("B"), fact("D")];
        let result = diff(&stored, &fresh);
        let stored_facts: Vec<&CourseFact> = stored.iter().map(|s| &s.fact).collect();
        assert!(result.to_create.iter().all(|f| !stored_facts.contains(&f)));
        assert!(result.to_delete.iter().all(|d| !fresh.contains(&d.fact)));
    }

    #[test]
    fn applying_the_diff_converges() {
        let stored = vec![stored(1, "A"), stored(2, "B"), stored(3, "C")];
        let fresh = vec![fact("B"), fact("D"), fact("E")];
        let result = diff(&stored, &fresh);

        // Apply: drop deletions, append creations under new ids.
        let mut next: Vec<StoredCourse> = stored
            .into_iter()
            .filter(|c| !result.to_delete.iter().any(|d| d.id == c.id))
            .collect();
        let mut next_id = 100;
        for created in &result.to_create {
            next.push(StoredCourse { id: next_id, fact: created.clone() });
            next_id += 1;
        }

        assert!(diff(&next, &fresh).is_empty());
    }

    #[test]
    fn rerunning_yields_the_same_diff() {
        let stored = vec![stored(1, "A"), stored(2, "B")];
        let fresh = vec![fact("B"), fact("C")];
        let first = diff(&stored, &fresh);
        let second = diff(&stored, &fresh);
        assert_eq!(first.to_create, second.to_create);
        assert_eq!(
            first.to_delete.iter().map(|d| d.id).collect::<Vec<_>>(),
            second.to_delete.iter().map(|d| d.id).collect::<Vec<_>>(),
        );
    }
}
