use super::*;
use tempfile::TempDir;

fn student(first: &str, last: &str, team: Option<&str>) -> NewStudent {
    NewStudent {
        first_name: first.to_string(),
        last_name: last.to_string(),
        team: team.map(str::to_string),
    }
}

fn roster() -> Vec<NewStudent> {
    vec![
        student("Ada", "Lovelace", Some("1")),
        student("Grace", "Hopper", Some("1")),
        student("Alan", "Turing", Some("2")),
        student("Edsger", "Dijkstra", None),
    ]
}

fn store_with_roster(dir: &TempDir, name: &str) -> RosterStore {
    let store = RosterStore::open(&dir.path().join(name)).unwrap();
    store.replace_roster("ass1", &roster()).unwrap();
    store
}

#[test]
fn test_replace_roster_and_teams() {
    let dir = TempDir::new().unwrap();
    let store = store_with_roster(&dir, "a.sqlite3");

    let teams = store.teams("ass1").unwrap();
    let keys: Vec<&str> = teams.iter().map(|t| t.key.as_str()).collect();
    assert_eq!(keys, vec!["1", "2", "s4"]);
    assert_eq!(teams[0].members.len(), 2);
    assert!(teams.iter().all(|t| t.ledger().is_empty()));

    store.replace_roster("ass1", &roster()[..1]).unwrap();
    assert_eq!(store.rows("ass1").unwrap().len(), 1);
}

#[test]
fn test_missing_table_is_not_found() {
    let dir = TempDir::new().unwrap();
    let store = RosterStore::open(&dir.path().join("a.sqlite3")).unwrap();
    let err = store.rows("ass9").unwrap_err();
    assert!(matches!(err, GradebookError::NotFound { .. }));
}

#[test]
fn test_set_task_annotations_keeps_other_tasks() {
    let dir = TempDir::new().unwrap();
    let store = store_with_roster(&dir, "a.sqlite3");

    store
        .set_task_annotations("ass1", "1", 1, vec![Annotation::penalty(-3, "missing edge case")])
        .unwrap();
    let ledger = store
        .set_task_annotations("ass1", "1", 2, vec![Annotation::remark("nice")])
        .unwrap();

    assert_eq!(ledger.task_ids().collect::<Vec<_>>(), vec![1, 2]);
    assert_eq!(store.load_ledger("ass1", "1").unwrap(), ledger);

    // Every member row carries the same blob.
    let rows = store.rows("ass1").unwrap();
    assert_eq!(rows[0].grade, rows[1].grade);
    assert!(rows[2].grade.is_empty());
}

#[test]
fn test_save_ledger_writes_every_member_row() {
    let dir = TempDir::new().unwrap();
    let store = store_with_roster(&dir, "a.sqlite3");
    let ledger: TeamLedger = vec![(2, vec![Annotation::penalty(-1, "typo")])]
        .into_iter()
        .collect();

    assert_eq!(store.save_ledger("ass1", "1", &ledger).unwrap(), 2);
    assert_eq!(store.load_ledger("ass1", "1").unwrap(), ledger);
    let rows = store.rows("ass1").unwrap();
    assert_eq!(rows[0].grade, ledger.serialize());
    assert_eq!(rows[1].grade, ledger.serialize());

    let err = store.save_ledger("ass1", "42", &ledger).unwrap_err();
    assert!(matches!(err, GradebookError::NotFound { .. }));
}

#[test]
fn test_student_without_team_is_addressed_by_id() {
    let dir = TempDir::new().unwrap();
    let store = store_with_roster(&dir, "a.sqlite3");

    store
        .set_task_annotations("ass1", "s4", 1, vec![Annotation::penalty(2, "late")])
        .unwrap();
    let team = store.team("ass1", "s4").unwrap();
    assert_eq!(team.members[0].last_name, "Dijkstra");
    assert_eq!(team.ledger().get_task_annotations(1).len(), 1);
}

#[test]
fn test_unknown_team_is_not_found() {
    let dir = TempDir::new().unwrap();
    let store = store_with_roster(&dir, "a.sqlite3");
    let err = store
        .set_task_annotations("ass1", "42", 1, Vec::new())
        .unwrap_err();
    assert!(matches!(err, GradebookError::NotFound { .. }));
    assert!(store.load_ledger("ass1", "42").is_err());
}

#[test]
fn test_invalid_blob_loads_as_empty() {
    let dir = TempDir::new().unwrap();
    let store = store_with_roster(&dir, "a.sqlite3");
    store
        .conn
        .execute(r#"UPDATE ass1 SET "Grade" = '[1, 2, 3]'"#, [])
        .unwrap();
    assert!(store.load_ledger("ass1", "2").unwrap().is_empty());
}

#[test]
fn test_merge_from_other_tutor() {
    let dir = TempDir::new().unwrap();
    let local = store_with_roster(&dir, "local.sqlite3");
    let other = store_with_roster(&dir, "other.sqlite3");

    local
        .set_task_annotations("ass1", "1", 1, vec![Annotation::penalty(-3, "x")])
        .unwrap();
    local
        .set_task_annotations("ass1", "2", 1, vec![Annotation::penalty(-1, "keep")])
        .unwrap();
    other
        .set_task_annotations("ass1", "1", 2, vec![Annotation::penalty(-1, "y")])
        .unwrap();
    other
        .set_task_annotations("ass1", "2", 1, vec![Annotation::penalty(-5, "z")])
        .unwrap();
    drop(other);

    let report = local
        .merge_from("ass1", &dir.path().join("other.sqlite3"))
        .unwrap();

    assert_eq!(
        report.merged,
        vec![
            TeamMerge {
                team: "1".into(),
                added: vec![2],
                overwritten: vec![],
            },
            TeamMerge {
                team: "2".into(),
                added: vec![],
                overwritten: vec![1],
            },
        ]
    );
    assert!(report.unknown_teams.is_empty());

    let team1 = local.load_ledger("ass1", "1").unwrap();
    assert_eq!(team1.get_task_annotations(1), &[Annotation::penalty(-3, "x")]);
    assert_eq!(team1.get_task_annotations(2), &[Annotation::penalty(-1, "y")]);
    let team2 = local.load_ledger("ass1", "2").unwrap();
    assert_eq!(team2.get_task_annotations(1), &[Annotation::penalty(-5, "z")]);
}

#[test]
fn test_merge_twice_changes_nothing() {
    let dir = TempDir::new().unwrap();
    let local = store_with_roster(&dir, "local.sqlite3");
    let other = store_with_roster(&dir, "other.sqlite3");
    other
        .set_task_annotations("ass1", "1", 2, vec![Annotation::penalty(-1, "y")])
        .unwrap();
    drop(other);

    let path = dir.path().join("other.sqlite3");
    local.merge_from("ass1", &path).unwrap();
    let second = local.merge_from("ass1", &path).unwrap();
    assert!(second.merged.is_empty());
}

#[test]
fn test_merge_skips_unknown_and_unreadable() {
    let dir = TempDir::new().unwrap();
    let local = store_with_roster(&dir, "local.sqlite3");
    let other = RosterStore::open(&dir.path().join("other.sqlite3")).unwrap();
    other
        .replace_roster(
            "ass1",
            &[student("Ada", "Lovelace", Some("1")), student("New", "Person", Some("9"))],
        )
        .unwrap();
    other
        .set_task_annotations("ass1", "9", 1, vec![Annotation::penalty(-1, "n")])
        .unwrap();
    other
        .conn
        .execute(r#"UPDATE ass1 SET "Grade" = 'not json' WHERE "Team" = '1'"#, [])
        .unwrap();
    drop(other);

    let report = local
        .merge_from("ass1", &dir.path().join("other.sqlite3"))
        .unwrap();
    assert!(report.merged.is_empty());
    assert_eq!(report.unknown_teams, vec!["9".to_string()]);
    assert_eq!(report.unreadable, vec!["1".to_string()]);
    assert_eq!(local.rows("ass1").unwrap().len(), 4);
}

#[test]
fn test_merge_from_missing_database() {
    let dir = TempDir::new().unwrap();
    let local = store_with_roster(&dir, "local.sqlite3");
    let err = local
        .merge_from("ass1", &dir.path().join("absent.sqlite3"))
        .unwrap_err();
    assert!(matches!(err, GradebookError::NotFound { .. }));
}

#[test]
fn test_padded_team_value_is_addressable() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("foreign.sqlite3");
    {
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch(
            "CREATE TABLE ass1 (\"First Name\" TEXT, \"Last Name\" TEXT, \"Team\" TEXT, \"Grade\" TEXT);
             INSERT INTO ass1 VALUES ('Ada', 'Lovelace', '7' || char(9), NULL);
             INSERT INTO ass1 VALUES ('Grace', 'Hopper', ' 7' || char(13, 10), NULL);",
        )
        .unwrap();
    }
    let store = RosterStore::open(&path).unwrap();
    let teams = store.teams("ass1").unwrap();
    assert_eq!(teams.len(), 1);
    assert_eq!(teams[0].key, "7");

    let ledger = store
        .set_task_annotations("ass1", "7", 1, vec![Annotation::penalty(-1, "late")])
        .unwrap();
    assert_eq!(store.load_ledger("ass1", "7").unwrap(), ledger);
    let rows = store.rows("ass1").unwrap();
    assert_eq!(rows[0].grade, rows[1].grade);
}

#[test]
fn test_reads_foreign_integer_team_column() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("foreign.sqlite3");
    {
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch(
            r#"CREATE TABLE ass1 ("index" INTEGER, "First Name" TEXT, "Last Name" TEXT, "Team" INTEGER, "Grade" TEXT);
               INSERT INTO ass1 VALUES (0, 'Ada', 'Lovelace', 3, NULL);
               INSERT INTO ass1 VALUES (1, 'Alan', 'Turing', NULL, '{"1":[[-2,"a"]]}');"#,
        )
        .unwrap();
    }
    let store = RosterStore::open(&path).unwrap();
    let teams = store.teams("ass1").unwrap();
    assert_eq!(teams[0].key, "3");
    assert_eq!(teams[1].key, "s2");
    assert_eq!(teams[1].ledger().get_task_annotations(1).len(), 1);

    store
        .set_task_annotations("ass1", "3", 1, vec![Annotation::remark("ok")])
        .unwrap();
    assert_eq!(store.load_ledger("ass1", "3").unwrap().task_ids().count(), 1);
}
