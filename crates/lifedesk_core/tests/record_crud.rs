use lifedesk_core::db::open_db_in_memory;
use lifedesk_core::{
    AuthService, Category, Completable, Goal, GoalDraft, Note, NoteDraft, NotePatch,
    RecordService, RecordServiceError, RegisterRequest, SqliteGoalRepository,
    SqliteNoteRepository, SqliteTaskRepository, SqliteUserRepository, Task, TaskDraft,
    TaskPatch, TokenService, UserId, DEFAULT_TOKEN_TTL,
};
use rusqlite::Connection;
use uuid::Uuid;

fn register(conn: &Connection, email: &str) -> UserId {
    let tokens = TokenService::new("record-crud-test-secret", DEFAULT_TOKEN_TTL);
    let auth = AuthService::new(SqliteUserRepository::new(conn), &tokens);
    let (user, _token) = auth
        .register(RegisterRequest {
            name: Some("Test User".to_string()),
            email: Some(email.to_string()),
            password: Some("hunter22".to_string()),
        })
        .expect("register user");
    user.id
}

fn tasks(conn: &Connection) -> RecordService<Task, SqliteTaskRepository<'_>> {
    RecordService::new(SqliteTaskRepository::new(conn))
}

fn draft(title: &str) -> TaskDraft {
    TaskDraft {
        title: Some(title.to_string()),
        ..TaskDraft::default()
    }
}

#[test]
fn create_then_list_returns_the_stored_task() {
    let conn = open_db_in_memory().unwrap();
    let owner = register(&conn, "a@example.com");
    let service = tasks(&conn);

    let created = service
        .create(
            owner,
            TaskDraft {
                description: Some("2 litres".to_string()),
                category: Some("work".to_string()),
                due_date: Some("2024-05-01".to_string()),
                ..draft("Buy milk")
            },
        )
        .unwrap();

    let listed = service.list(owner).unwrap();
    assert_eq!(listed, vec![created.clone()]);
    assert_eq!(created.category, Category::Work);
    assert_eq!(created.description.as_deref(), Some("2 litres"));
    assert!(created.due_date.is_some());
}

#[test]
fn toggle_completion_keeps_other_fields() {
    let conn = open_db_in_memory().unwrap();
    let owner = register(&conn, "a@example.com");
    let service = tasks(&conn);

    let created = service.create(owner, draft("Buy milk")).unwrap();
    let updated = service
        .update(created.id, owner, Task::completion_patch(true))
        .unwrap();

    assert!(updated.is_completed);
    assert_eq!(updated.title, "Buy milk");
    assert_eq!(updated.category, created.category);
    assert_eq!(updated.created_at, created.created_at);
    assert!(updated.updated_at >= created.updated_at);

    service.delete(created.id, owner).unwrap();
    assert!(service.list(owner).unwrap().is_empty());
}

#[test]
fn list_is_newest_first() {
    let conn = open_db_in_memory().unwrap();
    let owner = register(&conn, "a@example.com");
    let service = tasks(&conn);

    let first = service.create(owner, draft("first")).unwrap();
    let second = service.create(owner, draft("second")).unwrap();
    let third = service.create(owner, draft("third")).unwrap();

    let ids: Vec<_> = service.list(owner).unwrap().iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![third.id, second.id, first.id]);
}

#[test]
fn other_users_records_are_invisible_and_protected() {
    let conn = open_db_in_memory().unwrap();
    let alice = register(&conn, "alice@example.com");
    let bob = register(&conn, "bob@example.com");
    let service = tasks(&conn);

    let task = service.create(alice, draft("private")).unwrap();

    assert!(service.list(bob).unwrap().is_empty());
    assert!(matches!(
        service.update(task.id, bob, TaskPatch::default()),
        Err(RecordServiceError::Forbidden(id)) if id == task.id
    ));
    assert!(matches!(
        service.delete(task.id, bob),
        Err(RecordServiceError::Forbidden(_))
    ));

    let still_there = service.get(task.id, alice).unwrap();
    assert_eq!(still_there, task);
}

#[test]
fn missing_ids_are_not_found() {
    let conn = open_db_in_memory().unwrap();
    let owner = register(&conn, "a@example.com");
    let service = tasks(&conn);
    let task = service.create(owner, draft("once")).unwrap();

    service.delete(task.id, owner).unwrap();
    assert!(matches!(
        service.delete(task.id, owner),
        Err(RecordServiceError::NotFound(_))
    ));

    let unknown = Uuid::new_v4();
    assert!(matches!(
        service.update(unknown, owner, Task::completion_patch(true)),
        Err(RecordServiceError::NotFound(id)) if id == unknown
    ));
}

#[test]
fn invalid_input_is_rejected_without_writes() {
    let conn = open_db_in_memory().unwrap();
    let owner = register(&conn, "a@example.com");
    let service = tasks(&conn);

    assert!(matches!(
        service.create(owner, TaskDraft::default()),
        Err(RecordServiceError::Validation(_))
    ));
    let task = service.create(owner, draft("keep")).unwrap();
    assert!(matches!(
        service.update(
            task.id,
            owner,
            TaskPatch {
                category: Some("hobby".to_string()),
                ..TaskPatch::default()
            }
        ),
        Err(RecordServiceError::Validation(_))
    ));

    assert_eq!(service.list(owner).unwrap(), vec![task]);
}

#[test]
fn note_tags_survive_storage_in_order() {
    let conn = open_db_in_memory().unwrap();
    let owner = register(&conn, "a@example.com");
    let notes: RecordService<Note, _> = RecordService::new(SqliteNoteRepository::new(&conn));

    let note = notes
        .create(
            owner,
            NoteDraft {
                title: Some("Ideas".to_string()),
                content: Some("Ship it".to_string()),
                tags: Some(vec!["work".to_string(), "later".to_string()]),
            },
        )
        .unwrap();
    assert_eq!(note.tags, vec!["work", "later"]);

    let updated = notes
        .update(
            note.id,
            owner,
            NotePatch {
                content: Some("Ship it today".to_string()),
                ..NotePatch::default()
            },
        )
        .unwrap();
    assert_eq!(updated.tags, vec!["work", "later"]);
    assert_eq!(updated.content, "Ship it today");
}

#[test]
fn goals_round_trip_and_complete() {
    let conn = open_db_in_memory().unwrap();
    let owner = register(&conn, "a@example.com");
    let goals: RecordService<Goal, _> = RecordService::new(SqliteGoalRepository::new(&conn));

    let goal = goals
        .create(
            owner,
            GoalDraft {
                title: Some("Read 10 pages".to_string()),
            },
        )
        .unwrap();
    let done = goals
        .update(goal.id, owner, Goal::completion_patch(true))
        .unwrap();

    assert!(done.is_completed());
    assert_eq!(done.date, goal.date);
    assert_eq!(goals.list(owner).unwrap(), vec![done]);
}

#[test]
fn deleting_a_user_cascades_to_records() {
    let conn = open_db_in_memory().unwrap();
    let owner = register(&conn, "a@example.com");
    let service = tasks(&conn);
    service.create(owner, draft("orphan")).unwrap();

    conn.execute("DELETE FROM users WHERE id = ?1", [owner.to_string()])
        .unwrap();
    let remaining: i64 = conn
        .query_row("SELECT COUNT(*) FROM tasks", [], |row| row.get(0))
        .unwrap();
    assert_eq!(remaining, 0);
}
