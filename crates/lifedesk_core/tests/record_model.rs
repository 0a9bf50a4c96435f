use chrono::Utc;
use lifedesk_core::{
    Category, Completable, Goal, GoalDraft, GoalPatch, Note, NoteDraft, NotePatch, OwnedRecord,
    RecordValidationError, Task, TaskDraft, TaskPatch,
};
use serde_json::json;
use uuid::Uuid;

fn task_draft(title: &str) -> TaskDraft {
    TaskDraft {
        title: Some(title.to_string()),
        ..TaskDraft::default()
    }
}

#[test]
fn task_draft_applies_defaults() {
    let owner = Uuid::new_v4();
    let task = Task::from_draft(owner, task_draft("Buy milk"), Utc::now()).unwrap();

    assert_eq!(task.owner, owner);
    assert_eq!(task.title, "Buy milk");
    assert_eq!(task.category, Category::Personal);
    assert!(!task.is_completed);
    assert_eq!(task.due_date, None);
    assert_eq!(task.created_at, task.updated_at);
}

#[test]
fn task_draft_requires_title() {
    let err = Task::from_draft(Uuid::new_v4(), TaskDraft::default(), Utc::now()).unwrap_err();
    assert_eq!(err, RecordValidationError::MissingField("title"));

    let err = Task::from_draft(Uuid::new_v4(), task_draft(""), Utc::now()).unwrap_err();
    assert_eq!(err, RecordValidationError::MissingField("title"));
}

#[test]
fn task_draft_rejects_unknown_category() {
    let draft = TaskDraft {
        category: Some("chores".to_string()),
        ..task_draft("Sweep")
    };
    let err = Task::from_draft(Uuid::new_v4(), draft, Utc::now()).unwrap_err();
    assert_eq!(
        err,
        RecordValidationError::InvalidCategory("chores".to_string())
    );
}

#[test]
fn task_draft_treats_blank_due_date_as_unset() {
    let draft = TaskDraft {
        due_date: Some(String::new()),
        ..task_draft("Someday")
    };
    let task = Task::from_draft(Uuid::new_v4(), draft, Utc::now()).unwrap();
    assert_eq!(task.due_date, None);
}

#[test]
fn task_patch_is_set_if_present() {
    let mut task = Task::from_draft(
        Uuid::new_v4(),
        TaskDraft {
            description: Some("2 litres".to_string()),
            due_date: Some("2024-05-01".to_string()),
            ..task_draft("Buy milk")
        },
        Utc::now(),
    )
    .unwrap();

    task.apply_patch(Task::completion_patch(true)).unwrap();
    assert!(task.is_completed);
    assert_eq!(task.title, "Buy milk");
    assert_eq!(task.description.as_deref(), Some("2 litres"));
    assert!(task.due_date.is_some());

    task.apply_patch(TaskPatch {
        title: Some(String::new()),
        ..TaskPatch::default()
    })
    .unwrap();
    assert_eq!(task.title, "", "explicit empty string is a real update");
}

#[test]
fn task_patch_with_bad_category_leaves_record_unchanged() {
    let mut task = Task::from_draft(Uuid::new_v4(), task_draft("Read"), Utc::now()).unwrap();
    let before = task.clone();

    let err = task
        .apply_patch(TaskPatch {
            title: Some("changed".to_string()),
            category: Some("hobby".to_string()),
            ..TaskPatch::default()
        })
        .unwrap_err();
    assert!(matches!(err, RecordValidationError::InvalidCategory(_)));
    assert_eq!(task, before);
}

#[test]
fn task_patch_null_clears_optional_fields() {
    let mut task = Task::from_draft(
        Uuid::new_v4(),
        TaskDraft {
            description: Some("details".to_string()),
            due_date: Some("2024-05-01".to_string()),
            ..task_draft("Plan trip")
        },
        Utc::now(),
    )
    .unwrap();

    let patch: TaskPatch =
        serde_json::from_value(json!({ "description": null, "dueDate": null })).unwrap();
    assert_eq!(patch.description, Some(None));
    task.apply_patch(patch).unwrap();
    assert_eq!(task.description, None);
    assert_eq!(task.due_date, None);

    let absent: TaskPatch = serde_json::from_value(json!({})).unwrap();
    assert_eq!(absent, TaskPatch::default());
}

#[test]
fn task_serializes_camel_case_fields() {
    let task = Task::from_draft(Uuid::new_v4(), task_draft("Buy milk"), Utc::now()).unwrap();
    let value = serde_json::to_value(&task).unwrap();

    assert_eq!(value["title"], "Buy milk");
    assert_eq!(value["category"], "personal");
    assert_eq!(value["isCompleted"], false);
    assert!(value.get("dueDate").is_some());
    assert!(value.get("createdAt").is_some());
}

#[test]
fn note_draft_requires_title_and_content() {
    let owner = Uuid::new_v4();
    let missing_content = NoteDraft {
        title: Some("Ideas".to_string()),
        ..NoteDraft::default()
    };
    assert_eq!(
        Note::from_draft(owner, missing_content, Utc::now()).unwrap_err(),
        RecordValidationError::MissingField("content")
    );

    let note = Note::from_draft(
        owner,
        NoteDraft {
            title: Some("Ideas".to_string()),
            content: Some("Write more tests".to_string()),
            tags: None,
        },
        Utc::now(),
    )
    .unwrap();
    assert!(note.tags.is_empty());
}

#[test]
fn note_patch_replaces_tags_in_order() {
    let mut note = Note::from_draft(
        Uuid::new_v4(),
        NoteDraft {
            title: Some("Ideas".to_string()),
            content: Some("body".to_string()),
            tags: Some(vec!["a".to_string()]),
        },
        Utc::now(),
    )
    .unwrap();

    note.apply_patch(NotePatch {
        tags: Some(vec!["z".to_string(), "b".to_string()]),
        ..NotePatch::default()
    })
    .unwrap();
    assert_eq!(note.tags, vec!["z", "b"]);
    assert_eq!(note.content, "body");
}

#[test]
fn goal_date_defaults_to_creation_time() {
    let now = Utc::now();
    let goal = Goal::from_draft(
        Uuid::new_v4(),
        GoalDraft {
            title: Some("Read 10 pages".to_string()),
        },
        now,
    )
    .unwrap();
    assert_eq!(goal.date, now);
    assert!(!goal.is_completed());

    let mut goal = goal;
    goal.apply_patch(GoalPatch {
        is_completed: Some(true),
        ..GoalPatch::default()
    })
    .unwrap();
    assert!(goal.is_completed());
    assert_eq!(goal.title, "Read 10 pages");
}
