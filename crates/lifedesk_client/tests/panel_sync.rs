use chrono::Utc;
use lifedesk_client::{
    note_draft, CategoryFilter, ClientError, ClientResult, Panel, RecordBackend, RemoteRecord,
    SyncPolicy,
};
use lifedesk_core::{
    Category, Goal, GoalDraft, Note, OwnedRecord, RecordId, Task, TaskDraft, TaskPatch,
};
use std::cell::{Cell, RefCell};
use uuid::Uuid;

/// In-memory stand-in for the server.
struct FakeBackend<R> {
    owner: Uuid,
    records: RefCell<Vec<R>>,
    calls: Cell<usize>,
    fail: Cell<bool>,
}

impl<R> FakeBackend<R> {
    fn new() -> Self {
        Self {
            owner: Uuid::new_v4(),
            records: RefCell::new(Vec::new()),
            calls: Cell::new(0),
            fail: Cell::new(false),
        }
    }

    fn hit(&self) -> ClientResult<()> {
        self.calls.set(self.calls.get() + 1);
        if self.fail.get() {
            return Err(ClientError::Http {
                status: 500,
                msg: "Server Error".to_string(),
            });
        }
        Ok(())
    }
}

impl<R: RemoteRecord> RecordBackend<R> for FakeBackend<R> {
    fn fetch_all(&self) -> ClientResult<Vec<R>> {
        self.hit()?;
        Ok(self.records.borrow().clone())
    }

    fn create(&self, draft: &R::Draft) -> ClientResult<R> {
        self.hit()?;
        let draft = serde_json::from_value(serde_json::to_value(draft)?)?;
        let record = R::from_draft(self.owner, draft, Utc::now())
            .map_err(|err| ClientError::Http {
                status: 400,
                msg: err.to_string(),
            })?;
        self.records.borrow_mut().insert(0, record.clone());
        Ok(record)
    }

    fn update(&self, id: RecordId, patch: &R::Patch) -> ClientResult<R> {
        self.hit()?;
        let patch = serde_json::from_value(serde_json::to_value(patch)?)?;
        let mut records = self.records.borrow_mut();
        let record = records
            .iter_mut()
            .find(|record| record.id() == id)
            .ok_or(ClientError::Http {
                status: 404,
                msg: format!("{} not found", R::LABEL),
            })?;
        record
            .apply_patch(patch)
            .map_err(|err| ClientError::Validation(err.to_string()))?;
        Ok(record.clone())
    }

    fn delete(&self, id: RecordId) -> ClientResult<()> {
        self.hit()?;
        let mut records = self.records.borrow_mut();
        let before = records.len();
        records.retain(|record| record.id() != id);
        if records.len() == before {
            return Err(ClientError::Http {
                status: 404,
                msg: format!("{} not found", R::LABEL),
            });
        }
        Ok(())
    }
}

fn task(title: &str) -> TaskDraft {
    TaskDraft {
        title: Some(title.to_string()),
        ..TaskDraft::default()
    }
}

fn goal(title: &str) -> GoalDraft {
    GoalDraft {
        title: Some(title.to_string()),
    }
}

#[test]
fn add_prepends_and_toggle_replaces_in_place() {
    let backend = FakeBackend::<Task>::new();
    let mut panel: Panel<Task, _> = Panel::new(&backend);
    panel.load().unwrap();

    let first = panel.add(task("first")).unwrap().id;
    let milk = panel.add(task("Buy milk")).unwrap().id;
    assert_eq!(
        panel.items().iter().map(|t| t.id).collect::<Vec<_>>(),
        vec![milk, first]
    );

    let toggled = panel.toggle(milk).unwrap();
    assert!(toggled.is_completed);
    assert_eq!(toggled.title, "Buy milk");
    assert_eq!(toggled.category, Category::Personal);
    assert_eq!(panel.items()[0].id, milk);

    panel.delete(first).unwrap();
    assert_eq!(panel.items().len(), 1);
}

#[test]
fn blank_title_never_reaches_backend() {
    let backend = FakeBackend::<Task>::new();
    let mut panel: Panel<Task, _> = Panel::new(&backend);

    assert!(matches!(
        panel.add(task("   ")),
        Err(ClientError::Validation(_))
    ));
    assert_eq!(backend.calls.get(), 0);

    let notes = FakeBackend::<Note>::new();
    let mut note_panel: Panel<Note, _> = Panel::new(&notes);
    assert!(note_panel.add(note_draft("Ideas", "", "a,b")).is_err());
    assert_eq!(notes.calls.get(), 0);
}

#[test]
fn failures_leave_local_state_unchanged() {
    let backend = FakeBackend::<Task>::new();
    let mut panel: Panel<Task, _> = Panel::new(&backend);
    let id = panel.add(task("keep me")).unwrap().id;
    let before = panel.items().to_vec();

    backend.fail.set(true);
    assert!(panel.add(task("lost")).is_err());
    assert!(panel.toggle(id).is_err());
    assert!(panel.delete(id).is_err());
    assert_eq!(panel.items(), before.as_slice());
}

#[test]
fn update_error_from_server_is_returned() {
    let backend = FakeBackend::<Task>::new();
    let mut panel: Panel<Task, _> = Panel::new(&backend);
    let err = panel
        .update(Uuid::new_v4(), TaskPatch::default())
        .unwrap_err();
    assert!(matches!(err, ClientError::Http { status: 404, .. }));
}

#[test]
fn refetch_policy_reloads_after_each_mutation() {
    let backend = FakeBackend::<Task>::new();
    let mut panel: Panel<Task, _> = Panel::with_policy(&backend, SyncPolicy::RefetchAfterMutation);

    let id = panel.add(task("one")).unwrap().id;
    assert_eq!(backend.calls.get(), 2, "create plus reload");

    panel.toggle(id).unwrap();
    assert_eq!(backend.calls.get(), 4);
    assert!(panel.items()[0].is_completed);
}

#[test]
fn category_filter_selects_matching_tasks() {
    let backend = FakeBackend::<Task>::new();
    let mut panel: Panel<Task, _> = Panel::new(&backend);
    panel
        .add(TaskDraft {
            category: Some("work".to_string()),
            ..task("report")
        })
        .unwrap();
    panel.add(task("groceries")).unwrap();

    let work = panel.filtered("work".parse::<CategoryFilter>().unwrap());
    assert_eq!(work.len(), 1);
    assert_eq!(work[0].title, "report");
    assert_eq!(panel.filtered(CategoryFilter::All).len(), 2);
    assert!("hobby".parse::<CategoryFilter>().is_err());
}

#[test]
fn note_tags_are_split_before_sending() {
    let backend = FakeBackend::<Note>::new();
    let mut panel: Panel<Note, _> = Panel::new(&backend);
    let note = panel
        .add(note_draft("Ideas", "Ship it", " work, later ,,"))
        .unwrap();
    assert_eq!(note.tags, vec!["work", "later"]);
}

#[test]
fn goal_progress_counts_completed_goals() {
    let backend = FakeBackend::<Goal>::new();
    let mut panel: Panel<Goal, _> = Panel::new(&backend);
    assert_eq!(panel.progress().percent, 0.0);

    panel.add(goal("Read 10 pages")).unwrap();
    let second = panel.add(goal("Walk")).unwrap().id;
    panel.toggle(second).unwrap();

    let progress = panel.progress();
    assert_eq!((progress.completed, progress.total), (1, 2));
    assert_eq!(progress.rounded_percent(), 50);
}
