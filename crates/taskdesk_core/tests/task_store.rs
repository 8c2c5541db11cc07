use taskdesk_core::{
    open_store_in_memory, task_key, username_from_task_key, AccountError, KeyValueStore,
    SqliteKvStore, Task, TaskPriority, TaskStats, TaskStatus, TaskStore,
};

#[test]
fn task_key_scheme_roundtrips() {
    assert_eq!(task_key("ann"), "tasks_ann");
    assert_eq!(username_from_task_key("tasks_ann"), Some("ann"));
    assert_eq!(username_from_task_key("users"), None);
    assert_eq!(username_from_task_key("currentUser"), None);
}

#[test]
fn save_and_load_preserves_order() {
    let conn = open_store_in_memory().unwrap();
    let store = SqliteKvStore::try_new(&conn).unwrap();
    let tasks = TaskStore::new(&store);

    let list = vec![
        Task::new("pay rent", "before the 1st", TaskPriority::High, "2026-09-01"),
        Task::new("water plants", "", TaskPriority::Low, ""),
    ];
    tasks.save_tasks_for("ann", &list).unwrap();

    let loaded = tasks.load_tasks_for("ann").unwrap();
    assert_eq!(loaded, list);
}

#[test]
fn unknown_user_loads_empty_list() {
    let conn = open_store_in_memory().unwrap();
    let store = SqliteKvStore::try_new(&conn).unwrap();
    let tasks = TaskStore::new(&store);

    assert!(tasks.load_tasks_for("ghost").unwrap().is_empty());
}

#[test]
fn task_lists_are_scoped_per_user() {
    let conn = open_store_in_memory().unwrap();
    let store = SqliteKvStore::try_new(&conn).unwrap();
    let tasks = TaskStore::new(&store);

    tasks
        .save_tasks_for("ann", &[Task::new("a", "", TaskPriority::Low, "")])
        .unwrap();
    tasks
        .save_tasks_for("bob", &[Task::new("b", "", TaskPriority::High, "")])
        .unwrap();

    assert_eq!(tasks.load_tasks_for("ann").unwrap()[0].title, "a");
    assert_eq!(tasks.load_tasks_for("bob").unwrap()[0].title, "b");
    assert_eq!(
        tasks.task_usernames().unwrap(),
        vec!["ann".to_string(), "bob".to_string()]
    );
}

#[test]
fn delete_all_tasks_removes_the_key_and_is_idempotent() {
    let conn = open_store_in_memory().unwrap();
    let store = SqliteKvStore::try_new(&conn).unwrap();
    let tasks = TaskStore::new(&store);

    tasks
        .save_tasks_for("ann", &[Task::new("a", "", TaskPriority::Low, "")])
        .unwrap();
    tasks.delete_all_tasks_for("ann").unwrap();

    assert!(!store.contains(&task_key("ann")).unwrap());
    tasks.delete_all_tasks_for("ann").unwrap();
}

#[test]
fn corrupt_task_payload_surfaces_invalid_data() {
    let conn = open_store_in_memory().unwrap();
    let store = SqliteKvStore::try_new(&conn).unwrap();
    let tasks = TaskStore::new(&store);

    store.set(&task_key("ann"), "not a list").unwrap();
    assert!(matches!(
        tasks.load_tasks_for("ann"),
        Err(AccountError::InvalidData(_))
    ));
}

#[test]
fn loads_task_rows_written_by_the_original_ui_shape() {
    let conn = open_store_in_memory().unwrap();
    let store = SqliteKvStore::try_new(&conn).unwrap();
    let tasks = TaskStore::new(&store);

    store
        .set(
            &task_key("ann"),
            r#"[{
                "id": "1756300000000",
                "title": "ship release",
                "description": "tag and upload",
                "priority": "high",
                "dueDate": "2026-08-30",
                "status": "pending",
                "createdAt": "2026-08-27T10:00:00.000Z"
            }]"#,
        )
        .unwrap();

    let loaded = tasks.load_tasks_for("ann").unwrap();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].id, "1756300000000");
    assert_eq!(loaded[0].priority, TaskPriority::High);
    assert_eq!(loaded[0].status, TaskStatus::Pending);
    assert_eq!(loaded[0].due_date, "2026-08-30");
}

#[test]
fn stats_track_toggles_across_save_and_load() {
    let conn = open_store_in_memory().unwrap();
    let store = SqliteKvStore::try_new(&conn).unwrap();
    let tasks = TaskStore::new(&store);

    let mut list = vec![
        Task::new("a", "", TaskPriority::Low, ""),
        Task::new("b", "", TaskPriority::Medium, ""),
    ];
    list[0].toggle_status();
    tasks.save_tasks_for("ann", &list).unwrap();

    let stats = TaskStats::for_tasks(&tasks.load_tasks_for("ann").unwrap());
    assert_eq!(stats.total, 2);
    assert_eq!(stats.completed, 1);
    assert_eq!(stats.pending, 1);
}
