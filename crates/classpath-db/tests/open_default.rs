//! `CoreFactory::open_default` against a data root taken from the
//! environment. Kept in its own test binary so the variable is never read
//! concurrently by another test.
#![allow(unsafe_code)]

use classpath_core::{DATA_DIR_ENV, NewClasspath};
use classpath_db::{CoreFactory, setup_database};

#[tokio::test]
async fn test_open_default_uses_data_dir_env() {
    let dir = tempfile::tempdir().unwrap();
    // SAFETY: this binary has a single test and nothing else touches the
    // environment while it runs.
    unsafe { std::env::set_var(DATA_DIR_ENV, dir.path()) };

    let service = CoreFactory::open_default().await.unwrap();
    let created = service
        .add(NewClasspath::new("infra", "").created_by("root"))
        .await
        .unwrap();

    let db_path = dir.path().join("data").join("classpath.db");
    assert!(db_path.is_file());

    // A second handle on the same file sees the record.
    let reopened = CoreFactory::build_service(setup_database(&db_path).await.unwrap());
    let found = reopened.get_by_path("infra").await.unwrap().unwrap();
    assert_eq!(found.id, created.id);
}
