use crate::customer::{self, Fields, AUDITOR};
use crate::db::connect;
use crate::errors::ModelError;
use sea_orm::DatabaseConnection;
use anyhow::Result;
use migration::MigratorTrait;
use uuid::Uuid;

/// Connect and migrate, or `None` when no database is reachable.
async fn setup_test_db() -> Option<DatabaseConnection> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return None;
    }
    let db = match connect().await {
        Ok(db) => db,
        Err(e) => {
            eprintln!("skip: cannot connect to db: {}", e);
            return None;
        }
    };
    if let Err(e) = migration::Migrator::up(&db, None).await {
        eprintln!("skip: migrate up failed: {}", e);
        return None;
    }
    Some(db)
}

fn fields(email: &str) -> Fields {
    Fields {
        first_name: "John".into(),
        last_name: "Doe".into(),
        email: email.into(),
        phone: Some("+1234567890".into()),
        address: None,
    }
}

fn unique_email(tag: &str) -> String {
    format!("{}_{}@example.com", tag, Uuid::new_v4())
}

/// Insert stamps audit columns; update bumps version; delete removes the row
#[tokio::test]
async fn test_customer_crud() -> Result<()> {
    let Some(db) = setup_test_db().await else { return Ok(()) };

    let email = unique_email("crud");
    let created = customer::insert(&db, fields(&email)).await?;
    assert!(created.id > 0);
    assert_eq!(created.email, email);
    assert_eq!(created.created_by, AUDITOR);
    assert_eq!(created.version, 0);
    assert!(!created.is_deleted);

    assert!(customer::exists_by_email(&db, &email).await?);
    let found = customer::find_by_id(&db, created.id).await?.expect("row exists");
    assert_eq!(found, created);

    let mut changed = fields(&unique_email("crud2"));
    changed.address = Some("1 Main St".into());
    let updated = customer::update(&db, created.id, created.version, changed.clone()).await?;
    assert_eq!(updated.version, 1);
    assert_eq!(updated.address, changed.address);
    assert_eq!(updated.created_at, created.created_at);

    assert!(customer::hard_delete(&db, created.id).await?);
    assert!(customer::find_by_id(&db, created.id).await?.is_none());
    assert!(!customer::hard_delete(&db, created.id).await?);
    Ok(())
}

/// The partial unique index rejects a second live row with the same email
#[tokio::test]
async fn test_duplicate_email_hits_unique_index() -> Result<()> {
    let Some(db) = setup_test_db().await else { return Ok(()) };

    let email = unique_email("dup");
    let first = customer::insert(&db, fields(&email)).await?;
    let second = customer::insert(&db, fields(&email)).await;
    assert!(matches!(second, Err(ModelError::UniqueViolation(_))));

    customer::hard_delete(&db, first.id).await?;
    Ok(())
}

/// Updating with an outdated version is refused and leaves the row untouched
#[tokio::test]
async fn test_stale_version_update_is_refused() -> Result<()> {
    let Some(db) = setup_test_db().await else { return Ok(()) };

    let email = unique_email("stale");
    let created = customer::insert(&db, fields(&email)).await?;
    customer::update(&db, created.id, created.version, fields(&email)).await?;

    let mut late = fields(&email);
    late.first_name = "Late".into();
    let res = customer::update(&db, created.id, created.version, late).await;
    assert!(matches!(res, Err(ModelError::StaleVersion { id }) if id == created.id));

    let current = customer::find_by_id(&db, created.id).await?.expect("row exists");
    assert_eq!(current.first_name, "John");
    assert_eq!(current.version, 1);

    customer::hard_delete(&db, created.id).await?;
    Ok(())
}

/// Listing returns rows ordered by id
#[tokio::test]
async fn test_find_all_live_is_ordered() -> Result<()> {
    let Some(db) = setup_test_db().await else { return Ok(()) };

    let a = customer::insert(&db, fields(&unique_email("list_a"))).await?;
    let b = customer::insert(&db, fields(&unique_email("list_b"))).await?;

    let all = customer::find_all_live(&db).await?;
    let pos_a = all.iter().position(|c| c.id == a.id).expect("a listed");
    let pos_b = all.iter().position(|c| c.id == b.id).expect("b listed");
    assert!(pos_a < pos_b);

    customer::hard_delete(&db, a.id).await?;
    customer::hard_delete(&db, b.id).await?;
    Ok(())
}
