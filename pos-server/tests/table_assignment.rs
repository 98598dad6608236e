//! Table assignment invariants
//!
//! The occupancy claim is a conditional store statement; these tests
//! pin down the winner-takes-the-table behavior and the occupancy
//! consistency invariant.

use pos_server::db::DbService;
use pos_server::db::models::{DiningTableCreate, User, UserCreate};
use pos_server::db::repository::{DiningTableRepository, UserRepository};
use pos_server::services::{AssignmentError, TableAssignment};
use surrealdb::RecordId;

async fn setup() -> (DiningTableRepository, UserRepository, TableAssignment) {
    let db = DbService::memory().await.expect("in-memory db");
    let tables = DiningTableRepository::new(db.db.clone());
    let users = UserRepository::new(db.db.clone());
    let assignment = TableAssignment::new(tables.clone());
    (tables, users, assignment)
}

async fn walk_in(users: &UserRepository, email: &str) -> RecordId {
    let user: User = users
        .create(UserCreate {
            name: "Walk In".to_string(),
            email: email.to_string(),
            contact_info: String::new(),
            hash_pass: None,
            profile_image: String::new(),
            profile_image_public_id: String::new(),
            total_person: 2,
            is_online: false,
        })
        .await
        .expect("create user");
    user.id.expect("user id")
}

#[tokio::test]
async fn assign_claims_a_free_table() {
    let (tables, users, assignment) = setup().await;

    let table = tables
        .create(DiningTableCreate {
            name: "T1".to_string(),
            capacity: 4,
        })
        .await
        .expect("create table");
    let table_id = table.id.expect("table id").to_string();
    let customer = walk_in(&users, "a@x.com").await;

    let assigned = assignment
        .assign(&customer, &table_id)
        .await
        .expect("assignment should succeed");

    assert!(assigned.is_occupied);
    assert_eq!(assigned.current_customer, Some(customer));
    assert!(assigned.occupancy_consistent());
}

#[tokio::test]
async fn occupied_table_rejects_a_second_claim() {
    let (tables, users, assignment) = setup().await;

    let table = tables
        .create(DiningTableCreate {
            name: "T1".to_string(),
            capacity: 4,
        })
        .await
        .expect("create table");
    let table_id = table.id.expect("table id").to_string();

    let first = walk_in(&users, "a@x.com").await;
    let second = walk_in(&users, "b@x.com").await;

    assignment
        .assign(&first, &table_id)
        .await
        .expect("first claim");

    let err = assignment
        .assign(&second, &table_id)
        .await
        .expect_err("second claim must fail");
    assert!(matches!(err, AssignmentError::AlreadyOccupied));

    // Loser left no trace
    let after = tables
        .find_by_id(&table_id)
        .await
        .expect("lookup")
        .expect("table exists");
    assert_eq!(after.current_customer, Some(first));
}

#[tokio::test]
async fn concurrent_claims_have_exactly_one_winner() {
    let (tables, users, assignment) = setup().await;

    let table = tables
        .create(DiningTableCreate {
            name: "T1".to_string(),
            capacity: 4,
        })
        .await
        .expect("create table");
    let table_id = table.id.expect("table id").to_string();

    let a = walk_in(&users, "a@x.com").await;
    let b = walk_in(&users, "b@x.com").await;

    let (ra, rb) = tokio::join!(
        assignment.assign(&a, &table_id),
        assignment.assign(&b, &table_id)
    );

    assert!(
        ra.is_ok() ^ rb.is_ok(),
        "exactly one concurrent claim may win"
    );
    let loser = if ra.is_ok() { rb } else { ra };
    assert!(matches!(
        loser.expect_err("loser fails"),
        AssignmentError::AlreadyOccupied
    ));

    let after = tables
        .find_by_id(&table_id)
        .await
        .expect("lookup")
        .expect("table exists");
    assert!(after.is_occupied);
    assert!(after.occupancy_consistent());
}

#[tokio::test]
async fn duplicate_table_names_are_rejected_by_the_insert() {
    let (tables, _users, _assignment) = setup().await;

    tables
        .create(DiningTableCreate {
            name: "T1".to_string(),
            capacity: 4,
        })
        .await
        .expect("first create");

    let err = tables
        .create(DiningTableCreate {
            name: "T1".to_string(),
            capacity: 2,
        })
        .await
        .expect_err("same name must conflict");
    assert!(matches!(
        err,
        pos_server::db::repository::RepoError::Duplicate(_)
    ));
}

#[tokio::test]
async fn unknown_and_malformed_table_ids_fail_before_any_write() {
    let (_tables, users, assignment) = setup().await;
    let customer = walk_in(&users, "a@x.com").await;

    let err = assignment
        .assign(&customer, "dining_table:doesnotexist")
        .await
        .expect_err("unknown table");
    assert!(matches!(err, AssignmentError::NotFound(_)));

    let err = assignment
        .assign(&customer, "not a valid id!")
        .await
        .expect_err("malformed id");
    assert!(matches!(err, AssignmentError::InvalidId(_)));
}

#[tokio::test]
async fn release_frees_the_table_for_the_next_claim() {
    let (tables, users, assignment) = setup().await;

    let table = tables
        .create(DiningTableCreate {
            name: "T1".to_string(),
            capacity: 4,
        })
        .await
        .expect("create table");
    let record = table.id.expect("table id");
    let table_id = record.to_string();

    let a = walk_in(&users, "a@x.com").await;
    let b = walk_in(&users, "b@x.com").await;

    assignment.assign(&a, &table_id).await.expect("claim");
    let released = assignment
        .release(&record)
        .await
        .expect("release")
        .expect("table exists");

    assert!(!released.is_occupied);
    assert_eq!(released.current_customer, None);
    assert!(released.occupancy_consistent());

    assignment
        .assign(&b, &table_id)
        .await
        .expect("reclaim after release");
}
