//! Basic usage example for cubeorm
//!
//! Run with: cargo run --example basic -p cubeorm
//!
//! Connection settings come from `CUBEORM_*` variables (a `.env` file works):
//! CUBEORM_HOST=localhost CUBEORM_PORT=5432 CUBEORM_USER=postgres CUBEORM_PASSWORD=postgres
//! CUBEORM_DATABASE=cubeorm_example

use cubeorm::{BoundFields, Database, DbConfig, Fields, OrmError};

#[tokio::main]
async fn main() -> Result<(), OrmError> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter("cubeorm=debug")
        .init();

    let db = Database::postgres(DbConfig::from_env()?);

    db.query(
        "CREATE TABLE IF NOT EXISTS cube_user (
            id BIGSERIAL PRIMARY KEY,
            username TEXT NOT NULL,
            phone BIGINT
        )",
        false,
    )
    .await?;
    db.model("user").delete().await?;

    // ============================================
    // Insert, plain and guarded
    // ============================================
    println!("=== Insert ===");
    db.model("user")
        .task()
        .insert(Fields::new().set("username", "'lin'").set("phone", 123))
        .await?;

    // Skipped: a row with username 'lin' already exists.
    let rows = db
        .model("user")
        .where_clause("username='lin'")
        .insert(Fields::new().set("username", "'lin'").set("phone", 456))
        .await?;
    println!("guarded insert affected {} row(s)", rows.affected_rows);

    db.model("user")
        .insert_bound(BoundFields::new().set("username", "o'brien").set("phone", 789))
        .await?;

    // ============================================
    // Select
    // ============================================
    println!("=== Select ===");
    let rows = db
        .model("user")
        .order_by(["username ASC", "id DESC"])
        .limit(0, 10)
        .select(["id", "username", "phone"])
        .await?;
    for row in &rows {
        println!(
            "{} {} {}",
            row.get("id").unwrap_or("-"),
            row.get("username").unwrap_or("-"),
            row.get("phone").unwrap_or("NULL"),
        );
    }

    let count = db.model("user").count().await?;
    println!("count = {:?}", count.first().and_then(|r| r.get_idx(0)));

    let sum = db.model("user").where_clause("phone > 100").sum("phone").await?;
    println!("sum(phone) = {:?}", sum.first().and_then(|r| r.get_idx(0)));

    // ============================================
    // Update / delete
    // ============================================
    println!("=== Update / Delete ===");
    db.model("user")
        .task()
        .where_clause("username='lin'")
        .update([("phone", 321)])
        .await?;
    db.model("user").where_clause("phone=789").delete().await?;

    // A failing task rolls back and returns the statement's own error.
    if let Err(e) = db.model("user").task().update([("no_such_column", 1)]).await {
        println!("rolled back: {e}");
    }

    println!("=== Log ===");
    print!("{}", db.drain_log());

    db.close().await?;
    Ok(())
}
