use sqlx::postgres::PgPool;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set")?;

    println!("Connecting to database...");
    let pool = PgPool::connect(&database_url).await?;

    println!("Checking chat_messages table...");
    let counts = sqlx::query_as::<_, (String, i64)>(
        "SELECT role, COUNT(*) FROM chat_messages GROUP BY role ORDER BY role",
    )
    .fetch_all(&pool)
    .await;

    match counts {
        Ok(counts) => {
            println!("✅ chat_messages table EXISTS");
            for (role, count) in counts {
                println!("  - {}: {} messages", role, count);
            }
        }
        Err(e) => println!("❌ chat_messages table NOT FOUND: {}", e),
    }

    println!("\nChecking _sqlx_migrations table...");
    let migrations = sqlx::query_as::<_, (i64, String, bool)>(
        "SELECT version, description, success FROM _sqlx_migrations ORDER BY version DESC",
    )
    .fetch_all(&pool)
    .await;

    match migrations {
        Ok(migrations) => {
            for (version, description, success) in migrations {
                println!("  - {} {} (success: {})", version, description, success);
            }
        }
        Err(e) => println!("❌ Error querying _sqlx_migrations: {}", e),
    }

    Ok(())
}
