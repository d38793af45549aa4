// Mints a session token for local testing of POST /api/chat.
//
// Usage: issue_session_token <user_id> <email> [hours]
use chrono::Duration;
use webhook_chat::middleware::auth::issue_session_token;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let mut args = std::env::args().skip(1);
    let (user_id, email) = match (args.next(), args.next()) {
        (Some(user_id), Some(email)) => (user_id, email),
        _ => {
            eprintln!("Usage: issue_session_token <user_id> <email> [hours]");
            std::process::exit(2);
        }
    };
    let hours = match args.next() {
        Some(raw) => raw.parse::<i64>()?,
        None => 24,
    };

    let secret = std::env::var("JWT_SECRET").map_err(|_| "JWT_SECRET must be set")?;
    let token = issue_session_token(&secret, &user_id, &email, None, Duration::hours(hours))?;

    println!("{}", token);
    eprintln!();
    eprintln!("curl -X POST http://localhost:3000/api/chat \\");
    eprintln!("  -H 'Authorization: Bearer {}' \\", token);
    eprintln!("  -H 'Content-Type: application/json' \\");
    eprintln!("  -d '{{\"message\":\"Hello\"}}'");

    Ok(())
}
