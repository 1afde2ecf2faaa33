use clap::{Parser, Subcommand};
use reqwest::header::{HeaderMap, HeaderValue, COOKIE};
use reqwest::Method;
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "quizhub-admin")]
#[command(about = "Administration CLI for QuizHub", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:3000")]
    url: String,

    /// Session token of an allowlisted administrator
    #[arg(short, long, env = "QUIZHUB_ADMIN_TOKEN")]
    token: String,

    #[arg(long, default_value = "quizhub_session")]
    cookie: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show site-wide counts
    Stats,
    /// List contact submissions
    Contacts {
        /// Only show submissions with this status (new, read, resolved)
        #[arg(short, long)]
        status: Option<String>,
    },
    /// Change the status of a contact submission
    SetContact { id: String, status: String },
    /// Delete a contact submission
    DeleteContact { id: String },
    /// List users
    Users,
    /// Ban a user and end their sessions
    Ban { id: String },
    /// Lift a ban
    Unban { id: String },
    /// Delete a user with their quizzes and scores
    DeleteUser { id: String },
    /// Make a quiz private
    Hide { id: String },
    /// Make a quiz public
    Publish { id: String },
    /// Delete a quiz
    DeleteQuiz { id: String },
    /// Create a category
    AddCategory {
        name: String,
        #[arg(short, long)]
        description: Option<String>,
    },
    /// Delete a category
    DeleteCategory { id: String },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    let mut headers = HeaderMap::new();
    headers.insert(COOKIE, HeaderValue::from_str(&format!("{}={}", cli.cookie, cli.token))?);

    let (method, path, body) = match cli.command {
        Commands::Stats => (Method::GET, "/stats".to_string(), None),
        Commands::Contacts { status } => {
            let path = match status {
                Some(status) => format!("/contacts?status={status}"),
                None => "/contacts".to_string(),
            };
            (Method::GET, path, None)
        }
        Commands::SetContact { id, status } => {
            (Method::PATCH, format!("/contacts/{id}"), Some(json!({ "status": status })))
        }
        Commands::DeleteContact { id } => (Method::DELETE, format!("/contacts/{id}"), None),
        Commands::Users => (Method::GET, "/users".to_string(), None),
        Commands::Ban { id } => (Method::PATCH, format!("/users/{id}"), Some(json!({ "banned": true }))),
        Commands::Unban { id } => (Method::PATCH, format!("/users/{id}"), Some(json!({ "banned": false }))),
        Commands::DeleteUser { id } => (Method::DELETE, format!("/users/{id}"), None),
        Commands::Hide { id } => (Method::PATCH, format!("/quizzes/{id}"), Some(json!({ "isPublic": false }))),
        Commands::Publish { id } => (Method::PATCH, format!("/quizzes/{id}"), Some(json!({ "isPublic": true }))),
        Commands::DeleteQuiz { id } => (Method::DELETE, format!("/quizzes/{id}"), None),
        Commands::AddCategory { name, description } => (
            Method::POST,
            "/categories".to_string(),
            Some(json!({ "name": name, "description": description })),
        ),
        Commands::DeleteCategory { id } => (Method::DELETE, format!("/categories/{id}"), None),
    };

    let mut request = client
        .request(method, format!("{}/api/admin{}", cli.url.trim_end_matches('/'), path))
        .headers(headers);
    if let Some(body) = body {
        request = request.json(&body);
    }
    print_response(request.send().await?).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: Admin API returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let text = res.text().await?;
    if text.is_empty() {
        println!("{}", status);
        return Ok(());
    }
    let json: Value = serde_json::from_str(&text)?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
