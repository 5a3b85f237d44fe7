//! Incident Board console front-end.
//!
//! Line-oriented shell over the incident client: list, filter, search,
//! report, comment, delete. The rendering here is deliberately plain; all
//! data handling lives in the library.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use incident_client::client::{IncidentClient, RemoveOutcome};
use incident_client::config::Config;
use incident_client::errors::ClientError;
use incident_client::models::{IncidentStatus, NewIncident};
use incident_client::notify::{ConfirmPrompt, Notifier, Severity};
use incident_client::store::RemoteStore;
use incident_client::view::BoardView;

/// Notifier that prints toast-style lines to the console.
struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, message: &str, severity: Severity) {
        let tag = match severity {
            Severity::Info => "info",
            Severity::Warning => "warn",
            Severity::Error => "error",
        };
        println!("[{}] {}", tag, message);
    }
}

/// Confirmation prompt reading y/n from stdin.
struct ConsoleConfirm;

impl ConfirmPrompt for ConsoleConfirm {
    fn confirm(&self, message: &str) -> bool {
        print!("{} [y/N] ", message);
        let _ = io::stdout().flush();
        let mut answer = String::new();
        if io::stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }
        matches!(answer.trim(), "y" | "Y" | "yes")
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env();

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting incident board console");
    tracing::info!("Store URL: {}", config.store_url);

    let notifier: Arc<dyn Notifier> = Arc::new(ConsoleNotifier);
    let store = RemoteStore::new(&config)?;
    let client = IncidentClient::new(store, Arc::clone(&notifier), Arc::new(ConsoleConfirm));

    // Initial fetch
    match client.load(None).await {
        Ok(_) => render(&client.view().await),
        Err(err) => notifier.notify(
            &format!("Could not load incidents. Check the store server. ({})", err),
            Severity::Error,
        ),
    }

    println!("Commands: list | open | all | search <term> | add <type>|<location>|<datetime>|<description>[|file,...] | comment <id> <text> | delete <id> | quit");

    let stdin = io::stdin();
    loop {
        print!("> ");
        let _ = io::stdout().flush();

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let (command, rest) = match line.split_once(' ') {
            Some((command, rest)) => (command, rest.trim()),
            None => (line, ""),
        };

        let result = match command {
            "quit" | "exit" => break,
            "list" | "all" => show_load(&client, None).await,
            "open" => show_load(&client, Some(IncidentStatus::Open)).await,
            "search" => match client.search(rest).await {
                Ok(board) => {
                    render(&board);
                    Ok(())
                }
                Err(err) => Err(err),
            },
            "add" => add_incident(&client, rest).await,
            "comment" => comment_incident(&client, rest).await,
            "delete" => delete_incident(&client, rest).await,
            _ => {
                println!("Unknown command: {}", command);
                Ok(())
            }
        };

        if let Err(err) = result {
            notifier.notify(&err.message(), Severity::Error);
        }
    }

    Ok(())
}

async fn show_load(
    client: &IncidentClient,
    status: Option<IncidentStatus>,
) -> Result<(), ClientError> {
    client.load(status).await?;
    render(&client.view().await);
    Ok(())
}

async fn add_incident(client: &IncidentClient, input: &str) -> Result<(), ClientError> {
    let mut parts = input.split('|').map(str::trim);
    let draft = NewIncident {
        kind: parts.next().unwrap_or_default().to_string(),
        location: parts.next().unwrap_or_default().to_string(),
        datetime: parts.next().unwrap_or_default().to_string(),
        description: parts.next().unwrap_or_default().to_string(),
    };
    let files: Vec<PathBuf> = parts
        .next()
        .map(|list| {
            list.split(',')
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(PathBuf::from)
                .collect()
        })
        .unwrap_or_default();

    let created = client.create(&draft, &files).await?;
    println!("Incident {} reported", created.id);
    render(&client.view().await);
    Ok(())
}

async fn comment_incident(client: &IncidentClient, input: &str) -> Result<(), ClientError> {
    let (id, text) = input.split_once(' ').ok_or_else(|| {
        ClientError::Validation("Usage: comment <id> <text>".to_string())
    })?;

    let updated = client.add_comment(id, text).await?;
    println!("Comment added to incident {}", updated.id);
    render(&client.view().await);
    Ok(())
}

async fn delete_incident(client: &IncidentClient, id: &str) -> Result<(), ClientError> {
    match client.remove(id).await? {
        RemoveOutcome::Removed => {
            println!("Incident {} deleted", id);
            render(&client.view().await);
        }
        RemoveOutcome::Cancelled => println!("Delete cancelled"),
    }
    Ok(())
}

fn render(board: &BoardView) {
    if board.is_empty() {
        println!("No incidents found.");
        return;
    }

    for row in &board.rows {
        println!(
            "#{} {} at {} ({}) - {}",
            row.id, row.kind, row.location, row.status, row.description
        );
        println!("    {}", row.datetime);
        for comment in &row.comments {
            println!("    > {}", comment);
        }
        if !row.media.is_empty() {
            println!("    [{} attachment(s)]", row.media.len());
        }
    }
}
