//! urlscope CLI: submit URLs, browse crawl results, run bulk actions.
//!
//! Thin consumer of the library: every subcommand maps onto one dashboard
//! flow. Credentials and URLs go through the form engine first, so local
//! validation failures never issue a request, exactly like the original
//! dashboard's pages.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use urlscope::api::ApiClient;
use urlscope::app::{Dashboard, ListPhase, ListState};
use urlscope::domain::{BulkAction, Result, UrlRecord, UrlscopeError};
use urlscope::forms::{
    validate_login, validate_signup, validate_url_form, Credentials, Form, FormErrors, UrlFormData,
};
use urlscope::session::{JsonTokenStore, Session};
use urlscope::{observability, Config};

#[derive(Parser)]
#[command(name = "urlscope")]
#[command(about = "Terminal client for a URL-analysis crawling service")]
#[command(version)]
struct Cli {
    /// Config file path (default: platform config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Backend base URL (overrides the config file)
    #[arg(long, global = true, env = "URLSCOPE_BASE_URL")]
    base_url: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and persist the session token
    Login {
        /// Account username
        #[arg(short, long)]
        username: String,
        /// Account password
        #[arg(short, long)]
        password: String,
    },

    /// Create an account and persist the session token
    Signup {
        /// Account username
        #[arg(short, long)]
        username: String,
        /// Account password (minimum 8 characters)
        #[arg(short, long)]
        password: String,
    },

    /// Clear the persisted session token
    Logout,

    /// Submit a URL for analysis
    Add {
        /// URL to analyze (must start with http:// or https://)
        address: String,
    },

    /// List analyzed URLs
    List {
        /// Page to show (1-based)
        #[arg(short, long, default_value = "1")]
        page: u64,
        /// Free-text filter
        #[arg(short, long)]
        query: Option<String>,
    },

    /// Show the full analysis of one URL
    Show {
        /// Record id
        id: i64,
    },

    /// Queue the given records for a fresh crawl
    Rerun {
        /// Record ids
        #[arg(required = true)]
        ids: Vec<i64>,
    },

    /// Delete the given records
    Delete {
        /// Record ids
        #[arg(required = true)]
        ids: Vec<i64>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {}", error.message());
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref())?;

    let level = if cli.verbose {
        Some("urlscope=debug".to_string())
    } else {
        config.trace_level.clone()
    };
    observability::init_tracing(level.as_deref());

    let base_url = cli.base_url.unwrap_or_else(|| config.base_url.clone());
    let client = ApiClient::new(&base_url, config.timeout())?;
    let mut session = Session::new(Box::new(JsonTokenStore::new(config.token_file())?))?;

    match cli.command {
        Commands::Login { username, password } => {
            let token = authenticate(&client, username, password, false).await?;
            session.login(token)?;
            println!("Logged in.");
            Ok(())
        }

        Commands::Signup { username, password } => {
            let token = authenticate(&client, username, password, true).await?;
            session.login(token)?;
            println!("Account created and logged in.");
            Ok(())
        }

        Commands::Logout => {
            session.logout()?;
            println!("Logged out.");
            Ok(())
        }

        Commands::Add { address } => {
            require_auth(&session)?;
            let mut dashboard = Dashboard::new(client, session, config.page_size);

            let mut form = Form::with_validator(UrlFormData::default(), validate_url_form);
            form.set_field("address", |v| v.address = address);

            let dash = &mut dashboard;
            let submitted = form
                .handle_submit(|values| async move { dash.add_url(&values.address).await })
                .await?;

            match submitted {
                Some(record) => {
                    form.reset();
                    println!(
                        "Submitted {} (id {}, status {}).",
                        record.address,
                        record.id,
                        record.status.label()
                    );
                    print_list(dashboard.list());
                    Ok(())
                }
                None => Err(validation_error(form.errors())),
            }
        }

        Commands::List { page, query } => {
            require_auth(&session)?;
            let mut dashboard = Dashboard::new(client, session, config.page_size);

            if let Some(query) = query {
                dashboard.set_search_query(query).await?;
            }
            if page > 1 {
                dashboard.set_page(page).await?;
            }
            if dashboard.list().phase() == ListPhase::Idle {
                dashboard.load().await?;
            }

            print_list(dashboard.list());
            Ok(())
        }

        Commands::Show { id } => {
            require_auth(&session)?;
            let record = client.fetch_url_details(&session, id).await?;
            print_record(&record);
            Ok(())
        }

        Commands::Rerun { ids } => bulk(client, session, &config, BulkAction::Rerun, ids).await,

        Commands::Delete { ids } => bulk(client, session, &config, BulkAction::Delete, ids).await,
    }
}

/// Runs the login or signup form and returns the issued token.
async fn authenticate(
    client: &ApiClient,
    username: String,
    password: String,
    signup: bool,
) -> Result<String> {
    let validator = if signup { validate_signup } else { validate_login };
    let mut form = Form::with_validator(Credentials::default(), validator);
    form.set_field("username", |v| v.username = username);
    form.set_field("password", |v| v.password = password);

    let token = form
        .handle_submit(|values| async move {
            if signup {
                client.signup(&values.username, &values.password).await
            } else {
                client.login(&values.username, &values.password).await
            }
        })
        .await?;

    token.ok_or_else(|| validation_error(form.errors()))
}

/// Applies a bulk action to the given ids and prints the refreshed list.
async fn bulk(
    client: ApiClient,
    session: Session,
    config: &Config,
    action: BulkAction,
    ids: Vec<i64>,
) -> Result<()> {
    require_auth(&session)?;
    let mut dashboard = Dashboard::new(client, session, config.page_size);

    for id in &ids {
        dashboard.list_mut().toggle_selection(*id);
    }
    dashboard.bulk(action).await?;

    let verb = match action {
        BulkAction::Rerun => "Queued rerun for",
        BulkAction::Delete => "Deleted",
    };
    println!("{verb} {} record(s).", ids.len());
    print_list(dashboard.list());
    Ok(())
}

/// Fails with a 401-shaped error when the session holds no token.
///
/// The CLI equivalent of the dashboard redirecting unauthenticated route
/// access to the login page.
fn require_auth(session: &Session) -> Result<()> {
    if session.is_authenticated() {
        Ok(())
    } else {
        Err(UrlscopeError::Api {
            message: "Not logged in. Run `urlscope login` first.".to_string(),
            code: None,
            field: None,
            status: Some(401),
        })
    }
}

/// Collapses form errors into one displayable validation error.
fn validation_error(errors: &FormErrors) -> UrlscopeError {
    let field = errors.keys().next().cloned().unwrap_or_default();
    let message = errors.values().cloned().collect::<Vec<_>>().join("; ");
    UrlscopeError::Validation { field, message }
}

/// Prints the current page of the list with a pagination footer.
fn print_list(list: &ListState) {
    if let Some(error) = list.error() {
        eprintln!("load failed: {error}");
        return;
    }

    println!(
        "{:<6} {:<8} {:>8} {:>8} {:>6}  {}",
        "ID", "STATUS", "INTERNAL", "EXTERNAL", "BROKEN", "ADDRESS"
    );
    for record in list.items() {
        let sel = if list.is_selected(record.id) { "*" } else { " " };
        println!(
            "{:<6} {:<8} {:>8} {:>8} {:>6} {sel}{}",
            record.id,
            record.status.label(),
            record.internal_links,
            record.external_links,
            record.broken_links,
            record.address
        );
    }

    println!(
        "Page {} of {} ({} total){}{}",
        list.page(),
        list.total_pages(),
        list.total(),
        if list.has_prev() { "  [prev]" } else { "" },
        if list.has_next() { "  [next]" } else { "" },
    );
}

/// Prints the full analysis of one record.
fn print_record(record: &UrlRecord) {
    println!("#{} {}", record.id, record.address);
    println!("  status:        {}", record.status.label());
    if !record.error.is_empty() {
        println!("  error:         {}", record.error);
    }
    if !record.title.is_empty() {
        println!("  title:         {}", record.title);
    }
    if !record.html_version.is_empty() {
        println!("  html version:  {}", record.html_version);
    }
    println!("  login form:    {}", if record.has_login_form { "yes" } else { "no" });
    println!(
        "  links:         {} internal, {} external, {} broken",
        record.internal_links, record.external_links, record.broken_links
    );

    if !record.heading_counts.is_empty() {
        let headings: Vec<String> = record
            .heading_counts
            .iter()
            .map(|(tag, count)| format!("{tag}:{count}"))
            .collect();
        println!("  headings:      {}", headings.join(" "));
    }

    if !record.broken_list.is_empty() {
        println!("  broken links:");
        for broken in &record.broken_list {
            let kind = broken.kind.as_deref().unwrap_or("-");
            println!("    [{}] {} ({kind})", broken.code, broken.url);
        }
    }

    println!("  updated:       {}", record.updated_ago());
}
