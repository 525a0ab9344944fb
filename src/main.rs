// comix command-line interface.
// Builds and queries the local comic cache and drives the issues helper.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};

mod cache;
mod comic;
mod editor;
mod error;
mod github;

use comic::{Comic, ComicClient};
use error::{ComixError, Result};
use github::{GitHubClient, Issue, IssueRequest};

/// Local xkcd comic cache and GitHub issues helper.
#[derive(Parser)]
#[command(name = "comix", version, about)]
struct Args {
    /// Store file location. Defaults to the per-user cache directory.
    #[arg(long, global = true)]
    file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch a range of comics into the store.
    Fetch {
        /// First comic number to fetch.
        #[arg(long, default_value_t = 1)]
        from: u32,
        /// Last comic number to fetch. Defaults to the newest comic.
        #[arg(long)]
        to: Option<u32>,
    },
    /// Print one cached comic.
    Show { num: u32 },
    /// Search cached comics by title and transcript.
    Search {
        #[arg(required = true)]
        terms: Vec<String>,
    },
    /// Read and write GitHub issues.
    Issue {
        #[command(subcommand)]
        command: IssueCommand,
    },
}

#[derive(Subcommand)]
enum IssueCommand {
    /// Print one issue.
    Read {
        owner: String,
        repo: String,
        number: u64,
    },
    /// Open a new issue. Prompts for a title and opens $EDITOR for the
    /// body unless both are given as flags.
    Create {
        owner: String,
        repo: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        body: Option<String>,
    },
    /// Edit an issue's title or body.
    Update {
        owner: String,
        repo: String,
        number: u64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        body: Option<String>,
    },
    /// Close an issue.
    Close {
        owner: String,
        repo: String,
        number: u64,
    },
    /// Search issues across GitHub.
    Search {
        #[arg(required = true)]
        terms: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("comix: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<()> {
    let path = store_file(args.file)?;
    match args.command {
        Command::Fetch { from, to } => fetch(&path, from, to).await,
        Command::Show { num } => show(&path, num),
        Command::Search { terms } => search(&path, &terms),
        Command::Issue { command } => issue(command).await,
    }
}

fn store_file(file: Option<PathBuf>) -> Result<PathBuf> {
    match file {
        Some(path) => Ok(path),
        None => cache::paths::store_path()
            .ok_or_else(|| ComixError::Other("no usable cache directory".to_string())),
    }
}

async fn fetch(path: &Path, from: u32, to: Option<u32>) -> Result<()> {
    let client = ComicClient::new()?;
    let to = match to {
        Some(to) => to,
        None => client.latest().await?.num,
    };

    let mut store = cache::load(path)?;
    let before = store.len();
    let failures = client.populate(&mut store, from..=to).await;
    cache::save(&store, path)?;

    println!(
        "{} comics cached ({} new) in {}",
        store.len(),
        store.len() - before,
        path.display()
    );
    for failure in &failures {
        eprintln!("comic {}: {}", failure.num, failure.error);
    }
    Ok(())
}

fn show(path: &Path, num: u32) -> Result<()> {
    let store = cache::load(path)?;
    match store.get(num) {
        Some(comic) => print_comic(comic),
        None => println!("comic {num} is not cached"),
    }
    Ok(())
}

fn search(path: &Path, terms: &[String]) -> Result<()> {
    let store = cache::load(path)?;
    let query = terms.join(" ");
    let hits = store.search(&query);
    for comic in &hits {
        println!(
            "{:>5}  {} ({}/{})",
            comic.num, comic.title, comic.month, comic.year
        );
    }
    println!("{} of {} comics match", hits.len(), store.len());
    Ok(())
}

fn print_comic(comic: &Comic) {
    println!(
        "#{} {} ({}/{})",
        comic.num, comic.title, comic.month, comic.year
    );
    if !comic.link.is_empty() {
        println!("{}", comic.link);
    }
    if !comic.transcript.is_empty() {
        println!("\n{}", comic.transcript);
    }
}

async fn issue(command: IssueCommand) -> Result<()> {
    let client = GitHubClient::from_env()?;
    match command {
        IssueCommand::Read {
            owner,
            repo,
            number,
        } => {
            let issue = client.get_issue(&owner, &repo, number).await?;
            print_issue(&issue);
        }
        IssueCommand::Create {
            owner,
            repo,
            title,
            body,
        } => {
            let title = match title {
                Some(title) => title,
                None => prompt_title()?,
            };
            let body = match body {
                Some(body) => body,
                None => editor::compose_body()?,
            };
            let request = IssueRequest {
                title: Some(title),
                body: Some(body),
                state: None,
            };
            let issue = client.create_issue(&owner, &repo, &request).await?;
            print_issue(&issue);
        }
        IssueCommand::Update {
            owner,
            repo,
            number,
            title,
            body,
        } => {
            // With no flags, compose both parts the interactive way.
            let request = if title.is_none() && body.is_none() {
                IssueRequest {
                    title: Some(prompt_title()?),
                    body: Some(editor::compose_body()?),
                    state: None,
                }
            } else {
                IssueRequest {
                    title,
                    body,
                    state: None,
                }
            };
            let issue = client.edit_issue(&owner, &repo, number, &request).await?;
            print_issue(&issue);
        }
        IssueCommand::Close {
            owner,
            repo,
            number,
        } => {
            let issue = client.close_issue(&owner, &repo, number).await?;
            print_issue(&issue);
        }
        IssueCommand::Search { terms } => {
            let result = client.search_issues(&terms).await?;
            println!("{} issues:", result.total_count);
            for issue in &result.items {
                print_issue(issue);
            }
        }
    }
    Ok(())
}

fn prompt_title() -> Result<String> {
    print!("Issue title: ");
    io::stdout().flush()?;
    let mut title = String::new();
    io::stdin().read_line(&mut title)?;
    Ok(title.trim().to_string())
}

fn print_issue(issue: &Issue) {
    let login = issue
        .user
        .as_ref()
        .map(|user| user.login.as_str())
        .unwrap_or("-");
    println!(
        "#{:<5} {:>9.9} {:.55} {}",
        issue.number, login, issue.title, issue.state
    );
}
