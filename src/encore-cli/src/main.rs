use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use encore_core::{
    init_logging, AppDirs, Config, CredentialStore, Credentials, ScrobbleRequest, TrackRef,
};
use encore_tasks::{AttemptOutcome, ScrobblePlan, TaskEvent, TaskRunner};
use encore_ui::{run_ui, Theme, UiContext};
use lastfm_scrobbler::{LastfmConfig, LastfmScrobbler};

const PROVIDER: &str = "lastfm";

#[derive(Debug, Parser)]
#[command(name = "encore", version, about = "Mass scrobbler for Last.fm")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Scrobble one track a chosen number of times
    Scrobble(ScrobbleCommand),
    /// Search Last.fm for a track
    Search(SearchCommand),
    /// Scrobble every track on an album
    Album(AlbumCommand),
    /// Manage stored Last.fm credentials
    #[command(subcommand)]
    Auth(AuthCommand),
}

#[derive(Debug, Parser, Clone)]
struct ScrobbleCommand {
    #[arg(long)]
    artist: String,
    #[arg(long)]
    track: String,
    /// Album the plays are attributed to
    #[arg(long)]
    album: Option<String>,
    /// Number of plays to submit
    #[arg(long, default_value_t = 1)]
    count: u32,
}

#[derive(Debug, Parser, Clone)]
struct SearchCommand {
    #[arg(long)]
    artist: String,
    #[arg(long)]
    track: String,
}

#[derive(Debug, Parser, Clone)]
struct AlbumCommand {
    #[arg(long)]
    artist: String,
    #[arg(long)]
    album: String,
    /// Plays to submit per track
    #[arg(long, default_value_t = 1)]
    count: u32,
}

#[derive(Debug, Subcommand)]
enum AuthCommand {
    /// Write credentials to the OS keyring (values fall back to the
    /// LASTFM_* environment variables when flags are omitted)
    Store(StoreCommand),
    /// Remove all stored credentials
    Clear,
}

#[derive(Debug, Parser, Clone)]
struct StoreCommand {
    #[arg(long)]
    api_key: Option<String>,
    #[arg(long)]
    api_secret: Option<String>,
    #[arg(long)]
    username: Option<String>,
    #[arg(long)]
    password: Option<String>,
}

impl ScrobbleCommand {
    fn request(&self) -> ScrobbleRequest {
        let mut track = TrackRef::new(self.artist.clone(), self.track.clone());
        if let Some(album) = &self.album {
            track = track.with_album(album.clone());
        }
        ScrobbleRequest::new(track, self.count)
    }
}

impl AlbumCommand {
    fn requests(&self, titles: Vec<String>) -> Vec<ScrobbleRequest> {
        titles
            .into_iter()
            .map(|title| {
                ScrobbleRequest::new(
                    TrackRef::new(self.artist.clone(), title).with_album(self.album.clone()),
                    self.count,
                )
            })
            .collect()
    }
}

impl StoreCommand {
    fn credentials(&self) -> Result<Credentials> {
        Ok(Credentials {
            api_key: self.field(&self.api_key, encore_core::secrets::ENV_API_KEY, "api-key")?,
            api_secret: self.field(
                &self.api_secret,
                encore_core::secrets::ENV_API_SECRET,
                "api-secret",
            )?,
            username: self.field(&self.username, encore_core::secrets::ENV_USERNAME, "username")?,
            password: self.field(&self.password, encore_core::secrets::ENV_PASSWORD, "password")?,
        })
    }

    fn field(&self, flag: &Option<String>, env_var: &str, name: &str) -> Result<String> {
        if let Some(value) = flag {
            return Ok(value.clone());
        }
        match std::env::var(env_var) {
            Ok(value) if !value.is_empty() => Ok(value),
            _ => bail!("--{name} not given and {env_var} is not set"),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let dirs = AppDirs::discover()?;
    let config = Config::load_or_default(&dirs)?;
    let _logging = init_logging(&config.logging, &dirs)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;

    match cli.command {
        Some(Command::Auth(auth)) => run_auth(auth),
        Some(Command::Scrobble(cmd)) => runtime.block_on(run_scrobble(cmd, &config)),
        Some(Command::Search(cmd)) => runtime.block_on(run_search(cmd, &config)),
        Some(Command::Album(cmd)) => runtime.block_on(run_album(cmd, &config)),
        None => run_tui(&config, &runtime),
    }
}

fn run_auth(command: AuthCommand) -> Result<()> {
    let store = CredentialStore::new();
    match command {
        AuthCommand::Store(cmd) => {
            let credentials = cmd.credentials()?;
            store
                .store_credentials(PROVIDER, &credentials)
                .context("failed to write credentials to the keyring")?;
            println!("Credentials stored for {}.", credentials.username);
        }
        AuthCommand::Clear => {
            store
                .clear_provider(PROVIDER)
                .context("failed to clear stored credentials")?;
            println!("Stored credentials removed.");
        }
    }
    Ok(())
}

/// Build a client from stored credentials. Authentication is deferred to the
/// caller; search does not need a session.
fn connect(config: &Config) -> Result<LastfmScrobbler> {
    let credentials = CredentialStore::new()
        .resolve_credentials(PROVIDER)
        .context("no Last.fm credentials; run `encore auth store` or set LASTFM_* variables")?;
    let mut client_config = LastfmConfig::new(credentials);
    client_config.search_limit = config.scrobble.search_limit;
    Ok(LastfmScrobbler::new(client_config)?)
}

async fn run_scrobble(command: ScrobbleCommand, config: &Config) -> Result<()> {
    let client = connect(config)?;
    client.authenticate().await?;
    run_batch(Arc::new(client), vec![command.request()], config).await
}

async fn run_search(command: SearchCommand, config: &Config) -> Result<()> {
    use encore_core::ScrobbleService;

    let client = connect(config)?;
    let candidates = client.search_tracks(&command.artist, &command.track).await?;
    if candidates.is_empty() {
        println!("No matches.");
        return Ok(());
    }
    for (i, candidate) in candidates.iter().enumerate() {
        let listeners = candidate
            .listeners
            .map(|n| format!("  ({n} listeners)"))
            .unwrap_or_default();
        println!("{:>2}. {} — {}{listeners}", i + 1, candidate.artist, candidate.title);
    }
    Ok(())
}

async fn run_album(command: AlbumCommand, config: &Config) -> Result<()> {
    use encore_core::ScrobbleService;

    let client = connect(config)?;
    client.authenticate().await?;
    let titles = client.album_tracks(&command.artist, &command.album).await?;
    if titles.is_empty() {
        bail!("album \"{}\" has no track listing", command.album);
    }
    println!("{} tracks on \"{}\"", titles.len(), command.album);
    let requests = command.requests(titles);
    run_batch(Arc::new(client), requests, config).await
}

/// Execute a batch and print every attempt as it lands. Exits non-zero when
/// any play failed.
async fn run_batch(
    service: Arc<LastfmScrobbler>,
    requests: Vec<ScrobbleRequest>,
    config: &Config,
) -> Result<()> {
    let plan = ScrobblePlan::build(&requests)?;
    let runner = TaskRunner::new(service, &config.scrobble);
    let (_handle, mut events) = runner.spawn(plan);

    let mut summary = None;
    while let Some(event) = events.recv().await {
        match event {
            TaskEvent::Progress(progress) => match &progress.outcome {
                AttemptOutcome::Success => println!(
                    "{}/{} ✔ {}",
                    progress.attempt,
                    progress.total,
                    progress.track.describe()
                ),
                AttemptOutcome::Failure { reason } => println!(
                    "{}/{} ✘ {}: {reason}",
                    progress.attempt,
                    progress.total,
                    progress.track.describe()
                ),
            },
            TaskEvent::Completed(completion) => {
                summary = Some(completion);
            }
        }
    }

    let summary = summary.context("batch ended without a summary")?;
    println!(
        "Done: {} ok, {} failed.",
        summary.succeeded, summary.failed
    );
    if summary.failed > 0 {
        bail!("{} of {} plays were not accepted", summary.failed, summary.attempted);
    }
    Ok(())
}

fn run_tui(config: &Config, runtime: &tokio::runtime::Runtime) -> Result<()> {
    let client = connect(config)?;
    // Authenticate before the terminal enters raw mode so errors stay
    // readable.
    let account = match runtime.block_on(client.authenticate()) {
        Ok(()) => CredentialStore::new()
            .resolve(PROVIDER, encore_core::secrets::CredentialKind::Username)
            .ok(),
        Err(err) => {
            tracing::warn!(error = %err, "authentication failed; scrobbling will be rejected");
            None
        }
    };

    let service: Arc<dyn encore_core::ScrobbleService> = Arc::new(client);
    let runner = TaskRunner::new(Arc::clone(&service), &config.scrobble);
    let controller = encore_tasks::ScrobbleController::new(runner);

    tracing::info!("launching interactive UI");
    // The UI loop is synchronous; entering the runtime lets it spawn batches
    // onto the worker threads.
    let _enter = runtime.enter();
    run_ui(UiContext {
        controller,
        service,
        theme: Theme::from_config(None),
        account,
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scrobble_command_builds_a_request() {
        let cli = Cli::try_parse_from([
            "encore", "scrobble", "--artist", "Low", "--track", "Monkey", "--album",
            "The Great Destroyer", "--count", "3",
        ])
        .expect("valid arguments");

        let Some(Command::Scrobble(cmd)) = cli.command else {
            panic!("expected scrobble subcommand");
        };
        let request = cmd.request();
        assert_eq!(request.count, 3);
        assert_eq!(request.track.artist, "Low");
        assert_eq!(request.track.album.as_deref(), Some("The Great Destroyer"));
    }

    #[test]
    fn scrobble_count_defaults_to_one() {
        let cli =
            Cli::try_parse_from(["encore", "scrobble", "--artist", "Low", "--track", "Monkey"])
                .expect("valid arguments");
        let Some(Command::Scrobble(cmd)) = cli.command else {
            panic!("expected scrobble subcommand");
        };
        assert_eq!(cmd.request().count, 1);
    }

    #[test]
    fn album_command_fans_out_per_track() {
        let cmd = AlbumCommand {
            artist: "Low".into(),
            album: "The Great Destroyer".into(),
            count: 2,
        };
        let requests = cmd.requests(vec!["Monkey".into(), "California".into()]);
        assert_eq!(requests.len(), 2);
        assert!(requests.iter().all(|r| r.count == 2));
        assert_eq!(requests[1].track.title, "California");
        assert_eq!(
            requests[0].track.album.as_deref(),
            Some("The Great Destroyer")
        );
    }

    #[test]
    fn missing_required_args_are_rejected() {
        assert!(Cli::try_parse_from(["encore", "scrobble", "--artist", "Low"]).is_err());
        assert!(Cli::try_parse_from(["encore", "search", "--track", "Monkey"]).is_err());
    }

    #[test]
    fn bare_invocation_selects_the_ui() {
        let cli = Cli::try_parse_from(["encore"]).expect("no arguments is valid");
        assert!(cli.command.is_none());
    }

    #[test]
    fn store_command_requires_each_field() {
        let cmd = StoreCommand {
            api_key: Some("key".into()),
            api_secret: Some("secret".into()),
            username: Some("listener".into()),
            password: None,
        };
        // The password is absent from flags; without the environment variable
        // the command must fail rather than store a partial credential set.
        if std::env::var(encore_core::secrets::ENV_PASSWORD).is_err() {
            assert!(cmd.credentials().is_err());
        }
    }
}
