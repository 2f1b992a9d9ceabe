use std::process;

use clap::{command, Parser, ValueHint};
use log::{debug, error, info, LevelFilter};

use spotgrab::{
    audio::Quality,
    config::Config,
    downloader::Downloader,
    error::{Error, Result},
    events::Event,
    gateway::Gateway,
    key::Secrets,
    providers::Placeholder,
    resolver,
    session::Session,
};

/// Profile to display when built in debug mode.
#[cfg(debug_assertions)]
const BUILD_PROFILE: &str = "debug";
/// Profile to display when built in release mode.
#[cfg(not(debug_assertions))]
const BUILD_PROFILE: &str = "release";

/// Group name for mutually exclusive logging options.
const ARGS_GROUP_LOGGING: &str = "logging";

/// Command line arguments as parsed by `clap`.
#[derive(Clone, Debug, Default, Hash, PartialEq, Eq, PartialOrd, Ord, Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Track sharing URL
    ///
    /// Any of the accepted forms: an open.spotify.com track link (with or
    /// without an intl-xx segment) or a spotify:track: URI.
    #[arg(value_name = "URL", value_hint = ValueHint::Url)]
    url: String,

    /// Secrets file
    ///
    /// Ensure that this file is kept secure and not shared publicly, as it
    /// contains the API key for your metadata API subscription.
    #[arg(short, long, value_name = "FILE", value_hint = ValueHint::FilePath, default_value_t = String::from("secrets.toml"))]
    secrets_file: String,

    /// Metadata API host
    ///
    /// Overrides the host from the secrets file.
    ///
    /// [default: spotify-scraper.p.rapidapi.com]
    #[arg(long, value_hint = ValueHint::Hostname)]
    host: Option<String>,

    /// Audio quality tier for the download
    #[arg(short, long, value_enum, default_value_t = Quality::Standard)]
    quality: Quality,

    /// Fetch and display the track metadata without downloading
    #[arg(long, default_value_t = false)]
    info_only: bool,

    /// Suppresses all output except warnings and errors.
    #[arg(short = 'Q', long, default_value_t = false, group = ARGS_GROUP_LOGGING)]
    quiet: bool,

    /// Enable verbose logging
    ///
    /// Specify twice for trace logging.
    #[arg(short, long, action = clap::ArgAction::Count, group = ARGS_GROUP_LOGGING)]
    verbose: u8,
}

/// Initializes the logger facade.
///
/// The logging level is determined as follows, in order of precedence from
/// highest to lowest:
/// 1. Command line arguments
/// 2. `RUST_LOG` environment variable
/// 3. Hard coded default
///
/// # Panics
///
/// Panics when a logger facade is already initialized.
fn init_logger(config: &Args) {
    let mut logger = env_logger::Builder::from_env(
        // Note: if you change the default logging level here, then you should
        // probably also change the verbosity levels below.
        env_logger::Env::default().filter_or(env_logger::DEFAULT_FILTER_ENV, "info"),
    );

    if config.quiet || config.verbose > 0 {
        let level = match config.verbose {
            0 => {
                // Quiet and verbose are mutually exclusive, and `verbose` is 0
                // by default. So this arm means: quiet mode.
                LevelFilter::Warn
            }
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        };

        // Filter log messages of external crates.
        logger.filter_module(module_path!(), level);
    }

    logger.init();
}

/// Loads the credentials from the secrets file.
fn load_secrets(secrets_file: &str) -> Result<Secrets> {
    let secrets = Secrets::from_file(secrets_file);

    if let Err(ref e) = secrets {
        if e.downcast::<std::io::Error>()
            .is_some_and(|e| e.kind() == std::io::ErrorKind::NotFound)
        {
            info!("read the documentation on how to set your API key in {secrets_file}");
        }
    }

    secrets
}

/// Logs download progress events until the orchestrator hangs up.
async fn report_progress(mut event_rx: tokio::sync::mpsc::UnboundedReceiver<Event>) {
    while let Some(event) = event_rx.recv().await {
        match event {
            Event::Stage(state) => info!("{state} ({}%)", state.checkpoint()),
            Event::Failed(reason) => error!("download failed: {reason}"),
        }
    }
}

/// Main application flow: resolve, fetch, then download.
async fn run(args: Args) -> Result<()> {
    let secrets = load_secrets(&args.secrets_file)?;

    let mut config = Config::with_key(secrets.key);
    if let Some(host) = args.host.or(secrets.host) {
        config.api_host = host;
    }

    let id = resolver::resolve(&args.url)
        .ok_or_else(|| Error::invalid_argument("not a recognizable track URL"))?;
    debug!("resolved track id: {id}");

    let gateway = Gateway::new(&config)?;
    let track = gateway.track_metadata(&id).await?;

    info!("title: {}", track.title());
    info!("artist: {}", track.artist());
    info!("album: {}", track.album());
    info!("duration: {}", track.duration_display());
    info!("popularity: {}", track.popularity());
    if let Some(link) = track.external_url() {
        info!("link: {link}");
    }

    let mut session = Session::new();
    session.load(track);
    session.set_quality(args.quality);

    if args.info_only {
        return Ok(());
    }

    info!("downloading in {}", session.quality());

    let (event_tx, event_rx) = tokio::sync::mpsc::unbounded_channel();
    let reporter = tokio::spawn(report_progress(event_rx));

    let mut downloader = Downloader::with_events(Placeholder, event_tx);
    let result = downloader.start(&session).await;

    // Dropping the orchestrator closes the event channel, letting the
    // reporter task drain the remaining events and finish.
    drop(downloader);
    let _ = reporter.await;

    result
}

/// Main entry point of the application.
///
/// This function initializes the logger facade, parses the command line
/// arguments, and runs the fetch and download workflows once.
#[tokio::main]
async fn main() {
    // `clap` handles our command line arguments and help text.
    let args = Args::parse();
    init_logger(&args);

    // Dump command line arguments before we do anything more.
    // This aids in debugging of whatever comes next.
    debug!("Command {args:#?}");

    let cmd = command!();
    let name = cmd.get_name().to_string();
    let version = cmd.get_version().unwrap_or("UNKNOWN").to_string();

    info!("starting {name}/{version}; {BUILD_PROFILE}");

    if let Err(e) = run(args).await {
        error!("{e}");
        process::exit(1);
    }
}
