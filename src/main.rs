use check_elasticsearch_latency::{
    build_report,
    parse_ranges,
    CheckReport,
    Config,
    SearchClient,
};
use clap::Parser;
use eyre::Result;
use std::time::Duration;
use tracing::debug;
use tracing_subscriber::{
    fmt,
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
    Layer,
};

/// Checks request latency distribution in an Elasticsearch index
#[derive(Parser, Debug)]
#[command(name = "check-elasticsearch-latency", version, about)]
struct Cli {
    /// Elasticsearch base URI, e.g. https://elasticsearch.example.com:9200
    #[arg(long, env = "CHECK_ES_URI")]
    uri: String,

    /// Index name prefix; a wildcard suffix is appended when searching
    #[arg(long, env = "CHECK_ES_INDEX")]
    index: String,

    /// Username for basic authentication
    #[arg(long, env = "CHECK_ES_USERNAME")]
    username: Option<String>,

    /// Password for basic authentication
    #[arg(long, env = "CHECK_ES_PASSWORD")]
    password: Option<String>,

    /// Search over the last N minutes
    #[arg(long, default_value_t = 5)]
    minutes: i64,

    /// Latency buckets as `low[:high[:warning[:critical]]]` tuples
    #[arg(long = "range", num_args = 1..)]
    ranges: Vec<String>,

    /// Field name where the request time is stored
    #[arg(long, default_value = "request_time")]
    request_time_field: String,

    /// HTTP request timeout in seconds
    #[arg(long, default_value_t = 10)]
    timeout: u64,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

/// Exit code for failures outside the OK/WARNING/CRITICAL scale.
const UNKNOWN: i32 = 3;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(report) => {
            println!("{report}");
            std::process::exit(report.status().exit_code());
        }
        Err(err) => {
            // The supervisor displays stdout, so the diagnostic goes there.
            println!("UNKNOWN: {err:#}");
            std::process::exit(UNKNOWN);
        }
    }
}

fn run(cli: Cli) -> Result<CheckReport> {
    let ranges = parse_ranges(&cli.ranges)?;
    debug!(count = ranges.len(), "parsed range definitions");

    let config = Config::new(
        &cli.uri,
        &cli.index,
        cli.username,
        cli.password,
        cli.minutes,
        cli.request_time_field,
        Duration::from_secs(cli.timeout),
    )?;

    let client = SearchClient::new(config)?;
    let buckets = client.latency_buckets(&ranges)?;

    build_report(&ranges, &buckets)
}

fn init_logging(verbose: bool) {
    color_eyre::install().expect("color_eyre init");

    let default_filter = if verbose {
        "check_elasticsearch_latency=debug"
    } else {
        "check_elasticsearch_latency=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    // Stdout belongs to the report line the supervisor parses; logging goes
    // to stderr.
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_filter(filter))
        .with(tracing_error::ErrorLayer::default())
        .init();
}
