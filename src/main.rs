use std::path::PathBuf;
use std::{env, io};

use clap::{CommandFactory, Parser};
use clap_complete::{generate, Shell};
use cinescrape::{Crawler, CrawlerConfig, CsvSnapshot};
use tokio::runtime;

/// Ranked movie list crawler
#[derive(Debug, Parser)]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub cmd: SubCommand,
}

#[derive(Debug, clap::Subcommand)]
pub enum SubCommand {
    /// Crawl the ranked list, enrich every movie and write the snapshot
    Update(CommonArgs),
    /// Crawl live and filter by name and/or genre
    Search(SearchArgs),
    /// List every genre found in the catalog
    Genres(CommonArgs),
    /// Fetch a single movie by its exact title
    Lookup(LookupArgs),
    #[command(hide = true)]
    Completion,
}

#[derive(Debug, clap::Args)]
pub struct CommonArgs {
    /// Optional crawler yaml configuration file
    #[arg(env = "CINESCRAPE_CONFIG", long)]
    pub crawler_config: Option<PathBuf>,
    /// Override the ranked list URL
    #[arg(long)]
    pub list_url: Option<String>,
    /// Override the per-request timeout in seconds
    #[arg(long)]
    pub request_timeout: Option<u64>,
    /// Override the maximum concurrent detail page downloads
    #[arg(long)]
    pub concurrent_downloads: Option<usize>,
    /// Override the snapshot CSV file path
    #[arg(long)]
    pub snapshot_file: Option<PathBuf>,
    /// When quiet no logs are outputted
    #[arg(long, short)]
    pub quiet: bool,
}

#[derive(Debug, clap::Args)]
pub struct SearchArgs {
    #[command(flatten)]
    pub common: CommonArgs,
    /// Case-insensitive title substring
    #[arg(long, short)]
    pub name: Option<String>,
    /// Genre token, repeatable; any matching token keeps a movie
    #[arg(long, short)]
    pub genre: Vec<String>,
}

#[derive(Debug, clap::Args)]
pub struct LookupArgs {
    #[command(flatten)]
    pub common: CommonArgs,
    /// Exact movie title (case-insensitive)
    pub title: String,
}

impl TryFrom<&CommonArgs> for CrawlerConfig {
    type Error = anyhow::Error;

    fn try_from(args: &CommonArgs) -> Result<Self, Self::Error> {
        let mut conf = if let Some(file) = args.crawler_config.as_ref().map(fs_err::File::open) {
            serde_yaml::from_reader(file?)?
        } else {
            CrawlerConfig::default()
        };
        if let Some(list_url) = &args.list_url {
            conf.list_url = list_url.to_string();
        }
        if let Some(request_timeout) = args.request_timeout {
            conf.request_timeout = request_timeout;
        }
        if let Some(concurrent_downloads) = args.concurrent_downloads {
            conf.concurrent_downloads = concurrent_downloads;
        }
        if let Some(snapshot_file) = &args.snapshot_file {
            conf.snapshot_file = snapshot_file.clone();
        }
        Ok(conf)
    }
}

fn update(args: CommonArgs) -> anyhow::Result<()> {
    let conf = CrawlerConfig::try_from(&args)?;
    let snapshots = CsvSnapshot::new(conf.snapshot_file.clone());
    let crawler = Crawler::new(conf)?;

    let rt = runtime::Builder::new_multi_thread().enable_all().build()?;
    let records = rt.block_on(crawler.update_snapshot(&snapshots))?;
    println!(
        "saved {} movies to {}",
        records.len(),
        snapshots.path().display()
    );
    Ok(())
}

fn search(args: SearchArgs) -> anyhow::Result<()> {
    let conf = CrawlerConfig::try_from(&args.common)?;
    let snapshots = CsvSnapshot::new(conf.snapshot_file.clone());
    let crawler = Crawler::new(conf)?;

    let rt = runtime::Builder::new_multi_thread().enable_all().build()?;
    let records = rt.block_on(crawler.search(&snapshots, args.name.as_deref(), &args.genre))?;
    println!("{}", serde_json::to_string_pretty(&records)?);
    Ok(())
}

fn genres(args: CommonArgs) -> anyhow::Result<()> {
    let conf = CrawlerConfig::try_from(&args)?;
    let snapshots = CsvSnapshot::new(conf.snapshot_file.clone());
    let crawler = Crawler::new(conf)?;

    let rt = runtime::Builder::new_multi_thread().enable_all().build()?;
    for genre in rt.block_on(crawler.list_genres(&snapshots))? {
        println!("{genre}");
    }
    Ok(())
}

fn lookup(args: LookupArgs) -> anyhow::Result<()> {
    let conf = CrawlerConfig::try_from(&args.common)?;
    let crawler = Crawler::new(conf)?;

    let rt = runtime::Builder::new_multi_thread().enable_all().build()?;
    let record = rt.block_on(crawler.lookup_by_title(&args.title))?;
    println!("{}", serde_json::to_string_pretty(&record)?);
    Ok(())
}

fn init_logs(quiet: bool) {
    if !quiet {
        env::set_var("RUST_LOG", "cinescrape=info");
        env_logger::init();
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    match args.cmd {
        SubCommand::Update(args) => {
            init_logs(args.quiet);
            update(args)
        }
        SubCommand::Search(args) => {
            init_logs(args.common.quiet);
            search(args)
        }
        SubCommand::Genres(args) => {
            init_logs(args.quiet);
            genres(args)
        }
        SubCommand::Lookup(args) => {
            init_logs(args.common.quiet);
            lookup(args)
        }
        SubCommand::Completion => {
            generate(
                Shell::Bash,
                &mut Args::command(),
                "cinescrape",
                &mut io::stdout(),
            );
            Ok(())
        }
    }
}
