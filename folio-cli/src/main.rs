use anyhow::{Context, Result};
use clap::{Arg, ArgAction, ArgMatches, Command};
use folio::*;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let matches = build_cli().get_matches();

    // -v may be given before or after the subcommand
    let verbosity = matches
        .subcommand()
        .map(|(_, sub)| sub.get_count("verbose"))
        .unwrap_or(0)
        .max(matches.get_count("verbose"));
    init_tracing(verbosity);

    match matches.subcommand() {
        Some(("render", sub_matches)) => {
            render_command(sub_matches).await?;
        }
        Some(("check", sub_matches)) => {
            check_command(sub_matches).await?;
        }
        Some(("preview", sub_matches)) => {
            preview_command(sub_matches).await?;
        }
        _ => {
            build_cli().print_help()?;
            std::process::exit(1);
        }
    }

    Ok(())
}

fn init_tracing(verbosity: u8) {
    let default_level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn profile_arg() -> Arg {
    Arg::new("profile")
        .short('p')
        .long("profile")
        .value_name("PATH|URL")
        .help("Profile document: a JSON file or an http(s) site URL (overrides the config file)")
}

fn config_arg() -> Arg {
    Arg::new("config")
        .short('c')
        .long("config")
        .value_name("FILE")
        .help("YAML site configuration (defaults to ./folio.yaml when present)")
}

fn build_cli() -> Command {
    Command::new("folio")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Render a personal portfolio page from a JSON profile document")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::Count)
                .global(true)
                .help("Increase log verbosity (RUST_LOG overrides)"),
        )
        .subcommand(
            Command::new("render")
                .about("Render index.html and profile.json into an output directory")
                .arg(profile_arg())
                .arg(config_arg())
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .value_name("DIR")
                        .help("Output directory (defaults to the config's output_dir)"),
                ),
        )
        .subcommand(
            Command::new("check")
                .about("Load the profile and list the sections that would render")
                .arg(profile_arg())
                .arg(config_arg()),
        )
        .subcommand(
            Command::new("preview")
                .about("Mount the live page, run its timers for a while, then print the final page")
                .arg(profile_arg())
                .arg(config_arg())
                .arg(
                    Arg::new("seconds")
                        .short('s')
                        .long("seconds")
                        .value_name("N")
                        .value_parser(clap::value_parser!(u64))
                        .default_value("3")
                        .help("How long to keep the page mounted"),
                ),
        )
}

/// Resolve the site config from `--config`, `./folio.yaml`, or defaults,
/// then apply `--profile`
async fn load_config(matches: &ArgMatches) -> Result<SiteConfig> {
    let mut config = match matches.get_one::<String>("config") {
        Some(path) => parse_config_file(path)
            .await
            .with_context(|| format!("Failed to load config '{}'", path))?,
        None if PathBuf::from("folio.yaml").exists() => parse_config_file("folio.yaml")
            .await
            .context("Failed to load ./folio.yaml")?,
        None => SiteConfig::default(),
    };

    if let Some(profile) = matches.get_one::<String>("profile") {
        config.profile = profile.clone();
    }

    debug!(?config, "resolved site config");
    Ok(config)
}

async fn render_command(matches: &ArgMatches) -> Result<()> {
    let mut config = load_config(matches).await?;
    if let Some(output) = matches.get_one::<String>("output") {
        config.output_dir = output.clone();
    }

    println!("Folio Page Renderer");
    println!("===================");
    println!("Profile: {}", config.profile_source());
    println!("Output: {}", config.output_dir);
    println!();

    let portfolio = Portfolio::with_config(config).await;
    let Some(profile) = portfolio.profile() else {
        anyhow::bail!("{}", LOAD_FAILED_MESSAGE);
    };
    println!("✓ Loaded profile for {}", profile.name);

    let index = portfolio.write_site(&portfolio.config().output_dir).await?;

    println!("✓ Page written to: {}", index.display());
    println!(
        "  Sections: {}",
        portfolio
            .sections()
            .iter()
            .map(|s| s.name())
            .collect::<Vec<_>>()
            .join(", ")
    );

    Ok(())
}

async fn check_command(matches: &ArgMatches) -> Result<()> {
    let config = load_config(matches).await?;
    let source = config.profile_source();

    // Fetch directly so the failure reason can be shown
    let fetcher = source.fetcher();
    let profile = match fetch_profile(fetcher.as_ref()).await {
        Ok(profile) => profile,
        Err(err) => anyhow::bail!("{} ({})", LOAD_FAILED_MESSAGE, err),
    };

    println!("✓ {} is a valid profile document", source);
    println!("  Name: {}", profile.name);
    println!("  Education entries: {}", profile.education.len());
    println!("  Skills: {}", profile.skills.len());
    println!("  Interests: {}", profile.interests.len());
    println!("  Arsenal groups: {}", profile.arsenal_groups().len());
    println!("  Projects: {}", profile.project_list().len());
    println!(
        "  Social links: {}",
        profile
            .social_links()
            .iter()
            .map(|l| l.kind.label())
            .collect::<Vec<_>>()
            .join(", ")
    );
    println!();

    let rendered = sections(&profile);
    for section in [
        Section::Education,
        Section::Skills,
        Section::Interests,
        Section::Arsenal,
        Section::Projects,
    ] {
        let mark = if rendered.contains(&section) { "✓" } else { "-" };
        println!("  {} {}", mark, section.name());
    }

    Ok(())
}

async fn preview_command(matches: &ArgMatches) -> Result<()> {
    let config = load_config(matches).await?;
    let seconds = *matches.get_one::<u64>("seconds").unwrap_or(&3);

    let mut live = LivePage::mount(&config, config.profile_source().fetcher());
    let deadline = tokio::time::sleep(Duration::from_secs(seconds));
    tokio::pin!(deadline);

    loop {
        tokio::select! {
            _ = &mut deadline => break,
            event = live.next_event() => match event {
                Some(PageEvent::Loaded(state)) => {
                    if state.is_failed() {
                        info!("profile failed to load");
                    }
                }
                Some(PageEvent::TypewriterTick) => {
                    debug!(text = live.page().typewriter().displayed(), "typewriter");
                }
                Some(PageEvent::ClockTick(_)) => {
                    info!(time = live.page().clock().display(), "clock");
                }
                Some(_) => {}
                None => break,
            },
        }
    }

    live.unmount();
    println!("{}", live.render());

    if live.page().load_state().is_failed() {
        std::process::exit(1);
    }

    Ok(())
}
