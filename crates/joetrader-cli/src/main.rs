// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod config;
mod logging;
mod runtime;

use anyhow::{Context, Result, bail};
use config::Config;
use joetrader_app::Session;
use joetrader_store::{
    CatalogSource, DemoPaths, UserStore, load_metadata, scan_catalog, seed_demo_data,
    validate_username,
};
use runtime::FsRuntime;
use std::env;
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

fn main() {
    if let Err(error) = run() {
        eprintln!("{error:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let options = parse_cli_args(env::args().skip(1), Config::default_path()?)?;
    if options.show_help {
        print_help();
        return Ok(());
    }

    if options.print_config_path {
        println!("{}", options.config_path.display());
        return Ok(());
    }

    if options.print_example {
        print!("{}", Config::example_config(&options.config_path));
        return Ok(());
    }

    let config = Config::load(&options.config_path).with_context(|| {
        format!(
            "load config {}; run `joetrader --print-example-config` to generate a v1 template",
            options.config_path.display()
        )
    })?;

    let data_dir = joetrader_store::default_data_dir()?;
    logging::init(config.log_level(), &config.log_file(&data_dir))?;

    // Held until exit so the seeded demo files outlive the session.
    let demo_root = if options.demo {
        Some(tempfile::tempdir().context("create demo directory")?)
    } else {
        None
    };
    let paths = match &demo_root {
        Some(root) => DataPaths::demo(seed_demo_data(root.path())?),
        None => DataPaths::from_config(&config, &data_dir)?,
    };

    if options.check_only {
        println!("{}", check_summary(&paths, options.username.as_deref())?);
        return Ok(());
    }

    let username = match options.username {
        Some(username) => username,
        None => read_username(&mut io::stdin().lock(), &mut io::stdout())?,
    };
    let user_store = UserStore::open(&paths.users_dir, &username).with_context(|| {
        format!(
            "open user directory under {}; set [storage].users_dir to a writable directory",
            paths.users_dir.display()
        )
    })?;

    let catalog = scan_catalog(&paths.source);
    let metadata = load_metadata(&paths.metadata_path);
    let user_state = user_store.load();
    let username = user_store.username().to_owned();
    log::info!(
        "starting session for {username}: {} items, {} wanted",
        catalog.len(),
        user_state.categories.wants().len()
    );

    let mut session = Session::new(username, catalog, metadata, user_state, user_store);
    let mut runtime = FsRuntime::new(&paths.listing_path);
    joetrader_tui::run_app(&mut session, &mut runtime)
}

/// Resolved locations of every data file a session touches.
#[derive(Debug, Clone, PartialEq, Eq)]
struct DataPaths {
    source: CatalogSource,
    metadata_path: PathBuf,
    listing_path: PathBuf,
    users_dir: PathBuf,
}

impl DataPaths {
    fn from_config(config: &Config, data_dir: &Path) -> Result<Self> {
        Ok(Self {
            source: config.catalog_source()?,
            metadata_path: config.metadata_path(data_dir),
            listing_path: config.listing_path(data_dir),
            users_dir: config.users_dir(data_dir),
        })
    }

    fn demo(demo: DemoPaths) -> Self {
        Self {
            source: CatalogSource::new(demo.base_dir),
            metadata_path: demo.metadata_path,
            listing_path: demo.listing_path,
            users_dir: demo.users_dir,
        }
    }
}

fn check_summary(paths: &DataPaths, username: Option<&str>) -> Result<String> {
    let catalog = scan_catalog(&paths.source);
    let metadata = load_metadata(&paths.metadata_path);
    fs::create_dir_all(&paths.users_dir)
        .with_context(|| format!("create users directory {}", paths.users_dir.display()))?;

    let mut lines = vec![
        format!(
            "catalog: {} items under {} ({}-{})",
            catalog.len(),
            paths.source.base_dir.display(),
            paths.source.first_year,
            paths.source.last_year
        ),
        format!(
            "metadata: {} records from {}",
            metadata.len(),
            paths.metadata_path.display()
        ),
        format!("listing: {}", paths.listing_path.display()),
        format!("users: {}", paths.users_dir.display()),
    ];
    if let Some(username) = username {
        let store = UserStore::open(&paths.users_dir, username)?;
        lines.push(format!("user {}: {}", store.username(), store.dir().display()));
    }
    Ok(lines.join("\n"))
}

fn read_username<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> Result<String> {
    write!(output, "Username: ").context("write username prompt")?;
    output.flush().context("flush username prompt")?;

    let mut line = String::new();
    let read = input
        .read_line(&mut line)
        .context("read username from stdin")?;
    if read == 0 {
        bail!("no username given; pass --user <name>");
    }
    validate_username(&line)
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliOptions {
    config_path: PathBuf,
    username: Option<String>,
    print_config_path: bool,
    demo: bool,
    print_example: bool,
    check_only: bool,
    show_help: bool,
}

fn parse_cli_args<I, S>(args: I, default_config_path: PathBuf) -> Result<CliOptions>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut options = CliOptions {
        config_path: default_config_path,
        username: None,
        print_config_path: false,
        demo: false,
        print_example: false,
        check_only: false,
        show_help: false,
    };

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_ref() {
            "--config" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--config requires a file path"))?;
                options.config_path = PathBuf::from(value.as_ref());
            }
            "--user" | "-u" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--user requires a username"))?;
                options.username = Some(validate_username(value.as_ref())?);
            }
            "--print-config-path" => {
                options.print_config_path = true;
            }
            "--print-example-config" => {
                options.print_example = true;
            }
            "--demo" => {
                options.demo = true;
            }
            "--check" => {
                options.check_only = true;
            }
            "--help" | "-h" => {
                options.show_help = true;
            }
            unknown => {
                return Err(anyhow::anyhow!(
                    "unknown argument {unknown:?}; run with --help to see supported options"
                ));
            }
        }
    }

    Ok(options)
}

fn print_help() {
    println!("joetrader: browse, sort and trade a figure collection");
    println!("  --config <path>          Use a specific config path");
    println!("  --user <name>            Storage namespace (prompted for when omitted)");
    println!("  --print-config-path      Print resolved config path");
    println!("  --print-example-config   Print a v1 config template");
    println!("  --demo                   Launch with a seeded sample catalog (temporary)");
    println!("  --check                  Validate config, catalog and user directory");
    println!("  --help                   Show this help");
}

#[cfg(test)]
mod tests {
    use super::{CliOptions, DataPaths, check_summary, parse_cli_args, read_username};
    use anyhow::Result;
    use joetrader_store::seed_demo_data;
    use joetrader_testkit::CatalogFixture;
    use std::io::Cursor;
    use std::path::PathBuf;

    fn default_options_path() -> PathBuf {
        PathBuf::from("/tmp/joetrader-config.toml")
    }

    #[test]
    fn parse_cli_args_defaults_to_provided_config_path() -> Result<()> {
        let options = parse_cli_args(Vec::<String>::new(), default_options_path())?;
        assert_eq!(
            options,
            CliOptions {
                config_path: default_options_path(),
                username: None,
                print_config_path: false,
                demo: false,
                print_example: false,
                check_only: false,
                show_help: false,
            }
        );
        Ok(())
    }

    #[test]
    fn parse_cli_args_sets_config_path_and_user() -> Result<()> {
        let options = parse_cli_args(
            vec!["--config", "/custom/config.toml", "--user", "flint"],
            default_options_path(),
        )?;
        assert_eq!(options.config_path, PathBuf::from("/custom/config.toml"));
        assert_eq!(options.username.as_deref(), Some("flint"));
        Ok(())
    }

    #[test]
    fn parse_cli_args_errors_for_missing_values() {
        let error = parse_cli_args(vec!["--config"], default_options_path())
            .expect_err("missing config value should fail");
        assert!(error.to_string().contains("--config requires a file path"));

        let error = parse_cli_args(vec!["--user"], default_options_path())
            .expect_err("missing username should fail");
        assert!(error.to_string().contains("--user requires a username"));
    }

    #[test]
    fn parse_cli_args_rejects_unsafe_usernames() {
        let error = parse_cli_args(vec!["--user", "../root"], default_options_path())
            .expect_err("path-like username should fail");
        assert!(error.to_string().contains("path separator"));
    }

    #[test]
    fn parse_cli_args_errors_for_unknown_argument() {
        let error = parse_cli_args(vec!["--wat"], default_options_path())
            .expect_err("unknown arg should fail");
        let message = error.to_string();
        assert!(message.contains("unknown argument"));
        assert!(message.contains("--help"));
    }

    #[test]
    fn parse_cli_args_sets_print_demo_and_check_flags() -> Result<()> {
        let options = parse_cli_args(
            vec![
                "--print-config-path",
                "--print-example-config",
                "--demo",
                "--check",
            ],
            default_options_path(),
        )?;
        assert!(options.print_config_path);
        assert!(options.print_example);
        assert!(options.demo);
        assert!(options.check_only);
        assert!(!options.show_help);
        Ok(())
    }

    #[test]
    fn parse_cli_args_sets_help_flag_for_long_and_short_variants() -> Result<()> {
        let long = parse_cli_args(vec!["--help"], default_options_path())?;
        assert!(long.show_help);

        let short = parse_cli_args(vec!["-h"], default_options_path())?;
        assert!(short.show_help);
        Ok(())
    }

    #[test]
    fn read_username_prompts_and_trims() -> Result<()> {
        let mut input = Cursor::new("  lady-jaye \n");
        let mut output = Vec::new();
        assert_eq!(read_username(&mut input, &mut output)?, "lady-jaye");
        assert_eq!(String::from_utf8(output)?, "Username: ");
        Ok(())
    }

    #[test]
    fn read_username_rejects_empty_and_closed_input() {
        let mut output = Vec::new();
        let error = read_username(&mut Cursor::new(""), &mut output)
            .expect_err("closed stdin should fail");
        assert!(error.to_string().contains("--user"));

        let error = read_username(&mut Cursor::new("\n"), &mut output)
            .expect_err("blank name should fail");
        assert!(error.to_string().contains("must not be empty"));
    }

    #[test]
    fn check_summary_reports_demo_catalog() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let paths = DataPaths::demo(seed_demo_data(temp.path())?);
        let summary = check_summary(&paths, Some("duke"))?;
        assert!(summary.contains("catalog: 13 items"), "{summary}");
        assert!(summary.contains("metadata: 12 records"), "{summary}");
        assert!(summary.contains("user duke:"), "{summary}");
        assert!(paths.users_dir.join("duke").is_dir());
        Ok(())
    }

    #[test]
    fn check_summary_tolerates_missing_catalog() -> Result<()> {
        let fixture = CatalogFixture::new()?;
        let paths = DataPaths {
            source: joetrader_store::CatalogSource::new(fixture.base_dir()),
            metadata_path: fixture.metadata_path(),
            listing_path: fixture.listing_path(),
            users_dir: fixture.users_dir(),
        };
        let summary = check_summary(&paths, None)?;
        assert!(summary.contains("catalog: 0 items"), "{summary}");
        assert!(fixture.users_dir().is_dir());
        Ok(())
    }
}
