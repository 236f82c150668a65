use clap::Parser;
use playlist_diff::cli::{Cli, Command, DiffArgs, ReportArgs, SyncArgs};
use playlist_diff::config::Config;
use playlist_diff::error::Result;
use playlist_diff::fetch::youtube::YoutubeSource;
use playlist_diff::logging::{self, LogLevel};
use playlist_diff::report::{self, json, table};
use playlist_diff::run;
use playlist_diff::store::diff;
use playlist_diff::store::Store;

fn sync_command(args: SyncArgs) -> Result<()> {
    let mut config = Config::from_args(&args.config)?;
    if args.keep_history {
        config.keep_history = true;
    }

    let (api_key, playlist_id) = config.credentials()?;
    let source = YoutubeSource::new(
        api_key,
        playlist_id,
        config.request_timeout,
        config.retry_policy(),
    )
    .with_base_url(&config.api_url);
    let store = config.store();
    let names = config.file_names();

    let outcome = if args.dry_run {
        run::plan(&source, &store, &names, config.keep_history)?
    } else {
        run::sync(&source, &store, &names, config.keep_history)?
    };

    report::print_outcome(&outcome, args.dry_run, args.json);
    Ok(())
}

fn report_command(args: ReportArgs) -> Result<()> {
    let config = Config::from_args(&args.config)?;
    let store = config.store();

    if args.list {
        let mut archives = store.archives(&config.playlist_file_name)?;
        archives.extend(store.archives(&config.diff_file_name)?);
        archives.sort_by_key(|a| a.captured_at);

        if args.json {
            println!("{}", json::render_archives(&archives));
        } else {
            print!("{}", table::render_archives(&archives));
        }
        return Ok(());
    }

    let name = if args.diff {
        &config.diff_file_name
    } else {
        &config.playlist_file_name
    };

    let snapshot = match store.load(name) {
        Ok(snapshot) => snapshot,
        Err(e) if e.is_not_found() => {
            eprintln!(
                "No {name} in {}. Run 'playlist-diff sync' to create one.",
                config.dir_path.display()
            );
            std::process::exit(1);
        }
        Err(e) => return Err(e.into()),
    };

    if args.json {
        println!("{}", json::render_snapshot(&snapshot));
    } else if args.diff {
        println!(
            "diff captured {}",
            snapshot.updated_at().format("%Y-%m-%d %H:%M:%S")
        );
        print!("{}", table::render_diff(&snapshot));
    } else {
        print!("{}", table::render_snapshot(&snapshot));
    }
    Ok(())
}

fn diff_command(args: DiffArgs) -> Result<()> {
    let from = run::load_file(&args.from)?;
    let to = run::load_file(&args.to)?;

    if args.json {
        println!("{}", json::render_snapshot(&diff::diff(&from, &to)));
        return Ok(());
    }

    println!("\nComparing snapshots:");
    println!(
        "  From: {} ({} videos, {})",
        args.from.display(),
        from.len(),
        from.updated_at().format("%Y-%m-%d %H:%M:%S")
    );
    println!(
        "  To:   {} ({} videos, {})",
        args.to.display(),
        to.len(),
        to.updated_at().format("%Y-%m-%d %H:%M:%S")
    );
    println!();

    print!("{}", table::render_changes(&diff::compare(&from, &to)));

    if to.len() < from.len() {
        println!(
            "\n{} fewer video(s) than before; removals are not listed.",
            from.len() - to.len()
        );
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    logging::init(LogLevel::from_flags(cli.verbose, cli.quiet));

    let result = match cli.command {
        Command::Sync(args) => sync_command(args),
        Command::Report(args) => report_command(args),
        Command::Diff(args) => diff_command(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
