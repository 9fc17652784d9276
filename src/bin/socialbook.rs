// src/bin/socialbook.rs

use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use dialoguer::{Input, theme::ColorfulTheme};
use socialbook::{
    CancellationToken,
    cli::{Cli, command::Signal, render_markup},
    constants::VIEW_REFRESH_INTERVAL,
    core::{
        config_loader,
        logic::{CommandResult, Logic, Status},
        paths,
        schemes::SchemeCatalog,
        storage::{JsonStorage, LoadReport, RecoveryAction},
    },
    state::ViewHandle,
    t,
};
use std::io::{self, BufRead, IsTerminal};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Sets up logging, runs the application and turns any fatal error into a
/// red diagnostic and exit status 1.
fn main() {
    let cancellation_token = Arc::new(AtomicBool::new(false));
    env_logger::init();

    if let Err(e) = run_cli(Cli::parse(), &cancellation_token) {
        cancellation_token.store(true, Ordering::Relaxed);
        eprintln!("\n{}: {:#}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run_cli(cli: Cli, cancellation_token: &CancellationToken) -> Result<()> {
    log::debug!("CLI args parsed: {:?}", cli);

    let data_dir = paths::resolve_data_dir(cli.data_dir.as_deref())
        .context(t!("app.error.data_dir"))?;
    log::info!("Using data directory {}", data_dir.display());

    let preferences =
        config_loader::load_preferences(&data_dir).context(t!("app.error.preferences"))?;
    let storage = JsonStorage::new(&data_dir, &preferences);
    let report = storage.load(preferences);
    report_recovery(&report, &storage);

    let mut logic = Logic::new(report.book, Box::new(storage), SchemeCatalog::default());

    let exit_code = if cli.command.is_empty() {
        run_repl(&mut logic, cancellation_token)?;
        0
    } else {
        // One-shot mode: a single command from the command line.
        let result = logic.submit(&cli.command.join(" "));
        print_result(&result);
        if result.status == Status::Failure { 1 } else { 0 }
    };

    logic.shutdown().context(t!("app.error.shutdown"))?;
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
    Ok(())
}

/// Tells the user what happened to each data file during startup.
fn report_recovery(report: &LoadReport, storage: &JsonStorage) {
    let outcomes = [
        (storage.persons_path(), &report.persons),
        (storage.appointments_path(), &report.appointments),
    ];
    for (path, action) in outcomes {
        match action {
            RecoveryAction::Loaded => {}
            RecoveryAction::Seeded => {
                if path == storage.persons_path() {
                    println!("{}", t!("app.info.seeded").dimmed());
                }
            }
            RecoveryAction::Corrupted { reason } => {
                println!(
                    "{}",
                    format!(
                        t!("app.warning.recovered"),
                        path = path.display(),
                        reason = reason
                    )
                    .yellow()
                );
            }
        }
    }
}

fn print_result(result: &CommandResult) {
    let message = match result.signal {
        Signal::ShowHelp => render_markup(&result.message),
        _ => result.message.clone(),
    };
    match result.status {
        Status::Success => println!("{}", message),
        Status::Warning => println!("{}", message.yellow()),
        Status::Failure => eprintln!("{}", message.red()),
    }
}

/// The interactive loop. Reads with a prompt on a terminal, plain lines
/// otherwise, until `exit` or end of input.
fn run_repl(logic: &mut Logic, cancellation_token: &CancellationToken) -> Result<()> {
    println!("{}", render_markup(t!("app.welcome")));
    let ticker = spawn_clock_ticker(logic.view_handle(), Arc::clone(cancellation_token));

    let outcome = if io::stdin().is_terminal() {
        repl_interactive(logic)
    } else {
        repl_piped(logic)
    };

    cancellation_token.store(true, Ordering::Relaxed);
    if ticker.join().is_err() {
        log::warn!("Clock ticker thread panicked");
    }
    outcome
}

fn repl_interactive(logic: &mut Logic) -> Result<()> {
    let theme = ColorfulTheme::default();
    loop {
        let line: String = Input::with_theme(&theme)
            .with_prompt(t!("app.prompt"))
            .allow_empty(true)
            .interact_text()?;
        if line.trim().is_empty() {
            continue;
        }
        let result = logic.submit(&line);
        print_result(&result);
        if result.signal == Signal::Exit {
            return Ok(());
        }
    }
}

fn repl_piped(logic: &mut Logic) -> Result<()> {
    for line in io::stdin().lock().lines() {
        let line = line.context(t!("app.error.stdin"))?;
        if line.trim().is_empty() {
            continue;
        }
        let result = logic.submit(&line);
        print_result(&result);
        if result.signal == Signal::Exit {
            break;
        }
    }
    Ok(())
}

/// Reads the published view every refresh interval. It never writes to the
/// case book and stops once the token is set.
fn spawn_clock_ticker(view: ViewHandle, cancellation_token: CancellationToken) -> JoinHandle<()> {
    thread::spawn(move || {
        let poll = Duration::from_millis(200);
        let mut last_tick = Instant::now();
        while !cancellation_token.load(Ordering::Relaxed) {
            thread::sleep(poll);
            if last_tick.elapsed() < VIEW_REFRESH_INTERVAL {
                continue;
            }
            last_tick = Instant::now();
            let snapshot = view.current();
            log::debug!(
                "Tick {}: {} person(s) shown, {} appointment(s), view v{}",
                chrono::Local::now().format("%H:%M:%S"),
                snapshot.person_count(),
                snapshot.appointments.len(),
                snapshot.version
            );
        }
    })
}
