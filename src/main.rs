//! Plugin preset CLI - manage, export and import preset files.
//!
//! Operates directly on the preset directory and the sharing codec; a live
//! host is never required.
#![forbid(unsafe_code)]

use std::io::{self, Read};

use clap::Parser;
use console::style;
use serde::Serialize;

use presets::cli::{Cli, Commands};
use presets::error::{PresetError, Result};
use presets::logging::init_logging;
use presets::preset::{fresh_id, is_valid_name, sort_by_name, Preset, PresetId};
use presets::share;
use presets::storage::{default_presets_dir, DiskStore};

fn main() {
    let cli = Cli::parse();

    init_logging(cli.use_json(), cli.verbose, cli.quiet);

    // Handle no-color flag or non-TTY
    if cli.no_color {
        console::set_colors_enabled(false);
    }

    // Run the command
    let result = run(&cli);

    // Handle errors
    if let Err(e) = result {
        output_error(&cli, &e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    match &cli.command {
        None => print_quick_start(cli),
        Some(Commands::List(args)) => cmd_list(cli, args),
        Some(Commands::Show(args)) => cmd_show(cli, args),
        Some(Commands::Export(args)) => cmd_export(cli, args),
        Some(Commands::Import(args)) => cmd_import(cli, args),
        Some(Commands::Delete(args)) => cmd_delete(cli, args),
        Some(Commands::Rename(args)) => cmd_rename(cli, args),
        Some(Commands::Version) => cmd_version(cli),
        Some(Commands::Completions(args)) => cmd_completions(cli, args),
    }
}

// === Quick Start ===

/// Prints quick-start help for both humans and scripts.
#[allow(clippy::unnecessary_wraps)] // Consistent return type with other commands
fn print_quick_start(cli: &Cli) -> Result<()> {
    if cli.use_json() {
        let help = RobotQuickStart {
            tool: "presets",
            version: env!("CARGO_PKG_VERSION"),
            description: "Manage, export and import plugin preset files",
            commands: RobotCommands {
                list: "presets list --robot",
                show: "presets show NAME --robot",
                export: "presets export NAME",
                import: "presets import CODE",
                delete: "presets delete NAME",
                rename: "presets rename NAME NEW_NAME",
            },
            preset_dir: default_presets_dir().display().to_string(),
        };
        println!("{}", serde_json::to_string_pretty(&help).unwrap());
    } else {
        println!(
            "{} {} - plugin preset manager\n",
            style("presets").bold().cyan(),
            env!("CARGO_PKG_VERSION")
        );
        println!("{}", style("QUICK START").bold().underlined());
        println!();
        println!("  {}  List presets", style("presets list").green());
        println!("  {}  Show captured state", style("presets show NAME").green());
        println!("  {}  Copy-pasteable code", style("presets export NAME").green());
        println!("  {}  Import a code", style("presets import CODE").green());
        println!();
        println!("Run {} for full help", style("presets --help").yellow());
    }
    Ok(())
}

#[derive(Serialize)]
struct RobotQuickStart {
    tool: &'static str,
    version: &'static str,
    description: &'static str,
    commands: RobotCommands,
    preset_dir: String,
}

#[derive(Serialize)]
struct RobotCommands {
    list: &'static str,
    show: &'static str,
    export: &'static str,
    import: &'static str,
    delete: &'static str,
    rename: &'static str,
}

// === Command Implementations ===

fn cmd_list(cli: &Cli, args: &presets::cli::ListArgs) -> Result<()> {
    let presets = load_presets(cli);

    if cli.use_json() {
        if args.long {
            output_json(cli, &presets);
        } else {
            let names: Vec<&str> = presets.iter().map(|p| p.name.as_str()).collect();
            output_json(cli, &names);
        }
    } else if presets.is_empty() {
        println!("{}", style("No presets found").yellow());
        println!("Import one with: presets import CODE");
    } else {
        for p in &presets {
            if args.long {
                println!(
                    "{}: {} plugins, {} setting groups (id {})",
                    style(&p.name).green(),
                    p.enabled_plugins.len(),
                    p.plugin_settings.len(),
                    p.id
                );
            } else {
                println!("{}", p.name);
            }
        }
    }
    Ok(())
}

fn cmd_show(cli: &Cli, args: &presets::cli::ShowArgs) -> Result<()> {
    let presets = load_presets(cli);
    let preset = find_by_name(&presets, &args.name)?;

    if cli.use_json() {
        output_json(cli, preset);
    } else {
        println!("{}: {}", style("Name").bold(), preset.name);
        println!("{}: {}", style("Id").bold(), preset.id);
        let enabled = preset.enabled_plugins.values().filter(|e| **e).count();
        println!(
            "{}: {} captured, {} enabled",
            style("Plugins").bold(),
            preset.enabled_plugins.len(),
            enabled
        );
        println!(
            "{}: {} groups",
            style("Settings").bold(),
            preset.plugin_settings.len()
        );
        for (name, on) in &preset.enabled_plugins {
            let mark = if *on {
                style("on ").green()
            } else {
                style("off").red()
            };
            println!("  {mark} {name}");
        }
    }
    Ok(())
}

fn cmd_export(cli: &Cli, args: &presets::cli::ExportArgs) -> Result<()> {
    let presets = load_presets(cli);
    let preset = find_by_name(&presets, &args.name)?;
    let code = share::export(preset)?;

    if cli.use_json() {
        output_json(cli, &serde_json::json!({ "name": preset.name, "code": code }));
    } else {
        println!("{code}");
    }
    Ok(())
}

fn cmd_import(cli: &Cli, args: &presets::cli::ImportArgs) -> Result<()> {
    let code = match &args.code {
        Some(code) => code.clone(),
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let mut preset = share::import(&code)?;
    if let Some(name) = &args.name {
        if !is_valid_name(name) {
            return Err(PresetError::InvalidName { name: name.clone() });
        }
        preset.name = name.clone();
    }

    let mut presets = load_presets(cli);
    preset.id = unique_id(&presets);
    let saved = preset.clone();
    presets.push(preset);
    sort_by_name(&mut presets);
    store(cli).save_all(&presets)?;

    if cli.use_json() {
        output_json(
            cli,
            &serde_json::json!({ "name": saved.name, "id": saved.id, "ok": true }),
        );
    } else if !cli.quiet {
        println!("Imported '{}' (id {})", saved.name, saved.id);
    }
    Ok(())
}

fn cmd_delete(cli: &Cli, args: &presets::cli::DeleteArgs) -> Result<()> {
    let mut presets = load_presets(cli);
    let index = presets
        .iter()
        .position(|p| p.name == args.name)
        .ok_or_else(|| PresetError::PresetNotFound {
            name: args.name.clone(),
        })?;
    let removed = presets.remove(index);
    store(cli).save_all(&presets)?;

    if cli.use_json() {
        output_json(cli, &serde_json::json!({ "deleted": removed.name, "ok": true }));
    } else if !cli.quiet {
        println!("Deleted '{}'", removed.name);
    }
    Ok(())
}

fn cmd_rename(cli: &Cli, args: &presets::cli::RenameArgs) -> Result<()> {
    if !is_valid_name(&args.new_name) {
        return Err(PresetError::InvalidName {
            name: args.new_name.clone(),
        });
    }

    let mut presets = load_presets(cli);
    let preset = presets
        .iter_mut()
        .find(|p| p.name == args.name)
        .ok_or_else(|| PresetError::PresetNotFound {
            name: args.name.clone(),
        })?;
    preset.name = args.new_name.clone();
    sort_by_name(&mut presets);
    store(cli).save_all(&presets)?;

    if cli.use_json() {
        output_json(
            cli,
            &serde_json::json!({ "from": args.name, "to": args.new_name, "ok": true }),
        );
    } else if !cli.quiet {
        println!("Renamed '{}' to '{}'", args.name, args.new_name);
    }
    Ok(())
}

#[allow(clippy::unnecessary_wraps)] // Consistent return type with other commands
fn cmd_version(cli: &Cli) -> Result<()> {
    if cli.use_json() {
        output_json(
            cli,
            &serde_json::json!({ "version": env!("CARGO_PKG_VERSION") }),
        );
    } else {
        println!("presets {}", env!("CARGO_PKG_VERSION"));
    }
    Ok(())
}

#[allow(clippy::unnecessary_wraps)] // Consistent return type with other commands
fn cmd_completions(_cli: &Cli, args: &presets::cli::CompletionsArgs) -> Result<()> {
    use clap::CommandFactory;
    clap_complete::generate(args.shell, &mut Cli::command(), "presets", &mut io::stdout());
    Ok(())
}

// === Utility Functions ===

fn store(cli: &Cli) -> DiskStore {
    let dir = cli.dir.clone().unwrap_or_else(default_presets_dir);
    DiskStore::new(dir)
}

fn load_presets(cli: &Cli) -> Vec<Preset> {
    let mut presets = store(cli).load_all();
    sort_by_name(&mut presets);
    presets
}

fn find_by_name<'a>(presets: &'a [Preset], name: &str) -> Result<&'a Preset> {
    presets
        .iter()
        .find(|p| p.name == name)
        .ok_or_else(|| PresetError::PresetNotFound {
            name: name.to_string(),
        })
}

fn unique_id(presets: &[Preset]) -> PresetId {
    let mut candidate = fresh_id();
    while presets.iter().any(|p| p.id == candidate) {
        candidate += 1;
    }
    candidate
}

fn output_json<T: Serialize>(cli: &Cli, data: &T) {
    let json = if cli.use_compact_json() {
        serde_json::to_string(data).unwrap()
    } else {
        serde_json::to_string_pretty(data).unwrap()
    };
    println!("{json}");
}

fn output_error(cli: &Cli, error: &PresetError) {
    if cli.use_json() {
        let json = serde_json::json!({
            "error": true,
            "message": error.to_string(),
            "suggestion": error.suggestion(),
            "recoverable": error.is_user_recoverable(),
        });
        eprintln!("{}", serde_json::to_string_pretty(&json).unwrap());
    } else {
        eprintln!("{}: {}", style("Error").red().bold(), error);
        if let Some(suggestion) = error.suggestion() {
            eprintln!("{}: {}", style("Hint").yellow(), suggestion);
        }
    }
}
