//! # CLI Dispatch
//!
//! - `run()`: parses arguments, starts logging, dispatches (called by `main.rs`)
//! - `init_context()`: resolves the config directory and course file
//! - `handle_*()`: per-command handlers that call the API and print the result
//!
//! Handlers hold no course logic. Anything that changes the course goes
//! through [`CourseMapApi`], so the CLI only decides where output goes.

use super::print::{print_config, print_course, print_messages};
use super::setup::{
    print_grouped_help, print_help_for_command, print_subcommand_help, Cli, Commands,
    CourseCommands, DataCommands, ItemAction, MiscCommands, ModuleAction, ObjectiveAction,
    OutcomeAction, StructureCommands,
};
use clap::Parser;
use coursemap::api::CourseMapApi;
use coursemap::commands::{CmdMessage, CourseField};
use coursemap::config::{ConfigAction, CourseMapConfig};
use coursemap::error::{CourseMapError, Result};
use coursemap::logging::init_logging;
use coursemap::store::fs::FileStore;
use directories::ProjectDirs;
use log::debug;
use std::path::{Path, PathBuf};

struct AppContext {
    api: CourseMapApi<FileStore>,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // Top level uses grouped help, subcommands use clap's rendering
    if cli.help {
        if cli.command.is_none() {
            print_grouped_help();
        } else {
            print_subcommand_help(&cli.command);
        }
        return Ok(());
    }

    init_logging(cli.verbose)?;

    if let Some(Commands::Misc(MiscCommands::Help { command })) = &cli.command {
        return handle_help(command.clone());
    }

    let mut ctx = init_context(&cli)?;

    match cli.command {
        Some(Commands::Course(cmd)) => match cmd {
            CourseCommands::Init => handle_init(&mut ctx),
            CourseCommands::Show => handle_show(&ctx),
            CourseCommands::Set { field, value } => handle_set(&mut ctx, field, value.join(" ")),
        },
        Some(Commands::Structure(cmd)) => match cmd {
            StructureCommands::Outcome { action } => handle_outcome(&mut ctx, action),
            StructureCommands::Module { action } => handle_module(&mut ctx, action),
            StructureCommands::Objective { action } => handle_objective(&mut ctx, action),
            StructureCommands::Item { action } => handle_item(&mut ctx, action),
        },
        Some(Commands::Data(cmd)) => match cmd {
            DataCommands::Import { path } => handle_import(&mut ctx, &path),
            DataCommands::Export { path } => handle_export(&ctx, &path),
            DataCommands::Render { output } => handle_render(&ctx, output.as_deref()),
            DataCommands::Reset { yes } => handle_reset(&mut ctx, yes),
        },
        Some(Commands::Misc(cmd)) => match cmd {
            MiscCommands::Config { key, value } => handle_config(&ctx, key, value),
            MiscCommands::Help { command } => handle_help(command),
        },
        None => handle_show(&ctx),
    }
}

fn init_context(cli: &Cli) -> Result<AppContext> {
    let config_dir = resolve_config_dir(cli.config_dir.as_deref())?;
    let config = CourseMapConfig::load(&config_dir)?;
    let course_file = cli
        .file
        .clone()
        .unwrap_or_else(|| config.course_file.clone());

    debug!(
        "event=context_ready module=cli config_dir={} course_file={}",
        config_dir.display(),
        course_file.display()
    );

    Ok(AppContext {
        api: CourseMapApi::new(FileStore::new(course_file), config_dir),
    })
}

/// `--config-dir` (or `COURSEMAP_CONFIG_DIR`), else the platform config directory.
fn resolve_config_dir(flag: Option<&Path>) -> Result<PathBuf> {
    if let Some(dir) = flag {
        return Ok(dir.to_path_buf());
    }
    ProjectDirs::from("", "", "coursemap")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or_else(|| {
            CourseMapError::Api(
                "Could not determine a configuration directory; pass --config-dir".to_string(),
            )
        })
}

fn handle_init(ctx: &mut AppContext) -> Result<()> {
    let result = ctx.api.init()?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_show(ctx: &AppContext) -> Result<()> {
    let result = ctx.api.show()?;
    if let Some(course) = &result.course {
        print_course(course);
    }
    print_messages(&result.messages);
    Ok(())
}

fn handle_set(ctx: &mut AppContext, field: CourseField, value: String) -> Result<()> {
    let result = ctx.api.update_course(field, &value)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_outcome(ctx: &mut AppContext, action: OutcomeAction) -> Result<()> {
    let result = match action {
        OutcomeAction::Add { text } => ctx.api.add_outcome(&text.join(" "))?,
        OutcomeAction::Set { letter, text } => ctx.api.update_outcome(&letter, &text.join(" "))?,
        OutcomeAction::Rm { letter } => ctx.api.remove_outcome(&letter)?,
    };
    print_messages(&result.messages);
    Ok(())
}

fn handle_module(ctx: &mut AppContext, action: ModuleAction) -> Result<()> {
    let result = match action {
        ModuleAction::Add { title } => ctx.api.add_module(&title.join(" "))?,
        ModuleAction::Title { module, title } => {
            ctx.api.update_module_title(&module, &title.join(" "))?
        }
        ModuleAction::Slos { module, letters } => ctx.api.update_module_slos(&module, &letters)?,
        ModuleAction::Rm { module } => ctx.api.remove_module(&module)?,
    };
    print_messages(&result.messages);
    Ok(())
}

fn handle_objective(ctx: &mut AppContext, action: ObjectiveAction) -> Result<()> {
    let result = match action {
        ObjectiveAction::Add { module, text } => ctx.api.add_objective(&module, &text.join(" "))?,
        ObjectiveAction::Set { label, text } => ctx.api.update_objective(&label, &text.join(" "))?,
        ObjectiveAction::Rm { label } => ctx.api.remove_objective(&label)?,
    };
    print_messages(&result.messages);
    Ok(())
}

fn handle_item(ctx: &mut AppContext, action: ItemAction) -> Result<()> {
    let result = match action {
        ItemAction::Add {
            module,
            kind,
            content,
            obj,
        } => ctx.api.add_item(
            &module,
            kind,
            content.as_deref().unwrap_or_default(),
            obj.as_deref(),
        )?,
        ItemAction::Set {
            module,
            kind,
            item,
            content,
            obj,
        } => ctx
            .api
            .update_item(&module, kind, &item, content.as_deref(), obj.as_deref())?,
        ItemAction::Rm { module, kind, item } => ctx.api.remove_item(&module, kind, &item)?,
    };
    print_messages(&result.messages);
    Ok(())
}

fn handle_import(ctx: &mut AppContext, path: &Path) -> Result<()> {
    let result = ctx.api.import_json(path)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_export(ctx: &AppContext, path: &Path) -> Result<()> {
    let result = ctx.api.export_json(path)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_render(ctx: &AppContext, output: Option<&Path>) -> Result<()> {
    let result = ctx.api.render_document(output)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_reset(ctx: &mut AppContext, yes: bool) -> Result<()> {
    if !yes {
        print_messages(&[CmdMessage::warning(
            "This discards the whole course. Re-run with --yes to confirm.",
        )]);
        return Ok(());
    }
    let result = ctx.api.reset()?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_config(ctx: &AppContext, key: Option<String>, value: Option<String>) -> Result<()> {
    let action = match (key, value) {
        (None, _) => ConfigAction::ShowAll,
        (Some(k), None) => ConfigAction::ShowKey(k),
        (Some(k), Some(v)) => ConfigAction::Set(k, v),
    };
    let show_all = action == ConfigAction::ShowAll;

    let result = ctx.api.config(action)?;
    if show_all {
        if let Some(config) = &result.config {
            print_config(config);
        }
    }
    print_messages(&result.messages);
    Ok(())
}

fn handle_help(command: Option<String>) -> Result<()> {
    match command {
        Some(cmd) => print_help_for_command(&cmd),
        None => print_grouped_help(),
    }
    Ok(())
}
