use clap::{ArgAction, CommandFactory, Parser, Subcommand};
use coursemap::commands::CourseField;
use coursemap::model::ItemKind;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "coursemap",
    bin_name = "coursemap",
    version,
    disable_help_flag = true,
    disable_help_subcommand = true
)]
#[command(about = "Map course outcomes to modules, objectives and materials", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Course file (defaults to `course_file` from the config)
    #[arg(short, long, global = true, value_name = "PATH", help_heading = "Options")]
    pub file: Option<PathBuf>,

    /// Configuration directory
    #[arg(
        long,
        global = true,
        env = "COURSEMAP_CONFIG_DIR",
        value_name = "DIR",
        help_heading = "Options"
    )]
    pub config_dir: Option<PathBuf>,

    /// More log output (repeat for debug)
    #[arg(short, long, global = true, action = ArgAction::Count, help_heading = "Options")]
    pub verbose: u8,

    /// Print help
    #[arg(short, long, global = true)]
    pub help: bool,
}

/// Command group definitions for help output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandGroup {
    Course,
    Structure,
    Data,
    Misc,
}

impl CommandGroup {
    pub fn heading(&self) -> &'static str {
        match self {
            CommandGroup::Course => "Course Commands:",
            CommandGroup::Structure => "Structure Commands:",
            CommandGroup::Data => "Data Commands:",
            CommandGroup::Misc => "Miscellaneous:",
        }
    }

    /// Returns the group for a given command name
    pub fn for_command(name: &str) -> Option<Self> {
        match name {
            "init" | "show" | "set" => Some(CommandGroup::Course),
            "outcome" | "module" | "objective" | "item" => Some(CommandGroup::Structure),
            "import" | "export" | "render" | "reset" => Some(CommandGroup::Data),
            "config" | "help" => Some(CommandGroup::Misc),
            _ => None,
        }
    }

    /// Returns all groups in display order
    pub fn all() -> &'static [CommandGroup] {
        &[
            CommandGroup::Course,
            CommandGroup::Structure,
            CommandGroup::Data,
            CommandGroup::Misc,
        ]
    }
}

/// Returns the custom grouped help output as a string
pub fn get_grouped_help() -> String {
    let cmd = Cli::command();
    let version = cmd.get_version().unwrap_or("unknown");

    let mut output = String::new();
    output.push_str(&format!("coursemap {version}\n"));
    output.push_str("Map course outcomes to modules, objectives and materials\n");
    output.push('\n');
    output.push_str("Usage: coursemap [OPTIONS] [COMMAND]\n");

    let subcommands: Vec<_> = cmd.get_subcommands().collect();

    for group in CommandGroup::all() {
        let group_cmds: Vec<_> = subcommands
            .iter()
            .filter(|sc| {
                !sc.is_hide_set() && CommandGroup::for_command(sc.get_name()) == Some(*group)
            })
            .collect();

        if !group_cmds.is_empty() {
            output.push('\n');
            output.push_str(&format!("{}\n", group.heading()));
            for sc in group_cmds {
                let name = sc.get_name();
                let about = sc.get_about().map(|s| s.to_string()).unwrap_or_default();
                output.push_str(&format!("  {:<12} {}\n", name, about));
            }
        }
    }

    output.push('\n');
    output.push_str("Options:\n");
    output.push_str("  -f, --file <PATH>       Course file\n");
    output.push_str("      --config-dir <DIR>  Configuration directory [env: COURSEMAP_CONFIG_DIR]\n");
    output.push_str("  -v, --verbose           More log output (repeat for debug)\n");
    output.push_str("  -h, --help              Print help\n");
    output.push_str("  -V, --version           Print version\n");

    output
}

pub fn print_grouped_help() {
    print!("{}", get_grouped_help());
}

/// Prints help for the subcommand that was given with `-h`
pub fn print_subcommand_help(command: &Option<Commands>) {
    let name = match command {
        Some(Commands::Course(c)) => match c {
            CourseCommands::Init => "init",
            CourseCommands::Show => "show",
            CourseCommands::Set { .. } => "set",
        },
        Some(Commands::Structure(c)) => match c {
            StructureCommands::Outcome { .. } => "outcome",
            StructureCommands::Module { .. } => "module",
            StructureCommands::Objective { .. } => "objective",
            StructureCommands::Item { .. } => "item",
        },
        Some(Commands::Data(c)) => match c {
            DataCommands::Import { .. } => "import",
            DataCommands::Export { .. } => "export",
            DataCommands::Render { .. } => "render",
            DataCommands::Reset { .. } => "reset",
        },
        Some(Commands::Misc(c)) => match c {
            MiscCommands::Config { .. } => "config",
            MiscCommands::Help { .. } => "help",
        },
        None => {
            print_grouped_help();
            return;
        }
    };

    print_help_for_command(name);
}

/// Prints help for a command by name
pub fn print_help_for_command(name: &str) {
    let mut cmd = Cli::command();

    for subcmd in cmd.get_subcommands_mut() {
        if subcmd.get_name() == name {
            print!("{}", subcmd.render_help());
            return;
        }
    }

    eprintln!("Unknown command: {}", name);
    eprintln!();
    print_grouped_help();
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(flatten)]
    Course(CourseCommands),

    #[command(flatten)]
    Structure(StructureCommands),

    #[command(flatten)]
    Data(DataCommands),

    #[command(flatten)]
    Misc(MiscCommands),
}

#[derive(Subcommand, Debug)]
pub enum CourseCommands {
    /// Create an empty course file
    #[command(display_order = 1)]
    Init,

    /// Print the course outline with its labels
    #[command(alias = "ls", display_order = 2)]
    Show,

    /// Set the course number, name or description
    #[command(display_order = 3)]
    Set {
        /// number, name or description
        field: CourseField,

        /// New value (words are joined with spaces)
        #[arg(required = true, num_args = 1..)]
        value: Vec<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum StructureCommands {
    /// Add, change or remove learning outcomes
    #[command(alias = "slo", display_order = 10)]
    Outcome {
        #[command(subcommand)]
        action: OutcomeAction,
    },

    /// Add, rename, map or remove modules
    #[command(alias = "mod", display_order = 11)]
    Module {
        #[command(subcommand)]
        action: ModuleAction,
    },

    /// Add, change or remove a module's objectives
    #[command(alias = "obj", display_order = 12)]
    Objective {
        #[command(subcommand)]
        action: ObjectiveAction,
    },

    /// Add, change or remove resources, activities and assessments
    #[command(display_order = 13)]
    Item {
        #[command(subcommand)]
        action: ItemAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum OutcomeAction {
    /// Append an outcome
    Add {
        /// Outcome text
        text: Vec<String>,
    },

    /// Replace an outcome's text
    Set {
        /// Outcome letter (e.g. B), or number past M (e.g. #14)
        letter: String,

        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },

    /// Remove an outcome and unmap it from every module
    #[command(alias = "remove")]
    Rm {
        /// Outcome letter (e.g. B), or number past M (e.g. #14)
        letter: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum ModuleAction {
    /// Append a module
    Add {
        /// Module title
        title: Vec<String>,
    },

    /// Rename a module
    Title {
        /// Module number (e.g. 2)
        module: String,

        #[arg(required = true, num_args = 1..)]
        title: Vec<String>,
    },

    /// Replace the outcomes a module maps to
    Slos {
        /// Module number (e.g. 2)
        module: String,

        /// Outcome letters (e.g. A,C), or - for none
        letters: String,
    },

    /// Remove a module with its objectives and items
    #[command(alias = "remove")]
    Rm {
        /// Module number (e.g. 2)
        module: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum ObjectiveAction {
    /// Append an objective to a module
    Add {
        /// Module number (e.g. 2)
        module: String,

        /// Objective text
        text: Vec<String>,
    },

    /// Replace an objective's text
    Set {
        /// Objective label (e.g. 2.3)
        label: String,

        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },

    /// Remove an objective and unlink it from the module's items
    #[command(alias = "remove")]
    Rm {
        /// Objective label (e.g. 2.3)
        label: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum ItemAction {
    /// Append a resource, activity or assessment
    Add {
        /// Module number (e.g. 2)
        module: String,

        /// resource, activity or assessment
        kind: ItemKind,

        /// Item text
        content: Option<String>,

        /// Related objective labels (e.g. 2.1,2.3)
        #[arg(long, value_name = "LABELS")]
        obj: Option<String>,
    },

    /// Change an item's text or related objectives
    Set {
        /// Module number (e.g. 2)
        module: String,

        /// resource, activity or assessment
        kind: ItemKind,

        /// Item number within its list (e.g. 1)
        item: String,

        /// New item text
        #[arg(long)]
        content: Option<String>,

        /// Related objective labels, replacing the current ones (- for none)
        #[arg(long, value_name = "LABELS")]
        obj: Option<String>,
    },

    /// Remove an item
    #[command(alias = "remove")]
    Rm {
        /// Module number (e.g. 2)
        module: String,

        /// resource, activity or assessment
        kind: ItemKind,

        /// Item number within its list (e.g. 1)
        item: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum DataCommands {
    /// Replace the course with a JSON document
    #[command(display_order = 20)]
    Import {
        /// Document to read
        path: PathBuf,
    },

    /// Write the course as a JSON document
    #[command(display_order = 21)]
    Export {
        /// Destination file
        path: PathBuf,
    },

    /// Render the paginated course map
    #[command(display_order = 22)]
    Render {
        /// Destination file (defaults to `document_file` from the config);
        /// a `.pdf` extension writes PDF, anything else plain text
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },

    /// Discard the course and start empty
    #[command(display_order = 23)]
    Reset {
        /// Skip confirmation
        #[arg(long, short = 'y')]
        yes: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum MiscCommands {
    /// Get or set configuration
    #[command(display_order = 30)]
    Config {
        /// Configuration key (course_file or document_file)
        key: Option<String>,

        /// Value to set (if omitted, prints current value)
        value: Option<String>,
    },

    /// Print help for coursemap or a subcommand
    #[command(display_order = 31)]
    Help {
        /// Subcommand to get help for
        command: Option<String>,
    },
}
