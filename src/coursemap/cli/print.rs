use colored::Colorize;
use coursemap::commands::{CmdMessage, MessageLevel};
use coursemap::config::{CourseMapConfig, CONFIG_KEYS};
use coursemap::index::{objective_label, outcome_letter, resolve_labels};
use coursemap::model::{Course, ItemKind, Module, Ref};
use unicode_width::UnicodeWidthStr;

const INDENT: &str = "  ";
const EMPTY_COURSE: &str = "Empty course. Start with `coursemap set name ...`.";

pub(super) fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
            MessageLevel::Error => println!("{}", message.content.red()),
        }
    }
}

pub(super) fn print_course(course: &Course) {
    print!("{}", render_outline(course));
}

pub(super) fn print_config(config: &CourseMapConfig) {
    let width = CONFIG_KEYS.iter().map(|k| k.width()).max().unwrap_or(0);
    for key in CONFIG_KEYS {
        let value = config.get(key).unwrap_or_default();
        println!("{:<width$} = {}", key, value, width = width);
    }
}

/// Plain-text outline of the course with the labels commands accept.
pub(super) fn render_outline(course: &Course) -> String {
    if *course == Course::default() {
        return format!("{}\n", EMPTY_COURSE);
    }

    let mut out = String::new();
    out.push_str(&course.heading());
    out.push('\n');
    if !course.description.is_empty() {
        out.push_str(&format!("{}{}\n", INDENT, course.description));
    }

    if !course.learning_outcomes.is_empty() {
        out.push_str("\nOutcomes\n");
        for (i, outcome) in course.learning_outcomes.iter().enumerate() {
            let label = outcome_letter(i).unwrap_or_else(|_| format!("#{}", i + 1));
            out.push_str(&format!("{}{}. {}\n", INDENT, label, outcome.text));
        }
    }

    for (m, module) in course.modules.iter().enumerate() {
        out.push('\n');
        out.push_str(&format!("Module {}: {}\n", m + 1, module.title));
        out.push_str(&outline_module(course, m, module));
    }
    out
}

fn outline_module(course: &Course, m: usize, module: &Module) -> String {
    let mut out = String::new();

    let slos = module
        .related_slos
        .iter()
        .filter_map(|r| course.outcome_position(r));
    let slos = resolve_labels(slos, |p| {
        Ok(outcome_letter(p).unwrap_or_else(|_| format!("#{}", p + 1)))
    })
    .unwrap_or_default();
    out.push_str(&format!(
        "{}Outcomes: {}{}\n",
        INDENT,
        if slos.is_empty() { "-".to_string() } else { slos.join(", ") },
        stale_note(module.related_slos.iter())
    ));

    if !module.objectives.is_empty() {
        out.push_str(&format!("{}Objectives\n", INDENT));
        for (j, objective) in module.objectives.iter().enumerate() {
            out.push_str(&format!(
                "{0}{0}{1} {2}\n",
                INDENT,
                objective_label(m, j),
                objective.text
            ));
        }
    }

    for kind in ItemKind::all() {
        let items = module.items(*kind);
        if items.is_empty() {
            continue;
        }
        out.push_str(&format!("{}{}\n", INDENT, kind.heading()));
        for (i, item) in items.iter().enumerate() {
            let positions = item
                .related_objectives
                .iter()
                .filter_map(|r| module.objective_position(r));
            let labels = resolve_labels(positions, |p| Ok(objective_label(m, p)))
                .unwrap_or_default();
            let links = if labels.is_empty() {
                String::new()
            } else {
                format!(" (Obj: {})", labels.join(", "))
            };
            out.push_str(&format!(
                "{0}{0}{1}. {2}{3}{4}\n",
                INDENT,
                i + 1,
                item.content,
                links,
                stale_note(item.related_objectives.iter())
            ));
        }
    }
    out
}

fn stale_note<'a>(refs: impl Iterator<Item = &'a Ref>) -> String {
    match refs.filter(|r| matches!(r, Ref::Stale(_))).count() {
        0 => String::new(),
        n => format!(" [{} stale]", n),
    }
}
