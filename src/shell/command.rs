use std::path::PathBuf;

use crate::model::{AntibodyField, StainType};
use crate::shell::ShellError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    BuildPanel,
    Inventory,
    SavedPanels,
    History,
    Templates,
}

impl View {
    pub fn title(self) -> &'static str {
        match self {
            View::BuildPanel => "Build Panel",
            View::Inventory => "Inventory",
            View::SavedPanels => "Saved Panels",
            View::History => "History",
            View::Templates => "Templates",
        }
    }

    fn parse(raw: &str) -> Result<Self, ShellError> {
        match raw.to_ascii_lowercase().as_str() {
            "build" | "build-panel" | "panel" => Ok(View::BuildPanel),
            "inventory" | "inv" => Ok(View::Inventory),
            "saved" | "saved-panels" | "panels" => Ok(View::SavedPanels),
            "history" => Ok(View::History),
            "templates" => Ok(View::Templates),
            other => Err(ShellError::Usage(format!(
                "unknown view '{other}', expected build|inventory|saved|history|templates"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewAntibody {
    pub id: Option<u32>,
    pub antigen: String,
    pub clone: String,
    pub metal: String,
    pub concentration: f64,
    pub volume_per_test: f64,
    pub stock_volume: f64,
    pub alert_threshold: f64,
    pub stain_type: StainType,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ShellCommand {
    Help,
    Quit,
    Whoami,
    View(View),
    Search(String),
    Toggle(u32),
    Clear,
    Name(String),
    Cells(f64),
    Summary,
    Save,
    Execute,
    Inventory,
    Alerts,
    Add(NewAntibody),
    Replace {
        id: u32,
        record: NewAntibody,
    },
    Edit {
        id: u32,
        field: AntibodyField,
        value: String,
    },
    Delete(u32),
    Export(Option<PathBuf>),
    Import(PathBuf),
    Panels,
    Load(u32),
    LoadName(String),
    History,
    ExportHistory(Option<PathBuf>),
    Templates,
    TemplateSave,
    TemplateLoad(String),
}

impl ShellCommand {
    pub fn is_state_mutating(&self) -> bool {
        matches!(
            self,
            Self::Toggle(_)
                | Self::Clear
                | Self::Save
                | Self::Execute
                | Self::Add(_)
                | Self::Replace { .. }
                | Self::Edit { .. }
                | Self::Delete(_)
                | Self::Import(_)
                | Self::Load(_)
                | Self::LoadName(_)
                | Self::TemplateSave
                | Self::TemplateLoad(_)
        )
    }
}

pub fn shell_help_text() -> &'static str {
    "Commands:\n\
help | quit | whoami\n\
view build|inventory|saved|history|templates\n\
Build Panel:   search [TEXT] | toggle ID | clear | name PANEL_NAME | cells MILLIONS\n\
               summary | save | execute\n\
Inventory:     inventory | alerts | delete ID | edit ID FIELD VALUE\n\
               add ANTIGEN CLONE METAL CONC VOL_PER_TEST STOCK ALERT STAIN [ID]\n\
               replace ID ANTIGEN CLONE METAL CONC VOL_PER_TEST STOCK ALERT STAIN [NEW_ID]\n\
               export [PATH] | import PATH\n\
Saved Panels:  panels | load ID | load-name NAME\n\
History:       history | export-history [PATH]\n\
Templates:     templates | template-save | template-load N|NAME\n\
Quote arguments containing spaces, e.g. name \"Panel A\""
}

fn usage(command: &str) -> ShellError {
    ShellError::Usage(format!("invalid '{command}' usage. Try: help"))
}

fn parse_id(raw: &str) -> Result<u32, ShellError> {
    raw.parse()
        .map_err(|_| ShellError::Usage(format!("invalid antibody id '{raw}'")))
}

fn parse_number(what: &str, raw: &str) -> Result<f64, ShellError> {
    raw.parse()
        .map_err(|_| ShellError::Usage(format!("invalid {what} '{raw}'")))
}

fn single<'a>(args: &'a [String], name: &str) -> Result<&'a str, ShellError> {
    match args {
        [one] => Ok(one.as_str()),
        _ => Err(usage(name)),
    }
}

fn no_args(
    args: &[String],
    name: &str,
    command: ShellCommand,
) -> Result<ShellCommand, ShellError> {
    if args.is_empty() {
        Ok(command)
    } else {
        Err(usage(name))
    }
}

fn optional_path(args: &[String], name: &str) -> Result<Option<PathBuf>, ShellError> {
    match args {
        [] => Ok(None),
        [path] => Ok(Some(PathBuf::from(path))),
        _ => Err(usage(name)),
    }
}

fn joined(args: &[String], name: &str) -> Result<String, ShellError> {
    if args.is_empty() {
        return Err(usage(name));
    }
    Ok(args.join(" "))
}

fn parse_new_antibody(command: &str, args: &[String]) -> Result<NewAntibody, ShellError> {
    if args.len() != 8 && args.len() != 9 {
        return Err(usage(command));
    }
    Ok(NewAntibody {
        id: args.get(8).map(|raw| parse_id(raw)).transpose()?,
        antigen: args[0].clone(),
        clone: args[1].clone(),
        metal: args[2].clone(),
        concentration: parse_number("concentration", &args[3])?,
        volume_per_test: parse_number("volume per test", &args[4])?,
        stock_volume: parse_number("stock volume", &args[5])?,
        alert_threshold: parse_number("alert threshold", &args[6])?,
        stain_type: args[7].parse()?,
    })
}

pub fn parse_shell_tokens(tokens: &[String]) -> Result<ShellCommand, ShellError> {
    let Some((cmd, args)) = tokens.split_first() else {
        return Err(ShellError::Usage("missing command".to_string()));
    };

    match cmd.as_str() {
        "help" | "?" => no_args(args, "help", ShellCommand::Help),
        "quit" | "exit" => no_args(args, "quit", ShellCommand::Quit),
        "whoami" => no_args(args, "whoami", ShellCommand::Whoami),
        "view" => Ok(ShellCommand::View(View::parse(single(args, "view")?)?)),
        "search" => Ok(ShellCommand::Search(args.join(" "))),
        "toggle" => Ok(ShellCommand::Toggle(parse_id(single(args, "toggle")?)?)),
        "clear" => no_args(args, "clear", ShellCommand::Clear),
        "name" => Ok(ShellCommand::Name(joined(args, "name")?)),
        "cells" => Ok(ShellCommand::Cells(parse_number(
            "cell count",
            single(args, "cells")?,
        )?)),
        "summary" => no_args(args, "summary", ShellCommand::Summary),
        "save" => no_args(args, "save", ShellCommand::Save),
        "execute" | "run" => no_args(args, "execute", ShellCommand::Execute),
        "inventory" => no_args(args, "inventory", ShellCommand::Inventory),
        "alerts" => no_args(args, "alerts", ShellCommand::Alerts),
        "add" => Ok(ShellCommand::Add(parse_new_antibody("add", args)?)),
        "replace" => match args.split_first() {
            Some((id, rest)) => Ok(ShellCommand::Replace {
                id: parse_id(id)?,
                record: parse_new_antibody("replace", rest)?,
            }),
            None => Err(usage("replace")),
        },
        "edit" => match args {
            [id, field, value] => Ok(ShellCommand::Edit {
                id: parse_id(id)?,
                field: field.parse()?,
                value: value.clone(),
            }),
            _ => Err(usage("edit")),
        },
        "delete" => Ok(ShellCommand::Delete(parse_id(single(args, "delete")?)?)),
        "export" => Ok(ShellCommand::Export(optional_path(args, "export")?)),
        "import" => Ok(ShellCommand::Import(PathBuf::from(single(args, "import")?))),
        "panels" => no_args(args, "panels", ShellCommand::Panels),
        "load" => {
            let raw = single(args, "load")?;
            let id = raw.trim_start_matches('#');
            let id = id.parse::<u32>().map_err(|_| {
                ShellError::Usage(format!("invalid saved panel id '{raw}'; use load-name NAME"))
            })?;
            Ok(ShellCommand::Load(id))
        }
        "load-name" => Ok(ShellCommand::LoadName(joined(args, "load-name")?)),
        "history" => no_args(args, "history", ShellCommand::History),
        "export-history" => Ok(ShellCommand::ExportHistory(optional_path(
            args,
            "export-history",
        )?)),
        "templates" => no_args(args, "templates", ShellCommand::Templates),
        "template-save" => no_args(args, "template-save", ShellCommand::TemplateSave),
        "template-load" => Ok(ShellCommand::TemplateLoad(joined(args, "template-load")?)),
        other => Err(ShellError::Usage(format!(
            "unknown command '{other}'. Try: help"
        ))),
    }
}

pub fn parse_shell_line(line: &str) -> Result<ShellCommand, ShellError> {
    let tokens = split_shell_words(line)?;
    parse_shell_tokens(&tokens)
}

pub fn split_shell_words(line: &str) -> Result<Vec<String>, ShellError> {
    #[derive(Clone, Copy, PartialEq, Eq)]
    enum Mode {
        Normal,
        SingleQuoted,
        DoubleQuoted,
    }

    let mut out = Vec::new();
    let mut current = String::new();
    let mut quoted = false;
    let mut mode = Mode::Normal;
    let mut chars = line.chars();

    while let Some(ch) = chars.next() {
        match mode {
            Mode::Normal => match ch {
                '\'' => {
                    mode = Mode::SingleQuoted;
                    quoted = true;
                }
                '"' => {
                    mode = Mode::DoubleQuoted;
                    quoted = true;
                }
                '\\' => {
                    if let Some(next) = chars.next() {
                        current.push(next);
                    }
                }
                c if c.is_whitespace() => {
                    if !current.is_empty() || quoted {
                        out.push(std::mem::take(&mut current));
                        quoted = false;
                    }
                }
                _ => current.push(ch),
            },
            Mode::SingleQuoted => {
                if ch == '\'' {
                    mode = Mode::Normal;
                } else {
                    current.push(ch);
                }
            }
            Mode::DoubleQuoted => match ch {
                '"' => mode = Mode::Normal,
                '\\' => {
                    if let Some(next) = chars.next() {
                        current.push(next);
                    }
                }
                _ => current.push(ch),
            },
        }
    }

    if mode != Mode::Normal {
        return Err(ShellError::Usage("unterminated quoted string".to_string()));
    }
    if !current.is_empty() || quoted {
        out.push(current);
    }
    if out.is_empty() {
        return Err(ShellError::Usage("empty command".to_string()));
    }
    Ok(out)
}
