pub mod command;

use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use crate::model::volume::MIN_CELL_COUNT_MILLIONS;
use crate::model::{AntibodyRecord, ModelError};
use crate::report::csv::{inventory_csv_string, read_inventory_csv};
use crate::report::json::render_history_json;
use crate::report::text::{
    render_alerts, render_history, render_history_entry, render_inventory, render_load_audit,
    render_panel_summary, render_saved_panels, render_selection_list, render_templates,
};
use crate::report::write_text;
use crate::session::{Session, SessionError};
use command::{NewAntibody, ShellCommand, View, parse_shell_line, shell_help_text};

#[derive(Debug, thiserror::Error)]
pub enum ShellError {
    #[error("{0}")]
    Usage(String),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("line editor error: {0}")]
    Readline(#[from] ReadlineError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

#[derive(Debug, Clone)]
pub struct ShellConfig {
    pub out_dir: PathBuf,
    pub cell_count: f64,
}

#[derive(Debug)]
pub struct Shell {
    session: Session,
    view: View,
    search: String,
    panel_name: String,
    cell_count: f64,
    out_dir: PathBuf,
}

impl Shell {
    pub fn new(session: Session, config: ShellConfig) -> Self {
        Self {
            session,
            view: View::BuildPanel,
            search: String::new(),
            panel_name: String::new(),
            cell_count: config.cell_count,
            out_dir: config.out_dir,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn prompt(&self) -> String {
        match self.session.user() {
            None => "name> ".to_string(),
            Some(user) => format!("{}@{}> ", user, self.view().title()),
        }
    }

    pub fn greeting(&self) -> String {
        match self.session.user() {
            None => "Antibody Panel Manager\nEnter your name to continue\n".to_string(),
            Some(user) => format!("Logged in as {}\n{}", user, self.render_view()),
        }
    }

    pub fn handle_line(&mut self, line: &str) -> (Flow, String) {
        let trimmed = line.trim();
        if self.session.user().is_none() {
            return self.handle_login(trimmed);
        }
        if trimmed.is_empty() {
            return (Flow::Continue, String::new());
        }

        let result = parse_shell_line(trimmed).and_then(|cmd| {
            tracing::debug!(?cmd, mutating = cmd.is_state_mutating(), "shell command");
            self.dispatch(cmd)
        });
        match result {
            Ok(out) => out,
            Err(err) => (Flow::Continue, format_error(&err)),
        }
    }

    fn handle_login(&mut self, name: &str) -> (Flow, String) {
        if name == "quit" || name == "exit" {
            return (Flow::Quit, String::new());
        }
        if self.session.login(name).is_ok() {
            (Flow::Continue, self.greeting())
        } else {
            (Flow::Continue, "Enter your name to continue\n".to_string())
        }
    }

    fn dispatch(&mut self, cmd: ShellCommand) -> Result<(Flow, String), ShellError> {
        let text = match cmd {
            ShellCommand::Help => format!("{}\n", shell_help_text()),
            ShellCommand::Quit => return Ok((Flow::Quit, String::new())),
            ShellCommand::Whoami => format!(
                "Logged in as {}\n",
                self.session.user().unwrap_or_default()
            ),
            ShellCommand::View(view) => {
                self.view = view;
                self.render_view()
            }

            ShellCommand::Search(query) => {
                self.view = View::BuildPanel;
                self.search = query;
                render_selection_list(&self.session, &self.search)
            }
            ShellCommand::Toggle(id) => {
                let selected = self.session.toggle(id)?;
                let label = self
                    .session
                    .antibody(id)
                    .map(AntibodyRecord::label)
                    .unwrap_or_else(|| format!("#{id}"));
                let verb = if selected { "Selected" } else { "Deselected" };
                format!(
                    "{} {} ({} in panel)\n",
                    verb,
                    label,
                    self.session.selection().len()
                )
            }
            ShellCommand::Clear => {
                self.session.clear_selection();
                "Selection cleared\n".to_string()
            }
            ShellCommand::Name(name) => {
                self.panel_name = name;
                format!("Panel name: {}\n", self.panel_name)
            }
            ShellCommand::Cells(count) => {
                if !count.is_finite() || count < MIN_CELL_COUNT_MILLIONS {
                    let err = SessionError::Validation("cell count must be at least 0.1");
                    return Err(err.into());
                }
                self.cell_count = count;
                render_panel_summary(&self.session, &self.panel_name, self.cell_count)
            }
            ShellCommand::Summary => {
                render_panel_summary(&self.session, &self.panel_name, self.cell_count)
            }
            ShellCommand::Save => {
                let panel = self.session.save_panel(&self.panel_name)?;
                format!("Panel saved as #{} {}\n", panel.id, panel.name)
            }
            ShellCommand::Execute => {
                let entry = self
                    .session
                    .execute_panel(&self.panel_name, self.cell_count)?;
                let mut out = "Panel executed and stock updated\n".to_string();
                out.push_str(&render_history_entry(&entry));
                if !self.session.low_stock_alerts().is_empty() {
                    out.push_str(&render_alerts(&self.session));
                }
                out
            }

            ShellCommand::Inventory => {
                self.view = View::Inventory;
                render_inventory(&self.session)
            }
            ShellCommand::Alerts => render_alerts(&self.session),
            ShellCommand::Add(new) => {
                let record = self.new_record(new);
                let text = format!("Added #{} {}\n", record.id, record.label());
                self.session.add_antibody(record);
                text
            }
            ShellCommand::Replace { id, record } => {
                let record = self.new_record(NewAntibody {
                    id: record.id.or(Some(id)),
                    ..record
                });
                let text = format!(
                    "Replaced #{} with #{} {}\n",
                    id,
                    record.id,
                    record.label()
                );
                self.session.update_antibody(id, record)?;
                text
            }
            ShellCommand::Edit { id, field, value } => {
                self.session.set_field(id, field, &value)?;
                format!("Updated {} of #{}\n", field.name(), id)
            }
            ShellCommand::Delete(id) => {
                let removed = self.session.delete_antibody(id)?;
                format!("Deleted #{} {}\n", removed.id, removed.label())
            }
            ShellCommand::Export(path) => {
                let path = path.unwrap_or_else(|| self.out_dir.join("inventory.csv"));
                let csv = inventory_csv_string(self.session.inventory())?;
                write_text(&path, &csv)?;
                tracing::info!(path = %path.display(), "inventory exported");
                format!(
                    "Exported {} records to {}\n",
                    self.session.inventory().len(),
                    path.display()
                )
            }
            ShellCommand::Import(path) => {
                let records = import_inventory(&path)?;
                let n = records.len();
                self.session.replace_inventory(records);
                format!("Imported {} records from {}\n", n, path.display())
            }

            ShellCommand::Panels => {
                self.view = View::SavedPanels;
                render_saved_panels(&self.session)
            }
            ShellCommand::Load(id) => {
                let audit = self.session.load_saved_panel(id)?;
                self.after_load(&render_load_audit(&audit))
            }
            ShellCommand::LoadName(name) => {
                let audit = self.session.load_saved_panel_by_name(&name)?;
                self.after_load(&render_load_audit(&audit))
            }

            ShellCommand::History => {
                self.view = View::History;
                render_history(&self.session)
            }
            ShellCommand::ExportHistory(path) => {
                let path = path.unwrap_or_else(|| self.out_dir.join("history.json"));
                let json = render_history_json(self.session.history())?;
                write_text(&path, &json)?;
                tracing::info!(path = %path.display(), "history exported");
                format!(
                    "Exported {} history entries to {}\n",
                    self.session.history().len(),
                    path.display()
                )
            }

            ShellCommand::Templates => {
                self.view = View::Templates;
                render_templates(&self.session)
            }
            ShellCommand::TemplateSave => {
                format!("Template saved: {}\n", self.session.save_template().name)
            }
            ShellCommand::TemplateLoad(key) => {
                let audit = self.session.load_template(&key)?;
                self.after_load(&render_load_audit(&audit))
            }
        };
        Ok((Flow::Continue, text))
    }

    fn after_load(&mut self, audit_text: &str) -> String {
        self.view = View::BuildPanel;
        let mut out = audit_text.to_string();
        out.push_str(&render_panel_summary(
            &self.session,
            &self.panel_name,
            self.cell_count,
        ));
        out
    }

    fn new_record(&self, new: NewAntibody) -> AntibodyRecord {
        AntibodyRecord {
            id: new.id.unwrap_or_else(|| self.session.next_free_id()),
            antigen: new.antigen,
            clone: new.clone,
            metal: new.metal,
            concentration: new.concentration,
            volume_per_test: new.volume_per_test,
            stock_volume: new.stock_volume,
            alert_threshold: new.alert_threshold,
            stain_type: new.stain_type,
        }
    }

    pub fn render_view(&self) -> String {
        let body = match self.view {
            View::BuildPanel => {
                let mut out = render_selection_list(&self.session, &self.search);
                out.push('\n');
                out.push_str(&render_panel_summary(
                    &self.session,
                    &self.panel_name,
                    self.cell_count,
                ));
                out
            }
            View::Inventory => render_inventory(&self.session),
            View::SavedPanels => render_saved_panels(&self.session),
            View::History => render_history(&self.session),
            View::Templates => render_templates(&self.session),
        };
        format!("== {} ==\n{}", self.view.title(), body)
    }
}

pub fn format_error(err: &ShellError) -> String {
    match err {
        ShellError::Session(e) if e.is_warning() => {
            tracing::debug!(error = %e, "validation warning");
            format!("Warning: {}\n", e)
        }
        other => {
            tracing::debug!(error = %other, "command failed");
            format!("Error: {}\n", other)
        }
    }
}

pub fn import_inventory(path: &Path) -> Result<Vec<AntibodyRecord>, ShellError> {
    let file = File::open(path)?;
    Ok(read_inventory_csv(BufReader::new(file))?)
}

pub fn run_script<R: BufRead, W: Write>(
    shell: &mut Shell,
    reader: R,
    mut out: W,
) -> Result<(), ShellError> {
    out.write_all(shell.greeting().as_bytes())?;
    for line in reader.lines() {
        let line = line?;
        if line.trim_start().starts_with('#') {
            continue;
        }
        let (flow, text) = shell.handle_line(&line);
        out.write_all(text.as_bytes())?;
        if flow == Flow::Quit {
            break;
        }
    }
    out.flush()?;
    Ok(())
}

pub fn run_interactive(shell: &mut Shell) -> Result<(), ShellError> {
    let mut rl = DefaultEditor::new()?;
    print!("{}", shell.greeting());
    loop {
        match rl.readline(&shell.prompt()) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    rl.add_history_entry(line.as_str())?;
                }
                let (flow, text) = shell.handle_line(&line);
                print!("{}", text);
                if flow == Flow::Quit {
                    break;
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(err) => return Err(err.into()),
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/src_inline/shell/tests.rs"]
mod tests;
