//! Command line parsing and execution.

use clap::{Parser, Subcommand, ValueEnum};
use meridian_application::AddOptions;
use meridian_application::ports::WorkspaceStore;
use meridian_domain::{HttpMethod, RequestData};
use meridian_ui::{UiCommand, WorkspaceView};

/// Headless request workspace.
#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

impl Cli {
    /// The command to run. Lists the tabs when none was given.
    #[must_use]
    pub fn into_command(self) -> Command {
        self.command.unwrap_or(Command::List)
    }
}

/// Workspace metadata field settable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MetaField {
    /// `meta.version`
    Version,
    /// `meta.published`
    Published,
    /// `meta.description`
    Description,
    /// `provider.name`
    Author,
    /// `provider.url`
    Address,
    /// `provider.email`
    Contact,
}

/// A parsed command.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Show open tabs
    #[command(visible_alias = "ls")]
    List,
    /// Open a request in a new tab
    Open {
        /// HTTP method, case insensitive
        method: HttpMethod,
        /// Request URL, may contain {{variables}}
        url: String,
        /// Tab name
        name: Option<String>,
    },
    /// Close a tab
    Close {
        /// Tab position
        index: usize,
    },
    /// Select a tab
    Select {
        /// Tab position
        index: usize,
    },
    /// Move a tab
    Move {
        /// Current position
        from: usize,
        /// New position
        to: usize,
    },
    /// Duplicate a tab
    Duplicate {
        /// Tab position
        index: usize,
    },
    /// Show workspace details
    Details,
    /// Set one workspace metadata field
    Meta {
        /// Field to set
        field: MetaField,
        /// New value, empty clears the field
        value: String,
    },
}

/// Result of running a command.
#[derive(Debug, Default)]
pub struct Outcome {
    /// Lines to print.
    pub lines: Vec<String>,
    /// Whether the workspace was modified.
    pub changed: bool,
}

/// Applies `command` to the workspace.
pub fn run<S>(view: &mut WorkspaceView<S>, command: Command) -> Outcome
where
    S: WorkspaceStore + 'static,
{
    let ui_command = match command {
        Command::List => return list(view),
        Command::Details => return details(view),
        Command::Open { method, url, name } => {
            let mut request = RequestData::new(method, url);
            request.name = name;
            view.controller_mut().add(request, AddOptions::default());
            view.refresh();
            return changed(list(view));
        }
        Command::Close { index } => UiCommand::CloseTab { index },
        Command::Select { index } => UiCommand::SelectTab { index },
        Command::Move { from, to } => {
            if !view.controller_mut().move_tab(from, to) {
                return list(view);
            }
            view.refresh();
            return changed(list(view));
        }
        Command::Duplicate { index } => UiCommand::DuplicateTab { index },
        Command::Meta { field, value } => {
            let mut form = view.editor_form();
            let slot = match field {
                MetaField::Version => &mut form.version,
                MetaField::Published => &mut form.published,
                MetaField::Description => &mut form.description,
                MetaField::Author => &mut form.provider_name,
                MetaField::Address => &mut form.provider_url,
                MetaField::Contact => &mut form.provider_email,
            };
            *slot = value;
            view.handle(UiCommand::SaveDetails(form));
            return changed(details(view));
        }
    };

    if view.handle(ui_command).is_some() {
        changed(list(view))
    } else {
        list(view)
    }
}

const fn changed(mut outcome: Outcome) -> Outcome {
    outcome.changed = true;
    outcome
}

fn list<S>(view: &WorkspaceView<S>) -> Outcome
where
    S: WorkspaceStore + 'static,
{
    let lines = view
        .tab_data()
        .iter()
        .enumerate()
        .map(|(index, tab)| {
            let marker = if tab.selected { '*' } else { ' ' };
            format!("{marker} {index:>2}  {:<7} {}", tab.method, tab.label)
        })
        .collect();
    Outcome {
        lines,
        changed: false,
    }
}

fn details<S>(view: &WorkspaceView<S>) -> Outcome
where
    S: WorkspaceStore + 'static,
{
    let details = view.details();
    let mut lines = Vec::new();
    if let Some(description) = &details.description {
        lines.push(description.clone());
        lines.push(String::new());
    }
    for row in &details.rows {
        lines.push(format!("{}: {}", row.label, row.display()));
    }
    lines.push("Provider".to_string());
    for row in &details.provider {
        lines.push(format!("  {}: {}", row.label, row.display()));
    }
    Outcome {
        lines,
        changed: false,
    }
}
