//! Line-oriented terminal
//!
//! Parses each input line, applies it to a shared repository and writes
//! git-flavored output to the injected writer. Parse and repository errors are
//! rendered as output and do not stop the shell; only I/O errors propagate.

use crate::areas::refs::Head;
use crate::areas::repository::{Repository, RepositorySnapshot};
use crate::areas::shared::SharedRepository;
use crate::artifacts::merge::conflict::Conflict;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::CommitId;
use crate::artifacts::status::file_change::FileChangeType;
use crate::artifacts::status::status_info::StatusInfo;
use crate::commands::intent::{Intent, Outcome};
use crate::commands::parser::{Command, HELP, parse_command};
use crate::commands::porcelain::merge::MergeOutcome;
use crate::commands::porcelain::rebase::RebaseOutcome;
use crate::commands::porcelain::reset::ResetMode;
use colored::Colorize;
use std::collections::BTreeMap;
use std::io::{BufRead, Write};
use tracing::debug;

const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

pub struct Shell {
    repository: SharedRepository,
    writer: Box<dyn Write>,
}

impl Shell {
    pub fn new(repository: SharedRepository, writer: Box<dyn Write>) -> Self {
        Shell { repository, writer }
    }

    pub fn repository(&self) -> &SharedRepository {
        &self.repository
    }

    /// Run one line; `Ok(false)` when the command was rejected
    pub fn execute(&mut self, line: &str) -> anyhow::Result<bool> {
        let command = match parse_command(line) {
            Ok(command) => command,
            Err(error) => {
                writeln!(self.writer, "bitsim: {error}")?;
                return Ok(false);
            }
        };
        debug!(?command, "executing");

        match command {
            Command::Apply(intent) => match self.repository.apply(intent.clone()) {
                Ok((outcome, snapshot)) => self.render_outcome(&intent, &outcome, &snapshot)?,
                Err(error) => {
                    writeln!(self.writer, "{} {error}", "fatal:".red())?;
                    return Ok(false);
                }
            },
            Command::Branches => self.render_branches()?,
            Command::Log => self.render_log()?,
            Command::Status => {
                let status = self.repository.read(Repository::status);
                self.render_status(&status)?
            }
            Command::ShortStatus => {
                let status = self.repository.read(Repository::status);
                self.render_short_status(&status)?
            }
            Command::Snapshot => {
                let snapshot = self.repository.snapshot();
                writeln!(self.writer, "{}", serde_json::to_string_pretty(&snapshot)?)?
            }
            Command::Clear => write!(self.writer, "{CLEAR_SCREEN}")?,
            Command::Help => {
                for line in HELP {
                    writeln!(self.writer, "{line}")?;
                }
            }
            Command::Nothing => {}
        }

        Ok(true)
    }

    /// Run every line of a script, returning how many commands were rejected
    pub fn run_script(&mut self, script: &str) -> anyhow::Result<usize> {
        let mut failures = 0;

        for line in script.lines() {
            let command = line.trim();
            if !command.is_empty() && !command.starts_with('#') {
                writeln!(self.writer, "{} {command}", "$".dimmed())?;
            }
            if !self.execute(line)? {
                failures += 1;
            }
        }

        Ok(failures)
    }

    /// Prompt, read and execute until end of input or `exit`
    pub fn run_interactive(&mut self, input: impl BufRead) -> anyhow::Result<()> {
        self.prompt()?;

        for line in input.lines() {
            let line = line?;
            if matches!(line.trim(), "exit" | "quit") {
                break;
            }
            self.execute(&line)?;
            self.prompt()?;
        }

        Ok(())
    }

    fn prompt(&mut self) -> anyhow::Result<()> {
        let location = match self.repository.snapshot().head {
            Head::Attached(branch_name) => branch_name.to_string(),
            Head::Detached(oid) => oid.to_short_oid(),
        };
        write!(self.writer, "{} {} ", format!("({location})").cyan(), "$".bold())?;
        self.writer.flush()?;

        Ok(())
    }

    fn render_outcome(
        &mut self,
        intent: &Intent,
        outcome: &Outcome,
        snapshot: &RepositorySnapshot,
    ) -> anyhow::Result<()> {
        match outcome {
            Outcome::Initialized(oid) => writeln!(
                self.writer,
                "Initialized repository with root commit {}",
                oid.to_short_oid().yellow()
            )?,
            Outcome::Committed(oid) | Outcome::CherryPicked(MergeOutcome::Committed(oid)) => {
                self.render_commit_line(oid, snapshot)?
            }
            Outcome::CheckedOut(Head::Attached(branch_name)) => {
                writeln!(self.writer, "Switched to branch '{branch_name}'")?
            }
            Outcome::CheckedOut(Head::Detached(oid)) => {
                let target = match intent {
                    Intent::Checkout { target } => target.as_str(),
                    _ => oid.as_ref(),
                };
                writeln!(self.writer, "Note: switching to '{target}'.")?;
                writeln!(self.writer)?;
                writeln!(self.writer, "You are in 'detached HEAD' state.")?;
                self.render_head_is_now_at(oid, snapshot)?;
            }
            Outcome::BranchCreated(branch_name) => {
                writeln!(self.writer, "Switched to a new branch '{branch_name}'")?
            }
            Outcome::Merged(MergeOutcome::Committed(_)) => {
                writeln!(self.writer, "Merge made by the 'ort' strategy.")?
            }
            Outcome::Merged(MergeOutcome::Conflicted(conflict)) => {
                self.render_conflict(conflict)?;
                writeln!(
                    self.writer,
                    "Automatic merge failed; fix conflicts and then commit the result."
                )?;
            }
            Outcome::CherryPicked(MergeOutcome::Conflicted(conflict)) => {
                self.render_conflict(conflict)?;
                writeln!(
                    self.writer,
                    "error: could not apply commit; fix conflicts and then commit the result."
                )?;
            }
            Outcome::Rebased(rebase) => self.render_rebase(rebase, snapshot)?,
            Outcome::Reset(reset) => {
                if let Intent::Reset {
                    mode: ResetMode::Hard,
                    ..
                } = intent
                {
                    self.render_head_is_now_at(&reset.oid, snapshot)?;
                }
            }
            Outcome::Resolved(path) => writeln!(
                self.writer,
                "Resolved '{path}'. Run 'git commit' to conclude."
            )?,
            Outcome::Edited(_) | Outcome::Staged(_) => {}
        }

        Ok(())
    }

    fn render_commit_line(
        &mut self,
        oid: &CommitId,
        snapshot: &RepositorySnapshot,
    ) -> anyhow::Result<()> {
        let location = match &snapshot.head {
            Head::Attached(branch_name) => branch_name.to_string(),
            Head::Detached(_) => "detached HEAD".to_string(),
        };
        let message = find_commit(snapshot, oid)
            .map(Commit::short_message)
            .unwrap_or_default();

        writeln!(self.writer, "[{location} {}] {message}", oid.to_short_oid())?;

        Ok(())
    }

    fn render_head_is_now_at(
        &mut self,
        oid: &CommitId,
        snapshot: &RepositorySnapshot,
    ) -> anyhow::Result<()> {
        let message = find_commit(snapshot, oid)
            .map(Commit::short_message)
            .unwrap_or_default();

        writeln!(self.writer, "HEAD is now at {} {message}", oid.to_short_oid())?;

        Ok(())
    }

    fn render_conflict(&mut self, conflict: &Conflict) -> anyhow::Result<()> {
        let kind = match (&conflict.ours, &conflict.theirs) {
            (Some(_), Some(_)) => {
                writeln!(self.writer, "Auto-merging {}", conflict.path)?;
                match conflict.ancestor {
                    Some(_) => "content",
                    None => "add/add",
                }
            }
            _ => "modify/delete",
        };

        writeln!(
            self.writer,
            "{}",
            format!("CONFLICT ({kind}): Merge conflict in {}", conflict.path).red()
        )?;

        Ok(())
    }

    fn render_rebase(
        &mut self,
        rebase: &RebaseOutcome,
        snapshot: &RepositorySnapshot,
    ) -> anyhow::Result<()> {
        for replayed in &rebase.replayed {
            for path in &replayed.conflicts {
                writeln!(
                    self.writer,
                    "{} conflict in '{path}' while replaying {}; kept the upstream version",
                    "warning:".yellow(),
                    replayed.original.to_short_oid()
                )?;
            }
        }

        let branch = match &snapshot.head {
            Head::Attached(branch_name) => branch_name.to_string(),
            Head::Detached(_) => "HEAD".to_string(),
        };
        if rebase.fast_forward {
            writeln!(
                self.writer,
                "Fast-forwarded {branch} to {}.",
                rebase.head.to_short_oid()
            )?;
        } else {
            writeln!(
                self.writer,
                "Successfully rebased and updated refs/heads/{branch}."
            )?;
        }

        Ok(())
    }

    fn render_branches(&mut self) -> anyhow::Result<()> {
        let branches = self.repository.read(Repository::branches);

        for branch in branches {
            if branch.is_current {
                writeln!(self.writer, "* {}", branch.name.to_string().green())?;
            } else {
                writeln!(self.writer, "  {}", branch.name)?;
            }
        }

        Ok(())
    }

    fn render_log(&mut self) -> anyhow::Result<()> {
        let snapshot = self.repository.snapshot();
        let log = self.repository.read(|repository| {
            repository
                .get_log()
                .into_iter()
                .cloned()
                .collect::<Vec<_>>()
        });

        let mut decorations = BTreeMap::<&CommitId, Vec<String>>::new();
        for (branch_name, oid) in &snapshot.branches {
            let name = match &snapshot.head {
                Head::Attached(current) if current == branch_name => format!(
                    "{} {}",
                    "HEAD ->".cyan().bold(),
                    branch_name.to_string().green().bold()
                ),
                _ => branch_name.to_string().green().bold().to_string(),
            };
            decorations.entry(oid).or_default().push(name);
        }
        if let Head::Detached(oid) = &snapshot.head {
            decorations
                .entry(oid)
                .or_default()
                .insert(0, "HEAD".cyan().bold().to_string());
        }

        for (position, commit) in log.iter().enumerate() {
            if position > 0 {
                writeln!(self.writer)?;
            }
            self.show_commit_medium(commit, decorations.get(commit.id()))?;
        }

        Ok(())
    }

    fn show_commit_medium(
        &mut self,
        commit: &Commit,
        decoration: Option<&Vec<String>>,
    ) -> anyhow::Result<()> {
        let decoration = decoration
            .map(|names| format!(" ({})", names.join(", ")))
            .unwrap_or_default();

        writeln!(
            self.writer,
            "{}{decoration}",
            format!("commit {}", commit.id()).yellow()
        )?;
        if commit.is_merge() {
            let parents = commit
                .parents()
                .iter()
                .map(CommitId::to_short_oid)
                .collect::<Vec<_>>()
                .join(" ");
            writeln!(self.writer, "Merge: {parents}")?;
        }
        writeln!(self.writer, "Branch: {}", commit.branch_label())?;
        writeln!(self.writer, "Date:   {}", commit.readable_timestamp())?;
        writeln!(self.writer)?;
        for message_line in commit.message().lines() {
            writeln!(self.writer, "    {}", message_line)?;
        }

        Ok(())
    }

    fn render_status(&mut self, status: &StatusInfo) -> anyhow::Result<()> {
        match status.head() {
            Head::Attached(branch_name) => writeln!(self.writer, "On branch {branch_name}")?,
            Head::Detached(oid) => writeln!(
                self.writer,
                "{}",
                format!("HEAD detached at {}", oid.to_short_oid()).red()
            )?,
        }

        if let Some(conflict) = status.conflict() {
            writeln!(self.writer, "You have unmerged paths.")?;
            writeln!(self.writer, "  (use \"resolve <content>\" to settle the conflict)")?;
            writeln!(self.writer)?;
            writeln!(self.writer, "Unmerged paths:")?;
            writeln!(
                self.writer,
                "{:>8}{}",
                "",
                format!("both modified:   {}", conflict.path).red()
            )?;
            writeln!(self.writer)?;
        } else if let Some(pending_merge) = status.pending_merge() {
            writeln!(
                self.writer,
                "All conflicts fixed but you are still merging '{}'.",
                pending_merge.other_branch_name
            )?;
            writeln!(self.writer, "  (use \"git commit\" to conclude merge)")?;
            writeln!(self.writer)?;
        }

        if !status.index_changeset().is_empty() {
            writeln!(self.writer, "Changes to be committed:")?;
            self.print_changeset(status.index_changeset())?;
        }
        if !status.workspace_changeset().is_empty() {
            writeln!(self.writer, "Changes not staged for commit:")?;
            writeln!(
                self.writer,
                "  (use \"git add <file>...\" to update what will be committed)"
            )?;
            self.print_changeset(status.workspace_changeset())?;
        }
        if !status.untracked_files().is_empty() {
            writeln!(self.writer, "Untracked files:")?;
            for path in status.untracked_files() {
                writeln!(self.writer, "{:>8}{}", "", path.red())?;
            }
            writeln!(self.writer)?;
        }
        if status.is_clean() {
            writeln!(self.writer, "nothing to commit, working tree clean")?;
        }

        Ok(())
    }

    fn render_short_status(&mut self, status: &StatusInfo) -> anyhow::Result<()> {
        for (path, change) in status.changed_files() {
            writeln!(self.writer, "{change} {path}")?;
        }

        Ok(())
    }

    fn print_changeset(&mut self, changeset: &BTreeMap<String, FileChangeType>) -> anyhow::Result<()> {
        for (path, change) in changeset {
            let line = format!("{change}{path}");
            writeln!(self.writer, "{line}")?;
        }
        writeln!(self.writer)?;

        Ok(())
    }
}

fn find_commit<'s>(snapshot: &'s RepositorySnapshot, oid: &CommitId) -> Option<&'s Commit> {
    snapshot.commits.iter().find(|commit| commit.id() == oid)
}
