//! Terminal command grammar
//!
//! Turns one line of user input into a [`Command`]. Git commands start with
//! `git `; `edit`, `resolve`, `snapshot`, `clear` and `help` are shell verbs.
//! In `edit` and `resolve` content, `\n` stands for a newline.

use crate::commands::intent::Intent;
use crate::commands::porcelain::reset::ResetMode;
use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

pub const COMMIT_REGEX: &str = r#"^commit\s+-m\s+(?:"(.*)"|'(.*)')$"#;
pub const CHECKOUT_NEW_REGEX: &str = r"^checkout\s+-b\s+(\S+)$";
pub const CHECKOUT_REGEX: &str = r"^checkout\s+(\S+)$";
pub const RESET_REGEX: &str = r"^reset\s+(--hard|--soft)\s+(\S+)$";
pub const SINGLE_ARGUMENT_REGEX: &str = r"^(add|branch|merge|rebase|cherry-pick)\s+(\S+)$";
pub const EDIT_REGEX: &str = r"^edit\s+(\S+)(?:\s(.*))?$";

static COMMIT: LazyLock<Regex> = LazyLock::new(|| compile(COMMIT_REGEX));
static CHECKOUT_NEW: LazyLock<Regex> = LazyLock::new(|| compile(CHECKOUT_NEW_REGEX));
static CHECKOUT: LazyLock<Regex> = LazyLock::new(|| compile(CHECKOUT_REGEX));
static RESET: LazyLock<Regex> = LazyLock::new(|| compile(RESET_REGEX));
static SINGLE_ARGUMENT: LazyLock<Regex> = LazyLock::new(|| compile(SINGLE_ARGUMENT_REGEX));
static EDIT: LazyLock<Regex> = LazyLock::new(|| compile(EDIT_REGEX));

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("command regex is valid")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// A state-changing repository operation
    Apply(Intent),
    Branches,
    Log,
    Status,
    /// `git status -s`: one porcelain code per changed path
    ShortStatus,
    Snapshot,
    Clear,
    Help,
    /// Blank line or comment
    Nothing,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("command not found: {0}")]
    CommandNotFound(String),

    #[error("git: '{0}' is not a git command. See 'git --help'.")]
    NotAGitCommand(String),

    #[error("Merge what? Please specify a branch.")]
    MergeWhat,

    #[error("usage: {0}")]
    Usage(&'static str),
}

pub fn parse_command(input: &str) -> Result<Command, ParseError> {
    let trimmed = input.trim();

    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(Command::Nothing);
    }

    match trimmed {
        "clear" => return Ok(Command::Clear),
        "help" => return Ok(Command::Help),
        "snapshot" => return Ok(Command::Snapshot),
        "git" => return Err(ParseError::Usage("git <command> [<args>]")),
        _ => {}
    }

    if let Some(args) = trimmed.strip_prefix("git ") {
        return parse_git(args.trim());
    }

    if let Some(captures) = EDIT.captures(trimmed) {
        return Ok(Command::Apply(Intent::EditFile {
            path: captures[1].to_string(),
            content: unescape(captures.get(2).map_or("", |content| content.as_str())),
        }));
    }
    if trimmed == "edit" {
        return Err(ParseError::Usage("edit <path> <content>"));
    }

    if let Some(content) = trimmed.strip_prefix("resolve ") {
        return Ok(Command::Apply(Intent::ResolveConflict {
            content: unescape(content.trim_start()),
        }));
    }
    if trimmed == "resolve" {
        return Err(ParseError::Usage("resolve <content>"));
    }

    Err(ParseError::CommandNotFound(trimmed.to_string()))
}

fn parse_git(args: &str) -> Result<Command, ParseError> {
    match args {
        "init" => return Ok(Command::Apply(Intent::Init)),
        "commit" => {
            return Ok(Command::Apply(Intent::Commit {
                message: String::new(),
            }));
        }
        "branch" => return Ok(Command::Branches),
        "log" => return Ok(Command::Log),
        "status" => return Ok(Command::Status),
        "status -s" | "status --short" => return Ok(Command::ShortStatus),
        _ => {}
    }

    if let Some(captures) = COMMIT.captures(args) {
        let message = captures
            .get(1)
            .or_else(|| captures.get(2))
            .map_or("", |message| message.as_str());
        return Ok(Command::Apply(Intent::Commit {
            message: message.to_string(),
        }));
    }

    if let Some(captures) = CHECKOUT_NEW.captures(args) {
        return Ok(Command::Apply(Intent::CreateBranch {
            name: captures[1].to_string(),
        }));
    }

    if let Some(captures) = CHECKOUT.captures(args)
        && !captures[1].starts_with('-')
    {
        return Ok(Command::Apply(Intent::Checkout {
            target: captures[1].to_string(),
        }));
    }

    if let Some(captures) = RESET.captures(args) {
        let mode = captures[1]
            .parse::<ResetMode>()
            .map_err(|_| ParseError::Usage(RESET_USAGE))?;
        return Ok(Command::Apply(Intent::Reset {
            mode,
            target: captures[2].to_string(),
        }));
    }

    if let Some(captures) = SINGLE_ARGUMENT.captures(args) {
        let argument = captures[2].to_string();
        let intent = match &captures[1] {
            "add" => Intent::StageFile { pathspec: argument },
            "branch" => Intent::CreateBranch { name: argument },
            "merge" => Intent::Merge { branch: argument },
            "rebase" => Intent::Rebase { branch: argument },
            _ => Intent::CherryPick { revision: argument },
        };
        return Ok(Command::Apply(intent));
    }

    let subcommand = args.split_whitespace().next().unwrap_or_default();
    match subcommand {
        "merge" => Err(ParseError::MergeWhat),
        "commit" => Err(ParseError::Usage("git commit -m \"<message>\"")),
        "add" => Err(ParseError::Usage("git add <path>|.")),
        "checkout" => Err(ParseError::Usage("git checkout [-b] <target>")),
        "branch" => Err(ParseError::Usage("git branch [<name>]")),
        "rebase" => Err(ParseError::Usage("git rebase <branch>")),
        "cherry-pick" => Err(ParseError::Usage("git cherry-pick <commit>")),
        "reset" => Err(ParseError::Usage(RESET_USAGE)),
        "status" => Err(ParseError::Usage("git status [-s|--short]")),
        other => Err(ParseError::NotAGitCommand(other.to_string())),
    }
}

const RESET_USAGE: &str = "git reset --hard|--soft <target>";

fn unescape(content: &str) -> String {
    content.replace("\\n", "\n")
}

/// Lines printed by `help`
pub const HELP: &[&str] = &[
    "git init                          start over with a single root commit",
    "git status [-s|--short]           show staged and unstaged changes",
    "git add <path>|.                  stage a path or everything",
    "git commit -m \"<message>\"         record staged changes",
    "git branch [<name>]               list branches, or create one and switch to it",
    "git checkout [-b] <target>        switch branch, detach at a commit, or create a branch",
    "git merge <branch>                merge a branch into the current one",
    "git rebase <branch>               replay the current branch onto another",
    "git cherry-pick <commit>          copy one commit's change onto HEAD",
    "git reset --hard|--soft <target>  move the current branch",
    "git log                           first-parent history",
    "edit <path> <content>             write a file (\\n for newlines)",
    "resolve <content>                 settle the open conflict",
    "snapshot                          print the repository state as JSON",
    "clear                             clear the screen",
];
