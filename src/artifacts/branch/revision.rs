use crate::areas::database::Database;
use crate::areas::refs::Refs;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::branch::{ANCESTOR_REGEX, HEAD_REF_NAME, PARENT_REGEX, REF_ALIASES};
use crate::artifacts::objects::object_id::CommitId;
use crate::error::RepositoryError;
use derive_new::new;
use std::sync::LazyLock;

static PARENT: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(PARENT_REGEX).expect("parent regex is valid"));
static ANCESTOR: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(ANCESTOR_REGEX).expect("ancestor regex is valid"));

/// One way of looking a plain name up
///
/// Operations differ in which lookups they allow and in which order, e.g.
/// checkout prefers branches while reset prefers exact commit IDs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefLookup {
    /// A branch with exactly this name
    Branch,
    /// A full 40-character commit ID
    ExactId,
    /// The oldest commit whose ID starts with the text
    IdPrefix,
}

/// A revision specification identifying a commit.
///
/// Supports:
/// - Plain names: branch names, full IDs or ID prefixes (see [`RefLookup`])
/// - Aliases: `HEAD` and `@`
/// - Parent notation: `<revision>^` (e.g., `main^`, `HEAD^`)
/// - Ancestor notation: `<revision>~<n>` (e.g., `main~3`, `abc123~2`),
///   following first parents only
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Revision {
    Ref(String),
    Head,
    Parent(Box<Revision>),
    Ancestor(Box<Revision>, usize),
}

/// Outcome of resolving a revision
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRevision {
    pub oid: CommitId,
    /// Set when the text named a branch (or HEAD while attached)
    pub branch: Option<BranchName>,
}

impl Revision {
    pub fn parse(text: &str) -> Self {
        let text = text.trim();
        let text = REF_ALIASES.get(text).copied().unwrap_or(text);

        if text == HEAD_REF_NAME {
            return Revision::Head;
        }

        if let Some(captures) = PARENT.captures(text) {
            return Revision::Parent(Box::new(Self::parse(&captures[1])));
        }

        if let Some(captures) = ANCESTOR.captures(text)
            && let Ok(generations) = captures[2].parse::<usize>()
        {
            return Revision::Ancestor(Box::new(Self::parse(&captures[1])), generations);
        }

        Revision::Ref(text.to_string())
    }
}

/// Resolves revisions against the object store and refs
#[derive(Debug, Clone, Copy, new)]
pub struct RevisionContext<'r> {
    database: &'r Database,
    refs: &'r Refs,
}

impl RevisionContext<'_> {
    /// Resolve `text` trying the plain-name lookups in `order`
    ///
    /// # Errors
    ///
    /// `TargetNotFound` carrying the original text when nothing matches or
    /// when a `^`/`~` walk runs past the root.
    pub fn resolve(
        &self,
        text: &str,
        order: &[RefLookup],
    ) -> Result<ResolvedRevision, RepositoryError> {
        self.resolve_revision(&Revision::parse(text), order)
            .ok_or_else(|| RepositoryError::TargetNotFound(text.to_string()))
    }

    fn resolve_revision(&self, revision: &Revision, order: &[RefLookup]) -> Option<ResolvedRevision> {
        match revision {
            Revision::Head => self.refs.read_head().map(|oid| ResolvedRevision {
                oid,
                branch: self.refs.current_branch().cloned(),
            }),
            Revision::Ref(name) => order
                .iter()
                .find_map(|lookup| self.lookup(name, *lookup)),
            Revision::Parent(base) => {
                let base = self.resolve_revision(base, order)?;
                self.first_parent(&base.oid)
            }
            Revision::Ancestor(base, generations) => {
                let mut resolved = self.resolve_revision(base, order)?;
                for _ in 0..*generations {
                    resolved = self.first_parent(&resolved.oid)?;
                }
                Some(resolved)
            }
        }
    }

    fn lookup(&self, name: &str, lookup: RefLookup) -> Option<ResolvedRevision> {
        match lookup {
            RefLookup::Branch => {
                self.refs
                    .find_branch(name)
                    .map(|(branch_name, oid)| ResolvedRevision {
                        oid: oid.clone(),
                        branch: Some(branch_name.clone()),
                    })
            }
            RefLookup::ExactId => self.database.find_exact(name).map(|commit| ResolvedRevision {
                oid: commit.id().clone(),
                branch: None,
            }),
            RefLookup::IdPrefix => {
                if !name.chars().all(|c| c.is_ascii_hexdigit()) {
                    return None;
                }
                self.database
                    .find_by_prefix(name)
                    .map(|commit| ResolvedRevision {
                        oid: commit.id().clone(),
                        branch: None,
                    })
            }
        }
    }

    fn first_parent(&self, oid: &CommitId) -> Option<ResolvedRevision> {
        let parent = self.database.load(oid)?.parent()?.clone();

        Some(ResolvedRevision {
            oid: parent,
            branch: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::objects::Snapshot;
    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};

    struct Fixture {
        database: Database,
        refs: Refs,
        root: CommitId,
        second: CommitId,
        third: CommitId,
    }

    #[fixture]
    fn history() -> Fixture {
        let mut database = Database::new();
        let mut refs = Refs::new(BranchName::try_parse("main").unwrap());

        let root = database.create_commit(vec![], "root", Snapshot::new(), "main");
        let second = database.create_commit(vec![root.clone()], "second", Snapshot::new(), "main");
        let third = database.create_commit(vec![second.clone()], "third", Snapshot::new(), "main");
        refs.update_head(third.clone());
        refs.create_branch(BranchName::try_parse("old").unwrap(), root.clone())
            .unwrap();

        Fixture {
            database,
            refs,
            root,
            second,
            third,
        }
    }

    #[rstest]
    #[case("HEAD~2")]
    #[case("@~2")]
    #[case("main^^")]
    #[case("old")]
    fn resolves_to_root(history: Fixture, #[case] text: &str) {
        let context = RevisionContext::new(&history.database, &history.refs);
        let resolved = context.resolve(text, &[RefLookup::Branch]).unwrap();

        assert_eq!(resolved.oid, history.root);
    }

    #[rstest]
    fn head_alias_keeps_the_branch(history: Fixture) {
        let context = RevisionContext::new(&history.database, &history.refs);
        let resolved = context.resolve("@", &[]).unwrap();

        assert_eq!(resolved.oid, history.third);
        assert_eq!(resolved.branch.unwrap().as_ref(), "main");
    }

    #[rstest]
    fn lookup_order_is_respected(history: Fixture) {
        let context = RevisionContext::new(&history.database, &history.refs);
        let prefix = history.second.to_short_oid();

        assert!(context.resolve(&prefix, &[RefLookup::ExactId]).is_err());
        let resolved = context
            .resolve(&prefix, &[RefLookup::ExactId, RefLookup::IdPrefix])
            .unwrap();
        assert_eq!(resolved.oid, history.second);
        assert_eq!(resolved.branch, None);
    }

    #[rstest]
    fn walking_past_root_fails(history: Fixture) {
        let context = RevisionContext::new(&history.database, &history.refs);

        assert_eq!(
            context.resolve("old^", &[RefLookup::Branch]),
            Err(RepositoryError::TargetNotFound("old^".to_string()))
        );
    }
}
