//! # Session Module
//!
//! Walks the candidate filenames of a resolved folder set, one group at a
//! time, and advances after each applied decision.
//!
//! The session is a small state machine: `Active(index)` while filenames
//! remain, `Terminal` once the index runs past the end. Terminal is
//! absorbing - further calls keep returning [`Step::Terminal`] and no more
//! groups are produced. Advancement is strictly sequential and
//! single-threaded; the caller re-enters with a decision, the session never
//! blocks waiting for one.
//!
//! Presentation affinity (window positions and the like) is deliberately not
//! modeled here; it belongs to the presentation layer.

use crate::core::apply::{ApplyConfig, ApplyResult, Decision, DecisionApplier, MergeMode, TrashBin};
use crate::core::candidate::CandidateGroup;
use crate::core::classify::{self, Classification, RankingPolicy};
use crate::core::folders::{FolderSet, Topology};
use crate::core::scanner::{self, ImageFilter};
use crate::error::Result;
use std::path::PathBuf;

/// What the session yields for the current position
#[derive(Debug)]
pub enum Step {
    /// The candidate group at the current position
    Group(CandidateGroup),
    /// No filenames left; the session is finished
    Terminal,
}

/// Builder for a comparison session
pub struct SessionBuilder {
    topology: Topology,
    filter: ImageFilter,
    policy: RankingPolicy,
    merge_folder: Option<PathBuf>,
    merge_mode: MergeMode,
    trash: Option<Box<dyn TrashBin>>,
}

impl SessionBuilder {
    fn new(topology: Topology) -> Self {
        Self {
            topology,
            filter: ImageFilter::default(),
            policy: RankingPolicy::default(),
            merge_folder: None,
            merge_mode: MergeMode::default(),
            trash: None,
        }
    }

    /// Set the filename filter
    pub fn filter(mut self, filter: ImageFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Set the classification policy
    pub fn policy(mut self, policy: RankingPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Override the consolidation folder
    pub fn merge_folder(mut self, folder: PathBuf) -> Self {
        self.merge_folder = Some(folder);
        self
    }

    /// Set the treatment of duplicates after a merge
    pub fn merge_mode(mut self, mode: MergeMode) -> Self {
        self.merge_mode = mode;
        self
    }

    /// Substitute the trash backend
    pub fn trash_bin(mut self, trash: Box<dyn TrashBin>) -> Self {
        self.trash = Some(trash);
        self
    }

    /// Resolve the folder set, list the base folder, and start the session
    pub fn build(self) -> Result<Session> {
        let folder_set = FolderSet::resolve(&self.topology)?;
        let filenames = scanner::list_candidates(folder_set.base(), &self.filter)?;

        let mut config = ApplyConfig::for_base(folder_set.base());
        if let Some(folder) = self.merge_folder {
            config.merge_folder = folder;
        }
        config.merge_mode = self.merge_mode;

        let applier = match self.trash {
            Some(trash) => DecisionApplier::with_trash(config, trash),
            None => DecisionApplier::new(config),
        };

        tracing::debug!(
            folders = folder_set.len(),
            candidates = filenames.len(),
            "session started"
        );

        Ok(Session {
            folder_set,
            policy: self.policy,
            applier,
            filenames,
            index: 0,
        })
    }
}

/// One sequential pass over the candidate filenames
pub struct Session {
    folder_set: FolderSet,
    policy: RankingPolicy,
    applier: DecisionApplier,
    filenames: Vec<String>,
    index: usize,
}

impl Session {
    /// Start building a session for a topology
    pub fn builder(topology: Topology) -> SessionBuilder {
        SessionBuilder::new(topology)
    }

    pub fn folder_set(&self) -> &FolderSet {
        &self.folder_set
    }

    pub fn policy(&self) -> &RankingPolicy {
        &self.policy
    }

    /// The ordered candidate filenames, fixed at session start
    pub fn filenames(&self) -> &[String] {
        &self.filenames
    }

    pub fn current_index(&self) -> usize {
        self.index
    }

    pub fn is_terminal(&self) -> bool {
        self.index >= self.filenames.len()
    }

    /// The candidate group at the current position, or Terminal
    ///
    /// Filenames with no readable copy in any folder are skipped: a group
    /// with zero present slots is never surfaced. The filesystem is probed
    /// fresh on every call, so re-invoking without applying re-reads state.
    pub fn next_group(&mut self) -> Step {
        loop {
            if self.is_terminal() {
                return Step::Terminal;
            }

            let group = CandidateGroup::build(&self.filenames[self.index], &self.folder_set);
            if group.present_count() > 0 {
                return Step::Group(group);
            }

            tracing::debug!(filename = %group.filename, "no copies found anywhere, skipping");
            self.index += 1;
        }
    }

    /// Classify a group under the session's policy
    pub fn classify(&self, group: &CandidateGroup) -> Classification {
        classify::classify(group, &self.policy)
    }

    /// Apply a decision and advance on success
    ///
    /// A refused merge does not advance: the group still needs a decision.
    pub fn apply(&mut self, group: &CandidateGroup, decision: &Decision) -> Result<ApplyResult> {
        let result = self.applier.apply(group, decision)?;
        if result.advances() {
            self.index += 1;
        }
        Ok(result)
    }
}
