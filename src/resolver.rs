use std::env;

use chrono::Utc;

use crate::config::State;
use crate::git::Vcs;
use crate::version::{self, VersionSet};

/// Build metadata recorded into state on every run.
pub struct RunMeta {
    pub time: i64,
    pub user: String,
    pub hostname: String,
}

impl RunMeta {
    /// Captures wall-clock time, the invoking user, and the machine hostname.
    pub fn capture() -> RunMeta {
        RunMeta {
            time: Utc::now().timestamp(),
            user: env::var("USER").unwrap_or_default(),
            hostname: hostname::get()
                .map(|h| h.to_string_lossy().into_owned())
                .unwrap_or_default(),
        }
    }
}

/// Everything a run derives: the version strings plus the commit hash.
pub struct Resolution {
    pub versions: VersionSet,
    pub hash: String,
}

/// Advances the build counter, classifies the tree, and derives the version
/// set. `state` is updated in place; the caller persists it after all
/// artifacts are written.
pub fn resolve(state: &mut State, name: &str, meta: RunMeta, vcs: &dyn Vcs) -> Resolution {
    let hash = vcs.head_hash();
    let describe = vcs.describe();

    state.name = name.to_string();
    state.localcnt += 1;
    state.time = meta.time;
    state.user = meta.user;
    state.hostname = meta.hostname;

    let mut dirty = false;
    if describe.ok {
        if version::is_dirty(&describe.text) {
            dirty = true;
            // A dirty tree that differs from last run's starts a fresh counter.
            if state.gitrev != describe.text {
                state.localcnt = 1;
            }
        }
        state.gitrev = describe.text;
    } else {
        state.gitrev = version::NO_GIT_REPOS.to_string();
    }

    let versions = version::derive(&state.gitrev, dirty, &state.user, state.localcnt);
    Resolution { versions, hash }
}
