//! Declarative reload rules.
//!
//! Each state change that can make a collection out of date is a
//! [`Trigger`]. [`RULES`] maps triggers to the collections they invalidate,
//! and [`plan`] folds a batch of triggers into one [`ReloadPlan`] that the
//! [`Library`](crate::Library) executes while a session is active.

use serde::{Deserialize, Serialize};

/// A server collection that can be reloaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    Files,
    Tags,
    Playlists,
}

impl Collection {
    pub(crate) const fn index(self) -> usize {
        match self {
            Collection::Files => 0,
            Collection::Tags => 1,
            Collection::Playlists => 2,
        }
    }
}

/// A change that may require reloading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trigger {
    /// A session became authenticated (startup probe or login).
    SessionStarted,
    SearchChanged,
    FavoritesOnlyChanged,
    MimeTypeChanged,
    OrderChanged,
    /// Tag filtering is local; listed so the table is exhaustive.
    TagChanged,
    /// Explicit user refresh.
    Refresh,
}

/// One row of the rule table.
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub when: Trigger,
    pub reload: &'static [Collection],
}

pub const RULES: &[Rule] = &[
    Rule {
        when: Trigger::SessionStarted,
        reload: &[Collection::Files, Collection::Tags, Collection::Playlists],
    },
    Rule {
        when: Trigger::SearchChanged,
        reload: &[Collection::Files],
    },
    Rule {
        when: Trigger::FavoritesOnlyChanged,
        reload: &[Collection::Files],
    },
    Rule {
        when: Trigger::MimeTypeChanged,
        reload: &[Collection::Files],
    },
    Rule {
        when: Trigger::OrderChanged,
        reload: &[Collection::Files],
    },
    Rule {
        when: Trigger::TagChanged,
        reload: &[],
    },
    Rule {
        when: Trigger::Refresh,
        reload: &[Collection::Files, Collection::Playlists],
    },
];

/// The set of collections to reload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReloadPlan {
    pub files: bool,
    pub tags: bool,
    pub playlists: bool,
}

impl ReloadPlan {
    pub fn contains(&self, collection: Collection) -> bool {
        match collection {
            Collection::Files => self.files,
            Collection::Tags => self.tags,
            Collection::Playlists => self.playlists,
        }
    }

    pub fn is_empty(&self) -> bool {
        !(self.files || self.tags || self.playlists)
    }

    fn insert(&mut self, collection: Collection) {
        match collection {
            Collection::Files => self.files = true,
            Collection::Tags => self.tags = true,
            Collection::Playlists => self.playlists = true,
        }
    }
}

/// Folds triggers into a plan. Each collection appears at most once.
pub fn plan(triggers: &[Trigger]) -> ReloadPlan {
    let mut plan = ReloadPlan::default();
    for rule in RULES.iter().filter(|rule| triggers.contains(&rule.when)) {
        for collection in rule.reload {
            plan.insert(*collection);
        }
    }
    plan
}
