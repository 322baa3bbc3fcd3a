//! Keys for synthetic containers (legend, passed-variable groups, values)
//!
//! These keys are never referenced outside the statements that create
//! them, so any unique scheme works. Sequential keys keep output stable
//! between runs; UUIDs match what older diagrams looked like.
//!
//! D2 treats `'gen-1'` and `gen-1` as the same key, so a key must never
//! equal a name the document uses. Such names are reserved up front and
//! skipped.

use std::collections::BTreeSet;

use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum IdScheme {
    /// `gen-1`, `gen-2`, ... restarting every run
    #[default]
    Sequential,
    /// Random v4 UUIDs
    Uuid,
}

#[derive(Debug)]
pub struct IdGenerator {
    scheme: IdScheme,
    counter: u64,
    issued: u64,
    /// Names taken by the document
    reserved: BTreeSet<String>,
}

impl IdGenerator {
    pub fn new(scheme: IdScheme) -> Self {
        Self {
            scheme,
            counter: 0,
            issued: 0,
            reserved: BTreeSet::new(),
        }
    }

    /// Never hand out any of `names`
    pub fn reserve<I>(&mut self, names: I)
    where
        I: IntoIterator<Item = String>,
    {
        self.reserved.extend(names);
    }

    pub fn next_id(&mut self) -> String {
        loop {
            self.counter += 1;
            let candidate = match self.scheme {
                IdScheme::Sequential => format!("gen-{}", self.counter),
                IdScheme::Uuid => Uuid::new_v4().to_string(),
            };
            if !self.reserved.contains(&candidate) {
                self.issued += 1;
                return candidate;
            }
        }
    }

    /// How many keys were handed out so far
    pub fn issued(&self) -> u64 {
        self.issued
    }
}
