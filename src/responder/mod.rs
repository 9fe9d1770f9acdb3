//! Decision core: turns message text into a concrete response, if any.

pub mod rate_limit;
pub mod rules;
pub mod weighted;

#[cfg(test)]
mod tests;

use std::path::PathBuf;

use rand::Rng;

pub use rate_limit::RateLimiter;
pub use rules::{Action, Rule, RuleSet, Trigger, WeightedText};

/// A fully resolved response, ready for the Discord side to execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Reply to the message with this text.
    Reply(String),
    /// React to the message with this emoji (unicode or custom id).
    React(String),
    /// Join the sender's voice channel, play `file`, then reply.
    Play { file: PathBuf, reply: String },
}

/// Matches messages against the rule table and resolves actions.
///
/// Pure apart from the random draw, which is injectable so tests can
/// pin the outcome with a seeded generator.
pub struct Responder {
    rules: RuleSet,
    help_text: String,
    sound_dir: PathBuf,
}

impl Responder {
    pub fn new(rules: Vec<Rule>, help_text: String, sound_dir: PathBuf) -> Self {
        Self {
            rules: RuleSet::new(rules),
            help_text,
            sound_dir,
        }
    }

    pub fn decide(&self, text: &str) -> Option<Outcome> {
        self.decide_with(text, &mut rand::rng())
    }

    /// First matching rule wins; later rules are never consulted.
    pub fn decide_with<R: Rng + ?Sized>(&self, text: &str, rng: &mut R) -> Option<Outcome> {
        let rule = self.rules.find(text)?;
        match &rule.action {
            Action::Help => Some(Outcome::Reply(format!("```{}```", self.help_text))),
            Action::Reply { text } => Some(Outcome::Reply(text.clone())),
            Action::React { emoji } => Some(Outcome::React(emoji.clone())),
            Action::WeightedReply { choices } => {
                let choice = weighted::pick(rng, choices)?;
                Some(Outcome::Reply(choice.text.clone()))
            }
            Action::Play { file, reply } => Some(Outcome::Play {
                file: self.sound_dir.join(file),
                reply: reply.clone(),
            }),
        }
    }
}
