//! Trigger rules: what to look for in a message and what to do about it.

use serde::Deserialize;

/// How a rule matches incoming message text.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trigger {
    /// Matches only if the whole message equals the pattern.
    Exact(String),
    /// Matches if the pattern occurs anywhere in the message.
    Contains(String),
}

impl Trigger {
    pub fn matches(&self, text: &str) -> bool {
        match self {
            Trigger::Exact(pattern) => text == pattern,
            Trigger::Contains(pattern) => text.contains(pattern.as_str()),
        }
    }

    pub fn pattern(&self) -> &str {
        match self {
            Trigger::Exact(pattern) | Trigger::Contains(pattern) => pattern,
        }
    }
}

/// One candidate reply with its selection weight.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WeightedText {
    pub text: String,
    pub weight: u32,
}

/// What to do once a trigger matches.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Reply with the command list wrapped in a code block.
    Help,
    /// Reply with a fixed text.
    Reply { text: String },
    /// React with an emoji. Accepts unicode ("👍"), a custom emoji id
    /// ("1442771448673599628"), or "name:id".
    React { emoji: String },
    /// Reply with one of several texts, picked by weight.
    WeightedReply { choices: Vec<WeightedText> },
    /// Join the sender's voice channel, play a clip, then reply.
    Play { file: String, reply: String },
}

/// A trigger paired with its action.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Rule {
    pub trigger: Trigger,
    pub action: Action,
}

/// Ordered rule list. The first matching rule wins, so more specific
/// triggers must come before broader ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    pub fn find(&self, text: &str) -> Option<&Rule> {
        self.rules.iter().find(|rule| rule.trigger.matches(text))
    }
}

/// Command list shown for `!help`.
pub fn default_help_text() -> String {
    [
        "空気清浄機くんbot コマンドリスト",
        "",
        "【VC系コマンド】",
        "・空気悪くね？ → 中換気",
        "・ちょっと空気悪くね？ → 弱換気",
        "・めっちゃ空気悪くね？ → 強換気",
        "",
        "【テキスト反応】",
        "・ちんぽ（含む） → ナイスちんぽ",
        "・!おみくじ → 凶か大凶が出る",
        "",
        "短時間に大量のコマンド送信を受けると一時停止します",
    ]
    .join("\n")
}

/// The built-in rule table, used when the config file lists no rules.
pub fn default_rules() -> Vec<Rule> {
    vec![
        Rule {
            trigger: Trigger::Exact("!help".to_string()),
            action: Action::Help,
        },
        Rule {
            trigger: Trigger::Contains("つかう".to_string()),
            action: Action::React {
                emoji: "1442771448673599628".to_string(),
            },
        },
        Rule {
            trigger: Trigger::Contains("使う".to_string()),
            action: Action::React {
                emoji: "1442771448673599628".to_string(),
            },
        },
        Rule {
            trigger: Trigger::Contains("つかっ".to_string()),
            action: Action::React {
                emoji: "1442771448673599628".to_string(),
            },
        },
        Rule {
            trigger: Trigger::Contains("使っ".to_string()),
            action: Action::React {
                emoji: "1442771448673599628".to_string(),
            },
        },
        Rule {
            trigger: Trigger::Contains("ちんぽ".to_string()),
            action: Action::WeightedReply {
                choices: vec![
                    WeightedText {
                        text: "ナイスちんぽ".to_string(),
                        weight: 98,
                    },
                    WeightedText {
                        text: "だまれ".to_string(),
                        weight: 2,
                    },
                ],
            },
        },
        Rule {
            trigger: Trigger::Exact("!おみくじ".to_string()),
            action: Action::WeightedReply {
                choices: vec![
                    WeightedText {
                        text: "凶".to_string(),
                        weight: 98,
                    },
                    WeightedText {
                        text: "大凶".to_string(),
                        weight: 2,
                    },
                ],
            },
        },
        Rule {
            trigger: Trigger::Exact("空気悪くね？".to_string()),
            action: Action::Play {
                file: "air_purifer_M.wav".to_string(),
                reply: "換気するか".to_string(),
            },
        },
        Rule {
            trigger: Trigger::Exact("ちょっと空気悪くね？".to_string()),
            action: Action::Play {
                file: "air_purifer_L.wav".to_string(),
                reply: "ちょっと換気するか".to_string(),
            },
        },
        Rule {
            trigger: Trigger::Exact("めっちゃ空気悪くね？".to_string()),
            action: Action::Play {
                file: "air_purifer_H.wav".to_string(),
                reply: "めっちゃ換気するか".to_string(),
            },
        },
    ]
}
