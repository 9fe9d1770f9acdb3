//! Tests for the responder decision pipeline.
//!
//! Run with: cargo test responder

use super::*;
use super::rules::{default_help_text, default_rules};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::path::{Path, PathBuf};

fn default_responder() -> Responder {
    Responder::new(
        default_rules(),
        default_help_text(),
        PathBuf::from("/srv/sounds"),
    )
}

fn rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

// =============================================================================
// RULE MATCHING
// =============================================================================

mod rule_matching {
    use super::*;

    #[test]
    fn test_exact_trigger_requires_whole_message() {
        let trigger = Trigger::Exact("!おみくじ".to_string());
        assert!(trigger.matches("!おみくじ"));
        assert!(!trigger.matches("!おみくじ！"));
        assert!(!trigger.matches("朝の!おみくじ"));
        assert!(!trigger.matches(""));
    }

    #[test]
    fn test_contains_trigger_matches_anywhere() {
        let trigger = Trigger::Contains("つかう".to_string());
        assert!(trigger.matches("つかう"));
        assert!(trigger.matches("それつかうの？"));
        assert!(!trigger.matches("それ使うの？"));
    }

    #[test]
    fn test_first_matching_rule_wins() {
        let rules = vec![
            Rule {
                trigger: Trigger::Contains("air".to_string()),
                action: Action::Reply {
                    text: "first".to_string(),
                },
            },
            Rule {
                trigger: Trigger::Contains("airplane".to_string()),
                action: Action::Reply {
                    text: "second".to_string(),
                },
            },
        ];
        let responder = Responder::new(rules, String::new(), PathBuf::from("."));

        // "airplane" matches both rules; order decides.
        assert_eq!(
            responder.decide_with("airplane", &mut rng()),
            Some(Outcome::Reply("first".to_string()))
        );
    }

    #[test]
    fn test_no_match_returns_none() {
        let responder = default_responder();
        assert_eq!(responder.decide_with("おはよう", &mut rng()), None);
        assert_eq!(responder.decide_with("", &mut rng()), None);
    }

    #[test]
    fn test_later_rules_unreachable_behind_broad_contains() {
        let rules = vec![
            Rule {
                trigger: Trigger::Contains("a".to_string()),
                action: Action::Reply {
                    text: "broad".to_string(),
                },
            },
            Rule {
                trigger: Trigger::Exact("abc".to_string()),
                action: Action::Reply {
                    text: "narrow".to_string(),
                },
            },
        ];
        let responder = Responder::new(rules, String::new(), PathBuf::from("."));
        assert_eq!(
            responder.decide_with("abc", &mut rng()),
            Some(Outcome::Reply("broad".to_string()))
        );
    }
}

// =============================================================================
// DEFAULT RULE TABLE
// =============================================================================

mod default_table {
    use super::*;

    #[test]
    fn test_help_reply_is_a_code_block() {
        let responder = default_responder();
        let Some(Outcome::Reply(text)) = responder.decide_with("!help", &mut rng()) else {
            panic!("!help should produce a reply");
        };
        assert!(text.starts_with("```"));
        assert!(text.ends_with("```"));
        assert!(text.contains("コマンドリスト"));
        assert!(text.contains("!おみくじ"));
    }

    #[test]
    fn test_help_requires_exact_command() {
        let responder = default_responder();
        assert_eq!(responder.decide_with("!help me", &mut rng()), None);
    }

    #[test]
    fn test_usage_words_react_with_custom_emoji() {
        let responder = default_responder();
        for message in ["つかうの？", "これ使うよ", "つかってみた", "使ってない"] {
            assert_eq!(
                responder.decide_with(message, &mut rng()),
                Some(Outcome::React("1442771448673599628".to_string())),
                "message {message:?} should trigger the reaction"
            );
        }
    }

    #[test]
    fn test_omikuji_draws_one_of_two_fortunes() {
        let responder = default_responder();
        let mut rng = rng();
        for _ in 0..50 {
            let Some(Outcome::Reply(text)) = responder.decide_with("!おみくじ", &mut rng) else {
                panic!("!おみくじ should produce a reply");
            };
            assert!(text == "凶" || text == "大凶", "unexpected fortune {text:?}");
        }
    }

    #[test]
    fn test_chinpo_reply_heavily_favors_the_nice_one() {
        let responder = default_responder();
        let mut rng = rng();

        let mut nice = 0;
        for _ in 0..1000 {
            match responder.decide_with("ちんぽ", &mut rng) {
                Some(Outcome::Reply(text)) if text == "ナイスちんぽ" => nice += 1,
                Some(Outcome::Reply(text)) if text == "だまれ" => {}
                other => panic!("unexpected outcome {other:?}"),
            }
        }
        assert!(nice > 900, "ナイスちんぽ picked only {nice} of 1000");
    }

    #[test]
    fn test_air_commands_resolve_clip_paths_under_sound_dir() {
        let responder = default_responder();
        let cases = [
            ("空気悪くね？", "air_purifer_M.wav", "換気するか"),
            ("ちょっと空気悪くね？", "air_purifer_L.wav", "ちょっと換気するか"),
            ("めっちゃ空気悪くね？", "air_purifer_H.wav", "めっちゃ換気するか"),
        ];
        for (message, file, reply_text) in cases {
            let outcome = responder.decide_with(message, &mut rng());
            assert_eq!(
                outcome,
                Some(Outcome::Play {
                    file: Path::new("/srv/sounds").join(file),
                    reply: reply_text.to_string(),
                }),
                "message {message:?}"
            );
        }
    }

    #[test]
    fn test_air_commands_are_exact_only() {
        let responder = default_responder();
        // Extra words around a voice command must not trigger playback.
        assert_eq!(responder.decide_with("空気悪くね？？", &mut rng()), None);
        assert_eq!(responder.decide_with("今日空気悪くね？", &mut rng()), None);
    }

    #[test]
    fn test_longer_air_commands_not_shadowed() {
        // The short form is an exact match, so the longer variants must
        // still reach their own rules.
        let responder = default_responder();
        let Some(Outcome::Play { file, .. }) =
            responder.decide_with("めっちゃ空気悪くね？", &mut rng())
        else {
            panic!("expected playback outcome");
        };
        assert!(file.ends_with("air_purifer_H.wav"));
    }
}

// =============================================================================
// CONFIGURED RULES
// =============================================================================

mod configured_rules {
    use super::*;

    #[test]
    fn test_custom_help_text_is_used() {
        let rules = vec![Rule {
            trigger: Trigger::Exact("!help".to_string()),
            action: Action::Help,
        }];
        let responder = Responder::new(rules, "one line".to_string(), PathBuf::from("."));
        assert_eq!(
            responder.decide_with("!help", &mut rng()),
            Some(Outcome::Reply("```one line```".to_string()))
        );
    }

    #[test]
    fn test_plain_reply_action_passes_text_through() {
        let rules = vec![Rule {
            trigger: Trigger::Contains("ping".to_string()),
            action: Action::Reply {
                text: "pong".to_string(),
            },
        }];
        let responder = Responder::new(rules, String::new(), PathBuf::from("."));
        assert_eq!(
            responder.decide_with("ping pong", &mut rng()),
            Some(Outcome::Reply("pong".to_string()))
        );
    }

    #[test]
    fn test_relative_sound_dir_joins_clip_name() {
        let rules = vec![Rule {
            trigger: Trigger::Exact("go".to_string()),
            action: Action::Play {
                file: "clip.wav".to_string(),
                reply: "done".to_string(),
            },
        }];
        let responder = Responder::new(rules, String::new(), PathBuf::from("sounds"));
        assert_eq!(
            responder.decide_with("go", &mut rng()),
            Some(Outcome::Play {
                file: PathBuf::from("sounds/clip.wav"),
                reply: "done".to_string(),
            })
        );
    }
}
