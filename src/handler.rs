//! Discord event handler: rate limit, match, respond.

use std::sync::Arc;
use std::time::Instant;

use serenity::all::{Context, EventHandler, GatewayIntents, Message, Ready};
use serenity::async_trait;
use serenity::model::channel::ReactionType;
use serenity::model::id::EmojiId;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::health::AppState;
use crate::responder::{Outcome, RateLimiter, Responder};
use crate::voice::{self, ClipOutcome};

/// Handler for Discord gateway events.
pub struct Handler {
    config: Arc<Config>,
    responder: Responder,
    limiter: Mutex<RateLimiter>,
    health: AppState,
}

impl Handler {
    pub fn new(config: Arc<Config>, health: AppState) -> Self {
        let responder = Responder::new(
            config.rules.clone(),
            config.help_text.clone(),
            config.sound_dir.clone(),
        );
        let limiter = Mutex::new(RateLimiter::new(
            config.rate_limit.max_responses,
            config.rate_limit.window(),
        ));
        Self {
            config,
            responder,
            limiter,
            health,
        }
    }

    /// Required gateway intents for the bot.
    pub fn intents() -> GatewayIntents {
        GatewayIntents::GUILDS
            | GatewayIntents::GUILD_MESSAGES
            | GatewayIntents::MESSAGE_CONTENT
            | GatewayIntents::GUILD_VOICE_STATES
    }

    async fn execute(&self, ctx: &Context, msg: &Message, outcome: Outcome) {
        match outcome {
            Outcome::Reply(text) => {
                if let Err(e) = msg.reply(&ctx.http, &text).await {
                    warn!(channel = %msg.channel_id, error = %e, "failed to send reply");
                }
            }
            Outcome::React(emoji) => {
                let reaction = parse_reaction_type(&emoji);
                if let Err(e) = msg.react(&ctx.http, reaction).await {
                    warn!(channel = %msg.channel_id, error = %e, "failed to add reaction");
                }
            }
            Outcome::Play { file, reply } => {
                match voice::play_clip(ctx, msg, &file, self.config.playback_volume).await {
                    Ok(ClipOutcome::Started) => {
                        if let Err(e) = msg.reply(&ctx.http, &reply).await {
                            warn!(channel = %msg.channel_id, error = %e, "failed to send reply");
                        }
                    }
                    Ok(ClipOutcome::SenderNotInVoice) => {
                        if let Err(e) = msg.reply(&ctx.http, &self.config.not_in_voice_reply).await
                        {
                            warn!(channel = %msg.channel_id, error = %e, "failed to send reply");
                        }
                    }
                    Err(e) => {
                        warn!(clip = %file.display(), error = %e, "voice playback failed");
                    }
                }
            }
        }
    }
}

#[async_trait]
impl EventHandler for Handler {
    async fn ready(&self, _ctx: Context, ready: Ready) {
        info!(
            bot_name = %ready.user.name,
            guilds = ready.guilds.len(),
            "connected to Discord"
        );
        self.health.set_bot_user(ready.user.name.clone()).await;
    }

    async fn message(&self, ctx: Context, msg: Message) {
        // Skip bot messages to prevent loops
        if msg.author.bot {
            return;
        }

        // Every message consumes a slot, matching or not, so a flooded
        // channel silences the bot instead of queueing replies.
        if !self.limiter.lock().await.try_acquire(Instant::now()) {
            debug!(channel = %msg.channel_id, "rate limited, staying silent");
            return;
        }

        let Some(outcome) = self.responder.decide(&msg.content) else {
            return;
        };
        debug!(channel = %msg.channel_id, ?outcome, "rule matched");
        self.execute(&ctx, &msg, outcome).await;
    }
}

/// Turn a configured emoji string into something Discord accepts.
///
/// "name:123" and bare "123" become custom emoji references, anything
/// else is sent through as a unicode emoji.
fn parse_reaction_type(emoji: &str) -> ReactionType {
    if let Some((name, id_str)) = emoji.split_once(':') {
        if let Ok(id) = id_str.parse::<u64>() {
            if id != 0 {
                return ReactionType::Custom {
                    animated: false,
                    id: EmojiId::new(id),
                    name: Some(name.to_string()),
                };
            }
        }
    }
    if let Ok(id) = emoji.parse::<u64>() {
        if id != 0 {
            return ReactionType::Custom {
                animated: false,
                id: EmojiId::new(id),
                name: None,
            };
        }
    }
    ReactionType::Unicode(emoji.to_string())
}
