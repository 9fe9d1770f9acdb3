//! One-shot voice playback: join, play a clip, leave.

use std::path::Path;
use std::sync::Arc;

use serenity::async_trait;
use serenity::client::Context;
use serenity::model::channel::Message;
use serenity::model::id::GuildId;
use songbird::error::{ControlError, JoinError};
use songbird::input::File as AudioFile;
use songbird::{Event, EventContext, EventHandler as VoiceEventHandler, Songbird, TrackEvent};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum VoiceError {
    /// The songbird driver was not registered at client build time.
    #[error("voice client not registered")]
    NotRegistered,
    #[error("failed to join voice channel: {0}")]
    Join(#[from] JoinError),
    #[error("failed to control playback: {0}")]
    Control(#[from] ControlError),
}

/// What happened when a voice command was executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipOutcome {
    /// Joined and started the clip.
    Started,
    /// The sender is not in a voice channel (or not in a guild at all).
    SenderNotInVoice,
}

/// Join the message sender's voice channel and play `clip` once.
///
/// The bot joins self-deafened, plays the clip at `volume` and leaves
/// again as soon as the track ends or errors. Returns without touching
/// voice at all when the sender has no voice channel to join.
pub async fn play_clip(
    ctx: &Context,
    msg: &Message,
    clip: &Path,
    volume: f32,
) -> Result<ClipOutcome, VoiceError> {
    let Some(guild_id) = msg.guild_id else {
        return Ok(ClipOutcome::SenderNotInVoice);
    };
    let channel_id = msg.guild(&ctx.cache).and_then(|guild| {
        guild
            .voice_states
            .get(&msg.author.id)
            .and_then(|state| state.channel_id)
    });
    let Some(channel_id) = channel_id else {
        return Ok(ClipOutcome::SenderNotInVoice);
    };

    let manager = songbird::get(ctx).await.ok_or(VoiceError::NotRegistered)?;

    info!(guild = %guild_id, channel = %channel_id, clip = %clip.display(), "joining voice channel");
    let call = manager.join(guild_id, channel_id).await?;
    let mut call = call.lock().await;

    if let Err(e) = call.deafen(true).await {
        // Playback still works undeafened, so keep going.
        warn!(error = %e, "failed to self-deafen");
    }

    let handle = call.play_only_input(AudioFile::new(clip.to_path_buf()).into());
    handle.set_volume(volume)?;

    let leaver = LeaveAfterClip {
        guild_id,
        manager: manager.clone(),
    };
    handle.add_event(Event::Track(TrackEvent::End), leaver.clone())?;
    handle.add_event(Event::Track(TrackEvent::Error), leaver)?;

    Ok(ClipOutcome::Started)
}

/// Drops the voice connection once the clip is done.
#[derive(Clone)]
struct LeaveAfterClip {
    guild_id: GuildId,
    manager: Arc<Songbird>,
}

#[async_trait]
impl VoiceEventHandler for LeaveAfterClip {
    async fn act(&self, ctx: &EventContext<'_>) -> Option<Event> {
        if let EventContext::Track(tracks) = ctx {
            for (state, _) in *tracks {
                debug!(guild = %self.guild_id, playing = ?state.playing, "clip track finished");
            }
        }

        // Registered for both End and Error; whichever fires second
        // finds the call already gone.
        match self.manager.remove(self.guild_id).await {
            Ok(()) => info!(guild = %self.guild_id, "left voice channel"),
            Err(e) => debug!(guild = %self.guild_id, error = %e, "voice channel already left"),
        }
        None
    }
}
