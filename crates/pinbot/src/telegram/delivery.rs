//! Sends a prepared video to a chat

use async_trait::async_trait;
use pincore::conversation::{PreparedVideo, VideoDelivery};
use teloxide::prelude::*;
use teloxide::types::InputFile;

/// Uploads videos to a single chat as streamable attachments.
pub struct TelegramDelivery {
    bot: Bot,
    chat_id: ChatId,
}

impl TelegramDelivery {
    pub fn new(bot: Bot, chat_id: ChatId) -> Self {
        Self { bot, chat_id }
    }
}

#[async_trait]
impl VideoDelivery for TelegramDelivery {
    async fn deliver(&self, video: &PreparedVideo) -> anyhow::Result<()> {
        let mut request = self
            .bot
            .send_video(self.chat_id, InputFile::file(video.path.clone()))
            .caption(video.caption.clone())
            .supports_streaming(true);
        if let Ok(duration) = u32::try_from(video.duration_secs) {
            if duration > 0 {
                request = request.duration(duration);
            }
        }
        request.await?;
        Ok(())
    }
}
