//! Common test utilities for integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use authorized_store::AuthorizedStore;
use market_data::PriceSnapshot;
use rand::rngs::mock::StepRng;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;
use whatsapp_bot::{
    AiService, CollaboratorError, Collaborators, Dispatcher, DispatcherSettings, MessageSender,
    NewsService, PriceService,
};
use whatsapp_client::ChatMessage;

pub const FIXED: &str = "5500000000000";
pub const USER: &str = "5511999990000";
pub const GROUP: &str = "120363025246125486@g.us";

/// Records every outgoing message.
#[derive(Default)]
pub struct RecordingSender {
    replies: Mutex<Vec<(String, String)>>,
    direct: Mutex<Vec<(String, String)>>,
}

impl RecordingSender {
    pub fn replies(&self) -> Vec<(String, String)> {
        self.replies.lock().unwrap().clone()
    }

    pub fn reply_texts(&self) -> Vec<String> {
        self.replies().into_iter().map(|(_, text)| text).collect()
    }

    pub fn last_reply(&self) -> Option<String> {
        self.reply_texts().pop()
    }

    pub fn direct(&self) -> Vec<(String, String)> {
        self.direct.lock().unwrap().clone()
    }
}

#[async_trait]
impl MessageSender for RecordingSender {
    async fn reply(&self, chat: &str, text: &str) -> Result<(), CollaboratorError> {
        self.replies
            .lock()
            .unwrap()
            .push((chat.to_string(), text.to_string()));
        Ok(())
    }

    async fn send_to(&self, phone: &str, text: &str) -> Result<(), CollaboratorError> {
        self.direct
            .lock()
            .unwrap()
            .push((phone.to_string(), text.to_string()));
        Ok(())
    }
}

/// Quotes every symbol with a fixed template.
pub struct StaticPrices;

#[async_trait]
impl PriceService for StaticPrices {
    async fn quote(&self, symbol: &str) -> Result<String, CollaboratorError> {
        Ok(format!("quote:{}", symbol))
    }

    async fn usd_snapshot(&self, _symbol: &str) -> Result<PriceSnapshot, CollaboratorError> {
        Ok(PriceSnapshot {
            current_usd: 1.0,
            ath_usd: 2.0,
        })
    }
}

pub struct StaticNews;

#[async_trait]
impl NewsService for StaticNews {
    async fn digest(&self) -> Result<String, CollaboratorError> {
        Ok("📰 digest".into())
    }
}

/// Records prompts and answers after an optional delay.
#[derive(Default)]
pub struct RecordingAi {
    prompts: Mutex<Vec<String>>,
    delay: Duration,
}

impl RecordingAi {
    pub fn with_delay(delay: Duration) -> Self {
        Self {
            prompts: Mutex::new(Vec::new()),
            delay,
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl AiService for RecordingAi {
    async fn complete(&self, prompt: &str) -> Result<String, CollaboratorError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        Ok(format!("ai:{}", prompt))
    }
}

/// A dispatcher wired to recording fakes and a temporary store file.
pub struct Harness {
    pub dir: TempDir,
    pub sender: Arc<RecordingSender>,
    pub ai: Arc<RecordingAi>,
    pub dispatcher: Arc<Dispatcher>,
}

impl Harness {
    pub async fn new() -> Self {
        Self::with_ai(RecordingAi::default()).await
    }

    pub async fn with_ai(ai: RecordingAi) -> Self {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(AuthorizedStore::open([FIXED], dir.path().join("authorized.json")).await);
        let sender = Arc::new(RecordingSender::default());
        let ai = Arc::new(ai);

        let settings = DispatcherSettings {
            bot_name: "TestBot".into(),
            ..DispatcherSettings::default()
        };
        let dispatcher = Dispatcher::new(
            settings,
            store,
            Collaborators {
                sender: sender.clone(),
                prices: Arc::new(StaticPrices),
                news: Arc::new(StaticNews),
                ai: Some(ai.clone() as Arc<dyn AiService>),
            },
        )
        .with_rng(StepRng::new(0, 0));

        Self {
            dir,
            sender,
            ai,
            dispatcher: Arc::new(dispatcher),
        }
    }

    pub fn store_path(&self) -> PathBuf {
        self.dir.path().join("authorized.json")
    }

    pub async fn store_file(&self) -> String {
        tokio::fs::read_to_string(self.store_path()).await.unwrap()
    }
}

pub fn group_message(sender: &str, text: &str) -> ChatMessage {
    ChatMessage {
        sender: sender.into(),
        chat: GROUP.into(),
        is_group: true,
        text: text.into(),
        timestamp: Default::default(),
    }
}
