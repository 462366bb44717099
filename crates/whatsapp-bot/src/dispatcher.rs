//! Command dispatcher: group filter, authorization, classification and
//! execution of one inbound message.

use crate::commands::{add_number, help_text, remove_number, PING_REPLY};
use crate::services::{AiService, MessageSender, NewsService, PriceService};
use authorized_store::AuthorizedStore;
use intent_router::{Intent, ReplyPools, Router, RouterConfig};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use std::fmt;
use std::sync::{Arc, Mutex};
use tracing::{debug, error, info, instrument, warn};
use whatsapp_client::ChatMessage;

/// Why a message was dropped before classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    /// Group restriction is on and the message came from a direct chat.
    NotGroup,
    Unauthorized,
}

/// Terminal state of one dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Dropped(DropReason),
    Executed(Intent),
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Dropped(reason) => write!(f, "dropped({:?})", reason),
            Outcome::Executed(intent) => write!(f, "executed({})", intent),
        }
    }
}

/// Static dispatcher settings.
#[derive(Debug, Clone)]
pub struct DispatcherSettings {
    pub bot_name: String,
    pub restrict_to_group: bool,
    pub router: RouterConfig,
}

impl Default for DispatcherSettings {
    fn default() -> Self {
        Self {
            bot_name: "FayskBot".into(),
            restrict_to_group: false,
            router: RouterConfig::default(),
        }
    }
}

/// Collaborators the dispatcher calls into.
#[derive(Clone)]
pub struct Collaborators {
    pub sender: Arc<dyn MessageSender>,
    pub prices: Arc<dyn PriceService>,
    pub news: Arc<dyn NewsService>,
    /// `None` when AI chat is off; free text is then never routed to it.
    pub ai: Option<Arc<dyn AiService>>,
}

pub struct Dispatcher {
    prefix: String,
    bot_name: String,
    restrict_to_group: bool,
    trigger_word: String,
    store: Arc<AuthorizedStore>,
    router: Router,
    replies: ReplyPools,
    services: Collaborators,
    rng: Mutex<Box<dyn RngCore + Send>>,
}

impl Dispatcher {
    pub fn new(
        settings: DispatcherSettings,
        store: Arc<AuthorizedStore>,
        services: Collaborators,
    ) -> Self {
        let mut router_config = settings.router;
        router_config.ai_enabled = router_config.ai_enabled && services.ai.is_some();

        Self {
            prefix: format!("[{}]", settings.bot_name),
            bot_name: settings.bot_name,
            restrict_to_group: settings.restrict_to_group,
            trigger_word: router_config.trigger_word.clone(),
            replies: ReplyPools::from_config(&router_config),
            router: Router::new(router_config),
            store,
            services,
            rng: Mutex::new(Box::new(StdRng::from_entropy())),
        }
    }

    /// Replace the random source used to pick canned replies.
    pub fn with_rng(mut self, rng: impl RngCore + Send + 'static) -> Self {
        self.rng = Mutex::new(Box::new(rng));
        self
    }

    pub fn store(&self) -> &AuthorizedStore {
        &self.store
    }

    pub fn ai_enabled(&self) -> bool {
        self.router.ai_enabled()
    }

    /// Run one inbound message through filtering, authorization,
    /// classification and execution.
    #[instrument(skip(self, message), fields(sender = %message.sender, group = message.is_group))]
    pub async fn dispatch(&self, message: &ChatMessage) -> Outcome {
        if self.restrict_to_group && !message.is_group {
            info!("{} Ignoring private message (group restriction on)", self.prefix);
            return Outcome::Dropped(DropReason::NotGroup);
        }

        if !self.store.is_authorized(&message.sender).await {
            warn!("{} Unauthorized number: {}", self.prefix, message.sender);
            return Outcome::Dropped(DropReason::Unauthorized);
        }

        let intent = self.router.classify(&message.text);
        self.execute(message, &intent).await;
        Outcome::Executed(intent)
    }

    async fn execute(&self, message: &ChatMessage, intent: &Intent) {
        let sender = message.sender.as_str();

        let reply = match intent {
            Intent::Ping => {
                info!("{} !ping from {}", self.prefix, sender);
                Some(PING_REPLY.to_string())
            }
            Intent::Help => {
                info!("{} !help from {}", self.prefix, sender);
                Some(help_text(&self.trigger_word))
            }
            Intent::CryptoNews => {
                info!("{} !cryptonews from {}", self.prefix, sender);
                Some(match self.services.news.digest().await {
                    Ok(digest) => digest,
                    Err(e) => {
                        warn!("{} News digest failed: {}", self.prefix, e);
                        format!("❌ Erro ao buscar notícias: {}", e.message)
                    }
                })
            }
            Intent::CryptoPrice(symbol) => {
                info!("{} Price lookup for {} from {}", self.prefix, symbol, sender);
                Some(match self.services.prices.quote(symbol).await {
                    Ok(quote) => quote,
                    Err(e) => {
                        warn!("{} Quote for {} failed: {}", self.prefix, symbol, e);
                        format!("❌ Não foi possível consultar '{}': {}", symbol, e.message)
                    }
                })
            }
            Intent::Greeting(category) | Intent::Interaction(category) => {
                debug!("{} {} from {}", self.prefix, intent, sender);
                let reply = self.pick_reply(category);
                if reply.is_none() {
                    warn!("{} No replies for category {}", self.prefix, category);
                }
                reply
            }
            Intent::AdminAddNumber(text) => {
                let result = add_number(&self.store, sender, text, &self.prefix).await;
                if let Some(number) = &result.added {
                    self.welcome(number).await;
                }
                Some(result.text)
            }
            Intent::AdminRemoveNumber(text) => {
                Some(remove_number(&self.store, sender, text, &self.prefix).await.text)
            }
            Intent::AiChat(prompt) => match &self.services.ai {
                Some(ai) => {
                    info!("{} Sending prompt to AI from {}", self.prefix, sender);
                    Some(match ai.complete(prompt).await {
                        Ok(answer) => answer,
                        Err(e) => {
                            warn!("{} AI error: {}", self.prefix, e);
                            format!("❌ Erro ao consultar a IA: {}", e.message)
                        }
                    })
                }
                None => {
                    warn!("{} AI chat requested but no AI service configured", self.prefix);
                    None
                }
            },
            Intent::Ignored => {
                debug!("{} Ignored message from {}", self.prefix, sender);
                None
            }
        };

        if let Some(text) = reply {
            self.reply(&message.chat, &text).await;
        }
    }

    fn pick_reply(&self, category: &str) -> Option<String> {
        let mut rng = match self.rng.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        self.replies.pick(category, &mut **rng).map(String::from)
    }

    async fn reply(&self, chat: &str, text: &str) {
        if let Err(e) = self.services.sender.reply(chat, text).await {
            error!("{} Failed to send reply: {}", self.prefix, e);
        }
    }

    async fn welcome(&self, number: &str) {
        let text = format!(
            "👋 Olá! Você foi autorizado a usar o {}. Envie !help para ver os comandos.",
            self.bot_name
        );
        if let Err(e) = self.services.sender.send_to(number, &text).await {
            warn!("{} Failed to welcome {}: {}", self.prefix, number, e);
        }
    }
}
