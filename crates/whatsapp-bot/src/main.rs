//! WhatsApp bot - Main entry point.

use anyhow::Context;
use authorized_store::AuthorizedStore;
use chrono::Local;
use intent_router::RouterConfig;
use market_data::{CoinGeckoClient, CryptoPanicClient};
use openai_client::OpenAiClient;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use whatsapp_bot::{
    run, AiService, AppError, AppResult, AthMonitor, AthRecords, Collaborators, Config,
    DailyNews, Dispatcher, DispatcherSettings, MessageSender, NewsService, OpenAiService,
    PriceService, Schedule, ScheduledJobs,
};
use whatsapp_client::{MessageReceiver, WhatsAppClient};

#[tokio::main]
async fn main() -> AppResult<()> {
    // Load configuration
    let config = Config::load().context("Failed to load configuration")?;

    // Initialize logging
    init_logging(&config.bot.log_level, &config.bot.log_format);

    info!("Starting {}...", config.bot.name);
    config.log_summary();

    // Authorized numbers
    let store = Arc::new(
        AuthorizedStore::open(&config.auth.fixed_numbers, &config.auth.store_path).await,
    );

    // Initialize clients
    let whatsapp = WhatsAppClient::new(&config.whatsapp.service_url)?;

    let prices = CoinGeckoClient::new(&config.market.coingecko_url, config.market.timeout)?;

    let news = CryptoPanicClient::new(
        &config.market.cryptopanic_url,
        config.market.cryptopanic_token.clone(),
        config.market.timeout,
    )?;

    let ai: Option<Arc<dyn AiService>> = match config.ai.api_key() {
        Some(api_key) if config.ai.enabled => {
            let client = OpenAiClient::new(
                api_key,
                &config.ai.base_url,
                &config.ai.model,
                config.ai.timeout,
            )?;

            if client.health_check().await {
                info!("OpenAI healthy - Model: {}", client.model());
            } else {
                warn!("OpenAI health check failed - will retry on requests");
            }

            Some(Arc::new(OpenAiService::new(
                client,
                &config.ai.system_prompt,
                config.ai.temperature,
                config.ai.max_tokens,
            )))
        }
        _ => None,
    };

    // Health checks
    if !whatsapp.health_check().await {
        error!("WhatsApp bridge not reachable at {}", whatsapp.base_url());
        return Err(AppError::BridgeUnavailable(whatsapp.base_url().to_string()));
    }
    info!("WhatsApp bridge healthy at {}", whatsapp.base_url());

    if ai.is_none() {
        warn!("AI chat disabled; admin phrases are unavailable too");
    }

    let sender: Arc<dyn MessageSender> = Arc::new(whatsapp.clone());
    let prices: Arc<dyn PriceService> = Arc::new(prices);
    let news: Arc<dyn NewsService> = Arc::new(news);

    let settings = DispatcherSettings {
        bot_name: config.bot.name.clone(),
        restrict_to_group: config.bot.restrict_to_group,
        router: RouterConfig {
            ai_enabled: config.ai.is_active(),
            trigger_word: config.router.trigger_word.clone(),
            add_phrases: config.router.add_phrases.clone(),
            remove_phrases: config.router.remove_phrases.clone(),
            ..RouterConfig::default()
        },
    };

    let dispatcher = Arc::new(Dispatcher::new(
        settings,
        store.clone(),
        Collaborators {
            sender: sender.clone(),
            prices: prices.clone(),
            news: news.clone(),
            ai,
        },
    ));

    // Background jobs
    let mut jobs = ScheduledJobs::new();

    if config.jobs.news_enabled {
        let job = DailyNews::new(&config.bot.name, news, sender.clone(), store.clone());
        let schedule = Schedule::daily_at(config.jobs.news_time, Local::now().time());
        jobs.spawn("daily-news", move |stop| job.run(schedule, stop));
    }

    if config.jobs.ath_enabled {
        let records = AthRecords::load(&config.jobs.ath_records_path).await;
        let job = AthMonitor::new(
            &config.bot.name,
            &config.jobs.ath_coins,
            prices,
            sender,
            store,
            records,
        );
        let schedule = Schedule::every(config.jobs.ath_interval);
        jobs.spawn("ath-monitor", move |stop| job.run(schedule, stop));
    }

    info!("Listening for messages...");

    // Start message receiver
    let receiver = MessageReceiver::new(whatsapp, config.whatsapp.poll_interval)
        .with_error_backoff(config.whatsapp.error_backoff);

    let shutdown = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for shutdown signal: {}", e);
            std::future::pending::<()>().await;
        }
    };

    let stats = run(
        receiver.stream(),
        dispatcher,
        shutdown,
        config.bot.shutdown_grace,
    )
    .await;

    let aborted_jobs = jobs.shutdown(config.bot.shutdown_grace).await;

    info!(
        "Shutting down ({} received, {} completed, {} aborted, {} jobs aborted)",
        stats.received, stats.completed, stats.aborted, aborted_jobs
    );
    Ok(())
}

fn init_logging(level: &str, format: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let registry = tracing_subscriber::registry().with(filter);
    if format.eq_ignore_ascii_case("json") {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}
