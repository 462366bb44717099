//! CryptoPanic news digest.

use crate::error::MarketDataError;
use crate::types::{Post, PostsResponse};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use std::collections::HashSet;
use std::time::Duration;
use tracing::{info, instrument};

pub const DEFAULT_CRYPTOPANIC_URL: &str = "https://cryptopanic.com/api/v1";

/// Link shown under each section.
pub const SOURCE_LINK: &str = "https://cryptopanic.com/news/";

pub const MAX_ITEMS_PER_SECTION: usize = 10;

#[derive(Clone)]
pub struct CryptoPanicClient {
    client: Client,
    base_url: String,
    token: Option<SecretString>,
}

impl CryptoPanicClient {
    pub fn new(
        base_url: impl Into<String>,
        token: Option<SecretString>,
        timeout: Duration,
    ) -> Result<Self, MarketDataError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
        })
    }

    #[instrument(skip(self))]
    async fn posts(&self, filter: (&str, &str)) -> Result<Vec<Post>, MarketDataError> {
        let token = self.token.as_ref().ok_or(MarketDataError::MissingToken)?;

        let response = self
            .client
            .get(format!("{}/posts/", self.base_url))
            .query(&[
                ("auth_token", token.expose_secret().as_str()),
                filter,
                ("public", "true"),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(MarketDataError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;
        let parsed: PostsResponse = serde_json::from_str(&body)?;
        Ok(parsed.results)
    }

    /// Trending posts.
    pub async fn hot(&self) -> Result<Vec<Post>, MarketDataError> {
        self.posts(("filter", "hot")).await
    }

    /// Latest news posts.
    pub async fn latest(&self) -> Result<Vec<Post>, MarketDataError> {
        self.posts(("kind", "news")).await
    }

    /// Hot and latest sections, rendered for chat.
    pub async fn digest(&self) -> Result<String, MarketDataError> {
        let hot = self.hot().await?;
        let latest = without_duplicates(&hot, self.latest().await?);

        info!("News digest: {} hot, {} latest", hot.len(), latest.len());
        Ok(render_digest(&hot, &latest))
    }
}

/// Drop posts from `latest` whose slug already appears in `hot`.
pub fn without_duplicates(hot: &[Post], latest: Vec<Post>) -> Vec<Post> {
    let seen: HashSet<&str> = hot.iter().map(|p| p.slug.as_str()).collect();
    latest
        .into_iter()
        .filter(|p| !seen.contains(p.slug.as_str()))
        .collect()
}

pub fn render_digest(hot: &[Post], latest: &[Post]) -> String {
    let mut out = String::from("📰 *Resumo Cripto do Dia*\n──────────────────────\n\n");
    out.push_str("🔥 *Mais Quentes do Momento*\n\n");
    render_section(&mut out, hot, "⚠️ Nenhuma notícia quente no momento.");

    out.push_str("\n🗞️ *Últimas Notícias*\n──────────────────────\n\n");
    render_section(&mut out, latest, "⚠️ Nenhuma notícia recente disponível.");

    out.trim().to_string()
}

fn render_section(out: &mut String, posts: &[Post], empty: &str) {
    if posts.is_empty() {
        out.push_str(empty);
        out.push('\n');
        return;
    }

    for (i, post) in posts.iter().take(MAX_ITEMS_PER_SECTION).enumerate() {
        out.push_str(&format!("*{}.* {}\n\n", i + 1, post.title.trim()));
    }
    out.push_str(&format!("🔗 (Fonte: {})\n", SOURCE_LINK));
}
