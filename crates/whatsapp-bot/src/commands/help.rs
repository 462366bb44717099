//! Help and ping replies.

pub const PING_REPLY: &str = "🏓 Pong!";

/// Command and interaction listing.
pub fn help_text(trigger_word: &str) -> String {
    format!(
        r#"📖 *Comandos e interações disponíveis*:

🧪 *Comandos tradicionais*:
- !ping → Testa se o bot está online
- !help → Exibe esta mensagem de ajuda
- !cryptonews → Resumo das notícias cripto do momento
- !<moeda> → Cotação de uma criptomoeda (ex.: !btc, !eth, !sol)

🤖 *Interações naturais com o bot*:
- Diga: "ping", "teste", "tá aí", "bot"
- O bot vai responder com frases aleatórias

🌞 *Saudações automáticas*:
- "bom dia", "boa tarde", "boa noite"
- "oi", "olá", "salve", "opa"

🧠 *Inteligência artificial*:
- Mencione "{trigger}" na mensagem para conversar com a IA
- "{trigger}, adicione o número 55..." → autoriza um número
- "{trigger}, remova o número 55..." → revoga um número

💡 Dica: use linguagem natural! O bot entende mais do que apenas comandos. 😉"#,
        trigger = trigger_word
    )
}
