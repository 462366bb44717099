//! Message intent classification for the WhatsApp bot.
//!
//! Turns free-form chat text into exactly one [`Intent`] using an ordered
//! set of rules, and keeps the canned reply pools for greetings and
//! interactions.

mod classifier;
mod intent;
mod keywords;
mod normalize;
mod replies;

pub use classifier::{Router, RouterConfig};
pub use intent::Intent;
pub use keywords::{
    default_greetings, default_interactions, Category, DEFAULT_ADD_PHRASES,
    DEFAULT_REMOVE_PHRASES, DEFAULT_TRIGGER_WORD,
};
pub use normalize::{normalize, tokenize};
pub use replies::ReplyPools;

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::mock::StepRng;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn router() -> Router {
        Router::default()
    }

    fn router_without_ai() -> Router {
        Router::new(RouterConfig {
            ai_enabled: false,
            ..RouterConfig::default()
        })
    }

    #[test]
    fn test_explicit_commands() {
        let r = router();
        assert_eq!(r.classify("!ping"), Intent::Ping);
        assert_eq!(r.classify("  !PING "), Intent::Ping);
        assert_eq!(r.classify("!help"), Intent::Help);
        assert_eq!(r.classify("!CryptoNews"), Intent::CryptoNews);
    }

    #[test]
    fn test_command_beats_interaction() {
        // "ping" is also an interaction alias.
        assert_eq!(router().classify("!ping"), Intent::Ping);
        assert_eq!(
            router().classify("ping"),
            Intent::Interaction("ping".into())
        );
    }

    #[test]
    fn test_price_lookup() {
        let r = router();
        assert_eq!(r.classify("!btc"), Intent::CryptoPrice("btc".into()));
        assert_eq!(r.classify("!ETH"), Intent::CryptoPrice("eth".into()));
        assert_eq!(r.classify("! sol "), Intent::CryptoPrice("sol".into()));
    }

    #[test]
    fn test_bare_bang_is_ignored() {
        assert_eq!(router().classify("!"), Intent::Ignored);
        assert_eq!(router().classify("  !  "), Intent::Ignored);
    }

    #[test]
    fn test_greetings_match_whole_tokens() {
        let r = router();
        assert_eq!(r.classify("bom dia time"), Intent::Greeting("bomdia".into()));
        assert_eq!(r.classify("Boa Noite!!"), Intent::Greeting("boanoite".into()));
        assert_eq!(r.classify("E aí, pessoal"), Intent::Greeting("oi".into()));
        assert_eq!(r.classify("Olá"), Intent::Greeting("ola".into()));
        // "oi" must not match inside "oito".
        assert_eq!(r.classify("oito horas"), Intent::Ignored);
    }

    #[test]
    fn test_greeting_beats_ai_trigger() {
        assert_eq!(
            router().classify("renan, bom dia"),
            Intent::Greeting("bomdia".into())
        );
    }

    #[test]
    fn test_interactions_match_substrings() {
        let r = router();
        assert_eq!(r.classify("teste de sistema"), Intent::Interaction("teste".into()));
        assert_eq!(r.classify("Tá aí?"), Intent::Interaction("taai".into()));
        assert_eq!(r.classify("o bot caiu?"), Intent::Interaction("bot".into()));
    }

    #[test]
    fn test_admin_phrases_keep_original_text() {
        let r = router();
        let text = "Renan, adicione o número 55 11 99999-0000";
        assert_eq!(r.classify(text), Intent::AdminAddNumber(text.into()));

        let text = "renan REMOVA o numero 5511999990000";
        assert_eq!(r.classify(text), Intent::AdminRemoveNumber(text.into()));
    }

    #[test]
    fn test_admin_phrase_never_reaches_ai() {
        let r = router();
        for text in [
            "renan adicione o número 5511999990000",
            "renan adiciona o numero 5511999990000 por favor",
            "renan remove o número 5511999990000",
        ] {
            let intent = r.classify(text);
            assert!(intent.is_admin(), "{} classified as {}", text, intent);
        }
    }

    #[test]
    fn test_ai_chat_requires_trigger() {
        let r = router();
        assert_eq!(
            r.classify("  renan qual a capital da frança? "),
            Intent::AiChat("renan qual a capital da frança?".into())
        );
        assert_eq!(r.classify("qual a capital da frança?"), Intent::Ignored);
    }

    #[test]
    fn test_ai_disabled_ignores_trigger_text() {
        let r = router_without_ai();
        assert_eq!(r.classify("renan qual a capital da frança?"), Intent::Ignored);
        assert_eq!(r.classify("renan adicione o número 5511999990000"), Intent::Ignored);
        // Commands still work.
        assert_eq!(r.classify("!ping"), Intent::Ping);
    }

    #[test]
    fn test_custom_trigger_and_phrases() {
        let r = Router::new(RouterConfig {
            trigger_word: "Robô".into(),
            add_phrases: vec!["libera o".into()],
            remove_phrases: vec!["bloqueia o".into()],
            ..RouterConfig::default()
        });
        assert!(matches!(
            r.classify("robo libera o 5511999990000"),
            Intent::AdminAddNumber(_)
        ));
        assert!(matches!(
            r.classify("robô bloqueia o 5511999990000"),
            Intent::AdminRemoveNumber(_)
        ));
        assert!(matches!(r.classify("renan me ajuda"), Intent::Ignored));
    }

    #[test]
    fn test_empty_text_is_ignored() {
        assert_eq!(router().classify(""), Intent::Ignored);
        assert_eq!(router().classify("   "), Intent::Ignored);
    }

    #[test]
    fn test_reply_pick_is_injectable() {
        let pools = ReplyPools::from_config(&RouterConfig::default());
        let mut rng = StepRng::new(0, 0);

        let reply = pools.pick("ping", &mut rng).unwrap();
        assert_eq!(reply, "🏓 Pong!");
        assert!(pools.pick("unknown", &mut rng).is_none());
    }

    #[test]
    fn test_reply_pick_stays_in_pool() {
        let pools = ReplyPools::from_config(&RouterConfig::default());
        let mut rng = StdRng::seed_from_u64(7);

        for category in ["bomdia", "boatarde", "oi", "teste", "bot"] {
            for _ in 0..10 {
                let reply = pools.pick(category, &mut rng).unwrap();
                assert!(pools.replies(category).iter().any(|r| r == reply));
            }
        }
    }

    #[test]
    fn test_every_category_has_replies() {
        let config = RouterConfig::default();
        for category in config.greetings.iter().chain(config.interactions.iter()) {
            assert!(!category.replies.is_empty(), "{} has no replies", category.name);
            assert!(!category.aliases.is_empty(), "{} has no aliases", category.name);
        }
    }

    #[test]
    fn test_intent_labels() {
        assert_eq!(Intent::CryptoPrice("btc".into()).to_string(), "crypto_price(btc)");
        assert_eq!(Intent::AiChat("secret".into()).to_string(), "ai_chat");
        assert!(!Intent::Ping.is_admin());
    }
}
