//! Default keyword tables and reply pools.

/// A canonical category: the spellings that select it and the replies it offers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub name: String,
    pub aliases: Vec<String>,
    pub replies: Vec<String>,
}

impl Category {
    pub fn new(name: &str, aliases: &[&str], replies: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            aliases: aliases.iter().map(|s| s.to_string()).collect(),
            replies: replies.iter().map(|s| s.to_string()).collect(),
        }
    }
}

type Entry = (&'static str, &'static [&'static str], &'static [&'static str]);

const GREETINGS: &[Entry] = &[
    (
        "bomdia",
        &["bom dia", "b dia", "bdia"],
        &[
            "🌞 Bom dia, guerreiro!",
            "☕ Bom dia! Que hoje seja incrível!",
            "👊 Bom dia, bora vencer mais um dia!",
            "✨ Bom dia! Nova chance de vencer.",
        ],
    ),
    (
        "boatarde",
        &["boa tarde", "boa tardi", "boa trde"],
        &[
            "🌤️ Boa tarde! Força total no meio do dia!",
            "📈 Boa tarde! Produtividade nas alturas!",
            "⚡ Boa tarde! Vamos com tudo!",
        ],
    ),
    (
        "boanoite",
        &["boa noite", "boanoite", "boa noti"],
        &[
            "🌙 Boa noite! Hora de recarregar.",
            "🛌 Boa noite! Durma com os anjos.",
            "😴 Boa noite, guerreiro. Amanhã tem mais luta!",
        ],
    ),
    (
        "oi",
        &["oi", "e aí", "eai", "iae", "oii"],
        &[
            "👋 Oi! Tudo certo por aí?",
            "E aí! Como vai você?",
            "Salve, salve!",
            "Opa! Cheguei na hora certa?",
        ],
    ),
    (
        "ola",
        &["olá", "ola", "olaaa"],
        &[
            "Olá! Seja bem-vindo!",
            "Oiê! Chegou bem na hora.",
            "👋 Olá! Tudo tranquilo?",
        ],
    ),
    (
        "salve",
        &["salve", "salvee"],
        &[
            "👊 Salve, parceiro!",
            "Salve! Tamo junto!",
            "Salve, salve! Que a força esteja com você.",
        ],
    ),
    (
        "opa",
        &["opa", "opaaa", "oopaa"],
        &["Opa! Tudo beleza?", "E aí, opa!", "Fala aí! 👋"],
    ),
];

const INTERACTIONS: &[Entry] = &[
    (
        "ping",
        &["ping"],
        &[
            "🏓 Pong!",
            "✅ Estou online!",
            "💡 Funcionando perfeitamente.",
            "📶 Sinal forte por aqui.",
        ],
    ),
    (
        "teste",
        &["teste"],
        &[
            "🔍 Teste recebido com sucesso!",
            "✅ Testado e aprovado.",
            "🎯 Está tudo funcionando!",
        ],
    ),
    (
        "taai",
        &["tá aí"],
        &[
            "🙋‍♂️ Estou aqui!",
            "👀 Sempre observando...",
            "🤖 Operacional e aguardando comandos.",
        ],
    ),
    (
        "bot",
        &["bot"],
        &["Sim, senhor! 🤖", "Chamou o bot? Cheguei!"],
    ),
];

/// Default trigger word that routes free text to the AI service.
pub const DEFAULT_TRIGGER_WORD: &str = "renan";

/// Default phrases requesting a number be authorized.
pub const DEFAULT_ADD_PHRASES: &[&str] = &[
    "adicione o número",
    "adicionar o número",
    "adiciona o número",
];

/// Default phrases requesting a number be revoked.
pub const DEFAULT_REMOVE_PHRASES: &[&str] = &[
    "remova o número",
    "remover o número",
    "remove o número",
];

fn build(entries: &[Entry]) -> Vec<Category> {
    entries
        .iter()
        .map(|(name, aliases, replies)| Category::new(name, aliases, replies))
        .collect()
}

/// Greeting categories, matched token-wise.
pub fn default_greetings() -> Vec<Category> {
    build(GREETINGS)
}

/// Interaction categories, matched as substrings.
pub fn default_interactions() -> Vec<Category> {
    build(INTERACTIONS)
}
