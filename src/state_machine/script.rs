//! Fixed message scripts, one per state entered
//!
//! Copy is Brazilian Portuguese and the UI renders it verbatim, line breaks
//! included. Every script is the live page copy except [`doubt`], which is
//! written for this service.

use super::option::Plan;
use super::state::{ConvState, Intent};
use super::Message;

pub const SUPPORT_URL: &str = "https://suporteluna.lovable.app";
pub const SUPPORT_AUTH_URL: &str = "https://suporteluna.lovable.app/auth";

const AFFILIATE: &str = "aff=530c9cfe-fc36-4cd5-8ca5-2aaad880b6a4";

/// Checkout link for each plan
pub fn payment_url(plan: Plan) -> String {
    let product = match plan {
        Plan::Mensal => "3aac96c1-7db8-4bed-900a-a51664129a81",
        Plan::Anual => "4c835663-ac65-4908-9470-c70bfa3cc84c",
        Plan::Vitalicio => "29b91baf-cecf-47c9-a4eb-2f270c992af0",
    };
    format!("https://pay.kirvano.com/{product}?{AFFILIATE}")
}

// Screenshots are served by the host of the chat UI, not by this API, so the
// paths are relative to the page origin.
const APP_HOME_IMAGE: &str = "/assets/luna-app-home.jpg";
const APP_FILMES_IMAGE: &str = "/assets/luna-app-filmes.jpg";
const APP_SERIES_IMAGE: &str = "/assets/luna-app-series.jpg";
const APP_CANAIS_IMAGE: &str = "/assets/luna-app-canais.jpg";

fn offered(state: ConvState) -> Message {
    Message::options(state.offered_options())
}

fn checkout_warning() -> Message {
    Message::text("Atenção ⚠️\nPreenche seus dados certinho\ne coloca um WhatsApp válido 📲")
}

pub fn welcome() -> Vec<Message> {
    vec![
        Message::text("Oi! 👋 Seja Bem-vindo(a) à Luna TV! 🌙"),
        Message::text("Como posso te ajudar hoje?"),
        offered(ConvState::Welcome),
    ]
}

pub fn ask_name(intent: Intent) -> Vec<Message> {
    let context = match intent {
        Intent::Buy => "Ótima escolha! 🎉 Vou te mostrar tudo sobre a Luna TV.",
        Intent::Renew => "Que bom ter você de volta! 💜 Vou te ajudar com a renovação.",
    };
    vec![
        Message::text(context),
        Message::text("Para começar, qual é o seu nome? 😊"),
    ]
}

pub fn initial(name: &str) -> Vec<Message> {
    vec![
        Message::text(format!("Prazer em te conhecer, {name}! 🌟")),
        Message::text("Aqui é a Luna TV 🌙\nFilmes, séries e +2 mil canais ao vivo 📺🔥"),
        Message::text("O que você gostaria de fazer?"),
        offered(ConvState::Initial),
    ]
}

pub fn renovar(name: &str) -> Vec<Message> {
    vec![
        Message::text(format!("Prazer em te ver novamente, {name}! 🌟")),
        Message::text("Para renovar sua assinatura, escolha um dos planos abaixo 👇"),
    ]
}

pub fn suporte() -> Vec<Message> {
    vec![
        Message::text("Claro, estou aqui para te ajudar! 💪"),
        Message::text("Clique no botão abaixo para ser encaminhado para o suporte:"),
        Message::support(SUPPORT_URL),
    ]
}

pub fn plans(name: &str) -> Vec<Message> {
    vec![
        Message::text(format!("Show, {name}! 👏\nOlha os planos disponíveis 👇")),
        Message::text(
            "📺 Mensal – R$ 24,90\n📺 Anual – R$ 89,90 (2 telas)\n📺 Vitalício – R$ 250,00",
        ),
        Message::text(
            "Todos com acesso imediato a +40 mil filmes, séries e +2 mil canais ao vivo 🔥",
        ),
        Message::text("Qual plano você prefere?"),
        offered(ConvState::Plans),
    ]
}

pub fn trial(name: &str) -> Vec<Message> {
    vec![
        Message::text(format!("{name}, nosso teste é de 7 dias 😉")),
        Message::text("Você compra, usa normalmente\ne o dinheiro fica 100% seguro na Kirvano 💰"),
        Message::text("Se não gostar, a própria plataforma devolve 😉\nQuer ver os planos agora?"),
        offered(ConvState::Test),
    ]
}

pub fn conhecer_intro(name: &str) -> Vec<Message> {
    vec![
        Message::text(format!("{name}, que legal que você quer conhecer a Luna TV! 🌙✨")),
        Message::image(APP_HOME_IMAGE, "🏠 Olha como é organizado nosso app!"),
        Message::text("Me conta... você gosta de assistir filmes? 🎬"),
        offered(ConvState::ConhecerIntro),
    ]
}

pub fn conhecer_filmes() -> Vec<Message> {
    vec![
        Message::text("Que ótimo! 🎬🔥"),
        Message::text(
            "Temos mais de 40 MIL filmes!\nLançamentos de cinema, clássicos, ação, terror, comédia... 🍿",
        ),
        Message::image(APP_FILMES_IMAGE, "🎬 Olha nossa biblioteca de filmes!"),
        Message::text("E você curte séries também? Tipo Netflix, HBO...? 📺"),
        offered(ConvState::ConhecerFilmes),
    ]
}

pub fn conhecer_series() -> Vec<Message> {
    vec![
        Message::text("Você vai amar! 📺🔥"),
        Message::text(
            "Temos TODAS as séries da Netflix, Amazon, HBO Max, Disney+, Globoplay...\n\nSão mais de 1.000 séries só da Netflix! 😱",
        ),
        Message::image(APP_SERIES_IMAGE, "📺 Séries de TODAS as plataformas!"),
        Message::text("E o melhor: tudo atualizado! 🚀\nLançou episódio novo, já tá aqui!"),
        Message::text("Curte futebol ou outros esportes? ⚽"),
        offered(ConvState::ConhecerSeries),
    ]
}

pub fn conhecer_canais() -> Vec<Message> {
    vec![
        Message::text("Apaixonado por esportes? Você tá no lugar certo! ⚽🏆"),
        Message::text("Temos +2.000 canais ao vivo!\nTodos os jogos de futebol, UFC, NBA, F1... 🔥"),
        Message::image(APP_CANAIS_IMAGE, "📺 Canais ao vivo - Futebol, esportes, tudo!"),
        Message::text("Premiere, ESPN, SporTV, Globo, TNT Sports...\nTUDO liberado! 🎉"),
        offered(ConvState::ConhecerCanais),
    ]
}

pub fn conhecer_final(name: &str) -> Vec<Message> {
    vec![
        Message::text(format!("{name}, resumindo... 🌙")),
        Message::text(
            "🎬 +40 mil filmes\n📺 +1.000 séries\n⚽ +2.000 canais ao vivo\n💰 Economia de R$ 4.000/ano!",
        ),
        Message::text("Funciona na TV, celular, tablet e computador! 🔥"),
        offered(ConvState::ConhecerFinal),
    ]
}

pub fn dispositivos(name: &str) -> Vec<Message> {
    vec![
        Message::text(format!("{name}, a Luna TV funciona em praticamente TUDO! 🔥")),
        Message::text(
            "📱 Celulares e Tablets (Android/iPhone)\n📺 Smart TVs de todas as marcas\n💻 Computadores e Notebooks\n🎮 PlayStation e Xbox\n📡 TV Box e Fire Stick\n📲 Chromecast",
        ),
        Message::text("Não precisa de antena nem instalador!\nÉ só ter internet que funciona 🌐"),
        Message::text("Funciona até fora do Brasil! 🌍\nViajou? Leva sua Luna TV com você!"),
        Message::text("E ainda tem suporte pra te ajudar na instalação! 💪\nPronto pra garantir o seu?"),
        offered(ConvState::Dispositivos),
    ]
}

/// New copy. The live page has no script here and sends the visitor straight
/// to [`SUPPORT_AUTH_URL`]; this keeps them in the chat with that link as a
/// button.
pub fn doubt(name: &str) -> Vec<Message> {
    vec![
        Message::text(format!("Sem problemas, {name}! Nosso suporte tira todas as suas dúvidas 💬")),
        Message::support(SUPPORT_AUTH_URL),
        Message::text("Se preferir, posso te mostrar os planos de novo 👇"),
        offered(ConvState::Doubt),
    ]
}

/// Checkout script: context line, data-entry warning, payment CTA, closing line
pub fn checkout(plan: Plan, name: &str) -> Vec<Message> {
    let (context, closing) = match plan {
        Plan::Mensal => (
            format!("Boa escolha, {name}! 😄\nO Plano Mensal é perfeito pra testar tudo."),
            "Assim que pagar, o acesso chega rapidinho 🚀",
        ),
        Plan::Anual => (
            format!("Excelente escolha, {name}! 🔥\nEsse plano libera 2 telas ao mesmo tempo 📺📺"),
            "Você ainda tem 7 dias de garantia 😉",
        ),
        Plan::Vitalicio => (
            format!("Top demais, {name}! 😎🔥\nPaga uma vez só e aproveita pra sempre."),
            "Assim que pagar, acesso liberado pra sempre 🚀",
        ),
    };
    vec![
        Message::text(context),
        checkout_warning(),
        Message::payment(payment_url(plan)),
        Message::text(closing),
    ]
}

pub fn followup(name: &str) -> Vec<Message> {
    vec![
        Message::text(format!("Ei {name}, ainda tá por aí? 😊")),
        Message::text(
            "Se tiver alguma dúvida, posso te ajudar!\nOu quer conhecer melhor a Luna TV? 👇",
        ),
        offered(ConvState::Followup),
    ]
}
