use chrono::{DateTime, Datelike, Utc};

use crate::alerts::CategoryShare;
use crate::models::Category;

pub const NO_SPENDING_TIP: &str =
    "💡 Comece a registrar seus gastos para receber dicas personalizadas!";

fn tips_for(category: Category) -> &'static [&'static str; 4] {
    match category {
        Category::Alimentacao => &[
            "🍽️ Planeje suas refeições semanalmente para evitar desperdício e compras por impulso.",
            "🥗 Cozinhar em casa pode economizar até 60% comparado a comer fora.",
            "🛒 Faça uma lista de compras e evite ir ao mercado com fome.",
            "📦 Compre alimentos em maior quantidade quando estiverem em promoção.",
        ],
        Category::Transporte => &[
            "🚗 Considere usar transporte público ou compartilhado para economizar com combustível.",
            "🚴 Para distâncias curtas, caminhar ou usar bicicleta economiza e faz bem à saúde.",
            "⛽ Mantenha o carro bem calibrado e faça manutenções preventivas para economizar combustível.",
            "🚕 Avalie se vale a pena ter um carro próprio ou usar aplicativos de transporte.",
        ],
        Category::Lazer => &[
            "🎬 Procure por eventos gratuitos ou com desconto na sua cidade.",
            "📚 Bibliotecas públicas oferecem livros, filmes e até cursos gratuitamente.",
            "🏞️ Aproveite parques e espaços públicos para atividades de lazer.",
            "🎮 Compartilhe assinaturas de streaming com amigos ou familiares.",
        ],
        Category::Saude => &[
            "💊 Compare preços de medicamentos em diferentes farmácias e considere genéricos.",
            "🏃 Prevenir é mais barato que remediar: invista em hábitos saudáveis.",
            "🩺 Use o sistema público de saúde quando possível.",
            "💰 Considere um plano de saúde com coparticipação se usar pouco.",
        ],
        Category::Vestuario => &[
            "👕 Compre roupas fora de estação quando estão em promoção.",
            "♻️ Considere brechós e bazares para peças de qualidade por menos.",
            "🧵 Aprenda consertos básicos para prolongar a vida das suas roupas.",
            "🛍️ Evite compras por impulso: espere 24h antes de comprar algo não essencial.",
        ],
        Category::Educacao => &[
            "📖 Busque cursos gratuitos online em plataformas como Coursera, edX e YouTube.",
            "📚 Compartilhe livros com amigos ou use bibliotecas.",
            "🎓 Verifique se sua empresa oferece auxílio educação.",
            "💻 Muitas instituições oferecem bolsas parciais ou integrais.",
        ],
        Category::Moradia => &[
            "💡 Troque lâmpadas por LED para economizar até 80% na conta de luz.",
            "🚿 Reduza o tempo no chuveiro e conserte vazamentos rapidamente.",
            "❄️ Use ar-condicionado com moderação e mantenha filtros limpos.",
            "📱 Renegocie contratos de internet, TV e telefone anualmente.",
        ],
        Category::Outros => &[
            "📊 Categorize melhor seus gastos para identificar onde economizar.",
            "💰 Estabeleça um limite mensal e acompanhe seus gastos regularmente.",
            "🎯 Defina metas financeiras claras e trabalhe para alcançá-las.",
            "📝 Revise seus gastos semanalmente para manter o controle.",
        ],
    }
}

/// Savings tip for the biggest spending category, rotating daily
pub fn savings_tip(top_categories: &[CategoryShare], today: DateTime<Utc>) -> &'static str {
    let Some(top) = top_categories.first() else {
        return NO_SPENDING_TIP;
    };
    let tips = tips_for(top.category);
    tips[today.ordinal0() as usize % tips.len()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn share(category: Category) -> CategoryShare {
        CategoryShare {
            category,
            amount: 100.0,
            percent: 100.0,
        }
    }

    #[test]
    fn test_no_spending() {
        assert_eq!(savings_tip(&[], Utc::now()), NO_SPENDING_TIP);
    }

    #[test]
    fn test_tip_comes_from_top_category() {
        let day = Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap();
        let tip = savings_tip(&[share(Category::Moradia), share(Category::Lazer)], day);
        assert_eq!(tip, tips_for(Category::Moradia)[0]);
    }

    #[test]
    fn test_tip_rotates_by_day() {
        let first = Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap();
        let second = Utc.with_ymd_and_hms(2024, 1, 2, 8, 0, 0).unwrap();
        let fifth = Utc.with_ymd_and_hms(2024, 1, 5, 8, 0, 0).unwrap();
        let top = [share(Category::Transporte)];

        assert_ne!(savings_tip(&top, first), savings_tip(&top, second));
        assert_eq!(savings_tip(&top, first), savings_tip(&top, fifth));
    }
}
