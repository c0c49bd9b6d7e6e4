//! Rendering of chat replies

use chrono::{DateTime, Utc};
use std::fmt::Write;

use crate::alerts::{
    AlertLevel, AlertScope, EXCEEDED_PERCENT, LimitAlert, MonthStatus, WARNING_PERCENT, percent_used,
    threshold,
};
use crate::models::{CategoryLimit, Expense, YearMonth};
use crate::service::{CategorySpending, MonthlyReport};

/// Brazilian currency notation: `R$ 1.234,56`
pub fn format_brl(value: f64) -> String {
    let cents = (value * 100.0).round() as i64;
    let sign = if cents < 0 { "-" } else { "" };
    let cents = cents.unsigned_abs();
    let digits = (cents / 100).to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    format!("{sign}R$ {grouped},{:02}", cents % 100)
}

pub fn format_date(date: &DateTime<Utc>) -> String {
    date.format("%d/%m/%Y").to_string()
}

pub fn add_expense_message(expense: &Expense) -> String {
    format!(
        "✅ Gasto registrado com sucesso!\n\n📝 ID: {}\n💰 Valor: {}\n🏷️ Categoria: {}\n💳 Pagamento: {}\n📅 Data: {}",
        expense.id,
        format_brl(expense.amount),
        expense.category.label(),
        expense.payment_method.label(),
        format_date(&expense.date)
    )
}

pub fn delete_expense_message(expense: &Expense) -> String {
    format!(
        "🗑️ Gasto excluído com sucesso!\n\n📝 ID: {}\n💰 Valor: {}\n🏷️ Categoria: {}",
        expense.id,
        format_brl(expense.amount),
        expense.category.label()
    )
}

pub fn expense_not_found_message(id: u64) -> String {
    format!("❌ Gasto com ID {id} não encontrado.")
}

pub fn error_message(reason: &str) -> String {
    format!(
        "❌ Erro: {reason}\n\n💡 Exemplos de comandos:\n\
         • \"Adicionar gasto de R$ 50 em alimentação no cartão\"\n\
         • \"Excluir gasto 123\"\n\
         • \"Mostrar relatório de gastos do mês\"\n\
         • \"Quanto gastei em transporte?\"\n\
         • \"Definir limite mensal de R$ 2000\"\n\
         • \"Definir limite de R$ 300 para lazer\""
    )
}

pub fn general_limit_message(limit: f64, month: YearMonth) -> String {
    format!(
        "🎯 Limite mensal definido com sucesso!\n\n💰 Valor: {}\n📅 Mês: {month}\n\nVocê receberá alertas quando se aproximar do limite.",
        format_brl(limit)
    )
}

pub fn category_limit_message(limit: &CategoryLimit) -> String {
    format!(
        "✅ Limite definido com sucesso!\n\n📁 Categoria: {}\n💰 Limite mensal: {}",
        limit.category.label(),
        format_brl(limit.monthly_limit)
    )
}

/// Alert lines appended to an add-expense confirmation; empty without alerts
pub fn limit_alerts_block(alerts: &[LimitAlert]) -> String {
    if alerts.is_empty() {
        return String::new();
    }

    let mut out = String::from("\n\n");
    for alert in alerts {
        let headline = match (alert.level, alert.scope) {
            (AlertLevel::Exceeded, AlertScope::General) => {
                "🚨 ATENÇÃO: Você excedeu seu limite mensal geral!".to_string()
            }
            (AlertLevel::Exceeded, AlertScope::Category(c)) => {
                format!("🚨 ATENÇÃO: Você excedeu o limite da categoria \"{}\"!", c.label())
            }
            (AlertLevel::Warning, AlertScope::General) => format!(
                "⚠️ ALERTA: Você já utilizou {:.1}% do seu limite mensal geral!",
                alert.percent
            ),
            (AlertLevel::Warning, AlertScope::Category(c)) => format!(
                "⚠️ ALERTA: Você já utilizou {:.1}% do limite da categoria \"{}\"!",
                alert.percent,
                c.label()
            ),
        };
        let _ = writeln!(out, "{headline}");
        let _ = writeln!(
            out,
            "   Gasto: {} / Limite: {}",
            format_brl(alert.spent),
            format_brl(alert.limit)
        );
    }
    out
}

pub fn monthly_report(report: &MonthlyReport) -> String {
    let mut out = String::from("📊 RELATÓRIO MENSAL DE GASTOS\n\n");
    let _ = writeln!(out, "💰 Total gasto: {}", format_brl(report.total));

    if let Some(percent) = percent_used(report.total, report.general_limit) {
        let remaining = report.general_limit - report.total;
        let _ = writeln!(out, "🎯 Limite mensal: {}", format_brl(report.general_limit));
        let _ = writeln!(out, "📈 Utilizado: {percent:.1}%");
        if remaining > 0.0 {
            let _ = writeln!(out, "✅ Disponível: {}", format_brl(remaining));
        } else {
            let _ = writeln!(out, "⚠️ LIMITE EXCEDIDO em {}!", format_brl(remaining.abs()));
        }
    }

    out.push_str("\n📂 POR CATEGORIA:\n");
    let mut categories: Vec<_> = report.by_category.iter().collect();
    categories.sort_by(|a, b| b.1.total_cmp(a.1));
    if categories.is_empty() {
        out.push_str("Nenhum gasto registrado ainda.\n");
    }
    for (category, amount) in categories {
        let _ = writeln!(
            out,
            "• {}: {} ({:.1}%)",
            category.label(),
            format_brl(*amount),
            share(*amount, report.total)
        );
    }

    out.push_str("\n💳 POR FORMA DE PAGAMENTO:\n");
    let mut methods: Vec<_> = report.by_payment_method.iter().collect();
    methods.sort_by(|a, b| b.1.total_cmp(a.1));
    for (method, amount) in methods {
        let _ = writeln!(
            out,
            "• {}: {} ({:.1}%)",
            method.label(),
            format_brl(*amount),
            share(*amount, report.total)
        );
    }

    out.push_str("\n📋 ÚLTIMOS GASTOS:\n");
    let mut recent: Vec<&Expense> = report.expenses.iter().collect();
    recent.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));
    if recent.is_empty() {
        out.push_str("Nenhum gasto registrado ainda.\n");
    }
    for expense in recent.into_iter().take(5) {
        let _ = writeln!(
            out,
            "• [{}] {} - {} ({})",
            expense.id,
            format_brl(expense.amount),
            expense.category.label(),
            format_date(&expense.date)
        );
    }

    if !report.category_limits.is_empty() {
        out.push_str("\n📋 *Limites por Categoria:*\n");
        for limit in &report.category_limits {
            let spent = report.by_category.get(&limit.category).copied().unwrap_or(0.0);
            let percent = percent_used(spent, limit.monthly_limit).unwrap_or(0.0);
            let _ = write!(
                out,
                "\n{}: {} / {} ({percent:.1}%)",
                limit.category.label(),
                format_brl(spent),
                format_brl(limit.monthly_limit)
            );
        }
    }

    out
}

fn share(amount: f64, total: f64) -> f64 {
    if total > 0.0 { amount / total * 100.0 } else { 0.0 }
}

pub fn category_report(spending: &CategorySpending) -> String {
    let mut out = format!("📊 *Gastos em {}*\n\n", spending.category.label());
    let _ = writeln!(out, "💰 Total gasto: {}", format_brl(spending.total));

    match (spending.limit, spending.percent) {
        (Some(limit), Some(percent)) => {
            let _ = writeln!(out, "🎯 Limite definido: {}", format_brl(limit));
            let _ = writeln!(out, "📈 Utilizado: {percent:.1}%");
            if percent >= EXCEEDED_PERCENT {
                out.push_str("\n🚨 Limite excedido!");
            } else if percent >= WARNING_PERCENT {
                out.push_str("\n⚠️ Atenção: próximo do limite!");
            }
        }
        _ => out.push_str("\nℹ️ Nenhum limite definido para esta categoria."),
    }
    out
}

/// Daily financial-education summary
pub fn daily_summary(status: &MonthStatus, tip: &str) -> String {
    let mut out = String::from("📊 RESUMO FINANCEIRO DO MÊS\n\n");
    let _ = writeln!(out, "💰 Total gasto: {}", format_brl(status.total_spent));

    if status.general_limit > 0.0 {
        let _ = writeln!(out, "🎯 Limite mensal: {}", format_brl(status.general_limit));
        let _ = writeln!(out, "📈 Utilizado: {:.1}%", status.percent_used);
        if status.remaining > 0.0 {
            let _ = writeln!(out, "✅ Saldo disponível: {}", format_brl(status.remaining));
        } else {
            let _ = writeln!(
                out,
                "🚨 Limite excedido em: {}",
                format_brl(status.remaining.abs())
            );
        }
    } else {
        out.push_str("⚠️ Você ainda não definiu um limite mensal.\n");
    }

    if !status.top_categories.is_empty() {
        out.push_str("\n📂 PRINCIPAIS GASTOS:\n");
        for (i, cat) in status.top_categories.iter().enumerate() {
            let medal = match i {
                0 => "🥇",
                1 => "🥈",
                _ => "🥉",
            };
            let _ = writeln!(
                out,
                "{medal} {}: {} ({:.1}%)",
                cat.category.label(),
                format_brl(cat.amount),
                cat.percent
            );
        }
    }

    if !status.alerts.is_empty() {
        out.push_str("\n⚠️ ALERTAS:\n");
        for alert in &status.alerts {
            let _ = writeln!(out, "{alert}");
        }
    }

    let _ = writeln!(out, "\n💡 DICA DE ECONOMIA:\n{tip}");

    if status.general_limit > 0.0 {
        out.push_str(match threshold(status.total_spent, status.general_limit) {
            Some(AlertLevel::Exceeded) => {
                "\n🚨 Cuidado! Você excedeu seu limite. Hora de ajustar seus gastos! 💪"
            }
            Some(AlertLevel::Warning) => {
                "\n⚠️ Atenção! Você está próximo do seu limite. Revise seus gastos! 🎯"
            }
            None => "\n✨ Parabéns! Você está no controle das suas finanças! Continue assim! 💪",
        });
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alerts::{CategoryShare, MonthStatus};
    use crate::models::{Category, PaymentMethod, User};
    use chrono::TimeZone;
    use std::collections::BTreeMap;

    fn expense(id: u64, amount: f64, category: Category, day: u32) -> Expense {
        Expense {
            id,
            user_id: 1,
            date: Utc.with_ymd_and_hms(2024, 3, day, 10, 0, 0).unwrap(),
            description: String::new(),
            amount,
            category,
            payment_method: PaymentMethod::Pix,
        }
    }

    #[test]
    fn test_format_brl() {
        assert_eq!(format_brl(0.0), "R$ 0,00");
        assert_eq!(format_brl(50.0), "R$ 50,00");
        assert_eq!(format_brl(50.9), "R$ 50,90");
        assert_eq!(format_brl(999.999), "R$ 1.000,00");
        assert_eq!(format_brl(1234.56), "R$ 1.234,56");
        assert_eq!(format_brl(1_234_567.0), "R$ 1.234.567,00");
        assert_eq!(format_brl(-5.0), "-R$ 5,00");
    }

    #[test]
    fn test_format_date() {
        let date = Utc.with_ymd_and_hms(2024, 3, 5, 23, 0, 0).unwrap();
        assert_eq!(format_date(&date), "05/03/2024");
    }

    #[test]
    fn test_add_expense_message() {
        let msg = add_expense_message(&expense(12, 50.0, Category::Alimentacao, 5));
        assert!(msg.starts_with("✅ Gasto registrado com sucesso!"));
        assert!(msg.contains("📝 ID: 12"));
        assert!(msg.contains("💰 Valor: R$ 50,00"));
        assert!(msg.contains("🏷️ Categoria: Alimentação"));
        assert!(msg.contains("💳 Pagamento: PIX"));
        assert!(msg.contains("📅 Data: 05/03/2024"));
    }

    #[test]
    fn test_limit_alerts_block() {
        assert_eq!(limit_alerts_block(&[]), "");

        let alerts = [
            LimitAlert {
                scope: AlertScope::General,
                level: AlertLevel::Exceeded,
                percent: 110.0,
                spent: 1100.0,
                limit: 1000.0,
            },
            LimitAlert {
                scope: AlertScope::Category(Category::Lazer),
                level: AlertLevel::Warning,
                percent: 85.0,
                spent: 85.0,
                limit: 100.0,
            },
        ];
        let block = limit_alerts_block(&alerts);
        assert!(block.starts_with("\n\n🚨 ATENÇÃO: Você excedeu seu limite mensal geral!\n"));
        assert!(block.contains("   Gasto: R$ 1.100,00 / Limite: R$ 1.000,00\n"));
        assert!(block.contains("⚠️ ALERTA: Você já utilizou 85.0% do limite da categoria \"Lazer\"!"));
    }

    #[test]
    fn test_monthly_report_sections() {
        let mut by_category = BTreeMap::new();
        by_category.insert(Category::Lazer, 25.0);
        by_category.insert(Category::Alimentacao, 75.0);
        let mut by_payment_method = BTreeMap::new();
        by_payment_method.insert(PaymentMethod::Pix, 100.0);

        let report = MonthlyReport {
            user: User {
                id: 1,
                phone: "1".to_string(),
                created_at: Utc::now(),
                monthly_limit: 80.0,
            },
            expenses: vec![
                expense(1, 75.0, Category::Alimentacao, 1),
                expense(2, 25.0, Category::Lazer, 2),
            ],
            total: 100.0,
            by_category,
            by_payment_method,
            general_limit: 80.0,
            category_limits: vec![CategoryLimit {
                id: 1,
                user_id: 1,
                category: Category::Lazer,
                monthly_limit: 50.0,
            }],
        };

        let text = monthly_report(&report);
        assert!(text.contains("💰 Total gasto: R$ 100,00"));
        assert!(text.contains("📈 Utilizado: 125.0%"));
        assert!(text.contains("⚠️ LIMITE EXCEDIDO em R$ 20,00!"));
        let food = text.find("• Alimentação: R$ 75,00 (75.0%)").unwrap();
        let fun = text.find("• Lazer: R$ 25,00 (25.0%)").unwrap();
        assert!(food < fun);
        assert!(text.contains("• PIX: R$ 100,00 (100.0%)"));
        let newest = text.find("• [2]").unwrap();
        let oldest = text.find("• [1]").unwrap();
        assert!(newest < oldest);
        assert!(text.contains("\nLazer: R$ 25,00 / R$ 50,00 (50.0%)"));
    }

    #[test]
    fn test_monthly_report_same_instant_lists_higher_id_first() {
        let mut by_category = BTreeMap::new();
        by_category.insert(Category::Lazer, 60.0);

        let report = MonthlyReport {
            user: User {
                id: 1,
                phone: "1".to_string(),
                created_at: Utc::now(),
                monthly_limit: 0.0,
            },
            expenses: vec![
                expense(3, 10.0, Category::Lazer, 4),
                expense(5, 20.0, Category::Lazer, 4),
                expense(4, 30.0, Category::Lazer, 4),
            ],
            total: 60.0,
            by_category,
            by_payment_method: BTreeMap::new(),
            general_limit: 0.0,
            category_limits: vec![],
        };

        let text = monthly_report(&report);
        let five = text.find("• [5]").unwrap();
        let four = text.find("• [4]").unwrap();
        let three = text.find("• [3]").unwrap();
        assert!(five < four && four < three);
    }

    #[test]
    fn test_monthly_report_empty() {
        let report = MonthlyReport {
            user: User {
                id: 1,
                phone: "1".to_string(),
                created_at: Utc::now(),
                monthly_limit: 0.0,
            },
            expenses: vec![],
            total: 0.0,
            by_category: BTreeMap::new(),
            by_payment_method: BTreeMap::new(),
            general_limit: 0.0,
            category_limits: vec![],
        };
        let text = monthly_report(&report);
        assert!(!text.contains("Limite mensal"));
        assert_eq!(text.matches("Nenhum gasto registrado ainda.").count(), 2);
    }

    #[test]
    fn test_category_report() {
        let near = CategorySpending {
            category: Category::Transporte,
            total: 90.0,
            limit: Some(100.0),
            percent: Some(90.0),
        };
        let text = category_report(&near);
        assert!(text.starts_with("📊 *Gastos em Transporte*"));
        assert!(text.contains("📈 Utilizado: 90.0%"));
        assert!(text.ends_with("⚠️ Atenção: próximo do limite!"));

        let unlimited = CategorySpending {
            category: Category::Transporte,
            total: 90.0,
            limit: None,
            percent: None,
        };
        assert!(category_report(&unlimited).ends_with("Nenhum limite definido para esta categoria."));
    }

    #[test]
    fn test_daily_summary() {
        let status = MonthStatus {
            total_spent: 300.0,
            general_limit: 1000.0,
            percent_used: 30.0,
            remaining: 700.0,
            top_categories: vec![
                CategoryShare {
                    category: Category::Moradia,
                    amount: 200.0,
                    percent: 66.7,
                },
                CategoryShare {
                    category: Category::Lazer,
                    amount: 100.0,
                    percent: 33.3,
                },
            ],
            alerts: vec![],
        };
        let text = daily_summary(&status, "dica");
        assert!(text.contains("✅ Saldo disponível: R$ 700,00"));
        assert!(text.contains("🥇 Moradia: R$ 200,00 (66.7%)"));
        assert!(text.contains("🥈 Lazer: R$ 100,00 (33.3%)"));
        assert!(text.contains("💡 DICA DE ECONOMIA:\ndica\n"));
        assert!(text.ends_with("Continue assim! 💪"));
        assert!(!text.contains("ALERTAS"));
    }

    #[test]
    fn test_daily_summary_without_limit() {
        let status = MonthStatus {
            total_spent: 0.0,
            general_limit: 0.0,
            percent_used: 0.0,
            remaining: 0.0,
            top_categories: vec![],
            alerts: vec![],
        };
        let text = daily_summary(&status, "dica");
        assert!(text.contains("⚠️ Você ainda não definiu um limite mensal."));
        assert!(text.ends_with("dica\n"));
    }

    #[test]
    fn test_error_message_lists_examples() {
        let msg = error_message("Não consegui entender seu comando.");
        assert!(msg.starts_with("❌ Erro: Não consegui entender seu comando."));
        assert!(msg.contains("Excluir gasto 123"));
    }
}
