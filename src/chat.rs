use anyhow::Result;

use crate::formatter;
use crate::models::{Category, YearMonth};
use crate::parser::{self, CommandKind, ParsedCommand};
use crate::service::FinanceService;

/// Reply to a chat message
#[derive(Debug, Clone, PartialEq)]
pub struct ChatReply {
    pub command: CommandKind,
    pub message: String,
}

/// Parse a chat message, apply it for the sender and render the reply
///
/// Messages that cannot be acted on (missing amount, missing id, unknown
/// intent) produce an explanatory reply rather than an error; errors are
/// reserved for storage failures.
pub async fn handle_message(service: &FinanceService, phone: &str, text: &str) -> Result<ChatReply> {
    let command = parser::parse(text);
    let kind = command.kind();
    tracing::debug!("Parsed message from {} as {:?}", phone, command);

    let message = match command {
        ParsedCommand::AddExpense {
            amount: None, ..
        } => formatter::error_message("Não foi possível identificar o valor do gasto."),
        ParsedCommand::AddExpense {
            amount: Some(amount),
            category,
            payment_method,
            description,
        } => {
            let (expense, alerts) = service
                .add_expense(phone, amount, category, payment_method, &description)
                .await?;
            let mut reply = formatter::add_expense_message(&expense);
            reply.push_str(&formatter::limit_alerts_block(&alerts));
            reply
        }
        ParsedCommand::DeleteExpense { expense_id: None } => {
            formatter::error_message("Não foi possível identificar o ID do gasto a excluir.")
        }
        ParsedCommand::DeleteExpense {
            expense_id: Some(id),
        } => match service.delete_expense(phone, id).await? {
            Some(expense) => formatter::delete_expense_message(&expense),
            None => formatter::expense_not_found_message(id),
        },
        ParsedCommand::Report {
            category: Some(category),
        } => {
            let spending = service.category_spending(phone, category).await?;
            formatter::category_report(&spending)
        }
        ParsedCommand::Report { category: None } => {
            let report = service.monthly_report(phone).await?;
            formatter::monthly_report(&report)
        }
        ParsedCommand::SetLimit { amount: None, .. } => {
            formatter::error_message("Não foi possível identificar o valor do limite.")
        }
        ParsedCommand::SetLimit {
            amount: Some(amount),
            category: Some(category),
        } if category != Category::Outros => {
            let limit = service.set_category_limit(phone, category, amount).await?;
            formatter::category_limit_message(&limit)
        }
        ParsedCommand::SetLimit {
            amount: Some(amount),
            ..
        } => {
            let user = service.set_general_limit(phone, amount).await?;
            formatter::general_limit_message(user.monthly_limit, YearMonth::current())
        }
        ParsedCommand::Unknown => formatter::error_message("Não consegui entender seu comando."),
    };

    Ok(ChatReply {
        command: kind,
        message,
    })
}
