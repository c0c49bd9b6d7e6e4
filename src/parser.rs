//! Natural-language command parser for Portuguese chat messages

use regex::Regex;
use std::sync::OnceLock;

use crate::models::{Category, PaymentMethod};

/// A chat message turned into a structured command
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedCommand {
    AddExpense {
        amount: Option<f64>,
        category: Category,
        payment_method: PaymentMethod,
        description: String,
    },
    DeleteExpense {
        expense_id: Option<u64>,
    },
    /// Monthly report, or a single-category query when `category` is set
    Report {
        category: Option<Category>,
    },
    /// General limit, or a category limit when `category` is set
    SetLimit {
        amount: Option<f64>,
        category: Option<Category>,
    },
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    Add,
    Delete,
    Report,
    Limit,
    Unknown,
}

impl CommandKind {
    /// Name reported back to the webhook caller
    pub fn as_str(self) -> &'static str {
        match self {
            CommandKind::Add => "adicionar",
            CommandKind::Delete => "excluir",
            CommandKind::Report => "relatorio",
            CommandKind::Limit => "limite",
            CommandKind::Unknown => "desconhecido",
        }
    }
}

impl ParsedCommand {
    pub fn kind(&self) -> CommandKind {
        match self {
            ParsedCommand::AddExpense { .. } => CommandKind::Add,
            ParsedCommand::DeleteExpense { .. } => CommandKind::Delete,
            ParsedCommand::Report { .. } => CommandKind::Report,
            ParsedCommand::SetLimit { .. } => CommandKind::Limit,
            ParsedCommand::Unknown => CommandKind::Unknown,
        }
    }
}

// Checked in this order; the first group with a hit decides the intent.
// Verbs come before the noun "gasto" so "excluir gasto 3" is a delete.
const DELETE_KEYWORDS: &[&str] = &["excluir", "deletar", "remover", "apagar"];
const LIMIT_KEYWORDS: &[&str] = &["limite", "orçamento", "orcamento"];
const REPORT_KEYWORDS: &[&str] = &[
    "relatório",
    "relatorio",
    "mostrar",
    "listar",
    "resumo",
    "quanto gastei",
];
const ADD_KEYWORDS: &[&str] = &["adicionar", "registrar", "gastar", "gasto", "gastei", "paguei"];

/// Keyword to category, first match wins
const CATEGORY_KEYWORDS: &[(&str, Category)] = &[
    ("alimentação", Category::Alimentacao),
    ("alimentacao", Category::Alimentacao),
    ("comida", Category::Alimentacao),
    ("restaurante", Category::Alimentacao),
    ("mercado", Category::Alimentacao),
    ("supermercado", Category::Alimentacao),
    ("transporte", Category::Transporte),
    ("uber", Category::Transporte),
    ("taxi", Category::Transporte),
    ("táxi", Category::Transporte),
    ("ônibus", Category::Transporte),
    ("onibus", Category::Transporte),
    ("gasolina", Category::Transporte),
    ("combustível", Category::Transporte),
    ("combustivel", Category::Transporte),
    ("saúde", Category::Saude),
    ("saude", Category::Saude),
    ("médico", Category::Saude),
    ("medico", Category::Saude),
    ("farmácia", Category::Saude),
    ("farmacia", Category::Saude),
    ("remédio", Category::Saude),
    ("remedio", Category::Saude),
    ("educação", Category::Educacao),
    ("educacao", Category::Educacao),
    ("curso", Category::Educacao),
    ("livro", Category::Educacao),
    ("escola", Category::Educacao),
    ("lazer", Category::Lazer),
    ("cinema", Category::Lazer),
    ("diversão", Category::Lazer),
    ("diversao", Category::Lazer),
    ("entretenimento", Category::Lazer),
    ("moradia", Category::Moradia),
    ("aluguel", Category::Moradia),
    ("condomínio", Category::Moradia),
    ("condominio", Category::Moradia),
    ("luz", Category::Moradia),
    ("água", Category::Moradia),
    ("agua", Category::Moradia),
    ("vestuário", Category::Vestuario),
    ("vestuario", Category::Vestuario),
    ("roupa", Category::Vestuario),
    ("calçado", Category::Vestuario),
    ("calcado", Category::Vestuario),
];

// A number in Brazilian notation: "1.500,75", "50,00", "50.00", "50"
const NUMBER: &str = r"\d{1,3}(?:\.\d{3})+(?:,\d{1,2})?|\d+(?:[.,]\d{1,2})?";

fn amount_regexes() -> &'static [Regex; 3] {
    static REGEXES: OnceLock<[Regex; 3]> = OnceLock::new();
    REGEXES.get_or_init(|| {
        [
            Regex::new(&format!(r"r\$\s*({NUMBER})")).unwrap(),
            Regex::new(&format!(r"({NUMBER})\s*reais")).unwrap(),
            Regex::new(&format!(r"({NUMBER})")).unwrap(),
        ]
    })
}

fn integer_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"\d+").unwrap())
}

/// Parse a chat message into a command
pub fn parse(message: &str) -> ParsedCommand {
    let normalized = message.trim().to_lowercase();

    match detect_kind(&normalized) {
        CommandKind::Add => ParsedCommand::AddExpense {
            amount: extract_amount(&normalized),
            category: extract_category(&normalized).unwrap_or(Category::Outros),
            payment_method: extract_payment_method(&normalized),
            description: normalized,
        },
        CommandKind::Delete => ParsedCommand::DeleteExpense {
            expense_id: extract_expense_id(&normalized),
        },
        CommandKind::Report => ParsedCommand::Report {
            category: extract_named_category(&normalized),
        },
        CommandKind::Limit => ParsedCommand::SetLimit {
            amount: extract_amount(&normalized),
            category: extract_category(&normalized),
        },
        CommandKind::Unknown => ParsedCommand::Unknown,
    }
}

fn contains_any(message: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| message.contains(k))
}

fn detect_kind(message: &str) -> CommandKind {
    if contains_any(message, DELETE_KEYWORDS) {
        CommandKind::Delete
    } else if contains_any(message, LIMIT_KEYWORDS) {
        CommandKind::Limit
    } else if contains_any(message, REPORT_KEYWORDS) {
        CommandKind::Report
    } else if contains_any(message, ADD_KEYWORDS) {
        CommandKind::Add
    } else {
        CommandKind::Unknown
    }
}

/// First finite positive amount, preferring "R$ n", then "n reais", then any number
pub fn extract_amount(message: &str) -> Option<f64> {
    amount_regexes()
        .iter()
        .find_map(|re| re.captures(message))
        .and_then(|cap| parse_brl_number(&cap[1]))
        .filter(|value| value.is_finite() && *value > 0.0)
}

/// Parse a number written with Brazilian separators
///
/// A comma is always the decimal separator. Without a comma, dots followed
/// by exactly three digits are thousands separators.
pub fn parse_brl_number(raw: &str) -> Option<f64> {
    let normalized = if raw.contains(',') {
        raw.replace('.', "").replace(',', ".")
    } else if is_thousands_grouped(raw) {
        raw.replace('.', "")
    } else {
        raw.to_string()
    };
    normalized.parse().ok()
}

fn is_thousands_grouped(raw: &str) -> bool {
    let mut groups = raw.split('.');
    groups.next();
    let rest: Vec<&str> = groups.collect();
    !rest.is_empty() && rest.iter().all(|g| g.len() == 3)
}

fn extract_category(message: &str) -> Option<Category> {
    CATEGORY_KEYWORDS
        .iter()
        .find(|(keyword, _)| message.contains(keyword))
        .map(|(_, category)| *category)
}

/// Category mentioned by its own name ("alimentação", "saude", ...)
fn extract_named_category(message: &str) -> Option<Category> {
    Category::ALL
        .into_iter()
        .filter(|c| *c != Category::Outros)
        .find(|c| message.contains(c.as_str()) || message.contains(&c.label().to_lowercase()))
}

fn extract_payment_method(message: &str) -> PaymentMethod {
    if contains_any(message, &["débito", "debito"]) {
        PaymentMethod::Debito
    } else if contains_any(message, &["cartão", "cartao", "crédito", "credito"]) {
        PaymentMethod::Credito
    } else if message.contains("pix") {
        PaymentMethod::Pix
    } else if contains_any(message, &["dinheiro", "espécie", "especie"]) {
        PaymentMethod::Dinheiro
    } else {
        PaymentMethod::Credito
    }
}

fn extract_expense_id(message: &str) -> Option<u64> {
    integer_regex()
        .find(message)
        .and_then(|m| m.as_str().parse().ok())
}
