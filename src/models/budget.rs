//! Budget entry model and category rules.

use serde::{Deserialize, Serialize};

use super::Resource;
use crate::validation::{parse_amount, Validate, ValidationErrors};

pub const INCOME_CATEGORIES: &[&str] = &[
    "donation",
    "fundraiser",
    "offering",
    "sponsorship",
    "other_income",
];

pub const EXPENSE_CATEGORIES: &[&str] = &[
    "indoor",
    "outdoor",
    "food",
    "transport",
    "supplies",
    "other_expense",
];

/// Direction of money flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    Income,
    Expense,
}

impl EntryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryType::Income => "income",
            EntryType::Expense => "expense",
        }
    }

    pub fn categories(&self) -> &'static [&'static str] {
        match self {
            EntryType::Income => INCOME_CATEGORIES,
            EntryType::Expense => EXPENSE_CATEGORIES,
        }
    }

    /// Category used when the chosen one does not belong to this type.
    pub fn default_category(&self) -> &'static str {
        self.categories()[0]
    }

    pub fn accepts(&self, category: &str) -> bool {
        self.categories().contains(&category)
    }

    /// `category` if it belongs to this type, otherwise the default.
    pub fn normalize_category(&self, category: &str) -> String {
        if self.accepts(category) {
            category.to_string()
        } else {
            tracing::debug!(
                "Category '{}' does not match {}, using '{}'",
                category,
                self.as_str(),
                self.default_category()
            );
            self.default_category().to_string()
        }
    }
}

/// One line in the group budget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetEntry {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub entry_type: EntryType,
    pub category: String,
    pub amount: f64,
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Request body for creating a new budget entry.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBudgetRequest {
    pub title: String,
    #[serde(rename = "type")]
    pub entry_type: EntryType,
    pub category: String,
    pub amount: f64,
    pub date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Request body for updating an existing budget entry.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBudgetRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub entry_type: Option<EntryType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Raw form input, with the amount still as typed.
#[derive(Debug, Clone)]
pub struct BudgetDraft {
    pub title: String,
    pub entry_type: EntryType,
    pub category: String,
    pub amount: String,
    pub date: String,
    pub notes: Option<String>,
}

impl TryFrom<BudgetDraft> for CreateBudgetRequest {
    type Error = ValidationErrors;

    fn try_from(draft: BudgetDraft) -> Result<Self, Self::Error> {
        let amount = match parse_amount(&draft.amount) {
            Ok(amount) => amount,
            Err(message) => {
                let mut errors = ValidationErrors::new();
                errors.require("title", &draft.title, "Title");
                errors.add("amount", message);
                return Err(errors);
            }
        };

        let request = CreateBudgetRequest {
            title: draft.title,
            entry_type: draft.entry_type,
            category: draft.category,
            amount,
            date: draft.date,
            notes: draft.notes.filter(|n| !n.trim().is_empty()),
        };
        request.validate()?;
        Ok(request)
    }
}

fn check_amount(errors: &mut ValidationErrors, amount: f64) {
    if !amount.is_finite() || amount <= 0.0 {
        errors.add("amount", "Amount must be greater than zero");
    }
}

impl Validate for CreateBudgetRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.require("title", &self.title, "Title");
        check_amount(&mut errors, self.amount);
        errors.require("date", &self.date, "Date");
        errors.into_result()
    }
}

impl Validate for UpdateBudgetRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.require_if_present("title", self.title.as_deref(), "Title");
        if let Some(amount) = self.amount {
            check_amount(&mut errors, amount);
        }
        errors.require_if_present("date", self.date.as_deref(), "Date");
        errors.into_result()
    }
}

impl Resource for BudgetEntry {
    const PATH: &'static str = "/budget";
    const LABEL: &'static str = "Budget entry";
    const PLURAL: &'static str = "budget entries";

    type Create = CreateBudgetRequest;
    type Update = UpdateBudgetRequest;

    fn id(&self) -> &str {
        &self.id
    }

    fn prepare(mut create: CreateBudgetRequest) -> CreateBudgetRequest {
        create.category = create.entry_type.normalize_category(&create.category);
        create
    }

    fn prepare_update(&self, mut update: UpdateBudgetRequest) -> UpdateBudgetRequest {
        if update.entry_type.is_none() && update.category.is_none() {
            return update;
        }

        let entry_type = update.entry_type.unwrap_or(self.entry_type);
        let category = update.category.as_deref().unwrap_or(&self.category);
        let normalized = entry_type.normalize_category(category);
        if normalized != self.category || update.category.is_some() {
            update.category = Some(normalized);
        }
        update
    }
}

/// Totals over a set of budget entries.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BudgetSummary {
    pub income: f64,
    pub expense: f64,
    pub balance: f64,
}

impl BudgetSummary {
    pub fn from_entries<'a>(entries: impl IntoIterator<Item = &'a BudgetEntry>) -> Self {
        let mut summary = BudgetSummary::default();
        for entry in entries {
            match entry.entry_type {
                EntryType::Income => summary.income += entry.amount,
                EntryType::Expense => summary.expense += entry.amount,
            }
        }
        summary.balance = summary.income - summary.expense;
        summary
    }
}
