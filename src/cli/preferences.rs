//! CLI commands for the selected financial year and the alert threshold

use chrono::Local;

use super::parse_amount;
use crate::config::settings::Settings;
use crate::error::BudgetResult;
use crate::models::available_financial_years;
use crate::services::PreferenceService;
use crate::storage::Storage;

/// List the financial years that can be selected
pub fn handle_years_command(storage: &Storage) -> BudgetResult<()> {
    let transactions = storage.transactions.get_all()?;
    let selected = storage.preferences.financial_year()?;

    for fy in available_financial_years(&transactions, Local::now().date_naive()) {
        let marker = if fy == selected { "*" } else { " " };
        println!("{} {}", marker, fy);
    }

    Ok(())
}

/// Show or change the selected financial year
pub fn handle_fy_command(storage: &Storage, label: Option<&str>) -> BudgetResult<()> {
    let service = PreferenceService::new(storage);

    match label {
        Some(label) => {
            let prefs = service.select_financial_year(label)?;
            println!("Selected financial year: {}", prefs.financial_year);
        }
        None => {
            let prefs = service.get()?;
            let (start, end) = (prefs.financial_year.start_date(), prefs.financial_year.end_date());
            println!("Financial year: {} ({} to {})", prefs.financial_year, start, end);
        }
    }

    Ok(())
}

/// Show or change the large-transaction alert threshold
pub fn handle_threshold_command(
    storage: &Storage,
    settings: &Settings,
    amount: Option<&str>,
) -> BudgetResult<()> {
    let service = PreferenceService::new(storage);
    let currency = settings.currency_symbol.as_str();

    match amount {
        Some(amount) => {
            let prefs = service.set_alert_threshold(parse_amount(amount)?)?;
            println!(
                "Alert threshold set to {}",
                prefs.alert_threshold.format_with_symbol(currency)
            );
        }
        None => {
            let prefs = service.get()?;
            println!(
                "Alert threshold: {}",
                prefs.alert_threshold.format_with_symbol(currency)
            );
            println!("Transactions above this amount are flagged.");
        }
    }

    Ok(())
}
