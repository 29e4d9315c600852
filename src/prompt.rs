//! Interactive prompts and input parsing for the sweep setup.

use crate::appstore::{PurchaseOffer, Region};
use anyhow::Result;
use dialoguer::console::Style;
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, FuzzySelect, Input, Select};
use regex_lite::Regex;
use std::sync::LazyLock;

static APP_ID_TOKEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"id(\d+)").unwrap());
static CURRENCY_CODE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[a-zA-Z]{3}$").unwrap());

fn theme() -> ColorfulTheme {
    ColorfulTheme { values_style: Style::new().yellow().dim(), ..ColorfulTheme::default() }
}

/// Extracts the numeric app id from a raw id, an `idNNN` token, or an App
/// Store URL. Returns None when no id can be found.
pub fn parse_app_id(input: &str) -> Option<String> {
    let input = input.trim();

    if let Some(captures) = APP_ID_TOKEN.captures(input) {
        return Some(captures[1].to_string());
    }

    if !input.is_empty() && input.chars().all(|c| c.is_ascii_digit()) {
        return Some(input.to_string());
    }

    None
}

/// Splits a comma-separated keyword list: trimmed, deduplicated (first
/// occurrence wins), case preserved, empty segments dropped.
pub fn parse_keywords(input: &str) -> Vec<String> {
    let mut keywords: Vec<String> = Vec::new();
    for part in input.split(',') {
        let keyword = part.trim();
        if !keyword.is_empty() && !keywords.iter().any(|k| k == keyword) {
            keywords.push(keyword.to_string());
        }
    }
    keywords
}

/// Validates a raw keyword list the way the prompt requires: non-empty, and
/// no empty segments between commas.
fn validate_keyword_input(input: &str) -> Result<(), String> {
    if input.trim().is_empty() {
        return Err("Keywords cannot be empty. Enter at least one keyword or phrase.".to_string());
    }
    if input.split(',').any(|part| part.trim().is_empty()) {
        return Err("Ensure all keywords are non-empty and separated by commas.".to_string());
    }
    Ok(())
}

/// Asks for an App Store link or app id and returns the numeric id.
pub fn app_id() -> Result<String> {
    let input: String = Input::with_theme(&theme())
        .with_prompt("Enter an App Store link or app id")
        .validate_with(|value: &String| -> Result<(), &str> {
            match parse_app_id(value) {
                Some(_) => Ok(()),
                None => Err("Enter a valid App Store URL or app id."),
            }
        })
        .interact_text()?;

    // Validator guarantees the id parses.
    Ok(parse_app_id(&input).unwrap())
}

/// Asks for the home region, fuzzy-searchable over the storefront catalog.
pub fn home_region() -> Result<&'static Region> {
    let catalog = Region::all();
    let labels: Vec<String> = catalog.iter().map(|r| r.to_string()).collect();

    let index = FuzzySelect::with_theme(&theme())
        .with_prompt("Select your home region")
        .items(&labels)
        .default(0)
        .interact()?;

    Ok(&catalog[index])
}

/// Yes/no confirmation, defaulting to yes.
pub fn confirm(message: &str) -> Result<bool> {
    Ok(Confirm::with_theme(&theme()).with_prompt(message).default(true).interact()?)
}

/// Asks the operator to pick one purchase from the home-region list.
pub fn select_purchase(purchases: &[PurchaseOffer]) -> Result<&PurchaseOffer> {
    let labels: Vec<String> = purchases.iter().map(|p| p.label()).collect();

    let index = Select::with_theme(&theme())
        .with_prompt("Select an in-app purchase to search for")
        .items(&labels)
        .default(0)
        .interact()?;

    Ok(&purchases[index])
}

/// Asks for the home currency as a 3-letter code, returned upper-cased.
pub fn home_currency() -> Result<String> {
    let input: String = Input::with_theme(&theme())
        .with_prompt("Enter your home currency (e.g. USD, EUR)")
        .validate_with(|value: &String| -> Result<(), &str> {
            if CURRENCY_CODE.is_match(value.trim()) {
                Ok(())
            } else {
                Err("Enter a valid 3-letter currency code.")
            }
        })
        .interact_text()?;

    Ok(input.trim().to_uppercase())
}

/// Asks for fallback keywords, comma-separated.
pub fn keywords() -> Result<Vec<String>> {
    let input: String = Input::with_theme(&theme())
        .with_prompt("Enter keywords (or phrases) to search for, separated by commas")
        .validate_with(|value: &String| validate_keyword_input(value))
        .interact_text()?;

    Ok(parse_keywords(&input))
}
