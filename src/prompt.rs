use crate::error::{InvalidUrlReason, KufarError, Result};
use crate::models::Quota;
use dialoguer::Input;

pub const EXIT_KEYWORD: &str = "exit";
pub const EXPECTED_HOST: &str = "kufar.by";

/// Outcome of one round of prompting
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Exit,
    Collect { url: String, quota: Quota },
}

/// Check that the link points at Kufar
pub fn parse_url(input: &str) -> Result<String> {
    let url = input.trim();
    if !url.contains(EXPECTED_HOST) {
        return Err(KufarError::InvalidUrl {
            url: url.to_string(),
            reason: InvalidUrlReason::ForeignHost,
        });
    }
    Ok(url.to_string())
}

/// Empty means "everything"; otherwise a positive integer
pub fn parse_quantity(input: &str) -> Result<Quota> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(Quota::Unbounded);
    }
    match input.parse::<usize>() {
        Ok(n) if n > 0 => Ok(Quota::AtMost(n)),
        _ => Err(KufarError::InvalidQuantity(input.to_string())),
    }
}

/// Validate a URL / quantity pair as typed by the user
pub fn parse_request(url: &str, quantity: &str) -> Result<Request> {
    if url.trim() == EXIT_KEYWORD || quantity.trim() == EXIT_KEYWORD {
        return Ok(Request::Exit);
    }
    let url = parse_url(url)?;
    let quota = parse_quantity(quantity)?;
    Ok(Request::Collect { url, quota })
}

/// Ask for a link and a quantity on the terminal
pub fn ask() -> Result<Request> {
    let url: String = Input::new()
        .with_prompt("Введите ссылку")
        .interact_text()?;
    if url.trim() == EXIT_KEYWORD {
        return Ok(Request::Exit);
    }
    parse_url(&url)?;

    let quantity: String = Input::new()
        .with_prompt("Введите кол-во товара или нажмите Enter (если хотите всё)")
        .allow_empty(true)
        .interact_text()?;

    parse_request(&url, &quantity)
}
