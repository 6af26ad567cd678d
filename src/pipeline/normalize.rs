use crate::models::{ListingRecord, Price, PLACEHOLDER};
use crate::scrapers::types::RawAd;

const SUBCATEGORY: &str = "Подкатегория";
const CATEGORY: &str = "Категория";
const CONDITION: &str = "Состояние";

/// Map a raw API listing onto an export record.
///
/// The subcategory is the more specific label, so it wins over the
/// top-level category when both are present. The condition column is only
/// filled when the listing carries a category attribute as well; anything
/// else gets the placeholder so every row has all five columns.
pub fn normalize(ad: &RawAd) -> ListingRecord {
    let mut subcategory = None;
    let mut category = None;
    let mut condition = None;

    for param in &ad.ad_parameters {
        let slot = match param.pl.as_str() {
            SUBCATEGORY => &mut subcategory,
            CATEGORY => &mut category,
            CONDITION => &mut condition,
            _ => continue,
        };
        if slot.is_none() {
            *slot = Some(param.value_text());
        }
    }

    let category = subcategory.or(category);
    let condition = match (&category, condition) {
        (Some(_), Some(condition)) if !condition.is_empty() => condition,
        _ => PLACEHOLDER.to_string(),
    };

    ListingRecord {
        title: ad.subject.clone(),
        price: ad.price_byn.map(Price::from_minor).unwrap_or(Price::Negotiable),
        category: category
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| PLACEHOLDER.to_string()),
        condition,
        link: ad.ad_link.clone(),
    }
}
