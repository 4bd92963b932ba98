use super::copy_library::{base_phrases, business_type_title, style_wrap};
use super::event_copy::render_event;
use crate::entities::{BusinessType, CopyStyle, ListingCollection};
use crate::error::{AppError, AppResult};
use crate::models::{CopyFields, CopyLanguage, Listing};
use crate::utils::fnv1a64;

/// Hash input for phrase selection. Field order and separator are frozen:
/// changing either reshuffles every listing's copy.
pub fn stable_key(fields: &CopyFields) -> String {
    format!(
        "{}|{}|{}|{}",
        fields.business_name, fields.phone, fields.city, fields.state
    )
}

pub fn pick_phrase<'a>(phrases: &[&'a str], hash: u64) -> AppResult<&'a str> {
    if phrases.is_empty() {
        return Err(AppError::EmptyPhraseLibrary(
            "no phrases to choose from".to_string(),
        ));
    }
    let idx = (hash % phrases.len() as u64) as usize;
    Ok(phrases[idx])
}

/// Replaces placeholders in one left-to-right pass. Substituted values are
/// never scanned again, so a business called "{PHONE}" stays literal.
fn substitute(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len() + 32);
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        match values.iter().find(|(ph, _)| tail.starts_with(ph)) {
            Some((ph, value)) => {
                out.push_str(value);
                rest = &tail[ph.len()..];
            }
            None => {
                out.push('{');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// Deterministic promotional copy: same inputs, same bytes, every time.
pub fn generate(
    business_type: BusinessType,
    style: CopyStyle,
    lang: CopyLanguage,
    fields: &CopyFields,
) -> AppResult<String> {
    let hash = fnv1a64(&stable_key(fields));
    let phrase = pick_phrase(base_phrases(business_type, lang), hash)?;
    let (prefix, suffix) = style_wrap(style, lang);
    let styled = format!("{prefix}{phrase}{suffix}");

    let city_state = format!("{}, {}", fields.city, fields.state);
    let values = [
        ("{BUSINESS}", fields.business_name.as_str()),
        ("{TYPE}", business_type_title(business_type, lang)),
        ("{CITYSTATE}", city_state.trim()),
        ("{ADDRESS}", fields.address_line.as_str()),
        ("{PHONE}", fields.phone.as_str()),
    ];
    Ok(substitute(&styled, &values))
}

/// Copy for a stored listing. Events use their template sentence; ads and
/// places use the phrase library.
pub fn generate_for_listing(listing: &Listing, lang: CopyLanguage) -> AppResult<String> {
    let c = &listing.content;
    match listing.collection {
        ListingCollection::CityEventAds => {
            let template = c.event_template.ok_or_else(|| {
                AppError::ValidationError(format!("event {} has no template", listing.id))
            })?;
            let date = c
                .event_date
                .map(|d| d.format("%b %-d, %Y").to_string())
                .unwrap_or_default();
            Ok(render_event(
                template,
                lang,
                &c.city,
                &c.address_line,
                &date,
                &c.phone,
            ))
        }
        ListingCollection::Ads | ListingCollection::PlaceSubmissions => {
            let fields = CopyFields {
                business_name: c.business_name.clone(),
                phone: c.phone.clone(),
                city: c.city.clone(),
                state: c.state.clone(),
                address_line: c.address_line.clone(),
            };
            generate(
                c.business_type.unwrap_or(BusinessType::Other),
                c.copy_style.unwrap_or(CopyStyle::Simple),
                lang,
                &fields,
            )
        }
    }
}
