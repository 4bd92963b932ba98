use crate::entities::EventTemplate;
use crate::models::CopyLanguage;

pub fn event_title(template: EventTemplate, lang: CopyLanguage) -> &'static str {
    let (ar, en) = match template {
        EventTemplate::FridayPrayer => ("صلاة الجمعة", "Friday Prayer"),
        EventTemplate::QuranCircle => ("حلقة قرآن", "Quran Circle"),
        EventTemplate::YouthNight => ("ليلة الشباب", "Youth Night"),
        EventTemplate::SistersHalaqa => ("حلقة أخوات", "Sisters Halaqa"),
        EventTemplate::EidPrayer => ("صلاة العيد", "Eid Prayer"),
        EventTemplate::RamadanIftar => ("إفطار رمضان", "Ramadan Iftar"),
        EventTemplate::CharityFundraiser => ("تبرعات / حملة خيرية", "Charity Fundraiser"),
        EventTemplate::CommunityMeeting => ("اجتماع المجتمع", "Community Meeting"),
        EventTemplate::LectureTalk => ("محاضرة / درس", "Lecture / Talk"),
        EventTemplate::FoodBazaar => ("بازار / أكل", "Food Bazaar"),
        EventTemplate::WeekendSchool => ("مدرسة نهاية الأسبوع", "Weekend School"),
        EventTemplate::VolunteerDrive => ("تطوع / حملة", "Volunteer Drive"),
    };
    match lang {
        CopyLanguage::En => en,
        CopyLanguage::Ar => ar,
    }
}

fn or_fallback<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    let trimmed = value.trim();
    if trimmed.is_empty() { fallback } else { trimmed }
}

/// Fixed announcement sentence for an event. Blank fields get neutral
/// placeholders instead of leaving gaps.
pub fn render_event(
    template: EventTemplate,
    lang: CopyLanguage,
    city: &str,
    place: &str,
    date_text: &str,
    phone: &str,
) -> String {
    let ar = lang == CopyLanguage::Ar;
    let c = or_fallback(city, "NY/NJ");
    let p = or_fallback(place, if ar { "المكان" } else { "the venue" });
    let d = or_fallback(date_text, if ar { "قريباً" } else { "soon" });
    let ph = or_fallback(phone, if ar { "سيتم تزويدك لاحقاً" } else { "to be provided" });

    let (lead_ar, lead_en) = match template {
        EventTemplate::FridayPrayer => ("تنبيه صلاة الجمعة", "Friday prayer notice"),
        EventTemplate::QuranCircle => ("حلقة قرآن", "Quran circle"),
        EventTemplate::YouthNight => ("ليلة شباب", "Youth night"),
        EventTemplate::SistersHalaqa => ("حلقة أخوات", "Sisters halaqa"),
        EventTemplate::EidPrayer => ("صلاة العيد", "Eid prayer"),
        EventTemplate::RamadanIftar => ("إفطار جماعي", "Community iftar"),
        EventTemplate::CharityFundraiser => ("فعالية تبرعات", "Charity fundraiser"),
        EventTemplate::CommunityMeeting => ("اجتماع مجتمع", "Community meeting"),
        EventTemplate::LectureTalk => ("محاضرة/درس", "Lecture/talk"),
        EventTemplate::FoodBazaar => ("بازار/أطعمة", "Food bazaar"),
        EventTemplate::WeekendSchool => ("مدرسة/نشاط نهاية الأسبوع", "Weekend school/activity"),
        EventTemplate::VolunteerDrive => ("حملة تطوع", "Volunteer drive"),
    };

    if ar {
        format!("{lead_ar} في {p} — {c} بتاريخ {d}. للاستفسار: {ph}.")
    } else {
        format!("{lead_en} at {p} — {c} on {d}. Info: {ph}.")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::Iterable;

    #[test]
    fn test_render_with_all_fields() {
        let text = render_event(
            EventTemplate::RamadanIftar,
            CopyLanguage::En,
            "Paterson",
            "Islamic Center",
            "Mar 1, 2026",
            "+12015550147",
        );
        assert_eq!(
            text,
            "Community iftar at Islamic Center — Paterson on Mar 1, 2026. Info: +12015550147."
        );
    }

    #[test]
    fn test_blank_fields_use_fallbacks() {
        let en = render_event(EventTemplate::EidPrayer, CopyLanguage::En, " ", "", "", "");
        assert_eq!(en, "Eid prayer at the venue — NY/NJ on soon. Info: to be provided.");
        let ar = render_event(EventTemplate::EidPrayer, CopyLanguage::Ar, "", "", "", "");
        assert_eq!(
            ar,
            "صلاة العيد في المكان — NY/NJ بتاريخ قريباً. للاستفسار: سيتم تزويدك لاحقاً."
        );
    }

    #[test]
    fn test_every_template_has_titles() {
        for t in EventTemplate::iter() {
            assert!(!event_title(t, CopyLanguage::En).is_empty());
            assert!(!event_title(t, CopyLanguage::Ar).is_empty());
        }
    }
}
