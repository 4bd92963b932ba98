//! Pre-approved phrase tables. Every entry is fixed text with placeholders;
//! no user-authored prose ever reaches the output.
//!
//! Entries are append-only in practice: reordering or editing a table changes
//! the copy every existing listing renders.

use crate::entities::{BusinessType, CopyStyle};
use crate::models::CopyLanguage;

pub const PHRASES_PER_CATEGORY: usize = 10;

const _: () = assert!(PHRASES_PER_CATEGORY > 0);

pub type PhraseTable = [&'static str; PHRASES_PER_CATEGORY];

const RESTAURANT_EN: PhraseTable = [
    "{BUSINESS} — halal {TYPE} in {CITYSTATE}.",
    "Enjoy delicious halal food at {BUSINESS}.",
    "A great dining experience awaits at {BUSINESS}.",
    "A variety of dishes for every taste at {BUSINESS}.",
    "Fresh meals and friendly service at {BUSINESS}.",
    "Visit {BUSINESS} for a satisfying halal meal.",
    "Perfect for friends and families — {BUSINESS}.",
    "{BUSINESS} is your halal destination in {CITYSTATE}.",
    "Authentic taste and quality at {BUSINESS}.",
    "Call us: {PHONE} — {BUSINESS}.",
];
const RESTAURANT_AR: PhraseTable = [
    "{BUSINESS} — {TYPE} حلال في {CITYSTATE}.",
    "أشهى الأطباق الحلال بانتظاركم في {BUSINESS}.",
    "تجربة طعام مميزة وأجواء لطيفة في {BUSINESS}.",
    "أطباق متنوعة تناسب كل الأذواق في {BUSINESS}.",
    "وجبات طازجة وخدمة مميزة في {BUSINESS}.",
    "زوروا {BUSINESS} واستمتعوا بطعام حلال لذيذ.",
    "خيار رائع للعائلة والأصدقاء في {BUSINESS}.",
    "{BUSINESS} وجهتكم للطعام الحلال في {CITYSTATE}.",
    "طعم أصيل وجودة عالية في {BUSINESS}.",
    "اتصلوا بنا: {PHONE} — {BUSINESS}.",
];

const GROCERY_EN: PhraseTable = [
    "{BUSINESS} — halal grocery in {CITYSTATE}.",
    "Daily essentials and halal items at {BUSINESS}.",
    "Shop with confidence at {BUSINESS}.",
    "Your everyday needs are here — {BUSINESS}.",
    "Great prices and quick service at {BUSINESS}.",
    "Fresh and diverse products at {BUSINESS}.",
    "Visit {BUSINESS} for family essentials.",
    "Wide selection of halal groceries at {BUSINESS}.",
    "{BUSINESS} near you in {CITYSTATE}.",
    "Questions? {PHONE}.",
];
const GROCERY_AR: PhraseTable = [
    "{BUSINESS} — بقالة حلال في {CITYSTATE}.",
    "مواد غذائية حلال وتشكيلة يومية في {BUSINESS}.",
    "تسوّقوا بثقة: منتجات مختارة في {BUSINESS}.",
    "احتياجاتكم اليومية متوفرة في {BUSINESS}.",
    "أسعار مناسبة وخدمة سريعة في {BUSINESS}.",
    "منتجات طازجة ومتنوعة في {BUSINESS}.",
    "زورونا في {BUSINESS} — كل ما تحتاجه العائلة.",
    "تشكيلة واسعة من المنتجات الحلال في {BUSINESS}.",
    "{BUSINESS} قريب منكم في {CITYSTATE}.",
    "للاستفسار: {PHONE}.",
];

const BUTCHER_EN: PhraseTable = [
    "{BUSINESS} — halal butcher in {CITYSTATE}.",
    "High-quality halal meats at {BUSINESS}.",
    "Great selection and respectful service at {BUSINESS}.",
    "Custom cuts available at {BUSINESS}.",
    "Fresh meats and professional preparation at {BUSINESS}.",
    "Visit {BUSINESS} — quality you can trust.",
    "{BUSINESS} is your halal meat destination in {CITYSTATE}.",
    "We’re open daily — {BUSINESS}.",
    "Order now: {PHONE}.",
    "Find us at {ADDRESS}.",
];
const BUTCHER_AR: PhraseTable = [
    "{BUSINESS} — ملحمة حلال في {CITYSTATE}.",
    "لحوم حلال بجودة عالية في {BUSINESS}.",
    "اختيارات متنوعة وخدمة محترمة في {BUSINESS}.",
    "تجهيزات حسب الطلب متوفرة في {BUSINESS}.",
    "لحوم طازجة وتقطيع احترافي في {BUSINESS}.",
    "زورونا في {BUSINESS} — جودة تفرق.",
    "{BUSINESS} خياركم للحوم الحلال في {CITYSTATE}.",
    "نستقبلكم يوميًا في {BUSINESS}.",
    "اطلبوا الآن واتصلوا: {PHONE}.",
    "عنواننا: {ADDRESS}.",
];

const DELI_EN: PhraseTable = [
    "{BUSINESS} — halal deli in {CITYSTATE}.",
    "Sandwiches and quick bites at {BUSINESS}.",
    "Fast service and great taste at {BUSINESS}.",
    "Daily options perfect for work days at {BUSINESS}.",
    "Tasty light meals at {BUSINESS}.",
    "{BUSINESS} is a great lunch spot.",
    "Stop by {BUSINESS} today.",
    "Clean, quality, and detail-focused — {BUSINESS}.",
    "To order: {PHONE}.",
    "{BUSINESS} — {ADDRESS}.",
];
const DELI_AR: PhraseTable = [
    "{BUSINESS} — ديلي حلال في {CITYSTATE}.",
    "ساندويشات وخيارات سريعة في {BUSINESS}.",
    "خدمة سريعة وطعم رائع في {BUSINESS}.",
    "اختيارات يومية مناسبة للدوام في {BUSINESS}.",
    "وجبات خفيفة لذيذة في {BUSINESS}.",
    "{BUSINESS} خيار ممتاز للغداء السريع.",
    "زورونا في {BUSINESS} اليوم.",
    "جودة ونظافة واهتمام بالتفاصيل في {BUSINESS}.",
    "للطلب: {PHONE}.",
    "{BUSINESS} — {ADDRESS}.",
];

const BAKERY_EN: PhraseTable = [
    "{BUSINESS} — bakery in {CITYSTATE}.",
    "Fresh baked goods daily at {BUSINESS}.",
    "Sweets and pastries with a special taste at {BUSINESS}.",
    "The smell of fresh bread at {BUSINESS}.",
    "Great options for hosting at {BUSINESS}.",
    "Visit {BUSINESS} in the morning.",
    "{BUSINESS} — quality in every bite.",
    "Family-friendly bakery options at {BUSINESS}.",
    "Questions? {PHONE}.",
    "Address: {ADDRESS}.",
];
const BAKERY_AR: PhraseTable = [
    "{BUSINESS} — مخبز في {CITYSTATE}.",
    "مخبوزات طازجة يوميًا في {BUSINESS}.",
    "حلويات ومخبوزات بنكهة مميزة في {BUSINESS}.",
    "رائحة الخبز الطازج في {BUSINESS}.",
    "اختيارات رائعة للضيافة في {BUSINESS}.",
    "زورونا صباحًا في {BUSINESS}.",
    "{BUSINESS} — جودة وطعم يفرح.",
    "مخبوزات مناسبة للعائلة في {BUSINESS}.",
    "للاستفسار: {PHONE}.",
    "عنواننا: {ADDRESS}.",
];

const CAFE_EN: PhraseTable = [
    "{BUSINESS} — cafe in {CITYSTATE}.",
    "Great coffee and calm vibes at {BUSINESS}.",
    "A cozy spot for warm drinks at {BUSINESS}.",
    "Perfect for work or study — {BUSINESS}.",
    "Variety of drinks and friendly service at {BUSINESS}.",
    "Enjoy your time at {BUSINESS}.",
    "{BUSINESS} near you in {CITYSTATE}.",
    "Stop by {BUSINESS} today.",
    "Contact: {PHONE}.",
    "Address: {ADDRESS}.",
];
const CAFE_AR: PhraseTable = [
    "{BUSINESS} — كافيه في {CITYSTATE}.",
    "قهوة طيبة وأجواء هادئة في {BUSINESS}.",
    "جلسات لطيفة مع مشروبات ساخنة في {BUSINESS}.",
    "مكان مناسب للعمل والدراسة في {BUSINESS}.",
    "مشروبات متنوعة وخدمة جميلة في {BUSINESS}.",
    "استمتعوا بوقتكم في {BUSINESS}.",
    "{BUSINESS} قريب منكم في {CITYSTATE}.",
    "زورونا اليوم في {BUSINESS}.",
    "للاستفسار: {PHONE}.",
    "عنواننا: {ADDRESS}.",
];

const FOOD_TRUCK_EN: PhraseTable = [
    "{BUSINESS} — food truck in {CITYSTATE}.",
    "Fast halal bites with big flavor at {BUSINESS}.",
    "Quick meals and quality at {BUSINESS}.",
    "A great stop while you’re out — {BUSINESS}.",
    "Try something different at {BUSINESS}.",
    "{BUSINESS} serves tasty options daily.",
    "Fast service and halal food at {BUSINESS}.",
    "{BUSINESS} in {CITYSTATE}.",
    "To order: {PHONE}.",
    "Come see us today!",
];
const FOOD_TRUCK_AR: PhraseTable = [
    "{BUSINESS} — فود ترك في {CITYSTATE}.",
    "أكل سريع حلال وطعم قوي في {BUSINESS}.",
    "وجبات جاهزة بسرعة وجودة في {BUSINESS}.",
    "خيار ممتاز أثناء المشاوير: {BUSINESS}.",
    "زوروا {BUSINESS} لتجربة مختلفة.",
    "{BUSINESS} يقدم خيارات لذيذة يوميًا.",
    "خدمة سريعة وأكل حلال في {BUSINESS}.",
    "{BUSINESS} موجود في {CITYSTATE}.",
    "للطلب: {PHONE}.",
    "تعالوا زورونا اليوم!",
];

const MARKET_EN: PhraseTable = [
    "{BUSINESS} — market in {CITYSTATE}.",
    "Wide selection of products at {BUSINESS}.",
    "Great service and fair prices at {BUSINESS}.",
    "All your household needs in one place — {BUSINESS}.",
    "Fresh and diverse items at {BUSINESS}.",
    "{BUSINESS} for your daily shopping.",
    "Visit {BUSINESS} today.",
    "Easy and quick shopping at {BUSINESS}.",
    "Contact: {PHONE}.",
    "Address: {ADDRESS}.",
];
const MARKET_AR: PhraseTable = [
    "{BUSINESS} — سوق في {CITYSTATE}.",
    "تشكيلة واسعة من المنتجات في {BUSINESS}.",
    "خدمة ممتازة وأسعار مناسبة في {BUSINESS}.",
    "كل احتياجات البيت في مكان واحد: {BUSINESS}.",
    "منتجات طازجة ومتنوعة في {BUSINESS}.",
    "{BUSINESS} خياركم للتسوق اليومي.",
    "زورونا في {BUSINESS} اليوم.",
    "تسوّق مريح وسريع في {BUSINESS}.",
    "للاستفسار: {PHONE}.",
    "عنواننا: {ADDRESS}.",
];

const OTHER_EN: PhraseTable = [
    "{BUSINESS} — great service in {CITYSTATE}.",
    "Welcome to {BUSINESS}.",
    "Quality and respectful service at {BUSINESS}.",
    "{BUSINESS} near you in {CITYSTATE}.",
    "Contact: {PHONE}.",
    "Visit: {ADDRESS}.",
    "Fast and convenient service at {BUSINESS}.",
    "Proud to serve the community — {BUSINESS}.",
    "We’re happy to welcome you at {BUSINESS}.",
    "We’re ready to help.",
];
const OTHER_AR: PhraseTable = [
    "{BUSINESS} — خدمة مميزة في {CITYSTATE}.",
    "نرحب بكم في {BUSINESS}.",
    "جودة وخدمة محترمة في {BUSINESS}.",
    "{BUSINESS} قريب منكم في {CITYSTATE}.",
    "للتواصل: {PHONE}.",
    "زورونا: {ADDRESS}.",
    "خدمة سريعة ومريحة في {BUSINESS}.",
    "نفتخر بخدمة المجتمع في {BUSINESS}.",
    "أهلاً وسهلاً بكم في {BUSINESS}.",
    "نحن جاهزون لخدمتكم.",
];

/// Base phrases for a category. Exhaustive over the category set, so a new
/// category cannot ship without its table.
pub fn base_phrases(business_type: BusinessType, lang: CopyLanguage) -> &'static PhraseTable {
    use BusinessType::*;
    use CopyLanguage::*;
    match (business_type, lang) {
        (Restaurant, En) => &RESTAURANT_EN,
        (Restaurant, Ar) => &RESTAURANT_AR,
        (Grocery, En) => &GROCERY_EN,
        (Grocery, Ar) => &GROCERY_AR,
        (Butcher, En) => &BUTCHER_EN,
        (Butcher, Ar) => &BUTCHER_AR,
        (Deli, En) => &DELI_EN,
        (Deli, Ar) => &DELI_AR,
        (Bakery, En) => &BAKERY_EN,
        (Bakery, Ar) => &BAKERY_AR,
        (Cafe, En) => &CAFE_EN,
        (Cafe, Ar) => &CAFE_AR,
        (FoodTruck, En) => &FOOD_TRUCK_EN,
        (FoodTruck, Ar) => &FOOD_TRUCK_AR,
        (Market, En) => &MARKET_EN,
        (Market, Ar) => &MARKET_AR,
        (Other, En) => &OTHER_EN,
        (Other, Ar) => &OTHER_AR,
    }
}

/// `{TYPE}` substitution.
pub fn business_type_title(business_type: BusinessType, lang: CopyLanguage) -> &'static str {
    match (business_type, lang) {
        (BusinessType::Restaurant, CopyLanguage::En) => "Restaurant",
        (BusinessType::Restaurant, CopyLanguage::Ar) => "مطعم",
        (BusinessType::Grocery, CopyLanguage::En) => "Grocery",
        (BusinessType::Grocery, CopyLanguage::Ar) => "بقالة",
        (BusinessType::Butcher, CopyLanguage::En) => "Butcher",
        (BusinessType::Butcher, CopyLanguage::Ar) => "ملحمة",
        (BusinessType::Deli, CopyLanguage::En) => "Deli",
        (BusinessType::Deli, CopyLanguage::Ar) => "ديلي",
        (BusinessType::Bakery, CopyLanguage::En) => "Bakery",
        (BusinessType::Bakery, CopyLanguage::Ar) => "مخبز",
        (BusinessType::Cafe, CopyLanguage::En) => "Cafe",
        (BusinessType::Cafe, CopyLanguage::Ar) => "كافيه",
        (BusinessType::FoodTruck, CopyLanguage::En) => "Food Truck",
        (BusinessType::FoodTruck, CopyLanguage::Ar) => "فود ترك",
        (BusinessType::Market, CopyLanguage::En) => "Market",
        (BusinessType::Market, CopyLanguage::Ar) => "سوق",
        (BusinessType::Other, CopyLanguage::En) => "Other",
        (BusinessType::Other, CopyLanguage::Ar) => "أخرى",
    }
}

/// Style layer as (prefix, suffix) around the chosen base phrase.
pub fn style_wrap(style: CopyStyle, lang: CopyLanguage) -> (&'static str, &'static str) {
    let ar = lang == CopyLanguage::Ar;
    match style {
        CopyStyle::Simple => ("", ""),
        CopyStyle::HalalFocused if ar => ("✅ حلال | ", " للتواصل: {PHONE}."),
        CopyStyle::HalalFocused => ("✅ Halal | ", " Contact: {PHONE}."),
        CopyStyle::FamilyFriendly if ar => ("👨‍👩‍👧‍👦 مناسب للعائلة | ", ""),
        CopyStyle::FamilyFriendly => ("👨‍👩‍👧‍👦 Family-friendly | ", ""),
        CopyStyle::NewOpening if ar => ("🎉 افتتاح جديد | ", " زورونا: {ADDRESS}."),
        CopyStyle::NewOpening => ("🎉 New opening | ", " Visit: {ADDRESS}."),
        CopyStyle::CommunitySupport if ar => ("🤝 دعم المجتمع | ", ""),
        CopyStyle::CommunitySupport => ("🤝 Community support | ", ""),
        CopyStyle::Popular if ar => ("⭐ مكان مميز | ", ""),
        CopyStyle::Popular => ("⭐ Popular spot | ", ""),
        CopyStyle::DeliveryOrCall if ar => ("📞 اتصال/توصيل | ", " هاتف: {PHONE}."),
        CopyStyle::DeliveryOrCall => ("📞 Call/Delivery | ", " Phone: {PHONE}."),
        CopyStyle::LocationHighlight if ar => ("📍 موقع مميز | ", " العنوان: {ADDRESS}."),
        CopyStyle::LocationHighlight => ("📍 Great location | ", " Address: {ADDRESS}."),
        CopyStyle::BestTimeToVisit if ar => ("⏰ أفضل وقت للزيارة | ", ""),
        CopyStyle::BestTimeToVisit => ("⏰ Best time to visit | ", ""),
        CopyStyle::SpecialOffer if ar => ("🎁 ميزة/عرض | ", ""),
        CopyStyle::SpecialOffer => ("🎁 Special feature | ", ""),
        CopyStyle::FridaySpecial if ar => ("🕌/🍽️ الجمعة | ", ""),
        CopyStyle::FridaySpecial => ("🕌/🍽️ Friday highlight | ", ""),
        CopyStyle::Weekend if ar => ("🌙 الويكند | ", ""),
        CopyStyle::Weekend => ("🌙 Weekend | ", ""),
        CopyStyle::EasyParking if ar => ("🅿️ مواقف سهلة | ", ""),
        CopyStyle::EasyParking => ("🅿️ Easy parking | ", ""),
        CopyStyle::Accessible if ar => ("♿ سهولة الوصول | ", ""),
        CopyStyle::Accessible => ("♿ Accessible | ", ""),
        CopyStyle::ContactNow if ar => ("📲 تواصل الآن | ", " رقم: {PHONE}."),
        CopyStyle::ContactNow => ("📲 Contact now | ", " Phone: {PHONE}."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::Iterable;

    #[test]
    fn test_every_table_is_full_and_placeholder_only() {
        let allowed = ["{BUSINESS}", "{TYPE}", "{CITYSTATE}", "{ADDRESS}", "{PHONE}"];
        for bt in BusinessType::iter() {
            for lang in [CopyLanguage::En, CopyLanguage::Ar] {
                let table = base_phrases(bt, lang);
                assert_eq!(table.len(), PHRASES_PER_CATEGORY);
                for phrase in table.iter() {
                    assert!(!phrase.trim().is_empty());
                    let mut rest = *phrase;
                    while let Some(start) = rest.find('{') {
                        let end = rest[start..].find('}').map(|e| start + e + 1).unwrap();
                        assert!(allowed.contains(&&rest[start..end]), "{phrase}");
                        rest = &rest[end..];
                    }
                }
                assert!(!business_type_title(bt, lang).is_empty());
            }
        }
    }

    #[test]
    fn test_simple_style_is_identity() {
        for lang in [CopyLanguage::En, CopyLanguage::Ar] {
            assert_eq!(style_wrap(CopyStyle::Simple, lang), ("", ""));
        }
        assert_eq!(
            style_wrap(CopyStyle::ContactNow, CopyLanguage::En),
            ("📲 Contact now | ", " Phone: {PHONE}.")
        );
    }
}
