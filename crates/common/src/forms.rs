//! Test data for the add-product and contact forms
//!
//! Unlike [`crate::product::ProductBuilder`], these builders happily produce
//! partial records: the form scenarios submit incomplete input on purpose to
//! check required-field handling. Unset fields are empty strings.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fmt;

const ADJECTIVES: &[&str] = &[
    "Ergonomic", "Rustic", "Sleek", "Handcrafted", "Refined", "Practical", "Generic", "Gorgeous",
];
const MATERIALS: &[&str] = &["Steel", "Wooden", "Cotton", "Granite", "Plastic", "Bronze"];
const NOUNS: &[&str] = &["Chair", "Keyboard", "Lamp", "Table", "Gloves", "Shoes", "Bottle"];
const FIRST_NAMES: &[&str] = &["Ana", "Bruno", "Carla", "Diego", "Elisa", "Felipe", "Lilian"];
const LAST_NAMES: &[&str] = &["Silva", "Souza", "Oliveira", "Pereira", "Costa", "Kasprzak"];
const MAIL_DOMAINS: &[&str] = &["example.com", "mail.test", "qa.example.org"];

const DATE_FORMAT: &str = "%Y-%m-%d";

fn pick<'a>(rng: &mut StdRng, words: &[&'a str]) -> &'a str {
    words.choose(rng).copied().unwrap_or_default()
}

fn random_person(rng: &mut StdRng) -> (String, String) {
    (pick(rng, FIRST_NAMES).to_string(), pick(rng, LAST_NAMES).to_string())
}

/// Values typed into the add-product form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddProductForm {
    pub name: String,
    pub price: String,
    pub date_stocked: String,
}

#[derive(Debug, Clone)]
pub struct AddProductFormBuilder {
    form: AddProductForm,
    rng: StdRng,
}

impl Default for AddProductFormBuilder {
    fn default() -> Self {
        Self {
            form: AddProductForm::default(),
            rng: StdRng::from_entropy(),
        }
    }
}

impl AddProductFormBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deterministic random data
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.form.name = name.into();
        self
    }

    pub fn with_random_name(mut self) -> Self {
        self.form.name = format!(
            "{} {} {}",
            pick(&mut self.rng, ADJECTIVES),
            pick(&mut self.rng, MATERIALS),
            pick(&mut self.rng, NOUNS)
        );
        self
    }

    pub fn with_price(mut self, price: impl Into<String>) -> Self {
        self.form.price = price.into();
        self
    }

    /// Price between 10.00 and 1000.00
    pub fn with_random_price(mut self) -> Self {
        let cents: u32 = self.rng.gen_range(1_000..=100_000);
        self.form.price = format!("{}.{:02}", cents / 100, cents % 100);
        self
    }

    pub fn with_date_stocked(mut self, date: impl Into<String>) -> Self {
        self.form.date_stocked = date.into();
        self
    }

    pub fn with_today_date(mut self) -> Self {
        self.form.date_stocked = chrono::Local::now().format(DATE_FORMAT).to_string();
        self
    }

    pub fn build(&self) -> AddProductForm {
        self.form.clone()
    }

    pub fn complete(self) -> AddProductForm {
        self.with_random_name()
            .with_random_price()
            .with_today_date()
            .build()
    }

    pub fn only_name(self) -> AddProductForm {
        self.with_random_name().build()
    }

    pub fn only_price(self) -> AddProductForm {
        self.with_random_price().build()
    }

    pub fn only_date(self) -> AddProductForm {
        self.with_today_date().build()
    }
}

/// Options of the contact form's query-type select
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QueryType {
    General,
    Product,
    Support,
    Other,
}

impl QueryType {
    pub const ALL: [QueryType; 4] = [
        QueryType::General,
        QueryType::Product,
        QueryType::Support,
        QueryType::Other,
    ];
}

impl fmt::Display for QueryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            QueryType::General => "General",
            QueryType::Product => "Product",
            QueryType::Support => "Support",
            QueryType::Other => "Other",
        };
        f.write_str(label)
    }
}

/// Values typed into the contact form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub query_type: String,
    pub date_of_birth: String,
    pub consent: bool,
}

#[derive(Debug, Clone)]
pub struct ContactFormBuilder {
    form: ContactForm,
    rng: StdRng,
}

impl Default for ContactFormBuilder {
    fn default() -> Self {
        Self {
            form: ContactForm::default(),
            rng: StdRng::from_entropy(),
        }
    }
}

impl ContactFormBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.form.name = name.into();
        self
    }

    pub fn with_random_name(mut self) -> Self {
        let (first, last) = random_person(&mut self.rng);
        self.form.name = format!("{} {}", first, last);
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.form.email = email.into();
        self
    }

    pub fn with_random_email(mut self) -> Self {
        let (first, last) = random_person(&mut self.rng);
        let suffix: u16 = self.rng.gen_range(1..1000);
        self.form.email = format!(
            "{}.{}{}@{}",
            first.to_lowercase(),
            last.to_lowercase(),
            suffix,
            pick(&mut self.rng, MAIL_DOMAINS)
        );
        self
    }

    pub fn with_query_type(mut self, query_type: QueryType) -> Self {
        self.form.query_type = query_type.to_string();
        self
    }

    pub fn with_random_query_type(mut self) -> Self {
        let query_type = QueryType::ALL
            .choose(&mut self.rng)
            .copied()
            .unwrap_or(QueryType::General);
        self.with_query_type(query_type)
    }

    pub fn with_date_of_birth(mut self, date: impl Into<String>) -> Self {
        self.form.date_of_birth = date.into();
        self
    }

    /// Some day within the last 30 years
    pub fn with_random_date_of_birth(mut self) -> Self {
        let days_back: i64 = self.rng.gen_range(1..=30 * 365);
        let date = chrono::Local::now().date_naive() - chrono::Duration::days(days_back);
        self.form.date_of_birth = date.format(DATE_FORMAT).to_string();
        self
    }

    pub fn with_consent(mut self, consent: bool) -> Self {
        self.form.consent = consent;
        self
    }

    pub fn build(&self) -> ContactForm {
        self.form.clone()
    }

    pub fn complete(self) -> ContactForm {
        self.with_random_name()
            .with_random_email()
            .with_query_type(QueryType::General)
            .with_random_date_of_birth()
            .with_consent(true)
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_complete_product_form() {
        let form = AddProductFormBuilder::new().with_seed(7).complete();
        assert_eq!(form.name.split(' ').count(), 3);

        let price: f64 = form.price.parse().unwrap();
        assert!((10.0..=1000.0).contains(&price));
        assert!(NaiveDate::parse_from_str(&form.date_stocked, DATE_FORMAT).is_ok());
    }

    #[test]
    fn test_partial_product_forms() {
        let form = AddProductFormBuilder::new().only_price();
        assert!(form.name.is_empty());
        assert!(form.date_stocked.is_empty());
        assert!(!form.price.is_empty());

        let form = AddProductFormBuilder::new().only_name();
        assert!(form.price.is_empty());
    }

    #[test]
    fn test_seed_is_deterministic() {
        let a = ContactFormBuilder::new().with_seed(42).with_random_email().build();
        let b = ContactFormBuilder::new().with_seed(42).with_random_email().build();
        assert_eq!(a, b);
        assert!(a.email.contains('@'));
    }

    #[test]
    fn test_complete_contact_form() {
        let form = ContactFormBuilder::new().complete();
        assert_eq!(form.query_type, "General");
        assert!(form.consent);
        assert!(form.name.contains(' '));
        assert!(NaiveDate::parse_from_str(&form.date_of_birth, DATE_FORMAT).is_ok());
    }

    #[test]
    fn test_explicit_values_win() {
        let form = ContactFormBuilder::new()
            .with_name("Lilian")
            .with_email("email-invalido")
            .with_query_type(QueryType::Support)
            .build();
        assert_eq!(form.email, "email-invalido");
        assert_eq!(form.query_type, "Support");
        assert!(!form.consent);
    }
}
