//! Website content generation.
//!
//! Pure and total over normalized profiles: no I/O, and the only input besides
//! the profile is the `generated_at` stamp, so equal inputs give byte-identical
//! documents.

use chrono::{DateTime, Utc};

use crate::domain::content::{
    AboutSection, ContactSection, ContentDocument, HeroSection, SeoSection, ServiceOffering,
};
use crate::domain::types::ProfileFields;

/// Used in the hero description when the trainer gave no experience.
pub const DEFAULT_EXPERIENCE_LINE: &str = "Certified coach";

/// Currency of the default service catalog prices.
pub const CATALOG_CURRENCY: &str = "EUR";

const SEO_DESCRIPTION_MAX_CHARS: usize = 160;

struct CatalogDefault {
    title: &'static str,
    description: &'static str,
    duration_minutes: u32,
    price_minor: i64,
}

const DEFAULT_CATALOG: [CatalogDefault; 3] = [
    CatalogDefault {
        title: "1:1 Personal Session",
        description: "A focused one-to-one session built around your goals.",
        duration_minutes: 60,
        price_minor: 6000,
    },
    CatalogDefault {
        title: "Small Group Training",
        description: "Train with up to four people and share the motivation.",
        duration_minutes: 60,
        price_minor: 2500,
    },
    CatalogDefault {
        title: "Online Coaching Plan",
        description: "A monthly plan with a video check-in and ongoing support.",
        duration_minutes: 30,
        price_minor: 9900,
    },
];

pub fn generate_content(profile: &ProfileFields, generated_at: DateTime<Utc>) -> ContentDocument {
    let name = profile.name.as_str();
    let specialty = profile.specialty.as_str();
    let city = profile.city.as_str();
    let district = profile.district.as_str();

    let description = match &profile.experience {
        Some(experience) => format!(
            "{experience} of experience helping clients in {city} reach their goals."
        ),
        None => format!("{DEFAULT_EXPERIENCE_LINE} helping clients in {city} reach their goals."),
    };

    let hero = HeroSection {
        title: format!("{name}: {specialty} in {city}"),
        subtitle: format!("{specialty} coaching in {district}, {city}"),
        description,
        cta_label: "Book a session".to_owned(),
    };

    let body = match profile.bio.as_deref().map(str::trim) {
        Some(bio) if !bio.is_empty() => bio.to_owned(),
        _ => fallback_bio(profile),
    };

    let about = AboutSection {
        heading: format!("About {name}"),
        body,
        certifications: profile.certifications.clone(),
        specialties: profile.services.clone(),
    };

    let services = DEFAULT_CATALOG
        .iter()
        .map(|item| ServiceOffering {
            title: item.title.to_owned(),
            description: item.description.to_owned(),
            duration_minutes: item.duration_minutes,
            price_minor: item.price_minor,
            currency: CATALOG_CURRENCY.to_owned(),
        })
        .collect();

    let contact = ContactSection {
        heading: format!("Train with {name}"),
        email: profile.email.clone(),
        phone: profile.phone.clone(),
        location: format!("{district}, {city}"),
    };

    let seo = SeoSection {
        title: format!("{name} | {specialty} Coach in {city}"),
        description: truncate_chars(
            &format!("{specialty} coaching with {name} in {district}, {city}. {}", about.body),
            SEO_DESCRIPTION_MAX_CHARS,
        ),
    };

    ContentDocument {
        hero,
        about,
        services,
        contact,
        seo,
        generated_at,
    }
}

/// About text for trainers who left the bio empty.
pub fn fallback_bio(profile: &ProfileFields) -> String {
    format!(
        "{} is a {} coach based in {}, {}. Every session is tailored to your level and goals.",
        profile.name,
        profile.specialty.to_lowercase(),
        profile.district,
        profile.city,
    )
}

fn truncate_chars(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_owned();
    }
    let mut out: String = s.chars().take(max.saturating_sub(3)).collect();
    out.push_str("...");
    out
}
