use std::fmt;

use chrono::{DateTime, Utc};

use fitpro_domain::id::{DraftId, TrainerId};

use crate::domain::content::ContentDocument;

/// Profile data submitted by a prospective trainer. Write-once: copied
/// verbatim from the draft into the trainer at activation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileFields {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub city: String,
    pub district: String,
    pub specialty: String,
    pub bio: Option<String>,
    pub certifications: Option<String>,
    /// Free text such as "8 years".
    pub experience: Option<String>,
    /// Selected service tags, de-duplicated, submission order kept.
    pub services: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProfileError {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("email address is not valid")]
    InvalidEmail,
    #[error("at most 20 services may be selected")]
    TooManyServices,
    #[error("service names must be at most 60 characters")]
    ServiceTooLong,
    #[error("bio must be at most 2000 characters")]
    BioTooLong,
}

pub const MAX_SERVICES: usize = 20;
pub const MAX_SERVICE_LEN: usize = 60;
pub const MAX_BIO_LEN: usize = 2000;

impl ProfileFields {
    /// Trim every field, drop blank optionals, de-duplicate services and
    /// reject profiles the content generator could not render.
    pub fn normalized(self) -> Result<Self, ProfileError> {
        let name = required(self.name, "name")?;
        let email = required(self.email, "email")?;
        if !is_plausible_email(&email) {
            return Err(ProfileError::InvalidEmail);
        }
        let city = required(self.city, "city")?;
        let district = required(self.district, "district")?;
        let specialty = required(self.specialty, "specialty")?;

        let bio = optional(self.bio);
        if bio.as_ref().is_some_and(|b| b.chars().count() > MAX_BIO_LEN) {
            return Err(ProfileError::BioTooLong);
        }

        let mut services: Vec<String> = Vec::with_capacity(self.services.len());
        for service in self.services {
            let service = service.trim().to_owned();
            if service.is_empty() || services.contains(&service) {
                continue;
            }
            if service.chars().count() > MAX_SERVICE_LEN {
                return Err(ProfileError::ServiceTooLong);
            }
            services.push(service);
        }
        if services.len() > MAX_SERVICES {
            return Err(ProfileError::TooManyServices);
        }

        Ok(Self {
            name,
            email,
            phone: optional(self.phone),
            city,
            district,
            specialty,
            bio,
            certifications: optional(self.certifications),
            experience: optional(self.experience),
            services,
        })
    }
}

fn required(value: String, field: &'static str) -> Result<String, ProfileError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ProfileError::MissingField(field));
    }
    Ok(trimmed.to_owned())
}

fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

fn is_plausible_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
}

/// Perishable pre-payment profile.
///
/// Invariant: `is_active` implies `final_id` and `payment_reference` are set.
#[derive(Debug, Clone)]
pub struct Draft {
    pub id: DraftId,
    pub profile: ProfileFields,
    pub session_token: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub is_paid: bool,
    pub is_active: bool,
    pub payment_reference: Option<String>,
    pub final_id: Option<TrainerId>,
    pub activated_at: Option<DateTime<Utc>>,
}

impl Draft {
    /// The trainer this draft was promoted into, if activation completed.
    pub fn activated_trainer(&self) -> Option<TrainerId> {
        if self.is_active && self.is_paid {
            self.final_id
        } else {
            None
        }
    }

    /// Advisory only; the activation state machine ignores expiry.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Input to the draft store's insert. The store assigns the id.
#[derive(Debug, Clone)]
pub struct NewDraft {
    pub profile: ProfileFields,
    pub session_token: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Partial update of a draft's activation fields. `None` leaves a field as is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DraftPatch {
    pub is_paid: Option<bool>,
    pub is_active: Option<bool>,
    pub payment_reference: Option<String>,
    pub final_id: Option<TrainerId>,
    pub activated_at: Option<DateTime<Utc>>,
}

impl DraftPatch {
    /// The stamp written onto a draft when it is promoted into `trainer`.
    pub fn activation(trainer: &Trainer) -> Self {
        Self {
            is_paid: Some(true),
            is_active: Some(true),
            payment_reference: Some(trainer.payment_reference.clone()),
            final_id: Some(trainer.id),
            activated_at: Some(trainer.activated_at),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrainerStatus {
    Active,
}

impl TrainerStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "active" => Some(Self::Active),
            _ => None,
        }
    }
}

/// Permanent, publicly addressable trainer profile.
#[derive(Debug, Clone)]
pub struct Trainer {
    pub id: TrainerId,
    pub draft_id: DraftId,
    pub profile: ProfileFields,
    pub status: TrainerStatus,
    /// Generated once at activation, never regenerated automatically.
    pub content: ContentDocument,
    pub payment_reference: String,
    pub activated_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Result of the atomic draft → trainer transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromotionOutcome {
    /// This call created the trainer.
    Promoted(TrainerId),
    /// Another call won the race; the draft already points at this trainer.
    AlreadyPromoted(TrainerId),
    /// The draft disappeared between load and promotion.
    DraftMissing,
}

/// A reserved slug and its holder.
#[derive(Debug, Clone)]
pub struct SlugRecord {
    pub slug: String,
    pub trainer_id: TrainerId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlugReservation {
    Reserved,
    /// Another trainer holds the slug (lost the read-check/write race).
    Taken,
}

// ── Payments ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentStatus {
    Succeeded,
    Processing,
    RequiresPaymentMethod,
    RequiresAction,
    Canceled,
    Failed,
    Other(String),
}

impl PaymentStatus {
    pub fn parse(s: &str) -> Self {
        match s {
            "succeeded" => Self::Succeeded,
            "processing" => Self::Processing,
            "requires_payment_method" => Self::RequiresPaymentMethod,
            "requires_action" => Self::RequiresAction,
            "canceled" => Self::Canceled,
            "failed" => Self::Failed,
            other => Self::Other(other.to_owned()),
        }
    }
}

/// What the processor reports for a payment reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentDetails {
    pub reference: String,
    pub status: PaymentStatus,
    pub amount_minor: i64,
    pub currency: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivationFee {
    pub amount_minor: i64,
    pub currency: &'static str,
}

/// One-time activation price. Not configurable per request.
pub const ACTIVATION_FEE: ActivationFee = ActivationFee {
    amount_minor: 4900,
    currency: "eur",
};

/// Why a payment did not qualify for activation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationFailure {
    NotSucceeded,
    AmountMismatch,
    /// Transport error, timeout, bad response or unknown reference.
    ProcessorError,
}

impl VerificationFailure {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotSucceeded => "not_succeeded",
            Self::AmountMismatch => "amount_mismatch",
            Self::ProcessorError => "processor_error",
        }
    }

    pub fn is_retryable(self) -> bool {
        matches!(self, Self::ProcessorError)
    }
}

impl fmt::Display for VerificationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            Self::NotSucceeded => "payment has not been completed",
            Self::AmountMismatch => "payment amount does not match the activation fee",
            Self::ProcessorError => "payment could not be verified with the payment processor",
        };
        f.write_str(message)
    }
}

/// Check a processor report against the activation contract. Status is
/// checked before amount so an unpaid intent never reports a mismatch.
pub fn verify_payment(
    details: &PaymentDetails,
    fee: ActivationFee,
) -> Result<(), VerificationFailure> {
    if details.status != PaymentStatus::Succeeded {
        return Err(VerificationFailure::NotSucceeded);
    }
    if details.amount_minor != fee.amount_minor || !details.currency.eq_ignore_ascii_case(fee.currency)
    {
        return Err(VerificationFailure::AmountMismatch);
    }
    Ok(())
}

/// Draft lifetime from submission.
pub const DRAFT_TTL_SECS: i64 = 24 * 60 * 60;

/// Session token length in characters.
pub const SESSION_TOKEN_LEN: usize = 32;
