pub mod drafts;
pub mod trainer_slugs;
pub mod trainers;
