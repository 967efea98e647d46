pub mod category;
pub mod document;
pub mod job;
pub mod message;
pub mod review;
pub mod user;

pub use category::{Category, SubCategory};
pub use document::{ProfessionalDocuments, VerificationStatus};
pub use job::{Job, SubCategoryPricing};
pub use message::Message;
pub use review::Review;
pub use user::{Role, User};
