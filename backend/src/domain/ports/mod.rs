//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod delivery_problem_repository;
mod delivery_repository;
mod deliveryman_repository;
mod list_filter;
mod mail_queue;
mod mailer;
mod password_hasher;
mod persistence_error;
mod recipient_repository;
mod user_repository;

pub use delivery_problem_repository::DeliveryProblemRepository;
#[cfg(test)]
pub use delivery_problem_repository::MockDeliveryProblemRepository;
pub use delivery_repository::DeliveryRepository;
#[cfg(test)]
pub use delivery_repository::MockDeliveryRepository;
pub use deliveryman_repository::DeliverymanRepository;
#[cfg(test)]
pub use deliveryman_repository::MockDeliverymanRepository;
pub use list_filter::ListFilter;
#[cfg(test)]
pub use mail_queue::MockMailQueue;
pub use mail_queue::{JobDispatchError, MailQueue};
#[cfg(test)]
pub use mailer::MockMailer;
pub use mailer::{MailDeliveryError, Mailer, OutgoingMail};
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHashError, PasswordHasher};
pub use persistence_error::PersistenceError;
pub use recipient_repository::RecipientRepository;
#[cfg(test)]
pub use recipient_repository::MockRecipientRepository;
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::UserRepository;
