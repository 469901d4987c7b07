pub mod current_user;
pub mod establishments;
#[allow(dead_code)]
pub mod favorites;
pub mod promo_codes;
pub mod reviews;
pub mod sport_groups;
pub mod users;
#[allow(dead_code)]
pub mod waitlist;

pub use current_user::CurrentUserRow;
pub use establishments::EstablishmentRow;
pub use favorites::FavoriteRow;
pub use promo_codes::{PromoCodeRow, PromoUsageRow};
pub use reviews::ReviewRow;
pub use sport_groups::SportGroupRow;
pub use users::UsersRow;
pub use waitlist::WaitlistEntryRow;
