pub mod auth_events_repo;
pub mod current_user_repo;
pub mod establishment_repo;
pub mod favorite_commands_repo;
pub mod group_repo;
pub mod promo_code_repo;
pub mod review_repo;
pub mod session_repo;
pub mod user_repo;
pub mod waitlist_repo;
