pub mod list_users;
pub mod make_first_admin;
pub mod toggle_active;
