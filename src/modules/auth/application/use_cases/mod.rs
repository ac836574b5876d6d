pub mod fetch_profile;
pub mod forgot_password;
pub mod login_user;
pub mod logout_user;
pub mod refresh_token;
pub mod register_user;
pub mod reset_password;
pub mod verify_email;

#[cfg(test)]
pub mod test_support;
