/// Data loading page.
pub mod home;
/// Fallback route.
pub mod not_found;
