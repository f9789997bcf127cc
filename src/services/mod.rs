pub mod api;
pub mod circles;
pub mod comments;
pub mod feed;
pub mod missions;
pub mod otp;
pub mod reflections;

#[cfg(test)]
pub(crate) mod test_support;
