pub mod refresh_staging;
pub mod swap_identities;
