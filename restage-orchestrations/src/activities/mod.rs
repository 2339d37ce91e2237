pub mod delete_instance;
pub mod find_latest_snapshot;
pub mod mangle_data;
pub mod rename_instance;
pub mod restore_from_snapshot;
pub mod wait_for_available;
